//! Attribute requirement rule.
//!
//! A product shown on the storefront must carry a value for every attribute
//! its template declares as a variation axis. Hidden products are exempt.
//! The rule is a pure gate: it reads records and returns pass/fail.

use std::collections::{BTreeSet, HashMap};

use eshop_core::TemplateId;

use crate::error::{CatalogError, CatalogResult};
use crate::product::{Product, Template};
use crate::repository::{CatalogRepository, ResolvedDeclaration, require_template, resolve_declarations};

/// Names in `required` that `product` has no value for, sorted and deduplicated.
pub fn missing_attributes<'a>(
    required: impl IntoIterator<Item = &'a str>,
    product: &Product,
) -> Vec<String> {
    required
        .into_iter()
        .filter(|name| !product.has_attribute(name))
        .collect::<BTreeSet<_>>()
        .into_iter()
        .map(str::to_string)
        .collect()
}

/// Check one product against already-resolved declarations of its template.
pub fn check_product(
    product: &Product,
    template: &Template,
    declarations: &[ResolvedDeclaration],
) -> CatalogResult<()> {
    product.ensure_template(template)?;

    if !product.displayed_on_eshop {
        return Ok(());
    }

    let missing = missing_attributes(
        declarations.iter().map(|d| d.attribute.name()),
        product,
    );
    if missing.is_empty() {
        tracing::debug!(product_id = %product.id, "variation attributes complete");
        return Ok(());
    }

    tracing::debug!(
        product_id = %product.id,
        missing = %missing.join(","),
        "product rejected: missing variation attributes"
    );
    Err(CatalogError::missing_attributes(product.rec_name(template), missing))
}

/// Validate a single product on create/update.
pub fn validate_product<R>(repo: &R, product: &Product) -> CatalogResult<()>
where
    R: CatalogRepository + ?Sized,
{
    validate_products(repo, std::slice::from_ref(product))
}

/// Validate a batch of created/updated products.
///
/// Stops at the first failing product; the caller rejects the whole batch.
pub fn validate_products<R>(repo: &R, products: &[Product]) -> CatalogResult<()>
where
    R: CatalogRepository + ?Sized,
{
    let mut loaded: HashMap<TemplateId, (Template, Vec<ResolvedDeclaration>)> = HashMap::new();

    for product in products {
        if !product.displayed_on_eshop {
            continue;
        }
        if !loaded.contains_key(&product.template_id) {
            let template = require_template(repo, product.template_id)?;
            let declarations = resolve_declarations(repo, product.template_id)?;
            loaded.insert(product.template_id, (template, declarations));
        }
        if let Some((template, declarations)) = loaded.get(&product.template_id) {
            check_product(product, template, declarations)?;
        }
    }
    Ok(())
}

/// Revalidate every visible product of a template, e.g. after its
/// declarations changed.
pub fn validate_template<R>(repo: &R, template_id: TemplateId) -> CatalogResult<()>
where
    R: CatalogRepository + ?Sized,
{
    let template = require_template(repo, template_id)?;
    let declarations = resolve_declarations(repo, template_id)?;

    for product in repo.products(template_id) {
        check_product(&product, &template, &declarations)?;
    }
    Ok(())
}
