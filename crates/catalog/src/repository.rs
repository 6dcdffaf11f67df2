//! Read port onto the host's record store.

use std::sync::Arc;

use eshop_core::{AttributeId, ProductId, TemplateId};

use crate::attribute::AttributeDefinition;
use crate::error::{CatalogError, CatalogResult};
use crate::product::{Product, Template};
use crate::variation::{VariationAttribute, sort_by_sequence};

/// Relation traversal the variation rules need from the record store.
///
/// Collections come back in the store's own iteration order.
pub trait CatalogRepository: Send + Sync {
    fn template(&self, id: TemplateId) -> Option<Template>;
    fn product(&self, id: ProductId) -> Option<Product>;
    fn attribute(&self, id: AttributeId) -> Option<AttributeDefinition>;
    /// Declarations owned by a template.
    fn variation_attributes(&self, template_id: TemplateId) -> Vec<VariationAttribute>;
    /// Products owned by a template.
    fn products(&self, template_id: TemplateId) -> Vec<Product>;
}

impl<S> CatalogRepository for Arc<S>
where
    S: CatalogRepository + ?Sized,
{
    fn template(&self, id: TemplateId) -> Option<Template> {
        (**self).template(id)
    }

    fn product(&self, id: ProductId) -> Option<Product> {
        (**self).product(id)
    }

    fn attribute(&self, id: AttributeId) -> Option<AttributeDefinition> {
        (**self).attribute(id)
    }

    fn variation_attributes(&self, template_id: TemplateId) -> Vec<VariationAttribute> {
        (**self).variation_attributes(template_id)
    }

    fn products(&self, template_id: TemplateId) -> Vec<Product> {
        (**self).products(template_id)
    }
}

/// A declaration joined with the attribute it references.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ResolvedDeclaration {
    pub declaration: VariationAttribute,
    pub attribute: AttributeDefinition,
}

pub fn require_template<R>(repo: &R, id: TemplateId) -> CatalogResult<Template>
where
    R: CatalogRepository + ?Sized,
{
    repo.template(id).ok_or(CatalogError::TemplateNotFound(id))
}

/// Declarations of a template with their attributes, ordered by sequence.
pub fn resolve_declarations<R>(repo: &R, template_id: TemplateId) -> CatalogResult<Vec<ResolvedDeclaration>>
where
    R: CatalogRepository + ?Sized,
{
    let mut resolved = repo
        .variation_attributes(template_id)
        .into_iter()
        .map(|declaration| {
            let attribute = repo
                .attribute(declaration.attribute_id)
                .ok_or(CatalogError::AttributeNotFound(declaration.attribute_id))?;
            Ok(ResolvedDeclaration {
                declaration,
                attribute,
            })
        })
        .collect::<CatalogResult<Vec<_>>>()?;

    sort_by_sequence(&mut resolved, |r| r.declaration.sequence);
    Ok(resolved)
}
