//! In-memory record store for tests/dev.
//!
//! Writes follow the host's save path: changes are staged on a copy of the
//! store, the variation rules run against the staged copy, and only a
//! passing batch is committed. A failing batch leaves the store untouched.

use std::collections::HashSet;
use std::sync::RwLock;

use eshop_core::{AttributeId, DeclarationId, DomainError, Entity, ProductId, TemplateId};

use crate::attribute::AttributeDefinition;
use crate::error::{CatalogError, CatalogResult};
use crate::product::{Product, Template};
use crate::repository::CatalogRepository;
use crate::validation::{validate_products, validate_template};
use crate::variation::VariationAttribute;

#[derive(Debug, Clone, Default)]
struct State {
    templates: Vec<Template>,
    attributes: Vec<AttributeDefinition>,
    declarations: Vec<VariationAttribute>,
    products: Vec<Product>,
}

impl State {
    fn ensure_unique_attribute_name(&self, name: &str, except: Option<AttributeId>) -> CatalogResult<()> {
        let taken = self
            .attributes
            .iter()
            .any(|a| a.name() == name && Some(*a.id()) != except);
        if taken {
            return Err(CatalogError::DuplicateAttributeName(name.to_string()));
        }
        Ok(())
    }

    fn ensure_unique_uri(&self, product: &Product) -> CatalogResult<()> {
        let taken = self
            .products
            .iter()
            .any(|p| p.uri == product.uri && p.id != product.id);
        if taken {
            return Err(DomainError::conflict(format!("product uri `{}` already in use", product.uri)).into());
        }
        Ok(())
    }

    fn ensure_template(&self, id: TemplateId) -> CatalogResult<()> {
        if self.templates.iter().any(|t| t.id == id) {
            Ok(())
        } else {
            Err(CatalogError::TemplateNotFound(id))
        }
    }

    fn templates_using(&self, attribute_id: AttributeId) -> Vec<TemplateId> {
        let mut seen = HashSet::new();
        self.declarations
            .iter()
            .filter(|d| d.attribute_id == attribute_id)
            .map(|d| d.template_id)
            .filter(|id| seen.insert(*id))
            .collect()
    }
}

impl CatalogRepository for State {
    fn template(&self, id: TemplateId) -> Option<Template> {
        self.templates.iter().find(|t| t.id == id).cloned()
    }

    fn product(&self, id: ProductId) -> Option<Product> {
        self.products.iter().find(|p| p.id == id).cloned()
    }

    fn attribute(&self, id: AttributeId) -> Option<AttributeDefinition> {
        self.attributes.iter().find(|a| *a.id() == id).cloned()
    }

    fn variation_attributes(&self, template_id: TemplateId) -> Vec<VariationAttribute> {
        self.declarations
            .iter()
            .filter(|d| d.template_id == template_id)
            .cloned()
            .collect()
    }

    fn products(&self, template_id: TemplateId) -> Vec<Product> {
        self.products
            .iter()
            .filter(|p| p.template_id == template_id)
            .cloned()
            .collect()
    }
}

/// Record store keeping templates, products, attributes and declarations in
/// insertion order.
///
/// A poisoned lock is not recovered: writes fail with
/// [`CatalogError::Storage`], while [`CatalogRepository`] reads see an empty
/// store (`None` lookups, empty lists).
#[derive(Debug, Default)]
pub struct InMemoryCatalog {
    inner: RwLock<State>,
}

impl InMemoryCatalog {
    pub fn new() -> Self {
        Self::default()
    }

    /// `None` when the lock is poisoned; callers flatten that into "no record".
    fn read<T>(&self, f: impl FnOnce(&State) -> T) -> Option<T> {
        self.inner.read().ok().map(|state| f(&*state))
    }

    /// Stage a change on a copy, run `f`, commit only on success.
    fn transact<T>(&self, f: impl FnOnce(&mut State) -> CatalogResult<T>) -> CatalogResult<T> {
        let mut state = self
            .inner
            .write()
            .map_err(|_| CatalogError::Storage("catalog lock poisoned".to_string()))?;
        let mut staged = state.clone();
        let out = f(&mut staged)?;
        *state = staged;
        Ok(out)
    }

    pub fn create_attributes(&self, attributes: Vec<AttributeDefinition>) -> CatalogResult<()> {
        let count = attributes.len();
        self.transact(|state| {
            for attribute in attributes {
                state.ensure_unique_attribute_name(attribute.name(), None)?;
                state.attributes.push(attribute);
            }
            Ok(())
        })?;
        tracing::info!(count, "attributes created");
        Ok(())
    }

    /// Rename an attribute; templates declaring it are revalidated.
    pub fn rename_attribute(&self, id: AttributeId, name: impl Into<String>) -> CatalogResult<()> {
        let name = name.into();
        if name.trim().is_empty() {
            return Err(DomainError::validation("attribute name cannot be empty").into());
        }
        self.transact(|state| {
            state.ensure_unique_attribute_name(&name, Some(id))?;
            let attribute = state
                .attributes
                .iter_mut()
                .find(|a| *a.id() == id)
                .ok_or(CatalogError::AttributeNotFound(id))?;
            attribute.rename(name.clone());

            for template_id in state.templates_using(id) {
                validate_template(&*state, template_id)?;
            }
            Ok(())
        })?;
        tracing::info!(attribute_id = %id, name = %name, "attribute renamed");
        Ok(())
    }

    pub fn create_templates(&self, templates: Vec<Template>) -> CatalogResult<()> {
        let count = templates.len();
        self.transact(|state| {
            for template in templates {
                if state.templates.iter().any(|t| t.id == template.id) {
                    return Err(DomainError::conflict(format!("template {} already exists", template.id)).into());
                }
                state.templates.push(template);
            }
            Ok(())
        })?;
        tracing::info!(count, "templates created");
        Ok(())
    }

    /// Delete a template together with its declarations and products.
    pub fn delete_template(&self, id: TemplateId) -> CatalogResult<()> {
        self.transact(|state| {
            state.ensure_template(id)?;
            state.templates.retain(|t| t.id != id);
            state.declarations.retain(|d| d.template_id != id);
            state.products.retain(|p| p.template_id != id);
            Ok(())
        })?;
        tracing::info!(template_id = %id, "template deleted");
        Ok(())
    }

    /// Declare variation attributes; affected templates are revalidated.
    pub fn create_declarations(&self, declarations: Vec<VariationAttribute>) -> CatalogResult<()> {
        let count = declarations.len();
        self.transact(|state| {
            let mut touched = Vec::new();
            for declaration in declarations {
                state.ensure_template(declaration.template_id)?;
                if state.attribute(declaration.attribute_id).is_none() {
                    return Err(CatalogError::AttributeNotFound(declaration.attribute_id));
                }
                if !touched.contains(&declaration.template_id) {
                    touched.push(declaration.template_id);
                }
                state.declarations.push(declaration);
            }
            for template_id in touched {
                validate_template(&*state, template_id)?;
            }
            Ok(())
        })?;
        tracing::info!(count, "variation attributes declared");
        Ok(())
    }

    /// Replace existing declarations (attribute, sequence, widget or owning
    /// template); every template on either side of a change is revalidated.
    pub fn write_declarations(&self, declarations: Vec<VariationAttribute>) -> CatalogResult<()> {
        let count = declarations.len();
        self.transact(|state| {
            let mut touched = Vec::new();
            for declaration in declarations {
                state.ensure_template(declaration.template_id)?;
                if state.attribute(declaration.attribute_id).is_none() {
                    return Err(CatalogError::AttributeNotFound(declaration.attribute_id));
                }
                let slot = state
                    .declarations
                    .iter_mut()
                    .find(|d| d.id == declaration.id)
                    .ok_or(CatalogError::DeclarationNotFound(declaration.id))?;
                for template_id in [slot.template_id, declaration.template_id] {
                    if !touched.contains(&template_id) {
                        touched.push(template_id);
                    }
                }
                *slot = declaration;
            }
            for template_id in touched {
                validate_template(&*state, template_id)?;
            }
            Ok(())
        })?;
        tracing::info!(count, "variation attributes updated");
        Ok(())
    }

    pub fn delete_declaration(&self, id: DeclarationId) -> CatalogResult<()> {
        self.transact(|state| {
            let before = state.declarations.len();
            state.declarations.retain(|d| d.id != id);
            if state.declarations.len() == before {
                return Err(CatalogError::DeclarationNotFound(id));
            }
            Ok(())
        })?;
        tracing::info!(declaration_id = %id, "variation attribute removed");
        Ok(())
    }

    /// Create products; the whole batch is rejected if any product fails.
    pub fn create_products(&self, products: Vec<Product>) -> CatalogResult<()> {
        let count = products.len();
        self.transact(|state| {
            for product in &products {
                state.ensure_template(product.template_id)?;
                if state.products.iter().any(|p| p.id == product.id) {
                    return Err(DomainError::conflict(format!("product {} already exists", product.id)).into());
                }
                state.ensure_unique_uri(product)?;
                state.products.push(product.clone());
            }
            validate_products(&*state, &products)
        })?;
        tracing::info!(count, "products created");
        Ok(())
    }

    /// Replace existing products; the whole batch is rejected if any fails.
    pub fn write_products(&self, products: Vec<Product>) -> CatalogResult<()> {
        let count = products.len();
        self.transact(|state| {
            for product in &products {
                state.ensure_template(product.template_id)?;
                state.ensure_unique_uri(product)?;
                let slot = state
                    .products
                    .iter_mut()
                    .find(|p| p.id == product.id)
                    .ok_or(CatalogError::ProductNotFound(product.id))?;
                *slot = product.clone();
            }
            validate_products(&*state, &products)
        })?;
        tracing::info!(count, "products updated");
        Ok(())
    }
}

impl CatalogRepository for InMemoryCatalog {
    fn template(&self, id: TemplateId) -> Option<Template> {
        self.read(|s| s.template(id)).flatten()
    }

    fn product(&self, id: ProductId) -> Option<Product> {
        self.read(|s| s.product(id)).flatten()
    }

    fn attribute(&self, id: AttributeId) -> Option<AttributeDefinition> {
        self.read(|s| s.attribute(id)).flatten()
    }

    fn variation_attributes(&self, template_id: TemplateId) -> Vec<VariationAttribute> {
        self.read(|s| s.variation_attributes(template_id))
            .unwrap_or_default()
    }

    fn products(&self, template_id: TemplateId) -> Vec<Product> {
        self.read(|s| s.products(template_id)).unwrap_or_default()
    }
}
