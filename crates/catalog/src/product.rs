use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};
use serde_json::Value as JsonValue;

use eshop_core::{DomainError, DomainResult, Entity, ProductId, TemplateId};

/// Free-form attribute values of a product, keyed by attribute name.
pub type AttributeValues = BTreeMap<String, JsonValue>;

/// Product template: the definition shared by its variants.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Template {
    pub id: TemplateId,
    pub name: String,
    /// Unit list price in the currency's minor units (e.g. cents).
    pub list_price: u64,
}

impl Template {
    pub fn new(id: TemplateId, name: impl Into<String>, list_price: u64) -> DomainResult<Self> {
        let name = name.into();
        if name.trim().is_empty() {
            return Err(DomainError::validation("template name cannot be empty"));
        }
        Ok(Self {
            id,
            name,
            list_price,
        })
    }
}

impl Entity for Template {
    type Id = TemplateId;

    fn id(&self) -> &Self::Id {
        &self.id
    }
}

/// A concrete sellable product (variant) of a template.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Product {
    pub id: ProductId,
    pub template_id: TemplateId,
    pub code: Option<String>,
    /// Unique storefront slug.
    pub uri: String,
    pub displayed_on_eshop: bool,
    pub attributes: Option<AttributeValues>,
    /// Overrides the template's list price when set (minor units).
    pub list_price: Option<u64>,
}

impl Product {
    /// Hidden product without code, attributes or price override.
    pub fn new(id: ProductId, template_id: TemplateId, uri: impl Into<String>) -> Self {
        Self {
            id,
            template_id,
            code: None,
            uri: uri.into(),
            displayed_on_eshop: false,
            attributes: None,
            list_price: None,
        }
    }

    pub fn with_code(mut self, code: impl Into<String>) -> Self {
        self.code = Some(code.into());
        self
    }

    pub fn displayed(mut self, displayed: bool) -> Self {
        self.displayed_on_eshop = displayed;
        self
    }

    pub fn with_attributes<K, V>(mut self, values: impl IntoIterator<Item = (K, V)>) -> Self
    where
        K: Into<String>,
        V: Into<JsonValue>,
    {
        self.attributes = Some(
            values
                .into_iter()
                .map(|(k, v)| (k.into(), v.into()))
                .collect(),
        );
        self
    }

    pub fn with_list_price(mut self, price: u64) -> Self {
        self.list_price = Some(price);
        self
    }

    /// Attribute values; a product without a mapping reads as empty.
    pub fn attribute_values(&self) -> impl Iterator<Item = (&String, &JsonValue)> {
        self.attributes.iter().flat_map(|values| values.iter())
    }

    pub fn has_attribute(&self, name: &str) -> bool {
        self.attributes
            .as_ref()
            .is_some_and(|values| values.contains_key(name))
    }

    /// Display name: `[code] template name`, or the template name alone.
    pub fn rec_name(&self, template: &Template) -> String {
        match self.code.as_deref().filter(|c| !c.is_empty()) {
            Some(code) => format!("[{code}] {}", template.name),
            None => template.name.clone(),
        }
    }

    /// Per-unit sale price in minor units.
    pub fn sale_price(&self, template: &Template) -> u64 {
        self.list_price.unwrap_or(template.list_price)
    }

    pub(crate) fn ensure_template(&self, template: &Template) -> DomainResult<()> {
        if self.template_id != template.id {
            return Err(DomainError::invariant("template_id mismatch"));
        }
        Ok(())
    }
}

impl Entity for Product {
    type Id = ProductId;

    fn id(&self) -> &Self::Id {
        &self.id
    }
}
