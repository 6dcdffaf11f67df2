//! Catalog error model.

use thiserror::Error;

use eshop_core::{AttributeId, DeclarationId, DomainError, ProductId, TemplateId};

/// Result type used across the catalog crate.
pub type CatalogResult<T> = Result<T, CatalogError>;

/// Message key of the missing-attributes validation failure.
pub const MISSING_ATTRIBUTES_KEY: &str = "missing_attributes";

/// Catalog-level error.
///
/// `MissingAttributes` is the only validation failure the variation rules
/// raise. The remaining variants describe broken references or store
/// failures surfaced by the record store.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum CatalogError {
    /// A visible product lacks values for declared variation attributes.
    ///
    /// `missing` is sorted.
    #[error("Please define following attributes for product {product}: {}", .missing.join(","))]
    MissingAttributes {
        product: String,
        missing: Vec<String>,
    },

    #[error("template not found: {0}")]
    TemplateNotFound(TemplateId),

    #[error("product not found: {0}")]
    ProductNotFound(ProductId),

    #[error("attribute not found: {0}")]
    AttributeNotFound(AttributeId),

    #[error("variation attribute declaration not found: {0}")]
    DeclarationNotFound(DeclarationId),

    #[error("Attribute name must be unique! ({0})")]
    DuplicateAttributeName(String),

    #[error("invalid selection for attribute `{attribute}`: {reason}")]
    InvalidSelection { attribute: String, reason: String },

    #[error("failed to encode variation data: {0}")]
    Serialization(String),

    #[error("record store unavailable: {0}")]
    Storage(String),

    #[error(transparent)]
    Domain(#[from] DomainError),
}

impl CatalogError {
    pub fn missing_attributes(product: impl Into<String>, mut missing: Vec<String>) -> Self {
        missing.sort();
        Self::MissingAttributes {
            product: product.into(),
            missing,
        }
    }

    /// Message key for the host's translated error channel.
    pub fn message_key(&self) -> &'static str {
        match self {
            CatalogError::MissingAttributes { .. } => MISSING_ATTRIBUTES_KEY,
            CatalogError::DuplicateAttributeName(_) => "unique_name",
            CatalogError::InvalidSelection { .. } => "invalid_selection",
            CatalogError::TemplateNotFound(_)
            | CatalogError::ProductNotFound(_)
            | CatalogError::AttributeNotFound(_)
            | CatalogError::DeclarationNotFound(_) => "not_found",
            CatalogError::Serialization(_) => "serialization",
            CatalogError::Storage(_) => "storage",
            CatalogError::Domain(_) => "domain",
        }
    }

    /// Substitution arguments for the message named by [`Self::message_key`].
    pub fn message_args(&self) -> Vec<String> {
        match self {
            CatalogError::MissingAttributes { product, missing } => {
                vec![product.clone(), missing.join(",")]
            }
            CatalogError::DuplicateAttributeName(name) => vec![name.clone()],
            CatalogError::InvalidSelection { attribute, reason } => {
                vec![attribute.clone(), reason.clone()]
            }
            CatalogError::TemplateNotFound(id) => vec![id.to_string()],
            CatalogError::ProductNotFound(id) => vec![id.to_string()],
            CatalogError::AttributeNotFound(id) => vec![id.to_string()],
            CatalogError::DeclarationNotFound(id) => vec![id.to_string()],
            CatalogError::Serialization(msg) | CatalogError::Storage(msg) => vec![msg.clone()],
            CatalogError::Domain(err) => vec![err.to_string()],
        }
    }
}

impl From<serde_json::Error> for CatalogError {
    fn from(err: serde_json::Error) -> Self {
        CatalogError::Serialization(err.to_string())
    }
}
