//! `eshop-core` — domain foundation building blocks.
//!
//! This crate contains **pure domain** primitives shared by the catalog
//! modules (no storage, no formatting, no HTTP).

pub mod entity;
pub mod error;
pub mod id;
pub mod value_object;

pub use entity::Entity;
pub use error::{DomainError, DomainResult};
pub use id::{AttributeId, DeclarationId, ProductId, TemplateId};
pub use value_object::ValueObject;
