//! Storefront variation attributes for the product catalog.
//!
//! Templates declare which attributes (size, color, ...) their variants vary
//! on. Two rules build on those declarations:
//! - [`validation`]: a product shown on the storefront must carry a value for
//!   every declared variation attribute.
//! - [`listing`]: the variant listing (prices, links, variation values and
//!   selector options) embedded into a product page.
//!
//! Records are reached through the [`CatalogRepository`] port; prices and
//! links through the [`CurrencyFormatter`] and [`UrlBuilder`] collaborators.

pub mod attribute;
pub mod config;
pub mod error;
pub mod formatting;
pub mod listing;
pub mod memory;
pub mod product;
pub mod repository;
pub mod validation;
pub mod variation;

pub use attribute::{AttributeDefinition, AttributeType, SelectionOption};
pub use config::SiteContext;
pub use error::{CatalogError, CatalogResult};
pub use formatting::{BasicCurrencyFormatter, CurrencyFormatter, PathUrlBuilder, UrlBuilder};
pub use listing::{
    OutputFormat, RenderedVariationData, VariantEntry, VariationData, VariationDataService,
    VaryingAttribute,
};
pub use memory::InMemoryCatalog;
pub use product::{AttributeValues, Product, Template};
pub use repository::{CatalogRepository, ResolvedDeclaration};
pub use validation::{validate_product, validate_products, validate_template};
pub use variation::{VariationAttribute, Widget};
