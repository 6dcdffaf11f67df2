//! Variant listing for storefront product pages.
//!
//! Assembles, for one template, the visible variants (price, link, variation
//! values) and the varying attributes that drive the selector UI.

use serde::{Deserialize, Serialize};

use eshop_core::{ProductId, TemplateId};

use crate::attribute::SelectionOption;
use crate::config::SiteContext;
use crate::error::CatalogResult;
use crate::formatting::{CurrencyFormatter, UrlBuilder};
use crate::product::AttributeValues;
use crate::repository::{CatalogRepository, require_template, resolve_declarations};
use crate::variation::Widget;

/// A variation axis of the template.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct VaryingAttribute {
    pub sequence: i32,
    pub name: String,
    /// Display label.
    #[serde(rename = "string")]
    pub label: String,
    pub widget: Widget,
    /// Allowed values; absent when the attribute is not selection-typed,
    /// which the selector does not support.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub options: Option<Vec<SelectionOption>>,
}

impl VaryingAttribute {
    pub fn options_supported(&self) -> bool {
        self.options.is_some()
    }
}

/// One visible product of the template.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct VariantEntry {
    pub id: ProductId,
    pub name: String,
    pub code: Option<String>,
    /// Formatted unit sale price.
    pub price: String,
    pub url: String,
    /// Values of the varying attributes only.
    pub attributes: AttributeValues,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct VariationData {
    pub variants: Vec<VariantEntry>,
    pub varying_attributes: Vec<VaryingAttribute>,
}

impl VariationData {
    pub fn to_json(&self) -> CatalogResult<String> {
        Ok(serde_json::to_string(self)?)
    }

    pub fn from_json(json: &str) -> CatalogResult<Self> {
        Ok(serde_json::from_str(json)?)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum OutputFormat {
    #[default]
    Native,
    Json,
}

/// Variation data in the shape the caller asked for.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RenderedVariationData {
    Native(VariationData),
    Json(String),
}

/// Builds variation data from the record store and the storefront
/// collaborators of the current request.
#[derive(Debug, Clone)]
pub struct VariationDataService<R, F, U> {
    repo: R,
    formatter: F,
    urls: U,
    site: SiteContext,
}

impl<R, F, U> VariationDataService<R, F, U>
where
    R: CatalogRepository,
    F: CurrencyFormatter,
    U: UrlBuilder,
{
    pub fn new(repo: R, formatter: F, urls: U, site: SiteContext) -> Self {
        Self {
            repo,
            formatter,
            urls,
            site,
        }
    }

    pub fn variation_data(&self, template_id: TemplateId) -> CatalogResult<VariationData> {
        let template = require_template(&self.repo, template_id)?;
        let declarations = resolve_declarations(&self.repo, template_id)?;

        let mut varying_attributes = Vec::with_capacity(declarations.len());
        for resolved in declarations {
            let options = resolved.attribute.options()?;
            if options.is_none() {
                tracing::warn!(
                    template_id = %template_id,
                    attribute = resolved.attribute.name(),
                    attribute_type = ?resolved.attribute.type_(),
                    "variation attribute is not selection-typed; options unsupported"
                );
            }
            varying_attributes.push(VaryingAttribute {
                sequence: resolved.declaration.sequence,
                name: resolved.attribute.name().to_string(),
                label: resolved.attribute.string().to_string(),
                widget: resolved.declaration.widget,
                options,
            });
        }

        let variants: Vec<VariantEntry> = self
            .repo
            .products(template_id)
            .into_iter()
            .filter(|product| product.displayed_on_eshop)
            .map(|product| {
                let attributes: AttributeValues = product
                    .attribute_values()
                    .filter(|(name, _)| varying_attributes.iter().any(|va| &va.name == *name))
                    .map(|(name, value)| (name.clone(), value.clone()))
                    .collect();

                VariantEntry {
                    id: product.id,
                    name: template.name.clone(),
                    code: product.code.clone(),
                    price: self.formatter.format(
                        product.sale_price(&template),
                        &self.site.currency_code,
                        &self.site.locale_code,
                    ),
                    url: self.urls.canonical_url(&product.uri),
                    attributes,
                }
            })
            .collect();

        tracing::debug!(
            template_id = %template_id,
            variants = variants.len(),
            varying_attributes = varying_attributes.len(),
            "assembled variation data"
        );

        Ok(VariationData {
            variants,
            varying_attributes,
        })
    }

    pub fn variation_data_json(&self, template_id: TemplateId) -> CatalogResult<String> {
        self.variation_data(template_id)?.to_json()
    }

    pub fn render(
        &self,
        template_id: TemplateId,
        format: OutputFormat,
    ) -> CatalogResult<RenderedVariationData> {
        let data = self.variation_data(template_id)?;
        Ok(match format {
            OutputFormat::Native => RenderedVariationData::Native(data),
            OutputFormat::Json => RenderedVariationData::Json(data.to_json()?),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Arc;

    use eshop_core::{AttributeId, Entity};
    use serde_json::json;

    use crate::attribute::{AttributeDefinition, AttributeType};
    use crate::error::CatalogError;
    use crate::formatting::{BasicCurrencyFormatter, PathUrlBuilder};
    use crate::memory::InMemoryCatalog;
    use crate::product::{Product, Template};
    use crate::variation::VariationAttribute;

    type Service = VariationDataService<Arc<InMemoryCatalog>, BasicCurrencyFormatter, PathUrlBuilder>;

    struct Fixture {
        catalog: Arc<InMemoryCatalog>,
        template: Template,
        size: AttributeDefinition,
        color: AttributeDefinition,
    }

    impl Fixture {
        fn new() -> Self {
            let catalog = Arc::new(InMemoryCatalog::new());
            let size =
                AttributeDefinition::selection(AttributeId::new(), "size", "Size", "m: M\nl:L\nxl:XL")
                    .unwrap();
            let color =
                AttributeDefinition::selection(AttributeId::new(), "color", "Color", "blue: Blue\nblack:Black")
                    .unwrap();
            catalog
                .create_attributes(vec![size.clone(), color.clone()])
                .unwrap();

            let template = Template::new(TemplateId::new(), "THis is Product", 1000).unwrap();
            catalog.create_templates(vec![template.clone()]).unwrap();

            Self {
                catalog,
                template,
                size,
                color,
            }
        }

        fn declare(&self, attribute: &AttributeDefinition, sequence: i32, widget: Widget) {
            self.catalog
                .create_declarations(vec![
                    VariationAttribute::new(self.template.id, *attribute.id())
                        .with_sequence(sequence)
                        .with_widget(widget),
                ])
                .unwrap();
        }

        fn service(&self) -> Service {
            VariationDataService::new(
                self.catalog.clone(),
                BasicCurrencyFormatter,
                PathUrlBuilder::default(),
                SiteContext::default(),
            )
        }
    }

    #[test]
    fn lists_visible_variants_with_varying_values_only() {
        let fx = Fixture::new();
        fx.declare(&fx.size, 10, Widget::Dropdown);
        fx.declare(&fx.color, 10, Widget::Dropdown);

        let product = Product::new(ProductId::new(), fx.template.id, "uri3")
            .with_code("SomeProductCode")
            .displayed(true)
            .with_attributes([("color", "blue"), ("size", "L"), ("ø", "something")]);
        fx.catalog.create_products(vec![product.clone()]).unwrap();

        let data = fx.service().variation_data(fx.template.id).unwrap();

        assert_eq!(data.varying_attributes.len(), 2);
        assert_eq!(data.variants.len(), 1);

        let variant = &data.variants[0];
        assert_eq!(variant.id, product.id);
        assert_eq!(variant.name, "THis is Product");
        assert_eq!(variant.code.as_deref(), Some("SomeProductCode"));
        assert_eq!(variant.price, "$10.00");
        assert_eq!(variant.url, "/product/uri3");
        assert_eq!(
            serde_json::to_value(&variant.attributes).unwrap(),
            json!({"color": "blue", "size": "L"})
        );
    }

    #[test]
    fn varying_attributes_follow_sequence_and_carry_options() {
        let fx = Fixture::new();
        fx.declare(&fx.color, 20, Widget::Swatches);
        fx.declare(&fx.size, 5, Widget::Dropdown);

        let data = fx.service().variation_data(fx.template.id).unwrap();
        let names: Vec<_> = data.varying_attributes.iter().map(|a| a.name.as_str()).collect();
        assert_eq!(names, vec!["size", "color"]);

        let color = &data.varying_attributes[1];
        assert_eq!(color.label, "Color");
        assert_eq!(color.widget, Widget::Swatches);
        assert_eq!(
            color.options,
            Some(vec![
                SelectionOption::new("blue", "Blue"),
                SelectionOption::new("black", "Black"),
            ])
        );
    }

    #[test]
    fn hidden_products_are_not_listed() {
        let fx = Fixture::new();
        fx.catalog
            .create_products(vec![
                Product::new(ProductId::new(), fx.template.id, "a").displayed(true),
                Product::new(ProductId::new(), fx.template.id, "b"),
                Product::new(ProductId::new(), fx.template.id, "c").displayed(true),
            ])
            .unwrap();

        let data = fx.service().variation_data(fx.template.id).unwrap();
        let urls: Vec<_> = data.variants.iter().map(|v| v.url.as_str()).collect();
        assert_eq!(urls, vec!["/product/a", "/product/c"]);
    }

    #[test]
    fn no_declarations_yields_empty_attribute_maps() {
        let fx = Fixture::new();
        fx.catalog
            .create_products(vec![
                Product::new(ProductId::new(), fx.template.id, "a")
                    .displayed(true)
                    .with_attributes([("color", "blue")]),
                Product::new(ProductId::new(), fx.template.id, "b").displayed(true),
            ])
            .unwrap();

        let data = fx.service().variation_data(fx.template.id).unwrap();
        assert!(data.varying_attributes.is_empty());
        assert_eq!(data.variants.len(), 2);
        assert!(data.variants.iter().all(|v| v.attributes.is_empty()));
    }

    #[test]
    fn non_selection_attribute_has_no_options() {
        let fx = Fixture::new();
        let material =
            AttributeDefinition::new(AttributeId::new(), "material", "Material", AttributeType::Char)
                .unwrap();
        fx.catalog.create_attributes(vec![material.clone()]).unwrap();
        fx.declare(&material, 10, Widget::Dropdown);

        let data = fx.service().variation_data(fx.template.id).unwrap();
        assert_eq!(data.varying_attributes.len(), 1);
        assert!(!data.varying_attributes[0].options_supported());

        let json = data.to_json().unwrap();
        assert!(!json.contains("\"options\""));
    }

    #[test]
    fn product_price_override_is_formatted_with_site_currency() {
        let fx = Fixture::new();
        fx.catalog
            .create_products(vec![
                Product::new(ProductId::new(), fx.template.id, "a")
                    .displayed(true)
                    .with_list_price(123_450),
            ])
            .unwrap();

        let service = VariationDataService::new(
            fx.catalog.clone(),
            BasicCurrencyFormatter,
            PathUrlBuilder::new("https://shop.test"),
            SiteContext::new("EUR", "de_DE"),
        );
        let data = service.variation_data(fx.template.id).unwrap();
        assert_eq!(data.variants[0].price, "1.234,50\u{a0}€");
        assert_eq!(data.variants[0].url, "https://shop.test/product/a");
    }

    #[test]
    fn json_output_round_trips() {
        let fx = Fixture::new();
        fx.declare(&fx.size, 10, Widget::Dropdown);
        fx.declare(&fx.color, 20, Widget::Swatches);
        fx.catalog
            .create_products(vec![
                Product::new(ProductId::new(), fx.template.id, "uri3")
                    .displayed(true)
                    .with_attributes([("color", "blue"), ("size", "L")]),
            ])
            .unwrap();

        let service = fx.service();
        let native = service.variation_data(fx.template.id).unwrap();
        let json = match service.render(fx.template.id, OutputFormat::Json).unwrap() {
            RenderedVariationData::Json(json) => json,
            other => panic!("expected JSON output, got {other:?}"),
        };

        assert_eq!(VariationData::from_json(&json).unwrap(), native);

        let value: serde_json::Value = serde_json::from_str(&json).unwrap();
        assert_eq!(value["varying_attributes"][0]["string"], "Size");
        assert_eq!(value["varying_attributes"][0]["options"][0], json!(["m", "M"]));
        assert_eq!(value["varying_attributes"][1]["widget"], "swatches");
    }

    #[test]
    fn json_output_round_trips_non_string_values() {
        let fx = Fixture::new();
        let weight =
            AttributeDefinition::new(AttributeId::new(), "weight", "Weight", AttributeType::Float).unwrap();
        let pieces =
            AttributeDefinition::new(AttributeId::new(), "pieces", "Pieces", AttributeType::Integer).unwrap();
        let organic =
            AttributeDefinition::new(AttributeId::new(), "organic", "Organic", AttributeType::Boolean).unwrap();
        fx.catalog
            .create_attributes(vec![weight.clone(), pieces.clone(), organic.clone()])
            .unwrap();
        fx.declare(&weight, 10, Widget::Dropdown);
        fx.declare(&pieces, 20, Widget::Dropdown);
        fx.declare(&organic, 30, Widget::Dropdown);

        fx.catalog
            .create_products(vec![
                Product::new(ProductId::new(), fx.template.id, "a")
                    .displayed(true)
                    .with_attributes([
                        ("weight", json!(1.0715660391465826e-75)),
                        ("pieces", json!(-42)),
                        ("organic", json!(true)),
                    ]),
                Product::new(ProductId::new(), fx.template.id, "b")
                    .displayed(true)
                    .with_attributes([
                        ("weight", json!(0.1)),
                        ("pieces", json!(u64::MAX)),
                        ("organic", json!(false)),
                    ]),
            ])
            .unwrap();

        let service = fx.service();
        let native = service.variation_data(fx.template.id).unwrap();
        let json = service.variation_data_json(fx.template.id).unwrap();
        let decoded = VariationData::from_json(&json).unwrap();

        assert_eq!(decoded, native);
        assert_eq!(
            decoded.variants[0].attributes["weight"].as_f64(),
            Some(1.0715660391465826e-75)
        );
        assert_eq!(decoded.variants[1].attributes["pieces"].as_u64(), Some(u64::MAX));
    }

    #[test]
    fn repeated_calls_are_identical() {
        let fx = Fixture::new();
        fx.declare(&fx.size, 10, Widget::Dropdown);
        fx.catalog
            .create_products(vec![
                Product::new(ProductId::new(), fx.template.id, "a")
                    .displayed(true)
                    .with_attributes([("size", "m")]),
            ])
            .unwrap();

        let service = fx.service();
        assert_eq!(
            service.variation_data(fx.template.id).unwrap(),
            service.variation_data(fx.template.id).unwrap()
        );
        assert_eq!(
            service.variation_data_json(fx.template.id).unwrap(),
            service.variation_data_json(fx.template.id).unwrap()
        );
    }

    mod proptest_tests {
        use super::*;
        use proptest::collection::btree_set;
        use proptest::prelude::*;

        proptest! {
            #![proptest_config(ProptestConfig {
                cases: 64,
                ..ProptestConfig::default()
            })]

            /// Property: listed values are exactly the product's values for
            /// declared attributes.
            #[test]
            fn listed_attributes_are_restricted_to_declared_names(
                declared in btree_set("v[a-z]{1,4}", 0..4),
                extra in btree_set("[A-Z]{1,5}", 0..4),
            ) {
                let fx = Fixture::new();
                for name in &declared {
                    let attr = AttributeDefinition::new(AttributeId::new(), name.as_str(), name.as_str(), AttributeType::Char)
                        .unwrap();
                    fx.catalog.create_attributes(vec![attr.clone()]).unwrap();
                    fx.declare(&attr, 10, Widget::Dropdown);
                }

                let values = declared.iter().chain(extra.iter()).map(|n| (n.clone(), n.clone()));
                fx.catalog
                    .create_products(vec![
                        Product::new(ProductId::new(), fx.template.id, "p")
                            .displayed(true)
                            .with_attributes(values),
                    ])
                    .unwrap();

                let data = fx.service().variation_data(fx.template.id).unwrap();
                let listed: Vec<&String> = data.variants[0].attributes.keys().collect();
                let expected: Vec<&String> = declared.iter().collect();
                prop_assert_eq!(listed, expected);
            }
        }
    }

    #[test]
    fn unknown_template_is_reported() {
        let fx = Fixture::new();
        let missing = TemplateId::new();
        assert_eq!(
            fx.service().variation_data(missing).unwrap_err(),
            CatalogError::TemplateNotFound(missing)
        );
    }
}
