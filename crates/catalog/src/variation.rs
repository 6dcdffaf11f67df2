use serde::{Deserialize, Serialize};

use eshop_core::{AttributeId, DeclarationId, Entity, TemplateId, ValueObject};

/// Display order given to declarations created without one.
pub const DEFAULT_SEQUENCE: i32 = 10;

/// Selector widget the storefront renders for a variation axis.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Widget {
    #[default]
    Dropdown,
    Swatches,
}

impl ValueObject for Widget {}

/// Declares an attribute as a variation axis of a template.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct VariationAttribute {
    pub id: DeclarationId,
    pub template_id: TemplateId,
    pub attribute_id: AttributeId,
    pub sequence: i32,
    pub widget: Widget,
}

impl VariationAttribute {
    /// Declaration with the default sequence and widget.
    pub fn new(template_id: TemplateId, attribute_id: AttributeId) -> Self {
        Self {
            id: DeclarationId::new(),
            template_id,
            attribute_id,
            sequence: DEFAULT_SEQUENCE,
            widget: Widget::default(),
        }
    }

    pub fn with_sequence(mut self, sequence: i32) -> Self {
        self.sequence = sequence;
        self
    }

    pub fn with_widget(mut self, widget: Widget) -> Self {
        self.widget = widget;
        self
    }
}

impl Entity for VariationAttribute {
    type Id = DeclarationId;

    fn id(&self) -> &Self::Id {
        &self.id
    }
}

/// Stable sort by `sequence`; ties keep the incoming order.
pub fn sort_by_sequence<T>(items: &mut [T], sequence: impl Fn(&T) -> i32) {
    items.sort_by_key(|item| sequence(item));
}
