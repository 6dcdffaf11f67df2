use serde::{Deserialize, Serialize};

use eshop_core::{AttributeId, DomainError, DomainResult, Entity, ValueObject};

use crate::error::{CatalogError, CatalogResult};

/// Value type of an attribute definition.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum AttributeType {
    Boolean,
    Integer,
    Char,
    Float,
    Numeric,
    Date,
    Datetime,
    Selection,
}

/// One allowed value of a selection attribute.
///
/// Encoded on the wire as a `[value, label]` pair.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(from = "(String, String)", into = "(String, String)")]
pub struct SelectionOption {
    pub value: String,
    pub label: String,
}

impl SelectionOption {
    pub fn new(value: impl Into<String>, label: impl Into<String>) -> Self {
        Self {
            value: value.into(),
            label: label.into(),
        }
    }
}

impl ValueObject for SelectionOption {}

impl From<(String, String)> for SelectionOption {
    fn from((value, label): (String, String)) -> Self {
        Self { value, label }
    }
}

impl From<SelectionOption> for (String, String) {
    fn from(option: SelectionOption) -> Self {
        (option.value, option.label)
    }
}

/// Parse selection source text: one `value: Label` option per line.
///
/// Both sides are trimmed and blank lines are skipped. A line without a colon
/// is used as both value and label.
pub fn parse_selection(source: &str) -> Vec<SelectionOption> {
    source
        .lines()
        .map(str::trim)
        .filter(|line| !line.is_empty())
        .map(|line| match line.split_once(':') {
            Some((value, label)) => SelectionOption::new(value.trim(), label.trim()),
            None => SelectionOption::new(line, line),
        })
        .collect()
}

/// A named product characteristic (e.g. `color`).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AttributeDefinition {
    id: AttributeId,
    name: String,
    /// Display label.
    string: String,
    type_: AttributeType,
    /// Selection source text, only meaningful for [`AttributeType::Selection`].
    selection: Option<String>,
}

impl AttributeDefinition {
    pub fn new(
        id: AttributeId,
        name: impl Into<String>,
        string: impl Into<String>,
        type_: AttributeType,
    ) -> DomainResult<Self> {
        let name = name.into();
        if name.trim().is_empty() {
            return Err(DomainError::validation("attribute name cannot be empty"));
        }
        Ok(Self {
            id,
            name,
            string: string.into(),
            type_,
            selection: None,
        })
    }

    /// Shorthand for a selection attribute with its option source text.
    pub fn selection(
        id: AttributeId,
        name: impl Into<String>,
        string: impl Into<String>,
        source: impl Into<String>,
    ) -> DomainResult<Self> {
        Ok(Self::new(id, name, string, AttributeType::Selection)?.with_selection(source))
    }

    pub fn with_selection(mut self, source: impl Into<String>) -> Self {
        self.selection = Some(source.into());
        self
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn string(&self) -> &str {
        &self.string
    }

    pub fn type_(&self) -> AttributeType {
        self.type_
    }

    pub fn selection_source(&self) -> Option<&str> {
        self.selection.as_deref()
    }

    pub fn is_selection(&self) -> bool {
        self.type_ == AttributeType::Selection
    }

    pub(crate) fn rename(&mut self, name: String) {
        self.name = name;
    }

    /// Selection options encoded as a JSON array of `[value, label]` pairs.
    ///
    /// `None` for attributes that are not selection-typed.
    pub fn selection_json(&self) -> CatalogResult<Option<String>> {
        if !self.is_selection() {
            return Ok(None);
        }
        let options = parse_selection(self.selection.as_deref().unwrap_or_default());
        Ok(Some(serde_json::to_string(&options)?))
    }

    /// Decoded selection options; `None` for non-selection attributes.
    pub fn options(&self) -> CatalogResult<Option<Vec<SelectionOption>>> {
        let Some(json) = self.selection_json()? else {
            return Ok(None);
        };
        let options = serde_json::from_str(&json).map_err(|e| CatalogError::InvalidSelection {
            attribute: self.name.clone(),
            reason: e.to_string(),
        })?;
        Ok(Some(options))
    }
}

impl Entity for AttributeDefinition {
    type Id = AttributeId;

    fn id(&self) -> &Self::Id {
        &self.id
    }
}
