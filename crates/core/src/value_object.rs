//! Value object trait: equality by value, not identity.

/// Marker trait for value objects.
///
/// Value objects have no identity and are compared by their fields, e.g. a
/// selection option `("m", "M")` or a widget choice. They are immutable: to
/// "change" one, build a new value.
///
/// ```ignore
/// #[derive(Debug, Clone, PartialEq, Eq)]
/// struct SelectionOption { value: String, label: String }
///
/// impl ValueObject for SelectionOption {}
/// ```
pub trait ValueObject: Clone + PartialEq + core::fmt::Debug {}
