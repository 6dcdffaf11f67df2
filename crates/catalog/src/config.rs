//! Site configuration read from the environment.
//!
//! - `ESHOP_CURRENCY`: ISO currency code prices are shown in (default `USD`)
//! - `ESHOP_LOCALE`: locale used to format prices (default `en_US`)
//! - `ESHOP_BASE_URL`: prefix of storefront links (default empty, i.e. relative)

use serde::{Deserialize, Serialize};

use crate::formatting::PathUrlBuilder;

pub const CURRENCY_VAR: &str = "ESHOP_CURRENCY";
pub const LOCALE_VAR: &str = "ESHOP_LOCALE";
pub const BASE_URL_VAR: &str = "ESHOP_BASE_URL";

const DEFAULT_CURRENCY: &str = "USD";
const DEFAULT_LOCALE: &str = "en_US";

/// Currency and locale of the site serving the current request.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SiteContext {
    pub currency_code: String,
    pub locale_code: String,
}

impl SiteContext {
    pub fn new(currency_code: impl Into<String>, locale_code: impl Into<String>) -> Self {
        Self {
            currency_code: currency_code.into(),
            locale_code: locale_code.into(),
        }
    }

    pub fn from_env() -> Self {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Build from an arbitrary key lookup; blank values fall back to defaults.
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Self {
        let read = |key: &str, default: &str| {
            lookup(key)
                .map(|v| v.trim().to_string())
                .filter(|v| !v.is_empty())
                .unwrap_or_else(|| default.to_string())
        };
        Self {
            currency_code: read(CURRENCY_VAR, DEFAULT_CURRENCY),
            locale_code: read(LOCALE_VAR, DEFAULT_LOCALE),
        }
    }
}

impl Default for SiteContext {
    fn default() -> Self {
        Self::new(DEFAULT_CURRENCY, DEFAULT_LOCALE)
    }
}

impl PathUrlBuilder {
    pub fn from_env() -> Self {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Self {
        Self::new(lookup(BASE_URL_VAR).unwrap_or_default().trim())
    }
}
