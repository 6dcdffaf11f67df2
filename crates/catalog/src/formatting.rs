//! Storefront collaborators: price formatting and product links.

/// Formats an amount of money for display.
pub trait CurrencyFormatter: Send + Sync {
    /// `amount` is in the currency's minor units (e.g. cents).
    fn format(&self, amount: u64, currency_code: &str, locale_code: &str) -> String;
}

/// Builds storefront links for products.
pub trait UrlBuilder: Send + Sync {
    fn canonical_url(&self, product_slug: &str) -> String;
}

impl<T: CurrencyFormatter + ?Sized> CurrencyFormatter for &T {
    fn format(&self, amount: u64, currency_code: &str, locale_code: &str) -> String {
        (**self).format(amount, currency_code, locale_code)
    }
}

impl<T: UrlBuilder + ?Sized> UrlBuilder for &T {
    fn canonical_url(&self, product_slug: &str) -> String {
        (**self).canonical_url(product_slug)
    }
}

struct CurrencySpec {
    symbol: &'static str,
    exponent: u32,
}

fn currency_spec(code: &str) -> Option<CurrencySpec> {
    let (symbol, exponent) = match code {
        "USD" => ("$", 2),
        "EUR" => ("€", 2),
        "GBP" => ("£", 2),
        "INR" => ("₹", 2),
        "JPY" => ("¥", 0),
        "CAD" => ("CA$", 2),
        "AUD" => ("A$", 2),
        "CHF" => ("CHF", 2),
        _ => return None,
    };
    Some(CurrencySpec { symbol, exponent })
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum SymbolPlacement {
    Prefix,
    Suffix,
}

struct LocaleStyle {
    group: &'static str,
    decimal: &'static str,
    placement: SymbolPlacement,
}

fn locale_style(locale_code: &str) -> LocaleStyle {
    let language = locale_code
        .split(['_', '-'])
        .next()
        .unwrap_or_default()
        .to_ascii_lowercase();

    match language.as_str() {
        "de" | "es" | "it" | "nl" | "pt" => LocaleStyle {
            group: ".",
            decimal: ",",
            placement: SymbolPlacement::Suffix,
        },
        "fr" => LocaleStyle {
            group: NARROW_NBSP,
            decimal: ",",
            placement: SymbolPlacement::Suffix,
        },
        _ => LocaleStyle {
            group: ",",
            decimal: ".",
            placement: SymbolPlacement::Prefix,
        },
    }
}

const NBSP: &str = "\u{a0}";
const NARROW_NBSP: &str = "\u{202f}";

fn group_digits(digits: &str, separator: &str) -> String {
    let len = digits.len();
    let mut out = String::with_capacity(len + len / 3 * separator.len());
    for (i, ch) in digits.chars().enumerate() {
        if i > 0 && (len - i) % 3 == 0 {
            out.push_str(separator);
        }
        out.push(ch);
    }
    out
}

/// Formatter covering common ISO currencies and two locale families:
/// English-style (`$1,234.50`) and continental (`1.234,50 €`).
///
/// Suffixed symbols are joined with U+00A0 and French digit groups with
/// U+202F, so prices never wrap inside a storefront line.
///
/// Unknown currency codes use the code itself as symbol with two decimals.
#[derive(Debug, Clone, Copy, Default)]
pub struct BasicCurrencyFormatter;

impl CurrencyFormatter for BasicCurrencyFormatter {
    fn format(&self, amount: u64, currency_code: &str, locale_code: &str) -> String {
        let code = currency_code.trim().to_ascii_uppercase();
        let (symbol, exponent) = match currency_spec(&code) {
            Some(spec) => (spec.symbol.to_string(), spec.exponent),
            None => (code, 2),
        };
        let style = locale_style(locale_code);

        let scale = 10u64.pow(exponent);
        let major = group_digits(&(amount / scale).to_string(), style.group);
        let number = if exponent == 0 {
            major
        } else {
            format!(
                "{major}{}{:0width$}",
                style.decimal,
                amount % scale,
                width = exponent as usize
            )
        };

        match style.placement {
            SymbolPlacement::Prefix => format!("{symbol}{number}"),
            SymbolPlacement::Suffix => format!("{number}{NBSP}{symbol}"),
        }
    }
}

/// Links products as `{base_url}/product/{slug}`.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct PathUrlBuilder {
    base_url: String,
}

impl PathUrlBuilder {
    pub fn new(base_url: impl Into<String>) -> Self {
        let base_url = base_url.into().trim_end_matches('/').to_string();
        Self { base_url }
    }
}

impl UrlBuilder for PathUrlBuilder {
    fn canonical_url(&self, product_slug: &str) -> String {
        format!("{}/product/{}", self.base_url, product_slug.trim_start_matches('/'))
    }
}
