//! Currencies offered by the conversion form.

/// A selectable currency.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Currency {
    /// ISO 4217 code.
    pub code: &'static str,
    /// English name.
    pub name: &'static str,
    /// Flag emoji of the issuing country or union.
    pub flag: &'static str,
}

impl Currency {
    /// Selector label, e.g. "🇺🇸 USD - US Dollar".
    #[must_use]
    pub fn label(&self) -> String {
        format!("{} {} - {}", self.flag, self.code, self.name)
    }
}

/// Default source currency.
pub const DEFAULT_SOURCE: &str = "USD";
/// Default target currency.
pub const DEFAULT_TARGET: &str = "INR";

/// Every currency offered, in display order.
pub const CURRENCIES: &[Currency] = &[
    Currency { code: "USD", name: "US Dollar", flag: "🇺🇸" },
    Currency { code: "EUR", name: "Euro", flag: "🇪🇺" },
    Currency { code: "GBP", name: "British Pound", flag: "🇬🇧" },
    Currency { code: "INR", name: "Indian Rupee", flag: "🇮🇳" },
    Currency { code: "JPY", name: "Japanese Yen", flag: "🇯🇵" },
    Currency { code: "AUD", name: "Australian Dollar", flag: "🇦🇺" },
    Currency { code: "CAD", name: "Canadian Dollar", flag: "🇨🇦" },
    Currency { code: "CHF", name: "Swiss Franc", flag: "🇨🇭" },
    Currency { code: "CNY", name: "Chinese Yuan", flag: "🇨🇳" },
    Currency { code: "SGD", name: "Singapore Dollar", flag: "🇸🇬" },
    Currency { code: "AED", name: "UAE Dirham", flag: "🇦🇪" },
    Currency { code: "NZD", name: "New Zealand Dollar", flag: "🇳🇿" },
];

/// Look up a currency by code, case-insensitively.
#[must_use]
pub fn find_currency(code: &str) -> Option<&'static Currency> {
    let code = code.trim();
    CURRENCIES.iter().find(|c| c.code.eq_ignore_ascii_case(code))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults_exist() {
        assert!(find_currency(DEFAULT_SOURCE).is_some());
        assert!(find_currency(DEFAULT_TARGET).is_some());
    }

    #[test]
    fn test_lookup_is_case_insensitive() {
        assert_eq!(find_currency(" eur ").map(|c| c.code), Some("EUR"));
        assert!(find_currency("XYZ").is_none());
    }

    #[test]
    fn test_label() {
        let usd = find_currency("USD").unwrap();
        assert_eq!(usd.label(), "🇺🇸 USD - US Dollar");
    }

    #[test]
    fn test_codes_are_unique() {
        for (i, a) in CURRENCIES.iter().enumerate() {
            assert!(CURRENCIES[i + 1..].iter().all(|b| b.code != a.code));
        }
    }
}
