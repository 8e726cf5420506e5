//! Currency presets offered in settings screens.

use indexmap::IndexMap;
use regalia_common::CurrencyFormat;

/// Currencies without a preset fall back to the configured default format.
const CODES_WITHOUT_PRESET: &[&str] = &[
    "AED", "BGN", "CZK", "DKK", "EEK", "HUF", "LTL", "LVL", "PLN", "RON", "SEK", "SKK", "CHF",
    "ISK", "NOK", "HRK", "RUB", "TRY", "BRL", "CNY", "IDR", "KRW", "MXN", "MYR", "NZD", "PHP",
    "THB",
];

/// Currency formats keyed by ISO 4217 code.
pub fn money_symbols() -> IndexMap<&'static str, Option<CurrencyFormat>> {
    let mut symbols = IndexMap::new();
    symbols.insert("EUR", Some(CurrencyFormat::euro_style("€")));
    for (code, unit) in [
        ("GBP", "£"),
        ("JPY", "¥"),
        ("USD", "$"),
        ("AUD", "$"),
        ("CAD", "$"),
        ("HKD", "$"),
        ("SGD", "$"),
    ] {
        symbols.insert(code, Some(CurrencyFormat::dollar_style(unit)));
    }
    for code in CODES_WITHOUT_PRESET {
        symbols.insert(*code, None);
    }
    symbols.insert("ZAR", Some(CurrencyFormat::dollar_style("R")));
    symbols
}

/// Sorted currency codes for a select box.
pub fn money_selects() -> Vec<&'static str> {
    let mut codes: Vec<&'static str> = money_symbols().into_keys().collect();
    codes.sort_unstable();
    codes
}
