//! Number rendering
//!
//! All arithmetic runs on [`Decimal`] so that the digits a user typed are the
//! digits that get rounded. Rounding is half away from zero, the way shop
//! prices are usually rounded.

use regalia_common::CurrencyFormat;
use rust_decimal::{Decimal, RoundingStrategy};

/// Round to `precision` decimals and print exactly that many decimals.
pub fn to_fixed(number: Decimal, precision: u32) -> String {
    let mut rounded =
        number.round_dp_with_strategy(precision, RoundingStrategy::MidpointAwayFromZero);
    rounded.rescale(precision);
    if rounded.is_zero() {
        rounded.set_sign_positive(true);
    }
    rounded.to_string()
}

/// Number of significant decimal places, trailing zeros excluded.
pub fn significant_decimals(number: Decimal) -> u32 {
    number.normalize().scale()
}

/// Format a number to its visible decimal places, using at least `precision`.
///
/// ```
/// use regalia_format::number::auto_precision;
/// use rust_decimal::Decimal;
/// use std::str::FromStr;
///
/// let n = |s| Decimal::from_str(s).unwrap();
/// assert_eq!(auto_precision(n("1.2340"), 2), "1.234");
/// assert_eq!(auto_precision(n("1.234500"), 2), "1.2345");
/// assert_eq!(auto_precision(n("1.2345"), 5), "1.23450");
/// ```
pub fn auto_precision(number: Decimal, precision: u32) -> String {
    let precision = significant_decimals(number).max(precision);
    to_fixed(number, precision)
}

/// Drop trailing zeros after the separator, and the separator itself when
/// nothing is left behind it.
pub fn strip_insignificant_zeros(formatted: &str, separator: &str) -> String {
    match formatted.rsplit_once(separator) {
        Some((int, frac)) if !separator.is_empty() && frac.chars().all(|c| c.is_ascii_digit()) => {
            let frac = frac.trim_end_matches('0');
            if frac.is_empty() {
                int.to_string()
            } else {
                format!("{int}{separator}{frac}")
            }
        }
        _ => formatted.to_string(),
    }
}

/// Insert `delimiter` between groups of three integer digits.
pub fn delimit(integer_digits: &str, delimiter: &str) -> String {
    let (sign, digits) = match integer_digits.strip_prefix('-') {
        Some(rest) => ("-", rest),
        None => ("", integer_digits),
    };
    let mut out = String::with_capacity(digits.len() + digits.len() / 3 * delimiter.len());
    for (i, ch) in digits.chars().enumerate() {
        if i > 0 && (digits.len() - i) % 3 == 0 {
            out.push_str(delimiter);
        }
        out.push(ch);
    }
    format!("{sign}{out}")
}

/// Round to `precision`, then apply thousands `delimiter` and decimal `separator`.
pub fn with_precision(number: Decimal, precision: u32, delimiter: &str, separator: &str) -> String {
    let fixed = to_fixed(number, precision);
    match fixed.split_once('.') {
        Some((int, frac)) => format!("{}{separator}{frac}", delimit(int, delimiter)),
        None => delimit(&fixed, delimiter),
    }
}

/// Render a money amount with a complete currency format.
///
/// The `%u` and `%n` placeholders of `format.format` are replaced by the unit
/// and the absolute amount; negative amounts get a leading minus sign.
pub fn to_currency(number: Decimal, format: &CurrencyFormat) -> String {
    let amount = with_precision(
        number.abs(),
        format.precision,
        &format.delimiter,
        &format.separator,
    );
    let rendered = format
        .format
        .replace("%n", &amount)
        .replace("%u", &format.unit);
    let is_negative = number.is_sign_negative()
        && !number
            .round_dp_with_strategy(format.precision, RoundingStrategy::MidpointAwayFromZero)
            .is_zero();
    if is_negative {
        format!("-{rendered}")
    } else {
        rendered
    }
}

/// Percentage with auto precision: at least two decimals are considered, more
/// when the number carries them, then insignificant zeros are dropped.
/// `19` → `19%`, `7.5` → `7,5%` with a `,` separator, `7.567` → `7.567%`.
pub fn to_percentage_auto_precision(number: Decimal, separator: &str) -> String {
    let formatted = auto_precision(number, 2);
    let stripped = strip_insignificant_zeros(&formatted, ".");
    format!("{}%", stripped.replacen('.', separator, 1))
}
