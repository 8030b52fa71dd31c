//! Locale-tolerant number parsing for spreadsheet cells.
//!
//! Ledger workbooks are typed by hand, so prices arrive as anything from a
//! proper numeric cell to `"$ 1.234,56"`. Parsing never fails loudly: input
//! that cannot be read as a finite number becomes `None`, which callers store
//! as unknown rather than zero.

use std::str::FromStr;

use rust_decimal::Decimal;
use rust_decimal::prelude::FromPrimitive;

use super::CellValue;

const CURRENCY_SYMBOLS: &[char] = &['$', '€', '£', '¥', '₡', '₲', '₱', '₹', '¢'];

/// Parse a cell as a decimal amount.
///
/// # Examples
/// ```
/// use inventory_backend::domain::{CellValue, normalize_decimal};
/// use rust_decimal::Decimal;
///
/// let expected = Decimal::new(123_456, 2);
/// assert_eq!(normalize_decimal(&CellValue::Text("$1,234.56".into())), Some(expected));
/// assert_eq!(normalize_decimal(&CellValue::Text("1.234,56".into())), Some(expected));
/// assert_eq!(normalize_decimal(&CellValue::Text("abc".into())), None);
/// assert_eq!(normalize_decimal(&CellValue::Empty), None);
/// ```
#[must_use]
pub fn normalize_decimal(cell: &CellValue) -> Option<Decimal> {
    match cell {
        CellValue::Empty | CellValue::Bool(_) => None,
        CellValue::Integer(value) => Some(Decimal::from(*value)),
        CellValue::Number(value) => decimal_from_float(*value),
        CellValue::Text(text) => normalize_decimal_text(text),
    }
}

fn decimal_from_float(value: f64) -> Option<Decimal> {
    if !value.is_finite() {
        return None;
    }
    // Display gives the shortest round-tripping form, which is what the
    // spreadsheet showed.
    Decimal::from_str(&value.to_string())
        .ok()
        .or_else(|| Decimal::from_f64(value))
}

/// Parse free-form text as a decimal amount.
///
/// Whitespace, hyphens, and currency symbols are discarded. When both `,` and
/// `.` appear, whichever comes last is the decimal separator. A lone comma is
/// a decimal separator; repeated commas or repeated dots are thousands
/// separators.
///
/// # Examples
/// ```
/// use inventory_backend::domain::normalize_decimal_text;
/// use rust_decimal::Decimal;
///
/// assert_eq!(normalize_decimal_text("12,5"), Some(Decimal::new(125, 1)));
/// assert_eq!(normalize_decimal_text("1,234,567"), Some(Decimal::from(1_234_567)));
/// assert_eq!(normalize_decimal_text("  "), None);
/// ```
#[must_use]
pub fn normalize_decimal_text(raw: &str) -> Option<Decimal> {
    let stripped: String = raw
        .chars()
        .filter(|c| !c.is_whitespace() && *c != '-' && !CURRENCY_SYMBOLS.contains(c))
        .collect();
    let unsigned = stripped.strip_prefix('+').unwrap_or(&stripped);
    let canonical = canonical_separators(unsigned)?;
    parse_plain_decimal(&canonical)
}

/// Rewrite `,`/`.` so that at most one `.` remains, as the decimal point.
fn canonical_separators(text: &str) -> Option<String> {
    let last_comma = text.rfind(',');
    let last_dot = text.rfind('.');
    let canonical = match (last_comma, last_dot) {
        (Some(comma), Some(dot)) if comma > dot => text.replace('.', "").replace(',', "."),
        (Some(_), Some(_)) => text.replace(',', ""),
        (Some(_), None) if text.matches(',').count() == 1 => text.replace(',', "."),
        (Some(_), None) => text.replace(',', ""),
        (None, Some(_)) if text.matches('.').count() > 1 => text.replace('.', ""),
        (None, _) => text.to_owned(),
    };
    (!canonical.is_empty()).then_some(canonical)
}

fn parse_plain_decimal(text: &str) -> Option<Decimal> {
    let valid = text.chars().all(|c| c.is_ascii_digit() || c == '.')
        && text.matches('.').count() <= 1
        && text.chars().any(|c| c.is_ascii_digit());
    if !valid {
        return None;
    }
    let trimmed = text.strip_suffix('.').unwrap_or(text);
    let padded = if trimmed.starts_with('.') {
        format!("0{trimmed}")
    } else {
        trimmed.to_owned()
    };
    Decimal::from_str(&padded).ok()
}

/// Parse a cell as a whole count, defaulting to `0`.
///
/// Text is read up to the first non-digit after an optional sign, numeric
/// cells are truncated toward zero, and anything unreadable or outside the
/// `i32` range yields `0`.
///
/// # Examples
/// ```
/// use inventory_backend::domain::{CellValue, parse_count};
///
/// assert_eq!(parse_count(&CellValue::Text(" 12 uds".into())), 12);
/// assert_eq!(parse_count(&CellValue::Number(7.9)), 7);
/// assert_eq!(parse_count(&CellValue::Text("n/a".into())), 0);
/// ```
#[must_use]
pub fn parse_count(cell: &CellValue) -> i32 {
    match cell {
        CellValue::Empty | CellValue::Bool(_) => 0,
        CellValue::Integer(value) => i32::try_from(*value).unwrap_or(0),
        CellValue::Number(value) => count_from_float(*value),
        CellValue::Text(text) => count_from_text(text),
    }
}

#[expect(
    clippy::cast_possible_truncation,
    reason = "range is checked before the cast"
)]
fn count_from_float(value: f64) -> i32 {
    let truncated = value.trunc();
    if truncated.is_finite() && truncated >= f64::from(i32::MIN) && truncated <= f64::from(i32::MAX) {
        truncated as i32
    } else {
        0
    }
}

fn count_from_text(text: &str) -> i32 {
    let trimmed = text.trim();
    let (sign, rest) = match trimmed.chars().next() {
        Some(sign @ ('+' | '-')) => (Some(sign), trimmed.get(1..).unwrap_or_default()),
        _ => (None, trimmed),
    };
    let digits: String = rest.chars().take_while(char::is_ascii_digit).collect();
    if digits.is_empty() {
        return 0;
    }
    let signed = match sign {
        Some('-') => format!("-{digits}"),
        _ => digits,
    };
    signed.parse().unwrap_or(0)
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    fn dec(text: &str) -> Decimal {
        Decimal::from_str(text).expect("valid decimal literal")
    }

    #[rstest]
    #[case("$1,234.56", "1234.56")]
    #[case("1.234,56", "1234.56")]
    #[case("$ 1 234,56", "1234.56")]
    #[case("€1.234.567", "1234567")]
    #[case("1,234,567", "1234567")]
    #[case("12,5", "12.5")]
    #[case("0.75", "0.75")]
    #[case(".5", "0.5")]
    #[case("5.", "5")]
    #[case("+42", "42")]
    #[case("-15", "15")]
    #[case("1\u{a0}500", "1500")]
    #[case("₡ 2.500,00", "2500.00")]
    fn normalises_locale_formats(#[case] raw: &str, #[case] expected: &str) {
        assert_eq!(normalize_decimal_text(raw), Some(dec(expected)));
    }

    #[rstest]
    #[case("")]
    #[case("   ")]
    #[case("abc")]
    #[case("$")]
    #[case("12abc")]
    #[case("1.2,3.4")]
    #[case("NaN")]
    #[case("Infinity")]
    #[case("1e5")]
    #[case("--")]
    fn malformed_text_yields_none(#[case] raw: &str) {
        assert_eq!(normalize_decimal_text(raw), None);
    }

    #[rstest]
    fn both_locale_styles_agree() {
        assert_eq!(
            normalize_decimal_text("$1,234.56"),
            normalize_decimal_text("1.234,56")
        );
    }

    #[rstest]
    #[case(CellValue::Number(1234.56), Some("1234.56"))]
    #[case(CellValue::Number(0.1), Some("0.1"))]
    #[case(CellValue::Integer(-3), Some("-3"))]
    #[case(CellValue::Number(f64::NAN), None)]
    #[case(CellValue::Number(f64::INFINITY), None)]
    #[case(CellValue::Bool(true), None)]
    #[case(CellValue::Empty, None)]
    fn normalises_typed_cells(#[case] cell: CellValue, #[case] expected: Option<&str>) {
        assert_eq!(normalize_decimal(&cell), expected.map(dec));
    }

    #[rstest]
    fn overflowing_text_yields_none() {
        assert_eq!(normalize_decimal_text(&"9".repeat(40)), None);
    }

    #[rstest]
    #[case(CellValue::Text("15".into()), 15)]
    #[case(CellValue::Text("  -4".into()), -4)]
    #[case(CellValue::Text("+8".into()), 8)]
    #[case(CellValue::Text("12.9".into()), 12)]
    #[case(CellValue::Text("1,500".into()), 1)]
    #[case(CellValue::Text("abc".into()), 0)]
    #[case(CellValue::Text("-".into()), 0)]
    #[case(CellValue::Text("99999999999".into()), 0)]
    #[case(CellValue::Number(-2.7), -2)]
    #[case(CellValue::Number(1e12), 0)]
    #[case(CellValue::Integer(3_000_000_000), 0)]
    #[case(CellValue::Integer(42), 42)]
    #[case(CellValue::Bool(true), 0)]
    #[case(CellValue::Empty, 0)]
    fn parses_counts(#[case] cell: CellValue, #[case] expected: i32) {
        assert_eq!(parse_count(&cell), expected);
    }
}
