//! Locale-aware numeric coercion for spreadsheet cells.
//!
//! Sheets exported from Brazilian tooling carry values such as `R$ 1.234,56`, where `.`
//! groups thousands and `,` is the decimal separator. Every cell coerces to a finite
//! `f64`; anything unreadable becomes `0.0`.

use crate::schema::Cell;
use regex::Regex;
use std::sync::LazyLock;

/// Coerces a cell into a finite number. Never fails.
pub fn parse_number(cell: &Cell) -> f64 {
    match cell {
        Cell::Number(n) if n.is_finite() => *n,
        Cell::Number(_) => 0.0,
        Cell::Text(s) => parse_brazilian_decimal(s),
        Cell::Empty => 0.0,
    }
}

/// Converts Brazilian-formatted text (`"R$ 2.000,00"`) into a number.
///
/// Currency markers and whitespace are dropped, `.` is removed as a thousands separator,
/// `,` becomes the decimal point, and anything other than digits, `.` and `-` is stripped.
/// The longest leading numeric prefix of what remains is parsed; no prefix yields `0.0`.
pub fn parse_brazilian_decimal(text: &str) -> f64 {
    let cleaned: String = text
        .chars()
        .filter(|&c| !matches!(c, 'R' | '$' | '.') && !c.is_whitespace())
        .map(|c| if c == ',' { '.' } else { c })
        .filter(|c| c.is_ascii_digit() || *c == '.' || *c == '-')
        .collect();

    leading_float(&cleaned)
        .filter(|v| v.is_finite())
        .unwrap_or(0.0)
}

static LEADING_NUMBER: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^-?(?:\d+(?:\.\d*)?|\.\d+)").expect("valid leading number regex")
});

/// Parses the longest prefix shaped like `-?digits(.digits)?`.
fn leading_float(s: &str) -> Option<f64> {
    LEADING_NUMBER
        .find(s)
        .and_then(|m| m.as_str().trim_end_matches('.').parse::<f64>().ok())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn text(s: &str) -> Cell {
        Cell::Text(s.to_string())
    }

    #[test]
    fn test_brazilian_formats() {
        assert_eq!(parse_number(&text("1.234,56")), 1234.56);
        assert_eq!(parse_number(&text("R$ 2.000,00")), 2000.0);
        assert_eq!(parse_number(&text("  350 ")), 350.0);
        assert_eq!(parse_number(&text("-12,5")), -12.5);
        assert_eq!(parse_number(&text("R$1.000.000")), 1_000_000.0);
    }

    #[test]
    fn test_numbers_pass_through() {
        assert_eq!(parse_number(&Cell::Number(80.0)), 80.0);
        assert_eq!(parse_number(&Cell::Number(-3.25)), -3.25);
        assert_eq!(parse_number(&Cell::Number(f64::NAN)), 0.0);
        assert_eq!(parse_number(&Cell::Number(f64::INFINITY)), 0.0);
    }

    #[test]
    fn test_garbage_is_zero() {
        assert_eq!(parse_number(&text("")), 0.0);
        assert_eq!(parse_number(&Cell::Empty), 0.0);
        assert_eq!(parse_number(&text("n/a")), 0.0);
        assert_eq!(parse_number(&text("-")), 0.0);
        assert_eq!(parse_number(&text("R$")), 0.0);
    }

    #[test]
    fn test_prefix_parsing() {
        // Trailing junk after the number is ignored.
        assert_eq!(parse_brazilian_decimal("12-3"), 12.0);
        assert_eq!(parse_brazilian_decimal("1,5,3"), 1.5);
        assert_eq!(parse_brazilian_decimal(",5"), 0.5);
        assert_eq!(parse_brazilian_decimal("7,"), 7.0);
        assert_eq!(parse_brazilian_decimal("85%"), 85.0);
        assert_eq!(parse_brazilian_decimal("-,25"), -0.25);
        assert_eq!(parse_brazilian_decimal("-7,"), -7.0);
    }

    #[test]
    fn test_leading_float_needs_a_digit() {
        assert_eq!(leading_float("-"), None);
        assert_eq!(leading_float("."), None);
        assert_eq!(leading_float("-."), None);
        assert_eq!(leading_float("x12"), None);
        assert_eq!(leading_float("12.x"), Some(12.0));
    }

    #[test]
    fn test_always_finite() {
        let long = "9".repeat(400);
        assert_eq!(parse_brazilian_decimal(&long), 0.0);
        for s in ["--1", "-.-", "...", "abc123", "1.2.3,4,5"] {
            assert!(parse_brazilian_decimal(s).is_finite(), "{} not finite", s);
        }
    }
}
