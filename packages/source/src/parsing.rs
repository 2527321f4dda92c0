//! Shared cell parsing utilities for the tourism tables.
//!
//! Statistical-office exports mark missing values with `-`, confidential
//! ones with `z` and not-yet-available ones with `....`. Numbers may use a
//! decimal comma and non-breaking spaces as thousands separators.

use tourism_map_dashboard_models::calendar::is_valid_month;

/// Cell markers that mean "no value".
const MISSING_MARKERS: &[&str] = &["", "-", "z", "Z", "....", "...", ".."];

/// Parses a numeric cell. Returns `None` for missing markers and for text
/// that is not a number.
///
/// `"1.234,56"` (European grouping) and `"12,5"` (decimal comma) are both
/// understood; a plain `"1234.5"` is taken as-is.
#[must_use]
pub fn parse_number(raw: &str) -> Option<f64> {
    let cleaned: String = raw
        .trim()
        .chars()
        .filter(|c| *c != '\u{a0}' && *c != '\u{202f}')
        .collect();

    if MISSING_MARKERS.contains(&cleaned.as_str()) {
        return None;
    }

    let canonical = match (cleaned.contains(','), cleaned.contains('.')) {
        (true, true) => cleaned.replace('.', "").replace(',', "."),
        (true, false) => cleaned.replace(',', "."),
        _ => cleaned,
    };

    canonical.parse::<f64>().ok().filter(|v| v.is_finite())
}

/// Parses a year cell (`"2023"`, also `"2023.0"` as written by some
/// spreadsheet tools).
#[must_use]
pub fn parse_year(raw: &str) -> Option<i32> {
    let raw = raw.trim();
    if let Ok(year) = raw.parse::<i32>() {
        return Some(year);
    }
    let value = parse_number(raw)?;
    #[allow(clippy::cast_possible_truncation)]
    let year = value as i32;
    (f64::from(year) == value).then_some(year)
}

/// Parses a month cell into 1-12. Zero-padded (`"06"`) and float-formatted
/// (`"6.0"`) values are accepted.
#[must_use]
pub fn parse_month(raw: &str) -> Option<u8> {
    let month = u8::try_from(parse_year(raw)?).ok()?;
    is_valid_month(month).then_some(month)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_plain_numbers() {
        assert_eq!(parse_number("1234"), Some(1234.0));
        assert_eq!(parse_number(" 12.5 "), Some(12.5));
    }

    #[test]
    fn parses_european_numbers() {
        assert_eq!(parse_number("1.234,56"), Some(1234.56));
        assert_eq!(parse_number("12,5"), Some(12.5));
        assert_eq!(parse_number("1\u{a0}234"), Some(1234.0));
    }

    #[test]
    fn missing_markers_are_none() {
        for marker in ["", "-", "z", "....", "  "] {
            assert_eq!(parse_number(marker), None, "{marker:?}");
        }
        assert_eq!(parse_number("n/a"), None);
    }

    #[test]
    fn parses_years_and_months() {
        assert_eq!(parse_year("2023"), Some(2023));
        assert_eq!(parse_year("2023.0"), Some(2023));
        assert_eq!(parse_year("2023.5"), None);
        assert_eq!(parse_month("06"), Some(6));
        assert_eq!(parse_month("12"), Some(12));
        assert_eq!(parse_month("13"), None);
        assert_eq!(parse_month("0"), None);
        assert_eq!(parse_month("x"), None);
    }
}
