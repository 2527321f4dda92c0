//! Month names and numbers.
//!
//! The national table labels its rows with English month names, while the
//! other tables carry month numbers. These helpers convert between the two.

/// English month names, January first.
pub const MONTH_NAMES: [&str; 12] = [
    "January",
    "February",
    "March",
    "April",
    "May",
    "June",
    "July",
    "August",
    "September",
    "October",
    "November",
    "December",
];

/// All month numbers, 1 through 12.
pub const MONTHS: [u8; 12] = [1, 2, 3, 4, 5, 6, 7, 8, 9, 10, 11, 12];

/// Parses an English month name (case-insensitive, whitespace trimmed).
///
/// Returns `None` for unrecognized names, including the `"Total"` row of
/// the national table.
#[must_use]
pub fn month_from_name(name: &str) -> Option<u8> {
    let name = name.trim();
    MONTH_NAMES
        .iter()
        .position(|m| m.eq_ignore_ascii_case(name))
        .and_then(|i| u8::try_from(i + 1).ok())
}

/// Returns the English name for a month number, or `None` outside 1-12.
#[must_use]
pub fn month_name(month: u8) -> Option<&'static str> {
    if is_valid_month(month) {
        Some(MONTH_NAMES[usize::from(month - 1)])
    } else {
        None
    }
}

/// Three-letter abbreviation for axis ticks (`"Jan"`, `"Feb"`, ...).
#[must_use]
pub fn month_abbr(month: u8) -> Option<&'static str> {
    month_name(month).map(|name| &name[..3])
}

/// Whether `month` is in 1-12.
#[must_use]
pub const fn is_valid_month(month: u8) -> bool {
    month >= 1 && month <= 12
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_month_names() {
        assert_eq!(month_from_name("January"), Some(1));
        assert_eq!(month_from_name(" december "), Some(12));
        assert_eq!(month_from_name("Total"), None);
    }

    #[test]
    fn names_months() {
        assert_eq!(month_name(6), Some("June"));
        assert_eq!(month_abbr(9), Some("Sep"));
        assert_eq!(month_name(0), None);
        assert_eq!(month_name(13), None);
    }
}
