#![cfg_attr(feature = "fail-on-warnings", deny(warnings))]
#![warn(clippy::all, clippy::pedantic, clippy::nursery, clippy::cargo)]
#![allow(clippy::multiple_crate_versions, clippy::cargo_common_metadata)]

//! Canonical join keys for region names and column headers.
//!
//! The same county shows up as `"Krapinsko-zagorska županija"` in the
//! boundary file, `"County of Krapina-Zagorje"` in the statistical tables
//! and sometimes with a stray byte-order mark in front. [`normalize_region_key`]
//! maps all of them to one key (`"krapinsko zagorska"`) so rows can be
//! joined across files. The pipeline is applied symmetrically to every
//! source and is idempotent.

mod remap;

use std::sync::LazyLock;

use regex::Regex;
use unicode_normalization::UnicodeNormalization as _;
use unicode_normalization::char::is_combining_mark;

/// Byte-order mark that some exports prepend to the first cell.
const BOM: char = '\u{feff}';

/// Qualifier prefixes dropped from the front of a region name.
/// `"city of "` is remembered so the city of Zagreb keeps its own key.
const QUALIFIER_PREFIXES: &[&str] = &["county of ", "city of "];

/// Trailing qualifier words ("county" in Croatian and English). `zupani`
/// covers a truncated export.
const QUALIFIER_SUFFIXES: &[&str] = &["zupanija", "zupani", "county"];

/// Hyphens, dashes, slashes and punctuation that do not distinguish regions.
static PUNCTUATION_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"[\-\x{2013}\x{2014}/().,]+").expect("valid regex"));

/// Any run of whitespace.
static WHITESPACE_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"\s+").expect("valid regex"));

/// Normalizes a raw region name into its canonical join key.
///
/// The pipeline:
/// 1. Strip byte-order marks
/// 2. Lowercase and strip diacritics (`č ć ž š đ` → `c c z s d`) until stable
/// 3. Trim
/// 4. Replace hyphens, dashes, slashes and `( ) . ,` by spaces
/// 5. Collapse whitespace
/// 6. Drop `county of` / `city of` prefixes and trailing `zupanija` / `county`
/// 7. Apply the static spelling remap table
#[must_use]
pub fn normalize_region_key(raw: &str) -> String {
    let ascii = fold(&strip_bom(raw));
    let spaced = PUNCTUATION_RE.replace_all(ascii.trim(), " ");
    let collapsed = normalize_spaces(&spaced);

    let (is_city, unprefixed) = strip_qualifier_prefixes(&collapsed);
    let bare = strip_qualifier_suffixes(unprefixed);

    remap::canonical(bare, is_city).to_string()
}

/// Returns `true` if `key` is already in canonical form.
#[must_use]
pub fn is_normalized_key(key: &str) -> bool {
    normalize_region_key(key) == key
}

/// Normalizes a CSV column header for lookup.
///
/// Strips byte-order marks, trims, lowercases and joins words with `_`, so
/// `"\u{feff}County Key "` and `"county_key"` resolve to the same column.
#[must_use]
pub fn normalize_header(raw: &str) -> String {
    let lowered = strip_bom(raw).trim().to_lowercase();
    WHITESPACE_RE.replace_all(&lowered, "_").into_owned()
}

/// Removes diacritical marks, leaving the base letters.
///
/// `đ`/`Đ` have no Unicode decomposition and are mapped explicitly.
#[must_use]
pub fn strip_diacritics(s: &str) -> String {
    s.nfkd()
        .filter(|c| !is_combining_mark(*c))
        .map(|c| match c {
            'đ' => 'd',
            'Đ' => 'D',
            other => other,
        })
        .collect()
}

/// Trims and collapses every whitespace run to a single space.
#[must_use]
pub fn normalize_spaces(s: &str) -> String {
    WHITESPACE_RE.replace_all(s.trim(), " ").into_owned()
}

/// Lowercases and strips diacritics until neither changes the string.
/// Compatibility decompositions can introduce capitals (`ℌ` → `H`) and
/// lowercasing can introduce combining marks (`İ` → `i̇`).
fn fold(s: &str) -> String {
    let mut folded = strip_diacritics(&s.to_lowercase());
    for _ in 0..3 {
        let next = strip_diacritics(&folded.to_lowercase());
        if next == folded {
            break;
        }
        folded = next;
    }
    folded
}

fn strip_bom(s: &str) -> String {
    s.chars().filter(|&c| c != BOM).collect()
}

/// Repeatedly removes qualifier prefixes. Returns whether a `city of`
/// prefix was seen.
fn strip_qualifier_prefixes(s: &str) -> (bool, &str) {
    let mut rest = s;
    let mut is_city = false;
    loop {
        let Some((prefix, tail)) = QUALIFIER_PREFIXES
            .iter()
            .find_map(|p| rest.strip_prefix(p).map(|tail| (*p, tail)))
        else {
            return (is_city, rest);
        };
        is_city |= prefix == "city of ";
        rest = tail;
    }
}

/// Repeatedly removes trailing qualifier words, never removing the last
/// remaining word.
fn strip_qualifier_suffixes(s: &str) -> &str {
    let mut rest = s;
    while let Some((head, last)) = rest.rsplit_once(' ') {
        if !QUALIFIER_SUFFIXES.contains(&last) {
            break;
        }
        rest = head;
    }
    rest
}
