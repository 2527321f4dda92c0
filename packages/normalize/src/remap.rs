//! Spelling remap table for region names.
//!
//! The statistical tables use English exonyms (`"Krapina-Zagorje"`) while the
//! boundary file uses the Croatian adjective form (`"Krapinsko-zagorska"`).
//! Each known mismatch is listed explicitly; there is no fuzzy matching, and
//! a new spelling has to be added here.

use std::collections::BTreeMap;
use std::sync::LazyLock;

/// Key of the city of Zagreb, which is a county-level unit of its own.
pub const CITY_OF_ZAGREB: &str = "grad zagreb";

/// Maps a prefix- and suffix-stripped English or transliterated name to the
/// canonical Croatian key.
///
/// No value may appear as a key, otherwise normalization would not be
/// idempotent.
static REGION_REMAP: LazyLock<BTreeMap<&'static str, &'static str>> = LazyLock::new(|| {
    BTreeMap::from([
        ("zagreb", "zagrebacka"),
        ("krapina zagorje", "krapinsko zagorska"),
        ("sisak moslavina", "sisacko moslavacka"),
        ("karlovac", "karlovacka"),
        ("varazdin", "varazdinska"),
        ("koprivnica krizevci", "koprivnicko krizevacka"),
        ("bjelovar bilogora", "bjelovarsko bilogorska"),
        ("primorje gorski kotar", "primorsko goranska"),
        ("lika senj", "licko senjska"),
        ("virovitica podravina", "viroviticko podravska"),
        ("pozega slavonia", "pozesko slavonska"),
        ("brod posavina", "brodsko posavska"),
        ("zadar", "zadarska"),
        ("osijek baranja", "osjecko baranjska"),
        ("sibenik knin", "sibensko kninska"),
        ("vukovar srijem", "vukovarsko srijemska"),
        ("split dalmatia", "splitsko dalmatinska"),
        ("istra", "istarska"),
        ("dubrovnik neretva", "dubrovacko neretvanska"),
        ("medimurje", "medimurska"),
        ("medjimurje", "medimurska"),
        ("medjimurska", "medimurska"),
    ])
});

/// Resolves a stripped name to its canonical key.
///
/// `is_city` is set when the raw name started with `city of`; only the city
/// of Zagreb is special-cased, any other city falls through to the table.
pub fn canonical(name: &str, is_city: bool) -> &str {
    if is_city && name == "zagreb" {
        return CITY_OF_ZAGREB;
    }
    REGION_REMAP.get(name).copied().unwrap_or(name)
}
