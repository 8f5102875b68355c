//! # Unit Normalizer
//!
//! Classifies single tokens as mass, volume, count or multiplier words and
//! maps unit synonyms onto the closed [`Unit`] enum.
//!
//! Sub-part nouns (clove, leaf, sheet, yolk, white, stalk) are intentionally
//! absent from the unit table: they describe a piece of an ingredient rather
//! than a serving unit and are picked up as unit hints by the qualifier
//! extractor instead.
//!
//! ## Usage
//!
//! ```rust
//! use nutriparse::ingredient_model::{Unit, UnitKind};
//! use nutriparse::unit_normalizer::{classify_token, lookup_unit};
//!
//! assert_eq!(lookup_unit("Tablespoons"), Some(Unit::Tablespoon));
//! assert_eq!(classify_token("half"), UnitKind::Multiplier);
//! assert_eq!(classify_token("cloves"), UnitKind::Unknown);
//! ```

use crate::ingredient_model::{Unit, UnitKind};
use crate::text_processing::match_tokens;
use std::collections::HashMap;
use std::sync::LazyLock;

/// Common unit spellings and their canonical unit
static UNIT_MAPPINGS: LazyLock<HashMap<&'static str, Unit>> = LazyLock::new(|| {
    let mut map = HashMap::new();

    // Mass units
    map.insert("g", Unit::Gram);
    map.insert("gr", Unit::Gram);
    map.insert("gram", Unit::Gram);
    map.insert("grams", Unit::Gram);
    map.insert("gramme", Unit::Gram);
    map.insert("grammes", Unit::Gram);
    map.insert("kg", Unit::Kilogram);
    map.insert("kgs", Unit::Kilogram);
    map.insert("kilo", Unit::Kilogram);
    map.insert("kilos", Unit::Kilogram);
    map.insert("kilogram", Unit::Kilogram);
    map.insert("kilograms", Unit::Kilogram);
    map.insert("mg", Unit::Milligram);
    map.insert("milligram", Unit::Milligram);
    map.insert("milligrams", Unit::Milligram);
    map.insert("oz", Unit::Ounce);
    map.insert("ounce", Unit::Ounce);
    map.insert("ounces", Unit::Ounce);
    map.insert("lb", Unit::Pound);
    map.insert("lbs", Unit::Pound);
    map.insert("pound", Unit::Pound);
    map.insert("pounds", Unit::Pound);

    // Volume units
    map.insert("ml", Unit::Milliliter);
    map.insert("mls", Unit::Milliliter);
    map.insert("cc", Unit::Milliliter);
    map.insert("milliliter", Unit::Milliliter);
    map.insert("milliliters", Unit::Milliliter);
    map.insert("millilitre", Unit::Milliliter);
    map.insert("millilitres", Unit::Milliliter);
    map.insert("l", Unit::Liter);
    map.insert("liter", Unit::Liter);
    map.insert("liters", Unit::Liter);
    map.insert("litre", Unit::Liter);
    map.insert("litres", Unit::Liter);
    map.insert("tsp", Unit::Teaspoon);
    map.insert("tsps", Unit::Teaspoon);
    map.insert("teaspoon", Unit::Teaspoon);
    map.insert("teaspoons", Unit::Teaspoon);
    map.insert("tbsp", Unit::Tablespoon);
    map.insert("tbsps", Unit::Tablespoon);
    map.insert("tbs", Unit::Tablespoon);
    map.insert("tbl", Unit::Tablespoon);
    map.insert("tablespoon", Unit::Tablespoon);
    map.insert("tablespoons", Unit::Tablespoon);
    map.insert("cup", Unit::Cup);
    map.insert("cups", Unit::Cup);
    map.insert("fl-oz", Unit::FluidOunce);
    map.insert("floz", Unit::FluidOunce);
    map.insert("pint", Unit::Pint);
    map.insert("pints", Unit::Pint);
    map.insert("pt", Unit::Pint);
    map.insert("quart", Unit::Quart);
    map.insert("quarts", Unit::Quart);
    map.insert("qt", Unit::Quart);

    // Count units
    map.insert("piece", Unit::Piece);
    map.insert("pieces", Unit::Piece);
    map.insert("pc", Unit::Piece);
    map.insert("pcs", Unit::Piece);
    map.insert("slice", Unit::Slice);
    map.insert("slices", Unit::Slice);
    map.insert("serving", Unit::Serving);
    map.insert("servings", Unit::Serving);
    map.insert("scoop", Unit::Scoop);
    map.insert("scoops", Unit::Scoop);
    map.insert("can", Unit::Can);
    map.insert("cans", Unit::Can);
    map.insert("tin", Unit::Can);
    map.insert("tins", Unit::Can);
    map.insert("package", Unit::Package);
    map.insert("packages", Unit::Package);
    map.insert("pkg", Unit::Package);
    map.insert("packet", Unit::Package);
    map.insert("packets", Unit::Package);
    map.insert("bottle", Unit::Bottle);
    map.insert("bottles", Unit::Bottle);
    map.insert("stick", Unit::Stick);
    map.insert("sticks", Unit::Stick);
    map.insert("pinch", Unit::Pinch);
    map.insert("pinches", Unit::Pinch);
    map.insert("dash", Unit::Dash);
    map.insert("dashes", Unit::Dash);
    map.insert("bunch", Unit::Bunch);
    map.insert("bunches", Unit::Bunch);
    map.insert("sprig", Unit::Sprig);
    map.insert("sprigs", Unit::Sprig);
    map.insert("head", Unit::Head);
    map.insert("heads", Unit::Head);
    map.insert("inch", Unit::Inch);
    map.insert("inches", Unit::Inch);
    map.insert("handful", Unit::Handful);
    map.insert("handfuls", Unit::Handful);

    map
});

/// Two-token unit spellings, matched before single tokens
const COMPOUND_UNITS: &[(&str, &str, Unit)] = &[
    ("fl", "oz", Unit::FluidOunce),
    ("fluid", "oz", Unit::FluidOunce),
    ("fluid", "ounce", Unit::FluidOunce),
    ("fluid", "ounces", Unit::FluidOunce),
];

/// Closed multiplier vocabulary
const MULTIPLIER_WORDS: &[(&str, f64)] = &[
    ("half", 1.0 / 2.0),
    ("quarter", 1.0 / 4.0),
    ("third", 1.0 / 3.0),
    ("½", 1.0 / 2.0),
    ("¼", 1.0 / 4.0),
    ("⅓", 1.0 / 3.0),
];

/// Tokens that introduce an explicit "qty x amount" multiplication
const MULTIPLIER_OPERATORS: &[&str] = &["x", "×", "*"];

fn unit_key(token: &str) -> String {
    token.trim_end_matches('.').to_lowercase()
}

/// Look up a single token in the unit table. Case-insensitive, trailing
/// periods ignored.
pub fn lookup_unit(token: &str) -> Option<Unit> {
    UNIT_MAPPINGS.get(unit_key(token).as_str()).copied()
}

/// Look up a two-token unit such as "fl oz" or "fluid ounces"
pub fn lookup_compound_unit(first: &str, second: &str) -> Option<Unit> {
    let first = unit_key(first);
    let second = unit_key(second);
    COMPOUND_UNITS
        .iter()
        .find(|(a, b, _)| *a == first && *b == second)
        .map(|(_, _, unit)| *unit)
}

/// Value of a multiplier word, if the token is one
pub fn multiplier_value(token: &str) -> Option<f64> {
    let key = token.to_lowercase();
    MULTIPLIER_WORDS
        .iter()
        .find(|(word, _)| *word == key)
        .map(|(_, value)| *value)
}

/// Whether the token is an explicit multiplication operator ("x", "×", "*")
pub fn is_multiplier_operator(token: &str) -> bool {
    let key = token.to_lowercase();
    MULTIPLIER_OPERATORS.contains(&key.as_str())
}

/// Classify a single token
pub fn classify_token(token: &str) -> UnitKind {
    if multiplier_value(token).is_some() {
        return UnitKind::Multiplier;
    }
    lookup_unit(token)
        .map(|unit| unit.kind())
        .unwrap_or(UnitKind::Unknown)
}

/// Match tokens with every unit synonym replaced by its canonical spelling,
/// so "2 Tablespoons" and "tbsp" compare equal.
pub fn canonical_tokens(text: &str) -> Vec<String> {
    let raw = match_tokens(text);
    let mut tokens = Vec::with_capacity(raw.len());
    let mut i = 0;

    while i < raw.len() {
        if let Some(next) = raw.get(i + 1) {
            if let Some(unit) = lookup_compound_unit(&raw[i], next) {
                tokens.push(unit.as_str().to_string());
                i += 2;
                continue;
            }
        }
        match lookup_unit(&raw[i]) {
            Some(unit) => tokens.push(unit.as_str().to_string()),
            None => tokens.push(raw[i].clone()),
        }
        i += 1;
    }

    tokens
}
