//! # Parsed Ingredient Data Model
//!
//! This module defines the structures produced by the ingredient line parser:
//! the parsed ingredient itself, the closed set of canonical units, and the
//! sub-part unit hints ("yolk", "clove", ...).
//!
//! ## Core Concepts
//!
//! - **ParsedIngredient**: quantity, optional multiplier and unit, name, qualifiers
//! - **Unit**: canonical measurement unit with a mass, volume or count kind
//! - **UnitHint**: a sub-part noun meaning "a piece-count of this ingredient's part"
//! - **IngredientList**: the result of parsing a multi-line ingredient block
//!
//! ## Usage
//!
//! ```rust
//! use nutriparse::ingredient_model::{ParsedIngredient, Unit};
//!
//! let flour = ParsedIngredient::new(2.5, "flour").with_unit(Unit::Cup);
//! assert_eq!(flour.to_string(), "2.5 cup flour");
//! ```

use serde::{Deserialize, Serialize};
use std::fmt;

/// A fully parsed ingredient line
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ParsedIngredient {
    /// Leading quantity, always finite and greater than zero
    pub qty: f64,

    /// Compound multiplier ("1 half bar" -> 0.5, "2 x 200g" -> 200)
    pub multiplier: f64,

    /// Canonical unit, if one was recognized
    pub unit: Option<Unit>,

    /// The unit as written in the line (e.g. "Tablespoons")
    pub raw_unit: Option<String>,

    /// Lowercased ingredient name, never empty
    pub name: String,

    /// Descriptive qualifiers in extraction order (parenthetical, comma, inline)
    pub qualifiers: Vec<String>,

    /// Sub-part hint such as yolk or clove
    pub unit_hint: Option<UnitHint>,

    /// Clause text that was not qualifier vocabulary
    pub notes: Option<String>,
}

/// Broad classification of a unit or unit-like token
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum UnitKind {
    Mass,
    Volume,
    Count,
    Multiplier,
    Unknown,
}

/// Canonical measurement units
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Unit {
    // Mass units
    #[serde(rename = "g")]
    Gram,
    #[serde(rename = "kg")]
    Kilogram,
    #[serde(rename = "mg")]
    Milligram,
    #[serde(rename = "oz")]
    Ounce,
    #[serde(rename = "lb")]
    Pound,

    // Volume units
    #[serde(rename = "ml")]
    Milliliter,
    #[serde(rename = "l")]
    Liter,
    #[serde(rename = "tsp")]
    Teaspoon,
    #[serde(rename = "tbsp")]
    Tablespoon,
    #[serde(rename = "cup")]
    Cup,
    #[serde(rename = "fl-oz")]
    FluidOunce,
    #[serde(rename = "pint")]
    Pint,
    #[serde(rename = "quart")]
    Quart,

    // Count units
    #[serde(rename = "piece")]
    Piece,
    #[serde(rename = "slice")]
    Slice,
    #[serde(rename = "serving")]
    Serving,
    #[serde(rename = "scoop")]
    Scoop,
    #[serde(rename = "can")]
    Can,
    #[serde(rename = "package")]
    Package,
    #[serde(rename = "bottle")]
    Bottle,
    #[serde(rename = "stick")]
    Stick,
    #[serde(rename = "pinch")]
    Pinch,
    #[serde(rename = "dash")]
    Dash,
    #[serde(rename = "bunch")]
    Bunch,
    #[serde(rename = "sprig")]
    Sprig,
    #[serde(rename = "head")]
    Head,
    #[serde(rename = "inch")]
    Inch,
    #[serde(rename = "handful")]
    Handful,
}

/// Sub-part nouns that count pieces of an ingredient rather than servings
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum UnitHint {
    Yolk,
    White,
    Leaf,
    Clove,
    Sheet,
    Stalk,
    Slice,
    Piece,
}

/// Result of parsing a multi-line ingredient block
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct IngredientList {
    /// Successfully parsed ingredients, in line order
    pub ingredients: Vec<ParsedIngredient>,

    /// Original raw text that was parsed
    pub original_text: String,

    /// Non-blank lines that produced no result
    pub unparsed_lines: Vec<String>,
}

impl ParsedIngredient {
    /// Create an ingredient with a quantity and name and no unit
    pub fn new(qty: f64, name: &str) -> Self {
        Self {
            qty,
            multiplier: 1.0,
            unit: None,
            raw_unit: None,
            name: name.to_string(),
            qualifiers: Vec::new(),
            unit_hint: None,
            notes: None,
        }
    }

    /// Set the canonical unit; the raw unit defaults to its canonical spelling
    pub fn with_unit(mut self, unit: Unit) -> Self {
        self.unit = Some(unit);
        if self.raw_unit.is_none() {
            self.raw_unit = Some(unit.as_str().to_string());
        }
        self
    }

    pub fn with_multiplier(mut self, multiplier: f64) -> Self {
        self.multiplier = multiplier;
        self
    }

    pub fn with_unit_hint(mut self, hint: UnitHint) -> Self {
        self.unit_hint = Some(hint);
        self
    }

    pub fn with_qualifiers(mut self, qualifiers: &[&str]) -> Self {
        self.qualifiers = qualifiers.iter().map(|q| q.to_string()).collect();
        self
    }

    pub fn with_notes(mut self, notes: &str) -> Self {
        self.notes = Some(notes.to_string());
        self
    }

    /// Quantity after applying the multiplier
    pub fn total_quantity(&self) -> f64 {
        self.qty * self.multiplier
    }

    /// Whether the parsed unit is a mass unit
    pub fn has_mass_unit(&self) -> bool {
        self.unit.map(|u| u.is_mass()).unwrap_or(false)
    }
}

impl Unit {
    /// Every canonical unit, mass first, then volume, then count
    pub const ALL: [Unit; 28] = [
        Unit::Gram,
        Unit::Kilogram,
        Unit::Milligram,
        Unit::Ounce,
        Unit::Pound,
        Unit::Milliliter,
        Unit::Liter,
        Unit::Teaspoon,
        Unit::Tablespoon,
        Unit::Cup,
        Unit::FluidOunce,
        Unit::Pint,
        Unit::Quart,
        Unit::Piece,
        Unit::Slice,
        Unit::Serving,
        Unit::Scoop,
        Unit::Can,
        Unit::Package,
        Unit::Bottle,
        Unit::Stick,
        Unit::Pinch,
        Unit::Dash,
        Unit::Bunch,
        Unit::Sprig,
        Unit::Head,
        Unit::Inch,
        Unit::Handful,
    ];

    /// Canonical single-token spelling, also used as the match token
    pub fn as_str(&self) -> &'static str {
        match self {
            Unit::Gram => "g",
            Unit::Kilogram => "kg",
            Unit::Milligram => "mg",
            Unit::Ounce => "oz",
            Unit::Pound => "lb",
            Unit::Milliliter => "ml",
            Unit::Liter => "l",
            Unit::Teaspoon => "tsp",
            Unit::Tablespoon => "tbsp",
            Unit::Cup => "cup",
            Unit::FluidOunce => "fl-oz",
            Unit::Pint => "pint",
            Unit::Quart => "quart",
            Unit::Piece => "piece",
            Unit::Slice => "slice",
            Unit::Serving => "serving",
            Unit::Scoop => "scoop",
            Unit::Can => "can",
            Unit::Package => "package",
            Unit::Bottle => "bottle",
            Unit::Stick => "stick",
            Unit::Pinch => "pinch",
            Unit::Dash => "dash",
            Unit::Bunch => "bunch",
            Unit::Sprig => "sprig",
            Unit::Head => "head",
            Unit::Inch => "inch",
            Unit::Handful => "handful",
        }
    }

    pub fn kind(&self) -> UnitKind {
        if self.grams_per_unit().is_some() {
            UnitKind::Mass
        } else if self.millilitres_per_unit().is_some() {
            UnitKind::Volume
        } else {
            UnitKind::Count
        }
    }

    /// Grams in one unit, for mass units only
    pub fn grams_per_unit(&self) -> Option<f64> {
        match self {
            Unit::Gram => Some(1.0),
            Unit::Kilogram => Some(1000.0),
            Unit::Milligram => Some(0.001),
            Unit::Ounce => Some(28.3495),
            Unit::Pound => Some(453.592),
            _ => None,
        }
    }

    /// Millilitres in one unit, for volume units only (US kitchen measures)
    pub fn millilitres_per_unit(&self) -> Option<f64> {
        match self {
            Unit::Milliliter => Some(1.0),
            Unit::Liter => Some(1000.0),
            Unit::Teaspoon => Some(5.0),
            Unit::Tablespoon => Some(15.0),
            Unit::Cup => Some(240.0),
            Unit::FluidOunce => Some(30.0),
            Unit::Pint => Some(480.0),
            Unit::Quart => Some(960.0),
            _ => None,
        }
    }

    pub fn is_mass(&self) -> bool {
        self.kind() == UnitKind::Mass
    }

    pub fn is_volume(&self) -> bool {
        self.kind() == UnitKind::Volume
    }

    pub fn is_count(&self) -> bool {
        self.kind() == UnitKind::Count
    }
}

impl UnitHint {
    /// Look up a hint from its singular or plural spelling
    pub fn from_token(token: &str) -> Option<Self> {
        match token {
            "yolk" | "yolks" => Some(UnitHint::Yolk),
            "white" | "whites" => Some(UnitHint::White),
            "leaf" | "leaves" => Some(UnitHint::Leaf),
            "clove" | "cloves" => Some(UnitHint::Clove),
            "sheet" | "sheets" => Some(UnitHint::Sheet),
            "stalk" | "stalks" => Some(UnitHint::Stalk),
            "slice" | "slices" => Some(UnitHint::Slice),
            "piece" | "pieces" => Some(UnitHint::Piece),
            _ => None,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            UnitHint::Yolk => "yolk",
            UnitHint::White => "white",
            UnitHint::Leaf => "leaf",
            UnitHint::Clove => "clove",
            UnitHint::Sheet => "sheet",
            UnitHint::Stalk => "stalk",
            UnitHint::Slice => "slice",
            UnitHint::Piece => "piece",
        }
    }

    /// Name to use when the hint was the only word left ("2 yolks" -> egg)
    pub fn head_noun(&self) -> Option<&'static str> {
        match self {
            UnitHint::Yolk | UnitHint::White => Some("egg"),
            _ => None,
        }
    }
}

impl IngredientList {
    pub fn new(original_text: String) -> Self {
        Self {
            ingredients: Vec::new(),
            original_text,
            unparsed_lines: Vec::new(),
        }
    }

    pub fn add_ingredient(&mut self, ingredient: ParsedIngredient) {
        self.ingredients.push(ingredient);
    }

    pub fn add_unparsed_line(&mut self, line: String) {
        self.unparsed_lines.push(line);
    }

    pub fn parsed_count(&self) -> usize {
        self.ingredients.len()
    }

    pub fn unparsed_count(&self) -> usize {
        self.unparsed_lines.len()
    }

    /// Share of non-blank lines that parsed; 1.0 for an empty block
    pub fn success_rate(&self) -> f32 {
        let total_lines = self.parsed_count() + self.unparsed_count();
        if total_lines == 0 {
            return 1.0;
        }
        self.parsed_count() as f32 / total_lines as f32
    }
}

/// Render a quantity without a trailing ".0" for whole numbers
pub(crate) fn format_amount(value: f64) -> String {
    if value.fract() == 0.0 && value.abs() < 1e15 {
        format!("{}", value as i64)
    } else {
        format!("{}", value)
    }
}

impl fmt::Display for Unit {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

impl fmt::Display for UnitHint {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// Canonical "qty [x multiplier] [unit] name [hint]" form. Parsing this text
/// again yields the same quantity, multiplier, unit, name and hint.
impl fmt::Display for ParsedIngredient {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", format_amount(self.qty))?;

        if self.multiplier != 1.0 {
            write!(f, " x {}", format_amount(self.multiplier))?;
        }

        if let Some(unit) = &self.unit {
            write!(f, " {}", unit)?;
        }

        write!(f, " {}", self.name)?;

        if let Some(hint) = &self.unit_hint {
            write!(f, " {}", hint)?;
        }

        Ok(())
    }
}

impl fmt::Display for IngredientList {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(
            f,
            "Ingredient List ({} parsed, {} unparsed, {:.1}% success):",
            self.parsed_count(),
            self.unparsed_count(),
            self.success_rate() * 100.0
        )?;

        for ingredient in &self.ingredients {
            writeln!(f, "  • {}", ingredient)?;
        }

        if !self.unparsed_lines.is_empty() {
            writeln!(f, "Unparsed:")?;
            for line in &self.unparsed_lines {
                writeln!(f, "  ? {}", line)?;
            }
        }

        Ok(())
    }
}
