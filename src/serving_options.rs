//! Serving options a food can be logged in: its own unit table, the generic
//! mass units and volume units derived from its density.
//!
//! The list doubles as a last-resort fallback when tiered portion resolution
//! finds nothing: [`find_serving_option`] picks the option whose label names
//! the parsed unit or hint.

use crate::density_data::food_density;
use crate::food_model::CandidateFood;
use crate::ingredient_model::{ParsedIngredient, Unit};
use crate::unit_normalizer::canonical_tokens;
use serde::{Deserialize, Serialize};
use std::collections::HashSet;

const MASS_OPTIONS: &[Unit] = &[Unit::Gram, Unit::Ounce, Unit::Pound];

const VOLUME_OPTIONS: &[Unit] = &[
    Unit::Teaspoon,
    Unit::Tablespoon,
    Unit::Cup,
    Unit::FluidOunce,
    Unit::Milliliter,
];

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ServingOption {
    pub label: String,
    /// Grams for one of this serving
    pub grams: f64,
}

impl ServingOption {
    fn new(label: &str, grams: f64) -> Self {
        Self {
            label: label.to_string(),
            grams,
        }
    }
}

/// Food units first, then g/oz/lb, then tsp/tbsp/cup/fl-oz/ml at the food's
/// density. Labels are unique case-insensitively; the first one wins.
pub fn derive_serving_options(food: &CandidateFood) -> Vec<ServingOption> {
    let density = food_density(food);

    let food_units = food
        .units
        .iter()
        .map(|unit| ServingOption::new(unit.label.trim(), unit.grams));
    let mass_units = MASS_OPTIONS
        .iter()
        .filter_map(|unit| Some(ServingOption::new(unit.as_str(), unit.grams_per_unit()?)));
    let volume_units = VOLUME_OPTIONS.iter().filter_map(|unit| {
        Some(ServingOption::new(
            unit.as_str(),
            unit.millilitres_per_unit()? * density,
        ))
    });

    let mut seen = HashSet::new();
    food_units
        .chain(mass_units)
        .chain(volume_units)
        .filter(|option| option.grams.is_finite() && option.grams > 0.0)
        .filter(|option| !option.label.is_empty())
        .filter(|option| seen.insert(option.label.to_lowercase()))
        .collect()
}

/// The first option whose label contains the parsed unit, else the hint
pub fn find_serving_option<'a>(
    options: &'a [ServingOption],
    parsed: &ParsedIngredient,
) -> Option<&'a ServingOption> {
    let wanted: Vec<&str> = parsed
        .unit
        .map(|u| u.as_str())
        .into_iter()
        .chain(parsed.unit_hint.map(|h| h.as_str()))
        .collect();

    wanted.iter().find_map(|token| {
        options
            .iter()
            .find(|option| canonical_tokens(&option.label).iter().any(|t| t == token))
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ingredient_model::UnitHint;

    #[test]
    fn test_derive_serving_options_order_and_dedup() {
        let food = CandidateFood::new("m", "Milk")
            .with_density(1.03)
            .with_unit("1 cup", 244.0)
            .with_unit("G", 1.0)
            .with_unit("broken", -5.0);
        let options = derive_serving_options(&food);
        let labels: Vec<&str> = options.iter().map(|o| o.label.as_str()).collect();
        assert_eq!(labels, ["1 cup", "G", "oz", "lb", "tsp", "tbsp", "cup", "fl-oz", "ml"]);

        let cup = options.iter().find(|o| o.label == "cup").unwrap();
        assert!((cup.grams - 240.0 * 1.03).abs() < 1e-9);
    }

    #[test]
    fn test_find_serving_option() {
        let food = CandidateFood::new("g", "Garlic").with_unit("1 clove", 3.0);
        let options = derive_serving_options(&food);

        let parsed = ParsedIngredient::new(2.0, "garlic").with_unit_hint(UnitHint::Clove);
        let option = find_serving_option(&options, &parsed).unwrap();
        assert_eq!(option.label, "1 clove");

        let parsed = ParsedIngredient::new(1.0, "garlic").with_unit(Unit::Tablespoon);
        assert_eq!(find_serving_option(&options, &parsed).unwrap().label, "tbsp");

        let parsed = ParsedIngredient::new(1.0, "garlic");
        assert!(find_serving_option(&options, &parsed).is_none());
    }
}
