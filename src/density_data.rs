//! Category density defaults for volume-to-weight conversion.
//!
//! Densities are grams per millilitre, derived from grams-per-cup figures
//! (King Arthur Baking, USDA) divided by a 240 ml cup. Keywords are tried in
//! order, so more specific entries come first ("peanut butter" before
//! "butter").

use crate::food_model::CandidateFood;
use crate::text_processing::contains_keyword;
use log::trace;

/// Used when neither the food nor its category knows a density
pub const DEFAULT_DENSITY_G_PER_ML: f64 = 1.0;

/// Category or name keyword -> grams per millilitre
pub const CATEGORY_DENSITIES: &[(&str, f64)] = &[
    // Spreads and syrups before their plain counterparts
    ("peanut butter", 1.08),
    ("nut butter", 1.08),
    ("maple syrup", 1.31),
    ("brown sugar", 0.92),
    ("powdered sugar", 0.50),
    ("icing sugar", 0.50),
    ("cocoa", 0.36),
    ("cornstarch", 0.53),
    ("oat", 0.33),
    // Fats
    ("oil", 0.91),
    ("butter", 0.95),
    ("ghee", 0.91),
    // Baking
    ("flour", 0.52),
    ("sugar", 0.83),
    ("honey", 1.42),
    ("syrup", 1.31),
    // Dairy
    ("yogurt", 1.03),
    ("cream", 0.99),
    ("milk", 1.02),
    ("cheese", 0.47),
    ("dairy", 1.03),
    // Grains and dry goods
    ("rice", 0.85),
    ("grain", 0.80),
    ("pasta", 0.45),
    ("lentil", 0.80),
    ("bean", 0.75),
    ("nut", 0.60),
    ("seed", 0.60),
    ("salt", 1.20),
    ("spice", 0.55),
    ("herb", 0.20),
    // Liquids
    ("juice", 1.04),
    ("broth", 1.00),
    ("stock", 1.00),
    ("sauce", 1.05),
    ("water", 1.00),
    ("beverage", 1.00),
];

/// Density for a category or name string, matched by keyword
pub fn category_density(text: &str) -> Option<f64> {
    CATEGORY_DENSITIES
        .iter()
        .find(|(keyword, _)| contains_keyword(text, keyword))
        .map(|(_, density)| *density)
}

/// Density of a food: its own value if valid, then its category, then its
/// name, then [`DEFAULT_DENSITY_G_PER_ML`].
pub fn food_density(food: &CandidateFood) -> f64 {
    if let Some(density) = food.density_g_per_ml.filter(|d| d.is_finite() && *d > 0.0) {
        return density;
    }

    let fallback = food
        .category
        .as_deref()
        .and_then(category_density)
        .or_else(|| category_density(&food.name));

    match fallback {
        Some(density) => {
            trace!("Density for '{}' from category table: {}", food.name, density);
            density
        }
        None => DEFAULT_DENSITY_G_PER_ML,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_category_density_keywords() {
        assert_eq!(category_density("Oils"), Some(0.91));
        assert_eq!(category_density("Peanut Butter, smooth"), Some(1.08));
        assert_eq!(category_density("butter"), Some(0.95));
        assert_eq!(category_density("Brown sugar"), Some(0.92));
        assert_eq!(category_density("Beverages"), Some(1.0));
        assert_eq!(category_density("poultry"), None);
        // Whole-word matches only
        assert_eq!(category_density("toilet"), None);
    }

    #[test]
    fn test_food_density_precedence() {
        let own = CandidateFood::new("1", "Olive oil").with_density(0.92);
        assert_eq!(food_density(&own), 0.92);

        let by_category = CandidateFood::new("2", "Mystery").with_category("honey");
        assert_eq!(food_density(&by_category), 1.42);

        let by_name = CandidateFood::new("3", "Whole milk");
        assert_eq!(food_density(&by_name), 1.02);

        let invalid = CandidateFood::new("4", "Thing").with_density(-1.0);
        assert_eq!(food_density(&invalid), DEFAULT_DENSITY_G_PER_ML);
    }
}
