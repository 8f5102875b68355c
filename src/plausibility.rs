//! # Plausibility
//!
//! Expected energy density bands per food category. A query such as
//! "olive oil" implies roughly 700-900 kcal/100g; a candidate far outside
//! that band is probably the wrong food (an oil-based dressing, a data entry
//! error) and gets a lower plausibility score.

use crate::text_processing::contains_keyword;
use serde::{Deserialize, Serialize};

/// Inclusive kcal/100g range
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct KcalBand {
    pub min: f64,
    pub max: f64,
}

impl KcalBand {
    pub const fn new(min: f64, max: f64) -> Self {
        Self { min, max }
    }

    pub fn contains(&self, kcal: f64) -> bool {
        kcal >= self.min && kcal <= self.max
    }
}

/// Broad categories a food query can imply
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum FoodCategory {
    ProteinPowder,
    Oil,
    Nut,
    Flour,
    Bread,
    Dairy,
    Egg,
    Meat,
    Fish,
    Legume,
    Grain,
    Sweet,
    Fruit,
    Vegetable,
    Beverage,
}

/// Keywords per category, checked in this order so that e.g. "peanut butter"
/// lands in nuts before "butter" lands in dairy
const CATEGORY_KEYWORDS: &[(FoodCategory, &[&str])] = &[
    (
        FoodCategory::ProteinPowder,
        &["protein powder", "whey", "casein", "protein shake"],
    ),
    (
        FoodCategory::Beverage,
        &["almond milk", "oat milk", "soy milk", "juice", "soda", "coffee", "tea", "water", "beer", "wine"],
    ),
    (FoodCategory::Oil, &["oil", "ghee", "lard", "shortening"]),
    (
        FoodCategory::Nut,
        &["peanut butter", "almond butter", "nut", "almond", "peanut", "cashew", "walnut", "pecan", "pistachio", "hazelnut", "seed"],
    ),
    (FoodCategory::Flour, &["flour", "cornstarch", "cornmeal"]),
    (
        FoodCategory::Bread,
        &["bread", "bagel", "bun", "tortilla", "pita", "baguette", "roll"],
    ),
    (
        FoodCategory::Dairy,
        &["milk", "cheese", "yogurt", "yoghurt", "butter", "cream", "kefir"],
    ),
    (FoodCategory::Egg, &["egg"]),
    (
        FoodCategory::Fish,
        &["fish", "salmon", "tuna", "cod", "shrimp", "prawn", "tilapia", "sardine", "trout"],
    ),
    (
        FoodCategory::Meat,
        &["chicken", "beef", "pork", "lamb", "turkey", "bacon", "sausage", "ham", "steak", "mince"],
    ),
    (
        FoodCategory::Legume,
        &["bean", "lentil", "chickpea", "tofu", "pea", "edamame"],
    ),
    (
        FoodCategory::Grain,
        &["rice", "pasta", "oat", "oats", "quinoa", "barley", "noodle", "couscous", "cereal"],
    ),
    (
        FoodCategory::Sweet,
        &["sugar", "honey", "syrup", "chocolate", "candy", "jam", "cookie", "cake"],
    ),
    (
        FoodCategory::Fruit,
        &["apple", "banana", "orange", "berry", "strawberry", "blueberry", "grape", "mango", "pear", "peach", "lemon", "lime", "avocado", "pineapple", "melon"],
    ),
    (
        FoodCategory::Vegetable,
        &["onion", "garlic", "carrot", "celery", "tomato", "potato", "pepper", "spinach", "lettuce", "broccoli", "cabbage", "cucumber", "zucchini", "mushroom", "kale"],
    ),
];

impl FoodCategory {
    pub fn kcal_band(&self) -> KcalBand {
        match self {
            FoodCategory::ProteinPowder => KcalBand::new(330.0, 430.0),
            FoodCategory::Oil => KcalBand::new(700.0, 900.0),
            FoodCategory::Nut => KcalBand::new(500.0, 720.0),
            FoodCategory::Flour => KcalBand::new(330.0, 400.0),
            FoodCategory::Bread => KcalBand::new(220.0, 320.0),
            FoodCategory::Dairy => KcalBand::new(30.0, 420.0),
            FoodCategory::Egg => KcalBand::new(130.0, 160.0),
            FoodCategory::Meat => KcalBand::new(100.0, 350.0),
            FoodCategory::Fish => KcalBand::new(70.0, 250.0),
            FoodCategory::Legume => KcalBand::new(80.0, 360.0),
            FoodCategory::Grain => KcalBand::new(90.0, 400.0),
            FoodCategory::Sweet => KcalBand::new(250.0, 550.0),
            FoodCategory::Fruit => KcalBand::new(20.0, 160.0),
            FoodCategory::Vegetable => KcalBand::new(10.0, 100.0),
            FoodCategory::Beverage => KcalBand::new(0.0, 70.0),
        }
    }
}

/// Category implied by a free-text query, if any keyword matches
pub fn infer_category(query: &str) -> Option<FoodCategory> {
    CATEGORY_KEYWORDS
        .iter()
        .find(|(_, keywords)| keywords.iter().any(|k| contains_keyword(query, k)))
        .map(|(category, _)| *category)
}

/// 1.0 inside the band, decaying linearly to 0.0 at one band width (at
/// least 50 kcal) outside it. Non-finite values score 0.0.
pub fn plausibility_score(band: KcalBand, kcal_per_100g: f64) -> f64 {
    if !kcal_per_100g.is_finite() || !band.min.is_finite() || !band.max.is_finite() {
        return 0.0;
    }
    if band.contains(kcal_per_100g) {
        return 1.0;
    }

    let distance = if kcal_per_100g < band.min {
        band.min - kcal_per_100g
    } else {
        kcal_per_100g - band.max
    };
    let tolerance = (band.max - band.min).max(50.0);
    (1.0 - distance / tolerance).clamp(0.0, 1.0)
}
