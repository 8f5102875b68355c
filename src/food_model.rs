//! # Food Model
//!
//! Catalog records supplied by the caller. The core only ever borrows them.
//!
//! Everything derives serde so a catalog can be loaded from JSON; optional
//! collections default to empty and may be omitted.
//!
//! ```rust
//! use nutriparse::food_model::{CandidateFood, Verification};
//!
//! let json = r#"{"id": "f1", "name": "Olive oil", "density_g_per_ml": 0.91}"#;
//! let food: CandidateFood = serde_json::from_str(json).unwrap();
//! assert_eq!(food.verification, Verification::Unverified);
//! assert!(food.units.is_empty());
//! ```

use serde::{Deserialize, Serialize};

/// How far a catalog entry can be trusted
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Verification {
    Verified,
    #[default]
    Unverified,
    Suspect,
}

/// Macronutrients per 100 g
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct Macros {
    pub kcal: f64,
    #[serde(default)]
    pub protein_g: f64,
    #[serde(default)]
    pub carbs_g: f64,
    #[serde(default)]
    pub fat_g: f64,
}

/// A food-specific serving label, e.g. "1 cup, chopped" = 160 g
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FoodUnit {
    pub label: String,
    pub grams: f64,
}

/// A curated unit-to-grams mapping attached to a food
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PortionOverride {
    pub unit: String,
    #[serde(default)]
    pub label: Option<String>,
    pub grams: f64,
}

/// A unit-to-grams mapping recorded for one user and one food
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct UserPortionOverride {
    pub user_id: String,
    pub food_id: String,
    pub unit: String,
    #[serde(default)]
    pub label: Option<String>,
    pub grams: f64,
}

/// One catalog entry a query can be matched against
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CandidateFood {
    pub id: String,
    pub name: String,

    #[serde(default)]
    pub brand: Option<String>,

    /// Where the record came from (provider name, "user", ...)
    #[serde(default)]
    pub source: Option<String>,

    #[serde(default)]
    pub verification: Verification,

    /// Per 100 g; `None` when the catalog has no nutrition data
    #[serde(default)]
    pub macros: Option<Macros>,

    #[serde(default)]
    pub density_g_per_ml: Option<f64>,

    #[serde(default)]
    pub category: Option<String>,

    #[serde(default)]
    pub popularity: u32,

    #[serde(default)]
    pub aliases: Vec<String>,

    #[serde(default)]
    pub barcodes: Vec<String>,

    /// How often the current user picked this food before
    #[serde(default)]
    pub user_usage_count: u32,

    #[serde(default)]
    pub units: Vec<FoodUnit>,

    #[serde(default)]
    pub portion_overrides: Vec<PortionOverride>,
}

impl CandidateFood {
    pub fn new(id: &str, name: &str) -> Self {
        Self {
            id: id.to_string(),
            name: name.to_string(),
            brand: None,
            source: None,
            verification: Verification::default(),
            macros: None,
            density_g_per_ml: None,
            category: None,
            popularity: 0,
            aliases: Vec::new(),
            barcodes: Vec::new(),
            user_usage_count: 0,
            units: Vec::new(),
            portion_overrides: Vec::new(),
        }
    }

    pub fn with_brand(mut self, brand: &str) -> Self {
        self.brand = Some(brand.to_string());
        self
    }

    pub fn with_verification(mut self, verification: Verification) -> Self {
        self.verification = verification;
        self
    }

    pub fn with_kcal(mut self, kcal: f64) -> Self {
        self.macros = Some(Macros {
            kcal,
            ..Macros::default()
        });
        self
    }

    pub fn with_density(mut self, density_g_per_ml: f64) -> Self {
        self.density_g_per_ml = Some(density_g_per_ml);
        self
    }

    pub fn with_category(mut self, category: &str) -> Self {
        self.category = Some(category.to_string());
        self
    }

    pub fn with_popularity(mut self, popularity: u32) -> Self {
        self.popularity = popularity;
        self
    }

    pub fn with_alias(mut self, alias: &str) -> Self {
        self.aliases.push(alias.to_string());
        self
    }

    pub fn with_barcode(mut self, barcode: &str) -> Self {
        self.barcodes.push(barcode.to_string());
        self
    }

    pub fn with_usage_count(mut self, count: u32) -> Self {
        self.user_usage_count = count;
        self
    }

    pub fn with_unit(mut self, label: &str, grams: f64) -> Self {
        self.units.push(FoodUnit {
            label: label.to_string(),
            grams,
        });
        self
    }

    pub fn with_portion_override(mut self, unit: &str, label: Option<&str>, grams: f64) -> Self {
        self.portion_overrides.push(PortionOverride {
            unit: unit.to_string(),
            label: label.map(str::to_string),
            grams,
        });
        self
    }

    /// kcal per 100 g, when known
    pub fn kcal_per_100g(&self) -> Option<f64> {
        self.macros.map(|m| m.kcal).filter(|kcal| kcal.is_finite())
    }
}

impl UserPortionOverride {
    pub fn new(user_id: &str, food_id: &str, unit: &str, label: Option<&str>, grams: f64) -> Self {
        Self {
            user_id: user_id.to_string(),
            food_id: food_id.to_string(),
            unit: unit.to_string(),
            label: label.map(str::to_string),
            grams,
        }
    }
}
