//! Gram estimates for imprecise household units ("2 cloves garlic",
//! "1 celery stalk", "1-inch ginger").
//!
//! The table is plain data in `data/portion_heuristics.json`, embedded at
//! compile time and parsed once. Rules are tried in file order; each names
//! keywords (any of them may match the ingredient), the unit or hint token it
//! applies to, a default weight per unit, optional weights per size
//! qualifier and a confidence.

use serde::Deserialize;
use std::collections::{HashMap, HashSet};
use std::sync::LazyLock;

use crate::text_processing::match_tokens;

/// Heuristic confidences are kept inside this band
pub const MIN_HEURISTIC_CONFIDENCE: f64 = 0.45;
pub const MAX_HEURISTIC_CONFIDENCE: f64 = 0.65;

static HEURISTICS_JSON: &str = include_str!("data/portion_heuristics.json");

#[derive(Debug, Clone, Deserialize)]
pub struct HeuristicRule {
    pub keywords: Vec<String>,
    pub unit: String,
    pub grams: f64,
    #[serde(default)]
    pub sizes: HashMap<String, f64>,
    pub confidence: f64,
}

static RULES: LazyLock<Vec<HeuristicRule>> = LazyLock::new(|| {
    let mut rules: Vec<HeuristicRule> = serde_json::from_str(HEURISTICS_JSON)
        .expect("portion_heuristics.json should be valid JSON");
    for rule in &mut rules {
        rule.confidence = rule
            .confidence
            .clamp(MIN_HEURISTIC_CONFIDENCE, MAX_HEURISTIC_CONFIDENCE);
    }
    rules
});

/// A rule that applies, with the weight chosen for the size qualifiers
#[derive(Debug, Clone, Copy)]
pub struct HeuristicMatch<'a> {
    pub rule: &'a HeuristicRule,
    pub grams_per_unit: f64,
}

pub fn heuristic_rules() -> &'static [HeuristicRule] {
    &RULES
}

impl HeuristicRule {
    fn matches_name(&self, name_tokens: &HashSet<String>) -> bool {
        self.keywords.iter().any(|keyword| {
            let words = match_tokens(keyword);
            !words.is_empty() && words.iter().all(|w| name_tokens.contains(w))
        })
    }

    /// Weight for the first qualifier naming a known size
    fn grams_for(&self, qualifiers: &[String]) -> f64 {
        qualifiers
            .iter()
            .map(|q| q.to_lowercase().replace(' ', "-"))
            .find_map(|size| self.sizes.get(&size).copied())
            .unwrap_or(self.grams)
    }
}

/// First rule whose unit is among `unit_tokens` and whose keyword is among
/// `name_tokens`.
pub fn find_heuristic(
    name_tokens: &HashSet<String>,
    unit_tokens: &HashSet<String>,
    qualifiers: &[String],
) -> Option<HeuristicMatch<'static>> {
    RULES
        .iter()
        .find(|rule| unit_tokens.contains(&rule.unit) && rule.matches_name(name_tokens))
        .map(|rule| HeuristicMatch {
            rule,
            grams_per_unit: rule.grams_for(qualifiers),
        })
}
