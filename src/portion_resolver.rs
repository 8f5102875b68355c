//! # Portion Resolver
//!
//! Converts a [`ParsedIngredient`] into grams of a specific [`CandidateFood`].
//!
//! Resolution walks an ordered chain of strategies and stops at the first
//! one that yields a positive, finite weight:
//!
//! | Tier | Source          | Confidence |
//! |------|-----------------|------------|
//! | 0    | direct mass     | 1.0        |
//! | 1    | user override   | 1.0        |
//! | 2    | curated override| 0.9        |
//! | 3    | food unit       | 0.85       |
//! | 4    | density         | 0.75       |
//! | 5    | heuristic       | 0.45-0.65  |
//! | 6    | unresolved      | 0.0        |
//!
//! An unresolved result carries no grams; callers must treat it as "cannot
//! compute" rather than assume a weight.
//!
//! ## Usage
//!
//! ```rust
//! use nutriparse::food_model::CandidateFood;
//! use nutriparse::ingredient_parser::parse_ingredient_line;
//! use nutriparse::portion_resolver::{resolve_portion, PortionSource};
//!
//! let oil = CandidateFood::new("oil", "Olive oil").with_density(0.91);
//! let parsed = parse_ingredient_line("0.5 cup olive oil").unwrap();
//! let portion = resolve_portion(&oil, &parsed, &[]);
//!
//! assert_eq!(portion.source, PortionSource::Density);
//! assert!((portion.grams.unwrap() - 109.2).abs() < 1e-9);
//! ```

use crate::density_data::food_density;
use crate::food_model::{CandidateFood, UserPortionOverride};
use crate::ingredient_model::ParsedIngredient;
use crate::portion_heuristics::find_heuristic;
use crate::text_processing::match_tokens;
use crate::unit_normalizer::{canonical_tokens, lookup_unit};
use log::{debug, trace};
use serde::{Deserialize, Serialize};
use std::collections::HashSet;
use std::fmt;

/// Tokens standing in for the unit when a line has neither unit nor hint
const IMPLICIT_COUNT_TOKENS: &[&str] = &["piece", "each", "whole"];

/// Food-unit label scoring
const PRIMARY_UNIT_SCORE: u32 = 4;
const SECONDARY_UNIT_SCORE: u32 = 2;
const QUALIFIER_SCORE: u32 = 1;

/// Which strategy produced a portion
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PortionSource {
    DirectMass,
    UserOverride,
    PortionOverride,
    FoodUnit,
    Density,
    Heuristic,
    Unresolved,
}

impl PortionSource {
    pub fn tier(&self) -> u8 {
        match self {
            PortionSource::DirectMass => 0,
            PortionSource::UserOverride => 1,
            PortionSource::PortionOverride => 2,
            PortionSource::FoodUnit => 3,
            PortionSource::Density => 4,
            PortionSource::Heuristic => 5,
            PortionSource::Unresolved => 6,
        }
    }

    /// Confidence for every source except heuristics, whose rules carry
    /// their own value.
    pub fn base_confidence(&self) -> f64 {
        match self {
            PortionSource::DirectMass | PortionSource::UserOverride => 1.0,
            PortionSource::PortionOverride => 0.9,
            PortionSource::FoodUnit => 0.85,
            PortionSource::Density => 0.75,
            PortionSource::Heuristic => 0.65,
            PortionSource::Unresolved => 0.0,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            PortionSource::DirectMass => "direct_mass",
            PortionSource::UserOverride => "user_override",
            PortionSource::PortionOverride => "portion_override",
            PortionSource::FoodUnit => "food_unit",
            PortionSource::Density => "density",
            PortionSource::Heuristic => "heuristic",
            PortionSource::Unresolved => "unresolved",
        }
    }
}

impl fmt::Display for PortionSource {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// Weight of one parsed line for one food
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PortionResolution {
    pub grams: Option<f64>,
    pub source: PortionSource,
    pub confidence: f64,
    pub tier: u8,
    pub matched_unit: Option<String>,
    pub matched_label: Option<String>,
}

impl PortionResolution {
    fn resolved(source: PortionSource, grams: f64) -> Self {
        Self {
            grams: Some(grams),
            source,
            confidence: source.base_confidence(),
            tier: source.tier(),
            matched_unit: None,
            matched_label: None,
        }
    }

    pub fn unresolved() -> Self {
        Self {
            grams: None,
            source: PortionSource::Unresolved,
            confidence: 0.0,
            tier: PortionSource::Unresolved.tier(),
            matched_unit: None,
            matched_label: None,
        }
    }

    fn with_unit(mut self, unit: &str) -> Self {
        self.matched_unit = Some(unit.to_string());
        self
    }

    fn with_label(mut self, label: Option<&str>) -> Self {
        self.matched_label = label.map(str::to_string);
        self
    }

    fn with_confidence(mut self, confidence: f64) -> Self {
        self.confidence = confidence;
        self
    }

    pub fn is_resolved(&self) -> bool {
        self.grams.is_some()
    }
}

/// Lowercased, singularized tokens a line is matched on
#[derive(Debug, Clone, Default)]
pub struct MatchTokens {
    /// Canonical unit, else the hint
    pub primary_unit: Option<String>,
    /// Primary unit, raw unit, hint and implicit count tokens
    pub units: HashSet<String>,
    pub qualifiers: HashSet<String>,
    /// Parsed ingredient name
    pub name: HashSet<String>,
    /// Parsed ingredient name plus the food name
    pub food_name: HashSet<String>,
}

impl MatchTokens {
    pub fn new(parsed: &ParsedIngredient, food: &CandidateFood) -> Self {
        let mut units = HashSet::new();

        let unit = parsed
            .unit
            .or_else(|| parsed.raw_unit.as_deref().and_then(lookup_unit));
        let primary_unit = unit
            .map(|u| u.as_str().to_string())
            .or_else(|| parsed.unit_hint.map(|h| h.as_str().to_string()));

        if let Some(unit) = unit {
            units.insert(unit.as_str().to_string());
        }
        if let Some(raw) = &parsed.raw_unit {
            units.extend(canonical_tokens(raw));
        }
        if let Some(hint) = parsed.unit_hint {
            units.insert(hint.as_str().to_string());
        }
        if unit.is_none() && parsed.unit_hint.is_none() {
            units.extend(IMPLICIT_COUNT_TOKENS.iter().map(|t| t.to_string()));
        }

        let qualifiers: HashSet<String> = parsed
            .qualifiers
            .iter()
            .flat_map(|q| match_tokens(q))
            .collect();

        let name: HashSet<String> = match_tokens(&parsed.name).into_iter().collect();
        let mut food_name = name.clone();
        food_name.extend(match_tokens(&food.name));

        Self {
            primary_unit,
            units,
            qualifiers,
            name,
            food_name,
        }
    }
}

/// Everything a strategy may look at
pub struct ResolutionContext<'a> {
    pub food: &'a CandidateFood,
    pub parsed: &'a ParsedIngredient,
    pub user_overrides: &'a [UserPortionOverride],
    pub tokens: MatchTokens,
}

impl<'a> ResolutionContext<'a> {
    pub fn new(
        food: &'a CandidateFood,
        parsed: &'a ParsedIngredient,
        user_overrides: &'a [UserPortionOverride],
    ) -> Self {
        Self {
            food,
            parsed,
            user_overrides,
            tokens: MatchTokens::new(parsed, food),
        }
    }

    fn amount(&self) -> f64 {
        self.parsed.total_quantity()
    }

    /// Whether an override's unit and optional label fit this line. Returns
    /// `Some(true)` for a label match, `Some(false)` for an unlabeled match.
    fn override_fit(&self, unit: &str, label: Option<&str>) -> Option<bool> {
        let unit_words = canonical_tokens(unit);
        let unit_matches = !unit_words.is_empty()
            && unit_words
                .iter()
                .all(|w| self.tokens.units.contains(w) || self.tokens.qualifiers.contains(w));
        if !unit_matches {
            return None;
        }

        let Some(label) = label.filter(|l| !l.trim().is_empty()) else {
            return Some(false);
        };
        let label_words = match_tokens(label);
        let label_matches = !label_words.is_empty()
            && label_words
                .iter()
                .all(|w| self.tokens.qualifiers.contains(w) || self.tokens.name.contains(w));
        label_matches.then_some(true)
    }
}

/// One tier of the resolution chain
pub type Strategy = fn(&ResolutionContext<'_>) -> Option<PortionResolution>;

/// Tiers 0 to 5 in priority order
pub const RESOLUTION_CHAIN: [Strategy; 6] = [
    resolve_direct_mass,
    resolve_user_override,
    resolve_portion_override,
    resolve_food_unit,
    resolve_density,
    resolve_heuristic,
];

/// Resolve a parsed line to grams of `food`. `user_overrides` may contain
/// records for other foods; they are ignored.
pub fn resolve_portion(
    food: &CandidateFood,
    parsed: &ParsedIngredient,
    user_overrides: &[UserPortionOverride],
) -> PortionResolution {
    let context = ResolutionContext::new(food, parsed, user_overrides);

    for strategy in RESOLUTION_CHAIN {
        if let Some(resolution) = strategy(&context) {
            if resolution.grams.is_some_and(is_valid_grams) {
                debug!(
                    "Resolved '{}' for '{}' via {}: {:?} g",
                    parsed, food.name, resolution.source, resolution.grams
                );
                return resolution;
            }
        }
    }

    trace!("No portion for '{}' against '{}'", parsed, food.name);
    PortionResolution::unresolved()
}

fn is_valid_grams(grams: f64) -> bool {
    grams.is_finite() && grams > 0.0
}

/// Multiply and keep only usable weights
fn weigh(amount: f64, grams_per_unit: f64) -> Option<f64> {
    let grams = amount * grams_per_unit;
    is_valid_grams(grams).then_some(grams)
}

/// Tier 0: the line already states a mass
pub fn resolve_direct_mass(context: &ResolutionContext<'_>) -> Option<PortionResolution> {
    let unit = context.parsed.unit.filter(|u| u.is_mass())?;
    let grams = weigh(context.amount(), unit.grams_per_unit()?)?;
    Some(PortionResolution::resolved(PortionSource::DirectMass, grams).with_unit(unit.as_str()))
}

/// Tier 1: the user's own mapping for this food
pub fn resolve_user_override(context: &ResolutionContext<'_>) -> Option<PortionResolution> {
    let food_id = &context.food.id;
    let fits = context
        .user_overrides
        .iter()
        .filter(|o| &o.food_id == food_id && is_valid_grams(o.grams))
        .filter_map(|o| context.override_fit(&o.unit, o.label.as_deref()).map(|labeled| (o, labeled)));

    let chosen = best_fit(fits)?;
    let grams = weigh(context.amount(), chosen.grams)?;
    Some(
        PortionResolution::resolved(PortionSource::UserOverride, grams)
            .with_unit(&chosen.unit)
            .with_label(chosen.label.as_deref()),
    )
}

/// Tier 2: curated overrides attached to the food
pub fn resolve_portion_override(context: &ResolutionContext<'_>) -> Option<PortionResolution> {
    let fits = context
        .food
        .portion_overrides
        .iter()
        .filter(|o| is_valid_grams(o.grams))
        .filter_map(|o| context.override_fit(&o.unit, o.label.as_deref()).map(|labeled| (o, labeled)));

    let chosen = best_fit(fits)?;
    let grams = weigh(context.amount(), chosen.grams)?;
    Some(
        PortionResolution::resolved(PortionSource::PortionOverride, grams)
            .with_unit(&chosen.unit)
            .with_label(chosen.label.as_deref()),
    )
}

/// First label-matched override, else the first unlabeled one
fn best_fit<'a, T, I>(fits: I) -> Option<&'a T>
where
    I: Iterator<Item = (&'a T, bool)>,
{
    let mut unlabeled = None;
    for (candidate, labeled) in fits {
        if labeled {
            return Some(candidate);
        }
        unlabeled.get_or_insert(candidate);
    }
    unlabeled
}

/// Tier 3: the best-scoring food-defined serving label
pub fn resolve_food_unit(context: &ResolutionContext<'_>) -> Option<PortionResolution> {
    let tokens = &context.tokens;
    let mut best: Option<(u32, usize)> = None;

    for (index, unit) in context.food.units.iter().enumerate() {
        if !is_valid_grams(unit.grams) {
            continue;
        }
        let label: HashSet<String> = canonical_tokens(&unit.label).into_iter().collect();
        let mut score = 0;

        if let Some(primary) = &tokens.primary_unit {
            if label.contains(primary) {
                score += PRIMARY_UNIT_SCORE;
            }
        }
        for token in &tokens.units {
            if Some(token) != tokens.primary_unit.as_ref() && label.contains(token) {
                score += SECONDARY_UNIT_SCORE;
            }
        }
        for token in &tokens.qualifiers {
            if label.contains(token) {
                score += QUALIFIER_SCORE;
            }
        }

        trace!("Food unit '{}' scored {}", unit.label, score);
        if score > 0 && best.map_or(true, |(best_score, _)| score > best_score) {
            best = Some((score, index));
        }
    }

    let (_, index) = best?;
    let unit = &context.food.units[index];
    let grams = weigh(context.amount(), unit.grams)?;
    let mut resolution =
        PortionResolution::resolved(PortionSource::FoodUnit, grams).with_label(Some(&unit.label));
    if let Some(primary) = &tokens.primary_unit {
        resolution = resolution.with_unit(primary);
    }
    Some(resolution)
}

/// Tier 4: volume times density
pub fn resolve_density(context: &ResolutionContext<'_>) -> Option<PortionResolution> {
    let unit = context
        .parsed
        .unit
        .or_else(|| context.parsed.raw_unit.as_deref().and_then(lookup_unit))
        .filter(|u| u.is_volume())?;
    let millilitres = weigh(context.amount(), unit.millilitres_per_unit()?)?;
    let grams = weigh(millilitres, food_density(context.food))?;
    Some(PortionResolution::resolved(PortionSource::Density, grams).with_unit(unit.as_str()))
}

/// Tier 5: keyword table of typical piece weights
pub fn resolve_heuristic(context: &ResolutionContext<'_>) -> Option<PortionResolution> {
    let tokens = &context.tokens;
    let found = find_heuristic(&tokens.food_name, &tokens.units, &context.parsed.qualifiers)?;
    let grams = weigh(context.amount(), found.grams_per_unit)?;
    Some(
        PortionResolution::resolved(PortionSource::Heuristic, grams)
            .with_unit(&found.rule.unit)
            .with_confidence(found.rule.confidence),
    )
}
