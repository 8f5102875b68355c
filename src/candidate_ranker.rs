//! # Candidate Ranker
//!
//! Scores catalog candidates against a free-text food query and sorts them
//! best-first.
//!
//! ## Signals
//!
//! Additive, each scaled by a weight from [`RankerWeights`]:
//! - exact barcode, brand substring, exact alias, alias containment
//! - fuzzy token similarity between query and name (the strongest signal)
//! - kcal plausibility for the query's category
//! - token coverage of the query by the name
//! - keyword -> category boosts ("powder" favours whey and flour)
//! - log-compressed popularity and per-user usage
//! - qualifiers found in the name, decaying with qualifier position
//! - a food unit matching the line's unit hint
//! - a raw/fresh/whole bonus
//!
//! Multiplicative, applied to the sum:
//! - composite-dish and processed-food penalties, unless the query asks for them
//! - verification status
//!
//! ## Usage
//!
//! ```rust
//! use nutriparse::candidate_ranker::{rank_candidates, RankOptions};
//! use nutriparse::food_model::CandidateFood;
//!
//! let catalog = vec![
//!     CandidateFood::new("1", "Olive oil dressing, with herbs").with_kcal(300.0),
//!     CandidateFood::new("2", "Olive oil").with_kcal(884.0),
//! ];
//! let ranked = rank_candidates(&catalog, &RankOptions::new("olive oil"));
//! assert_eq!(ranked[0].candidate.id, "2");
//! assert!(ranked[0].confidence > ranked[1].confidence);
//! ```

use crate::food_model::{CandidateFood, Verification};
use crate::ingredient_model::UnitHint;
use crate::plausibility::{infer_category, plausibility_score, KcalBand};
use crate::text_processing::{contains_keyword, match_tokens, normalize_phrase};
use crate::unit_normalizer::canonical_tokens;
use log::{debug, trace};
use serde::{Deserialize, Serialize};
use std::collections::HashSet;
use strsim::normalized_levenshtein;

/// Popularity at which the popularity signal saturates
const POPULARITY_SCALE: f64 = 10_000.0;

/// Selections by the user at which the usage signal saturates
const USAGE_SCALE: f64 = 50.0;

/// Share of the fuzzy score taken from per-token matching
const TOKEN_FUZZY_SHARE: f64 = 0.7;

/// Shortest digit string treated as a barcode
const MIN_BARCODE_DIGITS: usize = 6;

/// Query keyword -> catalog category/name keywords it boosts
const CATEGORY_BOOSTS: &[(&str, &[&str])] = &[
    ("powder", &["whey", "protein", "flour", "cocoa", "supplement"]),
    ("protein", &["whey", "protein", "supplement"]),
    ("oil", &["oil", "fat"]),
    ("milk", &["dairy", "milk"]),
    ("cheese", &["dairy", "cheese"]),
    ("yogurt", &["dairy", "yogurt"]),
    ("breast", &["poultry", "chicken", "turkey"]),
    ("thigh", &["poultry", "chicken"]),
    ("fillet", &["fish", "seafood"]),
    ("juice", &["beverage", "juice"]),
    ("bread", &["bakery", "bread"]),
    ("flour", &["flour", "baking"]),
    ("sugar", &["sweetener", "baking", "sugar"]),
];

/// Name words that mark a mixed dish
const COMPOSITE_WORDS: &[&str] = &["with", "and", "&"];

/// Query words that ask for a mixed dish
const DISH_WORDS: &[&str] = &[
    "salad", "sandwich", "soup", "stew", "casserole", "pizza", "burger", "wrap", "curry", "bowl",
];

const PROCESSED_PATTERNS: &[&str] = &[
    "fried",
    "breaded",
    "battered",
    "canned",
    "processed",
    "smoked",
    "cured",
    "sweetened",
    "flavored",
    "flavoured",
    "instant",
    "chips",
    "nuggets",
    "snack",
    "prepared",
    "microwave",
    "frozen meal",
    "ready meal",
];

const RAW_PATTERNS: &[&str] = &["raw", "fresh", "whole", "plain", "unsweetened"];

/// Weights for every ranking signal
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct RankerWeights {
    pub fuzzy: f64,
    pub barcode_exact: f64,
    pub brand_match: f64,
    pub alias_exact: f64,
    pub alias_contains: f64,
    pub plausibility: f64,
    pub coverage: f64,
    pub category_boost: f64,
    pub popularity: f64,
    pub user_usage: f64,
    pub raw_bonus: f64,
    /// Bonus for the first qualifier; later qualifiers get weight / position
    pub qualifier_match: f64,
    pub unit_hint_match: f64,
    /// Multiplier for composite-dish names when the query is not a dish
    pub composite_penalty: f64,
    /// Multiplier for processed-food names when the query is not processed
    pub processed_penalty: f64,
    pub verified: f64,
    pub unverified: f64,
    pub suspect: f64,
    /// Score that maps to confidence 1.0
    pub confidence_divisor: f64,
}

impl Default for RankerWeights {
    fn default() -> Self {
        Self {
            fuzzy: 6.0,
            barcode_exact: 5.0,
            brand_match: 1.5,
            alias_exact: 4.0,
            alias_contains: 1.5,
            plausibility: 1.5,
            coverage: 2.0,
            category_boost: 1.0,
            popularity: 0.5,
            user_usage: 1.0,
            raw_bonus: 0.5,
            qualifier_match: 0.3,
            unit_hint_match: 0.5,
            composite_penalty: 0.85,
            processed_penalty: 0.85,
            verified: 1.0,
            unverified: 0.9,
            suspect: 0.6,
            confidence_divisor: 12.0,
        }
    }
}

impl RankerWeights {
    pub fn verification_multiplier(&self, verification: Verification) -> f64 {
        match verification {
            Verification::Verified => self.verified,
            Verification::Unverified => self.unverified,
            Verification::Suspect => self.suspect,
        }
    }

    /// Check that weights are usable: finite and non-negative, multipliers
    /// at most 1, verification ordered verified >= unverified >= suspect and
    /// a positive confidence divisor.
    pub fn validate(&self) -> Result<(), String> {
        let named = [
            ("fuzzy", self.fuzzy),
            ("barcode_exact", self.barcode_exact),
            ("brand_match", self.brand_match),
            ("alias_exact", self.alias_exact),
            ("alias_contains", self.alias_contains),
            ("plausibility", self.plausibility),
            ("coverage", self.coverage),
            ("category_boost", self.category_boost),
            ("popularity", self.popularity),
            ("user_usage", self.user_usage),
            ("raw_bonus", self.raw_bonus),
            ("qualifier_match", self.qualifier_match),
            ("unit_hint_match", self.unit_hint_match),
            ("composite_penalty", self.composite_penalty),
            ("processed_penalty", self.processed_penalty),
            ("verified", self.verified),
            ("unverified", self.unverified),
            ("suspect", self.suspect),
        ];
        for (name, value) in named {
            if !value.is_finite() || value < 0.0 {
                return Err(format!("weight '{}' must be a non-negative number, got {}", name, value));
            }
        }

        for (name, value) in [
            ("composite_penalty", self.composite_penalty),
            ("processed_penalty", self.processed_penalty),
            ("verified", self.verified),
        ] {
            if value > 1.0 {
                return Err(format!("multiplier '{}' must be at most 1.0, got {}", name, value));
            }
        }

        if !(self.verified >= self.unverified && self.unverified >= self.suspect) {
            return Err("verification multipliers must satisfy verified >= unverified >= suspect".to_string());
        }

        if !self.confidence_divisor.is_finite() || self.confidence_divisor <= 0.0 {
            return Err(format!(
                "confidence_divisor must be positive, got {}",
                self.confidence_divisor
            ));
        }

        Ok(())
    }
}

/// What the caller is looking for
#[derive(Debug, Clone, Default, PartialEq)]
pub struct RankOptions {
    pub query: String,
    pub unit_hint: Option<UnitHint>,
    /// In parse order; earlier qualifiers weigh more
    pub qualifiers: Vec<String>,
    /// Overrides the band inferred from the query
    pub kcal_band: Option<KcalBand>,
}

impl RankOptions {
    pub fn new(query: &str) -> Self {
        Self {
            query: query.to_string(),
            ..Self::default()
        }
    }

    pub fn with_unit_hint(mut self, hint: Option<UnitHint>) -> Self {
        self.unit_hint = hint;
        self
    }

    pub fn with_qualifiers(mut self, qualifiers: &[String]) -> Self {
        self.qualifiers = qualifiers.to_vec();
        self
    }

    pub fn with_kcal_band(mut self, band: KcalBand) -> Self {
        self.kcal_band = Some(band);
        self
    }
}

/// Query features computed once per ranking call
#[derive(Debug, Clone)]
pub struct RankQuery {
    normalized: String,
    tokens: Vec<String>,
    barcode: Option<String>,
    band: Option<KcalBand>,
    unit_hint: Option<UnitHint>,
    qualifiers: Vec<Vec<String>>,
    boosted_categories: Vec<&'static str>,
    wants_composite: bool,
    wants_processed: bool,
}

impl RankQuery {
    pub fn new(options: &RankOptions) -> Self {
        let query = options.query.as_str();
        let normalized = normalize_phrase(query);
        let tokens = dedup(match_tokens(query));

        let digits: String = query.chars().filter(|c| c.is_ascii_digit()).collect();
        let barcode_shaped = query
            .chars()
            .all(|c| c.is_ascii_digit() || c.is_whitespace() || c == '-');
        let barcode = (barcode_shaped && digits.len() >= MIN_BARCODE_DIGITS).then_some(digits);

        let band = options
            .kcal_band
            .or_else(|| infer_category(query).map(|c| c.kcal_band()));

        let boosted_categories = CATEGORY_BOOSTS
            .iter()
            .filter(|(keyword, _)| tokens.iter().any(|t| t == keyword))
            .flat_map(|(_, categories)| categories.iter().copied())
            .collect();

        let wants_composite = query.contains(',')
            || COMPOSITE_WORDS
                .iter()
                .chain(DISH_WORDS)
                .any(|w| tokens.iter().any(|t| t == w));
        let wants_processed = PROCESSED_PATTERNS.iter().any(|p| contains_keyword(query, p));

        Self {
            normalized,
            tokens,
            barcode,
            band,
            unit_hint: options.unit_hint,
            qualifiers: options.qualifiers.iter().map(|q| match_tokens(q)).collect(),
            boosted_categories,
            wants_composite,
            wants_processed,
        }
    }
}

fn dedup(tokens: Vec<String>) -> Vec<String> {
    let mut seen = HashSet::new();
    tokens.into_iter().filter(|t| seen.insert(t.clone())).collect()
}

/// One scored candidate, borrowed from the caller's list
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct RankedCandidate<'a> {
    pub candidate: &'a CandidateFood,
    pub score: f64,
    pub confidence: f64,
}

/// Rank with the default weights
pub fn rank_candidates<'a>(
    candidates: &'a [CandidateFood],
    options: &RankOptions,
) -> Vec<RankedCandidate<'a>> {
    rank_candidates_with_weights(candidates, options, &RankerWeights::default())
}

/// Score every candidate and sort best-first. Equal scores keep their input
/// order.
pub fn rank_candidates_with_weights<'a>(
    candidates: &'a [CandidateFood],
    options: &RankOptions,
    weights: &RankerWeights,
) -> Vec<RankedCandidate<'a>> {
    let query = RankQuery::new(options);

    let mut ranked: Vec<RankedCandidate<'a>> = candidates
        .iter()
        .map(|candidate| {
            let score = score_candidate(candidate, &query, weights);
            RankedCandidate {
                candidate,
                score,
                confidence: confidence_for(score, weights),
            }
        })
        .collect();

    ranked.sort_by(|a, b| b.score.total_cmp(&a.score));

    if let Some(best) = ranked.first() {
        debug!(
            "Ranked {} candidates for '{}'; best '{}' ({:.2})",
            ranked.len(),
            options.query,
            best.candidate.name,
            best.confidence
        );
    }
    ranked
}

/// Score clipped into [0, 1]
pub fn confidence_for(score: f64, weights: &RankerWeights) -> f64 {
    let confidence = score / weights.confidence_divisor;
    if confidence.is_finite() {
        confidence.clamp(0.0, 1.0)
    } else {
        0.0
    }
}

/// Composite score of one candidate. Always finite and non-negative.
pub fn score_candidate(candidate: &CandidateFood, query: &RankQuery, weights: &RankerWeights) -> f64 {
    let name_normalized = normalize_phrase(&candidate.name);
    let name_tokens: HashSet<String> = match_tokens(&candidate.name).into_iter().collect();
    let mut score = 0.0;

    if let Some(barcode) = &query.barcode {
        if candidate.barcodes.iter().any(|b| digits_of(b) == *barcode) {
            score += weights.barcode_exact;
        }
    }

    if let Some(brand) = candidate.brand.as_deref() {
        if contains_keyword(&query.normalized, brand) {
            score += weights.brand_match;
        }
    }

    score += alias_score(candidate, query, weights);

    score += weights.fuzzy * fuzzy_score(&query.tokens, &name_tokens, &query.normalized, &name_normalized);

    if let (Some(band), Some(kcal)) = (query.band, candidate.kcal_per_100g()) {
        score += weights.plausibility * plausibility_score(band, kcal);
    }

    if !query.tokens.is_empty() {
        let covered = query.tokens.iter().filter(|t| name_tokens.contains(*t)).count();
        score += weights.coverage * covered as f64 / query.tokens.len() as f64;
    }

    if !query.boosted_categories.is_empty() {
        let haystack = candidate.category.as_deref().unwrap_or(&candidate.name);
        if query
            .boosted_categories
            .iter()
            .any(|c| contains_keyword(haystack, c))
        {
            score += weights.category_boost;
        }
    }

    score += weights.popularity * log_scaled(candidate.popularity, POPULARITY_SCALE);
    score += weights.user_usage * log_scaled(candidate.user_usage_count, USAGE_SCALE);

    for (position, words) in query.qualifiers.iter().enumerate() {
        if !words.is_empty() && words.iter().all(|w| name_tokens.contains(w)) {
            score += weights.qualifier_match / (position + 1) as f64;
        }
    }

    if let Some(hint) = query.unit_hint {
        let has_unit = candidate
            .units
            .iter()
            .any(|u| canonical_tokens(&u.label).iter().any(|t| t == hint.as_str()));
        if has_unit {
            score += weights.unit_hint_match;
        }
    }

    let processed = PROCESSED_PATTERNS
        .iter()
        .any(|p| contains_keyword(&candidate.name, p));
    if !query.wants_processed && !processed && RAW_PATTERNS.iter().any(|p| name_tokens.contains(*p)) {
        score += weights.raw_bonus;
    }

    if !query.wants_composite && is_composite(&candidate.name, &name_tokens) {
        score *= weights.composite_penalty;
    }
    if !query.wants_processed && processed {
        score *= weights.processed_penalty;
    }
    score *= weights.verification_multiplier(candidate.verification);

    trace!("Scored '{}' = {:.3}", candidate.name, score);
    if score.is_finite() {
        score.max(0.0)
    } else {
        0.0
    }
}

fn alias_score(candidate: &CandidateFood, query: &RankQuery, weights: &RankerWeights) -> f64 {
    if query.normalized.is_empty() {
        return 0.0;
    }
    let aliases: Vec<String> = candidate
        .aliases
        .iter()
        .map(|a| normalize_phrase(a))
        .filter(|a| !a.is_empty())
        .collect();

    if aliases.iter().any(|a| *a == query.normalized) {
        weights.alias_exact
    } else if aliases
        .iter()
        .any(|a| contains_keyword(a, &query.normalized) || contains_keyword(&query.normalized, a))
    {
        weights.alias_contains
    } else {
        0.0
    }
}

fn digits_of(text: &str) -> String {
    text.chars().filter(|c| c.is_ascii_digit()).collect()
}

fn log_scaled(value: u32, scale: f64) -> f64 {
    ((1.0 + value as f64).ln() / (1.0 + scale).ln()).min(1.0)
}

fn is_composite(name: &str, name_tokens: &HashSet<String>) -> bool {
    name.contains(',') || COMPOSITE_WORDS.iter().any(|w| name_tokens.contains(*w)) || name.contains('&')
}

/// Fuzzy similarity in [0, 1]: the average best per-token match of the
/// query against the name, blended with whole-string similarity.
pub fn fuzzy_score(
    query_tokens: &[String],
    name_tokens: &HashSet<String>,
    query_normalized: &str,
    name_normalized: &str,
) -> f64 {
    if query_tokens.is_empty() || name_tokens.is_empty() {
        return 0.0;
    }

    let token_total: f64 = query_tokens
        .iter()
        .map(|q| {
            name_tokens
                .iter()
                .map(|n| normalized_levenshtein(q, n))
                .fold(0.0, f64::max)
        })
        .sum();
    let token_score = token_total / query_tokens.len() as f64;
    let whole_score = normalized_levenshtein(query_normalized, name_normalized);

    TOKEN_FUZZY_SHARE * token_score + (1.0 - TOKEN_FUZZY_SHARE) * whole_score
}
