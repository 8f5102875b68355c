//! # Ingredient Resolution Pipeline
//!
//! Ties the parser, the candidate ranker and the portion resolver together:
//! a raw line becomes a parsed ingredient, the catalog is ranked against its
//! name, and the best candidate is weighed.
//!
//! When the tiered resolver finds nothing, the best candidate's serving
//! options are searched for one named after the line's unit or hint.

use crate::candidate_ranker::{rank_candidates_with_weights, RankOptions, RankedCandidate, RankerWeights};
use crate::food_model::{CandidateFood, UserPortionOverride};
use crate::ingredient_model::{IngredientList, ParsedIngredient, UnitKind};
use crate::ingredient_parser::parse_ingredient_line;
use crate::portion_resolver::{resolve_portion, PortionResolution};
use crate::serving_options::{derive_serving_options, find_serving_option, ServingOption};
use log::{debug, trace};
use serde::Serialize;

/// Everything known about one input line
#[derive(Debug, Clone, Serialize)]
pub struct LineResolution<'a> {
    pub line: String,
    /// `None` when the line is not an ingredient
    pub parsed: Option<ParsedIngredient>,
    /// Best-first
    pub matches: Vec<RankedCandidate<'a>>,
    /// Tiered resolution against the best match
    pub portion: Option<PortionResolution>,
    /// Serving option used when `portion` is unresolved
    pub fallback: Option<ServingOption>,
}

impl<'a> LineResolution<'a> {
    fn unparsed(line: &str) -> Self {
        Self {
            line: line.to_string(),
            parsed: None,
            matches: Vec::new(),
            portion: None,
            fallback: None,
        }
    }

    pub fn best_match(&self) -> Option<&RankedCandidate<'a>> {
        self.matches.first()
    }

    /// Grams from the tiered resolver, else from the fallback serving option
    pub fn grams(&self) -> Option<f64> {
        if let Some(grams) = self.portion.as_ref().and_then(|p| p.grams) {
            return Some(grams);
        }
        let parsed = self.parsed.as_ref()?;
        let option = self.fallback.as_ref()?;
        Some(parsed.total_quantity() * option.grams)
    }

    pub fn is_resolved(&self) -> bool {
        self.grams().is_some()
    }
}

/// Parse, rank and weigh one line
pub fn resolve_ingredient_line<'a>(
    line: &str,
    catalog: &'a [CandidateFood],
    user_overrides: &[UserPortionOverride],
    weights: &RankerWeights,
) -> LineResolution<'a> {
    let Some(parsed) = parse_ingredient_line(line) else {
        trace!("Not an ingredient line: '{}'", line);
        return LineResolution::unparsed(line);
    };

    let options = RankOptions::new(&parsed.name)
        .with_unit_hint(parsed.unit_hint)
        .with_qualifiers(&parsed.qualifiers);
    let matches = rank_candidates_with_weights(catalog, &options, weights);

    let (portion, fallback) = match matches.first() {
        Some(best) => {
            let portion = resolve_portion(best.candidate, &parsed, user_overrides);
            let fallback = if portion.is_resolved() {
                None
            } else {
                let options = derive_serving_options(best.candidate);
                find_serving_option(&options, &parsed).cloned()
            };
            (Some(portion), fallback)
        }
        None => (None, None),
    };

    if let Some(option) = &fallback {
        debug!("Fell back to serving option '{}' for '{}'", option.label, line);
    }

    LineResolution {
        line: line.to_string(),
        parsed: Some(parsed),
        matches,
        portion,
        fallback,
    }
}

/// Resolve every non-blank line of a block
pub fn resolve_ingredient_block<'a>(
    text: &str,
    catalog: &'a [CandidateFood],
    user_overrides: &[UserPortionOverride],
    weights: &RankerWeights,
) -> Vec<LineResolution<'a>> {
    text.lines()
        .map(str::trim)
        .filter(|line| !line.is_empty())
        .map(|line| resolve_ingredient_line(line, catalog, user_overrides, weights))
        .collect()
}

/// Total grams and per-line status of a resolved block
pub fn generate_resolution_summary(results: &[LineResolution<'_>]) -> String {
    let mut total = 0.0;
    let mut resolved = 0;
    let mut summary = String::new();

    for result in results {
        match (&result.parsed, result.best_match(), result.grams()) {
            (Some(parsed), Some(best), Some(grams)) => {
                resolved += 1;
                total += grams;
                let source = result
                    .portion
                    .as_ref()
                    .filter(|p| p.is_resolved())
                    .map_or("serving option", |p| p.source.as_str());
                summary.push_str(&format!(
                    "✓ {} -> {} ({:.1} g, {})\n",
                    parsed, best.candidate.name, grams, source
                ));
            }
            (Some(parsed), Some(best), None) => {
                summary.push_str(&format!("? {} -> {} (no weight)\n", parsed, best.candidate.name));
            }
            (Some(parsed), None, _) => {
                summary.push_str(&format!("? {} (no match)\n", parsed));
            }
            (None, _, _) => {
                summary.push_str(&format!("✗ {}\n", result.line));
            }
        }
    }

    summary.push_str(&format!(
        "Resolved {}/{} lines, {:.1} g total\n",
        resolved,
        results.len(),
        total
    ));
    summary
}

/// Names grouped by the kind of unit they were measured in
pub fn generate_ingredient_summary(ingredient_list: &IngredientList) -> String {
    let mut volume_items = Vec::new();
    let mut weight_items = Vec::new();
    let mut count_items = Vec::new();
    let mut unitless_items = Vec::new();

    for ingredient in &ingredient_list.ingredients {
        let name = ingredient.name.as_str();
        match ingredient.unit.map(|u| u.kind()) {
            Some(UnitKind::Volume) => volume_items.push(name),
            Some(UnitKind::Mass) => weight_items.push(name),
            Some(_) => count_items.push(name),
            None => unitless_items.push(name),
        }
    }

    let mut summary = String::new();
    if !volume_items.is_empty() {
        summary.push_str(&format!("Volume: {}\n", volume_items.join(", ")));
    }
    if !weight_items.is_empty() {
        summary.push_str(&format!("Weight: {}\n", weight_items.join(", ")));
    }
    if !count_items.is_empty() {
        summary.push_str(&format!("Count: {}\n", count_items.join(", ")));
    }
    if !unitless_items.is_empty() {
        summary.push_str(&format!("Whole items: {}\n", unitless_items.join(", ")));
    }
    if !ingredient_list.unparsed_lines.is_empty() {
        summary.push_str(&format!(
            "Could not parse: {}\n",
            ingredient_list.unparsed_lines.join(" | ")
        ));
    }
    summary
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ingredient_parser::parse_ingredient_list;
    use crate::portion_resolver::PortionSource;

    fn catalog() -> Vec<CandidateFood> {
        vec![
            CandidateFood::new("oil", "Olive oil").with_kcal(884.0).with_density(0.91),
            CandidateFood::new("flour", "Wheat flour, all-purpose").with_kcal(364.0),
            CandidateFood::new("garlic", "Garlic, raw").with_kcal(149.0),
            CandidateFood::new("bar", "Protein bar")
                .with_kcal(380.0)
                .with_unit("1 bar", 60.0),
        ]
    }

    #[test]
    fn test_resolve_line_with_density() {
        let catalog = catalog();
        let result =
            resolve_ingredient_line("0.5 cup olive oil", &catalog, &[], &RankerWeights::default());
        assert_eq!(result.best_match().unwrap().candidate.id, "oil");
        let portion = result.portion.as_ref().unwrap();
        assert_eq!(portion.source, PortionSource::Density);
        assert!((result.grams().unwrap() - 109.2).abs() < 1e-6);
        assert!(result.fallback.is_none());
    }

    #[test]
    fn test_resolve_line_heuristic() {
        let catalog = catalog();
        let result =
            resolve_ingredient_line("2 cloves garlic", &catalog, &[], &RankerWeights::default());
        assert_eq!(result.best_match().unwrap().candidate.id, "garlic");
        assert_eq!(result.portion.as_ref().unwrap().source, PortionSource::Heuristic);
        assert!((result.grams().unwrap() - 6.0).abs() < 1e-6);
    }

    #[test]
    fn test_unparsable_line() {
        let catalog = catalog();
        let result = resolve_ingredient_line("salt to taste", &catalog, &[], &RankerWeights::default());
        assert!(result.parsed.is_none());
        assert!(result.matches.is_empty());
        assert!(!result.is_resolved());
    }

    #[test]
    fn test_empty_catalog() {
        let result = resolve_ingredient_line("2 eggs", &[], &[], &RankerWeights::default());
        assert!(result.parsed.is_some());
        assert!(result.matches.is_empty());
        assert!(result.portion.is_none());
        assert_eq!(result.grams(), None);
    }

    #[test]
    fn test_block_summary() {
        let catalog = catalog();
        let text = "0.5 cup olive oil\n\nsalt to taste\n200 g flour\n";
        let results = resolve_ingredient_block(text, &catalog, &[], &RankerWeights::default());
        assert_eq!(results.len(), 3);

        let summary = generate_resolution_summary(&results);
        assert!(summary.contains("✗ salt to taste"));
        assert!(summary.contains("Resolved 2/3 lines"));
        assert!(summary.contains("309.2 g total"));
    }

    #[test]
    fn test_ingredient_summary_grouping() {
        let list = parse_ingredient_list("2 cups flour\n100 g sugar\n3 eggs\n1 can beans\nnothing here");
        let summary = generate_ingredient_summary(&list);
        assert!(summary.contains("Volume: flour"));
        assert!(summary.contains("Weight: sugar"));
        assert!(summary.contains("Count: beans"));
        assert!(summary.contains("Whole items: eggs"));
        assert!(summary.contains("Could not parse: nothing here"));
    }
}
