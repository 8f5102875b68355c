//! # Ingredient Parser
//!
//! This module turns free-text recipe lines into [`ParsedIngredient`] values.
//!
//! ## Features
//!
//! - Quantities as integers, decimals, fractions, mixed numbers, word numbers and ranges
//! - Canonical units from common spellings, including "fl oz"
//! - "qty x amount" and "qty multiplier" compounds ("2 x 200g", "1 half bar")
//! - Qualifiers from parenthetical clauses, comma clauses and inline words
//! - Sub-part unit hints ("2 egg yolks" -> egg, hint yolk)
//! - Lines without a quantity or without a name ("to taste salt", "---") yield no result
//!
//! ## Usage
//!
//! ```rust
//! use nutriparse::ingredient_model::Unit;
//! use nutriparse::ingredient_parser::{parse_ingredient_line, parse_ingredient_list};
//!
//! let flour = parse_ingredient_line("2½ cups flour").unwrap();
//! assert_eq!(flour.qty, 2.5);
//! assert_eq!(flour.unit, Some(Unit::Cup));
//! assert_eq!(flour.name, "flour");
//!
//! let list = parse_ingredient_list("2 cups flour\n1 tbsp salt\nsalt to taste");
//! assert_eq!(list.parsed_count(), 2);
//! assert_eq!(list.unparsed_count(), 1);
//! ```

use crate::ingredient_model::{IngredientList, ParsedIngredient, Unit};
use crate::qualifier_extractor::{
    extract_clause, extract_inline_qualifiers, extract_unit_hint, merge_qualifiers,
};
use crate::quantity_tokenizer::tokenize_quantity;
use crate::text_processing::{extract_parentheticals, has_alphanumeric, normalize_whitespace, tokenize};
use crate::unit_normalizer::{
    is_multiplier_operator, lookup_compound_unit, lookup_unit, multiplier_value,
};
use log::{debug, trace};

/// How many tokens after the quantity may be inspected for a unit
const UNIT_LOOKAHEAD: usize = 2;

/// Words skipped between a quantity and its unit ("half a cup", "1 x of")
const UNIT_FILLERS: &[&str] = &["a", "an", "of"];

/// Words stripped from the front of an ingredient name
const NAME_FILLERS: &[&str] = &["of", "a", "an", "the"];

const COMMA: &str = ",";

/// A unit found after the quantity
#[derive(Debug)]
struct UnitMatch {
    unit: Unit,
    raw: String,
    next: usize,
}

/// Parse every non-blank line of a block
pub fn parse_ingredient_list(text: &str) -> IngredientList {
    let mut list = IngredientList::new(text.to_string());

    for line in text.lines() {
        let line = line.trim();
        if line.is_empty() {
            continue;
        }

        match parse_ingredient_line(line) {
            Some(ingredient) => list.add_ingredient(ingredient),
            None => list.add_unparsed_line(line.to_string()),
        }
    }

    debug!(
        "Parsed {}/{} ingredient lines",
        list.parsed_count(),
        list.parsed_count() + list.unparsed_count()
    );
    list
}

/// Parse a single ingredient line. Returns `None` for empty lines, lines
/// without a leading quantity and lines whose name ends up empty.
pub fn parse_ingredient_line(line: &str) -> Option<ParsedIngredient> {
    let normalized = normalize_whitespace(line);
    let line = normalized.trim();
    if line.is_empty() {
        return None;
    }

    let (main_text, paren_clauses) = extract_parentheticals(line);
    let tokens = tokenize(&main_text);

    let Some(quantity) = tokenize_quantity(&tokens) else {
        trace!("No quantity in '{}'", line);
        return None;
    };
    let mut cursor = quantity.consumed;

    let mut multiplier = 1.0;
    if let Some((value, consumed)) = read_multiplier(&tokens, cursor) {
        multiplier = value;
        cursor += consumed;
    }

    let mut unit = None;
    let mut raw_unit = None;
    if let Some(found) = read_unit(&tokens, cursor) {
        unit = Some(found.unit);
        raw_unit = Some(found.raw);
        cursor = found.next;
        if tokens.get(cursor).is_some_and(|t| t.eq_ignore_ascii_case("of")) {
            cursor += 1;
        }
    }

    let mut segments = tokens[cursor..].split(|t| t == COMMA);
    let name_tokens = segments.next().unwrap_or(&[]);
    let comma_clauses: Vec<String> = segments
        .map(|segment| segment.join(" "))
        .filter(|clause| has_alphanumeric(clause))
        .collect();

    let mut qualifier_groups = Vec::new();
    let mut notes = Vec::new();
    for clause in paren_clauses.iter().chain(&comma_clauses) {
        let extraction = extract_clause(clause);
        qualifier_groups.push(extraction.qualifiers);
        notes.extend(extraction.note);
    }

    let (inline_qualifiers, name_tokens) = extract_inline_qualifiers(name_tokens);
    qualifier_groups.push(inline_qualifiers);

    let (name_tokens, unit_hint) = extract_unit_hint(name_tokens);
    let Some(name) = build_name(&name_tokens) else {
        trace!("Empty name in '{}'", line);
        return None;
    };

    let ingredient = ParsedIngredient {
        qty: quantity.qty,
        multiplier,
        unit,
        raw_unit,
        name,
        qualifiers: merge_qualifiers(qualifier_groups),
        unit_hint,
        notes: (!notes.is_empty()).then(|| notes.join("; ")),
    };

    debug!("Parsed '{}' -> {}", line, ingredient);
    Some(ingredient)
}

/// "x 200" / "× 2-3" or a multiplier word with something after it
fn read_multiplier(tokens: &[String], cursor: usize) -> Option<(f64, usize)> {
    let token = tokens.get(cursor)?;

    if is_multiplier_operator(token) {
        let amount = tokenize_quantity(&tokens[cursor + 1..])?;
        return Some((amount.qty, 1 + amount.consumed));
    }

    let value = multiplier_value(token)?;
    has_name_tokens(&tokens[cursor + 1..]).then_some((value, 1))
}

fn read_unit(tokens: &[String], cursor: usize) -> Option<UnitMatch> {
    let end = (cursor + UNIT_LOOKAHEAD).min(tokens.len());
    for index in cursor..end {
        if let Some(found) = unit_at(tokens, index) {
            return Some(found);
        }
        if !is_one_of(&tokens[index], UNIT_FILLERS) {
            break;
        }
    }
    None
}

/// A unit at `index`, only if at least one name token follows it
fn unit_at(tokens: &[String], index: usize) -> Option<UnitMatch> {
    let token = tokens.get(index)?;
    let (unit, width) = tokens
        .get(index + 1)
        .and_then(|next| lookup_compound_unit(token, next))
        .map(|unit| (unit, 2))
        .or_else(|| lookup_unit(token).map(|unit| (unit, 1)))?;

    let next = index + width;
    if !has_name_tokens(&tokens[next..]) {
        return None;
    }

    Some(UnitMatch {
        unit,
        raw: tokens[index..next].join(" "),
        next,
    })
}

fn has_name_tokens(tokens: &[String]) -> bool {
    tokens.iter().any(|t| t != COMMA)
}

fn is_one_of(token: &str, words: &[&str]) -> bool {
    words.iter().any(|w| token.eq_ignore_ascii_case(w))
}

/// Lowercased name without leading fillers; `None` if nothing
/// alphanumeric is left
fn build_name(tokens: &[String]) -> Option<String> {
    let start = tokens
        .iter()
        .position(|t| has_alphanumeric(t) && !is_one_of(t, NAME_FILLERS))?;
    let end = tokens.iter().rposition(|t| has_alphanumeric(t))? + 1;

    let name = tokens[start..end].join(" ").to_lowercase();
    has_alphanumeric(&name).then_some(name)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ingredient_model::UnitHint;

    #[test]
    fn test_parse_simple_ingredient() {
        let ingredient = parse_ingredient_line("2 cups flour").unwrap();
        assert_eq!(ingredient.qty, 2.0);
        assert_eq!(ingredient.unit, Some(Unit::Cup));
        assert_eq!(ingredient.raw_unit.as_deref(), Some("cups"));
        assert_eq!(ingredient.name, "flour");
        assert!(ingredient.qualifiers.is_empty());
    }

    #[test]
    fn test_parse_fused_fraction() {
        let ingredient = parse_ingredient_line("2½ cups flour").unwrap();
        assert_eq!(ingredient.qty, 2.5);
        assert_eq!(ingredient.unit, Some(Unit::Cup));
        assert_eq!(ingredient.name, "flour");
    }

    #[test]
    fn test_parse_unit_hint() {
        let ingredient = parse_ingredient_line("2 egg yolks").unwrap();
        assert_eq!(ingredient.qty, 2.0);
        assert_eq!(ingredient.unit, None);
        assert_eq!(ingredient.unit_hint, Some(UnitHint::Yolk));
        assert_eq!(ingredient.name, "egg");
    }

    #[test]
    fn test_parse_multiplier_operator() {
        let ingredient = parse_ingredient_line("2 x 200g chicken").unwrap();
        assert_eq!(ingredient.qty, 2.0);
        assert_eq!(ingredient.multiplier, 200.0);
        assert_eq!(ingredient.unit, Some(Unit::Gram));
        assert_eq!(ingredient.name, "chicken");
    }

    #[test]
    fn test_parse_multiplier_word() {
        let ingredient = parse_ingredient_line("1 half protein bar").unwrap();
        assert_eq!(ingredient.qty, 1.0);
        assert_eq!(ingredient.multiplier, 0.5);
        assert_eq!(ingredient.unit, None);
        assert_eq!(ingredient.name, "protein bar");
    }

    #[test]
    fn test_parse_multiplier_with_filler_before_unit() {
        let ingredient = parse_ingredient_line("1 half a cup rice").unwrap();
        assert_eq!(ingredient.multiplier, 0.5);
        assert_eq!(ingredient.unit, Some(Unit::Cup));
        assert_eq!(ingredient.name, "rice");
    }

    #[test]
    fn test_unit_kept_when_it_is_the_only_word() {
        let ingredient = parse_ingredient_line("3 eggs").unwrap();
        assert_eq!(ingredient.unit, None);
        assert_eq!(ingredient.name, "eggs");

        let ingredient = parse_ingredient_line("2 cups").unwrap();
        assert_eq!(ingredient.unit, None);
        assert_eq!(ingredient.name, "cups");
    }

    #[test]
    fn test_parse_compound_unit() {
        let ingredient = parse_ingredient_line("4 fl oz orange juice").unwrap();
        assert_eq!(ingredient.unit, Some(Unit::FluidOunce));
        assert_eq!(ingredient.raw_unit.as_deref(), Some("fl oz"));
        assert_eq!(ingredient.name, "orange juice");
    }

    #[test]
    fn test_parse_qualifier_order() {
        let ingredient =
            parse_ingredient_line("2 large onions (peeled), finely chopped").unwrap();
        assert_eq!(ingredient.name, "onions");
        assert_eq!(ingredient.qualifiers, ["peeled", "finely chopped", "large"]);
        assert_eq!(ingredient.notes, None);
    }

    #[test]
    fn test_parse_notes() {
        let ingredient = parse_ingredient_line("1 stick butter (about 113g), softened").unwrap();
        assert_eq!(ingredient.unit, Some(Unit::Stick));
        assert_eq!(ingredient.name, "butter");
        assert_eq!(ingredient.qualifiers, ["softened"]);
        assert_eq!(ingredient.notes.as_deref(), Some("about 113 g"));
    }

    #[test]
    fn test_parse_of_and_articles() {
        let ingredient = parse_ingredient_line("2 cups of the Flour").unwrap();
        assert_eq!(ingredient.name, "flour");

        let ingredient = parse_ingredient_line("2 cloves of garlic").unwrap();
        assert_eq!(ingredient.unit_hint, Some(UnitHint::Clove));
        assert_eq!(ingredient.name, "garlic");
    }

    #[test]
    fn test_parse_range() {
        let ingredient = parse_ingredient_line("2-3 tbsp olive oil").unwrap();
        assert_eq!(ingredient.qty, 2.5);
        assert_eq!(ingredient.unit, Some(Unit::Tablespoon));
        assert_eq!(ingredient.name, "olive oil");
    }

    #[test]
    fn test_parse_nbsp() {
        let ingredient = parse_ingredient_line("1\u{00A0}tsp\u{2009}salt").unwrap();
        assert_eq!(ingredient.unit, Some(Unit::Teaspoon));
        assert_eq!(ingredient.name, "salt");
    }

    #[test]
    fn test_parse_failures() {
        assert!(parse_ingredient_line("").is_none());
        assert!(parse_ingredient_line("   ").is_none());
        assert!(parse_ingredient_line("to taste salt").is_none());
        assert!(parse_ingredient_line("---").is_none());
        assert!(parse_ingredient_line("2 ---").is_none());
        assert!(parse_ingredient_line("3 large").is_none());
        assert!(parse_ingredient_line("🍕🍕🍕").is_none());
    }

    #[test]
    fn test_canonical_form_round_trips() {
        for line in ["2 x 200g chicken", "2 egg yolks", "1 half protein bar", "½ fl oz olive oil"] {
            let first = parse_ingredient_line(line).unwrap();
            let second = parse_ingredient_line(&first.to_string()).unwrap();
            assert!((first.qty - second.qty).abs() < 1e-9, "{}", line);
            assert!((first.multiplier - second.multiplier).abs() < 1e-9, "{}", line);
            assert_eq!(first.unit, second.unit, "{}", line);
            assert_eq!(first.name, second.name, "{}", line);
            assert_eq!(first.unit_hint, second.unit_hint, "{}", line);
        }
    }

    #[test]
    fn test_parse_ingredient_list() {
        let list = parse_ingredient_list("2 cups flour\n\n1 tbsp sugar\n---\n3 eggs");
        assert_eq!(list.parsed_count(), 3);
        assert_eq!(list.unparsed_lines, vec!["---".to_string()]);
        assert_eq!(list.ingredients[2].name, "eggs");
    }
}
