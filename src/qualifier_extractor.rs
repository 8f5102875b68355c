//! # Qualifier Extractor
//!
//! Pulls descriptive qualifiers ("large", "finely chopped", "boneless") and
//! sub-part unit hints ("yolks", "cloves", "leaves") out of the tokens that
//! follow an ingredient's quantity and unit.
//!
//! Qualifiers come from three sources, always concatenated in this order:
//! parenthetical clauses, comma clauses, inline name tokens. Clause text that
//! is not qualifier vocabulary is kept as a free-form note.

use crate::ingredient_model::UnitHint;
use crate::text_processing::{has_alphanumeric, tokenize};
use log::trace;
use std::collections::HashSet;
use std::sync::LazyLock;

/// Multi-word qualifier phrases, matched greedily before single words
const QUALIFIER_PHRASES: &[&str] = &[
    "at room temperature",
    "room temperature",
    "finely chopped",
    "roughly chopped",
    "coarsely chopped",
    "finely diced",
    "finely minced",
    "finely grated",
    "finely sliced",
    "thinly sliced",
    "thickly sliced",
    "freshly grated",
    "freshly ground",
    "freshly squeezed",
    "lightly beaten",
    "lightly packed",
    "firmly packed",
    "loosely packed",
    "extra large",
    "extra virgin",
    "skin on",
    "bone in",
    "cut into cubes",
    "cut into pieces",
];

static SINGLE_QUALIFIERS: LazyLock<HashSet<&'static str>> = LazyLock::new(|| {
    [
        // Size
        "large",
        "medium",
        "small",
        "extra-large",
        "jumbo",
        "mini",
        "heaping",
        "level",
        // Preparation
        "diced",
        "chopped",
        "minced",
        "sliced",
        "grated",
        "shredded",
        "crushed",
        "cubed",
        "julienned",
        "halved",
        "quartered",
        "peeled",
        "seeded",
        "pitted",
        "trimmed",
        "mashed",
        "beaten",
        "sifted",
        "softened",
        "melted",
        "crumbled",
        "rinsed",
        "drained",
        "packed",
        // State
        "raw",
        "cooked",
        "fresh",
        "frozen",
        "dried",
        "canned",
        "thawed",
        "toasted",
        "roasted",
        "boiled",
        "steamed",
        "baked",
        "grilled",
        "fried",
        "ripe",
        "uncooked",
        // Trims
        "boneless",
        "skinless",
        "skin-on",
        "bone-in",
        "extra-virgin",
    ]
    .into_iter()
    .collect()
});

/// Words that only glue qualifiers together and never make a note on their own
const CONNECTORS: &[&str] = &["and", "or", "then", "plus", "&", ","];

/// Result of scanning one parenthetical or comma clause
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ClauseExtraction {
    pub qualifiers: Vec<String>,
    pub note: Option<String>,
}

/// Split tokens into qualifier vocabulary and everything else. Phrases are
/// tried at each position before single words, and the remainder is
/// rescanned until no more qualifiers appear ("room large temperature").
pub fn extract_inline_qualifiers(tokens: &[String]) -> (Vec<String>, Vec<String>) {
    let (mut qualifiers, mut rest) = scan_qualifiers(tokens);
    loop {
        let (more, remaining) = scan_qualifiers(&rest);
        if more.is_empty() {
            return (qualifiers, rest);
        }
        qualifiers.extend(more);
        rest = remaining;
    }
}

fn scan_qualifiers(tokens: &[String]) -> (Vec<String>, Vec<String>) {
    let lowered: Vec<String> = tokens.iter().map(|t| t.to_lowercase()).collect();
    let mut qualifiers = Vec::new();
    let mut rest = Vec::new();
    let mut i = 0;

    'scan: while i < tokens.len() {
        for phrase in QUALIFIER_PHRASES {
            let words: Vec<&str> = phrase.split(' ').collect();
            let end = i + words.len();
            if end <= lowered.len() && lowered[i..end].iter().zip(&words).all(|(t, w)| t == w) {
                qualifiers.push(phrase.to_string());
                i = end;
                continue 'scan;
            }
        }

        if SINGLE_QUALIFIERS.contains(lowered[i].as_str()) {
            qualifiers.push(lowered[i].clone());
        } else {
            rest.push(tokens[i].clone());
        }
        i += 1;
    }

    (qualifiers, rest)
}

/// Scan a clause for qualifiers; whatever remains becomes the clause note
pub fn extract_clause(clause: &str) -> ClauseExtraction {
    let tokens = tokenize(clause);
    let (qualifiers, rest) = extract_inline_qualifiers(&tokens);

    let meaningful = rest.iter().any(|t| {
        has_alphanumeric(t) && !CONNECTORS.contains(&t.to_lowercase().as_str())
    });

    let note = if meaningful {
        Some(
            rest.iter()
                .filter(|t| t.as_str() != ",")
                .cloned()
                .collect::<Vec<String>>()
                .join(" "),
        )
    } else {
        None
    };

    trace!("Clause '{}' -> qualifiers {:?}, note {:?}", clause, qualifiers, note);
    ClauseExtraction { qualifiers, note }
}

/// Concatenate qualifier groups in order, keeping the first occurrence of
/// each qualifier.
pub fn merge_qualifiers<I>(groups: I) -> Vec<String>
where
    I: IntoIterator<Item = Vec<String>>,
{
    let mut seen = HashSet::new();
    let mut merged = Vec::new();
    for qualifier in groups.into_iter().flatten() {
        if seen.insert(qualifier.clone()) {
            merged.push(qualifier);
        }
    }
    merged
}

/// "white" in "white onion" or "white wine" is a colour, not the egg part
fn is_adjective_use(hint: UnitHint, token: &str, index: usize, len: usize) -> bool {
    hint == UnitHint::White && token == "white" && index + 1 < len
}

/// Remove the last sub-part hint found in the name tokens, along with any
/// repeat of it. When nothing would be left of the name, the hint's head
/// noun stands in ("yolks" -> "egg"); hints without a head noun are then
/// left in the name.
///
/// # Examples
///
/// ```rust
/// use nutriparse::ingredient_model::UnitHint;
/// use nutriparse::qualifier_extractor::extract_unit_hint;
///
/// let tokens = vec!["egg".to_string(), "yolks".to_string()];
/// let (name, hint) = extract_unit_hint(tokens);
/// assert_eq!(name, vec!["egg".to_string()]);
/// assert_eq!(hint, Some(UnitHint::Yolk));
/// ```
pub fn extract_unit_hint(tokens: Vec<String>) -> (Vec<String>, Option<UnitHint>) {
    let found = tokens.iter().enumerate().rev().find_map(|(i, token)| {
        let lower = token.to_lowercase();
        let hint = UnitHint::from_token(&lower)?;
        (!is_adjective_use(hint, &lower, i, tokens.len())).then_some(hint)
    });

    let Some(hint) = found else {
        return (tokens, None);
    };

    let remaining: Vec<String> = tokens
        .iter()
        .filter(|t| UnitHint::from_token(&t.to_lowercase()) != Some(hint))
        .cloned()
        .collect();

    if remaining.iter().any(|t| has_alphanumeric(t)) {
        return (remaining, Some(hint));
    }

    match hint.head_noun() {
        Some(noun) => (vec![noun.to_string()], Some(hint)),
        None => (tokens, None),
    }
}
