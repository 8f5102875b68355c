//! # Text Processing Module
//!
//! This module provides the low-level text utilities shared by the parser,
//! the portion resolver and the candidate ranker.
//!
//! ## Features
//!
//! - Unicode whitespace folding (no-break, thin and ideographic spaces)
//! - Parenthetical clause extraction with tolerance for unbalanced brackets
//! - Tokenization with standalone commas and fused-token splitting
//!   ("200g" -> "200" "g", "1-inch" -> "1" "inch", "2x200g" -> "2" "x" "200" "g")
//! - Singularization, including irregular plurals (leaves -> leaf)
//! - Lowercased match tokens for case-insensitive comparisons

use crate::measurement_patterns::{FUSED_MULTIPLY_REGEX, FUSED_WORD_REGEX};
use log::trace;
use std::collections::HashMap;
use std::sync::LazyLock;

/// Irregular plural forms and words that must never lose their trailing "s"
static IRREGULAR_SINGULARS: LazyLock<HashMap<&'static str, &'static str>> = LazyLock::new(|| {
    let mut map = HashMap::new();

    map.insert("leaves", "leaf");
    map.insert("loaves", "loaf");
    map.insert("halves", "half");
    map.insert("knives", "knife");
    map.insert("potatoes", "potato");
    map.insert("tomatoes", "tomato");
    map.insert("mangoes", "mango");
    map.insert("cookies", "cookie");
    map.insert("brownies", "brownie");
    map.insert("smoothies", "smoothie");
    map.insert("calories", "calorie");
    map.insert("anchovies", "anchovy");
    map.insert("molasses", "molasses");
    map.insert("hummus", "hummus");
    map.insert("asparagus", "asparagus");
    map.insert("couscous", "couscous");
    map.insert("swiss", "swiss");
    map.insert("oats", "oats");
    map.insert("grits", "grits");

    map
});

/// Characters that separate words but are not caught by `char::is_whitespace`
const ZERO_WIDTH: &[char] = &['\u{200B}', '\u{200C}', '\u{200D}', '\u{2060}', '\u{FEFF}'];

/// Replace every unicode whitespace variant with a plain space and drop
/// zero-width characters.
pub fn normalize_whitespace(text: &str) -> String {
    text.chars()
        .filter(|c| !ZERO_WIDTH.contains(c))
        .map(|c| if c.is_whitespace() { ' ' } else { c })
        .collect()
}

/// Split a line into its main text and the contents of its parenthetical
/// clauses. Nested brackets are flattened into the outer clause and an
/// unclosed bracket runs to the end of the line.
///
/// # Examples
///
/// ```rust
/// use nutriparse::text_processing::extract_parentheticals;
///
/// let (main, clauses) = extract_parentheticals("1 stick (113g) butter");
/// assert_eq!(main.split_whitespace().collect::<Vec<_>>(), ["1", "stick", "butter"]);
/// assert_eq!(clauses, vec!["113g".to_string()]);
/// ```
pub fn extract_parentheticals(text: &str) -> (String, Vec<String>) {
    let mut main = String::with_capacity(text.len());
    let mut clauses = Vec::new();
    let mut current = String::new();
    let mut depth = 0usize;

    for c in text.chars() {
        match c {
            '(' => {
                if depth > 0 {
                    current.push(' ');
                }
                depth += 1;
                main.push(' ');
            }
            ')' if depth > 0 => {
                depth -= 1;
                if depth == 0 {
                    push_clause(&mut clauses, &current);
                    current.clear();
                } else {
                    current.push(' ');
                }
            }
            ')' => main.push(' '),
            _ if depth > 0 => current.push(c),
            _ => main.push(c),
        }
    }

    if depth > 0 {
        push_clause(&mut clauses, &current);
    }

    (main, clauses)
}

fn push_clause(clauses: &mut Vec<String>, clause: &str) {
    let clause = clause.trim();
    if !clause.is_empty() {
        clauses.push(clause.to_string());
    }
}

/// Tokenize a line on whitespace, isolating commas and semicolons as
/// standalone "," tokens and splitting fused number/word tokens.
///
/// # Examples
///
/// ```rust
/// use nutriparse::text_processing::tokenize;
///
/// assert_eq!(tokenize("2 x 200g chicken, diced"), ["2", "x", "200", "g", "chicken", ",", "diced"]);
/// ```
pub fn tokenize(text: &str) -> Vec<String> {
    let spaced = text.replace([',', ';'], " , ");
    let tokens: Vec<String> = spaced
        .split_whitespace()
        .map(clean_token)
        .flat_map(split_fused_token)
        .collect();
    trace!("Tokenized '{}' -> {:?}", text, tokens);
    tokens
}

/// Strip sentence punctuation from the end of a token ("tbsp." -> "tbsp").
/// Punctuation-only tokens are kept as they are.
fn clean_token(token: &str) -> &str {
    let cleaned = token.trim_end_matches(['.', ':', '!', '?']);
    if cleaned.is_empty() {
        token
    } else {
        cleaned
    }
}

fn split_fused_token(token: &str) -> Vec<String> {
    if let Some(caps) = FUSED_MULTIPLY_REGEX.captures(token) {
        let mut parts = vec![caps[1].to_string(), "x".to_string()];
        parts.extend(split_fused_word(&caps[2]));
        return parts;
    }
    split_fused_word(token)
}

fn split_fused_word(token: &str) -> Vec<String> {
    if let Some(caps) = FUSED_WORD_REGEX.captures(token) {
        let suffix = caps[2].to_lowercase();
        // Ordinals stay whole ("2nd" is not a quantity)
        if !matches!(suffix.as_str(), "st" | "nd" | "rd" | "th") {
            return vec![caps[1].to_string(), caps[2].to_string()];
        }
    }
    vec![token.to_string()]
}

/// Whether a token contains at least one letter or digit
pub fn has_alphanumeric(token: &str) -> bool {
    token.chars().any(char::is_alphanumeric)
}

/// Reduce an English plural to its singular form. Only lowercase ASCII
/// words longer than three letters are touched.
///
/// # Examples
///
/// ```rust
/// use nutriparse::text_processing::singularize;
///
/// assert_eq!(singularize("cloves"), "clove");
/// assert_eq!(singularize("leaves"), "leaf");
/// assert_eq!(singularize("berries"), "berry");
/// assert_eq!(singularize("pinches"), "pinch");
/// assert_eq!(singularize("glass"), "glass");
/// ```
pub fn singularize(word: &str) -> String {
    if let Some(singular) = IRREGULAR_SINGULARS.get(word) {
        return singular.to_string();
    }

    if word.len() <= 3 || !word.chars().all(|c| c.is_ascii_lowercase()) {
        return word.to_string();
    }

    if let Some(stem) = word.strip_suffix("ies") {
        if stem.len() >= 2 {
            return format!("{}y", stem);
        }
    }

    for suffix in ["ches", "shes", "sses", "xes", "zes"] {
        if word.ends_with(suffix) {
            return word[..word.len() - 2].to_string();
        }
    }

    if word.ends_with('s') && !word.ends_with("ss") && !word.ends_with("us") && !word.ends_with("is")
    {
        return word[..word.len() - 1].to_string();
    }

    word.to_string()
}

/// Lowercased, singularized word tokens of a free-text string. Hyphenated
/// words ("extra-large", "fl-oz") stay whole.
pub fn match_tokens(text: &str) -> Vec<String> {
    text.to_lowercase()
        .split(|c: char| !(c.is_alphanumeric() || c == '-'))
        .map(|t| t.trim_matches('-'))
        .filter(|t| !t.is_empty())
        .map(singularize)
        .collect()
}

/// Lowercase a string and collapse every run of non-alphanumeric characters
/// into one space.
pub fn normalize_phrase(text: &str) -> String {
    text.to_lowercase()
        .split(|c: char| !c.is_alphanumeric())
        .filter(|t| !t.is_empty())
        .collect::<Vec<&str>>()
        .join(" ")
}

/// Whether `keyword` (one or more words) occurs in `text` on word
/// boundaries, allowing a plural "s" on its last word.
pub fn contains_keyword(text: &str, keyword: &str) -> bool {
    let phrase = format!(" {} ", normalize_phrase(text));
    let keyword = normalize_phrase(keyword);
    !keyword.is_empty()
        && (phrase.contains(&format!(" {} ", keyword)) || phrase.contains(&format!(" {}s ", keyword)))
}
