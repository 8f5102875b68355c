//! # Quantity Tokenizer
//!
//! Reads the numeric quantity at the start of a token stream.
//!
//! ## Features
//!
//! - Integers and decimals ("2", "2.5", ".5")
//! - Unicode vulgar fractions, alone or fused onto a number ("½", "2½")
//! - Slash fractions and mixed numbers ("1/2", "1 1/2", "2 ½")
//! - Word numbers and word fractions ("one" to "twelve", "half", "quarter", "third")
//! - "<number> and a half" / "<number> and a quarter"
//! - Ranges with "-", "–", "—" or "to", collapsed to their mean ("2-3", "1½ to 2")
//!
//! ## Usage
//!
//! ```rust
//! use nutriparse::quantity_tokenizer::tokenize_quantity;
//!
//! let tokens = ["1", "1/2", "cups", "milk"];
//! let quantity = tokenize_quantity(&tokens).unwrap();
//! assert_eq!(quantity.qty, 1.5);
//! assert_eq!(quantity.consumed, 2);
//! ```

use crate::measurement_patterns::{
    vulgar_fraction_value, DECIMAL_REGEX, FUSED_FRACTION_REGEX, INLINE_RANGE_REGEX,
    SLASH_FRACTION_REGEX,
};
use log::trace;

/// Quantity read from the head of a token stream
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct QuantityToken {
    /// The numeric value, always finite and positive
    pub qty: f64,
    /// How many tokens the quantity occupied
    pub consumed: usize,
}

const NUMBER_WORDS: &[(&str, f64)] = &[
    ("one", 1.0),
    ("two", 2.0),
    ("three", 3.0),
    ("four", 4.0),
    ("five", 5.0),
    ("six", 6.0),
    ("seven", 7.0),
    ("eight", 8.0),
    ("nine", 9.0),
    ("ten", 10.0),
    ("eleven", 11.0),
    ("twelve", 12.0),
];

const WORD_FRACTIONS: &[(&str, f64)] = &[
    ("half", 1.0 / 2.0),
    ("quarter", 1.0 / 4.0),
    ("third", 1.0 / 3.0),
];

const RANGE_SEPARATORS: &[&str] = &["-", "–", "—", "to"];

/// Read a quantity from the first tokens. Returns `None` when token 0 is
/// not numeric or the value is zero, negative or non-finite.
pub fn tokenize_quantity<S: AsRef<str>>(tokens: &[S]) -> Option<QuantityToken> {
    let quantity = read_and_a_fraction(tokens)
        .or_else(|| read_inline_range(tokens))
        .or_else(|| read_range(tokens))?;

    if !quantity.qty.is_finite() || quantity.qty <= 0.0 {
        trace!("Rejected quantity {} from {:?}", quantity.qty, first(tokens));
        return None;
    }
    Some(quantity)
}

fn first<S: AsRef<str>>(tokens: &[S]) -> Option<&str> {
    tokens.first().map(|t| t.as_ref())
}

/// "one and a half", "2 and a quarter"
fn read_and_a_fraction<S: AsRef<str>>(tokens: &[S]) -> Option<QuantityToken> {
    if tokens.len() < 4 {
        return None;
    }
    let whole = parse_whole(tokens[0].as_ref())?;
    let and = tokens[1].as_ref().to_lowercase();
    let article = tokens[2].as_ref().to_lowercase();
    if and != "and" || !matches!(article.as_str(), "a" | "an") {
        return None;
    }
    let fraction = match tokens[3].as_ref().to_lowercase().as_str() {
        "half" => 0.5,
        "quarter" => 0.25,
        _ => return None,
    };
    Some(QuantityToken {
        qty: whole + fraction,
        consumed: 4,
    })
}

/// A range written inside one token: "2-3", "1½–2"
fn read_inline_range<S: AsRef<str>>(tokens: &[S]) -> Option<QuantityToken> {
    let caps = INLINE_RANGE_REGEX.captures(first(tokens)?)?;
    let low = parse_number(&caps[1])?;
    let high = parse_number(&caps[2])?;

    // "1-1/2" is a hyphenated mixed number, not a descending range; "0-1/2" is a range
    let qty = if parse_whole(&caps[1]).is_some_and(|w| w > 0.0)
        && pure_fraction(&caps[2]).is_some_and(|f| f < 1.0)
    {
        low + high
    } else {
        (low + high) / 2.0
    };

    Some(QuantityToken { qty, consumed: 1 })
}

/// A compound number, optionally followed by a separated range endpoint
fn read_range<S: AsRef<str>>(tokens: &[S]) -> Option<QuantityToken> {
    let (low, consumed) = read_compound(tokens, 0)?;

    if let Some(range) = read_mixed_range(tokens, low, consumed) {
        return Some(range);
    }

    if let Some(separator) = tokens.get(consumed) {
        let separator = separator.as_ref().to_lowercase();
        if RANGE_SEPARATORS.contains(&separator.as_str()) {
            if let Some((high, high_consumed)) = read_compound(tokens, consumed + 1) {
                return Some(QuantityToken {
                    qty: (low + high) / 2.0,
                    consumed: consumed + 1 + high_consumed,
                });
            }
        } else if let Some(high) = dash_prefixed(&separator) {
            // "2 -3", "2 –3"
            return Some(QuantityToken {
                qty: (low + high) / 2.0,
                consumed: consumed + 1,
            });
        }
    }

    Some(QuantityToken { qty: low, consumed })
}

/// A mixed number whose fraction carries the range dash: "1 1/2-2", "1 1/2- 2"
fn read_mixed_range<S: AsRef<str>>(tokens: &[S], whole: f64, consumed: usize) -> Option<QuantityToken> {
    if consumed != 1 || parse_whole(tokens[0].as_ref()).is_none() {
        return None;
    }
    let next = tokens.get(1)?.as_ref();

    if let Some(caps) = INLINE_RANGE_REGEX.captures(next) {
        let fraction = pure_fraction(&caps[1])?;
        let high = parse_number(&caps[2])?;
        return Some(QuantityToken {
            qty: (whole + fraction + high) / 2.0,
            consumed: 2,
        });
    }

    let fraction = pure_fraction(dash_suffixed(next)?)?;
    let (high, high_consumed) = read_compound(tokens, 2)?;
    Some(QuantityToken {
        qty: (whole + fraction + high) / 2.0,
        consumed: 2 + high_consumed,
    })
}

fn dash_suffixed(token: &str) -> Option<&str> {
    token
        .strip_suffix('-')
        .or_else(|| token.strip_suffix('–'))
        .or_else(|| token.strip_suffix('—'))
}

fn dash_prefixed(token: &str) -> Option<f64> {
    let rest = token
        .strip_prefix('-')
        .or_else(|| token.strip_prefix('–'))
        .or_else(|| token.strip_prefix('—'))?;
    parse_number(rest)
}

/// A number at `index`, joined with a following fraction when it forms a
/// mixed number ("1 1/2", "2 ½"). Returns the value and tokens consumed.
fn read_compound<S: AsRef<str>>(tokens: &[S], index: usize) -> Option<(f64, usize)> {
    let token = tokens.get(index)?.as_ref();
    let value = parse_number(token)?;

    if parse_whole(token).is_some() {
        if let Some(fraction) = tokens.get(index + 1).and_then(|t| pure_fraction(t.as_ref())) {
            return Some((value + fraction, 2));
        }
    }

    Some((value, 1))
}

/// Parse a single numeric token by any supported rule
pub fn parse_number(token: &str) -> Option<f64> {
    if DECIMAL_REGEX.is_match(token) {
        return token.parse::<f64>().ok();
    }

    if let Some(fraction) = pure_fraction(token) {
        return Some(fraction);
    }

    if let Some(caps) = FUSED_FRACTION_REGEX.captures(token) {
        let whole = caps[1].parse::<f64>().ok()?;
        let fraction = caps[2].chars().next().and_then(vulgar_fraction_value)?;
        return Some(whole + fraction);
    }

    let word = token.to_lowercase();
    NUMBER_WORDS
        .iter()
        .chain(WORD_FRACTIONS)
        .find(|(w, _)| *w == word)
        .map(|(_, value)| *value)
}

/// Digits-only integers and number words
fn parse_whole(token: &str) -> Option<f64> {
    if !token.is_empty() && token.chars().all(|c| c.is_ascii_digit()) {
        return token.parse::<f64>().ok();
    }
    let word = token.to_lowercase();
    NUMBER_WORDS
        .iter()
        .find(|(w, _)| *w == word)
        .map(|(_, value)| *value)
}

/// Slash fractions and lone vulgar fraction glyphs
fn pure_fraction(token: &str) -> Option<f64> {
    if let Some(caps) = SLASH_FRACTION_REGEX.captures(token) {
        let numerator = caps[1].parse::<f64>().ok()?;
        let denominator = caps[2].parse::<f64>().ok()?;
        if denominator == 0.0 {
            return None;
        }
        return Some(numerator / denominator);
    }

    let mut chars = token.chars();
    match (chars.next(), chars.next()) {
        (Some(glyph), None) => vulgar_fraction_value(glyph),
        _ => None,
    }
}
