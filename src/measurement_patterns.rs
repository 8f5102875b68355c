//! # Measurement Patterns Module
//!
//! This module contains the regex patterns used to recognize the shape of a
//! single numeric token. Every pattern is anchored and matched against one
//! whitespace-delimited token, never against a whole line.

use lazy_static::lazy_static;
use regex::Regex;

/// Unicode vulgar fraction glyphs understood by the quantity tokenizer
pub const VULGAR_FRACTIONS: &[(char, f64)] = &[
    ('½', 1.0 / 2.0),
    ('¼', 1.0 / 4.0),
    ('¾', 3.0 / 4.0),
    ('⅓', 1.0 / 3.0),
    ('⅔', 2.0 / 3.0),
    ('⅛', 1.0 / 8.0),
    ('⅜', 3.0 / 8.0),
    ('⅝', 5.0 / 8.0),
    ('⅞', 7.0 / 8.0),
];

// Plain integers and decimals: "2", "2.5", ".5"
const DECIMAL_PATTERN: &str = r"^(?:[0-9]+(?:\.[0-9]+)?|\.[0-9]+)$";

// Slash fractions, including the unicode fraction slash: "1/2", "3⁄4"
const SLASH_FRACTION_PATTERN: &str = r"^([0-9]+)[/⁄]([0-9]+)$";

// A vulgar fraction glyph fused onto a leading number: "2½"
const FUSED_FRACTION_PATTERN: &str = r"^([0-9]+)([½¼¾⅓⅔⅛⅜⅝⅞])$";

// Two endpoints joined by a hyphen, en-dash or em-dash: "2-3", "1½–2"
const INLINE_RANGE_PATTERN: &str = r"^([^\-–—\s]+)[\-–—]([^\-–—\s]+)$";

// A number fused onto a word: "200g", "1-inch", "2x", "1/2cup"
const FUSED_WORD_PATTERN: &str =
    r"^([0-9]+(?:\.[0-9]+)?|[0-9]+/[0-9]+|[½¼¾⅓⅔⅛⅜⅝⅞])-?(\p{Alphabetic}+)$";

// A multiplication fused between two numbers: "2x200g", "3×50"
const FUSED_MULTIPLY_PATTERN: &str = r"^([0-9]+(?:\.[0-9]+)?)[xX×]([0-9].*)$";

lazy_static! {
    pub static ref DECIMAL_REGEX: Regex =
        Regex::new(DECIMAL_PATTERN).expect("Decimal pattern should be valid");
    pub static ref SLASH_FRACTION_REGEX: Regex =
        Regex::new(SLASH_FRACTION_PATTERN).expect("Slash fraction pattern should be valid");
    pub static ref FUSED_FRACTION_REGEX: Regex =
        Regex::new(FUSED_FRACTION_PATTERN).expect("Fused fraction pattern should be valid");
    pub static ref INLINE_RANGE_REGEX: Regex =
        Regex::new(INLINE_RANGE_PATTERN).expect("Inline range pattern should be valid");
    pub static ref FUSED_WORD_REGEX: Regex =
        Regex::new(FUSED_WORD_PATTERN).expect("Fused word pattern should be valid");
    pub static ref FUSED_MULTIPLY_REGEX: Regex =
        Regex::new(FUSED_MULTIPLY_PATTERN).expect("Fused multiply pattern should be valid");
}

/// Value of a single vulgar fraction glyph
pub fn vulgar_fraction_value(c: char) -> Option<f64> {
    VULGAR_FRACTIONS
        .iter()
        .find(|(glyph, _)| *glyph == c)
        .map(|(_, value)| *value)
}
