//! # Nutriparse
//!
//! Turns free-text recipe ingredient lines into weighed catalog foods.
//!
//! - [`ingredient_parser`] reads a line such as "2½ cups flour" into a
//!   [`ingredient_model::ParsedIngredient`].
//! - [`portion_resolver`] converts a parsed line into grams of one food
//!   through a fixed chain of tiers, from a stated mass down to keyword
//!   heuristics.
//! - [`candidate_ranker`] orders catalog foods against a free-text query.
//! - [`ingredient_integration`] runs all three for a line or a block.
//!
//! Everything except [`config`] is pure and synchronous; bad input yields
//! `None`, an unresolved portion or an empty list, never a panic.

pub mod candidate_ranker;
pub mod config;
pub mod density_data;
pub mod errors;
pub mod food_model;
pub mod ingredient_integration;
pub mod ingredient_model;
pub mod ingredient_parser;
pub mod measurement_patterns;
pub mod plausibility;
pub mod portion_heuristics;
pub mod portion_resolver;
pub mod qualifier_extractor;
pub mod quantity_tokenizer;
pub mod serving_options;
pub mod text_processing;
pub mod unit_normalizer;

pub use candidate_ranker::{rank_candidates, RankOptions, RankedCandidate, RankerWeights};
pub use food_model::CandidateFood;
pub use ingredient_integration::resolve_ingredient_line;
pub use ingredient_model::ParsedIngredient;
pub use ingredient_parser::{parse_ingredient_line, parse_ingredient_list};
pub use portion_resolver::{resolve_portion, PortionResolution};
