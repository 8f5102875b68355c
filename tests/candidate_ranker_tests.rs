//! # Candidate Ranker Tests

use nutriparse::candidate_ranker::{
    rank_candidates, rank_candidates_with_weights, score_candidate, RankOptions, RankQuery,
    RankerWeights,
};
use nutriparse::food_model::{CandidateFood, Verification};
use nutriparse::ingredient_model::UnitHint;

fn ids(catalog: &[CandidateFood], query: &str) -> Vec<String> {
    rank_candidates(catalog, &RankOptions::new(query))
        .iter()
        .map(|r| r.candidate.id.clone())
        .collect()
}

#[test]
fn test_empty_catalog() {
    assert!(rank_candidates(&[], &RankOptions::new("olive oil")).is_empty());
}

#[test]
fn test_exact_name_beats_composite_dish() {
    let catalog = vec![
        CandidateFood::new("dressing", "Olive oil dressing, with herbs").with_kcal(300.0),
        CandidateFood::new("olives", "Olives, green").with_kcal(145.0),
        CandidateFood::new("oil", "Olive oil")
            .with_kcal(884.0)
            .with_verification(Verification::Verified),
    ];
    let ranked = ids(&catalog, "olive oil");
    assert_eq!(ranked.len(), 3);
    assert_eq!(ranked[0], "oil");
}

#[test]
fn test_plausible_energy_wins() {
    let catalog = vec![
        CandidateFood::new("typo", "Olive oil").with_kcal(90.0),
        CandidateFood::new("real", "Olive oil").with_kcal(884.0),
    ];
    assert_eq!(ids(&catalog, "olive oil"), ["real", "typo"]);
}

#[test]
fn test_verification_order() {
    let catalog = vec![
        CandidateFood::new("s", "Greek yogurt").with_verification(Verification::Suspect),
        CandidateFood::new("u", "Greek yogurt"),
        CandidateFood::new("v", "Greek yogurt").with_verification(Verification::Verified),
    ];
    assert_eq!(ids(&catalog, "greek yogurt"), ["v", "u", "s"]);
}

#[test]
fn test_barcode_match() {
    let catalog = vec![
        CandidateFood::new("popular", "Peanut butter").with_popularity(9000),
        CandidateFood::new("scanned", "Crunchy spread").with_barcode("0-12345-67890-5"),
    ];
    assert_eq!(ids(&catalog, "012345678905")[0], "scanned");
}

#[test]
fn test_alias_match() {
    let catalog = vec![
        CandidateFood::new("avocado", "Avocado"),
        CandidateFood::new("eggplant", "Eggplant").with_alias("Aubergine"),
    ];
    assert_eq!(ids(&catalog, "aubergine")[0], "eggplant");
}

#[test]
fn test_brand_in_query() {
    let catalog = vec![
        CandidateFood::new("generic", "Peanut butter"),
        CandidateFood::new("branded", "Peanut butter").with_brand("Skippy"),
    ];
    assert_eq!(ids(&catalog, "skippy peanut butter")[0], "branded");
}

#[test]
fn test_processed_food_is_down_weighted_unless_asked_for() {
    let catalog = vec![
        CandidateFood::new("fried", "Chicken breast, fried"),
        CandidateFood::new("raw", "Chicken breast, raw"),
    ];
    assert_eq!(ids(&catalog, "chicken breast")[0], "raw");
    assert_eq!(ids(&catalog, "fried chicken breast")[0], "fried");
}

#[test]
fn test_popularity_and_usage_break_ties() {
    let catalog = vec![
        CandidateFood::new("rare", "Banana"),
        CandidateFood::new("popular", "Banana").with_popularity(5000),
    ];
    assert_eq!(ids(&catalog, "banana"), ["popular", "rare"]);

    let catalog = vec![
        CandidateFood::new("other", "Banana"),
        CandidateFood::new("mine", "Banana").with_usage_count(12),
    ];
    assert_eq!(ids(&catalog, "banana"), ["mine", "other"]);
}

#[test]
fn test_equal_scores_keep_input_order() {
    let catalog: Vec<CandidateFood> = (0..5)
        .map(|i| CandidateFood::new(&format!("id{}", i), "Brown rice"))
        .collect();
    assert_eq!(ids(&catalog, "brown rice"), ["id0", "id1", "id2", "id3", "id4"]);
}

#[test]
fn test_unit_hint_bonus() {
    let catalog = vec![
        CandidateFood::new("plain", "Garlic"),
        CandidateFood::new("cloves", "Garlic").with_unit("1 clove", 3.0),
    ];
    let options = RankOptions::new("garlic").with_unit_hint(Some(UnitHint::Clove));
    let ranked = rank_candidates(&catalog, &options);
    assert_eq!(ranked[0].candidate.id, "cloves");
}

#[test]
fn test_category_boost() {
    let weights = RankerWeights::default();
    let query = RankQuery::new(&RankOptions::new("vanilla protein powder"));
    let whey = CandidateFood::new("a", "Vanilla powder").with_category("Whey protein");
    let plain = CandidateFood::new("b", "Vanilla powder");
    let boosted = score_candidate(&whey, &query, &weights);
    let unboosted = score_candidate(&plain, &query, &weights);
    assert!((boosted - unboosted - weights.category_boost * weights.unverified).abs() < 1e-9);
}

#[test]
fn test_custom_weights() {
    let catalog = vec![
        CandidateFood::new("match", "Rolled oats"),
        CandidateFood::new("popular", "Cornflakes").with_popularity(10_000),
    ];
    let weights = RankerWeights {
        fuzzy: 0.0,
        coverage: 0.0,
        popularity: 10.0,
        ..RankerWeights::default()
    };
    let ranked = rank_candidates_with_weights(&catalog, &RankOptions::new("rolled oats"), &weights);
    assert_eq!(ranked[0].candidate.id, "popular");
}

#[test]
fn test_input_is_not_mutated_and_confidence_is_bounded() {
    let catalog = vec![
        CandidateFood::new("1", "Whole milk").with_kcal(61.0).with_popularity(100),
        CandidateFood::new("2", "Milk chocolate").with_kcal(535.0),
        CandidateFood::new("3", "Almond milk, unsweetened").with_kcal(15.0),
    ];
    let before = catalog.clone();
    let long = "milk ".repeat(200);

    for query in ["milk", "", "   ", "🥛🥛🥛", "!!!", long.as_str()] {
        let ranked = rank_candidates(&catalog, &RankOptions::new(query));
        assert_eq!(ranked.len(), catalog.len());
        for entry in &ranked {
            assert!(entry.score.is_finite() && entry.score >= 0.0, "{:?}", query);
            assert!((0.0..=1.0).contains(&entry.confidence), "{:?}", query);
        }
        for pair in ranked.windows(2) {
            assert!(pair[0].score >= pair[1].score);
        }
    }
    assert_eq!(catalog, before);
}
