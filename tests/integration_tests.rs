//! # Integration Tests
//!
//! A recipe block run through parsing, ranking and portion resolution
//! against a small catalog.

use nutriparse::candidate_ranker::RankerWeights;
use nutriparse::food_model::{CandidateFood, UserPortionOverride, Verification};
use nutriparse::ingredient_integration::{
    generate_ingredient_summary, generate_resolution_summary, resolve_ingredient_block,
    resolve_ingredient_line,
};
use nutriparse::ingredient_parser::parse_ingredient_list;
use nutriparse::portion_resolver::PortionSource;

fn catalog() -> Vec<CandidateFood> {
    vec![
        CandidateFood::new("flour", "Wheat flour")
            .with_kcal(364.0)
            .with_category("flour")
            .with_verification(Verification::Verified),
        CandidateFood::new("sugar", "Sugar, granulated")
            .with_kcal(387.0)
            .with_unit("1 tbsp", 12.5),
        CandidateFood::new("egg", "Egg, whole, raw").with_kcal(143.0),
        CandidateFood::new("butter", "Butter, salted")
            .with_kcal(717.0)
            .with_unit("1 stick", 113.0),
        CandidateFood::new("milk", "Whole milk")
            .with_kcal(61.0)
            .with_density(1.03),
        CandidateFood::new("whey", "Whey protein powder").with_kcal(400.0),
    ]
}

#[test]
fn test_recipe_block() {
    let catalog = catalog();
    let text = r#"
    Pancakes

    1 1/2 cups flour
    2 tbsp sugar
    2 large eggs
    1 cup whole milk
    2 tbsp butter, melted
    salt to taste
    "#;

    let results = resolve_ingredient_block(text, &catalog, &[], &RankerWeights::default());
    assert_eq!(results.len(), 7);
    assert!(results[0].parsed.is_none());
    assert!(results[6].parsed.is_none());

    let flour = &results[1];
    assert_eq!(flour.best_match().unwrap().candidate.id, "flour");
    assert_eq!(flour.portion.as_ref().unwrap().source, PortionSource::Density);
    assert!((flour.grams().unwrap() - 1.5 * 240.0 * 0.52).abs() < 1e-6);

    let sugar = &results[2];
    assert_eq!(sugar.best_match().unwrap().candidate.id, "sugar");
    assert_eq!(sugar.portion.as_ref().unwrap().source, PortionSource::FoodUnit);
    assert!((sugar.grams().unwrap() - 25.0).abs() < 1e-6);

    let eggs = &results[3];
    assert_eq!(eggs.best_match().unwrap().candidate.id, "egg");
    assert!((eggs.grams().unwrap() - 100.0).abs() < 1e-6);

    let milk = &results[4];
    assert_eq!(milk.best_match().unwrap().candidate.id, "milk");
    assert!((milk.grams().unwrap() - 240.0 * 1.03).abs() < 1e-6);

    let butter = &results[5];
    assert_eq!(butter.best_match().unwrap().candidate.id, "butter");
    assert_eq!(butter.parsed.as_ref().unwrap().qualifiers, ["melted"]);
    assert!((butter.grams().unwrap() - 30.0 * 0.95).abs() < 1e-6);

    let summary = generate_resolution_summary(&results);
    assert!(summary.contains("Resolved 5/7 lines"));
    assert!(summary.contains("✗ salt to taste"));
}

#[test]
fn test_user_override_applies_to_best_match() {
    let catalog = catalog();
    let overrides = vec![UserPortionOverride::new("u1", "whey", "scoop", None, 31.0)];
    let result = resolve_ingredient_line(
        "2 scoops whey protein powder",
        &catalog,
        &overrides,
        &RankerWeights::default(),
    );
    let portion = result.portion.as_ref().unwrap();
    assert_eq!(portion.source, PortionSource::UserOverride);
    assert_eq!(result.grams(), Some(62.0));
}

#[test]
fn test_serving_units_and_unresolved_lines() {
    let catalog = vec![CandidateFood::new("bar", "Protein bar").with_unit("1 serving (60 g)", 60.0)];
    let result = resolve_ingredient_line(
        "1 half serving protein bar",
        &catalog,
        &[],
        &RankerWeights::default(),
    );
    // Food-unit tier resolves it directly
    assert_eq!(result.portion.as_ref().unwrap().source, PortionSource::FoodUnit);
    assert_eq!(result.grams(), Some(30.0));

    let result = resolve_ingredient_line("1 bottle protein bar", &catalog, &[], &RankerWeights::default());
    assert!(!result.portion.as_ref().unwrap().is_resolved());
    assert!(result.fallback.is_none());
    assert!(!result.is_resolved());
}

#[test]
fn test_ingredient_summary() {
    let list = parse_ingredient_list("2 cups flour\n100 g sugar\n2 cloves garlic\nsome salt");
    let summary = generate_ingredient_summary(&list);
    assert!(summary.contains("Volume: flour"));
    assert!(summary.contains("Weight: sugar"));
    assert!(summary.contains("Whole items: garlic"));
    assert!(summary.contains("Could not parse: some salt"));
}

#[test]
fn test_results_serialize_to_json() {
    let catalog = catalog();
    let result = resolve_ingredient_line("2 tbsp sugar", &catalog, &[], &RankerWeights::default());
    let json = serde_json::to_value(&result).unwrap();
    assert_eq!(json["parsed"]["unit"], "tbsp");
    assert_eq!(json["portion"]["source"], "food_unit");
    assert_eq!(json["matches"][0]["candidate"]["id"], "sugar");
}
