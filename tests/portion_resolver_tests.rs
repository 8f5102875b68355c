//! # Portion Resolver Tests
//!
//! Parsed lines resolved against catalog foods, one tier at a time.

use nutriparse::food_model::{CandidateFood, UserPortionOverride};
use nutriparse::ingredient_parser::parse_ingredient_line;
use nutriparse::portion_resolver::{resolve_portion, PortionResolution, PortionSource};
use nutriparse::serving_options::{derive_serving_options, find_serving_option};

fn resolve(line: &str, food: &CandidateFood, overrides: &[UserPortionOverride]) -> PortionResolution {
    let parsed = parse_ingredient_line(line).unwrap();
    resolve_portion(food, &parsed, overrides)
}

fn assert_grams(portion: &PortionResolution, expected: f64) {
    let grams = portion.grams.expect("resolved grams");
    assert!((grams - expected).abs() < 1e-6, "expected {} g, got {} g", expected, grams);
}

#[test]
fn test_multiplied_mass() {
    let chicken = CandidateFood::new("chicken", "Chicken breast, raw");
    let portion = resolve("2 x 200g chicken", &chicken, &[]);
    assert_eq!(portion.source, PortionSource::DirectMass);
    assert_eq!(portion.tier, 0);
    assert_grams(&portion, 400.0);
}

#[test]
fn test_mass_wins_over_every_override() {
    let food = CandidateFood::new("rice", "Rice")
        .with_portion_override("g", None, 2.0)
        .with_unit("1 g", 5.0);
    let overrides = vec![UserPortionOverride::new("u", "rice", "g", None, 3.0)];
    let portion = resolve("100 g rice", &food, &overrides);
    assert_eq!(portion.source, PortionSource::DirectMass);
    assert_grams(&portion, 100.0);
}

#[test]
fn test_olive_oil_by_density() {
    let oil = CandidateFood::new("oil", "Olive oil").with_density(0.91);
    let portion = resolve("0.5 cup olive oil", &oil, &[]);
    assert_eq!(portion.source, PortionSource::Density);
    assert_eq!(portion.matched_unit.as_deref(), Some("cup"));
    assert_grams(&portion, 109.2);
}

#[test]
fn test_density_from_category_table() {
    let oil = CandidateFood::new("oil", "Sunflower").with_category("Oils");
    let portion = resolve("1 tbsp sunflower oil", &oil, &[]);
    assert_eq!(portion.source, PortionSource::Density);
    assert_grams(&portion, 15.0 * 0.91);
}

#[test]
fn test_garlic_cloves_heuristic() {
    let garlic = CandidateFood::new("garlic", "Garlic, raw");
    let portion = resolve("2 cloves garlic", &garlic, &[]);
    assert_eq!(portion.source, PortionSource::Heuristic);
    assert_eq!(portion.tier, 5);
    assert_grams(&portion, 6.0);

    let portion = resolve("2 large cloves garlic", &garlic, &[]);
    assert_grams(&portion, 8.0);
}

#[test]
fn test_half_avocado() {
    let avocado = CandidateFood::new("avocado", "Avocados, raw");
    let portion = resolve("half avocado", &avocado, &[]);
    assert_eq!(portion.source, PortionSource::Heuristic);
    assert_grams(&portion, 68.0);
}

#[test]
fn test_egg_parts_and_sizes() {
    let egg = CandidateFood::new("egg", "Egg, whole, raw");
    assert_grams(&resolve("2 egg yolks", &egg, &[]), 34.0);
    assert_grams(&resolve("3 egg whites", &egg, &[]), 99.0);
    assert_grams(&resolve("2 large eggs", &egg, &[]), 100.0);
    assert_grams(&resolve("2 small eggs", &egg, &[]), 76.0);
}

#[test]
fn test_celery_and_ginger() {
    let celery = CandidateFood::new("celery", "Celery, raw");
    assert_grams(&resolve("2 stalks celery", &celery, &[]), 80.0);

    let ginger = CandidateFood::new("ginger", "Ginger root");
    let portion = resolve("1 inch ginger, grated", &ginger, &[]);
    assert_eq!(portion.source, PortionSource::Heuristic);
    assert_grams(&portion, 11.0);
}

#[test]
fn test_user_override_beats_curated_override() {
    let whey = CandidateFood::new("whey", "Whey protein")
        .with_portion_override("scoop", None, 30.0)
        .with_unit("1 scoop", 28.0);
    let overrides = vec![UserPortionOverride::new("u1", "whey", "scoop", None, 33.0)];

    let portion = resolve("2 scoops whey protein", &whey, &overrides);
    assert_eq!(portion.source, PortionSource::UserOverride);
    assert_eq!(portion.confidence, 1.0);
    assert_grams(&portion, 66.0);

    let portion = resolve("2 scoops whey protein", &whey, &[]);
    assert_eq!(portion.source, PortionSource::PortionOverride);
    assert_eq!(portion.tier, 2);
    assert_grams(&portion, 60.0);

    let no_overrides = CandidateFood { portion_overrides: Vec::new(), ..whey };
    let portion = resolve("2 scoops whey protein", &no_overrides, &[]);
    assert_eq!(portion.source, PortionSource::FoodUnit);
    assert_grams(&portion, 56.0);
}

#[test]
fn test_override_label_matches_qualifier() {
    let potato = CandidateFood::new("potato", "Potato")
        .with_portion_override("piece", Some("medium"), 173.0)
        .with_portion_override("piece", Some("large"), 299.0);
    let portion = resolve("1 large potato", &potato, &[]);
    assert_eq!(portion.source, PortionSource::PortionOverride);
    assert_eq!(portion.matched_label.as_deref(), Some("large"));
    assert_grams(&portion, 299.0);
}

#[test]
fn test_unusable_override_does_not_hide_valid_one() {
    let garlic = CandidateFood::new("garlic", "Garlic, raw")
        .with_portion_override("clove", Some("large"), 0.0)
        .with_portion_override("clove", None, 3.5);
    let portion = resolve("2 large cloves garlic", &garlic, &[]);
    assert_eq!(portion.source, PortionSource::PortionOverride);
    assert_grams(&portion, 7.0);

    let overrides = vec![
        UserPortionOverride::new("u1", "garlic", "clove", Some("large"), -1.0),
        UserPortionOverride::new("u1", "garlic", "clove", None, 4.5),
    ];
    let plain = CandidateFood::new("garlic", "Garlic, raw");
    let portion = resolve("2 large cloves garlic", &plain, &overrides);
    assert_eq!(portion.source, PortionSource::UserOverride);
    assert_grams(&portion, 9.0);
}

#[test]
fn test_food_unit_prefers_qualifier_match() {
    let onion = CandidateFood::new("onion", "Onions, raw")
        .with_unit("1 cup, sliced", 115.0)
        .with_unit("1 cup, chopped", 160.0);
    let portion = resolve("1 cup onion, chopped", &onion, &[]);
    assert_eq!(portion.source, PortionSource::FoodUnit);
    assert_grams(&portion, 160.0);
}

#[test]
fn test_unresolved_then_serving_fallback() {
    let bar = CandidateFood::new("bar", "Protein bar").with_unit("1 bar (60 g)", 60.0);
    let parsed = parse_ingredient_line("1 package protein bar").unwrap();
    let portion = resolve_portion(&bar, &parsed, &[]);
    assert!(!portion.is_resolved());
    assert_eq!(portion.confidence, 0.0);
    assert_eq!(portion.tier, 6);

    let options = derive_serving_options(&bar);
    assert!(find_serving_option(&options, &parsed).is_none());

    let parsed = parse_ingredient_line("2 tbsp protein bar").unwrap();
    let option = find_serving_option(&options, &parsed).unwrap();
    assert_eq!(option.label, "tbsp");
}

#[test]
fn test_confidence_never_increases_with_tier() {
    let egg = CandidateFood::new("egg", "Egg")
        .with_density(1.03)
        .with_unit("1 cup", 243.0);
    let overrides = vec![UserPortionOverride::new("u", "egg", "piece", None, 55.0)];
    let lines = ["100 g egg", "2 eggs", "1 cup egg", "1 tbsp egg", "2 egg yolks", "1 package egg"];

    let portions: Vec<PortionResolution> = lines
        .iter()
        .map(|line| resolve(line, &egg, &overrides))
        .collect();
    let tiers: Vec<u8> = portions.iter().map(|p| p.tier).collect();
    assert_eq!(tiers, [0, 1, 3, 4, 5, 6]);

    for pair in portions.windows(2) {
        assert!(pair[0].confidence >= pair[1].confidence);
    }
}
