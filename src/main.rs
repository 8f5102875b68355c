use anyhow::{Context, Result};
use log::{info, warn};
use nutriparse::config::AppConfig;
use nutriparse::ingredient_integration::{resolve_ingredient_line, LineResolution};
use serde_json::json;
use std::io::{self, BufRead, Write};

fn main() -> Result<()> {
    // Load environment variables from .env file
    dotenv::dotenv().ok();

    // Initialize logging
    env_logger::init();

    let config = AppConfig::from_env().context("Invalid configuration")?;
    let catalog = config.load_catalog().context("Failed to load food catalog")?;
    let overrides = config
        .load_overrides()
        .context("Failed to load portion overrides")?;
    let weights = config.load_weights().context("Failed to load ranker weights")?;

    info!(
        "Starting nutriparse with {} foods and {} portion overrides",
        catalog.len(),
        overrides.len()
    );

    let stdin = io::stdin();
    let stdout = io::stdout();
    let mut out = stdout.lock();

    for line in stdin.lock().lines() {
        let line = line.context("Failed to read input")?;
        if line.trim().is_empty() {
            continue;
        }

        let result = resolve_ingredient_line(&line, &catalog, &overrides, &weights);
        report(&result, config.low_confidence_threshold);

        let record = to_json(&result, config.max_candidates);
        writeln!(out, "{}", serde_json::to_string(&record)?)?;
    }

    Ok(())
}

fn report(result: &LineResolution<'_>, low_confidence: f64) {
    if result.parsed.is_none() {
        warn!("Could not parse line: '{}'", result.line);
        return;
    }

    match result.best_match() {
        None => warn!("No catalog match for '{}'", result.line),
        Some(best) if !result.is_resolved() => {
            warn!("No portion weight for '{}' as '{}'", result.line, best.candidate.name)
        }
        Some(best) => {
            let portion_confidence = result.portion.as_ref().map_or(0.0, |p| p.confidence);
            if best.confidence < low_confidence || portion_confidence < low_confidence {
                info!(
                    "Low confidence for '{}': match {:.2}, portion {:.2}",
                    result.line, best.confidence, portion_confidence
                );
            }
        }
    }
}

fn to_json(result: &LineResolution<'_>, max_candidates: usize) -> serde_json::Value {
    let matches: Vec<_> = result
        .matches
        .iter()
        .take(max_candidates)
        .map(|m| {
            json!({
                "id": m.candidate.id,
                "name": m.candidate.name,
                "score": m.score,
                "confidence": m.confidence,
            })
        })
        .collect();

    json!({
        "line": result.line,
        "parsed": result.parsed,
        "matches": matches,
        "portion": result.portion,
        "fallback": result.fallback,
        "grams": result.grams(),
    })
}
