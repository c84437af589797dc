// Random Forest analysis of river fitness against environmental covariates
//
// Usage: cargo run --release --bin random_forest_analysis [config.json]

use fms_forest::{AnalysisConfig, RiverFitnessAnalysis};
use std::path::PathBuf;
use std::time::Instant;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

fn main() -> anyhow::Result<()> {
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "fms_forest=info,warn".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    let config_path = std::env::args().nth(1).map(PathBuf::from);
    let config = AnalysisConfig::from_optional_path(config_path.as_deref())?;

    println!("\n{}", "=".repeat(80));
    println!("RIVER FITNESS RANDOM FOREST ANALYSIS");
    println!("{}", "=".repeat(80));
    match &config_path {
        Some(path) => println!("Config: {}", path.display()),
        None => println!("Config: defaults"),
    }
    println!("Genetic data: {}", config.genetic_path.display());
    println!("Environmental data: {}", config.environmental_path.display());
    println!("Grid: {} combinations, {}-fold CV", config.grid.len(), config.cv_folds);

    let start = Instant::now();
    let analysis = RiverFitnessAnalysis::new(config)?;
    let outcome = analysis.run()?;

    println!("\nBest parameters: {}", outcome.search.best_params().label());
    println!("Best CV R^2: {:.4}\n", outcome.search.best_score());
    println!("{}", outcome.metrics);

    let written = analysis.write_outputs(&outcome)?;
    println!("\nOutputs:");
    for path in &written {
        println!("  ✓ {}", path.display());
    }
    println!("\nTotal time: {:.2}s", start.elapsed().as_secs_f64());

    Ok(())
}
