// Per-river row counts after the genetic filter
//
// Usage: cargo run --bin inspect_rivers [config.json]

use fms_forest::{filter_genetic, river_counts, AnalysisConfig, FilterCriteria, StudyData};
use std::path::PathBuf;
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

    let genetic = StudyData::load_genetic(&config.genetic_path)?;
    let criteria = FilterCriteria::from_config(&config);
    let filtered = filter_genetic(&genetic, &criteria)?;
    let counts = river_counts(&filtered)?;

    println!("\n=== RIVERS AFTER FILTERING (genID == {:?}) ===\n", criteria.gen_id);
    println!("River\tCount");
    for rc in &counts {
        println!("{}\t{}", rc.river, rc.count);
    }
    println!("\n{} rivers, {} rows", counts.len(), filtered.height());

    Ok(())
}
