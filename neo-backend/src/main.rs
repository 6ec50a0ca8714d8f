use neo_backend::config;
use neo_backend::extract::{load_approaches, load_neos};
use neo_backend::{NeoDatabase, create_filters, limit};

use anyhow::{Context, Result};

#[tokio::main]
async fn main() -> Result<()> {
    // Load configuration
    let config = config::read_config()?;

    // Initialize logging
    let _logging_guard = neo_backend::logging::init_logging(
        &config.log_dir,
        "neo-backend",
        &config.log_level,
    )?;

    tracing::info!("NEO backend starting...");

    let (neos, approaches) = tokio::try_join!(
        load_neos(&config.neo_csv_path),
        load_approaches(&config.cad_json_path),
    )?;

    let database = NeoDatabase::new(neos, approaches);

    let Some(query) = &config.query else {
        tracing::info!("No query configured, exiting");
        return Ok(());
    };

    let filters = create_filters(&query.criteria).context("Invalid query in configuration")?;
    tracing::info!(
        "Running query with {} filters (limit: {:?})",
        filters.len(),
        query.limit
    );

    let mut matched = 0;
    for approach in limit(database.query(&filters), query.limit) {
        matched += 1;
        tracing::info!("{}", approach);
    }

    tracing::info!("Query returned {} close approaches", matched);
    Ok(())
}
