//! Seeds the service catalog reference data
//!
//! Run with: cargo run --bin seed-catalog
//!
//! Uses the same configuration as the server (config/*.toml, APP__* env),
//! applies pending migrations and inserts the default catalog when the
//! services table is empty.

use anyhow::Context;
use tracing::info;

use care_directory::{config, db, services::catalog};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cfg = config::load_config().context("failed to load configuration")?;
    config::init_tracing(cfg.log_level(), cfg.log_json);

    info!("=== Care Directory catalog seed ===");

    let pool = db::establish_connection_from_app_config(&cfg)
        .await
        .context("failed to connect to the database")?;
    db::run_migrations(&pool)
        .await
        .context("failed to run migrations")?;

    let inserted = catalog::seed_default_catalog(&pool)
        .await
        .context("failed to seed service catalog")?;

    info!(inserted, "Catalog seed complete");
    info!("Try: curl http://localhost:{}/api/v1/services", cfg.port);
    Ok(())
}
