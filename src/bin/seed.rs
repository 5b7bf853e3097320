//! Development seeding for the two reference collections
//!
//! The HTTP surface never mutates brands or services, so a fresh database
//! needs them inserted out of band. Safe to re-run; names already present
//! are skipped.

use anyhow::Result;
use chainstay::config::AppConfig;
use chainstay::storage::{MongoStore, connect};
use tracing_subscriber::EnvFilter;

const BRANDS: &[&str] = &[
    "Brompton",
    "Polygon",
    "Giant",
    "Cannondale",
    "Specialized",
    "Bianchi",
];

const SERVICES: &[&str] = &[
    "Wash",
    "Tune Up",
    "Brake Replacement",
    "Chain Replacement",
    "Wheel Truing",
    "Full Overhaul",
];

#[tokio::main]
async fn main() -> Result<()> {
    dotenvy::dotenv().ok();

    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| "info".into()))
        .init();

    let config = AppConfig::from_env()?;
    let database = connect(&config.mongo_uri, &config.database_name).await?;
    let store = MongoStore::new(database);

    let mut inserted = 0usize;
    for name in BRANDS {
        if store.ensure_brand(name).await? {
            inserted += 1;
        }
    }
    for name in SERVICES {
        if store.ensure_service(name).await? {
            inserted += 1;
        }
    }

    tracing::info!(
        inserted,
        skipped = BRANDS.len() + SERVICES.len() - inserted,
        "reference collections seeded"
    );

    Ok(())
}
