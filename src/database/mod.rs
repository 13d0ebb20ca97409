pub mod manager;
pub mod migrations;
pub mod models;
pub mod repository;

pub use manager::{Database, DatabaseError};

use anyhow::Result;

/// Run migrations and seed the bootstrap admin. Called once at startup;
/// the caller decides whether a failure is fatal (the server keeps serving
/// degraded when the database is down, and the health endpoint reports it).
pub async fn prepare() -> Result<()> {
    migrations::run().await?;
    migrations::bootstrap_admin().await?;
    Ok(())
}
