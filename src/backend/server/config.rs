/**
 * Server Configuration
 *
 * Loads the resources the server needs before it can accept requests: the
 * private signing key and the credential store.
 *
 * # Store Selection
 *
 * With `DATABASE_URL` set the server connects to PostgreSQL and runs the
 * embedded migrations; a connection or migration failure is fatal. Without
 * it the server falls back to the in-memory store and says so in the log.
 */

use std::path::Path;

use crate::backend::server::init::StartupError;
use crate::backend::store::{MemoryStore, PgStore};
use crate::shared::{AppConfig, ConfigError};

/// The store selected at startup
#[derive(Debug, Clone)]
pub enum StoreBackend {
    Postgres(PgStore),
    Memory(MemoryStore),
}

/// Read the PEM encoded private key.
pub fn load_private_key(path: &Path) -> Result<Vec<u8>, ConfigError> {
    let pem = std::fs::read(path).map_err(|source| ConfigError::KeyFile {
        path: path.to_path_buf(),
        source,
    })?;
    if pem.iter().all(u8::is_ascii_whitespace) {
        return Err(ConfigError::MissingPrivateKey);
    }
    tracing::info!("Loaded private key from {}", path.display());
    Ok(pem)
}

pub async fn load_store(config: &AppConfig) -> Result<StoreBackend, StartupError> {
    let database_url = match &config.database_url {
        Some(url) => url,
        None => {
            tracing::warn!("DATABASE_URL not set. Using the in-memory store; data will not survive a restart.");
            return Ok(StoreBackend::Memory(MemoryStore::new()));
        }
    };

    tracing::info!("Connecting to database...");
    let store = PgStore::connect(database_url, config.store_timeout).await?;
    tracing::info!("Database connection pool created successfully");

    tracing::info!("Running database migrations...");
    store.run_migrations().await?;
    tracing::info!("Database migrations completed successfully");

    Ok(StoreBackend::Postgres(store))
}
