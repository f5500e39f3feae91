/**
 * Server Initialization
 *
 * # Initialization Process
 *
 * 1. Load the private key and build the authenticator
 * 2. Build the password hasher with the configured cost
 * 3. Select and prepare the store
 * 4. Create the app state and the router
 *
 * Any failure here aborts startup: the server never runs with bad key
 * material or an unmigrated database.
 */

use std::sync::Arc;

use axum::Router;
use thiserror::Error;

use crate::backend::auth::passwords::PasswordHasher;
use crate::backend::auth::sessions::Authenticator;
use crate::backend::routes::router::create_router;
use crate::backend::server::config::{load_private_key, load_store, StoreBackend};
use crate::backend::server::state::AppState;
use crate::backend::store::StoreError;
use crate::shared::{AppConfig, ConfigError};

/// Errors that abort startup
#[derive(Debug, Error)]
pub enum StartupError {
    #[error("configuration: {0}")]
    Config(#[from] ConfigError),
    #[error("connecting to the store: {0}")]
    Store(#[from] StoreError),
    #[error("running migrations: {0}")]
    Migrate(#[from] sqlx::migrate::MigrateError),
}

pub async fn create_app(config: &AppConfig) -> Result<Router<()>, StartupError> {
    tracing::info!("Initializing quillpost backend server");

    let pem = load_private_key(&config.private_key_file)?;
    let authenticator = Arc::new(Authenticator::from_private_key_pem(
        &pem,
        config.key_id.as_str(),
        &config.algorithm,
    )?);
    tracing::info!(
        key_id = %config.key_id,
        algorithm = %config.algorithm,
        "Token authenticator initialized"
    );

    let passwords = PasswordHasher::new(config.bcrypt_cost)?;

    let app_state = match load_store(config).await? {
        StoreBackend::Postgres(store) => {
            AppState::new(Arc::new(store), authenticator, passwords, config.token_ttl)
        }
        StoreBackend::Memory(store) => {
            AppState::new(Arc::new(store), authenticator, passwords, config.token_ttl)
        }
    };

    let app = create_router(app_state);
    tracing::info!("Router configured");

    Ok(app)
}
