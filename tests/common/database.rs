//! Database test fixtures
//!
//! The PostgreSQL tests run only when `DATABASE_URL` points at a scratch
//! database; otherwise [`test_store`] returns `None` and the test returns
//! early.

use std::time::Duration;

use quillpost::backend::store::PgStore;

/// Connect to `DATABASE_URL` and run the migrations.
pub async fn test_store() -> Option<PgStore> {
    let database_url = match std::env::var("DATABASE_URL") {
        Ok(url) => url,
        Err(_) => {
            eprintln!("DATABASE_URL not set, skipping PostgreSQL test");
            return None;
        }
    };

    let store = PgStore::connect(&database_url, Duration::from_secs(5))
        .await
        .expect("Failed to create test database pool");
    store
        .run_migrations()
        .await
        .expect("Failed to run migrations");
    Some(store)
}

/// A suffix that keeps rows from concurrent test runs apart.
pub fn unique_suffix() -> String {
    let nanos = chrono::Utc::now().timestamp_nanos_opt().unwrap_or_default();
    format!("{:x}", nanos)
}
