use std::sync::Arc;

use campus_api::config;
use campus_api::database::{MemoryStore, PostgresStore};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Load .env if present so cargo run picks up DATABASE_URL, PORT, etc.
    let _ = dotenvy::dotenv();

    tracing_subscriber::fmt::init();

    let config = config::config();
    tracing::info!("Starting Campus API in {:?} mode", config.environment);

    let app = match std::env::var("DATABASE_URL") {
        Ok(database_url) => {
            tracing::info!("Connecting to PostgreSQL");
            let store = PostgresStore::new(&database_url).await?;
            store.migrate().await?;
            campus_api::app(Arc::new(store))
        }
        Err(_) => {
            tracing::warn!("DATABASE_URL not set; falling back to in-memory store (data is not persisted)");
            campus_api::app(Arc::new(MemoryStore::new()))
        }
    };

    let bind_addr = config.server_address();
    let listener = tokio::net::TcpListener::bind(&bind_addr).await?;
    tracing::info!("Campus API listening on http://{}", bind_addr);

    axum::serve(listener, app).await?;
    Ok(())
}
