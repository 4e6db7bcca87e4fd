//! Staybook API Server
//!
//! REST API server for hotel browsing and room booking.
//!
//! Author: hephaex@gmail.com

use std::sync::Arc;

use staybook_api::{create_router, init_tracing, state::AppState};
use staybook_core::config::AppConfig;
use staybook_core::seed::seed_catalog;
use staybook_core::PgStore;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenv::dotenv().ok();

    // Load configuration
    let config = AppConfig::from_env()?;
    init_tracing(&config.logging);

    if config.auth.jwt_secret.is_none() {
        tracing::warn!("JWT_SECRET_KEY is not set; login, refresh and protected routes will fail");
    }

    // Connect storage and bring the schema up to date
    let store = PgStore::connect(&config.database.url, config.database.pool_size).await?;
    store.migrate().await?;

    if config.database.seed {
        let created = seed_catalog(&store).await?;
        tracing::info!(created, "Sample catalog seeded");
    }

    let addr = format!("{}:{}", config.server.host, config.server.port);

    // Create application state
    let state = Arc::new(AppState::with_store(config, Arc::new(store)));

    // Create router
    let app = create_router(state);

    // Start server
    let listener = tokio::net::TcpListener::bind(&addr).await?;
    tracing::info!("Staybook API Server starting on http://{}", addr);
    tracing::info!("Swagger UI available at http://{}/swagger-ui/", addr);
    tracing::info!("OpenAPI spec at http://{}/api-docs/openapi.json", addr);

    axum::serve(listener, app).await?;

    Ok(())
}
