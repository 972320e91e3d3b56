//! Standalone REST API server binary.
//!
//! ## Purpose
//! Runs the REST API server on its own.
//!
//! ## Intended use
//! Useful for development when you only want the REST server (with OpenAPI/Swagger UI). The
//! workspace's main `cdx-run` binary runs gRPC, REST and the notification scheduler together.

use std::sync::Arc;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use api_rest::{build_router, AppState};
use cdx_core::config::api_key_from_env_value;
use cdx_core::{core_config_from_lookup, CdxServices};

/// # Environment Variables
/// - `CDX_REST_ADDR`: Server address (default: "0.0.0.0:3000")
/// - `API_KEY`: required `x-api-key` value for `/api` routes (unset disables the check)
/// - `CDX_*`: storage and integration settings, see `cdx_core::config`
#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenvy::dotenv().ok();

    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::from_default_env()
                .add_directive("cdx=info".parse()?)
                .add_directive("api_rest=info".parse()?),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    let addr = std::env::var("CDX_REST_ADDR").unwrap_or_else(|_| "0.0.0.0:3000".into());

    let cfg = core_config_from_lookup(|name| std::env::var(name).ok())?;
    let services = Arc::new(CdxServices::open(&cfg)?);
    let api_key = api_key_from_env_value(std::env::var("API_KEY").ok());

    tracing::info!("-- Starting CDX REST API on {}", addr);

    let app = build_router(AppState::new(services, api_key));
    let listener = tokio::net::TcpListener::bind(&addr).await?;
    axum::serve(listener, app).await?;

    Ok(())
}
