//! Standalone gRPC server binary.
//!
//! The workspace's main `cdx-run` binary runs gRPC, REST and the notification scheduler
//! together; this one serves gRPC only.

use std::net::SocketAddr;
use std::sync::Arc;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use api_grpc::build_router;
use cdx_core::config::{api_key_from_env_value, flag_from_env_value};
use cdx_core::{core_config_from_lookup, CdxServices};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenvy::dotenv().ok();

    tracing_subscriber::registry()
        .with(tracing_subscriber::EnvFilter::from_default_env().add_directive("cdx=info".parse()?))
        .with(tracing_subscriber::fmt::layer())
        .init();

    let addr: SocketAddr = std::env::var("CDX_ADDR")
        .unwrap_or_else(|_| "0.0.0.0:50051".into())
        .parse()?;

    let cfg = core_config_from_lookup(|name| std::env::var(name).ok())?;
    let services = Arc::new(CdxServices::open(&cfg)?);
    let api_key = api_key_from_env_value(std::env::var("API_KEY").ok());
    if api_key.is_none() {
        tracing::warn!("API_KEY is not set; gRPC authentication is disabled");
    }

    tracing::info!("-- Starting CDX gRPC on {}", addr);

    build_router(
        services,
        api_key,
        flag_from_env_value(std::env::var("CDX_ENABLE_REFLECTION").ok()),
    )?
    .serve(addr)
    .await?;

    Ok(())
}
