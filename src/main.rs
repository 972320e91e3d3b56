use std::net::SocketAddr;
use std::sync::Arc;
use std::time::Duration;
use tokio::time::MissedTickBehavior;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use api_rest::AppState;
use cdx_core::config::{api_key_from_env_value, flag_from_env_value};
use cdx_core::pb::NotificationPriority;
use cdx_core::{Actor, CdxServices, core_config_from_lookup};

/// Main entry point for the CDX platform
///
/// Runs three tasks over one set of core services:
/// - gRPC server on port 50051 (configurable via CDX_ADDR)
/// - REST server on port 3000 (configurable via CDX_REST_ADDR)
/// - notification scheduler, every CDX_NOTIFICATION_INTERVAL_SECS (0 disables it)
///
/// Both servers check `x-api-key` against API_KEY when it is set.
///
/// # Environment Variables
/// - `CDX_ADDR`: gRPC server address (default: "0.0.0.0:50051")
/// - `CDX_REST_ADDR`: REST server address (default: "0.0.0.0:3000")
/// - `CDX_STORAGE`, `CDX_DATA_DIR`: document store selection (default: file store in "cdx_data")
/// - `API_KEY`: API key for both servers
/// - `CDX_ENABLE_REFLECTION`: serve gRPC reflection when "true"
///
/// # Errors
/// Returns an error if configuration is invalid, the store cannot be opened, or either
/// server fails to bind or stops with an error.
#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenvy::dotenv().ok();

    tracing_subscriber::registry()
        .with(tracing_subscriber::EnvFilter::from_default_env().add_directive("cdx=info".parse()?))
        .with(tracing_subscriber::fmt::layer())
        .init();

    let grpc_addr: SocketAddr = std::env::var("CDX_ADDR")
        .unwrap_or_else(|_| "0.0.0.0:50051".into())
        .parse()?;
    let rest_addr = std::env::var("CDX_REST_ADDR").unwrap_or_else(|_| "0.0.0.0:3000".into());

    let cfg = core_config_from_lookup(|name| std::env::var(name).ok())?;
    let services = Arc::new(CdxServices::open(&cfg)?);
    let api_key = api_key_from_env_value(std::env::var("API_KEY").ok());
    if api_key.is_none() {
        tracing::warn!("API_KEY is not set; authentication is disabled");
    }

    tracing::info!("++ Starting CDX gRPC on {}", grpc_addr);
    tracing::info!("++ Starting CDX REST on {}", rest_addr);

    let rest_app = api_rest::build_router(AppState::new(services.clone(), api_key.clone()));
    let listener = tokio::net::TcpListener::bind(&rest_addr).await?;
    let rest_server = async move { axum::serve(listener, rest_app).await };

    let grpc_server = api_grpc::build_router(
        services.clone(),
        api_key,
        flag_from_env_value(std::env::var("CDX_ENABLE_REFLECTION").ok()),
    )?
    .serve(grpc_addr);

    let scheduler = tokio::spawn(run_notification_scheduler(
        services,
        cfg.notification_interval(),
    ));

    let (rest_result, grpc_result) = tokio::join!(rest_server, grpc_server);
    scheduler.abort();
    rest_result?;
    grpc_result?;

    Ok(())
}

/// Delivers pending notifications of every priority on a fixed interval.
async fn run_notification_scheduler(services: Arc<CdxServices>, interval: Duration) {
    if interval.is_zero() {
        tracing::info!("notification scheduler disabled");
        return;
    }
    tracing::info!(every_secs = interval.as_secs(), "notification scheduler started");

    let mut ticker = tokio::time::interval(interval);
    ticker.set_missed_tick_behavior(MissedTickBehavior::Skip);
    let actor = Actor::system();

    loop {
        ticker.tick().await;
        match services
            .notifications
            .process_pending(&actor, NotificationPriority::Unspecified)
            .await
        {
            Ok(summary) if summary.processed > 0 => tracing::info!(
                processed = summary.processed,
                sent = summary.sent,
                failed = summary.failed,
                "notification scan finished"
            ),
            Ok(_) => {}
            Err(e) => tracing::warn!("notification scan failed: {e}"),
        }
    }
}
