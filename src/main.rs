use std::sync::Arc;
use tower_http::trace::TraceLayer;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use contacts_api_client::ContactsApiClient;
use contacts_core::config::{duration_secs_from_env_value, usize_from_env_value};
use contacts_core::constants::{
    DEFAULT_API_TIMEOUT_SECS, DEFAULT_LISTEN_ADDR, DEFAULT_MAX_JOURNEYS_PER_FLOW,
    DEFAULT_REFERENCE_DATA_TTL_SECS, DEFAULT_SESSION_TTL_SECS,
};
use contacts_core::CoreConfig;
use contacts_web::{router, AppState};

/// Reads the configuration from the environment, once.
///
/// # Errors
///
/// Returns an error if `CONTACTS_API_URL` is missing or any value fails to parse.
fn config_from_env() -> anyhow::Result<CoreConfig> {
    let var = |name: &str| std::env::var(name).ok();

    let api_base_url = var("CONTACTS_API_URL")
        .ok_or_else(|| anyhow::anyhow!("CONTACTS_API_URL must be set"))?;
    let listen_addr = var("CONTACTS_ADDR").unwrap_or_else(|| DEFAULT_LISTEN_ADDR.into());

    let cfg = CoreConfig::new(
        listen_addr,
        api_base_url,
        duration_secs_from_env_value(
            "CONTACTS_API_TIMEOUT_SECS",
            var("CONTACTS_API_TIMEOUT_SECS"),
            DEFAULT_API_TIMEOUT_SECS,
        )?,
        duration_secs_from_env_value(
            "REFERENCE_DATA_TTL_SECS",
            var("REFERENCE_DATA_TTL_SECS"),
            DEFAULT_REFERENCE_DATA_TTL_SECS,
        )?,
        duration_secs_from_env_value(
            "SESSION_TTL_SECS",
            var("SESSION_TTL_SECS"),
            DEFAULT_SESSION_TTL_SECS,
        )?,
        usize_from_env_value(
            "MAX_JOURNEYS_PER_FLOW",
            var("MAX_JOURNEYS_PER_FLOW"),
            DEFAULT_MAX_JOURNEYS_PER_FLOW,
        )?,
    )?;
    Ok(cfg)
}

/// Main entry point for the contacts UI
///
/// Serves the server-rendered pages over HTTP. Every read and write of contact data goes to the
/// contacts API named by `CONTACTS_API_URL`.
///
/// # Environment Variables
/// - `CONTACTS_ADDR`: listen address (default: "0.0.0.0:3000")
/// - `CONTACTS_API_URL`: base URL of the contacts API (required)
/// - `CONTACTS_API_TIMEOUT_SECS`: per-request timeout for API calls (default: 20)
/// - `REFERENCE_DATA_TTL_SECS`: how long reference codes are cached (default: 3600)
/// - `SESSION_TTL_SECS`: idle time before a session is dropped (default: 43200)
/// - `MAX_JOURNEYS_PER_FLOW`: journeys of one kind kept per session (default: 5)
///
/// # Returns
/// * `Ok(())` - If the server starts and shuts down cleanly
/// * `Err(anyhow::Error)` - If configuration is invalid or the server fails
#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenvy::dotenv().ok();

    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::from_default_env()
                .add_directive("contacts=info".parse()?),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    let cfg = Arc::new(config_from_env()?);
    let api = ContactsApiClient::new(cfg.api_base_url(), cfg.api_timeout())?;
    let state = AppState::new(cfg.clone(), Arc::new(api));

    let app = router(state).layer(TraceLayer::new_for_http());

    tracing::info!(
        addr = cfg.listen_addr(),
        api = cfg.api_base_url(),
        "++ Starting contacts UI"
    );
    let listener = tokio::net::TcpListener::bind(cfg.listen_addr()).await?;
    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    tracing::info!("contacts UI stopped");
    Ok(())
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        tracing::error!(error = %e, "failed to listen for shutdown signal");
        // Without a signal handler, run until killed.
        std::future::pending::<()>().await;
    }
    tracing::info!("shutdown signal received");
}
