// Framework bootstrap for the relay runtime.

use crate::frameworks::config::RelayConfig;
use crate::interface_adapters::clients::GeminiClient;
use crate::interface_adapters::routes;
use crate::interface_adapters::state::AppState;
use std::io::{self, Result};
use std::sync::Arc;

fn init_runtime() {
    // Load .env locally; safe to ignore when not present.
    let _ = dotenvy::dotenv();

    let filter = tracing_subscriber::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info"));

    let json = matches!(std::env::var("LOG_FORMAT").as_deref(), Ok("json"));
    if json {
        tracing_subscriber::fmt()
            .with_env_filter(filter)
            .with_target(false)
            .json()
            .with_current_span(true)
            .init();
    } else {
        tracing_subscriber::fmt()
            .with_env_filter(filter)
            .with_target(false)
            .compact()
            .init();
    }

    std::panic::set_hook(Box::new(|info| {
        let backtrace = std::backtrace::Backtrace::capture();
        tracing::error!(%info, ?backtrace, "panic");
    }));
}

pub async fn run(listener: tokio::net::TcpListener, config: RelayConfig) -> Result<()> {
    let address = listener.local_addr()?;
    let state = build_state(&config);

    // Start the web server with the relay wired up.
    let app = routes::app(state);

    tracing::info!(%address, "listening");

    // Serve app and report errors rather than panicking.
    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await
        .inspect_err(|e| {
            tracing::error!(error = %e, "server error");
        })
}

pub async fn run_with_config() -> Result<()> {
    init_runtime();

    // Refuse to start without a credential.
    let config = RelayConfig::from_env()
        .inspect_err(|e| {
            tracing::error!(error = %e, "invalid configuration");
        })
        .map_err(|e| io::Error::new(io::ErrorKind::InvalidInput, e))?;
    tracing::debug!(?config, "configuration resolved.");

    let address = config.bind_addr();

    // Bind TCP listener with error handling.
    let listener = tokio::net::TcpListener::bind(address)
        .await
        .inspect_err(|e| {
            tracing::error!(%address, error = %e, "failed to bind");
        })?;

    run(listener, config).await
}

fn build_state(config: &RelayConfig) -> Arc<AppState> {
    let provider = GeminiClient::new(
        config.api_base_url.clone(),
        config.api_key.clone(),
        config.text_model.clone(),
    );
    tracing::debug!(
        base_url = %config.api_base_url,
        text_model = %config.text_model,
        "provider client configured."
    );

    Arc::new(AppState {
        provider: Arc::new(provider),
        max_body_bytes: config.max_body_bytes,
    })
}

// Resolves on Ctrl+C or SIGTERM; in-flight requests are allowed to finish.
async fn shutdown_signal() {
    let ctrl_c = async {
        if let Err(e) = tokio::signal::ctrl_c().await {
            tracing::error!(error = %e, "failed to listen for ctrl-c");
            std::future::pending::<()>().await;
        }
    };

    #[cfg(unix)]
    let terminate = async {
        use tokio::signal::unix::{SignalKind, signal};
        match signal(SignalKind::terminate()) {
            Ok(mut sigterm) => {
                sigterm.recv().await;
            }
            Err(e) => {
                tracing::error!(error = %e, "failed to register SIGTERM handler");
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {},
        _ = terminate => {},
    }

    tracing::info!("shutdown signal received, draining connections.");
}
