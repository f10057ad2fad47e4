// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Relational Network

use std::{process::ExitCode, sync::Arc};

use bearer_gate::{
    api::router,
    auth::{decoy_hash, AccessPolicy, PolicyError, TokenCodec, TokenError},
    config::{ConfigError, LogFormat, ServerConfig, DEFAULT_LOG_FILTER},
    state::AppState,
    store::{InMemoryUserStore, StoreError},
};
use tokio_util::sync::CancellationToken;
use tracing_subscriber::EnvFilter;

#[derive(Debug, thiserror::Error)]
enum StartupError {
    #[error("configuration error: {0}")]
    Config(#[from] ConfigError),

    #[error("signing key rejected: {0}")]
    Token(#[from] TokenError),

    #[error("failed to load users: {0}")]
    Users(#[from] StoreError),

    #[error("failed to load access rules: {0}")]
    Policy(#[from] PolicyError),

    #[error("server error: {0}")]
    Io(#[from] std::io::Error),
}

#[tokio::main]
async fn main() -> ExitCode {
    let config = ServerConfig::from_env();
    init_tracing(
        config
            .as_ref()
            .map(|config| config.log_format)
            .unwrap_or_default(),
    );

    match config.map_err(StartupError::from) {
        Ok(config) => match run(config).await {
            Ok(()) => ExitCode::SUCCESS,
            Err(e) => {
                tracing::error!(error = %e, "Server stopped with an error");
                ExitCode::FAILURE
            }
        },
        Err(e) => {
            tracing::error!(error = %e, "Refusing to start");
            ExitCode::FAILURE
        }
    }
}

fn init_tracing(format: LogFormat) {
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(DEFAULT_LOG_FILTER));
    let builder = tracing_subscriber::fmt().with_env_filter(filter);
    match format {
        LogFormat::Json => builder.json().init(),
        LogFormat::Pretty => builder.init(),
    }
}

async fn run(config: ServerConfig) -> Result<(), StartupError> {
    tracing::info!(?config, "Starting bearer gate");

    let tokens = TokenCodec::new(config.jwt_secret.as_bytes(), config.token_ttl)?;

    let users = match &config.users_file {
        Some(path) => {
            let store = InMemoryUserStore::from_json_file(path)?;
            tracing::info!(path = %path.display(), users = store.len(), "Loaded user table");
            store
        }
        None => InMemoryUserStore::new(),
    };
    if users.is_empty() {
        tracing::warn!("User table is empty; no user can log in");
    }

    // Build the decoy hash now rather than on the first unknown-user login.
    if tokio::task::spawn_blocking(decoy_hash).await.is_err() {
        tracing::warn!("Decoy password hash was not prepared at startup");
    }

    let policy = match &config.access_rules_file {
        Some(path) => {
            let policy = AccessPolicy::from_json_file(path)?;
            tracing::info!(path = %path.display(), rules = policy.rules().len(), "Loaded access rules");
            policy
        }
        None => AccessPolicy::default(),
    };

    let state = AppState::new(tokens, Arc::new(users), policy);
    let app = router(state);

    let listener = tokio::net::TcpListener::bind(config.bind_address()).await?;
    tracing::info!(
        addr = %listener.local_addr()?,
        "Bearer gate listening (docs at /docs)"
    );

    let shutdown = CancellationToken::new();
    tokio::spawn(watch_signals(shutdown.clone()));

    axum::serve(listener, app)
        .with_graceful_shutdown(async move {
            shutdown.cancelled().await;
            tracing::info!("Shutdown signal received, draining connections");
        })
        .await?;

    tracing::info!("Bearer gate stopped");
    Ok(())
}

async fn watch_signals(shutdown: CancellationToken) {
    let ctrl_c = async {
        if let Err(e) = tokio::signal::ctrl_c().await {
            tracing::error!(error = %e, "Failed to listen for Ctrl+C");
            std::future::pending::<()>().await;
        }
    };

    #[cfg(unix)]
    let terminate = async {
        match tokio::signal::unix::signal(tokio::signal::unix::SignalKind::terminate()) {
            Ok(mut signal) => {
                signal.recv().await;
            }
            Err(e) => {
                tracing::error!(error = %e, "Failed to listen for SIGTERM");
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
    shutdown.cancel();
}
