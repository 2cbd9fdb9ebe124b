//! # casebookd: casebook daemon
//!
//! Composition root that wires all adapters together and starts the server.
//!
//! ## Responsibilities
//! - Load configuration (`casebook.toml`, environment overrides)
//! - Initialize tracing from the configured filter
//! - Open the `SQLite` database and run migrations
//! - Construct the store, the event bus and the application services
//! - Spawn the parent notifier on the event bus
//! - Build the axum router, bind to a TCP port and serve
//! - Shut down gracefully on Ctrl-C
//!
//! ## Dependency rule
//! This is the **only** crate that depends on all other crates.
//! It is the wiring layer and holds no domain logic.

mod config;
mod mailer;

use anyhow::Context;
use tracing_subscriber::EnvFilter;

use casebook_adapter_http_axum::state::AppState;
use casebook_app::event_bus::InProcessEventBus;
use casebook_app::notifier::ParentNotifier;

use crate::config::Config;
use crate::mailer::TracingMailer;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let config = Config::load().context("loading configuration")?;

    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::new(&config.logging.filter))
        .init();

    // Database
    let db = casebook_adapter_storage_sqlite_sqlx::Config {
        database_url: config.database_url().to_string(),
    }
    .build()
    .await
    .context("opening database")?;

    // Event bus and its consumers
    let event_bus = InProcessEventBus::new(256);
    if config.notifications.enabled {
        let notifier = ParentNotifier::new(TracingMailer::new(&config.notifications.sender));
        tokio::spawn(notifier.run(event_bus.subscribe()));
    } else {
        tracing::info!("parent notifications disabled");
    }

    // HTTP
    let state = AppState::new(db.store(), event_bus);
    let app = casebook_adapter_http_axum::router::build(state);

    let bind_addr = config.bind_addr();
    let listener = tokio::net::TcpListener::bind(&bind_addr)
        .await
        .with_context(|| format!("binding {bind_addr}"))?;
    tracing::info!(%bind_addr, database_url = config.database_url(), "casebookd listening");

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    tracing::info!("casebookd stopped");
    Ok(())
}

async fn shutdown_signal() {
    if let Err(err) = tokio::signal::ctrl_c().await {
        tracing::error!(%err, "failed to listen for shutdown signal");
        std::future::pending::<()>().await;
    }
}
