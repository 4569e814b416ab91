//! Event Metrycs - synthesized metrics and reports for blockchain community events.
//!
//! # API Endpoints
//!
//! - `GET /health` - Health check
//! - `GET /events`, `POST /events` - List or register events
//! - `GET /events/:id` - Single event
//! - `GET /events/:id/metrics` - Synthesized metrics snapshot
//! - `GET /events/:id/metrics/update` - Live-update delta
//! - `GET /events/:id/metrics/export` - CSV or JSON export
//! - `GET /events/:id/report` - Qualitative report

use std::net::SocketAddr;

use chrono::Utc;
use tokio::net::TcpListener;
use tracing::info;
use tracing_subscriber::{EnvFilter, fmt, layer::SubscriberExt, util::SubscriberInitExt};

use event_metrycs::api::{AppState, router};
use event_metrycs::config::Config;
use event_metrycs::storage::EventStore;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::registry()
        .with(fmt::layer())
        .with(EnvFilter::from_default_env().add_directive("event_metrycs=info".parse()?))
        .init();

    let config = Config::from_env()?;

    info!(
        port = config.port,
        seeded = config.seed.is_some(),
        demo_events = config.demo_events,
        "Starting Event Metrycs server"
    );

    let store = if config.demo_events {
        EventStore::with_demo_events(Utc::now()).await
    } else {
        EventStore::new()
    };
    info!(event_count = store.len().await, "Event registry ready");

    let app = router(AppState {
        store,
        seed: config.seed,
    });

    let addr = SocketAddr::from(([0, 0, 0, 0], config.port));
    let listener = TcpListener::bind(addr).await?;

    info!(%addr, "Event Metrycs is listening");

    axum::serve(listener, app).await?;

    Ok(())
}
