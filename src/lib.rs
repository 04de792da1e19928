//! Newsletter signup backend for the Youthness website.
//!
//! Accepts emails over `POST /api/subscribe`, keeps them in a JSON file and reports
//! how many there are over `GET /api/subscribers/count`.

pub mod app;
pub mod config;
mod error;
pub mod model;
pub mod web;

pub use app::{serve, App, AppState};
pub use error::{Error, Result};

use tracing_subscriber::{fmt::format::FmtSpan, EnvFilter};

/// Default filter when `RUST_LOG` isn't set.
const DEFAULT_LOG_FILTER: &str = "youthness=info,tower_http=info";

/// Human readable, compact logs for development.
pub fn init_dbg_tracing() {
    tracing_subscriber::fmt()
        .without_time()
        .with_span_events(FmtSpan::CLOSE)
        .with_target(false)
        .with_env_filter(env_filter())
        .compact()
        .init();
}

/// JSON logs, one object per line, for production.
pub fn init_production_tracing() {
    tracing_subscriber::fmt()
        .json()
        .with_current_span(true)
        .with_target(true)
        .with_env_filter(env_filter())
        .init();
}

fn env_filter() -> EnvFilter {
    EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(DEFAULT_LOG_FILTER))
}
