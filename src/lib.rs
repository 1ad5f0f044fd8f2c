//! A small HTTP service relaying newsletter signups from a web form to beehiiv.

mod app;
pub mod config;
mod error;
pub mod subscription_client;
pub mod web;

pub use app::{App, AppState};
pub use error::{Error, Result};
pub use subscription_client::BeehiivClient;
pub use web::serve;

use tracing_subscriber::EnvFilter;

/// Human readable logging for local development, defaults to the `debug` level.
pub fn init_dbg_tracing() {
    tracing_subscriber::fmt()
        .without_time()
        .with_target(false)
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("debug")),
        )
        .compact()
        .init();
}

/// JSON logs, one object per line, defaults to the `info` level.
pub fn init_production_tracing() {
    tracing_subscriber::fmt()
        .json()
        .with_current_span(true)
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .init();
}
