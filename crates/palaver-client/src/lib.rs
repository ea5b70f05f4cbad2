pub mod client;
pub mod commands;
pub mod config;
pub mod events;
pub mod state;

mod error;

use tracing_subscriber::{fmt, EnvFilter};

pub use client::Client;
pub use config::ClientConfig;
pub use error::{ClientError, Result};
pub use events::ClientEvent;

/// Install the global tracing subscriber. Call once, at start-up.
pub fn init_tracing() {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| {
        EnvFilter::new("palaver_client=debug,palaver_store=info,palaver_media=info,warn")
    });

    fmt()
        .with_env_filter(filter)
        .with_target(true)
        .with_thread_ids(false)
        .with_file(false)
        .with_line_number(false)
        .init();

    tracing::info!("Starting {}", palaver_shared::constants::APP_NAME);
}
