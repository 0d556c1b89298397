// SPDX-License-Identifier: MIT OR Apache-2.0
//! `ClipDeck` headless preview.
//!
//! Builds a timeline from media files given on the command line (or a small
//! demo timeline), then plays it to the end:
//! - Audio clips decoded and scheduled against the playhead
//! - Waveform envelopes computed per audio asset
//! - Active clips and preview frames reported through tracing
//!
//! ## Architecture
//!
//! The binary wires the `clipdeck_timeline` engine to real collaborators: tokio
//! for file loading and the frame ticker, rodio for decoding and output (with
//! the "audio" feature), and the log as the preview surface.

mod app;
mod audio;
mod loader;
mod outline;
mod preview;

use app::AppOptions;
use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::util::SubscriberInitExt;

/// Log filter used when `RUST_LOG` is not set
const DEFAULT_LOG_FILTER: &str = "clipdeck_app=debug,clipdeck_timeline=debug";

fn main() {
    let env_filter = tracing_subscriber::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new(DEFAULT_LOG_FILTER));

    tracing_subscriber::registry()
        .with(env_filter)
        .with(tracing_subscriber::fmt::layer())
        .init();

    tracing::info!("Starting ClipDeck preview v{}", env!("CARGO_PKG_VERSION"));

    let options = match AppOptions::parse(std::env::args().skip(1)) {
        Ok(options) => options,
        Err(e) => {
            tracing::error!("{e}");
            tracing::error!("Usage: {}", AppOptions::USAGE);
            std::process::exit(1);
        }
    };

    if let Err(e) = app::run(options) {
        tracing::error!("Preview failed: {e}");
        std::process::exit(1);
    }
}
