//! sdbot - chat bot runtime
//!
//! Reads server frames from stdin, parses each one into a typed message,
//! runs the configured responders, and writes outgoing protocol lines to
//! stdout.

mod bot;
mod config;
mod error;
mod handlers;
mod network;
mod state;

use crate::bot::Bot;
use crate::config::Config;
use crate::network::{ChannelOutbound, FrameSource, OUTBOUND_QUEUE_SIZE, run_writer};
use crate::state::BotState;
use std::sync::Arc;
use tracing::{error, info, warn};
use tracing_subscriber::EnvFilter;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Logs go to stderr; stdout carries protocol lines.
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .with_target(true)
        .with_writer(std::io::stderr)
        .init();

    // Load configuration
    let config_path = std::env::args()
        .nth(1)
        .unwrap_or_else(|| "config.toml".to_string());

    let config = Config::load(&config_path).map_err(|e| {
        error!(path = %config_path, error = %e, "Failed to load config");
        e
    })?;

    let state = Arc::new(BotState::new());
    let (outbound, outbound_rx) = ChannelOutbound::channel(OUTBOUND_QUEUE_SIZE);
    let writer = tokio::spawn(run_writer(outbound_rx, tokio::io::stdout()));

    let bot = Bot::new(&config, Arc::clone(&state), Arc::new(outbound));
    if bot.dispatcher().is_empty() {
        warn!("No responders configured; frames will only be parsed");
    }
    info!(
        bot = %config.bot.name,
        responders = bot.dispatcher().len(),
        strict_timestamps = config.parser.strict_timestamps,
        "Starting sdbot"
    );

    let mut source = FrameSource::new(tokio::io::stdin());
    let stats = bot.run(&mut source).await?;

    // Dropping the bot releases the last outbound sender so the writer drains and exits.
    drop(bot);
    writer.await??;

    info!(
        dispatched = stats.dispatched,
        dropped = stats.dropped,
        own = stats.own,
        rooms = state.room_count(),
        users = state.user_count(),
        "Input closed, shutting down"
    );
    Ok(())
}
