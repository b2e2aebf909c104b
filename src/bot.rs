//! The frame loop: parse each frame once and hand it to the dispatcher.

use sdbot_proto::{Message, Outbound, ParseOptions, Registry};
use std::sync::Arc;
use tokio::io::AsyncRead;
use tracing::{debug, warn};

use crate::config::Config;
use crate::error::TransportError;
use crate::handlers::Dispatcher;
use crate::network::FrameSource;
use crate::state::BotState;

/// Per-run counters, reported at shutdown.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub struct FrameStats {
    pub dispatched: u64,
    pub dropped: u64,
    pub own: u64,
}

/// Bot runtime.
pub struct Bot {
    name: String,
    state: Arc<BotState>,
    outbound: Arc<dyn Outbound>,
    dispatcher: Dispatcher,
    options: ParseOptions,
}

impl Bot {
    pub fn new(config: &Config, state: Arc<BotState>, outbound: Arc<dyn Outbound>) -> Self {
        Self {
            name: config.bot.name.clone(),
            state,
            outbound,
            dispatcher: Dispatcher::from_config(config),
            options: config.parser.options(),
        }
    }

    pub fn dispatcher(&self) -> &Dispatcher {
        &self.dispatcher
    }

    /// Parse and dispatch one frame. Returns whether it reached handlers.
    pub fn handle_frame(&self, raw: &str, stats: &mut FrameStats) -> bool {
        let registry: &dyn Registry = self.state.as_ref();
        let msg = match Message::parse_with(raw, registry, Arc::clone(&self.outbound), self.options)
        {
            Ok(msg) => msg,
            Err(e) => {
                warn!(code = e.error_code(), error = %e, frame = %raw, "Dropping frame");
                stats.dropped += 1;
                return false;
            }
        };

        if self.is_own(&msg) {
            debug!(command = msg.command(), "Skipping own message");
            stats.own += 1;
            return false;
        }

        debug!(
            command = msg.command(),
            room = %msg.room().name(),
            user = ?msg.user().map(|u| u.name()),
            "Dispatching"
        );
        self.dispatcher.dispatch(&msg);
        stats.dispatched += 1;
        true
    }

    /// Run until `source` is exhausted.
    pub async fn run<R>(&self, source: &mut FrameSource<R>) -> Result<FrameStats, TransportError>
    where
        R: AsyncRead + Unpin,
    {
        let mut stats = FrameStats::default();
        while let Some(frame) = source.next_frame().await? {
            self.handle_frame(&frame, &mut stats);
        }
        Ok(stats)
    }

    /// Whether the bot itself sent `msg`.
    fn is_own(&self, msg: &Message) -> bool {
        let (Some(sender), Some(me)) = (msg.user(), self.state.user(&self.name)) else {
            return false;
        };
        Arc::ptr_eq(sender, &me)
    }
}
