//! Message handlers.
//!
//! This module contains the Handler trait and the dispatcher that offers
//! each parsed message to every registered handler.

mod responder;

pub use responder::Responder;

use sdbot_proto::Message;
use tracing::warn;

use crate::config::Config;
use crate::error::HandlerResult;

/// Something that reacts to parsed messages.
///
/// Handlers claim messages through [`Message::matches`], so two handlers
/// registered under the same event and pattern answer a message once.
pub trait Handler: Send + Sync {
    /// Name used in logs.
    fn name(&self) -> &str;

    /// Handle one message.
    fn handle(&self, msg: &Message) -> HandlerResult;
}

/// Ordered list of handlers.
#[derive(Default)]
pub struct Dispatcher {
    handlers: Vec<Box<dyn Handler>>,
}

impl Dispatcher {
    pub fn new() -> Self {
        Self::default()
    }

    /// Build a dispatcher with one [`Responder`] per config block.
    pub fn from_config(config: &Config) -> Self {
        let mut dispatcher = Self::new();
        for responder in &config.responders {
            dispatcher.register(Responder::new(responder));
        }
        dispatcher
    }

    pub fn register<H: Handler + 'static>(&mut self, handler: H) {
        self.handlers.push(Box::new(handler));
    }

    pub fn len(&self) -> usize {
        self.handlers.len()
    }

    pub fn is_empty(&self) -> bool {
        self.handlers.is_empty()
    }

    /// Offer `msg` to every handler. Handler failures are logged, never
    /// propagated, so one broken reply doesn't starve later handlers.
    pub fn dispatch(&self, msg: &Message) {
        for handler in &self.handlers {
            if let Err(e) = handler.handle(msg) {
                warn!(
                    handler = handler.name(),
                    code = e.error_code(),
                    error = %e,
                    "Handler failed"
                );
            }
        }
    }
}
