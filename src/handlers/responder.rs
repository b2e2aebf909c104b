//! Pattern-triggered replies from the `[[responders]]` config blocks.

use regex::Regex;
use sdbot_proto::{Captures, Message};
use std::sync::Arc;
use tracing::debug;

use super::Handler;
use crate::config::ResponderConfig;
use crate::error::HandlerResult;

/// Replies with fixed text when its pattern matches a message body.
#[derive(Debug, Clone)]
pub struct Responder {
    event: String,
    pattern: Arc<Regex>,
    reply: String,
    raw: bool,
    private_only: bool,
}

impl Responder {
    pub fn new(config: &ResponderConfig) -> Self {
        Self {
            event: config.event.clone(),
            pattern: Arc::clone(&config.pattern),
            reply: config.reply.clone(),
            raw: config.raw,
            private_only: config.private_only,
        }
    }
}

impl Handler for Responder {
    fn name(&self) -> &str {
        &self.event
    }

    fn handle(&self, msg: &Message) -> HandlerResult {
        if self.private_only && !msg.is_private() {
            return Ok(());
        }
        if !msg.matches(&self.pattern, &self.event) {
            return Ok(());
        }

        debug!(event = %self.event, target = %msg.target().name(), "Responder matched");
        if self.raw {
            msg.raw_reply(&self.reply)?;
        } else {
            let captures = msg
                .captures(&self.pattern, &self.event)
                .unwrap_or_default();
            msg.reply(&expand(&self.reply, &captures))?;
        }
        Ok(())
    }
}

/// Substitute `$N` with capture group `N`. Missing groups expand to
/// nothing; a `$` not followed by a digit is kept.
fn expand(template: &str, captures: &Captures) -> String {
    let mut out = String::with_capacity(template.len());
    let mut rest = template;

    while let Some(pos) = rest.find('$') {
        out.push_str(&rest[..pos]);
        let after = &rest[pos + 1..];
        let digits = after.bytes().take_while(u8::is_ascii_digit).count();
        if digits == 0 {
            out.push('$');
            rest = after;
            continue;
        }

        if let Ok(index) = after[..digits].parse::<usize>() {
            if let Some(Some(group)) = captures.get(index) {
                out.push_str(group);
            }
        }
        rest = &after[digits..];
    }

    out.push_str(rest);
    out
}
