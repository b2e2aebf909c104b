//! Error types for the bot runtime.

use sdbot_proto::ReplyError;
use thiserror::Error;
use tokio_util::codec::LinesCodecError;

/// Errors that can occur while a handler processes a message.
#[derive(Debug, Error)]
pub enum HandlerError {
    #[error("reply failed: {0}")]
    Reply(#[from] ReplyError),
}

impl HandlerError {
    /// Get a static error code string for log labeling.
    #[inline]
    pub fn error_code(&self) -> &'static str {
        match self {
            Self::Reply(_) => "reply_failed",
        }
    }
}

/// Result type for message handlers.
pub type HandlerResult = Result<(), HandlerError>;

/// Errors that stop the frame reader or the outbound writer.
#[derive(Debug, Error)]
pub enum TransportError {
    #[error("line codec error: {0}")]
    Codec(#[from] LinesCodecError),
}
