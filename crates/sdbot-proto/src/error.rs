//! Error types for the frame parser.
//!
//! Parsing never panics on malformed input; every failure surfaces as a
//! [`FrameError`] and the caller decides whether to drop, log, or escalate.

use std::num::ParseIntError;

use thiserror::Error;

/// Convenience type alias for Results using [`FrameError`].
pub type Result<T, E = FrameError> = std::result::Result<T, E>;

/// Errors encountered when parsing a raw frame.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
#[non_exhaustive]
pub enum FrameError {
    /// The frame has fewer pipe fields than its command shape requires.
    #[error("malformed {command:?} frame: expected at least {expected} fields, got {got}")]
    MalformedFrame {
        /// The command tag as it appeared on the wire.
        command: String,
        /// Minimum number of pipe fields the shape requires.
        expected: usize,
        /// Number of pipe fields actually present.
        got: usize,
    },

    /// An identity field is empty, so it has no authorization character
    /// and no username.
    #[error("malformed {command:?} frame: identity field {index} is empty")]
    EmptyIdentity {
        /// The command tag as it appeared on the wire.
        command: String,
        /// Index of the empty pipe field.
        index: usize,
    },

    /// A timestamp field was not a base-10 integer.
    #[error("invalid timestamp {value:?}")]
    TimestampParse {
        /// The raw field value.
        value: String,
        /// The underlying integer parse error.
        #[source]
        source: ParseIntError,
    },
}

impl FrameError {
    /// Get a static error code string for log labeling.
    #[inline]
    pub fn error_code(&self) -> &'static str {
        match self {
            Self::MalformedFrame { .. } => "malformed_frame",
            Self::EmptyIdentity { .. } => "empty_identity",
            Self::TimestampParse { .. } => "timestamp_parse",
        }
    }
}

/// Failure reported by an [`Outbound`](crate::Outbound) sink.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
#[non_exhaustive]
pub enum SendError {
    /// The transport is gone; nothing more can be sent.
    #[error("outbound channel closed")]
    Closed,

    /// The transport refused the line.
    #[error("transport error: {0}")]
    Transport(String),
}

/// Errors returned by [`Message::reply`](crate::Message::reply) and
/// [`Message::raw_reply`](crate::Message::raw_reply).
#[derive(Debug, Error, Clone, PartialEq, Eq)]
#[non_exhaustive]
pub enum ReplyError {
    /// The outgoing line could not be transmitted.
    #[error("failed to send reply: {0}")]
    Send(#[from] SendError),
}
