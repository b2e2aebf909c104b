//! # sdbot-proto
//!
//! Parser for the pipe- and newline-delimited chat frames a chat server
//! pushes to bot clients.
//!
//! A frame such as
//!
//! ```text
//! >lobby
//! |c:|1680000000|%Alice|Hello everyone
//! ```
//!
//! becomes a [`Message`] with a command, the room it was broadcast in, the
//! sender and their authorization character, the body, and a reply
//! [`Target`]. Room and user identities come from a caller-supplied
//! [`Registry`]; replies go out through an [`Outbound`] sink.
//!
//! ## Features
//!
//! - Single-pass, panic-free parsing with typed [`FrameError`]s
//! - Closed [`CommandKind`] over the recognized command shapes, with a
//!   defined fallback for everything else
//! - One-shot [`Message::matches`] per `(event, pattern)`, safe under
//!   concurrent handlers

#![deny(clippy::all)]
#![warn(missing_docs)]

pub mod casemap;
pub mod command;
pub mod error;
pub mod frame;
pub mod identity;
pub mod message;

pub use self::casemap::{id_eq, to_id};
pub use self::command::{CommandKind, NO_COMMAND};
pub use self::error::{FrameError, ReplyError, SendError};
pub use self::frame::Tokens;
pub use self::identity::{Outbound, Registry, Room, Target, User};
pub use self::message::{Captures, MatchCache, Message, ParseOptions};
