//! Parsed messages and the one-shot match cache.

mod matches;
mod parse;
mod types;

pub use self::matches::{Captures, MatchCache};
pub use self::parse::ParseOptions;
pub use self::types::Message;
