//! State management module.
//!
//! Contains the room and user registries shared by every parsed message.

mod dashmap_ext;
mod registry;

pub use registry::BotState;
