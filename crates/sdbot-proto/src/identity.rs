//! Room and user identities, reply targets, and the collaborator traits
//! the parser is handed at construction time.
//!
//! Identities are shared as `Arc`s handed out by a [`Registry`]. Two
//! references name the same entity iff they point at the same allocation;
//! display names are never compared for identity.

use std::fmt;
use std::sync::Arc;

use crate::casemap::to_id;
use crate::error::{ReplyError, SendError};

/// A chat room.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Room {
    name: String,
    id: String,
}

impl Room {
    /// Create a room with the given display name.
    pub fn new(name: impl Into<String>) -> Self {
        let name = name.into();
        let id = to_id(&name);
        Self { name, id }
    }

    /// The sentinel for frames that are not room-scoped.
    pub fn empty() -> Self {
        Self {
            name: String::new(),
            id: String::new(),
        }
    }

    /// Display name as it appeared on the wire.
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Normalized id.
    pub fn id(&self) -> &str {
        &self.id
    }

    /// Whether this is the not-room-scoped sentinel.
    pub fn is_empty(&self) -> bool {
        self.name.is_empty()
    }
}

impl fmt::Display for Room {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.name)
    }
}

/// A chat user.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct User {
    name: String,
    id: String,
}

impl User {
    /// Create a user with the given display name.
    pub fn new(name: impl Into<String>) -> Self {
        let name = name.into();
        let id = to_id(&name);
        Self { name, id }
    }

    /// Display name as it appeared on the wire.
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Normalized id.
    pub fn id(&self) -> &str {
        &self.id
    }
}

impl fmt::Display for User {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.name)
    }
}

/// Resolves names to shared identities, creating unseen entries.
///
/// Implementations are process-wide and lock internally; both calls may
/// register a new entity as a side effect.
pub trait Registry: Send + Sync {
    /// Find the room with this name, creating it if unseen.
    fn find_or_create_room(&self, name: &str) -> Arc<Room>;

    /// Find the user with this name, creating it if unseen.
    fn find_or_create_user(&self, name: &str) -> Arc<User>;
}

/// Sink that transmits one outgoing protocol line.
pub trait Outbound: Send + Sync {
    /// Queue or write `line` to the server.
    fn send_line(&self, line: String) -> Result<(), SendError>;
}

/// Where a reply to a message is addressed.
#[derive(Debug, Clone)]
pub enum Target {
    /// Broadcast into a room (possibly the empty sentinel).
    Room(Arc<Room>),
    /// Private message to a user.
    User(Arc<User>),
}

impl Target {
    /// Display name of the addressed entity.
    pub fn name(&self) -> &str {
        match self {
            Self::Room(room) => room.name(),
            Self::User(user) => user.name(),
        }
    }

    /// Whether this target is exactly `user` (same allocation).
    pub fn is_user(&self, user: &Arc<User>) -> bool {
        matches!(self, Self::User(target) if Arc::ptr_eq(target, user))
    }

    /// Whether this target is exactly `room` (same allocation).
    pub fn is_room(&self, room: &Arc<Room>) -> bool {
        matches!(self, Self::Room(target) if Arc::ptr_eq(target, room))
    }

    /// Send `text` addressed to `sender`'s display name.
    pub fn reply(
        &self,
        sender: Option<&User>,
        text: &str,
        outbound: &dyn Outbound,
    ) -> Result<(), ReplyError> {
        match sender {
            Some(user) => self.raw_reply(&format!("{}: {}", user.name(), text), outbound),
            None => self.raw_reply(text, outbound),
        }
    }

    /// Send `text` verbatim. The text is not escaped: a leading `/` or `!`
    /// is interpreted by the server as a client command.
    pub fn raw_reply(&self, text: &str, outbound: &dyn Outbound) -> Result<(), ReplyError> {
        outbound.send_line(self.line(text))?;
        Ok(())
    }

    /// Format the outgoing protocol line for `text`.
    pub fn line(&self, text: &str) -> String {
        match self {
            Self::Room(room) => format!("{}|{}", room.name(), text),
            Self::User(user) => format!("|/pm {}, {}", user.name(), text),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use parking_lot::Mutex;

    #[derive(Default)]
    struct Recorder(Mutex<Vec<String>>);

    impl Outbound for Recorder {
        fn send_line(&self, line: String) -> Result<(), SendError> {
            self.0.lock().push(line);
            Ok(())
        }
    }

    #[test]
    fn test_room_ids() {
        let room = Room::new("Tech & Code");
        assert_eq!(room.name(), "Tech & Code");
        assert_eq!(room.id(), "techcode");
        assert!(!room.is_empty());
        assert!(Room::empty().is_empty());
    }

    #[test]
    fn test_identity_not_name_equality() {
        let a = Arc::new(User::new("Alice"));
        let b = Arc::new(User::new("Alice"));
        let target = Target::User(Arc::clone(&a));
        assert!(target.is_user(&a));
        assert!(!target.is_user(&b));
    }

    #[test]
    fn test_reply_lines() {
        let out = Recorder::default();
        let alice = User::new("Alice");

        let room = Target::Room(Arc::new(Room::new("lobby")));
        room.reply(Some(&alice), "hi", &out).unwrap();
        room.raw_reply("/me waves", &out).unwrap();

        let pm = Target::User(Arc::new(alice.clone()));
        pm.reply(Some(&alice), "psst", &out).unwrap();
        pm.reply(None, "anon", &out).unwrap();

        assert_eq!(
            *out.0.lock(),
            vec![
                "lobby|Alice: hi".to_string(),
                "lobby|/me waves".to_string(),
                "|/pm Alice, Alice: psst".to_string(),
                "|/pm Alice, anon".to_string(),
            ]
        );
    }

    #[test]
    fn test_empty_room_line() {
        let target = Target::Room(Arc::new(Room::empty()));
        assert_eq!(target.line("hello"), "|hello");
        assert_eq!(target.name(), "");
    }
}
