//! Process-wide room and user registries.
//!
//! Entries are keyed by id, so names that differ only in case or
//! punctuation resolve to the same shared identity. The first spelling seen
//! becomes the display name. A name with no letters or digits has an empty
//! id and is keyed by its exact spelling instead. The empty name is never
//! registered: it resolves to a shared sentinel.

use dashmap::DashMap;
use sdbot_proto::{Registry, Room, User, to_id};
use std::sync::Arc;
use tracing::debug;

use super::dashmap_ext::DashMapExt;

/// Shared bot state: every room and user seen so far.
#[derive(Debug)]
pub struct BotState {
    /// Rooms, indexed by registry key.
    rooms: DashMap<String, Arc<Room>>,
    /// Users, indexed by registry key.
    users: DashMap<String, Arc<User>>,
    /// Returned for the empty room name.
    no_room: Arc<Room>,
    /// Returned for the empty user name.
    anonymous: Arc<User>,
}

impl Default for BotState {
    fn default() -> Self {
        Self {
            rooms: DashMap::new(),
            users: DashMap::new(),
            no_room: Arc::new(Room::empty()),
            anonymous: Arc::new(User::new("")),
        }
    }
}

/// Registry key for `name`: its id, or the name itself when the id is
/// empty. `None` for the empty name.
fn registry_key(name: &str) -> Option<String> {
    if name.is_empty() {
        return None;
    }
    let id = to_id(name);
    if id.is_empty() {
        Some(name.to_owned())
    } else {
        Some(id)
    }
}

impl BotState {
    pub fn new() -> Self {
        Self::default()
    }

    /// Look up a known user without creating it.
    pub fn user(&self, name: &str) -> Option<Arc<User>> {
        let key = registry_key(name)?;
        self.users.get_cloned(key.as_str())
    }

    pub fn room_count(&self) -> usize {
        self.rooms.len()
    }

    pub fn user_count(&self) -> usize {
        self.users.len()
    }
}

impl Registry for BotState {
    fn find_or_create_room(&self, name: &str) -> Arc<Room> {
        let Some(key) = registry_key(name) else {
            return Arc::clone(&self.no_room);
        };
        let entry = self.rooms.entry(key).or_insert_with(|| {
            debug!(room = %name, "Registered new room");
            Arc::new(Room::new(name))
        });
        Arc::clone(entry.value())
    }

    fn find_or_create_user(&self, name: &str) -> Arc<User> {
        let Some(key) = registry_key(name) else {
            return Arc::clone(&self.anonymous);
        };
        let entry = self.users.entry(key).or_insert_with(|| {
            debug!(user = %name, "Registered new user");
            Arc::new(User::new(name))
        });
        Arc::clone(entry.value())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use sdbot_proto::{Message, Outbound, SendError};

    struct Discard;

    impl Outbound for Discard {
        fn send_line(&self, _line: String) -> Result<(), SendError> {
            Ok(())
        }
    }

    #[test]
    fn test_empty_room_header_is_not_registered() {
        let state = BotState::new();
        let msg = Message::parse(">\n|c|+Alice", &state, Arc::new(Discard)).unwrap();
        assert!(msg.room().is_empty());
        assert_eq!(state.room_count(), 0);

        let msg = Message::parse(">---\n|c|+Bob", &state, Arc::new(Discard)).unwrap();
        assert_eq!(msg.room().name(), "---");
        assert_eq!(msg.target().line("hi"), "---|hi");
        assert_eq!(state.room_count(), 1);
    }

    #[test]
    fn test_symbol_only_names_stay_distinct() {
        let state = BotState::new();
        let dashes = state.find_or_create_room("---");
        let star = state.find_or_create_room("★");
        assert!(!Arc::ptr_eq(&dashes, &star));
        assert_eq!(star.name(), "★");
        assert!(Arc::ptr_eq(&dashes, &state.find_or_create_room("---")));
        assert_eq!(state.room_count(), 2);

        let a = state.find_or_create_user("~~");
        let b = state.find_or_create_user("**");
        assert!(!Arc::ptr_eq(&a, &b));
        assert!(state.user("~~").is_some());
    }

    #[test]
    fn test_empty_names_map_to_sentinels() {
        let state = BotState::new();
        let room = state.find_or_create_room("");
        assert!(room.is_empty());
        assert!(Arc::ptr_eq(&room, &state.find_or_create_room("")));

        let user = state.find_or_create_user("");
        assert!(Arc::ptr_eq(&user, &state.find_or_create_user("")));
        assert!(state.user("").is_none());
        assert_eq!(state.room_count(), 0);
        assert_eq!(state.user_count(), 0);
    }

    #[test]
    fn test_find_or_create_is_idempotent() {
        let state = BotState::new();
        let a = state.find_or_create_room("Lobby");
        let b = state.find_or_create_room("lobby");
        assert!(Arc::ptr_eq(&a, &b));
        assert_eq!(b.name(), "Lobby");
        assert_eq!(state.room_count(), 1);
    }

    #[test]
    fn test_users_keyed_by_id() {
        let state = BotState::new();
        let a = state.find_or_create_user("Ash K.");
        let b = state.find_or_create_user("ashk");
        assert!(Arc::ptr_eq(&a, &b));
        assert!(state.user("ASHK").is_some());
        assert!(state.user("misty").is_none());
        assert_eq!(state.user_count(), 1);
    }

    #[test]
    fn test_lookup_does_not_create() {
        let state = BotState::new();
        assert!(state.user("Alice").is_none());
        assert_eq!(state.user_count(), 0);
    }

    #[test]
    fn test_concurrent_creation_shares_identity() {
        let state = Arc::new(BotState::new());
        let handles: Vec<_> = (0..8)
            .map(|_| {
                let state = Arc::clone(&state);
                std::thread::spawn(move || state.find_or_create_user("Alice"))
            })
            .collect();

        let users: Vec<_> = handles.into_iter().map(|h| h.join().unwrap()).collect();
        assert!(users.iter().all(|u| Arc::ptr_eq(u, &users[0])));
        assert_eq!(state.user_count(), 1);
    }
}
