//! Shared test doubles: an in-memory registry and a recording outbound sink.

#![allow(dead_code)]

use std::collections::HashMap;
use std::sync::Arc;

use parking_lot::Mutex;
use sdbot_proto::{Message, Outbound, Registry, Room, SendError, User};

/// Registry that remembers every room and user it hands out.
#[derive(Default)]
pub struct TestRegistry {
    rooms: Mutex<HashMap<String, Arc<Room>>>,
    users: Mutex<HashMap<String, Arc<User>>>,
}

impl TestRegistry {
    pub fn room_count(&self) -> usize {
        self.rooms.lock().len()
    }

    pub fn user_count(&self) -> usize {
        self.users.lock().len()
    }

    pub fn user(&self, name: &str) -> Option<Arc<User>> {
        self.users.lock().get(name).cloned()
    }
}

impl Registry for TestRegistry {
    fn find_or_create_room(&self, name: &str) -> Arc<Room> {
        let mut rooms = self.rooms.lock();
        Arc::clone(
            rooms
                .entry(name.to_owned())
                .or_insert_with(|| Arc::new(Room::new(name))),
        )
    }

    fn find_or_create_user(&self, name: &str) -> Arc<User> {
        let mut users = self.users.lock();
        Arc::clone(
            users
                .entry(name.to_owned())
                .or_insert_with(|| Arc::new(User::new(name))),
        )
    }
}

/// Outbound sink that records lines, or fails every send when closed.
#[derive(Default)]
pub struct Recorder {
    lines: Mutex<Vec<String>>,
    closed: bool,
}

impl Recorder {
    pub fn closed() -> Self {
        Self {
            lines: Mutex::new(Vec::new()),
            closed: true,
        }
    }

    pub fn lines(&self) -> Vec<String> {
        self.lines.lock().clone()
    }
}

impl Outbound for Recorder {
    fn send_line(&self, line: String) -> Result<(), SendError> {
        if self.closed {
            return Err(SendError::Closed);
        }
        self.lines.lock().push(line);
        Ok(())
    }
}

/// Parse with a fresh registry and a discarding sink.
pub fn parse(raw: &str) -> Message {
    Message::parse(raw, &TestRegistry::default(), Arc::new(Recorder::default()))
        .expect("frame should parse")
}
