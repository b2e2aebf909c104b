//! Fuzz target for frame parsing
//!
//! Feeds arbitrary text to the parser and replies through every parsed
//! message. Neither may panic: malformed frames must come back as errors.

#![no_main]

use libfuzzer_sys::fuzz_target;
use sdbot_proto::{Message, Outbound, Registry, Room, SendError, User};
use std::str;
use std::sync::Arc;

struct Fresh;

impl Registry for Fresh {
    fn find_or_create_room(&self, name: &str) -> Arc<Room> {
        Arc::new(Room::new(name))
    }

    fn find_or_create_user(&self, name: &str) -> Arc<User> {
        Arc::new(User::new(name))
    }
}

struct Discard;

impl Outbound for Discard {
    fn send_line(&self, _line: String) -> Result<(), SendError> {
        Ok(())
    }
}

fuzz_target!(|data: &[u8]| {
    // Frames arrive as text; only fuzz valid UTF-8
    if let Ok(input) = str::from_utf8(data) {
        if let Ok(msg) = Message::parse(input, &Fresh, Arc::new(Discard)) {
            let _ = msg.reply(msg.body());
            let _ = msg.is_private();
        }
    }
});
