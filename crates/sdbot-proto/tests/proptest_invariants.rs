//! Property-based tests for frame parsing.
//!
//! Uses proptest to generate frames and verify that:
//! 1. Parsing never panics, whatever the input
//! 2. The reply target is the sender exactly for `pm` frames
//! 3. Frames without a command marker fall back to `none`
//! 4. Chat and pm bodies rejoin to the original tail fields

mod common;

use std::sync::Arc;

use common::{Recorder, TestRegistry};
use proptest::prelude::*;
use sdbot_proto::{CommandKind, Message, Target};

fn parse(raw: &str) -> Result<Message, sdbot_proto::FrameError> {
    Message::parse(raw, &TestRegistry::default(), Arc::new(Recorder::default()))
}

/// Short command tags, mixing recognized ones in every case with noise.
fn command_strategy() -> impl Strategy<Value = String> {
    prop_oneof![
        Just("c:".to_string()),
        Just("C:".to_string()),
        Just("c".to_string()),
        Just("j".to_string()),
        Just("L".to_string()),
        Just("n".to_string()),
        Just("pm".to_string()),
        Just("Pm".to_string()),
        Just("PM".to_string()),
        prop::string::string_regex("[a-z:]{1,6}").expect("valid regex"),
    ]
}

/// Auth character plus a username.
fn identity_strategy() -> impl Strategy<Value = String> {
    prop::string::string_regex("[ +%@#~][A-Za-z0-9 ]{1,12}").expect("valid regex")
}

/// Body text, pipes allowed, no newlines.
fn body_strategy() -> impl Strategy<Value = String> {
    prop::string::string_regex("[^\n]{0,60}").expect("valid regex")
}

proptest! {
    #[test]
    fn parse_never_panics(raw in "\\PC{0,80}") {
        let _ = parse(&raw);
    }

    #[test]
    fn parse_never_panics_on_pipes(raw in "[|\n>:a-c ]{0,24}") {
        let _ = parse(&raw);
    }

    #[test]
    fn target_is_user_iff_pm(
        command in command_strategy(),
        identity in identity_strategy(),
        body in body_strategy(),
    ) {
        let raw = format!(">room\n|{command}|100|{identity}|{body}");
        if let Ok(msg) = parse(&raw) {
            let is_pm = msg.command().eq_ignore_ascii_case("pm");
            prop_assert_eq!(matches!(msg.target(), Target::User(_)), is_pm);
            if !is_pm {
                prop_assert!(msg.target().is_room(msg.room()));
            }
            prop_assert_eq!(msg.is_private(), is_pm);
        }
    }

    #[test]
    fn no_marker_falls_back(raw in "[^|]{0,80}") {
        let msg = parse(&raw).expect("frames without pipes always parse");
        prop_assert_eq!(msg.command(), "none");
        prop_assert_eq!(msg.kind(), CommandKind::NoCommand);
        prop_assert!(msg.params().is_empty());
        prop_assert!(msg.user().is_none());
        prop_assert_eq!(msg.body(), raw.split('\n').last().unwrap_or_default());
    }

    #[test]
    fn text_body_round_trips(
        identity in identity_strategy(),
        tail in prop::collection::vec("[^|\n]{0,10}", 0..6),
        pm in any::<bool>(),
    ) {
        let joined = tail.join("|");
        let raw = if pm {
            format!("|pm|{identity}|Bot|{joined}")
        } else {
            format!("|c:|1700000000|{identity}|{joined}")
        };
        let msg = parse(&raw).expect("well-formed frame");
        prop_assert_eq!(msg.body(), joined.as_str());

        let rebuilt: Vec<&str> = msg.body().split('|').collect();
        prop_assert_eq!(&msg.params()[2..], rebuilt.as_slice());
    }
}
