use std::fmt;
use std::sync::Arc;

use chrono::{DateTime, Utc};
use regex::Regex;

use super::matches::{Captures, MatchCache};
use super::parse::{ParseOptions, parse_frame};
use crate::command::CommandKind;
use crate::error::{ReplyError, Result};
use crate::identity::{Outbound, Registry, Room, Target, User};

/// One parsed protocol event.
///
/// Built once per incoming frame and immutable afterwards, apart from the
/// match cache behind [`Message::matches`]. `Message` is `Send + Sync`, so
/// handlers may share one instance across threads.
///
/// # Example
///
/// ```
/// use std::sync::Arc;
/// use sdbot_proto::{Message, Outbound, Registry, Room, SendError, User};
///
/// struct Fresh;
/// impl Registry for Fresh {
///     fn find_or_create_room(&self, name: &str) -> Arc<Room> { Arc::new(Room::new(name)) }
///     fn find_or_create_user(&self, name: &str) -> Arc<User> { Arc::new(User::new(name)) }
/// }
///
/// struct Discard;
/// impl Outbound for Discard {
///     fn send_line(&self, _line: String) -> Result<(), SendError> { Ok(()) }
/// }
///
/// let msg = Message::parse(">lobby\n|c:|1680000000|%Alice|hi", &Fresh, Arc::new(Discard)).unwrap();
/// assert_eq!(msg.room().name(), "lobby");
/// assert_eq!(msg.auth(), "%");
/// assert_eq!(msg.body(), "hi");
/// ```
pub struct Message {
    command: String,
    kind: CommandKind,
    params: Vec<String>,
    timestamp: i64,
    room: Arc<Room>,
    user: Option<Arc<User>>,
    auth: String,
    target: Target,
    body: String,
    received_at: DateTime<Utc>,
    outbound: Arc<dyn Outbound>,
    matches: MatchCache,
}

impl Message {
    /// Parse a raw frame with default options.
    ///
    /// Room and user names are resolved through `registry`, which may
    /// register unseen entries. Replies are written to `outbound`.
    pub fn parse(raw: &str, registry: &dyn Registry, outbound: Arc<dyn Outbound>) -> Result<Self> {
        Self::parse_with(raw, registry, outbound, ParseOptions::default())
    }

    /// Parse a raw frame with explicit options.
    pub fn parse_with(
        raw: &str,
        registry: &dyn Registry,
        outbound: Arc<dyn Outbound>,
        options: ParseOptions,
    ) -> Result<Self> {
        let parsed = parse_frame(raw, registry, options)?;
        Ok(Self {
            command: parsed.command,
            kind: parsed.kind,
            params: parsed.params,
            timestamp: parsed.timestamp,
            room: parsed.room,
            user: parsed.user,
            auth: parsed.auth,
            target: parsed.target,
            body: parsed.body,
            received_at: Utc::now(),
            outbound,
            matches: MatchCache::new(),
        })
    }

    /// Command tag as stored, case preserved. `"none"` without a marker.
    pub fn command(&self) -> &str {
        &self.command
    }

    /// Classified command.
    pub fn kind(&self) -> CommandKind {
        self.kind
    }

    /// Fields following the command field.
    pub fn params(&self) -> &[String] {
        &self.params
    }

    /// Server timestamp in Unix seconds, zero when the frame has none.
    pub fn timestamp(&self) -> i64 {
        self.timestamp
    }

    /// Server timestamp as a UTC instant, when present and in range.
    pub fn timestamp_utc(&self) -> Option<DateTime<Utc>> {
        if self.timestamp == 0 {
            return None;
        }
        DateTime::from_timestamp(self.timestamp, 0)
    }

    /// Room the frame was broadcast in, or the empty sentinel.
    pub fn room(&self) -> &Arc<Room> {
        &self.room
    }

    /// Sender, for the command shapes that carry one.
    pub fn user(&self) -> Option<&Arc<User>> {
        self.user.as_ref()
    }

    /// Sender's authorization character, or empty.
    pub fn auth(&self) -> &str {
        &self.auth
    }

    /// Where replies go.
    pub fn target(&self) -> &Target {
        &self.target
    }

    /// Message text, or empty.
    pub fn body(&self) -> &str {
        &self.body
    }

    /// Local time the frame was parsed.
    pub fn received_at(&self) -> DateTime<Utc> {
        self.received_at
    }

    /// Reply to the target, prefixed with the sender's name.
    pub fn reply(&self, text: &str) -> Result<(), ReplyError> {
        self.target
            .reply(self.user.as_deref(), text, self.outbound.as_ref())
    }

    /// Reply to the target verbatim.
    ///
    /// The text reaches the server unescaped and a leading `/` or `!` runs
    /// as a client command. Never pass user-supplied text through here;
    /// use [`Message::reply`] for anything but static strings.
    pub fn raw_reply(&self, text: &str) -> Result<(), ReplyError> {
        self.target.raw_reply(text, self.outbound.as_ref())
    }

    /// Claim this message for `(event, pattern)`.
    ///
    /// Returns `true` the first time `pattern` matches the body for this
    /// event and stores the capture groups. Every later call for the same
    /// pair returns `false`, whether or not the pattern would still match.
    /// Separately compiled patterns are distinct pairs even when their
    /// source text is equal.
    pub fn matches(&self, pattern: &Arc<Regex>, event: &str) -> bool {
        self.matches.claim(pattern, event, &self.body)
    }

    /// Capture groups stored by a successful [`Message::matches`].
    pub fn captures(&self, pattern: &Arc<Regex>, event: &str) -> Option<Captures> {
        self.matches.get(pattern, event)
    }

    /// Whether the message arrived as a private message: the sender and the
    /// reply target are the same user entity.
    pub fn is_private(&self) -> bool {
        self.user
            .as_ref()
            .is_some_and(|user| self.target.is_user(user))
    }
}

impl fmt::Debug for Message {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Message")
            .field("command", &self.command)
            .field("params", &self.params)
            .field("timestamp", &self.timestamp)
            .field("room", &self.room.name())
            .field("user", &self.user.as_ref().map(|u| u.name()))
            .field("auth", &self.auth)
            .field("target", &self.target.name())
            .field("body", &self.body)
            .finish_non_exhaustive()
    }
}
