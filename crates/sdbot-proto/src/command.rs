//! Command classification.
//!
//! The command tag is the second pipe field. The stored tag keeps its
//! case; branching goes through [`CommandKind`], derived from the
//! lower-cased tag.

use std::fmt;

use crate::frame::Tokens;

/// Tag stored when a frame carries no command marker.
pub const NO_COMMAND: &str = "none";

/// The command shapes the parser distinguishes.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum CommandKind {
    /// `c:` - timestamped chat message.
    TimestampedChat,
    /// `c` - chat message without a timestamp.
    Chat,
    /// `j` - user joined a room.
    Join,
    /// `l` - user left a room.
    Leave,
    /// `n` - user changed name.
    Rename,
    /// `pm` - private message.
    PrivateMessage,
    /// `none` - raw line without a command marker.
    NoCommand,
    /// Anything else. Not an error: fields stay empty or absent.
    Other,
}

impl CommandKind {
    /// Classify a tag, ignoring case.
    pub fn from_tag(tag: &str) -> Self {
        match tag.to_ascii_lowercase().as_str() {
            "c:" => Self::TimestampedChat,
            "c" => Self::Chat,
            "j" => Self::Join,
            "l" => Self::Leave,
            "n" => Self::Rename,
            "pm" => Self::PrivateMessage,
            NO_COMMAND => Self::NoCommand,
            _ => Self::Other,
        }
    }

    /// Index of the `auth-char + username` field for shapes that carry a
    /// sender, or `None` for shapes that don't.
    pub fn identity_field(self) -> Option<usize> {
        match self {
            Self::TimestampedChat => Some(3),
            Self::Chat | Self::Join | Self::Leave | Self::Rename | Self::PrivateMessage => Some(2),
            Self::NoCommand | Self::Other => None,
        }
    }

    /// Minimum number of pipe fields the shape needs to be well formed.
    pub fn required_fields(self) -> usize {
        match self {
            Self::TimestampedChat | Self::PrivateMessage => 4,
            Self::Chat | Self::Join | Self::Leave | Self::Rename => 3,
            Self::NoCommand | Self::Other => 0,
        }
    }

    /// Whether the body is the pipe-rejoined tail starting at field 4.
    #[inline]
    pub fn has_text_body(self) -> bool {
        matches!(self, Self::TimestampedChat | Self::PrivateMessage)
    }

    /// Canonical lower-case tag.
    pub fn as_str(self) -> &'static str {
        match self {
            Self::TimestampedChat => "c:",
            Self::Chat => "c",
            Self::Join => "j",
            Self::Leave => "l",
            Self::Rename => "n",
            Self::PrivateMessage => "pm",
            Self::NoCommand => NO_COMMAND,
            Self::Other => "other",
        }
    }
}

impl fmt::Display for CommandKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Result of reading the command field, before the empty state collapses.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum CommandField<'a> {
    /// Fewer than two fields: no marker at all.
    Absent,
    /// Marker present but the tag is empty (`"|"`, `"||x"`).
    Empty,
    /// A non-empty tag.
    Tag(&'a str),
}

impl<'a> CommandField<'a> {
    /// Read the command field from a tokenized frame.
    pub fn read(tokens: &Tokens<'a>) -> Self {
        match tokens.field(1) {
            None => Self::Absent,
            Some("") => Self::Empty,
            Some(tag) => Self::Tag(tag),
        }
    }

    /// The final stored tag. Both the absent and empty states collapse to
    /// [`NO_COMMAND`].
    pub fn tag(self) -> &'a str {
        match self {
            Self::Absent | Self::Empty => NO_COMMAND,
            Self::Tag(tag) => tag,
        }
    }

    /// The classified kind of the final tag.
    pub fn kind(self) -> CommandKind {
        CommandKind::from_tag(self.tag())
    }

    /// Parameters following the command field. Empty unless a non-empty tag
    /// is followed by further fields.
    pub fn params(self, tokens: &Tokens<'a>) -> Vec<String> {
        match self {
            Self::Tag(_) => tokens
                .fields_from(2)
                .iter()
                .map(|s| (*s).to_owned())
                .collect(),
            Self::Absent | Self::Empty => Vec::new(),
        }
    }
}
