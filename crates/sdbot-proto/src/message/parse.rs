//! The single parse pass.
//!
//! Tokenize once, read the command field, then run one resolver per
//! concern over the shared tokens. Resolvers only depend on the tokens and
//! the command, never on each other's output, except the target which
//! picks between the resolved room and user.

use std::sync::Arc;

use crate::command::{CommandField, CommandKind};
use crate::error::{FrameError, Result};
use crate::frame::{ROOM_MARKER, Tokens};
use crate::identity::{Registry, Room, Target, User};

/// Parser behaviour switches.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct ParseOptions {
    /// Return [`FrameError::TimestampParse`] for a non-numeric timestamp.
    /// When off, the timestamp falls back to zero.
    pub strict_timestamps: bool,
}

impl Default for ParseOptions {
    fn default() -> Self {
        Self {
            strict_timestamps: true,
        }
    }
}

/// Everything the parse pass produces for one frame.
#[derive(Debug)]
pub(crate) struct Parsed {
    pub command: String,
    pub kind: CommandKind,
    pub params: Vec<String>,
    pub timestamp: i64,
    pub room: Arc<Room>,
    pub user: Option<Arc<User>>,
    pub auth: String,
    pub target: Target,
    pub body: String,
}

/// Sender of a recognized command shape.
#[derive(Debug, Default)]
struct Identity {
    auth: String,
    user: Option<Arc<User>>,
}

pub(crate) fn parse_frame(
    raw: &str,
    registry: &dyn Registry,
    options: ParseOptions,
) -> Result<Parsed> {
    let tokens = Tokens::new(raw);
    let field = CommandField::read(&tokens);
    let command = field.tag();
    let kind = field.kind();
    let params = field.params(&tokens);

    let timestamp = extract_timestamp(command, &tokens, &params, options)?;
    check_shape(command, kind, &tokens)?;
    let room = resolve_room(&tokens, registry);
    let identity = resolve_identity(command, kind, &tokens, registry)?;
    let body = extract_body(field, kind, &tokens);
    let target = resolve_target(kind, &room, identity.user.as_ref());

    Ok(Parsed {
        command: command.to_owned(),
        kind,
        params,
        timestamp,
        room,
        user: identity.user,
        auth: identity.auth,
        target,
        body,
    })
}

/// Parse `params[0]` when the tag contains a colon; zero otherwise.
fn extract_timestamp(
    command: &str,
    tokens: &Tokens<'_>,
    params: &[String],
    options: ParseOptions,
) -> Result<i64> {
    if !command.contains(':') {
        return Ok(0);
    }

    let Some(value) = params.first() else {
        return Err(FrameError::MalformedFrame {
            command: command.to_owned(),
            expected: 3,
            got: tokens.fields.len(),
        });
    };

    match value.parse::<i64>() {
        Ok(timestamp) => Ok(timestamp),
        Err(source) if options.strict_timestamps => Err(FrameError::TimestampParse {
            value: value.clone(),
            source,
        }),
        Err(error) => {
            tracing::debug!(command, value = %value, %error, "ignoring invalid timestamp");
            Ok(0)
        }
    }
}

/// Reject recognized shapes that are missing fields they index.
fn check_shape(command: &str, kind: CommandKind, tokens: &Tokens<'_>) -> Result<()> {
    let expected = kind.required_fields();
    let got = tokens.fields.len();
    if got < expected {
        return Err(FrameError::MalformedFrame {
            command: command.to_owned(),
            expected,
            got,
        });
    }
    Ok(())
}

/// Room from a leading `>name` line, or the empty sentinel.
fn resolve_room(tokens: &Tokens<'_>, registry: &dyn Registry) -> Arc<Room> {
    match tokens.first_line().strip_prefix(ROOM_MARKER) {
        Some(name) => registry.find_or_create_room(name),
        None => Arc::new(Room::empty()),
    }
}

/// Split the identity field into auth character and username.
fn resolve_identity(
    command: &str,
    kind: CommandKind,
    tokens: &Tokens<'_>,
    registry: &dyn Registry,
) -> Result<Identity> {
    let Some(index) = kind.identity_field() else {
        return Ok(Identity::default());
    };
    let field = tokens.field(index).ok_or_else(|| FrameError::MalformedFrame {
        command: command.to_owned(),
        expected: index + 1,
        got: tokens.fields.len(),
    })?;

    let mut chars = field.chars();
    let Some(auth) = chars.next() else {
        return Err(FrameError::EmptyIdentity {
            command: command.to_owned(),
            index,
        });
    };

    Ok(Identity {
        auth: auth.to_string(),
        user: Some(registry.find_or_create_user(chars.as_str())),
    })
}

fn extract_body(field: CommandField<'_>, kind: CommandKind, tokens: &Tokens<'_>) -> String {
    if field == CommandField::Empty {
        return String::new();
    }

    match kind {
        k if k.has_text_body() => tokens.fields_from(4).join("|"),
        CommandKind::NoCommand => tokens.last_line().to_owned(),
        _ => String::new(),
    }
}

fn resolve_target(kind: CommandKind, room: &Arc<Room>, user: Option<&Arc<User>>) -> Target {
    match (kind, user) {
        (CommandKind::PrivateMessage, Some(user)) => Target::User(Arc::clone(user)),
        _ => Target::Room(Arc::clone(room)),
    }
}
