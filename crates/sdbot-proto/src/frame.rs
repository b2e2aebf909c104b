//! Frame tokenization.
//!
//! A frame is split two ways at once: on `\n` into lines, and (as a whole,
//! not per line) on `|` into fields. Both views borrow from the raw frame.

/// Field separator on the wire.
pub const FIELD_SEPARATOR: char = '|';

/// Line separator on the wire.
pub const LINE_SEPARATOR: char = '\n';

/// Marker that opens a room header line.
pub const ROOM_MARKER: char = '>';

/// Borrowed newline and pipe segments of one frame.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Tokens<'a> {
    /// Newline segments. Never empty.
    pub lines: Vec<&'a str>,
    /// Pipe segments of the whole frame. Never empty.
    pub fields: Vec<&'a str>,
}

impl<'a> Tokens<'a> {
    /// Tokenize a raw frame. Empty input yields one empty line and one empty field.
    pub fn new(raw: &'a str) -> Self {
        Self {
            lines: raw.split(LINE_SEPARATOR).collect(),
            fields: raw.split(FIELD_SEPARATOR).collect(),
        }
    }

    /// The first line, which carries the room header when present.
    #[inline]
    pub fn first_line(&self) -> &'a str {
        self.lines[0]
    }

    /// The last line.
    #[inline]
    pub fn last_line(&self) -> &'a str {
        self.lines[self.lines.len() - 1]
    }

    /// Field at `index`, if the frame has that many.
    #[inline]
    pub fn field(&self, index: usize) -> Option<&'a str> {
        self.fields.get(index).copied()
    }

    /// Fields from `start` onward; empty when out of range.
    #[inline]
    pub fn fields_from(&self, start: usize) -> &[&'a str] {
        self.fields.get(start..).unwrap_or(&[])
    }
}
