//! Inbound frame source.
//!
//! Frames are read line by line; a frame is the run of lines up to a blank
//! line (or end of input), rejoined with `\n`. This keeps the `>room`
//! header line attached to the line it scopes. A frame that runs past the
//! line limit is discarded up to its terminating blank line.

use futures_util::StreamExt;
use tokio::io::AsyncRead;
use tokio_util::codec::{FramedRead, LinesCodec};
use tracing::warn;

use crate::error::TransportError;

/// Maximum length of one input line.
pub const MAX_LINE_LEN: usize = 64 * 1024;

/// Maximum number of lines in one frame.
pub const MAX_FRAME_LINES: usize = 1024;

/// Reads blank-line separated frames from an async reader.
pub struct FrameSource<R> {
    lines: FramedRead<R, LinesCodec>,
    max_lines: usize,
}

impl<R: AsyncRead + Unpin> FrameSource<R> {
    pub fn new(reader: R) -> Self {
        Self::with_max_lines(reader, MAX_FRAME_LINES)
    }

    pub fn with_max_lines(reader: R, max_lines: usize) -> Self {
        Self {
            lines: FramedRead::new(reader, LinesCodec::new_with_max_length(MAX_LINE_LEN)),
            max_lines: max_lines.max(1),
        }
    }

    /// Next frame, or `None` at end of input.
    pub async fn next_frame(&mut self) -> Result<Option<String>, TransportError> {
        let mut frame: Vec<String> = Vec::new();
        let mut discarding = false;
        while let Some(line) = self.lines.next().await {
            let line = line?;
            if line.is_empty() {
                if discarding {
                    discarding = false;
                    continue;
                }
                if frame.is_empty() {
                    continue;
                }
                return Ok(Some(frame.join("\n")));
            }
            if discarding {
                continue;
            }
            if frame.len() == self.max_lines {
                warn!(max_lines = self.max_lines, "Discarding oversized frame");
                frame.clear();
                discarding = true;
                continue;
            }
            frame.push(line);
        }

        if frame.is_empty() {
            Ok(None)
        } else {
            Ok(Some(frame.join("\n")))
        }
    }
}
