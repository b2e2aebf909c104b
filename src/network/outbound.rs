//! Outbound line queue.
//!
//! Replies are produced synchronously by handlers and queued on a bounded
//! channel; a writer task drains the queue to the transport.

use futures_util::SinkExt;
use sdbot_proto::{Outbound, SendError};
use tokio::io::AsyncWrite;
use tokio::sync::mpsc;
use tokio::sync::mpsc::error::TrySendError;
use tokio_util::codec::{FramedWrite, LinesCodec};
use tracing::{debug, warn};

use crate::error::TransportError;

/// Maximum queued outbound lines before replies start failing.
pub const OUTBOUND_QUEUE_SIZE: usize = 256;

/// [`Outbound`] sink backed by a bounded mpsc channel.
#[derive(Debug, Clone)]
pub struct ChannelOutbound {
    tx: mpsc::Sender<String>,
}

impl ChannelOutbound {
    /// Create the sink and the receiver for [`run_writer`].
    pub fn channel(capacity: usize) -> (Self, mpsc::Receiver<String>) {
        let (tx, rx) = mpsc::channel(capacity);
        (Self { tx }, rx)
    }
}

impl Outbound for ChannelOutbound {
    fn send_line(&self, line: String) -> Result<(), SendError> {
        match self.tx.try_send(line) {
            Ok(()) => Ok(()),
            Err(TrySendError::Full(line)) => {
                warn!(len = line.len(), "Outbound queue full, dropping line");
                Err(SendError::Transport("outbound queue full".to_string()))
            }
            Err(TrySendError::Closed(_)) => Err(SendError::Closed),
        }
    }
}

/// Drain queued lines to `writer`, one per line, until every sender is gone.
pub async fn run_writer<W>(mut rx: mpsc::Receiver<String>, writer: W) -> Result<(), TransportError>
where
    W: AsyncWrite + Unpin,
{
    let mut framed = FramedWrite::new(writer, LinesCodec::new());
    while let Some(line) = rx.recv().await {
        debug!(line = %line, "Sending");
        framed.send(line).await?;
    }
    Ok(())
}
