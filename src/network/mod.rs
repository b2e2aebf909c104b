//! Frame input and reply output.

mod outbound;
mod source;

pub use outbound::{ChannelOutbound, OUTBOUND_QUEUE_SIZE, run_writer};
pub use source::FrameSource;
