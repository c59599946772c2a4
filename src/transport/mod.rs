use anyhow::Result;

use crate::protocol::ViewerMessage;

pub mod mock;

pub use mock::RecordingTransport;

/// Delivery seam to the remote viewer.
///
/// The core hands over one ordered message list per reconciliation pass and
/// expects delivery order to be preserved. It never retries: a failed delivery
/// propagates to the caller and the acknowledged state still advances, so
/// retry policy (if any) belongs to the transport implementation.
pub trait ViewerTransport: Send + Sync {
    fn deliver(&self, messages: Vec<ViewerMessage>) -> Result<()>;
}

/// Transport that discards everything, for rosters without a connected viewer.
pub struct NullTransport;

impl ViewerTransport for NullTransport {
    fn deliver(&self, _messages: Vec<ViewerMessage>) -> Result<()> {
        Ok(())
    }
}
