use std::sync::Mutex;

use anyhow::Result;

use crate::protocol::ViewerMessage;
use crate::transport::ViewerTransport;

/// Records every delivered batch for inspection in tests.
#[derive(Default)]
pub struct RecordingTransport {
    batches: Mutex<Vec<Vec<ViewerMessage>>>,
}

impl RecordingTransport {
    pub fn new() -> Self {
        Self::default()
    }

    /// Batches in delivery order.
    pub fn batches(&self) -> Vec<Vec<ViewerMessage>> {
        self.batches.lock().unwrap().clone()
    }

    /// All delivered messages flattened across batches.
    pub fn messages(&self) -> Vec<ViewerMessage> {
        self.batches.lock().unwrap().iter().flatten().cloned().collect()
    }

    pub fn batch_count(&self) -> usize {
        self.batches.lock().unwrap().len()
    }

    pub fn clear(&self) {
        self.batches.lock().unwrap().clear();
    }
}

impl ViewerTransport for RecordingTransport {
    fn deliver(&self, messages: Vec<ViewerMessage>) -> Result<()> {
        self.batches.lock().unwrap().push(messages);
        Ok(())
    }
}
