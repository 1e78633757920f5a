//! In-process transport over a bounded crossbeam channel

use crossbeam_channel::{Receiver, Sender, TrySendError};

use super::{Transport, TransportError};

/// Sends each chunk as an owned buffer into a bounded channel
///
/// Never blocks: a full channel rejects the write, a dropped receiver
/// reports a disconnect.
#[derive(Debug, Clone)]
pub struct ChannelTransport {
    tx: Sender<Vec<u8>>,
}

impl ChannelTransport {
    /// Create a transport and the receiving end, holding up to `capacity` chunks
    pub fn bounded(capacity: usize) -> (Self, Receiver<Vec<u8>>) {
        let (tx, rx) = crossbeam_channel::bounded(capacity);
        (Self { tx }, rx)
    }

    pub fn new(tx: Sender<Vec<u8>>) -> Self {
        Self { tx }
    }
}

impl Transport for ChannelTransport {
    fn write(&mut self, chunk: &[u8]) -> Result<(), TransportError> {
        self.tx.try_send(chunk.to_vec()).map_err(|e| match e {
            TrySendError::Full(_) => TransportError::Rejected("channel full".to_string()),
            TrySendError::Disconnected(_) => TransportError::Disconnected,
        })
    }
}
