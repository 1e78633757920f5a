//! Transport seam and chunked frame transmission
//!
//! The wireless link only accepts small writes, so [`FrameTransmitter`]
//! splits each frame into in-order chunks of at most `max_chunk_size` bytes.
//! Concrete links implement [`Transport`]:
//! - UDP datagrams as a host stand-in for the radio ([`udp`])
//! - In-process bounded channel for loopback and tests ([`channel`])

pub mod channel;
pub mod udp;

pub use channel::ChannelTransport;
pub use udp::UdpTransport;

use thiserror::Error;

/// Failure reported by the underlying link
#[derive(Error, Debug)]
pub enum TransportError {
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Transport disconnected")]
    Disconnected,

    #[error("Short write: {written} of {len} bytes")]
    ShortWrite { written: usize, len: usize },

    #[error("Write rejected: {0}")]
    Rejected(String),
}

/// Errors from [`FrameTransmitter::send`]
#[derive(Error, Debug)]
pub enum TransmitError {
    #[error("Maximum chunk size must be non-zero")]
    InvalidChunkSize,

    #[error("Transport failed on chunk {chunk}: {source}")]
    Transport {
        /// Zero-based index of the chunk that failed
        chunk: usize,
        #[source]
        source: TransportError,
    },
}

/// Write primitive of the link; called once per chunk
pub trait Transport {
    fn write(&mut self, chunk: &[u8]) -> Result<(), TransportError>;
}

impl<T: Transport + ?Sized> Transport for &mut T {
    fn write(&mut self, chunk: &[u8]) -> Result<(), TransportError> {
        (**self).write(chunk)
    }
}

impl<T: Transport + ?Sized> Transport for Box<T> {
    fn write(&mut self, chunk: &[u8]) -> Result<(), TransportError> {
        (**self).write(chunk)
    }
}

/// Splits frames into transport-sized chunks
///
/// No retries and no flow control: the first failing write aborts the frame
/// and the error goes back to the caller. One send at a time.
pub struct FrameTransmitter<T> {
    transport: T,
}

impl<T: Transport> FrameTransmitter<T> {
    pub fn new(transport: T) -> Self {
        Self { transport }
    }

    /// Send `frame` as consecutive chunks of at most `max_chunk_size` bytes
    ///
    /// # Returns
    /// Number of chunks written
    pub fn send(&mut self, frame: &[u8], max_chunk_size: usize) -> Result<usize, TransmitError> {
        if max_chunk_size == 0 {
            return Err(TransmitError::InvalidChunkSize);
        }

        let mut sent = 0;
        for (chunk_idx, chunk) in frame.chunks(max_chunk_size).enumerate() {
            self.transport
                .write(chunk)
                .map_err(|source| TransmitError::Transport {
                    chunk: chunk_idx,
                    source,
                })?;
            sent += 1;
        }

        tracing::trace!(bytes = frame.len(), chunks = sent, "Frame sent");
        Ok(sent)
    }

    pub fn transport(&self) -> &T {
        &self.transport
    }

    pub fn transport_mut(&mut self) -> &mut T {
        &mut self.transport
    }

    pub fn into_inner(self) -> T {
        self.transport
    }
}
