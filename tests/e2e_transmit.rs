//! E2E tests for chunked frame transmission
//!
//! Verifies chunk sizing, ordering and failure propagation against an
//! in-process channel link and a real UDP socket.

use imustream::protocol::codec::{decode, encode, FRAME_LEN};
use imustream::sample::RawSample;
use imustream::transport::{
    ChannelTransport, FrameTransmitter, TransmitError, Transport, TransportError, UdpTransport,
};
use imustream::CHANNEL_COUNT;
use std::net::UdpSocket;
use std::time::Duration;

fn frame_bytes() -> Vec<u8> {
    let raw = RawSample::from_channels([-12, 340, 16391, 3, -7, 0, 1640, 2, -3280]);
    encode(&raw.to_physical()).as_bytes().to_vec()
}

/// 38-byte frame over a 20-byte link: chunks of 20 then 18, in order
#[test]
fn test_two_chunks_for_default_link() {
    let frame = frame_bytes();
    let (transport, rx) = ChannelTransport::bounded(8);
    let mut tx = FrameTransmitter::new(transport);

    assert_eq!(tx.send(&frame, 20).unwrap(), 2);

    let chunks: Vec<Vec<u8>> = rx.try_iter().collect();
    assert_eq!(chunks.len(), 2);
    assert_eq!(chunks[0].len(), 20);
    assert_eq!(chunks[1].len(), 18);
    assert_eq!(chunks.concat(), frame);
}

/// Any chunk size reassembles to the same frame with the expected count
#[test]
fn test_all_chunk_sizes() {
    let frame = frame_bytes();
    for size in 1..=FRAME_LEN + 5 {
        let (transport, rx) = ChannelTransport::bounded(FRAME_LEN);
        let mut tx = FrameTransmitter::new(transport);

        let sent = tx.send(&frame, size).unwrap();
        assert_eq!(sent, (FRAME_LEN + size - 1) / size);

        let chunks: Vec<Vec<u8>> = rx.try_iter().collect();
        assert!(chunks.iter().all(|c| c.len() <= size && !c.is_empty()));
        assert_eq!(chunks.iter().map(Vec::len).sum::<usize>(), FRAME_LEN);
        assert_eq!(decode(&chunks.concat()).unwrap().to_channels().len(), CHANNEL_COUNT);
    }
}

/// Link failing on the second chunk: error carries the chunk index
#[test]
fn test_failure_propagates_to_caller() {
    struct FlakyLink {
        writes: usize,
    }

    impl Transport for FlakyLink {
        fn write(&mut self, _chunk: &[u8]) -> Result<(), TransportError> {
            self.writes += 1;
            if self.writes == 2 {
                return Err(TransportError::Rejected("buffer full".to_string()));
            }
            Ok(())
        }
    }

    let mut tx = FrameTransmitter::new(FlakyLink { writes: 0 });
    let err = tx.send(&frame_bytes(), 10).unwrap_err();

    assert!(matches!(err, TransmitError::Transport { chunk: 1, .. }));
    assert_eq!(err.to_string(), "Transport failed on chunk 1: Write rejected: buffer full");
    assert_eq!(tx.transport().writes, 2);
}

/// Full channel surfaces as a rejected write
#[test]
fn test_channel_backpressure_is_an_error() {
    let (transport, _rx) = ChannelTransport::bounded(1);
    let mut tx = FrameTransmitter::new(transport);

    assert!(matches!(
        tx.send(&frame_bytes(), 20),
        Err(TransmitError::Transport {
            chunk: 1,
            source: TransportError::Rejected(_)
        })
    ));
}

/// Chunks travel as individual UDP datagrams and reassemble into a valid frame
#[test]
fn test_udp_datagrams_reassemble() {
    let receiver = UdpSocket::bind("127.0.0.1:0").unwrap();
    receiver
        .set_read_timeout(Some(Duration::from_secs(2)))
        .unwrap();

    let transport = UdpTransport::connect(receiver.local_addr().unwrap()).unwrap();
    let mut tx = FrameTransmitter::new(transport);
    let frame = frame_bytes();
    assert_eq!(tx.send(&frame, 20).unwrap(), 2);

    let mut reassembled = Vec::new();
    let mut buf = [0u8; 64];
    for expected_len in [20, 18] {
        let n = receiver.recv(&mut buf).unwrap();
        assert_eq!(n, expected_len);
        reassembled.extend_from_slice(&buf[..n]);
    }
    assert_eq!(reassembled, frame);
    assert!(decode(&reassembled).is_ok());
}
