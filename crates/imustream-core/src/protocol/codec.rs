//! Frame encoding, decoding and the CRC-8 trailer

use thiserror::Error;

use crate::sample::Sample;
use crate::CHANNEL_COUNT;

/// First byte of every frame
pub const START_MARKER: u8 = 0xFF;

/// Bytes per channel value (IEEE-754 single precision)
pub const FIELD_LEN: usize = 4;

/// Payload bytes between marker and checksum
pub const PAYLOAD_LEN: usize = CHANNEL_COUNT * FIELD_LEN;

/// Total frame length: marker + payload + checksum
pub const FRAME_LEN: usize = 1 + PAYLOAD_LEN + 1;

/// CRC-8 feedback mask, applied after the right shift
const CRC8_POLY: u8 = 0x8C;

/// Errors a receiver can hit when validating a frame
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum CodecError {
    #[error("Frame length mismatch: expected {expected}, got {actual}")]
    Length { expected: usize, actual: usize },

    #[error("Bad start marker: 0x{0:02X}")]
    StartMarker(u8),

    #[error("Checksum mismatch: computed 0x{expected:02X}, frame carries 0x{actual:02X}")]
    ChecksumMismatch { expected: u8, actual: u8 },
}

/// An encoded sample, ready for transmission
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Frame([u8; FRAME_LEN]);

impl Frame {
    pub fn as_bytes(&self) -> &[u8] {
        &self.0
    }

    /// Trailing checksum byte
    pub fn checksum(&self) -> u8 {
        self.0[FRAME_LEN - 1]
    }
}

impl AsRef<[u8]> for Frame {
    fn as_ref(&self) -> &[u8] {
        &self.0
    }
}

/// CRC-8, LSB first, mask 0x8C, seed 0 (Dallas/Maxim 1-Wire)
///
/// Bitwise, no lookup table.
pub fn crc8(data: &[u8]) -> u8 {
    let mut crc: u8 = 0;
    for &byte in data {
        let mut byte = byte;
        for _ in 0..8 {
            let mix = (crc ^ byte) & 0x01;
            crc >>= 1;
            if mix != 0 {
                crc ^= CRC8_POLY;
            }
            byte >>= 1;
        }
    }
    crc
}

/// Encode a sample into a frame
pub fn encode(sample: &Sample) -> Frame {
    let mut bytes = [0u8; FRAME_LEN];
    bytes[0] = START_MARKER;

    for (field, value) in bytes[1..=PAYLOAD_LEN]
        .chunks_exact_mut(FIELD_LEN)
        .zip(sample.to_channels())
    {
        field.copy_from_slice(&value.to_le_bytes());
    }

    bytes[FRAME_LEN - 1] = crc8(&bytes[..FRAME_LEN - 1]);
    Frame(bytes)
}

/// Validate and decode a frame
///
/// Checks length, start marker and checksum in that order. A failing frame
/// should simply be dropped; the next periodic sample supersedes it.
pub fn decode(frame: &[u8]) -> Result<Sample, CodecError> {
    if frame.len() != FRAME_LEN {
        return Err(CodecError::Length {
            expected: FRAME_LEN,
            actual: frame.len(),
        });
    }
    if frame[0] != START_MARKER {
        return Err(CodecError::StartMarker(frame[0]));
    }

    let expected = crc8(&frame[..FRAME_LEN - 1]);
    let actual = frame[FRAME_LEN - 1];
    if expected != actual {
        return Err(CodecError::ChecksumMismatch { expected, actual });
    }

    let mut channels = [0.0f32; CHANNEL_COUNT];
    for (value, field) in channels
        .iter_mut()
        .zip(frame[1..=PAYLOAD_LEN].chunks_exact(FIELD_LEN))
    {
        *value = f32::from_le_bytes([field[0], field[1], field[2], field[3]]);
    }

    Ok(Sample::from_channels(channels))
}
