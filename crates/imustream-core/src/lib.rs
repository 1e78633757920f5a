//! Imustream Core - signal conditioning and framing for 9-axis IMU streaming
//!
//! This library provides the pipeline that sits between a raw inertial sensor
//! and a constrained wireless transport: a fixed-capacity per-channel history,
//! a randomized median filter over that history, a byte-exact frame codec with
//! a CRC-8 trailer, and chunked transmission for small-payload links.

pub mod buffer;
pub mod filter;
pub mod pipeline;
pub mod protocol;
pub mod sample;
pub mod sensor;
pub mod stats;
pub mod transport;

pub use buffer::ring::RingBuffer;
pub use filter::median::MedianFilter;
pub use pipeline::StreamPipeline;
pub use protocol::codec::{decode, encode, Frame};
pub use sample::{ImuReading, RawSample, Sample, Vector3};
pub use stats::store::StreamStats;
pub use transport::{FrameTransmitter, Transport};

/// Library version from Cargo.toml
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

/// Number of scalar channels in one sample (3 sensors x 3 axes)
pub const CHANNEL_COUNT: usize = 9;

/// Median window used by the device control loop (must be odd)
pub const FILTER_WINDOW: usize = 11;

/// Default sampling rate of the control loop in Hz
pub const DEFAULT_SAMPLE_RATE_HZ: u32 = 50;

/// Largest payload a single transport write may carry
pub const DEFAULT_MAX_CHUNK_SIZE: usize = 20;
