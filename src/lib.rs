//! Imustream - median-filtered IMU streaming over small-payload transports
//!
//! This library re-exports the filter, codec and transmitter from
//! `imustream-core` and adds the persistent configuration used by the
//! `imustream` binary.

pub mod config;

pub use imustream_core::{buffer, filter, pipeline, protocol, sample, sensor, stats, transport};

pub use config::StreamConfig;
pub use imustream_core::{
    decode, encode, Frame, FrameTransmitter, ImuReading, MedianFilter, RawSample, RingBuffer,
    Sample, StreamPipeline, StreamStats, Transport, Vector3,
};
pub use imustream_core::{
    CHANNEL_COUNT, DEFAULT_MAX_CHUNK_SIZE, DEFAULT_SAMPLE_RATE_HZ, FILTER_WINDOW, VERSION,
};
