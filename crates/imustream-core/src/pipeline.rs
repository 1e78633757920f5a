//! Device control loop
//!
//! One cycle is: sensor read -> median filter -> unit scaling -> encode ->
//! chunked transmit. Filtering runs on raw `i16` counts and scaling is applied
//! to the filtered result; the median commutes with the positive per-channel
//! scale factors so this gives the same values as scaling first.
//!
//! All loop state lives in [`StreamPipeline`], which has exactly one owner.

use std::sync::atomic::{AtomicBool, Ordering};
use std::time::{Duration, Instant};

use thiserror::Error;
use tracing::{debug, error, info, warn};

use crate::filter::median::MedianFilter;
use crate::protocol::codec::{self, FRAME_LEN};
use crate::sample::Sample;
use crate::sensor::{SensorError, SensorSource};
use crate::stats::store::StreamStats;
use crate::transport::{FrameTransmitter, TransmitError, Transport};
use crate::FILTER_WINDOW;

/// Consecutive failures after which the loop raises an error-level alert
const CONSECUTIVE_ERROR_ALERT: u32 = 50;

/// Failures of a single cycle; none of them stop the loop
#[derive(Error, Debug)]
pub enum PipelineError {
    #[error("Sensor read failed: {0}")]
    Sensor(#[from] SensorError),

    #[error("Transmit failed: {0}")]
    Transmit(#[from] TransmitError),
}

/// Sensor, filter and transmitter wired into one control loop
pub struct StreamPipeline<S, T, const W: usize = FILTER_WINDOW> {
    sensor: S,
    filter: MedianFilter<i16, W>,
    transmitter: FrameTransmitter<T>,
    max_chunk_size: usize,
    stats: StreamStats,
}

impl<S, T, const W: usize> StreamPipeline<S, T, W>
where
    S: SensorSource,
    T: Transport,
{
    /// Create a pipeline
    ///
    /// # Arguments
    /// * `sensor` - Source of raw samples
    /// * `transport` - Link write primitive
    /// * `filter` - Median filter over raw counts (seeded by the caller)
    /// * `max_chunk_size` - Largest single transport write; zero fails every send
    pub fn new(sensor: S, transport: T, filter: MedianFilter<i16, W>, max_chunk_size: usize) -> Self {
        Self {
            sensor,
            filter,
            transmitter: FrameTransmitter::new(transport),
            max_chunk_size,
            stats: StreamStats::new(),
        }
    }

    /// Run one read -> filter -> encode -> send cycle
    ///
    /// # Returns
    /// The filtered sample that was sent
    pub fn cycle(&mut self) -> Result<Sample, PipelineError> {
        let raw = match self.sensor.read() {
            Ok(raw) => raw,
            Err(e) => {
                self.stats.record_sensor_error();
                return Err(e.into());
            }
        };

        let filtered = self.filter.filter(&raw).to_physical();
        let frame = codec::encode(&filtered);

        match self.transmitter.send(frame.as_bytes(), self.max_chunk_size) {
            Ok(chunks) => {
                self.stats.record_frame(FRAME_LEN, chunks);
                debug!(
                    frame = self.stats.frames_sent,
                    crc = frame.checksum(),
                    chunks,
                    "Frame transmitted"
                );
                Ok(filtered)
            }
            Err(e) => {
                let written = match &e {
                    TransmitError::Transport { chunk, .. } => *chunk,
                    TransmitError::InvalidChunkSize => 0,
                };
                self.stats.record_transport_error(written);
                Err(e.into())
            }
        }
    }

    /// Repeat [`Self::cycle`] every `interval` until `running` clears
    ///
    /// The flag is checked between cycles only. With `max_cycles` set the loop
    /// also stops after that many cycles.
    ///
    /// # Returns
    /// Number of cycles executed
    pub fn run(&mut self, interval: Duration, max_cycles: Option<u64>, running: &AtomicBool) -> u64 {
        info!(
            interval_ms = interval.as_millis() as u64,
            window = W,
            chunk = self.max_chunk_size,
            "Control loop started"
        );

        let mut executed = 0u64;
        while running.load(Ordering::SeqCst) && max_cycles.map_or(true, |max| executed < max) {
            let started = Instant::now();
            let had_errors = self.stats.consecutive_errors;

            match self.cycle() {
                Ok(_) => {
                    if had_errors > 0 {
                        info!(after = had_errors, "Stream recovered after consecutive errors");
                    }
                }
                Err(e) => {
                    let consecutive = self.stats.consecutive_errors;
                    if consecutive % 100 == 1 {
                        warn!(consecutive, dropped = self.stats.dropped(), error = %e, "Cycle failed");
                    }
                    if consecutive == CONSECUTIVE_ERROR_ALERT {
                        error!(consecutive, "Stream failing continuously");
                    }
                }
            }
            executed += 1;

            let remaining = interval.saturating_sub(started.elapsed());
            if !remaining.is_zero() {
                std::thread::sleep(remaining);
            }
        }

        info!(
            cycles = executed,
            frames = self.stats.frames_sent,
            dropped = self.stats.dropped(),
            "Control loop stopped"
        );
        executed
    }

    pub fn stats(&self) -> &StreamStats {
        &self.stats
    }

    pub fn filter(&self) -> &MedianFilter<i16, W> {
        &self.filter
    }

    pub fn max_chunk_size(&self) -> usize {
        self.max_chunk_size
    }

    pub fn transport(&self) -> &T {
        self.transmitter.transport()
    }

    /// Tear down and hand back the sensor and transport
    pub fn into_parts(self) -> (S, T) {
        (self.sensor, self.transmitter.into_inner())
    }
}
