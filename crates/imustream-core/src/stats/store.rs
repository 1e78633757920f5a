//! Running counters for the control loop
//!
//! Tracks what the loop produced and what it lost, so the host can report
//! link health without any extra protocol traffic.

use chrono::{DateTime, Utc};
use serde::Serialize;

/// Counters accumulated over the lifetime of a pipeline
#[derive(Debug, Clone, Serialize)]
pub struct StreamStats {
    /// When counting started
    pub started_at: DateTime<Utc>,
    /// Control loop iterations attempted
    pub cycles: u64,
    /// Frames fully handed to the transport
    pub frames_sent: u64,
    /// Transport writes that succeeded
    pub chunks_sent: u64,
    /// Frame bytes delivered to the transport
    pub bytes_sent: u64,
    /// Failed sensor reads
    pub sensor_errors: u64,
    /// Frames abandoned because a transport write failed
    pub transport_errors: u64,
    /// Failures since the last successful cycle
    pub consecutive_errors: u32,
    /// Timestamp of the last frame sent
    pub last_frame_at: Option<DateTime<Utc>>,
}

impl StreamStats {
    pub fn new() -> Self {
        Self {
            started_at: Utc::now(),
            cycles: 0,
            frames_sent: 0,
            chunks_sent: 0,
            bytes_sent: 0,
            sensor_errors: 0,
            transport_errors: 0,
            consecutive_errors: 0,
            last_frame_at: None,
        }
    }

    /// Record a fully transmitted frame
    pub fn record_frame(&mut self, bytes: usize, chunks: usize) {
        self.cycles += 1;
        self.frames_sent += 1;
        self.chunks_sent += chunks as u64;
        self.bytes_sent += bytes as u64;
        self.consecutive_errors = 0;
        self.last_frame_at = Some(Utc::now());
    }

    pub fn record_sensor_error(&mut self) {
        self.cycles += 1;
        self.sensor_errors += 1;
        self.consecutive_errors += 1;
    }

    /// Record an abandoned frame; `chunks_written` made it out before the failure
    pub fn record_transport_error(&mut self, chunks_written: usize) {
        self.cycles += 1;
        self.transport_errors += 1;
        self.chunks_sent += chunks_written as u64;
        self.consecutive_errors += 1;
    }

    /// Cycles that did not end in a sent frame
    pub fn dropped(&self) -> u64 {
        self.sensor_errors + self.transport_errors
    }

    /// Average frame rate since `started_at`
    pub fn frames_per_second(&self) -> f64 {
        let elapsed_ms = (Utc::now() - self.started_at).num_milliseconds();
        if elapsed_ms <= 0 {
            return 0.0;
        }
        self.frames_sent as f64 * 1000.0 / elapsed_ms as f64
    }

    /// Start over from zero
    pub fn reset(&mut self) {
        *self = Self::new();
    }
}

impl Default for StreamStats {
    fn default() -> Self {
        Self::new()
    }
}
