//! Sensor source seam and a simulated 9-axis sensor
//!
//! The register-level driver lives outside this crate; the control loop only
//! needs something that yields one [`RawSample`] per cycle.

use rand::{Rng, SeedableRng};
use rand_chacha::ChaCha8Rng;
use thiserror::Error;

use crate::sample::{RawSample, Vector3};
use crate::CHANNEL_COUNT;

/// Errors a sensor read can report
#[derive(Error, Debug)]
pub enum SensorError {
    #[error("Sensor not ready")]
    NotReady,

    #[error("Bus error: {0}")]
    Bus(String),
}

/// Anything that produces raw per-axis counts
pub trait SensorSource {
    fn read(&mut self) -> Result<RawSample, SensorError>;
}

impl<S: SensorSource + ?Sized> SensorSource for &mut S {
    fn read(&mut self) -> Result<RawSample, SensorError> {
        (**self).read()
    }
}

impl<S: SensorSource + ?Sized> SensorSource for Box<S> {
    fn read(&mut self) -> Result<RawSample, SensorError> {
        (**self).read()
    }
}

/// A device lying flat and still: 1 g on Z, no rotation, a fixed field
///
/// Every channel gets uniform noise of `noise_counts` and, with probability
/// `spike_probability`, an outlier of `spike_counts` in either direction.
#[derive(Debug, Clone)]
pub struct SimulatedSensor {
    rng: ChaCha8Rng,
    baseline: RawSample,
    noise_counts: i16,
    spike_probability: f64,
    spike_counts: i16,
}

impl SimulatedSensor {
    /// Default outlier magnitude in counts
    pub const DEFAULT_SPIKE_COUNTS: i16 = 4000;

    /// Create a simulated sensor
    ///
    /// # Arguments
    /// * `seed` - Fixed seed for reproducible streams, or `None` for OS entropy
    /// * `noise_counts` - Half-width of the uniform noise band
    /// * `spike_probability` - Per-channel outlier chance, clamped to 0.0..=1.0
    pub fn new(seed: Option<u64>, noise_counts: i16, spike_probability: f64) -> Self {
        let rng = match seed {
            Some(s) => ChaCha8Rng::seed_from_u64(s),
            None => ChaCha8Rng::from_entropy(),
        };

        Self {
            rng,
            baseline: Self::resting_baseline(),
            noise_counts: noise_counts.saturating_abs(),
            spike_probability: spike_probability.clamp(0.0, 1.0),
            spike_counts: Self::DEFAULT_SPIKE_COUNTS,
        }
    }

    /// Flat and still at +-2g / +-245dps / +-4 gauss full scale
    pub fn resting_baseline() -> RawSample {
        RawSample::new(
            Vector3::new(0, 0, 16384),
            Vector3::new(0, 0, 0),
            Vector3::new(1638, 0, -3277),
        )
    }

    pub fn with_baseline(mut self, baseline: RawSample) -> Self {
        self.baseline = baseline;
        self
    }

    pub fn with_spike_counts(mut self, spike_counts: i16) -> Self {
        self.spike_counts = spike_counts.saturating_abs();
        self
    }

    pub fn baseline(&self) -> RawSample {
        self.baseline
    }
}

impl SensorSource for SimulatedSensor {
    fn read(&mut self) -> Result<RawSample, SensorError> {
        let mut channels = [0i16; CHANNEL_COUNT];

        for (out, base) in channels.iter_mut().zip(self.baseline.to_channels()) {
            let noise = self.rng.gen_range(-self.noise_counts..=self.noise_counts);
            let mut value = base.saturating_add(noise);

            if self.rng.gen_bool(self.spike_probability) {
                let spike = if self.rng.gen_bool(0.5) {
                    self.spike_counts
                } else {
                    -self.spike_counts
                };
                value = value.saturating_add(spike);
            }
            *out = value;
        }

        Ok(RawSample::from_channels(channels))
    }
}
