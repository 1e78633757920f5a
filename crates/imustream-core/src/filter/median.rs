//! Windowed median filter over all nine sample channels
//!
//! Each channel keeps its own [`RingBuffer`] of the last `W` values. Every
//! call to [`MedianFilter::filter`] appends the new sample and returns the
//! per-channel median of what the buffers currently hold. During warm-up the
//! window holds fewer than `W` values and the median is taken over those.

use rand::{Rng, SeedableRng};
use rand_chacha::ChaCha8Rng;

use crate::buffer::ring::RingBuffer;
use crate::filter::select;
use crate::sample::ImuReading;
use crate::CHANNEL_COUNT;

/// Median filter with a fixed odd window `W`
///
/// The pivot generator is owned by the filter, so a fixed seed gives fully
/// reproducible runs. The filtered values themselves never depend on the seed.
///
/// An even window is rejected when the filter type is instantiated:
///
/// ```compile_fail
/// use imustream_core::filter::median::MedianFilter;
///
/// let _filter = MedianFilter::<i16, 4>::with_seed(1);
/// ```
///
/// # Example
/// ```
/// use imustream_core::filter::median::MedianFilter;
/// use imustream_core::sample::{RawSample, Vector3};
///
/// let mut filter = MedianFilter::<i16, 3>::with_seed(7);
/// let sample = RawSample::new(Vector3::new(1, 2, 3), Vector3::default(), Vector3::default());
/// assert_eq!(filter.filter(&sample), sample);
/// ```
pub struct MedianFilter<T, const W: usize, R = ChaCha8Rng> {
    /// One history per channel, in wire channel order
    channels: [RingBuffer<T, W>; CHANNEL_COUNT],
    /// Pivot source for the selection
    rng: R,
}

impl<T, const W: usize, R> MedianFilter<T, W, R>
where
    T: Copy + PartialOrd + Default,
    R: Rng,
{
    const ODD_WINDOW: () = assert!(W % 2 == 1, "median window size must be odd");

    /// Create a filter drawing pivots from `rng`
    pub fn new(rng: R) -> Self {
        #[allow(clippy::let_unit_value)]
        let () = Self::ODD_WINDOW;

        Self {
            channels: std::array::from_fn(|_| RingBuffer::new()),
            rng,
        }
    }

    /// Push `sample` into the history and return the per-channel medians
    pub fn filter(&mut self, sample: &ImuReading<T>) -> ImuReading<T> {
        let incoming = sample.to_channels();
        let mut medians = [T::default(); CHANNEL_COUNT];
        let mut scratch = [T::default(); W];

        for ((history, value), out) in self
            .channels
            .iter_mut()
            .zip(incoming)
            .zip(medians.iter_mut())
        {
            history.put(value);
            let len = history.to_array(&mut scratch);
            // The history is never empty right after a put
            *out = select::median(&mut scratch[..len], &mut self.rng).unwrap_or(value);
        }

        ImuReading::from_channels(medians)
    }

    /// Window size `W`
    pub const fn window(&self) -> usize {
        W
    }

    /// Number of samples currently held per channel (1..=W after the first push)
    pub fn len(&self) -> usize {
        self.channels[0].len()
    }

    /// True before the first sample
    pub fn is_empty(&self) -> bool {
        self.channels[0].is_empty()
    }

    /// True once every channel holds a full window
    pub fn is_warm(&self) -> bool {
        self.channels[0].is_full()
    }

    /// Drop all history; the next sample starts a fresh warm-up
    pub fn reset(&mut self) {
        for history in &mut self.channels {
            history.reset();
        }
    }
}

impl<T, const W: usize> MedianFilter<T, W, ChaCha8Rng>
where
    T: Copy + PartialOrd + Default,
{
    /// Deterministic pivot sequence, for tests and replay
    pub fn with_seed(seed: u64) -> Self {
        Self::new(ChaCha8Rng::seed_from_u64(seed))
    }

    /// Seed the pivot generator once from the OS
    pub fn from_entropy() -> Self {
        Self::new(ChaCha8Rng::from_entropy())
    }
}
