//! Monotonic audio clock derived from the output frame counter.

use std::sync::Arc;
use std::sync::atomic::{AtomicU64, Ordering};

/// Monotonic clock counting rendered output frames.
///
/// The audio callback advances the clock once per frame; any other thread may
/// read [`now`](Self::now) to timestamp note events in the same timebase the
/// mixer renders against — so envelope timing never drifts from the audible
/// output, whatever the wall clock does.
///
/// Clones share the same underlying counter.
#[derive(Debug, Clone)]
pub struct SampleClock {
    frames: Arc<AtomicU64>,
    sample_rate: f64,
}

impl SampleClock {
    /// A clock at zero for the given sample rate.
    pub fn new(sample_rate: u32) -> Self {
        Self {
            frames: Arc::new(AtomicU64::new(0)),
            sample_rate: f64::from(sample_rate),
        }
    }

    /// The sample rate this clock counts at.
    pub fn sample_rate(&self) -> f64 {
        self.sample_rate
    }

    /// Current time in seconds since the stream started.
    pub fn now(&self) -> f64 {
        self.frames.load(Ordering::Relaxed) as f64 / self.sample_rate
    }

    /// Audio-thread side: return the time of the frame about to be rendered
    /// and advance the counter by one frame.
    pub fn advance(&self) -> f64 {
        let frame = self.frames.fetch_add(1, Ordering::Relaxed);
        frame as f64 / self.sample_rate
    }
}
