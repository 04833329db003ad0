//! Waveform oscillator library.
//!
//! A pure function library: every waveform is computed directly from wall-clock
//! time and frequency, with no per-oscillator state. This fits a synthesizer
//! whose note timing lives on the note itself — any thread may evaluate any
//! note's waveform at any instant and get the same answer.

use core::f64::consts::{FRAC_2_PI, FRAC_PI_2, PI, TAU};
use core::sync::atomic::{AtomicU32, Ordering};
use libm::{asin, fmod, sin};

/// Default partial count for [`Waveform::AnalogSaw`].
///
/// More partials sharpen the ramp at higher CPU cost; 48 keeps the sum well
/// under the Nyquist limit for the playable key range at 44.1 kHz.
pub const DEFAULT_SAW_PARTIALS: u32 = 48;

/// Oscillator waveform types.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum Waveform {
    /// Sine waveform — pure fundamental tone.
    #[default]
    Sine,
    /// Square waveform — odd harmonics, hollow timbre.
    Square,
    /// Triangle waveform — odd harmonics with fast rolloff, soft timbre.
    Triangle,
    /// Sawtooth built from an additive partial sum (band-limited, slow).
    AnalogSaw {
        /// Number of partials to sum.
        partials: u32,
    },
    /// Sawtooth in closed form (full-bandwidth, cheap).
    DigitalSaw,
    /// White noise, uniform in [-1, 1]. Unseeded and irreproducible.
    Noise,
}

impl Waveform {
    /// Additive sawtooth with the default partial count.
    pub fn analog_saw() -> Self {
        Self::AnalogSaw {
            partials: DEFAULT_SAW_PARTIALS,
        }
    }
}

/// Frequency modulation by a secondary low-rate oscillator (vibrato).
///
/// The modulation term `amplitude * carrier_hz * sin(2π * frequency_hz * t)`
/// is added to the carrier's phase angle, so `amplitude` is a dimensionless
/// depth relative to the carrier frequency (typical values ~0.001).
#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct Vibrato {
    /// Modulator rate in Hz.
    pub frequency_hz: f64,
    /// Modulation depth relative to the carrier frequency.
    pub amplitude: f64,
}

impl Vibrato {
    /// No modulation.
    pub const NONE: Self = Self {
        frequency_hz: 0.0,
        amplitude: 0.0,
    };

    /// Vibrato at `frequency_hz` with depth `amplitude`.
    pub const fn new(frequency_hz: f64, amplitude: f64) -> Self {
        Self {
            frequency_hz,
            amplitude,
        }
    }
}

/// Frequency in Hz to angular velocity in radians per second.
#[inline]
fn angular(hz: f64) -> f64 {
    TAU * hz
}

/// Evaluate one oscillator sample.
///
/// Returns a value in [-1, 1] (the additive saw may overshoot slightly at its
/// edges — Gibbs ripple). Every input, including zero, negative, or absurdly
/// large frequencies, yields a finite value; the real-time mixing path calls
/// this once per note per harmonic per sample and must never fail.
///
/// # Example
///
/// ```rust
/// use klang_synth::{Vibrato, Waveform, oscillate};
///
/// let sample = oscillate(0.25, 1.0, Waveform::Sine, Vibrato::NONE);
/// assert!((sample - 1.0).abs() < 1e-9); // sin(2π * 0.25) = 1
/// ```
#[inline]
pub fn oscillate(time: f64, frequency_hz: f64, waveform: Waveform, vibrato: Vibrato) -> f64 {
    let phase = angular(frequency_hz) * time
        + vibrato.amplitude * frequency_hz * sin(angular(vibrato.frequency_hz) * time);

    match waveform {
        Waveform::Sine => sin(phase),

        Waveform::Square => {
            if sin(phase) > 0.0 {
                1.0
            } else {
                -1.0
            }
        }

        // asin(sin(x)) folds the phase into a triangle in [-π/2, π/2];
        // the 2/π factor normalizes it to [-1, 1].
        Waveform::Triangle => asin(sin(phase)) * FRAC_2_PI,

        Waveform::AnalogSaw { partials } => {
            let mut out = 0.0;
            for j in 1..=u64::from(partials) {
                let j = j as f64;
                out += sin(j * phase) / j;
            }
            out * FRAC_2_PI
        }

        // Ramp through one period via fmod. At frequency 0 the period is
        // infinite and fmod returns `time` unchanged, so the expression
        // degenerates to a finite constant instead of dividing by zero.
        Waveform::DigitalSaw => {
            let period = 1.0 / frequency_hz;
            FRAC_2_PI * (frequency_hz * PI * fmod(time, period) - FRAC_PI_2)
        }

        Waveform::Noise => noise(),
    }
}

/// Shared xorshift32 state for the noise waveform.
///
/// Relaxed ordering is enough: concurrent callers may trample each other's
/// state updates, which only perturbs an already-arbitrary stream.
static NOISE_STATE: AtomicU32 = AtomicU32::new(0x12345678);

#[inline]
fn noise() -> f64 {
    let mut x = NOISE_STATE.load(Ordering::Relaxed);
    x ^= x << 13;
    x ^= x >> 17;
    x ^= x << 5;
    NOISE_STATE.store(x, Ordering::Relaxed);

    f64::from(x as i32) / f64::from(i32::MAX)
}
