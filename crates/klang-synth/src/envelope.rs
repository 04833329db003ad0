//! ADSR amplitude envelope evaluated from note timestamps.
//!
//! Unlike a per-sample envelope generator, this envelope holds no running
//! state: the amplitude is a pure function of the current time, the note-on
//! time, and the optional release time. That makes it safe to re-evaluate
//! from any thread every sample, and trivially correct under re-triggering —
//! the state machine is *derived* from the timestamps, never stored.

/// Smallest allowed stage duration in seconds.
///
/// Attack, decay, and release act as divisors; construction clamps them here
/// so a zero-duration stage degenerates to "instant" instead of dividing by
/// zero.
const MIN_STAGE_SECONDS: f64 = 1e-4;

/// Envelope stages, derived from the timestamps at query time.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum EnvelopeStage {
    /// Before the note-on instant.
    Idle,
    /// Ramping from zero toward the peak level.
    Attack,
    /// Falling from the peak toward the sustain level.
    Decay,
    /// Holding at the sustain level while the key is down.
    Sustain,
    /// Ramping from the level reached at release down to zero.
    Release,
    /// Fully decayed; the note is eligible for removal.
    Silent,
}

/// Attack-decay-sustain-release envelope parameters.
///
/// Immutable after construction; many notes may evaluate the same envelope
/// concurrently.
///
/// # Example
///
/// ```rust
/// use klang_synth::AdsrEnvelope;
///
/// let env = AdsrEnvelope::new(0.01, 1.0, 0.0, 1.0);
///
/// // Mid-attack for a note started at t = 0 and still held:
/// let amp = env.amplitude(0.005, 0.0, None);
/// assert!(amp > 0.0 && amp < 1.0);
/// ```
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct AdsrEnvelope {
    attack_s: f64,
    decay_s: f64,
    sustain_level: f64,
    release_s: f64,
    peak_level: f64,
}

impl Default for AdsrEnvelope {
    fn default() -> Self {
        Self::new(0.1, 0.1, 1.0, 0.2)
    }
}

impl AdsrEnvelope {
    /// Create an envelope with the given stage times (seconds) and sustain
    /// level. The peak level defaults to 1.0.
    ///
    /// Stage times are clamped to a small positive minimum; sustain is
    /// clamped non-negative.
    pub fn new(attack_s: f64, decay_s: f64, sustain_level: f64, release_s: f64) -> Self {
        Self {
            attack_s: attack_s.max(MIN_STAGE_SECONDS),
            decay_s: decay_s.max(MIN_STAGE_SECONDS),
            sustain_level: sustain_level.max(0.0),
            release_s: release_s.max(MIN_STAGE_SECONDS),
            peak_level: 1.0,
        }
    }

    /// Replace the peak (end-of-attack) level.
    pub fn with_peak(mut self, peak_level: f64) -> Self {
        self.peak_level = peak_level.max(0.0);
        self
    }

    /// Attack time in seconds.
    pub fn attack_s(&self) -> f64 {
        self.attack_s
    }

    /// Decay time in seconds.
    pub fn decay_s(&self) -> f64 {
        self.decay_s
    }

    /// Sustain level.
    pub fn sustain_level(&self) -> f64 {
        self.sustain_level
    }

    /// Release time in seconds.
    pub fn release_s(&self) -> f64 {
        self.release_s
    }

    /// Peak level reached at the end of the attack stage.
    pub fn peak_level(&self) -> f64 {
        self.peak_level
    }

    /// Level while the key is held, `elapsed` seconds after note-on.
    fn held_level(&self, elapsed: f64) -> f64 {
        if elapsed <= self.attack_s {
            (elapsed / self.attack_s) * self.peak_level
        } else if elapsed <= self.attack_s + self.decay_s {
            let t = (elapsed - self.attack_s) / self.decay_s;
            self.peak_level + t * (self.sustain_level - self.peak_level)
        } else {
            self.sustain_level
        }
    }

    /// Amplitude multiplier at `time` for a note switched on at `on` and
    /// released at `released_at` (`None` while the key is still down).
    ///
    /// Held notes ramp linearly 0 → peak over the attack, peak → sustain
    /// over the decay, then hold. Released notes continue from the exact
    /// level the envelope had reached at the release instant and ramp
    /// linearly to zero over the release time. Never negative.
    #[inline]
    pub fn amplitude(&self, time: f64, on: f64, released_at: Option<f64>) -> f64 {
        let amp = match released_at {
            None => self.held_level(time - on),
            Some(off) => {
                let level_at_release = self.held_level(off - on);
                level_at_release * (1.0 - (time - off) / self.release_s)
            }
        };
        amp.max(0.0)
    }

    /// Stage of the envelope at `time`, for display and tests.
    pub fn stage(&self, time: f64, on: f64, released_at: Option<f64>) -> EnvelopeStage {
        match released_at {
            None => {
                let elapsed = time - on;
                if elapsed < 0.0 {
                    EnvelopeStage::Idle
                } else if elapsed <= self.attack_s {
                    EnvelopeStage::Attack
                } else if elapsed <= self.attack_s + self.decay_s {
                    EnvelopeStage::Decay
                } else {
                    EnvelopeStage::Sustain
                }
            }
            Some(off) => {
                if self.amplitude(time, on, Some(off)) > 0.0 {
                    EnvelopeStage::Release
                } else {
                    EnvelopeStage::Silent
                }
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    #[test]
    fn attack_starts_from_zero() {
        let env = AdsrEnvelope::new(0.01, 1.0, 0.0, 1.0);
        assert_eq!(env.amplitude(0.0, 0.0, None), 0.0);
    }

    #[test]
    fn attack_ramps_to_peak() {
        let env = AdsrEnvelope::new(0.1, 0.1, 0.5, 0.2);
        let mid = env.amplitude(0.05, 0.0, None);
        assert!((mid - 0.5).abs() < 1e-12, "mid-attack should be 0.5: {mid}");
        let top = env.amplitude(0.1, 0.0, None);
        assert!((top - 1.0).abs() < 1e-12, "end of attack should be peak");
    }

    #[test]
    fn continuous_across_attack_decay_boundary() {
        let env = AdsrEnvelope::new(0.1, 0.2, 0.6, 0.3);
        let eps = 1e-9;
        let before = env.amplitude(0.1 - eps, 0.0, None);
        let after = env.amplitude(0.1 + eps, 0.0, None);
        assert!(
            (before - after).abs() < 1e-7,
            "discontinuity at attack/decay boundary: {before} vs {after}"
        );

        let before = env.amplitude(0.3 - eps, 0.0, None);
        let after = env.amplitude(0.3 + eps, 0.0, None);
        assert!(
            (before - after).abs() < 1e-7,
            "discontinuity at decay/sustain boundary: {before} vs {after}"
        );
    }

    #[test]
    fn sustain_holds_flat() {
        let env = AdsrEnvelope::new(0.05, 0.1, 0.7, 0.2);
        for t in [0.2, 1.0, 10.0, 100.0] {
            assert_eq!(env.amplitude(t, 0.0, None), 0.7);
        }
    }

    #[test]
    fn release_starts_from_reached_level() {
        let env = AdsrEnvelope::new(0.05, 0.1, 0.7, 0.2);

        // Release from sustain: the instant after release matches sustain.
        let off = 1.0;
        let held = env.amplitude(off, 0.0, None);
        let released = env.amplitude(off, 0.0, Some(off));
        assert!(
            (held - released).abs() < 1e-12,
            "release must continue from the held level: {held} vs {released}"
        );

        // Release mid-attack: same continuity from the partial attack level.
        let off = 0.02;
        let held = env.amplitude(off, 0.0, None);
        let released = env.amplitude(off, 0.0, Some(off));
        assert!((held - released).abs() < 1e-12);
        assert!(released > 0.0 && released < 1.0);
    }

    #[test]
    fn release_decays_monotonically_to_zero() {
        let env = AdsrEnvelope::new(0.05, 0.1, 0.7, 0.5);
        let off = 1.0;
        let mut prev = env.amplitude(off, 0.0, Some(off));
        for i in 1..=100 {
            let t = off + 0.5 * f64::from(i) / 100.0;
            let amp = env.amplitude(t, 0.0, Some(off));
            assert!(amp <= prev, "release must not rise: {prev} -> {amp} at {t}");
            prev = amp;
        }
        assert_eq!(env.amplitude(off + 0.5, 0.0, Some(off)), 0.0);
        assert_eq!(env.amplitude(off + 10.0, 0.0, Some(off)), 0.0);
    }

    #[test]
    fn zero_stage_times_are_clamped() {
        let env = AdsrEnvelope::new(0.0, 0.0, 0.5, 0.0);
        for t in [0.0, 1e-6, 0.001, 1.0] {
            let amp = env.amplitude(t, 0.0, None);
            assert!(amp.is_finite(), "amplitude must stay finite, got {amp}");
        }
    }

    #[test]
    fn stage_progression_while_held() {
        let env = AdsrEnvelope::new(0.1, 0.2, 0.6, 0.3);
        assert_eq!(env.stage(-0.1, 0.0, None), EnvelopeStage::Idle);
        assert_eq!(env.stage(0.05, 0.0, None), EnvelopeStage::Attack);
        assert_eq!(env.stage(0.2, 0.0, None), EnvelopeStage::Decay);
        assert_eq!(env.stage(5.0, 0.0, None), EnvelopeStage::Sustain);
    }

    #[test]
    fn stage_after_release() {
        let env = AdsrEnvelope::new(0.1, 0.2, 0.6, 0.3);
        assert_eq!(env.stage(1.1, 0.0, Some(1.0)), EnvelopeStage::Release);
        assert_eq!(env.stage(2.0, 0.0, Some(1.0)), EnvelopeStage::Silent);
    }

    proptest! {
        /// Amplitude is never negative, for any parameters and any query.
        #[test]
        fn amplitude_never_negative(
            attack in 0.0..2.0f64,
            decay in 0.0..2.0f64,
            sustain in 0.0..1.5f64,
            release in 0.0..2.0f64,
            time in 0.0..20.0f64,
            held_for in 0.0..10.0f64,
        ) {
            let env = AdsrEnvelope::new(attack, decay, sustain, release);
            prop_assert!(env.amplitude(time, 0.0, None) >= 0.0);
            prop_assert!(env.amplitude(time, 0.0, Some(held_for)) >= 0.0);
        }

        /// A released envelope is zero once the release time has fully passed.
        #[test]
        fn release_reaches_zero(
            attack in 0.001..1.0f64,
            decay in 0.001..1.0f64,
            sustain in 0.0..1.0f64,
            release in 0.001..1.0f64,
            held_for in 0.0..5.0f64,
        ) {
            let env = AdsrEnvelope::new(attack, decay, sustain, release);
            let amp = env.amplitude(held_for + release + 1e-9, 0.0, Some(held_for));
            prop_assert!(amp <= 1e-9, "still audible after release: {}", amp);
        }
    }
}
