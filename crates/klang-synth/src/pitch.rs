//! Equal-tempered pitch mapping from key indices to frequencies.

use libm::pow;

/// Frequency of key 0 in Hz.
pub const BASE_FREQUENCY_HZ: f64 = 256.0;

/// Map a key index (semitone offset from key 0) to its frequency in Hz.
///
/// Equal temperament: `base * 2^(semitone / 12)`. Strictly increasing in the
/// key index, and deterministic. Out-of-range indices simply yield extreme
/// but finite frequencies — the caller never has to validate.
#[inline]
pub fn key_to_frequency(semitone: i32) -> f64 {
    BASE_FREQUENCY_HZ * pow(2.0, f64::from(semitone) / 12.0)
}
