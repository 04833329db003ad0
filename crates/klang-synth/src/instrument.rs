//! Instrument voices: envelope plus harmonically stacked oscillators.

use crate::envelope::AdsrEnvelope;
use crate::note::Note;
use crate::oscillator::{Vibrato, Waveform, oscillate};
use crate::pitch::key_to_frequency;

/// One rendered sample plus the decayed-to-silence flag.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Rendered {
    /// Signal value (envelope and instrument volume applied).
    pub sample: f64,
    /// True when the envelope reads zero. The caller decides whether that
    /// means the note is done — a held note mid-attack also reads zero.
    pub finished: bool,
}

/// A waveform-generation strategy for one note.
///
/// Instruments are stateless per call: all note timing lives on the [`Note`],
/// so one shared instance can render many notes concurrently. Implementations
/// must never panic for any note — out-of-range key ids just produce extreme
/// but finite frequencies.
pub trait Instrument: Send + Sync {
    /// Display name of this voice.
    fn name(&self) -> &'static str;

    /// The amplitude envelope shaping this voice.
    fn envelope(&self) -> &AdsrEnvelope;

    /// Render one sample of `note` at absolute time `time`.
    fn render(&self, time: f64, note: &Note) -> Rendered;
}

/// Struck-bell voice: high-transposed sines with a touch of vibrato,
/// no sustain, long ring-out.
#[derive(Debug, Clone)]
pub struct Bell {
    envelope: AdsrEnvelope,
    volume: f64,
}

impl Default for Bell {
    fn default() -> Self {
        Self::new()
    }
}

impl Bell {
    /// Bell with its standard envelope (instant strike, 1 s ring, 1 s tail).
    pub fn new() -> Self {
        Self {
            envelope: AdsrEnvelope::new(0.01, 1.0, 0.0, 1.0),
            volume: 1.0,
        }
    }

    /// Bell with a custom envelope and volume.
    pub fn with_params(envelope: AdsrEnvelope, volume: f64) -> Self {
        Self { envelope, volume }
    }
}

impl Instrument for Bell {
    fn name(&self) -> &'static str {
        "bell"
    }

    fn envelope(&self) -> &AdsrEnvelope {
        &self.envelope
    }

    fn render(&self, time: f64, note: &Note) -> Rendered {
        let amp = self.envelope.amplitude(time, note.on, note.released_at);
        let t = time - note.on;

        let sound = oscillate(
            t,
            key_to_frequency(note.id + 12),
            Waveform::Sine,
            Vibrato::new(5.0, 0.001),
        ) + 0.5 * oscillate(t, key_to_frequency(note.id + 24), Waveform::Sine, Vibrato::NONE)
            + 0.25 * oscillate(t, key_to_frequency(note.id + 36), Waveform::Sine, Vibrato::NONE);

        Rendered {
            sample: amp * sound * self.volume,
            finished: amp <= 0.0,
        }
    }
}

/// Harmonica voice: stacked squares with vibrato plus a noise partial for
/// breathy grit; sustains while held, short tail.
#[derive(Debug, Clone)]
pub struct Harmonica {
    envelope: AdsrEnvelope,
    volume: f64,
}

impl Default for Harmonica {
    fn default() -> Self {
        Self::new()
    }
}

impl Harmonica {
    /// Harmonica with its standard envelope.
    pub fn new() -> Self {
        Self {
            envelope: AdsrEnvelope::new(0.05, 1.0, 0.95, 0.1),
            volume: 1.0,
        }
    }

    /// Harmonica with a custom envelope and volume.
    pub fn with_params(envelope: AdsrEnvelope, volume: f64) -> Self {
        Self { envelope, volume }
    }
}

impl Instrument for Harmonica {
    fn name(&self) -> &'static str {
        "harmonica"
    }

    fn envelope(&self) -> &AdsrEnvelope {
        &self.envelope
    }

    fn render(&self, time: f64, note: &Note) -> Rendered {
        let amp = self.envelope.amplitude(time, note.on, note.released_at);
        let t = time - note.on;

        let sound = oscillate(
            t,
            key_to_frequency(note.id),
            Waveform::Square,
            Vibrato::new(5.0, 0.001),
        ) + 0.5 * oscillate(t, key_to_frequency(note.id + 12), Waveform::Square, Vibrato::NONE)
            + 0.25 * oscillate(t, key_to_frequency(note.id + 24), Waveform::Noise, Vibrato::NONE);

        Rendered {
            sample: amp * sound * self.volume,
            finished: amp <= 0.0,
        }
    }
}
