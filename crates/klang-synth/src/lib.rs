//! klang-synth - note-mixing and voice-synthesis engine for klang
//!
//! This crate turns live key-press events into a mixed audio sample stream:
//! each pressed key becomes a [`Note`] in a shared [`NoteRegistry`], and the
//! [`Mixer`] sums every sounding note once per output sample, shaping each
//! one with an instrument-specific [`AdsrEnvelope`] and additive oscillator
//! stack.
//!
//! # Core Components
//!
//! ## Oscillators
//!
//! A pure, stateless waveform library driven by wall-clock time:
//!
//! - [`oscillate`] - evaluate one sample of a waveform
//! - [`Waveform`] - waveform kinds (Sine, Square, Triangle, AnalogSaw,
//!   DigitalSaw, Noise)
//! - [`Vibrato`] - optional low-rate frequency modulation
//!
//! ```rust
//! use klang_synth::{Vibrato, Waveform, oscillate};
//!
//! let sample = oscillate(0.001, 440.0, Waveform::Square, Vibrato::NONE);
//! assert!((-1.0..=1.0).contains(&sample));
//! ```
//!
//! ## Envelope
//!
//! A timestamp-pure ADSR: amplitude is a function of (time, note-on,
//! release), with no per-sample state to advance.
//!
//! ```rust
//! use klang_synth::AdsrEnvelope;
//!
//! let env = AdsrEnvelope::new(0.05, 1.0, 0.95, 0.1);
//! let amp = env.amplitude(0.025, 0.0, None); // halfway through the attack
//! assert!((amp - 0.5).abs() < 1e-12);
//! ```
//!
//! ## Instruments
//!
//! [`Instrument`] implementations combine the oscillator library (at several
//! harmonics) with an envelope to render one note, and report when the note
//! has decayed to silence: [`Bell`], [`Harmonica`].
//!
//! ## Note Registry and Mixer
//!
//! The concurrent heart of the engine (requires the `std` feature):
//!
//! ```rust
//! use std::sync::Arc;
//! use klang_synth::{Mixer, NoteRegistry, channel};
//!
//! let registry = Arc::new(NoteRegistry::new());
//! let mixer = Mixer::with_standard_bank(Arc::clone(&registry));
//!
//! // Input side: key down, then up.
//! registry.note_on(0, channel::BELL, 0.0);
//! registry.note_off(0, 0.5);
//!
//! // Audio side: one call per output sample.
//! let sample = mixer.mix(0.25);
//! ```
//!
//! # no_std Support
//!
//! The DSP modules (oscillator, pitch, envelope, note, instrument) are
//! `no_std` compatible; disable the default `std` feature to drop the
//! registry and mixer:
//!
//! ```toml
//! [dependencies]
//! klang-synth = { version = "0.1", default-features = false }
//! ```

#![cfg_attr(not(feature = "std"), no_std)]

pub mod envelope;
pub mod instrument;
pub mod note;
pub mod oscillator;
pub mod pitch;
#[cfg(feature = "std")]
pub mod registry;

// Re-export main types at crate root
pub use envelope::{AdsrEnvelope, EnvelopeStage};
pub use instrument::{Bell, Harmonica, Instrument, Rendered};
pub use note::Note;
pub use oscillator::{DEFAULT_SAW_PARTIALS, Vibrato, Waveform, oscillate};
pub use pitch::{BASE_FREQUENCY_HZ, key_to_frequency};
#[cfg(feature = "std")]
pub use registry::{MASTER_GAIN, Mixer, NoteRegistry, channel};
