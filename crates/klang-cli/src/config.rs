//! TOML configuration for the play command.
//!
//! Every field defaults to the engine's built-in values, so a config file
//! only needs the overrides:
//!
//! ```toml
//! master_gain = 0.25
//! hold_ms = 150
//!
//! [bell]
//! release = 2.0
//!
//! [harmonica]
//! sustain = 0.8
//! volume = 1.2
//! ```

use std::path::Path;
use std::sync::Arc;

use anyhow::Context;
use klang_synth::{AdsrEnvelope, Bell, Harmonica, MASTER_GAIN, Mixer, NoteRegistry, channel};
use serde::Deserialize;

/// Resolved ADSR and volume parameters for one instrument voice.
#[derive(Debug, Clone, Copy)]
pub struct VoiceParams {
    /// Attack time in seconds.
    pub attack: f64,
    /// Decay time in seconds.
    pub decay: f64,
    /// Sustain level.
    pub sustain: f64,
    /// Release time in seconds.
    pub release: f64,
    /// Voice volume scalar.
    pub volume: f64,
}

impl VoiceParams {
    /// The bell's standard parameters.
    pub const BELL: Self = Self {
        attack: 0.01,
        decay: 1.0,
        sustain: 0.0,
        release: 1.0,
        volume: 1.0,
    };

    /// The harmonica's standard parameters.
    pub const HARMONICA: Self = Self {
        attack: 0.05,
        decay: 1.0,
        sustain: 0.95,
        release: 0.1,
        volume: 1.0,
    };

    fn envelope(&self) -> AdsrEnvelope {
        AdsrEnvelope::new(self.attack, self.decay, self.sustain, self.release)
    }
}

/// Per-voice overrides as they appear in the file; unset fields fall back to
/// the voice's standard parameters.
#[derive(Debug, Clone, Copy, Default, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct VoiceOverrides {
    /// Attack time in seconds.
    pub attack: Option<f64>,
    /// Decay time in seconds.
    pub decay: Option<f64>,
    /// Sustain level.
    pub sustain: Option<f64>,
    /// Release time in seconds.
    pub release: Option<f64>,
    /// Voice volume scalar.
    pub volume: Option<f64>,
}

impl VoiceOverrides {
    /// Apply these overrides on top of `base`.
    pub fn over(&self, base: VoiceParams) -> VoiceParams {
        VoiceParams {
            attack: self.attack.unwrap_or(base.attack),
            decay: self.decay.unwrap_or(base.decay),
            sustain: self.sustain.unwrap_or(base.sustain),
            release: self.release.unwrap_or(base.release),
            volume: self.volume.unwrap_or(base.volume),
        }
    }
}

/// Play-command configuration.
#[derive(Debug, Clone, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct SynthConfig {
    /// Master attenuation applied to the summed mix.
    pub master_gain: f64,
    /// Key-hold timeout in milliseconds for terminals without key-up events.
    pub hold_ms: u64,
    /// Bell voice overrides.
    pub bell: VoiceOverrides,
    /// Harmonica voice overrides.
    pub harmonica: VoiceOverrides,
}

impl Default for SynthConfig {
    fn default() -> Self {
        Self {
            master_gain: MASTER_GAIN,
            hold_ms: 180,
            bell: VoiceOverrides::default(),
            harmonica: VoiceOverrides::default(),
        }
    }
}

impl SynthConfig {
    /// Load a config from a TOML file.
    pub fn load(path: impl AsRef<Path>) -> anyhow::Result<Self> {
        let path = path.as_ref();
        let content = std::fs::read_to_string(path)
            .with_context(|| format!("reading config {}", path.display()))?;
        toml::from_str(&content).with_context(|| format!("parsing config {}", path.display()))
    }

    /// Key-hold timeout, zero-proofed.
    pub fn hold_ms(&self) -> u64 {
        self.hold_ms.max(1)
    }

    /// Assemble the standard channel bank from the configured voices.
    pub fn build_mixer(&self, registry: Arc<NoteRegistry>) -> Mixer {
        let bell = self.bell.over(VoiceParams::BELL);
        let harmonica = self.harmonica.over(VoiceParams::HARMONICA);

        let mut mixer = Mixer::new(registry);
        mixer.set_channel(
            channel::HARMONICA,
            Box::new(Harmonica::with_params(harmonica.envelope(), harmonica.volume)),
            0.5,
        );
        mixer.set_channel(
            channel::BELL,
            Box::new(Bell::with_params(bell.envelope(), bell.volume)),
            1.0,
        );
        mixer.set_master_gain(self.master_gain);
        mixer
    }
}
