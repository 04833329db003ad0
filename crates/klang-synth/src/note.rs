//! The note entity: one key's sounding event.

/// A single sounding event tied to a logical key.
///
/// `released_at` is `None` while the key is held. Using an option instead of
/// comparing on/off timestamps keeps a note started at exactly t = 0
/// unambiguously held.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Note {
    /// Key index (semitone offset); selects the pitch.
    pub id: i32,
    /// Channel selecting which instrument renders this note.
    pub channel: usize,
    /// Note-on timestamp in seconds of audio-clock time.
    pub on: f64,
    /// Release timestamp, or `None` while the key is held.
    pub released_at: Option<f64>,
    /// True while the note still contributes sound; cleared by the mixer
    /// once the instrument reports silence after release.
    pub active: bool,
}

impl Note {
    /// A freshly pressed note: held and active.
    pub fn new(id: i32, channel: usize, at: f64) -> Self {
        Self {
            id,
            channel,
            on: at,
            released_at: None,
            active: true,
        }
    }

    /// Whether the key is still down.
    pub fn is_held(&self) -> bool {
        self.released_at.is_none()
    }

    /// Whether the note has entered its release phase.
    pub fn is_released(&self) -> bool {
        self.released_at.is_some()
    }

    /// Enter the release phase. No effect if already released.
    pub fn release(&mut self, at: f64) {
        if self.released_at.is_none() {
            self.released_at = Some(at);
        }
    }

    /// Re-trigger a releasing note: back to held with a fresh onset.
    pub fn retrigger(&mut self, at: f64) {
        self.on = at;
        self.released_at = None;
        self.active = true;
    }
}
