//! Shared note registry and the real-time mixing engine.
//!
//! Two threads touch the note collection: the input poller inserting and
//! releasing notes, and the audio callback summing every sounding note once
//! per output sample. The mutex is a field of [`NoteRegistry`] — there is no
//! global state — and is held only for the registry scan, O(active notes).

use std::sync::{Arc, Mutex, MutexGuard};

use crate::instrument::{Bell, Harmonica, Instrument};
use crate::note::Note;

/// Channel assignments for the standard instrument bank.
pub mod channel {
    /// Harmonica voice (mixed at half gain).
    pub const HARMONICA: usize = 1;
    /// Bell voice.
    pub const BELL: usize = 2;
}

/// Master output attenuation applied after summing all voices, so chords
/// don't clip.
pub const MASTER_GAIN: f64 = 0.2;

/// The shared collection of currently sounding notes, keyed by note id.
///
/// Safe to share via [`Arc`] between the input-polling thread and the audio
/// callback. All operations take `&self`.
#[derive(Debug, Default)]
pub struct NoteRegistry {
    notes: Mutex<Vec<Note>>,
}

impl NoteRegistry {
    /// An empty registry.
    pub fn new() -> Self {
        Self::default()
    }

    fn lock(&self) -> MutexGuard<'_, Vec<Note>> {
        // A poisoned lock still holds plain note values; keep playing.
        self.notes.lock().unwrap_or_else(|e| e.into_inner())
    }

    /// Start (or re-trigger) the note for key `id`.
    ///
    /// A new note is inserted as held-and-sounding. If the id already exists
    /// and is in its release phase, it is re-triggered in place with a fresh
    /// onset — no duplicate entry. If it exists and is still held, this is a
    /// no-op (the key is simply still down).
    pub fn note_on(&self, id: i32, channel: usize, at: f64) {
        let mut notes = self.lock();
        match notes.iter_mut().find(|n| n.id == id) {
            None => notes.push(Note::new(id, channel, at)),
            Some(note) => {
                if note.is_released() {
                    note.retrigger(at);
                }
            }
        }
    }

    /// Release the note for key `id`, if it exists and is still held.
    /// Idempotent: releasing an already-released id changes nothing.
    pub fn note_off(&self, id: i32, at: f64) {
        let mut notes = self.lock();
        if let Some(note) = notes.iter_mut().find(|n| n.id == id) {
            note.release(at);
        }
    }

    /// Number of notes currently sounding (held or releasing).
    pub fn active_notes(&self) -> usize {
        self.lock().len()
    }

    /// Whether any note is sounding.
    pub fn is_empty(&self) -> bool {
        self.lock().is_empty()
    }

    /// Drop every note immediately.
    pub fn clear(&self) {
        self.lock().clear();
    }

    /// Snapshot of the current notes, for display and tests.
    pub fn snapshot(&self) -> Vec<Note> {
        self.lock().clone()
    }
}

/// One mixer channel: an instrument and its relative gain.
struct ChannelStrip {
    instrument: Box<dyn Instrument>,
    gain: f64,
}

/// The real-time mixing engine.
///
/// Called once per output sample: sums every sounding note's instrument
/// output, prunes notes whose envelope has fully released, and returns the
/// attenuated mix.
///
/// # Example
///
/// ```rust
/// use std::sync::Arc;
/// use klang_synth::{Mixer, NoteRegistry, channel};
///
/// let registry = Arc::new(NoteRegistry::new());
/// let mixer = Mixer::with_standard_bank(Arc::clone(&registry));
///
/// registry.note_on(0, channel::BELL, 0.0);
/// let sample = mixer.mix(0.005);
/// assert!(sample.abs() > 0.0);
/// ```
pub struct Mixer {
    registry: Arc<NoteRegistry>,
    channels: Vec<Option<ChannelStrip>>,
    master_gain: f64,
}

impl Mixer {
    /// A mixer with no channels configured.
    pub fn new(registry: Arc<NoteRegistry>) -> Self {
        Self {
            registry,
            channels: Vec::new(),
            master_gain: MASTER_GAIN,
        }
    }

    /// A mixer with the standard bank: harmonica on [`channel::HARMONICA`]
    /// at half gain, bell on [`channel::BELL`] at full gain.
    pub fn with_standard_bank(registry: Arc<NoteRegistry>) -> Self {
        let mut mixer = Self::new(registry);
        mixer.set_channel(channel::HARMONICA, Box::new(Harmonica::new()), 0.5);
        mixer.set_channel(channel::BELL, Box::new(Bell::new()), 1.0);
        mixer
    }

    /// Assign `instrument` to `channel`, mixed at `gain` relative to the
    /// other channels.
    pub fn set_channel(&mut self, channel: usize, instrument: Box<dyn Instrument>, gain: f64) {
        if self.channels.len() <= channel {
            self.channels.resize_with(channel + 1, || None);
        }
        self.channels[channel] = Some(ChannelStrip { instrument, gain });
    }

    /// Replace the master attenuation (default [`MASTER_GAIN`]).
    pub fn set_master_gain(&mut self, gain: f64) {
        self.master_gain = gain;
    }

    /// The registry this mixer reads from.
    pub fn registry(&self) -> &Arc<NoteRegistry> {
        &self.registry
    }

    /// Produce one output sample at audio-clock time `time`.
    ///
    /// Holds the registry lock for the duration of the scan. A note is
    /// removed only when its instrument reports silence *and* the note has
    /// been released — a held note whose envelope momentarily reads zero
    /// during attack is never deleted. Removal is two-pass: notes are marked
    /// inactive during the scan and compacted afterwards.
    pub fn mix(&self, time: f64) -> f64 {
        let mut notes = self.registry.lock();
        let mut mixed = 0.0;

        for note in notes.iter_mut() {
            let Some(strip) = self.channels.get(note.channel).and_then(Option::as_ref) else {
                // No instrument on this channel: contributes nothing, and is
                // dropped as soon as the key goes up.
                if note.is_released() {
                    note.active = false;
                }
                continue;
            };

            let rendered = strip.instrument.render(time, note);
            mixed += rendered.sample * strip.gain;

            if rendered.finished && note.is_released() {
                note.active = false;
            }
        }

        notes.retain(|n| n.active);
        mixed * self.master_gain
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn mix_with_no_notes_is_exactly_zero() {
        let registry = Arc::new(NoteRegistry::new());
        let mixer = Mixer::with_standard_bank(Arc::clone(&registry));
        assert_eq!(mixer.mix(0.0), 0.0);
        assert_eq!(mixer.mix(123.456), 0.0);
    }

    #[test]
    fn note_on_inserts_once() {
        let registry = NoteRegistry::new();
        registry.note_on(4, channel::BELL, 1.0);
        registry.note_on(4, channel::BELL, 1.1);
        registry.note_on(4, channel::BELL, 1.2);
        assert_eq!(registry.active_notes(), 1);

        let note = registry.snapshot()[0];
        assert_eq!(note.on, 1.0, "note-on while held must not re-trigger");
    }

    #[test]
    fn note_off_is_idempotent() {
        let registry = NoteRegistry::new();
        registry.note_on(4, channel::BELL, 1.0);
        registry.note_off(4, 2.0);
        registry.note_off(4, 3.0);

        let note = registry.snapshot()[0];
        assert_eq!(note.released_at, Some(2.0));
    }

    #[test]
    fn note_off_for_unknown_id_is_a_no_op() {
        let registry = NoteRegistry::new();
        registry.note_off(9, 1.0);
        assert!(registry.is_empty());
    }

    #[test]
    fn reattack_during_release_keeps_single_entry() {
        let registry = NoteRegistry::new();
        registry.note_on(4, channel::BELL, 1.0);
        registry.note_off(4, 2.0);
        registry.note_on(4, channel::BELL, 2.5);

        assert_eq!(registry.active_notes(), 1);
        let note = registry.snapshot()[0];
        assert!(note.is_held());
        assert_eq!(note.on, 2.5);
    }

    #[test]
    fn held_note_survives_zero_envelope_reading() {
        let registry = Arc::new(NoteRegistry::new());
        let mixer = Mixer::with_standard_bank(Arc::clone(&registry));

        // At the exact onset instant the bell envelope reads zero, but the
        // note is held and must not be pruned.
        registry.note_on(0, channel::BELL, 0.0);
        let sample = mixer.mix(0.0);
        assert_eq!(sample, 0.0);
        assert_eq!(registry.active_notes(), 1);
    }

    #[test]
    fn released_and_silent_note_is_pruned() {
        let registry = Arc::new(NoteRegistry::new());
        let mixer = Mixer::with_standard_bank(Arc::clone(&registry));

        registry.note_on(0, channel::BELL, 0.0);
        registry.note_off(0, 1.0);

        // Bell release time is 1 s: at 2 s the tail is gone and the next
        // mix call removes the note.
        mixer.mix(2.0);
        assert!(registry.is_empty(), "finished note must be removed");
    }

    #[test]
    fn unmapped_channel_is_silent_and_reclaimed() {
        let registry = Arc::new(NoteRegistry::new());
        let mixer = Mixer::with_standard_bank(Arc::clone(&registry));

        registry.note_on(7, 9, 0.0);
        assert_eq!(mixer.mix(0.5), 0.0);
        assert_eq!(registry.active_notes(), 1, "held note stays");

        registry.note_off(7, 1.0);
        mixer.mix(1.5);
        assert!(registry.is_empty(), "released stray note must not leak");
    }

    #[test]
    fn channel_gain_scales_contribution() {
        let registry = Arc::new(NoteRegistry::new());
        let mut mixer = Mixer::new(Arc::clone(&registry));
        // Bell renders deterministically (pure sines), so the gain is
        // directly observable.
        mixer.set_channel(channel::HARMONICA, Box::new(Bell::new()), 0.5);
        mixer.set_master_gain(1.0);

        registry.note_on(0, channel::HARMONICA, 0.0);

        let note = registry.snapshot()[0];
        let direct = Bell::new().render(0.005, &note).sample;
        let mixed = mixer.mix(0.005);
        assert!(direct.abs() > 0.0);
        assert!(
            (mixed - direct * 0.5).abs() < 1e-12,
            "expected half of {direct}, got {mixed}"
        );
    }
}
