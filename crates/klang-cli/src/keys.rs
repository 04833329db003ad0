//! Key-hold tracking for terminals without key-release events.
//!
//! Most terminals deliver key *presses* (with auto-repeat) but no key-up, so
//! "held" is emulated: a key counts as down while press events keep arriving,
//! and is released once none has been seen for the hold timeout. Terminals
//! speaking the keyboard-enhancement protocol report real release events and
//! bypass this tracker's sweep entirely.

use crate::keymap::KEY_COUNT;

/// Per-slot last-touch bookkeeping with a hold timeout.
///
/// Times are plain milliseconds supplied by the caller, which keeps the
/// logic independent of any clock source.
#[derive(Debug)]
pub struct KeyTracker {
    last_touch: [Option<u64>; KEY_COUNT],
    hold_ms: u64,
}

impl KeyTracker {
    /// Tracker releasing keys `hold_ms` after their last press event.
    pub fn new(hold_ms: u64) -> Self {
        Self {
            last_touch: [None; KEY_COUNT],
            hold_ms,
        }
    }

    /// Record a press (or auto-repeat) for `slot` at `now_ms`.
    ///
    /// Returns true when the key was not considered down before — the
    /// caller's cue to fire a note-on.
    pub fn touch(&mut self, slot: usize, now_ms: u64) -> bool {
        let newly_pressed = self.last_touch[slot].is_none();
        self.last_touch[slot] = Some(now_ms);
        newly_pressed
    }

    /// Mark `slot` as up immediately (real release event observed).
    pub fn clear(&mut self, slot: usize) {
        self.last_touch[slot] = None;
    }

    /// Release every key whose last press is older than the hold timeout.
    /// Returns the released slots.
    pub fn sweep(&mut self, now_ms: u64) -> Vec<usize> {
        let mut released = Vec::new();
        for (slot, last) in self.last_touch.iter_mut().enumerate() {
            if let Some(at) = *last
                && now_ms.saturating_sub(at) >= self.hold_ms
            {
                *last = None;
                released.push(slot);
            }
        }
        released
    }

    /// Number of keys currently considered down.
    pub fn held(&self) -> usize {
        self.last_touch.iter().filter(|t| t.is_some()).count()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn first_touch_reports_newly_pressed() {
        let mut tracker = KeyTracker::new(100);
        assert!(tracker.touch(3, 0));
        assert!(!tracker.touch(3, 10), "repeat is not a new press");
        assert_eq!(tracker.held(), 1);
    }

    #[test]
    fn sweep_releases_only_stale_keys() {
        let mut tracker = KeyTracker::new(100);
        tracker.touch(1, 0);
        tracker.touch(2, 80);

        let released = tracker.sweep(110);
        assert_eq!(released, vec![1], "only the stale key is released");
        assert_eq!(tracker.held(), 1);
    }

    #[test]
    fn repeats_keep_a_key_alive() {
        let mut tracker = KeyTracker::new(100);
        tracker.touch(5, 0);
        tracker.touch(5, 90);
        tracker.touch(5, 180);

        assert!(tracker.sweep(250).is_empty());
        assert_eq!(tracker.sweep(280), vec![5]);
    }

    #[test]
    fn touch_after_sweep_counts_as_new_press() {
        let mut tracker = KeyTracker::new(100);
        tracker.touch(7, 0);
        tracker.sweep(200);
        assert!(tracker.touch(7, 300));
    }

    #[test]
    fn clear_releases_immediately() {
        let mut tracker = KeyTracker::new(100);
        tracker.touch(4, 0);
        tracker.clear(4);
        assert_eq!(tracker.held(), 0);
        assert!(tracker.sweep(1000).is_empty(), "cleared key is not re-swept");
    }
}
