//! Static key-to-note configuration table.
//!
//! Sixteen keys along the bottom rows of a QWERTY layout form a piano
//! octave and a bit: the home-row keys are the sharps. Slot index equals the
//! semitone offset fed to the pitch mapping.

/// Number of playable keys.
pub const KEY_COUNT: usize = 16;

/// Key characters in semitone order (slot index = semitone offset).
pub const KEYS: [char; KEY_COUNT] = [
    'z', 's', 'x', 'c', 'f', 'v', 'g', 'b', 'n', 'j', 'm', 'k', ',', 'l', '.', '/',
];

/// Map a pressed character to its key slot (case-insensitive).
pub fn slot_for(c: char) -> Option<usize> {
    let c = c.to_ascii_lowercase();
    KEYS.iter().position(|&k| k == c)
}

/// Terminal diagram of the playable keys.
pub fn layout() -> &'static str {
    concat!(
        "|   |   |   |   |   |   |   |   |   |   |   |   |   |\n",
        "|   | S |   |   | F | G |   | J | K | L |   |   |   |\n",
        "|   |___|   |   |___|___|   |___|___|___|   |   |___\n",
        "|  Z  |  X  |  C  |  V  |  B  |  N  |  M  |  ,  |  .  |  /  |\n",
        "|_____|_____|_____|_____|_____|_____|_____|_____|_____|_____|\n",
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn sixteen_unique_keys() {
        assert_eq!(KEYS.len(), KEY_COUNT);
        for (i, a) in KEYS.iter().enumerate() {
            for b in &KEYS[i + 1..] {
                assert_ne!(a, b, "duplicate key '{a}'");
            }
        }
    }

    #[test]
    fn slots_are_semitone_ordered() {
        for (slot, &key) in KEYS.iter().enumerate() {
            assert_eq!(slot_for(key), Some(slot));
        }
    }

    #[test]
    fn uppercase_maps_like_lowercase() {
        assert_eq!(slot_for('Z'), Some(0));
        assert_eq!(slot_for('S'), Some(1));
        assert_eq!(slot_for('/'), Some(15));
    }

    #[test]
    fn unmapped_characters_are_rejected() {
        assert_eq!(slot_for('q'), None);
        assert_eq!(slot_for('1'), None);
        assert_eq!(slot_for(' '), None);
    }
}
