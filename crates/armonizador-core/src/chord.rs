//! Chord construction over the fixed diatonic templates

// ============================================================================
// Templates
// ============================================================================

/// Number of notes in every computed chord
pub const CHORD_SIZE: usize = 8;

/// Major scale, one octave including the upper tonic (semitones from C)
pub const SCALE_TEMPLATE: [u8; 8] = [0, 2, 4, 5, 7, 9, 11, 12];

/// Scale-step ordinals that become chord tones, counted along the
/// continuously extended scale (no octave folding)
pub const CHORD_INTERVALS: [u8; CHORD_SIZE] = [0, 2, 4, 6, 7, 9, 11, 13];

/// Absolute semitone numbers, lowest voice first
pub type Chord = [u8; CHORD_SIZE];

// ============================================================================
// Chord Computation
// ============================================================================

/// Build the eight-note chord for `mode`, `degree` and `octave`.
///
/// Walks upward one semitone at a time from
/// `12 * octave + SCALE_TEMPLATE[mode] + SCALE_TEMPLATE[degree]`. Every pitch
/// whose pitch class lies on the scale advances the scale-step counter, and
/// the steps listed in [`CHORD_INTERVALS`] are collected.
///
/// Both `mode` and `degree` index [`SCALE_TEMPLATE`]; callers keep them in
/// `0..=6` and `octave` in `0..=7`, which keeps every pitch below 256.
///
/// # Example
/// ```
/// use armonizador_core::compute_chord;
/// assert_eq!(compute_chord(0, 1, 0), [2, 5, 9, 12, 14, 17, 21, 24]);
/// ```
pub fn compute_chord(mode: u8, degree: u8, octave: u8) -> Chord {
    let base = 12 * octave + SCALE_TEMPLATE[mode as usize] + SCALE_TEMPLATE[degree as usize];

    let mut chord = [0u8; CHORD_SIZE];
    let mut notes_in_chord = 0;
    let mut scale_position = 0u8;
    let mut semitone_offset = 0u8;

    while notes_in_chord < CHORD_SIZE {
        let pitch = base + semitone_offset;
        if SCALE_TEMPLATE.contains(&(pitch % 12)) {
            if CHORD_INTERVALS.contains(&scale_position) {
                chord[notes_in_chord] = pitch;
                notes_in_chord += 1;
            }
            scale_position += 1;
        }
        semitone_offset += 1;
    }

    chord
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_tonic_chord() {
        // C E G B | C E G B an octave up: step 7 (the upper tonic) is a chord tone
        assert_eq!(compute_chord(0, 0, 0), [0, 4, 7, 11, 12, 16, 19, 23]);
    }

    #[test]
    fn test_second_degree() {
        assert_eq!(compute_chord(0, 1, 0), [2, 5, 9, 12, 14, 17, 21, 24]);
    }

    #[test]
    fn test_off_scale_start_skips_to_next_scale_tone() {
        // mode 1 + degree 2 -> 2 + 4 = 6 (F#), first collected pitch is G
        assert_eq!(compute_chord(1, 2, 0), [7, 11, 14, 17, 19, 23, 26, 29]);
    }

    #[test]
    fn test_octave_shifts_by_twelve() {
        let low = compute_chord(2, 3, 0);
        let high = compute_chord(2, 3, 4);
        for (l, h) in low.iter().zip(high.iter()) {
            assert_eq!(*h, l + 48);
        }
    }

    #[test]
    fn test_highest_parameters_stay_in_range() {
        assert_eq!(compute_chord(6, 6, 7), [107, 110, 113, 117, 119, 122, 125, 129]);
    }

    #[test]
    fn test_every_note_is_diatonic_and_ascending() {
        for mode in 0..=6 {
            for degree in 0..=6 {
                for octave in 0..=7 {
                    let chord = compute_chord(mode, degree, octave);
                    assert!(chord.iter().all(|p| SCALE_TEMPLATE.contains(&(p % 12))));
                    assert!(chord.windows(2).all(|w| w[0] < w[1]));
                    assert_eq!(chord, compute_chord(mode, degree, octave));
                }
            }
        }
    }
}
