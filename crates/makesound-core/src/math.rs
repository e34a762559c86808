//! Pitch and range helpers shared by voices and note policies.
//!
//! All functions are allocation-free and suitable for `no_std`.

/// Convert a MIDI note number to frequency in Hz.
///
/// Uses standard tuning: A4 (note 69) = 440 Hz. Takes a signed note so that
/// octave offsets can be added before conversion without overflow; notes
/// outside 0..=127 simply extrapolate the curve.
///
/// The result is a pure function of `note`, so two frequencies computed from
/// the same note compare exactly equal.
///
/// # Example
/// ```rust
/// use makesound_core::midi_to_freq;
///
/// assert_eq!(midi_to_freq(69), 440.0);
/// assert!((midi_to_freq(60) - 261.6256).abs() < 0.001);
/// ```
#[inline]
pub fn midi_to_freq(note: i32) -> f32 {
    440.0 * libm::powf(2.0, (note - 69) as f32 / 12.0)
}

/// Convert a frequency in Hz to a (fractional) MIDI note number.
#[inline]
pub fn freq_to_midi(freq: f32) -> f32 {
    69.0 + 12.0 * libm::log2f(freq / 440.0)
}

/// Linearly map `value` from `[0, 1]` onto `[min, max]`.
///
/// Used to turn uniform random draws into parameter values.
///
/// # Example
/// ```rust
/// use makesound_core::map_range;
///
/// assert_eq!(map_range(0.5, 0.25, 0.75), 0.5);
/// ```
#[inline]
pub fn map_range(value: f32, min: f32, max: f32) -> f32 {
    min + value * (max - min)
}
