//! Note parameter policy.
//!
//! Pure functions that turn `(velocity, note, random source)` into the
//! parameters a voice needs on note-on: which oscillators sound, the
//! envelope shape, the detune offset, the target frequency and the delay
//! length.
//!
//! Notes above [`LOW_REGISTER_THRESHOLD`] get the randomized treatment.
//! Notes at or below it always get a lone triangle with a long,
//! velocity-proportional release and draw nothing for the envelope or mask.
//!
//! Random draws happen in a fixed order so a scripted source reproduces a
//! note exactly:
//!
//! 1. three oscillator coin flips (high register only)
//! 2. attack, sustain, release floats (high register, `velocity > 0.6`)
//! 3. the octave coin flip (always)
//! 4. the degree and octave of a replacement note (high register, note out of mode)

use makesound_core::{map_range, midi_to_freq};

use crate::envelope::AdsrParams;
use crate::modes::ModeSource;
use crate::random::RandomSource;

/// Highest note of the low register.
pub const LOW_REGISTER_THRESHOLD: u8 = 23;

/// Velocity above which high-register notes get short random envelopes.
pub const SHORT_ENVELOPE_VELOCITY: f32 = 0.6;

/// Envelope a multi-oscillator voice starts with before its first note.
pub const DEFAULT_ENVELOPE: AdsrParams = AdsrParams::new(2.0, 0.75, 0.25, 3.0);

/// Octaves covered by the multi-oscillator voice's mode tables.
pub const KEY_OCTAVES: usize = 4;

/// Semitones added to the played note before any mode logic.
const BASE_TRANSPOSE: i32 = 24;

/// Check whether `note` gets the randomized high-register treatment.
#[inline]
pub fn is_high_register(note: u8) -> bool {
    note > LOW_REGISTER_THRESHOLD
}

/// Which of the triangle, sine and square oscillators contribute.
///
/// At least one is always enabled.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct OscillatorMask {
    triangle: bool,
    sine: bool,
    square: bool,
}

impl OscillatorMask {
    /// Triangle alone.
    pub const TRIANGLE_ONLY: Self = Self {
        triangle: true,
        sine: false,
        square: false,
    };

    /// Build a mask, enabling the triangle if nothing else is.
    pub fn new(triangle: bool, sine: bool, square: bool) -> Self {
        if !(triangle || sine || square) {
            return Self::TRIANGLE_ONLY;
        }
        Self {
            triangle,
            sine,
            square,
        }
    }

    /// Triangle enabled.
    pub fn triangle(&self) -> bool {
        self.triangle
    }

    /// Sine enabled.
    pub fn sine(&self) -> bool {
        self.sine
    }

    /// Square enabled.
    pub fn square(&self) -> bool {
        self.square
    }

    /// Number of enabled oscillators, never zero.
    pub fn count(&self) -> u32 {
        u32::from(self.triangle) + u32::from(self.sine) + u32::from(self.square)
    }

    /// Per-oscillator gains `[triangle, sine, square]` as 0.0 or 1.0.
    pub fn gains(&self) -> [f32; 3] {
        [
            f32::from(u8::from(self.triangle)),
            f32::from(u8::from(self.sine)),
            f32::from(u8::from(self.square)),
        ]
    }
}

impl Default for OscillatorMask {
    fn default() -> Self {
        Self::TRIANGLE_ONLY
    }
}

/// Draw the oscillator mask for `note`.
pub fn draw_oscillator_mask<R: RandomSource + ?Sized>(note: u8, rng: &mut R) -> OscillatorMask {
    if !is_high_register(note) {
        return OscillatorMask::TRIANGLE_ONLY;
    }
    let triangle = rng.next_int(2) == 1;
    let sine = rng.next_int(2) == 1;
    let square = rng.next_int(2) == 1;
    OscillatorMask::new(triangle, sine, square)
}

/// Shape the envelope for a note, starting from the voice's current settings.
///
/// Only the stages the branch names are replaced; the rest carry over from
/// `current`.
pub fn shape_envelope<R: RandomSource + ?Sized>(
    current: AdsrParams,
    velocity: f32,
    note: u8,
    rng: &mut R,
) -> AdsrParams {
    let mut params = current;
    if !is_high_register(note) {
        params.release = velocity * 12.0;
    } else if velocity > SHORT_ENVELOPE_VELOCITY {
        params.attack = map_range(rng.next_float(), 0.01, 0.05);
        params.sustain = map_range(rng.next_float(), 0.01, 0.05);
        params.release = map_range(rng.next_float(), 0.25, 0.75);
    } else {
        params.release = velocity * 5.0;
    }
    params
}

/// Detune offset in Hz: `20 * e^(4v) / e^4`.
#[inline]
pub fn detune_amount(velocity: f32) -> f32 {
    libm::expf(0.2 * velocity * 20.0) / libm::expf(4.0) * 20.0
}

/// Delay length in samples for a velocity: `velocity * sample_rate`.
///
/// Velocity is clamped to `[0, 1]`, so the result never exceeds one second.
#[inline]
pub fn delay_length_samples(velocity: f32, sample_rate: f32) -> usize {
    (velocity.clamp(0.0, 1.0) * sample_rate) as usize
}

/// Pick the oscillator frequency for a note.
///
/// The default is the note two octaves up. In the high register, `key` must
/// already hold the active mode: a note that belongs to it is raised by a
/// velocity-dependent number of octaves, and a note that does not is
/// replaced by a random note from the mode.
pub fn select_frequency<K, R>(velocity: f32, note: u8, key: &K, rng: &mut R) -> f32
where
    K: ModeSource + ?Sized,
    R: RandomSource + ?Sized,
{
    let midi = i32::from(note);
    let scaled_velocity = libm::ceilf(velocity * 3.0) as i32 + 1;
    let octave_offset = 12 * (rng.next_int(2) as i32 + scaled_velocity);

    if !is_high_register(note) {
        return midi_to_freq(midi + BASE_TRANSPOSE);
    }

    if key.note_vector().contains(&midi_to_freq(midi)) {
        midi_to_freq(midi + octave_offset)
    } else {
        let degree = rng.next_int(7);
        let octave = rng.next_int(3);
        key.notes((degree + 7 * octave) as usize)
    }
}

/// Everything a multi-oscillator voice derives on note-on.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct NoteParameters {
    /// Enabled oscillators.
    pub mask: OscillatorMask,
    /// Envelope settings.
    pub envelope: AdsrParams,
    /// Detune offset in Hz.
    pub detune: f32,
    /// Main oscillator frequency in Hz.
    pub frequency: f32,
    /// Delay length in samples for both delay lines.
    pub delay_samples: usize,
}

impl NoteParameters {
    /// Compute all note-on parameters in the fixed draw order.
    ///
    /// `key` must already hold the active mode for high-register notes.
    pub fn compute<K, R>(
        current_envelope: AdsrParams,
        velocity: f32,
        note: u8,
        sample_rate: f32,
        key: &K,
        rng: &mut R,
    ) -> Self
    where
        K: ModeSource + ?Sized,
        R: RandomSource + ?Sized,
    {
        let detune = detune_amount(velocity);
        let delay_samples = delay_length_samples(velocity, sample_rate);
        let mask = draw_oscillator_mask(note, rng);
        let envelope = shape_envelope(current_envelope, velocity, note, rng);
        let frequency = select_frequency(velocity, note, key, rng);

        Self {
            mask,
            envelope,
            detune,
            frequency,
            delay_samples,
        }
    }
}

/// Octave span of the pulse voice's mode table: `ceil(3v) + 1`.
#[inline]
pub fn pulse_octaves(velocity: f32) -> usize {
    libm::ceilf(velocity.clamp(0.0, 1.0) * 3.0) as usize + 1
}

/// Envelope for a pulse voice note.
///
/// Fixed attack and decay, release growing exponentially with velocity
/// (`e^(6v - 2)`), sustain drawn from a range that falls as velocity rises.
pub fn pulse_envelope<R: RandomSource + ?Sized>(velocity: f32, rng: &mut R) -> AdsrParams {
    let release = libm::expf(velocity * 6.0 - 2.0);
    let (low, high) = if velocity > 0.8 {
        (0.01, 0.15)
    } else if velocity < 0.3 {
        (0.75, 1.0)
    } else {
        (0.25, 0.9)
    };
    let sustain = map_range(rng.next_float(), low, high);
    AdsrParams::new(0.1, 0.15, sustain, release)
}
