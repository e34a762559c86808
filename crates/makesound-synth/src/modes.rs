//! Musical mode tables and the pulse note generator.
//!
//! [`KeySignatures`] lays the seven diatonic church modes over a number of
//! octaves starting at a base MIDI note. Voices use the active note vector in
//! two ways: the multi-oscillator voice pulls out-of-mode notes onto the
//! scale, and the pulse voice plays a random walk over it.
//!
//! All tables are sized for [`MAX_OCTAVES`] at construction so that
//! switching modes on note-on never allocates.

use alloc::vec::Vec;
use core::f32::consts::TAU;

use libm::{cosf, sinf};
use makesound_core::midi_to_freq;

use crate::random::{RandomSource, SeededRandom};

/// Number of diatonic modes (Ionian through Locrian).
pub const MODE_COUNT: usize = 7;

/// Notes per octave in a diatonic mode.
pub const NOTES_PER_OCTAVE: usize = 7;

/// Largest octave span a mode table can hold.
pub const MAX_OCTAVES: usize = 8;

/// Whole and half steps of the Ionian mode; the other modes are rotations.
const IONIAN_STEPS: [i32; NOTES_PER_OCTAVE] = [2, 2, 1, 2, 2, 2, 1];

/// Slowest and fastest note changes per second for the pulse generator.
const PULSE_SPEED_RANGE: (f32, f32) = (0.01, 100.0);

/// Mode/key engine interface used by the multi-oscillator voice.
pub trait ModeSource: Send {
    /// Set the sample rate for any audio-rate state the engine keeps.
    fn set_oscillator_params(&mut self, sample_rate: f32);

    /// Build the semitone tables for every mode over `octaves` octaves.
    fn generate_notes_for_modes(&mut self, octaves: usize);

    /// Select the active note vector: `mode` laid over `octaves` octaves from `base_note`.
    fn change_mode(&mut self, base_note: i32, mode: usize, octaves: usize);

    /// Frequencies of the active note vector, ascending.
    fn note_vector(&self) -> &[f32];

    /// Frequency at `index` in the active vector, wrapping past the end.
    fn notes(&self, index: usize) -> f32;
}

/// Pulse-mode extensions of the key engine.
pub trait PulseSource: ModeSource {
    /// Set the amplitude pulse rate in Hz.
    fn set_lfo_freq(&mut self, hz: f32);

    /// Set how many times per second the generator moves to a new note.
    fn set_pulse_speed(&mut self, speed: f32);

    /// Advance the note-change clock by one sample.
    fn change_freq(&mut self);

    /// Produce one output sample.
    fn random_note_generator(&mut self) -> f32;
}

/// Diatonic mode tables plus a pulsed random-note generator.
///
/// ```rust
/// use makesound_synth::{KeySignatures, ModeSource};
///
/// let mut key = KeySignatures::new(48000.0);
/// key.generate_notes_for_modes(2);
/// key.change_mode(60, 0, 2);
///
/// // C major from middle C over two octaves
/// assert_eq!(key.note_vector().len(), 14);
/// assert_eq!(key.notes(0), makesound_synth::midi_to_freq(60));
/// assert_eq!(key.notes(2), makesound_synth::midi_to_freq(64));
/// ```
#[derive(Debug, Clone)]
pub struct KeySignatures {
    /// Semitone offsets from the base note, one table per mode
    offsets: [Vec<i32>; MODE_COUNT],
    /// Active note vector in Hz
    notes: Vec<f32>,
    generated_octaves: usize,
    base_note: i32,
    mode: usize,

    sample_rate: f32,
    lfo_freq: f32,
    lfo_phase: f32,
    note_freq: f32,
    note_phase: f32,
    pulse_speed: f32,
    samples_until_change: u32,
    rng: SeededRandom,
}

impl Default for KeySignatures {
    fn default() -> Self {
        Self::new(48000.0)
    }
}

impl KeySignatures {
    /// Create an engine with empty tables.
    pub fn new(sample_rate: f32) -> Self {
        Self::with_seed(sample_rate, 1)
    }

    /// Create an engine whose note walk is driven by `seed`.
    pub fn with_seed(sample_rate: f32, seed: u64) -> Self {
        Self {
            offsets: core::array::from_fn(|_| Vec::with_capacity(MAX_OCTAVES * NOTES_PER_OCTAVE)),
            notes: Vec::with_capacity(MAX_OCTAVES * NOTES_PER_OCTAVE),
            generated_octaves: 0,
            base_note: 0,
            mode: 0,
            sample_rate,
            lfo_freq: 1.0,
            lfo_phase: 0.0,
            note_freq: 0.0,
            note_phase: 0.0,
            pulse_speed: 1.0,
            samples_until_change: 0,
            rng: SeededRandom::new(seed),
        }
    }

    /// Active mode index.
    pub fn mode(&self) -> usize {
        self.mode
    }

    /// Base MIDI note of the active vector.
    pub fn base_note(&self) -> i32 {
        self.base_note
    }

    /// Frequency the pulse generator is currently playing.
    pub fn current_frequency(&self) -> f32 {
        self.note_freq
    }

    /// Current pulse speed in note changes per second.
    pub fn pulse_speed(&self) -> f32 {
        self.pulse_speed
    }

    fn change_interval(&self) -> u32 {
        ((self.sample_rate / self.pulse_speed) as u32).max(1)
    }
}

impl ModeSource for KeySignatures {
    fn set_oscillator_params(&mut self, sample_rate: f32) {
        self.sample_rate = sample_rate;
        self.lfo_phase = 0.0;
        self.note_phase = 0.0;
        self.samples_until_change = 0;
    }

    fn generate_notes_for_modes(&mut self, octaves: usize) {
        let octaves = octaves.clamp(1, MAX_OCTAVES);
        for (mode, table) in self.offsets.iter_mut().enumerate() {
            table.clear();
            let mut semitones = 0;
            for step in 0..octaves * NOTES_PER_OCTAVE {
                table.push(semitones);
                semitones += IONIAN_STEPS[(mode + step) % NOTES_PER_OCTAVE];
            }
        }
        self.generated_octaves = octaves;
    }

    fn change_mode(&mut self, base_note: i32, mode: usize, octaves: usize) {
        let mode = mode.min(MODE_COUNT - 1);
        let octaves = octaves.clamp(1, MAX_OCTAVES);
        if octaves > self.generated_octaves {
            self.generate_notes_for_modes(octaves);
        }

        self.base_note = base_note;
        self.mode = mode;
        self.notes.clear();
        for &offset in self.offsets[mode].iter().take(octaves * NOTES_PER_OCTAVE) {
            self.notes.push(midi_to_freq(base_note + offset));
        }
        self.samples_until_change = 0;
    }

    fn note_vector(&self) -> &[f32] {
        &self.notes
    }

    fn notes(&self, index: usize) -> f32 {
        if self.notes.is_empty() {
            return 0.0;
        }
        self.notes[index % self.notes.len()]
    }
}

impl PulseSource for KeySignatures {
    fn set_lfo_freq(&mut self, hz: f32) {
        self.lfo_freq = hz.max(0.0);
    }

    fn set_pulse_speed(&mut self, speed: f32) {
        self.pulse_speed = speed.clamp(PULSE_SPEED_RANGE.0, PULSE_SPEED_RANGE.1);
    }

    #[inline]
    fn change_freq(&mut self) {
        if self.samples_until_change == 0 {
            if !self.notes.is_empty() {
                let index = self.rng.next_int(self.notes.len() as u32) as usize;
                self.note_freq = self.notes[index];
            }
            self.samples_until_change = self.change_interval();
        }
        self.samples_until_change -= 1;
    }

    #[inline]
    fn random_note_generator(&mut self) -> f32 {
        let tone = sinf(self.note_phase * TAU);
        // Raised cosine: silent at the start of each pulse, peak halfway
        let pulse = 0.5 * (1.0 - cosf(self.lfo_phase * TAU));

        self.note_phase += self.note_freq / self.sample_rate;
        self.note_phase -= libm::floorf(self.note_phase);
        self.lfo_phase += self.lfo_freq / self.sample_rate;
        self.lfo_phase -= libm::floorf(self.lfo_phase);

        tone * pulse
    }
}
