//! Note dispatch over a fixed set of voices.
//!
//! The pool owns boxed voices and the sounds it answers to. A note-on goes
//! to the first idle voice that can play a sound covering the note. When
//! every suitable voice is busy the note is dropped; nothing is stolen.

use alloc::boxed::Box;
use alloc::sync::Arc;
use alloc::vec::Vec;

use makesound_core::{DelayError, ParamCell};

use crate::voice::{SoundKind, Voice};

/// Owns voices and routes note events to them.
///
/// # Example
///
/// ```rust
/// use makesound_synth::{MultiOscVoice, PulseVoice, SoundKind, VoicePool};
///
/// let mut pool = VoicePool::new();
/// pool.add_sound(SoundKind::MultiOscillator);
/// pool.add_sound(SoundKind::Pulse);
/// pool.add_voice(Box::new(MultiOscVoice::new(1)));
/// pool.add_voice(Box::new(PulseVoice::new(2)));
/// pool.init(48000.0).unwrap();
///
/// assert!(pool.note_on(30, 0.8));
/// assert!(pool.note_on(72, 0.5));
/// assert!(!pool.note_on(48, 0.5)); // no sound covers the middle register
/// assert_eq!(pool.active_voice_count(), 2);
/// ```
#[derive(Default)]
pub struct VoicePool {
    voices: Vec<Box<dyn Voice>>,
    sounds: Vec<SoundKind>,
}

impl VoicePool {
    /// Create an empty pool.
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a voice.
    pub fn add_voice(&mut self, voice: Box<dyn Voice>) {
        self.voices.push(voice);
    }

    /// Register a sound notes can be routed to.
    pub fn add_sound(&mut self, sound: SoundKind) {
        if !self.sounds.contains(&sound) {
            self.sounds.push(sound);
        }
    }

    /// Prepare every voice for `sample_rate`.
    pub fn init(&mut self, sample_rate: f32) -> Result<(), DelayError> {
        for voice in &mut self.voices {
            voice.init(sample_rate)?;
        }
        Ok(())
    }

    /// Share one master volume cell with every voice.
    pub fn set_volume_source(&mut self, volume: &Arc<ParamCell>) {
        for voice in &mut self.voices {
            voice.set_volume_source(Arc::clone(volume));
        }
    }

    /// Number of voices.
    pub fn voice_count(&self) -> usize {
        self.voices.len()
    }

    /// Number of voices that are not idle.
    pub fn active_voice_count(&self) -> usize {
        self.voices.iter().filter(|v| v.is_active()).count()
    }

    /// Read access to the voices.
    pub fn voices(&self) -> &[Box<dyn Voice>] {
        &self.voices
    }

    /// Start a note. Returns false if it was dropped.
    ///
    /// Voices already holding the same note are released first.
    pub fn note_on(&mut self, note: u8, velocity: f32) -> bool {
        for voice in &mut self.voices {
            if voice.current_note() == Some(note) {
                voice.stop_note(true);
            }
        }

        for &sound in &self.sounds {
            if !sound.applies_to_note(note) {
                continue;
            }
            if let Some(voice) = self
                .voices
                .iter_mut()
                .find(|v| !v.is_active() && v.can_play(sound))
            {
                voice.start_note(note, velocity);
                return true;
            }
        }

        #[cfg(feature = "tracing")]
        tracing::debug!(note, "no free voice, note dropped");
        false
    }

    /// Stop every voice holding `note`.
    pub fn note_off(&mut self, note: u8, allow_tail_off: bool) {
        for voice in &mut self.voices {
            if voice.is_active() && voice.current_note() == Some(note) {
                voice.stop_note(allow_tail_off);
            }
        }
    }

    /// Stop every active voice.
    pub fn all_notes_off(&mut self, allow_tail_off: bool) {
        for voice in &mut self.voices {
            if voice.is_active() {
                voice.stop_note(allow_tail_off);
            }
        }
    }

    /// Add every voice's output for one block into `output`.
    pub fn render_next_block(&mut self, output: &mut [&mut [f32]], start: usize, num_samples: usize) {
        for voice in &mut self.voices {
            voice.render_next_block(output, start, num_samples);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::lifecycle::VoiceState;
    use alloc::{vec, vec::Vec};

    /// Voice that records the events it receives.
    #[derive(Default)]
    struct Probe {
        kind: Option<SoundKind>,
        state: VoiceState,
        note: Option<u8>,
        starts: Vec<(u8, f32)>,
        stops: Vec<bool>,
    }

    impl Probe {
        fn playing(kind: SoundKind) -> Self {
            Self {
                kind: Some(kind),
                ..Self::default()
            }
        }
    }

    impl Voice for Probe {
        fn init(&mut self, _sample_rate: f32) -> Result<(), DelayError> {
            Ok(())
        }

        fn start_note(&mut self, note: u8, velocity: f32) {
            self.state = VoiceState::Sounding;
            self.note = Some(note);
            self.starts.push((note, velocity));
        }

        fn stop_note(&mut self, allow_tail_off: bool) {
            self.stops.push(allow_tail_off);
            if allow_tail_off {
                self.state = VoiceState::Releasing;
            } else {
                self.state = VoiceState::Idle;
                self.note = None;
            }
        }

        fn render_next_block(&mut self, output: &mut [&mut [f32]], start: usize, num_samples: usize) {
            if self.state == VoiceState::Idle {
                return;
            }
            for ch in output.iter_mut() {
                for s in &mut ch[start..start + num_samples] {
                    *s += 1.0;
                }
            }
        }

        fn can_play(&self, sound: SoundKind) -> bool {
            self.kind == Some(sound)
        }

        fn set_volume_source(&mut self, _volume: Arc<ParamCell>) {}

        fn state(&self) -> VoiceState {
            self.state
        }

        fn current_note(&self) -> Option<u8> {
            self.note
        }
    }

    fn pool_with(kinds: &[SoundKind]) -> VoicePool {
        let mut pool = VoicePool::new();
        pool.add_sound(SoundKind::MultiOscillator);
        pool.add_sound(SoundKind::Pulse);
        for &kind in kinds {
            pool.add_voice(Box::new(Probe::playing(kind)));
        }
        pool
    }

    #[test]
    fn routes_by_register() {
        let mut pool = pool_with(&[SoundKind::Pulse, SoundKind::MultiOscillator]);
        assert!(pool.note_on(20, 0.5));
        assert_eq!(pool.voices()[1].current_note(), Some(20));
        assert!(pool.note_on(100, 0.5));
        assert_eq!(pool.voices()[0].current_note(), Some(100));
    }

    #[test]
    fn drops_when_no_voice_free() {
        let mut pool = pool_with(&[SoundKind::MultiOscillator]);
        assert!(pool.note_on(20, 0.5));
        assert!(!pool.note_on(21, 0.5));
        assert_eq!(pool.voices()[0].current_note(), Some(20));
    }

    #[test]
    fn unregistered_sound_is_not_played() {
        let mut pool = VoicePool::new();
        pool.add_voice(Box::new(Probe::playing(SoundKind::Pulse)));
        assert!(!pool.note_on(100, 0.5));
        pool.add_sound(SoundKind::Pulse);
        assert!(pool.note_on(100, 0.5));
    }

    #[test]
    fn same_note_is_released_before_restart() {
        let mut pool = pool_with(&[SoundKind::MultiOscillator, SoundKind::MultiOscillator]);
        pool.note_on(30, 0.5);
        pool.note_on(30, 0.7);
        assert_eq!(pool.voices()[0].state(), VoiceState::Releasing);
        assert_eq!(pool.voices()[1].state(), VoiceState::Sounding);
    }

    #[test]
    fn note_off_and_all_notes_off() {
        let mut pool = pool_with(&[SoundKind::MultiOscillator, SoundKind::MultiOscillator]);
        pool.note_on(30, 0.5);
        pool.note_on(31, 0.5);

        pool.note_off(30, false);
        assert_eq!(pool.active_voice_count(), 1);

        pool.all_notes_off(false);
        assert_eq!(pool.active_voice_count(), 0);
    }

    #[test]
    fn render_sums_voices() {
        let mut pool = pool_with(&[SoundKind::MultiOscillator, SoundKind::MultiOscillator]);
        pool.note_on(30, 0.5);
        pool.note_on(31, 0.5);

        let mut left = vec![0.0f32; 8];
        let mut right = vec![0.0f32; 8];
        pool.render_next_block(&mut [left.as_mut_slice(), right.as_mut_slice()], 2, 4);
        assert_eq!(left, [0.0, 0.0, 2.0, 2.0, 2.0, 2.0, 0.0, 0.0]);
        assert_eq!(left, right);
    }

    #[test]
    fn duplicate_sounds_are_ignored() {
        let mut pool = VoicePool::new();
        pool.add_sound(SoundKind::Pulse);
        pool.add_sound(SoundKind::Pulse);
        assert_eq!(pool.sounds.len(), 1);
    }
}
