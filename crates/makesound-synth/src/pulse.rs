//! Pulse voice: a pulsed random walk over a mode.
//!
//! On note-on the key engine is rebuilt around the played note, with more
//! octaves for harder notes, and its amplitude pulse is locked to the played
//! note's frequency. While the note sounds the engine hops to a random mode
//! note `pulse_speed` times per second.
//!
//! Volume, mode and pulse speed come from shared cells. Mode is read on
//! note-on; volume and pulse speed are read every sample.

use alloc::sync::Arc;

use makesound_core::{DelayError, ParamCell, midi_to_freq};

use crate::envelope::{AdsrEnvelope, AdsrParams, EnvelopeSource};
use crate::lifecycle::{VoiceLifecycle, VoiceState};
use crate::modes::{KeySignatures, MODE_COUNT, PulseSource};
use crate::multi_osc::DEFAULT_VOLUME;
use crate::policy::{pulse_envelope, pulse_octaves};
use crate::random::{RandomSource, SeededRandom};
use crate::voice::{SoundKind, Voice, add_to_channels, block_end};

/// Pulse speed used until a shared cell is attached, in note changes per second.
pub const DEFAULT_PULSE_SPEED: f32 = 1.0;

/// Pulsed random-note voice for the upper register.
///
/// ```rust
/// use std::sync::Arc;
/// use makesound_core::ParamCell;
/// use makesound_synth::{PulseVoice, Voice};
///
/// let mut voice = PulseVoice::new(3);
/// voice.set_mode_source(Arc::new(ParamCell::new(5.0)));
/// voice.init(48000.0).unwrap();
/// voice.start_note(72, 0.7);
///
/// let mut out = vec![0.0f32; 512];
/// voice.render_next_block(&mut [out.as_mut_slice()], 0, 512);
/// ```
pub struct PulseVoice<E = AdsrEnvelope, K = KeySignatures, R = SeededRandom> {
    sample_rate: f32,
    lifecycle: VoiceLifecycle,
    envelope: E,
    envelope_params: AdsrParams,
    key: K,

    volume: Arc<ParamCell>,
    mode: Arc<ParamCell>,
    pulse_speed: Arc<ParamCell>,

    rng: R,
}

impl PulseVoice {
    /// Create a voice with the default collaborators.
    ///
    /// `seed` drives both the envelope draws and the key engine's note walk.
    pub fn new(seed: u64) -> Self {
        Self::with_parts(
            AdsrEnvelope::default(),
            KeySignatures::with_seed(48000.0, seed.wrapping_add(1)),
            SeededRandom::new(seed),
        )
    }
}

impl<E, K, R> PulseVoice<E, K, R>
where
    E: EnvelopeSource,
    K: PulseSource,
    R: RandomSource,
{
    /// Assemble a voice from its collaborators.
    pub fn with_parts(envelope: E, key: K, rng: R) -> Self {
        Self {
            sample_rate: 48000.0,
            lifecycle: VoiceLifecycle::new(),
            envelope,
            envelope_params: AdsrParams::default(),
            key,
            volume: Arc::new(ParamCell::with_range(DEFAULT_VOLUME, 0.0, 1.0)),
            mode: Arc::new(ParamCell::with_range(0.0, 0.0, (MODE_COUNT - 1) as f32)),
            pulse_speed: Arc::new(ParamCell::new(DEFAULT_PULSE_SPEED)),
            rng,
        }
    }

    /// Share the mode selector cell (mode index 0..=6).
    pub fn set_mode_source(&mut self, mode: Arc<ParamCell>) {
        self.mode = mode;
    }

    /// Share the pulse speed cell (note changes per second).
    pub fn set_pulse_speed_source(&mut self, pulse_speed: Arc<ParamCell>) {
        self.pulse_speed = pulse_speed;
    }

    /// Envelope settings of the current (or last) note.
    pub fn envelope_parameters(&self) -> AdsrParams {
        self.envelope_params
    }

    /// Access the key engine.
    pub fn key(&self) -> &K {
        &self.key
    }
}

impl<E, K, R> Voice for PulseVoice<E, K, R>
where
    E: EnvelopeSource,
    K: PulseSource,
    R: RandomSource,
{
    fn init(&mut self, sample_rate: f32) -> Result<(), DelayError> {
        self.sample_rate = sample_rate;
        self.envelope.set_sample_rate(sample_rate);
        self.key.set_oscillator_params(sample_rate);
        Ok(())
    }

    fn start_note(&mut self, note: u8, velocity: f32) {
        let velocity = if velocity.is_finite() {
            velocity.clamp(0.0, 1.0)
        } else {
            0.0
        };

        let octaves = pulse_octaves(velocity);
        let mode = self.mode.get_index();
        self.key.set_oscillator_params(self.sample_rate);
        self.key.generate_notes_for_modes(octaves);
        self.key.change_mode(i32::from(note), mode, octaves);
        self.key.set_lfo_freq(midi_to_freq(i32::from(note)));

        self.envelope_params = pulse_envelope(velocity, &mut self.rng);
        self.envelope.set_parameters(self.envelope_params);
        self.envelope.reset();
        self.envelope.note_on();
        self.lifecycle.start(note);

        #[cfg(feature = "tracing")]
        tracing::debug!(
            note,
            velocity,
            octaves,
            mode,
            sustain = self.envelope_params.sustain,
            release = self.envelope_params.release,
            "pulse note on"
        );
    }

    fn stop_note(&mut self, allow_tail_off: bool) {
        if allow_tail_off && self.lifecycle.is_active() {
            self.envelope.note_off();
        }
        self.lifecycle.stop(allow_tail_off);
    }

    fn render_next_block(&mut self, output: &mut [&mut [f32]], start: usize, num_samples: usize) {
        if !self.lifecycle.is_active() {
            return;
        }

        for index in start..block_end(output, start, num_samples) {
            let env = self.envelope.next_sample();
            self.key.set_pulse_speed(self.pulse_speed.get());
            self.key.change_freq();

            let sample = self.key.random_note_generator() * env * self.volume.get();
            add_to_channels(output, index, sample);

            if self.lifecycle.check_silence(&[env]) {
                #[cfg(feature = "tracing")]
                tracing::trace!(index, "pulse voice finished");
                break;
            }
        }
    }

    fn can_play(&self, sound: SoundKind) -> bool {
        sound == SoundKind::Pulse
    }

    fn set_volume_source(&mut self, volume: Arc<ParamCell>) {
        self.volume = volume;
    }

    fn state(&self) -> VoiceState {
        self.lifecycle.state()
    }

    fn current_note(&self) -> Option<u8> {
        self.lifecycle.note()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::modes::ModeSource;
    use alloc::{vec, vec::Vec};

    fn render(voice: &mut PulseVoice, samples: usize) -> Vec<f32> {
        let mut out = vec![0.0f32; samples];
        voice.render_next_block(&mut [out.as_mut_slice()], 0, samples);
        out
    }

    fn ready_voice() -> PulseVoice {
        let mut voice = PulseVoice::new(5);
        voice.init(48000.0).unwrap();
        voice
    }

    #[test]
    fn note_on_rebuilds_key_around_note() {
        let mut voice = ready_voice();
        voice.set_mode_source(Arc::new(ParamCell::new(5.0)));
        voice.start_note(69, 0.5);

        let key = voice.key();
        assert_eq!(key.base_note(), 69);
        assert_eq!(key.mode(), 5);
        // ceil(1.5) + 1 = 3 octaves
        assert_eq!(key.note_vector().len(), 21);
        assert_eq!(key.notes(0), 440.0);
    }

    #[test]
    fn envelope_follows_velocity() {
        let mut voice = ready_voice();
        voice.start_note(80, 0.9);
        let loud = voice.envelope_parameters();
        assert!((0.01..=0.15).contains(&loud.sustain));
        assert!((loud.release - libm::expf(3.4)).abs() < 1e-2);

        voice.start_note(80, 0.1);
        let soft = voice.envelope_parameters();
        assert!((0.75..=1.0).contains(&soft.sustain));
        assert_eq!(soft.attack, 0.1);
        assert_eq!(soft.decay, 0.15);
    }

    #[test]
    fn produces_output_while_sounding() {
        let mut voice = ready_voice();
        voice.start_note(72, 0.7);
        let out = render(&mut voice, 9600);
        assert!(out.iter().any(|&s| s != 0.0));
        assert!(out.iter().all(|s| s.is_finite() && s.abs() <= 1.0));
    }

    #[test]
    fn volume_cell_is_read_every_sample() {
        let mut voice = ready_voice();
        let volume = Arc::new(ParamCell::new(1.0));
        voice.set_volume_source(Arc::clone(&volume));
        voice.start_note(72, 0.7);
        render(&mut voice, 4800);

        volume.set(0.0);
        let out = render(&mut voice, 256);
        assert!(out.iter().all(|&s| s == 0.0));
    }

    #[test]
    fn pulse_speed_cell_follows_changes_between_blocks() {
        let mut voice = ready_voice();
        let speed = Arc::new(ParamCell::new(2.0));
        voice.set_pulse_speed_source(Arc::clone(&speed));
        voice.start_note(72, 0.7);

        render(&mut voice, 64);
        assert_eq!(voice.key().pulse_speed(), 2.0);

        speed.set(8.0);
        render(&mut voice, 64);
        assert_eq!(voice.key().pulse_speed(), 8.0);

        speed.set(0.5);
        render(&mut voice, 1);
        assert_eq!(voice.key().pulse_speed(), 0.5);
    }

    #[test]
    fn tail_off_ends_when_envelope_is_silent() {
        let mut voice = ready_voice();
        // Release e^(-2) ≈ 0.135 s
        voice.start_note(90, 0.0);
        render(&mut voice, 4800);
        voice.stop_note(true);
        assert_eq!(voice.state(), VoiceState::Releasing);

        render(&mut voice, 48000);
        assert_eq!(voice.state(), VoiceState::Idle);
        let out = render(&mut voice, 64);
        assert!(out.iter().all(|&s| s == 0.0));
    }

    #[test]
    fn hard_stop() {
        let mut voice = ready_voice();
        voice.start_note(90, 0.5);
        voice.stop_note(false);
        assert!(!voice.is_active());
    }

    #[test]
    fn can_play_only_pulse() {
        let voice = PulseVoice::new(0);
        assert!(voice.can_play(SoundKind::Pulse));
        assert!(!voice.can_play(SoundKind::MultiOscillator));
    }
}
