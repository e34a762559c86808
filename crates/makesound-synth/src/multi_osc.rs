//! Multi-oscillator voice with an envelope-shaped delay tail.
//!
//! Signal flow per sample:
//!
//! ```text
//!  envelope ──┬─────────────────────────────┐
//!             └─> envelope delay ─> env'     │
//!                                            v
//!  tri·t + sine·s + square·q/2               dry = mix · env
//!  ─────────────────────────── ──┐           wet = signal delay(mix) · 0.5 · env'
//!            count               ├─ /2 ─> mix
//!  detune oscillator ────────────┘           out = gain · (dry + wet)
//! ```
//!
//! The wet path follows its own lagging copy of the envelope, so the delay
//! tail fades on its own contour after the dry note has ended. Both delay
//! lines are independent and are retuned to the same length on every note.

use alloc::sync::Arc;

use makesound_core::{DelayError, DelayLine, LinearSmoothedParam, ParamCell};

use crate::envelope::{AdsrEnvelope, EnvelopeSource};
use crate::lifecycle::{VoiceLifecycle, VoiceState};
use crate::modes::{KeySignatures, ModeSource};
use crate::oscillator::{Oscillator, OscillatorWaveform, ToneSource};
use crate::policy::{
    DEFAULT_ENVELOPE, KEY_OCTAVES, NoteParameters, OscillatorMask, is_high_register,
};
use crate::random::{RandomSource, SeededRandom};
use crate::voice::{SoundKind, Voice, add_to_channels, block_end};

/// Master volume used until a shared cell is attached.
pub const DEFAULT_VOLUME: f32 = 0.5;

/// Default master volume ramp time in seconds.
pub const DEFAULT_VOLUME_SMOOTHING: f32 = 1.0;

/// Longest delay a voice can hold, in seconds.
const MAX_DELAY_SECONDS: f32 = 1.0;

/// Delay time set up by `init`, before any note retunes it.
const INITIAL_DELAY_SECONDS: f32 = 0.5;

/// Wet level of the signal delay.
const DELAY_MIX: f32 = 0.5;

#[derive(Debug, Clone)]
struct DelayPaths {
    envelope: DelayLine,
    signal: DelayLine,
}

impl DelayPaths {
    fn new(sample_rate: f32) -> Result<Self, DelayError> {
        let initial = (INITIAL_DELAY_SECONDS * sample_rate) as usize;
        let mut envelope = DelayLine::from_time(sample_rate, MAX_DELAY_SECONDS)?;
        let mut signal = DelayLine::from_time(sample_rate, MAX_DELAY_SECONDS)?;
        envelope.retune(initial)?;
        signal.retune(initial)?;
        Ok(Self { envelope, signal })
    }

    fn retune(&mut self, length: usize) -> Result<(), DelayError> {
        self.envelope.retune(length)?;
        self.signal.retune(length)
    }
}

/// Randomized multi-oscillator voice for the bass register.
///
/// Generic over its collaborators so the render loop can be driven by
/// scripted envelopes, tones and random draws; the defaults are the
/// crate's own implementations.
///
/// # Example
///
/// ```rust
/// use makesound_synth::{MultiOscVoice, Voice};
///
/// let mut voice = MultiOscVoice::new(7);
/// voice.init(48000.0).unwrap();
/// voice.start_note(20, 0.5);
///
/// let mut left = vec![0.0f32; 256];
/// let mut right = vec![0.0f32; 256];
/// voice.render_next_block(&mut [left.as_mut_slice(), right.as_mut_slice()], 0, 256);
/// assert_eq!(left, right);
/// ```
pub struct MultiOscVoice<
    E = AdsrEnvelope,
    K = KeySignatures,
    O = Oscillator,
    R = SeededRandom,
> {
    sample_rate: f32,
    lifecycle: VoiceLifecycle,
    params: NoteParameters,

    envelope: E,
    triangle: O,
    sine: O,
    square: O,
    detune: O,
    delays: Option<DelayPaths>,

    key: K,
    base_note: i32,
    mode: usize,

    volume: Arc<ParamCell>,
    smoothed_volume: LinearSmoothedParam,
    volume_smoothing: f32,

    rng: R,
}

impl MultiOscVoice {
    /// Create a voice with the default collaborators and a random seed.
    pub fn new(seed: u64) -> Self {
        let tones = [
            Oscillator::with_waveform(48000.0, OscillatorWaveform::Triangle),
            Oscillator::with_waveform(48000.0, OscillatorWaveform::Sine),
            Oscillator::with_waveform(48000.0, OscillatorWaveform::Square),
            Oscillator::with_waveform(48000.0, OscillatorWaveform::Triangle),
        ];
        Self::with_parts(
            AdsrEnvelope::default(),
            KeySignatures::default(),
            tones,
            SeededRandom::new(seed),
        )
    }
}

impl<E, K, O, R> MultiOscVoice<E, K, O, R>
where
    E: EnvelopeSource,
    K: ModeSource,
    O: ToneSource,
    R: RandomSource,
{
    /// Assemble a voice from its collaborators.
    ///
    /// `tones` are the triangle, sine, square and detune oscillators in that order.
    pub fn with_parts(envelope: E, key: K, tones: [O; 4], rng: R) -> Self {
        let [triangle, sine, square, detune] = tones;
        Self {
            sample_rate: 48000.0,
            lifecycle: VoiceLifecycle::new(),
            params: NoteParameters {
                mask: OscillatorMask::TRIANGLE_ONLY,
                envelope: DEFAULT_ENVELOPE,
                detune: 0.0,
                frequency: 0.0,
                delay_samples: 0,
            },
            envelope,
            triangle,
            sine,
            square,
            detune,
            delays: None,
            key,
            base_note: 24,
            mode: 0,
            volume: Arc::new(ParamCell::with_range(DEFAULT_VOLUME, 0.0, 1.0)),
            smoothed_volume: LinearSmoothedParam::with_config(
                0.0,
                48000.0,
                DEFAULT_VOLUME_SMOOTHING,
            ),
            volume_smoothing: DEFAULT_VOLUME_SMOOTHING,
            rng,
        }
    }

    /// Select the mode that high-register notes are pulled onto.
    pub fn set_mode(&mut self, base_note: i32, mode: usize) {
        self.base_note = base_note;
        self.mode = mode;
    }

    /// Set the master volume ramp time. Takes effect at the next `init`.
    pub fn set_volume_smoothing(&mut self, seconds: f32) {
        self.volume_smoothing = seconds.max(0.0);
    }

    /// Parameters chosen for the current (or last) note.
    pub fn parameters(&self) -> &NoteParameters {
        &self.params
    }

    /// Delay length both delay lines are tuned to, if initialized.
    pub fn delay_length(&self) -> Option<usize> {
        self.delays.as_ref().map(|d| d.signal.delay_length())
    }

    /// Access the key engine.
    pub fn key(&self) -> &K {
        &self.key
    }
}

impl<E, K, O, R> Voice for MultiOscVoice<E, K, O, R>
where
    E: EnvelopeSource,
    K: ModeSource,
    O: ToneSource,
    R: RandomSource,
{
    fn init(&mut self, sample_rate: f32) -> Result<(), DelayError> {
        self.sample_rate = sample_rate;

        self.triangle.set_sample_rate(sample_rate);
        self.sine.set_sample_rate(sample_rate);
        self.square.set_sample_rate(sample_rate);
        self.detune.set_sample_rate(sample_rate);
        self.envelope.set_sample_rate(sample_rate);

        self.delays = Some(DelayPaths::new(sample_rate)?);

        self.key.set_oscillator_params(sample_rate);
        self.key.generate_notes_for_modes(KEY_OCTAVES);

        self.smoothed_volume =
            LinearSmoothedParam::with_config(0.0, sample_rate, self.volume_smoothing);

        self.params.envelope = DEFAULT_ENVELOPE;
        self.envelope.set_parameters(DEFAULT_ENVELOPE);

        Ok(())
    }

    fn start_note(&mut self, note: u8, velocity: f32) {
        let velocity = if velocity.is_finite() {
            velocity.clamp(0.0, 1.0)
        } else {
            0.0
        };

        if is_high_register(note) {
            self.key.change_mode(self.base_note, self.mode, KEY_OCTAVES);
        }

        let params = NoteParameters::compute(
            self.params.envelope,
            velocity,
            note,
            self.sample_rate,
            &self.key,
            &mut self.rng,
        );

        if let Some(delays) = self.delays.as_mut() {
            let retuned = delays.retune(params.delay_samples);
            debug_assert!(retuned.is_ok(), "delay length exceeds capacity");
            #[cfg(feature = "tracing")]
            if let Err(err) = retuned {
                tracing::warn!("multi-osc voice: {err}");
            }
        }

        self.envelope.set_parameters(params.envelope);
        self.triangle.set_frequency(params.frequency);
        self.sine.set_frequency(params.frequency);
        self.square.set_frequency(params.frequency);
        self.params = params;

        self.envelope.reset();
        self.envelope.note_on();
        self.lifecycle.start(note);

        #[cfg(feature = "tracing")]
        tracing::debug!(
            note,
            velocity,
            frequency = params.frequency,
            oscillators = params.mask.count(),
            release = params.envelope.release,
            delay_samples = params.delay_samples,
            "multi-osc note on"
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
        let Some(delays) = self.delays.as_mut() else {
            return;
        };

        self.smoothed_volume.set_target(self.volume.get());
        self.detune.set_frequency(self.params.frequency - self.params.detune);

        let [triangle_gain, sine_gain, square_gain] = self.params.mask.gains();
        let count = self.params.mask.count() as f32;

        for index in start..block_end(output, start, num_samples) {
            let env = self.envelope.next_sample();
            let delayed_env = delays.envelope.process(env);

            let voices = self.triangle.process() * triangle_gain
                + self.sine.process() * sine_gain
                + self.square.process() * square_gain / 2.0;
            let mix = (voices / count + self.detune.process()) / 2.0;
            let wet = delays.signal.process(mix) * DELAY_MIX;

            let sample = mix * env + wet * delayed_env;
            let gain = self.smoothed_volume.advance();
            add_to_channels(output, index, gain * sample);

            if self.lifecycle.check_silence(&[delayed_env, env]) {
                #[cfg(feature = "tracing")]
                tracing::trace!(index, "multi-osc voice finished");
                break;
            }
        }
    }

    fn can_play(&self, sound: SoundKind) -> bool {
        sound == SoundKind::MultiOscillator
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
