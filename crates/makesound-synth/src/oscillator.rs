//! Audio-rate oscillators for the voice mixers.
//!
//! Each voice slot owns a fixed-waveform [`Oscillator`]. Voices only see the
//! [`ToneSource`] interface: set the sample rate once, set the frequency on
//! note-on, pull one sample per tick with [`process`](ToneSource::process).
//!
//! Square and saw edges are softened with a two-sample PolyBLEP residual.
//! Sine and triangle have no step discontinuities and are generated directly.

use core::f32::consts::TAU;
use libm::sinf;

/// The oscillator interface a voice needs.
pub trait ToneSource: Send {
    /// Set the sample rate in Hz.
    fn set_sample_rate(&mut self, sample_rate: f32);
    /// Set the frequency in Hz.
    fn set_frequency(&mut self, freq_hz: f32);
    /// Generate one sample.
    fn process(&mut self) -> f32;
}

/// Oscillator waveform types
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum OscillatorWaveform {
    /// Sine waveform, pure fundamental.
    #[default]
    Sine,
    /// Triangle waveform, odd harmonics rolling off at 12 dB/octave.
    Triangle,
    /// Square waveform (50% duty cycle), hollow odd-harmonic timbre.
    Square,
    /// Sawtooth waveform, all harmonics.
    Saw,
}

/// Audio-rate oscillator with a fixed waveform.
///
/// Output is bipolar in roughly `[-1, 1]` (PolyBLEP edges may overshoot by a
/// few percent on square and saw).
///
/// # Example
///
/// ```rust
/// use makesound_synth::{Oscillator, OscillatorWaveform};
///
/// let mut osc = Oscillator::with_waveform(48000.0, OscillatorWaveform::Triangle);
/// osc.set_frequency(220.0);
///
/// let sample = osc.process();
/// assert!(sample.abs() <= 1.0);
/// ```
#[derive(Debug, Clone)]
pub struct Oscillator {
    /// Current phase position [0.0, 1.0)
    phase: f32,
    /// Phase increment per sample
    phase_inc: f32,
    /// Sample rate in Hz
    sample_rate: f32,
    /// Frequency in Hz
    frequency: f32,
    /// Waveform type
    waveform: OscillatorWaveform,
}

impl Default for Oscillator {
    fn default() -> Self {
        Self::new(48000.0)
    }
}

impl Oscillator {
    /// Create a sine oscillator at 440 Hz.
    pub fn new(sample_rate: f32) -> Self {
        Self::with_waveform(sample_rate, OscillatorWaveform::Sine)
    }

    /// Create an oscillator with the given waveform at 440 Hz.
    pub fn with_waveform(sample_rate: f32, waveform: OscillatorWaveform) -> Self {
        Self {
            phase: 0.0,
            phase_inc: 440.0 / sample_rate,
            sample_rate,
            frequency: 440.0,
            waveform,
        }
    }

    /// Set frequency in Hz. Negative values are treated as 0.
    pub fn set_frequency(&mut self, freq_hz: f32) {
        self.frequency = freq_hz.max(0.0);
        self.phase_inc = self.frequency / self.sample_rate;
    }

    /// Get current frequency in Hz.
    pub fn frequency(&self) -> f32 {
        self.frequency
    }

    /// Get the waveform.
    pub fn waveform(&self) -> OscillatorWaveform {
        self.waveform
    }

    /// Set sample rate and recalculate phase increment.
    pub fn set_sample_rate(&mut self, sample_rate: f32) {
        self.sample_rate = sample_rate;
        self.phase_inc = self.frequency / self.sample_rate;
    }

    /// Reset phase to 0.
    pub fn reset(&mut self) {
        self.phase = 0.0;
    }

    /// Generate the next sample and advance the phase.
    #[inline]
    pub fn process(&mut self) -> f32 {
        let phase = self.phase;
        let dt = self.phase_inc;

        let output = match self.waveform {
            OscillatorWaveform::Sine => sinf(phase * TAU),
            OscillatorWaveform::Triangle => {
                // Peaks at phase 0.25, troughs at 0.75, starts at zero
                let t = phase + 0.25;
                let t = t - libm::floorf(t);
                1.0 - 4.0 * libm::fabsf(t - 0.5)
            }
            OscillatorWaveform::Square => {
                let naive = if phase < 0.5 { 1.0 } else { -1.0 };
                let falling = phase + 0.5;
                naive + poly_blep(phase, dt) - poly_blep(falling - libm::floorf(falling), dt)
            }
            OscillatorWaveform::Saw => 2.0 * phase - 1.0 - poly_blep(phase, dt),
        };

        self.phase += self.phase_inc;
        if self.phase >= 1.0 {
            self.phase -= libm::floorf(self.phase);
        }

        output
    }
}

impl ToneSource for Oscillator {
    fn set_sample_rate(&mut self, sample_rate: f32) {
        Oscillator::set_sample_rate(self, sample_rate);
    }

    fn set_frequency(&mut self, freq_hz: f32) {
        Oscillator::set_frequency(self, freq_hz);
    }

    #[inline]
    fn process(&mut self) -> f32 {
        Oscillator::process(self)
    }
}

/// Two-sample PolyBLEP residual for a unit step at phase 0.
///
/// `t` is the phase in `[0, 1)`, `dt` the phase increment. Non-zero only
/// within one increment either side of the wrap.
#[inline]
fn poly_blep(t: f32, dt: f32) -> f32 {
    if dt <= 0.0 {
        0.0
    } else if t < dt {
        let n = t / dt;
        n + n - n * n - 1.0
    } else if t > 1.0 - dt {
        let n = (t - 1.0) / dt;
        n * n + n + n + 1.0
    } else {
        0.0
    }
}
