//! ADSR envelope generator for synthesis.
//!
//! Linear attack, decay and release segments with times in seconds. A stage
//! of zero length completes on the spot, so a release time of 0.0 cuts the
//! envelope to silence at `note_off`.
//!
//! Voices talk to envelopes through [`EnvelopeSource`] so that the render
//! loops can be driven by scripted amplitude contours in tests.

/// ADSR envelope states
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum EnvelopeState {
    /// Envelope is inactive, output is zero.
    #[default]
    Idle,
    /// Attack phase, output ramps from the current level up to 1.0.
    Attack,
    /// Decay phase, output falls from 1.0 toward the sustain level.
    Decay,
    /// Sustain phase, output holds at the sustain level.
    Sustain,
    /// Release phase, output ramps from the level at note-off down to zero.
    Release,
}

/// Envelope stage settings.
///
/// `attack`, `decay` and `release` are durations in seconds; `sustain` is a
/// level in `[0, 1]`.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct AdsrParams {
    /// Attack time in seconds.
    pub attack: f32,
    /// Decay time in seconds.
    pub decay: f32,
    /// Sustain level.
    pub sustain: f32,
    /// Release time in seconds.
    pub release: f32,
}

impl AdsrParams {
    /// Create a parameter set.
    pub const fn new(attack: f32, decay: f32, sustain: f32, release: f32) -> Self {
        Self {
            attack,
            decay,
            sustain,
            release,
        }
    }
}

impl Default for AdsrParams {
    fn default() -> Self {
        Self::new(0.1, 0.1, 1.0, 0.1)
    }
}

/// The envelope interface a voice needs.
pub trait EnvelopeSource: Send {
    /// Set the sample rate used to convert stage times into sample counts.
    fn set_sample_rate(&mut self, sample_rate: f32);
    /// Replace the stage settings.
    fn set_parameters(&mut self, params: AdsrParams);
    /// Force the envelope to idle at level zero.
    fn reset(&mut self);
    /// Start the attack stage.
    fn note_on(&mut self);
    /// Start the release stage.
    fn note_off(&mut self);
    /// Advance by one sample and return the new level.
    fn next_sample(&mut self) -> f32;
}

/// Linear ADSR envelope generator.
///
/// # Example
///
/// ```rust
/// use makesound_synth::{AdsrEnvelope, AdsrParams, EnvelopeSource, EnvelopeState};
///
/// let mut env = AdsrEnvelope::new(1000.0);
/// env.set_parameters(AdsrParams::new(0.01, 0.01, 0.5, 0.02));
///
/// env.note_on();
/// for _ in 0..100 {
///     env.next_sample();
/// }
/// assert_eq!(env.state(), EnvelopeState::Sustain);
///
/// env.note_off();
/// for _ in 0..20 {
///     env.next_sample();
/// }
/// assert_eq!(env.state(), EnvelopeState::Idle);
/// ```
#[derive(Debug, Clone)]
pub struct AdsrEnvelope {
    /// Current state
    state: EnvelopeState,
    /// Current output level
    level: f32,
    /// Sample rate
    sample_rate: f32,
    /// Stage settings
    params: AdsrParams,

    // Per-sample increments; non-positive means "stage has zero length"
    attack_rate: f32,
    decay_rate: f32,
    release_rate: f32,
}

impl Default for AdsrEnvelope {
    fn default() -> Self {
        Self::new(48000.0)
    }
}

impl AdsrEnvelope {
    /// Create a new envelope with [`AdsrParams::default`] settings.
    pub fn new(sample_rate: f32) -> Self {
        let mut env = Self {
            state: EnvelopeState::Idle,
            level: 0.0,
            sample_rate,
            params: AdsrParams::default(),
            attack_rate: 0.0,
            decay_rate: 0.0,
            release_rate: 0.0,
        };
        env.recalculate_rates();
        env
    }

    /// Get current state.
    pub fn state(&self) -> EnvelopeState {
        self.state
    }

    /// Get current level without advancing.
    pub fn level(&self) -> f32 {
        self.level
    }

    /// Get the stage settings.
    pub fn parameters(&self) -> AdsrParams {
        self.params
    }

    /// Check if envelope is active (not idle).
    pub fn is_active(&self) -> bool {
        self.state != EnvelopeState::Idle
    }

    fn samples_for(&self, seconds: f32) -> f32 {
        seconds * self.sample_rate
    }

    fn recalculate_rates(&mut self) {
        let attack_samples = self.samples_for(self.params.attack);
        let decay_samples = self.samples_for(self.params.decay);

        self.attack_rate = if attack_samples > 0.0 {
            1.0 / attack_samples
        } else {
            -1.0
        };
        self.decay_rate = if decay_samples > 0.0 {
            (1.0 - self.params.sustain) / decay_samples
        } else {
            -1.0
        };

        if self.state == EnvelopeState::Release {
            self.recalculate_release_rate();
        }
    }

    fn recalculate_release_rate(&mut self) {
        let release_samples = self.samples_for(self.params.release);
        self.release_rate = if release_samples > 0.0 {
            self.level / release_samples
        } else {
            -1.0
        };
    }

    /// Move to whichever stage follows the current one, skipping empty stages.
    fn advance_stage(&mut self) {
        match self.state {
            EnvelopeState::Idle => {
                if self.attack_rate > 0.0 {
                    self.state = EnvelopeState::Attack;
                } else {
                    self.level = 1.0;
                    self.state = EnvelopeState::Attack;
                    self.advance_stage();
                }
            }
            EnvelopeState::Attack => {
                if self.decay_rate > 0.0 {
                    self.state = EnvelopeState::Decay;
                } else {
                    self.level = self.params.sustain;
                    self.state = EnvelopeState::Sustain;
                }
            }
            EnvelopeState::Decay => {
                self.level = self.params.sustain;
                self.state = EnvelopeState::Sustain;
            }
            EnvelopeState::Sustain | EnvelopeState::Release => self.reset(),
        }
    }
}

impl EnvelopeSource for AdsrEnvelope {
    fn set_sample_rate(&mut self, sample_rate: f32) {
        self.sample_rate = sample_rate;
        self.recalculate_rates();
    }

    fn set_parameters(&mut self, params: AdsrParams) {
        self.params = AdsrParams {
            attack: params.attack.max(0.0),
            decay: params.decay.max(0.0),
            sustain: params.sustain.clamp(0.0, 1.0),
            release: params.release.max(0.0),
        };
        self.recalculate_rates();
    }

    fn reset(&mut self) {
        self.state = EnvelopeState::Idle;
        self.level = 0.0;
    }

    fn note_on(&mut self) {
        // Retrigger from the current level
        self.state = EnvelopeState::Idle;
        self.advance_stage();
    }

    fn note_off(&mut self) {
        if self.state == EnvelopeState::Idle {
            return;
        }

        if self.params.release > 0.0 {
            self.state = EnvelopeState::Release;
            self.recalculate_release_rate();
            if self.release_rate > 0.0 {
                return;
            }
        }
        self.reset();
    }

    #[inline]
    fn next_sample(&mut self) -> f32 {
        match self.state {
            EnvelopeState::Idle => {}

            EnvelopeState::Attack => {
                self.level += self.attack_rate;
                if self.level >= 1.0 {
                    self.level = 1.0;
                    self.advance_stage();
                }
            }

            EnvelopeState::Decay => {
                self.level -= self.decay_rate;
                if self.level <= self.params.sustain {
                    self.advance_stage();
                }
            }

            EnvelopeState::Sustain => {
                self.level = self.params.sustain;
            }

            EnvelopeState::Release => {
                self.level -= self.release_rate;
                if self.level <= 0.0 {
                    self.advance_stage();
                }
            }
        }

        self.level
    }
}
