//! The voice control surface shared by all voice variants.
//!
//! A host (see [`VoicePool`](crate::VoicePool)) drives voices only through
//! [`Voice`]: `init` once, then `start_note`/`stop_note` as events arrive and
//! `render_next_block` once per processing block. Variants share no state;
//! each owns its envelope, oscillators and delay lines outright.

use alloc::sync::Arc;

use makesound_core::{DelayError, ParamCell};

use crate::lifecycle::VoiceState;

/// The kinds of sound a host can route notes to.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum SoundKind {
    /// Multi-oscillator voice with delay tail, bass register.
    MultiOscillator,
    /// Pulsed random-note voice, upper register.
    Pulse,
}

impl SoundKind {
    /// Highest note the multi-oscillator sound answers to.
    pub const MULTI_OSCILLATOR_HIGHEST: u8 = 35;

    /// Notes above this one go to the pulse sound.
    pub const PULSE_LOWEST_EXCLUSIVE: u8 = 60;

    /// Check whether this sound answers to `note`.
    pub fn applies_to_note(self, note: u8) -> bool {
        match self {
            Self::MultiOscillator => note <= Self::MULTI_OSCILLATOR_HIGHEST,
            Self::Pulse => note > Self::PULSE_LOWEST_EXCLUSIVE,
        }
    }
}

/// A polyphony slot.
///
/// Output buffers are planar: one slice per channel. Voices add into
/// `[start, start + num_samples)` of every channel, clipped to the shortest
/// channel.
pub trait Voice: Send {
    /// Prepare for playback at `sample_rate`. Allocates; call before rendering.
    fn init(&mut self, sample_rate: f32) -> Result<(), DelayError>;

    /// Begin a note. Velocity is in `[0, 1]`; values outside are clamped.
    fn start_note(&mut self, note: u8, velocity: f32);

    /// End the current note, with a release tail if `allow_tail_off`.
    fn stop_note(&mut self, allow_tail_off: bool);

    /// Add this voice's output for one block into `output`.
    fn render_next_block(&mut self, output: &mut [&mut [f32]], start: usize, num_samples: usize);

    /// Check whether this voice can play `sound`.
    fn can_play(&self, sound: SoundKind) -> bool;

    /// Share a master volume cell with the control thread.
    fn set_volume_source(&mut self, volume: Arc<ParamCell>);

    /// Lifecycle state.
    fn state(&self) -> VoiceState;

    /// Note being played, if any.
    fn current_note(&self) -> Option<u8>;

    /// True unless idle.
    fn is_active(&self) -> bool {
        self.state() != VoiceState::Idle
    }
}

/// End of the writable range for a block, clipped to the shortest channel.
#[inline]
pub(crate) fn block_end(output: &[&mut [f32]], start: usize, num_samples: usize) -> usize {
    let shortest = output.iter().map(|ch| ch.len()).min().unwrap_or(0);
    start.saturating_add(num_samples).min(shortest)
}

/// Add `sample` at `index` on every channel.
#[inline]
pub(crate) fn add_to_channels(output: &mut [&mut [f32]], index: usize, sample: f32) {
    for channel in output.iter_mut() {
        channel[index] += sample;
    }
}
