//! Linear parameter smoothing for zipper-free gain changes.
//!
//! A voice reads its master volume from a [`ParamCell`](crate::ParamCell)
//! once per block and hands it to [`LinearSmoothedParam::set_target`]. The
//! ramp then advances once per sample, so a jump in the control value turns
//! into a straight line over the configured ramp time instead of a click.
//!
//! ## Usage
//!
//! ```rust
//! use makesound_core::LinearSmoothedParam;
//!
//! let mut volume = LinearSmoothedParam::with_config(0.0, 48000.0, 0.01);
//! volume.set_target(1.0);
//!
//! // 10 ms at 48 kHz
//! for _ in 0..480 {
//!     let _gain = volume.advance();
//! }
//! assert!(volume.is_settled());
//! ```

/// A value that moves toward its target in a straight line.
///
/// Every [`set_target`](Self::set_target) with a new value starts a fresh
/// ramp from wherever the value is now, lasting `ramp_seconds` regardless of
/// the distance covered.
#[derive(Debug, Clone)]
pub struct LinearSmoothedParam {
    value: f32,
    goal: f32,
    step: f32,
    remaining: u32,
    ramp_samples: u32,
}

impl LinearSmoothedParam {
    /// Create a ramp at 48 kHz with a 10 ms ramp time.
    pub fn new(initial: f32) -> Self {
        Self::with_config(initial, 48000.0, 0.01)
    }

    /// Create a ramp starting (and settled) at `initial`.
    pub fn with_config(initial: f32, sample_rate: f32, ramp_seconds: f32) -> Self {
        Self {
            value: initial,
            goal: initial,
            step: 0.0,
            remaining: 0,
            ramp_samples: ramp_length(sample_rate, ramp_seconds),
        }
    }

    /// Start a ramp toward `target`.
    ///
    /// An unchanged target is ignored, so a control re-read every block
    /// does not keep restarting the ramp.
    pub fn set_target(&mut self, target: f32) {
        if (target - self.goal).abs() < 1e-9 {
            return;
        }
        self.goal = target;

        if self.ramp_samples == 0 {
            self.set_immediate(target);
        } else {
            self.step = (target - self.value) / self.ramp_samples as f32;
            self.remaining = self.ramp_samples;
        }
    }

    /// Jump to `value` with no ramp.
    pub fn set_immediate(&mut self, value: f32) {
        self.value = value;
        self.goal = value;
        self.step = 0.0;
        self.remaining = 0;
    }

    /// Change sample rate and ramp time. A ramp in flight stops where it is.
    pub fn reset(&mut self, sample_rate: f32, ramp_seconds: f32) {
        self.ramp_samples = ramp_length(sample_rate, ramp_seconds);
        self.set_immediate(self.value);
    }

    /// Move one sample along the ramp and return the new value.
    #[inline]
    pub fn advance(&mut self) -> f32 {
        match self.remaining {
            0 => {}
            1 => {
                self.value = self.goal;
                self.remaining = 0;
            }
            _ => {
                self.value += self.step;
                self.remaining -= 1;
            }
        }
        self.value
    }

    /// Current value.
    #[inline]
    pub fn get(&self) -> f32 {
        self.value
    }

    /// Value the ramp is heading for.
    #[inline]
    pub fn target(&self) -> f32 {
        self.goal
    }

    /// True once the ramp has arrived.
    #[inline]
    pub fn is_settled(&self) -> bool {
        self.remaining == 0
    }
}

impl Default for LinearSmoothedParam {
    fn default() -> Self {
        Self::new(0.0)
    }
}

fn ramp_length(sample_rate: f32, ramp_seconds: f32) -> u32 {
    (ramp_seconds.max(0.0) * sample_rate.max(0.0)) as u32
}
