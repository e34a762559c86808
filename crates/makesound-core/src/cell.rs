//! Lock-free parameter cells shared between control and audio threads.
//!
//! A control thread (GUI, host automation, CLI) writes, the audio thread
//! reads. The value is an `f32` bit-cast into an [`AtomicU32`], so neither
//! side ever blocks or allocates. Voices receive cells wrapped in an
//! [`Arc`](alloc::sync::Arc) at construction and read them once per block or
//! once per sample, never holding a reference across blocks.

use core::sync::atomic::{AtomicU32, Ordering};

/// A thread-safe `f32` parameter using bit-cast storage.
///
/// Writes are clamped to `[min, max]`.
///
/// # Example
///
/// ```rust
/// use std::sync::Arc;
/// use makesound_core::ParamCell;
///
/// let volume = Arc::new(ParamCell::with_range(0.5, 0.0, 1.0));
/// let audio_side = Arc::clone(&volume);
///
/// volume.set(1.5);
/// assert_eq!(audio_side.get(), 1.0);
/// ```
#[derive(Debug)]
pub struct ParamCell {
    value: AtomicU32,
    min: f32,
    max: f32,
    default: f32,
}

impl ParamCell {
    /// Create an unbounded cell holding `value`.
    pub fn new(value: f32) -> Self {
        Self::with_range(value, f32::MIN, f32::MAX)
    }

    /// Create a cell with range and default.
    pub fn with_range(default: f32, min: f32, max: f32) -> Self {
        Self {
            value: AtomicU32::new(default.clamp(min, max).to_bits()),
            min,
            max,
            default,
        }
    }

    /// Set the value (control thread).
    #[inline]
    pub fn set(&self, value: f32) {
        let clamped = value.clamp(self.min, self.max);
        self.value.store(clamped.to_bits(), Ordering::Release);
    }

    /// Get the value (audio thread).
    #[inline]
    pub fn get(&self) -> f32 {
        f32::from_bits(self.value.load(Ordering::Acquire))
    }

    /// Get the value as a non-negative index, truncating the fraction.
    ///
    /// Used for enumerated controls such as the mode selector.
    #[inline]
    pub fn get_index(&self) -> usize {
        self.get().max(0.0) as usize
    }

    /// Reset to the default value.
    pub fn reset(&self) {
        self.set(self.default);
    }

    /// Get the minimum value.
    pub fn min(&self) -> f32 {
        self.min
    }

    /// Get the maximum value.
    pub fn max(&self) -> f32 {
        self.max
    }

    /// Get the default value.
    pub fn default_value(&self) -> f32 {
        self.default
    }
}

impl Default for ParamCell {
    fn default() -> Self {
        Self::new(0.0)
    }
}
