//! Circular delay line with independent read and write cursors.
//!
//! Unlike a tap-style delay that computes the read position from a delay
//! time on every call, [`DelayLine`] keeps a persistent read cursor. The
//! delay length is applied once, at [`retune`](DelayLine::retune) time, by
//! placing the read cursor `length` slots behind the write cursor. From then
//! on both cursors advance together, one slot per [`process`](DelayLine::process)
//! call, wrapping at the capacity.
//!
//! Retuning mid-stream jumps the read cursor to a different point in the
//! stored history. The jump is audible and intended: it changes which part
//! of the past is being replayed, it does not resample anything.
//!
//! # Memory
//!
//! The buffer is allocated once in [`DelayLine::new`] and never reallocates.
//! `retune` and `process` are allocation-free.

use alloc::vec;
use alloc::vec::Vec;

use crate::error::DelayError;

/// Fixed-capacity circular sample buffer with a retunable read cursor.
///
/// # Invariants
///
/// - `read_cursor < capacity` and `write_cursor < capacity` at all times.
/// - Immediately after [`retune`](Self::retune):
///   `read_cursor == (write_cursor + capacity - delay_length) % capacity`.
/// - Between retunes both cursors advance by exactly one slot per
///   [`process`](Self::process) call, so the distance between them is fixed.
///
/// # Example
///
/// ```rust
/// use makesound_core::DelayLine;
///
/// let mut delay = DelayLine::new(8).unwrap();
/// delay.retune(3).unwrap();
///
/// let outputs: Vec<f32> = [1.0, 0.0, 0.0, 0.0, 0.0]
///     .iter()
///     .map(|&x| delay.process(x))
///     .collect();
///
/// // The impulse comes back three calls after it was written.
/// assert_eq!(outputs, vec![0.0, 0.0, 0.0, 1.0, 0.0]);
/// ```
#[derive(Debug, Clone)]
pub struct DelayLine {
    /// Circular buffer storage
    buffer: Vec<f32>,
    /// Next slot to be read
    read_cursor: usize,
    /// Next slot to be written
    write_cursor: usize,
    /// Delay length applied at the last retune
    delay_length: usize,
}

impl DelayLine {
    /// Creates a zero-filled delay line holding exactly `capacity` samples.
    ///
    /// The read and write cursors start together, which behaves as a delay
    /// of `capacity` samples until the first [`retune`](Self::retune).
    ///
    /// # Errors
    ///
    /// Returns [`DelayError::ZeroCapacity`] if `capacity` is 0.
    pub fn new(capacity: usize) -> Result<Self, DelayError> {
        if capacity == 0 {
            return Err(DelayError::ZeroCapacity);
        }

        Ok(Self {
            buffer: vec![0.0; capacity],
            read_cursor: 0,
            write_cursor: 0,
            delay_length: capacity,
        })
    }

    /// Creates a delay line large enough for `max_seconds` of audio.
    ///
    /// Capacity is `floor(sample_rate * max_seconds)` samples, so a delay of
    /// `velocity * sample_rate` samples with `velocity <= 1.0` always fits
    /// a line created with `max_seconds = 1.0`.
    pub fn from_time(sample_rate: f32, max_seconds: f32) -> Result<Self, DelayError> {
        let capacity = (sample_rate * max_seconds).max(0.0) as usize;
        Self::new(capacity)
    }

    /// Sets the delay length in samples by moving the read cursor.
    ///
    /// The read cursor is placed `delay_length` slots behind the write
    /// cursor, wrapping once by the capacity. Buffer contents are untouched.
    /// A length of 0 or of exactly the capacity both leave the cursors on
    /// the same slot, which replays what was written `capacity` calls ago.
    ///
    /// # Errors
    ///
    /// Returns [`DelayError::LengthExceedsCapacity`] if `delay_length` is
    /// greater than the capacity. The cursors are left unchanged.
    pub fn retune(&mut self, delay_length: usize) -> Result<(), DelayError> {
        let capacity = self.buffer.len();
        if delay_length > capacity {
            return Err(DelayError::LengthExceedsCapacity {
                length: delay_length,
                capacity,
            });
        }

        self.delay_length = delay_length;
        self.read_cursor = (self.write_cursor + capacity - delay_length) % capacity;

        #[cfg(feature = "tracing")]
        tracing::trace!(
            delay_length,
            read_cursor = self.read_cursor,
            write_cursor = self.write_cursor,
            "delay retune"
        );

        Ok(())
    }

    /// Reads the delayed sample, writes `input`, and advances both cursors.
    ///
    /// Returns the value found at the read cursor before the write, i.e. the
    /// sample written `delay_length` calls ago (zero during warm-up). Call
    /// exactly once per generated audio sample.
    #[inline]
    pub fn process(&mut self, input: f32) -> f32 {
        let capacity = self.buffer.len();
        debug_assert!(self.read_cursor < capacity);
        debug_assert!(self.write_cursor < capacity);

        let output = self.buffer[self.read_cursor];
        self.buffer[self.write_cursor] = input;

        self.read_cursor = (self.read_cursor + 1) % capacity;
        self.write_cursor = (self.write_cursor + 1) % capacity;

        output
    }

    /// Zeroes the stored history and rewinds the cursors.
    ///
    /// The current delay length is kept.
    pub fn clear(&mut self) {
        let capacity = self.buffer.len();
        self.buffer.fill(0.0);
        self.write_cursor = 0;
        self.read_cursor = (capacity - self.delay_length) % capacity;
    }

    /// Returns the capacity in samples.
    pub fn capacity(&self) -> usize {
        self.buffer.len()
    }

    /// Returns the delay length applied at the last retune.
    pub fn delay_length(&self) -> usize {
        self.delay_length
    }

    /// Returns the slot that the next [`process`](Self::process) call reads.
    pub fn read_cursor(&self) -> usize {
        self.read_cursor
    }

    /// Returns the slot that the next [`process`](Self::process) call writes.
    pub fn write_cursor(&self) -> usize {
        self.write_cursor
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_zero_capacity_rejected() {
        assert_eq!(DelayLine::new(0).unwrap_err(), DelayError::ZeroCapacity);
    }

    #[test]
    fn test_new_is_zero_filled() {
        let mut delay = DelayLine::new(16).unwrap();
        for _ in 0..16 {
            assert_eq!(delay.process(0.5), 0.0);
        }
        // Second lap returns what was written during the first
        assert_eq!(delay.process(0.0), 0.5);
    }

    #[test]
    fn test_retune_places_read_cursor_behind_write_cursor() {
        let mut delay = DelayLine::new(10).unwrap();
        for _ in 0..7 {
            delay.process(0.0);
        }
        assert_eq!(delay.write_cursor(), 7);

        delay.retune(3).unwrap();
        assert_eq!(delay.read_cursor(), 4);

        // Wraps once when the length reaches past slot zero
        delay.retune(9).unwrap();
        assert_eq!(delay.read_cursor(), 8);
    }

    #[test]
    fn test_retune_rejects_length_over_capacity() {
        let mut delay = DelayLine::new(10).unwrap();
        delay.retune(4).unwrap();
        let before = delay.read_cursor();

        let err = delay.retune(11).unwrap_err();
        assert_eq!(
            err,
            DelayError::LengthExceedsCapacity {
                length: 11,
                capacity: 10
            }
        );
        assert_eq!(delay.read_cursor(), before);
        assert_eq!(delay.delay_length(), 4);
    }

    #[test]
    fn test_full_capacity_length_is_accepted() {
        let mut delay = DelayLine::new(4).unwrap();
        delay.retune(4).unwrap();
        assert_eq!(delay.read_cursor(), delay.write_cursor());

        delay.process(1.0);
        for _ in 0..3 {
            assert_eq!(delay.process(0.0), 0.0);
        }
        assert_eq!(delay.process(0.0), 1.0);
    }

    #[test]
    fn test_impulse_returns_after_delay_length() {
        let mut delay = DelayLine::new(32).unwrap();
        delay.retune(5).unwrap();

        assert_eq!(delay.process(1.0), 0.0);
        for _ in 0..4 {
            assert_eq!(delay.process(0.0), 0.0);
        }
        assert_eq!(delay.process(0.0), 1.0);
        assert_eq!(delay.process(0.0), 0.0);
    }

    #[test]
    fn test_cursors_wrap() {
        let mut delay = DelayLine::new(3).unwrap();
        delay.retune(2).unwrap();
        for _ in 0..7 {
            delay.process(0.0);
        }
        assert_eq!(delay.write_cursor(), 7 % 3);
        assert_eq!(delay.read_cursor(), (7 % 3 + 3 - 2) % 3);
    }

    #[test]
    fn test_retune_mid_stream_replays_other_history() {
        let mut delay = DelayLine::new(8).unwrap();
        delay.retune(4).unwrap();
        for i in 1..=6 {
            delay.process(i as f32);
        }

        // Shorten to 2: next read is the sample written two calls ago
        delay.retune(2).unwrap();
        assert_eq!(delay.process(0.0), 5.0);
        assert_eq!(delay.process(0.0), 6.0);
    }

    #[test]
    fn test_clear_keeps_delay_length() {
        let mut delay = DelayLine::new(8).unwrap();
        delay.retune(3).unwrap();
        for _ in 0..5 {
            delay.process(1.0);
        }

        delay.clear();
        assert_eq!(delay.write_cursor(), 0);
        assert_eq!(delay.read_cursor(), 5);
        assert_eq!(delay.delay_length(), 3);
        for _ in 0..8 {
            assert_eq!(delay.process(0.0), 0.0);
        }
    }

    #[test]
    fn test_from_time_capacity() {
        let delay = DelayLine::from_time(44100.0, 1.0).unwrap();
        assert_eq!(delay.capacity(), 44100);
        assert!(DelayLine::from_time(0.0, 1.0).is_err());
    }
}
