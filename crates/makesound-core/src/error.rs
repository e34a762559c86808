//! Configuration errors for realtime primitives.
//!
//! These are raised at construction or retune time only. Nothing on the
//! per-sample path is fallible.

/// Errors raised when sizing or retuning a [`DelayLine`](crate::DelayLine).
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DelayError {
    /// The requested capacity was zero samples.
    ZeroCapacity,
    /// The requested delay length does not fit in the buffer.
    LengthExceedsCapacity {
        /// Requested delay length in samples.
        length: usize,
        /// Buffer capacity in samples.
        capacity: usize,
    },
}

impl core::fmt::Display for DelayError {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        match self {
            Self::ZeroCapacity => write!(f, "delay line capacity must be greater than zero"),
            Self::LengthExceedsCapacity { length, capacity } => write!(
                f,
                "delay length {length} exceeds delay line capacity {capacity}"
            ),
        }
    }
}

#[cfg(feature = "std")]
impl std::error::Error for DelayError {}
