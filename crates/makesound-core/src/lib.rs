//! MakeSound Core - realtime primitives for makesound voices
//!
//! This crate provides the building blocks that a synthesizer voice owns
//! exclusively and touches from inside the audio callback. Nothing here
//! allocates after construction.
//!
//! # Core Abstractions
//!
//! ## Delay Lines
//!
//! - [`DelayLine`] - Fixed-capacity circular buffer with independent read and
//!   write cursors, retunable while running
//!
//! ## Parameter Handling
//!
//! - [`LinearSmoothedParam`] - Linear ramps toward a target (master volume)
//! - [`ParamCell`] - Lock-free single-writer/single-reader `f32` cell shared
//!   between a control thread and the audio thread
//!
//! ## Utilities
//!
//! - Pitch conversion: [`midi_to_freq`], [`freq_to_midi`]
//! - Range mapping: [`map_range`]
//!
//! # no_std Support
//!
//! This crate is `no_std` compatible. Disable the default `std` feature:
//!
//! ```toml
//! [dependencies]
//! makesound-core = { version = "0.1", default-features = false }
//! ```
//!
//! # Example
//!
//! ```rust
//! use makesound_core::DelayLine;
//!
//! // One second of delay at 44.1 kHz, tuned to half a second
//! let mut delay = DelayLine::new(44100).unwrap();
//! delay.retune(22050).unwrap();
//!
//! let out = delay.process(1.0);
//! assert_eq!(out, 0.0);
//! ```

#![cfg_attr(not(feature = "std"), no_std)]

#[cfg(not(feature = "std"))]
extern crate alloc;

#[cfg(feature = "std")]
extern crate std as alloc;

pub mod cell;
pub mod delay;
pub mod error;
pub mod math;
pub mod param;

// Re-export main types at crate root
pub use cell::ParamCell;
pub use delay::DelayLine;
pub use error::DelayError;
pub use math::{freq_to_midi, map_range, midi_to_freq};
pub use param::LinearSmoothedParam;
