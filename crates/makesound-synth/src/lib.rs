//! MakeSound Synth - voice engine for the makesound instrument
//!
//! This crate provides the voices of a polyphonic instrument whose character
//! comes from velocity- and pitch-driven randomization, together with the
//! collaborators they play through.
//!
//! # Core Components
//!
//! ## Voices
//!
//! - [`Voice`] - Control surface every voice implements
//! - [`MultiOscVoice`] - Triangle/sine/square mix with a detune oscillator
//!   and an envelope-shaped delay tail (notes up to 35)
//! - [`PulseVoice`] - Pulsed random walk over a musical mode (notes above 60)
//! - [`VoicePool`] - Routes note events to free voices
//! - [`VoiceLifecycle`] / [`VoiceState`] - Idle/Sounding/Releasing state machine
//!
//! ## Note Parameter Policy
//!
//! The [`policy`] module maps `(velocity, note, random source)` to
//! oscillator mask, envelope, detune, frequency and delay length.
//! Randomness comes from an owned [`RandomSource`] per voice, so a fixed seed
//! reproduces a performance exactly.
//!
//! ```rust
//! use makesound_synth::{KeySignatures, ModeSource, NoteParameters, SeededRandom};
//! use makesound_synth::policy::{DEFAULT_ENVELOPE, KEY_OCTAVES};
//!
//! let mut key = KeySignatures::new(48000.0);
//! key.change_mode(24, 0, KEY_OCTAVES);
//! let mut rng = SeededRandom::new(1);
//!
//! let params = NoteParameters::compute(DEFAULT_ENVELOPE, 0.5, 20, 48000.0, &key, &mut rng);
//! assert_eq!(params.mask.count(), 1);
//! assert_eq!(params.envelope.release, 6.0);
//! ```
//!
//! ## Collaborators
//!
//! - [`Oscillator`] ([`ToneSource`]) - Sine, triangle, square, saw
//! - [`AdsrEnvelope`] ([`EnvelopeSource`]) - Linear ADSR with times in seconds
//! - [`KeySignatures`] ([`ModeSource`], [`PulseSource`]) - Church mode tables
//!   and the pulse note generator
//! - [`SeededRandom`] ([`RandomSource`]) - Seeded uniform draws
//!
//! # no_std Support
//!
//! This crate is `no_std` compatible (it needs `alloc`). Disable the default
//! `std` feature:
//!
//! ```toml
//! [dependencies]
//! makesound-synth = { version = "0.1", default-features = false }
//! ```
//!
//! # Example: Rendering a block
//!
//! ```rust
//! use makesound_synth::{MultiOscVoice, SoundKind, VoicePool};
//!
//! let mut pool = VoicePool::new();
//! pool.add_sound(SoundKind::MultiOscillator);
//! for seed in 0..4 {
//!     pool.add_voice(Box::new(MultiOscVoice::new(seed)));
//! }
//! pool.init(48000.0).unwrap();
//!
//! pool.note_on(28, 0.9);
//! pool.note_on(33, 0.4);
//!
//! let mut left = vec![0.0f32; 512];
//! let mut right = vec![0.0f32; 512];
//! pool.render_next_block(&mut [left.as_mut_slice(), right.as_mut_slice()], 0, 512);
//! ```

#![cfg_attr(not(feature = "std"), no_std)]

#[cfg(not(feature = "std"))]
extern crate alloc;

#[cfg(feature = "std")]
extern crate std as alloc;

pub mod envelope;
pub mod lifecycle;
pub mod modes;
pub mod multi_osc;
pub mod oscillator;
pub mod policy;
pub mod pool;
pub mod pulse;
pub mod random;
pub mod voice;

// Re-export main types at crate root
pub use envelope::{AdsrEnvelope, AdsrParams, EnvelopeSource, EnvelopeState};
pub use lifecycle::{AUDIBILITY_THRESHOLD, VoiceLifecycle, VoiceState};
pub use modes::{KeySignatures, MODE_COUNT, ModeSource, PulseSource};
pub use multi_osc::MultiOscVoice;
pub use oscillator::{Oscillator, OscillatorWaveform, ToneSource};
pub use policy::{NoteParameters, OscillatorMask};
pub use pool::VoicePool;
pub use pulse::PulseVoice;
pub use random::{RandomSource, SeededRandom};
pub use voice::{SoundKind, Voice};

// Re-export pitch helpers from core for convenience
pub use makesound_core::{freq_to_midi, midi_to_freq};
