//! Configuration and score files for the makesound voice engine.
//!
//! - **Engine**: [`EngineConfig`] sets the sample rate, voice counts,
//!   master volume, key and pulse speed used to build a voice pool.
//! - **Score**: [`Score`] is a list of timed notes rendered offline.
//! - **Validation**: both types check their ranges before use and report
//!   every problem at once through [`ValidationError`].
//!
//! # Example
//!
//! ```rust
//! use makesound_config::{EngineConfig, Score, ScoreNote};
//!
//! let config = EngineConfig::from_toml("sample_rate = 44100\nmode = 4").unwrap();
//! assert_eq!(config.sample_rate, 44100);
//! assert_eq!(config.block_size, 512);
//! config.validate().unwrap();
//!
//! let score = Score::new(2.0).with_note(ScoreNote::new(0.0, 1.0, 28, 0.8));
//! let text = score.to_toml().unwrap();
//! assert_eq!(Score::from_toml(&text).unwrap(), score);
//! ```

mod engine;
mod error;
mod score;
mod validation;

pub use engine::EngineConfig;
pub use error::ConfigError;
pub use score::{Score, ScoreEvent, ScoreNote};
pub use validation::{ValidationError, ValidationResult};
