//! Timed note lists for offline rendering.

use serde::{Deserialize, Serialize};
use std::path::Path;

use crate::error::ConfigError;
use crate::validation::{Checks, ValidationResult};

/// A list of notes with start times and durations in seconds.
///
/// # TOML Format
///
/// ```toml
/// tail_seconds = 4.0
///
/// [[notes]]
/// start = 0.0
/// duration = 2.0
/// note = 28
/// velocity = 0.9
///
/// [[notes]]
/// start = 0.5
/// duration = 1.0
/// note = 72
/// velocity = 0.4
/// tail_off = false
/// ```
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Score {
    /// Extra time rendered after the last note ends.
    #[serde(default = "default_tail_seconds")]
    pub tail_seconds: f64,

    /// Notes in any order.
    #[serde(default)]
    pub notes: Vec<ScoreNote>,
}

fn default_tail_seconds() -> f64 {
    3.0
}

fn default_tail_off() -> bool {
    true
}

/// One note of a [`Score`].
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct ScoreNote {
    /// Note-on time in seconds.
    pub start: f64,
    /// Time until note-off in seconds.
    pub duration: f64,
    /// MIDI note number.
    pub note: u8,
    /// Velocity in `[0, 1]`.
    pub velocity: f32,
    /// Whether the note-off lets the voice release.
    #[serde(default = "default_tail_off")]
    pub tail_off: bool,
}

impl ScoreNote {
    /// Create a note that releases with a tail.
    pub fn new(start: f64, duration: f64, note: u8, velocity: f32) -> Self {
        Self {
            start,
            duration,
            note,
            velocity,
            tail_off: true,
        }
    }

    /// Set whether the note-off allows a tail.
    pub fn with_tail_off(mut self, tail_off: bool) -> Self {
        self.tail_off = tail_off;
        self
    }

    /// Note-off time in seconds.
    pub fn end(&self) -> f64 {
        self.start + self.duration
    }
}

/// A note-on or note-off at a point in time.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum ScoreEvent {
    /// Start `note` at `velocity`.
    NoteOn {
        /// Time in seconds.
        time: f64,
        /// MIDI note number.
        note: u8,
        /// Velocity in `[0, 1]`.
        velocity: f32,
    },
    /// Stop `note`.
    NoteOff {
        /// Time in seconds.
        time: f64,
        /// MIDI note number.
        note: u8,
        /// Whether the voice may release.
        tail_off: bool,
    },
}

impl ScoreEvent {
    /// Time of the event in seconds.
    pub fn time(&self) -> f64 {
        match *self {
            ScoreEvent::NoteOn { time, .. } | ScoreEvent::NoteOff { time, .. } => time,
        }
    }
}

impl Score {
    /// Create an empty score.
    pub fn new(tail_seconds: f64) -> Self {
        Self {
            tail_seconds,
            notes: Vec::new(),
        }
    }

    /// Add a note.
    pub fn with_note(mut self, note: ScoreNote) -> Self {
        self.notes.push(note);
        self
    }

    /// Load a score from a TOML file.
    pub fn load(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let path = path.as_ref();
        let content = std::fs::read_to_string(path).map_err(|e| ConfigError::read_file(path, e))?;
        Self::from_toml(&content)
    }

    /// Parse a score from a TOML string.
    pub fn from_toml(toml_str: &str) -> Result<Self, ConfigError> {
        Ok(toml::from_str(toml_str)?)
    }

    /// Save the score to a TOML file, creating parent directories.
    pub fn save(&self, path: impl AsRef<Path>) -> Result<(), ConfigError> {
        let path = path.as_ref();
        if let Some(parent) = path.parent()
            && !parent.as_os_str().is_empty()
            && !parent.exists()
        {
            std::fs::create_dir_all(parent).map_err(|e| ConfigError::create_dir(parent, e))?;
        }
        std::fs::write(path, self.to_toml()?).map_err(|e| ConfigError::write_file(path, e))?;
        Ok(())
    }

    /// Convert the score to a TOML string.
    pub fn to_toml(&self) -> Result<String, ConfigError> {
        Ok(toml::to_string_pretty(self)?)
    }

    /// Number of notes.
    pub fn len(&self) -> usize {
        self.notes.len()
    }

    /// Check if the score has no notes.
    pub fn is_empty(&self) -> bool {
        self.notes.is_empty()
    }

    /// Time of the last note-off plus the tail.
    pub fn duration_seconds(&self) -> f64 {
        let last = self.notes.iter().map(ScoreNote::end).fold(0.0, f64::max);
        last + self.tail_seconds
    }

    /// All note-ons and note-offs in time order.
    ///
    /// At equal times a note-off that ends an earlier note comes first, so a
    /// note ending exactly where the next one starts frees its voice before
    /// the new note is placed. A zero-length note keeps its note-off after
    /// its own note-on.
    pub fn events(&self) -> Vec<ScoreEvent> {
        let mut ranked: Vec<(u8, ScoreEvent)> = Vec::with_capacity(self.notes.len() * 2);
        for n in &self.notes {
            ranked.push((
                NOTE_ON_RANK,
                ScoreEvent::NoteOn {
                    time: n.start,
                    note: n.note,
                    velocity: n.velocity,
                },
            ));
            let off_rank = if n.end() > n.start {
                ENDING_RANK
            } else {
                INSTANT_END_RANK
            };
            ranked.push((
                off_rank,
                ScoreEvent::NoteOff {
                    time: n.end(),
                    note: n.note,
                    tail_off: n.tail_off,
                },
            ));
        }
        ranked.sort_by(|(ra, a), (rb, b)| a.time().total_cmp(&b.time()).then(ra.cmp(rb)));
        ranked.into_iter().map(|(_, event)| event).collect()
    }

    /// Check every note, reporting all failures together.
    pub fn validate(&self) -> ValidationResult<()> {
        let mut checks = Checks::new();
        checks.range("tail_seconds", self.tail_seconds, 0.0, f64::MAX);
        for (i, n) in self.notes.iter().enumerate() {
            checks.range(format!("notes[{i}].start"), n.start, 0.0, f64::MAX);
            checks.range(format!("notes[{i}].duration"), n.duration, 0.0, f64::MAX);
            checks.range(format!("notes[{i}].note"), f64::from(n.note), 0.0, 127.0);
            checks.range(format!("notes[{i}].velocity"), f64::from(n.velocity), 0.0, 1.0);
        }
        checks.finish()
    }
}

impl Default for Score {
    fn default() -> Self {
        Self::new(default_tail_seconds())
    }
}

/// Tie-break ranks for events at the same time.
const ENDING_RANK: u8 = 0;
const NOTE_ON_RANK: u8 = 1;
const INSTANT_END_RANK: u8 = 2;

#[cfg(test)]
mod tests {
    use super::*;
    use crate::validation::ValidationError;

    const TWO_NOTES: &str = r#"
tail_seconds = 2.0

[[notes]]
start = 1.0
duration = 0.5
note = 72
velocity = 0.4
tail_off = false

[[notes]]
start = 0.0
duration = 1.0
note = 28
velocity = 0.9
"#;

    #[test]
    fn parses_and_defaults_tail_off() {
        let score = Score::from_toml(TWO_NOTES).unwrap();
        assert_eq!(score.len(), 2);
        assert!(!score.notes[0].tail_off);
        assert!(score.notes[1].tail_off);
        assert!(score.validate().is_ok());
    }

    #[test]
    fn empty_score_defaults() {
        let score = Score::from_toml("").unwrap();
        assert!(score.is_empty());
        assert_eq!(score.tail_seconds, 3.0);
        assert_eq!(score.duration_seconds(), 3.0);
        assert!(score.events().is_empty());
    }

    #[test]
    fn duration_covers_last_release_and_tail() {
        let score = Score::from_toml(TWO_NOTES).unwrap();
        assert_eq!(score.duration_seconds(), 3.5);
    }

    #[test]
    fn events_are_time_ordered() {
        let score = Score::from_toml(TWO_NOTES).unwrap();
        let times: Vec<f64> = score.events().iter().map(ScoreEvent::time).collect();
        assert_eq!(times, [0.0, 1.0, 1.0, 1.5]);
    }

    #[test]
    fn note_off_precedes_note_on_at_same_time() {
        let score = Score::new(0.0)
            .with_note(ScoreNote::new(0.0, 1.0, 30, 0.5))
            .with_note(ScoreNote::new(1.0, 1.0, 30, 0.7));
        let events = score.events();
        assert!(matches!(events[1], ScoreEvent::NoteOff { note: 30, .. }));
        assert!(matches!(events[2], ScoreEvent::NoteOn { note: 30, .. }));
    }

    #[test]
    fn zero_length_note_ends_after_it_starts() {
        let score = Score::new(0.1).with_note(ScoreNote::new(0.0, 0.0, 30, 0.5));
        let events = score.events();
        assert!(matches!(events[0], ScoreEvent::NoteOn { note: 30, .. }));
        assert!(matches!(events[1], ScoreEvent::NoteOff { note: 30, .. }));
        assert!(score.validate().is_ok());
    }

    #[test]
    fn zero_length_note_between_touching_notes() {
        let score = Score::new(0.0)
            .with_note(ScoreNote::new(0.0, 1.0, 30, 0.5))
            .with_note(ScoreNote::new(1.0, 0.0, 31, 0.5))
            .with_note(ScoreNote::new(1.0, 1.0, 32, 0.5));
        let events = score.events();
        // Earlier note ends, then both starts, then the instant note ends
        assert!(matches!(events[1], ScoreEvent::NoteOff { note: 30, .. }));
        assert!(matches!(events[2], ScoreEvent::NoteOn { .. }));
        assert!(matches!(events[3], ScoreEvent::NoteOn { .. }));
        assert!(matches!(events[4], ScoreEvent::NoteOff { note: 31, .. }));
        assert!(matches!(events[5], ScoreEvent::NoteOff { note: 32, .. }));
    }

    #[test]
    fn rejects_bad_notes() {
        let score = Score::new(1.0)
            .with_note(ScoreNote::new(-1.0, 1.0, 30, 0.5))
            .with_note(ScoreNote::new(0.0, -0.5, 30, 0.5))
            .with_note(ScoreNote::new(0.0, 1.0, 200, 0.5))
            .with_note(ScoreNote::new(0.0, 1.0, 30, 1.2));
        match score.validate() {
            Err(ValidationError::Multiple(all)) => {
                assert_eq!(all.len(), 4);
                assert!(all[2].to_string().contains("notes[2].note"));
            }
            other => panic!("expected four failures, got {other:?}"),
        }
    }

    #[test]
    fn round_trip_keeps_tail_flags() {
        let score = Score::new(1.5)
            .with_note(ScoreNote::new(0.25, 0.5, 31, 0.3).with_tail_off(false));
        let back = Score::from_toml(&score.to_toml().unwrap()).unwrap();
        assert_eq!(back, score);
    }
}
