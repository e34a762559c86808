//! Voice note lifecycle.
//!
//! ```text
//! Idle --start--> Sounding --stop(tail)--> Releasing --silent--> Idle
//!                 Sounding --stop(cut)---> Idle
//! ```
//!
//! A voice renders only while the lifecycle is active. While releasing, the
//! render loop hands the tracked signals to
//! [`check_silence`](VoiceLifecycle::check_silence) once per sample; the
//! first sample where all of them sit below [`AUDIBILITY_THRESHOLD`] ends
//! the note.

/// Magnitude below which a signal counts as silent.
pub const AUDIBILITY_THRESHOLD: f32 = 1e-4;

/// Where a voice is in its note lifecycle.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum VoiceState {
    /// Free for a new note; renders nothing.
    #[default]
    Idle,
    /// Note held.
    Sounding,
    /// Note released with tail-off; renders until silent.
    Releasing,
}

/// Lifecycle state machine shared by all voice variants.
#[derive(Clone, Copy, Debug, Default)]
pub struct VoiceLifecycle {
    state: VoiceState,
    note: Option<u8>,
}

impl VoiceLifecycle {
    /// Create an idle lifecycle.
    pub fn new() -> Self {
        Self::default()
    }

    /// Current state.
    #[inline]
    pub fn state(&self) -> VoiceState {
        self.state
    }

    /// True unless idle. Gates rendering.
    #[inline]
    pub fn is_active(&self) -> bool {
        self.state != VoiceState::Idle
    }

    /// Note being played, if any.
    pub fn note(&self) -> Option<u8> {
        self.note
    }

    /// Enter `Sounding` for `note`, from any state.
    pub fn start(&mut self, note: u8) {
        self.state = VoiceState::Sounding;
        self.note = Some(note);
    }

    /// Handle a note-off.
    ///
    /// With tail-off an active voice moves to `Releasing`; without it the
    /// voice goes straight to `Idle`.
    pub fn stop(&mut self, allow_tail_off: bool) {
        match (self.state, allow_tail_off) {
            (VoiceState::Idle, _) => {}
            (_, true) => self.state = VoiceState::Releasing,
            (_, false) => self.finish(),
        }
    }

    /// Return to `Idle` and forget the note.
    pub fn finish(&mut self) {
        self.state = VoiceState::Idle;
        self.note = None;
    }

    /// End a releasing note once every level is inaudible.
    ///
    /// Returns true if the voice just went idle.
    #[inline]
    pub fn check_silence(&mut self, levels: &[f32]) -> bool {
        if self.state != VoiceState::Releasing {
            return false;
        }
        if levels.iter().all(|l| l.abs() < AUDIBILITY_THRESHOLD) {
            self.finish();
            return true;
        }
        false
    }
}
