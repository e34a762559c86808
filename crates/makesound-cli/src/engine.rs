//! Voice pool assembly and block-based score rendering.

use std::sync::Arc;

use makesound_config::{EngineConfig, Score, ScoreEvent};
use makesound_core::ParamCell;
use makesound_synth::{MODE_COUNT, MultiOscVoice, PulseVoice, SoundKind, VoicePool};

/// Seed offset between the multi-oscillator and pulse voice banks.
const PULSE_SEED_OFFSET: u64 = 1000;

/// A voice pool plus the shared control cells that drive it.
pub struct Engine {
    pool: VoicePool,
    volume: Arc<ParamCell>,
    mode: Arc<ParamCell>,
    pulse_speed: Arc<ParamCell>,
    sample_rate: u32,
    block_size: usize,
    channels: usize,
}

impl Engine {
    /// Build and initialize a pool from `config`.
    pub fn new(config: &EngineConfig) -> anyhow::Result<Self> {
        let volume = Arc::new(ParamCell::with_range(config.volume, 0.0, 1.0));
        let mode = Arc::new(ParamCell::with_range(
            config.mode as f32,
            0.0,
            (MODE_COUNT - 1) as f32,
        ));
        let pulse_speed = Arc::new(ParamCell::with_range(config.pulse_speed, 0.01, 100.0));

        let mut pool = VoicePool::new();
        if config.multi_osc_voices > 0 {
            pool.add_sound(SoundKind::MultiOscillator);
        }
        if config.pulse_voices > 0 {
            pool.add_sound(SoundKind::Pulse);
        }

        for i in 0..config.multi_osc_voices as u64 {
            let mut voice = MultiOscVoice::new(config.seed.wrapping_add(i));
            voice.set_mode(i32::from(config.base_note), config.mode);
            voice.set_volume_smoothing(config.volume_smoothing_seconds);
            pool.add_voice(Box::new(voice));
        }
        for i in 0..config.pulse_voices as u64 {
            let mut voice =
                PulseVoice::new(config.seed.wrapping_add(PULSE_SEED_OFFSET).wrapping_add(i));
            voice.set_mode_source(Arc::clone(&mode));
            voice.set_pulse_speed_source(Arc::clone(&pulse_speed));
            pool.add_voice(Box::new(voice));
        }

        pool.set_volume_source(&volume);
        pool.init(config.sample_rate_hz())?;

        tracing::debug!(
            voices = pool.voice_count(),
            sample_rate = config.sample_rate,
            "engine ready"
        );

        Ok(Self {
            pool,
            volume,
            mode,
            pulse_speed,
            sample_rate: config.sample_rate,
            block_size: config.block_size,
            channels: usize::from(config.channels),
        })
    }

    /// Master volume cell.
    pub fn volume(&self) -> &Arc<ParamCell> {
        &self.volume
    }

    /// Pulse voice mode cell.
    pub fn mode(&self) -> &Arc<ParamCell> {
        &self.mode
    }

    /// Pulse speed cell.
    pub fn pulse_speed(&self) -> &Arc<ParamCell> {
        &self.pulse_speed
    }

    /// Output channel count.
    pub fn channels(&self) -> usize {
        self.channels
    }

    /// Output sample rate in Hz.
    pub fn sample_rate(&self) -> u32 {
        self.sample_rate
    }

    /// Render `score` into planar channel buffers.
    ///
    /// Blocks are split at event positions so every note starts on its
    /// exact sample.
    pub fn render(&mut self, score: &Score) -> Vec<Vec<f32>> {
        let total = self.seconds_to_samples(score.duration_seconds());
        let mut channels = vec![vec![0.0f32; total]; self.channels];
        let events = score.events();
        let mut next_event = 0;
        let mut dropped = 0usize;

        let mut block_start = 0;
        while block_start < total {
            let block_end = (block_start + self.block_size).min(total);
            let mut cursor = block_start;

            while let Some(event) = events.get(next_event) {
                let at = self.seconds_to_samples(event.time());
                if at >= block_end {
                    break;
                }
                let at = at.max(cursor);
                self.render_span(&mut channels, cursor, at - cursor);
                cursor = at;
                if !self.apply(event) {
                    dropped += 1;
                }
                next_event += 1;
            }

            self.render_span(&mut channels, cursor, block_end - cursor);
            block_start = block_end;
        }

        if dropped > 0 {
            tracing::warn!(dropped, "notes dropped for lack of a free voice");
        }
        tracing::info!(
            samples = total,
            active = self.pool.active_voice_count(),
            "render finished"
        );
        channels
    }

    fn apply(&mut self, event: &ScoreEvent) -> bool {
        match *event {
            ScoreEvent::NoteOn { note, velocity, .. } => self.pool.note_on(note, velocity),
            ScoreEvent::NoteOff { note, tail_off, .. } => {
                self.pool.note_off(note, tail_off);
                true
            }
        }
    }

    fn render_span(&mut self, channels: &mut [Vec<f32>], start: usize, len: usize) {
        if len == 0 {
            return;
        }
        let mut output: Vec<&mut [f32]> = channels.iter_mut().map(Vec::as_mut_slice).collect();
        self.pool.render_next_block(&mut output, start, len);
    }

    fn seconds_to_samples(&self, seconds: f64) -> usize {
        (seconds.max(0.0) * f64::from(self.sample_rate)).round() as usize
    }
}
