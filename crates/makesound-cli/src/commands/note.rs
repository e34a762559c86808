//! Single note rendering command.

use clap::Args;
use makesound_config::{Score, ScoreNote};
use std::path::PathBuf;

use crate::engine::Engine;
use crate::wav;

#[derive(Args)]
pub struct NoteArgs {
    /// Output WAV file
    #[arg(value_name = "OUTPUT")]
    output: PathBuf,

    /// MIDI note (0-35 multi-oscillator, 61-127 pulse)
    #[arg(long, default_value = "28")]
    note: u8,

    /// Velocity (0-1)
    #[arg(long, default_value = "0.8")]
    velocity: f32,

    /// Time the note is held, in seconds
    #[arg(long, default_value = "2.0")]
    duration: f64,

    /// Time rendered after the note-off, in seconds
    #[arg(long, default_value = "4.0")]
    tail: f64,

    /// Cut the note at note-off instead of releasing
    #[arg(long)]
    hard_stop: bool,

    /// Master volume (0-1), overrides the configuration
    #[arg(long)]
    volume: Option<f32>,

    /// Pulse voice mode (0 Ionian to 6 Locrian), overrides the configuration
    #[arg(long)]
    mode: Option<u8>,

    /// Pulse note changes per second, overrides the configuration
    #[arg(long)]
    pulse_speed: Option<f32>,

    /// Engine configuration file (TOML)
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Output bit depth (16, 24 or 32 float)
    #[arg(long, default_value = "32")]
    bits: u16,
}

pub fn run(args: NoteArgs) -> anyhow::Result<()> {
    let config = super::load_config(args.config.as_deref())?;

    let score = Score::new(args.tail).with_note(
        ScoreNote::new(0.0, args.duration, args.note, args.velocity)
            .with_tail_off(!args.hard_stop),
    );
    score.validate()?;

    let mut engine = Engine::new(&config)?;
    if let Some(volume) = args.volume {
        engine.volume().set(volume);
    }
    if let Some(mode) = args.mode {
        engine.mode().set(f32::from(mode));
    }
    if let Some(speed) = args.pulse_speed {
        engine.pulse_speed().set(speed);
    }

    println!("Rendering note {} at velocity {:.2}...", args.note, args.velocity);
    if (36..=60).contains(&args.note) {
        println!("  note {} has no sound, output will be silent", args.note);
    }

    let channels = engine.render(&score);
    wav::write_planar(&args.output, &channels, engine.sample_rate(), args.bits)?;
    println!(
        "Wrote {:.2}s to {} (peak {:.3})",
        score.duration_seconds(),
        args.output.display(),
        wav::peak(&channels)
    );
    Ok(())
}
