//! Score rendering command.

use clap::Args;
use makesound_config::Score;
use std::path::PathBuf;

use crate::engine::Engine;
use crate::wav;

#[derive(Args)]
pub struct RenderArgs {
    /// Score file (TOML)
    #[arg(value_name = "SCORE")]
    score: PathBuf,

    /// Output WAV file
    #[arg(value_name = "OUTPUT")]
    output: PathBuf,

    /// Engine configuration file (TOML)
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Override the seed from the configuration
    #[arg(long)]
    seed: Option<u64>,

    /// Output bit depth (16, 24 or 32 float)
    #[arg(long, default_value = "32")]
    bits: u16,
}

pub fn run(args: RenderArgs) -> anyhow::Result<()> {
    let mut config = super::load_config(args.config.as_deref())?;
    if let Some(seed) = args.seed {
        config.seed = seed;
    }

    let score = Score::load(&args.score)?;
    score.validate()?;

    println!("Rendering {}...", args.score.display());
    println!(
        "  {} notes, {:.2}s at {} Hz",
        score.len(),
        score.duration_seconds(),
        config.sample_rate
    );

    let mut engine = Engine::new(&config)?;
    let channels = engine.render(&score);

    wav::write_planar(&args.output, &channels, engine.sample_rate(), args.bits)?;
    println!(
        "Wrote {} frames x {} channels to {} (peak {:.3})",
        channels.first().map_or(0, Vec::len),
        engine.channels(),
        args.output.display(),
        wav::peak(&channels)
    );
    Ok(())
}
