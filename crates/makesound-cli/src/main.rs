//! MakeSound CLI - offline renderer for the makesound voice engine.

mod commands;
mod engine;
mod wav;

use clap::{Parser, Subcommand};
use tracing_subscriber::EnvFilter;

#[derive(Parser)]
#[command(name = "makesound")]
#[command(author, version, about = "MakeSound voice engine CLI", long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Render a score file to WAV
    Render(commands::render::RenderArgs),

    /// Render a single note to WAV
    Note(commands::note::NoteArgs),

    /// Print, check or write an engine configuration
    Config(commands::config::ConfigArgs),
}

fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| "info".into()))
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();

    match cli.command {
        Commands::Render(args) => commands::render::run(args),
        Commands::Note(args) => commands::note::run(args),
        Commands::Config(args) => commands::config::run(args),
    }
}
