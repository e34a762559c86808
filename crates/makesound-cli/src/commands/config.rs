//! Engine configuration command.

use clap::{Args, Subcommand};
use makesound_config::EngineConfig;
use std::path::PathBuf;

#[derive(Args)]
pub struct ConfigArgs {
    #[command(subcommand)]
    command: ConfigCommand,
}

#[derive(Subcommand)]
enum ConfigCommand {
    /// Print the default configuration
    Show,

    /// Load and validate a configuration file
    Check {
        /// Configuration file (TOML)
        #[arg(value_name = "FILE")]
        path: PathBuf,
    },

    /// Write the default configuration to a file
    Init {
        /// Destination file
        #[arg(value_name = "FILE")]
        path: PathBuf,

        /// Overwrite an existing file
        #[arg(long)]
        force: bool,
    },
}

pub fn run(args: ConfigArgs) -> anyhow::Result<()> {
    match args.command {
        ConfigCommand::Show => {
            print!("{}", EngineConfig::default().to_toml()?);
        }
        ConfigCommand::Check { path } => {
            let config = super::load_config(Some(&path))?;
            println!(
                "{} is valid: {} voices at {} Hz",
                path.display(),
                config.total_voices(),
                config.sample_rate
            );
        }
        ConfigCommand::Init { path, force } => {
            if path.exists() && !force {
                anyhow::bail!("{} already exists, use --force to overwrite", path.display());
            }
            EngineConfig::default().save(&path)?;
            println!("Wrote default configuration to {}", path.display());
        }
    }
    Ok(())
}
