//! klang CLI - live polyphonic keyboard synthesizer.

mod commands;
mod config;
mod keymap;
mod keys;

use clap::{Parser, Subcommand};
use tracing_subscriber::EnvFilter;

#[derive(Parser)]
#[command(name = "klang")]
#[command(author, version, about = "Polyphonic keyboard synthesizer", long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Play the synthesizer live from the computer keyboard
    Play(commands::play::PlayArgs),

    /// List available audio output devices
    Devices(commands::devices::DevicesArgs),
}

fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| "info".into()))
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();

    match cli.command {
        Commands::Play(args) => commands::play::run(args),
        Commands::Devices(args) => commands::devices::run(args),
    }
}
