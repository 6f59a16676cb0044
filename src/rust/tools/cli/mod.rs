// Parent `tools` module controls `cli` gating; avoid duplicating crate-level cfg here.
mod commands;
pub mod state;

use std::time::Duration;

use anyhow::Result;
use clap::{Parser, Subcommand};
use commands::play::PlayCommand;
use state::CliContext;

#[derive(Parser, Debug)]
#[command(name = "metronome")]
#[command(version, about = "🥁 Metronome – a click track you can retune while it plays.")]
pub struct Cli {
    /// Print scheduler and config details
    #[arg(short, long, global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Run a metronome session, driven by commands typed on stdin
    Play(PlayCommand),
    /// Manage the song list
    Songs(commands::songs::SongsCommand),
    /// Write a default config and click sound in the current directory
    Init(commands::init::InitCommand),
}

pub fn run() -> Result<()> {
    let cli = Cli::parse();
    let ctx = CliContext::new(cli.verbose);
    let runtime = tokio::runtime::Runtime::new()?;

    let result = runtime.block_on(async move {
        match cli.command {
            Commands::Play(command) => commands::play::execute(command, &ctx).await?,
            Commands::Songs(command) => command.execute(&ctx).await?,
            Commands::Init(command) => command.execute(&ctx).await?,
        }
        Ok(())
    });

    // A stdin read may still be parked on a blocking thread.
    runtime.shutdown_timeout(Duration::from_millis(100));
    result
}
