#![cfg(feature = "cli")]

use std::io::ErrorKind;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use clap::{Args, Subcommand};

use crate::platform::config::AppConfig;
use crate::services::library::{JsonFileStore, LibraryError, MAX_BPM_CHARS, SongLibrary};
use crate::services::session::format_bpm;
use crate::tools::cli::state::CliContext;

#[derive(Debug, Clone, Args)]
pub struct SongsCommand {
    /// Song list file (overrides config)
    #[arg(long, global = true)]
    pub library: Option<PathBuf>,

    #[command(subcommand)]
    pub action: SongsAction,
}

#[derive(Debug, Clone, Subcommand)]
pub enum SongsAction {
    /// Print the song list
    List,
    /// Append a song
    Add {
        /// Song title
        title: Option<String>,
        /// Tempo, at most three characters
        #[arg(long)]
        bpm: Option<String>,
    },
    /// Remove songs by position (1-based)
    Remove {
        #[arg(required = true)]
        positions: Vec<usize>,
    },
    /// Move songs so they land before position `to` (1-based, len+1 appends)
    Move {
        #[arg(required = true)]
        positions: Vec<usize>,
        #[arg(long)]
        to: usize,
    },
    /// Change a song's title or tempo
    Edit {
        position: usize,
        #[arg(long)]
        title: Option<String>,
        #[arg(long)]
        bpm: Option<String>,
    },
}

/// Loads the song list at `path`; a missing file is an empty list.
pub fn open_library(path: &Path) -> Result<(SongLibrary, JsonFileStore)> {
    let store = JsonFileStore::new(path);
    match SongLibrary::load_from(&store) {
        Ok(library) => Ok((library, store)),
        Err(LibraryError::Io { source, .. }) if source.kind() == ErrorKind::NotFound => {
            Ok((SongLibrary::new(), store))
        }
        Err(err) => Err(err).context("failed to load song list"),
    }
}

pub fn library_path(override_path: Option<&Path>, config: &AppConfig, cwd: &Path) -> PathBuf {
    match override_path {
        Some(path) => cwd.join(path),
        None => config.library_path(cwd),
    }
}

fn to_offsets(positions: &[usize]) -> Vec<usize> {
    positions
        .iter()
        .filter(|p| **p > 0)
        .map(|p| p - 1)
        .collect()
}

impl SongsCommand {
    pub async fn execute(&self, ctx: &CliContext) -> Result<()> {
        let logger = ctx.logger();
        let cwd = std::env::current_dir()?;
        let config = AppConfig::load(&cwd)?;
        let path = library_path(self.library.as_deref(), &config, &cwd);
        let (mut library, store) = open_library(&path)?;

        match &self.action {
            SongsAction::List => {
                if library.is_empty() {
                    logger.info(format!("No songs in {}", path.display()));
                    return Ok(());
                }
                for (index, song) in library.songs().iter().enumerate() {
                    let tempo = song
                        .tempo()
                        .map(|bpm| format!("{} BPM", format_bpm(bpm)))
                        .unwrap_or_else(|| "no tempo".to_string());
                    let title = if song.title.is_empty() {
                        "(untitled)"
                    } else {
                        song.title.as_str()
                    };
                    println!("{:>3}. {} [{}]", index + 1, title, tempo);
                }
                return Ok(());
            }
            SongsAction::Add { title, bpm } => {
                let id = library.add_song();
                if let Some(title) = title {
                    library.rename(id, title.clone());
                }
                if let Some(bpm) = bpm {
                    if !library.set_bpm_text(id, bpm.clone()) {
                        anyhow::bail!("Tempo '{}' is longer than {} characters", bpm, MAX_BPM_CHARS);
                    }
                }
                logger.success(format!("Added song #{}", library.len()));
            }
            SongsAction::Remove { positions } => {
                let before = library.len();
                library.remove(&to_offsets(positions));
                logger.success(format!("Removed {} song(s)", before - library.len()));
            }
            SongsAction::Move { positions, to } => {
                if *to == 0 {
                    anyhow::bail!("Target position starts at 1");
                }
                library.move_items(&to_offsets(positions), to - 1);
                logger.success("Song list reordered");
            }
            SongsAction::Edit {
                position,
                title,
                bpm,
            } => {
                let id = position
                    .checked_sub(1)
                    .and_then(|index| library.get_at(index))
                    .map(|song| song.id)
                    .with_context(|| format!("No song at position {}", position))?;
                if let Some(title) = title {
                    library.rename(id, title.clone());
                }
                if let Some(bpm) = bpm {
                    if !library.set_bpm_text(id, bpm.clone()) {
                        anyhow::bail!("Tempo '{}' is longer than {} characters", bpm, MAX_BPM_CHARS);
                    }
                }
                logger.success(format!("Updated song #{}", position));
            }
        }

        library
            .save_to(&store)
            .with_context(|| format!("failed to save song list to {}", path.display()))?;
        logger.debug(format!("Saved {} song(s) to {}", library.len(), path.display()));
        Ok(())
    }
}
