#![cfg(feature = "cli")]

pub mod input;

use std::path::PathBuf;
use std::sync::Arc;
use std::time::Duration;

use anyhow::{Context, Result};
use clap::Args;
use tokio::io::{AsyncBufReadExt, BufReader};
use tokio::sync::broadcast::error::RecvError;
use tokio::time::{Instant, sleep_until};

use crate::engine::audio::playback::RodioClickSink;
use crate::engine::audio::sink::{AudioSink, CountingSink};
use crate::platform::config::AppConfig;
use crate::services::library::{Song, SongLibrary};
use crate::services::session::{MetronomeSession, format_bpm};
use crate::tools::cli::commands::songs::{library_path, open_library};
use crate::tools::cli::state::CliContext;
use crate::tools::logger::Logger;
use input::{LineCommand, parse_line};

#[derive(Debug, Clone, Args)]
pub struct PlayCommand {
    /// Starting tempo (overrides config)
    #[arg(long)]
    pub bpm: Option<f64>,

    /// Lowest allowed tempo
    #[arg(long = "min")]
    pub min_bpm: Option<f64>,

    /// Highest allowed tempo
    #[arg(long = "max")]
    pub max_bpm: Option<f64>,

    /// Quiet period before a tempo change restarts the beat
    #[arg(long = "debounce-ms")]
    pub debounce_ms: Option<u64>,

    /// Click sound file (overrides config)
    #[arg(long)]
    pub click: Option<PathBuf>,

    /// Volume level (0.0 to 1.0)
    #[arg(long)]
    pub volume: Option<f32>,

    /// Mute the audio output
    #[arg(long)]
    pub quiet: bool,

    /// Tick without opening an audio device
    #[arg(long)]
    pub silent: bool,

    /// Use the tempo of this song (1-based position in the song list)
    #[arg(long)]
    pub song: Option<usize>,

    /// Song list file (overrides config)
    #[arg(long)]
    pub library: Option<PathBuf>,

    /// Tick for this many seconds, then exit
    #[arg(long = "for-secs")]
    pub for_secs: Option<f64>,

    /// Start ticking right away
    #[arg(long)]
    pub autostart: bool,
}

/// Song list loaded on first use.
struct SongSource {
    path: PathBuf,
    library: Option<SongLibrary>,
}

impl SongSource {
    fn song_at(&mut self, position: usize) -> Result<Option<Song>> {
        if self.library.is_none() {
            let (library, _) = open_library(&self.path)?;
            self.library = Some(library);
        }
        Ok(self
            .library
            .as_ref()
            .and_then(|library| library.get_at(position.checked_sub(1)?))
            .cloned())
    }
}

pub async fn execute(command: PlayCommand, ctx: &CliContext) -> Result<()> {
    let logger = ctx.logger();
    let cwd = std::env::current_dir()?;
    let config = AppConfig::load(&cwd)?;

    let mut settings = config.session_settings(&cwd);
    if let Some(bpm) = command.bpm {
        settings.bpm = bpm;
    }
    if let Some(min_bpm) = command.min_bpm {
        settings.min_bpm = min_bpm;
    }
    if let Some(max_bpm) = command.max_bpm {
        settings.max_bpm = max_bpm;
    }
    if let Some(ms) = command.debounce_ms {
        settings.debounce = Duration::from_millis(ms);
    }
    if let Some(click) = &command.click {
        settings.click = cwd.join(click);
    }

    let volume = if command.quiet {
        0.0
    } else {
        let vol = command.volume.unwrap_or_else(|| config.volume());
        if !(0.0..=1.0).contains(&vol) {
            logger.error("Volume must be between 0.0 and 1.0");
            return Err(anyhow::anyhow!("Invalid volume value: {}", vol));
        }
        vol
    };

    let duration = match command.for_secs {
        Some(secs) => match Duration::try_from_secs_f64(secs) {
            Ok(duration) => Some(duration),
            Err(_) => anyhow::bail!("Invalid duration: {} seconds", secs),
        },
        None => None,
    };

    let sink: Arc<dyn AudioSink> = if command.silent {
        Arc::new(CountingSink::new())
    } else {
        Arc::new(RodioClickSink::new(logger.clone(), volume)?)
    };

    logger.debug(format!("Click sound: {}", settings.click.display()));
    let mut session = MetronomeSession::new(settings, sink, logger.clone())
        .context("invalid tempo settings")?;
    let mut songs = SongSource {
        path: library_path(command.library.as_deref(), &config, &cwd),
        library: None,
    };

    if let Some(position) = command.song {
        select_song(&mut session, &mut songs, position, &logger)?;
    }

    logger.info(format!(
        "{} BPM (range {}-{}). Type 'start', 'stop', '+', '-', 'bpm <n>', 'song <n>', 'status' or 'quit'.",
        format_bpm(session.bpm()),
        format_bpm(session.min_bpm()),
        format_bpm(session.max_bpm())
    ));

    if command.autostart || config.tempo.autostart || duration.is_some() {
        if let Err(err) = session.start_ticking() {
            logger.error(format!("Cannot start: {err}"));
        }
    }

    let mut ticks = session.subscribe();
    let mut lines = BufReader::new(tokio::io::stdin()).lines();
    let mut stdin_open = true;
    let mut beat: u64 = 0;

    let deadline = duration.map(|d| Instant::now() + d);
    let until_deadline = async move {
        match deadline {
            Some(at) => sleep_until(at).await,
            None => std::future::pending::<()>().await,
        }
    };
    tokio::pin!(until_deadline);
    let ctrl_c = tokio::signal::ctrl_c();
    tokio::pin!(ctrl_c);

    loop {
        tokio::select! {
            tick = ticks.recv() => match tick {
                Ok(_) => {
                    beat += 1;
                    logger.beat(beat.to_string());
                }
                Err(RecvError::Lagged(missed)) => beat += missed,
                Err(RecvError::Closed) => break,
            },
            line = lines.next_line(), if stdin_open => match line.context("failed to read stdin")? {
                Some(line) => match parse_line(&line) {
                    Ok(LineCommand::Quit) => break,
                    Ok(cmd) => run_line_command(cmd, &mut session, &mut songs, &logger),
                    Err(err) => logger.warn(err.to_string()),
                },
                None => {
                    stdin_open = false;
                    if deadline.is_none() {
                        break;
                    }
                }
            },
            _ = &mut until_deadline => break,
            _ = &mut ctrl_c => {
                logger.info("Interrupted");
                break;
            }
        }
    }

    if session.is_ticking() {
        session.stop_ticking();
    }
    let stats = session.stats();
    logger.success(format!("Session ended after {} tick(s)", stats.ticks));
    logger.debug(format!(
        "Timers armed {} cancelled {}, retunes {} requested {} applied",
        stats.armed, stats.cancelled, stats.retunes_requested, stats.retunes_applied
    ));
    Ok(())
}

fn run_line_command(
    command: LineCommand,
    session: &mut MetronomeSession,
    songs: &mut SongSource,
    logger: &Logger,
) {
    match command {
        LineCommand::Start => {
            if let Err(err) = session.start_ticking() {
                logger.error(format!("Cannot start: {err}"));
            }
        }
        LineCommand::Stop => session.stop_ticking(),
        LineCommand::Toggle => {
            if let Err(err) = session.toggle_ticking() {
                logger.error(format!("Cannot start: {err}"));
            }
        }
        LineCommand::Adjust(delta) => {
            session.adjust_bpm(delta);
            logger.info(format!("{} BPM", format_bpm(session.bpm())));
        }
        LineCommand::SetBpm(bpm) => {
            session.set_bpm(bpm);
            logger.info(format!("{} BPM", format_bpm(session.bpm())));
        }
        LineCommand::Song(position) => {
            if let Err(err) = select_song(session, songs, position, logger) {
                logger.error(format!("{err:#}"));
            }
        }
        LineCommand::Status => {
            let state = if session.is_ticking() { "ticking" } else { "stopped" };
            logger.info(format!(
                "{} BPM (range {}-{}), {}",
                format_bpm(session.bpm()),
                format_bpm(session.min_bpm()),
                format_bpm(session.max_bpm()),
                state
            ));
            logger.debug(format!("Scheduler: {:?}", session.phase()));
        }
        LineCommand::Quit => {}
    }
}

fn select_song(
    session: &mut MetronomeSession,
    songs: &mut SongSource,
    position: usize,
    logger: &Logger,
) -> Result<()> {
    let song = songs
        .song_at(position)?
        .with_context(|| format!("No song at position {}", position))?;
    if !session.apply_song(&song) {
        logger.warn(format!("Song #{} has no usable tempo", position));
    }
    Ok(())
}
