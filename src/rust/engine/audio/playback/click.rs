use std::fs;
use std::io::Cursor;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use std::sync::mpsc;
use std::thread;

use anyhow::{Context, Result};
use rodio::{Decoder, OutputStream, OutputStreamHandle, Sink};

use crate::engine::audio::sink::{AudioSink, Ready, ResourceLocator, SinkUnavailable};
use crate::tools::logger::Logger;

enum ClickCommand {
    Prepare {
        path: PathBuf,
        reply: mpsc::SyncSender<std::result::Result<(), String>>,
    },
    Trigger,
    Shutdown,
}

/// Plays a short click file through the default output device.
///
/// The rodio output stream cannot leave the thread that opened it, so a
/// dedicated audio thread owns it and the sink only sends it commands.
pub struct RodioClickSink {
    commands: mpsc::Sender<ClickCommand>,
    handle: Option<thread::JoinHandle<()>>,
}

impl RodioClickSink {
    pub fn new(logger: Arc<Logger>, volume: f32) -> Result<Self> {
        let (tx, rx) = mpsc::channel();
        let volume = volume.clamp(0.0, 1.0);
        let handle = thread::Builder::new()
            .name("metronome-audio".to_string())
            .spawn(move || run_audio_thread(logger, volume, rx))
            .context("failed to spawn audio thread")?;

        Ok(Self {
            commands: tx,
            handle: Some(handle),
        })
    }
}

impl AudioSink for RodioClickSink {
    fn prepare(&self, resource: &ResourceLocator) -> std::result::Result<Ready, SinkUnavailable> {
        let (reply_tx, reply_rx) = mpsc::sync_channel(1);
        self.commands
            .send(ClickCommand::Prepare {
                path: resource.path().to_path_buf(),
                reply: reply_tx,
            })
            .map_err(|_| SinkUnavailable::new(resource, "audio thread is not running"))?;

        match reply_rx.recv() {
            Ok(Ok(())) => Ok(Ready),
            Ok(Err(reason)) => Err(SinkUnavailable::new(resource, reason)),
            Err(_) => Err(SinkUnavailable::new(resource, "audio thread stopped while preparing")),
        }
    }

    fn trigger(&self) {
        let _ = self.commands.send(ClickCommand::Trigger);
    }
}

impl Drop for RodioClickSink {
    fn drop(&mut self) {
        let _ = self.commands.send(ClickCommand::Shutdown);
        if let Some(handle) = self.handle.take() {
            let _ = handle.join();
        }
    }
}

fn run_audio_thread(logger: Arc<Logger>, volume: f32, rx: mpsc::Receiver<ClickCommand>) {
    let output = match OutputStream::try_default() {
        Ok(output) => Some(output),
        Err(err) => {
            logger.warn(format!("No audio output available: {err}"));
            None
        }
    };
    let mut clip: Option<Arc<[u8]>> = None;
    let mut warned_unprepared = false;

    for command in rx {
        match command {
            ClickCommand::Prepare { path, reply } => {
                let result = match &output {
                    Some((_, handle)) => load_clip(handle, &path).map(|bytes| {
                        logger.debug(format!("Click loaded from {}", path.display()));
                        clip = Some(bytes);
                    }),
                    None => Err("no audio output device".to_string()),
                };
                let _ = reply.send(result);
            }
            ClickCommand::Trigger => match (&output, &clip) {
                (Some((_, handle)), Some(bytes)) => {
                    if let Err(err) = play_clip(handle, Arc::clone(bytes), volume) {
                        logger.error(format!("Failed to play click: {err}"));
                    }
                }
                _ => {
                    if !warned_unprepared {
                        logger.warn("Click triggered before the audio sink was prepared");
                        warned_unprepared = true;
                    }
                }
            },
            ClickCommand::Shutdown => break,
        }
    }

    logger.debug("Audio thread stopped.");
}

fn load_clip(handle: &OutputStreamHandle, path: &Path) -> std::result::Result<Arc<[u8]>, String> {
    let bytes: Arc<[u8]> = fs::read(path)
        .map_err(|err| format!("unable to read {}: {err}", path.display()))?
        .into();
    Decoder::new(Cursor::new(Arc::clone(&bytes)))
        .map_err(|err| format!("failed to decode {}: {err}", path.display()))?;
    Sink::try_new(handle).map_err(|err| format!("failed to create audio sink: {err}"))?;
    Ok(bytes)
}

fn play_clip(handle: &OutputStreamHandle, bytes: Arc<[u8]>, volume: f32) -> Result<()> {
    let decoder = Decoder::new(Cursor::new(bytes)).context("failed to decode click")?;
    let sink = Sink::try_new(handle).context("failed to create audio sink")?;
    sink.set_volume(volume);
    sink.append(decoder);
    sink.detach();
    Ok(())
}
