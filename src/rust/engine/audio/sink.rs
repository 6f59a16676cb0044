use std::fmt;
use std::path::{Path, PathBuf};
use std::sync::atomic::{AtomicUsize, Ordering};

use thiserror::Error;

/// Where the click sound lives.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ResourceLocator {
    path: PathBuf,
}

impl ResourceLocator {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }
}

impl fmt::Display for ResourceLocator {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.path.display())
    }
}

/// Proof that a sink accepted its resource.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Ready;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("audio sink unavailable for {locator}: {reason}")]
pub struct SinkUnavailable {
    pub locator: String,
    pub reason: String,
}

impl SinkUnavailable {
    pub fn new(locator: &ResourceLocator, reason: impl Into<String>) -> Self {
        Self {
            locator: locator.to_string(),
            reason: reason.into(),
        }
    }
}

/// Audio output driven by the tick scheduler.
///
/// `prepare` runs once per session before the first timer is armed. `trigger`
/// runs on every tick and must return quickly; failures are the sink's own
/// business and are logged, never returned.
pub trait AudioSink: Send + Sync {
    fn prepare(&self, resource: &ResourceLocator) -> Result<Ready, SinkUnavailable>;
    fn trigger(&self);
}

/// Silent sink that only counts what it is asked to do.
#[derive(Debug, Default)]
pub struct CountingSink {
    prepared: AtomicUsize,
    triggered: AtomicUsize,
}

impl CountingSink {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn prepare_count(&self) -> usize {
        self.prepared.load(Ordering::SeqCst)
    }

    pub fn trigger_count(&self) -> usize {
        self.triggered.load(Ordering::SeqCst)
    }
}

impl AudioSink for CountingSink {
    fn prepare(&self, _resource: &ResourceLocator) -> Result<Ready, SinkUnavailable> {
        self.prepared.fetch_add(1, Ordering::SeqCst);
        Ok(Ready)
    }

    fn trigger(&self) {
        self.triggered.fetch_add(1, Ordering::SeqCst);
    }
}
