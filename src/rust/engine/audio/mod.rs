pub mod sink;

#[cfg(feature = "cli")]
pub mod playback;

#[cfg(feature = "cli")]
pub mod render;

pub use sink::{AudioSink, CountingSink, Ready, ResourceLocator, SinkUnavailable};
