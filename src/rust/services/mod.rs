pub mod library;
pub mod session;

pub use library::{Song, SongLibrary};
pub use session::{MetronomeSession, SessionSettings};
