#![cfg(feature = "cli")]

pub mod init;
pub mod play;
pub mod songs;
