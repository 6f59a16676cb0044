#![allow(clippy::module_inception)]

pub mod engine;
pub mod services;
pub mod tools;

// Config files, terminal prompts and the binary's commands.
#[cfg(feature = "cli")]
pub mod platform;
