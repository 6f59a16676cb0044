// Aggregator test: include tests from tests/rust/* as distinct modules.
// This keeps sources organized while providing a single integration test
// file that Cargo will compile and run.

mod rust_tests {
    pub mod cli_help {
        include!("rust/cli_help.rs");
    }
    pub mod cli_version {
        include!("rust/cli_version.rs");
    }
    pub mod cli_init {
        include!("rust/cli_init.rs");
    }
    pub mod cli_songs {
        include!("rust/cli_songs.rs");
    }
    pub mod cli_play {
        include!("rust/cli_play.rs");
    }
    pub mod session_scenarios {
        include!("rust/session_scenarios.rs");
    }
}

// Re-export tests so the test runner finds them at crate root.
pub use rust_tests::*;
