#[cfg(feature = "cli")]
fn main() -> anyhow::Result<()> {
    metronome::tools::cli::run()
}

#[cfg(not(feature = "cli"))]
fn main() {
    panic!("CLI feature is disabled; rebuild with --features cli");
}
