#![cfg(feature = "cli")]

use anyhow::{Context, Result};
use clap::Args;

use crate::engine::audio::render::render_click_wav;
use crate::platform::config::{AppConfig, JSON_CONFIG, write_default_json};
use crate::tools::cli::state::CliContext;
use crate::tools::logger::LogLevel;

#[derive(Debug, Clone, Args)]
pub struct InitCommand {
    /// Overwrite an existing metronome.json and click sound
    #[arg(short, long)]
    pub force: bool,
}

impl InitCommand {
    pub async fn execute(&self, ctx: &CliContext) -> Result<()> {
        let logger = ctx.logger();
        let current_dir = std::env::current_dir()?;
        let config_path = current_dir.join(JSON_CONFIG);

        if config_path.exists() && !self.force {
            logger.error(format!("'{}' already exists", config_path.display()));
            anyhow::bail!("Refusing to overwrite {} (use --force)", JSON_CONFIG);
        }

        logger.action(format!("Initializing metronome in '{}'...", current_dir.display()));

        let config = AppConfig::default();
        write_default_json(&config_path, &config)?;

        let click_path = config.click_path(&current_dir);
        if click_path.exists() && !self.force {
            logger.info(format!("Keeping existing click sound '{}'", click_path.display()));
        } else {
            render_click_wav(&click_path)
                .with_context(|| format!("failed to render {}", click_path.display()))?;
        }

        logger.success(format!(
            "Wrote {} and {}",
            config_path.display(),
            click_path.display()
        ));
        logger.log_with_details(
            LogLevel::Info,
            "Next steps:",
            [
                "metronome songs add \"My song\" --bpm 96",
                "metronome play --autostart",
            ],
        );

        Ok(())
    }
}
