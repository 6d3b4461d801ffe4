use std::process::ExitCode;

use recommender_core::config::{AppConfig, LoadOptions};

fn main() -> anyhow::Result<ExitCode> {
    // Commands report config failures themselves; logging falls back to defaults.
    let logging = AppConfig::load(LoadOptions::default())
        .map(|config| config.logging)
        .unwrap_or_else(|_| AppConfig::default().logging);
    recommender_cli::init_logging(&logging)?;

    Ok(recommender_cli::run())
}
