//! Logging initialization and startup diagnostics
//!
//! Console and file output share one `tracing` subscriber. The `log`
//! macros used across the code base are forwarded into it by `LogTracer`.

use std::fs::File;
use std::sync::Mutex;

use anyhow::{Context, Result};
use tracing_subscriber::{fmt, layer::SubscriberExt, EnvFilter};

use crate::core::config::AppConfig;

/// Initialize logger for both console and file output
///
/// The level comes from `RUST_LOG` and defaults to `info`. Fails if a
/// global logger is already installed.
pub fn init_logger(log_file_path: &str) -> Result<()> {
    let log_file =
        File::create(log_file_path).with_context(|| format!("Failed to create log file {}", log_file_path))?;

    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    let subscriber = tracing_subscriber::registry()
        .with(filter)
        .with(fmt::layer().with_target(false))
        .with(fmt::layer().with_ansi(false).with_writer(Mutex::new(log_file)));

    tracing::subscriber::set_global_default(subscriber).context("Failed to install tracing subscriber")?;
    tracing_log::LogTracer::init().context("Failed to bridge log records")?;
    Ok(())
}

/// Logs the effective configuration at startup, secrets excluded.
pub fn log_configuration(config: &AppConfig) {
    log::info!("━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━");
    log::info!("🌲 forestbot configuration");
    log::info!("━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━");
    log::info!("{}", config.summary());

    if config.sheets_access_token.is_none() && !config.credentials_path.exists() {
        log::error!(
            "❌ Credentials file {} not found, record store calls will fail",
            config.credentials_path.display()
        );
    }
    if let Some(sheet) = &config.sheet_name {
        log::info!("Using sheet tab '{}'", sheet);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_init_logger_rejects_unwritable_path() {
        let result = init_logger("/nonexistent-dir/forestbot.log");
        assert!(result.is_err());
    }
}
