pub mod catalog;
pub mod config;
pub mod doctor;
pub mod recommend;

use std::path::PathBuf;

use recommender_core::config::{AppConfig, ConfigOverrides, LoadOptions};
use recommender_core::{ApplicationError, Catalog};
use serde::Serialize;
use serde_json::Value;
use tracing::{debug, warn};

pub const EXIT_CONFIG: u8 = 2;
pub const EXIT_CATALOG: u8 = 3;
pub const EXIT_NOT_FOUND: u8 = 4;
pub const EXIT_VALIDATION: u8 = 5;

#[derive(Debug, Clone)]
pub struct CommandResult {
    pub exit_code: u8,
    pub output: String,
}

#[derive(Debug, Serialize)]
struct CommandOutcome {
    command: String,
    status: String,
    error_class: Option<String>,
    message: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    data: Option<Value>,
}

impl CommandResult {
    pub fn success(command: &str, message: impl Into<String>) -> Self {
        Self::success_with_data(command, message, None)
    }

    pub fn success_with_data(
        command: &str,
        message: impl Into<String>,
        data: Option<Value>,
    ) -> Self {
        let payload = CommandOutcome {
            command: command.to_string(),
            status: "ok".to_string(),
            error_class: None,
            message: message.into(),
            data,
        };
        Self { exit_code: 0, output: serialize_payload(payload) }
    }

    pub fn failure(
        command: &str,
        error_class: &str,
        message: impl Into<String>,
        exit_code: u8,
    ) -> Self {
        let payload = CommandOutcome {
            command: command.to_string(),
            status: "error".to_string(),
            error_class: Some(error_class.to_string()),
            message: message.into(),
            data: None,
        };
        Self { exit_code, output: serialize_payload(payload) }
    }

    /// Plain-text output for human-facing modes.
    pub fn text(output: impl Into<String>) -> Self {
        Self { exit_code: 0, output: output.into() }
    }
}

fn serialize_payload(payload: CommandOutcome) -> String {
    serde_json::to_string(&payload).unwrap_or_else(|error| {
        format!(
            "{{\"command\":\"unknown\",\"status\":\"error\",\"error_class\":\"serialization\",\"message\":\"{}\"}}",
            error.to_string().replace('\\', "\\\\").replace('"', "\\\"")
        )
    })
}

/// Loads configuration and the catalog it points at, or the failure to print.
pub(crate) fn load_context(
    command: &str,
    catalog_path: Option<PathBuf>,
) -> Result<(AppConfig, Catalog), CommandResult> {
    let options = LoadOptions {
        overrides: ConfigOverrides { catalog_path, ..ConfigOverrides::default() },
        ..LoadOptions::default()
    };
    let config = AppConfig::load(options).map_err(|error| {
        interface_failure(command, "config_validation", error.into(), EXIT_CONFIG)
    })?;

    let catalog = match &config.catalog.path {
        Some(path) => Catalog::load(path).map_err(|error| {
            interface_failure(command, "catalog_load", error.into(), EXIT_CATALOG)
        })?,
        None => Catalog::builtin(),
    };

    debug!(
        event_name = "cli.context.loaded",
        command,
        catalog_source = %catalog_source(&config),
        product_count = catalog.len(),
        "command context loaded"
    );
    Ok((config, catalog))
}

/// Maps an application error to its interface form and wraps it in a failure
/// payload. The message pairs the mapped error with its user-safe hint.
pub(crate) fn interface_failure(
    command: &str,
    error_class: &str,
    error: ApplicationError,
    exit_code: u8,
) -> CommandResult {
    let interface = error.into_interface(format!("{command}:{error_class}"));
    warn!(
        event_name = "cli.command.failed",
        command,
        error_class,
        correlation_id = interface.correlation_id(),
        error = %interface,
        "command failed"
    );
    CommandResult::failure(
        command,
        error_class,
        format!("{interface} ({})", interface.user_message()),
        exit_code,
    )
}

pub(crate) fn catalog_source(config: &AppConfig) -> String {
    config
        .catalog
        .path
        .as_ref()
        .map(|path| path.display().to_string())
        .unwrap_or_else(|| "built-in".to_string())
}
