use std::env;
use std::fs;
use std::path::{Path, PathBuf};

use recommender_core::config::{AppConfig, LoadOptions, DEFAULT_CONFIG_FILE, NESTED_CONFIG_FILE};
use toml::Value;

pub fn run() -> String {
    let config = match AppConfig::load(LoadOptions::default()) {
        Ok(config) => config,
        Err(error) => return format!("config validation failed: {error}"),
    };

    let config_file_path = detect_config_path();
    let config_file_doc = load_config_file_doc(config_file_path.as_deref());
    let source = |key_path: &str, env_keys: &[&str]| {
        field_source(key_path, env_keys, config_file_doc.as_ref(), config_file_path.as_deref())
    };

    let catalog_path = config
        .catalog
        .path
        .as_ref()
        .map(|path| path.display().to_string())
        .unwrap_or_else(|| "<built-in>".to_string());

    let lines = [
        "effective config (source precedence: env > file > default):".to_string(),
        render_line(
            "catalog.path",
            &catalog_path,
            source("catalog.path", &["RECOMMENDER_CATALOG_PATH"]),
        ),
        render_line(
            "engine.match_rule",
            &format!("{:?}", config.engine.match_rule),
            source("engine.match_rule", &["RECOMMENDER_ENGINE_MATCH_RULE"]),
        ),
        render_line(
            "engine.default_recommendation_type",
            &config.engine.default_recommendation_type,
            source("engine.default_recommendation_type", &["RECOMMENDER_ENGINE_DEFAULT_TYPE"]),
        ),
        render_line(
            "engine.ignore_blank_entries",
            &config.engine.ignore_blank_entries.to_string(),
            source("engine.ignore_blank_entries", &["RECOMMENDER_ENGINE_IGNORE_BLANK_ENTRIES"]),
        ),
        render_line(
            "logging.level",
            &config.logging.level,
            source("logging.level", &["RECOMMENDER_LOGGING_LEVEL", "RECOMMENDER_LOG_LEVEL"]),
        ),
        render_line(
            "logging.format",
            &format!("{:?}", config.logging.format),
            source("logging.format", &["RECOMMENDER_LOGGING_FORMAT", "RECOMMENDER_LOG_FORMAT"]),
        ),
    ];

    lines.join("\n")
}

fn detect_config_path() -> Option<PathBuf> {
    [PathBuf::from(DEFAULT_CONFIG_FILE), PathBuf::from(NESTED_CONFIG_FILE)]
        .into_iter()
        .find(|path| path.exists())
}

fn load_config_file_doc(path: Option<&Path>) -> Option<Value> {
    let path = path?;
    let raw = fs::read_to_string(path).ok()?;
    raw.parse::<Value>().ok()
}

fn field_source(
    key_path: &str,
    env_keys: &[&str],
    config_file_doc: Option<&Value>,
    config_file_path: Option<&Path>,
) -> String {
    if let Some(env_key) = env_keys.iter().find(|key| env::var_os(key).is_some()) {
        return format!("env ({env_key})");
    }

    if let Some(doc) = config_file_doc {
        if contains_path(doc, key_path) {
            let file_path = config_file_path
                .map(|path| path.display().to_string())
                .unwrap_or_else(|| "config file".to_string());
            return format!("file ({file_path})");
        }
    }

    "default".to_string()
}

fn contains_path(root: &Value, key_path: &str) -> bool {
    let mut current = root;
    for key in key_path.split('.') {
        let Some(next) = current.get(key) else {
            return false;
        };
        current = next;
    }
    true
}

fn render_line(key: &str, value: &str, source: String) -> String {
    format!("- {key} = {value} (source: {source})")
}
