use std::env;
use std::fs;
use std::path::Path;

use basket_core::config::{detect_config_path, AppConfig, LoadOptions};
use toml::Value;

use crate::commands::{CommandResult, EXIT_CONFIG};

pub fn run(options: &LoadOptions) -> CommandResult {
    let config = match AppConfig::load(options.clone()) {
        Ok(config) => config,
        Err(error) => {
            return CommandResult::failure(
                "config",
                "config_validation",
                format!("config validation failed: {error}"),
                EXIT_CONFIG,
            )
        }
    };

    let config_file_path = options.config_path.clone().or_else(detect_config_path);
    let config_file_doc = load_config_file_doc(config_file_path.as_deref());
    let overrides = &options.overrides;

    let mut lines =
        vec!["effective config (source precedence: flag > env > file > default):".to_string()];

    let source_override = overrides.catalog_source.is_some() || overrides.catalog_url.is_some();
    let fields: [(&str, String, &[&str], bool); 5] = [
        (
            "catalog.source",
            config.catalog.source.as_str().to_string(),
            &["BASKET_CATALOG_SOURCE"],
            source_override,
        ),
        (
            "catalog.url",
            config.catalog.url.clone().unwrap_or_else(|| "<none>".to_string()),
            &["BASKET_CATALOG_URL"],
            overrides.catalog_url.is_some(),
        ),
        (
            "catalog.timeout_secs",
            config.catalog.timeout_secs.to_string(),
            &["BASKET_CATALOG_TIMEOUT_SECS"],
            overrides.catalog_timeout_secs.is_some(),
        ),
        (
            "logging.level",
            config.logging.level.clone(),
            &["BASKET_LOGGING_LEVEL", "BASKET_LOG_LEVEL"],
            overrides.log_level.is_some(),
        ),
        (
            "logging.format",
            config.logging.format.as_str().to_string(),
            &["BASKET_LOGGING_FORMAT", "BASKET_LOG_FORMAT"],
            overrides.log_format.is_some(),
        ),
    ];

    for (key, value, env_keys, overridden) in fields {
        let source = if overridden {
            "flag".to_string()
        } else {
            field_source(key, env_keys, config_file_doc.as_ref(), config_file_path.as_deref())
        };
        lines.push(render_line(key, &value, source));
    }

    CommandResult { exit_code: 0, output: lines.join("\n") }
}

fn field_source(
    key_path: &str,
    env_keys: &[&str],
    config_file_doc: Option<&Value>,
    config_file_path: Option<&Path>,
) -> String {
    // The first key that is set wins, mirroring the loader's alias order.
    let env_key = env_keys
        .iter()
        .find(|key| env::var(key).is_ok_and(|value| !value.trim().is_empty()));
    if let Some(env_key) = env_key {
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

fn load_config_file_doc(path: Option<&Path>) -> Option<Value> {
    let raw = fs::read_to_string(path?).ok()?;
    raw.parse::<Value>().ok()
}
