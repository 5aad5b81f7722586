use std::env;
use std::fs;
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};
use thiserror::Error;

#[derive(Clone, Debug)]
pub struct AppConfig {
    pub catalog: CatalogConfig,
    pub logging: LoggingConfig,
}

#[derive(Clone, Debug)]
pub struct CatalogConfig {
    pub source: CatalogSourceKind,
    pub url: Option<String>,
    pub timeout_secs: u64,
}

#[derive(Clone, Debug)]
pub struct LoggingConfig {
    pub level: String,
    pub format: LogFormat,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum CatalogSourceKind {
    Static,
    Remote,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum LogFormat {
    Compact,
    Pretty,
    Json,
}

#[derive(Clone, Debug, Default)]
pub struct ConfigOverrides {
    pub catalog_source: Option<CatalogSourceKind>,
    pub catalog_url: Option<String>,
    pub catalog_timeout_secs: Option<u64>,
    pub log_level: Option<String>,
    pub log_format: Option<LogFormat>,
}

#[derive(Clone, Debug, Default)]
pub struct LoadOptions {
    pub config_path: Option<PathBuf>,
    pub require_file: bool,
    pub overrides: ConfigOverrides,
}

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("could not read config file `{path}`: {source}")]
    ReadFile { path: PathBuf, source: std::io::Error },
    #[error("could not parse config file `{path}`: {source}")]
    ParseFile { path: PathBuf, source: toml::de::Error },
    #[error("required config file was not found: `{0}`")]
    MissingConfigFile(PathBuf),
    #[error("environment variable interpolation failed for `{var}`")]
    MissingEnvInterpolation { var: String },
    #[error("unterminated environment interpolation expression")]
    UnterminatedInterpolation,
    #[error("invalid environment override for `{key}`: `{value}`")]
    InvalidEnvOverride { key: String, value: String },
    #[error("configuration validation failed: {0}")]
    Validation(String),
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            catalog: CatalogConfig {
                source: CatalogSourceKind::Static,
                url: None,
                timeout_secs: 30,
            },
            logging: LoggingConfig { level: "info".to_string(), format: LogFormat::Compact },
        }
    }
}

impl CatalogSourceKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Static => "static",
            Self::Remote => "remote",
        }
    }
}

impl LogFormat {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Compact => "compact",
            Self::Pretty => "pretty",
            Self::Json => "json",
        }
    }
}

impl std::str::FromStr for CatalogSourceKind {
    type Err = ConfigError;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        match value.trim().to_ascii_lowercase().as_str() {
            "static" => Ok(Self::Static),
            "remote" => Ok(Self::Remote),
            other => Err(ConfigError::Validation(format!(
                "unsupported catalog source `{other}` (expected static|remote)"
            ))),
        }
    }
}

impl std::str::FromStr for LogFormat {
    type Err = ConfigError;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        match value.trim().to_ascii_lowercase().as_str() {
            "compact" => Ok(Self::Compact),
            "pretty" => Ok(Self::Pretty),
            "json" => Ok(Self::Json),
            other => Err(ConfigError::Validation(format!(
                "unsupported log format `{other}` (expected compact|pretty|json)"
            ))),
        }
    }
}

impl AppConfig {
    /// Layers, lowest precedence first: defaults, config file, `BASKET_*`
    /// environment variables, explicit overrides.
    pub fn load(options: LoadOptions) -> Result<Self, ConfigError> {
        let mut config = Self::default();
        let maybe_path = resolve_config_path(options.config_path.as_deref());

        if let Some(path) = maybe_path {
            let patch = read_patch(&path)?;
            config.apply_patch(patch);
        } else if options.require_file {
            let expected = options.config_path.unwrap_or_else(|| PathBuf::from("basket.toml"));
            return Err(ConfigError::MissingConfigFile(expected));
        }

        config.apply_env_overrides()?;
        config.apply_overrides(options.overrides);
        config.validate()?;

        Ok(config)
    }

    fn apply_patch(&mut self, patch: ConfigPatch) {
        if let Some(catalog) = patch.catalog {
            if let Some(source) = catalog.source {
                self.catalog.source = source;
            }
            if let Some(url) = catalog.url {
                self.catalog.url = Some(url);
            }
            if let Some(timeout_secs) = catalog.timeout_secs {
                self.catalog.timeout_secs = timeout_secs;
            }
        }

        if let Some(logging) = patch.logging {
            if let Some(level) = logging.level {
                self.logging.level = level;
            }
            if let Some(format) = logging.format {
                self.logging.format = format;
            }
        }
    }

    fn apply_env_overrides(&mut self) -> Result<(), ConfigError> {
        if let Some(value) = read_env(&["BASKET_CATALOG_SOURCE"]) {
            self.catalog.source = value.parse()?;
        }
        if let Some(value) = read_env(&["BASKET_CATALOG_URL"]) {
            self.catalog.url = Some(value);
        }
        if let Some(value) = read_env(&["BASKET_CATALOG_TIMEOUT_SECS"]) {
            self.catalog.timeout_secs = parse_timeout_env("BASKET_CATALOG_TIMEOUT_SECS", &value)?;
        }
        if let Some(value) = read_env(&["BASKET_LOGGING_LEVEL", "BASKET_LOG_LEVEL"]) {
            self.logging.level = value;
        }
        if let Some(value) = read_env(&["BASKET_LOGGING_FORMAT", "BASKET_LOG_FORMAT"]) {
            self.logging.format = value.parse()?;
        }

        Ok(())
    }

    fn apply_overrides(&mut self, overrides: ConfigOverrides) {
        if let Some(source) = overrides.catalog_source {
            self.catalog.source = source;
        }
        if let Some(url) = overrides.catalog_url {
            // An explicit URL implies the remote source.
            self.catalog.url = Some(url);
            self.catalog.source = CatalogSourceKind::Remote;
        }
        if let Some(timeout_secs) = overrides.catalog_timeout_secs {
            self.catalog.timeout_secs = timeout_secs;
        }
        if let Some(log_level) = overrides.log_level {
            self.logging.level = log_level;
        }
        if let Some(log_format) = overrides.log_format {
            self.logging.format = log_format;
        }
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        validate_catalog(&self.catalog)?;
        validate_logging(&self.logging)?;
        Ok(())
    }
}

fn resolve_config_path(explicit_path: Option<&Path>) -> Option<PathBuf> {
    if let Some(path) = explicit_path {
        return path.exists().then_some(path.to_path_buf());
    }

    [PathBuf::from("basket.toml"), PathBuf::from("config/basket.toml")]
        .into_iter()
        .find(|path| path.exists())
}

pub fn detect_config_path() -> Option<PathBuf> {
    resolve_config_path(None)
}

fn read_patch(path: &Path) -> Result<ConfigPatch, ConfigError> {
    let raw = fs::read_to_string(path)
        .map_err(|source| ConfigError::ReadFile { path: path.to_path_buf(), source })?;

    let interpolated = interpolate_env_vars(&raw)?;
    toml::from_str::<ConfigPatch>(&interpolated)
        .map_err(|source| ConfigError::ParseFile { path: path.to_path_buf(), source })
}

/// Expands `${NAME}` references from the process environment. A `$` that is
/// not followed by `{` is kept as is.
fn interpolate_env_vars(input: &str) -> Result<String, ConfigError> {
    let mut expanded = String::with_capacity(input.len());
    let mut rest = input;

    while let Some(start) = rest.find("${") {
        expanded.push_str(&rest[..start]);
        let after_open = &rest[start + 2..];
        let end = after_open.find('}').ok_or(ConfigError::UnterminatedInterpolation)?;
        let name = &after_open[..end];
        let value = env::var(name)
            .map_err(|_| ConfigError::MissingEnvInterpolation { var: name.to_string() })?;
        expanded.push_str(&value);
        rest = &after_open[end + 1..];
    }

    expanded.push_str(rest);
    Ok(expanded)
}

fn validate_catalog(catalog: &CatalogConfig) -> Result<(), ConfigError> {
    if catalog.timeout_secs == 0 || catalog.timeout_secs > 300 {
        return Err(ConfigError::Validation(
            "catalog.timeout_secs must be in range 1..=300".to_string(),
        ));
    }

    if catalog.source == CatalogSourceKind::Remote {
        let url = catalog.url.as_deref().map(str::trim).unwrap_or_default();
        if url.is_empty() {
            return Err(ConfigError::Validation(
                "catalog.url is required when catalog.source is `remote`".to_string(),
            ));
        }
        if !url.starts_with("http://") && !url.starts_with("https://") {
            return Err(ConfigError::Validation(
                "catalog.url must start with http:// or https://".to_string(),
            ));
        }
    }

    Ok(())
}

fn validate_logging(logging: &LoggingConfig) -> Result<(), ConfigError> {
    let level = logging.level.trim().to_ascii_lowercase();
    match level.as_str() {
        "trace" | "debug" | "info" | "warn" | "error" => Ok(()),
        _ => Err(ConfigError::Validation(
            "logging.level must be one of trace|debug|info|warn|error".to_string(),
        )),
    }
}

/// First non-blank value among `keys`; later keys are aliases.
fn read_env(keys: &[&str]) -> Option<String> {
    keys.iter().filter_map(|key| env::var(key).ok()).find(|value| !value.trim().is_empty())
}

fn parse_timeout_env(key: &str, value: &str) -> Result<u64, ConfigError> {
    value.trim().parse().map_err(|_| ConfigError::InvalidEnvOverride {
        key: key.to_string(),
        value: value.to_string(),
    })
}

#[derive(Debug, Default, Deserialize)]
struct ConfigPatch {
    catalog: Option<CatalogPatch>,
    logging: Option<LoggingPatch>,
}

#[derive(Debug, Default, Deserialize)]
struct CatalogPatch {
    source: Option<CatalogSourceKind>,
    url: Option<String>,
    timeout_secs: Option<u64>,
}

#[derive(Debug, Default, Deserialize)]
struct LoggingPatch {
    level: Option<String>,
    format: Option<LogFormat>,
}

#[cfg(test)]
mod tests {
    use std::env;
    use std::fs;
    use std::path::PathBuf;
    use std::sync::{Mutex, OnceLock};

    use tempfile::TempDir;

    use super::{
        interpolate_env_vars, AppConfig, CatalogSourceKind, ConfigError, ConfigOverrides,
        LoadOptions, LogFormat,
    };

    const BASKET_VARS: &[&str] = &[
        "BASKET_CATALOG_SOURCE",
        "BASKET_CATALOG_URL",
        "BASKET_CATALOG_TIMEOUT_SECS",
        "BASKET_LOGGING_LEVEL",
        "BASKET_LOGGING_FORMAT",
        "BASKET_LOG_LEVEL",
        "BASKET_LOG_FORMAT",
    ];

    /// Runs `body` with only `vars` set among the `BASKET_*` keys (plus any
    /// extra keys named in `vars`), removing them again afterwards.
    fn with_clean_env<T>(vars: &[(&str, &str)], body: impl FnOnce() -> T) -> T {
        static LOCK: OnceLock<Mutex<()>> = OnceLock::new();
        let _guard = LOCK.get_or_init(|| Mutex::new(())).lock().unwrap_or_else(|p| p.into_inner());

        for key in BASKET_VARS {
            env::remove_var(key);
        }
        for (key, value) in vars {
            env::set_var(key, value);
        }

        let outcome = body();

        for key in BASKET_VARS.iter().chain(vars.iter().map(|(key, _)| key)) {
            env::remove_var(key);
        }
        outcome
    }

    fn write_config(dir: &TempDir, contents: &str) -> PathBuf {
        let path = dir.path().join("basket.toml");
        fs::write(&path, contents).expect("write config file");
        path
    }

    #[test]
    fn defaults_use_bundled_catalog() {
        let config = with_clean_env(&[], || AppConfig::load(LoadOptions::default()))
            .expect("defaults should load");

        assert_eq!(config.catalog.source, CatalogSourceKind::Static);
        assert_eq!(config.catalog.url, None);
        assert_eq!(config.catalog.timeout_secs, 30);
        assert_eq!(config.logging.level, "info");
        assert_eq!(config.logging.format, LogFormat::Compact);
    }

    #[test]
    fn file_values_are_interpolated_from_environment() {
        let dir = TempDir::new().expect("temp dir");
        let path = write_config(
            &dir,
            "[catalog]\nsource = \"remote\"\nurl = \"https://${TEST_CATALOG_HOST}/inventory.json\"\ntimeout_secs = 5\n",
        );

        let config = with_clean_env(&[("TEST_CATALOG_HOST", "shop.example.test")], || {
            AppConfig::load(LoadOptions { config_path: Some(path), ..LoadOptions::default() })
        })
        .expect("file config should load");

        assert_eq!(config.catalog.url.as_deref(), Some("https://shop.example.test/inventory.json"));
        assert_eq!(config.catalog.timeout_secs, 5);
    }

    #[test]
    fn interpolation_reports_missing_and_unterminated_references() {
        let missing = with_clean_env(&[], || interpolate_env_vars("url = \"${BASKET_NOT_SET}\""));
        assert!(matches!(
            missing,
            Err(ConfigError::MissingEnvInterpolation { ref var }) if var == "BASKET_NOT_SET"
        ));

        assert!(matches!(
            interpolate_env_vars("url = \"${OPEN"),
            Err(ConfigError::UnterminatedInterpolation)
        ));
        assert_eq!(interpolate_env_vars("price = \"$5\"").expect("plain dollar"), "price = \"$5\"");
    }

    #[test]
    fn logging_env_aliases_are_supported() {
        let config = with_clean_env(
            &[("BASKET_LOG_LEVEL", "warn"), ("BASKET_LOG_FORMAT", "pretty")],
            || AppConfig::load(LoadOptions::default()),
        )
        .expect("aliases should load");

        assert_eq!(config.logging.level, "warn");
        assert_eq!(config.logging.format, LogFormat::Pretty);
    }

    #[test]
    fn primary_logging_key_wins_over_alias() {
        let config = with_clean_env(
            &[("BASKET_LOGGING_LEVEL", "error"), ("BASKET_LOG_LEVEL", "debug")],
            || AppConfig::load(LoadOptions::default()),
        )
        .expect("config should load");

        assert_eq!(config.logging.level, "error");
    }

    #[test]
    fn precedence_defaults_file_env_overrides() {
        let dir = TempDir::new().expect("temp dir");
        let path = write_config(
            &dir,
            "[catalog]\ntimeout_secs = 60\n\n[logging]\nlevel = \"warn\"\nformat = \"json\"\n",
        );

        let config = with_clean_env(
            &[("BASKET_CATALOG_TIMEOUT_SECS", "12"), ("BASKET_LOGGING_LEVEL", "error")],
            || {
                AppConfig::load(LoadOptions {
                    config_path: Some(path),
                    overrides: ConfigOverrides {
                        catalog_url: Some("https://override.example.test/items".to_string()),
                        log_level: Some("debug".to_string()),
                        ..ConfigOverrides::default()
                    },
                    ..LoadOptions::default()
                })
            },
        )
        .expect("layered config should load");

        assert_eq!(config.catalog.timeout_secs, 12, "env timeout should win over file");
        assert_eq!(config.logging.level, "debug", "override log level should win");
        assert_eq!(config.logging.format, LogFormat::Json, "file log format should apply");
        assert_eq!(config.catalog.source, CatalogSourceKind::Remote);
    }

    #[test]
    fn explicit_overrides_replace_env_values() {
        let config = with_clean_env(
            &[("BASKET_CATALOG_TIMEOUT_SECS", "12"), ("BASKET_LOG_FORMAT", "json")],
            || {
                AppConfig::load(LoadOptions {
                    overrides: ConfigOverrides {
                        catalog_timeout_secs: Some(45),
                        log_format: Some(LogFormat::Pretty),
                        ..ConfigOverrides::default()
                    },
                    ..LoadOptions::default()
                })
            },
        )
        .expect("config should load");

        assert_eq!(config.catalog.timeout_secs, 45);
        assert_eq!(config.logging.format, LogFormat::Pretty);
    }

    #[test]
    fn remote_source_without_url_fails_validation() {
        let result =
            with_clean_env(&[("BASKET_CATALOG_SOURCE", "remote")], || {
                AppConfig::load(LoadOptions::default())
            });

        match result {
            Err(ConfigError::Validation(message)) => {
                assert!(message.contains("catalog.url is required"), "unexpected: {message}")
            }
            other => panic!("expected validation failure, got {other:?}"),
        }
    }

    #[test]
    fn invalid_numeric_env_override_is_reported() {
        let result = with_clean_env(&[("BASKET_CATALOG_TIMEOUT_SECS", "soon")], || {
            AppConfig::load(LoadOptions::default())
        });

        assert!(matches!(
            result,
            Err(ConfigError::InvalidEnvOverride { ref key, .. }) if key == "BASKET_CATALOG_TIMEOUT_SECS"
        ));
    }

    #[test]
    fn required_missing_file_is_an_error() {
        let dir = TempDir::new().expect("temp dir");
        let missing = dir.path().join("absent.toml");

        let result = with_clean_env(&[], || {
            AppConfig::load(LoadOptions {
                config_path: Some(missing),
                require_file: true,
                ..LoadOptions::default()
            })
        });

        assert!(matches!(result, Err(ConfigError::MissingConfigFile(_))));
    }

    #[test]
    fn log_format_names_round_trip() {
        for format in [LogFormat::Compact, LogFormat::Pretty, LogFormat::Json] {
            assert_eq!(format.as_str().parse::<LogFormat>().expect("known format"), format);
        }
        assert_eq!("JSON".parse::<LogFormat>().expect("case-insensitive"), LogFormat::Json);
    }
}
