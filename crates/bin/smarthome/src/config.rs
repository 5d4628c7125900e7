//! Configuration loading: TOML file with environment variable overrides.
//!
//! Looks for `smarthome.toml` in the working directory unless `--config`
//! names another file. Every field has a sensible default so the file is
//! optional. Environment variables take precedence over file values.

use std::path::Path;

use serde::Deserialize;
use smarthome_domain::tariff::{DEFAULT_CURRENCY, DEFAULT_RATE_PER_KWH};

/// Default config file looked up in the working directory.
pub const DEFAULT_PATH: &str = "smarthome.toml";

/// Top-level configuration.
#[derive(Debug, Default, Deserialize)]
#[serde(default)]
pub struct Config {
    /// Energy pricing.
    pub tariff: TariffConfig,
    /// Password gate for settings-mutating commands.
    pub access: AccessConfig,
    /// Timer simulation settings.
    pub simulation: SimulationConfig,
    /// Console output settings.
    pub output: OutputConfig,
    /// Logging settings.
    pub logging: LoggingConfig,
}

/// Flat price per kWh.
#[derive(Debug, Deserialize)]
#[serde(default)]
pub struct TariffConfig {
    pub rate_per_kwh: f64,
    /// Label printed after costs.
    pub currency: String,
}

/// Password gate configuration.
#[derive(Debug, Deserialize)]
#[serde(default)]
pub struct AccessConfig {
    pub password: String,
    /// Wrong answers allowed before mutating commands lock for the session.
    pub max_attempts: u32,
}

/// Timer simulation configuration.
#[derive(Debug, Deserialize)]
#[serde(default)]
pub struct SimulationConfig {
    /// Announce timer firings as they happen instead of applying them
    /// silently before the next command.
    pub realtime: bool,
    /// Poll interval for due timers when `realtime` is on.
    pub tick_seconds: u64,
}

/// How command results are printed.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum OutputFormat {
    #[default]
    Text,
    Json,
}

impl std::str::FromStr for OutputFormat {
    type Err = ConfigError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "text" => Ok(Self::Text),
            "json" => Ok(Self::Json),
            other => Err(ConfigError::Validation(format!(
                "unknown output format {other:?}"
            ))),
        }
    }
}

/// Console output configuration.
#[derive(Debug, Default, Deserialize)]
#[serde(default)]
pub struct OutputConfig {
    pub format: OutputFormat,
}

/// Logging configuration.
#[derive(Debug, Deserialize)]
#[serde(default)]
pub struct LoggingConfig {
    /// Filter directive (`RUST_LOG` syntax).
    pub filter: String,
}

impl Config {
    /// Load configuration from `path` (or `smarthome.toml` if absent) then
    /// apply environment-variable overrides.
    ///
    /// # Errors
    ///
    /// Returns an error if the TOML file exists but is malformed, or if the
    /// resulting values fail validation.
    pub fn load(path: Option<&Path>) -> Result<Self, ConfigError> {
        let mut config = Self::from_file(path.unwrap_or_else(|| Path::new(DEFAULT_PATH)))?;
        config.apply_env_overrides(|key| std::env::var(key).ok());
        config.validate()?;
        Ok(config)
    }

    fn from_file(path: &Path) -> Result<Self, ConfigError> {
        match std::fs::read_to_string(path) {
            Ok(content) => toml::from_str(&content).map_err(ConfigError::Parse),
            Err(err) if err.kind() == std::io::ErrorKind::NotFound => Ok(Self::default()),
            Err(err) => Err(ConfigError::Io(err)),
        }
    }

    fn apply_env_overrides(&mut self, var: impl Fn(&str) -> Option<String>) {
        if let Some(val) = var("SMARTHOME_RATE") {
            if let Ok(rate) = val.parse() {
                self.tariff.rate_per_kwh = rate;
            }
        }
        if let Some(val) = var("SMARTHOME_PASSWORD") {
            self.access.password = val;
        }
        if let Some(val) = var("SMARTHOME_REALTIME") {
            if let Ok(realtime) = val.parse() {
                self.simulation.realtime = realtime;
            }
        }
        if let Some(val) = var("SMARTHOME_OUTPUT") {
            if let Ok(format) = val.parse() {
                self.output.format = format;
            }
        }
        if let Some(val) = var("SMARTHOME_LOG") {
            self.logging.filter = val;
        }
        if let Some(val) = var("RUST_LOG") {
            self.logging.filter = val;
        }
    }

    fn validate(&self) -> Result<(), ConfigError> {
        if !self.tariff.rate_per_kwh.is_finite() || self.tariff.rate_per_kwh < 0.0 {
            return Err(ConfigError::Validation(
                "tariff.rate_per_kwh must be a non-negative number".to_string(),
            ));
        }
        if self.access.max_attempts == 0 {
            return Err(ConfigError::Validation(
                "access.max_attempts must be at least 1".to_string(),
            ));
        }
        if self.simulation.tick_seconds == 0 {
            return Err(ConfigError::Validation(
                "simulation.tick_seconds must be at least 1".to_string(),
            ));
        }
        Ok(())
    }
}

impl Default for TariffConfig {
    fn default() -> Self {
        Self {
            rate_per_kwh: DEFAULT_RATE_PER_KWH,
            currency: DEFAULT_CURRENCY.to_string(),
        }
    }
}

impl Default for AccessConfig {
    fn default() -> Self {
        Self {
            password: "5680".to_string(),
            max_attempts: 3,
        }
    }
}

impl Default for SimulationConfig {
    fn default() -> Self {
        Self {
            realtime: false,
            tick_seconds: 1,
        }
    }
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            filter: "smarthome=info,smarthome_app=info".to_string(),
        }
    }
}

/// Configuration errors.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    /// TOML parse failure.
    #[error("failed to parse config file")]
    Parse(#[from] toml::de::Error),
    /// File I/O failure.
    #[error("failed to read config file")]
    Io(#[from] std::io::Error),
    /// Semantic validation failure.
    #[error("invalid configuration: {0}")]
    Validation(String),
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn env(pairs: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let vars: HashMap<String, String> = pairs
            .iter()
            .map(|(k, v)| ((*k).to_string(), (*v).to_string()))
            .collect();
        move |key| vars.get(key).cloned()
    }

    #[test]
    fn should_produce_sensible_defaults() {
        let config = Config::default();
        assert!((config.tariff.rate_per_kwh - 0.009).abs() < f64::EPSILON);
        assert_eq!(config.tariff.currency, "Fils");
        assert_eq!(config.access.password, "5680");
        assert_eq!(config.access.max_attempts, 3);
        assert!(!config.simulation.realtime);
        assert_eq!(config.output.format, OutputFormat::Text);
    }

    #[test]
    fn should_parse_minimal_toml() {
        let config: Config = toml::from_str("").unwrap();
        assert_eq!(config.simulation.tick_seconds, 1);
    }

    #[test]
    fn should_parse_full_toml() {
        let toml = "
            [tariff]
            rate_per_kwh = 0.25
            currency = 'EUR'

            [access]
            password = 'hunter2'
            max_attempts = 5

            [simulation]
            realtime = true
            tick_seconds = 10

            [output]
            format = 'json'

            [logging]
            filter = 'debug'
        ";
        let config: Config = toml::from_str(toml).unwrap();
        assert!((config.tariff.rate_per_kwh - 0.25).abs() < f64::EPSILON);
        assert_eq!(config.tariff.currency, "EUR");
        assert_eq!(config.access.password, "hunter2");
        assert_eq!(config.access.max_attempts, 5);
        assert!(config.simulation.realtime);
        assert_eq!(config.simulation.tick_seconds, 10);
        assert_eq!(config.output.format, OutputFormat::Json);
        assert_eq!(config.logging.filter, "debug");
    }

    #[test]
    fn should_parse_partial_toml_with_defaults() {
        let toml = "
            [tariff]
            currency = 'USD'
        ";
        let config: Config = toml::from_str(toml).unwrap();
        assert_eq!(config.tariff.currency, "USD");
        assert!((config.tariff.rate_per_kwh - 0.009).abs() < f64::EPSILON);
        assert_eq!(config.access.max_attempts, 3);
    }

    #[test]
    fn should_return_default_when_file_not_found() {
        let config = Config::from_file(Path::new("nonexistent.toml")).unwrap();
        assert_eq!(config.access.max_attempts, 3);
    }

    #[test]
    fn should_report_parse_error_for_invalid_toml() {
        let result: Result<Config, _> = toml::from_str("invalid {{{");
        assert!(result.is_err());
    }

    #[test]
    fn should_apply_env_overrides() {
        let mut config = Config::default();
        config.apply_env_overrides(env(&[
            ("SMARTHOME_RATE", "0.5"),
            ("SMARTHOME_PASSWORD", "1234"),
            ("SMARTHOME_REALTIME", "true"),
            ("SMARTHOME_OUTPUT", "JSON"),
            ("SMARTHOME_LOG", "trace"),
        ]));
        assert!((config.tariff.rate_per_kwh - 0.5).abs() < f64::EPSILON);
        assert_eq!(config.access.password, "1234");
        assert!(config.simulation.realtime);
        assert_eq!(config.output.format, OutputFormat::Json);
        assert_eq!(config.logging.filter, "trace");
    }

    #[test]
    fn should_prefer_rust_log_over_smarthome_log() {
        let mut config = Config::default();
        config.apply_env_overrides(env(&[("SMARTHOME_LOG", "trace"), ("RUST_LOG", "warn")]));
        assert_eq!(config.logging.filter, "warn");
    }

    #[test]
    fn should_ignore_unparseable_env_values() {
        let mut config = Config::default();
        config.apply_env_overrides(env(&[("SMARTHOME_RATE", "cheap"), ("SMARTHOME_OUTPUT", "xml")]));
        assert!((config.tariff.rate_per_kwh - 0.009).abs() < f64::EPSILON);
        assert_eq!(config.output.format, OutputFormat::Text);
    }

    #[test]
    fn should_reject_negative_rate() {
        let mut config = Config::default();
        config.tariff.rate_per_kwh = -1.0;
        assert!(matches!(config.validate(), Err(ConfigError::Validation(_))));
    }

    #[test]
    fn should_reject_zero_attempts_and_zero_tick() {
        let mut config = Config::default();
        config.access.max_attempts = 0;
        assert!(config.validate().is_err());

        let mut config = Config::default();
        config.simulation.tick_seconds = 0;
        assert!(config.validate().is_err());
    }

    #[test]
    fn should_accept_defaults() {
        assert!(Config::default().validate().is_ok());
    }
}
