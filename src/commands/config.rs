use crate::Result;
use camino::{Utf8Path, Utf8PathBuf};
use core::time::Duration;
use ohno::{IntoAppError, app_err};
use serde::{Deserialize, Serialize};
use std::fs;
use std::io;
use url::Url;

/// The default configuration TOML content, embedded from `default_config.toml`
pub const DEFAULT_CONFIG_TOML: &str = include_str!("../../default_config.toml");

/// Largest worker pool the configuration accepts.
const MAX_WORKERS: usize = 64;

#[derive(Debug, Deserialize, Serialize)]
#[serde(deny_unknown_fields)]
pub struct Config {
    /// Base URL of the package registry
    #[serde(default = "default_registry_url")]
    pub registry_url: String,

    /// Number of packages to process per run (a prefix of the full listing)
    #[serde(default = "default_package_limit")]
    pub package_limit: usize,

    /// Size of the worker pool processing packages concurrently
    #[serde(default = "default_workers")]
    pub workers: usize,

    /// Command invoked to analyze a checked-out repository
    #[serde(default = "default_metrics_command")]
    pub metrics_command: String,

    /// Timeout applied to each registry HTTP request
    #[serde(default = "default_request_timeout", with = "humantime_serde")]
    pub request_timeout: Duration,

    /// Timeout applied to each repository clone
    #[serde(default = "default_clone_timeout", with = "humantime_serde")]
    pub clone_timeout: Duration,

    /// Timeout applied to each metrics-tool invocation
    #[serde(default = "default_analyze_timeout", with = "humantime_serde")]
    pub analyze_timeout: Duration,
}

fn default_registry_url() -> String {
    "https://packagist.org".to_string()
}

const fn default_package_limit() -> usize {
    100
}

const fn default_workers() -> usize {
    12
}

fn default_metrics_command() -> String {
    "phpmetrics".to_string()
}

const fn default_request_timeout() -> Duration {
    Duration::from_secs(60)
}

const fn default_clone_timeout() -> Duration {
    Duration::from_mins(5)
}

const fn default_analyze_timeout() -> Duration {
    Duration::from_mins(5)
}

impl Config {
    /// Load configuration from a file or use defaults
    ///
    /// # Errors
    ///
    /// Returns an error if the file cannot be read or parsed
    pub fn load(config_path: Option<&Utf8PathBuf>) -> Result<Self> {
        let (final_path, text) = if let Some(path) = config_path {
            let text = fs::read_to_string(path).into_app_err_with(|| format!("reading packagist-survey configuration file '{path}'"))?;
            (path.clone(), text)
        } else {
            // Look for survey.toml in the current directory
            let path = Utf8PathBuf::from("survey.toml");
            match fs::read_to_string(&path) {
                Ok(text) => (path, text),
                Err(e) if e.kind() == io::ErrorKind::NotFound => {
                    // No config file found, use defaults
                    return Ok(Self::default());
                }
                Err(e) => return Err(e).into_app_err_with(|| format!("reading packagist-survey configuration file '{path}'")),
            }
        };

        let config: Self = toml::from_str(&text).into_app_err_with(|| format!("parsing configuration file '{final_path}'"))?;
        config.validate()?;

        Ok(config)
    }

    /// Save the default configuration to a TOML file
    ///
    /// # Errors
    ///
    /// Returns an error if the file cannot be written
    pub fn save_default(output_path: &Utf8Path) -> Result<()> {
        fs::write(output_path, DEFAULT_CONFIG_TOML).into_app_err_with(|| format!("writing default configuration to {output_path}"))?;
        Ok(())
    }

    /// Validate configuration values
    ///
    /// # Errors
    ///
    /// Returns an error if a value is out of range or unusable
    pub fn validate(&self) -> Result<()> {
        if !(1..=MAX_WORKERS).contains(&self.workers) {
            return Err(app_err!("workers must be between 1 and {MAX_WORKERS}, got {}", self.workers));
        }

        if self.package_limit == 0 {
            return Err(app_err!("package_limit must be at least 1"));
        }

        if self.metrics_command.trim().is_empty() {
            return Err(app_err!("metrics_command must not be empty"));
        }

        let _ = Url::parse(&self.registry_url).into_app_err_with(|| format!("invalid registry_url '{}'", self.registry_url))?;

        Ok(())
    }
}

impl Default for Config {
    fn default() -> Self {
        toml::from_str(DEFAULT_CONFIG_TOML).expect("default_config.toml should be valid TOML that deserializes to Config")
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config_is_valid() {
        let config = Config::default();
        config.validate().unwrap();
    }

    #[test]
    fn test_default_values() {
        let config = Config::default();
        assert_eq!(config.registry_url, "https://packagist.org");
        assert_eq!(config.package_limit, 100);
        assert_eq!(config.workers, 12);
        assert_eq!(config.metrics_command, "phpmetrics");
        assert_eq!(config.clone_timeout, Duration::from_mins(5));
    }

    #[test]
    fn test_validate_zero_workers() {
        let config = Config { workers: 0, ..Config::default() };
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_validate_too_many_workers() {
        let config = Config { workers: MAX_WORKERS + 1, ..Config::default() };
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_validate_zero_package_limit() {
        let config = Config { package_limit: 0, ..Config::default() };
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_validate_empty_metrics_command() {
        let config = Config {
            metrics_command: "  ".to_string(),
            ..Config::default()
        };
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_validate_bad_registry_url() {
        let config = Config {
            registry_url: "not a url".to_string(),
            ..Config::default()
        };
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_save_default_and_load() {
        let tmp = tempfile::tempdir().unwrap();
        let output_path = Utf8PathBuf::try_from(tmp.path().join("survey.toml")).unwrap();
        Config::save_default(&output_path).unwrap();
        let loaded = Config::load(Some(&output_path)).unwrap();
        loaded.validate().unwrap();
    }

    #[test]
    fn test_load_partial_config_fills_defaults() {
        let tmp = tempfile::tempdir().unwrap();
        let path = Utf8PathBuf::try_from(tmp.path().join("survey.toml")).unwrap();
        fs::write(&path, "workers = 4\n").unwrap();
        let config = Config::load(Some(&path)).unwrap();
        assert_eq!(config.workers, 4);
        assert_eq!(config.package_limit, 100);
    }

    #[test]
    fn test_load_rejects_unknown_fields() {
        let tmp = tempfile::tempdir().unwrap();
        let path = Utf8PathBuf::try_from(tmp.path().join("survey.toml")).unwrap();
        fs::write(&path, "no_such_field = 1\n").unwrap();
        assert!(Config::load(Some(&path)).is_err());
    }

    #[test]
    fn test_default_config_toml_is_not_empty() {
        assert!(!DEFAULT_CONFIG_TOML.is_empty());
    }
}
