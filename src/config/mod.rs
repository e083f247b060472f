//! Configuration management.

mod tuning;

pub use tuning::{EngineSettings, ModelKind, TipSettings};

use serde::Deserialize;
use std::path::{Path, PathBuf};

/// Environment variable naming an explicit configuration file.
pub const CONFIG_PATH_ENV: &str = "SYMPTOM_ADVISOR_CONFIG_PATH";

/// Application directory name used under platform config/data dirs.
const APP_DIR: &str = "symptom-advisor";

/// Default `SQLite` database file name.
const DEFAULT_DATABASE_FILE: &str = "health_data.db";

/// Main configuration for the advisor.
#[derive(Debug, Clone)]
pub struct AdvisorConfig {
    /// Path to the data directory.
    pub data_dir: PathBuf,
    /// Database file name, relative to `data_dir` unless absolute.
    pub database_file: PathBuf,
    /// Number of history rows shown by default.
    pub history_limit: usize,
    /// Diagnostic engine settings.
    pub engine: EngineSettings,
    /// Tip personalization settings.
    pub tips: TipSettings,
    /// Logging settings from the config file.
    pub logging: LoggingSettings,
}

/// Logging section of the configuration.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct LoggingSettings {
    /// Output format: "pretty" or "json".
    pub format: Option<String>,
    /// Filter directive, e.g. `symptom_advisor=debug`.
    pub filter: Option<String>,
    /// Optional log file (appended).
    pub file: Option<PathBuf>,
}

/// Configuration file structure (for TOML parsing).
#[derive(Debug, Deserialize, Default)]
pub struct ConfigFile {
    /// Data directory.
    pub data_dir: Option<String>,
    /// Database file name.
    pub database_file: Option<String>,
    /// History rows shown by default.
    pub history_limit: Option<usize>,
    /// Engine section.
    pub engine: Option<ConfigFileEngine>,
    /// Tips section.
    pub tips: Option<ConfigFileTips>,
    /// Logging section.
    pub logging: Option<LoggingSettings>,
}

/// Engine section in config file.
#[derive(Debug, Deserialize, Default)]
pub struct ConfigFileEngine {
    /// Model kind.
    pub model: Option<String>,
    /// Examples per condition.
    pub samples_per_condition: Option<usize>,
    /// Per-bit noise probability.
    pub noise_probability: Option<f64>,
    /// Reporting threshold.
    pub confidence_threshold: Option<f64>,
    /// Results kept.
    pub max_results: Option<usize>,
    /// Tree depth limit.
    pub max_depth: Option<usize>,
    /// Noise seed.
    pub seed: Option<u64>,
}

/// Tips section in config file.
#[derive(Debug, Deserialize, Default)]
pub struct ConfigFileTips {
    /// Upper bound on returned tips.
    pub max_tips: Option<usize>,
    /// Specific-tip floor.
    pub specific_floor: Option<usize>,
    /// General padding floor.
    pub padding_floor: Option<usize>,
    /// Tips per matched condition.
    pub tips_per_condition: Option<usize>,
    /// Recent conditions considered.
    pub recent_conditions: Option<usize>,
}

impl Default for AdvisorConfig {
    fn default() -> Self {
        Self {
            data_dir: default_data_dir(),
            database_file: PathBuf::from(DEFAULT_DATABASE_FILE),
            history_limit: 10,
            engine: EngineSettings::default(),
            tips: TipSettings::default(),
            logging: LoggingSettings::default(),
        }
    }
}

impl AdvisorConfig {
    /// Creates a new configuration with default values.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Loads configuration from a file path.
    ///
    /// # Errors
    ///
    /// Returns an error if the file cannot be read or parsed, or if a value is
    /// out of range.
    pub fn load_from_file(path: &Path) -> crate::Result<Self> {
        let contents = std::fs::read_to_string(path)
            .map_err(|e| crate::Error::operation("read_config_file", e))?;

        Self::from_toml(&contents)
    }

    /// Parses configuration from TOML text.
    ///
    /// # Errors
    ///
    /// Returns an error if the text is not valid TOML for [`ConfigFile`], or if
    /// a value is out of range.
    pub fn from_toml(contents: &str) -> crate::Result<Self> {
        let file: ConfigFile = toml::from_str(contents)
            .map_err(|e| crate::Error::operation("parse_config_file", e))?;

        let config = Self::from_config_file(file)?;
        config.engine.validate()?;
        config.tips.validate()?;
        Ok(config)
    }

    /// Loads configuration from the default location.
    ///
    /// Checks the following paths in order:
    /// 1. `SYMPTOM_ADVISOR_CONFIG_PATH`
    /// 2. Platform-specific config dir (`~/Library/Application Support/symptom-advisor/` on macOS)
    /// 3. XDG config dir (`~/.config/symptom-advisor/` for Unix compatibility)
    ///
    /// Returns default configuration if no config file is found.
    #[must_use]
    pub fn load_default() -> Self {
        if let Ok(config_path) = std::env::var(CONFIG_PATH_ENV) {
            if !config_path.trim().is_empty() {
                match Self::load_from_file(Path::new(&config_path)) {
                    Ok(config) => return config,
                    Err(e) => tracing::warn!(path = %config_path, error = %e, "Ignoring config file"),
                }
            }
        }

        let Some(base_dirs) = directories::BaseDirs::new() else {
            return Self::default();
        };

        let candidates = [
            base_dirs.config_dir().join(APP_DIR).join("config.toml"),
            base_dirs
                .home_dir()
                .join(".config")
                .join(APP_DIR)
                .join("config.toml"),
        ];
        for candidate in candidates {
            if candidate.exists() {
                if let Ok(config) = Self::load_from_file(&candidate) {
                    return config;
                }
            }
        }

        Self::default()
    }

    /// Converts a `ConfigFile` to `AdvisorConfig`.
    fn from_config_file(file: ConfigFile) -> crate::Result<Self> {
        let mut config = Self::default();

        if let Some(data_dir) = file.data_dir {
            config.data_dir = PathBuf::from(data_dir);
        }
        if let Some(database_file) = file.database_file {
            config.database_file = PathBuf::from(database_file);
        }
        if let Some(limit) = file.history_limit {
            config.history_limit = limit;
        }
        if let Some(engine) = file.engine {
            if let Some(model) = engine.model {
                config.engine.model = ModelKind::parse(&model).ok_or_else(|| {
                    crate::Error::InvalidInput(format!("unknown engine.model: {model}"))
                })?;
            }
            if let Some(v) = engine.samples_per_condition {
                config.engine.samples_per_condition = v;
            }
            if let Some(v) = engine.noise_probability {
                config.engine.noise_probability = v;
            }
            if let Some(v) = engine.confidence_threshold {
                config.engine.confidence_threshold = v;
            }
            if let Some(v) = engine.max_results {
                config.engine.max_results = v;
            }
            config.engine.max_depth = engine.max_depth;
            config.engine.seed = engine.seed;
        }
        if let Some(tips) = file.tips {
            if let Some(v) = tips.max_tips {
                config.tips.max_tips = v;
            }
            if let Some(v) = tips.specific_floor {
                config.tips.specific_floor = v;
            }
            if let Some(v) = tips.padding_floor {
                config.tips.padding_floor = v;
            }
            if let Some(v) = tips.tips_per_condition {
                config.tips.tips_per_condition = v;
            }
            if let Some(v) = tips.recent_conditions {
                config.tips.recent_conditions = v;
            }
        }
        if let Some(logging) = file.logging {
            config.logging = logging;
        }

        Ok(config)
    }

    /// Sets the data directory.
    #[must_use]
    pub fn with_data_dir(mut self, path: impl Into<PathBuf>) -> Self {
        self.data_dir = path.into();
        self
    }

    /// Full path of the `SQLite` database.
    #[must_use]
    pub fn database_path(&self) -> PathBuf {
        if self.database_file.is_absolute() {
            self.database_file.clone()
        } else {
            self.data_dir.join(&self.database_file)
        }
    }
}

/// Returns the platform data directory for the advisor, or `.symptom-advisor`.
#[must_use]
pub fn default_data_dir() -> PathBuf {
    directories::BaseDirs::new().map_or_else(
        || PathBuf::from(".symptom-advisor"),
        |d| d.data_dir().join(APP_DIR),
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let config = AdvisorConfig::default();
        assert_eq!(config.history_limit, 10);
        assert_eq!(config.database_file, PathBuf::from("health_data.db"));
        assert!(config.database_path().ends_with("health_data.db"));
    }

    #[test]
    fn test_from_toml_overrides() {
        let config = AdvisorConfig::from_toml(
            r#"
            data_dir = "/tmp/advisor"
            history_limit = 5

            [engine]
            model = "naive_bayes"
            samples_per_condition = 20
            seed = 7

            [tips]
            max_tips = 6

            [logging]
            format = "json"
            "#,
        )
        .unwrap();

        assert_eq!(config.data_dir, PathBuf::from("/tmp/advisor"));
        assert_eq!(config.database_path(), PathBuf::from("/tmp/advisor/health_data.db"));
        assert_eq!(config.history_limit, 5);
        assert_eq!(config.engine.model, ModelKind::NaiveBayes);
        assert_eq!(config.engine.samples_per_condition, 20);
        assert_eq!(config.engine.seed, Some(7));
        assert_eq!(config.engine.max_results, 3);
        assert_eq!(config.tips.max_tips, 6);
        assert_eq!(config.tips.tips_per_condition, 2);
        assert_eq!(config.logging.format.as_deref(), Some("json"));
    }

    #[test]
    fn test_from_toml_rejects_bad_values() {
        assert!(AdvisorConfig::from_toml("[engine]\nmodel = \"svm\"").is_err());
        assert!(AdvisorConfig::from_toml("[engine]\nnoise_probability = 2.0").is_err());
        assert!(AdvisorConfig::from_toml("history_limit = \"ten\"").is_err());
    }

    #[test]
    fn test_load_from_missing_file() {
        let result = AdvisorConfig::load_from_file(Path::new("/nonexistent/config.toml"));
        assert!(matches!(
            result,
            Err(crate::Error::OperationFailed { ref operation, .. }) if operation == "read_config_file"
        ));
    }

    #[test]
    fn test_absolute_database_file() {
        let mut config = AdvisorConfig::default().with_data_dir("/data");
        config.database_file = PathBuf::from("/elsewhere/db.sqlite");
        assert_eq!(config.database_path(), PathBuf::from("/elsewhere/db.sqlite"));
    }
}
