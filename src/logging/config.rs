use config::{Config, ConfigError, Environment};
use serde::{Deserialize, Serialize};
use skipset_error::{SkipSetError, SkipSetResult};

use crate::{logging::log_error, validate};

const LEVELS: [&str; 5] = ["trace", "debug", "info", "warn", "error"];

/// Формат вывода событий.
#[derive(Debug, Default, Clone, Copy, Deserialize, Serialize, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum LogFormat {
    #[default]
    Compact,
    Pretty,
    Json,
}

/// Настройки логирования.
#[derive(Debug, Clone, Deserialize, Serialize, PartialEq, Eq)]
#[serde(default)]
pub struct LoggingConfig {
    /// Уровень для событий крейта, если `RUST_LOG` не задан.
    pub level: String,
    pub format: LogFormat,
    pub with_ansi: bool,
    pub with_target: bool,
    pub with_thread_ids: bool,
}

impl LoggingConfig {
    /// Читает `SKIPSET_LOG_LEVEL`, `SKIPSET_LOG_FORMAT` и остальные поля
    /// поверх значений по умолчанию.
    pub fn load() -> SkipSetResult<Self> {
        let cfg = Self::load_raw()
            .map_err(|e| SkipSetError::ConfigUnavailable {
                reason: e.to_string(),
            })
            .inspect_err(log_error)?;

        cfg.validate().inspect_err(log_error)?;
        Ok(cfg)
    }

    fn load_raw() -> Result<Self, ConfigError> {
        let defaults = Self::default();

        Config::builder()
            .set_default("level", defaults.level)?
            .set_default("format", "compact")?
            .set_default("with_ansi", defaults.with_ansi)?
            .set_default("with_target", defaults.with_target)?
            .set_default("with_thread_ids", defaults.with_thread_ids)?
            .add_source(
                Environment::with_prefix("SKIPSET_LOG")
                    .prefix_separator("_")
                    .try_parsing(true),
            )
            .build()?
            .try_deserialize()
    }

    pub fn validate(&self) -> SkipSetResult<()> {
        validate!(
            LEVELS.contains(&self.level.to_lowercase().as_str()),
            SkipSetError::invalid_config(
                "level",
                format!("unknown level '{}', expected one of {LEVELS:?}", self.level)
            )
        );

        Ok(())
    }

    /// Директива `EnvFilter` для этой конфигурации.
    pub fn filter_directive(&self) -> String {
        format!("{}={}", env!("CARGO_CRATE_NAME"), self.level.to_lowercase())
    }
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: "info".to_string(),
            format: LogFormat::Compact,
            with_ansi: true,
            with_target: true,
            with_thread_ids: false,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_validates() {
        let cfg = LoggingConfig::default();

        assert!(cfg.validate().is_ok());
        assert_eq!(cfg.filter_directive(), "skipset=info");
    }

    #[test]
    fn test_unknown_level_rejected() {
        let cfg = LoggingConfig {
            level: "loud".into(),
            ..Default::default()
        };

        assert!(matches!(
            cfg.validate(),
            Err(SkipSetError::InvalidConfig { ref field, .. }) if field == "level"
        ));
    }

    #[test]
    fn test_level_case_insensitive() {
        let cfg = LoggingConfig {
            level: "DEBUG".into(),
            ..Default::default()
        };

        assert!(cfg.validate().is_ok());
        assert_eq!(cfg.filter_directive(), "skipset=debug");
    }
}
