use config::{Config, ConfigError, Environment};
use serde::{Deserialize, Serialize};
use skipset_error::{SkipSetError, SkipSetResult};

use crate::{
    logging::log_error,
    skipset::{DEFAULT_BRANCHING, MAX_LEVEL},
    validate,
};

/// Порядок элементов во множестве.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SortOrder {
    #[default]
    Ascending,
    Descending,
}

/// Параметры экземпляра `SkipSet`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SkipSetConfig {
    pub order: SortOrder,
    /// Предел высоты узла, `1..=16`.
    pub max_level: usize,
    /// Вероятность роста высоты на каждом шаге, `(0, 1)`.
    pub branching: f64,
}

impl SortOrder {
    pub fn from_descending(descending: bool) -> Self {
        if descending {
            Self::Descending
        } else {
            Self::Ascending
        }
    }

    pub fn is_descending(self) -> bool {
        matches!(self, Self::Descending)
    }
}

impl SkipSetConfig {
    /// Собирает конфигурацию из значений по умолчанию и переменных
    /// окружения `SKIPSET_ORDER`, `SKIPSET_MAX_LEVEL`, `SKIPSET_BRANCHING`.
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
        let cfg = Config::builder()
            // Добавляем значения по умолчанию
            .set_default("order", "ascending")?
            .set_default("max_level", MAX_LEVEL as u64)?
            .set_default("branching", DEFAULT_BRANCHING)?
            // Переменные окружения с префиксом SKIPSET_
            .add_source(Environment::with_prefix("SKIPSET").try_parsing(true))
            .build()?;

        cfg.try_deserialize()
    }

    pub fn with_order(
        mut self,
        order: SortOrder,
    ) -> Self {
        self.order = order;
        self
    }

    pub fn with_max_level(
        mut self,
        max_level: usize,
    ) -> Self {
        self.max_level = max_level;
        self
    }

    pub fn with_branching(
        mut self,
        branching: f64,
    ) -> Self {
        self.branching = branching;
        self
    }

    pub fn validate(&self) -> SkipSetResult<()> {
        validate!(
            (1..=MAX_LEVEL).contains(&self.max_level),
            SkipSetError::invalid_config(
                "max_level",
                format!("{} is outside 1..={MAX_LEVEL}", self.max_level)
            )
        );
        validate!(
            self.branching > 0.0 && self.branching < 1.0,
            SkipSetError::invalid_config(
                "branching",
                format!("{} is outside (0, 1)", self.branching)
            )
        );

        Ok(())
    }
}

impl Default for SkipSetConfig {
    fn default() -> Self {
        Self {
            order: SortOrder::Ascending,
            max_level: MAX_LEVEL,
            branching: DEFAULT_BRANCHING,
        }
    }
}
