use thiserror::Error;

use crate::{ErrorExt, StatusCode};

/// Ошибки упорядоченного множества.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum SkipSetError {
    /// Запрошенный ранг не меньше текущего числа элементов.
    #[error("Index {index} out of bounds for length {len}")]
    IndexOutOfBounds { index: usize, len: usize },

    /// Некорректный параметр конфигурации.
    #[error("Invalid config field '{field}': {reason}")]
    InvalidConfig { field: String, reason: String },

    /// Конфигурацию не удалось собрать из источников.
    #[error("Failed to load config: {reason}")]
    ConfigUnavailable { reason: String },
}

impl SkipSetError {
    pub fn invalid_config(
        field: impl Into<String>,
        reason: impl Into<String>,
    ) -> Self {
        Self::InvalidConfig {
            field: field.into(),
            reason: reason.into(),
        }
    }
}

impl ErrorExt for SkipSetError {
    fn status_code(&self) -> StatusCode {
        match self {
            Self::IndexOutOfBounds { .. } => StatusCode::IndexOutOfBounds,
            Self::InvalidConfig { .. } => StatusCode::InvalidConfig,
            Self::ConfigUnavailable { .. } => StatusCode::ConfigUnavailable,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::LogLevel;

    #[test]
    fn test_index_out_of_bounds_message() {
        let err = SkipSetError::IndexOutOfBounds { index: 6, len: 6 };

        assert_eq!(err.to_string(), "Index 6 out of bounds for length 6");
        assert_eq!(err.status_code(), StatusCode::IndexOutOfBounds);
        assert_eq!(
            err.log_message(),
            "Index 6 out of bounds for length 6 [IndexOutOfBounds (2006)]"
        );
        assert_eq!(err.log_level(), LogLevel::Debug);
    }

    #[test]
    fn test_invalid_config() {
        let err = SkipSetError::invalid_config("max_level", "must be in 1..=16");

        assert_eq!(err.status_code(), StatusCode::InvalidConfig);
        assert_eq!(err.log_level(), LogLevel::Warn);
        assert!(err.to_string().contains("max_level"));
    }

    #[test]
    fn test_config_unavailable_code() {
        let err = SkipSetError::ConfigUnavailable {
            reason: "missing field".into(),
        };

        assert_eq!(err.status_code(), StatusCode::ConfigUnavailable);
        assert_eq!(err.log_level(), LogLevel::Error);
    }
}
