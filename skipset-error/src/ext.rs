use std::error::Error;

use crate::{LogLevel, StatusCode};

/// Общий интерфейс ошибок крейта для логирования.
pub trait ErrorExt: Error + Send + Sync + 'static {
    fn status_code(&self) -> StatusCode;

    /// Детализированное сообщение для логов: текст ошибки и её код.
    fn log_message(&self) -> String {
        format!("{self} [{}]", self.status_code())
    }

    fn log_level(&self) -> LogLevel {
        self.status_code().log_level()
    }
}
