//! Подключение `tracing` для приложений и тестов, использующих множество.
//!
//! Сама библиотека только эмитит события (`trace!` на повторах,
//! `debug!` при подъёме уровня, ошибки на уровне их кода статуса).
//! Подписчика ставит вызывающая сторона, либо своим кодом, либо через
//! [`init_logging`].

#[cfg(test)]
pub(crate) mod capture;
pub mod config;
mod filters;
mod formatter;

pub use self::config::{LogFormat, LoggingConfig};
use skipset_error::{ErrorExt, LogLevel, SkipSetError, SkipSetResult};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, Layer};

/// Устанавливает глобальный подписчик по конфигурации.
///
/// Повторный вызов возвращает `ConfigUnavailable`: глобальный подписчик
/// ставится один раз на процесс.
pub fn init_logging(config: &LoggingConfig) -> SkipSetResult<()> {
    config.validate()?;

    let layer = formatter::build_formatter(config).with_filter(filters::build_filter(config));

    tracing_subscriber::registry()
        .with(layer)
        .try_init()
        .map_err(|e| SkipSetError::ConfigUnavailable {
            reason: format!("logging already initialized: {e}"),
        })?;

    tracing::info!(
        version = env!("CARGO_PKG_VERSION"),
        level = %config.level,
        format = ?config.format,
        "Logging system initialized"
    );

    Ok(())
}

/// Инициализация из окружения (`SKIPSET_LOG_*`).
pub fn init_from_env() -> SkipSetResult<()> {
    init_logging(&LoggingConfig::load()?)
}

/// Пишет ошибку на уровне, который задаёт её код статуса.
pub(crate) fn log_error<E: ErrorExt>(err: &E) {
    let code = err.status_code().code();

    match err.log_level() {
        LogLevel::Debug => tracing::debug!(code, "{}", err.log_message()),
        LogLevel::Warn => tracing::warn!(code, "{}", err.log_message()),
        LogLevel::Error => tracing::error!(code, "{}", err.log_message()),
    }
}
