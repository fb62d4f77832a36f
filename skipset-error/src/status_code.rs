use std::fmt;

/// Коды статуса для категоризации ошибок.
///
/// # Диапазоны:
/// - 2xxx: Ошибки данных
/// - 3xxx: Конфигурация
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[repr(u32)]
pub enum StatusCode {
    // === 2xxx: Ошибки данных ===
    IndexOutOfBounds = 2006,

    // === 3xxx: Конфигурация ===
    InvalidConfig = 3000,
    ConfigUnavailable = 3001,
}

/// Уровень, на котором стоит логировать ошибку с данным кодом.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LogLevel {
    Debug,
    Warn,
    Error,
}

////////////////////////////////////////////////////////////////////////////////
// Собственные методы
////////////////////////////////////////////////////////////////////////////////

impl StatusCode {
    /// Числовое представление кода статуса.
    pub const fn code(self) -> u32 {
        self as u32
    }

    /// Выход за границы ожидаем в обычной работе, поэтому только `Debug`.
    /// Отсутствующая конфигурация мешает запуску, поэтому `Error`.
    pub fn log_level(&self) -> LogLevel {
        match self {
            Self::IndexOutOfBounds => LogLevel::Debug,
            Self::InvalidConfig => LogLevel::Warn,
            Self::ConfigUnavailable => LogLevel::Error,
        }
    }
}

////////////////////////////////////////////////////////////////////////////////
// Общие реализации трейтов для StatusCode
////////////////////////////////////////////////////////////////////////////////

impl fmt::Display for StatusCode {
    fn fmt(
        &self,
        f: &mut fmt::Formatter<'_>,
    ) -> fmt::Result {
        write!(f, "{:?} ({})", self, self.code())
    }
}

////////////////////////////////////////////////////////////////////////////////
// Тесты
////////////////////////////////////////////////////////////////////////////////
