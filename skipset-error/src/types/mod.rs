pub mod skipset;

// Публичный экспорт всех типов ошибок из вложенных модулей.
pub use skipset::*;
