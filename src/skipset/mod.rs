//! SkipSet - конкурентное упорядоченное множество с доступом по рангу.
//!
//! # Модули
//!
//! - `skipset_base`: само множество и его операции.
//! - `node`: узлы с атомарными ссылками, `span` и блокировкой.
//! - `level`: генерация высот и верхний уровень.
//! - `contention`: счётчики конкуренции писателей.
//! - `safety`: валидация и статистика.

pub mod contention;
pub mod level;
mod node;
pub mod safety;
pub mod skipset_base;

pub use contention::*;
pub use level::{DEFAULT_BRANCHING, MAX_LEVEL};
pub use safety::*;
pub use skipset_base::*;
