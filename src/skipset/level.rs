//! Генерация высоты узлов и учёт самого высокого занятого уровня.

use std::sync::atomic::{AtomicUsize, Ordering};

use tracing::debug;

/// Жёсткий предел высоты узла.
pub const MAX_LEVEL: usize = 16;

/// Вероятность продолжить рост высоты по умолчанию.
pub const DEFAULT_BRANCHING: f64 = 0.5;

/// Генератор высот с общим для экземпляра счётчиком верхнего уровня.
#[derive(Debug)]
pub(crate) struct LevelGenerator {
    max_level: usize,
    /// Порог для равномерного `u32`: рост продолжается, пока выпавшее число
    /// меньше порога.
    threshold: u32,
    /// Самый высокий уровень, на котором могут быть узлы. Только растёт.
    top: AtomicUsize,
}

impl LevelGenerator {
    pub(crate) fn new(
        max_level: usize,
        branching: f64,
    ) -> Self {
        debug_assert!((1..=MAX_LEVEL).contains(&max_level));

        Self {
            max_level,
            threshold: (branching.clamp(0.0, 1.0) * u32::MAX as f64) as u32,
            top: AtomicUsize::new(1),
        }
    }

    #[inline]
    pub(crate) fn max_level(&self) -> usize {
        self.max_level
    }

    #[inline]
    pub(crate) fn top(&self) -> usize {
        self.top.load(Ordering::Acquire)
    }

    /// Генерирует случайную высоту для нового узла.
    #[inline]
    pub(crate) fn random_height(&self) -> usize {
        let mut height = 1;

        while height < self.max_level && fastrand::u32(..) < self.threshold {
            height += 1;
        }

        height
    }

    /// Поднимает верхний уровень до `height`, если он ниже.
    ///
    /// Возвращает `true`, если уровень поднял именно этот вызов.
    pub(crate) fn promote(
        &self,
        height: usize,
    ) -> bool {
        let mut current = self.top.load(Ordering::Acquire);

        while current < height {
            match self.top.compare_exchange_weak(
                current,
                height,
                Ordering::AcqRel,
                Ordering::Acquire,
            ) {
                Ok(_) => {
                    debug!(from = current, to = height, "skipset top level promoted");
                    return true;
                }
                Err(actual) => current = actual,
            }
        }

        false
    }
}
