//! Узел и уровни пропускного множества.
//!
//! Каждый узел хранит значение и массив уровней снизу вверх. Уровень: это
//! атомарная ссылка на следующий узел и `span`: количество шагов по нулевому
//! уровню до этого узла. Ссылки публикуются с `Release` и читаются с
//! `Acquire`, поэтому читатель без блокировок никогда не видит недостроенный
//! узел.

use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};

use crossbeam_epoch::{Atomic, Guard, Owned, Shared};
use parking_lot::{Mutex, MutexGuard};

/// Один уровень узла.
pub(crate) struct Level<T> {
    next: Atomic<Node<T>>,
    /// Расстояние по нулевому уровню до `next`. Для пустой ссылки равно 0.
    span: AtomicUsize,
}

/// Узел пропускного множества.
pub(crate) struct Node<T> {
    /// `None` только у головного узла.
    value: Option<T>,
    levels: Box<[Level<T>]>,
    /// Берётся только на время структурных изменений рядом с узлом.
    lock: Mutex<()>,
    /// Узел захвачен удалением и логически отсутствует.
    marked: AtomicBool,
}

impl<T> Level<T> {
    fn empty() -> Self {
        Self {
            next: Atomic::null(),
            span: AtomicUsize::new(0),
        }
    }
}

////////////////////////////////////////////////////////////////////////////////
// Собственные методы
////////////////////////////////////////////////////////////////////////////////

impl<T> Node<T> {
    /// Создаёт головной узел максимальной высоты.
    pub(crate) fn head(max_level: usize) -> Box<Self> {
        Box::new(Self::with_height(None, max_level))
    }

    /// Создаёт узел с данными. Ссылки и `span` заполняются до публикации.
    pub(crate) fn new<'g>(
        value: T,
        links: impl Iterator<Item = (Shared<'g, Node<T>>, usize)>,
    ) -> Owned<Self>
    where
        T: 'g,
    {
        let levels: Box<[Level<T>]> = links
            .map(|(next, span)| Level {
                next: Atomic::from(next),
                span: AtomicUsize::new(span),
            })
            .collect();

        debug_assert!(!levels.is_empty(), "node must have at least one level");

        Owned::new(Self {
            value: Some(value),
            levels,
            lock: Mutex::new(()),
            marked: AtomicBool::new(false),
        })
    }

    fn with_height(
        value: Option<T>,
        height: usize,
    ) -> Self {
        Self {
            value,
            levels: (0..height).map(|_| Level::empty()).collect(),
            lock: Mutex::new(()),
            marked: AtomicBool::new(false),
        }
    }

    #[inline]
    pub(crate) fn value(&self) -> Option<&T> {
        self.value.as_ref()
    }

    #[inline]
    pub(crate) fn height(&self) -> usize {
        self.levels.len()
    }

    #[inline]
    pub(crate) fn next<'g>(
        &self,
        level: usize,
        guard: &'g Guard,
    ) -> Shared<'g, Node<T>> {
        self.levels[level].next.load(Ordering::Acquire, guard)
    }

    #[inline]
    pub(crate) fn set_next(
        &self,
        level: usize,
        next: Shared<'_, Node<T>>,
    ) {
        self.levels[level].next.store(next, Ordering::Release);
    }

    #[inline]
    pub(crate) fn span(
        &self,
        level: usize,
    ) -> usize {
        self.levels[level].span.load(Ordering::Acquire)
    }

    #[inline]
    pub(crate) fn set_span(
        &self,
        level: usize,
        span: usize,
    ) {
        self.levels[level].span.store(span, Ordering::Release);
    }

    #[inline]
    pub(crate) fn incr_span(
        &self,
        level: usize,
    ) {
        self.levels[level].span.fetch_add(1, Ordering::AcqRel);
    }

    #[inline]
    pub(crate) fn decr_span(
        &self,
        level: usize,
    ) {
        self.levels[level].span.fetch_sub(1, Ordering::AcqRel);
    }

    #[inline]
    pub(crate) fn lock(&self) -> MutexGuard<'_, ()> {
        self.lock.lock()
    }

    #[inline]
    pub(crate) fn is_marked(&self) -> bool {
        self.marked.load(Ordering::Acquire)
    }

    #[inline]
    pub(crate) fn mark(&self) {
        self.marked.store(true, Ordering::Release);
    }
}

/// Разыменовывает указатель, полученный под `guard`.
#[inline]
pub(crate) fn deref<'g, T>(ptr: Shared<'g, Node<T>>) -> Option<&'g Node<T>> {
    // SAFETY: все указатели загружаются под закреплённой эпохой, а узлы
    // освобождаются только через `defer_destroy` после отцепления от списка,
    // поэтому память жива, пока жив `guard`.
    unsafe { ptr.as_ref() }
}
