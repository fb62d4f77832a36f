use std::{
    cmp::Ordering as CmpOrdering,
    collections::HashMap,
    fmt,
    marker::PhantomData,
    ptr,
    sync::atomic::{AtomicUsize, Ordering},
    thread,
};

use crossbeam_epoch::{self as epoch, Guard, Shared};
use parking_lot::{MutexGuard, RwLock};
use skipset_error::{ErrorExt, SkipSetError, SkipSetResult};
use tracing::{trace, warn};

use super::{
    contention::{ContentionMetrics, ContentionSnapshot},
    level::{LevelGenerator, MAX_LEVEL},
    node::{deref, Node},
    SkipSetStatistics, ValidationError,
};
use crate::{
    config::{SkipSetConfig, SortOrder},
    logging::log_error,
    validate,
};

/// Сколько раз `index` повторяет спуск, если участок меняется.
const RANK_WALK_ATTEMPTS: usize = 3;

/// Конкурентное упорядоченное множество с доступом по рангу.
///
/// Чтения (`contains`, `index`, `top_n`, `iter`) идут без блокировок под
/// закреплённой эпохой. Писатели блокируют только предшественников вставки
/// или удаления, снизу вверх, и проверяют, что ссылки не изменились.
pub struct SkipSet<T> {
    head: Box<Node<T>>,
    len: AtomicUsize,
    levels: LevelGenerator,
    order: SortOrder,
    /// Разделяемо держат все писатели, эксклюзивно только вставка,
    /// поднимающая верхний уровень.
    gate: RwLock<()>,
    metrics: ContentionMetrics,
}

/// Результат спуска к позиции значения.
struct Splice<'g, T> {
    preds: [&'g Node<T>; MAX_LEVEL],
    succs: [Shared<'g, Node<T>>; MAX_LEVEL],
    /// Ранг предшественника (1-based, голова = 0) на каждом уровне.
    shifts: [usize; MAX_LEVEL],
    /// Верхний уровень на момент спуска.
    top: usize,
    /// Узел с равным значением на нулевом уровне.
    found: Option<&'g Node<T>>,
}

/// Итератор по живым значениям в порядке множества.
///
/// Держит эпоху закреплённой, пока жив. Это не снимок: параллельные
/// вставки за текущей позицией могут попасть в выдачу.
pub struct Iter<'a, T> {
    guard: Guard,
    current: *const Node<T>,
    _marker: PhantomData<&'a SkipSet<T>>,
}

////////////////////////////////////////////////////////////////////////////////
// Собственные методы
////////////////////////////////////////////////////////////////////////////////

impl<T> SkipSet<T>
where
    T: Ord + Clone + Send + Sync + 'static,
{
    /// Создаёт пустое множество. `descending` задаёт убывающий порядок.
    pub fn new(descending: bool) -> Self {
        let config = SkipSetConfig::default().with_order(SortOrder::from_descending(descending));
        Self::from_config(&config)
    }

    /// Создаёт множество по проверенной конфигурации.
    pub fn with_config(config: SkipSetConfig) -> SkipSetResult<Self> {
        config.validate().inspect_err(log_error)?;
        Ok(Self::from_config(&config))
    }

    fn from_config(config: &SkipSetConfig) -> Self {
        Self {
            head: Node::head(config.max_level),
            len: AtomicUsize::new(0),
            levels: LevelGenerator::new(config.max_level, config.branching),
            order: config.order,
            gate: RwLock::new(()),
            metrics: ContentionMetrics::default(),
        }
    }

    /// Добавляет значение. Возвращает `false`, если оно уже есть.
    pub fn insert(
        &self,
        value: T,
    ) -> bool {
        let height = self.levels.random_height();

        let _shared;
        let _exclusive;
        if height > self.levels.top() {
            _exclusive = self.gate.write();
            if self.levels.promote(height) {
                self.metrics.inc_promotion();
            }
        } else {
            _shared = self.gate.read();
        }

        let guard = &epoch::pin();

        loop {
            let splice = self.find_splice(&value, guard);

            if let Some(existing) = splice.found {
                if !existing.is_marked() {
                    return false;
                }
                // Равный узел удаляется, ждём отцепления.
                thread::yield_now();
                continue;
            }

            let locks = self.lock_preds(&splice.preds[..splice.top]);

            let distances = if Self::links_unchanged(&splice, guard) {
                Self::measure(&splice, guard)
            } else {
                None
            };

            let Some(rel) = distances else {
                unlock(locks);
                self.metrics.inc_retry();
                trace!(height, "skipset insert validation failed, retrying");
                thread::yield_now();
                continue;
            };

            // Ранг новой вершины относительно верхнего предшественника.
            let base = rel[0] + 1;

            let links = (0..height).map(|level| {
                let succ = splice.succs[level];
                let span = if succ.is_null() {
                    0
                } else {
                    splice.preds[level].span(level) + 1 - (base - rel[level])
                };
                (succ, span)
            });
            let node = Node::new(value, links).into_shared(guard);

            for level in 0..height {
                let pred = splice.preds[level];
                pred.set_span(level, base - rel[level]);
                pred.set_next(level, node);
            }

            for level in height..splice.top {
                let pred = splice.preds[level];
                if !pred.next(level, guard).is_null() {
                    pred.incr_span(level);
                }
            }

            self.len.fetch_add(1, Ordering::AcqRel);
            self.metrics.inc_insert();
            unlock(locks);

            return true;
        }
    }

    /// Удаляет значение. Возвращает `false`, если его нет или его уже
    /// удаляет другой поток.
    pub fn remove(
        &self,
        value: &T,
    ) -> bool {
        let _shared = self.gate.read();
        let guard = &epoch::pin();

        let mut claimed: Option<(Shared<'_, Node<T>>, &Node<T>, MutexGuard<'_, ()>)> = None;

        loop {
            let splice = self.find_splice(value, guard);

            if claimed.is_none() {
                let Some(node) = splice.found else {
                    return false;
                };

                let lock = node.lock();
                if node.is_marked() {
                    return false;
                }
                node.mark();
                claimed = Some((splice.succs[0], node, lock));
            }

            let Some((victim_ptr, victim, _)) = claimed.as_ref() else {
                return false;
            };
            let (victim_ptr, victim) = (*victim_ptr, *victim);

            let locks = self.lock_preds(&splice.preds[..splice.top]);

            let valid = Self::links_unchanged(&splice, guard)
                && (0..victim.height()).all(|level| splice.succs[level] == victim_ptr);

            if !valid {
                unlock(locks);
                self.metrics.inc_retry();
                trace!("skipset remove validation failed, retrying");
                thread::yield_now();
                continue;
            }

            for level in 0..victim.height() {
                let pred = splice.preds[level];
                let next = victim.next(level, guard);
                let span = if next.is_null() {
                    0
                } else {
                    pred.span(level) + victim.span(level) - 1
                };
                pred.set_span(level, span);
                pred.set_next(level, next);
            }

            for level in victim.height()..splice.top {
                let pred = splice.preds[level];
                if !pred.next(level, guard).is_null() {
                    pred.decr_span(level);
                }
            }

            self.len.fetch_sub(1, Ordering::AcqRel);
            self.metrics.inc_remove();
            unlock(locks);
            drop(claimed);

            // SAFETY: узел отцеплен на всех уровнях под блокировками
            // предшественников, новые читатели его не найдут, а текущие
            // держат эпоху.
            unsafe { guard.defer_destroy(victim_ptr) };

            return true;
        }
    }

    /// Проверяет наличие значения без блокировок.
    pub fn contains(
        &self,
        value: &T,
    ) -> bool {
        let guard = &epoch::pin();
        let mut pred: &Node<T> = &self.head;

        for level in (0..self.levels.top()).rev() {
            let mut next = pred.next(level, guard);

            while let Some(node) = deref(next) {
                let Some(v) = node.value() else { break };

                match self.compare(v, value) {
                    CmpOrdering::Less => {
                        pred = node;
                        next = node.next(level, guard);
                    }
                    CmpOrdering::Equal => return !node.is_marked(),
                    CmpOrdering::Greater => break,
                }
            }
        }

        false
    }

    /// Значение с рангом `index` (с нуля) в порядке множества.
    pub fn index(
        &self,
        index: usize,
    ) -> SkipSetResult<T> {
        let len = self.len();
        if index >= len {
            let err = SkipSetError::IndexOutOfBounds { index, len };
            log_error(&err);
            return Err(err);
        }

        let guard = &epoch::pin();

        for _ in 0..RANK_WALK_ATTEMPTS {
            if let Some(value) = self.walk_to_rank(index + 1, guard) {
                return Ok(value.clone());
            }
            thread::yield_now();
        }

        let err = SkipSetError::IndexOutOfBounds {
            index,
            len: self.len(),
        };
        warn!(
            code = err.status_code().code(),
            "skipset rank walk missed, set changed concurrently: {}",
            err.log_message()
        );
        Err(err)
    }

    /// Ранг значения (с нуля), если оно есть во множестве.
    pub fn rank(
        &self,
        value: &T,
    ) -> Option<usize> {
        let guard = &epoch::pin();
        let splice = self.find_splice(value, guard);

        splice
            .found
            .filter(|node| !node.is_marked())
            .map(|_| splice.shifts[0])
    }

    /// Первые `n` значений в порядке множества.
    pub fn top_n(
        &self,
        n: usize,
    ) -> Vec<T> {
        self.iter().take(n).collect()
    }

    /// Все значения в порядке множества.
    pub fn to_vec(&self) -> Vec<T> {
        self.top_n(self.len())
    }

    pub fn first(&self) -> Option<T> {
        self.iter().next()
    }

    pub fn iter(&self) -> Iter<'_, T> {
        let guard = epoch::pin();
        let current = self.head.next(0, &guard).as_raw();

        Iter {
            guard,
            current,
            _marker: PhantomData,
        }
    }

    #[inline]
    pub fn len(&self) -> usize {
        self.len.load(Ordering::Acquire)
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    pub fn order(&self) -> SortOrder {
        self.order
    }

    /// Самый высокий занятый уровень. Никогда не уменьшается.
    pub fn top_level(&self) -> usize {
        self.levels.top()
    }

    pub fn max_level(&self) -> usize {
        self.levels.max_level()
    }

    pub fn metrics(&self) -> ContentionSnapshot {
        self.metrics.snapshot()
    }

    pub fn reset_metrics(&self) {
        self.metrics.reset();
    }

    /// Статистика распределения высот. Для согласованного результата
    /// вызывать без параллельных писателей.
    pub fn statistics(&self) -> SkipSetStatistics {
        let mut stats = SkipSetStatistics::empty(self.max_level());
        stats.current_max_level = self.top_level();

        let guard = &epoch::pin();
        let mut current = self.head.next(0, guard);

        while let Some(node) = deref(current) {
            stats.node_count += 1;
            stats.level_distribution[node.height() - 1] += 1;
            current = node.next(0, guard);
        }

        stats.compute_average_level();
        stats
    }

    /// Проверяет структурные инварианты. Вызывать без параллельных
    /// писателей.
    pub fn validate_invariants(&self) -> Result<(), ValidationError> {
        let guard = &epoch::pin();
        let top = self.top_level();
        let max_level = self.max_level();

        validate!(
            top <= max_level,
            ValidationError::InvalidLevel {
                node_level: top,
                max_level,
            }
        );

        // Нулевой уровень: порядок, метки, высоты, ранги.
        let mut ranks: HashMap<*const Node<T>, usize> = HashMap::new();
        let mut prev: Option<&T> = None;
        let mut rank = 0;
        let mut current = self.head.next(0, guard);

        while let Some(node) = deref(current) {
            rank += 1;

            validate!(!node.is_marked(), ValidationError::MarkedNodeReachable { rank });
            validate!(
                node.height() <= top,
                ValidationError::InvalidLevel {
                    node_level: node.height(),
                    max_level: top,
                }
            );

            let value = node.value().ok_or(ValidationError::DanglingLink { level: 0 })?;
            if let Some(prev) = prev {
                validate!(
                    self.compare(prev, value) == CmpOrdering::Less,
                    ValidationError::SortOrderViolation {
                        level: 0,
                        message: format!("rank {} does not precede rank {rank}", rank - 1),
                    }
                );
            }

            ranks.insert(current.as_raw(), rank);
            prev = Some(value);
            current = node.next(0, guard);
        }

        validate!(
            rank == self.len(),
            ValidationError::LengthMismatch {
                expected: self.len(),
                actual: rank,
            }
        );

        for level in 0..max_level {
            let mut pred: &Node<T> = &self.head;
            let mut pred_rank = 0;
            let mut next = pred.next(level, guard);

            validate!(
                level < top || next.is_null(),
                ValidationError::InvalidLevel {
                    node_level: level + 1,
                    max_level: top,
                }
            );

            while let Some(node) = deref(next) {
                let node_rank = *ranks
                    .get(&next.as_raw())
                    .ok_or(ValidationError::DanglingLink { level })?;

                validate!(
                    node.height() > level,
                    ValidationError::LevelNotSubset {
                        level,
                        node_level: node.height(),
                    }
                );
                validate!(
                    node_rank > pred_rank,
                    ValidationError::SortOrderViolation {
                        level,
                        message: format!("rank {node_rank} follows rank {pred_rank}"),
                    }
                );
                validate!(
                    pred.span(level) == node_rank - pred_rank,
                    ValidationError::SpanMismatch {
                        level,
                        rank: pred_rank,
                        expected: node_rank - pred_rank,
                        actual: pred.span(level),
                    }
                );

                pred = node;
                pred_rank = node_rank;
                next = node.next(level, guard);
            }

            validate!(
                pred.span(level) == 0,
                ValidationError::SpanMismatch {
                    level,
                    rank: pred_rank,
                    expected: 0,
                    actual: pred.span(level),
                }
            );
        }

        Ok(())
    }

    /// Спуск по `span` к узлу с рангом `target` (с единицы). Узел, уже
    /// захваченный удалением, не засчитывается.
    fn walk_to_rank<'g>(
        &'g self,
        target: usize,
        guard: &'g Guard,
    ) -> Option<&'g T> {
        let mut traversed = 0;
        let mut node: &'g Node<T> = &self.head;

        for level in (0..self.levels.top()).rev() {
            while let Some(next) = deref(node.next(level, guard)) {
                let span = node.span(level);
                if span == 0 || traversed + span > target {
                    break;
                }
                traversed += span;
                node = next;
            }

            if traversed == target {
                return node.value().filter(|_| !node.is_marked());
            }
        }

        None
    }

    #[inline]
    fn compare(
        &self,
        a: &T,
        b: &T,
    ) -> CmpOrdering {
        match self.order {
            SortOrder::Ascending => a.cmp(b),
            SortOrder::Descending => b.cmp(a),
        }
    }

    /// Спуск от головы: на каждом уровне последний узел, предшествующий
    /// `value`, и его преемник.
    fn find_splice<'g>(
        &'g self,
        value: &T,
        guard: &'g Guard,
    ) -> Splice<'g, T> {
        let top = self.levels.top();
        let head: &'g Node<T> = &self.head;

        let mut preds = [head; MAX_LEVEL];
        let mut succs = [Shared::null(); MAX_LEVEL];
        let mut shifts = [0; MAX_LEVEL];

        let mut pred = head;
        let mut shift = 0;

        for level in (0..top).rev() {
            let mut next = pred.next(level, guard);

            while let Some(node) = deref(next) {
                match node.value() {
                    Some(v) if self.compare(v, value) == CmpOrdering::Less => {
                        shift += pred.span(level);
                        pred = node;
                        next = node.next(level, guard);
                    }
                    _ => break,
                }
            }

            preds[level] = pred;
            succs[level] = next;
            shifts[level] = shift;
        }

        let found = deref(succs[0]).filter(|node| {
            node.value()
                .is_some_and(|v| self.compare(v, value) == CmpOrdering::Equal)
        });

        Splice {
            preds,
            succs,
            shifts,
            top,
            found,
        }
    }

    /// Блокирует предшественников снизу вверх, один раз на узел.
    ///
    /// Предшественники идут в порядке убывания позиции, голова последней.
    /// Все писатели берут блокировки в этом порядке.
    fn lock_preds<'g>(
        &self,
        preds: &[&'g Node<T>],
    ) -> Vec<MutexGuard<'g, ()>> {
        let mut locks = Vec::with_capacity(preds.len());
        let mut last: Option<&'g Node<T>> = None;

        for &pred in preds {
            if last.is_some_and(|l| ptr::eq(l, pred)) {
                continue;
            }
            locks.push(pred.lock());
            last = Some(pred);
        }

        self.metrics.add_locks(locks.len());
        locks
    }

    /// Предшественники живы и по-прежнему ссылаются на найденных преемников.
    fn links_unchanged(
        splice: &Splice<'_, T>,
        guard: &Guard,
    ) -> bool {
        (0..splice.top).all(|level| {
            let pred = splice.preds[level];
            !pred.is_marked() && pred.next(level, guard) == splice.succs[level]
        })
    }

    /// Расстояния от верхнего предшественника до предшественника каждого
    /// уровня. Считается под блокировками, поэтому `span` на пути неизменны.
    fn measure(
        splice: &Splice<'_, T>,
        guard: &Guard,
    ) -> Option<[usize; MAX_LEVEL]> {
        let mut rel = [0; MAX_LEVEL];
        let mut node = splice.preds[splice.top - 1];
        let mut dist = 0;

        for level in (0..splice.top).rev() {
            while !ptr::eq(node, splice.preds[level]) {
                dist += node.span(level);
                node = deref(node.next(level, guard))?;
            }
            rel[level] = dist;
        }

        Some(rel)
    }
}

/// Отпускает блокировки сверху вниз.
fn unlock(mut locks: Vec<MutexGuard<'_, ()>>) {
    while let Some(lock) = locks.pop() {
        drop(lock);
    }
}

////////////////////////////////////////////////////////////////////////////////
// Общие реализации трейтов для SkipSet
////////////////////////////////////////////////////////////////////////////////

impl<T> Default for SkipSet<T>
where
    T: Ord + Clone + Send + Sync + 'static,
{
    fn default() -> Self {
        Self::new(false)
    }
}

impl<T> FromIterator<T> for SkipSet<T>
where
    T: Ord + Clone + Send + Sync + 'static,
{
    fn from_iter<I: IntoIterator<Item = T>>(iter: I) -> Self {
        let set = Self::default();
        for value in iter {
            set.insert(value);
        }
        set
    }
}

impl<T> Extend<T> for SkipSet<T>
where
    T: Ord + Clone + Send + Sync + 'static,
{
    fn extend<I: IntoIterator<Item = T>>(
        &mut self,
        iter: I,
    ) {
        for value in iter {
            self.insert(value);
        }
    }
}

impl<'a, T> IntoIterator for &'a SkipSet<T>
where
    T: Ord + Clone + Send + Sync + 'static,
{
    type Item = T;
    type IntoIter = Iter<'a, T>;

    fn into_iter(self) -> Self::IntoIter {
        self.iter()
    }
}

impl<T> Iterator for Iter<'_, T>
where
    T: Clone,
{
    type Item = T;

    fn next(&mut self) -> Option<Self::Item> {
        while !self.current.is_null() {
            // SAFETY: указатель загружен под `self.guard`, который закреплён
            // всё время жизни итератора, поэтому узел не освобождён.
            let node = unsafe { &*self.current };
            self.current = node.next(0, &self.guard).as_raw();

            if !node.is_marked() {
                return node.value().cloned();
            }
        }

        None
    }
}

impl<T> fmt::Debug for SkipSet<T>
where
    T: Ord + Clone + Send + Sync + 'static + fmt::Debug,
{
    fn fmt(
        &self,
        f: &mut fmt::Formatter<'_>,
    ) -> fmt::Result {
        f.debug_set().entries(self.iter()).finish()
    }
}

impl<T> Drop for SkipSet<T> {
    fn drop(&mut self) {
        // SAFETY: `&mut self` исключает других пользователей, а удалённые
        // узлы уже отцеплены и принадлежат сборщику эпох.
        unsafe {
            let guard = epoch::unprotected();
            let mut current = self.head.next(0, guard);

            while !current.is_null() {
                let node = current.into_owned();
                current = node.next(0, guard);
                drop(node);
            }
        }
    }
}

////////////////////////////////////////////////////////////////////////////////
// Тесты
////////////////////////////////////////////////////////////////////////////////
