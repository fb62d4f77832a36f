use std::sync::atomic::{AtomicUsize, Ordering};

/// Счётчики конкурентной работы писателей.
#[derive(Debug, Default)]
pub struct ContentionMetrics {
    pub inserts: AtomicUsize,
    pub removes: AtomicUsize,
    /// Неудачные проверки после захвата блокировок.
    pub retries: AtomicUsize,
    pub node_locks: AtomicUsize,
    pub promotions: AtomicUsize,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ContentionSnapshot {
    pub inserts: usize,
    pub removes: usize,
    pub retries: usize,
    pub node_locks: usize,
    pub promotions: usize,
}

////////////////////////////////////////////////////////////////////////////////
// Собственные методы
////////////////////////////////////////////////////////////////////////////////

impl ContentionMetrics {
    pub fn snapshot(&self) -> ContentionSnapshot {
        ContentionSnapshot {
            inserts: self.inserts.load(Ordering::Relaxed),
            removes: self.removes.load(Ordering::Relaxed),
            retries: self.retries.load(Ordering::Relaxed),
            node_locks: self.node_locks.load(Ordering::Relaxed),
            promotions: self.promotions.load(Ordering::Relaxed),
        }
    }

    pub fn snapshot_and_reset(&self) -> ContentionSnapshot {
        ContentionSnapshot {
            inserts: self.inserts.swap(0, Ordering::Relaxed),
            removes: self.removes.swap(0, Ordering::Relaxed),
            retries: self.retries.swap(0, Ordering::Relaxed),
            node_locks: self.node_locks.swap(0, Ordering::Relaxed),
            promotions: self.promotions.swap(0, Ordering::Relaxed),
        }
    }

    pub fn reset(&self) {
        self.inserts.store(0, Ordering::Relaxed);
        self.removes.store(0, Ordering::Relaxed);
        self.retries.store(0, Ordering::Relaxed);
        self.node_locks.store(0, Ordering::Relaxed);
        self.promotions.store(0, Ordering::Relaxed);
    }

    #[inline(always)]
    pub fn inc_insert(&self) {
        self.inserts.fetch_add(1, Ordering::Relaxed);
    }

    #[inline(always)]
    pub fn inc_remove(&self) {
        self.removes.fetch_add(1, Ordering::Relaxed);
    }

    #[inline(always)]
    pub fn inc_retry(&self) {
        self.retries.fetch_add(1, Ordering::Relaxed);
    }

    #[inline(always)]
    pub fn add_locks(
        &self,
        count: usize,
    ) {
        self.node_locks.fetch_add(count, Ordering::Relaxed);
    }

    #[inline(always)]
    pub fn inc_promotion(&self) {
        self.promotions.fetch_add(1, Ordering::Relaxed);
    }
}

impl ContentionSnapshot {
    /// Успешные структурные изменения.
    pub fn total_writes(&self) -> usize {
        self.inserts + self.removes
    }

    /// Доля повторов на одну успешную запись.
    pub fn retry_rate(&self) -> f64 {
        let writes = self.total_writes();

        if writes == 0 {
            0.0
        } else {
            self.retries as f64 / writes as f64
        }
    }

    /// Среднее число узловых блокировок на попытку записи.
    pub fn locks_per_attempt(&self) -> f64 {
        let attempts = self.total_writes() + self.retries;

        if attempts == 0 {
            0.0
        } else {
            self.node_locks as f64 / attempts as f64
        }
    }

    pub fn is_contended(&self) -> bool {
        self.retries > 0
    }

    pub fn format_report(&self) -> String {
        format!(
            "Contention Metrics:\n\
                 Inserts: {}\n\
                 Removes: {}\n\
                 Retries: {}\n\
                 Node locks: {}\n\
                 Promotions: {}\n\
                 Retry rate: {:.2}%\n\
                 Locks per attempt: {:.2}\n",
            self.inserts,
            self.removes,
            self.retries,
            self.node_locks,
            self.promotions,
            self.retry_rate() * 100.0,
            self.locks_per_attempt(),
        )
    }
}

////////////////////////////////////////////////////////////////////////////////
// Тесты
////////////////////////////////////////////////////////////////////////////////
