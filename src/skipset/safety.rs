/// Макрос для валидации условий с возвратом ошибки.
#[macro_export]
macro_rules! validate {
    ($cond:expr, $err:expr) => {
        if !$cond {
            return Err($err);
        }
    };
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ValidationError {
    /// Высота узла превышает максимальную
    InvalidLevel { node_level: usize, max_level: usize },
    /// Узел есть на уровне, но его высота меньше
    LevelNotSubset { level: usize, node_level: usize },
    /// Нарушен порядок сортировки
    SortOrderViolation { level: usize, message: String },
    /// Длина не соответствует реальному кол-ву узлов
    LengthMismatch { expected: usize, actual: usize },
    /// `span` не совпадает с расстоянием по нулевому уровню
    SpanMismatch {
        level: usize,
        rank: usize,
        expected: usize,
        actual: usize,
    },
    /// Узел не найден на нулевом уровне
    DanglingLink { level: usize },
    /// Логически удалённый узел всё ещё достижим
    MarkedNodeReachable { rank: usize },
}

/// Статистика структуры SkipSet.
#[derive(Debug, Clone, PartialEq)]
pub struct SkipSetStatistics {
    /// Количество узлов
    pub node_count: usize,
    /// Распределение по высотам
    pub level_distribution: Vec<usize>,
    /// Текущий верхний уровень
    pub current_max_level: usize,
    /// Максимально возможный уровень
    pub max_possible_level: usize,
    /// Средняя высота узла
    pub average_level: f64,
}

impl SkipSetStatistics {
    /// Создает пустую статистику.
    pub fn empty(max_level: usize) -> Self {
        Self {
            node_count: 0,
            level_distribution: vec![0; max_level],
            current_max_level: 1,
            max_possible_level: max_level,
            average_level: 0.0,
        }
    }

    /// Вычисляет среднюю высоту.
    pub fn compute_average_level(&mut self) {
        if self.node_count == 0 {
            self.average_level = 0.0;
            return;
        }

        let total_levels: usize = self
            .level_distribution
            .iter()
            .enumerate()
            .map(|(level, &count)| (level + 1) * count)
            .sum();

        self.average_level = total_levels as f64 / self.node_count as f64;
    }

    /// Форматирует статистику для вывода.
    pub fn format_report(&self) -> String {
        let mut report = String::new();
        report.push_str("SkipSet Statistics:\n");
        report.push_str(&format!("  Total nodes: {}\n", self.node_count));
        report.push_str(&format!(
            "  Current max level: {}\n",
            self.current_max_level
        ));
        report.push_str(&format!(
            "  Max possible level: {}\n",
            self.max_possible_level
        ));
        report.push_str(&format!("  Average level: {:.2}\n", self.average_level));
        report.push_str("  Level distribution:\n");

        for (level, &count) in self.level_distribution.iter().enumerate() {
            if count > 0 {
                let percentage = (count as f64 / self.node_count as f64) * 100.0;
                report.push_str(&format!(
                    "    Level {}: {} nodes ({:.1}%)\n",
                    level + 1,
                    count,
                    percentage
                ));
            }
        }

        report
    }
}

impl std::fmt::Display for ValidationError {
    fn fmt(
        &self,
        f: &mut std::fmt::Formatter<'_>,
    ) -> std::fmt::Result {
        match self {
            ValidationError::InvalidLevel {
                node_level,
                max_level,
            } => {
                write!(
                    f,
                    "Node level {node_level} exceeds maximum level {max_level}"
                )
            }
            ValidationError::LevelNotSubset { level, node_level } => {
                write!(
                    f,
                    "Node of height {node_level} linked at level {level}"
                )
            }
            ValidationError::SortOrderViolation { level, message } => {
                write!(f, "Sort order violation at level {level}: {message}")
            }
            ValidationError::LengthMismatch { expected, actual } => {
                write!(f, "Length mismatch: expected {expected}, got {actual}")
            }
            ValidationError::SpanMismatch {
                level,
                rank,
                expected,
                actual,
            } => {
                write!(
                    f,
                    "Span mismatch at level {level} after rank {rank}: expected {expected}, got {actual}"
                )
            }
            ValidationError::DanglingLink { level } => {
                write!(f, "Level {level} links a node missing from level 0")
            }
            ValidationError::MarkedNodeReachable { rank } => {
                write!(f, "Removed node still reachable at rank {rank}")
            }
        }
    }
}

impl std::error::Error for ValidationError {}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_statistics_empty() {
        let stats = SkipSetStatistics::empty(16);

        assert_eq!(stats.node_count, 0);
        assert_eq!(stats.current_max_level, 1);
        assert_eq!(stats.average_level, 0.0);
    }

    #[test]
    fn test_statistics_compute_average() {
        let mut stats = SkipSetStatistics {
            node_count: 3,
            level_distribution: vec![1, 1, 1, 0],
            current_max_level: 3,
            max_possible_level: 4,
            average_level: 0.0,
        };

        stats.compute_average_level();
        assert_eq!(stats.average_level, 2.0); // (1*1 + 2*1 + 3*1) / 3 = 2.0
    }

    #[test]
    fn test_format_report_skips_empty_levels() {
        let mut stats = SkipSetStatistics {
            node_count: 4,
            level_distribution: vec![3, 0, 1],
            current_max_level: 3,
            max_possible_level: 16,
            average_level: 0.0,
        };
        stats.compute_average_level();

        let report = stats.format_report();

        assert!(report.contains("Total nodes: 4"));
        assert!(report.contains("Level 1: 3 nodes (75.0%)"));
        assert!(!report.contains("Level 2:"));
    }

    #[test]
    fn test_validation_error_display() {
        let err = ValidationError::SpanMismatch {
            level: 2,
            rank: 0,
            expected: 3,
            actual: 4,
        };
        assert!(err.to_string().contains("expected 3, got 4"));

        let err = ValidationError::InvalidLevel {
            node_level: 20,
            max_level: 16,
        };
        assert!(err.to_string().contains("exceeds maximum level"));
    }
}
