//! # Persistence Errors
//!
//! Lỗi của SQLite stores và JSONL event log.

use std::path::Path;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum PersistenceError {
    #[error("Database error: {0}")]
    Database(#[from] sqlx::Error),

    #[error("Migration error: {0}")]
    Migration(#[from] sqlx::migrate::MigrateError),

    /// Row được tham chiếu (route id, bank entry id, ...) không tồn tại
    #[error("{entity} not found: {id}")]
    NotFound { entity: String, id: String },

    /// Cột TEXT không parse được thành Decimal
    #[error("Invalid decimal value in column {column}: {value}")]
    InvalidDecimal { column: String, value: String },

    #[error("Event log IO error: {0}")]
    EventLogIo(#[from] std::io::Error),

    #[error("Event encoding error: {0}")]
    EventEncoding(#[from] serde_json::Error),

    /// Một dòng trong event log không phải `ComplianceEvent` hợp lệ
    #[error("Corrupt event at {file}:{line}: {source}")]
    CorruptEvent {
        file: String,
        line: usize,
        #[source]
        source: serde_json::Error,
    },

    #[error("Invalid date '{0}', expected YYYY-MM-DD")]
    InvalidDate(String),
}

pub type PersistenceResult<T> = Result<T, PersistenceError>;

impl PersistenceError {
    pub fn not_found(entity: &str, id: impl std::fmt::Display) -> Self {
        Self::NotFound {
            entity: entity.to_string(),
            id: id.to_string(),
        }
    }

    pub fn invalid_decimal(column: &str, value: &str) -> Self {
        Self::InvalidDecimal {
            column: column.to_string(),
            value: value.to_string(),
        }
    }

    /// `line` đánh số từ 1
    pub fn corrupt_event(file: &Path, line: usize, source: serde_json::Error) -> Self {
        Self::CorruptEvent {
            file: file.display().to_string(),
            line,
            source,
        }
    }

    pub fn is_not_found(&self) -> bool {
        matches!(self, Self::NotFound { .. })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_not_found_message() {
        let err = PersistenceError::not_found("Route", 42);
        assert!(err.is_not_found());
        assert_eq!(err.to_string(), "Route not found: 42");
    }

    #[test]
    fn test_invalid_decimal_message() {
        let err = PersistenceError::invalid_decimal("amount", "abc");
        assert!(!err.is_not_found());
        assert!(err.to_string().contains("amount"));
    }

    #[test]
    fn test_corrupt_event_points_at_line() {
        let source = serde_json::from_str::<serde_json::Value>("{oops").unwrap_err();
        let err = PersistenceError::corrupt_event(Path::new("events/2026-10-18.jsonl"), 3, source);
        assert!(err
            .to_string()
            .starts_with("Corrupt event at events/2026-10-18.jsonl:3:"));
    }
}
