//! # Error Module
//!
//! Domain errors cho FuelEU compliance sử dụng thiserror.
//!
//! Có đúng ba loại lỗi, mỗi loại mang một machine-readable code:
//! - `Validation`: input sai hoặc thiếu, caller tự sửa được
//! - `BusinessRule`: input hợp lệ nhưng vi phạm domain invariant
//! - `NotFound`: ship/year/route/compliance record không tồn tại

use serde::{Deserialize, Serialize};
use std::fmt;
use thiserror::Error;

/// Core domain errors.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum CoreError {
    #[error("Validation error: {0}")]
    Validation(String),

    #[error("Business rule violation: {0}")]
    BusinessRule(String),

    #[error("{entity} not found: {id}")]
    NotFound { entity: String, id: String },
}

/// Result type alias với CoreError
pub type CoreResult<T> = Result<T, CoreError>;

/// Phân loại lỗi, dùng ở transport boundary để map sang status code.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ErrorKind {
    Validation,
    BusinessRule,
    NotFound,
}

impl ErrorKind {
    pub fn code(&self) -> &'static str {
        match self {
            ErrorKind::Validation => "VALIDATION_ERROR",
            ErrorKind::BusinessRule => "BUSINESS_RULE_VIOLATION",
            ErrorKind::NotFound => "ENTITY_NOT_FOUND",
        }
    }
}

impl fmt::Display for ErrorKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.code())
    }
}

impl CoreError {
    /// Tạo Validation error
    pub fn validation(message: impl Into<String>) -> Self {
        Self::Validation(message.into())
    }

    /// Tạo BusinessRule error
    pub fn business_rule(message: impl Into<String>) -> Self {
        Self::BusinessRule(message.into())
    }

    /// Tạo NotFound error
    pub fn not_found(entity: &str, id: impl fmt::Display) -> Self {
        Self::NotFound {
            entity: entity.to_string(),
            id: id.to_string(),
        }
    }

    pub fn kind(&self) -> ErrorKind {
        match self {
            CoreError::Validation(_) => ErrorKind::Validation,
            CoreError::BusinessRule(_) => ErrorKind::BusinessRule,
            CoreError::NotFound { .. } => ErrorKind::NotFound,
        }
    }

    /// Machine-readable code
    pub fn code(&self) -> &'static str {
        self.kind().code()
    }

    pub fn is_validation(&self) -> bool {
        matches!(self, CoreError::Validation(_))
    }

    pub fn is_business_rule(&self) -> bool {
        matches!(self, CoreError::BusinessRule(_))
    }

    pub fn is_not_found(&self) -> bool {
        matches!(self, CoreError::NotFound { .. })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_display() {
        let err = CoreError::validation("Fuel consumption must be greater than zero");
        assert_eq!(
            err.to_string(),
            "Validation error: Fuel consumption must be greater than zero"
        );

        let err = CoreError::not_found("ShipCompliance", "S1-2025");
        assert_eq!(err.to_string(), "ShipCompliance not found: S1-2025");
    }

    #[test]
    fn test_error_codes() {
        assert_eq!(CoreError::validation("x").code(), "VALIDATION_ERROR");
        assert_eq!(CoreError::business_rule("x").code(), "BUSINESS_RULE_VIOLATION");
        assert_eq!(CoreError::not_found("Route", 7).code(), "ENTITY_NOT_FOUND");
    }

    #[test]
    fn test_error_checks() {
        assert!(CoreError::validation("x").is_validation());
        assert!(CoreError::business_rule("x").is_business_rule());
        assert!(CoreError::not_found("Route", "R001").is_not_found());
        assert!(!CoreError::business_rule("x").is_not_found());
    }
}
