//! Business layer errors
//!
//! Wrap domain và persistence errors, giữ được error kind để caller phân
//! biệt "sửa request" (validation) với "không được phép lúc này"
//! (business rule).

use fueleu_core::{CoreError, ErrorKind};
use fueleu_persistence::PersistenceError;
use thiserror::Error;

/// Business operation errors
#[derive(Debug, Error)]
pub enum BusinessError {
    #[error(transparent)]
    Domain(#[from] CoreError),

    #[error(transparent)]
    Persistence(#[from] PersistenceError),
}

/// Result type alias for business operations
pub type BusinessResult<T> = Result<T, BusinessError>;

impl From<sqlx::Error> for BusinessError {
    fn from(err: sqlx::Error) -> Self {
        Self::Persistence(PersistenceError::Database(err))
    }
}

impl BusinessError {
    pub fn validation(message: impl Into<String>) -> Self {
        Self::Domain(CoreError::validation(message))
    }

    pub fn business_rule(message: impl Into<String>) -> Self {
        Self::Domain(CoreError::business_rule(message))
    }

    pub fn not_found(entity: &str, id: impl std::fmt::Display) -> Self {
        Self::Domain(CoreError::not_found(entity, id))
    }

    /// Domain error kind; `None` cho lỗi hạ tầng (database, IO)
    pub fn kind(&self) -> Option<ErrorKind> {
        match self {
            Self::Domain(err) => Some(err.kind()),
            Self::Persistence(err) if err.is_not_found() => Some(ErrorKind::NotFound),
            Self::Persistence(_) => None,
        }
    }

    /// Machine-readable code
    pub fn code(&self) -> &'static str {
        self.kind().map_or("INTERNAL_ERROR", |kind| kind.code())
    }

    pub fn is_validation(&self) -> bool {
        self.kind() == Some(ErrorKind::Validation)
    }

    pub fn is_business_rule(&self) -> bool {
        self.kind() == Some(ErrorKind::BusinessRule)
    }

    pub fn is_not_found(&self) -> bool {
        self.kind() == Some(ErrorKind::NotFound)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_domain_codes_pass_through() {
        let err = BusinessError::business_rule("Insufficient banked balance");
        assert_eq!(err.code(), "BUSINESS_RULE_VIOLATION");
        assert!(err.is_business_rule());
        assert!(err.to_string().ends_with("Insufficient banked balance"));

        let err = BusinessError::validation("Apply amount must be positive.");
        assert_eq!(err.code(), "VALIDATION_ERROR");
    }

    #[test]
    fn test_persistence_not_found_maps_to_entity_not_found() {
        let err: BusinessError = PersistenceError::not_found("Bank entry", 7).into();
        assert!(err.is_not_found());
        assert_eq!(err.code(), "ENTITY_NOT_FOUND");
    }

    #[test]
    fn test_infrastructure_errors_have_no_kind() {
        let err: BusinessError = PersistenceError::InvalidDate("18/10/2026".to_string()).into();
        assert_eq!(err.kind(), None);
        assert_eq!(err.code(), "INTERNAL_ERROR");
    }
}
