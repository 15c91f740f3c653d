use thiserror::Error;

use crate::spreadsheet::SpreadsheetError;

#[derive(Debug, Error)]
pub enum ServiceError {
    #[error("validation error: {0}")]
    Validation(String),
    #[error("not found: {0}")]
    NotFound(String),
    #[error("database error: {0}")]
    Db(String),
    #[error("model error: {0}")]
    Model(#[from] models::errors::ModelError),
    #[error("spreadsheet error: {0}")]
    Spreadsheet(#[from] SpreadsheetError),
}

impl ServiceError {
    pub fn not_found(entity: &str) -> Self { Self::NotFound(format!("{} not found", entity)) }

    /// True for caller mistakes (bad payload, unknown ids, malformed files).
    pub fn is_client_error(&self) -> bool {
        !matches!(self, ServiceError::Db(_))
            && !matches!(self, ServiceError::Spreadsheet(SpreadsheetError::Write(_)))
    }
}

impl From<sea_orm::DbErr> for ServiceError {
    fn from(e: sea_orm::DbErr) -> Self { ServiceError::Db(e.to_string()) }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn classification() {
        assert!(ServiceError::not_found("honor").is_client_error());
        assert!(ServiceError::Validation("x".into()).is_client_error());
        assert!(!ServiceError::Db("down".into()).is_client_error());
        assert_eq!(ServiceError::not_found("honor").to_string(), "not found: honor not found");
    }
}
