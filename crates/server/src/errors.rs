use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use common::types::DataResponse;
use models::errors::ModelError;
use service::errors::ServiceError;
use service::spreadsheet::SpreadsheetError;
use thiserror::Error;
use tracing::{error, warn};

pub const MSG_NOT_FOUND: &str = "未找到对应荣誉信息";
pub const MSG_DELETE_FAILED: &str = "删除荣誉信息失败";
pub const MSG_SAVE_FAILED: &str = "保存荣誉信息失败";
pub const MSG_IMPORT_FAILED: &str = "导入荣誉数据失败";
pub const MSG_QUERY_FAILED: &str = "查询荣誉信息失败";

/// Error envelope `{code: 1, msg}` with an explicit HTTP status.
#[derive(Debug)]
pub struct JsonApiError {
    pub status: StatusCode,
    pub body: DataResponse,
}

impl JsonApiError {
    pub fn new(status: StatusCode, msg: impl Into<String>) -> Self {
        Self { status, body: DataResponse::error(msg) }
    }

    /// Map a use-case error onto the transport. `failure` is the message
    /// shown for server-side faults; their cause only goes to the log.
    pub fn from_service(err: ServiceError, failure: &'static str) -> Self {
        match err {
            ServiceError::NotFound(_) => Self::new(StatusCode::OK, MSG_NOT_FOUND),
            ServiceError::Validation(msg) => Self::new(StatusCode::BAD_REQUEST, msg),
            ServiceError::Model(ModelError::Validation(msg)) => Self::new(StatusCode::BAD_REQUEST, msg),
            ServiceError::Model(ModelError::Db(e)) => {
                error!(error = %e, "database failure");
                Self::new(StatusCode::INTERNAL_SERVER_ERROR, failure)
            }
            ServiceError::Spreadsheet(SpreadsheetError::Write(e)) => {
                error!(error = %e, "spreadsheet write failed");
                Self::new(StatusCode::INTERNAL_SERVER_ERROR, failure)
            }
            ServiceError::Spreadsheet(e) => {
                warn!(error = %e, "spreadsheet rejected");
                Self::new(StatusCode::OK, failure)
            }
            ServiceError::Db(e) => {
                error!(error = %e, "database failure");
                Self::new(StatusCode::INTERNAL_SERVER_ERROR, failure)
            }
        }
    }
}

impl JsonApiError {
    /// Imports report every rejected row, including overlong cells, as one generic failure.
    pub fn from_import(err: ServiceError) -> Self {
        match err {
            ServiceError::Model(ModelError::Validation(e)) => {
                warn!(error = %e, "imported row rejected");
                Self::new(StatusCode::OK, MSG_IMPORT_FAILED)
            }
            other => Self::from_service(other, MSG_IMPORT_FAILED),
        }
    }
}

impl IntoResponse for JsonApiError {
    fn into_response(self) -> Response {
        (self.status, Json(self.body)).into_response()
    }
}

#[derive(Debug, Error)]
pub enum StartupError {
    #[error("invalid configuration: {0}")]
    InvalidConfig(String),
    #[error("database unavailable: {0}")]
    Database(String),
    #[error("migration failed: {0}")]
    Migration(String),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn not_found_is_a_soft_failure() {
        let e = JsonApiError::from_service(ServiceError::not_found("honor"), MSG_QUERY_FAILED);
        assert_eq!(e.status, StatusCode::OK);
        assert_eq!(e.body.msg.as_deref(), Some(MSG_NOT_FOUND));
    }

    #[test]
    fn db_cause_is_hidden() {
        let e = JsonApiError::from_service(ServiceError::Db("password=hunter2".into()), MSG_DELETE_FAILED);
        assert_eq!(e.status, StatusCode::INTERNAL_SERVER_ERROR);
        assert_eq!(e.body.msg.as_deref(), Some(MSG_DELETE_FAILED));
    }

    #[test]
    fn bad_workbook_reports_import_failure() {
        let e = JsonApiError::from_service(
            ServiceError::Spreadsheet(SpreadsheetError::NoWorksheet),
            MSG_IMPORT_FAILED,
        );
        assert_eq!(e.status, StatusCode::OK);
        assert_eq!(e.body.code, DataResponse::ERROR);
    }

    #[test]
    fn overlong_import_cell_reports_import_failure() {
        let err = || ServiceError::Model(ModelError::Validation("honor_name exceeds 100 characters".into()));
        let e = JsonApiError::from_import(err());
        assert_eq!(e.status, StatusCode::OK);
        assert_eq!(e.body.msg.as_deref(), Some(MSG_IMPORT_FAILED));

        let e = JsonApiError::from_service(err(), MSG_SAVE_FAILED);
        assert_eq!(e.status, StatusCode::BAD_REQUEST);
    }

    #[test]
    fn validation_message_is_returned() {
        let e = JsonApiError::from_service(ServiceError::Validation("bad sort".into()), MSG_QUERY_FAILED);
        assert_eq!(e.status, StatusCode::BAD_REQUEST);
        assert_eq!(e.body.msg.as_deref(), Some("bad sort"));
    }
}
