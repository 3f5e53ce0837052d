use std::path::PathBuf;

use thiserror::Error;

type BoxError = Box<dyn std::error::Error + Send + Sync + 'static>;

#[derive(Debug, Error)]
pub enum AppError {
    #[error("page {current_page} does not exist (total pages: {total_pages})")]
    PageNotExists { current_page: u64, total_pages: u64 },

    #[error("data source error: {0}")]
    DataSource(#[source] BoxError),

    #[error("invalid request: {0}")]
    InvalidRequest(String),

    #[error("query is not read-only")]
    NotReadonly,

    #[error("failed to open database: {path}: {reason}")]
    DbOpenFailed { path: PathBuf, reason: String },

    #[error("io error: {0}")]
    Io(#[from] std::io::Error),

    #[error("json error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("internal error: {0}")]
    Internal(String),
}

impl From<rusqlite::Error> for AppError {
    fn from(e: rusqlite::Error) -> Self {
        AppError::DataSource(Box::new(e))
    }
}

impl AppError {
    /// Wraps a collaborator failure without inspecting it.
    pub fn data_source<E>(e: E) -> Self
    where
        E: std::error::Error + Send + Sync + 'static,
    {
        AppError::DataSource(Box::new(e))
    }

    pub fn code(&self) -> &'static str {
        match self {
            AppError::PageNotExists { .. } => "PAGE_NOT_EXISTS",
            AppError::DataSource(_) => "DATA_SOURCE_ERROR",
            AppError::InvalidRequest(_) => "INVALID_REQUEST",
            AppError::NotReadonly => "NOT_READONLY",
            AppError::DbOpenFailed { .. } => "DB_OPEN_FAILED",
            AppError::Io(_) => "IO_ERROR",
            AppError::Json(_) => "JSON_ERROR",
            AppError::Internal(_) => "INTERNAL",
        }
    }
}

pub type AppResult<T> = Result<T, AppError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn data_source_keeps_collaborator_message() {
        let e = AppError::from(rusqlite::Error::QueryReturnedNoRows);
        assert_eq!(e.code(), "DATA_SOURCE_ERROR");
        assert!(e.to_string().contains("Query returned no rows"));
        assert!(std::error::Error::source(&e).is_some());
    }

    #[test]
    fn page_not_exists_reports_both_numbers() {
        let e = AppError::PageNotExists {
            current_page: 4,
            total_pages: 3,
        };
        assert_eq!(e.code(), "PAGE_NOT_EXISTS");
        assert_eq!(e.to_string(), "page 4 does not exist (total pages: 3)");
    }
}
