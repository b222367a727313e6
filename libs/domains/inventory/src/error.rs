use axum::response::{IntoResponse, Response};
use axum_helpers::AppError;
use thiserror::Error;
use validator::ValidationErrors;

#[derive(Debug, Error)]
pub enum InventoryError {
    #[error("Inventory record not found: {0}")]
    NotFound(u64),

    #[error("Invalid sort field: {0}")]
    InvalidSortField(String),

    #[error("Invalid record: {0}")]
    InvalidRecord(String),

    #[error("Invalid input: {0}")]
    Validation(#[from] ValidationErrors),

    #[error("Internal error: {0}")]
    Internal(String),
}

pub type InventoryResult<T> = Result<T, InventoryError>;

/// Convert InventoryError to AppError for standardized error responses
impl From<InventoryError> for AppError {
    fn from(err: InventoryError) -> Self {
        match err {
            InventoryError::NotFound(id) => {
                AppError::NotFound(format!("Inventory record {} not found", id))
            }
            InventoryError::InvalidSortField(field) => {
                AppError::BadRequest(format!("Invalid sort field: {}", field))
            }
            InventoryError::InvalidRecord(msg) => AppError::BadRequest(msg),
            InventoryError::Validation(errors) => AppError::ValidationError(errors),
            InventoryError::Internal(msg) => AppError::InternalServerError(msg),
        }
    }
}

impl IntoResponse for InventoryError {
    fn into_response(self) -> Response {
        let app_error: AppError = self.into();
        app_error.into_response()
    }
}
