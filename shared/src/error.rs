use axum::{http::StatusCode, response::IntoResponse};

#[derive(Debug, thiserror::Error)]
pub enum AppError {
    #[error("{0}")]
    UnprocessableEntity(String),
    #[error("{0}")]
    EntityNotFound(String),
    // 予約の時間帯重複。衝突した予約の情報をメッセージに含める
    #[error("{0}")]
    BookingConflict(String),
    #[error("{0}")]
    ValidationError(#[from] garde::Report),
    #[error("invalid date range")]
    InvalidDateRangeError,
    #[error("transaction error")]
    TransactionError(#[source] sqlx::Error),
    #[error("database operation error")]
    SpecificOperationError(#[source] sqlx::Error),
    #[error("no rows affected")]
    NoRowsAffectedError,
    #[error("failed to query database")]
    DbQueryError(#[source] sqlx::Error),
    #[error("failed to operate key value store")]
    KeyValueStoreError(#[from] redis::RedisError),
    #[error("failed to operate image store")]
    ImageStoreError(#[source] std::io::Error),
    #[error("failed to hash or verify password")]
    HashError(#[source] anyhow::Error),
    #[error("failed to convert entity")]
    ConversionEntityError(String),
    #[error("unauthenticated")]
    UnauthenticatedError,
    #[error("unauthorized operation")]
    UnauthorizedError,
    #[error("forbidden operation")]
    ForbiddenOperation,
}

impl IntoResponse for AppError {
    fn into_response(self) -> axum::response::Response {
        let status_code = match &self {
            AppError::UnprocessableEntity(_) => StatusCode::UNPROCESSABLE_ENTITY,
            AppError::EntityNotFound(_) => StatusCode::NOT_FOUND,
            AppError::BookingConflict(_) => StatusCode::CONFLICT,
            AppError::ValidationError(_) | AppError::InvalidDateRangeError => {
                StatusCode::BAD_REQUEST
            }
            AppError::UnauthenticatedError => StatusCode::UNAUTHORIZED,
            AppError::UnauthorizedError | AppError::ForbiddenOperation => StatusCode::FORBIDDEN,
            e @ (AppError::TransactionError(_)
            | AppError::SpecificOperationError(_)
            | AppError::NoRowsAffectedError
            | AppError::DbQueryError(_)
            | AppError::KeyValueStoreError(_)
            | AppError::ImageStoreError(_)
            | AppError::HashError(_)
            | AppError::ConversionEntityError(_)) => {
                tracing::error!(
                    error.cause_chain = ?e,
                    error.message = %e,
                    "Unexpected error happened"
                );
                StatusCode::INTERNAL_SERVER_ERROR
            }
        };
        (status_code, self.to_string()).into_response()
    }
}

pub type AppResult<T> = Result<T, AppError>;
