use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use haven_core::{CoreError, RemoteError};
use haven_shared::rpc::ErrorBody;
use haven_shared::ErrorKind;

#[derive(Debug)]
pub enum AppError {
    AuthenticationError(String),
    ValidationError(String),
    NotFoundError(String),
    ConflictError(String),
    InternalServerError(String),
}

impl AppError {
    pub fn new(kind: ErrorKind, message: String) -> Self {
        match kind {
            ErrorKind::NotFound => AppError::NotFoundError(message),
            ErrorKind::Conflict => AppError::ConflictError(message),
            ErrorKind::Invalid => AppError::ValidationError(message),
            ErrorKind::Unauthorized => AppError::AuthenticationError(message),
            ErrorKind::Internal => AppError::InternalServerError(message),
        }
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let (status, kind, error_message) = match self {
            AppError::AuthenticationError(msg) => (StatusCode::UNAUTHORIZED, ErrorKind::Unauthorized, msg),
            AppError::ValidationError(msg) => (StatusCode::BAD_REQUEST, ErrorKind::Invalid, msg),
            AppError::NotFoundError(msg) => (StatusCode::NOT_FOUND, ErrorKind::NotFound, msg),
            AppError::ConflictError(msg) => (StatusCode::CONFLICT, ErrorKind::Conflict, msg),
            AppError::InternalServerError(msg) => {
                tracing::error!("Internal Server Error: {}", msg);
                (StatusCode::INTERNAL_SERVER_ERROR, ErrorKind::Internal, msg)
            }
        };

        let body = Json(ErrorBody {
            kind,
            error: error_message,
        });

        (status, body).into_response()
    }
}

impl From<CoreError> for AppError {
    fn from(err: CoreError) -> Self {
        Self::new(err.kind(), err.to_string())
    }
}

impl From<RemoteError> for AppError {
    fn from(err: RemoteError) -> Self {
        Self::new(err.kind, err.message)
    }
}
