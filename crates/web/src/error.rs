use axum::{
    Json,
    http::StatusCode,
    response::{IntoResponse, Response},
};
use serde_json::json;
use std::fmt;
use storage::error::StorageError;
use tracker::SyncError;
use validator::ValidationErrors;

/// Web layer errors
#[derive(Debug)]
pub enum WebError {
    Storage(StorageError),
    Provider(SyncError),
    Validation(ValidationErrors),
    BadRequest(String),
    Unauthorized,
}

impl fmt::Display for WebError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Storage(e) => write!(f, "Storage error: {}", e),
            Self::Provider(e) => write!(f, "Provider error: {}", e),
            Self::Validation(e) => write!(f, "Validation error: {}", e),
            Self::BadRequest(msg) => write!(f, "Bad request: {}", msg),
            Self::Unauthorized => write!(f, "Unauthorized"),
        }
    }
}

impl IntoResponse for WebError {
    fn into_response(self) -> Response {
        let status_code = match &self {
            Self::Storage(StorageError::NotFound) => StatusCode::NOT_FOUND,
            Self::Storage(StorageError::ConstraintViolation(_)) => StatusCode::CONFLICT,
            Self::Storage(StorageError::InvalidInput(_)) => StatusCode::BAD_REQUEST,
            Self::Storage(_) => StatusCode::INTERNAL_SERVER_ERROR,
            Self::Provider(SyncError::ExternalUserNotFound(_)) => StatusCode::NOT_FOUND,
            Self::Provider(SyncError::SyncInProgress) => StatusCode::CONFLICT,
            Self::Provider(_) => StatusCode::BAD_GATEWAY,
            Self::Validation(_) => StatusCode::BAD_REQUEST,
            Self::BadRequest(_) => StatusCode::BAD_REQUEST,
            Self::Unauthorized => StatusCode::UNAUTHORIZED,
        };

        let body = match &self {
            Self::Storage(StorageError::NotFound) => {
                json!({
                    "error": "Resource not found"
                })
            }
            Self::Storage(StorageError::ConstraintViolation(msg))
            | Self::Storage(StorageError::InvalidInput(msg)) => {
                json!({
                    "error": msg
                })
            }
            Self::Storage(e) => {
                tracing::error!("Storage error: {:?}", e);
                json!({
                    "error": "An internal error occurred"
                })
            }
            Self::Provider(e) => {
                tracing::warn!("Sync request failed: {}", e);
                json!({
                    "error": e.to_string()
                })
            }
            Self::Validation(errors) => {
                let field_errors: Vec<String> = errors
                    .field_errors()
                    .iter()
                    .flat_map(|(field, errors)| {
                        errors.iter().map(move |e| {
                            format!(
                                "{}: {}",
                                field,
                                e.message
                                    .as_ref()
                                    .map(|m| m.to_string())
                                    .unwrap_or_else(|| e.code.to_string())
                            )
                        })
                    })
                    .collect();

                json!({
                    "error": "Validation failed",
                    "details": field_errors
                })
            }
            Self::BadRequest(msg) => {
                json!({
                    "error": msg
                })
            }
            Self::Unauthorized => {
                json!({
                    "error": "Invalid or missing admin token"
                })
            }
        };

        (status_code, Json(body)).into_response()
    }
}

impl From<StorageError> for WebError {
    fn from(error: StorageError) -> Self {
        Self::Storage(error)
    }
}

impl From<SyncError> for WebError {
    fn from(error: SyncError) -> Self {
        match error {
            SyncError::Storage(e) => Self::Storage(e),
            other => Self::Provider(other),
        }
    }
}

impl From<ValidationErrors> for WebError {
    fn from(error: ValidationErrors) -> Self {
        Self::Validation(error)
    }
}

pub type ApiResult<T> = Result<T, WebError>;

#[cfg(test)]
mod tests {
    use super::*;

    fn status_of(error: impl Into<WebError>) -> StatusCode {
        error.into().into_response().status()
    }

    #[test]
    fn test_status_mapping() {
        assert_eq!(status_of(StorageError::NotFound), StatusCode::NOT_FOUND);
        assert_eq!(
            status_of(StorageError::ConstraintViolation("dup".into())),
            StatusCode::CONFLICT
        );
        assert_eq!(
            status_of(StorageError::InvalidInput("bad".into())),
            StatusCode::BAD_REQUEST
        );
        assert_eq!(
            status_of(SyncError::ExternalUserNotFound("ghost".into())),
            StatusCode::NOT_FOUND
        );
        assert_eq!(
            status_of(SyncError::ProviderUnavailable("timeout".into())),
            StatusCode::BAD_GATEWAY
        );
        assert_eq!(
            status_of(SyncError::MalformedResponse("garbage".into())),
            StatusCode::BAD_GATEWAY
        );
        assert_eq!(
            status_of(SyncError::Storage(StorageError::NotFound)),
            StatusCode::NOT_FOUND
        );
        assert_eq!(status_of(SyncError::SyncInProgress), StatusCode::CONFLICT);
        assert_eq!(status_of(WebError::Unauthorized), StatusCode::UNAUTHORIZED);
    }
}
