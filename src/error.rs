use axum::{
    Json,
    http::{HeaderValue, StatusCode, header},
    response::{IntoResponse, Response},
};
use cookshelf_shopping::{ExportError, RenderError};
use serde_json::{Map, Value, json};
use thiserror::Error;
use validator::ValidationErrors;

/// Machine readable `error` field of every error body.
#[derive(Debug, Clone, Copy, PartialEq, Eq, strum::IntoStaticStr)]
#[strum(serialize_all = "snake_case")]
pub enum ErrorCode {
    ValidationFailed,
    BadRequest,
    Unauthorized,
    Forbidden,
    NotFound,
    ExportUnavailable,
    ServiceUnavailable,
    Internal,
}

#[derive(Error, Debug)]
pub enum AppError {
    #[error(transparent)]
    Domain(#[from] cookshelf_shared::Error),

    #[error(transparent)]
    Export(#[from] ExportError),

    #[error("{0}")]
    Unauthorized(String),

    #[error("{0}")]
    NotFound(String),

    #[error("shopping list export is unavailable: {0}")]
    ExportUnavailable(String),

    #[error(transparent)]
    Internal(#[from] anyhow::Error),
}

pub type Result<T> = std::result::Result<T, AppError>;

impl AppError {
    fn status_and_code(&self) -> (StatusCode, ErrorCode) {
        use cookshelf_shared::Error as Domain;

        match self {
            AppError::Domain(Domain::Validate(_)) => {
                (StatusCode::UNPROCESSABLE_ENTITY, ErrorCode::ValidationFailed)
            }
            AppError::Domain(Domain::User(_)) => (StatusCode::BAD_REQUEST, ErrorCode::BadRequest),
            AppError::Domain(Domain::NotFound(_)) | AppError::NotFound(_) => {
                (StatusCode::NOT_FOUND, ErrorCode::NotFound)
            }
            AppError::Domain(Domain::Forbidden(_)) => (StatusCode::FORBIDDEN, ErrorCode::Forbidden),
            AppError::Unauthorized(_) => (StatusCode::UNAUTHORIZED, ErrorCode::Unauthorized),
            AppError::Export(err) if err.is_retryable() => (
                StatusCode::SERVICE_UNAVAILABLE,
                ErrorCode::ServiceUnavailable,
            ),
            AppError::Export(ExportError::Render(
                RenderError::FontUnavailable(_) | RenderError::Unencodable(_),
            ))
            | AppError::ExportUnavailable(_) => (
                StatusCode::INTERNAL_SERVER_ERROR,
                ErrorCode::ExportUnavailable,
            ),
            AppError::Domain(Domain::Server(_) | Domain::Unknown(_))
            | AppError::Export(_)
            | AppError::Internal(_) => (StatusCode::INTERNAL_SERVER_ERROR, ErrorCode::Internal),
        }
    }
}

fn field_errors(errors: &ValidationErrors) -> Map<String, Value> {
    errors
        .field_errors()
        .into_iter()
        .map(|(field, errors)| {
            let messages = errors
                .iter()
                .map(|err| {
                    err.message
                        .as_ref()
                        .map(|message| message.to_string())
                        .unwrap_or_else(|| err.code.to_string())
                })
                .map(Value::String)
                .collect();

            (field.to_string(), Value::Array(messages))
        })
        .collect()
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let (status, code) = self.status_and_code();
        let message = match code {
            ErrorCode::ServiceUnavailable => {
                "Service temporarily unavailable, retry shortly".to_owned()
            }
            ErrorCode::ExportUnavailable => "Shopping list export is not configured".to_owned(),
            ErrorCode::Internal => "An unexpected error occurred".to_owned(),
            _ => self.to_string(),
        };

        let code: &'static str = code.into();
        if status.is_server_error() {
            tracing::error!(error = %self, code, "request failed");
        }

        let mut body = json!({ "error": code, "message": message });

        if let AppError::Domain(cookshelf_shared::Error::Validate(errors)) = &self {
            body["message"] = Value::String("Validation failed".to_owned());
            body["fields"] = Value::Object(field_errors(errors));
        }

        let mut response = (status, Json(body)).into_response();
        if status == StatusCode::SERVICE_UNAVAILABLE {
            response
                .headers_mut()
                .insert(header::RETRY_AFTER, HeaderValue::from_static("1"));
        }

        response
    }
}
