use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
};
use sea_orm::DbErr;

use crate::utils::api_response::{ResponseBuilder, ValidationErrorDetail};

/// Failure of a service call, rendered into the standard response envelope.
#[derive(Debug, thiserror::Error)]
pub enum AppError {
    #[error("validation failed")]
    Validation(Vec<ValidationErrorDetail>),
    #[error("{1}")]
    BadRequest(&'static str, String),
    #[error("{1}")]
    Unauthorized(&'static str, String),
    #[error("{1}")]
    Forbidden(&'static str, String),
    #[error("{1}")]
    NotFound(&'static str, String),
    /// A toggle hit an existing pair on add, or a missing pair on remove.
    /// Reported as 400.
    #[error("{1}")]
    Relation(&'static str, String),
    #[error("database error: {0}")]
    Database(#[from] DbErr),
    #[error("{1}")]
    Internal(&'static str, String),
}

impl AppError {
    pub fn field(field: &str, title: &str, message: impl Into<String>) -> Self {
        AppError::Validation(vec![ValidationErrorDetail {
            field: field.to_string(),
            title: title.to_string(),
            message: message.into(),
        }])
    }

    pub fn authentication_required() -> Self {
        AppError::Unauthorized("AUTH_REQUIRED", "Authentication credentials were not provided".to_string())
    }

    pub fn status(&self) -> StatusCode {
        match self {
            AppError::Validation(_) | AppError::BadRequest(..) | AppError::Relation(..) => StatusCode::BAD_REQUEST,
            AppError::Unauthorized(..) => StatusCode::UNAUTHORIZED,
            AppError::Forbidden(..) => StatusCode::FORBIDDEN,
            AppError::NotFound(..) => StatusCode::NOT_FOUND,
            AppError::Database(_) | AppError::Internal(..) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let status = self.status();
        match self {
            AppError::Validation(details) => {
                ResponseBuilder::fail_with_data(status, "VALIDATION_ERROR", "Validation failed", details).into_response()
            }
            AppError::Database(e) => {
                tracing::error!("Database error: {}", e);
                ResponseBuilder::error::<()>(status, "DB_ERR", "Database error").into_response()
            }
            AppError::Internal(code, msg) => {
                tracing::error!("{}: {}", code, msg);
                ResponseBuilder::error::<()>(status, code, "Internal server error").into_response()
            }
            AppError::BadRequest(code, msg)
            | AppError::Unauthorized(code, msg)
            | AppError::Forbidden(code, msg)
            | AppError::NotFound(code, msg)
            | AppError::Relation(code, msg) => ResponseBuilder::error::<()>(status, code, &msg).into_response(),
        }
    }
}
