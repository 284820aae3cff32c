//! Error types for Oruma server

use axum::{
    extract::rejection::{JsonRejection, QueryRejection},
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde::Serialize;
use thiserror::Error;
use validator::ValidationErrors;

/// Body returned for every unexpected failure
pub const INTERNAL_ERROR_MESSAGE: &str = "Something went wrong!";

/// Main application error type
#[derive(Error, Debug)]
pub enum AppError {
    #[error("Authentication failed: {0}")]
    Authentication(String),

    #[error("Not found: {0}")]
    NotFound(String),

    #[error("Validation error: {0}")]
    Validation(String),

    #[error("Database error: {0}")]
    Database(#[from] sqlx::Error),

    #[error("Conflict: {0}")]
    Conflict(String),

    #[error("Internal server error: {0}")]
    Internal(String),
}

/// Error response body
#[derive(Serialize, utoipa::ToSchema)]
pub struct ErrorResponse {
    pub error: String,
}

impl AppError {
    pub fn status(&self) -> StatusCode {
        match self {
            AppError::Authentication(_) => StatusCode::UNAUTHORIZED,
            AppError::NotFound(_) => StatusCode::NOT_FOUND,
            AppError::Validation(_) | AppError::Conflict(_) => StatusCode::BAD_REQUEST,
            AppError::Database(_) | AppError::Internal(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let status = self.status();
        let message = match self {
            AppError::Authentication(msg)
            | AppError::NotFound(msg)
            | AppError::Validation(msg)
            | AppError::Conflict(msg) => msg,
            AppError::Database(e) => {
                tracing::error!("Database error: {:?}", e);
                INTERNAL_ERROR_MESSAGE.to_string()
            }
            AppError::Internal(msg) => {
                tracing::error!("Internal error: {}", msg);
                INTERNAL_ERROR_MESSAGE.to_string()
            }
        };

        (status, Json(ErrorResponse { error: message })).into_response()
    }
}

impl From<ValidationErrors> for AppError {
    fn from(errors: ValidationErrors) -> Self {
        let mut missing = Vec::new();
        let mut invalid = Vec::new();
        for (field, field_errors) in errors.field_errors() {
            let name = camel_case(&field);
            // An empty string counts as a missing value
            if field_errors.iter().any(|e| e.code == "required" || e.code == "length") {
                missing.push(name);
            } else {
                invalid.push(name);
            }
        }
        missing.sort_unstable();
        invalid.sort_unstable();

        if missing.is_empty() {
            AppError::Validation(format!("Invalid value for fields: {}", invalid.join(", ")))
        } else {
            AppError::Validation(format!("Missing required fields: {}", missing.join(", ")))
        }
    }
}

/// `patient_name` -> `patientName`, matching the JSON field names
fn camel_case(field: &str) -> String {
    let mut out = String::with_capacity(field.len());
    let mut upper = false;
    for c in field.chars() {
        if c == '_' {
            upper = true;
        } else if upper {
            out.extend(c.to_uppercase());
            upper = false;
        } else {
            out.push(c);
        }
    }
    out
}

impl From<JsonRejection> for AppError {
    fn from(rejection: JsonRejection) -> Self {
        AppError::Validation(rejection.body_text())
    }
}

impl From<QueryRejection> for AppError {
    fn from(rejection: QueryRejection) -> Self {
        AppError::Validation(rejection.body_text())
    }
}

/// Result type alias for application operations
pub type AppResult<T> = Result<T, AppError>;
