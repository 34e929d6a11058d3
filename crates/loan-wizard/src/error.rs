use crate::config::ConfigError;
use crate::telemetry::TelemetryError;
use crate::workflows::loan_application::{FieldError, IntakeError, WizardError};
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use serde_json::json;

#[derive(Debug, thiserror::Error)]
pub enum AppError {
    #[error("configuration error: {0}")]
    Config(#[from] ConfigError),
    #[error(transparent)]
    Telemetry(#[from] TelemetryError),
    #[error("io error: {0}")]
    Io(#[from] std::io::Error),
    #[error("server error: {0}")]
    Server(#[from] axum::Error),
    #[error("invalid application payload: {0}")]
    Payload(#[from] serde_json::Error),
    #[error("wizard error: {0}")]
    Wizard(#[from] WizardError),
    #[error(transparent)]
    Intake(#[from] IntakeError),
    #[error("bank statement error: {0}")]
    Document(#[from] FieldError),
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let message = self.to_string();
        let (status, body) = match self {
            // Same diagnostics the wizard banner would show.
            AppError::Intake(IntakeError::Invalid(blocked)) => (
                StatusCode::UNPROCESSABLE_ENTITY,
                json!({
                    "error": message,
                    "step": blocked.step,
                    "issues": blocked.issues,
                }),
            ),
            AppError::Payload(_) | AppError::Wizard(_) | AppError::Document(_) => {
                (StatusCode::BAD_REQUEST, json!({ "error": message }))
            }
            AppError::Config(_)
            | AppError::Telemetry(_)
            | AppError::Io(_)
            | AppError::Server(_) => {
                tracing::error!(error = %message, "request failed");
                (StatusCode::INTERNAL_SERVER_ERROR, json!({ "error": message }))
            }
        };

        (status, Json(body)).into_response()
    }
}
