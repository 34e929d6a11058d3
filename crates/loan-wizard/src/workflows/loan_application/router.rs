use std::sync::Arc;

use axum::{extract::State, http::StatusCode, routing::post, Json, Router};

use super::domain::ApplicationData;
use super::intake::LoanIntakeService;
use super::submission::SubmissionReceipt;
use crate::error::AppError;

pub const LOAN_APPLICATIONS_PATH: &str = "/api/v1/loan-applications";

/// Router exposing the loan-application intake endpoint.
pub fn intake_router(service: Arc<LoanIntakeService>) -> Router {
    Router::new()
        .route(LOAN_APPLICATIONS_PATH, post(submit_handler))
        .with_state(service)
}

/// 202 with a receipt, or 422 carrying the blocked step and its issues.
pub(crate) async fn submit_handler(
    State(service): State<Arc<LoanIntakeService>>,
    Json(payload): Json<ApplicationData>,
) -> Result<(StatusCode, Json<SubmissionReceipt>), AppError> {
    let receipt = service.accept(&payload)?;
    Ok((StatusCode::ACCEPTED, Json(receipt)))
}
