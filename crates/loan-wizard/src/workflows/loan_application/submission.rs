use std::future::Future;
use std::sync::atomic::{AtomicU64, Ordering};
use std::time::Duration;

use chrono::{Local, NaiveDate};
use serde::{Deserialize, Serialize};
use tracing::{debug, info};

use super::domain::ApplicationData;

pub const DEFAULT_SUBMISSION_DELAY: Duration = Duration::from_millis(1500);

static REFERENCE_SEQUENCE: AtomicU64 = AtomicU64::new(1);

pub(crate) fn next_reference() -> String {
    let id = REFERENCE_SEQUENCE.fetch_add(1, Ordering::Relaxed);
    format!("LA{id:06}")
}

/// Acknowledgement returned once an application has been accepted.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SubmissionReceipt {
    pub reference: String,
    pub submitted_on: NaiveDate,
}

impl SubmissionReceipt {
    pub fn issue(submitted_on: NaiveDate) -> Self {
        Self {
            reference: next_reference(),
            submitted_on,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum SubmissionError {
    #[error("submission transport failed: {0}")]
    Transport(String),
    #[error("submission rejected with status {status}")]
    Rejected { status: u16 },
}

/// Destination for a completed application payload.
pub trait SubmissionGateway: Send + Sync {
    fn submit(
        &self,
        payload: &ApplicationData,
    ) -> impl Future<Output = Result<SubmissionReceipt, SubmissionError>> + Send;
}

/// Stand-in for the loan endpoint: waits a fixed delay and always accepts.
#[derive(Debug, Clone)]
pub struct SimulatedSubmissionGateway {
    delay: Duration,
}

impl SimulatedSubmissionGateway {
    pub fn new(delay: Duration) -> Self {
        Self { delay }
    }

    pub fn delay(&self) -> Duration {
        self.delay
    }
}

impl Default for SimulatedSubmissionGateway {
    fn default() -> Self {
        Self::new(DEFAULT_SUBMISSION_DELAY)
    }
}

impl SubmissionGateway for SimulatedSubmissionGateway {
    async fn submit(
        &self,
        payload: &ApplicationData,
    ) -> Result<SubmissionReceipt, SubmissionError> {
        debug!(delay_ms = self.delay.as_millis() as u64, "simulating submission latency");
        tokio::time::sleep(self.delay).await;

        let receipt = SubmissionReceipt::issue(Local::now().date_naive());
        info!(
            reference = %receipt.reference,
            directors = payload.business_details.directors.len(),
            guarantors = payload.loan_details.guarantors.len(),
            "simulated submission accepted"
        );
        Ok(receipt)
    }
}

/// Posts the payload as JSON to a loan-application endpoint.
#[derive(Debug, Clone)]
pub struct HttpSubmissionGateway {
    client: reqwest::Client,
    endpoint: String,
}

impl HttpSubmissionGateway {
    pub fn new(endpoint: impl Into<String>) -> Self {
        Self::with_client(reqwest::Client::new(), endpoint)
    }

    pub fn with_client(client: reqwest::Client, endpoint: impl Into<String>) -> Self {
        Self {
            client,
            endpoint: endpoint.into(),
        }
    }

    pub fn endpoint(&self) -> &str {
        &self.endpoint
    }
}

impl SubmissionGateway for HttpSubmissionGateway {
    async fn submit(
        &self,
        payload: &ApplicationData,
    ) -> Result<SubmissionReceipt, SubmissionError> {
        let response = self
            .client
            .post(&self.endpoint)
            .json(payload)
            .send()
            .await
            .map_err(|err| SubmissionError::Transport(err.to_string()))?;

        let status = response.status();
        if !status.is_success() {
            return Err(SubmissionError::Rejected {
                status: status.as_u16(),
            });
        }

        let body = response
            .bytes()
            .await
            .map_err(|err| SubmissionError::Transport(err.to_string()))?;

        // Any 2xx is an acceptance, receipt body or not.
        match serde_json::from_slice::<SubmissionReceipt>(&body) {
            Ok(receipt) => Ok(receipt),
            Err(_) => {
                let receipt = SubmissionReceipt::issue(Local::now().date_naive());
                debug!(
                    status = status.as_u16(),
                    body_len = body.len(),
                    reference = %receipt.reference,
                    "endpoint accepted without a receipt; issued one locally"
                );
                Ok(receipt)
            }
        }
    }
}
