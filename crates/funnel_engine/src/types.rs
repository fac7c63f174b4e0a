use chrono::{DateTime, Utc};
use funnel_core::SimulationRequest;
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Request body of `POST /api/simulations`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct InsertSimulation {
    pub gender: String,
    pub phone_number: String,
    pub step: String,
}

impl From<&SimulationRequest> for InsertSimulation {
    fn from(request: &SimulationRequest) -> Self {
        Self {
            gender: request.gender.as_str().to_string(),
            phone_number: request.phone_number.clone(),
            step: request.step.clone(),
        }
    }
}

/// Stored row as returned by the recorder.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SimulationRecord {
    pub id: i64,
    pub gender: String,
    pub phone_number: Option<String>,
    pub step: Option<String>,
    pub created_at: Option<DateTime<Utc>>,
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum RecordError {
    #[error("invalid recorder url: {0}")]
    InvalidUrl(String),
    #[error("http status {0}")]
    HttpStatus(u16),
    #[error("network error: {0}")]
    Network(String),
    #[error("malformed response: {0}")]
    Decode(String),
    #[error("recorder unavailable")]
    Unavailable,
}
