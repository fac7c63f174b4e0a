use std::sync::Mutex;

use chrono::Utc;
use funnel_core::SimulationRequest;
use reqwest::header::CONTENT_TYPE;

use crate::{InsertSimulation, RecordError, SimulationRecord};

/// The external persistence collaborator: one `create` operation.
#[async_trait::async_trait]
pub trait Recorder: Send + Sync {
    async fn create(&self, request: &SimulationRequest) -> Result<SimulationRecord, RecordError>;
}

#[derive(Debug, Clone)]
pub struct RecorderSettings {
    pub base_url: url::Url,
    /// Appended to whatever path `base_url` already carries.
    pub path: String,
}

impl RecorderSettings {
    pub fn new(base_url: url::Url) -> Self {
        Self {
            base_url,
            path: "api/simulations".to_string(),
        }
    }
}

/// Posts JSON to the recorder endpoint and expects the stored row back.
#[derive(Debug, Clone)]
pub struct HttpRecorder {
    settings: RecorderSettings,
}

impl HttpRecorder {
    pub fn new(settings: RecorderSettings) -> Self {
        Self { settings }
    }

    pub fn endpoint(&self) -> Result<url::Url, RecordError> {
        let mut endpoint = self.settings.base_url.clone();
        endpoint
            .path_segments_mut()
            .map_err(|()| RecordError::InvalidUrl(self.settings.base_url.to_string()))?
            .pop_if_empty()
            .extend(
                self.settings
                    .path
                    .split('/')
                    .filter(|segment| !segment.is_empty()),
            );
        Ok(endpoint)
    }

    fn build_client(&self) -> Result<reqwest::Client, RecordError> {
        reqwest::Client::builder()
            .build()
            .map_err(|err| RecordError::Network(err.to_string()))
    }
}

#[async_trait::async_trait]
impl Recorder for HttpRecorder {
    async fn create(&self, request: &SimulationRequest) -> Result<SimulationRecord, RecordError> {
        let endpoint = self.endpoint()?;
        let body = serde_json::to_vec(&InsertSimulation::from(request))
            .map_err(|err| RecordError::Decode(err.to_string()))?;
        let client = self.build_client()?;

        let response = client
            .post(endpoint)
            .header(CONTENT_TYPE, "application/json")
            .body(body)
            .send()
            .await
            .map_err(|err| RecordError::Network(err.to_string()))?;

        let status = response.status();
        if !status.is_success() {
            return Err(RecordError::HttpStatus(status.as_u16()));
        }

        let bytes = response
            .bytes()
            .await
            .map_err(|err| RecordError::Network(err.to_string()))?;
        serde_json::from_slice(&bytes).map_err(|err| RecordError::Decode(err.to_string()))
    }
}

/// In-process recorder for offline runs; assigns sequential ids.
#[derive(Debug, Default)]
pub struct MemoryRecorder {
    rows: Mutex<Vec<SimulationRecord>>,
}

impl MemoryRecorder {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn records(&self) -> Vec<SimulationRecord> {
        self.rows
            .lock()
            .map(|rows| rows.clone())
            .unwrap_or_default()
    }
}

#[async_trait::async_trait]
impl Recorder for MemoryRecorder {
    async fn create(&self, request: &SimulationRequest) -> Result<SimulationRecord, RecordError> {
        let insert = InsertSimulation::from(request);
        let mut rows = self.rows.lock().map_err(|_| RecordError::Unavailable)?;
        let record = SimulationRecord {
            id: rows.len() as i64 + 1,
            gender: insert.gender,
            phone_number: Some(insert.phone_number),
            step: Some(insert.step),
            created_at: Some(Utc::now()),
        };
        rows.push(record.clone());
        Ok(record)
    }
}
