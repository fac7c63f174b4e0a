use std::sync::{mpsc, Arc};
use std::thread;

use funnel_core::{RecordStatus, SimulationRequest};
use funnel_logging::{funnel_error, funnel_info, funnel_warn};

use crate::{RecordError, Recorder, SimulationRecord};

/// Seam between the controller and whatever carries recorder calls.
///
/// `dispatch` must return immediately; outcomes surface later through
/// `poll_outcome`.
pub trait RecordDispatch {
    fn dispatch(&self, request: SimulationRequest);
    fn poll_outcome(&self) -> Option<RecordStatus>;
}

/// Runs recorder calls on a background tokio runtime.
pub struct RecorderHandle {
    cmd_tx: mpsc::Sender<SimulationRequest>,
    outcome_rx: mpsc::Receiver<Result<SimulationRecord, RecordError>>,
}

impl RecorderHandle {
    pub fn new(recorder: Arc<dyn Recorder>) -> Self {
        let (cmd_tx, cmd_rx) = mpsc::channel::<SimulationRequest>();
        let (outcome_tx, outcome_rx) = mpsc::channel();

        thread::spawn(move || {
            let runtime = match tokio::runtime::Runtime::new() {
                Ok(runtime) => runtime,
                Err(err) => {
                    // Requests queue up unanswered; the funnel does not care.
                    funnel_error!("Recorder runtime failed to start: {}", err);
                    return;
                }
            };
            while let Ok(request) = cmd_rx.recv() {
                let recorder = recorder.clone();
                let outcome_tx = outcome_tx.clone();
                runtime.spawn(async move {
                    let result = recorder.create(&request).await;
                    let _ = outcome_tx.send(result);
                });
            }
        });

        Self { cmd_tx, outcome_rx }
    }

    pub fn submit(&self, request: SimulationRequest) {
        if self.cmd_tx.send(request).is_err() {
            funnel_warn!("Recorder worker is gone; dropping request");
        }
    }

    pub fn try_recv(&self) -> Option<Result<SimulationRecord, RecordError>> {
        self.outcome_rx.try_recv().ok()
    }
}

impl RecordDispatch for RecorderHandle {
    fn dispatch(&self, request: SimulationRequest) {
        self.submit(request);
    }

    fn poll_outcome(&self) -> Option<RecordStatus> {
        let status = match self.try_recv()? {
            Ok(record) => {
                funnel_info!("Simulation recorded id={}", record.id);
                RecordStatus::Stored { id: record.id }
            }
            Err(err) => {
                funnel_warn!("Simulation recorder failed: {}", err);
                RecordStatus::Failed {
                    reason: err.to_string(),
                }
            }
        };
        Some(status)
    }
}
