use std::time::Duration;

use crate::{PhaseId, TargetGender};

/// Side effects requested by [`crate::update`]; executed by the engine.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Effect {
    /// Best-effort, fire-and-forget call to the Simulation Recorder.
    RecordSimulation(SimulationRequest),
    /// Start the recurring progress ticker for a processing phase.
    StartProgress { phase: PhaseId, interval: Duration },
    /// Stop the recurring progress ticker of a processing phase.
    StopProgress { phase: PhaseId },
    /// Arm the one-shot trailing delay before `processing -> result`.
    ScheduleCompletion { phase: PhaseId, delay: Duration },
    /// Navigate to the external offer. Leaf action, no state change.
    OpenOffer { url: url::Url },
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SimulationRequest {
    pub gender: TargetGender,
    pub phone_number: String,
    pub step: String,
}
