use std::time::Duration;

use crate::{PhaseId, TargetGender};

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Msg {
    /// User picked the target on the initial screen.
    TargetSelected(TargetGender),
    /// User edited the phone input box (raw text, mask characters included).
    PhoneInputChanged(String),
    /// User submitted the phone input.
    SubmitClicked,
    /// Recurring progress tick; `elapsed` is measured from the phase start.
    ProgressTick { phase: PhaseId, elapsed: Duration },
    /// The trailing delay after full progress has run out.
    CompletionDelayElapsed { phase: PhaseId },
    /// User asked to see the report from the result screen.
    ViewReportClicked,
    /// User clicked the offer link on the locked report.
    OfferClicked,
    /// The recorder call settled. Telemetry only.
    RecorderFinished(RecordStatus),
    /// Fallback for placeholder wiring.
    NoOp,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RecordStatus {
    Stored { id: i64 },
    Failed { reason: String },
}
