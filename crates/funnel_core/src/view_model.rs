use crate::{RecordStatus, Step, TargetGender};

/// Snapshot polled by the presentation layer after each update.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct FunnelViewModel {
    pub step: Step,
    pub target_gender: Option<TargetGender>,
    pub phone_input: String,
    pub target_phone: Option<String>,
    pub can_submit: bool,
    pub validation_message: Option<String>,
    /// Failed submits so far; bumps even when the message text repeats.
    pub rejections: u32,
    pub progress_percent: f64,
    pub revealed_lines: Vec<String>,
    pub script_len: usize,
    pub record_status: Option<RecordStatus>,
    pub offer_available: bool,
    pub dirty: bool,
}
