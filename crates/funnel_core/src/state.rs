use std::time::Duration;

use crate::progress::{progress_percent, revealed_count};
use crate::view_model::FunnelViewModel;
use crate::{validate_phone, FunnelSettings, RecordStatus, ValidationError};

/// Counter identifying one activation of the processing step.
pub type PhaseId = u32;

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Default)]
pub enum Step {
    #[default]
    Initial,
    Input,
    Processing,
    Result,
    LockedReport,
}

impl Step {
    pub fn as_str(self) -> &'static str {
        match self {
            Step::Initial => "initial",
            Step::Input => "input",
            Step::Processing => "processing",
            Step::Result => "result",
            Step::LockedReport => "locked_report",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TargetGender {
    Male,
    Female,
    Unknown,
}

impl TargetGender {
    pub fn as_str(self) -> &'static str {
        match self {
            TargetGender::Male => "male",
            TargetGender::Female => "female",
            TargetGender::Unknown => "unknown",
        }
    }
}

/// The funnel session. Created fresh per visit, mutated only through
/// [`crate::update`], discarded on exit.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct FunnelState {
    settings: FunnelSettings,
    step: Step,
    target_gender: Option<TargetGender>,
    phone_input: String,
    target_phone: Option<String>,
    validation_message: Option<String>,
    rejections: u32,
    phase: PhaseId,
    progress_percent: f64,
    revealed_lines: usize,
    completion_notified: bool,
    record_status: Option<RecordStatus>,
    dirty: bool,
}

impl FunnelState {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_settings(settings: FunnelSettings) -> Self {
        Self {
            settings,
            ..Self::default()
        }
    }

    pub fn settings(&self) -> &FunnelSettings {
        &self.settings
    }

    pub fn step(&self) -> Step {
        self.step
    }

    pub fn target_gender(&self) -> Option<TargetGender> {
        self.target_gender
    }

    pub fn target_phone(&self) -> Option<&str> {
        self.target_phone.as_deref()
    }

    pub fn phase(&self) -> PhaseId {
        self.phase
    }

    pub fn progress_percent(&self) -> f64 {
        self.progress_percent
    }

    pub fn revealed_lines(&self) -> &[String] {
        &self.settings.script[..self.revealed_lines]
    }

    pub fn completion_notified(&self) -> bool {
        self.completion_notified
    }

    pub fn view(&self) -> FunnelViewModel {
        FunnelViewModel {
            step: self.step,
            target_gender: self.target_gender,
            phone_input: self.phone_input.clone(),
            target_phone: self.target_phone.clone(),
            can_submit: self.step == Step::Input
                && validate_phone(&self.phone_input, self.settings.min_phone_digits).is_ok(),
            validation_message: self.validation_message.clone(),
            rejections: self.rejections,
            progress_percent: self.progress_percent,
            revealed_lines: self.revealed_lines().to_vec(),
            script_len: self.settings.script.len(),
            record_status: self.record_status.clone(),
            offer_available: self.step == Step::LockedReport && self.settings.offer_url.is_some(),
            dirty: self.dirty,
        }
    }

    /// Returns whether anything changed since the last call, and clears the flag.
    pub fn consume_dirty(&mut self) -> bool {
        std::mem::take(&mut self.dirty)
    }

    pub(crate) fn select_target(&mut self, gender: TargetGender) {
        self.target_gender = Some(gender);
        self.step = Step::Input;
        self.dirty = true;
    }

    pub(crate) fn set_phone_input(&mut self, raw: String) {
        self.phone_input = raw;
        self.validation_message = None;
        self.dirty = true;
    }

    pub(crate) fn validate_input(&self) -> Result<String, ValidationError> {
        validate_phone(&self.phone_input, self.settings.min_phone_digits)
    }

    pub(crate) fn reject_input(&mut self, err: &ValidationError) {
        self.validation_message = Some(err.to_string());
        self.rejections = self.rejections.wrapping_add(1);
        self.dirty = true;
    }

    /// Freezes the phone and opens a new processing phase with progress and
    /// revealed lines reset together.
    pub(crate) fn enter_processing(&mut self, digits: String) -> PhaseId {
        self.target_phone = Some(digits);
        self.validation_message = None;
        self.phase = self.phase.wrapping_add(1);
        self.progress_percent = 0.0;
        self.revealed_lines = 0;
        self.completion_notified = false;
        self.step = Step::Processing;
        self.dirty = true;
        self.phase
    }

    /// Applies a tick of the current phase. Returns `true` the one time
    /// progress reaches 100.
    pub(crate) fn advance_progress(&mut self, elapsed: Duration) -> bool {
        let pct = progress_percent(elapsed, self.settings.processing_duration)
            .max(self.progress_percent);
        let revealed = revealed_count(pct, self.settings.script.len()).max(self.revealed_lines);
        if pct != self.progress_percent || revealed != self.revealed_lines {
            self.progress_percent = pct;
            self.revealed_lines = revealed;
            self.dirty = true;
        }
        if pct >= 100.0 && !self.completion_notified {
            self.completion_notified = true;
            return true;
        }
        false
    }

    pub(crate) fn is_live_phase(&self, phase: PhaseId) -> bool {
        self.step == Step::Processing && self.phase == phase
    }

    pub(crate) fn set_step(&mut self, step: Step) {
        self.step = step;
        self.dirty = true;
    }

    pub(crate) fn set_record_status(&mut self, status: RecordStatus) {
        self.record_status = Some(status);
        self.dirty = true;
    }
}
