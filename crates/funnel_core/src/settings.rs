use std::time::Duration;

use crate::DEFAULT_MIN_PHONE_DIGITS;

/// Tunables of one funnel. Fixed for the lifetime of a session.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FunnelSettings {
    /// Wall-clock length `D` of the processing phase.
    pub processing_duration: Duration,
    /// Polling cadence of the progress ticker.
    pub tick_interval: Duration,
    /// Trailing pause between full progress and the result screen.
    pub completion_delay: Duration,
    pub min_phone_digits: usize,
    /// Ordered log lines revealed during processing.
    pub script: Vec<String>,
    /// External link for the locked report; `None` disables the leaf action.
    pub offer_url: Option<url::Url>,
}

impl Default for FunnelSettings {
    fn default() -> Self {
        Self {
            processing_duration: Duration::from_secs(15),
            tick_interval: Duration::from_millis(80),
            completion_delay: Duration::from_secs(1),
            min_phone_digits: DEFAULT_MIN_PHONE_DIGITS,
            script: default_script(),
            offer_url: None,
        }
    }
}

pub fn default_script() -> Vec<String> {
    [
        "Starting session...",
        "Loading configuration...",
        "Checking input format...",
        "Normalizing number...",
        "Preparing workspace...",
        "Queueing analysis steps...",
        "Running step 1 of 4...",
        "Running step 2 of 4...",
        "Running step 3 of 4...",
        "Running step 4 of 4...",
        "Collecting output...",
        "Formatting report...",
        "Done.",
    ]
    .into_iter()
    .map(ToOwned::to_owned)
    .collect()
}
