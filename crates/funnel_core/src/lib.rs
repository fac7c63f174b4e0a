//! Funnel core: pure state machine, progress model and view-model helpers.
mod effect;
mod msg;
mod progress;
mod settings;
mod state;
mod update;
mod validate;
mod view_model;

pub use effect::{Effect, SimulationRequest};
pub use msg::{Msg, RecordStatus};
pub use progress::{progress_percent, revealed_count};
pub use settings::{default_script, FunnelSettings};
pub use state::{FunnelState, PhaseId, Step, TargetGender};
pub use update::update;
pub use validate::{strip_non_digits, validate_phone, ValidationError, DEFAULT_MIN_PHONE_DIGITS};
pub use view_model::FunnelViewModel;
