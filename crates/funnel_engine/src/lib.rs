//! Funnel engine: timers, the Simulation Recorder client and the controller
//! that executes core effects.
mod controller;
mod handle;
mod recorder;
mod scheduler;
mod types;

pub use controller::FunnelController;
pub use handle::{RecordDispatch, RecorderHandle};
pub use recorder::{HttpRecorder, MemoryRecorder, Recorder, RecorderSettings};
pub use scheduler::{
    Clock, ManualClock, Scheduler, SystemClock, TimerEvent, TimerQueue, TimerToken,
};
pub use types::{InsertSimulation, RecordError, SimulationRecord};
