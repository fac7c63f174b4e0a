use crate::{Effect, FunnelState, Msg, SimulationRequest, Step, TargetGender};

/// Pure update function: applies a message to state and returns any effects.
///
/// Messages that do not belong to the current step are ignored, and so are
/// timer messages from a phase the session has already left.
pub fn update(mut state: FunnelState, msg: Msg) -> (FunnelState, Vec<Effect>) {
    let effects = match msg {
        Msg::TargetSelected(gender) => {
            if state.step() == Step::Initial {
                state.select_target(gender);
            }
            Vec::new()
        }
        Msg::PhoneInputChanged(raw) => {
            // The number is frozen once the session leaves the input step.
            if state.step() == Step::Input {
                state.set_phone_input(raw);
            }
            Vec::new()
        }
        Msg::SubmitClicked => {
            if state.step() != Step::Input {
                return (state, Vec::new());
            }
            match state.validate_input() {
                Err(err) => {
                    state.reject_input(&err);
                    Vec::new()
                }
                Ok(digits) => {
                    let request = SimulationRequest {
                        gender: state.target_gender().unwrap_or(TargetGender::Unknown),
                        phone_number: digits.clone(),
                        step: Step::Processing.as_str().to_string(),
                    };
                    let phase = state.enter_processing(digits);
                    vec![
                        Effect::RecordSimulation(request),
                        Effect::StartProgress {
                            phase,
                            interval: state.settings().tick_interval,
                        },
                    ]
                }
            }
        }
        Msg::ProgressTick { phase, elapsed } => {
            if !state.is_live_phase(phase) || state.completion_notified() {
                return (state, Vec::new());
            }
            if state.advance_progress(elapsed) {
                vec![
                    Effect::StopProgress { phase },
                    Effect::ScheduleCompletion {
                        phase,
                        delay: state.settings().completion_delay,
                    },
                ]
            } else {
                Vec::new()
            }
        }
        Msg::CompletionDelayElapsed { phase } => {
            if state.is_live_phase(phase) && state.completion_notified() {
                state.set_step(Step::Result);
            }
            Vec::new()
        }
        Msg::ViewReportClicked => {
            if state.step() == Step::Result {
                state.set_step(Step::LockedReport);
            }
            Vec::new()
        }
        Msg::OfferClicked => match (state.step(), state.settings().offer_url.clone()) {
            (Step::LockedReport, Some(url)) => vec![Effect::OpenOffer { url }],
            _ => Vec::new(),
        },
        Msg::RecorderFinished(status) => {
            state.set_record_status(status);
            Vec::new()
        }
        Msg::NoOp => Vec::new(),
    };

    (state, effects)
}
