use std::time::Duration;

use funnel_core::{
    update, Effect, FunnelSettings, FunnelState, FunnelViewModel, Msg, PhaseId, Step,
};
use funnel_logging::{funnel_debug, funnel_info, funnel_trace, funnel_warn};

use crate::{RecordDispatch, Scheduler, TimerEvent, TimerToken};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Lifecycle {
    Created,
    Live,
    Disposed,
}

/// Owns one funnel session, its timers and its recorder seam.
///
/// Everything runs on the caller's thread: user actions go through
/// [`FunnelController::handle`], elapsed time through [`FunnelController::pump`].
/// After [`FunnelController::dispose`] no timer survives and no message
/// reaches the session.
pub struct FunnelController<S: Scheduler, D: RecordDispatch> {
    state: FunnelState,
    scheduler: S,
    dispatch: D,
    lifecycle: Lifecycle,
    ticker: Option<(PhaseId, TimerToken)>,
    completion: Option<TimerToken>,
    phase_started_at: Duration,
    pending_offer: Option<url::Url>,
}

impl<S: Scheduler, D: RecordDispatch> FunnelController<S, D> {
    pub fn new(settings: FunnelSettings, scheduler: S, dispatch: D) -> Self {
        Self {
            state: FunnelState::with_settings(settings),
            scheduler,
            dispatch,
            lifecycle: Lifecycle::Created,
            ticker: None,
            completion: None,
            phase_started_at: Duration::ZERO,
            pending_offer: None,
        }
    }

    /// Starts the session. Calling it again is a no-op; a disposed
    /// controller stays disposed.
    pub fn init(&mut self) {
        self.stamp_clock();
        match self.lifecycle {
            Lifecycle::Created => {
                self.lifecycle = Lifecycle::Live;
                funnel_info!("Funnel session started at step {}", self.state.step().as_str());
            }
            Lifecycle::Live => {}
            Lifecycle::Disposed => funnel_warn!("init() on a disposed funnel session ignored"),
        }
    }

    /// Cancels every pending timer and detaches the session.
    pub fn dispose(&mut self) {
        if self.lifecycle == Lifecycle::Disposed {
            return;
        }
        self.stamp_clock();
        self.cancel_timers();
        self.lifecycle = Lifecycle::Disposed;
        funnel_info!("Funnel session disposed at step {}", self.state.step().as_str());
    }

    pub fn is_live(&self) -> bool {
        self.lifecycle == Lifecycle::Live
    }

    pub fn is_disposed(&self) -> bool {
        self.lifecycle == Lifecycle::Disposed
    }

    pub fn state(&self) -> &FunnelState {
        &self.state
    }

    pub fn view(&self) -> FunnelViewModel {
        self.state.view()
    }

    pub fn consume_dirty(&mut self) -> bool {
        self.state.consume_dirty()
    }

    pub fn scheduler(&self) -> &S {
        &self.scheduler
    }

    /// The offer link requested by the last `OfferClicked`, if any.
    pub fn take_offer(&mut self) -> Option<url::Url> {
        self.pending_offer.take()
    }

    /// Applies one user or timer message to the session.
    pub fn handle(&mut self, msg: Msg) {
        if !self.is_live() {
            funnel_debug!("Dropping {:?}: session is not live", msg);
            return;
        }
        self.stamp_clock();
        let before = self.state.step();
        let state = std::mem::take(&mut self.state);
        let (state, effects) = update(state, msg);
        self.state = state;

        let after = self.state.step();
        if after != before {
            funnel_info!("Step {} -> {}", before.as_str(), after.as_str());
        }
        for effect in effects {
            self.run_effect(effect);
        }
        if before == Step::Processing && after != Step::Processing {
            self.cancel_timers();
        }
    }

    /// Delivers every due timer firing and every settled recorder call.
    /// Returns the number of messages delivered.
    pub fn pump(&mut self) -> usize {
        let mut delivered = 0;
        while self.is_live() {
            self.stamp_clock();
            let Some(event) = self.scheduler.pop_due() else {
                break;
            };
            let msg = self.timer_msg(event);
            funnel_trace!("Timer fired: {:?}", event);
            self.handle(msg);
            delivered += 1;
        }
        while self.is_live() {
            let Some(status) = self.dispatch.poll_outcome() else {
                break;
            };
            self.handle(Msg::RecorderFinished(status));
            delivered += 1;
        }
        delivered
    }

    fn timer_msg(&mut self, event: TimerEvent) -> Msg {
        match event {
            TimerEvent::ProgressTick { phase } => Msg::ProgressTick {
                phase,
                elapsed: self.scheduler.now().saturating_sub(self.phase_started_at),
            },
            TimerEvent::CompletionDelay { phase } => {
                self.completion = None;
                Msg::CompletionDelayElapsed { phase }
            }
        }
    }

    fn run_effect(&mut self, effect: Effect) {
        match effect {
            Effect::RecordSimulation(request) => {
                funnel_info!(
                    "RecordSimulation gender={} digits={} step={}",
                    request.gender.as_str(),
                    request.phone_number.len(),
                    request.step
                );
                self.dispatch.dispatch(request);
            }
            Effect::StartProgress { phase, interval } => {
                self.stop_ticker();
                self.phase_started_at = self.scheduler.now();
                let token = self
                    .scheduler
                    .schedule_repeating(interval, TimerEvent::ProgressTick { phase });
                self.ticker = Some((phase, token));
                funnel_debug!("Progress ticker armed phase={} every {:?}", phase, interval);
            }
            Effect::StopProgress { phase } => {
                if matches!(self.ticker, Some((live, _)) if live == phase) {
                    self.stop_ticker();
                }
            }
            Effect::ScheduleCompletion { phase, delay } => {
                if let Some(token) = self.completion.take() {
                    self.scheduler.cancel(token);
                }
                let token = self
                    .scheduler
                    .schedule_once(delay, TimerEvent::CompletionDelay { phase });
                self.completion = Some(token);
                funnel_debug!("Completion armed phase={} after {:?}", phase, delay);
            }
            Effect::OpenOffer { url } => {
                funnel_info!("Offer requested: {}", url);
                self.pending_offer = Some(url);
            }
        }
    }

    fn stop_ticker(&mut self) {
        if let Some((_, token)) = self.ticker.take() {
            self.scheduler.cancel(token);
        }
    }

    fn cancel_timers(&mut self) {
        self.stop_ticker();
        if let Some(token) = self.completion.take() {
            self.scheduler.cancel(token);
        }
    }

    fn stamp_clock(&self) {
        let millis = u64::try_from(self.scheduler.now().as_millis()).unwrap_or(u64::MAX);
        funnel_logging::set_clock_millis(millis);
    }
}

impl<S: Scheduler, D: RecordDispatch> Drop for FunnelController<S, D> {
    fn drop(&mut self) {
        self.dispose();
    }
}
