//! Timer bookkeeping behind a pluggable clock.
//!
//! The controller never sleeps. It arms timers here and later pulls due
//! firings one at a time with [`Scheduler::pop_due`], so a timer cancelled by
//! an earlier firing in the same pump never fires. Tests drive a
//! [`ManualClock`]; the app drives a [`SystemClock`].
use std::cell::Cell;
use std::collections::BTreeMap;
use std::rc::Rc;
use std::time::{Duration, Instant};

use funnel_core::PhaseId;

pub type TimerToken = u64;

const MIN_INTERVAL: Duration = Duration::from_millis(1);

/// What a timer delivers when it fires.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TimerEvent {
    ProgressTick { phase: PhaseId },
    CompletionDelay { phase: PhaseId },
}

/// Monotonic time since an arbitrary origin.
pub trait Clock {
    fn now(&self) -> Duration;
}

#[derive(Debug, Clone, Copy)]
pub struct SystemClock {
    origin: Instant,
}

impl Default for SystemClock {
    fn default() -> Self {
        Self {
            origin: Instant::now(),
        }
    }
}

impl Clock for SystemClock {
    fn now(&self) -> Duration {
        self.origin.elapsed()
    }
}

/// Virtual clock. Clones share the same reading, so a test keeps one clone
/// and hands the other to the scheduler.
#[derive(Debug, Clone, Default)]
pub struct ManualClock {
    now: Rc<Cell<Duration>>,
}

impl ManualClock {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn advance(&self, by: Duration) {
        self.now.set(self.now.get().saturating_add(by));
    }

    pub fn set(&self, at: Duration) {
        self.now.set(at);
    }
}

impl Clock for ManualClock {
    fn now(&self) -> Duration {
        self.now.get()
    }
}

pub trait Scheduler {
    fn now(&self) -> Duration;

    /// Fires `event` every `interval`, first after one interval.
    fn schedule_repeating(&mut self, interval: Duration, event: TimerEvent) -> TimerToken;

    /// Fires `event` once after `delay`.
    fn schedule_once(&mut self, delay: Duration, event: TimerEvent) -> TimerToken;

    /// Cancels a timer. Unknown or already-cleared tokens are ignored.
    fn cancel(&mut self, token: TimerToken);

    /// Removes and returns the earliest due firing, if any.
    fn pop_due(&mut self) -> Option<TimerEvent>;

    fn pending(&self) -> usize;

    fn next_deadline(&self) -> Option<Duration>;
}

#[derive(Debug, Clone)]
struct Timer {
    deadline: Duration,
    interval: Option<Duration>,
    event: TimerEvent,
}

#[derive(Debug)]
pub struct TimerQueue<C: Clock> {
    clock: C,
    next_token: TimerToken,
    timers: BTreeMap<TimerToken, Timer>,
}

impl<C: Clock> TimerQueue<C> {
    pub fn new(clock: C) -> Self {
        Self {
            clock,
            next_token: 1,
            timers: BTreeMap::new(),
        }
    }

    pub fn clock(&self) -> &C {
        &self.clock
    }

    fn insert(&mut self, timer: Timer) -> TimerToken {
        let token = self.next_token;
        self.next_token += 1;
        self.timers.insert(token, timer);
        token
    }
}

impl<C: Clock> Scheduler for TimerQueue<C> {
    fn now(&self) -> Duration {
        self.clock.now()
    }

    fn schedule_repeating(&mut self, interval: Duration, event: TimerEvent) -> TimerToken {
        let interval = interval.max(MIN_INTERVAL);
        let deadline = self.clock.now().saturating_add(interval);
        self.insert(Timer {
            deadline,
            interval: Some(interval),
            event,
        })
    }

    fn schedule_once(&mut self, delay: Duration, event: TimerEvent) -> TimerToken {
        let deadline = self.clock.now().saturating_add(delay);
        self.insert(Timer {
            deadline,
            interval: None,
            event,
        })
    }

    fn cancel(&mut self, token: TimerToken) {
        self.timers.remove(&token);
    }

    fn pop_due(&mut self) -> Option<TimerEvent> {
        let now = self.clock.now();
        // Earliest deadline first; ties go to the older timer.
        let token = self
            .timers
            .iter()
            .filter(|(_, timer)| timer.deadline <= now)
            .min_by_key(|(token, timer)| (timer.deadline, **token))
            .map(|(token, _)| *token)?;

        let timer = self.timers.get_mut(&token)?;
        let event = timer.event;
        match timer.interval {
            Some(interval) => {
                // Missed periods collapse into this one firing.
                let missed = (now - timer.deadline).as_nanos() / interval.as_nanos();
                let steps = u32::try_from(missed + 1).unwrap_or(u32::MAX);
                timer.deadline = timer.deadline.saturating_add(interval.saturating_mul(steps));
            }
            None => {
                self.timers.remove(&token);
            }
        }
        Some(event)
    }

    fn pending(&self) -> usize {
        self.timers.len()
    }

    fn next_deadline(&self) -> Option<Duration> {
        self.timers.values().map(|timer| timer.deadline).min()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn zero_interval_is_clamped() {
        let clock = ManualClock::new();
        let mut queue = TimerQueue::new(clock.clone());
        queue.schedule_repeating(Duration::ZERO, TimerEvent::ProgressTick { phase: 1 });
        assert_eq!(queue.pop_due(), None);
        clock.advance(MIN_INTERVAL);
        assert_eq!(queue.pop_due(), Some(TimerEvent::ProgressTick { phase: 1 }));
    }

    #[test]
    fn system_clock_moves_forward() {
        let clock = SystemClock::default();
        let a = clock.now();
        let b = clock.now();
        assert!(b >= a);
    }
}
