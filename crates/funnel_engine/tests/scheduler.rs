use std::time::Duration;

use funnel_engine::{ManualClock, Scheduler, TimerEvent, TimerQueue};

const TICK: TimerEvent = TimerEvent::ProgressTick { phase: 1 };
const DONE: TimerEvent = TimerEvent::CompletionDelay { phase: 1 };

fn ms(millis: u64) -> Duration {
    Duration::from_millis(millis)
}

#[test]
fn repeating_timer_fires_each_interval() {
    let clock = ManualClock::new();
    let mut queue = TimerQueue::new(clock.clone());
    queue.schedule_repeating(ms(100), TICK);

    assert_eq!(queue.pop_due(), None);
    clock.advance(ms(99));
    assert_eq!(queue.pop_due(), None);
    clock.advance(ms(1));
    assert_eq!(queue.pop_due(), Some(TICK));
    assert_eq!(queue.pop_due(), None);
    clock.advance(ms(100));
    assert_eq!(queue.pop_due(), Some(TICK));
    assert_eq!(queue.next_deadline(), Some(ms(300)));
}

#[test]
fn missed_periods_collapse_into_one_firing() {
    let clock = ManualClock::new();
    let mut queue = TimerQueue::new(clock.clone());
    queue.schedule_repeating(ms(80), TICK);

    clock.advance(ms(1_000));
    assert_eq!(queue.pop_due(), Some(TICK));
    assert_eq!(queue.pop_due(), None);
    assert_eq!(queue.next_deadline(), Some(ms(1_040)));
}

#[test]
fn one_shot_fires_once_and_is_removed() {
    let clock = ManualClock::new();
    let mut queue = TimerQueue::new(clock.clone());
    queue.schedule_once(ms(1_000), DONE);
    assert_eq!(queue.pending(), 1);

    clock.advance(ms(5_000));
    assert_eq!(queue.pop_due(), Some(DONE));
    assert_eq!(queue.pop_due(), None);
    assert_eq!(queue.pending(), 0);
}

#[test]
fn due_timers_pop_in_deadline_order() {
    let clock = ManualClock::new();
    let mut queue = TimerQueue::new(clock.clone());
    queue.schedule_once(ms(300), DONE);
    queue.schedule_repeating(ms(200), TICK);

    clock.advance(ms(300));
    assert_eq!(queue.pop_due(), Some(TICK));
    assert_eq!(queue.pop_due(), Some(DONE));
    assert_eq!(queue.pop_due(), None);
}

#[test]
fn cancelled_timer_never_fires() {
    let clock = ManualClock::new();
    let mut queue = TimerQueue::new(clock.clone());
    let tick = queue.schedule_repeating(ms(100), TICK);
    let done = queue.schedule_once(ms(100), DONE);

    clock.advance(ms(100));
    queue.cancel(tick);
    assert_eq!(queue.pop_due(), Some(DONE));
    assert_eq!(queue.pop_due(), None);

    // Cancelling twice, or a token that already fired, is harmless.
    queue.cancel(tick);
    queue.cancel(done);
    queue.cancel(9_999);
    assert_eq!(queue.pending(), 0);
}

#[test]
fn tokens_are_unique() {
    let mut queue = TimerQueue::new(ManualClock::new());
    let a = queue.schedule_once(ms(1), DONE);
    queue.cancel(a);
    let b = queue.schedule_once(ms(1), DONE);
    assert_ne!(a, b);
}
