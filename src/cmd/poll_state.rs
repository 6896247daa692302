use std::time::Duration;
use log::warn;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PollState {
    Idle,
    Fetching,
    RetryScheduled,
    /// Terminal: the server refused our credentials.
    Stopped,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PollEvent {
    TimerFire,
    Success,
    AuthFailure,
    OtherFailure,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PollTiming {
    pub update_interval: Duration,
    pub retry_delay: Duration,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Transition {
    pub state: PollState,
    /// When to fire the next timer, `None` when no timer should be armed.
    pub next_fire: Option<Duration>,
}

impl PollState {
    pub fn on(self, event: PollEvent, timing: &PollTiming) -> Transition {
        use PollEvent::*;
        use PollState::*;

        let (state, next_fire) = match (self, event) {
            (Stopped, _) => (Stopped, None),
            (Idle | RetryScheduled, TimerFire) => (Fetching, None),
            (Fetching, Success) => (Idle, Some(timing.update_interval)),
            (Fetching, OtherFailure) => (RetryScheduled, Some(timing.retry_delay)),
            (Fetching, AuthFailure) => (Stopped, None),
            (state, event) => {
                warn!("Ignoring poll event {event:?} in state {state:?}");
                (state, None)
            }
        };
        Transition { state, next_fire }
    }
}
