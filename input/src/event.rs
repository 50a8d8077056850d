use std::time::Instant;

use crate::{GestureLabel, WandInput};

/// An input event as delivered by a host adapter.
#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub enum WandEvent {
    HoldStarted(Instant),
    Tick(Instant),
    HoldEnded(Instant),
}

impl WandEvent {
    pub fn time(&self) -> Instant {
        use WandEvent::*;
        match *self {
            HoldStarted(time) | Tick(time) | HoldEnded(time) => time,
        }
    }
}

/// Feeds one event into a [`WandInput`].
///
/// Returns the gesture if the event completed one.
pub fn dispatch(input: &mut impl WandInput, event: WandEvent) -> Option<GestureLabel> {
    match event {
        WandEvent::HoldStarted(_) => {
            input.hold_started();
            None
        }
        WandEvent::Tick(now) => {
            input.tick(now);
            None
        }
        WandEvent::HoldEnded(_) => input.hold_ended(),
    }
}
