use std::{
    fmt, mem,
    time::{Duration, Instant},
};

use anyhow::Result;
use log::{debug, info, warn};
use wand_geometry::Vector3;

use crate::{
    GestureLabel, GestureListeners, GesturePath, ListenerId, SamplePacing, WandConfig, classify,
};

/// Provides the current position of the tracked point.
pub trait PositionSource {
    fn position(&self) -> Vector3;
}

impl<F> PositionSource for F
where
    F: Fn() -> Vector3,
{
    fn position(&self) -> Vector3 {
        self()
    }
}

/// The interface a host adapter drives.
///
/// Calls are expected from one thread only and never overlap.
pub trait WandInput {
    /// The trigger got pressed.
    fn hold_started(&mut self);
    /// Called once per frame with the host's monotonic clock.
    fn tick(&mut self, now: Instant);
    /// The trigger got released or the input got canceled.
    ///
    /// Returns the gesture that was dispatched, `None` if no gesture was in progress.
    fn hold_ended(&mut self) -> Option<GestureLabel>;
}

/// Throttles sampling to a minimum interval.
#[derive(Debug, Clone)]
pub struct SampleTimer {
    pacing: SamplePacing,
    interval: Duration,
    /// The time of the last sample for [`SamplePacing::FromLastSample`], the grid point of the
    /// last sample for [`SamplePacing::FixedRate`]. `None` until the first sample.
    reference: Option<Instant>,
}

impl SampleTimer {
    pub fn new(pacing: SamplePacing, interval: Duration) -> Self {
        Self {
            pacing,
            interval,
            reference: None,
        }
    }

    pub fn reset(&mut self) {
        self.reference = None;
    }

    /// Returns `true` if a sample should be taken at `now` and advances the timer if so.
    ///
    /// A sample is taken once more than one interval passed since the reference.
    pub fn take_sample(&mut self, now: Instant) -> bool {
        let Some(reference) = self.reference else {
            self.reference = Some(now);
            return true;
        };
        if now.saturating_duration_since(reference) <= self.interval {
            return false;
        }
        self.reference = Some(match self.pacing {
            SamplePacing::FromLastSample => now,
            // Stay on the grid unless the host fell behind by more than one interval.
            SamplePacing::FixedRate => reference
                .checked_add(self.interval)
                .filter(|next| now.saturating_duration_since(*next) <= self.interval)
                .unwrap_or(now),
        });
        true
    }
}

#[derive(Debug)]
enum State {
    Idle,
    Holding { points: Vec<Vector3> },
}

/// Samples the tracked position while the trigger is held and classifies the path on release.
pub struct GestureSampler<P> {
    source: P,
    config: WandConfig,
    timer: SampleTimer,
    state: State,
    listeners: GestureListeners,
}

impl<P> fmt::Debug for GestureSampler<P> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("GestureSampler")
            .field("config", &self.config)
            .field("timer", &self.timer)
            .field("state", &self.state)
            .field("listeners", &self.listeners)
            .finish()
    }
}

impl<P: PositionSource> GestureSampler<P> {
    pub fn new(source: P, config: WandConfig) -> Result<Self> {
        config.validate()?;
        let timer = SampleTimer::new(config.pacing, config.sample_interval()?);
        Ok(Self {
            source,
            config,
            timer,
            state: State::Idle,
            listeners: GestureListeners::default(),
        })
    }

    pub fn is_holding(&self) -> bool {
        matches!(self.state, State::Holding { .. })
    }

    /// The points sampled so far in the current gesture. Empty while idle.
    pub fn points(&self) -> &[Vector3] {
        match &self.state {
            State::Idle => &[],
            State::Holding { points } => points,
        }
    }

    pub fn subscribe(&mut self, listener: impl FnMut(GestureLabel) + 'static) -> ListenerId {
        self.listeners.subscribe(listener)
    }

    pub fn unsubscribe(&mut self, id: ListenerId) -> bool {
        self.listeners.unsubscribe(id)
    }

    pub fn listeners_mut(&mut self) -> &mut GestureListeners {
        &mut self.listeners
    }
}

impl<P: PositionSource> WandInput for GestureSampler<P> {
    fn hold_started(&mut self) {
        if let State::Holding { points } = &self.state {
            debug!("Hold restarted, dropping {} samples", points.len());
        }
        self.timer.reset();
        self.state = State::Holding { points: Vec::new() };
    }

    fn tick(&mut self, now: Instant) {
        let State::Holding { points } = &mut self.state else {
            return;
        };
        if self.timer.take_sample(now) {
            points.push(self.source.position());
        }
    }

    fn hold_ended(&mut self) -> Option<GestureLabel> {
        let State::Holding { points } = mem::replace(&mut self.state, State::Idle) else {
            warn!("Hold ended without a hold in progress, ignored");
            return None;
        };

        let path = GesturePath::from(points);
        let label = classify(&path, &self.config.classifier);
        if label.is_recognized() {
            info!("Gesture {label} ({} samples)", path.len());
        } else {
            debug!("No gesture recognized ({} samples)", path.len());
        }

        if self.listeners.is_empty() {
            debug!("No listeners for gesture {label}");
        }
        self.listeners.dispatch(label);
        Some(label)
    }
}

#[cfg(test)]
mod tests {
    use std::{
        cell::{Cell, RefCell},
        rc::Rc,
    };

    use super::*;

    fn at(base: Instant, millis: u64) -> Instant {
        base + Duration::from_millis(millis)
    }

    /// A sampler whose position is controlled by the returned cell.
    fn sampler(
        config: WandConfig,
    ) -> (
        Rc<Cell<Vector3>>,
        GestureSampler<impl PositionSource>,
    ) {
        let position = Rc::new(Cell::new(Vector3::ZERO));
        let source = position.clone();
        let sampler = GestureSampler::new(move || source.get(), config).unwrap();
        (position, sampler)
    }

    fn recorded(sampler: &mut GestureSampler<impl PositionSource>) -> Rc<RefCell<Vec<GestureLabel>>> {
        let received = Rc::new(RefCell::new(Vec::new()));
        let sink = received.clone();
        sampler.subscribe(move |label| sink.borrow_mut().push(label));
        received
    }

    #[test]
    fn samples_are_throttled_from_the_last_sample() {
        let (_, mut sampler) = sampler(WandConfig::default());
        let t0 = Instant::now();
        sampler.hold_started();
        for millis in [0, 50, 120, 210] {
            sampler.tick(at(t0, millis));
        }
        // 210 is only 90ms after the sample at 120.
        assert_eq!(sampler.points().len(), 2);
        sampler.tick(at(t0, 221));
        assert_eq!(sampler.points().len(), 3);
    }

    #[test]
    fn exactly_one_interval_is_not_enough() {
        for pacing in [SamplePacing::FromLastSample, SamplePacing::FixedRate] {
            let mut timer = SampleTimer::new(pacing, Duration::from_millis(100));
            let t0 = Instant::now();
            assert!(timer.take_sample(t0));
            assert!(!timer.take_sample(at(t0, 100)), "{pacing:?}");
            assert!(timer.take_sample(at(t0, 101)), "{pacing:?}");
        }
    }

    #[test]
    fn invalid_config_is_rejected() {
        let huge = WandConfig {
            sample_interval_secs: 1e30,
            ..Default::default()
        };
        assert!(GestureSampler::new(|| Vector3::ZERO, huge).is_err());
        let zero = WandConfig {
            sample_interval_secs: 0.0,
            ..Default::default()
        };
        assert!(GestureSampler::new(|| Vector3::ZERO, zero).is_err());
    }

    #[test]
    fn fixed_rate_samples_on_a_grid() {
        let (_, mut sampler) = sampler(WandConfig {
            pacing: SamplePacing::FixedRate,
            ..Default::default()
        });
        let t0 = Instant::now();
        sampler.hold_started();
        for millis in [0, 50, 120, 210] {
            sampler.tick(at(t0, millis));
        }
        assert_eq!(sampler.points().len(), 3);
    }

    #[test]
    fn fixed_rate_does_not_burst_after_a_stall() {
        let mut timer = SampleTimer::new(SamplePacing::FixedRate, Duration::from_millis(100));
        let t0 = Instant::now();
        assert!(timer.take_sample(t0));
        assert!(timer.take_sample(at(t0, 550)));
        assert!(!timer.take_sample(at(t0, 560)));
        assert!(!timer.take_sample(at(t0, 650)));
        assert!(timer.take_sample(at(t0, 651)));
    }

    #[test]
    fn first_tick_after_hold_start_always_samples() {
        let (position, mut sampler) = sampler(WandConfig::default());
        let t0 = Instant::now();

        sampler.hold_started();
        sampler.tick(t0);
        sampler.hold_ended();

        // A new hold right after must not wait for the interval.
        position.set(Vector3::X);
        sampler.hold_started();
        sampler.tick(at(t0, 10));
        assert_eq!(sampler.points(), [Vector3::X]);
    }

    #[test]
    fn ticks_while_idle_are_ignored() {
        let (_, mut sampler) = sampler(WandConfig::default());
        sampler.tick(Instant::now());
        assert!(!sampler.is_holding());
        assert!(sampler.points().is_empty());
    }

    #[test]
    fn hold_start_clears_the_previous_gesture() {
        let (_, mut sampler) = sampler(WandConfig::default());
        let t0 = Instant::now();
        sampler.hold_started();
        sampler.tick(t0);
        sampler.tick(at(t0, 101));
        assert_eq!(sampler.points().len(), 2);

        sampler.hold_started();
        assert!(sampler.is_holding());
        assert!(sampler.points().is_empty());
    }

    #[test]
    fn empty_release_emits_none() {
        let (_, mut sampler) = sampler(WandConfig::default());
        let received = recorded(&mut sampler);

        sampler.hold_started();
        assert_eq!(sampler.hold_ended(), Some(GestureLabel::None));

        assert_eq!(*received.borrow(), [GestureLabel::None]);
        assert!(!sampler.is_holding());
    }

    #[test]
    fn release_without_hold_emits_nothing() {
        let (_, mut sampler) = sampler(WandConfig::default());
        let received = recorded(&mut sampler);
        assert_eq!(sampler.hold_ended(), None);
        assert!(received.borrow().is_empty());
    }

    #[test]
    fn swipe_right_is_dispatched_to_every_listener() {
        let (position, mut sampler) = sampler(WandConfig::default());
        let first = recorded(&mut sampler);
        let second = recorded(&mut sampler);
        let t0 = Instant::now();

        sampler.hold_started();
        for i in 0..4 {
            position.set(Vector3::new(5.0 * i as f64, 0.0, 0.0));
            sampler.tick(at(t0, 101 * i));
        }
        assert_eq!(sampler.hold_ended(), Some(GestureLabel::Right));

        assert_eq!(*first.borrow(), [GestureLabel::Right]);
        assert_eq!(*second.borrow(), [GestureLabel::Right]);
    }

    #[test]
    fn unsubscribed_listeners_are_not_called() {
        let (_, mut sampler) = sampler(WandConfig::default());
        let received = Rc::new(Cell::new(0));
        let counter = received.clone();
        let id = sampler.subscribe(move |_| counter.set(counter.get() + 1));

        sampler.hold_started();
        sampler.hold_ended();
        assert!(sampler.unsubscribe(id));
        sampler.hold_started();
        sampler.hold_ended();

        assert_eq!(received.get(), 1);
    }
}
