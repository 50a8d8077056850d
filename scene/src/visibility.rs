use std::time::{Duration, Instant};

use anyhow::{Result, bail};
use log::{debug, info};
use serde::{Deserialize, Serialize};
use wand_input::GestureLabel;

pub const DEFAULT_RESTORE_DELAY: Duration = Duration::from_secs(2);

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SceneConfig {
    /// Object names, indexed by the gesture ordinal.
    pub objects: Vec<String>,
    pub restore_delay_secs: f64,
}

impl Default for SceneConfig {
    fn default() -> Self {
        Self {
            objects: Vec::new(),
            restore_delay_secs: DEFAULT_RESTORE_DELAY.as_secs_f64(),
        }
    }
}

impl SceneConfig {
    pub fn restore_delay(&self) -> Result<Duration> {
        Duration::try_from_secs_f64(self.restore_delay_secs).map_err(|e| {
            anyhow::anyhow!(
                "restore_delay_secs must be a non-negative number of seconds, was {}: {e}",
                self.restore_delay_secs
            )
        })
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SceneObject {
    pub name: String,
    pub visible: bool,
}

#[derive(Debug, Clone, Copy)]
struct PendingRestore {
    index: usize,
    /// `None` until the first tick after the object was hidden.
    due: Option<Instant>,
}

/// Objects that get hidden by a gesture and shown again after a delay.
#[derive(Debug)]
pub struct SceneObjects {
    objects: Vec<SceneObject>,
    restore_delay: Duration,
    /// The time of the most recent tick.
    clock: Option<Instant>,
    pending: Vec<PendingRestore>,
}

impl SceneObjects {
    pub fn new(names: impl IntoIterator<Item = impl Into<String>>, restore_delay: Duration) -> Self {
        Self {
            objects: names
                .into_iter()
                .map(|name| SceneObject {
                    name: name.into(),
                    visible: true,
                })
                .collect(),
            restore_delay,
            clock: None,
            pending: Vec::new(),
        }
    }

    pub fn from_config(config: &SceneConfig) -> Result<Self> {
        Ok(Self::new(config.objects.iter().cloned(), config.restore_delay()?))
    }

    pub fn objects(&self) -> &[SceneObject] {
        &self.objects
    }

    pub fn is_visible(&self, index: usize) -> Option<bool> {
        self.objects.get(index).map(|o| o.visible)
    }

    /// Hides the object the gesture refers to. Unrecognized gestures are ignored.
    ///
    /// An index outside of the configured objects is a configuration error.
    pub fn on_gesture(&mut self, label: GestureLabel) -> Result<()> {
        let Some(index) = label.index() else {
            return Ok(());
        };
        let Some(object) = self.objects.get_mut(index) else {
            bail!(
                "Gesture {label} refers to object #{index}, but only {} objects are configured",
                self.objects.len()
            );
        };

        object.visible = false;
        info!("Hiding `{}` ({label})", object.name);
        self.pending.push(PendingRestore {
            index,
            due: self.clock.and_then(|now| now.checked_add(self.restore_delay)),
        });
        Ok(())
    }

    /// Advances the clock and shows all objects whose delay has passed.
    ///
    /// Returns the indices of the objects that got restored.
    pub fn tick(&mut self, now: Instant) -> Vec<usize> {
        self.clock = Some(now);
        let delay = self.restore_delay;

        let mut restored = Vec::new();
        self.pending.retain_mut(|pending| {
            // A delay beyond the clock's range never passes.
            let Some(due) = pending.due.or_else(|| now.checked_add(delay)) else {
                return true;
            };
            pending.due = Some(due);
            if due > now {
                return true;
            }
            restored.push(pending.index);
            false
        });

        for &index in &restored {
            let object = &mut self.objects[index];
            object.visible = true;
            debug!("Showing `{}` again", object.name);
        }
        restored
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn objects() -> SceneObjects {
        SceneObjects::new(["left", "right", "up", "down", "circle"], DEFAULT_RESTORE_DELAY)
    }

    fn secs(base: Instant, s: f64) -> Instant {
        base + Duration::from_secs_f64(s)
    }

    #[test]
    fn none_is_ignored() {
        let mut scene = objects();
        scene.on_gesture(GestureLabel::None).unwrap();
        assert!(scene.objects().iter().all(|o| o.visible));
    }

    #[test]
    fn gesture_hides_and_restores_after_delay() {
        let mut scene = objects();
        let t0 = Instant::now();
        scene.tick(t0);

        scene.on_gesture(GestureLabel::Up).unwrap();
        assert_eq!(scene.is_visible(2), Some(false));
        assert_eq!(scene.is_visible(0), Some(true));

        assert!(scene.tick(secs(t0, 1.9)).is_empty());
        assert_eq!(scene.is_visible(2), Some(false));
        assert_eq!(scene.tick(secs(t0, 2.0)), [2]);
        assert_eq!(scene.is_visible(2), Some(true));
    }

    #[test]
    fn delay_starts_at_next_tick_without_a_clock() {
        let mut scene = objects();
        let t0 = Instant::now();
        scene.on_gesture(GestureLabel::Circle).unwrap();

        assert!(scene.tick(t0).is_empty());
        assert!(scene.tick(secs(t0, 1.0)).is_empty());
        assert_eq!(scene.tick(secs(t0, 2.5)), [4]);
    }

    #[test]
    fn unreachable_restore_delay_keeps_the_object_hidden() {
        let mut scene = SceneObjects::new(["only"], Duration::MAX);
        let t0 = Instant::now();
        scene.tick(t0);
        scene.on_gesture(GestureLabel::Left).unwrap();
        assert!(scene.tick(secs(t0, 10.0)).is_empty());
        assert_eq!(scene.is_visible(0), Some(false));
    }

    #[test]
    fn out_of_range_index_is_an_error() {
        let mut scene = SceneObjects::new(["only"], DEFAULT_RESTORE_DELAY);
        assert!(scene.on_gesture(GestureLabel::Left).is_ok());
        let err = scene.on_gesture(GestureLabel::Right).unwrap_err();
        assert!(err.to_string().contains("#1"));
        assert_eq!(scene.is_visible(0), Some(false));
    }

    #[test]
    fn config_defaults() {
        let config = SceneConfig::default();
        assert_eq!(config.restore_delay().unwrap(), DEFAULT_RESTORE_DELAY);
        let negative = SceneConfig {
            restore_delay_secs: -1.0,
            ..Default::default()
        };
        assert!(negative.restore_delay().is_err());
        assert!(SceneObjects::from_config(&negative).is_err());
    }
}
