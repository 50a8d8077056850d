use std::{fs, path::Path, time::Duration};

use anyhow::{Context, Result, bail};
use serde::Deserialize;
use wand_input::{Vector3, WandConfig};
use wand_scene::SceneConfig;

/// A recorded sequence of wand input events.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct Trace {
    #[serde(default)]
    pub wand: WandConfig,
    #[serde(default)]
    pub scene: SceneConfig,
    #[serde(default)]
    pub events: Vec<TraceEvent>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct TraceEvent {
    /// Seconds since the start of the trace.
    pub time: f64,
    pub kind: TraceEventKind,
    /// The tracked position from this event on.
    #[serde(default)]
    pub position: Option<[f64; 3]>,
}

impl TraceEvent {
    pub fn position(&self) -> Option<Vector3> {
        self.position.map(Vector3::from)
    }

    /// The time since the start of the trace.
    pub fn offset(&self) -> Result<Duration> {
        Duration::try_from_secs_f64(self.time)
            .with_context(|| format!("Event time {} is not a valid number of seconds", self.time))
    }
}

#[derive(Debug, Copy, Clone, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TraceEventKind {
    HoldStart,
    Tick,
    HoldEnd,
}

impl Trace {
    pub fn load(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let text = fs::read_to_string(path)
            .with_context(|| format!("Failed to read trace `{}`", path.display()))?;
        Self::from_toml_str(&text).with_context(|| format!("Invalid trace `{}`", path.display()))
    }

    pub fn from_toml_str(text: &str) -> Result<Self> {
        let trace: Self = toml::from_str(text)?;
        trace.validate()?;
        Ok(trace)
    }

    fn validate(&self) -> Result<()> {
        self.wand.validate()?;
        self.scene.restore_delay()?;

        let mut previous = Duration::ZERO;
        for (i, event) in self.events.iter().enumerate() {
            let offset = event.offset().with_context(|| format!("Event #{i}"))?;
            if offset < previous {
                bail!(
                    "Event #{i} at {} is out of order, times must be non-decreasing",
                    event.time
                );
            }
            previous = offset;
        }
        Ok(())
    }
}
