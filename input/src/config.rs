use std::{fs, path::Path, time::Duration};

use anyhow::{Context, Result, bail};
use serde::{Deserialize, Serialize};

use crate::ClassifierConfig;

/// How the sampling interval is measured.
#[derive(Debug, Copy, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SamplePacing {
    /// The interval is measured from the time the previous sample was taken.
    #[default]
    FromLastSample,
    /// Samples are due on a fixed grid starting at the first sample, so late ticks don't
    /// shift the following ones.
    FixedRate,
}

/// Tuning of the wand gesture recognizer.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct WandConfig {
    /// The minimum time between two samples of a gesture.
    pub sample_interval_secs: f64,
    pub pacing: SamplePacing,
    pub classifier: ClassifierConfig,
}

pub const DEFAULT_SAMPLE_INTERVAL: Duration = Duration::from_millis(100);

impl Default for WandConfig {
    fn default() -> Self {
        Self {
            sample_interval_secs: DEFAULT_SAMPLE_INTERVAL.as_secs_f64(),
            pacing: SamplePacing::default(),
            classifier: ClassifierConfig::default(),
        }
    }
}

impl WandConfig {
    pub fn load(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let text = fs::read_to_string(path)
            .with_context(|| format!("Failed to read wand configuration `{}`", path.display()))?;
        Self::from_toml_str(&text)
            .with_context(|| format!("Invalid wand configuration `{}`", path.display()))
    }

    pub fn from_toml_str(text: &str) -> Result<Self> {
        let config: Self = toml::from_str(text)?;
        config.validate()?;
        Ok(config)
    }

    pub fn validate(&self) -> Result<()> {
        self.sample_interval()?;
        let ClassifierConfig {
            reference_angle,
            circle_tolerance,
        } = self.classifier;
        if !reference_angle.is_finite() {
            bail!("classifier.reference_angle must be finite, was {reference_angle}");
        }
        if !circle_tolerance.is_finite() || circle_tolerance < 0.0 {
            bail!("classifier.circle_tolerance must be a non-negative angle, was {circle_tolerance}");
        }
        Ok(())
    }

    pub fn sample_interval(&self) -> Result<Duration> {
        match Duration::try_from_secs_f64(self.sample_interval_secs) {
            Ok(interval) if !interval.is_zero() => Ok(interval),
            _ => bail!(
                "sample_interval_secs must be a positive number of seconds, was {}",
                self.sample_interval_secs
            ),
        }
    }
}
