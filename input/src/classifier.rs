//! Two stage path classification: circularity first, then a unanimous swipe direction.
use log::debug;
use serde::{Deserialize, Serialize};
use wand_geometry::{Planar, Vector, Vector3, angle_degrees, centroid};

use crate::GestureLabel;

/// Thresholds of the circularity test.
///
/// A path is considered circular when its total turning angle differs from `reference_angle` by
/// at least `circle_tolerance` degrees. With the defaults this flags paths that turn far less or
/// far more than one revolution, not the ones close to it.
#[derive(Debug, Copy, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ClassifierConfig {
    pub reference_angle: f64,
    pub circle_tolerance: f64,
}

impl Default for ClassifierConfig {
    fn default() -> Self {
        Self {
            reference_angle: 360.0,
            circle_tolerance: 300.0,
        }
    }
}

/// Classifies a sampled path.
///
/// Paths that pass the circularity test are [`GestureLabel::Circle`], the swipe test never runs
/// for them.
pub fn classify(points: &[Vector3], config: &ClassifierConfig) -> GestureLabel {
    if is_circular(points, config) {
        return GestureLabel::Circle;
    }
    detect_swipe(points)
}

/// Sums the angles seen from the centroid over every consecutive triple of points.
///
/// Each inner point contributes to up to two triples, so its angles are counted twice. `None` if
/// there are less than three points.
pub fn total_turning_angle(points: &[Vector3]) -> Option<f64> {
    if points.len() < 3 {
        return None;
    }
    let center = centroid(points)?;
    let total = points
        .windows(3)
        .map(|w| {
            let (p1, p2, p3) = (w[0] - center, w[1] - center, w[2] - center);
            angle_degrees(p1, p2) + angle_degrees(p2, p3)
        })
        .sum::<f64>();
    Some(total)
}

pub fn is_circular(points: &[Vector3], config: &ClassifierConfig) -> bool {
    let Some(total) = total_turning_angle(points) else {
        return false;
    };
    debug!("Total turning angle of {} points: {total}", points.len());
    (total - config.reference_angle).abs() >= config.circle_tolerance
}

/// Returns the direction all segments of the path agree on, projected on the x/y plane.
///
/// A single segment pointing elsewhere makes the whole path [`GestureLabel::None`].
pub fn detect_swipe(points: &[Vector3]) -> GestureLabel {
    if points.len() < 2 {
        return GestureLabel::None;
    }

    let mut segments = points
        .windows(2)
        .map(|w| swipe_direction((w[1] - w[0]).planar()));

    // There is at least one segment.
    let first = segments.next().unwrap_or_default();
    if segments.all(|direction| direction == first) {
        first
    } else {
        GestureLabel::None
    }
}

/// The dominant axis direction of a planar displacement.
///
/// Ties between the axes resolve to the vertical one. A zero displacement has no direction.
pub fn swipe_direction(delta: Vector) -> GestureLabel {
    let abs = delta.abs();
    if abs.x > abs.y {
        if delta.x > 0.0 {
            return GestureLabel::Right;
        }
        if delta.x < 0.0 {
            return GestureLabel::Left;
        }
    } else {
        if delta.y > 0.0 {
            return GestureLabel::Up;
        }
        if delta.y < 0.0 {
            return GestureLabel::Down;
        }
    }
    GestureLabel::None
}
