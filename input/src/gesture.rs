use std::{fmt, ops::Deref};

use derive_more::From;
use serde::{Deserialize, Serialize};
use wand_geometry::Vector3;

/// The outcome of one hold-to-release cycle.
///
/// `None` covers both "nothing was drawn" and "the path was ambiguous".
#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum GestureLabel {
    #[default]
    None,
    Left,
    Right,
    Up,
    Down,
    Circle,
}

impl GestureLabel {
    /// The stable ordinal of the label. `None` is -1, the recognized gestures count up from 0.
    pub const fn ordinal(self) -> i32 {
        match self {
            Self::None => -1,
            Self::Left => 0,
            Self::Right => 1,
            Self::Up => 2,
            Self::Down => 3,
            Self::Circle => 4,
        }
    }

    /// The ordinal as an index for recognized gestures.
    pub fn index(self) -> Option<usize> {
        usize::try_from(self.ordinal()).ok()
    }

    pub fn is_recognized(self) -> bool {
        self != Self::None
    }
}

impl fmt::Display for GestureLabel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Self::None => "none",
            Self::Left => "left",
            Self::Right => "right",
            Self::Up => "up",
            Self::Down => "down",
            Self::Circle => "circle",
        };
        f.write_str(name)
    }
}

/// The positions sampled during one gesture, oldest first.
///
/// Once handed out by the sampler, a path is never changed.
#[derive(Debug, Clone, PartialEq, Default, From)]
pub struct GesturePath(Vec<Vector3>);

impl GesturePath {
    pub fn points(&self) -> &[Vector3] {
        &self.0
    }
}

impl Deref for GesturePath {
    type Target = [Vector3];

    fn deref(&self) -> &Self::Target {
        &self.0
    }
}

impl FromIterator<Vector3> for GesturePath {
    fn from_iter<T: IntoIterator<Item = Vector3>>(iter: T) -> Self {
        Self(iter.into_iter().collect())
    }
}
