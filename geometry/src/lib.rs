//! Geometry primitives for tracked wand positions.

mod angle;
mod point;

pub use angle::*;
pub use point::*;

/// A position or displacement in tracking space.
pub type Vector3 = glam::DVec3;

/// Below this, the product of two vector lengths is considered degenerate.
pub const DEGENERATE_LENGTH_PRODUCT: f64 = 1e-15;

pub trait Planar {
    /// Projects onto the x/y plane, dropping z.
    fn planar(&self) -> Point;
}

impl Planar for Vector3 {
    fn planar(&self) -> Point {
        Point::new(self.x, self.y)
    }
}

/// The arithmetic mean of all `points`, `None` if there are none.
pub fn centroid(points: &[Vector3]) -> Option<Vector3> {
    if points.is_empty() {
        return None;
    }
    let sum: Vector3 = points.iter().copied().sum();
    Some(sum / points.len() as f64)
}
