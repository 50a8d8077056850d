use crate::{DEGENERATE_LENGTH_PRODUCT, Vector3};

/// The unsigned angle between `u` and `v` in degrees, in the range 0..=180.
///
/// If one of the vectors is (nearly) zero, the angle is 0.
pub fn angle_degrees(u: Vector3, v: Vector3) -> f64 {
    let denominator = (u.length_squared() * v.length_squared()).sqrt();
    if denominator < DEGENERATE_LENGTH_PRODUCT {
        return 0.0;
    }
    // Rounding may push the cosine slightly out of range.
    let cos = (u.dot(v) / denominator).clamp(-1.0, 1.0);
    cos.acos().to_degrees()
}
