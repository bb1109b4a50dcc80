//! Joint angle geometry.
//!
//! Angles are measured at a vertex `b` between the segments `b -> a` and
//! `b -> c`, all in frame pixel space.

use nalgebra::Vector2;

use crate::types::Position2D;

/// Directed angle at `b`, sweeping from `b -> a` to `b -> c`, in degrees `[0, 360)`.
///
/// Computed as `atan2(c - b) - atan2(a - b)`. Note that image space has `y`
/// pointing down, so the sweep direction is mirrored with respect to a
/// conventional cartesian plot.
pub fn signed_joint_angle(a: &Position2D, b: &Position2D, c: &Position2D) -> f64 {
    let ba: Vector2<f64> = a.to_nalgebra() - b.to_nalgebra();
    let bc: Vector2<f64> = c.to_nalgebra() - b.to_nalgebra();

    let degrees = (bc.y.atan2(bc.x) - ba.y.atan2(ba.x)).to_degrees();
    let normalized = degrees.rem_euclid(360.0);
    // rem_euclid can round up to exactly 360 for tiny negative inputs
    if normalized >= 360.0 {
        0.0
    } else {
        normalized
    }
}

/// Interior angle at `b` in degrees `[0, 180]`.
///
/// The directed angle is folded so that values above 180 become
/// `360 - angle`. An arm and its mirror image therefore report the same
/// angle, and the value is continuous across the whole flexion range.
pub fn joint_angle(a: &Position2D, b: &Position2D, c: &Position2D) -> f64 {
    let angle = signed_joint_angle(a, b, c);
    if angle > 180.0 {
        360.0 - angle
    } else {
        angle
    }
}
