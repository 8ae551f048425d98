//! Rotation helper shared by every arc evaluation.

use glam::Vec3;

/// Position on a circle of the unit sphere.
///
/// `right` and `up` span the circle's plane, `forward` is its axis, `height`
/// is the polar angle of the circle measured from `forward`, and `angle` is
/// the sweep from `right` towards `up`.
///
/// ```text
/// (right·cos angle + up·sin angle)·sin height + forward·cos height
/// ```
#[inline]
#[must_use]
pub fn sphere_position(right: Vec3, up: Vec3, forward: Vec3, height: f32, angle: f32) -> Vec3 {
    let (sin_angle, cos_angle) = angle.sin_cos();
    let (sin_height, cos_height) = height.sin_cos();
    (right * cos_angle + up * sin_angle) * sin_height + forward * cos_height
}

/// Sign of `value`, with zero mapping to zero (unlike [`f32::signum`]).
#[inline]
#[must_use]
pub fn sign(value: f32) -> i8 {
    if value > 0.0 {
        1
    } else if value < 0.0 {
        -1
    } else {
        0
    }
}
