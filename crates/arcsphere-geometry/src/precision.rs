//! Precision constants shared by the arc searches and the outline pipeline.
//!
//! All values are tied to `f32`. Switching the scalar type means recomputing
//! every constant here, not just changing the type alias.

use std::f32::consts::FRAC_PI_2;

/// Smallest relative step of the `f32` mantissa (2⁻²³).
pub const MANTISSA_STEP: f32 = f32::EPSILON;

/// Sampling offset used for finite differences and bisection cut-offs.
///
/// 4 is the largest power of two below 2π, so for any arc-length parameter
/// in `[0, 2π]` this is at least one ulp.
pub const DELTA: f32 = 4.0 * MANTISSA_STEP;

/// Offset used to estimate the planar tangent at either end of a span.
pub const TANGENT_PROBE: f32 = 64.0 * DELTA;

/// Maximum chordal deviation (plane units) of an accepted Bezier span, and
/// the gap below which two segment endpoints are considered the same point.
pub const THRESHOLD: f32 = 1e-5;

/// Bisection steps per quadrant in [`SphericalArc::max_gradient`](crate::SphericalArc::max_gradient):
/// one step per bit of the scalar.
pub const MAX_GRADIENT_ITERATIONS: usize = 8 * size_of::<f32>();

/// Angular width of one search quadrant in `max_gradient`.
pub const QUADRANT: f32 = FRAC_PI_2;

/// Padding added to each side of an arc's bounding box.
pub const AABB_PADDING: f32 = 1e-6;

/// Radius substituted when evaluation hands off to a neighbouring arc, and
/// the radius tolerance of [`SphericalArc::distance`](crate::SphericalArc::distance).
pub const HANDOFF_RADIUS: f32 = 0.01;

/// Ground radius given to corner arcs so their parameterization stays finite.
pub const CORNER_RADIUS: f32 = 1e-36;
