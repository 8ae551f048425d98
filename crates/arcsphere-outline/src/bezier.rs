//! Planar quadratic Bezier segments and the 2D line helpers used to build them.

use arcsphere_geometry::ArcId;
use glam::Vec2;

/// Two lines are treated as parallel when the sine of the angle between
/// them falls below this.
const PARALLEL_TOLERANCE: f32 = 1e-4;

/// Coarse samples taken along a curve before refining the nearest point.
const DISTANCE_SAMPLES: usize = 16;
/// Ternary-search rounds around the nearest coarse sample.
const DISTANCE_REFINEMENTS: usize = 32;

/// Index of a segment within one export.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct SegmentId(pub(crate) u32);

impl SegmentId {
    pub fn index(self) -> usize {
        self.0 as usize
    }
}

/// The piece of an arc a segment approximates, in ground arc length.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct ArcSpan {
    pub arc: ArcId,
    pub begin: f32,
    pub end: f32,
}

/// A quadratic Bezier on the unit square.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct QuadraticBezier {
    pub begin_uv: Vec2,
    pub control_point: Vec2,
    pub end_uv: Vec2,
    /// `None` for connectors the stitcher inserts along the border.
    pub span: Option<ArcSpan>,
}

impl QuadraticBezier {
    /// A segment approximating `span` of an arc.
    pub fn on_arc(span: ArcSpan, begin_uv: Vec2, control_point: Vec2, end_uv: Vec2) -> Self {
        Self {
            begin_uv,
            control_point,
            end_uv,
            span: Some(span),
        }
    }

    /// A straight connector, with the control point on the chord's midpoint.
    pub fn connector(begin_uv: Vec2, end_uv: Vec2) -> Self {
        Self {
            begin_uv,
            control_point: (begin_uv + end_uv) * 0.5,
            end_uv,
            span: None,
        }
    }

    pub fn is_connector(&self) -> bool {
        self.span.is_none()
    }

    /// Point on the curve at `s ∈ [0, 1]`.
    pub fn point_at(&self, s: f32) -> Vec2 {
        let r = 1.0 - s;
        self.begin_uv * (r * r) + self.control_point * (2.0 * r * s) + self.end_uv * (s * s)
    }

    /// Distance from `point` to the nearest point of the curve.
    pub fn distance_to(&self, point: Vec2) -> f32 {
        let distance = |s: f32| self.point_at(s).distance(point);
        let step = 1.0 / DISTANCE_SAMPLES as f32;
        let nearest = (0..=DISTANCE_SAMPLES)
            .map(|i| i as f32 * step)
            .min_by(|a, b| distance(*a).total_cmp(&distance(*b)))
            .unwrap_or(0.0);

        let mut low = (nearest - step).max(0.0);
        let mut high = (nearest + step).min(1.0);
        for _ in 0..DISTANCE_REFINEMENTS {
            let third = (high - low) / 3.0;
            if distance(low + third) < distance(high - third) {
                high -= third;
            } else {
                low += third;
            }
        }
        distance((low + high) * 0.5).min(distance(nearest))
    }
}

/// Intersection of the line through `begin` and `after_begin` with the line
/// through `before_end` and `end`.
///
/// `None` when the lines are (numerically) parallel or the result is not
/// finite. When the second line is an axis-aligned border of the unit square,
/// the matching coordinate of the result is exactly that border's value.
pub fn line_intersection(begin: Vec2, after_begin: Vec2, before_end: Vec2, end: Vec2) -> Option<Vec2> {
    let d1 = begin - after_begin;
    let d2 = before_end - end;
    let denominator = d1.x * d2.y - d1.y * d2.x;
    if denominator == 0.0 || denominator.abs() <= PARALLEL_TOLERANCE * d1.length() * d2.length() {
        return None;
    }

    let first = begin.x * after_begin.y - begin.y * after_begin.x;
    let second = before_end.x * end.y - before_end.y * end.x;
    let point = Vec2::new(
        (first * d2.x - d1.x * second) / denominator,
        (first * d2.y - d1.y * second) / denominator,
    );
    point.is_finite().then_some(point)
}

/// Distance from `point` to the infinite line through `a` and `b`.
///
/// Falls back to the distance to `a` when `a == b`.
pub fn point_line_distance(a: Vec2, b: Vec2, point: Vec2) -> f32 {
    let direction = b - a;
    let length = direction.length();
    if length == 0.0 {
        return point.distance(a);
    }
    direction.perp_dot(point - a).abs() / length
}
