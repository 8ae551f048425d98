//! The geodesic arc primitive used to traverse and outline blocks on a unit sphere.
//!
//! An arc is a piece of a circle on the sphere (great or small), parameterized
//! by ground arc length `t ∈ [0, arc_angle·arc_radius]`. Evaluating with a
//! non-zero `radius` lifts the circle towards `path_normal`, which models the
//! path of a character's center of mass above the ground path.

use std::f32::consts::TAU;

use glam::{DVec3, Vec3};

use crate::aabb::Aabb;
use crate::arc_loop::ArcId;
use crate::precision::{
    AABB_PADDING, CORNER_RADIUS, HANDOFF_RADIUS, MAX_GRADIENT_ITERATIONS, QUADRANT,
};
use crate::sphere::sphere_position;

/// Whether an arc is a traversable span or a zero-length joint between two spans.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum ArcKind {
    /// An ordinary arc with a non-zero ground radius.
    Edge,
    /// A joint at a shared vertex; its frame sweeps between the normals of
    /// the two neighbouring edges.
    Corner,
}

/// A single arc of a closed loop on the unit sphere.
#[derive(Clone, Debug)]
pub struct SphericalArc {
    pub(crate) next: ArcId,
    pub(crate) prev: ArcId,
    kind: ArcKind,

    path_center: Vec3,
    path_normal: Vec3,

    arc_left: Vec3,
    arc_right: Vec3,
    arc_left_up: Vec3,
    arc_right_down: Vec3,

    arc_radius: f32,
    arc_angle: f32,
    angle_to_normal: f32,

    aabb: Aabb,
}

impl SphericalArc {
    /// Build an edge arc from its two ground endpoints and the plane normal.
    ///
    /// `normal` is the axis of the circle through `left_edge` and `right_edge`;
    /// its sign chooses which side is "up" for center-of-mass paths. The arc
    /// sweeps from `left_edge` towards `-(arc_left × normal)`.
    ///
    /// The new arc is linked to itself.
    pub(crate) fn new(id: ArcId, left_edge: Vec3, right_edge: Vec3, normal: Vec3) -> Self {
        let path_normal = normal.normalize();
        let path_center = path_normal * left_edge.dot(path_normal);

        let left_offset = left_edge - path_center;
        let arc_left = left_offset.normalize();
        let arc_right = (right_edge - path_center).normalize();
        let arc_radius = left_offset.length();

        Self::from_frame(
            id,
            ArcKind::Edge,
            path_center,
            path_normal,
            arc_left,
            arc_right,
            arc_radius,
        )
    }

    /// Build the joint between `left` (which ends at the joint) and `right`
    /// (which begins there).
    pub(crate) fn corner(id: ArcId, left: &SphericalArc, right: &SphericalArc) -> Self {
        let joint = right.evaluate(0.0, 0.0).normalize();
        let arc_left = left.evaluate_normal(left.end(), 0.0);
        let arc_right = right.evaluate_normal(0.0, 0.0);

        Self::from_frame(
            id,
            ArcKind::Corner,
            joint,
            joint,
            arc_left,
            arc_right,
            CORNER_RADIUS,
        )
    }

    fn from_frame(
        id: ArcId,
        kind: ArcKind,
        path_center: Vec3,
        path_normal: Vec3,
        arc_left: Vec3,
        arc_right: Vec3,
        arc_radius: f32,
    ) -> Self {
        let arc_left_up = -arc_left.cross(path_normal).normalize();
        let arc_right_down = arc_right.cross(path_normal).normalize();

        // The unsigned angle only covers [0, π]; a right endpoint behind
        // `arc_left_up` means the sweep takes the long way round. Coincident
        // endpoints make an edge a full circle and a corner a straight joint.
        // The long way is the complement `TAU - angle`. Adding π instead only
        // agrees with it at 3π/2, and leaves `evaluate(end())` off `arc_right`.
        let mut arc_angle = arc_left.cross(arc_right).length().atan2(arc_left.dot(arc_right));
        let coincident = arc_angle <= 0.0;
        let reflex = !coincident && arc_left_up.dot(arc_right) <= 0.0;
        if reflex || (coincident && kind == ArcKind::Edge) {
            arc_angle = TAU - arc_angle;
        }

        // A corner's center is the joint itself; rounding in its length would
        // otherwise open a visible gap between the joint and its frame.
        let angle_to_normal = match kind {
            ArcKind::Edge => path_center.length().clamp(-1.0, 1.0).acos(),
            ArcKind::Corner => 0.0,
        };

        let mut arc = Self {
            next: id,
            prev: id,
            kind,
            path_center,
            path_normal,
            arc_left,
            arc_right,
            arc_left_up,
            arc_right_down,
            arc_radius,
            arc_angle,
            angle_to_normal,
            aabb: Aabb::new(Vec3::ZERO, Vec3::ZERO),
        };
        arc.recalculate_aabb();
        arc
    }

    pub fn kind(&self) -> ArcKind {
        self.kind
    }

    pub fn is_corner(&self) -> bool {
        self.kind == ArcKind::Corner
    }

    pub fn next(&self) -> ArcId {
        self.next
    }

    pub fn prev(&self) -> ArcId {
        self.prev
    }

    pub fn path_center(&self) -> Vec3 {
        self.path_center
    }

    pub fn path_normal(&self) -> Vec3 {
        self.path_normal
    }

    pub fn arc_left(&self) -> Vec3 {
        self.arc_left
    }

    pub fn arc_right(&self) -> Vec3 {
        self.arc_right
    }

    pub fn arc_radius(&self) -> f32 {
        self.arc_radius
    }

    /// Swept angle in radians, in `(0, 2π]` for edges.
    pub fn arc_angle(&self) -> f32 {
        self.arc_angle
    }

    pub fn angle_to_normal(&self) -> f32 {
        self.angle_to_normal
    }

    /// Cached bounding box, see [`Self::recalculate_aabb`].
    pub fn aabb(&self) -> Aabb {
        self.aabb
    }

    /// First valid parameter.
    pub fn begin(&self) -> f32 {
        0.0
    }

    /// Last valid parameter: the ground arc length.
    pub fn end(&self) -> f32 {
        self.arc_angle * self.arc_radius
    }

    /// Center of the circle traced at elevation `radius`.
    pub fn center(&self, radius: f32) -> Vec3 {
        self.path_normal * (self.angle_to_normal - radius).cos()
    }

    /// Radius of the circle traced at elevation `radius`.
    pub fn radius_at(&self, radius: f32) -> f32 {
        (self.evaluate(0.0, radius) - self.center(radius)).length()
    }

    /// Position at ground arc length `t`, lifted by `radius` towards the normal.
    pub fn evaluate(&self, t: f32, radius: f32) -> Vec3 {
        let angle = t / self.arc_radius;
        sphere_position(
            self.arc_left,
            self.arc_left_up,
            self.path_normal,
            self.angle_to_normal - radius,
            angle,
        )
    }

    /// Ground position evaluated in double precision.
    ///
    /// Differences over [`DELTA`](crate::DELTA)-sized steps fall below `f32`
    /// resolution near a coordinate's extremum; this keeps them resolvable.
    pub fn evaluate_f64(&self, t: f64) -> DVec3 {
        let angle = t / f64::from(self.arc_radius);
        let (sin_angle, cos_angle) = angle.sin_cos();
        let (sin_height, cos_height) = f64::from(self.angle_to_normal).sin_cos();
        (self.arc_left.as_dvec3() * cos_angle + self.arc_left_up.as_dvec3() * sin_angle)
            * sin_height
            + self.path_normal.as_dvec3() * cos_height
    }

    /// The evaluation basis rotated by 90°: points along the direction of travel,
    /// tilted towards the normal on small circles.
    pub fn evaluate_right(&self, t: f32, radius: f32) -> Vec3 {
        let angle = t / self.arc_radius;
        sphere_position(
            self.arc_left_up,
            -self.arc_left,
            self.path_normal,
            self.angle_to_normal - radius,
            angle,
        )
    }

    /// Surface normal of the travel frame: `evaluate_right × evaluate`.
    ///
    /// On the ground path this points to the right of the direction of travel.
    pub fn evaluate_normal(&self, t: f32, radius: f32) -> Vec3 {
        let pos = self.evaluate(t, radius);
        let right = self.evaluate_right(t, radius);
        right.cross(pos).normalize_or_zero()
    }

    /// Unit direction of travel at ground arc length `t`.
    pub fn evaluate_tangent(&self, t: f32) -> Vec3 {
        let (sin_angle, cos_angle) = (t / self.arc_radius).sin_cos();
        self.arc_left_up * cos_angle - self.arc_left * sin_angle
    }

    /// Is `pos` inside the band swept by this arc between the ground and
    /// elevation `radius`?
    ///
    /// The elevation test is exact. The angular test is a majority vote of
    /// three half-plane style checks (left edge, right edge, arc is obtuse) and
    /// passes when at least two agree. A single half-plane test cannot tell
    /// acute, right and reflex wedges apart; the vote is an approximation of a
    /// point-in-wedge test that movement code relies on as-is, and it is not
    /// correct for every wedge.
    pub fn contains(&self, pos: Vec3, radius: f32) -> bool {
        let above_ground = (pos - self.center(0.0)).dot(self.path_normal) >= 0.0;
        let below_com = (pos - self.center(radius)).dot(self.path_normal) <= 0.0;
        let at_correct_elevation = above_ground && below_com;

        let votes = [
            pos.dot(self.arc_left_up) >= 0.0,
            pos.dot(self.arc_right_down) >= 0.0,
            self.arc_left.dot(self.arc_right) <= 0.0,
        ];
        let in_wedge = votes.iter().filter(|&&vote| vote).count() >= 2;

        at_correct_elevation && in_wedge
    }

    /// Where does the geodesic from `from` towards `to` cross this arc's
    /// circle at elevation `radius`?
    ///
    /// Returns the ground arc-length parameter of the crossing, or `None` when
    /// the crossing falls outside the swept angle or the inputs are degenerate.
    pub fn intersect(&self, to: Vec3, from: Vec3, radius: f32) -> Option<f32> {
        let right = from.cross(to);
        let mut secant = self.path_normal.cross(right);
        if secant.dot(from) < 0.0 {
            secant = -secant;
        }
        let secant = secant.try_normalize()?;

        let circle_radius = self.radius_at(radius);
        let intersection = self.center(radius) + secant * circle_radius;

        let x = intersection.dot(self.arc_left) / circle_radius;
        let y = intersection.dot(self.arc_left_up) / circle_radius;

        let mut angle = y.atan2(x);
        if angle < 0.0 {
            angle += TAU;
        }

        (angle <= self.arc_angle).then(|| angle * self.arc_radius)
    }

    /// Distance from `from` to the crossing found by [`Self::intersect`],
    /// measured on the circle at [`HANDOFF_RADIUS`].
    pub fn distance(&self, to: Vec3, from: Vec3) -> Option<f32> {
        let t = self.intersect(to, from, HANDOFF_RADIUS)?;
        Some(from.distance(self.evaluate(t, HANDOFF_RADIUS)))
    }

    /// Ground point of this arc with the largest projection onto `direction`.
    ///
    /// The sweep is split into quarter-turn quadrants so a full circle (whose
    /// two ends coincide) is never searched as one bracket. Each quadrant is
    /// narrowed by bisection, discarding the half whose endpoint correlates
    /// worse with `direction`.
    pub fn max_gradient(&self, direction: Vec3) -> Vec3 {
        let quadrants = (self.arc_angle / QUADRANT).ceil();
        if quadrants < 1.0 {
            return self.evaluate(0.0, 0.0);
        }

        let span = self.end();
        let mut max_gradient = Vec3::ZERO;
        let mut max_product = f32::NEG_INFINITY;

        for quadrant in 0..quadrants as usize {
            let quadrant = quadrant as f32;
            let mut left = span * (quadrant / quadrants);
            let mut right = span * ((quadrant + 1.0) / quadrants);

            let mut left_product = self.evaluate(left, 0.0).dot(direction);
            let mut right_product = self.evaluate(right, 0.0).dot(direction);

            for _ in 0..MAX_GRADIENT_ITERATIONS {
                let midpoint = (left + right) / 2.0;
                if left_product < right_product {
                    left = midpoint;
                    left_product = self.evaluate(left, 0.0).dot(direction);
                } else {
                    right = midpoint;
                    right_product = self.evaluate(right, 0.0).dot(direction);
                }
            }

            if max_product < right_product {
                max_gradient = self.evaluate(right, 0.0);
                max_product = right_product;
            }
            if max_product < left_product {
                max_gradient = self.evaluate(left, 0.0);
                max_product = left_product;
            }
        }

        max_gradient
    }

    /// Recompute the cached bounding box from the six axis extremes.
    pub fn recalculate_aabb(&mut self) {
        let x_min = self.max_gradient(Vec3::NEG_X).x - AABB_PADDING;
        let x_max = self.max_gradient(Vec3::X).x + AABB_PADDING;
        let y_min = self.max_gradient(Vec3::NEG_Y).y - AABB_PADDING;
        let y_max = self.max_gradient(Vec3::Y).y + AABB_PADDING;
        let z_min = self.max_gradient(Vec3::NEG_Z).z - AABB_PADDING;
        let z_max = self.max_gradient(Vec3::Z).z + AABB_PADDING;

        self.aabb = Aabb::new(
            Vec3::new(x_min, y_min, z_min),
            Vec3::new(x_max, y_max, z_max),
        );
    }
}
