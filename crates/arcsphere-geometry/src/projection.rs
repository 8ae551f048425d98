//! Sphere-to-plane projection: the chart the outline pipeline flattens arcs into.
//!
//! The pipeline only consumes [`SphereToPlane`]; the two charts here are the
//! reference implementations used by the command-line exporter and the tests:
//! - **Octahedral**: folds the lower hemisphere into the corners of the square.
//! - **Equirectangular**: longitude/latitude, seam on the antimeridian.
//!
//! Seams must lie on coordinate planes: seam detection in the outline pipeline
//! watches the signs of the point's coordinates.

use std::f32::consts::{PI, TAU};

use glam::{Vec2, Vec3};

/// Step used by the finite-difference fallback of
/// [`SphereToPlane::project_direction`].
const DIRECTION_STEP: f32 = 1e-3;

/// Maps points of the unit sphere into `[0, 1] × [0, 1]`.
///
/// `v = 1` is the top edge of the square. The map may be discontinuous along
/// seams, where both sides must land on the border of the square.
pub trait SphereToPlane {
    /// Project a point of the unit sphere.
    fn project(&self, point: Vec3) -> Vec2;

    /// Push a tangent direction at `point` into the plane.
    ///
    /// The default is a one-sided finite difference; charts with a closed-form
    /// derivative should override it, since the outline pipeline evaluates it
    /// right next to seams.
    fn project_direction(&self, point: Vec3, direction: Vec3) -> Vec2 {
        let stepped = (point + direction * DIRECTION_STEP).normalize();
        (self.project(stepped) - self.project(point)) / DIRECTION_STEP
    }
}

impl<P: SphereToPlane + ?Sized> SphereToPlane for &P {
    fn project(&self, point: Vec3) -> Vec2 {
        (**self).project(point)
    }

    fn project_direction(&self, point: Vec3, direction: Vec3) -> Vec2 {
        (**self).project_direction(point, direction)
    }
}

/// Selects which reference chart to use.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Default)]
pub enum ProjectionKind {
    /// Octahedral fold: continuous over the upper hemisphere.
    #[default]
    Octahedral,
    /// Longitude/latitude chart.
    Equirectangular,
}

impl SphereToPlane for ProjectionKind {
    fn project(&self, point: Vec3) -> Vec2 {
        match self {
            ProjectionKind::Octahedral => OctahedralProjector.project(point),
            ProjectionKind::Equirectangular => EquirectangularProjector.project(point),
        }
    }

    fn project_direction(&self, point: Vec3, direction: Vec3) -> Vec2 {
        match self {
            ProjectionKind::Octahedral => OctahedralProjector.project_direction(point, direction),
            ProjectionKind::Equirectangular => {
                EquirectangularProjector.project_direction(point, direction)
            }
        }
    }
}

#[inline]
fn sign_not_zero(value: f32) -> f32 {
    if value >= 0.0 { 1.0 } else { -1.0 }
}

/// Octahedral chart with `+Y` up.
///
/// The upper hemisphere maps to the diamond `|u'| + |v'| <= 1` (with
/// `u' ~ x`, `v' ~ z`); each lower quadrant folds into a corner triangle.
/// Seams are the lower halves of the planes `x = 0` (top and bottom edges)
/// and `z = 0` (left and right edges). The south pole maps to all four
/// corners.
#[derive(Clone, Copy, Debug, Default)]
pub struct OctahedralProjector;

impl OctahedralProjector {
    fn fold(n: Vec3) -> Vec2 {
        if n.y >= 0.0 {
            Vec2::new(n.x, n.z)
        } else {
            Vec2::new(
                (1.0 - n.z.abs()) * sign_not_zero(n.x),
                (1.0 - n.x.abs()) * sign_not_zero(n.z),
            )
        }
    }
}

impl SphereToPlane for OctahedralProjector {
    fn project(&self, point: Vec3) -> Vec2 {
        let n = point / point.abs().element_sum();
        (Self::fold(n) + Vec2::ONE) * 0.5
    }

    fn project_direction(&self, point: Vec3, direction: Vec3) -> Vec2 {
        let l1 = point.abs().element_sum();
        let n = point / l1;
        let signs = Vec3::new(
            sign_not_zero(n.x),
            sign_not_zero(n.y),
            sign_not_zero(n.z),
        );
        let dn = (direction - n * signs.dot(direction)) / l1;

        let folded = if n.y >= 0.0 {
            Vec2::new(dn.x, dn.z)
        } else {
            Vec2::new(
                -signs.z * dn.z * signs.x,
                -signs.x * dn.x * signs.z,
            )
        };
        folded * 0.5
    }
}

/// Longitude/latitude chart: `u` follows `atan2(z, x)`, `v` follows latitude.
///
/// The seam is the half-plane `z = 0, x < 0`, mapping to the left (`z < 0`
/// side) and right (`z > 0` side) edges.
#[derive(Clone, Copy, Debug, Default)]
pub struct EquirectangularProjector;

impl SphereToPlane for EquirectangularProjector {
    fn project(&self, point: Vec3) -> Vec2 {
        let p = point.normalize();
        Vec2::new(
            p.z.atan2(p.x) / TAU + 0.5,
            p.y.clamp(-1.0, 1.0).asin() / PI + 0.5,
        )
    }

    fn project_direction(&self, point: Vec3, direction: Vec3) -> Vec2 {
        let length = point.length();
        let p = point / length;
        let dp = (direction - p * p.dot(direction)) / length;

        let horizontal = p.x * p.x + p.z * p.z;
        if horizontal < 1e-12 {
            return Vec2::ZERO;
        }
        Vec2::new(
            (p.x * dp.z - p.z * dp.x) / horizontal / TAU,
            dp.y / horizontal.sqrt() / PI,
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const EPSILON: f32 = 1e-5;

    fn in_unit_square(uv: Vec2) -> bool {
        (0.0..=1.0).contains(&uv.x) && (0.0..=1.0).contains(&uv.y)
    }

    #[test]
    fn test_octahedral_axes() {
        let p = OctahedralProjector;
        assert!((p.project(Vec3::Y) - Vec2::splat(0.5)).length() < EPSILON);
        assert!((p.project(Vec3::X) - Vec2::new(1.0, 0.5)).length() < EPSILON);
        assert!((p.project(Vec3::Z) - Vec2::new(0.5, 1.0)).length() < EPSILON);
        // The south pole lands on a corner.
        let south = p.project(Vec3::NEG_Y);
        assert!(south.x == 0.0 || south.x == 1.0);
        assert!(south.y == 0.0 || south.y == 1.0);
    }

    #[test]
    fn test_octahedral_continuous_across_equator() {
        let p = OctahedralProjector;
        let above = Vec3::new(0.3, 1e-6, 0.7).normalize();
        let below = Vec3::new(0.3, -1e-6, 0.7).normalize();
        assert!((p.project(above) - p.project(below)).length() < 1e-5);
    }

    #[test]
    fn test_octahedral_seam_lands_on_border_mirrored() {
        let p = OctahedralProjector;
        let east = p.project(Vec3::new(1e-7, -0.6, 0.8));
        let west = p.project(Vec3::new(-1e-7, -0.6, 0.8));
        assert!((east.y - 1.0).abs() < 1e-6);
        assert!((west.y - 1.0).abs() < 1e-6);
        assert!((east.x + west.x - 1.0).abs() < 1e-6);
        assert!((east.x - west.x).abs() > 0.4);
    }

    #[test]
    fn test_outputs_in_unit_square() {
        for kind in [ProjectionKind::Octahedral, ProjectionKind::Equirectangular] {
            for i in 0..24 {
                for j in 0..=12 {
                    let lon = i as f32 / 24.0 * TAU;
                    let lat = j as f32 / 12.0 * PI - PI / 2.0;
                    let point = Vec3::new(lat.cos() * lon.cos(), lat.sin(), lat.cos() * lon.sin());
                    let uv = kind.project(point);
                    assert!(in_unit_square(uv), "{kind:?} {point:?} -> {uv:?}");
                }
            }
        }
    }

    #[test]
    fn test_equirectangular_seam_and_poles() {
        let p = EquirectangularProjector;
        assert!((p.project(Vec3::Y).y - 1.0).abs() < EPSILON);
        assert!(p.project(Vec3::NEG_Y).y.abs() < EPSILON);
        assert!((p.project(Vec3::X) - Vec2::splat(0.5)).length() < EPSILON);

        let north_side = p.project(Vec3::new(-1.0, 0.0, 1e-6));
        let south_side = p.project(Vec3::new(-1.0, 0.0, -1e-6));
        assert!(north_side.x > 0.99);
        assert!(south_side.x < 0.01);
    }

    #[test]
    fn test_analytic_directions_match_finite_differences() {
        let points = [
            Vec3::new(0.3, 0.5, 0.4).normalize(),
            Vec3::new(-0.2, -0.7, 0.3).normalize(),
            Vec3::new(0.6, -0.3, -0.5).normalize(),
        ];
        let direction = Vec3::new(0.2, 0.1, -0.3);
        for point in points {
            let tangent = direction - point * point.dot(direction);
            for kind in [ProjectionKind::Octahedral, ProjectionKind::Equirectangular] {
                let analytic = kind.project_direction(point, tangent);
                let h = 1e-3;
                let numeric = (kind.project((point + tangent * h).normalize())
                    - kind.project((point - tangent * h).normalize()))
                    / (2.0 * h);
                assert!(
                    (analytic - numeric).length() < 1e-2 * numeric.length().max(1.0),
                    "{kind:?} at {point:?}: analytic {analytic:?}, numeric {numeric:?}"
                );
            }
        }
    }

    #[test]
    fn test_default_projection_kind_is_octahedral() {
        assert_eq!(ProjectionKind::default(), ProjectionKind::Octahedral);
    }
}
