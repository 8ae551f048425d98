//! Spherical arc geometry: the geodesic arc primitive, closed arc loops, and
//! the sphere-to-plane charts used to flatten them.

mod aabb;
mod arc;
mod arc_loop;
mod precision;
mod projection;
mod sphere;

pub use aabb::Aabb;
pub use arc::{ArcKind, SphericalArc};
pub use arc_loop::{ArcId, ArcLoop, LoopIter};
pub use precision::{
    AABB_PADDING, CORNER_RADIUS, DELTA, HANDOFF_RADIUS, MANTISSA_STEP, MAX_GRADIENT_ITERATIONS,
    QUADRANT, TANGENT_PROBE, THRESHOLD,
};
pub use projection::{
    EquirectangularProjector, OctahedralProjector, ProjectionKind, SphereToPlane,
};
pub use sphere::{sign, sphere_position};
