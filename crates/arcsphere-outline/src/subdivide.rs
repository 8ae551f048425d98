//! Adaptive subdivision of arcs into error-bounded quadratic Beziers.

use arcsphere_geometry::{
    ArcId, ArcLoop, DELTA, MAX_GRADIENT_ITERATIONS, SphereToPlane, SphericalArc, TANGENT_PROBE,
    THRESHOLD,
};
use glam::Vec2;

use crate::bezier::{ArcSpan, QuadraticBezier, line_intersection, point_line_distance};
use crate::signs::SignMatrix;

/// Recursion limit for [`AdaptiveCurveSubdivider::subdivide`]. Spans this deep
/// are far narrower than `DELTA` and are accepted as they are.
pub const MAX_SUBDIVISION_DEPTH: u32 = 48;

/// Iteration cap for [`AdaptiveCurveSubdivider::max_error_location`]; each
/// step keeps three quarters of the bracket.
const MAX_ERROR_SEARCH_ITERATIONS: usize = 2 * MAX_GRADIENT_ITERATIONS;

/// Offset of the two probes of [`AdaptiveCurveSubdivider::max_error_location`]
/// from the middle of the bracket, as a fraction of its width. Fixed `DELTA`
/// offsets would compare distances below `f32` resolution.
const ERROR_SEARCH_OFFSET: f32 = 0.25;

/// Interior samples per span when checking a fitted segment against its arc.
const FIT_SAMPLES: usize = 16;

/// Interior parameters of `[begin, end]` at which a fitted segment must stay
/// within [`THRESHOLD`] of the projected arc.
pub(crate) fn span_samples(begin: f32, end: f32) -> impl Iterator<Item = f32> {
    (1..FIT_SAMPLES).map(move |i| begin + (end - begin) * i as f32 / FIT_SAMPLES as f32)
}

/// Flattens the edges of a loop into quadratic Beziers on the unit square.
///
/// Each edge is first cut wherever its [`SignMatrix`] changes, so no emitted
/// span straddles a seam of the chart; every span is then split until its
/// projection stays within [`THRESHOLD`] of its chord, and of the Bezier
/// fitted to it.
pub struct AdaptiveCurveSubdivider<'a, P> {
    arcs: &'a ArcLoop,
    projector: &'a P,
}

impl<'a, P: SphereToPlane> AdaptiveCurveSubdivider<'a, P> {
    pub fn new(arcs: &'a ArcLoop, projector: &'a P) -> Self {
        Self { arcs, projector }
    }

    fn uv(&self, arc: &SphericalArc, t: f32) -> Vec2 {
        self.projector.project(arc.evaluate(t, 0.0))
    }

    /// Append the segments of every edge of the loop through `start`.
    pub fn subdivide_loop(&self, start: ArcId, segments: &mut Vec<QuadraticBezier>) {
        for id in self.arcs.edges(start) {
            self.subdivide_arc(id, segments);
        }
    }

    /// Append the segments of a single arc, cut at every sign change.
    pub fn subdivide_arc(&self, id: ArcId, segments: &mut Vec<QuadraticBezier>) {
        let arc = &self.arcs[id];
        let end = arc.end();
        let end_signs = SignMatrix::sample(arc, end, -DELTA);

        let mut begin = arc.begin();
        let mut begin_signs = SignMatrix::sample(arc, begin, DELTA);
        let mut cuts = 0usize;
        while begin_signs != end_signs {
            let (range_begin, range_end, range_end_signs) =
                Self::find_sign_change(arc, begin, end, begin_signs, end_signs);
            self.subdivide(id, begin, range_begin, 0, segments);
            begin = range_end;
            begin_signs = range_end_signs;
            cuts += 1;
        }
        self.subdivide(id, begin, end, 0, segments);

        tracing::debug!(arc = id.index(), cuts, segments = segments.len(), "subdivided arc");
    }

    /// Narrow `[begin, end]` down to a bracket no wider than `DELTA` whose left
    /// end still has `begin_signs`.
    fn find_sign_change(
        arc: &SphericalArc,
        begin: f32,
        end: f32,
        begin_signs: SignMatrix,
        end_signs: SignMatrix,
    ) -> (f32, f32, SignMatrix) {
        let mut range_begin = begin;
        let mut range_end = end;
        let mut range_end_signs = end_signs;
        while range_end - range_begin > DELTA {
            let mid = (range_begin + range_end) * 0.5;
            let mid_signs = SignMatrix::sample(arc, mid, DELTA);
            if mid_signs == begin_signs {
                range_begin = mid;
            } else {
                range_end = mid;
                range_end_signs = mid_signs;
            }
        }
        (range_begin, range_end, range_end_signs)
    }

    /// Parameter in `[begin, end]` where the projection strays furthest from
    /// the chord between the projected endpoints.
    ///
    /// A search over a unimodal error: probes either side of the bracket's
    /// middle and drops the outer part on the side of the smaller error.
    pub fn max_error_location(&self, arc: &SphericalArc, begin: f32, end: f32) -> f32 {
        let chord_begin = self.uv(arc, begin);
        let chord_end = self.uv(arc, end);
        let error = |t: f32| point_line_distance(chord_begin, chord_end, self.uv(arc, t));

        let mut begin = begin;
        let mut end = end;
        for _ in 0..MAX_ERROR_SEARCH_ITERATIONS {
            if end - begin <= DELTA {
                break;
            }
            let mid = (begin + end) * 0.5;
            let offset = (end - begin) * ERROR_SEARCH_OFFSET;
            let (left, right) = (mid - offset, mid + offset);
            if error(left) < error(right) {
                begin = left;
            } else {
                end = right;
            }
        }
        (begin + end) * 0.5
    }

    /// Split `[begin, end]` until every piece is within [`THRESHOLD`] of its
    /// chord and of its fitted Bezier, appending one segment per piece.
    ///
    /// Pieces are split at the point of largest chord deviation first; a piece
    /// whose chord is close enough but whose Bezier is not is halved.
    pub fn subdivide(
        &self,
        id: ArcId,
        begin: f32,
        end: f32,
        depth: u32,
        segments: &mut Vec<QuadraticBezier>,
    ) {
        let arc = &self.arcs[id];
        let midpoint = self.max_error_location(arc, begin, end);
        let deviation = point_line_distance(self.uv(arc, begin), self.uv(arc, end), self.uv(arc, midpoint));

        let splits = |at: f32| depth < MAX_SUBDIVISION_DEPTH && begin < at && at < end;

        if deviation > THRESHOLD && splits(midpoint) {
            self.subdivide(id, begin, midpoint, depth + 1, segments);
            self.subdivide(id, midpoint, end, depth + 1, segments);
            return;
        }

        let Some((segment, error)) = self.fit_segment(id, begin, end) else {
            return;
        };
        let half = (begin + end) * 0.5;
        if error > THRESHOLD && splits(half) {
            self.subdivide(id, begin, half, depth + 1, segments);
            self.subdivide(id, half, end, depth + 1, segments);
        } else {
            segments.push(segment);
        }
    }

    /// Append the segment for `[begin, end]`, unless its projection is
    /// shorter than [`THRESHOLD`].
    pub fn add_line(&self, id: ArcId, begin: f32, end: f32, segments: &mut Vec<QuadraticBezier>) {
        if let Some((segment, _)) = self.fit_segment(id, begin, end) {
            segments.push(segment);
        }
    }

    /// The segment for `[begin, end]` and its largest distance from the
    /// projected arc over [`span_samples`]; `None` when the projection is
    /// shorter than [`THRESHOLD`].
    ///
    /// The control point is where the tangent lines at both ends meet. The
    /// chord's midpoint is used instead when they are parallel, meet further
    /// from the chord than its own length, or bend the curve away from the
    /// arc by more than [`THRESHOLD`] where the straight chord stays closer.
    fn fit_segment(&self, id: ArcId, begin: f32, end: f32) -> Option<(QuadraticBezier, f32)> {
        let arc = &self.arcs[id];
        let begin_uv = self.uv(arc, begin);
        let end_uv = self.uv(arc, end);
        let chord = begin_uv.distance(end_uv);
        if chord <= THRESHOLD {
            return None;
        }
        let span = ArcSpan { arc: id, begin, end };

        // Probes stay inside the span so they never reach across a cut.
        let probe = TANGENT_PROBE.min((end - begin) * 0.5);
        let begin_tangent = self.planar_tangent(arc, begin, probe);
        let end_tangent = self.planar_tangent(arc, end, -probe);
        let midpoint = (begin_uv + end_uv) * 0.5;
        let straight = QuadraticBezier::on_arc(span, begin_uv, midpoint, end_uv);

        let Some(control_point) = line_intersection(
            begin_uv,
            begin_uv + begin_tangent,
            end_uv - end_tangent,
            end_uv,
        )
        .filter(|control| control.distance(midpoint) <= chord) else {
            return Some((straight, self.fit_error(arc, &straight, begin, end)));
        };

        let curved = QuadraticBezier::on_arc(span, begin_uv, control_point, end_uv);
        let curved_error = self.fit_error(arc, &curved, begin, end);
        if curved_error <= THRESHOLD {
            return Some((curved, curved_error));
        }
        let straight_error = self.fit_error(arc, &straight, begin, end);
        if straight_error < curved_error {
            Some((straight, straight_error))
        } else {
            Some((curved, curved_error))
        }
    }

    /// Largest distance from the projected arc to `segment` over the
    /// interior samples of `[begin, end]`.
    fn fit_error(&self, arc: &SphericalArc, segment: &QuadraticBezier, begin: f32, end: f32) -> f32 {
        span_samples(begin, end)
            .map(|t| segment.distance_to(self.uv(arc, t)))
            .fold(0.0, f32::max)
    }

    /// Direction of travel at `t` pushed into the plane.
    ///
    /// Uses the chart's derivative; where that vanishes (a pole of the chart)
    /// the projected points at `t` and `t + probe` stand in.
    fn planar_tangent(&self, arc: &SphericalArc, t: f32, probe: f32) -> Vec2 {
        let direction = self
            .projector
            .project_direction(arc.evaluate(t, 0.0), arc.evaluate_tangent(t));
        if direction.is_finite() && direction.length_squared() > 0.0 {
            return direction.normalize();
        }
        ((self.uv(arc, t + probe) - self.uv(arc, t)) / probe).normalize_or_zero()
    }
}

#[cfg(test)]
mod tests {
    use arcsphere_geometry::{EquirectangularProjector, OctahedralProjector, ProjectionKind};
    use glam::Vec3;
    use rand::{Rng, SeedableRng};
    use rand_xoshiro::Xoshiro256StarStar;

    use super::*;

    fn lat_lon(lat_deg: f32, lon_deg: f32) -> Vec3 {
        let (lat, lon) = (lat_deg.to_radians(), lon_deg.to_radians());
        Vec3::new(lat.cos() * lon.cos(), lat.sin(), lat.cos() * lon.sin())
    }

    fn single_arc(left: Vec3, right: Vec3) -> (ArcLoop, ArcId) {
        let mut arcs = ArcLoop::new();
        let id = arcs.spawn_arc(left, right, left.cross(right));
        (arcs, id)
    }

    #[test]
    fn test_segments_chain_from_begin_to_end() {
        let (arcs, id) = single_arc(lat_lon(10.0, 10.0), lat_lon(50.0, 80.0));
        let projector = EquirectangularProjector;
        let subdivider = AdaptiveCurveSubdivider::new(&arcs, &projector);

        let mut segments = Vec::new();
        subdivider.subdivide_arc(id, &mut segments);
        assert!(segments.len() > 1, "a curved projection needs several segments");

        let arc = &arcs[id];
        assert_eq!(segments[0].begin_uv, projector.project(arc.evaluate(arc.begin(), 0.0)));
        assert_eq!(
            segments.last().unwrap().end_uv,
            projector.project(arc.evaluate(arc.end(), 0.0))
        );
        for pair in segments.windows(2) {
            let gap = pair[0].end_uv.distance(pair[1].begin_uv);
            assert!(gap < THRESHOLD, "gap {gap} between consecutive segments");
        }
    }

    /// Largest distance from a sampled point of each segment's span to the
    /// segment itself.
    fn worst_fit<P: SphereToPlane>(arcs: &ArcLoop, projector: &P, segments: &[QuadraticBezier]) -> f32 {
        let mut worst = 0.0f32;
        for segment in segments {
            let span = segment.span.unwrap();
            let arc = &arcs[span.arc];
            for t in span_samples(span.begin, span.end) {
                let uv = projector.project(arc.evaluate(t, 0.0));
                worst = worst.max(segment.distance_to(uv));
            }
        }
        worst
    }

    #[test]
    fn test_bezier_stays_within_threshold_of_projected_arc() {
        let (arcs, id) = single_arc(lat_lon(10.0, 10.0), lat_lon(50.0, 80.0));
        let projector = EquirectangularProjector;
        let subdivider = AdaptiveCurveSubdivider::new(&arcs, &projector);
        let mut segments = Vec::new();
        subdivider.subdivide_arc(id, &mut segments);

        let worst = worst_fit(&arcs, &projector, &segments);
        assert!(worst <= THRESHOLD, "worst deviation {worst}");
    }

    #[test]
    fn test_bezier_fit_on_closed_quad() {
        // Great circles bend hard in the equirectangular chart.
        let mut arcs = ArcLoop::new();
        let start = arcs
            .push_polygon(&[
                lat_lon(10.0, 10.0),
                lat_lon(10.0, -30.0),
                lat_lon(-30.0, -30.0),
                lat_lon(-30.0, 10.0),
            ])
            .unwrap();
        for kind in [ProjectionKind::Equirectangular, ProjectionKind::Octahedral] {
            let subdivider = AdaptiveCurveSubdivider::new(&arcs, &kind);
            let mut segments = Vec::new();
            subdivider.subdivide_loop(start, &mut segments);
            assert!(!segments.is_empty());

            let worst = worst_fit(&arcs, &kind, &segments);
            assert!(worst <= THRESHOLD, "{kind:?}: worst deviation {worst}");
        }
    }

    #[test]
    fn test_bezier_fit_on_random_arcs() {
        let mut rng = Xoshiro256StarStar::seed_from_u64(11);
        let mut checked = 0;
        while checked < 24 {
            let left = lat_lon(rng.gen_range(-60.0..60.0), rng.gen_range(-80.0..80.0));
            let right = lat_lon(rng.gen_range(-60.0..60.0), rng.gen_range(-80.0..80.0));
            if left.cross(right).length() < 0.1 {
                continue;
            }
            let (arcs, id) = single_arc(left, right);
            for kind in [ProjectionKind::Equirectangular, ProjectionKind::Octahedral] {
                let subdivider = AdaptiveCurveSubdivider::new(&arcs, &kind);
                let mut segments = Vec::new();
                subdivider.subdivide_arc(id, &mut segments);

                let worst = worst_fit(&arcs, &kind, &segments);
                assert!(worst <= THRESHOLD, "{kind:?} {left:?} -> {right:?}: {worst}");
            }
            checked += 1;
        }
    }

    #[test]
    fn test_bezier_midpoint_follows_projected_arc() {
        let (arcs, id) = single_arc(lat_lon(10.0, 10.0), lat_lon(50.0, 80.0));
        let projector = EquirectangularProjector;
        let subdivider = AdaptiveCurveSubdivider::new(&arcs, &projector);
        let mut segments = Vec::new();
        subdivider.subdivide_arc(id, &mut segments);

        let arc = &arcs[id];
        for segment in &segments {
            let span = segment.span.unwrap();
            let on_arc = projector.project(arc.evaluate((span.begin + span.end) * 0.5, 0.0));
            assert!(segment.point_at(0.5).distance(on_arc) < 1e-3);
        }
    }

    #[test]
    fn test_no_span_straddles_a_sign_change() {
        // Crosses x = 0 and then z = 0 in the upper hemisphere.
        let (arcs, id) = single_arc(lat_lon(20.0, 60.0), lat_lon(30.0, 200.0));
        let projector = OctahedralProjector;
        let subdivider = AdaptiveCurveSubdivider::new(&arcs, &projector);
        let mut segments = Vec::new();
        subdivider.subdivide_arc(id, &mut segments);

        let arc = &arcs[id];
        for segment in &segments {
            let span = segment.span.unwrap();
            let first = arc.evaluate(span.begin, 0.0);
            let last = arc.evaluate(span.end, 0.0);
            for axis in [0, 2] {
                assert!(
                    first[axis] * last[axis] >= 0.0,
                    "span {span:?} changes sign on axis {axis}"
                );
            }
        }
    }

    #[test]
    fn test_short_span_is_dropped() {
        let (arcs, id) = single_arc(lat_lon(10.0, 10.0), lat_lon(50.0, 80.0));
        let projector = EquirectangularProjector;
        let subdivider = AdaptiveCurveSubdivider::new(&arcs, &projector);
        let mut segments = Vec::new();
        subdivider.add_line(id, 0.1, 0.1 + DELTA, &mut segments);
        assert!(segments.is_empty());
    }

    #[test]
    fn test_straight_projection_keeps_control_on_chord() {
        // Great circles are straight lines in an octant of the octahedral chart.
        let (arcs, id) = single_arc(lat_lon(30.0, 20.0), lat_lon(40.0, 70.0));
        let projector = OctahedralProjector;
        let subdivider = AdaptiveCurveSubdivider::new(&arcs, &projector);
        let mut segments = Vec::new();
        subdivider.subdivide_arc(id, &mut segments);

        for segment in &segments {
            let off_chord =
                point_line_distance(segment.begin_uv, segment.end_uv, segment.control_point);
            assert!(off_chord < 1e-4);
        }
    }
}
