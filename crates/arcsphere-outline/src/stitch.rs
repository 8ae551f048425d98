//! Stitching the segment soup of one loop into closed planar shapes.
//!
//! Consecutive segments either meet (up to [`THRESHOLD`]) or sit on opposite
//! sides of a seam. Seam endpoints are pushed onto the border of the square,
//! and every segment leaving the square is joined to a segment entering it
//! by connectors running along the border.

use arcsphere_geometry::{ArcLoop, SphereToPlane, THRESHOLD};
use glam::Vec2;

use crate::bezier::{QuadraticBezier, SegmentId, line_intersection};
use crate::context::ExportContext;
use crate::error::OutlineError;
use crate::perimeter::{clockwise_direction, corners_between, perimeter_key, walk_distance};
use crate::sink::ShapeSink;

/// The four borders of the unit square, each as two points on it.
const BORDERS: [(Vec2, Vec2); 4] = [
    (Vec2::new(0.0, 1.0), Vec2::new(1.0, 1.0)),
    (Vec2::new(1.0, 0.0), Vec2::new(1.0, 1.0)),
    (Vec2::new(0.0, 0.0), Vec2::new(1.0, 0.0)),
    (Vec2::new(0.0, 0.0), Vec2::new(0.0, 1.0)),
];

/// Where the line from `control` through `point` meets the border of the
/// square, choosing the meeting point nearest to `point`.
///
/// Results lie exactly on a border, so [`perimeter_key`] accepts them.
pub fn project_onto_square(point: Vec2, control: Vec2) -> Option<Vec2> {
    BORDERS
        .iter()
        .filter_map(|&(a, b)| line_intersection(control, point, a, b))
        .filter(|hit| (0.0..=1.0).contains(&hit.x) && (0.0..=1.0).contains(&hit.y))
        .min_by(|a, b| a.distance_squared(point).total_cmp(&b.distance_squared(point)))
}

/// Turns the segments of one loop into a successor map, bridging seams.
pub struct BoundaryStitcher<'a, P> {
    arcs: &'a ArcLoop,
    projector: &'a P,
}

impl<'a, P: SphereToPlane> BoundaryStitcher<'a, P> {
    pub fn new(arcs: &'a ArcLoop, projector: &'a P) -> Self {
        Self { arcs, projector }
    }

    /// Run every pass over the segments in `context`. Returns the number of
    /// connectors inserted.
    pub fn stitch(&self, context: &mut ExportContext) -> Result<usize, OutlineError> {
        clamp_to_border(context);
        snap_endpoints(context);
        build_adjacency(context);
        self.resolve_discontinuities(context)
    }

    /// Pair every exit with an entry and insert the border connectors between
    /// them. Returns the number of connectors inserted.
    pub fn resolve_discontinuities(&self, context: &mut ExportContext) -> Result<usize, OutlineError> {
        if context.exits.is_empty() {
            return Ok(0);
        }

        let mut entries = context
            .entries
            .iter()
            .map(|&id| Ok((perimeter_key(context.segment(id).begin_uv)?, id)))
            .collect::<Result<Vec<_>, OutlineError>>()?;
        let mut exits = context
            .exits
            .iter()
            .map(|&id| Ok((perimeter_key(context.segment(id).end_uv)?, id)))
            .collect::<Result<Vec<_>, OutlineError>>()?;
        entries.sort_by(|a, b| a.0.total_cmp(&b.0));
        exits.sort_by(|a, b| a.0.total_cmp(&b.0));

        let mut claimed = vec![false; entries.len()];
        let mut connectors = 0;
        for (key, exit) in exits {
            let clockwise = self.walks_clockwise(context.segment(exit), key);
            let nearest = entries
                .iter()
                .enumerate()
                .filter(|(index, _)| !claimed[*index])
                .min_by(|(_, a), (_, b)| {
                    walk_distance(key, a.0, clockwise).total_cmp(&walk_distance(key, b.0, clockwise))
                });
            // Exits and entries are recorded in pairs, so this only fails
            // if they were not.
            let Some((index, &(entry_key, entry))) = nearest else {
                return Err(OutlineError::UnpairedDiscontinuity { key });
            };
            claimed[index] = true;

            tracing::debug!(
                exit = exit.index(),
                entry = entry.index(),
                from = key,
                to = entry_key,
                clockwise,
                "bridging discontinuity"
            );

            let mut previous = exit;
            let mut from = context.segment(exit).end_uv;
            for corner in corners_between(key, entry_key, clockwise) {
                let id = context.push(QuadraticBezier::connector(from, corner));
                context.link(previous, id);
                previous = id;
                from = corner;
                connectors += 1;
            }
            let to = context.segment(entry).begin_uv;
            let id = context.push(QuadraticBezier::connector(from, to));
            context.link(previous, id);
            context.link(id, entry);
            connectors += 1;
        }
        Ok(connectors)
    }

    /// Whether the outline continues clockwise along the border after `exit`.
    ///
    /// The region lies to the right of travel, so the border walk follows the
    /// arc's right-hand side where it leaves the square.
    fn walks_clockwise(&self, exit: &QuadraticBezier, key: f32) -> bool {
        let Some(span) = exit.span else {
            return true;
        };
        let arc = &self.arcs[span.arc];
        let point = arc.evaluate(span.end, 0.0);
        let tangent = arc.evaluate_tangent(span.end);
        let normal = arc.evaluate_normal(span.end, 0.0);
        let side = (normal - tangent * normal.dot(tangent)).normalize_or_zero();
        let planar = self.projector.project_direction(point, side);
        planar.dot(clockwise_direction(key)) > 0.0
    }
}

/// Push both ends of every gap wider than [`THRESHOLD`] onto the border.
pub fn clamp_to_border(context: &mut ExportContext) {
    let count = context.segments.len();
    for a in 0..count {
        let b = (a + 1) % count;
        if context.segments[a].end_uv.distance(context.segments[b].begin_uv) <= THRESHOLD {
            continue;
        }

        let exit = &mut context.segments[a];
        match project_onto_square(exit.end_uv, exit.control_point) {
            Some(point) => exit.end_uv = point,
            None => tracing::warn!(segment = a, uv = ?exit.end_uv, "no border intersection for segment end"),
        }
        let entry = &mut context.segments[b];
        match project_onto_square(entry.begin_uv, entry.control_point) {
            Some(point) => entry.begin_uv = point,
            None => tracing::warn!(segment = b, uv = ?entry.begin_uv, "no border intersection for segment begin"),
        }
    }
}

/// Close gaps narrower than [`THRESHOLD`] by moving both ends to their average.
pub fn snap_endpoints(context: &mut ExportContext) {
    let count = context.segments.len();
    for a in 0..count {
        let b = (a + 1) % count;
        let end = context.segments[a].end_uv;
        let begin = context.segments[b].begin_uv;
        if end.distance(begin) < THRESHOLD {
            let shared = (end + begin) * 0.5;
            context.segments[a].end_uv = shared;
            context.segments[b].begin_uv = shared;
        }
    }
}

/// Link consecutive segments that meet exactly; record the others as an
/// exit followed by an entry.
pub fn build_adjacency(context: &mut ExportContext) {
    let count = context.segments.len();
    for a in 0..count {
        let b = (a + 1) % count;
        let (from, to) = (SegmentId(a as u32), SegmentId(b as u32));
        if context.segments[a].end_uv == context.segments[b].begin_uv {
            context.link(from, to);
        } else {
            context.exits.push(from);
            context.entries.push(to);
        }
    }
}

/// Follow successor links from every segment still linked, in ascending
/// order, emitting one shape per cycle. Returns the number of shapes.
pub fn assemble_shapes<S: ShapeSink>(
    context: &mut ExportContext,
    sink: &mut S,
) -> Result<usize, OutlineError> {
    let mut shapes = 0;
    for index in 0..context.segments.len() {
        let start = SegmentId(index as u32);
        if !context.adjacency.contains_key(&start) {
            continue;
        }

        sink.begin_shape();
        let mut current = start;
        loop {
            sink.add_edge(&context.segments[current.index()]);
            let next = context
                .adjacency
                .remove(&current)
                .ok_or(OutlineError::UnlinkedSegment { segment: current })?;
            if next == start {
                break;
            }
            current = next;
        }
        sink.end_shape();
        shapes += 1;
    }
    Ok(shapes)
}
