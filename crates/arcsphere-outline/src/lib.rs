//! Flat vector outlines of spherical arc loops.
//!
//! A loop is projected into the unit square through a [`SphereToPlane`]
//! chart, approximated by quadratic Beziers within `THRESHOLD`, and stitched
//! into closed shapes that are handed to a [`ShapeSink`]. Where the chart has
//! seams the shapes are closed along the border of the square.

mod bezier;
mod context;
mod error;
mod perimeter;
mod signs;
mod sink;
mod stitch;
mod subdivide;
mod svg;

use std::ops::AddAssign;

use arcsphere_geometry::{ArcId, ArcLoop, SphereToPlane};

pub use bezier::{ArcSpan, QuadraticBezier, SegmentId, line_intersection, point_line_distance};
pub use context::ExportContext;
pub use error::OutlineError;
pub use perimeter::{
    PERIMETER, clockwise_direction, corner_at, corners_between, perimeter_key, walk_distance,
};
pub use signs::SignMatrix;
pub use sink::{ShapeCollector, ShapeSink};
pub use stitch::{
    BoundaryStitcher, assemble_shapes, build_adjacency, clamp_to_border, project_onto_square,
    snap_endpoints,
};
pub use subdivide::{AdaptiveCurveSubdivider, MAX_SUBDIVISION_DEPTH};
pub use svg::{SvgPathSink, SvgStyle};

/// Counts reported by an export.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct ExportStats {
    /// Segments approximating arcs.
    pub segments: usize,
    /// Border connectors inserted at seams.
    pub connectors: usize,
    /// Closed shapes handed to the sink.
    pub shapes: usize,
}

impl AddAssign for ExportStats {
    fn add_assign(&mut self, other: Self) {
        self.segments += other.segments;
        self.connectors += other.connectors;
        self.shapes += other.shapes;
    }
}

/// Exports loops of one arena through one chart.
pub struct OutlineExporter<'a, P> {
    arcs: &'a ArcLoop,
    projector: &'a P,
}

impl<'a, P: SphereToPlane> OutlineExporter<'a, P> {
    pub fn new(arcs: &'a ArcLoop, projector: &'a P) -> Self {
        Self { arcs, projector }
    }

    /// Export the loop through `start` with a fresh context.
    pub fn export<S: ShapeSink>(&self, start: ArcId, sink: &mut S) -> Result<ExportStats, OutlineError> {
        let mut context = ExportContext::new();
        self.export_with(&mut context, start, sink)
    }

    /// Export the loop through `start`, reusing `context`'s allocations.
    ///
    /// The context is cleared first; afterwards it still holds the segments
    /// of this export for inspection.
    pub fn export_with<S: ShapeSink>(
        &self,
        context: &mut ExportContext,
        start: ArcId,
        sink: &mut S,
    ) -> Result<ExportStats, OutlineError> {
        context.clear();

        AdaptiveCurveSubdivider::new(self.arcs, self.projector)
            .subdivide_loop(start, &mut context.segments);
        let segments = context.segments.len();
        if segments == 0 {
            return Err(OutlineError::EmptyLoop);
        }

        let connectors = BoundaryStitcher::new(self.arcs, self.projector).stitch(context)?;
        let shapes = assemble_shapes(context, sink)?;

        let stats = ExportStats {
            segments,
            connectors,
            shapes,
        };
        tracing::info!(
            start = start.index(),
            segments,
            connectors,
            shapes,
            "exported loop"
        );
        Ok(stats)
    }
}

/// Export the loop through `start` into `sink`.
pub fn export_loop<P: SphereToPlane, S: ShapeSink>(
    arcs: &ArcLoop,
    start: ArcId,
    projector: &P,
    sink: &mut S,
) -> Result<ExportStats, OutlineError> {
    OutlineExporter::new(arcs, projector).export(start, sink)
}

/// Export several loops of one arena into the same sink, stopping at the
/// first failure.
pub fn export_loops<P: SphereToPlane, S: ShapeSink>(
    arcs: &ArcLoop,
    starts: &[ArcId],
    projector: &P,
    sink: &mut S,
) -> Result<ExportStats, OutlineError> {
    let exporter = OutlineExporter::new(arcs, projector);
    let mut context = ExportContext::new();
    let mut total = ExportStats::default();
    for &start in starts {
        total += exporter.export_with(&mut context, start, sink)?;
    }
    Ok(total)
}
