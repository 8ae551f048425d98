//! End-to-end exports of whole loops.

use arcsphere_geometry::{
    ArcId, ArcLoop, EquirectangularProjector, OctahedralProjector, SphereToPlane,
};
use arcsphere_outline::{
    ExportContext, OutlineError, OutlineExporter, QuadraticBezier, ShapeCollector, SvgPathSink,
    export_loop, export_loops,
};
use glam::{Vec2, Vec3};

fn lat_lon(lat_deg: f32, lon_deg: f32) -> Vec3 {
    let (lat, lon) = (lat_deg.to_radians(), lon_deg.to_radians());
    Vec3::new(lat.cos() * lon.cos(), lat.sin(), lat.cos() * lon.sin())
}

/// Great-circle quad around the north pole.
fn polar_quad(arcs: &mut ArcLoop) -> ArcId {
    arcs.push_polygon(&[
        lat_lon(45.0, 45.0),
        lat_lon(45.0, -45.0),
        lat_lon(45.0, -135.0),
        lat_lon(45.0, 135.0),
    ])
    .expect("four vertices")
}

/// The latitude 60° circle travelled westwards, enclosing everything south
/// of it.
fn south_of_sixty(arcs: &mut ArcLoop) -> ArcId {
    let vertices = [
        lat_lon(60.0, 45.0),
        lat_lon(60.0, -45.0),
        lat_lon(60.0, -135.0),
        lat_lon(60.0, -225.0),
    ];
    arcs.push_polygon_with_normals(&vertices, &[Vec3::Y; 4])
        .expect("four vertices")
}

/// Small quad straddling the lower half of the `x = 0` plane.
fn seam_quad(arcs: &mut ArcLoop) -> ArcId {
    let center = Vec3::new(0.0, -0.6, 0.8);
    let across = Vec3::X * 0.1;
    let along = Vec3::new(0.0, 0.8, 0.6) * 0.1;
    arcs.push_polygon(&[
        center + across + along,
        center + across - along,
        center - across - along,
        center - across + along,
    ])
    .expect("four vertices")
}

fn assert_closed(shape: &[QuadraticBezier]) {
    for (i, edge) in shape.iter().enumerate() {
        let next = &shape[(i + 1) % shape.len()];
        assert_eq!(edge.end_uv, next.begin_uv, "edge {i} does not meet its successor");
    }
}

fn in_unit_square(uv: Vec2) -> bool {
    (0.0..=1.0).contains(&uv.x) && (0.0..=1.0).contains(&uv.y)
}

#[test]
fn seam_free_loop_is_a_single_closed_shape() {
    let mut arcs = ArcLoop::new();
    let start = polar_quad(&mut arcs);
    let projector = OctahedralProjector;

    let mut context = ExportContext::new();
    let mut collector = ShapeCollector::new();
    let stats = OutlineExporter::new(&arcs, &projector)
        .export_with(&mut context, start, &mut collector)
        .unwrap();

    assert_eq!(stats.shapes, 1);
    assert_eq!(stats.connectors, 0);
    assert_eq!(collector.shapes.len(), 1);
    assert_eq!(collector.shapes[0].len(), stats.segments);
    assert_eq!(context.pending_links(), 0);
    assert!(context.exits().is_empty());
    assert_closed(&collector.shapes[0]);
}

#[test]
fn segment_endpoints_lie_on_the_projected_loop() {
    let mut arcs = ArcLoop::new();
    let start = polar_quad(&mut arcs);
    let projector = OctahedralProjector;

    let mut context = ExportContext::new();
    let mut collector = ShapeCollector::new();
    OutlineExporter::new(&arcs, &projector)
        .export_with(&mut context, start, &mut collector)
        .unwrap();

    for segment in context.segments() {
        let span = segment.span.expect("no connectors without seams");
        let arc = &arcs[span.arc];
        let begin = projector.project(arc.evaluate(span.begin, 0.0));
        let end = projector.project(arc.evaluate(span.end, 0.0));
        assert!(segment.begin_uv.distance(begin) < 1e-5);
        assert!(segment.end_uv.distance(end) < 1e-5);
    }
}

#[test]
fn loop_across_the_antimeridian_closes_through_two_corners() {
    let mut arcs = ArcLoop::new();
    let start = south_of_sixty(&mut arcs);
    let projector = EquirectangularProjector;

    let mut context = ExportContext::new();
    let mut collector = ShapeCollector::new();
    let stats = OutlineExporter::new(&arcs, &projector)
        .export_with(&mut context, start, &mut collector)
        .unwrap();

    assert_eq!(stats.shapes, 1);
    assert_eq!(stats.connectors, 3);
    assert_eq!(context.pending_links(), 0);
    assert_eq!(context.exits().len(), 1);
    assert_eq!(context.entries().len(), 1);
    let shape = &collector.shapes[0];
    assert_eq!(shape.len(), stats.segments + stats.connectors);
    assert_closed(shape);

    let connectors: Vec<&QuadraticBezier> = shape.iter().filter(|e| e.is_connector()).collect();
    assert_eq!(connectors.len(), 3);
    let corners: Vec<Vec2> = connectors.iter().map(|c| c.end_uv).collect();
    assert!(corners.contains(&Vec2::new(0.0, 0.0)));
    assert!(corners.contains(&Vec2::new(1.0, 0.0)));
    // Leaves through the left border, comes back through the right one.
    assert_eq!(connectors[0].begin_uv.x, 0.0);
    assert_eq!(connectors[2].end_uv.x, 1.0);
    for edge in shape {
        assert!(in_unit_square(edge.begin_uv));
        assert!(in_unit_square(edge.end_uv));
    }
}

#[test]
fn loop_around_a_seam_splits_into_two_shapes() {
    let mut arcs = ArcLoop::new();
    let start = seam_quad(&mut arcs);
    let projector = OctahedralProjector;

    let mut context = ExportContext::new();
    let mut collector = ShapeCollector::new();
    let stats = OutlineExporter::new(&arcs, &projector)
        .export_with(&mut context, start, &mut collector)
        .unwrap();

    assert_eq!(stats.shapes, 2);
    assert_eq!(stats.connectors, 2);
    assert_eq!(context.pending_links(), 0);
    assert_eq!(context.exits().len(), 2);
    assert_eq!(context.exits().len(), context.entries().len());
    for shape in &collector.shapes {
        assert_closed(shape);
        let connectors: Vec<_> = shape.iter().filter(|e| e.is_connector()).collect();
        assert_eq!(connectors.len(), 1);
        // Both ends of the seam lie on the top border, on the same half.
        let connector = connectors[0];
        assert_eq!(connector.begin_uv.y, 1.0);
        assert_eq!(connector.end_uv.y, 1.0);
        assert_eq!(connector.begin_uv.x < 0.5, connector.end_uv.x < 0.5);
    }
}

#[test]
fn several_loops_share_one_sink() {
    let mut arcs = ArcLoop::new();
    let quad = polar_quad(&mut arcs);
    let seam = seam_quad(&mut arcs);
    let projector = OctahedralProjector;

    let mut sink = SvgPathSink::new(256.0);
    let stats = export_loops(&arcs, &[quad, seam], &projector, &mut sink).unwrap();

    assert_eq!(stats.shapes, 3);
    assert_eq!(sink.paths().len(), 3);
    for path in sink.paths() {
        assert!(path.starts_with("M "));
        assert!(path.ends_with(" Z"));
    }
    assert_eq!(sink.document().matches("<path ").count(), 3);
}

#[test]
fn loop_too_small_to_draw_is_empty() {
    let mut arcs = ArcLoop::new();
    let angle: f32 = 1e-5;
    let start = arcs.spawn_arc(Vec3::X, Vec3::new(angle.cos(), 0.0, -angle.sin()), Vec3::Y);

    let mut collector = ShapeCollector::new();
    let result = export_loop(&arcs, start, &OctahedralProjector, &mut collector);
    assert_eq!(result, Err(OutlineError::EmptyLoop));
    assert!(collector.shapes.is_empty());
}
