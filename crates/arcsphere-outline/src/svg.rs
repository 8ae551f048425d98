//! SVG path output.

use std::fmt::Write;

use glam::Vec2;

use crate::bezier::QuadraticBezier;
use crate::sink::ShapeSink;

/// Fill and stroke applied to every path of a document.
#[derive(Clone, Debug, PartialEq)]
pub struct SvgStyle {
    pub fill: String,
    pub stroke: String,
    pub stroke_width: f32,
}

impl Default for SvgStyle {
    fn default() -> Self {
        Self {
            fill: "#7fb3d5".to_string(),
            stroke: "#1b2631".to_string(),
            stroke_width: 1.0,
        }
    }
}

/// Writes each shape as the data of one SVG `<path>`.
///
/// The unit square is scaled to `size` with `v` flipped, so `v = 1` is the
/// top of the image: `(u, v) -> (u·size, (1 − v)·size)`.
#[derive(Debug)]
pub struct SvgPathSink {
    size: f32,
    style: SvgStyle,
    paths: Vec<String>,
    current: String,
}

impl SvgPathSink {
    pub fn new(size: f32) -> Self {
        Self::with_style(size, SvgStyle::default())
    }

    pub fn with_style(size: f32, style: SvgStyle) -> Self {
        Self {
            size,
            style,
            paths: Vec::new(),
            current: String::new(),
        }
    }

    /// Path data of every finished shape.
    pub fn paths(&self) -> &[String] {
        &self.paths
    }

    fn to_image(&self, uv: Vec2) -> Vec2 {
        Vec2::new(uv.x * self.size, (1.0 - uv.y) * self.size)
    }

    /// A standalone SVG document holding every finished path.
    pub fn document(&self) -> String {
        let mut out = String::new();
        let _ = writeln!(
            out,
            r#"<svg xmlns="http://www.w3.org/2000/svg" viewBox="0 0 {0} {0}" width="{0}" height="{0}">"#,
            self.size
        );
        for path in &self.paths {
            let _ = writeln!(
                out,
                r#"  <path d="{path}" fill="{}" fill-rule="evenodd" stroke="{}" stroke-width="{}"/>"#,
                self.style.fill, self.style.stroke, self.style.stroke_width
            );
        }
        out.push_str("</svg>\n");
        out
    }
}

impl ShapeSink for SvgPathSink {
    fn begin_shape(&mut self) {
        self.current.clear();
    }

    fn add_edge(&mut self, edge: &QuadraticBezier) {
        if self.current.is_empty() {
            let begin = self.to_image(edge.begin_uv);
            let _ = write!(self.current, "M {:.3} {:.3}", begin.x, begin.y);
        }
        let control = self.to_image(edge.control_point);
        let end = self.to_image(edge.end_uv);
        let _ = write!(
            self.current,
            " Q {:.3} {:.3} {:.3} {:.3}",
            control.x, control.y, end.x, end.y
        );
    }

    fn end_shape(&mut self) {
        self.current.push_str(" Z");
        self.paths.push(std::mem::take(&mut self.current));
    }
}
