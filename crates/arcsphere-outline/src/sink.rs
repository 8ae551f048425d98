//! Consumers of assembled planar shapes.

use crate::bezier::QuadraticBezier;

/// Receives closed shapes one edge at a time.
///
/// Every `begin_shape` is followed by the shape's edges in order and one
/// `end_shape`; the last edge of a shape ends where its first edge begins.
pub trait ShapeSink {
    fn begin_shape(&mut self);
    fn add_edge(&mut self, edge: &QuadraticBezier);
    fn end_shape(&mut self);
}

impl<S: ShapeSink + ?Sized> ShapeSink for &mut S {
    fn begin_shape(&mut self) {
        (**self).begin_shape();
    }

    fn add_edge(&mut self, edge: &QuadraticBezier) {
        (**self).add_edge(edge);
    }

    fn end_shape(&mut self) {
        (**self).end_shape();
    }
}

/// Keeps every shape in memory.
#[derive(Debug, Default)]
pub struct ShapeCollector {
    pub shapes: Vec<Vec<QuadraticBezier>>,
    current: Vec<QuadraticBezier>,
}

impl ShapeCollector {
    pub fn new() -> Self {
        Self::default()
    }
}

impl ShapeSink for ShapeCollector {
    fn begin_shape(&mut self) {
        self.current.clear();
    }

    fn add_edge(&mut self, edge: &QuadraticBezier) {
        self.current.push(*edge);
    }

    fn end_shape(&mut self) {
        self.shapes.push(std::mem::take(&mut self.current));
    }
}
