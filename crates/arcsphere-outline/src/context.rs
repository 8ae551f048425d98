//! Working state of one export.

use rustc_hash::FxHashMap;

use crate::bezier::{QuadraticBezier, SegmentId};

/// Everything a single loop export writes to.
///
/// Created fresh (or [`cleared`](Self::clear)) for every loop, so exports never
/// share state. The adjacency map is drained by shape assembly and is empty
/// again once an export succeeds.
#[derive(Debug, Default)]
pub struct ExportContext {
    pub(crate) segments: Vec<QuadraticBezier>,
    pub(crate) adjacency: FxHashMap<SegmentId, SegmentId>,
    pub(crate) exits: Vec<SegmentId>,
    pub(crate) entries: Vec<SegmentId>,
}

impl ExportContext {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn clear(&mut self) {
        self.segments.clear();
        self.adjacency.clear();
        self.exits.clear();
        self.entries.clear();
    }

    /// Every segment of the current export, connectors last.
    pub fn segments(&self) -> &[QuadraticBezier] {
        &self.segments
    }

    pub fn segment(&self, id: SegmentId) -> &QuadraticBezier {
        &self.segments[id.index()]
    }

    /// Number of successor links not yet consumed by shape assembly.
    pub fn pending_links(&self) -> usize {
        self.adjacency.len()
    }

    /// Segments whose end leaves the square, in loop order.
    pub fn exits(&self) -> &[SegmentId] {
        &self.exits
    }

    /// Segments whose begin re-enters the square, in loop order.
    pub fn entries(&self) -> &[SegmentId] {
        &self.entries
    }

    pub(crate) fn push(&mut self, segment: QuadraticBezier) -> SegmentId {
        let id = SegmentId(self.segments.len() as u32);
        self.segments.push(segment);
        id
    }

    pub(crate) fn link(&mut self, from: SegmentId, to: SegmentId) {
        self.adjacency.insert(from, to);
    }
}
