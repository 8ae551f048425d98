//! Index-based arena holding closed loops of [`SphericalArc`]s.
//!
//! Arcs refer to their neighbours by [`ArcId`]; following `next` from any arc
//! walks its loop once and returns to the start. One arena may hold any number
//! of disjoint loops.

use std::ops::Index;

use glam::Vec3;

use crate::arc::SphericalArc;
use crate::precision::HANDOFF_RADIUS;

/// Handle of an arc inside an [`ArcLoop`].
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct ArcId(pub(crate) u32);

impl ArcId {
    /// Position of the arc in the arena.
    #[inline]
    pub fn index(self) -> usize {
        self.0 as usize
    }
}

/// Arena of arcs linked into circular doubly-linked loops.
#[derive(Clone, Debug, Default)]
pub struct ArcLoop {
    arcs: Vec<SphericalArc>,
}

impl ArcLoop {
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of arcs in the arena, across all loops.
    pub fn len(&self) -> usize {
        self.arcs.len()
    }

    pub fn is_empty(&self) -> bool {
        self.arcs.is_empty()
    }

    pub fn get(&self, id: ArcId) -> Option<&SphericalArc> {
        self.arcs.get(id.index())
    }

    fn next_id(&self) -> ArcId {
        ArcId(self.arcs.len() as u32)
    }

    /// Create an edge arc from `left_edge` to `right_edge` on the circle with
    /// axis `normal`. The arc starts out as a loop of one.
    pub fn spawn_arc(&mut self, left_edge: Vec3, right_edge: Vec3, normal: Vec3) -> ArcId {
        let id = self.next_id();
        self.arcs
            .push(SphericalArc::new(id, left_edge, right_edge, normal));
        id
    }

    /// Create the corner joint between `left` and `right` and link it between them.
    pub fn spawn_corner(&mut self, left: ArcId, right: ArcId) -> ArcId {
        let id = self.next_id();
        let corner = SphericalArc::corner(id, &self[left], &self[right]);
        self.arcs.push(corner);
        self.relink(id, left, right)
    }

    /// Insert `this` between `left` and `right`.
    pub fn relink(&mut self, this: ArcId, left: ArcId, right: ArcId) -> ArcId {
        self.arcs[this.index()].next = right;
        self.arcs[this.index()].prev = left;
        self.arcs[left.index()].next = this;
        self.arcs[right.index()].prev = this;
        this
    }

    /// Spawn a great-circle arc from `pos` to the start of `arc` and link it in
    /// front of `arc`.
    pub fn link_left(&mut self, arc: ArcId, pos: Vec3) -> ArcId {
        let left = self[arc].evaluate(0.0, 0.0);
        let prev = self[arc].prev;
        let spawned = self.spawn_arc(pos, left, pos.cross(left));
        self.relink(spawned, prev, arc)
    }

    /// Spawn a great-circle arc from the end of `arc` to `pos` and link it
    /// after `arc`.
    pub fn link_right(&mut self, arc: ArcId, pos: Vec3) -> ArcId {
        let right = self[arc].evaluate(self[arc].end(), 0.0);
        let next = self[arc].next;
        let spawned = self.spawn_arc(right, pos, right.cross(pos));
        self.relink(spawned, arc, next)
    }

    /// Evaluate at `t` on `arc`, handing off to neighbouring arcs when `t`
    /// runs off either end.
    ///
    /// On a hand-off `t` is re-rooted on the neighbour and `arc` is updated, so
    /// a moving character keeps its parameterization across arc boundaries.
    /// Once a hand-off happens the caller's `radius` is replaced by
    /// [`HANDOFF_RADIUS`] for the rest of the evaluation.
    pub fn evaluate_across(&self, t: &mut f32, radius: f32, arc: &mut ArcId) -> Vec3 {
        let mut radius = radius;
        loop {
            let current = &self[*arc];
            if *t > current.end() {
                *t -= current.end();
                *arc = current.next;
                radius = HANDOFF_RADIUS;
            } else if *t < 0.0 {
                let prev = current.prev;
                *t += self[prev].end();
                *arc = prev;
                radius = HANDOFF_RADIUS;
            } else {
                return current.evaluate(*t, radius);
            }
        }
    }

    /// Walk the loop containing `start` once, beginning with `start`.
    pub fn iter_loop(&self, start: ArcId) -> LoopIter<'_> {
        LoopIter {
            arcs: self,
            start,
            current: Some(start),
        }
    }

    /// The non-corner arcs of the loop containing `start`, in loop order.
    pub fn edges(&self, start: ArcId) -> impl Iterator<Item = ArcId> + '_ {
        self.iter_loop(start).filter(|&id| !self[id].is_corner())
    }

    /// Number of arcs (edges and corners) in the loop containing `start`.
    pub fn loop_len(&self, start: ArcId) -> usize {
        self.iter_loop(start).count()
    }

    /// Checks `next.prev == arc` and `prev.next == arc` for every arc of the loop.
    pub fn is_well_linked(&self, start: ArcId) -> bool {
        self.iter_loop(start).all(|id| {
            let arc = &self[id];
            self[arc.next].prev == id && self[arc.prev].next == id
        })
    }

    /// Build a closed loop of great-circle edges through `vertices`, with a
    /// corner joint at every vertex. Returns the first edge.
    ///
    /// The enclosed region lies to the right of the direction of travel, so
    /// vertices are listed clockwise as seen from outside the sphere.
    pub fn push_polygon(&mut self, vertices: &[Vec3]) -> Option<ArcId> {
        self.push_polygon_with_normals(vertices, &[])
    }

    /// Like [`Self::push_polygon`], with an explicit circle axis per edge.
    ///
    /// `normals[i]` is the axis of the edge from `vertices[i]` to
    /// `vertices[i + 1]`; missing entries fall back to the great circle.
    pub fn push_polygon_with_normals(
        &mut self,
        vertices: &[Vec3],
        normals: &[Vec3],
    ) -> Option<ArcId> {
        if vertices.len() < 3 {
            return None;
        }

        let edges: Vec<ArcId> = vertices
            .iter()
            .enumerate()
            .map(|(i, &left)| {
                let right = vertices[(i + 1) % vertices.len()];
                let normal = normals.get(i).copied().unwrap_or_else(|| left.cross(right));
                self.spawn_arc(left.normalize(), right.normalize(), normal)
            })
            .collect();

        for pair in edges.windows(2) {
            let next = self[pair[0]].next;
            self.relink(pair[1], pair[0], next);
        }
        for (i, &edge) in edges.iter().enumerate() {
            self.spawn_corner(edge, edges[(i + 1) % edges.len()]);
        }

        tracing::debug!(
            edges = edges.len(),
            arcs = self.len(),
            "built polygon loop"
        );
        edges.first().copied()
    }
}

impl Index<ArcId> for ArcLoop {
    type Output = SphericalArc;

    fn index(&self, id: ArcId) -> &SphericalArc {
        &self.arcs[id.index()]
    }
}

/// Iterator over one loop, see [`ArcLoop::iter_loop`].
pub struct LoopIter<'a> {
    arcs: &'a ArcLoop,
    start: ArcId,
    current: Option<ArcId>,
}

impl Iterator for LoopIter<'_> {
    type Item = ArcId;

    fn next(&mut self) -> Option<ArcId> {
        let id = self.current?;
        let next = self.arcs[id].next;
        self.current = (next != self.start).then_some(next);
        Some(id)
    }
}
