//! Outline export error types.

use crate::bezier::SegmentId;

/// Errors that abort exporting a loop.
///
/// None of these are recovered from: they mean the loop or the projection
/// violates an assumption the stitcher relies on, and the shapes emitted so
/// far for the loop are incomplete.
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum OutlineError {
    /// A discontinuity endpoint could not be placed on the square's border.
    #[error("point ({u}, {v}) is not on the border of the unit square")]
    OffBorder { u: f32, v: f32 },

    /// A segment leaving the square found no entry to walk to.
    ///
    /// Unreachable through [`crate::export_loop`]: the adjacency pass records
    /// every gap as one exit plus one entry, so each exit has an entry left
    /// to claim. Only an unbalanced context reaches it.
    #[error("discontinuity at perimeter position {key} has no matching entry")]
    UnpairedDiscontinuity { key: f32 },

    /// Shape assembly reached a segment without a successor.
    #[error("segment {} has no successor", segment.index())]
    UnlinkedSegment { segment: SegmentId },

    /// Every span of the loop was too short to emit.
    #[error("loop produced no outline segments")]
    EmptyLoop,
}
