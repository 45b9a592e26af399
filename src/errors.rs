//! Error types for segment loading, graph construction and graph mutation
//!

use thiserror::Error;

use crate::breakpoint_graph::{EdgeId, SegmentId};
use crate::structural_variant::Orientation;

/// Input data integrity failures
///
/// All of these are fatal for the sample: they are reported before any graph is returned.
///
#[derive(Debug, Error, PartialEq)]
pub enum DataError {
    #[error("Copy number segment on {chrom} has start {start} greater than end {end}")]
    InvalidSegment { chrom: String, start: i64, end: i64 },

    #[error(
        "Copy number segments on {chrom} are not sorted: segment starting at {start} follows segment starting at {prev_start}"
    )]
    Unsorted {
        chrom: String,
        prev_start: i64,
        start: i64,
    },

    #[error(
        "Copy number segments on {chrom} overlap: segment starting at {start} overlaps previous segment ending at {prev_end}"
    )]
    Overlap {
        chrom: String,
        prev_end: i64,
        start: i64,
    },

    #[error(
        "Structural variant '{sv_id}' breakend {chrom}:{pos} with orientation {orientation} does not match a copy number segment boundary"
    )]
    BreakendMisplaced {
        sv_id: String,
        chrom: String,
        pos: i64,
        orientation: Orientation,
    },
}

/// Breakpoint graph mutation failures
///
#[derive(Debug, Error, PartialEq)]
pub enum GraphError {
    /// Recoverable: the requested reference merge is skipped
    #[error("Merge of segments {left} and {right} would span a centromere")]
    CentromereSpan { left: SegmentId, right: SegmentId },

    /// Internal invariant violation, never recoverable
    #[error("Edge {edge} found at segment {segment} has no mirror adjacency")]
    UnpairedEdge { edge: EdgeId, segment: SegmentId },
}
