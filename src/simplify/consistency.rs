use unwrap::unwrap;

use crate::breakpoint_graph::{Adjacency, BreakpointGraph};
use crate::copy_number_segment::CopyNumberSegment;

/// Copy number consistency of one SV breakend within its graph context
///
#[derive(Clone, Debug, PartialEq)]
pub struct BreakendConsistency {
    /// Index of the structural variant in the input SV list
    pub sv_index: usize,

    /// Nominal ploidy of the whole simplification event
    pub event_ploidy: f64,

    /// Ploidy observed for this SV
    pub sv_ploidy: f64,

    /// Ploidy of the segment on the breakend side of the SV junction
    pub anchor_ploidy: f64,

    /// Ploidy of the reference path segment across the junction from the anchor
    pub reference_path_ploidy: f64,

    /// Ploidy of other SVs sharing the junction: same orientation SVs add, opposite orientation
    /// SVs subtract
    pub other_sv_ploidy: f64,
}

impl BreakendConsistency {
    pub fn copy_number_delta(&self) -> f64 {
        self.anchor_ploidy - self.reference_path_ploidy - self.event_ploidy
    }

    pub fn event_delta(&self) -> f64 {
        self.event_ploidy - self.sv_ploidy
    }
}

/// Compute breakend consistency from the ploidy of an SV and its flanking segments
///
/// Missing anchor or reference path segments represent the unplaced sentinel and contribute
/// zero ploidy.
///
pub fn evaluate(
    anchor: Option<&CopyNumberSegment>,
    reference_path: Option<&CopyNumberSegment>,
    sv_index: usize,
    sv_ploidy: f64,
    alternate_sv_ploidies: &[f64],
    opposite_orientation_sv_ploidies: &[f64],
    nominal_ploidy: f64,
) -> BreakendConsistency {
    let segment_ploidy = |x: Option<&CopyNumberSegment>| x.map(|s| s.copy_number).unwrap_or(0.0);
    BreakendConsistency {
        sv_index,
        event_ploidy: nominal_ploidy,
        sv_ploidy,
        anchor_ploidy: segment_ploidy(anchor),
        reference_path_ploidy: segment_ploidy(reference_path),
        other_sv_ploidy: alternate_sv_ploidies.iter().sum::<f64>()
            - opposite_orientation_sv_ploidies.iter().sum::<f64>(),
    }
}

/// Evaluate the consistency of one SV adjacency in the graph
///
/// The anchor is the segment the adjacency leaves from. The reference path is the segment joined
/// to that same side of the anchor by a reference edge, if any. Other SVs on the anchor side are
/// same-orientation SVs, and SVs on the facing side of the reference path segment are
/// opposite-orientation SVs.
///
pub fn evaluate_adjacency(
    graph: &BreakpointGraph,
    adjacency: &Adjacency,
    nominal_ploidy: f64,
) -> BreakendConsistency {
    let edge = graph.edge(adjacency.edge);
    let sv_index = unwrap!(edge.sv_index(), "Consistency evaluated on a reference edge");
    let sv_ploidy = unwrap!(edge.ploidy(), "Consistency evaluated on a reference edge");

    let sv_ploidies = |adjacencies: Vec<&Adjacency>| {
        adjacencies
            .into_iter()
            .filter(|x| x.edge != adjacency.edge)
            .filter_map(|x| graph.edge(x.edge).ploidy())
            .collect::<Vec<_>>()
    };

    let alternate_sv_ploidies = sv_ploidies(
        graph
            .sv_adjacencies(adjacency.from, adjacency.from_orientation)
            .collect(),
    );

    let reference_adjacency = graph.reference_adjacency(adjacency.from, adjacency.from_orientation);
    let reference_path = reference_adjacency.and_then(|x| graph.segment(x.to));
    let opposite_orientation_sv_ploidies = match reference_adjacency {
        Some(x) => sv_ploidies(graph.sv_adjacencies(x.to, x.to_orientation).collect()),
        None => Vec::new(),
    };

    evaluate(
        graph.segment(adjacency.from),
        reference_path,
        sv_index,
        sv_ploidy,
        &alternate_sv_ploidies,
        &opposite_orientation_sv_ploidies,
        nominal_ploidy,
    )
}
