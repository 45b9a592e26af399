//! Detection of locally simplifiable SV patterns around one segment
//!
//! Each detector inspects the adjacency lists of one segment and its reference neighbors, and if
//! the pattern is found returns an unscored candidate simplification. Detectors never change the
//! graph.
//!

use unwrap::unwrap;

use super::consistency::evaluate_adjacency;
use super::{Simplification, SimplificationType};
use crate::breakpoint_graph::{Adjacency, BreakpointGraph, SegmentId, UNPLACED};
use crate::structural_variant::Orientation;

/// Signature of all pattern detectors
pub type PatternDetector = fn(&BreakpointGraph, SegmentId) -> Option<Simplification>;

/// Pattern detectors in the order they are tried on each segment
pub const PATTERN_DETECTORS: [PatternDetector; 3] = [
    find_simple_duplication,
    find_simple_deletion,
    find_simple_inversion,
];

fn single_sv_adjacency(
    graph: &BreakpointGraph,
    id: SegmentId,
    orientation: Orientation,
) -> Option<Adjacency> {
    let mut adjacencies = graph.sv_adjacencies(id, orientation);
    let first = adjacencies.next()?;
    if adjacencies.next().is_some() {
        None
    } else {
        Some(*first)
    }
}

/// Get the reference neighbor on the given side of a segment, only if the reference edge is the
/// sole adjacency on that side
///
fn sole_reference_neighbor(
    graph: &BreakpointGraph,
    id: SegmentId,
    orientation: Orientation,
) -> Option<SegmentId> {
    match graph.adjacencies(id, orientation) {
        [adjacency] if !graph.edge(adjacency.edge).is_sv() => Some(adjacency.to),
        _ => None,
    }
}

fn sv_ploidy(graph: &BreakpointGraph, adjacency: &Adjacency) -> f64 {
    unwrap!(graph.edge(adjacency.edge).ploidy(), "Expected SV edge")
}

fn sv_index(graph: &BreakpointGraph, adjacency: &Adjacency) -> usize {
    unwrap!(graph.edge(adjacency.edge).sv_index(), "Expected SV edge")
}

/// Tandem duplication of one segment
///
/// The start side and end side of the segment each have exactly one SV adjacency, and both are
/// the same edge looping from the segment end back to its start.
///
/// Consistency is evaluated at the start side junction when the segment has a start-side
/// reference neighbor, and at the end side junction otherwise.
///
pub fn find_simple_duplication(graph: &BreakpointGraph, id: SegmentId) -> Option<Simplification> {
    let start_adjacency = single_sv_adjacency(graph, id, Orientation::Reverse)?;
    let end_adjacency = single_sv_adjacency(graph, id, Orientation::Forward)?;
    if start_adjacency.edge != end_adjacency.edge {
        return None;
    }

    let ploidy = sv_ploidy(graph, &start_adjacency);
    let scored_adjacency = if graph
        .reference_adjacency(id, Orientation::Reverse)
        .is_some()
    {
        &start_adjacency
    } else {
        &end_adjacency
    };
    let consistency = evaluate_adjacency(graph, scored_adjacency, ploidy);

    Some(Simplification {
        simplification_type: SimplificationType::SimpleDuplication,
        sv_indices: vec![sv_index(graph, &start_adjacency)],
        consistency: vec![consistency],
        ploidy,
        removed_adjacencies: vec![end_adjacency],
    })
}

/// Deletion of one segment
///
/// The segment is joined only by reference edges to its left and right neighbors, and a single
/// SV joins the end of the left neighbor directly to the start of the right neighbor. The
/// deletion is scored from the left neighbor, so that the deleted segment is the reference path.
///
pub fn find_simple_deletion(graph: &BreakpointGraph, id: SegmentId) -> Option<Simplification> {
    let left = sole_reference_neighbor(graph, id, Orientation::Reverse)?;
    let right = sole_reference_neighbor(graph, id, Orientation::Forward)?;
    if left == UNPLACED || right == UNPLACED {
        return None;
    }

    let deletion = single_sv_adjacency(graph, left, Orientation::Forward)?;
    if deletion.to != right || deletion.to_orientation != Orientation::Reverse {
        return None;
    }
    let right_sv = single_sv_adjacency(graph, right, Orientation::Reverse)?;
    if right_sv.edge != deletion.edge {
        return None;
    }

    let ploidy = sv_ploidy(graph, &deletion);
    let consistency = evaluate_adjacency(graph, &deletion, ploidy);

    Some(Simplification {
        simplification_type: SimplificationType::SimpleIndel,
        sv_indices: vec![sv_index(graph, &deletion)],
        consistency: vec![consistency],
        ploidy,
        removed_adjacencies: vec![deletion],
    })
}

/// Balanced inversion of one segment
///
/// The segment has exactly one SV and one reference edge on each side. The start-side SV joins
/// the segment start to the start of the right neighbor, and the end-side SV joins the segment
/// end to the end of the left neighbor. The neighbors have no other SV adjacencies on the sides
/// facing the segment.
///
/// Each SV is scored at its breakend on the inverted segment, and the event ploidy is the mean
/// of the two SV ploidies.
///
pub fn find_simple_inversion(graph: &BreakpointGraph, id: SegmentId) -> Option<Simplification> {
    let start_sv = single_sv_adjacency(graph, id, Orientation::Reverse)?;
    let end_sv = single_sv_adjacency(graph, id, Orientation::Forward)?;
    if start_sv.edge == end_sv.edge {
        return None;
    }

    for adjacency in [&start_sv, &end_sv] {
        if graph.adjacencies(id, adjacency.from_orientation).len() != 2 {
            return None;
        }
    }
    let left = graph.reference_adjacency(id, Orientation::Reverse)?.to;
    let right = graph.reference_adjacency(id, Orientation::Forward)?.to;

    if start_sv.to != right || start_sv.to_orientation != Orientation::Reverse {
        return None;
    }
    if end_sv.to != left || end_sv.to_orientation != Orientation::Forward {
        return None;
    }
    if single_sv_adjacency(graph, left, Orientation::Forward)?.edge != end_sv.edge {
        return None;
    }
    if single_sv_adjacency(graph, right, Orientation::Reverse)?.edge != start_sv.edge {
        return None;
    }

    let ploidy = (sv_ploidy(graph, &start_sv) + sv_ploidy(graph, &end_sv)) / 2.0;
    let consistency = [&start_sv, &end_sv]
        .into_iter()
        .map(|x| evaluate_adjacency(graph, x, ploidy))
        .collect();

    Some(Simplification {
        simplification_type: SimplificationType::SimpleInversion,
        sv_indices: vec![sv_index(graph, &start_sv), sv_index(graph, &end_sv)],
        consistency,
        ploidy,
        removed_adjacencies: vec![start_sv, end_sv],
    })
}
