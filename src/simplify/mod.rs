//! Iterative simplification of the breakpoint graph
//!
//! The engine repeatedly searches for a local SV pattern which the simplification strategy
//! accepts, removes its SV edges from the graph, and then merges all segments left joined only by
//! reference edges. The loop stops when no accepted pattern remains.
//!
//! Search order is deterministic: segments are visited in genomic order, and on each segment
//! the pattern detectors are tried in the order of [patterns::PATTERN_DETECTORS]. The first
//! accepted candidate is applied and the search then restarts from the first segment.
//!

mod consistency;
mod patterns;
mod strategy;

use std::collections::{BTreeMap, BTreeSet};

use itertools::Itertools;
use log::{debug, warn};
use serde::Serialize;

pub use self::consistency::BreakendConsistency;
use self::patterns::PATTERN_DETECTORS;
pub use self::strategy::{AcceptAllStrategy, DefaultSimplificationStrategy, SimplificationStrategy};
use crate::breakpoint_graph::{Adjacency, BreakpointGraph};
use crate::errors::GraphError;
use crate::log_utils::debug_msg;
use crate::structural_variant::{Orientation, StructuralVariant};

#[derive(Clone, Copy, Debug, Eq, PartialEq, Ord, PartialOrd, strum::Display)]
#[strum(serialize_all = "SCREAMING_SNAKE_CASE")]
pub enum SimplificationType {
    SimpleDuplication,
    SimpleIndel,
    TranslocationInsertion,
    SimpleInversion,
    Chain,
    ChainToFoldBackInversion,
}

/// An accepted (or candidate) reduction of one or more SVs into a single event
///
#[derive(Clone, Debug)]
pub struct Simplification {
    pub simplification_type: SimplificationType,

    /// Indices of the consumed SVs in the input SV list
    pub sv_indices: Vec<usize>,

    /// Consistency of each consumed SV, in the same order as `sv_indices`
    pub consistency: Vec<BreakendConsistency>,

    /// Combined event ploidy
    pub ploidy: f64,

    /// SV adjacencies removed from the graph to apply this simplification, each removal includes
    /// the adjacency mirror
    pub removed_adjacencies: Vec<Adjacency>,
}

pub struct SimplifyEngineSettings {
    /// Stop after this many accepted simplifications
    pub max_iterations: Option<usize>,

    /// Log details of each accepted simplification at info level instead of debug level
    pub debug: bool,
}

#[derive(Default, Serialize)]
pub struct SimplifyStats {
    pub accepted_simplification_count: usize,
    pub accepted_simplifications_by_type: BTreeMap<String, usize>,

    /// Count of distinct candidates rejected by the strategy
    pub rejected_candidate_count: usize,

    pub reference_merge_count: usize,

    /// Count of distinct segment junctions which could not be merged across a centromere
    pub centromere_merge_skip_count: usize,

    pub iteration_limit_reached: bool,
}

pub struct SimplifyResult {
    pub simplifications: Vec<Simplification>,
    pub stats: SimplifyStats,
}

/// Merge every pure reference segment with a reference neighbor, until no merge is possible
///
/// A segment with no SV adjacency on either side is merged with its right neighbor if the
/// neighbor's start side has no SV adjacency, otherwise with its left neighbor if that neighbor's
/// end side has no SV adjacency. Merges across a centromere are skipped.
///
/// Segments are visited once in genomic order. After a merge the merged segment is visited
/// again, since it is the only segment whose merge options have changed.
///
/// # Arguments
/// * `centromere_skips` - Accumulates the distinct junctions skipped at a centromere, each given
///   as the chromosome index and end position of the segment left of the junction
///
/// Returns the number of merges performed
///
pub fn merge_reference_runs(
    graph: &mut BreakpointGraph,
    centromere_skips: &mut BTreeSet<(usize, i64)>,
) -> Result<usize, GraphError> {
    let mut merge_count = 0;
    let mut index = 0;
    while let Some(&id) = graph.sorted_segment_ids().get(index) {
        if !graph.is_pure_reference(id) {
            index += 1;
            continue;
        }

        let mut pairs = Vec::new();
        if let Some(x) = graph.reference_adjacency(id, Orientation::Forward) {
            if !graph.has_sv_adjacency(x.to, Orientation::Reverse) {
                pairs.push((id, x.to));
            }
        }
        if let Some(x) = graph.reference_adjacency(id, Orientation::Reverse) {
            if !graph.has_sv_adjacency(x.to, Orientation::Forward) {
                pairs.push((x.to, id));
            }
        }

        let mut merged_index = None;
        for (left, right) in pairs {
            match graph.merge_reference_pair(left, right) {
                Ok(_) => {
                    merge_count += 1;
                    // A left neighbor merge moves the merged segment one position back
                    merged_index = Some(if left == id { index } else { index - 1 });
                    break;
                }
                Err(GraphError::CentromereSpan { left, .. }) => {
                    if let Some(x) = graph.segment(left) {
                        centromere_skips.insert((x.chrom_index, x.end));
                    }
                }
                Err(e) => return Err(e),
            }
        }

        index = merged_index.unwrap_or(index + 1);
    }
    Ok(merge_count)
}

/// Find the first candidate simplification in search order which the strategy accepts
///
/// # Arguments
/// * `rejected` - Accumulates the SV index sets of all rejected candidates
///
fn find_accepted_simplification(
    graph: &BreakpointGraph,
    strategy: &dyn SimplificationStrategy,
    rejected: &mut BTreeSet<Vec<usize>>,
) -> Option<Simplification> {
    for &id in graph.sorted_segment_ids() {
        for detector in PATTERN_DETECTORS {
            if let Some(candidate) = detector(graph, id) {
                if strategy.should_simplify(&candidate) {
                    return Some(candidate);
                }
                rejected.insert(candidate.sv_indices.clone());
            }
        }
    }
    None
}

/// Simplify the breakpoint graph to a fixed point
///
/// Reference runs are merged once before the search begins, and again after every accepted
/// simplification. Every accepted simplification removes at least one SV edge, and every merge
/// removes a segment, so the loop always terminates.
///
/// Returns accepted simplifications in the order they were applied. A `GraphError` return
/// indicates an internal graph invariant violation.
///
pub fn simplify_breakpoint_graph(
    graph: &mut BreakpointGraph,
    strategy: &dyn SimplificationStrategy,
    settings: &SimplifyEngineSettings,
) -> Result<SimplifyResult, GraphError> {
    let mut stats = SimplifyStats::default();
    let mut simplifications = Vec::new();
    let mut centromere_skips = BTreeSet::new();
    let mut rejected = BTreeSet::new();

    stats.reference_merge_count += merge_reference_runs(graph, &mut centromere_skips)?;

    loop {
        if let Some(max_iterations) = settings.max_iterations {
            if simplifications.len() >= max_iterations {
                warn!(
                    "Breakpoint graph simplification stopped at the iteration limit of {max_iterations}"
                );
                stats.iteration_limit_reached = true;
                break;
            }
        }

        let Some(simplification) = find_accepted_simplification(graph, strategy, &mut rejected)
        else {
            break;
        };

        for adjacency in simplification.removed_adjacencies.iter() {
            graph.remove_adjacency_pair(adjacency)?;
        }

        debug_msg!(
            settings.debug,
            "Accepted {} of SV indices [{}] with ploidy {:.2}, deltas: [{}]",
            simplification.simplification_type,
            simplification.sv_indices.iter().join(","),
            simplification.ploidy,
            simplification
                .consistency
                .iter()
                .map(|x| format!("{:.2}/{:.2}", x.copy_number_delta(), x.event_delta()))
                .join(",")
        );

        *stats
            .accepted_simplifications_by_type
            .entry(simplification.simplification_type.to_string())
            .or_default() += 1;
        simplifications.push(simplification);

        stats.reference_merge_count += merge_reference_runs(graph, &mut centromere_skips)?;

        if cfg!(debug_assertions) {
            graph.check_symmetry()?;
        }
    }

    // A candidate rejected early may be accepted after later merges change its context
    rejected.retain(|x| !simplifications.iter().any(|s| &s.sv_indices == x));

    stats.accepted_simplification_count = simplifications.len();
    stats.rejected_candidate_count = rejected.len();
    stats.centromere_merge_skip_count = centromere_skips.len();

    debug!(
        "Breakpoint graph simplification complete: {} accepted, {} rejected candidates, {} reference merges",
        stats.accepted_simplification_count,
        stats.rejected_candidate_count,
        stats.reference_merge_count
    );

    Ok(SimplifyResult {
        simplifications,
        stats,
    })
}

/// Get all input SVs which were not consumed by any simplification, in input order
///
pub fn get_unconsumed_svs(
    svs: &[StructuralVariant],
    simplifications: &[Simplification],
) -> Vec<StructuralVariant> {
    let consumed = simplifications
        .iter()
        .flat_map(|x| x.sv_indices.iter().copied())
        .collect::<BTreeSet<_>>();
    svs.iter()
        .enumerate()
        .filter(|(sv_index, _)| !consumed.contains(sv_index))
        .map(|(_, sv)| sv.clone())
        .collect()
}
