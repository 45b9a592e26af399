//! Breakpoint graph over copy number segments
//!
//! Segments are stored in an arena and referenced by [SegmentId] everywhere. Merging two segments
//! appends a new arena entry and retires the two originals, so ids are never reused. Arena entry 0
//! is the sentinel 'unplaced' node, used as the far end of single breakends and of breakends on
//! chromosomes without copy number segmentation.
//!
//! Every edge is stored as a pair of adjacencies, one in the adjacency list of each endpoint, so
//! that each segment can enumerate its start-side and end-side connections directly.
//!

mod build;

use std::collections::BTreeMap;
use std::fmt;

use unwrap::unwrap;

pub use self::build::build_breakpoint_graph;
#[cfg(test)]
pub use self::build::test_utils;
use crate::chrom_list::ChromList;
use crate::copy_number_segment::CopyNumberSegment;
use crate::errors::GraphError;
use crate::structural_variant::Orientation;

#[derive(Clone, Copy, Debug, Eq, Hash, PartialEq, PartialOrd, Ord)]
pub struct SegmentId(pub usize);

impl fmt::Display for SegmentId {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Sentinel node for breakends without a resolvable genomic segment
pub const UNPLACED: SegmentId = SegmentId(0);

#[derive(Clone, Copy, Debug, Eq, Hash, PartialEq, PartialOrd, Ord)]
pub struct EdgeId(pub usize);

impl fmt::Display for EdgeId {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

#[derive(Clone, Copy, Debug, PartialEq)]
pub enum Edge {
    /// Adjacency of two genomically consecutive segments in the reference
    Reference,

    /// Novel adjacency from a structural variant
    Sv {
        /// Index of the structural variant in the input SV list
        sv_index: usize,
        ploidy: f64,
    },
}

impl Edge {
    pub fn is_sv(&self) -> bool {
        matches!(self, Edge::Sv { .. })
    }

    /// Ploidy is undefined for reference edges
    pub fn ploidy(&self) -> Option<f64> {
        match self {
            Edge::Reference => None,
            Edge::Sv { ploidy, .. } => Some(*ploidy),
        }
    }

    pub fn sv_index(&self) -> Option<usize> {
        match self {
            Edge::Reference => None,
            Edge::Sv { sv_index, .. } => Some(*sv_index),
        }
    }
}

/// Directed view of an edge from one of its endpoints
///
/// `from_orientation` gives the side of the `from` segment the edge leaves from: Forward for the
/// segment end, Reverse for the segment start. An adjacency is always stored in the list of its
/// `from` segment matching `from_orientation`.
///
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub struct Adjacency {
    pub from: SegmentId,
    pub from_orientation: Orientation,
    pub to: SegmentId,
    pub to_orientation: Orientation,
    pub edge: EdgeId,
}

impl Adjacency {
    /// The same edge viewed from the other endpoint
    pub fn mirror(&self) -> Self {
        Self {
            from: self.to,
            from_orientation: self.to_orientation,
            to: self.from,
            to_orientation: self.from_orientation,
            edge: self.edge,
        }
    }

    fn key(&self) -> (SegmentId, Orientation, SegmentId, Orientation, EdgeId) {
        (
            self.from,
            self.from_orientation,
            self.to,
            self.to_orientation,
            self.edge,
        )
    }
}

pub struct SegmentNode {
    /// None for the unplaced sentinel
    pub segment: Option<CopyNumberSegment>,

    /// Set when the node has been merged into a new node
    retired: bool,

    start_adjacencies: Vec<Adjacency>,
    end_adjacencies: Vec<Adjacency>,
}

impl SegmentNode {
    fn new(segment: Option<CopyNumberSegment>) -> Self {
        Self {
            segment,
            retired: false,
            start_adjacencies: Vec::new(),
            end_adjacencies: Vec::new(),
        }
    }

    fn adjacencies_mut(&mut self, orientation: Orientation) -> &mut Vec<Adjacency> {
        match orientation {
            Orientation::Reverse => &mut self.start_adjacencies,
            Orientation::Forward => &mut self.end_adjacencies,
        }
    }
}

pub struct BreakpointGraph {
    chrom_list: ChromList,
    nodes: Vec<SegmentNode>,
    edges: Vec<Edge>,

    /// Ids of all live segments in genomic order, excluding the unplaced sentinel
    sorted_ids: Vec<SegmentId>,
}

impl BreakpointGraph {
    pub fn new(chrom_list: ChromList) -> Self {
        Self {
            chrom_list,
            nodes: vec![SegmentNode::new(None)],
            edges: Vec::new(),
            sorted_ids: Vec::new(),
        }
    }

    pub fn chrom_list(&self) -> &ChromList {
        &self.chrom_list
    }

    pub fn add_segment(&mut self, segment: CopyNumberSegment) -> SegmentId {
        let id = SegmentId(self.nodes.len());
        let key = (segment.chrom_index, segment.start);
        self.nodes.push(SegmentNode::new(Some(segment)));
        let index = self.sorted_ids.partition_point(|&x| self.sort_key(x) < key);
        self.sorted_ids.insert(index, id);
        id
    }

    fn sort_key(&self, id: SegmentId) -> (usize, i64) {
        match self.segment(id) {
            Some(x) => (x.chrom_index, x.start),
            None => (0, i64::MIN),
        }
    }

    /// Position of a live segment in the genomic order of `sorted_segment_ids`
    fn sorted_index(&self, id: SegmentId) -> Option<usize> {
        let key = self.sort_key(id);
        let index = self.sorted_ids.partition_point(|&x| self.sort_key(x) < key);
        (self.sorted_ids.get(index) == Some(&id)).then_some(index)
    }

    /// Add an edge between two segment sides, inserting both of its adjacencies
    ///
    pub fn add_edge(
        &mut self,
        edge: Edge,
        from: SegmentId,
        from_orientation: Orientation,
        to: SegmentId,
        to_orientation: Orientation,
    ) -> EdgeId {
        assert!(!self.is_retired(from) && !self.is_retired(to));
        let edge_id = EdgeId(self.edges.len());
        self.edges.push(edge);
        let adjacency = Adjacency {
            from,
            from_orientation,
            to,
            to_orientation,
            edge: edge_id,
        };
        self.nodes[from.0]
            .adjacencies_mut(from_orientation)
            .push(adjacency);
        self.nodes[to.0]
            .adjacencies_mut(to_orientation)
            .push(adjacency.mirror());
        edge_id
    }

    pub fn edge(&self, edge_id: EdgeId) -> &Edge {
        &self.edges[edge_id.0]
    }

    /// Get the segment for a node, None for the unplaced sentinel
    pub fn segment(&self, id: SegmentId) -> Option<&CopyNumberSegment> {
        self.nodes[id.0].segment.as_ref()
    }

    pub fn is_retired(&self, id: SegmentId) -> bool {
        self.nodes[id.0].retired
    }

    /// Adjacencies leaving the given side of a segment
    ///
    /// Reverse selects the start-side list, Forward selects the end-side list.
    ///
    pub fn adjacencies(&self, id: SegmentId, orientation: Orientation) -> &[Adjacency] {
        let node = &self.nodes[id.0];
        match orientation {
            Orientation::Reverse => &node.start_adjacencies,
            Orientation::Forward => &node.end_adjacencies,
        }
    }

    pub fn sv_adjacencies(
        &self,
        id: SegmentId,
        orientation: Orientation,
    ) -> impl Iterator<Item = &Adjacency> {
        self.adjacencies(id, orientation)
            .iter()
            .filter(|x| self.edge(x.edge).is_sv())
    }

    pub fn has_sv_adjacency(&self, id: SegmentId, orientation: Orientation) -> bool {
        self.sv_adjacencies(id, orientation).next().is_some()
    }

    /// Find the reference adjacency leaving the given side of a segment, if any
    pub fn reference_adjacency(
        &self,
        id: SegmentId,
        orientation: Orientation,
    ) -> Option<&Adjacency> {
        self.adjacencies(id, orientation)
            .iter()
            .find(|x| !self.edge(x.edge).is_sv())
    }

    /// True if neither side of the segment has an SV adjacency
    pub fn is_pure_reference(&self, id: SegmentId) -> bool {
        !(self.has_sv_adjacency(id, Orientation::Reverse)
            || self.has_sv_adjacency(id, Orientation::Forward))
    }

    /// Ids of all live segments in genomic order, excluding the unplaced sentinel
    ///
    pub fn sorted_segment_ids(&self) -> &[SegmentId] {
        &self.sorted_ids
    }

    /// All live segments in genomic order
    pub fn sorted_segments(&self) -> Vec<&CopyNumberSegment> {
        self.sorted_ids
            .iter()
            .filter_map(|&id| self.segment(id))
            .collect()
    }

    pub fn segment_count(&self) -> usize {
        self.sorted_ids.len()
    }

    fn live_adjacencies(&self) -> impl Iterator<Item = &Adjacency> {
        self.nodes
            .iter()
            .filter(|x| !x.retired)
            .flat_map(|x| x.start_adjacencies.iter().chain(x.end_adjacencies.iter()))
    }

    /// Count of live edges, returned as (reference edge count, sv edge count)
    ///
    pub fn edge_counts(&self) -> (usize, usize) {
        let (mut ref_count, mut sv_count) = (0, 0);
        for adjacency in self.live_adjacencies() {
            if self.edge(adjacency.edge).is_sv() {
                sv_count += 1;
            } else {
                ref_count += 1;
            }
        }

        // Each edge is represented by two adjacencies:
        (ref_count / 2, sv_count / 2)
    }

    /// Verify that every adjacency has exactly one mirror adjacency in the graph
    ///
    /// Adjacencies are compared with multiplicity, so a fold-back edge connecting one segment side
    /// to itself is represented by two identical adjacencies which mirror each other.
    ///
    pub fn check_symmetry(&self) -> Result<(), GraphError> {
        let mut counts = BTreeMap::new();
        for (index, node) in self.nodes.iter().enumerate() {
            if node.retired {
                let mut adjacencies = node
                    .start_adjacencies
                    .iter()
                    .chain(node.end_adjacencies.iter());
                if let Some(adjacency) = adjacencies.next() {
                    return Err(GraphError::UnpairedEdge {
                        edge: adjacency.edge,
                        segment: SegmentId(index),
                    });
                }
                continue;
            }

            for (orientation, adjacencies) in [
                (Orientation::Reverse, &node.start_adjacencies),
                (Orientation::Forward, &node.end_adjacencies),
            ] {
                for adjacency in adjacencies {
                    if adjacency.from != SegmentId(index)
                        || adjacency.from_orientation != orientation
                        || self.is_retired(adjacency.to)
                    {
                        return Err(GraphError::UnpairedEdge {
                            edge: adjacency.edge,
                            segment: SegmentId(index),
                        });
                    }
                    *counts.entry(adjacency.key()).or_insert(0usize) += 1;
                }
            }
        }

        for (key, count) in counts.iter() {
            let (from, from_orientation, to, to_orientation, edge) = *key;
            let mirror_key = (to, to_orientation, from, from_orientation, edge);
            if counts.get(&mirror_key) != Some(count) {
                return Err(GraphError::UnpairedEdge {
                    edge,
                    segment: from,
                });
            }
        }
        Ok(())
    }

    /// Remove an edge by removing the given adjacency and its mirror
    ///
    pub fn remove_adjacency_pair(&mut self, adjacency: &Adjacency) -> Result<(), GraphError> {
        fn remove_one(list: &mut Vec<Adjacency>, target: &Adjacency) -> bool {
            if let Some(pos) = list.iter().position(|x| x == target) {
                list.remove(pos);
                true
            } else {
                false
            }
        }

        let mirror = adjacency.mirror();
        for target in [adjacency, &mirror] {
            let list = self.nodes[target.from.0].adjacencies_mut(target.from_orientation);
            if !remove_one(list, target) {
                return Err(GraphError::UnpairedEdge {
                    edge: adjacency.edge,
                    segment: target.from,
                });
            }
        }
        Ok(())
    }

    /// Merge two segments linked by a reference edge into a new segment
    ///
    /// `left` must be the segment immediately before `right`, and the only adjacency at the
    /// junction between them must be their reference edge. The new segment inherits the start-side
    /// adjacencies of `left` and the end-side adjacencies of `right`, and both original segments are
    /// retired.
    ///
    /// Returns the new segment id, or `GraphError::CentromereSpan` without changing the graph if
    /// the junction is a centromere boundary.
    ///
    pub fn merge_reference_pair(
        &mut self,
        left: SegmentId,
        right: SegmentId,
    ) -> Result<SegmentId, GraphError> {
        assert!(left != right && left != UNPLACED && right != UNPLACED);
        assert!(!self.is_retired(left) && !self.is_retired(right));

        let junction = self.adjacencies(left, Orientation::Forward);
        assert!(
            junction.len() == 1
                && junction[0].to == right
                && junction[0].to_orientation == Orientation::Reverse
                && !self.edge(junction[0].edge).is_sv(),
            "Segment merge requested for segments without a single reference junction"
        );
        assert_eq!(self.adjacencies(right, Orientation::Reverse).len(), 1);

        let merged_segment = {
            let left_segment = unwrap!(self.segment(left), "Merge of unplaced segment");
            let right_segment = unwrap!(self.segment(right), "Merge of unplaced segment");
            if left_segment.is_centromere_boundary(right_segment) {
                return Err(GraphError::CentromereSpan { left, right });
            }
            left_segment.merge_right(right_segment)
        };

        let left_index = unwrap!(self.sorted_index(left), "Merged segment missing from order");
        let right_index = unwrap!(self.sorted_index(right), "Merged segment missing from order");

        let merged = SegmentId(self.nodes.len());
        let mut merged_node = SegmentNode::new(Some(merged_segment));

        let replace_id = |id: SegmentId| {
            if id == left || id == right { merged } else { id }
        };

        for (orientation, source) in [(Orientation::Reverse, left), (Orientation::Forward, right)] {
            let adjacencies = std::mem::take(self.nodes[source.0].adjacencies_mut(orientation));
            *merged_node.adjacencies_mut(orientation) = adjacencies
                .into_iter()
                .map(|mut x| {
                    x.from = merged;
                    x.to = replace_id(x.to);
                    x
                })
                .collect();
        }
        for source in [left, right] {
            let node = &mut self.nodes[source.0];
            node.retired = true;
            node.start_adjacencies.clear();
            node.end_adjacencies.clear();
        }
        self.nodes.push(merged_node);

        // The merged segment starts at the left segment start, so it takes the left position:
        self.sorted_ids[left_index] = merged;
        self.sorted_ids.remove(right_index);

        // Update the mirror of each moved adjacency to point at the merged segment:
        let moved = self
            .adjacencies(merged, Orientation::Reverse)
            .iter()
            .chain(self.adjacencies(merged, Orientation::Forward).iter())
            .copied()
            .collect::<Vec<_>>();
        for adjacency in moved {
            let list = self.nodes[adjacency.to.0].adjacencies_mut(adjacency.to_orientation);
            let mut found = false;
            for candidate in list.iter_mut().filter(|x| x.edge == adjacency.edge) {
                candidate.to = replace_id(candidate.to);
                found = true;
            }
            if !found {
                return Err(GraphError::UnpairedEdge {
                    edge: adjacency.edge,
                    segment: adjacency.to,
                });
            }
        }

        Ok(merged)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::copy_number_segment::SegmentSupport;
    use crate::copy_number_segment::test_utils::get_test_segment;

    /// Three consecutive segments on one chromosome linked by reference edges
    fn get_reference_graph() -> (BreakpointGraph, Vec<SegmentId>) {
        let mut chrom_list = ChromList::default();
        chrom_list.add_chrom("chr1");
        let mut graph = BreakpointGraph::new(chrom_list);
        let ids = vec![
            graph.add_segment(get_test_segment(0, 1, 100, 2.0)),
            graph.add_segment(get_test_segment(0, 101, 200, 3.0)),
            graph.add_segment(get_test_segment(0, 201, 300, 2.0)),
        ];
        for pair in ids.windows(2) {
            graph.add_edge(
                Edge::Reference,
                pair[0],
                Orientation::Forward,
                pair[1],
                Orientation::Reverse,
            );
        }
        (graph, ids)
    }

    #[test]
    fn test_add_edge_symmetry() {
        let (mut graph, ids) = get_reference_graph();
        graph.add_edge(
            Edge::Sv {
                sv_index: 0,
                ploidy: 1.0,
            },
            ids[1],
            Orientation::Forward,
            ids[1],
            Orientation::Reverse,
        );
        // Fold-back edge connecting one segment side to itself
        graph.add_edge(
            Edge::Sv {
                sv_index: 1,
                ploidy: 1.0,
            },
            ids[2],
            Orientation::Forward,
            ids[2],
            Orientation::Forward,
        );
        assert!(graph.check_symmetry().is_ok());
        assert_eq!(graph.edge_counts(), (2, 2));
        assert_eq!(graph.adjacencies(ids[2], Orientation::Forward).len(), 2);
        assert!(graph.is_pure_reference(ids[0]));
        assert!(!graph.is_pure_reference(ids[1]));
    }

    #[test]
    fn test_unplaced_sentinel() {
        let (mut graph, ids) = get_reference_graph();
        graph.add_edge(
            Edge::Sv {
                sv_index: 0,
                ploidy: 0.5,
            },
            ids[0],
            Orientation::Forward,
            UNPLACED,
            Orientation::Reverse,
        );
        assert!(graph.segment(UNPLACED).is_none());
        assert_eq!(graph.adjacencies(UNPLACED, Orientation::Reverse).len(), 1);
        assert!(graph.check_symmetry().is_ok());

        // The sentinel is never included in segment iteration
        assert_eq!(graph.sorted_segment_ids(), ids);
        assert_eq!(graph.segment_count(), 3);
    }

    #[test]
    fn test_remove_adjacency_pair() {
        let (mut graph, ids) = get_reference_graph();
        let edge_id = graph.add_edge(
            Edge::Sv {
                sv_index: 0,
                ploidy: 1.0,
            },
            ids[0],
            Orientation::Forward,
            ids[2],
            Orientation::Reverse,
        );
        let adjacency = *graph.sv_adjacencies(ids[2], Orientation::Reverse).next().unwrap();
        assert_eq!(adjacency.edge, edge_id);

        graph.remove_adjacency_pair(&adjacency).unwrap();
        assert!(graph.check_symmetry().is_ok());
        assert_eq!(graph.edge_counts(), (2, 0));

        // A second removal finds neither half of the edge
        assert_eq!(
            graph.remove_adjacency_pair(&adjacency),
            Err(GraphError::UnpairedEdge {
                edge: edge_id,
                segment: ids[2],
            })
        );
    }

    #[test]
    fn test_check_symmetry_detects_unpaired_edge() {
        let (mut graph, ids) = get_reference_graph();
        let adjacency = graph.adjacencies(ids[0], Orientation::Forward)[0];
        graph.nodes[ids[1].0].start_adjacencies.clear();
        assert_eq!(
            graph.check_symmetry(),
            Err(GraphError::UnpairedEdge {
                edge: adjacency.edge,
                segment: ids[0],
            })
        );
    }

    #[test]
    fn test_merge_reference_pair() {
        let (mut graph, ids) = get_reference_graph();
        graph.add_edge(
            Edge::Sv {
                sv_index: 0,
                ploidy: 1.0,
            },
            ids[1],
            Orientation::Forward,
            UNPLACED,
            Orientation::Reverse,
        );

        let merged = graph.merge_reference_pair(ids[0], ids[1]).unwrap();
        assert!(graph.is_retired(ids[0]) && graph.is_retired(ids[1]));
        assert!(graph.check_symmetry().is_ok());
        assert_eq!(graph.sorted_segment_ids(), vec![merged, ids[2]]);

        let segment = graph.segment(merged).unwrap();
        assert_eq!((segment.start, segment.end), (1, 200));
        approx::assert_ulps_eq!(segment.copy_number, 2.5, max_ulps = 4);

        // The merged segment inherits the right segment's end-side edges
        let end_adjacencies = graph.adjacencies(merged, Orientation::Forward);
        assert_eq!(end_adjacencies.len(), 2);
        assert_eq!(
            graph.sv_adjacencies(UNPLACED, Orientation::Reverse).next().unwrap().to,
            merged
        );
        assert_eq!(
            graph.adjacencies(ids[2], Orientation::Reverse)[0].to,
            merged
        );
        assert_eq!(graph.edge_counts(), (1, 1));
    }

    #[test]
    fn test_sorted_segment_ids() {
        let mut chrom_list = ChromList::default();
        chrom_list.add_chrom("chr1");
        chrom_list.add_chrom("chr2");
        let mut graph = BreakpointGraph::new(chrom_list);
        let c = graph.add_segment(get_test_segment(1, 1, 100, 2.0));
        let b = graph.add_segment(get_test_segment(0, 101, 200, 2.0));
        let a = graph.add_segment(get_test_segment(0, 1, 100, 2.0));
        assert_eq!(graph.sorted_segment_ids(), vec![a, b, c]);

        graph.add_edge(
            Edge::Reference,
            a,
            Orientation::Forward,
            b,
            Orientation::Reverse,
        );
        let merged = graph.merge_reference_pair(a, b).unwrap();
        assert_eq!(graph.sorted_segment_ids(), vec![merged, c]);
        assert_eq!(graph.segment_count(), 2);
    }

    #[test]
    fn test_merge_centromere_span() {
        let mut chrom_list = ChromList::default();
        chrom_list.add_chrom("chr1");
        let mut graph = BreakpointGraph::new(chrom_list);
        let mut left_segment = get_test_segment(0, 1, 100, 2.0);
        left_segment.end_support = SegmentSupport::Centromere;
        let left = graph.add_segment(left_segment);
        let right = graph.add_segment(get_test_segment(0, 101, 200, 2.0));
        graph.add_edge(
            Edge::Reference,
            left,
            Orientation::Forward,
            right,
            Orientation::Reverse,
        );

        assert_eq!(
            graph.merge_reference_pair(left, right),
            Err(GraphError::CentromereSpan { left, right })
        );

        // Graph is unchanged
        assert_eq!(graph.sorted_segment_ids(), vec![left, right]);
        assert!(graph.check_symmetry().is_ok());
    }
}
