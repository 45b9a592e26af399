use log::debug;
use thousands::Separable;

use super::{BreakpointGraph, Edge, SegmentId, UNPLACED};
use crate::errors::DataError;
use crate::segment_store::SegmentStore;
use crate::structural_variant::{Breakend, Orientation, StructuralVariant};

fn misplaced_breakend_error(sv: &StructuralVariant, breakend: &Breakend) -> DataError {
    DataError::BreakendMisplaced {
        sv_id: sv.id.clone(),
        chrom: breakend.chrom.clone(),
        pos: breakend.pos,
        orientation: breakend.orientation,
    }
}

/// Resolve a breakend to the graph segment it attaches to
///
/// A breakend on a chromosome missing from the copy number segmentation resolves to None, for
/// the unplaced sentinel. Otherwise the breakend must sit exactly on the segment boundary implied
/// by its orientation: the segment end for 'Forward', the segment start for 'Reverse'.
///
/// # Arguments
/// * `segment_ids` - Graph segment ids, indexed on chrom_index and then segment_index
///
fn resolve_breakend(
    store: &SegmentStore,
    segment_ids: &[Vec<SegmentId>],
    sv: &StructuralVariant,
    breakend: &Breakend,
) -> Result<Option<SegmentId>, DataError> {
    if store.chrom_list().get_index(&breakend.chrom).is_none() {
        return Ok(None);
    }

    let key = store
        .find_containing(&breakend.chrom, breakend.pos)
        .ok_or_else(|| misplaced_breakend_error(sv, breakend))?;
    let segment = store.get(key);
    let boundary_pos = match breakend.orientation {
        Orientation::Forward => segment.end,
        Orientation::Reverse => segment.start,
    };
    if breakend.pos != boundary_pos {
        return Err(misplaced_breakend_error(sv, breakend));
    }
    Ok(Some(segment_ids[key.chrom_index][key.segment_index]))
}

/// Build the breakpoint graph from copy number segments and structural variants
///
/// Genomically consecutive segments on each chromosome are linked with reference edges. Each
/// structural variant is linked between the segments containing its two breakends. Single
/// breakends, and breakends on chromosomes without segmentation, are linked to the unplaced
/// sentinel with 'Reverse' orientation on the sentinel side.
///
/// The start breakend of every structural variant must be placed on a segment boundary, and any
/// placed end breakend must be as well, otherwise this fails with `DataError::BreakendMisplaced`
/// and no graph is returned.
///
pub fn build_breakpoint_graph(
    store: &SegmentStore,
    svs: &[StructuralVariant],
) -> Result<BreakpointGraph, DataError> {
    let chrom_list = store.chrom_list();
    let mut graph = BreakpointGraph::new(chrom_list.clone());

    let mut segment_ids = Vec::with_capacity(chrom_list.len());
    for chrom_index in 0..chrom_list.len() {
        let chrom_segment_ids = store
            .segments(chrom_index)
            .iter()
            .map(|x| graph.add_segment(x.clone()))
            .collect::<Vec<_>>();
        for pair in chrom_segment_ids.windows(2) {
            graph.add_edge(
                Edge::Reference,
                pair[0],
                Orientation::Forward,
                pair[1],
                Orientation::Reverse,
            );
        }
        segment_ids.push(chrom_segment_ids);
    }

    for (sv_index, sv) in svs.iter().enumerate() {
        let start_id = resolve_breakend(store, &segment_ids, sv, &sv.start)?
            .ok_or_else(|| misplaced_breakend_error(sv, &sv.start))?;

        let end_resolution = match &sv.end {
            Some(end) => {
                resolve_breakend(store, &segment_ids, sv, end)?.map(|x| (x, end.orientation))
            }
            None => None,
        };
        let (end_id, end_orientation) = end_resolution.unwrap_or((UNPLACED, Orientation::Reverse));

        graph.add_edge(
            Edge::Sv {
                sv_index,
                ploidy: sv.ploidy,
            },
            start_id,
            sv.start.orientation,
            end_id,
            end_orientation,
        );
    }

    let (ref_edge_count, sv_edge_count) = graph.edge_counts();
    debug!(
        "Built breakpoint graph with {} segments, {} reference edges and {} SV edges",
        graph.segment_count().separate_with_commas(),
        ref_edge_count.separate_with_commas(),
        sv_edge_count.separate_with_commas()
    );

    Ok(graph)
}

#[cfg(test)]
pub mod test_utils {
    use crate::structural_variant::{Breakend, Orientation, StructuralVariant, SvType};

    pub fn get_test_breakend(chrom: &str, pos: i64, orientation: Orientation) -> Breakend {
        Breakend {
            chrom: chrom.to_string(),
            pos,
            orientation,
        }
    }

    pub fn get_test_sv(
        id: &str,
        sv_type: SvType,
        start: Breakend,
        end: Option<Breakend>,
        ploidy: f64,
    ) -> StructuralVariant {
        StructuralVariant {
            id: id.to_string(),
            sv_type,
            start,
            end,
            ploidy,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::test_utils::{get_test_breakend, get_test_sv};
    use super::*;
    use crate::segment_store::test_utils::get_test_record;
    use crate::structural_variant::SvType;

    fn get_test_store() -> SegmentStore {
        SegmentStore::load(vec![
            get_test_record("chr1", 1, 100, 2.0),
            get_test_record("chr1", 101, 200, 3.0),
            get_test_record("chr1", 201, 300, 2.0),
            get_test_record("chr2", 1, 500, 2.0),
        ])
        .unwrap()
    }

    #[test]
    fn test_build_reference_edges() {
        let store = get_test_store();
        let graph = build_breakpoint_graph(&store, &[]).unwrap();
        assert_eq!(graph.segment_count(), 4);
        assert_eq!(graph.edge_counts(), (2, 0));
        assert!(graph.check_symmetry().is_ok());

        // No reference edge between chromosomes
        let ids = graph.sorted_segment_ids();
        assert!(graph.adjacencies(ids[2], Orientation::Forward).is_empty());
        assert!(graph.adjacencies(ids[3], Orientation::Reverse).is_empty());
    }

    #[test]
    fn test_build_tandem_duplication() {
        let store = get_test_store();
        let svs = vec![get_test_sv(
            "dup1",
            SvType::Dup,
            get_test_breakend("chr1", 200, Orientation::Forward),
            Some(get_test_breakend("chr1", 101, Orientation::Reverse)),
            1.0,
        )];
        let graph = build_breakpoint_graph(&store, &svs).unwrap();
        assert!(graph.check_symmetry().is_ok());
        assert_eq!(graph.edge_counts(), (2, 1));

        let dup_id = graph.sorted_segment_ids()[1];
        let start_svs = graph
            .sv_adjacencies(dup_id, Orientation::Reverse)
            .collect::<Vec<_>>();
        let end_svs = graph
            .sv_adjacencies(dup_id, Orientation::Forward)
            .collect::<Vec<_>>();
        assert_eq!(start_svs.len(), 1);
        assert_eq!(end_svs.len(), 1);
        assert_eq!(start_svs[0].edge, end_svs[0].edge);
        assert_eq!(start_svs[0].to, dup_id);
    }

    #[test]
    fn test_build_unplaced_breakends() {
        let store = get_test_store();
        let svs = vec![
            get_test_sv(
                "sgl1",
                SvType::Sgl,
                get_test_breakend("chr1", 100, Orientation::Forward),
                None,
                0.5,
            ),
            get_test_sv(
                "bnd1",
                SvType::Bnd,
                get_test_breakend("chr2", 1, Orientation::Reverse),
                Some(get_test_breakend("chrUn_gl000220", 5000, Orientation::Forward)),
                1.0,
            ),
        ];
        let graph = build_breakpoint_graph(&store, &svs).unwrap();
        assert!(graph.check_symmetry().is_ok());

        let unplaced = graph.adjacencies(UNPLACED, Orientation::Reverse);
        assert_eq!(unplaced.len(), 2);
        assert!(graph.adjacencies(UNPLACED, Orientation::Forward).is_empty());
        assert_eq!(graph.edge(unplaced[1].edge).sv_index(), Some(1));
    }

    #[test]
    fn test_build_misplaced_breakend() {
        let store = get_test_store();

        // Forward breakend which is not on a segment end
        let svs = vec![get_test_sv(
            "del1",
            SvType::Del,
            get_test_breakend("chr1", 150, Orientation::Forward),
            Some(get_test_breakend("chr1", 201, Orientation::Reverse)),
            1.0,
        )];
        let result = build_breakpoint_graph(&store, &svs);
        assert_eq!(
            result.err(),
            Some(DataError::BreakendMisplaced {
                sv_id: "del1".to_string(),
                chrom: "chr1".to_string(),
                pos: 150,
                orientation: Orientation::Forward,
            })
        );

        // Orientation pointing to the wrong segment boundary
        let svs = vec![get_test_sv(
            "del2",
            SvType::Del,
            get_test_breakend("chr1", 100, Orientation::Forward),
            Some(get_test_breakend("chr1", 200, Orientation::Reverse)),
            1.0,
        )];
        assert!(matches!(
            build_breakpoint_graph(&store, &svs),
            Err(DataError::BreakendMisplaced { .. })
        ));

        // Known chromosome, but outside of all segments
        let svs = vec![get_test_sv(
            "sgl2",
            SvType::Sgl,
            get_test_breakend("chr2", 600, Orientation::Reverse),
            None,
            1.0,
        )];
        assert!(matches!(
            build_breakpoint_graph(&store, &svs),
            Err(DataError::BreakendMisplaced { .. })
        ));

        // Start breakend cannot be unplaced
        let svs = vec![get_test_sv(
            "bnd2",
            SvType::Bnd,
            get_test_breakend("chrUn_gl000220", 5000, Orientation::Forward),
            Some(get_test_breakend("chr2", 1, Orientation::Reverse)),
            1.0,
        )];
        assert!(matches!(
            build_breakpoint_graph(&store, &svs),
            Err(DataError::BreakendMisplaced { .. })
        ));
    }
}
