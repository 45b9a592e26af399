use log::debug;
use serde::{Deserialize, Serialize};

use crate::chrom_list::ChromList;
use crate::csv_utils::display_from_str;
use crate::copy_number_segment::{CopyNumberSegment, SegmentSupport};
use crate::errors::DataError;

/// One row of the copy number segment table
///
#[derive(Clone, Debug, Deserialize, PartialEq, Serialize)]
pub struct SegmentRecord {
    #[serde(rename = "chromosome")]
    pub chrom: String,
    pub start: i64,
    pub end: i64,
    #[serde(rename = "copyNumber")]
    pub copy_number: f64,
    #[serde(rename = "bafCount")]
    pub baf_count: u32,
    #[serde(rename = "observedBAF")]
    pub observed_baf: f64,
    #[serde(rename = "depthWindowCount")]
    pub depth_window_count: u32,
    #[serde(rename = "segmentStartSupport", with = "display_from_str")]
    pub start_support: SegmentSupport,
    #[serde(rename = "segmentEndSupport", with = "display_from_str")]
    pub end_support: SegmentSupport,
}

/// Location of a segment in the store
///
#[derive(Clone, Copy, Debug, Eq, PartialEq, PartialOrd, Ord)]
pub struct SegmentKey {
    pub chrom_index: usize,
    pub segment_index: usize,
}

/// Copy number segments for all chromosomes of one sample, sorted by position within each
/// chromosome
///
pub struct SegmentStore {
    chrom_list: ChromList,

    /// Segments indexed on chrom_index, then on position order
    chrom_segments: Vec<Vec<CopyNumberSegment>>,
}

impl SegmentStore {
    /// Load segments from rows grouped by chromosome and sorted by start position
    ///
    /// Chromosome order in the store is the order of first appearance in `rows`. Rows from a
    /// chromosome which resume after another chromosome has started are treated as unsorted.
    ///
    pub fn load(rows: impl IntoIterator<Item = SegmentRecord>) -> Result<Self, DataError> {
        let mut chrom_list = ChromList::default();
        let mut chrom_segments: Vec<Vec<CopyNumberSegment>> = Vec::new();

        for row in rows {
            if row.start > row.end {
                return Err(DataError::InvalidSegment {
                    chrom: row.chrom,
                    start: row.start,
                    end: row.end,
                });
            }

            let chrom_index = match chrom_list.get_index(&row.chrom) {
                Some(chrom_index) => {
                    if chrom_index + 1 != chrom_list.len() {
                        // The chromosome group was already closed by a later chromosome
                        let prev_start = chrom_segments[chrom_index]
                            .last()
                            .map(|x| x.start)
                            .unwrap_or_default();
                        return Err(DataError::Unsorted {
                            chrom: row.chrom,
                            prev_start,
                            start: row.start,
                        });
                    }
                    chrom_index
                }
                None => {
                    chrom_segments.push(Vec::new());
                    chrom_list.add_chrom(&row.chrom)
                }
            };

            let segments = &mut chrom_segments[chrom_index];
            if let Some(prev) = segments.last() {
                if row.start < prev.start {
                    return Err(DataError::Unsorted {
                        chrom: row.chrom,
                        prev_start: prev.start,
                        start: row.start,
                    });
                }
                if row.start <= prev.end {
                    return Err(DataError::Overlap {
                        chrom: row.chrom,
                        prev_end: prev.end,
                        start: row.start,
                    });
                }
            }

            segments.push(CopyNumberSegment {
                chrom_index,
                start: row.start,
                end: row.end,
                covered_size: row.end - row.start + 1,
                copy_number: row.copy_number,
                baf_count: row.baf_count,
                observed_baf: row.observed_baf,
                depth_window_count: row.depth_window_count,
                start_support: row.start_support,
                end_support: row.end_support,
            });
        }

        let store = Self {
            chrom_list,
            chrom_segments,
        };
        debug!(
            "Loaded {} copy number segments on {} chromosomes",
            store.segment_count(),
            store.chrom_list.len()
        );
        Ok(store)
    }

    pub fn chrom_list(&self) -> &ChromList {
        &self.chrom_list
    }

    pub fn segments(&self, chrom_index: usize) -> &[CopyNumberSegment] {
        &self.chrom_segments[chrom_index]
    }

    pub fn segment_count(&self) -> usize {
        self.chrom_segments.iter().map(|x| x.len()).sum()
    }

    pub fn get(&self, key: SegmentKey) -> &CopyNumberSegment {
        &self.chrom_segments[key.chrom_index][key.segment_index]
    }

    /// Find the segment containing the given chromosome position
    ///
    /// Returns None, representing the unplaced sentinel, if the chromosome is unknown or the
    /// position falls outside of all segments.
    ///
    pub fn find_containing(&self, chrom: &str, pos: i64) -> Option<SegmentKey> {
        let chrom_index = self.chrom_list.get_index(chrom)?;
        let segments = &self.chrom_segments[chrom_index];

        // Index of the first segment starting after pos:
        let after_index = segments.partition_point(|x| x.start <= pos);
        if after_index == 0 {
            return None;
        }
        let segment_index = after_index - 1;
        if segments[segment_index].contains_pos(pos) {
            Some(SegmentKey {
                chrom_index,
                segment_index,
            })
        } else {
            None
        }
    }
}
