//! Copy number segment table input and output
//!

use std::fs::File;
use std::io::{self, BufWriter, Read};

use camino::Utf8Path;
use log::info;
use simple_error::SimpleResult;
use unwrap::unwrap;

use crate::chrom_list::ChromList;
use crate::copy_number_segment::CopyNumberSegment;
use crate::csv_utils::{open_table_file, read_tsv_table, write_tsv_table};
use crate::segment_store::SegmentRecord;

const SEGMENT_COLUMNS: [&str; 9] = [
    "chromosome",
    "start",
    "end",
    "copyNumber",
    "bafCount",
    "observedBAF",
    "depthWindowCount",
    "segmentStartSupport",
    "segmentEndSupport",
];

pub fn parse_segment_table(reader: impl Read) -> SimpleResult<Vec<SegmentRecord>> {
    read_tsv_table(reader, "copy number segment")
}

/// Read all rows of the copy number segment table, in file order
///
pub fn read_segment_table(filename: &Utf8Path) -> SimpleResult<Vec<SegmentRecord>> {
    info!("Reading copy number segments from file: '{filename}'");
    let reader = open_table_file(filename, "copy number segment")?;
    parse_segment_table(reader)
}

fn get_segment_record(chrom_list: &ChromList, segment: &CopyNumberSegment) -> SegmentRecord {
    SegmentRecord {
        chrom: chrom_list.data[segment.chrom_index].label.clone(),
        start: segment.start,
        end: segment.end,
        copy_number: segment.copy_number,
        baf_count: segment.baf_count,
        observed_baf: segment.observed_baf,
        depth_window_count: segment.depth_window_count,
        start_support: segment.start_support,
        end_support: segment.end_support,
    }
}

/// Write segments in the same table format used for segment input
///
pub fn write_segment_rows<'a>(
    f: impl io::Write,
    chrom_list: &ChromList,
    segments: impl IntoIterator<Item = &'a CopyNumberSegment>,
) -> csv::Result<()> {
    let records = segments
        .into_iter()
        .map(|x| get_segment_record(chrom_list, x));
    write_tsv_table(f, &SEGMENT_COLUMNS, records)
}

pub fn write_segment_table<'a>(
    filename: &Utf8Path,
    chrom_list: &ChromList,
    segments: impl IntoIterator<Item = &'a CopyNumberSegment>,
) {
    info!("Writing simplified copy number segments to file: '{filename}'");

    let f = unwrap!(
        File::create(filename),
        "Unable to create copy number segment file: '{filename}'"
    );
    unwrap!(
        write_segment_rows(BufWriter::new(f), chrom_list, segments),
        "Failed to write copy number segment file: '{filename}'"
    );
}
