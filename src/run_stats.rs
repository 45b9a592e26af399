//! Track stats for the whole simplification run
//!

use std::fs::File;

use camino::Utf8Path;
use log::info;
use serde::Serialize;
use unwrap::unwrap;

use crate::simplify::SimplifyStats;

#[derive(Default, Serialize)]
pub struct InputStats {
    pub chromosome_count: usize,
    pub segment_count: usize,
    pub sv_count: usize,
    pub single_breakend_count: usize,
}

#[derive(Default, Serialize)]
pub struct OutputStats {
    pub segment_count: usize,
    pub reference_edge_count: usize,
    pub sv_edge_count: usize,
    pub unconsumed_sv_count: usize,
}

#[derive(Default, Serialize)]
pub struct SimplifyRunStats {
    pub input_stats: InputStats,
    pub simplify_stats: SimplifyStats,
    pub output_stats: OutputStats,
    pub total_simplification_time_secs: f64,
}

/// Write run_stats structure out in json format
pub fn write_simplify_run_stats(filename: &Utf8Path, run_stats: &SimplifyRunStats) {
    info!("Writing run statistics to file: '{filename}'");

    let f = unwrap!(
        File::create(filename),
        "Unable to create run statistics json file: '{filename}'"
    );

    unwrap!(
        serde_json::to_writer_pretty(&f, &run_stats),
        "Unable to write run statistics json file: '{filename}'"
    );
}
