//! Report of all accepted simplifications
//!

use std::fs::File;
use std::io::{self, BufWriter};

use camino::Utf8Path;
use log::info;
use unwrap::unwrap;

use crate::csv_utils::get_tsv_writer;
use crate::simplify::Simplification;
use crate::structural_variant::StructuralVariant;

const SIMPLIFICATION_COLUMNS: [&str; 10] = [
    "uid",
    "type",
    "ploidy",
    "svid",
    "anchorcn",
    "refcn",
    "svploidy",
    "deltacn",
    "deltasv",
    "othersvploidy",
];

/// Write one row per (simplification, consumed SV) pair
///
/// The uid is the 0-based index of the simplification in the order it was applied.
///
pub fn write_simplification_rows(
    f: impl io::Write,
    svs: &[StructuralVariant],
    simplifications: &[Simplification],
) -> csv::Result<()> {
    let mut wtr = get_tsv_writer(f, &SIMPLIFICATION_COLUMNS)?;
    for (uid, simplification) in simplifications.iter().enumerate() {
        for x in simplification.consistency.iter() {
            wtr.write_record([
                uid.to_string(),
                simplification.simplification_type.to_string(),
                format!("{:.2}", simplification.ploidy),
                svs[x.sv_index].id.clone(),
                format!("{:.2}", x.anchor_ploidy),
                format!("{:.2}", x.reference_path_ploidy),
                format!("{:.2}", x.sv_ploidy),
                format!("{:.2}", x.copy_number_delta()),
                format!("{:.2}", x.event_delta()),
                format!("{:.2}", x.other_sv_ploidy),
            ])?;
        }
    }
    wtr.flush()?;
    Ok(())
}

pub fn write_simplification_table(
    filename: &Utf8Path,
    svs: &[StructuralVariant],
    simplifications: &[Simplification],
) {
    info!("Writing simplification report to file: '{filename}'");

    let f = unwrap!(
        File::create(filename),
        "Unable to create simplification report file: '{filename}'"
    );
    unwrap!(
        write_simplification_rows(BufWriter::new(f), svs, simplifications),
        "Failed to write simplification report file: '{filename}'"
    );
}
