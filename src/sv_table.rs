//! Structural variant table input and output
//!

use std::fs::File;
use std::io::{self, BufWriter, Read};

use camino::Utf8Path;
use log::info;
use serde::{Deserialize, Serialize};
use simple_error::{SimpleResult, bail};
use unwrap::unwrap;

use crate::csv_utils::{
    display_from_str, open_table_file, optional_field, read_tsv_table, write_tsv_table,
};
use crate::structural_variant::{Breakend, Orientation, StructuralVariant, SvType};

const SV_COLUMNS: [&str; 9] = [
    "id",
    "type",
    "startChromosome",
    "startPosition",
    "startOrientation",
    "endChromosome",
    "endPosition",
    "endOrientation",
    "ploidy",
];

/// One row of the structural variant table
///
/// The end breakend fields are either all present or all missing, the latter for single
/// breakends.
///
#[derive(Debug, Deserialize, Serialize)]
struct SvRecord {
    id: String,
    #[serde(rename = "type", with = "display_from_str")]
    sv_type: SvType,
    #[serde(rename = "startChromosome")]
    start_chrom: String,
    #[serde(rename = "startPosition")]
    start_pos: i64,
    #[serde(rename = "startOrientation", with = "display_from_str")]
    start_orientation: Orientation,
    #[serde(rename = "endChromosome", with = "optional_field")]
    end_chrom: Option<String>,
    #[serde(rename = "endPosition", with = "optional_field")]
    end_pos: Option<i64>,
    #[serde(rename = "endOrientation", with = "optional_field")]
    end_orientation: Option<Orientation>,
    ploidy: f64,
}

impl SvRecord {
    fn into_sv(self) -> SimpleResult<StructuralVariant> {
        let end = match (self.end_chrom, self.end_pos, self.end_orientation) {
            (Some(chrom), Some(pos), Some(orientation)) => Some(Breakend {
                chrom,
                pos,
                orientation,
            }),
            (None, None, None) => None,
            _ => bail!(
                "Structural variant '{}' has an incomplete end breakend",
                self.id
            ),
        };
        Ok(StructuralVariant {
            id: self.id,
            sv_type: self.sv_type,
            start: Breakend {
                chrom: self.start_chrom,
                pos: self.start_pos,
                orientation: self.start_orientation,
            },
            end,
            ploidy: self.ploidy,
        })
    }

    fn from_sv(sv: &StructuralVariant) -> Self {
        Self {
            id: sv.id.clone(),
            sv_type: sv.sv_type,
            start_chrom: sv.start.chrom.clone(),
            start_pos: sv.start.pos,
            start_orientation: sv.start.orientation,
            end_chrom: sv.end.as_ref().map(|x| x.chrom.clone()),
            end_pos: sv.end.as_ref().map(|x| x.pos),
            end_orientation: sv.end.as_ref().map(|x| x.orientation),
            ploidy: sv.ploidy,
        }
    }
}

pub fn parse_sv_table(reader: impl Read) -> SimpleResult<Vec<StructuralVariant>> {
    read_tsv_table::<SvRecord>(reader, "structural variant")?
        .into_iter()
        .map(|x| x.into_sv())
        .collect()
}

/// Read all structural variants, in file order
///
/// The position of each SV in the returned list is its SV index for the rest of the run.
///
pub fn read_sv_table(filename: &Utf8Path) -> SimpleResult<Vec<StructuralVariant>> {
    info!("Reading structural variants from file: '{filename}'");
    let reader = open_table_file(filename, "structural variant")?;
    parse_sv_table(reader)
}

/// Write structural variants in the same table format used for SV input
///
pub fn write_sv_rows<'a>(
    f: impl io::Write,
    svs: impl IntoIterator<Item = &'a StructuralVariant>,
) -> csv::Result<()> {
    write_tsv_table(f, &SV_COLUMNS, svs.into_iter().map(SvRecord::from_sv))
}

pub fn write_sv_table<'a>(
    filename: &Utf8Path,
    svs: impl IntoIterator<Item = &'a StructuralVariant>,
) {
    info!("Writing reduced structural variants to file: '{filename}'");

    let f = unwrap!(
        File::create(filename),
        "Unable to create structural variant file: '{filename}'"
    );
    unwrap!(
        write_sv_rows(BufWriter::new(f), svs),
        "Failed to write structural variant file: '{filename}'"
    );
}

#[cfg(test)]
mod tests {
    use super::*;

    const TEST_TABLE: &str = "\
id\ttype\tstartChromosome\tstartPosition\tstartOrientation\tendChromosome\tendPosition\tendOrientation\tploidy
dup1\tDUP\tchr1\t2000\t1\tchr1\t1001\t-1\t1.05
sgl1\tSGL\tchr2\t500\t-1\t.\t.\t.\t0.5
sgl2\tSGL\tchr2\t700\t1\t\t\t\t0.5
";

    #[test]
    fn test_parse_sv_table() {
        let svs = parse_sv_table(TEST_TABLE.as_bytes()).unwrap();
        assert_eq!(svs.len(), 3);

        assert_eq!(svs[0].id, "dup1");
        assert_eq!(svs[0].sv_type, SvType::Dup);
        assert_eq!(svs[0].start.orientation, Orientation::Forward);
        let end = svs[0].end.as_ref().unwrap();
        assert_eq!(end.pos, 1001);
        assert_eq!(end.orientation, Orientation::Reverse);
        approx::assert_ulps_eq!(svs[0].ploidy, 1.05, max_ulps = 4);

        assert!(svs[1].is_single_breakend());
        assert!(svs[2].is_single_breakend());
    }

    #[test]
    fn test_parse_incomplete_end_breakend() {
        let content = TEST_TABLE.replace("\t.\t.\t.\t0.5", "\tchr3\t.\t.\t0.5");
        let msg = parse_sv_table(content.as_bytes()).unwrap_err().to_string();
        assert!(msg.contains("sgl1"));
    }

    #[test]
    fn test_parse_bad_sv_type() {
        let content = TEST_TABLE.replace("DUP", "CNV");
        assert!(parse_sv_table(content.as_bytes()).is_err());
    }

    #[test]
    fn test_write_sv_rows() {
        let svs = parse_sv_table(TEST_TABLE.as_bytes()).unwrap();
        let mut buffer = Vec::new();
        write_sv_rows(&mut buffer, &svs[..2]).unwrap();
        let output = String::from_utf8(buffer).unwrap();

        let lines = output.lines().collect::<Vec<_>>();
        assert_eq!(lines.len(), 3);
        assert_eq!(lines[0], SV_COLUMNS.join("\t"));
        assert_eq!(lines[2], "sgl1\tSGL\tchr2\t500\t-1\t.\t.\t.\t0.5");
    }

    /// Reduced SV output must reproduce the input records exactly
    #[test]
    fn test_write_sv_rows_unmodified() {
        let content = TEST_TABLE.replace("1.05", "0.123456");
        let svs = parse_sv_table(content.as_bytes()).unwrap();

        let mut buffer = Vec::new();
        write_sv_rows(&mut buffer, &svs).unwrap();
        let reread = parse_sv_table(buffer.as_slice()).unwrap();
        assert_eq!(reread, svs);
        assert_eq!(reread[0].ploidy, 0.123456);
    }
}
