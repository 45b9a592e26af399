use camino::{Utf8Path, Utf8PathBuf};
use clap::Args;
use const_format::concatcp;
use serde::Serialize;
use simple_error::{SimpleResult, bail};
use unwrap::unwrap;

use super::utils::check_required_filename;
use crate::simplify_sample::SETTINGS_FILENAME;

#[derive(Args, Default, Serialize)]
pub struct SimplifySettings {
    /// Directory for all simplify command output (must not already exist)
    #[arg(long, value_name = "DIR", default_value = concatcp!(env!("CARGO_PKG_NAME"), "_simplify_output"))]
    pub output_dir: Utf8PathBuf,

    /// Copy number segments for one sample, in tab-separated format with a header line
    ///
    /// Segments must be grouped by chromosome, sorted by start position and non-overlapping
    /// within each chromosome. The file may be gzip compressed.
    ///
    #[arg(long = "segments", value_name = "FILE")]
    pub segments_filename: String,

    /// Structural variants for the same sample, in tab-separated format with a header line
    ///
    /// Each SV breakend must sit exactly on a boundary of the copy number segmentation. The file
    /// may be gzip compressed.
    ///
    #[arg(long = "svs", value_name = "FILE")]
    pub svs_filename: String,

    /// Maximum difference between the copy number change across a breakend and the event ploidy,
    /// for duplication and deletion patterns
    #[arg(long, default_value_t = 0.5)]
    pub max_copy_number_delta: f64,

    /// Maximum difference between the ploidy of each SV and the ploidy of its simplified event
    #[arg(long, default_value_t = 0.75)]
    pub max_event_delta: f64,

    /// Accept every detected pattern regardless of copy number consistency.
    ///
    /// This is for debug only.
    ///
    #[arg(hide = true, long)]
    pub accept_all: bool,

    /// Stop simplification after this many accepted simplifications.
    ///
    #[arg(hide = true, long)]
    pub max_iterations: Option<usize>,
}

/// Validate settings and update to parameters that can't be processed automatically by clap.
///
/// Assumes that the logger is not setup
///
pub fn validate_and_fix_simplify_settings(
    settings: SimplifySettings,
) -> SimpleResult<SimplifySettings> {
    check_required_filename(&settings.segments_filename, "copy number segment")?;

    check_required_filename(&settings.svs_filename, "structural variant")?;

    if !(settings.max_copy_number_delta >= 0.0) {
        bail!("--max-copy-number-delta argument must be non-negative");
    }

    if !(settings.max_event_delta >= 0.0) {
        bail!("--max-event-delta argument must be non-negative");
    }

    if settings.max_iterations == Some(0) {
        bail!("--max-iterations argument must be greater than 0");
    }

    Ok(settings)
}

/// Write simplify settings out in json format
pub fn write_simplify_settings(output_dir: &Utf8Path, settings: &SimplifySettings) {
    use log::info;

    let filename = output_dir.join(SETTINGS_FILENAME);

    info!("Writing simplify settings to file: '{filename}'");

    let f = unwrap!(
        std::fs::File::create(&filename),
        "Unable to create simplify settings json file: '{filename}'"
    );

    unwrap!(
        serde_json::to_writer_pretty(&f, &settings),
        "Unable to write simplify settings json file: '{filename}'"
    );
}
