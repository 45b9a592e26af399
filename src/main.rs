mod breakpoint_graph;
mod chrom_list;
mod cli;
mod copy_number_segment;
mod csv_utils;
mod errors;
mod globals;
mod log_utils;
mod logger;
mod os_utils;
mod run_stats;
mod segment_store;
mod segment_table;
mod simplification_output;
mod simplify;
mod simplify_sample;
mod structural_variant;
mod sv_table;

use std::{error, process};

use hhmmss::Hhmmss;
use log::info;

use crate::cli::Commands;
use crate::globals::{PROGRAM_NAME, PROGRAM_VERSION};
use crate::logger::setup_output_dir_and_logger;
use crate::simplify_sample::run_simplify;

fn run(settings: &cli::Settings) -> Result<(), Box<dyn error::Error>> {
    info!("Starting {PROGRAM_NAME} {PROGRAM_VERSION}");
    info!(
        "cmdline: {}",
        std::env::args().collect::<Vec<_>>().join(" ")
    );

    let start = std::time::Instant::now();

    match &settings.command {
        Commands::Simplify(x) => {
            run_simplify(&settings.shared, x)?;
        }
    }

    info!(
        "{PROGRAM_NAME} completed. Total Runtime: {}",
        start.elapsed().hhmmssxxx()
    );
    Ok(())
}

fn main() {
    let settings = cli::validate_and_fix_settings(cli::parse_settings());

    // Setup logger, including creation of the output directory for the log file:
    setup_output_dir_and_logger(
        settings.get_output_dir(),
        settings.shared.clobber,
        settings.shared.debug,
    );

    if let Err(err) = run(&settings) {
        eprintln!("{err}");
        process::exit(2);
    }
}
