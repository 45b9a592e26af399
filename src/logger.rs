//! Run logger setup, writing to stderr and to a log file in the output directory
//!

use camino::{Utf8Path, Utf8PathBuf};
use const_format::concatcp;

use crate::cli;
use crate::globals::PROGRAM_NAME;
use crate::os_utils::create_dir_all;

const LOG_FILENAME: &str = concatcp!(PROGRAM_NAME, ".log");

fn get_log_filename(output_dir: &Utf8Path) -> Utf8PathBuf {
    output_dir.join(LOG_FILENAME)
}

/// If debug is true set the default logger to the more verbose debug level
///
fn setup_logger(log_filename: &Utf8Path, debug: bool) -> Result<(), fern::InitError> {
    let level = if debug {
        log::LevelFilter::Debug
    } else {
        log::LevelFilter::Info
    };
    fern::Dispatch::new()
        .format(|out, message, record| {
            out.finish(format_args!(
                "{}[{}][{}] {}",
                chrono::Local::now().format("[%Y-%m-%d][%H:%M:%S]"),
                PROGRAM_NAME,
                record.level(),
                message
            ))
        })
        .level(level)
        .chain(std::io::stderr())
        .chain(fern::log_file(log_filename)?)
        .apply()?;
    Ok(())
}

/// Check and create output directory, then setup logger to write there
///
/// Any failure exits the process, after printing a message to stderr since no logger is available
/// yet. An existing output directory is only accepted with `clobber`.
///
/// #Arguments
/// * `debug` - If true use debug log level, and info level otherwise
///
pub fn setup_output_dir_and_logger(output_dir: &Utf8Path, clobber: bool, debug: bool) {
    if let Err(msg) = cli::check_novel_dirname(output_dir, "Output directory") {
        if !(clobber || output_dir.is_dir()) {
            eprintln!("Invalid command-line setting: {}", msg);
            std::process::exit(exitcode::USAGE);
        }
    };
    create_dir_all(output_dir, "output");

    let log_filename = get_log_filename(output_dir);
    if let Err(e) = setup_logger(&log_filename, debug) {
        eprintln!("Unable to setup logger with log file '{log_filename}': {e}");
        std::process::exit(exitcode::IOERR);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_get_log_filename() {
        assert_eq!(
            get_log_filename(Utf8Path::new("out")).as_str(),
            "out/breakgraph.log"
        );
    }
}
