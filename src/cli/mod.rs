mod shared;
mod simplify;
mod utils;

use camino::Utf8Path;
use chrono::Datelike;
use clap::{Parser, Subcommand};
use simple_error::{SimpleResult, bail};

use self::shared::validate_and_fix_shared_settings;
pub use self::shared::SharedSettings;
use self::simplify::validate_and_fix_simplify_settings;
pub use self::simplify::{SimplifySettings, write_simplify_settings};

#[derive(Subcommand)]
pub enum Commands {
    /// Reduce the SVs of one sample into simplified events over its copy number segmentation
    Simplify(SimplifySettings),
}

#[derive(Parser)]
#[command(
    author,
    version,
    about,
    after_help = format!("Copyright (C) 2004-{}     Pacific Biosciences of California, Inc.
This program comes with ABSOLUTELY NO WARRANTY; it is intended for
Research Use Only and not for use in diagnostic procedures.", chrono::Utc::now().year()),
    help_template = "\
{before-help}{name} {version}
{author-with-newline}{about-with-newline}
{usage-heading} {usage}

{all-args}{after-help}"
)]
#[clap(propagate_version = true, rename_all = "kebab_case")]
pub struct Settings {
    #[command(flatten)]
    pub shared: SharedSettings,

    #[command(subcommand)]
    pub command: Commands,
}

impl Settings {
    pub fn get_output_dir(&self) -> &Utf8Path {
        match &self.command {
            Commands::Simplify(x) => &x.output_dir,
        }
    }
}

/// Checks if a directory does not exist
///
pub fn check_novel_dirname(dirname: &Utf8Path, label: &str) -> SimpleResult<()> {
    if dirname.exists() {
        bail!("{} already exists: \"{}\"", label, dirname);
    }
    Ok(())
}

/// Validate settings and update parameters that can't be processed by clap
///
fn validate_and_fix_settings_impl(mut settings: Settings) -> SimpleResult<Settings> {
    settings.shared = validate_and_fix_shared_settings(settings.shared)?;

    settings.command = match settings.command {
        Commands::Simplify(x) => {
            let x = validate_and_fix_simplify_settings(x)?;
            Commands::Simplify(x)
        }
    };

    Ok(settings)
}

/// Validate settings and update to parameters that can't be processed automatically by clap.
///
/// Assumes that the logger is not setup
///
pub fn validate_and_fix_settings(settings: Settings) -> Settings {
    match validate_and_fix_settings_impl(settings) {
        Ok(x) => x,
        Err(msg) => {
            eprintln!("Invalid command-line setting: {}", msg);
            std::process::exit(exitcode::USAGE);
        }
    }
}

pub fn parse_settings() -> Settings {
    Settings::parse()
}
