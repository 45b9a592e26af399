use clap::Args;
use simple_error::SimpleResult;

#[derive(Args)]
pub struct SharedSettings {
    /// Overwrite an existing output directory
    #[arg(long, global = true)]
    pub clobber: bool,

    /// Turn on extra debug logging
    ///
    /// This option enables extra logging intended for debugging only, including a summary of
    /// every accepted simplification.
    ///
    #[arg(long, global = true)]
    pub debug: bool,
}

pub fn validate_and_fix_shared_settings(settings: SharedSettings) -> SimpleResult<SharedSettings> {
    Ok(settings)
}
