pub use log::{debug, info};

/// Log a simplification trace message at a level chosen by a local flag
///
/// With the flag set the message is logged at info level, so it reaches both stderr and the run
/// log file regardless of the global log level. Otherwise it is a debug level message, shown only
/// when the global `--debug` option is given.
///
/// # Examples
///
/// ```ignore
/// debug_msg!(settings.debug, "Accepted {} of SV indices [{}]", kind, indices);
/// ```
macro_rules! debug_msg {
    ($flag:expr, $($arg:tt)+) => {
        if $flag {
            $crate::log_utils::info!($($arg)+);
        } else {
            $crate::log_utils::debug!($($arg)+);
        }
    }
}

pub(crate) use debug_msg;
