use std::env;
use std::ffi::OsString;

pub const LOG_DEBUG_VAR: &str = "LOG_DEBUG";
pub const IGNORE_SHUTDOWN_FILE_VAR: &str = "IGNORE_SHUTDOWN_FILE";
pub const SHELL_VAR: &str = "SHELL";

/// Everything we take from the environment, read once at startup.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Config {
    pub log_debug: bool,
    pub ignore_shutdown_file: bool,
    pub shell: Option<OsString>,
}

impl Config {
    pub fn from_env() -> Self {
        Self::from_lookup(|key| env::var_os(key))
    }

    pub(crate) fn from_lookup(lookup: impl Fn(&str) -> Option<OsString>) -> Self {
        // Presence is what counts, "LOG_DEBUG=" enables it too
        let log_debug = lookup(LOG_DEBUG_VAR).is_some();
        let ignore_shutdown_file = lookup(IGNORE_SHUTDOWN_FILE_VAR).is_some();
        let shell = lookup(SHELL_VAR);

        Self {
            log_debug,
            ignore_shutdown_file,
            shell,
        }
    }
}
