use std::ffi::{OsStr, OsString};
use std::path::Path;

use log::debug;
use thiserror::Error;

use crate::config::Config;
use crate::dispatch::Branch;
use crate::shell::ShellChoice;
use crate::shutdown::SHUTDOWN_FILE;
use crate::uptime::HostState;

pub mod cli;
pub mod config;
pub mod dispatch;
pub mod logging;
pub mod shell;
pub mod shutdown;
pub mod uptime;

pub use cli::Invocation;

/// Exit status when the exec call itself fails and control comes back to us.
pub const EXEC_FAILED_STATUS: u8 = 99;
pub const SHELL_RESOLUTION_STATUS: u8 = 96;

#[derive(Error, Debug)]
pub enum Error {
    #[error("{0}")]
    Usage(clap::Error),
    #[error("{0}")]
    Threshold(clap::Error),
    #[error("sysinfo()")]
    Uptime(#[source] nix::errno::Errno),
    #[error("Couldn't derive a shell name from SHELL={0:?}")]
    ShellResolution(OsString),
    #[error("Couldn't exec {shell:?}")]
    ExecStart {
        shell: OsString,
        #[source]
        source: std::io::Error,
    },
}

impl Error {
    pub fn exit_code(&self) -> u8 {
        match self {
            // --help and --version come through here too, with clap's 0
            Error::Usage(err) if err.exit_code() == 0 => 0,
            Error::Usage(_) | Error::Threshold(_) | Error::Uptime(_) => 1,
            Error::ShellResolution(_) => SHELL_RESOLUTION_STATUS,
            Error::ExecStart { .. } => EXEC_FAILED_STATUS,
        }
    }
}

/// Runs one invocation to completion.
///
/// Returns `Ok(())` only when there was nothing to execute. When a command is
/// chosen the process is replaced by the shell and this never returns.
pub fn run(invocation: &Invocation, config: &Config) -> Result<(), Error> {
    run_with_sentinel(invocation, config, Path::new(SHUTDOWN_FILE))
}

pub(crate) fn run_with_sentinel(
    invocation: &Invocation,
    config: &Config,
    sentinel: &Path,
) -> Result<(), Error> {
    if !config.ignore_shutdown_file && shutdown::in_progress(sentinel) {
        debug!("file {} found, exiting 0", sentinel.display());
        return Ok(());
    }

    let host = HostState::read()?;

    debug!("this machine has been up for {} seconds", host.uptime_seconds);
    debug!("cmd_if_up={}", invocation.command_if_up.to_string_lossy());
    debug!(
        "cmd_if_not_up={}",
        invocation
            .command_if_not_up
            .as_deref()
            .map_or("(none)".into(), OsStr::to_string_lossy)
    );

    let shell = ShellChoice::resolve(config.shell.as_deref())?;

    let branch = Branch::select(&host, invocation.threshold);
    debug!(
        "taking the {branch} branch (threshold {} secs, actually up {} secs)",
        invocation.threshold, host.uptime_seconds
    );

    dispatch::dispatch(invocation, branch, &shell)
}
