use std::ffi::OsStr;
use std::os::unix::process::CommandExt;

use log::debug;

use crate::cli::Invocation;
use crate::shell::ShellChoice;
use crate::uptime::HostState;
use crate::Error;

#[derive(Debug, Clone, Copy, PartialEq, Eq, strum::Display)]
#[strum(serialize_all = "kebab-case")]
pub enum Branch {
    Up,
    NotUp,
}

impl Branch {
    pub fn select(host: &HostState, threshold: i64) -> Self {
        if host.up_longer_than(threshold) {
            Branch::Up
        } else {
            Branch::NotUp
        }
    }

    /// The command this branch runs, if any.
    pub fn command<'a>(&self, invocation: &'a Invocation) -> Option<&'a OsStr> {
        match self {
            Branch::Up => Some(invocation.command_if_up.as_os_str()),
            Branch::NotUp => invocation.command_if_not_up.as_deref(),
        }
    }
}

/// Replaces this process with the shell running the branch's command.
///
/// Only returns `Ok(())` if the branch has no command. Any error means the
/// exec itself failed.
pub fn dispatch(
    invocation: &Invocation,
    branch: Branch,
    shell: &ShellChoice,
) -> Result<(), Error> {
    let Some(script) = branch.command(invocation) else {
        debug!("no command for the {branch} branch, exiting 0");
        return Ok(());
    };

    debug!(
        "executing {} -c \"{}\"",
        shell.path.to_string_lossy(),
        script.to_string_lossy()
    );
    let err = shell.command(script).exec();

    Err(Error::ExecStart {
        shell: shell.path.clone(),
        source: err,
    })
}
