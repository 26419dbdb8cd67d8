use std::ffi::{OsStr, OsString};
use std::os::unix::ffi::OsStrExt;
use std::os::unix::process::CommandExt;
use std::path::{Path, PathBuf};
use std::process::Command;

use log::debug;

use crate::Error;

pub const DEFAULT_SHELL: &str = "/bin/sh";
pub const DEFAULT_SHELL_NAME: &str = "sh";

/// The shell binary to exec and the name it sees as `argv[0]`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ShellChoice {
    pub path: OsString,
    pub invocation_name: OsString,
}

impl Default for ShellChoice {
    fn default() -> Self {
        Self {
            path: DEFAULT_SHELL.into(),
            invocation_name: DEFAULT_SHELL_NAME.into(),
        }
    }
}

impl ShellChoice {
    /// Uses `preferred` (the value of `SHELL`) when it is set and non-empty.
    pub fn resolve(preferred: Option<&OsStr>) -> Result<Self, Error> {
        let Some(shell) = preferred.filter(|shell| !shell.is_empty()) else {
            return Ok(Self::default());
        };

        let invocation_name = Path::new(shell)
            .file_name()
            .ok_or_else(|| Error::ShellResolution(shell.to_owned()))?
            .to_owned();

        let choice = Self {
            path: shell.to_owned(),
            invocation_name,
        };
        debug!(
            "custom shell requested, set shell={:?}, shell_argv0={:?}",
            choice.path, choice.invocation_name
        );

        Ok(choice)
    }

    /// `<path> -c <script>`, inheriting our environment and standard streams.
    pub fn command(&self, script: &OsStr) -> Command {
        let mut command = Command::new(self.program());
        command.arg0(&self.invocation_name).arg("-c").arg(script);
        command
    }

    /// The path handed to exec. `PATH` is never searched: a bare name like
    /// `bash` means `./bash`, as it would for `execve`.
    pub fn program(&self) -> PathBuf {
        if self.path.as_bytes().contains(&b'/') {
            PathBuf::from(&self.path)
        } else {
            Path::new(".").join(&self.path)
        }
    }
}
