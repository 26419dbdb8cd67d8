use std::ffi::OsString;

use clap::error::ErrorKind;
use clap::{CommandFactory, FromArgMatches, Parser};
use const_format::concatcp;
use log::debug;

use crate::shell::DEFAULT_SHELL;
use crate::shutdown::SHUTDOWN_FILE;
use crate::Error;

const ABOUT: &str = "Run commands based on machine uptime.

Useful for things like healthchecks where you don't want to log error \
messages when the machine or container is starting up.";

const AFTER_HELP: &str = concatcp!(
    "If the file ",
    SHUTDOWN_FILE,
    " exists, assume there is no need to run any commands, and 0 is returned.
You can turn off this behavior by setting the environment variable IGNORE_SHUTDOWN_FILE.

Commands run as `$SHELL -c <cmd>`, or `",
    DEFAULT_SHELL,
    " -c <cmd>` when SHELL is unset or empty. SHELL is used as a path as-is and is
never looked up on PATH.

Examples:
 exec-if-up 60 \"(curl localhost/healthz || echo 'ERROR: healthcheck failed')\" &>/proc/1/fd/1
 If this machine/container has been up for at least a minute, hit http://localhost/healthz and if that
 does not return 200, echo an error message.

 exec-if-up 60 \"(curl localhost/healthz || echo 'ERROR: healthcheck failed')\" \"(curl localhost/healthz || echo 'INFO: healthcheck failed')\" &>/proc/1/fd/1
 Same as above, but if the machine has not been up for at least 60 seconds and the healthcheck
 is failing, log an INFO message instead. This allows you to set up logging rules that ignore
 INFO healthcheck failures.

 LOG_DEBUG=1 SHELL=/bin/bash exec-if-up 60 \"(curl localhost/healthz || echo 'ERROR: healthcheck failed')\" &>/proc/1/fd/1
 Same as the first example, but with debug logging enabled, and using bash as the shell instead
 of the default \"",
    DEFAULT_SHELL,
    "\"."
);

#[derive(Parser, Debug, Clone, PartialEq)]
#[command(version, about = ABOUT, after_help = AFTER_HELP)]
pub struct Invocation {
    /// Number of seconds the machine must be up for
    #[arg(value_name = "n_secs", allow_negative_numbers = true)]
    pub threshold: i64,

    /// Command to run if the machine has been up n_secs
    #[arg(value_name = "cmd_if_up_for_n_secs")]
    pub command_if_up: OsString,

    /// Command to run if the machine has not yet been up n_secs
    #[arg(value_name = "cmd_if_not_up_for_n_secs")]
    pub command_if_not_up: Option<OsString>,
}

pub fn parse<I, T>(args: I) -> Result<Invocation, Error>
where
    I: IntoIterator<Item = T>,
    T: Into<OsString>,
{
    let args = seal_commands(args.into_iter().map(Into::into).collect());
    let raw_threshold = args.iter().skip(1).find(|arg| *arg != "--").cloned();

    let invocation = Invocation::command()
        .try_get_matches_from(args)
        .and_then(|matches| Invocation::from_arg_matches(&matches))
        .map_err(|err| match err.kind() {
            // The threshold is the only argument with a validating parser
            ErrorKind::ValueValidation => Error::Threshold(err),
            _ => Error::Usage(err),
        })?;

    if let Some(raw) = raw_threshold {
        debug!(
            "secs={}, parsed secs={}",
            raw.to_string_lossy(),
            invocation.threshold
        );
    }

    Ok(invocation)
}

/// Everything after the threshold goes to the shell untouched, so a command
/// like `--version` must never reach clap as a flag. Help and version still
/// work in first position.
fn seal_commands(mut args: Vec<OsString>) -> Vec<OsString> {
    if args.len() > 2 && args[1] != "--" {
        args.insert(2, OsString::from("--"));
    }
    args
}

/// Prints a parse failure the way a user should see it: clap's message, plus
/// the full help text when the argument list itself was wrong.
pub fn print_error(err: &clap::Error) {
    if let Err(io_err) = err.print() {
        log::warn!("Couldn't print usage: {io_err}");
    }

    if err.exit_code() != 0 && err.kind() != ErrorKind::ValueValidation {
        eprintln!("\n{}", Invocation::command().render_long_help());
    }
}

#[cfg(test)]
mod tests {
    use std::ffi::OsStr;
    use std::os::unix::ffi::OsStrExt;

    use super::*;

    #[test]
    fn two_arguments() {
        let invocation = parse(["exec-if-up", "60", "curl localhost"]).unwrap();

        assert_eq!(
            invocation,
            Invocation {
                threshold: 60,
                command_if_up: "curl localhost".into(),
                command_if_not_up: None,
            }
        );
    }

    #[test]
    fn three_arguments() {
        let invocation =
            parse(["exec-if-up", "60", "echo up", "echo not up"]).unwrap();

        assert_eq!(
            invocation.command_if_not_up.as_deref(),
            Some(OsStr::new("echo not up"))
        );
    }

    #[test]
    fn missing_arguments_are_usage_errors() {
        for args in [vec!["exec-if-up"], vec!["exec-if-up", "60"]] {
            let err = parse(args).unwrap_err();
            assert!(matches!(err, Error::Usage(_)), "{err:?}");
            assert_eq!(err.exit_code(), 1);
        }
    }

    #[test]
    fn extra_arguments_are_usage_errors() {
        let err = parse(["exec-if-up", "1", "a", "b", "c"]).unwrap_err();

        assert!(matches!(err, Error::Usage(_)));
    }

    #[test]
    fn unparseable_threshold() {
        let err = parse(["exec-if-up", "abc", "true"]).unwrap_err();

        assert!(matches!(err, Error::Threshold(_)));
    }

    #[test]
    fn out_of_range_threshold() {
        let err =
            parse(["exec-if-up", "99999999999999999999", "true"]).unwrap_err();

        assert!(matches!(err, Error::Threshold(_)));
    }

    #[test]
    fn range_endpoints_are_valid() {
        let max = i64::MAX.to_string();
        let min = i64::MIN.to_string();

        let parsed_max = parse(["exec-if-up", max.as_str(), "true"]).unwrap();
        let parsed_min = parse(["exec-if-up", min.as_str(), "true"]).unwrap();

        assert_eq!(parsed_max.threshold, i64::MAX);
        assert_eq!(parsed_min.threshold, i64::MIN);
    }

    #[test]
    fn negative_threshold() {
        let invocation = parse(["exec-if-up", "-5", "true"]).unwrap();

        assert_eq!(invocation.threshold, -5);
    }

    #[test]
    fn flag_like_commands_are_forwarded() {
        let invocation =
            parse(["exec-if-up", "-1", "--version", "-h"]).unwrap();

        assert_eq!(invocation.threshold, -1);
        assert_eq!(invocation.command_if_up, "--version");
        assert_eq!(invocation.command_if_not_up.as_deref(), Some(OsStr::new("-h")));
    }

    #[test]
    fn help_and_version_only_in_first_position() {
        for flag in ["-h", "--help", "-V", "--version"] {
            let err = parse(["exec-if-up", flag]).unwrap_err();
            assert_eq!(err.exit_code(), 0, "{flag}");
        }
    }

    #[test]
    fn leading_double_dash_is_not_doubled() {
        let invocation = parse(["exec-if-up", "--", "-5", "-x"]).unwrap();

        assert_eq!(invocation.threshold, -5);
        assert_eq!(invocation.command_if_up, "-x");
    }

    #[test]
    fn non_utf8_commands_are_kept_as_bytes() {
        let command = OsStr::from_bytes(b"exit 3 #\xff");
        let args = [OsStr::new("exec-if-up"), OsStr::new("60"), command];

        let invocation = parse(args).unwrap();

        assert_eq!(invocation.command_if_up.as_os_str(), command);
    }

    #[test]
    fn help_mentions_sentinel_and_override() {
        let help = Invocation::command().render_long_help().to_string();

        assert!(help.contains(SHUTDOWN_FILE));
        assert!(help.contains("IGNORE_SHUTDOWN_FILE"));
        assert!(help.contains("n_secs"));
        assert!(help.contains("never looked up on PATH"));
    }

    #[test]
    fn clap_definition_is_consistent() {
        Invocation::command().debug_assert();
    }
}
