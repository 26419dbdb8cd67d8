use std::process::ExitCode;

use exec_if_up::config::Config;
use exec_if_up::{cli, logging, Error};
use log::error;

fn main() -> ExitCode {
    let config = Config::from_env();
    logging::init(config.log_debug);

    if let Err(err) = color_eyre::install() {
        error!("Couldn't install error report handler: {err}");
    }

    let result = cli::parse(std::env::args_os())
        .and_then(|invocation| exec_if_up::run(&invocation, &config));

    match result {
        Ok(()) => ExitCode::SUCCESS,
        Err(err) => {
            let code = err.exit_code();
            report(err);
            ExitCode::from(code)
        }
    }
}

fn report(err: Error) {
    match err {
        Error::Usage(err) | Error::Threshold(err) => cli::print_error(&err),
        other => error!("{:#}", color_eyre::Report::new(other)),
    }
}
