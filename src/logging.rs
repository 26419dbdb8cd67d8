use std::io::Write;

use log::LevelFilter;

/// Sets up stderr logging once. `LOG_DEBUG` decides the level for the whole
/// run, so later calls never look at the environment again.
pub fn init(debug: bool) {
    let level = if debug {
        LevelFilter::Debug
    } else {
        LevelFilter::Warn
    };

    let result = env_logger::Builder::new()
        .filter_level(level)
        .target(env_logger::Target::Stderr)
        .format(|buf, record| {
            writeln!(buf, "{}: {}", record.level(), record.args())
        })
        .try_init();

    if let Err(err) = result {
        eprintln!("Couldn't set up logging: {err}");
    }
}
