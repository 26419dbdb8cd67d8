use std::path::Path;

use log::trace;

/// Marker that signals an intentional shutdown is underway. Never created or
/// removed by us.
pub const SHUTDOWN_FILE: &str = "/tmp/shutdown_in_progress";

pub fn in_progress(sentinel: &Path) -> bool {
    match sentinel.try_exists() {
        Ok(exists) => exists,
        // Default to no shutdown
        Err(err) => {
            trace!("Couldn't check {}: {err}", sentinel.display());
            false
        }
    }
}
