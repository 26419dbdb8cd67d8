use nix::sys::sysinfo::sysinfo;

use crate::Error;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct HostState {
    pub uptime_seconds: u64,
}

impl HostState {
    pub fn read() -> Result<Self, Error> {
        let info = sysinfo().map_err(Error::Uptime)?;

        Ok(Self {
            uptime_seconds: info.uptime().as_secs(),
        })
    }

    /// Strictly greater: being up exactly `threshold` seconds is not enough.
    pub fn up_longer_than(&self, threshold: i64) -> bool {
        i128::from(self.uptime_seconds) > i128::from(threshold)
    }
}
