use std::time::{Duration, Instant};

use crate::error::{HwError, Result};

/// Poll the `ready` predicate until it returns true or `timeout` expires.
/// Sleeps `poll_interval` between polls to avoid spinning the CPU.
pub fn wait_for_data_ready(
    mut ready: impl FnMut() -> bool,
    timeout: Duration,
    poll_interval: Duration,
) -> Result<()> {
    let deadline = Instant::now() + timeout;
    while !ready() {
        if Instant::now() >= deadline {
            return Err(HwError::DataReadyTimeout);
        }
        std::thread::sleep(poll_interval);
    }
    Ok(())
}
