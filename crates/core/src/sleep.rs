use std::thread;
use std::time::Duration;

use crate::types::{CancelToken, Cancelled};

/// Granularity of cancellation checks inside a timed wait.
const SLICE_MS: u64 = 10;

/// Sleep for exact milliseconds.
pub fn sleep_ms(ms: u64) {
    thread::sleep(Duration::from_millis(ms));
}

/// Sleep for `ms` milliseconds, checking `cancel` between slices.
/// Returns `Err(Cancelled)` as soon as the token fires.
pub fn sleep_cancellable(ms: u64, cancel: &CancelToken) -> Result<(), Cancelled> {
    if cancel.is_cancelled() {
        return Err(Cancelled);
    }
    let mut remaining = ms;
    while remaining > 0 {
        let slice = remaining.min(SLICE_MS);
        thread::sleep(Duration::from_millis(slice));
        remaining -= slice;
        if cancel.is_cancelled() {
            return Err(Cancelled);
        }
    }
    Ok(())
}
