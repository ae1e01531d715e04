// Linear remaining-time estimate
//
// remaining = elapsed * (total - index) / index
//
// Assumes every pass costs the same. Uneven passes (I/O contention, a slow
// package manager) make the estimate drift; it is not corrected here.

use std::time::Duration;

pub fn estimate_remaining(elapsed: Duration, index: usize, total: usize) -> Duration {
    if index == 0 || index >= total {
        return Duration::ZERO;
    }

    let nanos = elapsed.as_nanos() * (total - index) as u128 / index as u128;
    Duration::from_nanos(u64::try_from(nanos).unwrap_or(u64::MAX))
}
