//! Wall-clock timestamp source for the points engine
//!
//! Balances and history records carry millisecond timestamps produced
//! by [`now_millis`]. Domain logic takes the timestamp as a parameter
//! so tests can pin time; only the stores and the service read the
//! clock directly.

use std::time::{SystemTime, UNIX_EPOCH};

/// Current time in milliseconds since the Unix epoch
///
/// Returns 0 if the system clock reports a time before the epoch;
/// record validation rejects that value instead of panicking here.
pub fn now_millis() -> i64 {
    SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .map(|elapsed| elapsed.as_millis() as i64)
        .unwrap_or(0)
}
