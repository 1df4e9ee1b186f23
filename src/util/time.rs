use std::time::{SystemTime, UNIX_EPOCH};

/// Milliseconds since the Unix epoch, for record timestamps.
pub fn timestamp_millis() -> u64 {
    SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .map(|d| d.as_millis() as u64)
        .unwrap_or(0)
}
