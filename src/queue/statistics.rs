//! Channel Statistics
//!
//! Counters maintained under the channel guard. A snapshot is consistent with
//! itself but may be stale as soon as it is returned.

use serde::Serialize;

/// Point-in-time counters for a bounded channel
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct ChannelStatistics {
    /// Fixed capacity of the channel
    pub capacity: usize,

    /// Items buffered at the time of the snapshot
    pub size: usize,

    /// Largest buffered size ever observed
    pub high_water_mark: usize,

    /// Successful puts
    pub total_put: u64,

    /// Successful gets
    pub total_get: u64,

    /// Puts that gave up after their timeout
    pub put_timeouts: u64,

    /// Gets that gave up after their timeout
    pub get_timeouts: u64,

    /// Whether the channel has been closed
    pub closed: bool,
}

impl ChannelStatistics {
    /// Buffered size as a percentage of capacity
    pub fn utilization_percent(&self) -> f64 {
        if self.capacity == 0 {
            return 0.0;
        }
        (self.size as f64 / self.capacity as f64) * 100.0
    }

    /// Items that went in but have not yet come out
    pub fn in_flight(&self) -> u64 {
        self.total_put.saturating_sub(self.total_get)
    }
}
