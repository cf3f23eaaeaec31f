//! Snowflake ID Generator
//!
//! Time-ordered unique IDs for users, groups, posts and comments.

use std::sync::atomic::{AtomicU64, Ordering};
use std::time::{SystemTime, UNIX_EPOCH};

use parking_lot::Mutex;

/// Default epoch (2015-01-01T00:00:00.000Z)
pub const DEFAULT_EPOCH: u64 = 1420070400000;

const SEQUENCE_MASK: u64 = 0xFFF;

/// Snowflake ID generator
///
/// Layout: 41 bits of milliseconds since `epoch`, 5 bits machine, 5 bits node,
/// 12 bits sequence.
pub struct SnowflakeGenerator {
    epoch: u64,
    machine_id: u64,
    node_id: u64,
    /// (last timestamp, sequence) advanced together
    state: Mutex<(u64, u64)>,
    issued: AtomicU64,
}

impl SnowflakeGenerator {
    /// Create a new snowflake generator with the default epoch
    pub fn new(machine_id: u64, node_id: u64) -> Self {
        Self::with_epoch(DEFAULT_EPOCH, machine_id, node_id)
    }

    pub fn with_epoch(epoch: u64, machine_id: u64, node_id: u64) -> Self {
        Self {
            epoch,
            machine_id: machine_id & 0x1F,
            node_id: node_id & 0x1F,
            state: Mutex::new((0, 0)),
            issued: AtomicU64::new(0),
        }
    }

    /// Generate a new snowflake ID
    pub fn generate(&self) -> i64 {
        let mut state = self.state.lock();
        let mut timestamp = current_timestamp().max(state.0);

        let sequence = if timestamp == state.0 {
            let next = (state.1 + 1) & SEQUENCE_MASK;
            if next == 0 {
                // Sequence exhausted for this millisecond: borrow the next one.
                timestamp += 1;
            }
            next
        } else {
            0
        };
        *state = (timestamp, sequence);
        drop(state);

        self.issued.fetch_add(1, Ordering::Relaxed);

        let id = ((timestamp.saturating_sub(self.epoch)) << 22)
            | (self.machine_id << 17)
            | (self.node_id << 12)
            | sequence;

        id as i64
    }

    /// Number of IDs handed out by this generator.
    pub fn issued(&self) -> u64 {
        self.issued.load(Ordering::Relaxed)
    }

    /// Extract the creation timestamp (ms since UNIX epoch) from an ID.
    pub fn timestamp_of(&self, snowflake: i64) -> u64 {
        ((snowflake as u64) >> 22) + self.epoch
    }
}

fn current_timestamp() -> u64 {
    SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .map(|d| d.as_millis() as u64)
        .unwrap_or(0)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashSet;

    #[test]
    fn test_generate_unique_and_increasing() {
        let gen = SnowflakeGenerator::new(1, 1);
        let ids: Vec<i64> = (0..10_000).map(|_| gen.generate()).collect();
        let unique: HashSet<_> = ids.iter().collect();
        assert_eq!(unique.len(), ids.len());
        assert!(ids.windows(2).all(|w| w[0] < w[1]));
        assert_eq!(gen.issued(), 10_000);
    }

    #[test]
    fn test_timestamp_roundtrip() {
        let gen = SnowflakeGenerator::with_epoch(DEFAULT_EPOCH, 3, 0);
        let id = gen.generate();
        let ts = gen.timestamp_of(id);
        let now = current_timestamp();
        assert!(ts <= now + 5);
        assert!(ts + 1000 > now);
    }
}
