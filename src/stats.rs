//! Receiver statistics
//!
//! A shared counter aggregate owned by the feed layer and mutated by every
//! translator that decodes for it. All counters for one decode are bumped
//! under a single lock acquisition so concurrent readers never observe a
//! partial update. Nothing blocks inside the lock.

use std::fmt;

use parking_lot::Mutex;
use serde::Serialize;

/// Counter values at a point in time.
#[derive(Debug, Clone, Serialize)]
pub struct StatisticsSnapshot {
    /// Total Mode S messages decoded.
    pub modes_message_count: u64,
    /// Messages per downlink format, indexed by the clamped format number.
    pub messages_by_downlink_format: [u64; 25],
    /// 112-bit frames decoded.
    pub long_frame_count: u64,
    /// 56-bit frames decoded.
    pub short_frame_count: u64,
}

impl Default for StatisticsSnapshot {
    fn default() -> Self {
        Self {
            modes_message_count: 0,
            messages_by_downlink_format: [0; 25],
            long_frame_count: 0,
            short_frame_count: 0,
        }
    }
}

/// Lock-protected receiver counters, shared between decode threads via
/// `Arc<ReceiverStatistics>`.
#[derive(Debug, Default)]
pub struct ReceiverStatistics {
    inner: Mutex<StatisticsSnapshot>,
}

impl ReceiverStatistics {
    pub fn new() -> Self {
        Self::default()
    }

    /// Record one decoded message. `downlink_format` must already be clamped
    /// to 0..=24; `long_frame` is the frame-length class of the format, not
    /// of the buffer it arrived in.
    pub fn record_message(&self, downlink_format: u8, long_frame: bool) {
        let mut counters = self.inner.lock();
        counters.modes_message_count += 1;
        counters.messages_by_downlink_format[downlink_format as usize] += 1;
        if long_frame {
            counters.long_frame_count += 1;
        } else {
            counters.short_frame_count += 1;
        }
    }

    /// Copy the current counter values.
    pub fn snapshot(&self) -> StatisticsSnapshot {
        self.inner.lock().clone()
    }
}

impl fmt::Display for StatisticsSnapshot {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "Mode S messages : {}", self.modes_message_count)?;
        writeln!(f, "  Short frames  : {}", self.short_frame_count)?;
        writeln!(f, "  Long frames   : {}", self.long_frame_count)?;
        for (df, count) in self.messages_by_downlink_format.iter().enumerate() {
            if *count > 0 {
                writeln!(f, "  DF{:<2}          : {}", df, count)?;
            }
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;
    use std::thread;

    use super::*;

    #[test]
    fn test_record_message_buckets() {
        let stats = ReceiverStatistics::new();
        stats.record_message(17, true);
        stats.record_message(17, true);
        stats.record_message(4, false);

        let snap = stats.snapshot();
        assert_eq!(snap.modes_message_count, 3);
        assert_eq!(snap.messages_by_downlink_format[17], 2);
        assert_eq!(snap.messages_by_downlink_format[4], 1);
        assert_eq!(snap.long_frame_count, 2);
        assert_eq!(snap.short_frame_count, 1);
    }

    #[test]
    fn test_concurrent_increments_are_not_lost() {
        const THREADS: usize = 8;
        const PER_THREAD: usize = 1000;

        let stats = Arc::new(ReceiverStatistics::new());
        let handles: Vec<_> = (0..THREADS)
            .map(|_| {
                let stats = Arc::clone(&stats);
                thread::spawn(move || {
                    for _ in 0..PER_THREAD {
                        stats.record_message(11, false);
                    }
                })
            })
            .collect();
        for handle in handles {
            handle.join().unwrap();
        }

        let snap = stats.snapshot();
        assert_eq!(snap.modes_message_count, (THREADS * PER_THREAD) as u64);
        assert_eq!(
            snap.messages_by_downlink_format[11],
            (THREADS * PER_THREAD) as u64
        );
        assert_eq!(snap.short_frame_count, (THREADS * PER_THREAD) as u64);
    }
}
