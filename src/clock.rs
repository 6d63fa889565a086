use crate::types::Timestamp;
use std::time::Instant;

/// Source of insertion timestamps for a single book.
///
/// Readings are nanoseconds since the clock was created. Two inserts that land
/// within the same clock tick would otherwise share a timestamp, so every
/// reading is bumped to at least one past the previous one. The time
/// tie-break between orders at the same price is therefore always strict.
#[derive(Debug, Clone)]
pub struct MonotonicClock {
    origin: Instant,
    last: Option<Timestamp>,
}

impl MonotonicClock {
    /// Creates a clock whose origin is now.
    pub fn new() -> Self {
        MonotonicClock {
            origin: Instant::now(),
            last: None,
        }
    }

    /// Returns the next timestamp, strictly greater than any previous one.
    pub fn now(&mut self) -> Timestamp {
        let elapsed = u64::try_from(self.origin.elapsed().as_nanos()).unwrap_or(u64::MAX);
        let next = match self.last {
            Some(last) if elapsed <= last => last.saturating_add(1),
            _ => elapsed,
        };
        self.last = Some(next);
        next
    }
}

impl Default for MonotonicClock {
    fn default() -> Self {
        Self::new()
    }
}
