//! Timestamp-derived identifiers that never repeat within a process.
//!
//! Each id is `max(now_millis, last + 1)`: ids track wall-clock milliseconds while
//! calls are sparse and fall back to a counter when several land in the same
//! millisecond. Ids from separate processes can still collide; the artifact store
//! guards file creation separately.

use std::sync::atomic::{AtomicI64, Ordering};

#[derive(Debug, Default)]
pub struct MonotonicIds {
    last: AtomicI64,
}

impl MonotonicIds {
    pub fn new() -> Self {
        Self::default()
    }

    /// Generator whose first id is at least `floor + 1`.
    pub fn starting_after(floor: i64) -> Self {
        Self {
            last: AtomicI64::new(floor),
        }
    }

    pub fn next(&self) -> i64 {
        let now = chrono::Utc::now().timestamp_millis();
        let mut prev = self.last.load(Ordering::Relaxed);
        loop {
            let candidate = now.max(prev + 1);
            match self
                .last
                .compare_exchange_weak(prev, candidate, Ordering::AcqRel, Ordering::Relaxed)
            {
                Ok(_) => return candidate,
                Err(actual) => prev = actual,
            }
        }
    }

    /// Most recently issued id (0 if none).
    pub fn last(&self) -> i64 {
        self.last.load(Ordering::Acquire)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashSet;
    use std::sync::Arc;

    #[test]
    fn test_ids_strictly_increase() {
        let ids = MonotonicIds::new();
        let mut prev = ids.next();
        for _ in 0..1_000 {
            let next = ids.next();
            assert!(next > prev);
            prev = next;
        }
    }

    #[test]
    fn test_ids_follow_wall_clock() {
        let before = chrono::Utc::now().timestamp_millis();
        let id = MonotonicIds::new().next();
        assert!(id >= before);
    }

    #[test]
    fn test_starting_after_is_deterministic_past_the_clock() {
        let floor = i64::MAX / 2;
        let ids = MonotonicIds::starting_after(floor);
        assert_eq!(ids.next(), floor + 1);
        assert_eq!(ids.next(), floor + 2);
        assert_eq!(ids.last(), floor + 2);
    }

    #[test]
    fn test_concurrent_ids_are_unique() {
        let ids = Arc::new(MonotonicIds::new());
        let handles: Vec<_> = (0..8)
            .map(|_| {
                let ids = Arc::clone(&ids);
                std::thread::spawn(move || (0..500).map(|_| ids.next()).collect::<Vec<_>>())
            })
            .collect();

        let mut seen = HashSet::new();
        for h in handles {
            for id in h.join().unwrap() {
                assert!(seen.insert(id), "duplicate id {id}");
            }
        }
        assert_eq!(seen.len(), 8 * 500);
    }
}
