//! Bounded reading history
//!
//! Ordered oldest first. Once the cap is reached each push evicts exactly
//! one entry from the front.

use std::collections::VecDeque;

use crate::reading::Reading;

/// FIFO-evicting sequence of recent readings
#[derive(Debug, Clone)]
pub struct History {
    entries: VecDeque<Reading>,
    capacity: usize,
}

impl History {
    pub fn new(capacity: usize) -> Self {
        Self {
            entries: VecDeque::with_capacity(capacity),
            capacity,
        }
    }

    /// Append a reading, returning the evicted one if the cap was reached
    pub fn push(&mut self, reading: Reading) -> Option<Reading> {
        if self.capacity == 0 {
            return Some(reading);
        }

        let evicted = if self.entries.len() == self.capacity {
            self.entries.pop_front()
        } else {
            None
        };
        self.entries.push_back(reading);
        evicted
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn capacity(&self) -> usize {
        self.capacity
    }

    pub fn latest(&self) -> Option<&Reading> {
        self.entries.back()
    }

    pub fn iter(&self) -> impl Iterator<Item = &Reading> {
        self.entries.iter()
    }

    /// Owned copy, oldest first
    pub fn to_vec(&self) -> Vec<Reading> {
        self.entries.iter().copied().collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_push_below_capacity() {
        let mut history = History::new(3);
        assert!(history.push(Reading::new(1.0)).is_none());
        assert!(history.push(Reading::new(2.0)).is_none());
        assert_eq!(history.len(), 2);
        assert_eq!(history.latest().map(|r| r.value()), Some(2.0));
    }

    #[test]
    fn test_push_evicts_oldest() {
        let mut history = History::new(2);
        history.push(Reading::new(1.0));
        history.push(Reading::new(2.0));

        let evicted = history.push(Reading::new(3.0));
        assert_eq!(evicted.map(|r| r.value()), Some(1.0));

        let values: Vec<f64> = history.iter().map(|r| r.value()).collect();
        assert_eq!(values, vec![2.0, 3.0]);
    }

    #[test]
    fn test_zero_capacity_keeps_nothing() {
        let mut history = History::new(0);
        let evicted = history.push(Reading::new(1.0));
        assert_eq!(evicted.map(|r| r.value()), Some(1.0));
        assert!(history.is_empty());
    }
}
