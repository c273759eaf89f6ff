//! Bounded temperature history.
//!
//! A fixed-capacity ring buffer in insertion order. Once full, each push
//! overwrites the oldest sample, so eviction is strict FIFO and the buffer
//! never reallocates after reaching capacity.

use crate::data::reading::TemperatureSample;

/// Maximum number of samples retained per device.
pub const HISTORY_CAPACITY: usize = 100;

/// Fixed-capacity ring buffer of [`TemperatureSample`]s.
#[derive(Debug, Clone)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct TemperatureHistory {
    samples: Vec<TemperatureSample>,
    capacity: usize,
    /// Physical index of the oldest sample once the buffer is full.
    head: usize,
}

impl TemperatureHistory {
    /// Create an empty history with the default capacity.
    pub fn new() -> Self {
        Self::with_capacity(HISTORY_CAPACITY)
    }

    /// Create an empty history with an explicit capacity.
    pub fn with_capacity(capacity: usize) -> Self {
        Self {
            samples: Vec::with_capacity(capacity),
            capacity,
            head: 0,
        }
    }

    /// Number of samples currently retained.
    pub fn len(&self) -> usize {
        self.samples.len()
    }

    /// Whether the history holds no samples.
    pub fn is_empty(&self) -> bool {
        self.samples.is_empty()
    }

    /// Append a sample, evicting the oldest when at capacity.
    pub fn push(&mut self, sample: TemperatureSample) {
        if self.samples.len() < self.capacity {
            self.samples.push(sample);
        } else {
            self.samples[self.head] = sample;
            self.head = (self.head + 1) % self.capacity;
        }
    }

    /// Sample at logical index `i`, where 0 is the oldest retained sample.
    pub fn get(&self, i: usize) -> Option<&TemperatureSample> {
        if i >= self.samples.len() {
            return None;
        }
        let physical = if self.samples.len() < self.capacity {
            i
        } else {
            (self.head + i) % self.capacity
        };
        self.samples.get(physical)
    }

    /// The oldest retained sample.
    pub fn first(&self) -> Option<&TemperatureSample> {
        self.get(0)
    }

    /// The most recent sample.
    pub fn last(&self) -> Option<&TemperatureSample> {
        self.len().checked_sub(1).and_then(|i| self.get(i))
    }

    /// Iterate samples from oldest to newest.
    pub fn iter(&self) -> impl Iterator<Item = &TemperatureSample> {
        (0..self.len()).filter_map(move |i| self.get(i))
    }

    /// Copy out the samples from oldest to newest, for snapshots/charting.
    pub fn to_vec(&self) -> Vec<TemperatureSample> {
        self.iter().copied().collect()
    }
}

impl Default for TemperatureHistory {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{TimeZone, Utc};

    fn sample(temp: f64, secs: i64) -> TemperatureSample {
        let ts = Utc.timestamp_opt(1_700_000_000 + secs, 0).unwrap();
        TemperatureSample::new(temp, None, ts)
    }

    #[test]
    fn test_push_below_capacity_keeps_order() {
        let mut history = TemperatureHistory::new();
        for i in 0..10 {
            history.push(sample(i as f64, i));
        }
        assert_eq!(history.len(), 10);
        assert_eq!(history.first().unwrap().temperature_f, 0.0);
        assert_eq!(history.last().unwrap().temperature_f, 9.0);
    }

    #[test]
    fn test_eviction_is_fifo_on_101st_insert() {
        let mut history = TemperatureHistory::new();
        for i in 0..101 {
            history.push(sample(i as f64, i as i64));
        }
        assert_eq!(history.len(), HISTORY_CAPACITY);
        // Sample 0 was evicted; order is preserved.
        assert_eq!(history.first().unwrap().temperature_f, 1.0);
        assert_eq!(history.last().unwrap().temperature_f, 100.0);
        let temps: Vec<f64> = history.iter().map(|s| s.temperature_f).collect();
        for (i, window) in temps.windows(2).enumerate() {
            assert!(window[0] < window[1], "order broken at {}", i);
        }
    }

    #[test]
    fn test_length_never_exceeds_capacity() {
        let mut history = TemperatureHistory::new();
        for i in 0..500 {
            history.push(sample(i as f64, i as i64));
            assert!(history.len() <= HISTORY_CAPACITY);
        }
        assert_eq!(history.first().unwrap().temperature_f, 400.0);
    }

    #[test]
    fn test_get_out_of_range() {
        let mut history = TemperatureHistory::with_capacity(3);
        history.push(sample(1.0, 0));
        assert!(history.get(1).is_none());
        history.push(sample(2.0, 1));
        history.push(sample(3.0, 2));
        history.push(sample(4.0, 3));
        assert_eq!(history.first().unwrap().temperature_f, 2.0);
        assert_eq!(history.get(2).unwrap().temperature_f, 4.0);
    }
}
