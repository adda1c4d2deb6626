use std::collections::{HashMap, VecDeque};

use crate::model::tick::Tick;

/// Per-instrument tick history, oldest first, capped at `capacity` entries each.
#[derive(Debug, Clone)]
pub struct TickBuffer {
    capacity: usize,
    series: HashMap<u32, VecDeque<Tick>>,
    received: u64,
}

impl TickBuffer {
    pub fn new(capacity: usize) -> Self {
        assert!(capacity > 0, "tick buffer capacity must be > 0");
        Self {
            capacity,
            series: HashMap::new(),
            received: 0,
        }
    }

    pub fn push(&mut self, tick: Tick) {
        self.received += 1;
        let series = self
            .series
            .entry(tick.instrument_token)
            .or_insert_with(|| VecDeque::with_capacity(self.capacity.min(1024)));
        series.push_back(tick);
        while series.len() > self.capacity {
            series.pop_front();
        }
    }

    pub fn extend<I: IntoIterator<Item = Tick>>(&mut self, ticks: I) {
        for tick in ticks {
            self.push(tick);
        }
    }

    pub fn series(&self, instrument_token: u32) -> Option<&VecDeque<Tick>> {
        self.series.get(&instrument_token)
    }

    pub fn last(&self, instrument_token: u32) -> Option<&Tick> {
        self.series.get(&instrument_token).and_then(|s| s.back())
    }

    /// Ticks received since the last clear, including evicted ones.
    pub fn received(&self) -> u64 {
        self.received
    }

    pub fn is_empty(&self) -> bool {
        self.series.values().all(|s| s.is_empty())
    }

    pub fn clear(&mut self) {
        self.series.clear();
        self.received = 0;
    }

    pub fn capacity(&self) -> usize {
        self.capacity
    }
}
