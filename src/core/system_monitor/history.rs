use std::collections::HashMap;

use chrono::{DateTime, Utc};

use super::metrics::MetricsSnapshot;
use crate::error::{Result, VitalsError};

/// Default number of samples kept per series
pub const DEFAULT_HISTORY_SIZE: usize = 120;

/// Fixed-capacity circular buffer of samples.
///
/// Once full, each `add` overwrites the oldest sample. The backing store is
/// allocated once and never grows.
#[derive(Debug, Clone)]
pub struct RingBuffer<T> {
    data: Box<[T]>,
    index: usize,
    size: usize,
}

impl<T: Copy + Default> RingBuffer<T> {
    /// Create an empty buffer holding at most `capacity` samples.
    pub fn new(capacity: usize) -> Result<Self> {
        if capacity == 0 {
            return Err(VitalsError::InvalidCapacity(capacity));
        }

        Ok(Self {
            data: vec![T::default(); capacity].into_boxed_slice(),
            index: 0,
            size: 0,
        })
    }

    pub fn add(&mut self, value: T) {
        let capacity = self.data.len();
        if self.size < capacity {
            self.data[self.size] = value;
            self.size += 1;
        } else {
            self.data[self.index] = value;
            self.index = (self.index + 1) % capacity;
        }
    }

    /// Copy of the current contents, oldest first.
    pub fn slice(&self) -> Vec<T> {
        if self.size < self.data.len() {
            return self.data[..self.size].to_vec();
        }

        let mut out = Vec::with_capacity(self.size);
        out.extend_from_slice(&self.data[self.index..]);
        out.extend_from_slice(&self.data[..self.index]);
        out
    }

    /// Most recently added sample
    pub fn latest(&self) -> Option<T> {
        if self.size == 0 {
            None
        } else if self.size < self.data.len() {
            Some(self.data[self.size - 1])
        } else {
            let capacity = self.data.len();
            Some(self.data[(self.index + capacity - 1) % capacity])
        }
    }

    pub fn len(&self) -> usize {
        self.size
    }

    pub fn is_empty(&self) -> bool {
        self.size == 0
    }

    pub fn capacity(&self) -> usize {
        self.data.len()
    }
}

/// Rolling history of the series shown as trends
#[derive(Debug, Clone)]
pub struct MetricsHistory {
    pub cpu_usage: RingBuffer<f64>,
    pub memory_usage: RingBuffer<f64>,
    /// Received bytes per second, summed over interfaces
    pub network_rx: RingBuffer<f64>,
    /// Transmitted bytes per second, summed over interfaces
    pub network_tx: RingBuffer<f64>,
    last_network: Option<(DateTime<Utc>, HashMap<String, (u64, u64)>)>,
}

impl MetricsHistory {
    pub fn with_capacity(capacity: usize) -> Result<Self> {
        Ok(Self {
            cpu_usage: RingBuffer::new(capacity)?,
            memory_usage: RingBuffer::new(capacity)?,
            network_rx: RingBuffer::new(capacity)?,
            network_tx: RingBuffer::new(capacity)?,
            last_network: None,
        })
    }

    /// Add the tracked fields of one snapshot.
    ///
    /// Network rates need two snapshots with increasing timestamps and are
    /// summed over the interfaces present in both whose counters did not go
    /// backwards. An interface appearing, disappearing or resetting between
    /// two snapshots does not contribute. When no interface qualifies no
    /// rate sample is added.
    pub fn record(&mut self, snapshot: &MetricsSnapshot) {
        self.cpu_usage.add(snapshot.cpu_percent);
        self.memory_usage.add(snapshot.mem_percent);

        if snapshot.networks.is_empty() {
            self.last_network = None;
            return;
        }

        let counters: HashMap<String, (u64, u64)> = snapshot
            .networks
            .iter()
            .map(|net| (net.interface.clone(), (net.bytes_recv, net.bytes_sent)))
            .collect();

        if let Some((prev_at, prev)) = &self.last_network {
            let elapsed = (snapshot.collected_at - *prev_at).num_milliseconds() as f64 / 1000.0;
            if elapsed > 0.0 {
                if let Some((rx, tx)) = counter_deltas(prev, &counters) {
                    self.network_rx.add(rx as f64 / elapsed);
                    self.network_tx.add(tx as f64 / elapsed);
                }
            }
        }
        self.last_network = Some((snapshot.collected_at, counters));
    }

    /// CPU history scaled by 10 to keep one decimal (0-1000 range) for bar charts
    pub fn cpu_as_u64(&self) -> Vec<u64> {
        scale_percent(&self.cpu_usage)
    }

    /// Memory history scaled by 10 to keep one decimal (0-1000 range) for bar charts
    pub fn memory_as_u64(&self) -> Vec<u64> {
        scale_percent(&self.memory_usage)
    }
}

/// Received and sent byte deltas summed over interfaces present in both
/// maps with non-decreasing counters, `None` when there are none.
fn counter_deltas(
    prev: &HashMap<String, (u64, u64)>,
    current: &HashMap<String, (u64, u64)>,
) -> Option<(u64, u64)> {
    let mut matched = false;
    let mut totals = (0u64, 0u64);

    for (name, &(rx, tx)) in current {
        let Some(&(prev_rx, prev_tx)) = prev.get(name) else {
            continue;
        };
        if rx < prev_rx || tx < prev_tx {
            log::debug!("{} counters went backwards, skipping interface", name);
            continue;
        }
        matched = true;
        totals.0 = totals.0.saturating_add(rx - prev_rx);
        totals.1 = totals.1.saturating_add(tx - prev_tx);
    }

    matched.then_some(totals)
}

fn scale_percent(buffer: &RingBuffer<f64>) -> Vec<u64> {
    buffer
        .slice()
        .into_iter()
        .map(|v| (v.clamp(0.0, 100.0) * 10.0) as u64)
        .collect()
}
