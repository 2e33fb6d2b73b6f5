// src/pipeline/result_buffer.rs
//
// Bounded FIFO of detection ticks waiting for API consumption.
// The producer offers one tick per polling interval; whichever API
// consumer polls first takes it. A tick offered to a full buffer is
// dropped, not queued.

use crate::types::DetectionTick;
use std::collections::VecDeque;
use tracing::debug;

pub const DEFAULT_CAPACITY: usize = 10;

pub struct ResultBuffer {
    ticks: VecDeque<DetectionTick>,
    capacity: usize,
}

impl ResultBuffer {
    pub fn new() -> Self {
        Self::with_capacity(DEFAULT_CAPACITY)
    }

    pub fn with_capacity(capacity: usize) -> Self {
        Self {
            ticks: VecDeque::with_capacity(capacity),
            capacity,
        }
    }

    /// Enqueue a tick. Returns false if the buffer was full and the tick
    /// was dropped.
    pub fn offer(&mut self, tick: DetectionTick) -> bool {
        if self.ticks.len() >= self.capacity {
            debug!(
                "Result buffer full ({} pending), dropping tick at {:.3}",
                self.capacity, tick.timestamp
            );
            return false;
        }
        self.ticks.push_back(tick);
        true
    }

    /// Destructive FIFO read: pops the oldest pending tick, or synthesizes
    /// an empty one stamped `now` if nothing is pending.
    pub fn poll(&mut self, now: f64) -> DetectionTick {
        self.ticks
            .pop_front()
            .unwrap_or_else(|| DetectionTick::empty(now))
    }

    pub fn len(&self) -> usize {
        self.ticks.len()
    }

    pub fn is_empty(&self) -> bool {
        self.ticks.is_empty()
    }
}

impl Default for ResultBuffer {
    fn default() -> Self {
        Self::new()
    }
}
