//! Deferred door closes
//!
//! A stop schedules the close of its door once the dwell has passed.
//! Timers fire in due order; ties fire in the order they were scheduled.

use std::collections::BTreeMap;

use ordered_float::OrderedFloat;

use super::types::Floor;

#[derive(Debug, Clone, Default)]
pub struct DwellTimers {
    pending: BTreeMap<(OrderedFloat<f32>, u64), Floor>,
    next_seq: u64,
}

impl DwellTimers {
    pub fn new() -> Self {
        Self::default()
    }

    /// Close the door at `floor` once `delay` has passed after `now`
    pub fn schedule(&mut self, now: f32, delay: f32, floor: Floor) {
        let key = (OrderedFloat(now + delay.max(0.0)), self.next_seq);
        self.next_seq += 1;
        self.pending.insert(key, floor);
    }

    /// Remove and return every timer due at `now`
    pub fn due(&mut self, now: f32) -> Vec<Floor> {
        let mut fired = Vec::new();
        while let Some(entry) = self.pending.first_entry() {
            if entry.key().0 > OrderedFloat(now) {
                break;
            }
            fired.push(entry.remove());
        }
        fired
    }

    pub fn is_empty(&self) -> bool {
        self.pending.is_empty()
    }

    pub fn next_due(&self) -> Option<f32> {
        self.pending.keys().next().map(|(due, _)| due.into_inner())
    }
}
