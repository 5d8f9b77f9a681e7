//! Run statistics
//!
//! Counters fed by controller outcomes, reported at the end of a run.

use log::info;

use super::controller::Outcome;
use super::queue::Registration;

#[derive(Debug, Clone, Default, PartialEq)]
pub struct SimStats {
    pub events_delivered: u64,
    pub calls_received: usize,
    pub calls_enqueued: usize,
    /// Calls dropped because the floor was already queued
    pub duplicates_absorbed: usize,
    /// Calls at the resting floor answered with a door cycle
    pub served_in_place: usize,
    pub stops_served: usize,
    pub protocol_violations: usize,
    pub distance_travelled: f32,
}

impl SimStats {
    pub fn record(&mut self, outcome: &Outcome) {
        match outcome {
            Outcome::Registered { registration, .. } => {
                self.calls_received += 1;
                match registration {
                    Registration::ServedInPlace => self.served_in_place += 1,
                    Registration::DuplicateTail | Registration::AlreadyQueued => {
                        self.duplicates_absorbed += 1
                    }
                    Registration::InsertedFront | Registration::Appended => {
                        self.calls_enqueued += 1
                    }
                }
            }
            Outcome::StopServed(_) => self.stops_served += 1,
            Outcome::Recovered(_) => self.protocol_violations += 1,
        }
    }

    pub fn log_summary(&self, elapsed: f32) {
        info!("=== SIMULATION COMPLETE ===");
        info!("Elapsed time: {:.2}", elapsed);
        info!("Events delivered: {}", self.events_delivered);
        info!("Calls received: {}", self.calls_received);
        info!("Calls enqueued: {}", self.calls_enqueued);
        info!("Duplicates absorbed: {}", self.duplicates_absorbed);
        info!("Served in place: {}", self.served_in_place);
        info!("Stops served: {}", self.stops_served);
        info!("Protocol violations: {}", self.protocol_violations);
        info!("Distance travelled: {:.2} floors", self.distance_travelled);
    }
}
