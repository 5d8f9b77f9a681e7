//! Pending stops of the car, nearest intended stop first

use std::collections::VecDeque;

use super::types::Floor;

/// What registering a call did to the queue
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Registration {
    /// Call at the resting floor with nothing queued; the door is cycled instead
    ServedInPlace,
    /// Same floor as the last queued stop
    DuplicateTail,
    /// On the way to the current head, now served first
    InsertedFront,
    /// Queued behind every existing stop
    Appended,
    /// Already queued further down the line
    AlreadyQueued,
}

impl Registration {
    /// True when the queue gained an entry
    pub fn enqueued(self) -> bool {
        matches!(self, Registration::InsertedFront | Registration::Appended)
    }
}

/// Ordered floors the car still has to stop at. Never holds a floor twice.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CallQueue {
    stops: VecDeque<Floor>,
}

impl CallQueue {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn head(&self) -> Option<Floor> {
        self.stops.front().copied()
    }

    pub fn tail(&self) -> Option<Floor> {
        self.stops.back().copied()
    }

    pub fn len(&self) -> usize {
        self.stops.len()
    }

    pub fn is_empty(&self) -> bool {
        self.stops.is_empty()
    }

    pub fn contains(&self, floor: Floor) -> bool {
        self.stops.contains(&floor)
    }

    pub fn iter(&self) -> impl Iterator<Item = Floor> + '_ {
        self.stops.iter().copied()
    }

    pub fn to_vec(&self) -> Vec<Floor> {
        self.iter().collect()
    }

    pub fn pop_head(&mut self) -> Option<Floor> {
        self.stops.pop_front()
    }

    /// Drops `floor` wherever it sits. Returns whether it was queued.
    pub fn remove(&mut self, floor: Floor) -> bool {
        match self.stops.iter().position(|f| *f == floor) {
            Some(index) => {
                self.stops.remove(index);
                true
            }
            None => false,
        }
    }

    /// Apply the call registration rules for a call at `floor`.
    ///
    /// `last_served` is where the car last completed a stop and `car_floor`
    /// the floor it most recently reported. A call lying strictly between
    /// `last_served` and the head jumps the queue, unless the car is at that
    /// floor right now. Whether the car already went past it is not known
    /// here, so a floor passed mid-travel still jumps ahead and the car turns
    /// back for it.
    pub fn register(&mut self, floor: Floor, last_served: Floor, car_floor: Floor) -> Registration {
        if floor == last_served && self.is_empty() {
            return Registration::ServedInPlace;
        }
        if self.tail() == Some(floor) {
            return Registration::DuplicateTail;
        }
        if self.contains(floor) {
            return Registration::AlreadyQueued;
        }
        if let Some(head) = self.head() {
            if floor.is_strictly_between(last_served, head) && floor != car_floor {
                self.stops.push_front(floor);
                return Registration::InsertedFront;
            }
        }
        self.stops.push_back(floor);
        Registration::Appended
    }
}

impl std::fmt::Display for CallQueue {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let floors: Vec<String> = self.stops.iter().map(|floor| floor.to_string()).collect();
        write!(f, "[{}]", floors.join(", "))
    }
}
