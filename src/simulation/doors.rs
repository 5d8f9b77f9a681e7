//! Landing doors, one per floor
//!
//! Doors move between closed and open over a fixed transition time and
//! report when a transition has physically finished.

use super::config::SimConfig;
use super::error::SimError;
use super::types::{Event, Floor};

/// Door state machine
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DoorState {
    Closed,
    Opening,
    Open,
    Closing,
}

#[derive(Debug, Clone)]
struct SimDoor {
    state: DoorState,
    /// 0.0 = closed, 1.0 = open
    opening: f32,
}

impl SimDoor {
    fn closed() -> Self {
        Self {
            state: DoorState::Closed,
            opening: 0.0,
        }
    }
}

/// Every door in the building
#[derive(Debug, Clone)]
pub struct DoorUnit {
    doors: Vec<SimDoor>,
    transition_time: f32,
}

impl DoorUnit {
    pub fn new(config: &SimConfig) -> Self {
        Self {
            doors: vec![SimDoor::closed(); config.num_floors],
            transition_time: config.door_transition,
        }
    }

    fn door_mut(&mut self, floor: Floor) -> Result<&mut SimDoor, SimError> {
        let num_floors = self.doors.len();
        self.doors.get_mut(floor.index()).ok_or(SimError::InvalidFloor {
            floor: floor.index(),
            num_floors,
        })
    }

    /// Start opening the door at `floor`
    pub fn open(&mut self, floor: Floor) -> Result<(), SimError> {
        let door = self.door_mut(floor)?;
        match door.state {
            DoorState::Closed | DoorState::Closing => door.state = DoorState::Opening,
            DoorState::Open | DoorState::Opening => {}
        }
        Ok(())
    }

    /// Start closing the door at `floor`
    pub fn close(&mut self, floor: Floor) -> Result<(), SimError> {
        let door = self.door_mut(floor)?;
        match door.state {
            DoorState::Open | DoorState::Opening => door.state = DoorState::Closing,
            DoorState::Closed | DoorState::Closing => {}
        }
        Ok(())
    }

    pub fn state(&self, floor: Floor) -> Option<DoorState> {
        self.doors.get(floor.index()).map(|door| door.state)
    }

    /// Fully closed; a door still moving counts as open
    pub fn is_closed(&self, floor: Floor) -> bool {
        self.state(floor) == Some(DoorState::Closed)
    }

    pub fn all_closed(&self) -> bool {
        self.doors.iter().all(|door| door.state == DoorState::Closed)
    }

    /// Move doors along and return the transitions that finished
    pub fn update(&mut self, delta_secs: f32) -> Vec<Event> {
        let rate = delta_secs / self.transition_time;
        let mut events = Vec::new();

        for (index, door) in self.doors.iter_mut().enumerate() {
            match door.state {
                DoorState::Opening => {
                    door.opening = (door.opening + rate).min(1.0);
                    if door.opening >= 1.0 {
                        door.state = DoorState::Open;
                        events.push(Event::door_opened(Floor(index)));
                    }
                }
                DoorState::Closing => {
                    door.opening = (door.opening - rate).max(0.0);
                    if door.opening <= 0.0 {
                        door.state = DoorState::Closed;
                        events.push(Event::door_closed(Floor(index)));
                    }
                }
                DoorState::Open | DoorState::Closed => {}
            }
        }
        events
    }
}
