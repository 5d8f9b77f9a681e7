//! Core types for the elevator simulation
//!
//! Floors, events and commands shared by the controller and the
//! physical units. None of these know about rendering.

use std::fmt;

use super::error::SimError;

/// A floor index, counted from the ground floor (0) upwards
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Default)]
pub struct Floor(pub usize);

impl Floor {
    pub fn index(self) -> usize {
        self.0
    }

    /// Fails when the floor does not exist in a building of `num_floors`
    pub fn check(self, num_floors: usize) -> Result<Self, SimError> {
        if self.0 < num_floors {
            Ok(self)
        } else {
            Err(SimError::InvalidFloor {
                floor: self.0,
                num_floors,
            })
        }
    }

    /// True when `self` lies strictly between `a` and `b`, in either order
    pub fn is_strictly_between(self, a: Floor, b: Floor) -> bool {
        (a < self && self < b) || (b < self && self < a)
    }
}

impl fmt::Display for Floor {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Direction requested from a floor call button
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CallDirection {
    Up,
    Down,
}

impl CallDirection {
    /// Direction of travel from `from` to `to`; a same-floor press counts as up
    pub fn between(from: Floor, to: Floor) -> Self {
        if to < from {
            CallDirection::Down
        } else {
            CallDirection::Up
        }
    }
}

/// Where an event came from
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum EventSource {
    /// Door finished opening or closing
    DoorSensor,
    /// Call button on a landing
    ExternalCall,
    /// Floor button inside the car
    InternalCall,
    /// Car position notifications
    CarMotion,
}

impl fmt::Display for EventSource {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            EventSource::DoorSensor => "doorSensor",
            EventSource::ExternalCall => "externalCall",
            EventSource::InternalCall => "internalCall",
            EventSource::CarMotion => "carMotion",
        };
        f.write_str(name)
    }
}

/// What happened
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum EventKind {
    Up,
    Down,
    Open,
    Close,
    Stop,
    Approach,
}

impl From<CallDirection> for EventKind {
    fn from(direction: CallDirection) -> Self {
        match direction {
            CallDirection::Up => EventKind::Up,
            CallDirection::Down => EventKind::Down,
        }
    }
}

impl fmt::Display for EventKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            EventKind::Up => "up",
            EventKind::Down => "down",
            EventKind::Open => "open",
            EventKind::Close => "close",
            EventKind::Stop => "stop",
            EventKind::Approach => "approach",
        };
        f.write_str(name)
    }
}

/// A notification travelling over the event bus
///
/// Only the source/kind pairs a real building produces can be built:
/// buttons carry up/down, the door sensor open/close and the car
/// approach/stop.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Event {
    pub source: EventSource,
    pub floor: Floor,
    pub kind: EventKind,
}

impl Event {
    pub fn new(source: EventSource, floor: Floor, kind: EventKind) -> Result<Self, SimError> {
        let valid = match source {
            EventSource::ExternalCall | EventSource::InternalCall => {
                matches!(kind, EventKind::Up | EventKind::Down)
            }
            EventSource::DoorSensor => matches!(kind, EventKind::Open | EventKind::Close),
            EventSource::CarMotion => matches!(kind, EventKind::Stop | EventKind::Approach),
        };
        if valid {
            Ok(Self { source, floor, kind })
        } else {
            Err(SimError::MalformedEvent {
                origin: source,
                kind,
            })
        }
    }

    pub fn external_call(floor: Floor, direction: CallDirection) -> Self {
        Self {
            source: EventSource::ExternalCall,
            floor,
            kind: direction.into(),
        }
    }

    pub fn internal_call(floor: Floor, direction: CallDirection) -> Self {
        Self {
            source: EventSource::InternalCall,
            floor,
            kind: direction.into(),
        }
    }

    pub fn door_opened(floor: Floor) -> Self {
        Self {
            source: EventSource::DoorSensor,
            floor,
            kind: EventKind::Open,
        }
    }

    pub fn door_closed(floor: Floor) -> Self {
        Self {
            source: EventSource::DoorSensor,
            floor,
            kind: EventKind::Close,
        }
    }

    pub fn car_approach(floor: Floor) -> Self {
        Self {
            source: EventSource::CarMotion,
            floor,
            kind: EventKind::Approach,
        }
    }

    pub fn car_stop(floor: Floor) -> Self {
        Self {
            source: EventSource::CarMotion,
            floor,
            kind: EventKind::Stop,
        }
    }

    /// A press of any call button, on a landing or in the car
    pub fn is_call(&self) -> bool {
        matches!(
            self.source,
            EventSource::ExternalCall | EventSource::InternalCall
        )
    }

    pub fn validate(&self, num_floors: usize) -> Result<(), SimError> {
        self.floor.check(num_floors)?;
        Event::new(self.source, self.floor, self.kind).map(|_| ())
    }
}

impl fmt::Display for Event {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{{{} floor={} {}}}", self.source, self.floor, self.kind)
    }
}

/// Actuation requested by the controller from the physical units
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Command {
    TravelTo(Floor),
    OpenDoor(Floor),
    CloseDoor(Floor),
    /// Close the door once `delay` time units have passed
    CloseDoorAfter { floor: Floor, delay: f32 },
}

/// Default number of floors in the building
pub const DEFAULT_FLOORS: usize = 4;

/// Time a door stays open at a stop before it is closed
pub const DEFAULT_DWELL: f32 = 2.0;

/// Distance between two adjacent floors in world units
pub const FLOOR_HEIGHT: f32 = 1.0;

/// Top speed of the car, in world units per time unit
pub const CAR_SPEED: f32 = 1.0;

/// Time a door needs to fully open or close
pub const DOOR_TRANSITION_TIME: f32 = 0.5;

/// Distance to the target under which the car counts as arrived
pub const ARRIVAL_TOLERANCE: f32 = 0.01;

/// Slowest crawl while decelerating, as a fraction of top speed
pub const MIN_SPEED_FRACTION: f32 = 0.1;
