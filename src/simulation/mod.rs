//! Standalone elevator simulation module
//!
//! This module contains the dispatch controller and the physical units it
//! drives. It runs without any rendering and can be tested via console.

mod bus;
mod config;
mod controller;
mod doors;
mod error;
mod motion;
mod queue;
mod script;
mod stats;
mod timers;
mod types;
mod world;

pub use bus::{EventBus, EventBusConfig, SubscriptionId};
pub use config::SimConfig;
pub use controller::{
    CallRegistration, Dispatch, DispatchController, DispatchState, DoorCycle, EventLogger,
    MoveDecision, Outcome, Stage,
};
pub use doors::{DoorState, DoorUnit};
pub use error::SimError;
pub use motion::MotionUnit;
pub use queue::{CallQueue, Registration};
pub use script::{random_calls, CallButton, ScheduledCall};
pub use stats::SimStats;
pub use timers::DwellTimers;
pub use types::{
    CallDirection, Command, Event, EventKind, EventSource, Floor, ARRIVAL_TOLERANCE, CAR_SPEED,
    DEFAULT_DWELL, DEFAULT_FLOORS, DOOR_TRANSITION_TIME, FLOOR_HEIGHT, MIN_SPEED_FRACTION,
};
pub use world::{ElevatorSim, Phase};
