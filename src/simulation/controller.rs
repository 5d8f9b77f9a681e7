//! Dispatch controller
//!
//! Purely reactive: every inbound event runs through a fixed pipeline of
//! stages, in order, and the stages answer with commands for the motion
//! and door units. The controller keeps no clock. The dwell before a door
//! closes is handed out as a deferred command.
//!
//! Stage order matters. Call registration must run before the move
//! decision so that a fresh call is already queued when the car is sent
//! off, and the door cycle runs last so a stop never triggers a move in
//! the same pass.

use std::collections::BTreeSet;

use log::{debug, info, warn};

use super::error::SimError;
use super::queue::{CallQueue, Registration};
use super::types::{
    Command, Event, EventKind, EventSource, Floor, DEFAULT_DWELL, DEFAULT_FLOORS,
};

/// Something worth counting that happened while handling an event
#[derive(Debug, Clone, PartialEq)]
pub enum Outcome {
    Registered {
        floor: Floor,
        registration: Registration,
    },
    StopServed(Floor),
    /// A protocol violation the controller recovered from
    Recovered(SimError),
}

/// Everything the controller wants done after one event
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Dispatch {
    pub commands: Vec<Command>,
    pub outcomes: Vec<Outcome>,
}

/// State shared by the stages
#[derive(Debug, Clone)]
pub struct DispatchState {
    pub queue: CallQueue,
    /// Floor of the most recently completed stop
    pub last_served: Floor,
    /// Floor the car last reported through approach/stop notifications
    pub car_floor: Floor,
    /// Doors commanded open and not yet reported closed
    open_doors: BTreeSet<Floor>,
    pub dwell: f32,
}

impl DispatchState {
    fn new(dwell: f32) -> Self {
        Self {
            queue: CallQueue::new(),
            last_served: Floor(0),
            car_floor: Floor(0),
            open_doors: BTreeSet::new(),
            dwell,
        }
    }

    /// Track car and door notifications before any stage runs
    fn observe(&mut self, event: &Event) {
        match (event.source, event.kind) {
            (EventSource::CarMotion, EventKind::Approach | EventKind::Stop) => {
                self.car_floor = event.floor;
            }
            (EventSource::DoorSensor, EventKind::Open) => {
                self.open_doors.insert(event.floor);
            }
            (EventSource::DoorSensor, EventKind::Close) => {
                self.open_doors.remove(&event.floor);
            }
            _ => {}
        }
    }

    /// No door has been opened without being reported closed since
    pub fn doors_closed(&self) -> bool {
        self.open_doors.is_empty()
    }

    /// Open, hold for the dwell, close
    fn cycle_door(&mut self, floor: Floor, commands: &mut Vec<Command>) {
        self.open_doors.insert(floor);
        commands.push(Command::OpenDoor(floor));
        commands.push(Command::CloseDoorAfter {
            floor,
            delay: self.dwell,
        });
    }
}

/// One step of the pipeline. Every event is offered to every stage;
/// each stage decides from the event's shape whether to act.
pub trait Stage: Send {
    fn name(&self) -> &'static str;

    fn accepts(&self, event: &Event) -> bool;

    fn apply(&mut self, state: &mut DispatchState, event: &Event, dispatch: &mut Dispatch);
}

/// Traces every event together with the queue it met
#[derive(Debug, Default)]
pub struct EventLogger;

impl Stage for EventLogger {
    fn name(&self) -> &'static str {
        "logger"
    }

    fn accepts(&self, _event: &Event) -> bool {
        true
    }

    fn apply(&mut self, state: &mut DispatchState, event: &Event, _dispatch: &mut Dispatch) {
        debug!(
            "event {} | queue {} | last served {}",
            event, state.queue, state.last_served
        );
    }
}

/// Turns button presses into queued stops
#[derive(Debug, Default)]
pub struct CallRegistration;

impl Stage for CallRegistration {
    fn name(&self) -> &'static str {
        "call-registration"
    }

    fn accepts(&self, event: &Event) -> bool {
        event.is_call()
    }

    fn apply(&mut self, state: &mut DispatchState, event: &Event, dispatch: &mut Dispatch) {
        let floor = event.floor;
        let registration = state
            .queue
            .register(floor, state.last_served, state.car_floor);
        if registration == Registration::ServedInPlace {
            state.cycle_door(floor, &mut dispatch.commands);
        }
        debug!(
            "call for floor {} -> {:?}, queue {}",
            floor, registration, state.queue
        );
        dispatch.outcomes.push(Outcome::Registered {
            floor,
            registration,
        });
    }
}

/// Sends the car to the queue head while every door is shut
#[derive(Debug, Default)]
pub struct MoveDecision;

impl Stage for MoveDecision {
    fn name(&self) -> &'static str {
        "move-decision"
    }

    fn accepts(&self, event: &Event) -> bool {
        event.is_call() || (event.source == EventSource::DoorSensor && event.kind == EventKind::Close)
    }

    fn apply(&mut self, state: &mut DispatchState, _event: &Event, dispatch: &mut Dispatch) {
        if !state.doors_closed() {
            return;
        }
        if let Some(head) = state.queue.head() {
            dispatch.commands.push(Command::TravelTo(head));
        }
    }
}

/// Serves a stop: dequeue, remember the floor, cycle the door
#[derive(Debug, Default)]
pub struct DoorCycle;

impl Stage for DoorCycle {
    fn name(&self) -> &'static str {
        "door-cycle"
    }

    fn accepts(&self, event: &Event) -> bool {
        event.source == EventSource::CarMotion && event.kind == EventKind::Stop
    }

    fn apply(&mut self, state: &mut DispatchState, event: &Event, dispatch: &mut Dispatch) {
        let floor = event.floor;
        match state.queue.head() {
            Some(head) if head == floor => {
                state.queue.pop_head();
            }
            expected => {
                let violation = SimError::QueueMismatch {
                    expected,
                    reported: floor,
                };
                warn!("{violation}; resynchronizing to floor {floor}");
                state.queue.remove(floor);
                dispatch.outcomes.push(Outcome::Recovered(violation));
            }
        }
        state.last_served = floor;
        state.cycle_door(floor, &mut dispatch.commands);
        info!("served floor {}, queue {}", floor, state.queue);
        dispatch.outcomes.push(Outcome::StopServed(floor));
    }
}

/// The dispatch controller: state plus its ordered stages
pub struct DispatchController {
    num_floors: usize,
    state: DispatchState,
    stages: Vec<Box<dyn Stage>>,
}

impl DispatchController {
    /// Controller for a car resting at the ground floor, with the standard pipeline
    pub fn new(num_floors: usize, dwell: f32) -> Self {
        Self::with_stages(num_floors, dwell, Self::standard_stages())
    }

    pub fn with_stages(num_floors: usize, dwell: f32, stages: Vec<Box<dyn Stage>>) -> Self {
        Self {
            num_floors,
            state: DispatchState::new(dwell),
            stages,
        }
    }

    /// logger -> call-registration -> move-decision -> door-cycle
    pub fn standard_stages() -> Vec<Box<dyn Stage>> {
        vec![
            Box::new(EventLogger),
            Box::new(CallRegistration),
            Box::new(MoveDecision),
            Box::new(DoorCycle),
        ]
    }

    pub fn stage_names(&self) -> Vec<&'static str> {
        self.stages.iter().map(|stage| stage.name()).collect()
    }

    /// Run one event through every stage and collect what they asked for.
    ///
    /// Events naming a floor outside the building are rejected before
    /// any state changes.
    pub fn handle(&mut self, event: &Event) -> Result<Dispatch, SimError> {
        event.validate(self.num_floors)?;
        self.state.observe(event);

        let mut dispatch = Dispatch::default();
        for stage in self.stages.iter_mut() {
            if stage.accepts(event) {
                stage.apply(&mut self.state, event, &mut dispatch);
            }
        }
        Ok(dispatch)
    }

    pub fn state(&self) -> &DispatchState {
        &self.state
    }

    pub fn queue(&self) -> &CallQueue {
        &self.state.queue
    }

    pub fn last_served(&self) -> Floor {
        self.state.last_served
    }
}

impl Default for DispatchController {
    fn default() -> Self {
        Self::new(DEFAULT_FLOORS, DEFAULT_DWELL)
    }
}

impl std::fmt::Debug for DispatchController {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("DispatchController")
            .field("num_floors", &self.num_floors)
            .field("state", &self.state)
            .field("stages", &self.stage_names())
            .finish()
    }
}
