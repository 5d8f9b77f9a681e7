//! Main simulation world that ties everything together
//!
//! One `ElevatorSim` is one building: it owns the event bus, the dispatch
//! controller, the car, the doors and the pending dwell timers. Nothing is
//! shared between instances.

use anyhow::{bail, Context, Result};
use log::{debug, trace};

use super::bus::{EventBus, EventBusConfig, SubscriptionId};
use super::config::SimConfig;
use super::controller::{DispatchController, Outcome};
use super::doors::{DoorState, DoorUnit};
use super::error::SimError;
use super::motion::MotionUnit;
use super::queue::CallQueue;
use super::script::{CallButton, ScheduledCall};
use super::stats::SimStats;
use super::timers::DwellTimers;
use super::types::{CallDirection, Command, Event, Floor};

/// Where the controller stands, derived from queue, doors and motion
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Phase {
    /// Nothing queued, doors shut, car at rest
    Idle,
    /// Stops queued, car not yet moving
    Dispatching,
    /// Car travelling
    EnRoute,
    /// Car at rest with a door cycle in progress
    Docked,
}

/// The main simulation world
pub struct ElevatorSim {
    config: SimConfig,
    bus: EventBus,
    controller: DispatchController,
    motion: MotionUnit,
    doors: DoorUnit,
    timers: DwellTimers,
    stats: SimStats,
    /// Floors in the order their stops were served
    served: Vec<Floor>,

    /// Simulation time
    pub time: f32,
}

impl ElevatorSim {
    pub fn new(config: SimConfig) -> Result<Self, SimError> {
        config.validate()?;
        Ok(Self {
            bus: EventBus::with_config(EventBusConfig {
                enable_history: true,
                ..EventBusConfig::default()
            }),
            controller: DispatchController::new(config.num_floors, config.dwell),
            motion: MotionUnit::new(&config),
            doors: DoorUnit::new(&config),
            timers: DwellTimers::new(),
            stats: SimStats::default(),
            served: Vec::new(),
            time: 0.0,
            config,
        })
    }

    pub fn config(&self) -> &SimConfig {
        &self.config
    }

    /// Fails when the building has no such button. The top landing only
    /// has a down button.
    pub fn check_button(&self, floor: Floor, button: CallButton) -> Result<(), SimError> {
        floor.check(self.config.num_floors)?;
        if button == CallButton::External(CallDirection::Up)
            && floor.index() + 1 == self.config.num_floors
        {
            return Err(SimError::NoCallButton {
                floor,
                direction: CallDirection::Up,
            });
        }
        Ok(())
    }

    /// Press the call button on a landing
    pub fn press_external(&mut self, floor: Floor, direction: CallDirection) -> Result<(), SimError> {
        self.check_button(floor, CallButton::External(direction))?;
        self.publish(Event::external_call(floor, direction))
    }

    /// Press a floor button inside the car
    pub fn press_internal(&mut self, floor: Floor) -> Result<(), SimError> {
        self.check_button(floor, CallButton::Internal)?;
        let direction = CallDirection::between(self.motion.current_floor(), floor);
        self.publish(Event::internal_call(floor, direction))
    }

    pub fn press(&mut self, call: &ScheduledCall) -> Result<(), SimError> {
        match call.button {
            CallButton::External(direction) => self.press_external(call.floor, direction),
            CallButton::Internal => self.press_internal(call.floor),
        }
    }

    /// Put an event on the bus and handle everything it sets off
    pub fn publish(&mut self, event: Event) -> Result<(), SimError> {
        event.validate(self.config.num_floors)?;
        self.bus.publish(event);
        self.pump()
    }

    /// Watch every event the controller receives
    pub fn subscribe<F>(&mut self, observer: F) -> SubscriptionId
    where
        F: FnMut(&Event) + Send + 'static,
    {
        self.bus.subscribe(observer)
    }

    /// Advance time by `delta_secs`
    pub fn tick(&mut self, delta_secs: f32) -> Result<(), SimError> {
        check_delta(delta_secs)?;
        self.time += delta_secs;

        // Dwells that ran out close their doors before the doors move
        for floor in self.timers.due(self.time) {
            self.execute(Command::CloseDoor(floor))?;
        }

        for event in self.doors.update(delta_secs) {
            self.bus.publish(event);
        }
        for event in self.motion.update(delta_secs) {
            self.bus.publish(event);
        }
        self.stats.distance_travelled = self.motion.distance_travelled() / self.config.floor_height;

        self.pump()
    }

    /// Deliver pending events one by one, executing the commands each produces
    fn pump(&mut self) -> Result<(), SimError> {
        while let Some(event) = self.bus.next_event() {
            self.stats.events_delivered += 1;
            let dispatch = self.controller.handle(&event)?;
            for outcome in &dispatch.outcomes {
                if let Outcome::StopServed(floor) = outcome {
                    self.served.push(*floor);
                }
                self.stats.record(outcome);
            }
            for command in dispatch.commands {
                self.execute(command)?;
            }
        }
        Ok(())
    }

    fn execute(&mut self, command: Command) -> Result<(), SimError> {
        trace!("t={:.2} command {:?}", self.time, command);
        match command {
            Command::TravelTo(floor) => {
                if self.motion.travel_to(floor)? {
                    debug!("car heading to floor {}", floor);
                }
            }
            Command::OpenDoor(floor) => self.doors.open(floor)?,
            Command::CloseDoor(floor) => self.doors.close(floor)?,
            Command::CloseDoorAfter { floor, delay } => {
                floor.check(self.config.num_floors)?;
                self.timers.schedule(self.time, delay, floor);
            }
        }
        Ok(())
    }

    pub fn phase(&self) -> Phase {
        if self.motion.is_moving() {
            Phase::EnRoute
        } else if !self.doors.all_closed() || !self.timers.is_empty() {
            Phase::Docked
        } else if !self.controller.queue().is_empty() {
            Phase::Dispatching
        } else {
            Phase::Idle
        }
    }

    /// Nothing left to do until somebody presses a button
    pub fn is_idle(&self) -> bool {
        self.phase() == Phase::Idle && self.bus.is_empty()
    }

    /// Tick until the building settles; returns the time it settled at
    pub fn run_until_idle(&mut self, delta_secs: f32, max_time: f32) -> Result<f32> {
        self.run_script_with(&[], delta_secs, max_time, |_| {})
    }

    /// Press every call at its time, then run until idle
    pub fn run_script(
        &mut self,
        calls: &[ScheduledCall],
        delta_secs: f32,
        max_time: f32,
    ) -> Result<f32> {
        self.run_script_with(calls, delta_secs, max_time, |_| {})
    }

    /// Like `run_script`, handing the world to `on_tick` after every tick
    pub fn run_script_with<F>(
        &mut self,
        calls: &[ScheduledCall],
        delta_secs: f32,
        max_time: f32,
        mut on_tick: F,
    ) -> Result<f32>
    where
        F: FnMut(&ElevatorSim),
    {
        check_delta(delta_secs).context("cannot run the simulation")?;

        let mut calls = calls.to_vec();
        calls.sort_by(|a, b| a.at.total_cmp(&b.at));
        let mut next = 0;

        loop {
            while next < calls.len() && calls[next].at <= self.time {
                self.press(&calls[next])
                    .with_context(|| format!("pressing {:?}", calls[next]))?;
                next += 1;
            }
            if next == calls.len() && self.is_idle() {
                return Ok(self.time);
            }
            if self.time >= max_time {
                bail!(
                    "elevator still busy at t={:.2} (queue {}, phase {:?}, {} calls not pressed)",
                    self.time,
                    self.controller.queue(),
                    self.phase(),
                    calls.len() - next
                );
            }
            self.tick(delta_secs)
                .with_context(|| format!("tick at t={:.2}", self.time))?;
            on_tick(&*self);
        }
    }

    pub fn queue(&self) -> &CallQueue {
        self.controller.queue()
    }

    pub fn last_served(&self) -> Floor {
        self.controller.last_served()
    }

    pub fn controller(&self) -> &DispatchController {
        &self.controller
    }

    pub fn car_floor(&self) -> Floor {
        self.motion.current_floor()
    }

    pub fn car_position(&self) -> f32 {
        self.motion.position()
    }

    pub fn car_is_moving(&self) -> bool {
        self.motion.is_moving()
    }

    pub fn door_state(&self, floor: Floor) -> Option<DoorState> {
        self.doors.state(floor)
    }

    pub fn door_is_closed(&self, floor: Floor) -> bool {
        self.doors.is_closed(floor)
    }

    pub fn served_floors(&self) -> &[Floor] {
        &self.served
    }

    pub fn event_history(&self) -> impl Iterator<Item = &Event> {
        self.bus.history()
    }

    pub fn stats(&self) -> &SimStats {
        &self.stats
    }

    /// Print a summary of the world state
    pub fn print_summary(&self) {
        println!("=== Elevator Simulation Summary ===");
        println!("Time: {:.2}", self.time);
        println!(
            "Car: floor {} at position {:.2}, {}",
            self.motion.current_floor(),
            self.motion.position(),
            match self.motion.target() {
                Some(target) => format!("heading to {}", target),
                None => "at rest".to_string(),
            }
        );
        println!("Phase: {:?}", self.phase());
        println!("Queue: {}", self.controller.queue());
        println!("Last served: {}", self.controller.last_served());
        println!(
            "Stops served: {}, calls received: {}",
            self.stats.stops_served, self.stats.calls_received
        );
    }

    /// Draw the shaft in the terminal, top floor first
    pub fn draw_shaft(&self) {
        println!("\n=== Shaft ===");
        println!("Legend: [#]=Car at rest, [^]/[v]=Car moving, ||=Closed, <>=Opening, []=Open, ><=Closing, *=Queued");
        println!();
        for index in (0..self.config.num_floors).rev() {
            let floor = Floor(index);
            let car = if self.motion.current_floor() == floor {
                match self.motion.target() {
                    Some(target) if target > floor => "[^]",
                    Some(target) if target < floor => "[v]",
                    // Moving toward this floor from either side
                    Some(_) => "[~]",
                    None => "[#]",
                }
            } else {
                "   "
            };
            let door = match self.doors.state(floor) {
                Some(DoorState::Closed) | None => "||",
                Some(DoorState::Opening) => "<>",
                Some(DoorState::Open) => "[]",
                Some(DoorState::Closing) => "><",
            };
            let queued = if self.controller.queue().contains(floor) {
                '*'
            } else {
                ' '
            };
            println!("{:>3} {} {} {}", index, door, car, queued);
        }
        println!();
    }
}

fn check_delta(delta_secs: f32) -> Result<(), SimError> {
    if delta_secs > 0.0 && delta_secs.is_finite() {
        Ok(())
    } else {
        Err(SimError::InvalidDelta(delta_secs))
    }
}

impl std::fmt::Debug for ElevatorSim {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ElevatorSim")
            .field("time", &self.time)
            .field("phase", &self.phase())
            .field("car_floor", &self.motion.current_floor())
            .field("queue", self.controller.queue())
            .field("last_served", &self.controller.last_served())
            .field("pending_events", &self.bus.pending())
            .finish()
    }
}
