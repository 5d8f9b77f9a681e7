//! Car movement along the shaft
//!
//! The car drives toward one target at a time. Each `update` advances the
//! position, reports every floor it enters and reports a single stop once
//! the target is reached. Multi-stop ordering lives in the controller.

use super::config::SimConfig;
use super::error::SimError;
use super::types::{Event, Floor, MIN_SPEED_FRACTION};

/// The elevator car and its motor
#[derive(Debug, Clone)]
pub struct MotionUnit {
    num_floors: usize,
    floor_height: f32,
    speed: f32,
    tolerance: f32,
    /// Height of the car floor above the ground floor
    position: f32,
    /// Floor the car is in front of, or settled at
    current_floor: Floor,
    /// Where the car is heading; `None` while settled
    target: Option<Floor>,
    distance_travelled: f32,
}

impl MotionUnit {
    /// A car resting at the ground floor
    pub fn new(config: &SimConfig) -> Self {
        Self {
            num_floors: config.num_floors,
            floor_height: config.floor_height,
            speed: config.car_speed,
            tolerance: config.arrival_tolerance,
            position: 0.0,
            current_floor: Floor(0),
            target: None,
            distance_travelled: 0.0,
        }
    }

    pub fn position(&self) -> f32 {
        self.position
    }

    pub fn current_floor(&self) -> Floor {
        self.current_floor
    }

    pub fn target(&self) -> Option<Floor> {
        self.target
    }

    pub fn is_moving(&self) -> bool {
        self.target.is_some()
    }

    pub fn distance_travelled(&self) -> f32 {
        self.distance_travelled
    }

    /// Send the car to `floor`, replacing any target it is driving to.
    ///
    /// Returns `false` when nothing changes: the car already rests at
    /// `floor`, or is already heading there.
    pub fn travel_to(&mut self, floor: Floor) -> Result<bool, SimError> {
        floor.check(self.num_floors)?;
        match self.target {
            Some(target) if target == floor => Ok(false),
            None if floor == self.current_floor => Ok(false),
            _ => {
                self.target = Some(floor);
                Ok(true)
            }
        }
    }

    /// Advance the car by `delta_secs` and return the notifications it produced
    pub fn update(&mut self, delta_secs: f32) -> Vec<Event> {
        let mut events = Vec::new();
        let Some(target) = self.target else {
            return events;
        };

        let goal = target.index() as f32 * self.floor_height;
        let remaining = (goal - self.position).abs();

        // Full speed until the last floor height, then slow down with the distance left
        let fraction = (remaining / self.floor_height).clamp(MIN_SPEED_FRACTION, 1.0);
        let step = self.speed * fraction * delta_secs;

        let arrived = step >= remaining - self.tolerance;
        let travelled = if arrived { remaining } else { step };
        self.distance_travelled += travelled;
        self.position = if arrived {
            goal
        } else {
            self.position + travelled * (goal - self.position).signum()
        };

        self.report_entered_floors(&mut events);

        if arrived {
            self.current_floor = target;
            self.target = None;
            events.push(Event::car_stop(target));
        }
        events
    }

    /// Emit an approach for every floor entered since the last report
    fn report_entered_floors(&mut self, events: &mut Vec<Event>) {
        let entered = self.floor_at(self.position);
        while self.current_floor != entered {
            self.current_floor = if entered > self.current_floor {
                Floor(self.current_floor.index() + 1)
            } else {
                Floor(self.current_floor.index() - 1)
            };
            events.push(Event::car_approach(self.current_floor));
        }
    }

    fn floor_at(&self, position: f32) -> Floor {
        let nearest = (position / self.floor_height).round().max(0.0) as usize;
        Floor(nearest.min(self.num_floors - 1))
    }
}
