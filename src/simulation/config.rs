//! Simulation configuration

use super::error::SimError;
use super::types::{
    ARRIVAL_TOLERANCE, CAR_SPEED, DEFAULT_DWELL, DEFAULT_FLOORS, DOOR_TRANSITION_TIME,
    FLOOR_HEIGHT,
};

/// Parameters of one simulated building
#[derive(Debug, Clone, PartialEq)]
pub struct SimConfig {
    /// Number of floors served, at least one
    pub num_floors: usize,
    /// Time a door stays open at a stop
    pub dwell: f32,
    /// Distance between adjacent floors
    pub floor_height: f32,
    /// Top speed of the car
    pub car_speed: f32,
    /// Time a door needs to open or close
    pub door_transition: f32,
    /// Distance at which the car counts as arrived
    pub arrival_tolerance: f32,
}

impl Default for SimConfig {
    fn default() -> Self {
        Self {
            num_floors: DEFAULT_FLOORS,
            dwell: DEFAULT_DWELL,
            floor_height: FLOOR_HEIGHT,
            car_speed: CAR_SPEED,
            door_transition: DOOR_TRANSITION_TIME,
            arrival_tolerance: ARRIVAL_TOLERANCE,
        }
    }
}

impl SimConfig {
    pub fn with_floors(num_floors: usize) -> Self {
        Self {
            num_floors,
            ..Self::default()
        }
    }

    pub fn validate(&self) -> Result<(), SimError> {
        if self.num_floors == 0 {
            return Err(SimError::InvalidConfig(
                "a building needs at least one floor".to_string(),
            ));
        }
        if !(self.dwell >= 0.0) {
            return Err(SimError::InvalidConfig(format!(
                "dwell must be non-negative, got {}",
                self.dwell
            )));
        }
        for (name, value) in [
            ("floor height", self.floor_height),
            ("car speed", self.car_speed),
            ("door transition", self.door_transition),
            ("arrival tolerance", self.arrival_tolerance),
        ] {
            if !(value > 0.0) || !value.is_finite() {
                return Err(SimError::InvalidConfig(format!(
                    "{name} must be positive, got {value}"
                )));
            }
        }
        if self.arrival_tolerance >= self.floor_height / 2.0 {
            return Err(SimError::InvalidConfig(format!(
                "arrival tolerance {} must be below half a floor height",
                self.arrival_tolerance
            )));
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_config_is_valid() {
        assert!(SimConfig::default().validate().is_ok());
    }

    #[test]
    fn rejects_empty_building() {
        assert!(SimConfig::with_floors(0).validate().is_err());
    }

    #[test]
    fn rejects_tolerance_larger_than_half_a_floor() {
        let config = SimConfig {
            arrival_tolerance: 0.6,
            ..SimConfig::default()
        };
        assert!(config.validate().is_err());
    }

    #[test]
    fn rejects_nan_dwell() {
        let config = SimConfig {
            dwell: f32::NAN,
            ..SimConfig::default()
        };
        assert!(config.validate().is_err());
    }
}
