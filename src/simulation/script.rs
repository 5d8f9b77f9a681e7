//! Scripted button presses for headless runs
//!
//! A call is written `<e|i><floor>[:up|:down][@time]`:
//! `e2:down@1.5` presses the down button on floor 2 at time 1.5,
//! `i3` presses button 3 inside the car at time 0. A bare number is an
//! in-car press. Landing calls without a direction press "up".

use std::str::FromStr;

use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

use super::error::SimError;
use super::types::{CallDirection, Floor};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CallButton {
    /// Landing button with its direction
    External(CallDirection),
    /// Floor button inside the car
    Internal,
}

/// A button press at a point in simulated time
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ScheduledCall {
    pub at: f32,
    pub floor: Floor,
    pub button: CallButton,
}

impl ScheduledCall {
    pub fn external(at: f32, floor: usize, direction: CallDirection) -> Self {
        Self {
            at,
            floor: Floor(floor),
            button: CallButton::External(direction),
        }
    }

    pub fn internal(at: f32, floor: usize) -> Self {
        Self {
            at,
            floor: Floor(floor),
            button: CallButton::Internal,
        }
    }
}

impl FromStr for ScheduledCall {
    type Err = SimError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let malformed = || SimError::ScriptParse(s.to_string());
        let text = s.trim().to_ascii_lowercase();

        let (press, at) = match text.split_once('@') {
            Some((press, time)) => {
                let at: f32 = time.trim().parse().map_err(|_| malformed())?;
                if !at.is_finite() || at < 0.0 {
                    return Err(malformed());
                }
                (press.trim().to_string(), at)
            }
            None => (text.clone(), 0.0),
        };

        let (floor_part, direction) = match press.split_once(':') {
            Some((floor_part, "up")) => (floor_part, Some(CallDirection::Up)),
            Some((floor_part, "down")) => (floor_part, Some(CallDirection::Down)),
            Some(_) => return Err(malformed()),
            None => (press.as_str(), None),
        };

        let (external, digits) = if let Some(rest) = floor_part.strip_prefix('e') {
            (true, rest)
        } else if let Some(rest) = floor_part.strip_prefix('i') {
            (false, rest)
        } else {
            (false, floor_part)
        };

        let floor: usize = digits.parse().map_err(|_| malformed())?;
        let button = match (external, direction) {
            (true, direction) => CallButton::External(direction.unwrap_or(CallDirection::Up)),
            (false, None) => CallButton::Internal,
            // Car buttons have no direction
            (false, Some(_)) => return Err(malformed()),
        };

        Ok(Self {
            at,
            floor: Floor(floor),
            button,
        })
    }
}

/// `count` presses spread over `[0, horizon)`, sorted by time.
///
/// With a seed the same calls come out on every run.
pub fn random_calls(
    count: usize,
    num_floors: usize,
    horizon: f32,
    seed: Option<u64>,
) -> Vec<ScheduledCall> {
    let mut rng = match seed {
        Some(seed) => StdRng::seed_from_u64(seed),
        None => StdRng::from_rng(&mut rand::rng()),
    };
    let top = num_floors.saturating_sub(1);

    let mut calls: Vec<ScheduledCall> = (0..count)
        .map(|_| {
            let at = if horizon > 0.0 {
                rng.random_range(0.0..horizon)
            } else {
                0.0
            };
            let floor = rng.random_range(0..num_floors.max(1));
            if rng.random_bool(0.5) {
                ScheduledCall::internal(at, floor)
            } else {
                let direction = if floor == top {
                    CallDirection::Down
                } else if floor == 0 || rng.random_bool(0.5) {
                    CallDirection::Up
                } else {
                    CallDirection::Down
                };
                ScheduledCall::external(at, floor, direction)
            }
        })
        .collect();
    calls.sort_by(|a, b| a.at.total_cmp(&b.at));
    calls
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_external_call_with_direction_and_time() {
        let call: ScheduledCall = "e2:down@1.5".parse().unwrap();
        assert_eq!(call, ScheduledCall::external(1.5, 2, CallDirection::Down));
    }

    #[test]
    fn parses_internal_and_bare_calls() {
        assert_eq!("i3".parse::<ScheduledCall>().unwrap(), ScheduledCall::internal(0.0, 3));
        assert_eq!("1@4".parse::<ScheduledCall>().unwrap(), ScheduledCall::internal(4.0, 1));
        assert_eq!(
            "E0".parse::<ScheduledCall>().unwrap(),
            ScheduledCall::external(0.0, 0, CallDirection::Up)
        );
    }

    #[test]
    fn rejects_garbage() {
        for text in ["", "x2", "e2:sideways", "i2:up", "e2@soon", "e2@-1", "e-1"] {
            assert!(
                matches!(text.parse::<ScheduledCall>(), Err(SimError::ScriptParse(_))),
                "accepted {text:?}"
            );
        }
    }

    #[test]
    fn seeded_random_calls_are_reproducible_and_in_range() {
        let first = random_calls(20, 5, 30.0, Some(7));
        let second = random_calls(20, 5, 30.0, Some(7));
        assert_eq!(first, second);
        assert!(first.windows(2).all(|pair| pair[0].at <= pair[1].at));
        assert!(first.iter().all(|call| call.floor.index() < 5 && call.at < 30.0));
    }
}
