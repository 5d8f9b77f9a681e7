//! Error types for the elevator simulation

use super::types::{CallDirection, EventKind, EventSource, Floor};

#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum SimError {
    /// Floor index outside the configured building
    #[error("floor {floor} does not exist in a building with {num_floors} floors")]
    InvalidFloor { floor: usize, num_floors: usize },

    /// Source/kind pair no collaborator ever produces
    #[error("event source {origin} cannot report '{kind}'")]
    MalformedEvent {
        origin: EventSource,
        kind: EventKind,
    },

    /// The top landing has no up button
    #[error("floor {floor} has no {direction:?} call button")]
    NoCallButton {
        floor: Floor,
        direction: CallDirection,
    },

    /// The car stopped somewhere other than the queue head
    #[error("car stopped at floor {reported} but the next queued stop is {expected:?}")]
    QueueMismatch {
        expected: Option<Floor>,
        reported: Floor,
    },

    #[error("invalid configuration: {0}")]
    InvalidConfig(String),

    #[error("time step must be positive and finite, got {0}")]
    InvalidDelta(f32),

    #[error("could not parse call '{0}'")]
    ScriptParse(String),
}
