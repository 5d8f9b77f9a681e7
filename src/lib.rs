//! Elevator Simulation Library
//!
//! A single-car elevator simulation: a reactive dispatch controller driving
//! a car and its landing doors, runnable headless from the console.

pub mod simulation;
