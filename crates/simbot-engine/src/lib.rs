//! Simulation engine for disc-shaped robots in a bounded 2D arena.
//!
//! The crate is split the same way as the simulation itself:
//!
//! - [`core`] - Pure geometry (points, segments, rectangles, intersection tests)
//! - [`engine`] - Stateful simulation: arena, robot roster, sensors and motion
//!
//! Controllers that decide *what* a robot does live in `simbot-evaluator`; this crate
//! only answers what a robot perceives and what happens when it moves.

pub use self::{core::*, engine::*};

pub mod core;
pub mod engine;

/// Invalid arena configuration.
#[derive(Debug, Clone, PartialEq, derive_more::Display, derive_more::Error)]
pub enum ConfigError {
    #[display("arena size must be positive, got {width}x{height}")]
    ArenaSize { width: f64, height: f64 },
    #[display("robot size must be positive, got {size}")]
    RobotSize { size: f64 },
    #[display("at least one sensor angle is required")]
    NoSensorAngles,
    #[display("max sensor distance must be positive, got {distance}")]
    SensorRange { distance: f64 },
    #[display("spawn position ({x}, {y}) is outside the arena")]
    SpawnOutside { x: f64, y: f64 },
}
