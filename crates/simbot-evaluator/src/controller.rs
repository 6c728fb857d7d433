//! The seam between perception and motion.
//!
//! A [`RobotController`] receives a [`SensorReading`] each tick and answers with a
//! [`Command`]. The epoch runner (see [`session`](crate::session)) feeds the command
//! to the arena's motion resolver: first the turn, then the move.

use std::fmt;

use simbot_engine::Arena;

/// Everything a controller may perceive during one tick.
#[derive(Debug, Clone, PartialEq)]
pub struct SensorReading {
    /// Distance readings in sensor-angle order.
    pub distances: Vec<f64>,
    /// Bearing to the first objective.
    pub smell: f64,
    /// Bearing to the currently nearest objective.
    pub smell_nearest: f64,
    /// The robot's last move was blocked on its first unit.
    pub stuck: bool,
}

impl SensorReading {
    /// Samples every sensor of robot `id`.
    #[must_use]
    pub fn capture(arena: &Arena, id: usize) -> Self {
        Self {
            distances: arena.distance(id),
            smell: arena.smell(id, 0),
            smell_nearest: arena.smell_nearest(id),
            stuck: arena.robot(id).is_stuck(),
        }
    }

    /// Distance of sensor `slot`, or `fallback` if the arena has fewer sensors.
    #[must_use]
    pub fn distance_or(&self, slot: usize, fallback: f64) -> f64 {
        self.distances.get(slot).copied().unwrap_or(fallback)
    }
}

/// A (turn, move) request for the motion resolver.
#[derive(Debug, Default, Clone, Copy, PartialEq)]
pub struct Command {
    /// Degrees, clockwise positive.
    pub turn: f64,
    /// Units, negative to reverse.
    pub step: f64,
}

impl Command {
    #[must_use]
    pub const fn new(turn: f64, step: f64) -> Self {
        Self { turn, step }
    }
}

/// Decides what a robot does next.
pub trait RobotController: fmt::Debug {
    fn decide(&mut self, reading: &SensorReading) -> Command;
}

pub type BoxedController = Box<dyn RobotController>;
