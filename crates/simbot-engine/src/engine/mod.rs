//! Arena state, perception and motion.
//!
//! - [`ArenaConfig`] - Serializable arena description (size, sensors, obstacles, food)
//! - [`Arena`] - Live arena: walls, obstacles, objectives and the robot roster
//! - [`RobotState`] / [`RobotPose`] - Per-robot pose and counters
//! - [`MoveOutcome`] - Result of a single move request
//!
//! # Tick Semantics
//!
//! The arena mutates robot state immediately. When robots are processed in roster
//! order, a robot later in the roster observes the already-updated positions of the
//! robots before it in the same tick.
//!
//! # Example
//!
//! ```
//! use simbot_engine::{Arena, ArenaConfig};
//!
//! let mut arena = Arena::new(&ArenaConfig::default()).unwrap();
//! arena.spawn_robots(1);
//!
//! let readings = arena.distance(0);
//! assert_eq!(readings.len(), 8);
//!
//! let bearing = arena.smell(0, 0);
//! arena.turn_robot(0, bearing);
//! arena.move_robot(0, 5.0);
//! ```

pub use self::{arena::*, config::*, motion::*, robot::*, sensor::bearing};

mod arena;
mod config;
mod motion;
mod robot;
mod sensor;
