//! Controllers and epoch evaluation for simbot robots.
//!
//! This crate turns sensor readings into motion and epochs into fitness scores:
//!
//! 1. **Memberships** ([`membership`]) - Fuzzy "near/far" ramps and smell zones
//! 2. **Controllers** ([`controller`]) - The [`RobotController`](controller::RobotController)
//!    seam, with two implementations:
//!    - [`rule_table`] - Interpreter for integer-encoded, evolvable rule tables
//!    - [`fuzzy_controller`] - A fixed hand-tuned rule base
//! 3. **Epochs** ([`session`]) - Tick loop driving every robot in roster order
//! 4. **Fitness** ([`fitness`]) - Scores robots at the end of an epoch
//!
//! # Architecture
//!
//! ```text
//! EpochRunner (tick loop)
//!     ↓ per robot
//! SensorReading → RobotController → Command → Arena::turn_robot / Arena::move_robot
//!     ↓ at epoch end
//! FitnessFunction (score per robot)
//! ```
//!
//! # Example
//!
//! ```
//! use simbot_engine::{Arena, ArenaConfig};
//! use simbot_evaluator::{
//!     controller::BoxedController,
//!     fitness::{FitnessFunction as _, FoodFitness},
//!     rule_table::{RuleTable, RuleTableController},
//!     session::EpochRunner,
//! };
//!
//! let mut arena = Arena::new(&ArenaConfig::default()).unwrap();
//! arena.spawn_robots(2);
//!
//! let mut controllers: Vec<BoxedController> = (0..2)
//!     .map(|_| Box::new(RuleTableController::new(&RuleTable::zeroed(16))) as BoxedController)
//!     .collect();
//! let outcome = EpochRunner::new(50).run(&mut arena, &mut controllers).unwrap();
//! let scores = FoodFitness::default().evaluate_epoch(&arena, &outcome);
//! assert_eq!(scores.len(), 2);
//! ```

pub mod controller;
pub mod fitness;
pub mod fuzzy_controller;
pub mod membership;
pub mod rule_table;
pub mod session;
