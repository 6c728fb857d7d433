//! Epoch execution: the per-tick loop that connects sensors, controllers and motion.
//!
//! One tick visits every robot in roster order:
//!
//! 1. Capture a [`SensorReading`]
//! 2. Ask the robot's controller for a [`Command`](crate::controller::Command)
//! 3. Turn, then move
//!
//! While a robot is mid-eat and [`EpochRunner::freeze_while_eating`] is set, its
//! command is withheld: it neither turns nor moves, and only a zero-length move
//! re-checks whether it still overlaps the objective.
//!
//! The epoch ends at the tick budget, or earlier once every robot has eaten when
//! [`EpochRunner::stop_when_all_ate`] is set.

use simbot_engine::{Arena, RobotState};

use crate::controller::{BoxedController, SensorReading};

/// Default tick budget per epoch.
pub const DEFAULT_MAX_TICK: usize = 1000;

#[derive(Debug, Clone, PartialEq, Eq, derive_more::Display, derive_more::Error)]
pub enum EpochError {
    #[display("{controllers} controllers for {robots} robots")]
    ControllerCount { robots: usize, controllers: usize },
}

/// Final state of an epoch.
#[derive(Debug, Clone, PartialEq)]
pub struct EpochOutcome {
    /// Ticks executed.
    pub iterations: usize,
    /// Robot states at the end of the epoch, in roster order.
    pub robots: Vec<RobotState>,
}

impl EpochOutcome {
    #[must_use]
    pub fn eaten_count(&self) -> usize {
        self.robots.iter().filter(|r| r.eat_count() > 0).count()
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct EpochRunner {
    pub max_tick: usize,
    pub freeze_while_eating: bool,
    pub stop_when_all_ate: bool,
}

impl Default for EpochRunner {
    fn default() -> Self {
        Self {
            max_tick: DEFAULT_MAX_TICK,
            freeze_while_eating: true,
            stop_when_all_ate: true,
        }
    }
}

impl EpochRunner {
    #[must_use]
    pub fn new(max_tick: usize) -> Self {
        Self {
            max_tick,
            ..Self::default()
        }
    }

    /// Runs one epoch. `controllers[i]` drives robot `i`.
    pub fn run(
        &self,
        arena: &mut Arena,
        controllers: &mut [BoxedController],
    ) -> Result<EpochOutcome, EpochError> {
        let robots = arena.robots().len();
        if controllers.len() != robots {
            return Err(EpochError::ControllerCount {
                robots,
                controllers: controllers.len(),
            });
        }

        let mut iterations = 0;
        while iterations < self.max_tick {
            self.tick(arena, controllers);
            iterations += 1;
            if self.stop_when_all_ate && robots > 0 && arena.robots().iter().all(|r| r.eat_count() > 0)
            {
                tracing::debug!(iterations, "every robot ate, ending epoch early");
                break;
            }
        }

        let outcome = EpochOutcome {
            iterations,
            robots: arena.robots().to_vec(),
        };
        tracing::debug!(
            iterations,
            robots,
            eaten = outcome.eaten_count(),
            "epoch finished"
        );
        Ok(outcome)
    }

    fn tick(&self, arena: &mut Arena, controllers: &mut [BoxedController]) {
        for (id, controller) in controllers.iter_mut().enumerate() {
            if self.freeze_while_eating && arena.robot(id).just_eat() {
                arena.move_robot(id, 0.0);
                continue;
            }
            let reading = SensorReading::capture(arena, id);
            let command = controller.decide(&reading);
            arena.turn_robot(id, command.turn);
            arena.move_robot(id, command.step);
        }
    }
}
