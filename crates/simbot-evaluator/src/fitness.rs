//! Fitness functions scoring robots at the end of an epoch.
//!
//! # Food Fitness
//!
//! ```text
//! fitness = 1000 - floor(distance(robot.pos, objective[0].pos)) - collision_count
//!         + (eat_count > 0 ? 500 + iterations : -100 - iterations)
//! ```
//!
//! Robots that ate are rewarded more the longer the epoch ran; robots that did not
//! are penalized by the same amount. Distance is measured between the lower-left
//! corners of the robot and the first objective at the end of the epoch.

use std::fmt;

use simbot_engine::{Arena, RobotState};

use crate::session::EpochOutcome;

/// Scores a robot after an epoch. Higher is better.
pub trait FitnessFunction: fmt::Debug {
    fn fitness(&self, arena: &Arena, robot: &RobotState, iterations: usize) -> i64;

    /// Scores every robot of `outcome`, in roster order.
    fn evaluate_epoch(&self, arena: &Arena, outcome: &EpochOutcome) -> Vec<i64> {
        outcome
            .robots
            .iter()
            .map(|robot| self.fitness(arena, robot, outcome.iterations))
            .collect()
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FoodFitness {
    pub base: i64,
    pub eat_bonus: i64,
    pub miss_penalty: i64,
}

impl Default for FoodFitness {
    fn default() -> Self {
        Self {
            base: 1000,
            eat_bonus: 500,
            miss_penalty: 100,
        }
    }
}

impl FitnessFunction for FoodFitness {
    #[expect(clippy::cast_possible_truncation, clippy::cast_possible_wrap)]
    fn fitness(&self, arena: &Arena, robot: &RobotState, iterations: usize) -> i64 {
        let distance = arena
            .objectives()
            .first()
            .map_or(0, |objective| robot.pos().distance(objective.pos()).floor() as i64);
        let collisions = robot.collision_count() as i64;
        let iterations = iterations as i64;
        let eat_term = if robot.eat_count() > 0 {
            self.eat_bonus + iterations
        } else {
            -self.miss_penalty - iterations
        };
        self.base - distance - collisions + eat_term
    }
}

#[cfg(test)]
mod tests {
    use simbot_engine::{ArenaConfig, Point2D, Rect, RobotPose};

    use super::*;

    fn arena() -> Arena {
        let config = ArenaConfig {
            width: 400.0,
            height: 400.0,
            robot_size: 20.0,
            objectives: vec![Rect::new(Point2D::new(200.0, 100.0), 20.0, 20.0)],
            spawn: RobotPose::new(Point2D::new(100.0, 100.0), 0.0),
            ..ArenaConfig::default()
        };
        let mut arena = Arena::new(&config).unwrap();
        arena.spawn_robots(1);
        arena
    }

    #[test]
    fn test_miss_is_penalized_by_iterations() {
        let arena = arena();
        let fitness = FoodFitness::default().fitness(&arena, arena.robot(0), 50);
        assert_eq!(fitness, 1000 - 100 - 0 - 100 - 50);
    }

    #[test]
    fn test_eat_and_collisions() {
        let mut arena = arena();
        // Reach the objective, then run into the top wall.
        arena.move_robot(0, 80.0);
        arena.turn_robot(0, -90.0);
        arena.move_robot(0, 500.0);
        let robot = arena.robot(0);
        assert_eq!(robot.eat_count(), 1);
        assert_eq!(robot.collision_count(), 1);

        let fitness = FoodFitness::default().fitness(&arena, robot, 10);
        let distance = robot.pos().distance(Point2D::new(200.0, 100.0)).floor();
        #[expect(clippy::cast_possible_truncation)]
        let distance = distance as i64;
        assert_eq!(fitness, 1000 - distance - 1 + 500 + 10);
    }

    #[test]
    fn test_distance_is_floored() {
        let mut arena = arena();
        arena.turn_robot(0, 90.0);
        arena.move_robot(0, 1.0);
        // Corner moved one unit down: sqrt(100^2 + 1) = 100.005
        let fitness = FoodFitness::default().fitness(&arena, arena.robot(0), 0);
        assert_eq!(fitness, 1000 - 100 - 100);
    }
}
