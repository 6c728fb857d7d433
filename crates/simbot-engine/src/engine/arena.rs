use rand::{Rng as _, SeedableRng as _};
use rand_pcg::Pcg32;

use crate::{
    ConfigError,
    core::{LineSegment, Objective, Obstacle, Point2D, Rect, bbox_overlap},
};

use super::{
    config::{ArenaConfig, ObjectivePolicy, SensorConfig},
    robot::{RobotPose, RobotState},
};

/// Attempts made to find a free spot for a relocated objective.
const RELOCATION_ATTEMPTS: usize = 100;

/// The arena context: walls, obstacles, objectives and the robot roster.
///
/// Robots are identified by their roster index. Sensor queries live in
/// `sensor.rs` and move/turn resolution in `motion.rs`; both operate on this type.
#[derive(Debug, Clone)]
pub struct Arena {
    bounds: Rect,
    walls: [LineSegment; 4],
    robot_size: f64,
    sensor: SensorConfig,
    robots_see_each_other: bool,
    objective_policy: ObjectivePolicy,
    relocation_seed: u64,
    rng: Pcg32,
    obstacles: Vec<Obstacle>,
    initial_objectives: Vec<Objective>,
    objectives: Vec<Objective>,
    spawn: RobotPose,
    robots: Vec<RobotState>,
}

impl Arena {
    /// Builds an empty arena (no robots) from a validated configuration.
    pub fn new(config: &ArenaConfig) -> Result<Self, ConfigError> {
        config.validate()?;
        let bounds = Rect::new(Point2D::ORIGIN, config.width, config.height);
        let objectives: Vec<Objective> = config.objectives.iter().copied().map(Objective::new).collect();
        Ok(Self {
            bounds,
            walls: bounds.edges(),
            robot_size: config.robot_size,
            sensor: config.sensor.clone(),
            robots_see_each_other: config.robots_see_each_other,
            objective_policy: config.objective_policy,
            relocation_seed: config.relocation_seed,
            rng: Pcg32::seed_from_u64(config.relocation_seed),
            obstacles: config.obstacles.iter().copied().map(Obstacle::new).collect(),
            initial_objectives: objectives.clone(),
            objectives,
            spawn: RobotPose::new(config.spawn.pos(), config.spawn.direction()),
            robots: vec![],
        })
    }

    /// Resets the arena for a new epoch with `count` robots at the spawn pose.
    ///
    /// Objectives return to their configured positions and the relocation stream
    /// restarts from its seed, so every epoch starts from the same state.
    pub fn spawn_robots(&mut self, count: usize) {
        self.objectives.clone_from(&self.initial_objectives);
        self.rng = Pcg32::seed_from_u64(self.relocation_seed);
        self.robots = (0..count)
            .map(|_| RobotState::new(self.spawn, self.robot_size))
            .collect();
    }

    /// Appends a robot to the roster and returns its index.
    pub fn add_robot(&mut self, pose: RobotPose) -> usize {
        self.robots.push(RobotState::new(pose, self.robot_size));
        self.robots.len() - 1
    }

    #[must_use]
    pub fn bounds(&self) -> &Rect {
        &self.bounds
    }

    #[must_use]
    pub fn walls(&self) -> &[LineSegment; 4] {
        &self.walls
    }

    #[must_use]
    pub fn sensor_config(&self) -> &SensorConfig {
        &self.sensor
    }

    #[must_use]
    pub fn robots_see_each_other(&self) -> bool {
        self.robots_see_each_other
    }

    #[must_use]
    pub fn obstacles(&self) -> &[Obstacle] {
        &self.obstacles
    }

    #[must_use]
    pub fn objectives(&self) -> &[Objective] {
        &self.objectives
    }

    #[must_use]
    pub fn robots(&self) -> &[RobotState] {
        &self.robots
    }

    /// # Panics
    ///
    /// Panics if `id` is not a roster index.
    #[must_use]
    pub fn robot(&self, id: usize) -> &RobotState {
        &self.robots[id]
    }

    pub(crate) fn robot_mut(&mut self, id: usize) -> &mut RobotState {
        &mut self.robots[id]
    }

    /// Handles an eat transition of `robot` on `objective`.
    pub(crate) fn on_robot_eat(&mut self, robot: usize, objective: usize) {
        let pos = self.objectives[objective].pos();
        tracing::debug!(robot, objective, x = pos.x, y = pos.y, "robot ate objective");

        if self.objective_policy.is_relocate() {
            if let Some(new_pos) = self.find_free_spot(*self.objectives[objective].rect()) {
                self.objectives[objective].move_to(new_pos);
                tracing::debug!(objective, x = new_pos.x, y = new_pos.y, "objective relocated");
            }
        }
    }

    fn find_free_spot(&mut self, rect: Rect) -> Option<Point2D> {
        let max_x = (self.bounds.width - rect.width).max(0.0);
        let max_y = (self.bounds.height - rect.height).max(0.0);
        for _ in 0..RELOCATION_ATTEMPTS {
            let pos = Point2D::new(
                self.rng.random_range(0.0..=max_x),
                self.rng.random_range(0.0..=max_y),
            );
            let candidate = Rect { pos, ..rect }.bbox();
            let blocked = self
                .obstacles
                .iter()
                .any(|obs| bbox_overlap(&candidate, &obs.rect().bbox()));
            if !blocked {
                return Some(pos);
            }
        }
        None
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_spawn_robots_resets_roster() {
        let mut arena = Arena::new(&ArenaConfig::default()).unwrap();
        arena.spawn_robots(3);
        assert_eq!(arena.robots().len(), 3);
        for robot in arena.robots() {
            assert_eq!(robot.pos(), Point2D::new(20.0, 560.0));
            assert_eq!(robot.eat_count(), 0);
            assert_eq!(robot.collision_count(), 0);
        }

        arena.spawn_robots(1);
        assert_eq!(arena.robots().len(), 1);
    }

    #[test]
    fn test_invalid_config_is_rejected() {
        let config = ArenaConfig {
            width: -1.0,
            ..ArenaConfig::default()
        };
        assert!(Arena::new(&config).is_err());
    }

    #[test]
    fn test_relocated_objective_avoids_obstacles() {
        let obstacle = Rect::new(Point2D::new(0.0, 0.0), 100.0, 50.0);
        let config = ArenaConfig {
            width: 100.0,
            height: 100.0,
            objective_policy: ObjectivePolicy::Relocate,
            relocation_seed: 7,
            obstacles: vec![obstacle],
            objectives: vec![Rect::new(Point2D::new(0.0, 80.0), 10.0, 10.0)],
            spawn: RobotPose::new(Point2D::new(0.0, 60.0), 0.0),
            ..ArenaConfig::default()
        };
        let mut arena = Arena::new(&config).unwrap();
        arena.spawn_robots(1);
        for _ in 0..20 {
            arena.on_robot_eat(0, 0);
            let rect = arena.objectives()[0].rect();
            assert!(rect.pos.y > 50.0, "objective placed on obstacle: {rect:?}");
            assert!(rect.pos.x + rect.width <= 100.0 && rect.pos.y + rect.height <= 100.0);
        }

        arena.spawn_robots(1);
        assert_eq!(arena.objectives()[0].pos(), Point2D::new(0.0, 80.0));
    }
}
