//! Move and turn resolution.
//!
//! Moves advance one unit at a time and stop at the first invalid unit. Blocked
//! moves are not errors: they bump the robot's collision counter (and set `stuck`
//! when no progress at all was possible). After every move the robot is checked
//! against the objectives and an eat event fires on the rising edge of an overlap.

use crate::core::{Point2D, circle_rect_intersect};

use super::{arena::Arena, robot::heading_vector};

/// What a single `move_robot` call did.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct MoveOutcome {
    /// Whole units actually travelled.
    pub advanced: usize,
    /// The move stopped early because the next unit was invalid.
    pub blocked: bool,
    /// Objective eaten by this move, if an eat transition happened.
    pub eaten: Option<usize>,
}

impl Arena {
    /// Rotates a robot by `degrees` (clockwise positive) and clears its stuck flag.
    pub fn turn_robot(&mut self, id: usize, degrees: f64) {
        let robot = self.robot_mut(id);
        robot.pose_mut().rotate(degrees);
        robot.set_stuck(false);
    }

    /// Moves a robot `step` units along its facing (backwards when negative).
    ///
    /// The magnitude is truncated to whole units.
    pub fn move_robot(&mut self, id: usize, step: f64) -> MoveOutcome {
        let robot = self.robot(id);
        let heading = if step >= 0.0 {
            robot.direction()
        } else {
            robot.direction() + 180.0
        };
        let (dx, dy) = heading_vector(heading);
        #[expect(clippy::cast_possible_truncation, clippy::cast_sign_loss)]
        let units = step.abs().trunc() as usize;

        let mut pos = robot.pos();
        let mut advanced = 0;
        let mut blocked = false;
        self.robot_mut(id).set_stuck(false);
        while advanced < units {
            let next = pos.offset(dx, dy);
            if !self.is_valid_position(id, next) {
                blocked = true;
                let robot = self.robot_mut(id);
                if advanced == 0 {
                    robot.set_stuck(true);
                }
                robot.record_collision();
                tracing::trace!(robot = id, advanced, "move blocked");
                break;
            }
            pos = next;
            advanced += 1;
        }
        self.robot_mut(id).pose_mut().set_pos(pos);

        let eaten = self.update_eating(id);
        MoveOutcome {
            advanced,
            blocked,
            eaten,
        }
    }

    fn update_eating(&mut self, id: usize) -> Option<usize> {
        let Some(objective) = self.overlapping_objective(id) else {
            self.robot_mut(id).clear_just_eat();
            return None;
        };
        if self.robot(id).just_eat() {
            return None;
        }
        self.on_robot_eat(id, objective);
        self.robot_mut(id).record_eat();
        Some(objective)
    }

    fn overlapping_objective(&self, id: usize) -> Option<usize> {
        let robot = self.robot(id);
        self.objectives()
            .iter()
            .position(|obj| circle_rect_intersect(robot.center(), robot.radius(), obj.rect()))
    }

    /// Whether robot `id` could stand with its corner at `pos`.
    #[must_use]
    pub fn is_valid_position(&self, id: usize, pos: Point2D) -> bool {
        let robot = self.robot(id);
        let center = robot.center_at(pos);
        let radius = robot.radius();

        if !self.is_inside(center, radius) {
            return false;
        }
        if self
            .obstacles()
            .iter()
            .any(|obs| circle_rect_intersect(center, radius, obs.rect()))
        {
            return false;
        }
        if self.robots_see_each_other() {
            let touching_other = self
                .robots()
                .iter()
                .enumerate()
                .any(|(other, r)| other != id && r.center().distance(center) <= 2.0 * radius);
            if touching_other {
                return false;
            }
        }
        true
    }

    fn is_inside(&self, center: Point2D, radius: f64) -> bool {
        let bounds = self.bounds();
        let half_width = bounds.width / 2.0;
        let half_height = bounds.height / 2.0;
        let arena_center = bounds.center();
        let dx = (center.x - arena_center.x).abs();
        let dy = (center.y - arena_center.y).abs();
        dx <= half_width - radius && dy <= half_height - radius
    }
}

#[cfg(test)]
mod tests {
    use crate::{
        core::{Point2D, Rect},
        engine::{Arena, ArenaConfig, RobotPose},
    };

    fn config() -> ArenaConfig {
        ArenaConfig {
            width: 200.0,
            height: 200.0,
            robot_size: 20.0,
            objectives: vec![],
            spawn: RobotPose::new(Point2D::new(90.0, 90.0), 0.0),
            ..ArenaConfig::default()
        }
    }

    fn arena_with(config: &ArenaConfig) -> Arena {
        let mut arena = Arena::new(config).unwrap();
        arena.spawn_robots(1);
        arena
    }

    #[test]
    fn test_turn_round_trip() {
        let mut arena = arena_with(&config());
        for d in [0.0, 10.0, 90.0, 359.9, 360.0, 725.5, -1234.25, 1e-9] {
            let before = arena.robot(0).direction();
            arena.turn_robot(0, d);
            let direction = arena.robot(0).direction();
            assert!((0.0..360.0).contains(&direction), "direction {direction} out of range");
            arena.turn_robot(0, -d);
            let after = arena.robot(0).direction();
            let diff = (after - before).rem_euclid(360.0);
            assert!(diff < 1e-6 || 360.0 - diff < 1e-6, "turn({d}) round trip: {before} -> {after}");
        }
    }

    #[test]
    fn test_move_forward_and_backward() {
        let mut arena = arena_with(&config());
        let outcome = arena.move_robot(0, 10.9);
        assert_eq!(outcome.advanced, 10, "step is truncated");
        assert!(!outcome.blocked);
        assert!((arena.robot(0).pos().x - 100.0).abs() < 1e-9);

        let outcome = arena.move_robot(0, -5.0);
        assert_eq!(outcome.advanced, 5);
        assert!((arena.robot(0).pos().x - 95.0).abs() < 1e-9);
        assert!((arena.robot(0).pos().y - 90.0).abs() < 1e-9);
        assert_eq!(arena.robot(0).direction(), 0.0, "moving backwards keeps the facing");
    }

    #[test]
    fn test_blocked_first_unit_sets_stuck() {
        let config = ArenaConfig {
            spawn: RobotPose::new(Point2D::new(180.0, 90.0), 0.0),
            ..config()
        };
        let mut arena = arena_with(&config);
        // Right edge of the robot already touches the wall.
        let outcome = arena.move_robot(0, 5.0);
        assert_eq!(outcome.advanced, 0);
        assert!(outcome.blocked);
        assert!(arena.robot(0).is_stuck());
        assert_eq!(arena.robot(0).collision_count(), 1);
        assert_eq!(arena.robot(0).pos(), Point2D::new(180.0, 90.0));

        let outcome = arena.move_robot(0, -3.0);
        assert_eq!(outcome.advanced, 3);
        assert!(!arena.robot(0).is_stuck(), "a successful move clears stuck");
        assert_eq!(arena.robot(0).collision_count(), 1);
    }

    #[test]
    fn test_partial_progress_is_kept() {
        let config = ArenaConfig {
            spawn: RobotPose::new(Point2D::new(175.0, 90.0), 0.0),
            ..config()
        };
        let mut arena = arena_with(&config);
        let outcome = arena.move_robot(0, 20.0);
        assert_eq!(outcome.advanced, 5);
        assert!(outcome.blocked);
        assert!(!arena.robot(0).is_stuck(), "progress was made before the wall");
        assert_eq!(arena.robot(0).collision_count(), 1);
        assert!((arena.robot(0).pos().x - 180.0).abs() < 1e-9);
    }

    #[test]
    fn test_turn_clears_stuck() {
        let config = ArenaConfig {
            spawn: RobotPose::new(Point2D::new(180.0, 90.0), 0.0),
            ..config()
        };
        let mut arena = arena_with(&config);
        arena.move_robot(0, 1.0);
        assert!(arena.robot(0).is_stuck());
        arena.turn_robot(0, 180.0);
        assert!(!arena.robot(0).is_stuck());
    }

    #[test]
    fn test_obstacle_blocks_movement() {
        let config = ArenaConfig {
            obstacles: vec![Rect::new(Point2D::new(120.0, 80.0), 10.0, 40.0)],
            ..config()
        };
        let mut arena = arena_with(&config);
        // Robot disc spans x 90..110; obstacle starts at x = 120.
        let outcome = arena.move_robot(0, 30.0);
        assert_eq!(outcome.advanced, 9, "the tenth unit would touch the obstacle");
        assert!(outcome.blocked);
        assert_eq!(arena.robot(0).collision_count(), 1);
    }

    #[test]
    fn test_robot_collision_follows_roster_order() {
        let config = ArenaConfig {
            robots_see_each_other: true,
            ..config()
        };
        let mut arena = Arena::new(&config).unwrap();
        arena.add_robot(RobotPose::new(Point2D::new(50.0, 90.0), 0.0));
        arena.add_robot(RobotPose::new(Point2D::new(100.0, 90.0), 0.0));

        // Robot 1 moves away first, so robot 0 observes its new position.
        arena.move_robot(1, 20.0);
        let outcome = arena.move_robot(0, 60.0);
        assert_eq!(outcome.advanced, 49);
        assert!(outcome.blocked);

        // Without robot visibility robots pass through each other.
        let mut arena = Arena::new(&self::config()).unwrap();
        arena.add_robot(RobotPose::new(Point2D::new(50.0, 90.0), 0.0));
        arena.add_robot(RobotPose::new(Point2D::new(100.0, 90.0), 0.0));
        let outcome = arena.move_robot(0, 60.0);
        assert_eq!(outcome.advanced, 60);
    }

    #[test]
    fn test_sustained_overlap_eats_once() {
        let config = ArenaConfig {
            objectives: vec![Rect::new(Point2D::new(115.0, 95.0), 10.0, 10.0)],
            ..config()
        };
        let mut arena = arena_with(&config);

        // Disc right edge at 110; the objective starts at 115.
        assert_eq!(arena.move_robot(0, 4.0).eaten, None);
        assert_eq!(arena.move_robot(0, 1.0).eaten, Some(0));
        assert_eq!(arena.robot(0).eat_count(), 1);
        assert!(arena.robot(0).just_eat());

        for _ in 0..5 {
            assert_eq!(arena.move_robot(0, 1.0).eaten, None);
        }
        assert_eq!(arena.robot(0).eat_count(), 1);

        // Leave the objective, then come back.
        arena.move_robot(0, -20.0);
        assert!(!arena.robot(0).just_eat());
        assert_eq!(arena.move_robot(0, 20.0).eaten, Some(0));
        assert_eq!(arena.robot(0).eat_count(), 2);
    }

    #[test]
    fn test_zero_step_still_checks_objectives() {
        let config = ArenaConfig {
            objectives: vec![Rect::new(Point2D::new(95.0, 95.0), 10.0, 10.0)],
            ..config()
        };
        let mut arena = arena_with(&config);
        let outcome = arena.move_robot(0, 0.0);
        assert_eq!(outcome.advanced, 0);
        assert!(!outcome.blocked);
        assert_eq!(outcome.eaten, Some(0));
        assert_eq!(arena.robot(0).collision_count(), 0);
    }
}
