//! Ray-cast distance sensors and the "smell" bearing sensor.
//!
//! Each distance sensor is a ray starting on the robot's rim and extending
//! `max_distance` outward. The reading is the distance to the nearest wall, obstacle
//! edge or (when enabled) other robot along that ray, or exactly `max_distance` when
//! nothing is hit.
//!
//! Smell readings are signed bearings in `(-180, 180]`. The sign follows the turn
//! convention of the motion resolver: a positive bearing means the target lies
//! clockwise, so `turn(smell)` faces it.

use crate::core::{BoundingBox, Point2D, segment_circle_intersect, segment_intersect};

use super::{
    arena::Arena,
    robot::{RobotState, heading_vector},
};

/// Signed bearing from a robot facing `direction` at `center` to `target`.
#[must_use]
pub fn bearing(center: Point2D, direction: f64, target: Point2D) -> f64 {
    let dx = center.x - target.x;
    let dy = center.y - target.y;
    let deg = (180.0 - (dy.atan2(dx).to_degrees() + direction)).rem_euclid(360.0);
    if deg <= 180.0 { deg } else { deg - 360.0 }
}

impl Arena {
    /// Distance readings for every configured sensor angle, in configuration order.
    ///
    /// # Panics
    ///
    /// Panics if `robot` is not a roster index.
    #[must_use]
    pub fn distance(&self, robot: usize) -> Vec<f64> {
        self.sensor_config()
            .angles
            .iter()
            .map(|angle| self.ray_distance(robot, *angle))
            .collect()
    }

    fn ray_distance(&self, id: usize, angle: f64) -> f64 {
        let max_distance = self.sensor_config().max_distance;
        let robot = self.robot(id);
        let (ux, uy) = heading_vector(robot.direction() + angle);
        let center = robot.center();
        let surface = center.offset(robot.radius() * ux, robot.radius() * uy);
        let far = surface.offset(max_distance * ux, max_distance * uy);
        let roi = BoundingBox::from_corners(surface, far);

        let obstacle_edges = self
            .obstacles()
            .iter()
            .filter(|obs| roi.overlaps(&obs.rect().bbox()))
            .flat_map(|obs| obs.rect().edges());
        let line_hits = self
            .walls()
            .iter()
            .copied()
            .chain(obstacle_edges)
            .filter_map(|edge| segment_intersect(surface, far, edge.start, edge.end));

        let robot_hits = self
            .robots()
            .iter()
            .enumerate()
            .filter(|(other, _)| self.robots_see_each_other() && *other != id)
            .filter(|(_, other)| roi.overlaps(&other.bbox()))
            .filter_map(|(_, other)| {
                segment_circle_intersect(surface, far, other.center(), other.radius())
            });

        line_hits
            .chain(robot_hits)
            .map(|hit| surface.distance(hit))
            .fold(max_distance, f64::min)
    }

    /// Bearing to objective `index`, or `0.0` if there is no such objective.
    #[must_use]
    pub fn smell(&self, robot: usize, index: usize) -> f64 {
        let robot = self.robot(robot);
        self.objectives()
            .get(index)
            .map_or(0.0, |obj| bearing(robot.center(), robot.direction(), obj.center()))
    }

    /// Bearing to whichever objective is currently nearest, or `0.0` without objectives.
    #[must_use]
    pub fn smell_nearest(&self, robot: usize) -> f64 {
        let robot = self.robot(robot);
        self.nearest_objective(robot)
            .map_or(0.0, |index| self.smell_from(robot, index))
    }

    fn nearest_objective(&self, robot: &RobotState) -> Option<usize> {
        self.objectives()
            .iter()
            .enumerate()
            .min_by(|(_, a), (_, b)| {
                robot
                    .pos()
                    .distance(a.pos())
                    .total_cmp(&robot.pos().distance(b.pos()))
            })
            .map(|(index, _)| index)
    }

    fn smell_from(&self, robot: &RobotState, index: usize) -> f64 {
        bearing(
            robot.center(),
            robot.direction(),
            self.objectives()[index].center(),
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{
        core::Rect,
        engine::{ArenaConfig, RobotPose, SensorConfig},
    };

    const MAX: f64 = 100.0;

    fn open_config() -> ArenaConfig {
        ArenaConfig {
            width: 1000.0,
            height: 1000.0,
            robot_size: 20.0,
            sensor: SensorConfig {
                angles: vec![0.0, 90.0, 180.0, 270.0],
                max_distance: MAX,
            },
            objectives: vec![],
            spawn: RobotPose::new(Point2D::new(490.0, 490.0), 0.0),
            ..ArenaConfig::default()
        }
    }

    fn arena_with(config: &ArenaConfig) -> Arena {
        let mut arena = Arena::new(config).unwrap();
        arena.spawn_robots(1);
        arena
    }

    #[test]
    fn test_no_hit_reports_max_distance() {
        let arena = arena_with(&open_config());
        assert_eq!(arena.distance(0), vec![MAX; 4]);
    }

    #[test]
    fn test_wall_distance() {
        let config = ArenaConfig {
            spawn: RobotPose::new(Point2D::new(940.0, 490.0), 0.0),
            ..open_config()
        };
        let arena = arena_with(&config);
        // Rim at x = 960, wall at x = 1000.
        let readings = arena.distance(0);
        assert!((readings[0] - 40.0).abs() < 1e-9, "got {readings:?}");
        assert_eq!(readings[1..], [MAX; 3]);
    }

    #[test]
    fn test_obstacle_distance_monotonic_in_proximity() {
        let mut previous = f64::INFINITY;
        for gap in [90.0, 60.0, 30.0, 10.0, 1.0] {
            // Rim is at x = 510; the obstacle's left edge sits `gap` further right.
            let config = ArenaConfig {
                obstacles: vec![Rect::new(Point2D::new(510.0 + gap, 480.0), 20.0, 40.0)],
                ..open_config()
            };
            let reading = arena_with(&config).distance(0)[0];
            assert!((reading - gap).abs() < 1e-9, "gap {gap}: got {reading}");
            assert!(reading <= previous);
            previous = reading;
        }
    }

    #[test]
    fn test_sensor_angles_follow_heading() {
        let config = ArenaConfig {
            obstacles: vec![Rect::new(Point2D::new(480.0, 450.0), 40.0, 10.0)],
            ..open_config()
        };
        let mut arena = arena_with(&config);
        // Obstacle is below the robot: the 90° (clockwise) sensor sees it first.
        let readings = arena.distance(0);
        assert!((readings[1] - 30.0).abs() < 1e-9, "got {readings:?}");
        assert_eq!(readings[3], MAX);

        arena.turn_robot(0, 90.0);
        let readings = arena.distance(0);
        assert!((readings[0] - 30.0).abs() < 1e-9, "got {readings:?}");
    }

    #[test]
    fn test_other_robots_visible_only_when_enabled() {
        let config = open_config();
        let mut arena = Arena::new(&config).unwrap();
        arena.add_robot(RobotPose::new(Point2D::new(490.0, 490.0), 0.0));
        arena.add_robot(RobotPose::new(Point2D::new(550.0, 490.0), 0.0));
        assert_eq!(arena.distance(0)[0], MAX);

        let config = ArenaConfig {
            robots_see_each_other: true,
            ..open_config()
        };
        let mut arena = Arena::new(&config).unwrap();
        arena.add_robot(RobotPose::new(Point2D::new(490.0, 490.0), 0.0));
        arena.add_robot(RobotPose::new(Point2D::new(550.0, 490.0), 0.0));
        // Rim at x = 510, other robot's disc starts at x = 550.
        let reading = arena.distance(0)[0];
        assert!((reading - 40.0).abs() < 1e-9, "got {reading}");
    }

    #[test]
    fn test_bearing_sign_convention() {
        let center = Point2D::new(0.0, 0.0);
        assert!(bearing(center, 0.0, Point2D::new(10.0, 0.0)).abs() < 1e-9);
        assert!((bearing(center, 0.0, Point2D::new(0.0, -10.0)) - 90.0).abs() < 1e-9);
        assert!((bearing(center, 0.0, Point2D::new(0.0, 10.0)) + 90.0).abs() < 1e-9);
        assert!((bearing(center, 0.0, Point2D::new(-10.0, 0.0)) - 180.0).abs() < 1e-9);
        assert!(bearing(center, 90.0, Point2D::new(0.0, -10.0)).abs() < 1e-9);
    }

    #[test]
    fn test_smell_and_smell_nearest() {
        let config = ArenaConfig {
            objectives: vec![
                Rect::new(Point2D::new(800.0, 490.0), 20.0, 20.0),
                Rect::new(Point2D::new(490.0, 400.0), 20.0, 20.0),
            ],
            ..open_config()
        };
        let mut arena = arena_with(&config);
        assert!(arena.smell(0, 0).abs() < 1e-9);
        assert!((arena.smell(0, 1) - 90.0).abs() < 1e-9);
        assert_eq!(arena.smell(0, 5), 0.0);
        // The second objective is closer.
        assert!((arena.smell_nearest(0) - 90.0).abs() < 1e-9);

        arena.turn_robot(0, 90.0);
        assert!(arena.smell_nearest(0).abs() < 1e-9);
        let smell = arena.smell(0, 0);
        assert!((-180.0..=180.0).contains(&smell) && smell > -180.0);
    }
}
