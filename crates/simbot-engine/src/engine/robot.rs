use serde::{Deserialize, Serialize};

use crate::core::{BoundingBox, Point2D};

/// Normalizes an angle in degrees into `[0, 360)`.
#[must_use]
pub fn normalize_degrees(degrees: f64) -> f64 {
    let normalized = degrees.rem_euclid(360.0);
    // rem_euclid rounds tiny negative inputs up to exactly 360.0
    if normalized >= 360.0 { 0.0 } else { normalized }
}

/// Unit vector for a heading in degrees.
///
/// Headings grow clockwise: 0° points along +x, 90° along -y.
#[must_use]
pub fn heading_vector(degrees: f64) -> (f64, f64) {
    let rad = (-degrees).to_radians();
    (rad.cos(), rad.sin())
}

/// Position and facing of a robot.
///
/// `pos` is the lower-left corner of the robot's bounding square, the same anchor
/// used by obstacles and objectives.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct RobotPose {
    pos: Point2D,
    direction: f64,
}

impl Default for RobotPose {
    fn default() -> Self {
        Self::new(Point2D::ORIGIN, 0.0)
    }
}

impl RobotPose {
    #[must_use]
    pub fn new(pos: Point2D, direction: f64) -> Self {
        Self {
            pos,
            direction: normalize_degrees(direction),
        }
    }

    #[must_use]
    pub fn pos(&self) -> Point2D {
        self.pos
    }

    /// Facing in degrees, always in `[0, 360)`.
    #[must_use]
    pub fn direction(&self) -> f64 {
        self.direction
    }

    pub(crate) fn set_pos(&mut self, pos: Point2D) {
        self.pos = pos;
    }

    pub(crate) fn rotate(&mut self, degrees: f64) {
        self.direction = normalize_degrees(self.direction + degrees);
    }
}

/// A robot in the arena: pose, size and the counters the motion resolver maintains.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct RobotState {
    pose: RobotPose,
    radius: f64,
    eat_count: usize,
    collision_count: usize,
    stuck: bool,
    just_eat: bool,
}

impl RobotState {
    #[must_use]
    pub fn new(pose: RobotPose, size: f64) -> Self {
        Self {
            pose,
            radius: size / 2.0,
            eat_count: 0,
            collision_count: 0,
            stuck: false,
            just_eat: false,
        }
    }

    #[must_use]
    pub fn pose(&self) -> &RobotPose {
        &self.pose
    }

    #[must_use]
    pub fn pos(&self) -> Point2D {
        self.pose.pos
    }

    #[must_use]
    pub fn direction(&self) -> f64 {
        self.pose.direction
    }

    #[must_use]
    pub fn radius(&self) -> f64 {
        self.radius
    }

    #[must_use]
    pub fn center(&self) -> Point2D {
        self.center_at(self.pose.pos)
    }

    /// Center the robot would have if its corner were at `pos`.
    #[must_use]
    pub fn center_at(&self, pos: Point2D) -> Point2D {
        pos.offset(self.radius, self.radius)
    }

    #[must_use]
    pub fn bbox(&self) -> BoundingBox {
        let pos = self.pose.pos;
        BoundingBox::from_corners(pos, pos.offset(2.0 * self.radius, 2.0 * self.radius))
    }

    #[must_use]
    pub fn eat_count(&self) -> usize {
        self.eat_count
    }

    #[must_use]
    pub fn collision_count(&self) -> usize {
        self.collision_count
    }

    /// Set when the last move was blocked on its very first unit.
    #[must_use]
    pub fn is_stuck(&self) -> bool {
        self.stuck
    }

    /// Set from the tick eating begins until the robot stops overlapping food.
    #[must_use]
    pub fn just_eat(&self) -> bool {
        self.just_eat
    }

    pub(crate) fn pose_mut(&mut self) -> &mut RobotPose {
        &mut self.pose
    }

    pub(crate) fn set_stuck(&mut self, stuck: bool) {
        self.stuck = stuck;
    }

    pub(crate) fn record_collision(&mut self) {
        self.collision_count += 1;
    }

    pub(crate) fn record_eat(&mut self) {
        self.eat_count += 1;
        self.just_eat = true;
    }

    pub(crate) fn clear_just_eat(&mut self) {
        self.just_eat = false;
    }
}
