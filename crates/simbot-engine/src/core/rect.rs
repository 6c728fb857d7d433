use serde::{Deserialize, Serialize};

use super::geometry::{BoundingBox, LineSegment, Point2D};

/// Axis-aligned rectangle anchored at its lower-left corner.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Rect {
    pub pos: Point2D,
    pub width: f64,
    pub height: f64,
}

impl Rect {
    #[must_use]
    pub const fn new(pos: Point2D, width: f64, height: f64) -> Self {
        Self { pos, width, height }
    }

    #[must_use]
    pub fn center(&self) -> Point2D {
        self.pos.offset(self.width / 2.0, self.height / 2.0)
    }

    #[must_use]
    pub fn bbox(&self) -> BoundingBox {
        BoundingBox {
            min_x: self.pos.x,
            min_y: self.pos.y,
            max_x: self.pos.x + self.width,
            max_y: self.pos.y + self.height,
        }
    }

    /// The four edges in counter-clockwise order, starting with the bottom edge.
    #[must_use]
    pub fn edges(&self) -> [LineSegment; 4] {
        let BoundingBox {
            min_x,
            min_y,
            max_x,
            max_y,
        } = self.bbox();
        let bottom_left = Point2D::new(min_x, min_y);
        let bottom_right = Point2D::new(max_x, min_y);
        let top_right = Point2D::new(max_x, max_y);
        let top_left = Point2D::new(min_x, max_y);
        [
            LineSegment::new(bottom_left, bottom_right),
            LineSegment::new(bottom_right, top_right),
            LineSegment::new(top_right, top_left),
            LineSegment::new(top_left, bottom_left),
        ]
    }
}

/// A static obstacle. Immutable for the lifetime of an arena.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Obstacle(Rect);

impl Obstacle {
    #[must_use]
    pub const fn new(rect: Rect) -> Self {
        Self(rect)
    }

    #[must_use]
    pub fn rect(&self) -> &Rect {
        &self.0
    }
}

/// A food objective robots try to reach.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Objective(Rect);

impl Objective {
    #[must_use]
    pub const fn new(rect: Rect) -> Self {
        Self(rect)
    }

    #[must_use]
    pub fn rect(&self) -> &Rect {
        &self.0
    }

    #[must_use]
    pub fn pos(&self) -> Point2D {
        self.0.pos
    }

    #[must_use]
    pub fn center(&self) -> Point2D {
        self.0.center()
    }

    pub(crate) fn move_to(&mut self, pos: Point2D) {
        self.0.pos = pos;
    }
}
