use serde::{Deserialize, Serialize};

use super::rect::Rect;

/// Determinants smaller than this are treated as parallel lines.
const PARALLEL_EPSILON: f64 = 1e-12;

/// A point (or displacement) in arena coordinates.
#[derive(Debug, Default, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Point2D {
    pub x: f64,
    pub y: f64,
}

impl Point2D {
    pub const ORIGIN: Self = Self::new(0.0, 0.0);

    #[must_use]
    pub const fn new(x: f64, y: f64) -> Self {
        Self { x, y }
    }

    #[must_use]
    pub fn distance(self, other: Self) -> f64 {
        (self.x - other.x).hypot(self.y - other.y)
    }

    #[must_use]
    pub fn offset(self, dx: f64, dy: f64) -> Self {
        Self::new(self.x + dx, self.y + dy)
    }

    fn sub(self, other: Self) -> Self {
        Self::new(self.x - other.x, self.y - other.y)
    }

    fn cross(self, other: Self) -> f64 {
        self.x * other.y - self.y * other.x
    }

    fn dot(self, other: Self) -> f64 {
        self.x * other.x + self.y * other.y
    }
}

/// Euclidean distance between two points.
#[must_use]
pub fn distance(a: Point2D, b: Point2D) -> f64 {
    a.distance(b)
}

/// A straight segment between two endpoints.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct LineSegment {
    pub start: Point2D,
    pub end: Point2D,
}

impl LineSegment {
    #[must_use]
    pub const fn new(start: Point2D, end: Point2D) -> Self {
        Self { start, end }
    }

    #[must_use]
    pub fn bbox(&self) -> BoundingBox {
        BoundingBox::from_corners(self.start, self.end)
    }

    #[must_use]
    pub fn intersect(&self, other: &LineSegment) -> Option<Point2D> {
        segment_intersect(self.start, self.end, other.start, other.end)
    }
}

/// Axis-aligned bounding box used as a broad-phase filter.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct BoundingBox {
    pub min_x: f64,
    pub min_y: f64,
    pub max_x: f64,
    pub max_y: f64,
}

impl BoundingBox {
    /// Builds the box spanned by two arbitrary corners.
    #[must_use]
    pub fn from_corners(a: Point2D, b: Point2D) -> Self {
        Self {
            min_x: a.x.min(b.x),
            min_y: a.y.min(b.y),
            max_x: a.x.max(b.x),
            max_y: a.y.max(b.y),
        }
    }

    #[must_use]
    pub fn overlaps(&self, other: &BoundingBox) -> bool {
        bbox_overlap(self, other)
    }
}

/// Intersection point of segments `a1-a2` and `b1-b2`.
///
/// Returns `None` for parallel (including collinear) segments and when the solved
/// parameters fall outside `[0, 1]` on either segment.
#[must_use]
pub fn segment_intersect(a1: Point2D, a2: Point2D, b1: Point2D, b2: Point2D) -> Option<Point2D> {
    let r = a2.sub(a1);
    let s = b2.sub(b1);
    let denom = r.cross(s);
    if denom.abs() < PARALLEL_EPSILON {
        return None;
    }

    let qp = b1.sub(a1);
    let t = qp.cross(s) / denom;
    let u = qp.cross(r) / denom;
    if !(0.0..=1.0).contains(&t) || !(0.0..=1.0).contains(&u) {
        return None;
    }
    Some(a1.offset(r.x * t, r.y * t))
}

/// Intersection of segment `p1-p2` with a circle, nearest to `p1`.
///
/// A tangent touch (single contact point) counts as a miss.
#[must_use]
pub fn segment_circle_intersect(
    p1: Point2D,
    p2: Point2D,
    center: Point2D,
    radius: f64,
) -> Option<Point2D> {
    let d = p2.sub(p1);
    let f = p1.sub(center);
    let a = d.dot(d);
    if a < PARALLEL_EPSILON {
        return None;
    }
    let b = 2.0 * f.dot(d);
    let c = f.dot(f) - radius * radius;
    let discriminant = b * b - 4.0 * a * c;
    if discriminant <= 0.0 {
        return None;
    }

    let sqrt = discriminant.sqrt();
    let t1 = (-b - sqrt) / (2.0 * a);
    let t2 = (-b + sqrt) / (2.0 * a);
    let t = [t1, t2]
        .into_iter()
        .find(|t| (0.0..=1.0).contains(t))?;
    Some(p1.offset(d.x * t, d.y * t))
}

/// Closed-interval overlap on both axes.
///
/// Touching boxes count as overlapping so that degenerate (zero-width) ray boxes are
/// never filtered out.
#[must_use]
pub fn bbox_overlap(a: &BoundingBox, b: &BoundingBox) -> bool {
    a.min_x <= b.max_x && b.min_x <= a.max_x && a.min_y <= b.max_y && b.min_y <= a.max_y
}

/// Whether a disc touches or overlaps an axis-aligned rectangle.
#[must_use]
pub fn circle_rect_intersect(center: Point2D, radius: f64, rect: &Rect) -> bool {
    let nearest_x = center.x.clamp(rect.pos.x, rect.pos.x + rect.width);
    let nearest_y = center.y.clamp(rect.pos.y, rect.pos.y + rect.height);
    let dx = center.x - nearest_x;
    let dy = center.y - nearest_y;
    dx * dx + dy * dy <= radius * radius
}
