//! Geometry primitives shared by the sensor model and the motion resolver.
//!
//! Everything in this module is a plain value type or a pure function:
//!
//! - [`Point2D`], [`LineSegment`], [`BoundingBox`] - basic shapes
//! - [`Rect`] - axis-aligned rectangle used for the arena, obstacles and objectives
//! - [`segment_intersect`], [`segment_circle_intersect`], [`bbox_overlap`],
//!   [`circle_rect_intersect`] - intersection tests
//!
//! Coordinates are y-up. A rectangle's `pos` is its lower-left corner.

pub use self::{geometry::*, rect::*};

mod geometry;
mod rect;
