//! Fuzzy membership functions over sensor readings.
//!
//! All functions return a degree of truth in `[0, 1]`.
//!
//! # Distance Ramps
//!
//! A [`Ramp`] describes the "far" predicate of a distance sensor: 0 at or below
//! `low`, 1 at or above `high`, linear in between. "Near" is always its complement.
//!
//! ```text
//!  far  1 ┤        ┌──────
//!         │       /
//!       0 ┼──────┘
//!              low  high
//! ```
//!
//! # Smell Zones
//!
//! [`SmellZones`] split the bearing to an objective into three bands: left
//! (negative bearings), right (positive bearings) and center (symmetric around 0).
//! Each zone peaks at 1 on its characteristic angle and is 0 outside its band.

use serde::{Deserialize, Serialize};

/// Linear "far" ramp between two distance thresholds.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Ramp {
    pub low: f64,
    pub high: f64,
}

impl Ramp {
    #[must_use]
    pub const fn new(low: f64, high: f64) -> Self {
        Self { low, high }
    }

    #[must_use]
    pub fn far(&self, value: f64) -> f64 {
        if value <= self.low {
            0.0
        } else if value >= self.high {
            1.0
        } else {
            (value - self.low) / (self.high - self.low)
        }
    }

    #[must_use]
    pub fn near(&self, value: f64) -> f64 {
        1.0 - self.far(value)
    }
}

/// The three bearing zones used for smell memberships.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum SmellZone {
    Left,
    Center,
    Right,
}

/// Widths of the smell zones, in degrees.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct SmellZones {
    /// Bearing magnitude at which left/right reach full membership.
    pub side_span: f64,
    /// Half-width of the center zone.
    pub center_span: f64,
}

impl SmellZones {
    #[must_use]
    pub const fn new(side_span: f64, center_span: f64) -> Self {
        Self {
            side_span,
            center_span,
        }
    }

    #[must_use]
    pub fn membership(&self, zone: SmellZone, bearing: f64) -> f64 {
        match zone {
            SmellZone::Left => (-bearing / self.side_span).clamp(0.0, 1.0),
            SmellZone::Right => (bearing / self.side_span).clamp(0.0, 1.0),
            SmellZone::Center => {
                if bearing.abs() >= self.center_span {
                    0.0
                } else {
                    1.0 - bearing.abs() / self.center_span
                }
            }
        }
    }
}
