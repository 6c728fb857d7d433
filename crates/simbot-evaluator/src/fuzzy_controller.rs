//! Hand-tuned fuzzy controller.
//!
//! A fixed rule base that drives robots toward food without any training. Sensors
//! are grouped into four directions, each reduced to the minimum reading of its
//! slots (assuming the default eight sensors at 45° steps, slot 0 straight ahead
//! and slots increasing clockwise):
//!
//! | Group | Slots     | Near/far ramp |
//! |-------|-----------|---------------|
//! | front | 0         | 15 → 30       |
//! | right | 1, 2      | 8 → 30        |
//! | back  | 3, 4, 5   | 15 → 30       |
//! | left  | 6, 7      | 8 → 30        |
//!
//! Smell zones saturate at ±90° with a ±45° center. Like the rule-table
//! interpreter, each rule fires with the product of its antecedents and the
//! output is the activation-weighted sum of all rules.

use crate::{
    controller::{Command, RobotController, SensorReading},
    membership::{Ramp, SmellZone, SmellZones},
};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Group {
    Front,
    Right,
    Back,
    Left,
}

impl Group {
    const fn slots(self) -> &'static [usize] {
        match self {
            Group::Front => &[0],
            Group::Right => &[1, 2],
            Group::Back => &[3, 4, 5],
            Group::Left => &[6, 7],
        }
    }

    const fn ramp(self) -> Ramp {
        match self {
            Group::Front | Group::Back => Ramp::new(15.0, 30.0),
            Group::Right | Group::Left => Ramp::new(8.0, 30.0),
        }
    }

    /// Closest reading in the group. Missing slots read as open space.
    fn reading(self, reading: &SensorReading) -> f64 {
        self.slots()
            .iter()
            .map(|&slot| reading.distance_or(slot, f64::INFINITY))
            .fold(f64::INFINITY, f64::min)
    }
}

#[derive(Debug, Clone, Copy)]
enum Term {
    Near(Group),
    Far(Group),
    Smell(SmellZone),
}

use self::{
    Group::{Back, Front, Left, Right},
    Term::{Far, Near, Smell},
};

#[derive(Debug)]
struct HandRule {
    when: &'static [Term],
    turn: f64,
    step: f64,
}

const fn rule(when: &'static [Term], turn: f64, step: f64) -> HandRule {
    HandRule { when, turn, step }
}

const RULES: [HandRule; 13] = [
    rule(&[Far(Front)], 0.0, 5.0),
    rule(&[Near(Right)], -45.0, 0.0),
    rule(&[Near(Left)], 45.0, 0.0),
    rule(&[Smell(SmellZone::Left)], -30.0, 0.0),
    rule(&[Smell(SmellZone::Right)], 30.0, 0.0),
    rule(&[Smell(SmellZone::Center), Far(Left), Far(Right)], 0.0, 5.0),
    rule(&[Near(Back), Smell(SmellZone::Center)], 0.0, 2.0),
    // Corridor: walls on both sides, open ahead.
    rule(&[Near(Left), Near(Right), Far(Front)], 0.0, 5.0),
    rule(&[Near(Front), Near(Right), Far(Left)], -60.0, 0.0),
    rule(&[Near(Front), Near(Left), Far(Right)], 60.0, 0.0),
    // Dead end: turn around.
    rule(&[Near(Front), Near(Left), Near(Right), Far(Back)], 180.0, 1.0),
    rule(&[Near(Front), Near(Left), Near(Right), Near(Back)], 120.0, 0.0),
    rule(&[Near(Front), Far(Left), Far(Right), Far(Back)], -120.0, -1.0),
];

/// The fixed 13-rule fuzzy policy.
#[derive(Debug, Clone, Copy)]
pub struct HandTunedController {
    smell_zones: SmellZones,
}

impl Default for HandTunedController {
    fn default() -> Self {
        Self::new()
    }
}

impl HandTunedController {
    #[must_use]
    pub const fn new() -> Self {
        Self {
            smell_zones: SmellZones::new(90.0, 45.0),
        }
    }

    fn membership(&self, term: Term, reading: &SensorReading) -> f64 {
        match term {
            Near(group) => group.ramp().near(group.reading(reading)),
            Far(group) => group.ramp().far(group.reading(reading)),
            Smell(zone) => self.smell_zones.membership(zone, reading.smell),
        }
    }

    #[must_use]
    pub fn command(&self, reading: &SensorReading) -> Command {
        RULES.iter().fold(Command::default(), |acc, rule| {
            let activation: f64 = rule
                .when
                .iter()
                .map(|&term| self.membership(term, reading))
                .product();
            Command::new(
                acc.turn + rule.turn * activation,
                acc.step + rule.step * activation,
            )
        })
    }
}

impl RobotController for HandTunedController {
    fn decide(&mut self, reading: &SensorReading) -> Command {
        self.command(reading)
    }
}
