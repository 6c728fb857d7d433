//! Integer-encoded fuzzy rule tables (the evolvable genome) and their interpreter.
//!
//! A [`RuleTable`] is a fixed number of rows, each [`RULE_LENGTH`] cells in
//! `[0, 255]`. Each row encodes one fuzzy rule through residues of its cells:
//!
//! | Column | Residue | Meaning |
//! |--------|---------|---------|
//! | 0..=7  | `% 3`   | sensor slot term: 0 unused, 1 near, 2 far |
//! | 8      | `% 4`   | smell zone: 0 unused, 1 left, 2 center, 3 right |
//! | 9      | `% 91`  | turn contribution, offset by -45 (`[-45, 45]` degrees) |
//! | 10     | `% 11`  | move contribution (`[0, 10]` units) |
//!
//! A rule's activation is the product of its selected memberships (1.0 when none
//! are selected). The controller output is the activation-weighted sum of every
//! rule's turn and move, not the output of a single winning rule.
//!
//! Rule tables persist as CSV: one row per rule, [`RULE_LENGTH`] integer columns.

use std::{
    fs::File,
    io::{self, BufRead, BufReader, BufWriter, Write},
    path::Path,
};

use crate::{
    controller::{Command, RobotController, SensorReading},
    membership::{Ramp, SmellZone, SmellZones},
};

/// Cells per rule row.
pub const RULE_LENGTH: usize = 11;
/// Leading columns mapped to distance sensor slots.
pub const SENSOR_COLUMNS: usize = 8;

const SMELL_COLUMN: usize = 8;
const TURN_COLUMN: usize = 9;
const MOVE_COLUMN: usize = 10;

const TURN_RESIDUES: u8 = 91;
const TURN_OFFSET: f64 = -45.0;
const MOVE_RESIDUES: u8 = 11;

/// Distance ramp used by rule tables: far rises from 0 to 1 over `[0, 100]`.
pub const RULE_TABLE_RAMP: Ramp = Ramp::new(0.0, 100.0);
/// Smell zones used by rule tables: sides saturate at ±180°, center spans ±45°.
pub const RULE_TABLE_SMELL_ZONES: SmellZones = SmellZones::new(180.0, 45.0);

/// One encoded rule row.
pub type Rule = [u8; RULE_LENGTH];

/// Sensor term selected by a residue modulo 3.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SensorTerm {
    Unused,
    Near,
    Far,
}

const SENSOR_TERMS: [SensorTerm; 3] = [SensorTerm::Unused, SensorTerm::Near, SensorTerm::Far];

impl SensorTerm {
    #[must_use]
    pub fn from_gene(gene: u8) -> Self {
        SENSOR_TERMS[usize::from(gene) % SENSOR_TERMS.len()]
    }

    fn membership(self, ramp: &Ramp, distance: f64) -> f64 {
        match self {
            SensorTerm::Unused => 1.0,
            SensorTerm::Near => ramp.near(distance),
            SensorTerm::Far => ramp.far(distance),
        }
    }
}

/// Smell term selected by a residue modulo 4.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SmellTerm {
    Unused,
    Zone(SmellZone),
}

const SMELL_TERMS: [SmellTerm; 4] = [
    SmellTerm::Unused,
    SmellTerm::Zone(SmellZone::Left),
    SmellTerm::Zone(SmellZone::Center),
    SmellTerm::Zone(SmellZone::Right),
];

impl SmellTerm {
    #[must_use]
    pub fn from_gene(gene: u8) -> Self {
        SMELL_TERMS[usize::from(gene) % SMELL_TERMS.len()]
    }

    fn membership(self, zones: &SmellZones, bearing: f64) -> f64 {
        match self {
            SmellTerm::Unused => 1.0,
            SmellTerm::Zone(zone) => zones.membership(zone, bearing),
        }
    }
}

/// A rule row after decoding.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct DecodedRule {
    pub sensors: [SensorTerm; SENSOR_COLUMNS],
    pub smell: SmellTerm,
    pub turn: f64,
    pub step: f64,
}

impl DecodedRule {
    #[must_use]
    pub fn from_rule(rule: &Rule) -> Self {
        Self {
            sensors: std::array::from_fn(|slot| SensorTerm::from_gene(rule[slot])),
            smell: SmellTerm::from_gene(rule[SMELL_COLUMN]),
            turn: f64::from(rule[TURN_COLUMN] % TURN_RESIDUES) + TURN_OFFSET,
            step: f64::from(rule[MOVE_COLUMN] % MOVE_RESIDUES),
        }
    }

    /// Product of the selected memberships for `reading`.
    ///
    /// Sensor terms whose slot the arena does not provide are ignored.
    #[must_use]
    pub fn activation(&self, reading: &SensorReading, ramp: &Ramp, zones: &SmellZones) -> f64 {
        let sensors: f64 = self
            .sensors
            .iter()
            .zip(&reading.distances)
            .map(|(term, distance)| term.membership(ramp, *distance))
            .product();
        sensors * self.smell.membership(zones, reading.smell)
    }
}

/// Problems loading a rule table.
#[derive(Debug, derive_more::Display, derive_more::Error)]
pub enum RuleTableError {
    #[display("rule table I/O failed: {source}")]
    Io { source: io::Error },
    #[display("line {line}, column {column}: {value:?} is not an integer in [0, 255]")]
    InvalidCell {
        line: usize,
        column: usize,
        value: String,
    },
    #[display("line {line}: expected {expected} columns, found {found}")]
    RowLength {
        line: usize,
        expected: usize,
        found: usize,
    },
    #[display("expected {expected} rules, found {found}")]
    RuleCount { expected: usize, found: usize },
}

impl From<io::Error> for RuleTableError {
    fn from(source: io::Error) -> Self {
        Self::Io { source }
    }
}

/// A fixed-shape fuzzy rule genome.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct RuleTable {
    rules: Vec<Rule>,
}

impl RuleTable {
    #[must_use]
    pub fn new(rules: Vec<Rule>) -> Self {
        Self { rules }
    }

    /// A table of `rule_count` all-zero rows.
    #[must_use]
    pub fn zeroed(rule_count: usize) -> Self {
        Self::new(vec![[0; RULE_LENGTH]; rule_count])
    }

    #[must_use]
    pub fn rules(&self) -> &[Rule] {
        &self.rules
    }

    /// Mutable access to the rows. The slice keeps the table's shape fixed.
    pub fn rules_mut(&mut self) -> &mut [Rule] {
        &mut self.rules
    }

    #[must_use]
    pub fn rule_count(&self) -> usize {
        self.rules.len()
    }

    #[must_use]
    pub fn decode(&self) -> Vec<DecodedRule> {
        self.rules.iter().map(DecodedRule::from_rule).collect()
    }

    pub fn write_csv<W>(&self, writer: &mut W) -> io::Result<()>
    where
        W: Write + ?Sized,
    {
        for rule in &self.rules {
            let row = rule.map(|cell| cell.to_string()).join(",");
            writeln!(writer, "{row}")?;
        }
        Ok(())
    }

    /// Parses a CSV rule table, rejecting any shape other than
    /// `expected_rules` × [`RULE_LENGTH`]. Blank lines are skipped.
    pub fn read_csv<R>(reader: R, expected_rules: usize) -> Result<Self, RuleTableError>
    where
        R: BufRead,
    {
        let mut rules = Vec::with_capacity(expected_rules);
        for (index, line) in reader.lines().enumerate() {
            let line = line?;
            let line_no = index + 1;
            if line.trim().is_empty() {
                continue;
            }

            let cells = line.split(',').map(str::trim).collect::<Vec<_>>();
            if cells.len() != RULE_LENGTH {
                return Err(RuleTableError::RowLength {
                    line: line_no,
                    expected: RULE_LENGTH,
                    found: cells.len(),
                });
            }

            let mut rule = [0; RULE_LENGTH];
            for (column, (cell, value)) in rule.iter_mut().zip(cells).enumerate() {
                *cell = value.parse().map_err(|_| RuleTableError::InvalidCell {
                    line: line_no,
                    column: column + 1,
                    value: value.to_owned(),
                })?;
            }
            rules.push(rule);
        }

        if rules.len() != expected_rules {
            return Err(RuleTableError::RuleCount {
                expected: expected_rules,
                found: rules.len(),
            });
        }
        Ok(Self::new(rules))
    }

    pub fn save<P>(&self, path: P) -> Result<(), RuleTableError>
    where
        P: AsRef<Path>,
    {
        let mut writer = BufWriter::new(File::create(path)?);
        self.write_csv(&mut writer)?;
        writer.flush()?;
        Ok(())
    }

    pub fn load<P>(path: P, expected_rules: usize) -> Result<Self, RuleTableError>
    where
        P: AsRef<Path>,
    {
        let reader = BufReader::new(File::open(path)?);
        Self::read_csv(reader, expected_rules)
    }
}

/// Drives a robot from a decoded rule table.
#[derive(Debug, Clone)]
pub struct RuleTableController {
    rules: Vec<DecodedRule>,
    ramp: Ramp,
    zones: SmellZones,
}

impl RuleTableController {
    /// Uses the standard rule-table memberships ([`RULE_TABLE_RAMP`],
    /// [`RULE_TABLE_SMELL_ZONES`]).
    #[must_use]
    pub fn new(table: &RuleTable) -> Self {
        Self::with_memberships(table, RULE_TABLE_RAMP, RULE_TABLE_SMELL_ZONES)
    }

    #[must_use]
    pub fn with_memberships(table: &RuleTable, ramp: Ramp, zones: SmellZones) -> Self {
        Self {
            rules: table.decode(),
            ramp,
            zones,
        }
    }

    /// Activation-weighted blend of every rule's turn and move.
    #[must_use]
    pub fn command(&self, reading: &SensorReading) -> Command {
        self.rules
            .iter()
            .fold(Command::default(), |acc, rule| {
                let activation = rule.activation(reading, &self.ramp, &self.zones);
                Command::new(
                    acc.turn + rule.turn * activation,
                    acc.step + rule.step * activation,
                )
            })
    }
}

impl RobotController for RuleTableController {
    fn decide(&mut self, reading: &SensorReading) -> Command {
        self.command(reading)
    }
}
