//! Genetic operators over rule-table genomes.
//!
//! These are the building blocks used by
//! [`genetic::PopulationEvolver`](crate::genetic::PopulationEvolver):
//!
//! - **Initialization**: [`random`] fills every cell uniformly in `[0, 255]`
//! - **Crossover**: [`crossover`] recombines two genomes row by row, using
//!   [`byte_crossover`] on the rows it selects
//! - **Mutation**: [`mutate`] complements cells (`255 - v`)
//!
//! # Byte-Level Crossover
//!
//! Each cell is treated as one byte. A cut point `c` in `1..RULE_LENGTH` splits
//! both parent rows; the child row keeps the first parent's bytes before `c` and
//! takes the second parent's bytes from `c` on:
//!
//! ```text
//! parent a: a0 a1 a2 | a3 ... a10
//! parent b: b0 b1 b2 | b3 ... b10
//! child   : a0 a1 a2 | b3 ... b10      (c = 3)
//! ```
//!
//! Only that first child is kept; the mirrored one is discarded.

use rand::Rng;
use simbot_evaluator::rule_table::{RULE_LENGTH, Rule, RuleTable};

/// A genome of `rule_count` rows with every cell uniform in `[0, 255]`.
pub fn random<R>(rng: &mut R, rule_count: usize) -> RuleTable
where
    R: Rng + ?Sized,
{
    let rules = (0..rule_count)
        .map(|_| std::array::from_fn(|_| rng.random()))
        .collect();
    RuleTable::new(rules)
}

/// Single-cut crossover of two rows at `cut`.
///
/// # Panics
///
/// Panics if `cut > RULE_LENGTH`.
#[must_use]
pub fn byte_crossover(a: &Rule, b: &Rule, cut: usize) -> Rule {
    let mut child = *a;
    child[cut..].copy_from_slice(&b[cut..]);
    child
}

/// Row-wise crossover: each row is crossed with probability `rate` at a random
/// cut, otherwise copied from `p1`.
///
/// # Panics
///
/// Panics if the parents have different rule counts.
pub fn crossover<R>(p1: &RuleTable, p2: &RuleTable, rate: f64, rng: &mut R) -> RuleTable
where
    R: Rng + ?Sized,
{
    assert_eq!(p1.rule_count(), p2.rule_count());
    let rules = p1
        .rules()
        .iter()
        .zip(p2.rules())
        .map(|(a, b)| {
            if rng.random_bool(rate) {
                let cut = rng.random_range(1..RULE_LENGTH);
                byte_crossover(a, b, cut)
            } else {
                *a
            }
        })
        .collect();
    RuleTable::new(rules)
}

/// Complements each cell independently with probability `rate`.
pub fn mutate<R>(genome: &mut RuleTable, rate: f64, rng: &mut R)
where
    R: Rng + ?Sized,
{
    for cell in genome.rules_mut().iter_mut().flatten() {
        if rng.random_bool(rate) {
            *cell = u8::MAX - *cell;
        }
    }
}
