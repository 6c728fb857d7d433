//! Genetic algorithm over fuzzy rule tables.
//!
//! # Algorithm Overview
//!
//! Every generation runs one epoch with one robot per individual, then:
//!
//! 1. **Rank** - Individuals are stably sorted by fitness, best first
//! 2. **Elitism** - The top `elite_count` genomes are copied unchanged
//! 3. **Selection** - Parents are drawn as `uniform(0..population_size) % window`,
//!    so only the best `window` ranks can breed; the second parent is redrawn
//!    until it differs from the first
//! 4. **Breeding** - Depends on how many robots ate during the epoch:
//!    - fewer than `copy_threshold`: row-wise crossover, then mutation at
//!      `mutation_rate_high`
//!    - otherwise: the child copies the first parent, then mutation at
//!      `mutation_rate_low`
//!
//! The selection window is wide (`window_when_none_ate`) while no robot has found
//! food yet, and narrows (`window_when_some_ate`) once some have. The wider window
//! keeps diversity up while fitness only reflects distance to food.
//!
//! # Key Components
//!
//! - [`Individual`] - A genome and, once evaluated, its fitness
//! - [`Population`] - Fixed-size list of individuals
//! - [`PopulationEvolver`] - Breeding parameters and the breeding step

use std::cmp::Reverse;

use rand::Rng;
use simbot_evaluator::rule_table::RuleTable;

use crate::genome;

pub const DEFAULT_ELITE_COUNT: usize = 10;
pub const DEFAULT_CROSSOVER_RATE: f64 = 0.8;
pub const DEFAULT_MUTATION_RATE_LOW: f64 = 0.01;
pub const DEFAULT_MUTATION_RATE_HIGH: f64 = 0.02;
pub const DEFAULT_WINDOW_WHEN_NONE_ATE: usize = 20;
pub const DEFAULT_WINDOW_WHEN_SOME_ATE: usize = 5;
pub const DEFAULT_COPY_THRESHOLD: usize = 10;

#[derive(Debug, Clone, PartialEq, Eq, derive_more::Display, derive_more::Error)]
pub enum GeneticError {
    #[display("population of {size} is too small (need at least 2)")]
    PopulationTooSmall { size: usize },
    #[display("{elite_count} elites do not fit in a population of {population_size}")]
    TooManyElites {
        elite_count: usize,
        population_size: usize,
    },
    #[display("selection window {window} is too small (need at least 2)")]
    SelectionWindow { window: usize },
    #[display("population has not been evaluated")]
    NotEvaluated,
    #[display("expected {expected} evaluations, got {found}")]
    EvaluationCount { expected: usize, found: usize },
    #[display("genome has {found} rules, expected {expected}")]
    GenomeShape { expected: usize, found: usize },
}

/// Result of running an individual's genome through an epoch.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Evaluation {
    pub fitness: i64,
    pub eat_count: usize,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Individual {
    genome: RuleTable,
    evaluation: Option<Evaluation>,
}

impl Individual {
    #[must_use]
    pub fn new(genome: RuleTable) -> Self {
        Self {
            genome,
            evaluation: None,
        }
    }

    pub fn random<R>(rng: &mut R, rule_count: usize) -> Self
    where
        R: Rng + ?Sized,
    {
        Self::new(genome::random(rng, rule_count))
    }

    #[must_use]
    pub fn genome(&self) -> &RuleTable {
        &self.genome
    }

    /// `None` until the individual's epoch has been evaluated.
    #[must_use]
    pub fn evaluation(&self) -> Option<Evaluation> {
        self.evaluation
    }

    #[must_use]
    pub fn fitness(&self) -> Option<i64> {
        self.evaluation.map(|e| e.fitness)
    }

    #[must_use]
    pub fn has_eaten(&self) -> bool {
        self.evaluation.is_some_and(|e| e.eat_count > 0)
    }
}

/// A fixed-size population. After [`Population::assign_evaluations`] the
/// individuals are ordered best first.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Population {
    individuals: Vec<Individual>,
}

impl Population {
    pub fn random<R>(rng: &mut R, size: usize, rule_count: usize) -> Result<Self, GeneticError>
    where
        R: Rng + ?Sized,
    {
        check_population_size(size)?;
        let individuals = (0..size)
            .map(|_| Individual::random(rng, rule_count))
            .collect();
        Ok(Self { individuals })
    }

    /// Builds a population from existing genomes, which must all have the same
    /// number of rules.
    pub fn from_genomes(genomes: Vec<RuleTable>) -> Result<Self, GeneticError> {
        check_population_size(genomes.len())?;
        let expected = genomes[0].rule_count();
        if let Some(genome) = genomes.iter().find(|g| g.rule_count() != expected) {
            return Err(GeneticError::GenomeShape {
                expected,
                found: genome.rule_count(),
            });
        }
        Ok(Self {
            individuals: genomes.into_iter().map(Individual::new).collect(),
        })
    }

    #[must_use]
    pub fn individuals(&self) -> &[Individual] {
        &self.individuals
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.individuals.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.individuals.is_empty()
    }

    /// Rules per genome, shared by every individual.
    #[must_use]
    pub fn rule_count(&self) -> usize {
        self.individuals
            .first()
            .map_or(0, |ind| ind.genome.rule_count())
    }

    pub fn genomes(&self) -> impl Iterator<Item = &RuleTable> {
        self.individuals.iter().map(Individual::genome)
    }

    #[must_use]
    pub fn is_evaluated(&self) -> bool {
        self.individuals.iter().all(|ind| ind.evaluation.is_some())
    }

    /// Attaches one evaluation per individual (in current order) and ranks the
    /// population by fitness, best first. Ties keep their previous order.
    pub fn assign_evaluations(&mut self, evaluations: Vec<Evaluation>) -> Result<(), GeneticError> {
        if evaluations.len() != self.individuals.len() {
            return Err(GeneticError::EvaluationCount {
                expected: self.individuals.len(),
                found: evaluations.len(),
            });
        }
        for (ind, evaluation) in self.individuals.iter_mut().zip(evaluations) {
            ind.evaluation = Some(evaluation);
        }
        self.individuals
            .sort_by_key(|ind| Reverse(ind.fitness().unwrap_or(i64::MIN)));
        Ok(())
    }

    /// Number of individuals whose robot ate at least once.
    #[must_use]
    pub fn eaten_count(&self) -> usize {
        self.individuals.iter().filter(|ind| ind.has_eaten()).count()
    }

    #[must_use]
    pub fn best(&self) -> Option<&Individual> {
        self.individuals.first().filter(|ind| ind.evaluation.is_some())
    }

    #[must_use]
    pub fn best_fitness(&self) -> Option<i64> {
        self.best().and_then(Individual::fitness)
    }

    #[expect(clippy::cast_precision_loss)]
    #[must_use]
    pub fn average_fitness(&self) -> Option<f64> {
        let total = self
            .individuals
            .iter()
            .map(Individual::fitness)
            .sum::<Option<i64>>()?;
        Some(total as f64 / self.individuals.len() as f64)
    }
}

fn check_population_size(size: usize) -> Result<(), GeneticError> {
    if size < 2 {
        return Err(GeneticError::PopulationTooSmall { size });
    }
    Ok(())
}

/// Controls how one generation breeds the next.
#[derive(Debug, Clone, PartialEq)]
pub struct PopulationEvolver {
    /// Number of top individuals copied unchanged.
    pub elite_count: usize,
    /// Per-row crossover probability.
    pub crossover_rate: f64,
    /// Per-cell mutation probability when at least `copy_threshold` robots ate.
    pub mutation_rate_low: f64,
    /// Per-cell mutation probability otherwise.
    pub mutation_rate_high: f64,
    /// Selection window while no robot has eaten.
    pub window_when_none_ate: usize,
    /// Selection window once at least one robot has eaten.
    pub window_when_some_ate: usize,
    /// Robots that must eat before children become mutated copies.
    pub copy_threshold: usize,
}

impl Default for PopulationEvolver {
    fn default() -> Self {
        Self {
            elite_count: DEFAULT_ELITE_COUNT,
            crossover_rate: DEFAULT_CROSSOVER_RATE,
            mutation_rate_low: DEFAULT_MUTATION_RATE_LOW,
            mutation_rate_high: DEFAULT_MUTATION_RATE_HIGH,
            window_when_none_ate: DEFAULT_WINDOW_WHEN_NONE_ATE,
            window_when_some_ate: DEFAULT_WINDOW_WHEN_SOME_ATE,
            copy_threshold: DEFAULT_COPY_THRESHOLD,
        }
    }
}

impl PopulationEvolver {
    /// Checks the parameters against a population size.
    pub fn validate(&self, population_size: usize) -> Result<(), GeneticError> {
        check_population_size(population_size)?;
        if self.elite_count > population_size {
            return Err(GeneticError::TooManyElites {
                elite_count: self.elite_count,
                population_size,
            });
        }
        for window in [self.window_when_none_ate, self.window_when_some_ate] {
            if window < 2 {
                return Err(GeneticError::SelectionWindow { window });
            }
        }
        Ok(())
    }

    #[must_use]
    pub fn selection_window(&self, eaten_count: usize) -> usize {
        if eaten_count == 0 {
            self.window_when_none_ate
        } else {
            self.window_when_some_ate
        }
    }

    /// Draws two distinct rank indices below `window`.
    ///
    /// Requires `population_size >= 2` and `window >= 2` (see [`Self::validate`]).
    pub fn select_parents<R>(population_size: usize, window: usize, rng: &mut R) -> (usize, usize)
    where
        R: Rng + ?Sized,
    {
        let first = rng.random_range(0..population_size) % window;
        loop {
            let second = rng.random_range(0..population_size) % window;
            if second != first {
                return (first, second);
            }
        }
    }

    /// Breeds the next generation from an evaluated population.
    pub fn evolve<R>(&self, population: &Population, rng: &mut R) -> Result<Population, GeneticError>
    where
        R: Rng + ?Sized,
    {
        let size = population.len();
        self.validate(size)?;
        if !population.is_evaluated() {
            return Err(GeneticError::NotEvaluated);
        }

        let eaten = population.eaten_count();
        let window = self.selection_window(eaten);
        let parents = &population.individuals;

        let mut next = Vec::with_capacity(size);
        next.extend(
            parents[..self.elite_count]
                .iter()
                .map(|ind| Individual::new(ind.genome.clone())),
        );

        while next.len() < size {
            let (i, j) = Self::select_parents(size, window, rng);
            let child = if eaten < self.copy_threshold {
                let (p1, p2) = (&parents[i].genome, &parents[j].genome);
                let mut child = genome::crossover(p1, p2, self.crossover_rate, rng);
                genome::mutate(&mut child, self.mutation_rate_high, rng);
                child
            } else {
                let mut child = parents[i].genome.clone();
                genome::mutate(&mut child, self.mutation_rate_low, rng);
                child
            };
            next.push(Individual::new(child));
        }

        Ok(Population { individuals: next })
    }
}

#[cfg(test)]
mod tests {
    use rand::SeedableRng as _;
    use rand_pcg::Pcg32;
    use simbot_evaluator::rule_table::RULE_LENGTH;

    use super::*;

    fn evaluated(rng: &mut Pcg32, size: usize, eaters: usize) -> Population {
        let mut population = Population::random(rng, size, 4).unwrap();
        #[expect(clippy::cast_possible_wrap)]
        let evaluations = (0..size)
            .map(|i| Evaluation {
                fitness: i as i64,
                eat_count: usize::from(i < eaters),
            })
            .collect();
        population.assign_evaluations(evaluations).unwrap();
        population
    }

    #[test]
    fn test_population_size_checks() {
        let mut rng = Pcg32::seed_from_u64(0);
        assert_eq!(
            Population::random(&mut rng, 1, 4),
            Err(GeneticError::PopulationTooSmall { size: 1 })
        );
        assert!(Population::random(&mut rng, 2, 4).is_ok());

        let evolver = PopulationEvolver {
            elite_count: 3,
            ..PopulationEvolver::default()
        };
        assert_eq!(
            evolver.validate(2),
            Err(GeneticError::TooManyElites {
                elite_count: 3,
                population_size: 2
            })
        );

        let evolver = PopulationEvolver {
            elite_count: 0,
            window_when_some_ate: 1,
            ..PopulationEvolver::default()
        };
        assert_eq!(
            evolver.validate(10),
            Err(GeneticError::SelectionWindow { window: 1 })
        );
    }

    #[test]
    fn test_ranking_is_stable_and_descending() {
        let genomes = (0..4u8)
            .map(|i| RuleTable::new(vec![[i; RULE_LENGTH]]))
            .collect();
        let mut population = Population::from_genomes(genomes).unwrap();
        assert_eq!(population.best_fitness(), None);
        assert_eq!(population.average_fitness(), None);

        let evaluations = [5, 9, 5, 1]
            .into_iter()
            .map(|fitness| Evaluation {
                fitness,
                eat_count: 0,
            })
            .collect();
        population.assign_evaluations(evaluations).unwrap();

        let order = population
            .genomes()
            .map(|g| g.rules()[0][0])
            .collect::<Vec<_>>();
        assert_eq!(order, [1, 0, 2, 3]);
        assert_eq!(population.best_fitness(), Some(9));
        assert_eq!(population.average_fitness(), Some(5.0));
    }

    #[test]
    fn test_evolve_requires_evaluation() {
        let mut rng = Pcg32::seed_from_u64(0);
        let population = Population::random(&mut rng, 20, 4).unwrap();
        assert_eq!(
            PopulationEvolver::default().evolve(&population, &mut rng),
            Err(GeneticError::NotEvaluated)
        );
    }

    #[test]
    fn test_elites_survive_unchanged() {
        let mut rng = Pcg32::seed_from_u64(42);
        let population = evaluated(&mut rng, 30, 0);
        let evolver = PopulationEvolver::default();
        let next = evolver.evolve(&population, &mut rng).unwrap();

        assert_eq!(next.len(), population.len());
        for (old, new) in population.individuals()[..evolver.elite_count]
            .iter()
            .zip(next.individuals())
        {
            assert_eq!(old.genome(), new.genome());
        }
        assert!(next.individuals().iter().all(|ind| ind.evaluation().is_none()));
    }

    #[test]
    fn test_selection_draws_stay_in_window() {
        let evolver = PopulationEvolver::default();
        let mut rng = Pcg32::seed_from_u64(9);
        for (eaten, expected_window) in [(0, 20), (1, 5), (50, 5)] {
            let window = evolver.selection_window(eaten);
            assert_eq!(window, expected_window);
            for _ in 0..1000 {
                let (i, j) = PopulationEvolver::select_parents(100, window, &mut rng);
                assert!(i < window && j < window, "({i}, {j}) outside window {window}");
                assert_ne!(i, j);
            }
        }
    }

    #[test]
    fn test_many_eaters_breed_mutated_copies() {
        let mut rng = Pcg32::seed_from_u64(5);
        let population = evaluated(&mut rng, 20, 15);
        let evolver = PopulationEvolver {
            elite_count: 2,
            mutation_rate_low: 0.0,
            ..PopulationEvolver::default()
        };
        let next = evolver.evolve(&population, &mut rng).unwrap();
        let window_genomes = population.genomes().take(5).collect::<Vec<_>>();
        for child in &next.individuals()[2..] {
            assert!(
                window_genomes.contains(&child.genome()),
                "without mutation every child is a copy of a top-5 parent"
            );
        }
    }

    /// `size` genomes whose cells all hold their individual's index; fitness
    /// equals the index, so rank `r` holds value `size - 1 - r`.
    fn uniform_rows(size: u8, eaters: usize) -> Population {
        let genomes = (0..size)
            .map(|v| RuleTable::new(vec![[v; RULE_LENGTH]; 4]))
            .collect();
        let mut population = Population::from_genomes(genomes).unwrap();
        let evaluations = (0..size)
            .map(|v| Evaluation {
                fitness: i64::from(v),
                eat_count: usize::from(usize::from(v) < eaters),
            })
            .collect();
        population.assign_evaluations(evaluations).unwrap();
        population
    }

    #[test]
    fn test_mixed_genome_shapes_are_rejected() {
        let genomes = (0..10)
            .map(|i| RuleTable::zeroed(3 + i % 2))
            .collect();
        assert_eq!(
            Population::from_genomes(genomes),
            Err(GeneticError::GenomeShape {
                expected: 3,
                found: 4
            })
        );
    }

    #[test]
    fn test_few_eaters_breed_crossed_children() {
        let mut rng = Pcg32::seed_from_u64(11);
        let population = uniform_rows(30, 3);
        let evolver = PopulationEvolver {
            elite_count: 2,
            mutation_rate_high: 0.0,
            ..PopulationEvolver::default()
        };
        let next = evolver.evolve(&population, &mut rng).unwrap();
        // Someone ate, so only the top 5 ranks (values 25..=29) breed.
        let in_window = |v: u8| (25..30).contains(&v);

        let mut crossed_rows = 0;
        for child in &next.individuals()[2..] {
            let rows = child.genome().rules();
            let first = rows[0][0];
            assert!(in_window(first), "{rows:?}");
            let mut second = None;
            for row in rows {
                assert_eq!(row[0], first, "every row starts with the first parent");
                let cut = row.iter().position(|&v| v != first).unwrap_or(RULE_LENGTH);
                if cut == RULE_LENGTH {
                    continue;
                }
                crossed_rows += 1;
                let other = row[cut];
                assert!(in_window(other), "{row:?}");
                assert!(row[cut..].iter().all(|&v| v == other), "{row:?}");
                assert_eq!(*second.get_or_insert(other), other, "one second parent per child");
            }
        }
        assert!(crossed_rows > 0);
    }

    #[test]
    fn test_few_eaters_use_high_mutation_rate() {
        let mut rng = Pcg32::seed_from_u64(12);
        let population = uniform_rows(30, 0);
        let evolver = PopulationEvolver {
            elite_count: 2,
            crossover_rate: 0.0,
            mutation_rate_low: 0.0,
            mutation_rate_high: 1.0,
            ..PopulationEvolver::default()
        };
        let next = evolver.evolve(&population, &mut rng).unwrap();
        // Nobody ate: window of 20 (values 10..=29), every cell complemented.
        for child in &next.individuals()[2..] {
            let v = child.genome().rules()[0][0];
            assert!((255 - 29..=255 - 10).contains(&v), "{v}");
            assert!(child.genome().rules().iter().flatten().all(|&c| c == v));
        }
    }
}
