//! The generation loop: epoch, evaluation, persistence and breeding.
//!
//! [`GeneticOptimizer`] owns the population, the GA random stream and the fitness
//! history. It alternates between two phases:
//!
//! ```text
//!            run_epoch                 breed
//! AwaitingEpoch ─────────→ Evaluated ─────────→ AwaitingEpoch (generation + 1)
//! ```
//!
//! Fitness (and therefore the best genome) can only be read in the `Evaluated`
//! phase, between the end of an epoch and the next breeding step.
//!
//! All GA randomness comes from a single `Pcg32` seeded once: initialization
//! first, then, per generation, selection draws, crossover decisions and mutation
//! decisions in breeding order. Two optimizers built with the same seed and
//! arena produce identical histories.

use std::path::Path;

use rand::SeedableRng as _;
use rand_pcg::Pcg32;
use simbot_engine::Arena;
use simbot_evaluator::{
    controller::BoxedController,
    fitness::{FitnessFunction, FoodFitness},
    rule_table::{RuleTableController, RuleTableError},
    session::{EpochError, EpochRunner},
};

use crate::{
    genetic::{Evaluation, GeneticError, Individual, Population, PopulationEvolver},
    history::{FitnessHistory, GenerationRecord},
};

pub const DEFAULT_POPULATION_SIZE: usize = 100;
pub const DEFAULT_RULE_COUNT: usize = 16;

#[derive(Debug, Clone, Copy, PartialEq, Eq, derive_more::Display, derive_more::IsVariant)]
pub enum Phase {
    #[display("awaiting an epoch")]
    AwaitingEpoch,
    #[display("evaluated")]
    Evaluated,
}

#[derive(Debug, Clone, PartialEq, Eq, derive_more::Display, derive_more::Error)]
#[display("optimizer is {actual}, but this step needs it to be {expected}")]
pub struct PhaseError {
    pub expected: Phase,
    pub actual: Phase,
}

#[derive(Debug, derive_more::Display, derive_more::Error, derive_more::From)]
pub enum OptimizerError {
    #[display("genetic algorithm error: {_0}")]
    Genetic(GeneticError),
    #[display("epoch failed: {_0}")]
    Epoch(EpochError),
    #[display("failed to persist genome: {_0}")]
    Persist(RuleTableError),
    #[display("{_0}")]
    Phase(PhaseError),
}

#[derive(Debug, Clone, PartialEq)]
pub struct OptimizerConfig {
    pub population_size: usize,
    pub rule_count: usize,
    pub seed: u64,
    pub evolver: PopulationEvolver,
    pub runner: EpochRunner,
}

impl Default for OptimizerConfig {
    fn default() -> Self {
        Self {
            population_size: DEFAULT_POPULATION_SIZE,
            rule_count: DEFAULT_RULE_COUNT,
            seed: 0,
            evolver: PopulationEvolver::default(),
            runner: EpochRunner::default(),
        }
    }
}

#[derive(Debug)]
pub struct GeneticOptimizer<F = FoodFitness> {
    evolver: PopulationEvolver,
    runner: EpochRunner,
    fitness: F,
    rng: Pcg32,
    population: Population,
    generation: usize,
    phase: Phase,
    history: FitnessHistory,
}

impl<F> GeneticOptimizer<F>
where
    F: FitnessFunction,
{
    /// Starts from a random population drawn from the seeded stream.
    pub fn new(config: OptimizerConfig, fitness: F) -> Result<Self, OptimizerError> {
        let mut rng = Pcg32::seed_from_u64(config.seed);
        let population = Population::random(&mut rng, config.population_size, config.rule_count)?;
        Self::build(config, population, rng, fitness)
    }

    /// Starts from the given population. `config.population_size` is ignored;
    /// every genome must have `config.rule_count` rules.
    pub fn with_population(
        config: OptimizerConfig,
        population: Population,
        fitness: F,
    ) -> Result<Self, OptimizerError> {
        if population.rule_count() != config.rule_count {
            return Err(GeneticError::GenomeShape {
                expected: config.rule_count,
                found: population.rule_count(),
            }
            .into());
        }
        let rng = Pcg32::seed_from_u64(config.seed);
        Self::build(config, population, rng, fitness)
    }

    fn build(
        config: OptimizerConfig,
        population: Population,
        rng: Pcg32,
        fitness: F,
    ) -> Result<Self, OptimizerError> {
        config.evolver.validate(population.len())?;
        Ok(Self {
            evolver: config.evolver,
            runner: config.runner,
            fitness,
            rng,
            population,
            generation: 0,
            phase: Phase::AwaitingEpoch,
            history: FitnessHistory::new(),
        })
    }

    #[must_use]
    pub fn generation(&self) -> usize {
        self.generation
    }

    #[must_use]
    pub fn phase(&self) -> Phase {
        self.phase
    }

    #[must_use]
    pub fn population(&self) -> &Population {
        &self.population
    }

    #[must_use]
    pub fn history(&self) -> &FitnessHistory {
        &self.history
    }

    fn expect_phase(&self, expected: Phase) -> Result<(), PhaseError> {
        if self.phase == expected {
            Ok(())
        } else {
            Err(PhaseError {
                expected,
                actual: self.phase,
            })
        }
    }

    /// Runs one epoch with a robot per individual, then ranks the population.
    pub fn run_epoch(&mut self, arena: &mut Arena) -> Result<GenerationRecord, OptimizerError> {
        self.expect_phase(Phase::AwaitingEpoch)?;

        arena.spawn_robots(self.population.len());
        let mut controllers = self
            .population
            .genomes()
            .map(|genome| Box::new(RuleTableController::new(genome)) as BoxedController)
            .collect::<Vec<_>>();
        let outcome = self.runner.run(arena, &mut controllers)?;

        let evaluations = self
            .fitness
            .evaluate_epoch(arena, &outcome)
            .into_iter()
            .zip(&outcome.robots)
            .map(|(fitness, robot)| Evaluation {
                fitness,
                eat_count: robot.eat_count(),
            })
            .collect();
        self.population.assign_evaluations(evaluations)?;
        self.phase = Phase::Evaluated;

        let record = GenerationRecord {
            generation: self.generation,
            best_fitness: self
                .population
                .best_fitness()
                .ok_or(GeneticError::NotEvaluated)?,
            average_fitness: self
                .population
                .average_fitness()
                .ok_or(GeneticError::NotEvaluated)?,
        };
        self.history.push(record);
        tracing::info!(
            generation = record.generation,
            best = record.best_fitness,
            average = record.average_fitness,
            eaten = self.population.eaten_count(),
            iterations = outcome.iterations,
            "generation evaluated"
        );
        Ok(record)
    }

    /// The rank-0 individual of the evaluated generation.
    pub fn best(&self) -> Result<&Individual, OptimizerError> {
        self.expect_phase(Phase::Evaluated)?;
        Ok(self.population.best().ok_or(GeneticError::NotEvaluated)?)
    }

    /// Saves the rank-0 genome as CSV.
    pub fn persist_best<P>(&self, path: P) -> Result<(), OptimizerError>
    where
        P: AsRef<Path>,
    {
        self.best()?.genome().save(path)?;
        Ok(())
    }

    /// Replaces the evaluated population with the next generation.
    pub fn breed(&mut self) -> Result<(), OptimizerError> {
        self.expect_phase(Phase::Evaluated)?;
        self.population = self.evolver.evolve(&self.population, &mut self.rng)?;
        self.generation += 1;
        self.phase = Phase::AwaitingEpoch;
        Ok(())
    }

    /// Runs `generations` epochs, breeding between them.
    ///
    /// `on_generation` is called after every evaluation, while the best genome is
    /// readable. The optimizer is left in the `Evaluated` phase.
    pub fn run<C>(
        &mut self,
        arena: &mut Arena,
        generations: usize,
        mut on_generation: C,
    ) -> Result<(), OptimizerError>
    where
        C: FnMut(&Self, &GenerationRecord),
    {
        for i in 0..generations {
            let record = self.run_epoch(arena)?;
            on_generation(self, &record);
            if i + 1 < generations {
                self.breed()?;
            }
        }
        Ok(())
    }
}
