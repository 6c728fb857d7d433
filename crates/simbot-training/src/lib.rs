//! Training system that evolves fuzzy rule tables with a genetic algorithm.
//!
//! # How Training Works
//!
//! 1. **Population** - Create random rule-table genomes (every cell uniform in `[0, 255]`)
//! 2. **Epoch** - Spawn one robot per genome and run the arena for a tick budget
//! 3. **Fitness** - Score each robot on distance to food, collisions and eating
//! 4. **Selection** - Rank the population; only the best ranks may breed
//! 5. **Reproduction** - Keep the elites, fill the rest with crossed/mutated children
//! 6. **Repeat** - Continue for a fixed number of generations
//!
//! # Architecture
//!
//! ```text
//! GeneticOptimizer (generation loop, seeded rng, history)
//!     ↓ runs
//! EpochRunner (simbot-evaluator) with one RuleTableController per genome
//!     ↓ scored by
//! FitnessFunction (simbot-evaluator)
//!     ↓ ranks
//! Population → PopulationEvolver → next Population
//! ```
//!
//! # Modules
//!
//! - [`genome`] - Genetic operators on rule tables (random, crossover, mutation)
//! - [`genetic`] - Individuals, populations and the breeding step
//! - [`history`] - Per-generation best/average fitness and its CSV export
//! - [`optimizer`] - The phase-checked generation loop
//!
//! # Example
//!
//! ```no_run
//! use simbot_engine::{Arena, ArenaConfig};
//! use simbot_evaluator::fitness::FoodFitness;
//! use simbot_training::optimizer::{GeneticOptimizer, OptimizerConfig};
//!
//! let mut arena = Arena::new(&ArenaConfig::default())?;
//! let mut optimizer = GeneticOptimizer::new(OptimizerConfig::default(), FoodFitness::default())?;
//! optimizer.run(&mut arena, 100, |opt, record| {
//!     eprintln!("generation {}: best {}", record.generation, record.best_fitness);
//!     let _ = opt.persist_best("best.csv");
//! })?;
//! # Ok::<(), Box<dyn std::error::Error>>(())
//! ```

pub mod genetic;
pub mod genome;
pub mod history;
pub mod optimizer;
