use std::path::PathBuf;

use anyhow::Context as _;
use chrono::Utc;
use rand::Rng as _;
use simbot_evaluator::{fitness::FoodFitness, session::EpochRunner};
use simbot_training::{
    genetic::PopulationEvolver,
    optimizer::{GeneticOptimizer, OptimizerConfig},
};

use crate::{
    model::training_summary::TrainingSummary,
    util::{self, Output},
};

const POPULATION_SIZE: usize = 100;
const NUM_GENERATIONS: usize = 100;
const NUM_RULES: usize = 16;
const MAX_TICK: usize = 1000;

#[derive(Debug, Clone, clap::Args)]
pub(crate) struct TrainArg {
    /// Arena map (JSON); the built-in open arena when omitted
    #[arg(long)]
    map: Option<PathBuf>,
    #[arg(long, default_value_t = POPULATION_SIZE)]
    population: usize,
    #[arg(long, default_value_t = NUM_GENERATIONS)]
    generations: usize,
    /// Rules per genome
    #[arg(long, default_value_t = NUM_RULES)]
    rules: usize,
    /// Tick budget per epoch
    #[arg(long, default_value_t = MAX_TICK)]
    max_tick: usize,
    /// Seed for the genetic algorithm; random when omitted
    #[arg(long)]
    seed: Option<u64>,
    /// Best genome of the latest generation (CSV), rewritten every generation
    #[arg(long, default_value = "best_rules.csv")]
    best: PathBuf,
    /// Per-generation fitness history (CSV)
    #[arg(long, default_value = "fitness_history.csv")]
    history: PathBuf,
    /// Training summary (JSON); stdout when omitted
    #[arg(long)]
    output: Option<PathBuf>,
}

pub(crate) fn run(arg: &TrainArg) -> anyhow::Result<()> {
    let TrainArg {
        map,
        population,
        generations,
        rules,
        max_tick,
        seed,
        best,
        history,
        output,
    } = arg;
    anyhow::ensure!(*generations > 0, "At least one generation is required");

    let mut arena = util::load_arena(map.as_deref())?;
    let seed = seed.unwrap_or_else(|| rand::rng().random());
    let config = OptimizerConfig {
        population_size: *population,
        rule_count: *rules,
        seed,
        evolver: PopulationEvolver::default(),
        runner: EpochRunner::new(*max_tick),
    };
    let mut optimizer = GeneticOptimizer::new(config, FoodFitness::default())?;

    eprintln!("Training {population} robots for {generations} generations (seed {seed})");
    optimizer.run(&mut arena, *generations, |opt, record| {
        eprintln!(
            "Generation #{}: best {}, average {:.2}, eaten {}",
            record.generation,
            record.best_fitness,
            record.average_fitness,
            opt.population().eaten_count()
        );
        if let Err(error) = opt.persist_best(best) {
            tracing::warn!(path = %best.display(), %error, "failed to persist best genome");
        }
    })?;

    optimizer
        .history()
        .save(history)
        .with_context(|| format!("Failed to write fitness history: {}", history.display()))?;

    let best_individual = optimizer.best()?;
    let summary = TrainingSummary {
        trained_at: Utc::now(),
        seed,
        population_size: *population,
        generations: *generations,
        final_best_fitness: best_individual.fitness().unwrap_or(i64::MIN),
        history: optimizer.history().clone(),
        best_genome: best_individual.genome().rules().to_vec(),
    };
    Output::save_json(&summary, output.clone())?;

    eprintln!();
    eprintln!("Training completed");
    eprintln!("  Best genome: {}", best.display());
    eprintln!("  Fitness history: {}", history.display());
    eprintln!("  Trained at: {}", summary.trained_at);
    eprintln!("  Final best fitness: {}", summary.final_best_fitness);

    Ok(())
}
