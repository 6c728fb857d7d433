use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use simbot_evaluator::rule_table::Rule;
use simbot_training::history::FitnessHistory;

#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct TrainingSummary {
    pub trained_at: DateTime<Utc>,
    pub seed: u64,
    pub population_size: usize,
    pub generations: usize,
    pub final_best_fitness: i64,
    pub history: FitnessHistory,
    pub best_genome: Vec<Rule>,
}
