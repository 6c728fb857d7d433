use std::path::PathBuf;

use anyhow::Context as _;
use chrono::Utc;
use simbot_evaluator::{
    controller::BoxedController,
    fitness::{FitnessFunction as _, FoodFitness},
    fuzzy_controller::HandTunedController,
    rule_table::{RuleTable, RuleTableController},
    session::EpochRunner,
};

use crate::{
    model::run_report::{RobotReport, RunReport},
    util::{self, Output},
};

const NUM_ROBOTS: usize = 10;
const NUM_RULES: usize = 16;
const MAX_TICK: usize = 1000;

#[derive(Debug, Clone, clap::Args)]
pub(crate) struct RunArg {
    /// Arena map (JSON); the built-in open arena when omitted
    #[arg(long)]
    map: Option<PathBuf>,
    /// Saved rule table (CSV); the hand-tuned controller when omitted
    #[arg(long)]
    rules: Option<PathBuf>,
    /// Rules expected in the rule table
    #[arg(long, default_value_t = NUM_RULES)]
    rule_count: usize,
    #[arg(long, default_value_t = NUM_ROBOTS)]
    robots: usize,
    /// Tick budget
    #[arg(long, default_value_t = MAX_TICK)]
    max_tick: usize,
    /// Keep running after every robot has eaten
    #[arg(long)]
    full_epoch: bool,
    /// Report (JSON); stdout when omitted
    #[arg(long)]
    output: Option<PathBuf>,
}

pub(crate) fn run(arg: &RunArg) -> anyhow::Result<()> {
    let RunArg {
        map,
        rules,
        rule_count,
        robots,
        max_tick,
        full_epoch,
        output,
    } = arg;

    let mut arena = util::load_arena(map.as_deref())?;
    arena.spawn_robots(*robots);

    let (controller, mut controllers) = match rules {
        Some(path) => {
            let table = RuleTable::load(path, *rule_count)
                .with_context(|| format!("Failed to load rule table: {}", path.display()))?;
            let controller = RuleTableController::new(&table);
            let controllers = (0..*robots)
                .map(|_| Box::new(controller.clone()) as BoxedController)
                .collect::<Vec<_>>();
            (format!("rule table ({})", path.display()), controllers)
        }
        None => {
            let controllers = (0..*robots)
                .map(|_| Box::new(HandTunedController::new()) as BoxedController)
                .collect::<Vec<_>>();
            ("hand-tuned".to_owned(), controllers)
        }
    };

    let runner = EpochRunner {
        stop_when_all_ate: !*full_epoch,
        ..EpochRunner::new(*max_tick)
    };
    let outcome = runner.run(&mut arena, &mut controllers)?;
    let fitness = FoodFitness::default().evaluate_epoch(&arena, &outcome);

    let report = RunReport {
        ran_at: Utc::now(),
        controller,
        iterations: outcome.iterations,
        eaten: outcome.eaten_count(),
        robots: outcome
            .robots
            .iter()
            .zip(fitness)
            .enumerate()
            .map(|(id, (robot, fitness))| RobotReport::new(id, robot, fitness))
            .collect(),
    };
    Output::save_json(&report, output.clone())?;

    eprintln!();
    eprintln!("Run completed");
    eprintln!("  Controller: {}", report.controller);
    eprintln!("  Iterations: {}", report.iterations);
    eprintln!("  Robots that ate: {}/{}", report.eaten, report.robots.len());

    Ok(())
}
