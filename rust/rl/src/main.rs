use clap::Parser;
use gridworld::*;
use rand::prelude::*;
use rl::*;
use serde::Serialize;
use std::path::PathBuf;
use tracing_subscriber::EnvFilter;

/// Optimal policy for the course layout; -1 marks obstacles and the goal.
const OPTIMAL_POLICY: [i32; 25] = [
    1, 1, 1, 1, 2, //
    0, 1, 1, 1, 2, //
    0, 2, -1, 2, 2, //
    0, 3, -1, 1, 2, //
    0, 3, 1, 1, -1,
];

const PERCENTILES: [f64; 7] = [0.01, 0.05, 0.25, 0.5, 0.75, 0.95, 0.99];

/// Monte Carlo evaluation of discounted returns on the 687 gridworld.
#[derive(Parser, Debug)]
#[command(version, about)]
struct Args {
    /// JSON gridworld layout; the course layout when omitted.
    #[arg(long)]
    config: Option<PathBuf>,

    #[arg(long, default_value_t = 10_000)]
    episodes: usize,

    /// Truncate episodes after this many steps.
    #[arg(long)]
    max_steps: Option<usize>,

    #[arg(long, default_value_t = 123)]
    seed: u64,

    #[arg(long)]
    parallel: bool,

    /// Print the whole quantile function, not just percentiles.
    #[arg(long)]
    quantiles: bool,

    #[arg(long, default_value_t = 1_000_000)]
    occupancy_episodes: usize,

    #[arg(long, default_value_t = 19)]
    occupancy_start: GridState,

    #[arg(long, default_value_t = 11)]
    occupancy_time_step: usize,

    #[arg(long, default_value_t = 22)]
    occupancy_target: GridState,
}

impl Args {
    fn evaluation(&self) -> EvaluationConfig {
        EvaluationConfig {
            episodes: self.episodes,
            max_steps: self.max_steps,
            seed: self.seed,
            parallel: self.parallel,
        }
    }
}

#[derive(Serialize)]
struct Report<'a> {
    policy: &'a str,
    summary: Option<Summary>,
    truncated: usize,
    percentiles: Vec<(f64, Option<f64>)>,
    #[serde(skip_serializing_if = "Option::is_none")]
    quantile_function: Option<QuantileFunction>,
}

fn report(policy: &str, eps: &[Episode], full_quantiles: bool) -> anyhow::Result<()> {
    let returns = discounted_returns(eps);
    let qf = empirical_quantile_function(&returns);
    let summary = summary_statistics(&returns);
    if let Some(s) = &summary {
        tracing::info!(
            policy,
            mean = s.mean,
            std_dev = s.std_dev,
            max = s.max,
            min = s.min,
            "discounted returns"
        );
    }

    let report = Report {
        policy,
        summary,
        truncated: truncated_count(eps),
        percentiles: PERCENTILES.iter().map(|&q| (q, qf.quantile(q))).collect(),
        quantile_function: full_quantiles.then_some(qf),
    };
    println!("{}", serde_json::to_string_pretty(&report)?);

    Ok(())
}

fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .init();

    let args = Args::parse();
    let layout = match &args.config {
        Some(path) => GridworldConfig::from_path(path)?,
        None => GridworldConfig::default(),
    };
    let env = Gridworld::seeded(&layout, args.seed)?;
    let eval = args.evaluation();
    println!("{}", env.render());

    let eps = evaluate(&env, |rng| RandomPolicy::seeded(rng.gen()), &eval);
    report("random", &eps, args.quantiles)?;

    if layout == GridworldConfig::default() {
        let optimal = TabularPolicy::from_indices(&env, &OPTIMAL_POLICY)?;
        let eps = evaluate(&env, |_| optimal.clone(), &eval);
        report("optimal", &eps, args.quantiles)?;
    } else {
        tracing::info!("custom layout, skipping the course's optimal policy");
    }

    let env = &mut env.with_start_state(args.occupancy_start)?;
    let pi = &mut RandomPolicy::seeded(args.seed);
    let est = estimate_state_occupancy(
        env,
        pi,
        args.occupancy_episodes,
        args.occupancy_time_step,
        args.occupancy_target,
    );
    tracing::info!(
        "Pr(S_{} = {} | S_0 = {}) ~ {}",
        args.occupancy_time_step,
        args.occupancy_target,
        args.occupancy_start,
        est.probability
    );
    println!("{}", serde_json::to_string_pretty(&est)?);

    Ok(())
}
