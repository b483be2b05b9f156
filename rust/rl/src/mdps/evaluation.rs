use super::mdp_simulator::*;
use gridworld::*;
use rand::prelude::*;
use rayon::prelude::*;
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct EvaluationConfig {
    pub episodes: usize,
    pub max_steps: Option<usize>,
    pub seed: u64,
    pub parallel: bool,
}

impl Default for EvaluationConfig {
    fn default() -> Self {
        Self {
            episodes: 10_000,
            max_steps: None,
            seed: 123,
            parallel: false,
        }
    }
}

/// Runs `config.episodes` episodes of `env`'s layout. The policy is built by
/// `policy_factory` from a random source derived from the seed, so both
/// paths are reproducible.
pub fn evaluate<R, P, F>(env: &Gridworld<R>, policy_factory: F, config: &EvaluationConfig) -> Vec<Episode>
where
    R: Sync,
    P: Policy,
    F: Fn(&mut StdRng) -> P + Sync,
{
    if config.parallel {
        return run_episodes_parallel(
            env,
            policy_factory,
            config.episodes,
            config.max_steps,
            config.seed,
        );
    }

    let seeder = &mut StdRng::seed_from_u64(config.seed);
    let env = &mut env.with_rng(StdRng::seed_from_u64(seeder.gen()));
    let pi = &mut policy_factory(seeder);
    run_episodes(env, pi, config.episodes, config.max_steps)
}

/// Every episode owns a private environment and policy, seeded from
/// `seed + i`. Output is in episode order.
pub fn run_episodes_parallel<R, P, F>(
    env: &Gridworld<R>,
    policy_factory: F,
    n_ep: usize,
    max_steps: Option<usize>,
    seed: u64,
) -> Vec<Episode>
where
    R: Sync,
    P: Policy,
    F: Fn(&mut StdRng) -> P + Sync,
{
    tracing::debug!(n_ep, ?max_steps, seed, "running episodes in parallel");
    let eps: Vec<Episode> = (0..n_ep)
        .into_par_iter()
        .map(|i| {
            let seeder = &mut StdRng::seed_from_u64(seed.wrapping_add(i as u64));
            let env = &mut env.with_rng(StdRng::seed_from_u64(seeder.gen()));
            let pi = &mut policy_factory(seeder);
            run_episode(env, pi, max_steps)
        })
        .collect();
    log_truncations(&eps);

    eps
}
