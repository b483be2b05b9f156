use super::mdp_simulator::*;
use gridworld::*;
use rand::Rng;
use serde::Serialize;

#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct OccupancyEstimate {
    pub hits: usize,
    pub episodes: usize,
    pub probability: f64,
}

/// Estimates Pr(S_t = target | S_0 = start) for `t = time_step`, where the
/// start is `env`'s start state. Episodes are capped at `time_step` steps;
/// those reaching the goal earlier never count.
pub fn estimate_state_occupancy<R, P>(
    env: &mut Gridworld<R>,
    pi: &mut P,
    n_ep: usize,
    time_step: usize,
    target: GridState,
) -> OccupancyEstimate
where
    R: Rng,
    P: Policy + ?Sized,
{
    let mut hits = 0;
    for _ in 0..n_ep {
        let mut hit = false;
        run_episode_observed(env, pi, Some(time_step), |t, s| {
            hit |= t == time_step && s == target
        });
        hits += hit as usize;
    }

    let probability = if n_ep == 0 {
        0.
    } else {
        hits as f64 / n_ep as f64
    };
    tracing::debug!(hits, n_ep, time_step, target, probability, "occupancy estimate");

    OccupancyEstimate {
        hits,
        episodes: n_ep,
        probability,
    }
}
