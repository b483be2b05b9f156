use super::super::mdp_simulator::*;
use gridworld::{EpisodeEvent, GridState};
use std::iter::zip;

/// State values under the policy that produced the episodes.
/// Ref: https://youtu.be/P0ZvxeQqv0A?si=RLKdOUTNEfKXE63C
pub fn mc_first_visit(
    ep_gen: &dyn EpisodeGenerator,
    gamma: f64,
    n_s: usize,
    n_ep: usize,
    seed: Option<u64>,
) -> Vec<f64> {
    mc_core(ep_gen, gamma, n_s, n_ep, seed, is_first_visit)
}

/// Ref: https://youtu.be/P0ZvxeQqv0A?si=RLKdOUTNEfKXE63C
pub fn mc_every_visit(
    ep_gen: &dyn EpisodeGenerator,
    gamma: f64,
    n_s: usize,
    n_ep: usize,
    seed: Option<u64>,
) -> Vec<f64> {
    mc_core(ep_gen, gamma, n_s, n_ep, seed, |_, _, _| true)
}

fn mc_core(
    ep_gen: &dyn EpisodeGenerator,
    gamma: f64,
    n_s: usize,
    n_ep: usize,
    seed: Option<u64>,
    counts: fn(&[EpisodeEvent], usize, GridState) -> bool,
) -> Vec<f64> {
    let returns = &mut vec![0.; n_s];
    let visits = &mut vec![0usize; n_s];

    let eps = ep_gen.generate(n_ep, seed);
    for ep in eps.iter().take(n_ep) {
        let mut g = 0.;
        for t in (0..ep.len().saturating_sub(1)).rev() {
            g = gamma * g + ep[t + 1].r;
            if counts(ep, t, ep[t].s) {
                returns[ep[t].s] += g;
                visits[ep[t].s] += 1;
            }
        }
    }

    zip(returns.iter(), visits.iter())
        .map(|(&r, &v)| if v == 0 { 0. } else { r / (v as f64) })
        .collect()
}

fn is_first_visit(ep: &[EpisodeEvent], t: usize, s: GridState) -> bool {
    if t == 0 {
        return true;
    }

    !ep.iter().take(t).any(|x| x.s == s)
}
