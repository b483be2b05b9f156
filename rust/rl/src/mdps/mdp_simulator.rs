use gridworld::*;
use rand::prelude::*;
use serde::Serialize;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
pub enum EpisodeEnd {
    Terminated,
    /// Hit the step cap before reaching the goal.
    Truncated,
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct Episode {
    pub discounted_return: f64,
    pub steps: usize,
    pub end: EpisodeEnd,
}

pub trait EpisodeGenerator {
    fn generate(&self, n: usize, seed: Option<u64>) -> Vec<Vec<EpisodeEvent>>;
}

/// Resets `env` and drives it with `pi` until the goal or `max_steps`.
/// `observe(t, s)` is called for every visited state, the start state at t = 0.
pub fn run_episode_observed<R, P>(
    env: &mut Gridworld<R>,
    pi: &mut P,
    max_steps: Option<usize>,
    mut observe: impl FnMut(usize, GridState),
) -> Episode
where
    R: Rng,
    P: Policy + ?Sized,
{
    env.reset();
    let mut g = 0.;
    let mut t = 0;
    observe(t, env.state());

    while !env.is_end() {
        if max_steps.is_some_and(|m| t >= m) {
            return Episode {
                discounted_return: g,
                steps: t,
                end: EpisodeEnd::Truncated,
            };
        }

        let a = pi.policy(env.state());
        let si = env.step(a);
        g += si.reward;
        t += 1;
        observe(t, si.state);
    }

    Episode {
        discounted_return: g,
        steps: t,
        end: EpisodeEnd::Terminated,
    }
}

pub fn run_episode<R, P>(env: &mut Gridworld<R>, pi: &mut P, max_steps: Option<usize>) -> Episode
where
    R: Rng,
    P: Policy + ?Sized,
{
    run_episode_observed(env, pi, max_steps, |_, _| {})
}

/// Episodes run back to back on `env`, each from a fresh reset.
pub fn run_episodes<R, P>(
    env: &mut Gridworld<R>,
    pi: &mut P,
    n_ep: usize,
    max_steps: Option<usize>,
) -> Vec<Episode>
where
    R: Rng,
    P: Policy + ?Sized,
{
    tracing::debug!(n_ep, ?max_steps, "running episodes");
    let eps = (0..n_ep)
        .map(|_| run_episode(env, pi, max_steps))
        .collect::<Vec<_>>();
    log_truncations(&eps);

    eps
}

pub(crate) fn log_truncations(eps: &[Episode]) {
    let truncated = truncated_count(eps);
    if truncated > 0 {
        tracing::warn!(
            truncated,
            episodes = eps.len(),
            "episodes stopped at the step cap before reaching the goal"
        );
    }
}

pub fn discounted_returns(eps: &[Episode]) -> Vec<f64> {
    eps.iter().map(|e| e.discounted_return).collect()
}

/// Returns of the episodes that actually reached the goal.
pub fn terminated_returns(eps: &[Episode]) -> Vec<f64> {
    eps.iter()
        .filter(|e| e.end == EpisodeEnd::Terminated)
        .map(|e| e.discounted_return)
        .collect()
}

pub fn truncated_count(eps: &[Episode]) -> usize {
    eps.iter()
        .filter(|e| e.end == EpisodeEnd::Truncated)
        .count()
}

/// Records the visited states with their undiscounted rewards. The first
/// event is the start state with reward 0.
pub fn record_episode<R, P>(
    env: &mut Gridworld<R>,
    pi: &mut P,
    max_steps: Option<usize>,
) -> Vec<EpisodeEvent>
where
    R: Rng,
    P: Policy + ?Sized,
{
    env.reset();
    let mut ep = vec![EpisodeEvent {
        s: env.state(),
        r: 0.,
    }];

    while !env.is_end() && max_steps.map_or(true, |m| ep.len() <= m) {
        let si = env.step(pi.policy(env.state()));
        ep.push(EpisodeEvent {
            s: si.state,
            r: env.reward_of(si.state),
        });
    }

    ep
}

/// Recorded episodes of a gridworld under a fixed policy. Each call to
/// `generate` starts from a clone of `policy`.
pub struct GridworldEpisodes<P> {
    pub env: Gridworld,
    pub policy: P,
    pub max_steps: Option<usize>,
}

impl<P: Policy + Clone> EpisodeGenerator for GridworldEpisodes<P> {
    fn generate(&self, n: usize, seed: Option<u64>) -> Vec<Vec<EpisodeEvent>> {
        let rng = match seed {
            Some(seed) => StdRng::seed_from_u64(seed),
            None => StdRng::from_entropy(),
        };
        let env = &mut self.env.with_rng(rng);
        let pi = &mut self.policy.clone();

        (0..n)
            .map(|_| record_episode(env, pi, self.max_steps))
            .collect()
    }
}
