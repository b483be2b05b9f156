extern crate rand;
extern crate serde;
extern crate serde_json;

pub mod common;
pub mod config;
pub mod error;
pub mod policies;

pub use common::defs::*;
pub use config::GridworldConfig;
pub use error::GridworldError;
pub use policies::*;

use common::utils::*;
use itertools::Itertools;
use rand::prelude::*;
use serde::{Deserialize, Serialize};
use std::collections::{BTreeSet, HashMap};

/// Cell index in row-major order.
pub type GridState = usize;

pub const BASE_GOAL_REWARD: f64 = 10.;
pub const BASE_WATER_REWARD: f64 = -10.;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum Action {
    Up = 0,
    Right = 1,
    Down = 2,
    Left = 3,
}

impl Action {
    pub const ALL: [Action; 4] = [Action::Up, Action::Right, Action::Down, Action::Left];

    pub fn from_index(i: i32) -> Option<Self> {
        match i {
            0 => Some(Action::Up),
            1 => Some(Action::Right),
            2 => Some(Action::Down),
            3 => Some(Action::Left),
            _ => None,
        }
    }

    pub fn index(self) -> usize {
        self as usize
    }

    /// +90 degrees.
    pub fn veer_right(self) -> Self {
        Self::ALL[(self.index() + 1) % 4]
    }

    /// -90 degrees.
    pub fn veer_left(self) -> Self {
        Self::ALL[(self.index() + 3) % 4]
    }
}

/// What actually happened on a step, after the action was perturbed.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Effect {
    Moved(Action),
    Froze,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Perturbation {
    Intended,
    VeerRight,
    VeerLeft,
    Freeze,
}

impl Perturbation {
    pub const ALL: [Perturbation; 4] = [
        Perturbation::Intended,
        Perturbation::VeerRight,
        Perturbation::VeerLeft,
        Perturbation::Freeze,
    ];

    /// Resolves a uniform draw in [0, 1).
    pub fn from_sample(p: f64) -> Self {
        if p < 0.05 {
            Perturbation::VeerRight
        } else if p < 0.1 {
            Perturbation::VeerLeft
        } else if p < 0.2 {
            Perturbation::Freeze
        } else {
            Perturbation::Intended
        }
    }

    pub fn probability(self) -> f64 {
        match self {
            Perturbation::Intended => 0.8,
            Perturbation::VeerRight => 0.05,
            Perturbation::VeerLeft => 0.05,
            Perturbation::Freeze => 0.1,
        }
    }

    pub fn apply(self, action: Action) -> Effect {
        match self {
            Perturbation::Intended => Effect::Moved(action),
            Perturbation::VeerRight => Effect::Moved(action.veer_right()),
            Perturbation::VeerLeft => Effect::Moved(action.veer_left()),
            Perturbation::Freeze => Effect::Froze,
        }
    }
}

/// The Gridworld as described in the lecture notes of the 687 course material.
///
/// With probability 0.8 the robot moves in the chosen direction, with 0.05 it
/// veers right, with 0.05 it veers left and with 0.1 it does not move at all.
/// Moves off the grid or into an obstacle leave the robot where it is.
/// Rewards: +10 for entering the goal, -10 for entering water, 0 elsewhere.
/// The emitted reward is already multiplied by `gamma^t`.
#[derive(Debug, Clone)]
pub struct Gridworld<R = StdRng> {
    rows: usize,
    cols: usize,
    start_state: GridState,
    end_state: GridState,
    obstacles: BTreeSet<GridState>,
    water_states: BTreeSet<GridState>,
    gamma: f64,
    state: GridState,
    cumulative_discount: f64,
    last_effect: Option<Effect>,
    last_reward: f64,
    rng: R,
}

impl Gridworld<StdRng> {
    pub fn seeded(config: &GridworldConfig, seed: u64) -> Result<Self, GridworldError> {
        Self::new(config, StdRng::seed_from_u64(seed))
    }

    pub fn from_entropy(config: &GridworldConfig) -> Result<Self, GridworldError> {
        Self::new(config, StdRng::from_entropy())
    }
}

impl<R> Gridworld<R> {
    pub fn new(config: &GridworldConfig, rng: R) -> Result<Self, GridworldError> {
        config.validate()?;
        tracing::debug!(
            rows = config.rows,
            cols = config.cols,
            start = config.start_state,
            end = config.end_state,
            "gridworld created"
        );

        Ok(Self {
            rows: config.rows,
            cols: config.cols,
            start_state: config.start_state,
            end_state: config.end_state,
            obstacles: config.obstacles.iter().copied().collect(),
            water_states: config.water_states.iter().copied().collect(),
            gamma: config.gamma,
            state: config.start_state,
            cumulative_discount: 1.,
            last_effect: None,
            last_reward: 0.,
            rng,
        })
    }

    /// Same layout with a different random source, freshly reset.
    pub fn with_rng<R2>(&self, rng: R2) -> Gridworld<R2> {
        Gridworld {
            rows: self.rows,
            cols: self.cols,
            start_state: self.start_state,
            end_state: self.end_state,
            obstacles: self.obstacles.clone(),
            water_states: self.water_states.clone(),
            gamma: self.gamma,
            state: self.start_state,
            cumulative_discount: 1.,
            last_effect: None,
            last_reward: 0.,
            rng,
        }
    }

    pub fn with_start_state(&self, start_state: GridState) -> Result<Self, GridworldError>
    where
        R: Clone,
    {
        let mut config = self.config();
        config.start_state = start_state;
        Self::new(&config, self.rng.clone())
    }

    pub fn config(&self) -> GridworldConfig {
        GridworldConfig {
            rows: self.rows,
            cols: self.cols,
            start_state: self.start_state,
            end_state: self.end_state,
            obstacles: self.obstacles.iter().copied().collect(),
            water_states: self.water_states.iter().copied().collect(),
            gamma: self.gamma,
        }
    }

    pub fn reset(&mut self) {
        self.state = self.start_state;
        self.cumulative_discount = 1.;
        self.last_effect = None;
        self.last_reward = 0.;
    }

    pub fn is_end(&self) -> bool {
        self.state == self.end_state
    }

    /// Undiscounted reward for entering `state`.
    pub fn reward_of(&self, state: GridState) -> f64 {
        if state == self.end_state {
            BASE_GOAL_REWARD
        } else if self.water_states.contains(&state) {
            BASE_WATER_REWARD
        } else {
            0.
        }
    }

    /// Applies one step with the perturbation draw `p` supplied by the caller.
    pub fn step_with(&mut self, action: Action, p: f64) -> StepInfo {
        let effect = Perturbation::from_sample(p).apply(action);
        self.state = self.resolve(self.state, effect);

        let reward = self.cumulative_discount * self.reward_of(self.state);
        self.cumulative_discount *= self.gamma;

        self.last_effect = Some(effect);
        self.last_reward = reward;
        StepInfo {
            effect,
            state: self.state,
            reward,
        }
    }

    /// Exact one-step model for every non-obstacle state and every action.
    /// Rewards are undiscounted.
    pub fn transitions(&self) -> Transitions {
        let mut transitions: Transitions = HashMap::new();
        for s in (0..self.n_s()).filter(|s| !self.is_obstacle(*s)) {
            for a in Action::ALL {
                let mut ts: Vec<Transition> = Vec::with_capacity(Perturbation::ALL.len());
                for p in Perturbation::ALL {
                    let next_state = self.resolve(s, p.apply(a));
                    match ts.iter_mut().find(|t| t.next_state == next_state) {
                        Some(t) => t.probability += p.probability(),
                        None => ts.push(Transition {
                            next_state,
                            probability: p.probability(),
                            reward: self.reward_of(next_state),
                            done: next_state == self.end_state,
                        }),
                    }
                }

                transitions.insert((s, a), ts);
            }
        }

        transitions
    }

    /// `@` agent, `G` goal, `S` start, `#` obstacle, `~` water, `.` empty.
    pub fn render(&self) -> String {
        (0..self.rows)
            .map(|row| {
                (0..self.cols)
                    .map(|col| self.glyph(from_coords(row, col, self.cols)))
                    .join(" ")
            })
            .join("\n")
    }

    pub fn state(&self) -> GridState {
        self.state
    }

    pub fn shape(&self) -> (usize, usize) {
        (self.rows, self.cols)
    }

    pub fn n_s(&self) -> usize {
        self.rows * self.cols
    }

    pub fn n_a(&self) -> usize {
        Action::ALL.len()
    }

    pub fn start_state(&self) -> GridState {
        self.start_state
    }

    pub fn end_state(&self) -> GridState {
        self.end_state
    }

    pub fn gamma(&self) -> f64 {
        self.gamma
    }

    pub fn cumulative_discount(&self) -> f64 {
        self.cumulative_discount
    }

    pub fn last_effect(&self) -> Option<Effect> {
        self.last_effect
    }

    pub fn last_reward(&self) -> f64 {
        self.last_reward
    }

    pub fn is_obstacle(&self, state: GridState) -> bool {
        self.obstacles.contains(&state)
    }

    pub fn is_water(&self, state: GridState) -> bool {
        self.water_states.contains(&state)
    }

    fn resolve(&self, s: GridState, effect: Effect) -> GridState {
        match effect {
            Effect::Froze => s,
            Effect::Moved(a) => self.neighbour(s, a).unwrap_or(s),
        }
    }

    fn neighbour(&self, s: GridState, action: Action) -> Option<GridState> {
        let (row, col) = to_coords(s, self.cols);
        let (row, col) = match action {
            Action::Up => (row.checked_sub(1)?, col),
            Action::Right => (row, col + 1),
            Action::Down => (row + 1, col),
            Action::Left => (row, col.checked_sub(1)?),
        };
        if row >= self.rows || col >= self.cols {
            return None;
        }

        let next = from_coords(row, col, self.cols);
        (!self.is_obstacle(next)).then_some(next)
    }

    fn glyph(&self, s: GridState) -> char {
        if s == self.state {
            '@'
        } else if s == self.end_state {
            'G'
        } else if s == self.start_state {
            'S'
        } else if self.is_obstacle(s) {
            '#'
        } else if self.is_water(s) {
            '~'
        } else {
            '.'
        }
    }
}

impl<R: Rng> Gridworld<R> {
    /// Draws one uniform number for the action perturbation, then steps.
    pub fn step(&mut self, action: Action) -> StepInfo {
        let p = self.rng.gen::<f64>();
        self.step_with(action, p)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use float_eq::*;

    fn env() -> Gridworld {
        Gridworld::seeded(&GridworldConfig::default(), 2718).unwrap()
    }

    #[test]
    fn veering_wraps_around_action_indices() {
        assert_eq!(Action::Up.veer_right(), Action::Right);
        assert_eq!(Action::Left.veer_right(), Action::Up);
        assert_eq!(Action::Up.veer_left(), Action::Left);
        assert_eq!(Action::Right.veer_left(), Action::Up);
        assert_eq!(Action::from_index(-1), None);
        assert_eq!(Action::from_index(4), None);
        assert!(Action::ALL
            .iter()
            .all(|&a| Action::from_index(a.index() as i32) == Some(a)));
    }

    #[test]
    fn sample_thresholds() {
        assert_eq!(Perturbation::from_sample(0.), Perturbation::VeerRight);
        assert_eq!(Perturbation::from_sample(0.0499), Perturbation::VeerRight);
        assert_eq!(Perturbation::from_sample(0.05), Perturbation::VeerLeft);
        assert_eq!(Perturbation::from_sample(0.0999), Perturbation::VeerLeft);
        assert_eq!(Perturbation::from_sample(0.1), Perturbation::Freeze);
        assert_eq!(Perturbation::from_sample(0.1999), Perturbation::Freeze);
        assert_eq!(Perturbation::from_sample(0.2), Perturbation::Intended);
        assert_eq!(Perturbation::from_sample(0.9999), Perturbation::Intended);

        let total: f64 = Perturbation::ALL.iter().map(|p| p.probability()).sum();
        assert_float_eq!(total, 1., abs <= 1e-12);
    }

    #[test]
    fn freeze_keeps_state_and_still_discounts() {
        let mut env = env();
        let si = env.step_with(Action::Right, 0.15);

        assert_eq!(si.effect, Effect::Froze);
        assert_eq!(si.state, 0);
        assert_float_eq!(si.reward, 0., abs <= 1e-12);
        assert_float_eq!(env.cumulative_discount(), 0.9, abs <= 1e-12);
        assert_eq!(env.last_effect(), Some(Effect::Froze));
    }

    #[test]
    fn veer_left_from_right_moves_up_and_is_blocked() {
        let mut env = env();
        let si = env.step_with(Action::Right, 0.07);

        assert_eq!(si.effect, Effect::Moved(Action::Up));
        assert_eq!(si.state, 0);
    }

    #[test]
    fn reward_is_computed_from_resulting_state() {
        let mut env = env();
        // 0 -> 5 -> 6 (water)
        env.step_with(Action::Down, 0.5);
        let si = env.step_with(Action::Right, 0.5);

        assert_eq!(si.state, 6);
        assert_float_eq!(si.reward, 0.9 * BASE_WATER_REWARD, abs <= 1e-12);
        assert_float_eq!(env.last_reward(), si.reward, abs <= 1e-12);

        // Staying in water is penalised again.
        let si = env.step_with(Action::Right, 0.15);
        assert_eq!(si.state, 6);
        assert_float_eq!(si.reward, 0.81 * BASE_WATER_REWARD, abs <= 1e-12);
    }

    #[test]
    fn transitions_sum_to_one() {
        let env = env();
        let transitions = env.transitions();

        assert_eq!(transitions.len(), (25 - 2) * 4);
        for ts in transitions.values() {
            let total: f64 = ts.iter().map(|t| t.probability).sum();
            assert_float_eq!(total, 1., abs <= 1e-12);
            assert!(ts.iter().all(|t| !env.is_obstacle(t.next_state)));
        }

        // From the corner, up is blocked (0.8) and so is veering left (0.05),
        // freezing stays too (0.1), veering right moves to 1 (0.05).
        let ts = &transitions[&(0, Action::Up)];
        assert_eq!(ts.len(), 2);
        let stay = ts.iter().find(|t| t.next_state == 0).unwrap();
        assert_float_eq!(stay.probability, 0.95, abs <= 1e-12);
        let right = ts.iter().find(|t| t.next_state == 1).unwrap();
        assert_float_eq!(right.probability, 0.05, abs <= 1e-12);
    }

    #[test]
    fn goal_transitions_are_done() {
        let env = env();
        let ts = &env.transitions()[&(23, Action::Right)];
        let goal = ts.iter().find(|t| t.next_state == 24).unwrap();

        assert!(goal.done);
        assert_float_eq!(goal.reward, BASE_GOAL_REWARD, abs <= 1e-12);
        assert_float_eq!(goal.probability, 0.8, abs <= 1e-12);
    }

    #[test]
    fn with_rng_starts_fresh() {
        let mut env = env();
        env.step_with(Action::Down, 0.5);
        let copy = env.with_rng(StdRng::seed_from_u64(1));

        assert_eq!(copy.state(), copy.start_state());
        assert_eq!(copy.last_effect(), None);
        assert_float_eq!(copy.cumulative_discount(), 1., abs <= 1e-12);
        assert_eq!(copy.config(), env.config());
    }

    #[test]
    fn with_start_state_is_validated() {
        let env = env();

        assert_eq!(env.with_start_state(19).unwrap().state(), 19);
        assert!(matches!(
            env.with_start_state(12),
            Err(GridworldError::BlockedState { role: "start", state: 12 })
        ));
        assert!(matches!(
            env.with_start_state(25),
            Err(GridworldError::StateOutOfRange { .. })
        ));
    }
}
