use crate::*;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;

pub trait Policy {
    fn policy(&mut self, s: GridState) -> Action;
}

impl<F> Policy for F
where
    F: FnMut(GridState) -> Action,
{
    fn policy(&mut self, s: GridState) -> Action {
        self(s)
    }
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct StepInfo {
    pub effect: Effect,
    pub state: GridState,
    /// Already multiplied by the cumulative discount.
    pub reward: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Transition {
    pub next_state: GridState,
    pub probability: f64,
    pub reward: f64,
    pub done: bool,
}

pub type Transitions = HashMap<(GridState, Action), Vec<Transition>>;

/// A visited state and the undiscounted reward received on entering it.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct EpisodeEvent {
    pub s: GridState,
    pub r: f64,
}
