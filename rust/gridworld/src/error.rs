use crate::GridState;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum GridworldError {
    #[error("grid must have at least one row and one column")]
    EmptyGrid,
    #[error("{role} state {state} is outside the grid of {n_s} states")]
    StateOutOfRange {
        role: &'static str,
        state: GridState,
        n_s: usize,
    },
    #[error("{role} state {state} is an obstacle")]
    BlockedState { role: &'static str, state: GridState },
    #[error("discount factor must be in (0, 1], got {0}")]
    InvalidDiscount(f64),
    #[error("policy entry {index} for state {state} is not an action")]
    InvalidAction { state: GridState, index: i32 },
    #[error("policy has no action for state {0}")]
    MissingAction(GridState),
    #[error("policy covers {actual} states, grid has {expected}")]
    PolicyShape { expected: usize, actual: usize },
    #[error("malformed configuration: {0}")]
    Config(#[from] serde_json::Error),
    #[error(transparent)]
    Io(#[from] std::io::Error),
}
