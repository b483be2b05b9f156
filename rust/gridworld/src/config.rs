use crate::*;
use serde::{Deserialize, Serialize};
use std::path::Path;

/// Layout of a gridworld. Defaults to the 5x5 course grid.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct GridworldConfig {
    pub rows: usize,
    pub cols: usize,
    pub start_state: GridState,
    pub end_state: GridState,
    pub obstacles: Vec<GridState>,
    pub water_states: Vec<GridState>,
    pub gamma: f64,
}

impl Default for GridworldConfig {
    fn default() -> Self {
        Self {
            rows: 5,
            cols: 5,
            start_state: 0,
            end_state: 24,
            obstacles: vec![12, 17],
            water_states: vec![6, 18, 22],
            gamma: 0.9,
        }
    }
}

impl GridworldConfig {
    pub fn n_s(&self) -> usize {
        self.rows * self.cols
    }

    pub fn from_json_str(json: &str) -> Result<Self, GridworldError> {
        let config: Self = serde_json::from_str(json)?;
        config.validate()?;
        Ok(config)
    }

    pub fn from_path(path: impl AsRef<Path>) -> Result<Self, GridworldError> {
        let json = std::fs::read_to_string(path)?;
        Self::from_json_str(&json)
    }

    pub fn validate(&self) -> Result<(), GridworldError> {
        if self.rows == 0 || self.cols == 0 {
            return Err(GridworldError::EmptyGrid);
        }

        // Also rejects NaN.
        if !(self.gamma > 0. && self.gamma <= 1.) {
            return Err(GridworldError::InvalidDiscount(self.gamma));
        }

        let n_s = self.n_s();
        let roles = [("start", self.start_state), ("end", self.end_state)]
            .into_iter()
            .chain(self.obstacles.iter().map(|&s| ("obstacle", s)))
            .chain(self.water_states.iter().map(|&s| ("water", s)));
        for (role, state) in roles {
            if state >= n_s {
                return Err(GridworldError::StateOutOfRange { role, state, n_s });
            }
        }

        for (role, state) in [("start", self.start_state), ("end", self.end_state)] {
            if self.obstacles.contains(&state) {
                return Err(GridworldError::BlockedState { role, state });
            }
        }

        Ok(())
    }
}
