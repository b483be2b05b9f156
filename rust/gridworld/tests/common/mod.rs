use gridworld::*;

/// Draw that always resolves to the intended action.
#[allow(dead_code)]
pub const INTENDED: f64 = 0.5;

#[allow(dead_code)]
pub fn course_env(seed: u64) -> Gridworld {
    Gridworld::seeded(&GridworldConfig::default(), seed).unwrap()
}

#[allow(dead_code)]
pub fn course_env_at(start_state: GridState, seed: u64) -> Gridworld {
    course_env(seed).with_start_state(start_state).unwrap()
}

/// Actions that point off the grid from `s` on a `rows` x `cols` grid.
#[allow(dead_code)]
pub fn off_grid_actions(s: GridState, rows: usize, cols: usize) -> Vec<Action> {
    let (row, col) = (s / cols, s % cols);
    let mut actions = vec![];
    if row == 0 {
        actions.push(Action::Up);
    }
    if col == cols - 1 {
        actions.push(Action::Right);
    }
    if row == rows - 1 {
        actions.push(Action::Down);
    }
    if col == 0 {
        actions.push(Action::Left);
    }
    actions
}
