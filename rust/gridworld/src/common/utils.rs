use crate::GridState;

pub fn to_coords(s: GridState, cols: usize) -> (usize, usize) {
    (s / cols, s % cols)
}

pub fn from_coords(row: usize, col: usize, cols: usize) -> GridState {
    row * cols + col
}
