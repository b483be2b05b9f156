extern crate gridworld;
extern crate rand;
extern crate rayon;
extern crate serde;

pub mod mdps;
pub mod stats;

pub use mdps::{evaluation::*, mdp_simulator::*, occupancy::*, solvers::mc_methods::*};
pub use stats::*;
