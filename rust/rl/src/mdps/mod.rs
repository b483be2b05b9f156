pub mod evaluation;
pub mod mdp_simulator;
pub mod occupancy;
pub mod solvers;
