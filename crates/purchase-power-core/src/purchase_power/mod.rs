pub mod calculator;
pub mod input;
pub mod rationale;
pub mod solver;
