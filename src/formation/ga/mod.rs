//! GA-based group formation.
//!
//! Values only, constructed per run: a [`Genome`] per candidate, a
//! [`Population`] per generation, a [`GroupingProblem`] borrowing the
//! run's compatibility matrix, and a [`GaRunner`] driving generations.
//!
//! # Encoding
//!
//! Random keys: one gene per individual in matrix order; genes above 0.5
//! request a split. See [`genome`] for the decoding rules.
//!
//! # Operators
//!
//! - Selection: tournament (size 3, with replacement)
//! - Crossover: two-point, applied to successive pairs
//! - Mutation: per-gene flip across the split threshold
//!
//! # Reference
//! Falkenauer (1998), "Genetic Algorithms and Grouping Problems"

pub mod genome;
mod problem;
mod runner;

pub use genome::{decode, flip_mutation, two_point_crossover, Genome, SPLIT_THRESHOLD};
pub use problem::GroupingProblem;
pub use runner::{Candidate, GaConfig, GaProblem, GaResult, GaRunner, Population};
