//! Grouping GA problem definition.
//!
//! Bridges the compatibility matrix to the generic GA runner.
//!
//! # Fitness
//!
//! ```text
//! fitness = Σ_groups mean_pair_score(g)
//!         + target_bonus · #{g : |g| = target_size}
//!         − size_penalty · #{g : |g| ∉ [min_size, max_size]}
//! ```

use rand::Rng;

use super::genome::{flip_mutation, two_point_crossover, Genome};
use super::runner::{GaConfig, GaProblem};
use crate::compatibility::CompatibilityMatrix;
use crate::formation::FormationConfig;

/// GA problem: partition the matrix's individuals into groups.
#[derive(Debug, Clone)]
pub struct GroupingProblem<'a> {
    matrix: &'a CompatibilityMatrix,
    /// Minimum group size.
    pub min_size: usize,
    /// Maximum group size.
    pub max_size: usize,
    /// Preferred group size.
    pub target_size: usize,
    /// Bonus per group of exactly `target_size`.
    pub target_bonus: f64,
    /// Penalty per group outside the bounds.
    pub size_penalty: f64,
    /// Per-gene flip probability during mutation.
    pub gene_mutation_rate: f64,
}

impl<'a> GroupingProblem<'a> {
    /// Creates a problem over a prebuilt matrix.
    pub fn new(matrix: &'a CompatibilityMatrix, bounds: &FormationConfig, ga: &GaConfig) -> Self {
        Self {
            matrix,
            min_size: bounds.min_size,
            max_size: bounds.max_size,
            target_size: bounds.target_size,
            target_bonus: ga.target_bonus,
            size_penalty: ga.size_penalty,
            gene_mutation_rate: ga.gene_mutation_rate,
        }
    }

    /// Decodes a genome under this problem's bounds.
    pub fn decode(&self, genome: &Genome) -> Vec<Vec<usize>> {
        genome.decode(self.min_size, self.max_size)
    }

    /// Fitness of an index partition.
    pub fn partition_fitness(&self, groups: &[Vec<usize>]) -> f64 {
        groups
            .iter()
            .map(|g| {
                let mut f = self.matrix.group_mean(g);
                if g.len() == self.target_size {
                    f += self.target_bonus;
                }
                if g.len() < self.min_size || g.len() > self.max_size {
                    f -= self.size_penalty;
                }
                f
            })
            .sum()
    }
}

impl GaProblem for GroupingProblem<'_> {
    type Candidate = Genome;

    fn create_candidate<R: Rng>(&self, rng: &mut R) -> Genome {
        Genome::random(self.matrix.len(), rng)
    }

    fn evaluate(&self, genome: &Genome) -> f64 {
        self.partition_fitness(&self.decode(genome))
    }

    fn crossover<R: Rng>(&self, first: &mut Genome, second: &mut Genome, rng: &mut R) -> bool {
        two_point_crossover(first, second, rng)
    }

    fn mutate<R: Rng>(&self, genome: &mut Genome, rng: &mut R) -> bool {
        flip_mutation(genome, self.gene_mutation_rate, rng)
    }
}
