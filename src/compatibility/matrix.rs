//! Dense symmetric pair-score matrix.
//!
//! Stores only the strict upper triangle in one flat `Vec<f64>`, indexed by
//! the rank of the unordered pair. For `n` individuals that is
//! `n·(n-1)/2` scores; the diagonal is not stored and reads as 0.0.

use tracing::debug;

use super::CompatibilityModel;
use crate::models::Individual;

/// Pairwise compatibility scores for a population, in population order.
#[derive(Debug, Clone, PartialEq)]
pub struct CompatibilityMatrix {
    n: usize,
    scores: Vec<f64>,
}

impl CompatibilityMatrix {
    /// Scores every unordered pair of the population once.
    pub fn build(population: &[Individual], model: &CompatibilityModel) -> Self {
        let matrix = Self::from_fn(population.len(), |i, j| {
            model.score(&population[i], &population[j])
        });
        debug!(
            individuals = matrix.n,
            pairs = matrix.pair_count(),
            "compatibility matrix built"
        );
        matrix
    }

    /// Builds a matrix from a pair function called once per `i < j`.
    pub fn from_fn<F>(n: usize, mut score: F) -> Self
    where
        F: FnMut(usize, usize) -> f64,
    {
        let mut scores = Vec::with_capacity(n * n.saturating_sub(1) / 2);
        for i in 0..n {
            for j in (i + 1)..n {
                scores.push(score(i, j));
            }
        }
        Self { n, scores }
    }

    /// Number of individuals.
    #[inline]
    pub fn len(&self) -> usize {
        self.n
    }

    /// Whether the matrix covers no individuals.
    #[inline]
    pub fn is_empty(&self) -> bool {
        self.n == 0
    }

    /// Number of stored pair scores.
    #[inline]
    pub fn pair_count(&self) -> usize {
        self.scores.len()
    }

    /// Score of the pair `(i, j)`. Symmetric; 0.0 on the diagonal.
    ///
    /// # Panics
    /// If `i` or `j` is out of range.
    #[inline]
    pub fn get(&self, i: usize, j: usize) -> f64 {
        assert!(
            i < self.n && j < self.n,
            "pair ({i}, {j}) out of range for {} individuals",
            self.n
        );
        if i == j {
            return 0.0;
        }
        let (lo, hi) = if i < j { (i, j) } else { (j, i) };
        self.scores[self.rank(lo, hi)]
    }

    /// Mean score between `candidate` and every index in `members`.
    /// 0.0 when `members` is empty.
    pub fn mean_against(&self, candidate: usize, members: &[usize]) -> f64 {
        if members.is_empty() {
            return 0.0;
        }
        let sum: f64 = members.iter().map(|&m| self.get(candidate, m)).sum();
        sum / members.len() as f64
    }

    /// Mean of all intra-group pair scores. 0.0 for fewer than two members.
    pub fn group_mean(&self, members: &[usize]) -> f64 {
        let mut sum = 0.0;
        let mut count = 0usize;
        for (k, &a) in members.iter().enumerate() {
            for &b in &members[k + 1..] {
                sum += self.get(a, b);
                count += 1;
            }
        }
        if count == 0 {
            0.0
        } else {
            sum / count as f64
        }
    }

    // Row `lo` starts after the (n-1) + (n-2) + ... + (n-lo) pairs of earlier rows.
    #[inline]
    fn rank(&self, lo: usize, hi: usize) -> usize {
        lo * (2 * self.n - lo - 1) / 2 + (hi - lo - 1)
    }
}
