//! Greedy group constructor.
//!
//! # Algorithm
//!
//! While at least `min_size` individuals are ungrouped:
//! 1. If fewer than `target_size` remain, they all form the last group.
//! 2. Otherwise pick a random ungrouped seed and repeatedly add the
//!    candidate with the highest mean score against the current members
//!    until the group reaches `target_size`.
//!
//! Leftovers (fewer than `min_size`) join the group with the fewest members.
//!
//! # Complexity
//! O(n² · t) score lookups where t = target size.

use rand::{Rng, RngCore};
use tracing::{debug, warn};

use super::{
    build_groups, precheck, Formation, FormationConfig, FormationStrategy, FormationWarning,
};
use crate::compatibility::CompatibilityMatrix;
use crate::error::Result;
use crate::models::Individual;

/// Seed-and-grow greedy formation.
///
/// # Example
///
/// ```
/// use rand::SeedableRng;
/// use rand::rngs::SmallRng;
/// use u_teamform::compatibility::{CompatibilityMatrix, CompatibilityModel};
/// use u_teamform::formation::{FormationConfig, FormationStrategy, GreedyFormation};
/// use u_teamform::models::Individual;
///
/// let population: Vec<Individual> = (0..8).map(|i| Individual::new(format!("S{i}"))).collect();
/// let matrix = CompatibilityMatrix::build(&population, &CompatibilityModel::new());
/// let strategy = GreedyFormation::new(FormationConfig::default());
/// let mut rng = SmallRng::seed_from_u64(7);
///
/// let formation = strategy.form(&population, &matrix, &mut rng).unwrap();
/// assert_eq!(formation.group_count(), 2);
/// ```
#[derive(Debug, Clone, Default)]
pub struct GreedyFormation {
    config: FormationConfig,
}

impl GreedyFormation {
    /// Label prefix of emitted groups.
    pub const LABEL: &'static str = "Group";

    /// Creates a greedy strategy with the given bounds.
    pub fn new(config: FormationConfig) -> Self {
        Self { config }
    }

    /// Computes the index partition.
    ///
    /// Returns the partition and, if leftovers were merged, `(count, group index)`.
    pub fn partition<R: Rng>(
        &self,
        matrix: &CompatibilityMatrix,
        rng: &mut R,
    ) -> (Vec<Vec<usize>>, Option<(usize, usize)>) {
        let min_size = self.config.min_size;
        let target = self.config.target_size;
        let mut ungrouped: Vec<usize> = (0..matrix.len()).collect();
        let mut groups: Vec<Vec<usize>> = Vec::new();

        while !ungrouped.is_empty() && ungrouped.len() >= min_size {
            if ungrouped.len() < target {
                groups.push(std::mem::take(&mut ungrouped));
                continue;
            }

            let seed = ungrouped.remove(rng.random_range(0..ungrouped.len()));
            let mut group = vec![seed];

            while group.len() < target && !ungrouped.is_empty() {
                // Strict `>` keeps the first-seen candidate on ties.
                let mut best_pos = 0;
                let mut best_score = f64::NEG_INFINITY;
                for (pos, &candidate) in ungrouped.iter().enumerate() {
                    let score = matrix.mean_against(candidate, &group);
                    if score > best_score {
                        best_score = score;
                        best_pos = pos;
                    }
                }
                group.push(ungrouped.remove(best_pos));
            }

            debug!(size = group.len(), seed, "greedy group emitted");
            groups.push(group);
        }

        let mut merged = None;
        if !ungrouped.is_empty() {
            if let Some(smallest) = (0..groups.len()).min_by_key(|&k| groups[k].len()) {
                warn!(
                    count = ungrouped.len(),
                    group = smallest + 1,
                    "leftover individuals merged into smallest group"
                );
                merged = Some((ungrouped.len(), smallest));
                groups[smallest].append(&mut ungrouped);
            }
        }

        (groups, merged)
    }
}

impl FormationStrategy for GreedyFormation {
    fn name(&self) -> &'static str {
        "greedy"
    }

    fn config(&self) -> &FormationConfig {
        &self.config
    }

    fn form(
        &self,
        population: &[Individual],
        matrix: &CompatibilityMatrix,
        mut rng: &mut dyn RngCore,
    ) -> Result<Formation> {
        let mut warnings = precheck(population, matrix, &self.config)?;

        let (partition, merged) = self.partition(matrix, &mut rng);
        if let Some((count, index)) = merged {
            warnings.push(FormationWarning::LeftoversMerged {
                count,
                group: index + 1,
            });
        }

        let groups = build_groups(&partition, population, matrix, Self::LABEL);
        debug!(groups = groups.len(), "greedy formation complete");

        Ok(Formation {
            strategy: self.name().to_string(),
            groups,
            warnings,
        })
    }
}
