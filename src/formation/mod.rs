//! Group formation strategies.
//!
//! Both strategies partition a population into bounded-size groups from
//! the same [`CompatibilityMatrix`] and return the same [`Formation`]
//! shape, so allocation never depends on which one ran.
//!
//! | Strategy | Approach | Size bounds |
//! |----------|----------|-------------|
//! | [`GreedyFormation`] | seed + best-mean candidate | leftovers merged into smallest group |
//! | [`EvolutionaryFormation`] | random-key GA over split points | out-of-bounds groups penalized |
//!
//! # Submodules
//!
//! - [`ga`]: genome encoding, fitness, and the generational GA runner
//!
//! # Reference
//! Falkenauer (1998), "Genetic Algorithms and Grouping Problems"

mod evolutionary;
pub mod ga;
mod greedy;
mod kpi;

pub use evolutionary::EvolutionaryFormation;
pub use greedy::GreedyFormation;
pub use kpi::FormationKpi;

use std::fmt::Debug;

use rand::RngCore;
use serde::{Deserialize, Serialize};
use tracing::warn;

use crate::compatibility::{round3, CompatibilityMatrix};
use crate::error::{check_issues, ConfigIssue, EngineError, Result};
use crate::models::{Group, Individual};
use crate::validation::{ValidationError, ValidationErrorKind};

/// Group size bounds shared by every strategy.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct FormationConfig {
    /// Smallest acceptable group.
    pub min_size: usize,
    /// Largest acceptable group.
    pub max_size: usize,
    /// Preferred group size.
    pub target_size: usize,
}

impl Default for FormationConfig {
    fn default() -> Self {
        Self {
            min_size: 3,
            max_size: 5,
            target_size: 4,
        }
    }
}

impl FormationConfig {
    /// Creates a config with explicit bounds.
    pub fn new(min_size: usize, target_size: usize, max_size: usize) -> Self {
        Self {
            min_size,
            max_size,
            target_size,
        }
    }

    /// Sets the minimum group size.
    pub fn with_min_size(mut self, min_size: usize) -> Self {
        self.min_size = min_size;
        self
    }

    /// Sets the maximum group size.
    pub fn with_max_size(mut self, max_size: usize) -> Self {
        self.max_size = max_size;
        self
    }

    /// Sets the target group size.
    pub fn with_target_size(mut self, target_size: usize) -> Self {
        self.target_size = target_size;
        self
    }

    /// Collects every bound problem.
    pub fn issues(&self) -> Vec<ConfigIssue> {
        let mut issues = Vec::new();
        if self.min_size == 0 {
            issues.push(ConfigIssue::new("min_size", "must be positive"));
        }
        if self.min_size > self.max_size {
            issues.push(ConfigIssue::new(
                "max_size",
                format!("must be at least min_size ({})", self.min_size),
            ));
        }
        if self.target_size < self.min_size || self.target_size > self.max_size {
            issues.push(ConfigIssue::new(
                "target_size",
                format!(
                    "must lie within [{}, {}]",
                    self.min_size, self.max_size
                ),
            ));
        }
        issues
    }

    /// Rejects invalid bounds.
    pub fn validate(&self) -> Result<()> {
        check_issues(self.issues())
    }
}

/// Non-fatal condition noticed during formation.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum FormationWarning {
    /// No individual has skills, availability, or personality data;
    /// all of those sub-scores are neutral.
    DegenerateInput,
    /// Fewer than two minimum-size groups' worth of individuals.
    SmallPopulation { available: usize, recommended: usize },
    /// Individuals left after the last full group were merged into a group.
    LeftoversMerged { count: usize, group: usize },
    /// A returned group lies outside the size bounds.
    SizeOutOfBounds { group: usize, size: usize },
}

/// Result of a formation run.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Formation {
    /// Name of the strategy that produced the groups.
    pub strategy: String,
    /// Groups in emission order.
    pub groups: Vec<Group>,
    /// Non-fatal conditions.
    pub warnings: Vec<FormationWarning>,
}

impl Formation {
    /// Number of groups.
    pub fn group_count(&self) -> usize {
        self.groups.len()
    }

    /// Mean of group compatibility scores. 0.0 without groups.
    pub fn average_compatibility(&self) -> f64 {
        if self.groups.is_empty() {
            return 0.0;
        }
        self.groups.iter().map(|g| g.compatibility).sum::<f64>() / self.groups.len() as f64
    }

    /// Group containing an individual.
    pub fn group_of(&self, id: &str) -> Option<&Group> {
        self.groups.iter().find(|g| g.contains(id))
    }

    /// Group by number.
    pub fn group(&self, number: usize) -> Option<&Group> {
        self.groups.iter().find(|g| g.number == number)
    }

    /// Whether every individual appears in exactly one group and no
    /// unknown IDs appear.
    pub fn covers_exactly(&self, population: &[Individual]) -> bool {
        let mut seen: Vec<&str> = self
            .groups
            .iter()
            .flat_map(|g| g.members.iter().map(|m| m.as_str()))
            .collect();
        let mut expected: Vec<&str> = population.iter().map(|i| i.id.as_str()).collect();
        seen.sort_unstable();
        expected.sort_unstable();
        seen == expected
    }
}

/// A way of partitioning a population into groups.
///
/// Implementations read the population and matrix only; randomness comes
/// from the injected generator so runs are reproducible under a fixed seed.
pub trait FormationStrategy: Send + Sync + Debug {
    /// Strategy name (e.g., "greedy", "evolutionary").
    fn name(&self) -> &'static str;

    /// Size bounds in use.
    fn config(&self) -> &FormationConfig;

    /// Every configuration problem of this strategy: the bounds plus any
    /// strategy-specific parameters.
    fn config_issues(&self) -> Vec<ConfigIssue> {
        self.config().issues()
    }

    /// Partitions `population`. `matrix` must be built from the same
    /// population in the same order.
    fn form(
        &self,
        population: &[Individual],
        matrix: &CompatibilityMatrix,
        rng: &mut dyn RngCore,
    ) -> Result<Formation>;
}

/// Shared checks run before any strategy computes.
///
/// Fatal: invalid bounds, matrix/population mismatch, population below
/// `min_size`. Non-fatal conditions come back as warnings.
pub(crate) fn precheck(
    population: &[Individual],
    matrix: &CompatibilityMatrix,
    config: &FormationConfig,
) -> Result<Vec<FormationWarning>> {
    config.validate()?;

    if matrix.len() != population.len() {
        return Err(EngineError::InvalidInput(vec![ValidationError::new(
            ValidationErrorKind::MatrixMismatch,
            format!(
                "Matrix covers {} individuals, population has {}",
                matrix.len(),
                population.len()
            ),
        )]));
    }

    let n = population.len();
    if n < config.min_size {
        return Err(EngineError::InsufficientPopulation {
            available: n,
            min_size: config.min_size,
        });
    }

    let mut warnings = Vec::new();
    let recommended = 2 * config.min_size;
    if n < recommended {
        warn!(available = n, recommended, "population smaller than two minimum groups");
        warnings.push(FormationWarning::SmallPopulation {
            available: n,
            recommended,
        });
    }
    if population.iter().all(|ind| !ind.has_profile_data()) {
        warn!(individuals = n, "no skill, availability, or personality data in population");
        warnings.push(FormationWarning::DegenerateInput);
    }
    Ok(warnings)
}

/// Turns index partitions into groups, numbering them from 1.
pub(crate) fn build_groups(
    partition: &[Vec<usize>],
    population: &[Individual],
    matrix: &CompatibilityMatrix,
    label_prefix: &str,
) -> Vec<Group> {
    partition
        .iter()
        .enumerate()
        .map(|(k, members)| {
            let number = k + 1;
            Group::new(
                number,
                format!("{label_prefix} {number}"),
                members.iter().map(|&i| population[i].id.clone()).collect(),
                round3(matrix.group_mean(members)),
            )
        })
        .collect()
}

/// Warnings for groups outside `[min_size, max_size]`.
pub(crate) fn bound_warnings(groups: &[Group], config: &FormationConfig) -> Vec<FormationWarning> {
    groups
        .iter()
        .filter(|g| !g.within_bounds(config.min_size, config.max_size))
        .map(|g| FormationWarning::SizeOutOfBounds {
            group: g.number,
            size: g.size(),
        })
        .collect()
}
