//! GA-driven group formation.
//!
//! Wraps [`GroupingProblem`] and [`GaRunner`] behind [`FormationStrategy`].
//! Groups outside the size bounds are penalized during search, never
//! dropped; any that survive into the best genome are reported as
//! [`FormationWarning::SizeOutOfBounds`].

use rand::RngCore;
use tracing::debug;

use super::ga::{GaConfig, GaRunner, GroupingProblem};
use super::{bound_warnings, build_groups, precheck, Formation, FormationConfig, FormationStrategy};
use crate::compatibility::CompatibilityMatrix;
use crate::error::{check_issues, ConfigIssue, Result};
use crate::models::Individual;

/// Evolutionary formation strategy.
///
/// # Example
///
/// ```
/// use rand::SeedableRng;
/// use rand::rngs::SmallRng;
/// use u_teamform::compatibility::{CompatibilityMatrix, CompatibilityModel};
/// use u_teamform::formation::{EvolutionaryFormation, FormationConfig, FormationStrategy};
/// use u_teamform::formation::ga::GaConfig;
/// use u_teamform::models::Individual;
///
/// let population: Vec<Individual> = (0..10).map(|i| Individual::new(format!("S{i}"))).collect();
/// let matrix = CompatibilityMatrix::build(&population, &CompatibilityModel::new());
/// let strategy = EvolutionaryFormation::new(FormationConfig::default())
///     .with_ga(GaConfig::default().with_population_size(20).with_max_generations(20));
/// let mut rng = SmallRng::seed_from_u64(7);
///
/// let formation = strategy.form(&population, &matrix, &mut rng).unwrap();
/// assert!(formation.covers_exactly(&population));
/// ```
#[derive(Debug, Clone, Default)]
pub struct EvolutionaryFormation {
    config: FormationConfig,
    ga: GaConfig,
}

impl EvolutionaryFormation {
    /// Label prefix of emitted groups.
    pub const LABEL: &'static str = "GA Group";

    /// Creates a strategy with default GA hyperparameters.
    pub fn new(config: FormationConfig) -> Self {
        Self {
            config,
            ga: GaConfig::default(),
        }
    }

    /// Sets GA hyperparameters.
    pub fn with_ga(mut self, ga: GaConfig) -> Self {
        self.ga = ga;
        self
    }

    /// GA hyperparameters in use.
    pub fn ga_config(&self) -> &GaConfig {
        &self.ga
    }
}

impl FormationStrategy for EvolutionaryFormation {
    fn name(&self) -> &'static str {
        "evolutionary"
    }

    fn config(&self) -> &FormationConfig {
        &self.config
    }

    fn config_issues(&self) -> Vec<ConfigIssue> {
        let mut issues = self.config.issues();
        issues.extend(self.ga.issues());
        issues
    }

    fn form(
        &self,
        population: &[Individual],
        matrix: &CompatibilityMatrix,
        mut rng: &mut dyn RngCore,
    ) -> Result<Formation> {
        check_issues(self.config_issues())?;
        let mut warnings = precheck(population, matrix, &self.config)?;

        let problem = GroupingProblem::new(matrix, &self.config, &self.ga);
        let result = GaRunner::run(&problem, &self.ga, &mut rng)?;
        debug!(
            best_fitness = result.best_fitness,
            initial_best_fitness = result.initial_best_fitness,
            evaluations = result.evaluations,
            "evolutionary search finished"
        );

        let partition = problem.decode(&result.best);
        let groups = build_groups(&partition, population, matrix, Self::LABEL);
        warnings.extend(bound_warnings(&groups, &self.config));

        Ok(Formation {
            strategy: self.name().to_string(),
            groups,
            warnings,
        })
    }
}
