//! End-to-end planning pipeline.
//!
//! population → validation → compatibility matrix → formation strategy →
//! per-group allocation → at-risk flags and KPIs.
//!
//! Every configuration and input check runs before the matrix is built.
//! The matrix is built once per run and shared read-only with the strategy.
//! Randomness comes from one `SmallRng` per run, seeded when a seed is set.

use std::collections::HashMap;
use std::sync::Arc;

use rand::rngs::SmallRng;
use rand::SeedableRng;
use serde::{Deserialize, Serialize};
use tracing::{debug, info};

use crate::allocation::{flag_at_risk_groups, AllocationConfig, GroupRisk, TaskAllocator};
use crate::compatibility::{CompatibilityMatrix, CompatibilityModel};
use crate::error::{check_issues, ConfigIssue, EngineError, Result};
use crate::formation::ga::GaConfig;
use crate::formation::{
    EvolutionaryFormation, Formation, FormationConfig, FormationKpi, FormationStrategy,
    GreedyFormation,
};
use crate::models::{Allocation, Individual, WorkItem};
use crate::validation::{validate_population, validate_work_items};

/// Input to a full planning run.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct PlanRequest {
    /// Individuals to partition.
    pub population: Vec<Individual>,
    /// Work items per group number.
    pub group_work_items: HashMap<usize, Vec<WorkItem>>,
    /// Work items for groups without their own list.
    pub shared_work_items: Vec<WorkItem>,
}

impl PlanRequest {
    /// Creates a request with no work items.
    pub fn new(population: Vec<Individual>) -> Self {
        Self {
            population,
            ..Self::default()
        }
    }

    /// Sets the work items of one group.
    pub fn with_group_items(mut self, group_number: usize, items: Vec<WorkItem>) -> Self {
        self.group_work_items.insert(group_number, items);
        self
    }

    /// Sets the fallback work items.
    pub fn with_shared_items(mut self, items: Vec<WorkItem>) -> Self {
        self.shared_work_items = items;
        self
    }

    /// Work items for a group: its own list, else the shared one.
    pub fn items_for(&self, group_number: usize) -> &[WorkItem] {
        self.group_work_items
            .get(&group_number)
            .map_or(self.shared_work_items.as_slice(), Vec::as_slice)
    }
}

/// Output of a full planning run.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Plan {
    /// Groups and formation warnings.
    pub formation: Formation,
    /// One allocation per group, in group order.
    pub allocations: Vec<Allocation>,
    /// Groups with workload imbalance.
    pub risks: Vec<GroupRisk>,
    /// Formation quality summary.
    pub kpi: FormationKpi,
}

/// Runs formation and allocation with one configured strategy.
///
/// # Example
/// ```
/// use u_teamform::formation::FormationConfig;
/// use u_teamform::models::{Complexity, Individual, Proficiency, WorkItem};
/// use u_teamform::planner::{PlanRequest, TeamPlanner};
///
/// let population: Vec<Individual> = (0..8)
///     .map(|i| Individual::new(format!("S{i}")).with_skill("Python", Proficiency::Intermediate))
///     .collect();
/// let request = PlanRequest::new(population)
///     .with_shared_items(vec![WorkItem::new("T1", Complexity::High, 10.0).with_skill("Python")]);
///
/// let plan = TeamPlanner::greedy(FormationConfig::default())
///     .with_seed(42)
///     .plan(&request)
///     .unwrap();
/// assert_eq!(plan.allocations.len(), plan.formation.group_count());
/// ```
#[derive(Debug, Clone)]
pub struct TeamPlanner {
    strategy: Arc<dyn FormationStrategy>,
    model: CompatibilityModel,
    allocator: TaskAllocator,
    seed: Option<u64>,
}

impl TeamPlanner {
    /// Creates a planner around any formation strategy.
    pub fn new<S: FormationStrategy + 'static>(strategy: S) -> Self {
        Self {
            strategy: Arc::new(strategy),
            model: CompatibilityModel::default(),
            allocator: TaskAllocator::default(),
            seed: None,
        }
    }

    /// Planner using greedy formation.
    pub fn greedy(config: FormationConfig) -> Self {
        Self::new(GreedyFormation::new(config))
    }

    /// Planner using evolutionary formation.
    pub fn evolutionary(config: FormationConfig, ga: GaConfig) -> Self {
        Self::new(EvolutionaryFormation::new(config).with_ga(ga))
    }

    /// Sets the compatibility model.
    pub fn with_model(mut self, model: CompatibilityModel) -> Self {
        self.model = model;
        self
    }

    /// Sets allocation parameters.
    pub fn with_allocation(mut self, config: AllocationConfig) -> Self {
        self.allocator = TaskAllocator::new(config);
        self
    }

    /// Fixes the random seed for reproducible runs.
    pub fn with_seed(mut self, seed: u64) -> Self {
        self.seed = Some(seed);
        self
    }

    /// The formation strategy in use.
    pub fn strategy(&self) -> &dyn FormationStrategy {
        self.strategy.as_ref()
    }

    /// The compatibility model in use.
    pub fn model(&self) -> &CompatibilityModel {
        &self.model
    }

    fn rng(&self) -> SmallRng {
        match self.seed {
            Some(seed) => SmallRng::seed_from_u64(seed),
            None => SmallRng::from_os_rng(),
        }
    }

    fn formation_issues(&self) -> Vec<ConfigIssue> {
        let mut issues = self.model.issues();
        issues.extend(self.strategy.config_issues());
        issues
    }

    fn check_population(&self, population: &[Individual]) -> Result<()> {
        validate_population(population).map_err(EngineError::InvalidInput)?;
        let min_size = self.strategy.config().min_size;
        if population.len() < min_size {
            return Err(EngineError::InsufficientPopulation {
                available: population.len(),
                min_size,
            });
        }
        Ok(())
    }

    /// Checks everything a run depends on without computing anything.
    ///
    /// Configuration issues from the compatibility model, the strategy,
    /// and the allocator are reported together. Every work item list in
    /// the request is validated, including the shared one.
    ///
    /// # Errors
    /// - `InvalidConfiguration` for bad weights, bounds, or GA and
    ///   allocation parameters
    /// - `InvalidInput` for malformed individuals or work items
    /// - `InsufficientPopulation` when fewer than `min_size` individuals
    pub fn validate(&self, request: &PlanRequest) -> Result<()> {
        let mut issues = self.formation_issues();
        issues.extend(self.allocator.config().issues());
        check_issues(issues)?;
        self.check_population(&request.population)?;

        let mut numbers: Vec<usize> = request.group_work_items.keys().copied().collect();
        numbers.sort_unstable();
        let errors: Vec<_> = numbers
            .iter()
            .filter_map(|n| request.group_work_items.get(n))
            .chain(std::iter::once(&request.shared_work_items))
            .filter_map(|items| validate_work_items(items).err())
            .flatten()
            .collect();
        if errors.is_empty() {
            Ok(())
        } else {
            Err(EngineError::InvalidInput(errors))
        }
    }

    /// Validates the population and partitions it into groups.
    ///
    /// # Errors
    /// - `InvalidInput` for malformed individuals
    /// - `InvalidConfiguration` for bad weights, bounds, or GA parameters
    /// - `InsufficientPopulation` when fewer than `min_size` individuals
    pub fn form(&self, population: &[Individual]) -> Result<Formation> {
        check_issues(self.formation_issues())?;
        self.check_population(population)?;
        self.run_strategy(population)
    }

    fn run_strategy(&self, population: &[Individual]) -> Result<Formation> {
        let matrix = CompatibilityMatrix::build(population, &self.model);
        let mut rng = self.rng();
        let formation = self.strategy.form(population, &matrix, &mut rng)?;
        info!(
            strategy = self.strategy.name(),
            individuals = population.len(),
            groups = formation.group_count(),
            avg_compatibility = formation.average_compatibility(),
            "formation complete"
        );
        Ok(formation)
    }

    /// Allocates each group's work items.
    pub fn allocate(
        &self,
        formation: &Formation,
        request: &PlanRequest,
    ) -> Result<Vec<Allocation>> {
        formation
            .groups
            .iter()
            .map(|group| {
                let items = request.items_for(group.number);
                validate_work_items(items).map_err(EngineError::InvalidInput)?;
                let allocation = self.allocator.allocate(group, &request.population, items)?;
                debug!(
                    group = %group.label,
                    assignments = allocation.assignment_count(),
                    balanced = allocation.workload.is_balanced(),
                    "group allocated"
                );
                Ok(allocation)
            })
            .collect()
    }

    /// Runs formation, allocation, risk flagging, and KPI calculation.
    ///
    /// The whole request is validated first, so no formation work is done
    /// for a run that allocation would reject.
    pub fn plan(&self, request: &PlanRequest) -> Result<Plan> {
        self.validate(request)?;
        let formation = self.run_strategy(&request.population)?;
        let allocations = self.allocate(&formation, request)?;
        let risks = flag_at_risk_groups(&allocations);
        let kpi = FormationKpi::calculate(&formation, self.strategy.config());
        Ok(Plan {
            formation,
            allocations,
            risks,
            kpi,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{Complexity, Proficiency};
    use std::sync::atomic::{AtomicBool, Ordering};

    /// Greedy formation that records whether it was asked to form.
    #[derive(Debug)]
    struct RecordingStrategy {
        inner: GreedyFormation,
        called: Arc<AtomicBool>,
    }

    impl RecordingStrategy {
        fn new(called: Arc<AtomicBool>) -> Self {
            Self {
                inner: GreedyFormation::new(FormationConfig::default()),
                called,
            }
        }
    }

    impl FormationStrategy for RecordingStrategy {
        fn name(&self) -> &'static str {
            "recording"
        }

        fn config(&self) -> &FormationConfig {
            self.inner.config()
        }

        fn form(
            &self,
            population: &[Individual],
            matrix: &CompatibilityMatrix,
            rng: &mut dyn rand::RngCore,
        ) -> Result<Formation> {
            self.called.store(true, Ordering::SeqCst);
            self.inner.form(population, matrix, rng)
        }
    }

    fn population(n: usize) -> Vec<Individual> {
        let skills = ["Python", "SQL", "React"];
        (0..n)
            .map(|i| {
                Individual::new(format!("S{i}"))
                    .with_ability(1.0 + (i % 4) as f64 * 0.5)
                    .with_skill(skills[i % 3], Proficiency::Advanced)
                    .with_available_slot("Mon", if i % 2 == 0 { "AM" } else { "PM" })
            })
            .collect()
    }

    fn items() -> Vec<WorkItem> {
        vec![
            WorkItem::new("T1", Complexity::High, 12.0).with_skill("Python"),
            WorkItem::new("T2", Complexity::Medium, 8.0).with_skill("SQL"),
            WorkItem::new("T3", Complexity::Low, 4.0).with_skill("React"),
        ]
    }

    #[test]
    fn test_items_for_prefers_group_list() {
        let request = PlanRequest::new(Vec::new())
            .with_shared_items(items())
            .with_group_items(2, vec![WorkItem::new("X", Complexity::Low, 1.0)]);
        assert_eq!(request.items_for(1).len(), 3);
        assert_eq!(request.items_for(2).len(), 1);
    }

    #[test]
    fn test_plan_greedy() {
        let request = PlanRequest::new(population(12)).with_shared_items(items());
        let plan = TeamPlanner::greedy(FormationConfig::default())
            .with_seed(42)
            .plan(&request)
            .unwrap();

        assert_eq!(plan.formation.group_count(), 3);
        assert!(plan.formation.covers_exactly(&request.population));
        assert_eq!(plan.allocations.len(), 3);
        assert!(plan.allocations.iter().all(|a| a.assignment_count() == 3));
        assert_eq!(plan.kpi.group_count, 3);
        assert_eq!(plan.kpi.out_of_bounds, 0);
    }

    #[test]
    fn test_plan_reproducible_with_seed() {
        let request = PlanRequest::new(population(10)).with_shared_items(items());
        let planner = TeamPlanner::evolutionary(
            FormationConfig::default(),
            GaConfig::default().with_population_size(16).with_max_generations(10),
        )
        .with_seed(9);

        assert_eq!(planner.plan(&request).unwrap(), planner.plan(&request).unwrap());
    }

    #[test]
    fn test_invalid_population_rejected() {
        let mut pop = population(6);
        pop.push(Individual::new("S0"));
        let err = TeamPlanner::greedy(FormationConfig::default())
            .form(&pop)
            .unwrap_err();
        assert!(matches!(err, EngineError::InvalidInput(ref e) if e.len() == 1));
    }

    #[test]
    fn test_invalid_work_items_rejected() {
        let request = PlanRequest::new(population(6))
            .with_shared_items(vec![WorkItem::new("T1", Complexity::Low, -2.0)]);
        let err = TeamPlanner::greedy(FormationConfig::default())
            .with_seed(1)
            .plan(&request)
            .unwrap_err();
        assert!(matches!(err, EngineError::InvalidInput(_)));
    }

    #[test]
    fn test_invalid_model_rejected() {
        let weights = crate::compatibility::CompatibilityWeights {
            skill: -1.0,
            ability: 0.2,
            availability: 0.3,
            personality: 0.2,
        };
        let model = CompatibilityModel::new().with_weights(weights);
        let err = TeamPlanner::greedy(FormationConfig::default())
            .with_model(model)
            .form(&population(6))
            .unwrap_err();
        assert!(matches!(err, EngineError::InvalidConfiguration(_)));
    }

    #[test]
    fn test_insufficient_population() {
        let err = TeamPlanner::greedy(FormationConfig::default())
            .form(&population(2))
            .unwrap_err();
        assert_eq!(
            err,
            EngineError::InsufficientPopulation {
                available: 2,
                min_size: 3
            }
        );
    }

    #[test]
    fn test_bad_allocation_config_rejected_before_formation() {
        let called = Arc::new(AtomicBool::new(false));
        let planner = TeamPlanner::new(RecordingStrategy::new(Arc::clone(&called)))
            .with_allocation(AllocationConfig::default().with_workload_epsilon(-1.0))
            .with_seed(1);
        let request = PlanRequest::new(population(12)).with_shared_items(items());

        let err = planner.plan(&request).unwrap_err();
        match err {
            EngineError::InvalidConfiguration(issues) => {
                assert!(issues.iter().any(|i| i.field == "allocation.workload_epsilon"));
            }
            other => panic!("unexpected error: {other:?}"),
        }
        assert!(!called.load(Ordering::SeqCst));
    }

    #[test]
    fn test_bad_work_items_rejected_before_formation() {
        let called = Arc::new(AtomicBool::new(false));
        let planner = TeamPlanner::new(RecordingStrategy::new(Arc::clone(&called)));
        let request = PlanRequest::new(population(12))
            .with_group_items(2, vec![WorkItem::new("T9", Complexity::Low, f64::NAN)]);

        assert!(matches!(planner.plan(&request), Err(EngineError::InvalidInput(_))));
        assert!(!called.load(Ordering::SeqCst));
    }

    #[test]
    fn test_ga_config_rejected_before_formation() {
        let planner = TeamPlanner::evolutionary(
            FormationConfig::default(),
            GaConfig::default().with_crossover_rate(1.5),
        );
        let err = planner.form(&population(12)).unwrap_err();
        match err {
            EngineError::InvalidConfiguration(issues) => {
                assert_eq!(issues.len(), 1);
                assert_eq!(issues[0].field, "ga.crossover_rate");
            }
            other => panic!("unexpected error: {other:?}"),
        }
    }

    #[test]
    fn test_recording_strategy_runs_on_valid_request() {
        let called = Arc::new(AtomicBool::new(false));
        let planner = TeamPlanner::new(RecordingStrategy::new(Arc::clone(&called))).with_seed(3);
        let request = PlanRequest::new(population(12)).with_shared_items(items());

        let plan = planner.plan(&request).unwrap();
        assert!(called.load(Ordering::SeqCst));
        assert_eq!(plan.formation.group_count(), 3);
    }

    #[test]
    fn test_strategy_accessor() {
        let planner = TeamPlanner::greedy(FormationConfig::default());
        assert_eq!(planner.strategy().name(), "greedy");
        assert_eq!(planner.strategy().config().target_size, 4);
    }
}
