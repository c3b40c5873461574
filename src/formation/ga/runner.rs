//! Generational GA runner.
//!
//! # Loop
//!
//! 1. Create and evaluate `population_size` random candidates.
//! 2. For each of `max_generations` generations:
//!    - tournament selection (with replacement) of a full offspring pool
//!    - crossover on successive pairs with probability `crossover_rate`
//!    - mutation per candidate with probability `mutation_rate`
//!    - re-evaluation of candidates whose genes changed
//! 3. Return the best candidate observed in any generation.
//!
//! Fitness is maximized. Generations run strictly in order; evaluation
//! within a generation may run on the rayon pool since it never touches
//! the random generator.
//!
//! # Reference
//! Goldberg & Deb (1991), "A Comparative Analysis of Selection Schemes
//! Used in Genetic Algorithms"

use rand::Rng;
use rayon::prelude::*;
use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::error::{check_issues, ConfigIssue, EngineError, Result};

/// A GA candidate with a cached fitness.
///
/// `None` marks stale fitness: the runner re-evaluates such candidates
/// and never reads a stale value.
pub trait Candidate: Clone + Send + Sync {
    /// Cached fitness, if current.
    fn fitness(&self) -> Option<f64>;

    /// Stores an evaluated fitness.
    fn set_fitness(&mut self, fitness: f64);

    /// Marks the cached fitness stale.
    fn invalidate(&mut self);
}

/// Problem definition plugged into [`GaRunner`].
pub trait GaProblem: Sync {
    type Candidate: Candidate;

    /// Creates a random candidate.
    fn create_candidate<R: Rng>(&self, rng: &mut R) -> Self::Candidate;

    /// Fitness of a candidate (higher = better). Must be pure.
    fn evaluate(&self, candidate: &Self::Candidate) -> f64;

    /// Recombines two candidates in place. Returns whether any gene changed.
    fn crossover<R: Rng>(
        &self,
        first: &mut Self::Candidate,
        second: &mut Self::Candidate,
        rng: &mut R,
    ) -> bool;

    /// Mutates a candidate in place. Returns whether any gene changed.
    fn mutate<R: Rng>(&self, candidate: &mut Self::Candidate, rng: &mut R) -> bool;
}

/// Evolutionary search hyperparameters.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct GaConfig {
    /// Candidates per generation.
    pub population_size: usize,
    /// Generations to run. The only termination criterion.
    pub max_generations: usize,
    /// Probability of recombining each successive pair.
    pub crossover_rate: f64,
    /// Probability that a candidate is considered for mutation.
    pub mutation_rate: f64,
    /// Per-gene flip probability inside a mutated candidate.
    pub gene_mutation_rate: f64,
    /// Contestants per tournament.
    pub tournament_size: usize,
    /// Fitness bonus per group of exactly the target size.
    pub target_bonus: f64,
    /// Fitness penalty per group outside the size bounds.
    pub size_penalty: f64,
    /// Evaluate fitness on the rayon pool.
    pub parallel: bool,
    /// Log progress every this many generations (0 = never).
    pub progress_interval: usize,
}

impl Default for GaConfig {
    fn default() -> Self {
        Self {
            population_size: 50,
            max_generations: 100,
            crossover_rate: 0.7,
            mutation_rate: 0.2,
            gene_mutation_rate: 0.05,
            tournament_size: 3,
            target_bonus: 0.1,
            size_penalty: 100.0,
            parallel: true,
            progress_interval: 20,
        }
    }
}

impl GaConfig {
    pub fn with_population_size(mut self, size: usize) -> Self {
        self.population_size = size;
        self
    }

    pub fn with_max_generations(mut self, generations: usize) -> Self {
        self.max_generations = generations;
        self
    }

    pub fn with_crossover_rate(mut self, rate: f64) -> Self {
        self.crossover_rate = rate;
        self
    }

    pub fn with_mutation_rate(mut self, rate: f64) -> Self {
        self.mutation_rate = rate;
        self
    }

    pub fn with_gene_mutation_rate(mut self, rate: f64) -> Self {
        self.gene_mutation_rate = rate;
        self
    }

    pub fn with_tournament_size(mut self, size: usize) -> Self {
        self.tournament_size = size;
        self
    }

    pub fn with_target_bonus(mut self, bonus: f64) -> Self {
        self.target_bonus = bonus;
        self
    }

    pub fn with_size_penalty(mut self, penalty: f64) -> Self {
        self.size_penalty = penalty;
        self
    }

    pub fn with_parallel(mut self, parallel: bool) -> Self {
        self.parallel = parallel;
        self
    }

    pub fn with_progress_interval(mut self, interval: usize) -> Self {
        self.progress_interval = interval;
        self
    }

    /// Collects every hyperparameter problem.
    pub fn issues(&self) -> Vec<ConfigIssue> {
        let mut issues = Vec::new();
        if self.population_size == 0 {
            issues.push(ConfigIssue::new("ga.population_size", "must be positive"));
        }
        if self.max_generations == 0 {
            issues.push(ConfigIssue::new("ga.max_generations", "must be positive"));
        }
        if self.tournament_size == 0 {
            issues.push(ConfigIssue::new("ga.tournament_size", "must be positive"));
        }
        for (field, p) in [
            ("ga.crossover_rate", self.crossover_rate),
            ("ga.mutation_rate", self.mutation_rate),
            ("ga.gene_mutation_rate", self.gene_mutation_rate),
        ] {
            if !(0.0..=1.0).contains(&p) {
                issues.push(ConfigIssue::new(field, "must lie in [0, 1]"));
            }
        }
        if !self.target_bonus.is_finite() {
            issues.push(ConfigIssue::new("ga.target_bonus", "must be finite"));
        }
        if !self.size_penalty.is_finite() || self.size_penalty < 0.0 {
            issues.push(ConfigIssue::new("ga.size_penalty", "must be a non-negative number"));
        }
        issues
    }

    /// Rejects invalid hyperparameters.
    pub fn validate(&self) -> Result<()> {
        check_issues(self.issues())
    }
}

/// One generation's candidates.
#[derive(Debug, Clone)]
pub struct Population<C> {
    members: Vec<C>,
}

impl<C: Candidate> Population<C> {
    /// Wraps candidates.
    pub fn new(members: Vec<C>) -> Self {
        Self { members }
    }

    /// Number of candidates.
    pub fn len(&self) -> usize {
        self.members.len()
    }

    /// Whether the population is empty.
    pub fn is_empty(&self) -> bool {
        self.members.is_empty()
    }

    /// Candidates in order.
    pub fn members(&self) -> &[C] {
        &self.members
    }

    /// Highest-fitness evaluated candidate; the first one on ties.
    pub fn best(&self) -> Option<&C> {
        let mut best: Option<(&C, f64)> = None;
        for c in &self.members {
            if let Some(f) = c.fitness() {
                match best {
                    Some((_, b)) if f <= b => {}
                    _ => best = Some((c, f)),
                }
            }
        }
        best.map(|(c, _)| c)
    }

    /// Evaluates stale candidates. Returns the number of evaluations.
    fn evaluate_stale<P>(&mut self, problem: &P, parallel: bool) -> usize
    where
        P: GaProblem<Candidate = C>,
    {
        if parallel {
            self.members
                .par_iter_mut()
                .filter(|c| c.fitness().is_none())
                .map(|c| {
                    let f = problem.evaluate(c);
                    c.set_fitness(f);
                    1usize
                })
                .sum()
        } else {
            let mut count = 0;
            for c in self.members.iter_mut().filter(|c| c.fitness().is_none()) {
                let f = problem.evaluate(c);
                c.set_fitness(f);
                count += 1;
            }
            count
        }
    }

    /// Tournament selection with replacement.
    fn tournament<R: Rng>(&self, size: usize, rng: &mut R) -> &C {
        let n = self.members.len();
        let mut winner = &self.members[rng.random_range(0..n)];
        for _ in 1..size {
            let contender = &self.members[rng.random_range(0..n)];
            if fitness_of(contender) > fitness_of(winner) {
                winner = contender;
            }
        }
        winner
    }
}

#[inline]
fn fitness_of<C: Candidate>(c: &C) -> f64 {
    c.fitness().unwrap_or(f64::NEG_INFINITY)
}

/// Outcome of a GA run.
#[derive(Debug, Clone)]
pub struct GaResult<C> {
    /// Best candidate observed in any generation.
    pub best: C,
    /// Fitness of `best`.
    pub best_fitness: f64,
    /// Best fitness of the initial random population.
    pub initial_best_fitness: f64,
    /// Generations run.
    pub generations: usize,
    /// Fitness evaluations performed.
    pub evaluations: usize,
    /// Best fitness per generation; index 0 is the initial population.
    pub history: Vec<f64>,
    /// Final generation.
    pub population: Population<C>,
}

/// Runs a [`GaProblem`] under a [`GaConfig`].
///
/// # Example
/// ```
/// use rand::SeedableRng;
/// use rand::rngs::SmallRng;
/// use u_teamform::compatibility::CompatibilityMatrix;
/// use u_teamform::formation::FormationConfig;
/// use u_teamform::formation::ga::{GaConfig, GaRunner, GroupingProblem};
///
/// let matrix = CompatibilityMatrix::from_fn(9, |i, j| if i / 3 == j / 3 { 0.9 } else { 0.2 });
/// let config = GaConfig::default().with_population_size(20).with_max_generations(10);
/// let problem = GroupingProblem::new(&matrix, &FormationConfig::new(3, 3, 3), &config);
/// let mut rng = SmallRng::seed_from_u64(42);
///
/// let result = GaRunner::run(&problem, &config, &mut rng).unwrap();
/// assert!(result.best_fitness >= result.initial_best_fitness);
/// ```
pub struct GaRunner;

impl GaRunner {
    /// Runs the full generation budget and returns the best candidate.
    pub fn run<P, R>(problem: &P, config: &GaConfig, rng: &mut R) -> Result<GaResult<P::Candidate>>
    where
        P: GaProblem,
        R: Rng,
    {
        config.validate()?;

        let mut population = Population::new(
            (0..config.population_size)
                .map(|_| problem.create_candidate(&mut *rng))
                .collect(),
        );
        let mut evaluations = population.evaluate_stale(problem, config.parallel);

        let initial_best = population.best().cloned().ok_or_else(|| {
            EngineError::InvalidConfiguration(vec![ConfigIssue::new(
                "ga.population_size",
                "produced no evaluated candidates",
            )])
        })?;
        let initial_best_fitness = fitness_of(&initial_best);
        let mut best = initial_best;
        let mut history = Vec::with_capacity(config.max_generations + 1);
        history.push(initial_best_fitness);

        for generation in 1..=config.max_generations {
            let mut offspring: Vec<P::Candidate> = (0..population.len())
                .map(|_| population.tournament(config.tournament_size, &mut *rng).clone())
                .collect();

            for pair in offspring.chunks_exact_mut(2) {
                if rng.random_bool(config.crossover_rate) {
                    let (first, second) = pair.split_at_mut(1);
                    if problem.crossover(&mut first[0], &mut second[0], rng) {
                        first[0].invalidate();
                        second[0].invalidate();
                    }
                }
            }

            for candidate in &mut offspring {
                if rng.random_bool(config.mutation_rate) && problem.mutate(candidate, rng) {
                    candidate.invalidate();
                }
            }

            population = Population::new(offspring);
            evaluations += population.evaluate_stale(problem, config.parallel);

            if let Some(generation_best) = population.best() {
                let f = fitness_of(generation_best);
                if f > fitness_of(&best) {
                    best = generation_best.clone();
                }
                history.push(f);
            }

            if config.progress_interval > 0 && generation % config.progress_interval == 0 {
                debug!(
                    generation,
                    generation_best = history.last().copied().unwrap_or(f64::NEG_INFINITY),
                    best = fitness_of(&best),
                    "ga progress"
                );
            }
        }

        let best_fitness = fitness_of(&best);
        debug!(
            generations = config.max_generations,
            evaluations, best_fitness, "ga finished"
        );

        Ok(GaResult {
            best,
            best_fitness,
            initial_best_fitness,
            generations: config.max_generations,
            evaluations,
            history,
            population,
        })
    }
}
