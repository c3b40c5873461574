//! Skill-aware task allocation within a group.
//!
//! # Algorithm
//!
//! 1. Stable-sort work items by complexity, High → Medium → Low.
//! 2. For each item, score every member:
//!    `0.7 · skill_match + 0.3 · workload_factor`, where
//!    `workload_factor = 1 − hours / (avg_hours + 0.1)`.
//! 3. Assign to the highest-scoring member (first on ties) and add the
//!    item's effort to that member's hours.
//! 4. Report each member's deviation from the group average and flag
//!    deviations beyond the variance threshold.
//!
//! Single pass, no backtracking: every decision is inspectable at the
//! moment it is made.
//!
//! # Reference
//! Pinedo (2016), "Scheduling: Theory, Algorithms, and Systems", Ch. 4
//! (list scheduling with priority dispatching)

mod engine;
mod scoring;
mod workload;

pub use engine::TaskAllocator;
pub use scoring::{skill_match, workload_factor};
pub use workload::{flag_at_risk_groups, workload_report, GroupRisk};

use serde::{Deserialize, Serialize};

use crate::error::{check_issues, ConfigIssue, Result};

/// Allocation scoring and reporting parameters.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct AllocationConfig {
    /// Weight of skill match in the composite score.
    pub skill_weight: f64,
    /// Weight of the workload factor in the composite score.
    pub workload_weight: f64,
    /// Added to the average workload to avoid dividing by zero.
    pub workload_epsilon: f64,
    /// Relative deviation from the average that flags a member (0.15 = 15%).
    pub variance_threshold: f64,
    /// Skill match for items that require no skills.
    pub neutral_skill_score: f64,
    /// Skill match for members with no skills at all.
    pub no_skills_score: f64,
}

impl Default for AllocationConfig {
    fn default() -> Self {
        Self {
            skill_weight: 0.7,
            workload_weight: 0.3,
            workload_epsilon: 0.1,
            variance_threshold: 0.15,
            neutral_skill_score: 0.5,
            no_skills_score: 0.1,
        }
    }
}

impl AllocationConfig {
    /// Sets the composite score weights.
    pub fn with_weights(mut self, skill_weight: f64, workload_weight: f64) -> Self {
        self.skill_weight = skill_weight;
        self.workload_weight = workload_weight;
        self
    }

    /// Sets the variance alert threshold.
    pub fn with_variance_threshold(mut self, threshold: f64) -> Self {
        self.variance_threshold = threshold;
        self
    }

    /// Sets the workload epsilon.
    pub fn with_workload_epsilon(mut self, epsilon: f64) -> Self {
        self.workload_epsilon = epsilon;
        self
    }

    /// Collects every parameter problem.
    pub fn issues(&self) -> Vec<ConfigIssue> {
        let mut issues = Vec::new();
        for (field, value) in [
            ("allocation.skill_weight", self.skill_weight),
            ("allocation.workload_weight", self.workload_weight),
            ("allocation.variance_threshold", self.variance_threshold),
        ] {
            if !value.is_finite() || value < 0.0 {
                issues.push(ConfigIssue::new(field, "must be a non-negative number"));
            }
        }
        if !self.workload_epsilon.is_finite() || self.workload_epsilon <= 0.0 {
            issues.push(ConfigIssue::new("allocation.workload_epsilon", "must be positive"));
        }
        for (field, value) in [
            ("allocation.neutral_skill_score", self.neutral_skill_score),
            ("allocation.no_skills_score", self.no_skills_score),
        ] {
            if !(0.0..=1.0).contains(&value) {
                issues.push(ConfigIssue::new(field, "must lie in [0, 1]"));
            }
        }
        issues
    }

    /// Rejects invalid parameters.
    pub fn validate(&self) -> Result<()> {
        check_issues(self.issues())
    }
}
