//! Greedy allocation engine.

use std::collections::HashMap;

use tracing::{debug, trace};

use super::scoring::{skill_match, workload_factor};
use super::workload::workload_report;
use super::AllocationConfig;
use crate::error::{EngineError, Result};
use crate::models::{Allocation, Assignment, Group, Individual, WorkItem};

/// Assigns each work item of a group to exactly one member.
///
/// # Example
/// ```
/// use u_teamform::allocation::{AllocationConfig, TaskAllocator};
/// use u_teamform::models::{Complexity, Group, Individual, Proficiency, WorkItem};
///
/// let population = vec![
///     Individual::new("A").with_skill("Python", Proficiency::Expert),
///     Individual::new("B").with_skill("React", Proficiency::Expert),
/// ];
/// let group = Group::new(1, "Group 1", vec!["A".into(), "B".into()], 0.5);
/// let items = vec![
///     WorkItem::new("T1", Complexity::High, 20.0).with_skill("React"),
///     WorkItem::new("T2", Complexity::Low, 5.0).with_skill("Python"),
/// ];
///
/// let allocation = TaskAllocator::new(AllocationConfig::default())
///     .allocate(&group, &population, &items)
///     .unwrap();
/// assert_eq!(allocation.assignee_of("T1"), Some("B"));
/// assert_eq!(allocation.assignee_of("T2"), Some("A"));
/// ```
#[derive(Debug, Clone, Default)]
pub struct TaskAllocator {
    config: AllocationConfig,
}

impl TaskAllocator {
    /// Creates an allocator.
    pub fn new(config: AllocationConfig) -> Self {
        Self { config }
    }

    /// Allocation parameters in use.
    pub fn config(&self) -> &AllocationConfig {
        &self.config
    }

    /// Allocates `items` across the members of `group`.
    ///
    /// Member IDs are resolved against `population`.
    ///
    /// # Errors
    /// - `UnknownMember` if a member ID is not in `population`
    /// - `EmptyGroup` if the group has no members but there are items
    /// - `InvalidConfiguration` for invalid parameters
    pub fn allocate(
        &self,
        group: &Group,
        population: &[Individual],
        items: &[WorkItem],
    ) -> Result<Allocation> {
        let by_id: HashMap<&str, &Individual> =
            population.iter().map(|i| (i.id.as_str(), i)).collect();
        let members = group
            .members
            .iter()
            .map(|id| {
                by_id.get(id.as_str()).copied().ok_or_else(|| EngineError::UnknownMember {
                    group: group.label.clone(),
                    member: id.clone(),
                })
            })
            .collect::<Result<Vec<_>>>()?;

        self.allocate_members(group.number, &group.label, &members, items)
    }

    /// Allocates `items` across already-resolved members.
    pub fn allocate_members(
        &self,
        group_number: usize,
        group_label: &str,
        members: &[&Individual],
        items: &[WorkItem],
    ) -> Result<Allocation> {
        self.config.validate()?;
        if members.is_empty() && !items.is_empty() {
            return Err(EngineError::EmptyGroup(group_label.to_string()));
        }

        // Stable: equal complexity keeps input order.
        let mut ordered: Vec<&WorkItem> = items.iter().collect();
        ordered.sort_by(|a, b| b.complexity.cmp(&a.complexity));

        let mut hours = vec![0.0_f64; members.len()];
        let mut assigned: Vec<Vec<String>> = vec![Vec::new(); members.len()];
        let mut assignments = Vec::with_capacity(ordered.len());

        for item in ordered {
            let average = hours.iter().sum::<f64>() / members.len() as f64;

            let mut best: Option<(usize, f64, f64)> = None;
            for (idx, member) in members.iter().enumerate() {
                let skill = skill_match(member, item, &self.config);
                let load = workload_factor(hours[idx], average, self.config.workload_epsilon);
                let score = self.config.skill_weight * skill + self.config.workload_weight * load;
                trace!(
                    work_item = %item.id,
                    member = %member.id,
                    skill_match = skill,
                    workload_factor = load,
                    score,
                    "candidate scored"
                );
                // strict: the earlier member keeps ties
                if best.map_or(true, |(_, _, top)| score > top) {
                    best = Some((idx, skill, score));
                }
            }

            // members is non-empty whenever there is an item to place
            let Some((idx, skill, score)) = best else {
                return Err(EngineError::EmptyGroup(group_label.to_string()));
            };
            hours[idx] += item.effort_hours;
            assigned[idx].push(item.id.clone());
            debug!(
                group = group_label,
                work_item = %item.id,
                member = %members[idx].id,
                skill_match = skill,
                score,
                "work item assigned"
            );
            assignments.push(Assignment::new(
                item.id.clone(),
                members[idx].id.clone(),
                skill,
                score,
                item.effort_hours,
            ));
        }

        let workload = workload_report(
            members
                .iter()
                .zip(hours)
                .zip(assigned)
                .map(|((m, h), ids)| (m.id.clone(), h, ids)),
            self.config.variance_threshold,
        );

        Ok(Allocation {
            group_number,
            group_label: group_label.to_string(),
            assignments,
            workload,
        })
    }
}
