//! Allocation (solution) model.
//!
//! An allocation binds every work item of one group to exactly one member
//! and records the resulting workload distribution.

use serde::{Deserialize, Serialize};

/// A work item bound to one group member.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Assignment {
    /// Assigned work item ID.
    pub work_item_id: String,
    /// Assignee individual ID.
    pub member_id: String,
    /// Skill match (0.0..1.0) at assignment time.
    pub skill_match: f64,
    /// Composite score that won the assignment.
    pub score: f64,
    /// Effort added to the assignee's workload (hours).
    pub effort_hours: f64,
}

/// Hours assigned to one member.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MemberWorkload {
    /// Individual ID.
    pub member_id: String,
    /// Total assigned hours.
    pub assigned_hours: f64,
    /// Work items assigned, in assignment order.
    pub work_item_ids: Vec<String>,
    /// Relative deviation from the group average: `(hours - avg) / avg`.
    /// 0.0 when the average is 0.
    pub deviation: f64,
    /// Whether `|deviation|` exceeds the variance threshold.
    pub flagged: bool,
}

/// Per-member workload distribution for one group.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct WorkloadReport {
    /// One entry per member, in member order.
    pub members: Vec<MemberWorkload>,
    /// Mean assigned hours across members.
    pub average_hours: f64,
    /// Threshold used for flagging.
    pub variance_threshold: f64,
}

/// Result of allocating one group's work items.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Allocation {
    /// Group number the allocation belongs to.
    pub group_number: usize,
    /// Group label.
    pub group_label: String,
    /// Assignments in processing order (complexity descending).
    pub assignments: Vec<Assignment>,
    /// Workload distribution after all assignments.
    pub workload: WorkloadReport,
}

impl Assignment {
    /// Creates an assignment.
    pub fn new(
        work_item_id: impl Into<String>,
        member_id: impl Into<String>,
        skill_match: f64,
        score: f64,
        effort_hours: f64,
    ) -> Self {
        Self {
            work_item_id: work_item_id.into(),
            member_id: member_id.into(),
            skill_match,
            score,
            effort_hours,
        }
    }
}

impl WorkloadReport {
    /// Members whose workload deviates beyond the threshold.
    pub fn flagged(&self) -> impl Iterator<Item = &MemberWorkload> {
        self.members.iter().filter(|m| m.flagged)
    }

    /// Whether every member is within the threshold.
    pub fn is_balanced(&self) -> bool {
        self.members.iter().all(|m| !m.flagged)
    }

    /// Total hours across members.
    pub fn total_hours(&self) -> f64 {
        self.members.iter().map(|m| m.assigned_hours).sum()
    }

    /// Workload entry for a member.
    pub fn member(&self, member_id: &str) -> Option<&MemberWorkload> {
        self.members.iter().find(|m| m.member_id == member_id)
    }
}

impl Allocation {
    /// Number of assignments.
    pub fn assignment_count(&self) -> usize {
        self.assignments.len()
    }

    /// Whether nothing was assigned.
    pub fn is_empty(&self) -> bool {
        self.assignments.is_empty()
    }

    /// Assignee of a work item.
    pub fn assignee_of(&self, work_item_id: &str) -> Option<&str> {
        self.assignments
            .iter()
            .find(|a| a.work_item_id == work_item_id)
            .map(|a| a.member_id.as_str())
    }

    /// Assignments for a member, in assignment order.
    pub fn assignments_for<'a>(
        &'a self,
        member_id: &'a str,
    ) -> impl Iterator<Item = &'a Assignment> {
        self.assignments.iter().filter(move |a| a.member_id == member_id)
    }
}
