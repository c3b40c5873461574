//! Per-member scoring terms.

use std::collections::HashSet;

use super::AllocationConfig;
use crate::models::{Individual, WorkItem};

/// How well a member's skills cover a work item, in `[0, 1]`.
///
/// - item requires no skills → `neutral_skill_score` (0.5)
/// - member lists no skills → `no_skills_score` (0.1)
/// - otherwise: mean proficiency weight over the distinct required skills
///   (Expert 1.0, Advanced 0.8, Intermediate 0.6, Beginner 0.3, absent 0),
///   capped at 1.0
pub fn skill_match(member: &Individual, item: &WorkItem, config: &AllocationConfig) -> f64 {
    if item.required_skills.is_empty() {
        return config.neutral_skill_score;
    }
    if member.skills.is_empty() {
        return config.no_skills_score;
    }
    let required: HashSet<&str> = item.required_skills.iter().map(String::as_str).collect();
    let total: f64 = required
        .iter()
        .filter_map(|skill| member.proficiency(skill))
        .map(|p| p.weight())
        .sum();
    (total / required.len() as f64).min(1.0)
}

/// `1 − hours / (average_hours + epsilon)`.
///
/// Falls below 0 once a member carries noticeably more than the average.
#[inline]
pub fn workload_factor(hours: f64, average_hours: f64, epsilon: f64) -> f64 {
    1.0 - hours / (average_hours + epsilon)
}
