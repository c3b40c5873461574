//! Workload balance reporting.

use serde::{Deserialize, Serialize};
use tracing::warn;

use crate::models::{Allocation, MemberWorkload, WorkloadReport};

/// Builds a workload report from `(member_id, hours, work_item_ids)` entries.
///
/// Deviation is `(hours - avg) / avg`, or 0.0 when the average is 0.
/// A member is flagged when `|deviation| > variance_threshold`.
pub fn workload_report<I>(entries: I, variance_threshold: f64) -> WorkloadReport
where
    I: IntoIterator<Item = (String, f64, Vec<String>)>,
{
    let entries: Vec<_> = entries.into_iter().collect();
    if entries.is_empty() {
        return WorkloadReport {
            members: Vec::new(),
            average_hours: 0.0,
            variance_threshold,
        };
    }

    let average_hours = entries.iter().map(|(_, h, _)| h).sum::<f64>() / entries.len() as f64;
    let members = entries
        .into_iter()
        .map(|(member_id, assigned_hours, work_item_ids)| {
            let deviation = if average_hours > 0.0 {
                (assigned_hours - average_hours) / average_hours
            } else {
                0.0
            };
            MemberWorkload {
                member_id,
                assigned_hours,
                work_item_ids,
                deviation,
                flagged: deviation.abs() > variance_threshold,
            }
        })
        .collect();

    WorkloadReport {
        members,
        average_hours,
        variance_threshold,
    }
}

/// A group whose workload is out of balance.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GroupRisk {
    /// Group number.
    pub group_number: usize,
    /// Group label.
    pub group_label: String,
    /// One line per flagged member.
    pub reasons: Vec<String>,
}

/// Lists groups with at least one flagged member.
///
/// Single-member groups are never at risk.
pub fn flag_at_risk_groups(allocations: &[Allocation]) -> Vec<GroupRisk> {
    let mut risks = Vec::new();
    for alloc in allocations {
        if alloc.workload.members.len() <= 1 {
            continue;
        }
        let reasons: Vec<String> = alloc
            .workload
            .flagged()
            .map(|m| {
                format!(
                    "Workload imbalance: {} has {:.1}% variance",
                    m.member_id,
                    m.deviation.abs() * 100.0
                )
            })
            .collect();
        if !reasons.is_empty() {
            warn!(
                group = %alloc.group_label,
                flagged = reasons.len(),
                "group at risk"
            );
            risks.push(GroupRisk {
                group_number: alloc.group_number,
                group_label: alloc.group_label.clone(),
                reasons,
            });
        }
    }
    risks
}
