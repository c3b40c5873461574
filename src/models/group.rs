//! Group (team) model.
//!
//! A group is one cell of a partition produced by a formation run. Groups
//! are immutable once returned; a new formation run supersedes them.

use serde::{Deserialize, Serialize};

/// A formed group of individuals.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Group {
    /// 1-based position in emission order.
    pub number: usize,
    /// Display label (e.g., "Group 1", "GA Group 1").
    pub label: String,
    /// Member individual IDs. The first member leads the group.
    pub members: Vec<String>,
    /// Mean of intra-group pair scores, rounded to 3 decimals.
    /// 0.0 for a single-member group.
    pub compatibility: f64,
}

/// Role of a member within its group.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum MemberRole {
    Leader,
    Member,
}

impl Group {
    /// Creates a group.
    pub fn new(
        number: usize,
        label: impl Into<String>,
        members: Vec<String>,
        compatibility: f64,
    ) -> Self {
        Self {
            number,
            label: label.into(),
            members,
            compatibility,
        }
    }

    /// Number of members.
    #[inline]
    pub fn size(&self) -> usize {
        self.members.len()
    }

    /// Whether the group has no members.
    pub fn is_empty(&self) -> bool {
        self.members.is_empty()
    }

    /// The leading member (first member), if any.
    pub fn leader(&self) -> Option<&str> {
        self.members.first().map(|s| s.as_str())
    }

    /// Whether the given individual belongs to this group.
    pub fn contains(&self, id: &str) -> bool {
        self.members.iter().any(|m| m == id)
    }

    /// Members paired with their role.
    pub fn roles(&self) -> Vec<(&str, MemberRole)> {
        self.members
            .iter()
            .enumerate()
            .map(|(i, m)| {
                let role = if i == 0 {
                    MemberRole::Leader
                } else {
                    MemberRole::Member
                };
                (m.as_str(), role)
            })
            .collect()
    }

    /// Whether the size lies within `[min_size, max_size]`.
    pub fn within_bounds(&self, min_size: usize, max_size: usize) -> bool {
        (min_size..=max_size).contains(&self.size())
    }
}
