//! Work item (task) model.
//!
//! Work items are supplied per group by the caller and consumed by the
//! allocation engine. The engine never creates them.

use serde::{Deserialize, Serialize};

/// A unit of work to be assigned to exactly one group member.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct WorkItem {
    /// Unique work item identifier.
    pub id: String,
    /// Human-readable name.
    pub name: String,
    /// Longer description.
    pub description: String,
    /// Skills needed to do the work. May be empty.
    pub required_skills: Vec<String>,
    /// Complexity tier.
    pub complexity: Complexity,
    /// Estimated effort in hours (positive).
    pub effort_hours: f64,
    /// Due date as an ISO-8601 date string. Informational only.
    pub deadline: Option<String>,
}

/// Complexity tier. Ordered `Low < Medium < High`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum Complexity {
    Low,
    Medium,
    High,
}

impl WorkItem {
    /// Creates a work item.
    pub fn new(id: impl Into<String>, complexity: Complexity, effort_hours: f64) -> Self {
        Self {
            id: id.into(),
            name: String::new(),
            description: String::new(),
            required_skills: Vec::new(),
            complexity,
            effort_hours,
            deadline: None,
        }
    }

    /// Sets the name.
    pub fn with_name(mut self, name: impl Into<String>) -> Self {
        self.name = name.into();
        self
    }

    /// Sets the description.
    pub fn with_description(mut self, description: impl Into<String>) -> Self {
        self.description = description.into();
        self
    }

    /// Adds a required skill.
    pub fn with_skill(mut self, skill: impl Into<String>) -> Self {
        self.required_skills.push(skill.into());
        self
    }

    /// Replaces the required skill list.
    pub fn with_skills<I, S>(mut self, skills: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.required_skills = skills.into_iter().map(Into::into).collect();
        self
    }

    /// Sets the deadline.
    pub fn with_deadline(mut self, deadline: impl Into<String>) -> Self {
        self.deadline = Some(deadline.into());
        self
    }

    /// Whether the item has no skill requirements.
    pub fn is_skill_agnostic(&self) -> bool {
        self.required_skills.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_work_item_builder() {
        let item = WorkItem::new("T1", Complexity::High, 20.0)
            .with_name("Database Design")
            .with_description("Design and implement database schema")
            .with_skills(["MySQL", "SQL"])
            .with_skill("Database Design")
            .with_deadline("2026-11-02");

        assert_eq!(item.id, "T1");
        assert_eq!(item.required_skills.len(), 3);
        assert_eq!(item.deadline.as_deref(), Some("2026-11-02"));
        assert!(!item.is_skill_agnostic());
    }

    #[test]
    fn test_complexity_ordering() {
        assert!(Complexity::High > Complexity::Medium);
        assert!(Complexity::Medium > Complexity::Low);
    }
}
