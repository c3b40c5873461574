//! Input validation for formation and allocation.
//!
//! Checks structural integrity of individuals and work items before any
//! scoring happens. Detects:
//! - Duplicate or empty IDs
//! - Non-finite ability values
//! - Personality traits outside the 1–5 scale
//! - Negative or non-finite effort estimates
//!
//! Every check runs; all detected issues are returned together.

use std::collections::HashSet;
use std::fmt;

use crate::models::{Individual, WorkItem};

/// Lowest valid personality trait value.
pub const TRAIT_MIN: f64 = 1.0;
/// Highest valid personality trait value.
pub const TRAIT_MAX: f64 = 5.0;

/// Validation result.
pub type ValidationResult = Result<(), Vec<ValidationError>>;

/// A validation error.
#[derive(Debug, Clone, PartialEq)]
pub struct ValidationError {
    /// Error category.
    pub kind: ValidationErrorKind,
    /// Human-readable description.
    pub message: String,
}

/// Categories of validation errors.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ValidationErrorKind {
    /// Two entities share the same ID.
    DuplicateId,
    /// An entity has an empty ID.
    EmptyId,
    /// An ability value is NaN or infinite.
    InvalidAbility,
    /// A personality trait lies outside the 1–5 scale.
    TraitOutOfRange,
    /// A work item's effort is negative or not finite.
    InvalidEffort,
    /// A compatibility matrix was built for a different population.
    MatrixMismatch,
}

impl ValidationError {
    pub(crate) fn new(kind: ValidationErrorKind, message: impl Into<String>) -> Self {
        Self {
            kind,
            message: message.into(),
        }
    }
}

impl fmt::Display for ValidationError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.message)
    }
}

/// Validates a population before formation.
///
/// Checks:
/// 1. No empty individual IDs
/// 2. No duplicate individual IDs
/// 3. Ability, when present, is finite
/// 4. Personality traits, when present, lie in `[1, 5]`
///
/// # Returns
/// `Ok(())` if all checks pass, `Err(errors)` with all detected issues.
pub fn validate_population(population: &[Individual]) -> ValidationResult {
    let mut errors = Vec::new();
    let mut ids = HashSet::new();

    for ind in population {
        if ind.id.trim().is_empty() {
            errors.push(ValidationError::new(
                ValidationErrorKind::EmptyId,
                "Individual with empty ID",
            ));
        } else if !ids.insert(ind.id.as_str()) {
            errors.push(ValidationError::new(
                ValidationErrorKind::DuplicateId,
                format!("Duplicate individual ID: {}", ind.id),
            ));
        }

        if let Some(ability) = ind.ability {
            if !ability.is_finite() {
                errors.push(ValidationError::new(
                    ValidationErrorKind::InvalidAbility,
                    format!("Individual '{}' has non-finite ability", ind.id),
                ));
            }
        }

        if let Some(p) = &ind.personality {
            let names = [
                "openness",
                "conscientiousness",
                "extraversion",
                "agreeableness",
                "neuroticism",
            ];
            for (name, value) in names.iter().zip(p.traits()) {
                if !(TRAIT_MIN..=TRAIT_MAX).contains(&value) {
                    errors.push(ValidationError::new(
                        ValidationErrorKind::TraitOutOfRange,
                        format!("Individual '{}' has {name} {value} outside [1, 5]", ind.id),
                    ));
                }
            }
        }
    }

    if errors.is_empty() {
        Ok(())
    } else {
        Err(errors)
    }
}

/// Validates a group's work items before allocation.
///
/// Checks:
/// 1. No empty or duplicate work item IDs
/// 2. Effort is finite and non-negative
pub fn validate_work_items(items: &[WorkItem]) -> ValidationResult {
    let mut errors = Vec::new();
    let mut ids = HashSet::new();

    for item in items {
        if item.id.trim().is_empty() {
            errors.push(ValidationError::new(
                ValidationErrorKind::EmptyId,
                "Work item with empty ID",
            ));
        } else if !ids.insert(item.id.as_str()) {
            errors.push(ValidationError::new(
                ValidationErrorKind::DuplicateId,
                format!("Duplicate work item ID: {}", item.id),
            ));
        }

        if !item.effort_hours.is_finite() || item.effort_hours < 0.0 {
            errors.push(ValidationError::new(
                ValidationErrorKind::InvalidEffort,
                format!("Work item '{}' has invalid effort {}", item.id, item.effort_hours),
            ));
        }
    }

    if errors.is_empty() {
        Ok(())
    } else {
        Err(errors)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{Complexity, PersonalityProfile, Proficiency};

    fn sample_population() -> Vec<Individual> {
        vec![
            Individual::new("S1")
                .with_ability(1.5)
                .with_skill("Python", Proficiency::Expert)
                .with_personality(PersonalityProfile::new().with_conscientiousness(4.5)),
            Individual::new("S2").with_ability(2.75),
            Individual::new("S3"),
        ]
    }

    #[test]
    fn test_valid_population() {
        assert!(validate_population(&sample_population()).is_ok());
    }

    #[test]
    fn test_duplicate_individual_id() {
        let mut pop = sample_population();
        pop.push(Individual::new("S1"));

        let errors = validate_population(&pop).unwrap_err();
        assert_eq!(errors.len(), 1);
        assert_eq!(errors[0].kind, ValidationErrorKind::DuplicateId);
        assert!(errors[0].message.contains("S1"));
    }

    #[test]
    fn test_empty_id() {
        let pop = vec![Individual::new("  ")];
        let errors = validate_population(&pop).unwrap_err();
        assert!(errors.iter().any(|e| e.kind == ValidationErrorKind::EmptyId));
    }

    #[test]
    fn test_invalid_ability() {
        let pop = vec![Individual::new("S1").with_ability(f64::NAN)];
        let errors = validate_population(&pop).unwrap_err();
        assert!(errors.iter().any(|e| e.kind == ValidationErrorKind::InvalidAbility));
    }

    #[test]
    fn test_trait_out_of_range() {
        let pop = vec![Individual::new("S1")
            .with_personality(PersonalityProfile::new().with_extraversion(7.0).with_openness(0.0))];
        let errors = validate_population(&pop).unwrap_err();
        assert_eq!(errors.len(), 2);
        assert!(errors.iter().all(|e| e.kind == ValidationErrorKind::TraitOutOfRange));
    }

    #[test]
    fn test_valid_work_items() {
        let items = vec![
            WorkItem::new("T1", Complexity::High, 20.0),
            WorkItem::new("T2", Complexity::Low, 0.0),
        ];
        assert!(validate_work_items(&items).is_ok());
    }

    #[test]
    fn test_invalid_effort() {
        let items = vec![
            WorkItem::new("T1", Complexity::High, -1.0),
            WorkItem::new("T2", Complexity::Low, f64::INFINITY),
        ];
        let errors = validate_work_items(&items).unwrap_err();
        assert_eq!(errors.len(), 2);
        assert!(errors.iter().all(|e| e.kind == ValidationErrorKind::InvalidEffort));
    }

    #[test]
    fn test_multiple_errors() {
        let items = vec![
            WorkItem::new("T1", Complexity::High, 5.0),
            WorkItem::new("T1", Complexity::Low, -5.0),
            WorkItem::new("", Complexity::Low, 1.0),
        ];
        let errors = validate_work_items(&items).unwrap_err();
        assert_eq!(errors.len(), 3);
    }

    #[test]
    fn test_display_is_message() {
        let err = ValidationError::new(
            ValidationErrorKind::DuplicateId,
            "Duplicate individual ID: S1",
        );
        assert_eq!(err.to_string(), "Duplicate individual ID: S1");
    }
}
