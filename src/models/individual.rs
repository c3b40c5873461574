//! Individual (student) model.
//!
//! An individual is a person eligible for grouping. Every attribute used by
//! the compatibility model is optional or may be empty; the engine degrades
//! to neutral sub-scores when data is missing.

use serde::{Deserialize, Serialize};
use std::collections::{HashMap, HashSet};

/// A person to be placed into a group.
///
/// Records are read-only to the engine: formation and allocation runs take
/// a snapshot of the population and never mutate it.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Individual {
    /// Unique identifier.
    pub id: String,
    /// Human-readable name.
    pub name: String,
    /// Academic year level, if known.
    pub year_level: Option<u8>,
    /// Ability metric (e.g., grade-weighted average). `None` = unknown.
    ///
    /// Polarity is defined by [`AbilityScale`](crate::compatibility::AbilityScale).
    pub ability: Option<f64>,
    /// Technical skills. Order is irrelevant.
    pub skills: Vec<SkillRecord>,
    /// Weekly availability records.
    pub availability: Vec<AvailabilitySlot>,
    /// Big Five personality profile. `None` = not surveyed.
    pub personality: Option<PersonalityProfile>,
    /// Domain-specific key-value metadata.
    pub attributes: HashMap<String, String>,
}

/// A skill held by an individual.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SkillRecord {
    /// Skill name (e.g., "Python", "Database Design").
    pub name: String,
    /// Proficiency tier.
    pub proficiency: Proficiency,
    /// Years of hands-on experience.
    pub years_experience: f64,
}

/// Skill proficiency tier.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum Proficiency {
    Beginner,
    Intermediate,
    Advanced,
    Expert,
}

impl Proficiency {
    /// Contribution of this tier to a work item's skill match.
    pub fn weight(self) -> f64 {
        match self {
            Proficiency::Expert => 1.0,
            Proficiency::Advanced => 0.8,
            Proficiency::Intermediate => 0.6,
            Proficiency::Beginner => 0.3,
        }
    }
}

/// One (day, time slot) availability record.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct AvailabilitySlot {
    /// Day of week (e.g., "Monday").
    pub day: String,
    /// Time slot label (e.g., "Morning", "13:00-15:00").
    pub slot: String,
    /// Whether the individual is free in this slot.
    pub available: bool,
}

/// Big Five personality traits on a 1-5 Likert scale, plus learning style.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct PersonalityProfile {
    pub openness: f64,
    pub conscientiousness: f64,
    pub extraversion: f64,
    pub agreeableness: f64,
    pub neuroticism: f64,
    pub learning_style: LearningStyle,
}

/// Preferred learning style.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum LearningStyle {
    Visual,
    Auditory,
    Kinesthetic,
    ReadingWriting,
    #[default]
    Unspecified,
    /// Domain-specific style.
    Other(String),
}

impl Default for PersonalityProfile {
    /// Scale midpoint (3.0) for every trait.
    fn default() -> Self {
        Self {
            openness: 3.0,
            conscientiousness: 3.0,
            extraversion: 3.0,
            agreeableness: 3.0,
            neuroticism: 3.0,
            learning_style: LearningStyle::Unspecified,
        }
    }
}

impl PersonalityProfile {
    /// Creates a profile with all traits at the scale midpoint.
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_openness(mut self, value: f64) -> Self {
        self.openness = value;
        self
    }

    pub fn with_conscientiousness(mut self, value: f64) -> Self {
        self.conscientiousness = value;
        self
    }

    pub fn with_extraversion(mut self, value: f64) -> Self {
        self.extraversion = value;
        self
    }

    pub fn with_agreeableness(mut self, value: f64) -> Self {
        self.agreeableness = value;
        self
    }

    pub fn with_neuroticism(mut self, value: f64) -> Self {
        self.neuroticism = value;
        self
    }

    pub fn with_learning_style(mut self, style: LearningStyle) -> Self {
        self.learning_style = style;
        self
    }

    /// The five trait values in (O, C, E, A, N) order.
    pub fn traits(&self) -> [f64; 5] {
        [
            self.openness,
            self.conscientiousness,
            self.extraversion,
            self.agreeableness,
            self.neuroticism,
        ]
    }
}

impl Individual {
    /// Creates an individual with no attribute data.
    pub fn new(id: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            name: String::new(),
            year_level: None,
            ability: None,
            skills: Vec::new(),
            availability: Vec::new(),
            personality: None,
            attributes: HashMap::new(),
        }
    }

    /// Sets the display name.
    pub fn with_name(mut self, name: impl Into<String>) -> Self {
        self.name = name.into();
        self
    }

    /// Sets the year level.
    pub fn with_year_level(mut self, year_level: u8) -> Self {
        self.year_level = Some(year_level);
        self
    }

    /// Sets the ability metric.
    pub fn with_ability(mut self, ability: f64) -> Self {
        self.ability = Some(ability);
        self
    }

    /// Adds a skill with no recorded experience.
    pub fn with_skill(self, name: impl Into<String>, proficiency: Proficiency) -> Self {
        self.with_skill_experience(name, proficiency, 0.0)
    }

    /// Adds a skill with years of experience.
    pub fn with_skill_experience(
        mut self,
        name: impl Into<String>,
        proficiency: Proficiency,
        years_experience: f64,
    ) -> Self {
        self.skills.push(SkillRecord {
            name: name.into(),
            proficiency,
            years_experience: years_experience.max(0.0),
        });
        self
    }

    /// Marks a (day, slot) pair as available.
    pub fn with_available_slot(mut self, day: impl Into<String>, slot: impl Into<String>) -> Self {
        self.availability.push(AvailabilitySlot {
            day: day.into(),
            slot: slot.into(),
            available: true,
        });
        self
    }

    /// Adds an availability record with an explicit flag.
    pub fn with_availability(mut self, record: AvailabilitySlot) -> Self {
        self.availability.push(record);
        self
    }

    /// Sets the personality profile.
    pub fn with_personality(mut self, profile: PersonalityProfile) -> Self {
        self.personality = Some(profile);
        self
    }

    /// Adds a domain-specific attribute.
    pub fn with_attribute(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.attributes.insert(key.into(), value.into());
        self
    }

    /// Distinct skill names.
    pub fn skill_names(&self) -> HashSet<&str> {
        self.skills.iter().map(|s| s.name.as_str()).collect()
    }

    /// Proficiency for a skill, if held. The highest tier wins on duplicates.
    pub fn proficiency(&self, skill: &str) -> Option<Proficiency> {
        self.skills
            .iter()
            .filter(|s| s.name == skill)
            .map(|s| s.proficiency)
            .max()
    }

    /// Set of (day, slot) pairs marked available.
    pub fn available_slots(&self) -> HashSet<(&str, &str)> {
        self.availability
            .iter()
            .filter(|a| a.available)
            .map(|a| (a.day.as_str(), a.slot.as_str()))
            .collect()
    }

    /// Whether any of skills, availability or personality is present.
    ///
    /// Ability alone does not count: a population where nobody has profile
    /// data only differs on the ability sub-score.
    pub fn has_profile_data(&self) -> bool {
        !self.skills.is_empty()
            || self.availability.iter().any(|a| a.available)
            || self.personality.is_some()
    }
}
