//! Pairwise compatibility between individuals.
//!
//! [`CompatibilityModel::score`] combines four sub-scores, each in `[0, 1]`:
//!
//! | Sub-score | Rewards | Missing data |
//! |-----------|---------|--------------|
//! | Skill diversity | ~50% skill-name overlap | 0.5 |
//! | Ability balance | moderate ability spread | 0.5 |
//! | Availability overlap | shared free slots (Jaccard) | 0.5 |
//! | Personality | similar conscientiousness, high agreeableness, mixed extraversion | 0.5 |
//!
//! The overall score is a weighted mean, rounded to 3 decimals. It is
//! symmetric and total: any two individuals, including ones with no data,
//! produce a score.
//!
//! [`CompatibilityMatrix`] materializes all pair scores once per run.

mod matrix;

pub use matrix::CompatibilityMatrix;

use serde::{Deserialize, Serialize};

use crate::error::ConfigIssue;
use crate::models::Individual;

/// Sub-score returned when either side lacks the underlying data.
pub const NEUTRAL_SCORE: f64 = 0.5;

/// Weights of the four sub-scores in the overall score.
///
/// Weights are normalized by their sum, so only their ratios matter.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct CompatibilityWeights {
    pub skill: f64,
    pub ability: f64,
    pub availability: f64,
    pub personality: f64,
}

impl Default for CompatibilityWeights {
    fn default() -> Self {
        Self {
            skill: 0.30,
            ability: 0.20,
            availability: 0.30,
            personality: 0.20,
        }
    }
}

impl CompatibilityWeights {
    fn sum(&self) -> f64 {
        self.skill + self.ability + self.availability + self.personality
    }

    pub(crate) fn issues(&self) -> Vec<ConfigIssue> {
        let mut issues = Vec::new();
        for (field, value) in [
            ("weights.skill", self.skill),
            ("weights.ability", self.ability),
            ("weights.availability", self.availability),
            ("weights.personality", self.personality),
        ] {
            if !value.is_finite() || value < 0.0 {
                issues.push(ConfigIssue::new(field, "must be a non-negative number"));
            }
        }
        if issues.is_empty() && self.sum() <= 0.0 {
            issues.push(ConfigIssue::new("weights", "at least one weight must be positive"));
        }
        issues
    }
}

/// Weights inside the personality sub-score.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct PersonalityWeights {
    /// Weight of conscientiousness similarity.
    pub conscientiousness: f64,
    /// Weight of mean agreeableness.
    pub agreeableness: f64,
    /// Weight of extraversion spread.
    pub extraversion: f64,
}

impl Default for PersonalityWeights {
    fn default() -> Self {
        Self {
            conscientiousness: 0.4,
            agreeableness: 0.4,
            extraversion: 0.2,
        }
    }
}

/// Range of the ability metric.
///
/// Normalization maps `best` to 1.0 and `worst` to 0.0, so either polarity
/// works: the default `best = 1.0, worst = 5.0` is a grade scale where lower
/// is better; `best = 100.0, worst = 0.0` is a percentage where higher is.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct AbilityScale {
    pub best: f64,
    pub worst: f64,
}

impl Default for AbilityScale {
    fn default() -> Self {
        Self {
            best: 1.0,
            worst: 5.0,
        }
    }
}

impl AbilityScale {
    /// Normalizes an ability value to `[0, 1]`, higher is better.
    pub fn normalize(&self, ability: f64) -> f64 {
        ((self.worst - ability) / (self.worst - self.best)).clamp(0.0, 1.0)
    }

    pub(crate) fn issues(&self) -> Vec<ConfigIssue> {
        if !self.best.is_finite() || !self.worst.is_finite() {
            vec![ConfigIssue::new("ability_scale", "bounds must be finite")]
        } else if self.best == self.worst {
            vec![ConfigIssue::new("ability_scale", "best and worst must differ")]
        } else {
            Vec::new()
        }
    }
}

/// Per-factor view of a pair score.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ScoreBreakdown {
    pub skill: f64,
    pub ability: f64,
    pub availability: f64,
    pub personality: f64,
    /// Weighted, rounded overall score.
    pub overall: f64,
}

/// Pure, symmetric pairwise compatibility function.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct CompatibilityModel {
    pub weights: CompatibilityWeights,
    pub personality_weights: PersonalityWeights,
    pub ability_scale: AbilityScale,
}

impl CompatibilityModel {
    /// Creates a model with default weights.
    pub fn new() -> Self {
        Self::default()
    }

    /// Sets the sub-score weights.
    pub fn with_weights(mut self, weights: CompatibilityWeights) -> Self {
        self.weights = weights;
        self
    }

    /// Sets the personality factor weights.
    pub fn with_personality_weights(mut self, weights: PersonalityWeights) -> Self {
        self.personality_weights = weights;
        self
    }

    /// Sets the ability scale.
    pub fn with_ability_scale(mut self, scale: AbilityScale) -> Self {
        self.ability_scale = scale;
        self
    }

    /// Checks weights and scale, collecting every problem.
    pub fn issues(&self) -> Vec<ConfigIssue> {
        let mut issues = self.weights.issues();
        let p = &self.personality_weights;
        for (field, value) in [
            ("personality_weights.conscientiousness", p.conscientiousness),
            ("personality_weights.agreeableness", p.agreeableness),
            ("personality_weights.extraversion", p.extraversion),
        ] {
            if !value.is_finite() || value < 0.0 {
                issues.push(ConfigIssue::new(field, "must be a non-negative number"));
            }
        }
        issues.extend(self.ability_scale.issues());
        issues
    }

    /// Overall compatibility in `[0, 1]`, rounded to 3 decimals.
    pub fn score(&self, a: &Individual, b: &Individual) -> f64 {
        self.breakdown(a, b).overall
    }

    /// All four sub-scores plus the overall score.
    pub fn breakdown(&self, a: &Individual, b: &Individual) -> ScoreBreakdown {
        let skill = skill_diversity(a, b);
        let ability = self.ability_balance(a, b);
        let availability = availability_overlap(a, b);
        let personality = self.personality_compatibility(a, b);

        let w = &self.weights;
        let total = w.sum();
        let weighted = if total > 0.0 {
            (w.skill * skill
                + w.ability * ability
                + w.availability * availability
                + w.personality * personality)
                / total
        } else {
            NEUTRAL_SCORE
        };

        ScoreBreakdown {
            skill,
            ability,
            availability,
            personality,
            overall: round3(weighted.clamp(0.0, 1.0)),
        }
    }

    /// Step function over the normalized ability gap.
    ///
    /// | gap | score |
    /// |-----|-------|
    /// | < 0.2 | 0.7 (too similar) |
    /// | 0.2..=0.5 | 1.0 |
    /// | > 0.5 | 0.6 (too divergent) |
    pub fn ability_balance(&self, a: &Individual, b: &Individual) -> f64 {
        let (Some(x), Some(y)) = (a.ability, b.ability) else {
            return NEUTRAL_SCORE;
        };
        if !x.is_finite() || !y.is_finite() {
            return NEUTRAL_SCORE;
        }
        let gap = (self.ability_scale.normalize(x) - self.ability_scale.normalize(y)).abs();
        if (0.2..=0.5).contains(&gap) {
            1.0
        } else if gap < 0.2 {
            0.7
        } else {
            0.6
        }
    }

    /// Big Five based compatibility.
    ///
    /// Conscientiousness should match, agreeableness should be high on both
    /// sides, extraversion should differ somewhat.
    pub fn personality_compatibility(&self, a: &Individual, b: &Individual) -> f64 {
        let (Some(p), Some(q)) = (&a.personality, &b.personality) else {
            return NEUTRAL_SCORE;
        };

        let conscientiousness =
            (1.0 - (p.conscientiousness - q.conscientiousness).abs() / 4.0).clamp(0.0, 1.0);
        let agreeableness = ((p.agreeableness + q.agreeableness) / 2.0 / 5.0).clamp(0.0, 1.0);
        let extraversion = ((p.extraversion - q.extraversion).abs() / 4.0).clamp(0.0, 1.0);

        let w = &self.personality_weights;
        let total = w.conscientiousness + w.agreeableness + w.extraversion;
        if total <= 0.0 {
            return NEUTRAL_SCORE;
        }
        let score = (w.conscientiousness * conscientiousness
            + w.agreeableness * agreeableness
            + w.extraversion * extraversion)
            / total;
        if score.is_finite() {
            score.clamp(0.0, 1.0)
        } else {
            NEUTRAL_SCORE
        }
    }
}

/// Rewards partial skill overlap.
///
/// `overlap = |A ∩ B| / |A ∪ B|`, score `= max(0, 1 - 2·|overlap - 0.5|)`.
/// Identical and fully disjoint skill sets both score 0.
pub fn skill_diversity(a: &Individual, b: &Individual) -> f64 {
    let sa = a.skill_names();
    let sb = b.skill_names();
    if sa.is_empty() || sb.is_empty() {
        return NEUTRAL_SCORE;
    }
    let common = sa.intersection(&sb).count() as f64;
    let union = sa.union(&sb).count() as f64;
    let overlap = common / union;
    (1.0 - 2.0 * (overlap - 0.5).abs()).max(0.0)
}

/// Jaccard similarity of available (day, slot) sets.
pub fn availability_overlap(a: &Individual, b: &Individual) -> f64 {
    let sa = a.available_slots();
    let sb = b.available_slots();
    if sa.is_empty() || sb.is_empty() {
        return NEUTRAL_SCORE;
    }
    let common = sa.intersection(&sb).count() as f64;
    let union = sa.union(&sb).count() as f64;
    common / union
}

/// Rounds to 3 decimal places.
#[inline]
pub(crate) fn round3(value: f64) -> f64 {
    (value * 1000.0).round() / 1000.0
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{PersonalityProfile, Proficiency};
    use proptest::prelude::*;

    fn with_skills(id: &str, skills: &[&str]) -> Individual {
        skills
            .iter()
            .fold(Individual::new(id), |ind, s| ind.with_skill(*s, Proficiency::Intermediate))
    }

    fn with_slots(id: &str, slots: &[(&str, &str)]) -> Individual {
        slots
            .iter()
            .fold(Individual::new(id), |ind, (d, s)| ind.with_available_slot(*d, *s))
    }

    #[test]
    fn test_skill_diversity_empty_is_neutral() {
        let a = Individual::new("A");
        let b = with_skills("B", &["Python"]);
        assert_eq!(skill_diversity(&a, &b), 0.5);
        assert_eq!(skill_diversity(&a, &a), 0.5);
    }

    #[test]
    fn test_skill_diversity_half_overlap_is_best() {
        // {P, J} vs {P, S}: overlap 1/3
        let a = with_skills("A", &["Python", "Java"]);
        let b = with_skills("B", &["Python", "SQL"]);
        let expected = 1.0 - 2.0 * (1.0 / 3.0 - 0.5_f64).abs();
        assert!((skill_diversity(&a, &b) - expected).abs() < 1e-10);

        // {P, J} vs {P}: overlap 1/2
        let c = with_skills("C", &["Python"]);
        assert!((skill_diversity(&a, &c) - 1.0).abs() < 1e-10);
    }

    #[test]
    fn test_skill_diversity_extremes_score_zero() {
        let a = with_skills("A", &["Python", "Java"]);
        let same = with_skills("B", &["Java", "Python"]);
        let disjoint = with_skills("C", &["Go", "Rust"]);
        assert!(skill_diversity(&a, &same).abs() < 1e-10);
        assert!(skill_diversity(&a, &disjoint).abs() < 1e-10);
    }

    #[test]
    fn test_ability_balance_steps() {
        let model = CompatibilityModel::new();
        let a = Individual::new("A").with_ability(1.0);
        // normalized gap 0.25 → healthy spread
        let b = Individual::new("B").with_ability(2.0);
        // gap 0.0625 → too similar
        let c = Individual::new("C").with_ability(1.25);
        // gap 0.75 → too divergent
        let d = Individual::new("D").with_ability(4.0);

        assert!((model.ability_balance(&a, &b) - 1.0).abs() < 1e-10);
        assert!((model.ability_balance(&a, &c) - 0.7).abs() < 1e-10);
        assert!((model.ability_balance(&a, &d) - 0.6).abs() < 1e-10);
        assert!((model.ability_balance(&a, &Individual::new("E")) - 0.5).abs() < 1e-10);
    }

    #[test]
    fn test_ability_scale_higher_is_better() {
        let model = CompatibilityModel::new().with_ability_scale(AbilityScale {
            best: 100.0,
            worst: 0.0,
        });
        let a = Individual::new("A").with_ability(90.0);
        let b = Individual::new("B").with_ability(60.0);
        // gap 0.3
        assert!((model.ability_balance(&a, &b) - 1.0).abs() < 1e-10);
        assert!((model.ability_scale.normalize(90.0) - 0.9).abs() < 1e-10);
    }

    #[test]
    fn test_availability_jaccard() {
        let a = with_slots("A", &[("Mon", "AM"), ("Tue", "AM"), ("Wed", "PM")]);
        let b = with_slots("B", &[("Mon", "AM"), ("Wed", "PM"), ("Fri", "PM")]);
        assert!((availability_overlap(&a, &b) - 0.5).abs() < 1e-10);
        assert_eq!(availability_overlap(&a, &Individual::new("C")), 0.5);
    }

    #[test]
    fn test_personality_compatibility() {
        let model = CompatibilityModel::new();
        let a = Individual::new("A").with_personality(
            PersonalityProfile::new()
                .with_conscientiousness(5.0)
                .with_agreeableness(4.0)
                .with_extraversion(1.0),
        );
        let b = Individual::new("B").with_personality(
            PersonalityProfile::new()
                .with_conscientiousness(4.0)
                .with_agreeableness(5.0)
                .with_extraversion(5.0),
        );
        // 0.4 * 0.75 + 0.4 * 0.9 + 0.2 * 1.0
        let expected = 0.4 * 0.75 + 0.4 * 0.9 + 0.2 * 1.0;
        assert!((model.personality_compatibility(&a, &b) - expected).abs() < 1e-10);
        assert_eq!(model.personality_compatibility(&a, &Individual::new("C")), 0.5);
    }

    #[test]
    fn test_empty_individuals_score_neutral() {
        let model = CompatibilityModel::new();
        let a = Individual::new("A");
        let b = Individual::new("B");
        assert!((model.score(&a, &b) - 0.5).abs() < 1e-10);
    }

    #[test]
    fn test_score_is_rounded() {
        let model = CompatibilityModel::new();
        let a = with_skills("A", &["Python", "Java"]).with_ability(1.5);
        let b = with_skills("B", &["Python", "SQL"]).with_ability(2.5);
        let s = model.score(&a, &b);
        assert!(((s * 1000.0).round() - s * 1000.0).abs() < 1e-9);
    }

    #[test]
    fn test_weight_override() {
        let skills_only = CompatibilityModel::new().with_weights(CompatibilityWeights {
            skill: 1.0,
            ability: 0.0,
            availability: 0.0,
            personality: 0.0,
        });
        let a = with_skills("A", &["Python"]);
        let b = with_skills("B", &["Python"]);
        assert!(skills_only.score(&a, &b).abs() < 1e-10);
    }

    #[test]
    fn test_invalid_weights_reported() {
        let model = CompatibilityModel::new()
            .with_weights(CompatibilityWeights {
                skill: -1.0,
                ..Default::default()
            })
            .with_ability_scale(AbilityScale {
                best: 3.0,
                worst: 3.0,
            });
        let issues = model.issues();
        assert_eq!(issues.len(), 2);
        assert!(issues.iter().any(|i| i.field == "weights.skill"));
        assert!(issues.iter().any(|i| i.field == "ability_scale"));

        let zero = CompatibilityWeights {
            skill: 0.0,
            ability: 0.0,
            availability: 0.0,
            personality: 0.0,
        };
        assert_eq!(zero.issues().len(), 1);
    }

    fn arb_individual(id: &'static str) -> impl Strategy<Value = Individual> {
        let skills = prop::collection::vec(
            prop::sample::select(vec!["Py", "Js", "Sql", "Go", "Ux"]),
            0..4,
        );
        let slots = prop::collection::vec((0u8..5, 0u8..3), 0..6);
        let ability = prop::option::of(1.0f64..5.0);
        let traits = prop::option::of((1.0f64..5.0, 1.0f64..5.0, 1.0f64..5.0));
        (skills, slots, ability, traits).prop_map(move |(skills, slots, ability, traits)| {
            let mut ind = Individual::new(id);
            for s in skills {
                ind = ind.with_skill(s, Proficiency::Advanced);
            }
            for (d, t) in slots {
                ind = ind.with_available_slot(format!("D{d}"), format!("S{t}"));
            }
            ind.ability = ability;
            ind.personality = traits.map(|(c, a, e)| {
                PersonalityProfile::new()
                    .with_conscientiousness(c)
                    .with_agreeableness(a)
                    .with_extraversion(e)
            });
            ind
        })
    }

    proptest! {
        #[test]
        fn prop_score_symmetric_and_bounded(a in arb_individual("A"), b in arb_individual("B")) {
            let model = CompatibilityModel::new();
            let ab = model.score(&a, &b);
            let ba = model.score(&b, &a);
            prop_assert_eq!(ab, ba);
            prop_assert!((0.0..=1.0).contains(&ab));
        }
    }
}
