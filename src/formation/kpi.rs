//! Formation quality metrics.
//!
//! | Metric | Definition |
//! |--------|-----------|
//! | Average compatibility | Mean of group compatibility scores |
//! | Min / Max compatibility | Weakest and strongest group |
//! | Size histogram | group size → number of groups |
//! | Out of bounds | Groups outside `[min_size, max_size]` |
//! | On-target rate | Fraction of groups of exactly `target_size` |

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use super::{Formation, FormationConfig};

/// Summary indicators of a formation.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FormationKpi {
    /// Strategy that produced the formation.
    pub strategy: String,
    /// Number of groups.
    pub group_count: usize,
    /// Individuals placed.
    pub individual_count: usize,
    /// Mean group compatibility (0.0 without groups).
    pub avg_compatibility: f64,
    /// Lowest group compatibility.
    pub min_compatibility: f64,
    /// Highest group compatibility.
    pub max_compatibility: f64,
    /// Group size → count.
    pub size_histogram: BTreeMap<usize, usize>,
    /// Groups outside the size bounds.
    pub out_of_bounds: usize,
    /// Fraction of groups at the target size (0.0..1.0).
    pub on_target_rate: f64,
}

impl FormationKpi {
    /// Computes KPIs for a formation under the given bounds.
    pub fn calculate(formation: &Formation, config: &FormationConfig) -> Self {
        let groups = &formation.groups;
        let mut size_histogram = BTreeMap::new();
        let mut out_of_bounds = 0;
        let mut on_target = 0;
        let mut min_compatibility = f64::INFINITY;
        let mut max_compatibility = f64::NEG_INFINITY;

        for g in groups {
            *size_histogram.entry(g.size()).or_insert(0) += 1;
            if !g.within_bounds(config.min_size, config.max_size) {
                out_of_bounds += 1;
            }
            if g.size() == config.target_size {
                on_target += 1;
            }
            min_compatibility = min_compatibility.min(g.compatibility);
            max_compatibility = max_compatibility.max(g.compatibility);
        }

        let (min_compatibility, max_compatibility, on_target_rate) = if groups.is_empty() {
            (0.0, 0.0, 0.0)
        } else {
            (
                min_compatibility,
                max_compatibility,
                on_target as f64 / groups.len() as f64,
            )
        };

        Self {
            strategy: formation.strategy.clone(),
            group_count: groups.len(),
            individual_count: groups.iter().map(|g| g.size()).sum(),
            avg_compatibility: formation.average_compatibility(),
            min_compatibility,
            max_compatibility,
            size_histogram,
            out_of_bounds,
            on_target_rate,
        }
    }

    /// Relative change of average compatibility versus `baseline`, in percent.
    ///
    /// `None` when the baseline average is 0.
    pub fn improvement_over(&self, baseline: &FormationKpi) -> Option<f64> {
        if baseline.avg_compatibility == 0.0 {
            return None;
        }
        let gain = self.avg_compatibility - baseline.avg_compatibility;
        Some(gain / baseline.avg_compatibility * 100.0)
    }

    /// Whether every group respects the bounds and the average meets `min_avg`.
    pub fn meets_thresholds(&self, min_avg: f64) -> bool {
        self.out_of_bounds == 0 && self.avg_compatibility >= min_avg
    }
}
