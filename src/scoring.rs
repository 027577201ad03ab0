//! Document coherence score from the transition trace.
//!
//! Type and cost scores are each normalized to `[0, 1]` by their maximum
//! weight, then combined with a weighted mean (type:cost = 2:1 by default).

use serde::{Deserialize, Serialize};

use crate::errors::{CenteringError, CenteringResult};
use crate::transition::{Transition, TransitionCost, TransitionType};

/// Relative weight of transition type versus transition cost.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ScoringWeights {
    pub type_weight: f64,
    pub cost_weight: f64,
}

impl Default for ScoringWeights {
    fn default() -> Self {
        Self {
            type_weight: 2.0,
            cost_weight: 1.0,
        }
    }
}

impl ScoringWeights {
    pub fn new(type_weight: f64, cost_weight: f64) -> CenteringResult<Self> {
        let weights = Self {
            type_weight,
            cost_weight,
        };
        weights.validate()?;
        Ok(weights)
    }

    /// Both weights finite and non-negative, with a positive sum.
    pub fn validate(&self) -> CenteringResult<()> {
        let valid = |w: f64| w.is_finite() && w >= 0.0;
        if !valid(self.type_weight) || !valid(self.cost_weight) {
            return Err(CenteringError::InvalidConfig {
                message: format!(
                    "scoring weights must be finite and non-negative, got ({}, {})",
                    self.type_weight, self.cost_weight
                ),
            });
        }
        if self.type_weight + self.cost_weight <= 0.0 {
            return Err(CenteringError::InvalidConfig {
                message: "scoring weights must not both be zero".to_string(),
            });
        }
        Ok(())
    }
}

/// Aggregates transitions into a single coherence score.
#[derive(Debug, Clone, Copy, Default)]
pub struct CoherenceScorer {
    weights: ScoringWeights,
}

impl CoherenceScorer {
    pub fn new(weights: ScoringWeights) -> Self {
        Self { weights }
    }

    /// Score in `[0, 1]`. A document without transitions scores `1.0`.
    pub fn score(&self, transitions: &[Transition]) -> f64 {
        if transitions.is_empty() {
            return 1.0;
        }

        let count = transitions.len() as f64;
        let type_sum: f64 = transitions.iter().map(|t| t.kind.weight()).sum();
        let cost_sum: f64 = transitions.iter().map(|t| t.cost.weight()).sum();

        let type_score = type_sum / (TransitionType::MAX_WEIGHT * count);
        let cost_score = cost_sum / (TransitionCost::MAX_WEIGHT * count);

        let ScoringWeights {
            type_weight,
            cost_weight,
        } = self.weights;
        (type_weight * type_score + cost_weight * cost_score) / (type_weight + cost_weight)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn transitions(edges: &[(TransitionType, TransitionCost)]) -> Vec<Transition> {
        edges
            .iter()
            .enumerate()
            .map(|(i, &(kind, cost))| Transition {
                from: i,
                to: i + 1,
                kind,
                cost,
                placeholder: false,
            })
            .collect()
    }

    #[test]
    fn test_perfect_document() {
        let all = transitions(&[(TransitionType::Continue, TransitionCost::Cheap); 5]);
        assert_eq!(CoherenceScorer::default().score(&all), 1.0);
    }

    #[test]
    fn test_worst_document() {
        let all = transitions(&[(TransitionType::RoughShift, TransitionCost::Expensive); 4]);
        assert_eq!(CoherenceScorer::default().score(&all), 0.0);
    }

    #[test]
    fn test_no_transitions_is_coherent() {
        assert_eq!(CoherenceScorer::default().score(&[]), 1.0);
    }

    #[test]
    fn test_mixed_document() {
        let mixed = transitions(&[
            (TransitionType::Retain, TransitionCost::Expensive),
            (TransitionType::Continue, TransitionCost::Cheap),
        ]);
        // type 5/6, cost 1/2 → (2·5/6 + 1/2) / 3 = 13/18
        let score = CoherenceScorer::default().score(&mixed);
        assert!((score - 13.0 / 18.0).abs() < 1e-12);
    }

    #[test]
    fn test_custom_ratio() {
        let mixed = transitions(&[(TransitionType::SmoothShift, TransitionCost::Cheap)]);
        let type_only = CoherenceScorer::new(ScoringWeights::new(1.0, 0.0).unwrap());
        assert!((type_only.score(&mixed) - 1.0 / 3.0).abs() < 1e-12);

        let cost_only = CoherenceScorer::new(ScoringWeights::new(0.0, 1.0).unwrap());
        assert_eq!(cost_only.score(&mixed), 1.0);
    }

    #[test]
    fn test_invalid_weights() {
        assert!(ScoringWeights::new(0.0, 0.0).is_err());
        assert!(ScoringWeights::new(-1.0, 2.0).is_err());
        assert!(ScoringWeights::new(f64::NAN, 1.0).is_err());
    }
}
