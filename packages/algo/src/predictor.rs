//! Outcome prediction
//!
//! ```text
//! readiness   = mean prerequisite confidence (unknown -> 0.0, none listed -> 0.5)
//! match       = 1 - |w(objective) - w(preferred)|
//! success     = 0.4 * readiness + 0.3 * match + 0.3 * capacity
//! time_factor = hours / (study_hours / 10 + 1)
//! completion  = clamp(success * (1 - 0.1 * time_factor), 0.1, 0.95)
//! ```

use crate::config::PredictorWeights;
use crate::types::{LearnerProfile, LearningObjective, LearningPath, OutcomePrediction};

#[derive(Debug, Clone, Default)]
pub struct OutcomePredictor {
    weights: PredictorWeights,
}

impl OutcomePredictor {
    pub fn new(weights: PredictorWeights) -> Self {
        Self { weights }
    }

    pub fn predict(
        &self,
        profile: &LearnerProfile,
        objective: &LearningObjective,
    ) -> OutcomePrediction {
        let w = &self.weights;
        let readiness = self.prerequisite_readiness(profile, objective);
        let difficulty_match = 1.0
            - (objective.difficulty.weight() - profile.preferred_difficulty.weight()).abs();
        let success = w.readiness * readiness
            + w.difficulty_match * difficulty_match
            + w.capacity * profile.effective_capacity();

        let study_hours = profile.total_study_hours.max(0.0);
        let time_factor = objective.estimated_hours / (study_hours / w.study_hours_scale + 1.0);
        // unvalidated weights may carry swapped bounds
        let floor = w.min_completion.min(w.max_completion);
        let ceiling = w.min_completion.max(w.max_completion);
        let completion = (success * (1.0 - w.time_penalty * time_factor)).clamp(floor, ceiling);

        OutcomePrediction {
            objective_id: objective.id.clone(),
            success_probability: success,
            completion_probability: completion,
            estimated_effort_hours: objective.estimated_hours,
            prerequisite_readiness: readiness,
        }
    }

    /// Predicts every objective of a path, in path order.
    pub fn annotate(&self, profile: &LearnerProfile, path: &LearningPath) -> Vec<OutcomePrediction> {
        path.objectives
            .iter()
            .map(|objective| self.predict(profile, objective))
            .collect()
    }

    // Objectives without prerequisites report the neutral readiness, while a
    // listed prerequisite with no mastery record counts as 0.0.
    fn prerequisite_readiness(&self, profile: &LearnerProfile, objective: &LearningObjective) -> f64 {
        if objective.prerequisites.is_empty() {
            return self.weights.neutral_readiness;
        }
        let total: f64 = objective
            .prerequisites
            .iter()
            .filter_map(|p| profile.mastery_of(p))
            .map(|m| m.confidence)
            .sum();
        total / objective.prerequisites.len() as f64
    }
}
