//! Mastery estimation
//!
//! Turns the graded attempts on one concept into a `ConceptMastery`:
//!
//! ```text
//! success_rate     = correct / total
//! time_consistency = clamp(1 - stdev(times) / mean(times), 0, 1)
//! confidence       = 0.7 * success_rate + 0.3 * time_consistency
//! ```
//!
//! The record is always recomputed from the full attempt list; nothing is
//! carried over from an earlier estimate.

use std::collections::HashMap;

use chrono::{DateTime, Utc};
use rayon::prelude::*;

use crate::config::MasteryThresholds;
use crate::sanitize::{clamp_unit, finite_values, mean, population_std_dev};
use crate::types::{AssessmentResponse, ConceptMastery, SkillLevel};

#[derive(Debug, Clone, Default)]
pub struct MasteryEstimator {
    thresholds: MasteryThresholds,
}

impl MasteryEstimator {
    pub fn new(thresholds: MasteryThresholds) -> Self {
        Self { thresholds }
    }

    pub fn estimate(&self, concept_id: &str, responses: &[AssessmentResponse]) -> ConceptMastery {
        self.estimate_at(concept_id, responses, Utc::now())
    }

    /// Same as [`estimate`](Self::estimate) with an explicit clock. `now` is
    /// the assessment time when no response carries its own timestamp.
    pub fn estimate_at(
        &self,
        concept_id: &str,
        responses: &[AssessmentResponse],
        now: DateTime<Utc>,
    ) -> ConceptMastery {
        if responses.is_empty() {
            return ConceptMastery {
                concept_id: concept_id.to_string(),
                skill_level: SkillLevel::Novice,
                confidence: 0.0,
                last_assessed: now,
                attempts: 0,
                success_rate: 0.0,
            };
        }

        let total = responses.len();
        let correct = responses.iter().filter(|r| r.is_correct).count();
        let success_rate = correct as f64 / total as f64;

        let times: Vec<f64> = responses.iter().map(|r| r.time_taken_secs).collect();
        let consistency = self.time_consistency(&times);

        let confidence = clamp_unit(
            self.thresholds.success_weight * success_rate
                + self.thresholds.consistency_weight * consistency,
        );
        let skill_level = self.classify(success_rate, confidence);

        let last_assessed = responses
            .iter()
            .filter_map(|r| r.answered_at)
            .max()
            .unwrap_or(now);

        tracing::debug!(
            concept = concept_id,
            attempts = total,
            success_rate,
            confidence,
            level = skill_level.as_str(),
            "mastery estimated"
        );

        ConceptMastery {
            concept_id: concept_id.to_string(),
            skill_level,
            confidence,
            last_assessed,
            attempts: u32::try_from(total).unwrap_or(u32::MAX),
            success_rate,
        }
    }

    /// Estimates several concepts at once; concepts are independent so the
    /// work is spread over the rayon pool.
    pub fn estimate_all(
        &self,
        responses_by_concept: &HashMap<String, Vec<AssessmentResponse>>,
    ) -> HashMap<String, ConceptMastery> {
        let now = Utc::now();
        responses_by_concept
            .par_iter()
            .map(|(concept_id, responses)| {
                (concept_id.clone(), self.estimate_at(concept_id, responses, now))
            })
            .collect()
    }

    /// `1 - stdev/mean` clamped to [0, 1]. Returns the neutral value when
    /// there are too few finite timings or the mean is not positive.
    pub fn time_consistency(&self, times: &[f64]) -> f64 {
        let neutral = self.thresholds.neutral_consistency;
        let times = finite_values(times);
        if times.len() < self.thresholds.min_responses_for_consistency.max(1) {
            return neutral;
        }
        let Some(mu) = mean(&times) else {
            return neutral;
        };
        if mu <= 0.0 {
            return neutral;
        }
        clamp_unit(1.0 - population_std_dev(&times) / mu)
    }

    /// First matching rule wins, strictest first.
    pub fn classify(&self, success_rate: f64, confidence: f64) -> SkillLevel {
        let t = &self.thresholds;
        if t.expert.admits(success_rate, confidence) {
            SkillLevel::Expert
        } else if t.proficient.admits(success_rate, confidence) {
            SkillLevel::Proficient
        } else if t.competent.admits(success_rate, confidence) {
            SkillLevel::Competent
        } else if success_rate >= t.beginner_success_rate {
            SkillLevel::Beginner
        } else {
            SkillLevel::Novice
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    fn response(correct: bool, secs: f64) -> AssessmentResponse {
        AssessmentResponse::new("ownership", correct, secs)
    }

    fn fixed_now() -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2024, 5, 1, 9, 0, 0).unwrap()
    }

    #[test]
    fn test_empty_responses_are_novice() {
        let estimator = MasteryEstimator::default();
        let m = estimator.estimate_at("ownership", &[], fixed_now());
        assert_eq!(m.skill_level, SkillLevel::Novice);
        assert_eq!(m.confidence, 0.0);
        assert_eq!(m.success_rate, 0.0);
        assert_eq!(m.attempts, 0);
        assert_eq!(m.last_assessed, fixed_now());
    }

    #[test]
    fn test_consistent_perfect_answers_are_expert() {
        let estimator = MasteryEstimator::default();
        let responses = vec![response(true, 10.0), response(true, 10.0), response(true, 10.0)];
        let m = estimator.estimate("ownership", &responses);
        assert_eq!(m.success_rate, 1.0);
        assert!((estimator.time_consistency(&[10.0, 10.0, 10.0]) - 1.0).abs() < 1e-12);
        assert!((m.confidence - 1.0).abs() < 1e-12);
        assert_eq!(m.skill_level, SkillLevel::Expert);
        assert_eq!(m.attempts, 3);
    }

    #[test]
    fn test_half_correct_falls_short_of_competent() {
        let estimator = MasteryEstimator::default();
        let responses = vec![response(true, 20.0), response(false, 30.0)];
        let m = estimator.estimate("ownership", &responses);
        assert_eq!(m.success_rate, 0.5);
        assert!((estimator.time_consistency(&[20.0, 30.0]) - 0.8).abs() < 1e-12);
        assert!((m.confidence - 0.59).abs() < 1e-9);
        assert_eq!(m.skill_level, SkillLevel::Beginner);
    }

    #[test]
    fn test_single_response_uses_neutral_consistency() {
        let estimator = MasteryEstimator::default();
        let m = estimator.estimate("ownership", &[response(true, 12.0)]);
        // 0.7 * 1.0 + 0.3 * 0.5
        assert!((m.confidence - 0.85).abs() < 1e-9);
        assert_eq!(m.skill_level, SkillLevel::Expert);
    }

    #[test]
    fn test_zero_times_do_not_divide_by_zero() {
        let estimator = MasteryEstimator::default();
        assert_eq!(estimator.time_consistency(&[0.0, 0.0]), 0.5);
        assert_eq!(estimator.time_consistency(&[f64::NAN, 4.0]), 0.5);
        let m = estimator.estimate("x", &[response(false, 0.0), response(false, 0.0)]);
        assert!(m.confidence.is_finite());
        assert_eq!(m.skill_level, SkillLevel::Novice);
    }

    #[test]
    fn test_erratic_timing_clamps_to_zero() {
        let estimator = MasteryEstimator::default();
        // stdev larger than the mean
        let c = estimator.time_consistency(&[1.0, 1.0, 1.0, 100.0]);
        assert_eq!(c, 0.0);
    }

    #[test]
    fn test_classification_boundaries() {
        let estimator = MasteryEstimator::default();
        assert_eq!(estimator.classify(0.9, 0.8), SkillLevel::Expert);
        assert_eq!(estimator.classify(0.9, 0.79), SkillLevel::Proficient);
        assert_eq!(estimator.classify(0.8, 0.7), SkillLevel::Proficient);
        assert_eq!(estimator.classify(0.7, 0.6), SkillLevel::Competent);
        assert_eq!(estimator.classify(0.95, 0.55), SkillLevel::Beginner);
        assert_eq!(estimator.classify(0.5, 0.0), SkillLevel::Beginner);
        assert_eq!(estimator.classify(0.49, 0.9), SkillLevel::Novice);
    }

    #[test]
    fn test_last_assessed_uses_latest_answer() {
        let estimator = MasteryEstimator::default();
        let early = Utc.with_ymd_and_hms(2024, 4, 1, 8, 0, 0).unwrap();
        let late = Utc.with_ymd_and_hms(2024, 4, 3, 8, 0, 0).unwrap();
        let mut a = response(true, 10.0);
        a.answered_at = Some(late);
        let mut b = response(true, 11.0);
        b.answered_at = Some(early);
        let m = estimator.estimate_at("ownership", &[a, b], fixed_now());
        assert_eq!(m.last_assessed, late);
    }

    #[test]
    fn test_estimate_all_matches_single_estimates() {
        let estimator = MasteryEstimator::default();
        let mut batch = HashMap::new();
        batch.insert(
            "traits".to_string(),
            vec![response(true, 10.0), response(true, 10.0), response(true, 10.0)],
        );
        batch.insert("generics".to_string(), vec![response(false, 5.0)]);
        batch.insert("lifetimes".to_string(), Vec::new());

        let result = estimator.estimate_all(&batch);
        assert_eq!(result.len(), 3);
        assert_eq!(result["traits"].skill_level, SkillLevel::Expert);
        assert_eq!(result["traits"].concept_id, "traits");
        assert_eq!(result["generics"].skill_level, SkillLevel::Novice);
        assert_eq!(result["lifetimes"].attempts, 0);
    }
}
