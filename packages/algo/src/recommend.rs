//! Recommendations
//!
//! Emission order is part of the contract: difficulty advice, then content
//! format advice, then targeted practice for weak areas. The list is
//! truncated, never re-sorted.

use chrono::{DateTime, Duration, Utc};

use crate::config::RecommendationParams;
use crate::sanitize::mean;
use crate::types::{
    LearnerProfile, LearningStyle, Recommendation, RecommendationKind, SessionSummary,
};

#[derive(Debug, Clone, Default)]
pub struct RecommendationEngine {
    params: RecommendationParams,
}

impl RecommendationEngine {
    pub fn new(params: RecommendationParams) -> Self {
        Self { params }
    }

    pub fn recommend(
        &self,
        profile: &LearnerProfile,
        recent_sessions: &[SessionSummary],
    ) -> Vec<Recommendation> {
        self.recommend_at(profile, recent_sessions, Utc::now())
    }

    pub fn recommend_at(
        &self,
        profile: &LearnerProfile,
        recent_sessions: &[SessionSummary],
        now: DateTime<Utc>,
    ) -> Vec<Recommendation> {
        let p = &self.params;
        let mut out = Vec::new();

        if !recent_sessions.is_empty() {
            let performance = present_mean(recent_sessions.iter().map(|s| s.performance_score));
            let engagement = present_mean(recent_sessions.iter().map(|s| s.engagement_score));

            if let Some(performance) = performance.filter(|v| *v < p.low_performance) {
                out.push(self.build(
                    profile,
                    out.len(),
                    RecommendationKind::DifficultyAdjustment,
                    p.difficulty_priority,
                    "Reduce difficulty and review fundamentals".to_string(),
                    format!(
                        "Average performance over the last {} session(s) is {:.0}%, below the {:.0}% comfort level.",
                        recent_sessions.len(),
                        performance * 100.0,
                        p.low_performance * 100.0
                    ),
                    None,
                    p.difficulty_ttl_days,
                    now,
                ));
            }

            if let Some(engagement) = engagement.filter(|v| *v < p.low_engagement) {
                let (title, format) = match profile.learning_style {
                    LearningStyle::Visual => ("Switch to visual content", "diagrams and videos"),
                    _ => ("Switch to interactive content", "hands-on exercises"),
                };
                out.push(self.build(
                    profile,
                    out.len(),
                    RecommendationKind::ContentFormat,
                    p.format_priority,
                    title.to_string(),
                    format!(
                        "Engagement averaged {:.0}%; {} suit a {} learner better.",
                        engagement * 100.0,
                        format,
                        profile.learning_style.as_str()
                    ),
                    None,
                    p.format_ttl_days,
                    now,
                ));
            }
        }

        for area in profile.weak_areas.iter().take(p.weak_area_limit) {
            out.push(self.build(
                profile,
                out.len(),
                RecommendationKind::TargetedPractice,
                p.practice_priority,
                format!("Practice {area}"),
                format!("{area} is still a weak area; focused practice closes the gap fastest."),
                Some(area.clone()),
                p.practice_ttl_days,
                now,
            ));
        }

        out.truncate(p.max_items);
        tracing::debug!(
            user_id = %profile.user_id,
            sessions = recent_sessions.len(),
            count = out.len(),
            "recommendations generated"
        );
        out
    }

    #[allow(clippy::too_many_arguments)]
    fn build(
        &self,
        profile: &LearnerProfile,
        seq: usize,
        kind: RecommendationKind,
        priority: u8,
        title: String,
        reasoning: String,
        concept_id: Option<String>,
        ttl_days: i64,
        now: DateTime<Utc>,
    ) -> Recommendation {
        let suffix = concept_id.as_deref().unwrap_or("general");
        Recommendation {
            id: format!(
                "rec-{}-{}-{}-{}-{}",
                profile.user_id,
                seq,
                kind.as_str(),
                suffix,
                now.timestamp_millis()
            ),
            kind,
            priority: priority.clamp(1, 5),
            title,
            reasoning,
            concept_id,
            created_at: now,
            expires_at: (ttl_days > 0).then(|| now + Duration::days(ttl_days)),
        }
    }
}

/// Mean over the values that are present and finite.
fn present_mean(values: impl Iterator<Item = Option<f64>>) -> Option<f64> {
    let present: Vec<f64> = values.flatten().filter(|v| v.is_finite()).collect();
    mean(&present)
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    fn now() -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2024, 7, 1, 18, 0, 0).unwrap()
    }

    fn session(performance: Option<f64>, engagement: Option<f64>) -> SessionSummary {
        SessionSummary {
            session_id: "s".into(),
            user_id: "u1".into(),
            started_at: now(),
            duration_minutes: 30.0,
            performance_score: performance,
            engagement_score: engagement,
            concepts: Vec::new(),
        }
    }

    fn learner(weak: &[&str]) -> LearnerProfile {
        let mut profile = LearnerProfile::new("u1");
        profile.weak_areas = weak.iter().map(|w| w.to_string()).collect();
        profile
    }

    #[test]
    fn test_nothing_to_recommend() {
        let engine = RecommendationEngine::default();
        assert!(engine.recommend_at(&learner(&[]), &[], now()).is_empty());
    }

    #[test]
    fn test_healthy_sessions_yield_nothing() {
        let engine = RecommendationEngine::default();
        let sessions = vec![session(Some(0.9), Some(0.9)), session(Some(0.8), Some(0.75))];
        assert!(engine.recommend_at(&learner(&[]), &sessions, now()).is_empty());
    }

    #[test]
    fn test_low_performance_and_engagement() {
        let engine = RecommendationEngine::default();
        let sessions = vec![session(Some(0.5), Some(0.6)), session(Some(0.4), None)];
        let recs = engine.recommend_at(&learner(&[]), &sessions, now());
        assert_eq!(recs.len(), 2);
        assert_eq!(recs[0].kind, RecommendationKind::DifficultyAdjustment);
        assert_eq!(recs[0].priority, 4);
        assert_eq!(recs[0].expires_at, Some(now() + Duration::days(3)));
        assert_eq!(recs[1].kind, RecommendationKind::ContentFormat);
        assert_eq!(recs[1].priority, 3);
        assert_eq!(recs[1].title, "Switch to visual content");
    }

    #[test]
    fn test_non_visual_learners_get_interactive_content() {
        let engine = RecommendationEngine::default();
        let mut profile = learner(&[]);
        profile.learning_style = LearningStyle::Auditory;
        let recs = engine.recommend_at(&profile, &[session(None, Some(0.2))], now());
        assert_eq!(recs.len(), 1);
        assert_eq!(recs[0].title, "Switch to interactive content");
    }

    #[test]
    fn test_missing_scores_are_skipped() {
        let engine = RecommendationEngine::default();
        let recs = engine.recommend_at(&learner(&[]), &[session(None, None)], now());
        assert!(recs.is_empty());
    }

    #[test]
    fn test_only_first_three_weak_areas() {
        let engine = RecommendationEngine::default();
        let recs = engine.recommend_at(&learner(&["a", "b", "c", "d"]), &[], now());
        let concepts: Vec<_> = recs.iter().filter_map(|r| r.concept_id.as_deref()).collect();
        assert_eq!(concepts, vec!["a", "b", "c"]);
        assert!(recs.iter().all(|r| r.priority == 5));
    }

    #[test]
    fn test_truncated_to_five_in_emission_order() {
        let engine = RecommendationEngine::default();
        let sessions = vec![session(Some(0.1), Some(0.1))];
        let recs = engine.recommend_at(&learner(&["a", "b", "c"]), &sessions, now());
        assert_eq!(recs.len(), 5);
        let kinds: Vec<_> = recs.iter().map(|r| r.kind).collect();
        assert_eq!(
            kinds,
            vec![
                RecommendationKind::DifficultyAdjustment,
                RecommendationKind::ContentFormat,
                RecommendationKind::TargetedPractice,
                RecommendationKind::TargetedPractice,
                RecommendationKind::TargetedPractice,
            ]
        );
        // priority 5 entries stay after the priority 4 and 3 ones
        assert_eq!(recs[0].priority, 4);
        assert_eq!(recs[4].priority, 5);
    }

    #[test]
    fn test_cap_is_configurable() {
        let engine = RecommendationEngine::new(RecommendationParams {
            max_items: 2,
            ..RecommendationParams::default()
        });
        let recs = engine.recommend_at(&learner(&["a", "b", "c"]), &[], now());
        assert_eq!(recs.len(), 2);
    }

    #[test]
    fn test_duplicate_weak_areas_get_distinct_ids() {
        let engine = RecommendationEngine::default();
        let recs = engine.recommend_at(&learner(&["traits", "traits"]), &[], now());
        assert_eq!(recs.len(), 2);
        assert_ne!(recs[0].id, recs[1].id);
        assert!(recs[0].id.starts_with("rec-u1-0-targeted_practice-traits-"));
        assert!(recs[1].id.starts_with("rec-u1-1-targeted_practice-traits-"));
    }

    #[test]
    fn test_ids_are_distinct() {
        let engine = RecommendationEngine::default();
        let recs = engine.recommend_at(&learner(&["a", "b"]), &[session(Some(0.1), None)], now());
        let mut ids: Vec<_> = recs.iter().map(|r| r.id.clone()).collect();
        ids.sort();
        ids.dedup();
        assert_eq!(ids.len(), recs.len());
    }
}
