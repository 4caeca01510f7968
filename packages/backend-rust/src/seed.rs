use chrono::{Duration, Utc};
use uuid::Uuid;

use pathway_algo::{AssessmentResponse, Difficulty, LearnerProfile, LearningStyle, Pace, SessionSummary};

use crate::store::InMemoryStore;

pub const DEMO_USER_ID: &str = "demo-learner";

/// Seeds one learner with a short history: two concepts answered, a handful
/// of middling sessions.
pub fn seed_demo_learner(store: &InMemoryStore) {
    let mut profile = LearnerProfile::new(DEMO_USER_ID);
    profile.learning_style = LearningStyle::Kinesthetic;
    profile.pace = Pace::Normal;
    profile.preferred_difficulty = Difficulty::Intermediate;
    profile.cognitive_load_capacity = 0.6;
    profile.total_study_hours = 12.0;
    store.insert_profile(profile);

    let answers = [
        ("variables", true, 14.0),
        ("variables", true, 12.0),
        ("variables", true, 15.0),
        ("functions", true, 40.0),
        ("functions", false, 65.0),
        ("functions", false, 20.0),
    ];
    for (concept, correct, secs) in answers {
        store.record_response(DEMO_USER_ID, AssessmentResponse::new(concept, correct, secs));
    }

    let now = Utc::now();
    let scores = [(0.72, 0.8), (0.55, 0.6), (0.5, 0.65), (0.48, 0.55)];
    for (i, (performance, engagement)) in scores.into_iter().enumerate() {
        let days_ago = (scores.len() - i) as i64;
        store.record_session(SessionSummary {
            session_id: Uuid::new_v4().to_string(),
            user_id: DEMO_USER_ID.to_string(),
            started_at: now - Duration::days(days_ago),
            duration_minutes: 25.0,
            performance_score: Some(performance),
            engagement_score: Some(engagement),
            concepts: vec!["functions".to_string()],
        });
    }

    tracing::debug!(user_id = DEMO_USER_ID, "demo learner seeded");
}
