use std::sync::Arc;

use chrono::{DateTime, Duration, TimeZone, Utc};

use pathway_algo::{KnowledgeGraph, LearnerProfile, PathwayEngine, SessionSummary};
use pathway_backend::store::InMemoryStore;
use pathway_backend::PathwayService;

pub const USER: &str = "learner-1";

pub fn engine() -> Arc<PathwayEngine> {
    let graph = Arc::new(KnowledgeGraph::standard_curriculum().unwrap());
    Arc::new(PathwayEngine::with_defaults(graph))
}

/// Service over a fresh store that already holds a default profile for [`USER`].
pub fn service_with_learner() -> (PathwayService, Arc<InMemoryStore>) {
    let store = Arc::new(InMemoryStore::new());
    store.insert_profile(LearnerProfile::new(USER));
    let service = PathwayService::with_store(engine(), store.clone());
    (service, store)
}

pub fn day(n: i64) -> DateTime<Utc> {
    Utc.with_ymd_and_hms(2024, 5, 1, 9, 0, 0).unwrap() + Duration::days(n)
}

pub fn session(n: i64, performance: Option<f64>, engagement: Option<f64>) -> SessionSummary {
    SessionSummary {
        session_id: format!("session-{n}"),
        user_id: USER.to_string(),
        started_at: day(n),
        duration_minutes: 30.0,
        performance_score: performance,
        engagement_score: engagement,
        concepts: Vec::new(),
    }
}
