//! Storage traits for learner data

use async_trait::async_trait;
use chrono::{DateTime, Utc};

use pathway_algo::{AssessmentResponse, LearnerProfile, Recommendation, SessionSummary};

#[derive(Debug, thiserror::Error)]
pub enum StoreError {
    /// Backend could not be reached or refused the operation
    #[error("store unavailable: {0}")]
    Unavailable(String),
}

/// Learner profile persistence
#[async_trait]
pub trait ProfileStore: Send + Sync {
    async fn load(&self, user_id: &str) -> Result<Option<LearnerProfile>, StoreError>;

    /// Persist a profile; `false` when the store declined the write
    async fn save(&self, profile: &LearnerProfile) -> Result<bool, StoreError>;
}

/// Read side of the session and assessment history
#[async_trait]
pub trait SessionStore: Send + Sync {
    /// At most `limit` of the latest sessions, oldest first
    async fn recent_sessions(
        &self,
        user_id: &str,
        limit: usize,
    ) -> Result<Vec<SessionSummary>, StoreError>;

    /// Graded attempts of one learner on one concept, oldest first
    async fn recent_responses(
        &self,
        user_id: &str,
        concept_id: &str,
    ) -> Result<Vec<AssessmentResponse>, StoreError>;
}

#[async_trait]
pub trait RecommendationStore: Send + Sync {
    /// Replace the learner's recommendation set
    async fn save_recommendations(
        &self,
        user_id: &str,
        recommendations: &[Recommendation],
    ) -> Result<(), StoreError>;

    /// Recommendations not yet expired at `now`
    async fn active_recommendations(
        &self,
        user_id: &str,
        now: DateTime<Utc>,
    ) -> Result<Vec<Recommendation>, StoreError>;
}
