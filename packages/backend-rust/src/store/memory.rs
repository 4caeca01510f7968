//! In-process store backed by hash maps

use std::collections::HashMap;
use std::sync::atomic::{AtomicBool, Ordering};

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use parking_lot::RwLock;

use pathway_algo::{AssessmentResponse, LearnerProfile, Recommendation, SessionSummary};

use super::traits::{ProfileStore, RecommendationStore, SessionStore, StoreError};

/// Implements every store contract; used by tests and the demo binary.
///
/// Locks are never held across an `.await`.
#[derive(Debug, Default)]
pub struct InMemoryStore {
    profiles: RwLock<HashMap<String, LearnerProfile>>,
    sessions: RwLock<HashMap<String, Vec<SessionSummary>>>,
    responses: RwLock<HashMap<(String, String), Vec<AssessmentResponse>>>,
    recommendations: RwLock<HashMap<String, Vec<Recommendation>>>,
    read_only: AtomicBool,
    offline: AtomicBool,
}

impl InMemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// While set, `ProfileStore::save` declines every write.
    pub fn set_read_only(&self, read_only: bool) {
        self.read_only.store(read_only, Ordering::Relaxed);
    }

    /// While set, every contract call fails with `StoreError::Unavailable`.
    pub fn set_offline(&self, offline: bool) {
        self.offline.store(offline, Ordering::Relaxed);
    }

    fn ensure_online(&self) -> Result<(), StoreError> {
        if self.offline.load(Ordering::Relaxed) {
            Err(StoreError::Unavailable("in-memory store is offline".to_string()))
        } else {
            Ok(())
        }
    }

    pub fn insert_profile(&self, profile: LearnerProfile) {
        self.profiles
            .write()
            .insert(profile.user_id.clone(), profile);
    }

    pub fn record_session(&self, session: SessionSummary) {
        let mut sessions = self.sessions.write();
        let history = sessions.entry(session.user_id.clone()).or_default();
        history.push(session);
        history.sort_by_key(|s| s.started_at);
    }

    pub fn record_response(&self, user_id: &str, response: AssessmentResponse) {
        self.responses
            .write()
            .entry((user_id.to_string(), response.concept_id.clone()))
            .or_default()
            .push(response);
    }

    pub fn profile_count(&self) -> usize {
        self.profiles.read().len()
    }
}

#[async_trait]
impl ProfileStore for InMemoryStore {
    async fn load(&self, user_id: &str) -> Result<Option<LearnerProfile>, StoreError> {
        self.ensure_online()?;
        Ok(self.profiles.read().get(user_id).cloned())
    }

    async fn save(&self, profile: &LearnerProfile) -> Result<bool, StoreError> {
        self.ensure_online()?;
        if self.read_only.load(Ordering::Relaxed) {
            return Ok(false);
        }
        self.insert_profile(profile.clone());
        Ok(true)
    }
}

#[async_trait]
impl SessionStore for InMemoryStore {
    async fn recent_sessions(
        &self,
        user_id: &str,
        limit: usize,
    ) -> Result<Vec<SessionSummary>, StoreError> {
        self.ensure_online()?;
        let sessions = self.sessions.read();
        let history = sessions.get(user_id).map(Vec::as_slice).unwrap_or(&[]);
        let start = history.len().saturating_sub(limit);
        Ok(history[start..].to_vec())
    }

    async fn recent_responses(
        &self,
        user_id: &str,
        concept_id: &str,
    ) -> Result<Vec<AssessmentResponse>, StoreError> {
        self.ensure_online()?;
        Ok(self
            .responses
            .read()
            .get(&(user_id.to_string(), concept_id.to_string()))
            .cloned()
            .unwrap_or_default())
    }
}

#[async_trait]
impl RecommendationStore for InMemoryStore {
    async fn save_recommendations(
        &self,
        user_id: &str,
        recommendations: &[Recommendation],
    ) -> Result<(), StoreError> {
        self.ensure_online()?;
        self.recommendations
            .write()
            .insert(user_id.to_string(), recommendations.to_vec());
        Ok(())
    }

    async fn active_recommendations(
        &self,
        user_id: &str,
        now: DateTime<Utc>,
    ) -> Result<Vec<Recommendation>, StoreError> {
        self.ensure_online()?;
        Ok(self
            .recommendations
            .read()
            .get(user_id)
            .map(|recs| recs.iter().filter(|r| !r.is_expired(now)).cloned().collect())
            .unwrap_or_default())
    }
}
