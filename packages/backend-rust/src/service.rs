//! Orchestration of the engine over the stores
//!
//! Every operation loads what it needs, runs the pure engine, and writes the
//! result back. Profiles are replaced wholesale, never patched in place.

use std::collections::HashMap;
use std::sync::Arc;

use chrono::Utc;
use serde::{Deserialize, Serialize};

use pathway_algo::{
    Difficulty, InteractionSignal, LearnerProfile, LearningPath, LearningStyle,
    OutcomePrediction, PathwayEngine, Recommendation,
};

use crate::config::DEFAULT_SESSION_LIMIT;
use crate::store::{ProfileStore, RecommendationStore, SessionStore, StoreError};

#[derive(Debug, thiserror::Error)]
pub enum ServiceError {
    #[error("learner profile not found: {0}")]
    ProfileNotFound(String),
    #[error("profile store rejected the update for {0}")]
    SaveRejected(String),
    #[error("store error: {0}")]
    Store(#[from] StoreError),
}

/// A planned path together with one prediction per objective, in path order
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PlannedPath {
    pub path: LearningPath,
    pub predictions: Vec<OutcomePrediction>,
}

#[derive(Clone)]
pub struct PathwayService {
    engine: Arc<PathwayEngine>,
    profiles: Arc<dyn ProfileStore>,
    sessions: Arc<dyn SessionStore>,
    recommendations: Arc<dyn RecommendationStore>,
    session_limit: usize,
}

impl PathwayService {
    pub fn new(
        engine: Arc<PathwayEngine>,
        profiles: Arc<dyn ProfileStore>,
        sessions: Arc<dyn SessionStore>,
        recommendations: Arc<dyn RecommendationStore>,
    ) -> Self {
        Self {
            engine,
            profiles,
            sessions,
            recommendations,
            session_limit: DEFAULT_SESSION_LIMIT,
        }
    }

    /// Uses one backend for all three contracts.
    pub fn with_store<S>(engine: Arc<PathwayEngine>, store: Arc<S>) -> Self
    where
        S: ProfileStore + SessionStore + RecommendationStore + 'static,
    {
        Self::new(engine, store.clone(), store.clone(), store)
    }

    pub fn with_session_limit(mut self, limit: usize) -> Self {
        self.session_limit = limit.max(1);
        self
    }

    pub fn engine(&self) -> &PathwayEngine {
        &self.engine
    }

    pub async fn profile(&self, user_id: &str) -> Result<LearnerProfile, ServiceError> {
        self.profiles
            .load(user_id)
            .await?
            .ok_or_else(|| ServiceError::ProfileNotFound(user_id.to_string()))
    }

    /// Re-estimates one concept from the stored responses and saves the
    /// updated profile.
    pub async fn refresh_mastery(
        &self,
        user_id: &str,
        concept_id: &str,
    ) -> Result<LearnerProfile, ServiceError> {
        let profile = self.profile(user_id).await?;
        let responses = self.sessions.recent_responses(user_id, concept_id).await?;
        let mastery = self.engine.estimate_mastery(concept_id, &responses);

        tracing::info!(
            user_id,
            concept = concept_id,
            level = mastery.skill_level.as_str(),
            confidence = mastery.confidence,
            "mastery refreshed"
        );

        let updated = profile.with_mastery(mastery);
        self.store_profile(&updated).await?;
        Ok(updated)
    }

    /// Batch variant of [`refresh_mastery`](Self::refresh_mastery); the
    /// profile is saved once.
    pub async fn refresh_mastery_many<S: AsRef<str>>(
        &self,
        user_id: &str,
        concept_ids: &[S],
    ) -> Result<LearnerProfile, ServiceError> {
        let profile = self.profile(user_id).await?;

        let mut responses_by_concept = HashMap::with_capacity(concept_ids.len());
        for concept_id in concept_ids {
            let concept_id = concept_id.as_ref();
            let responses = self.sessions.recent_responses(user_id, concept_id).await?;
            responses_by_concept.insert(concept_id.to_string(), responses);
        }

        let mut estimates: Vec<_> = self
            .engine
            .estimate_mastery_all(&responses_by_concept)
            .into_values()
            .collect();
        estimates.sort_by(|a, b| a.concept_id.cmp(&b.concept_id));

        let count = estimates.len();
        let updated = estimates
            .into_iter()
            .fold(profile, |acc, mastery| acc.with_mastery(mastery));
        tracing::info!(user_id, concepts = count, "mastery refreshed in batch");

        self.store_profile(&updated).await?;
        Ok(updated)
    }

    /// Next difficulty from the performance scores of recent sessions.
    pub async fn next_difficulty(
        &self,
        user_id: &str,
        current: Difficulty,
    ) -> Result<Difficulty, ServiceError> {
        let sessions = self
            .sessions
            .recent_sessions(user_id, self.session_limit)
            .await?;
        let history: Vec<f64> = sessions.iter().filter_map(|s| s.performance_score).collect();
        let next = self.engine.adjust_difficulty(current, &history);

        tracing::debug!(
            user_id,
            sessions = sessions.len(),
            from = current.as_str(),
            to = next.as_str(),
            "difficulty evaluated"
        );
        Ok(next)
    }

    pub async fn update_learning_style(
        &self,
        user_id: &str,
        signals: &[InteractionSignal],
    ) -> Result<LearningStyle, ServiceError> {
        let mut profile = self.profile(user_id).await?;
        let style = self.engine.classify_learning_style(signals);

        if profile.learning_style != style {
            tracing::info!(
                user_id,
                from = profile.learning_style.as_str(),
                to = style.as_str(),
                signals = signals.len(),
                "learning style changed"
            );
        }
        profile.learning_style = style;
        self.store_profile(&profile).await?;
        Ok(style)
    }

    pub async fn plan_path<S: AsRef<str>>(
        &self,
        user_id: &str,
        targets: &[S],
    ) -> Result<PlannedPath, ServiceError> {
        let profile = self.profile(user_id).await?;
        let path = self.engine.plan(&profile, targets);
        let predictions = self.engine.annotate(&profile, &path);

        tracing::info!(
            user_id,
            path_id = %path.id,
            objectives = path.objectives.len(),
            hours = path.estimated_total_hours,
            "path planned"
        );
        Ok(PlannedPath { path, predictions })
    }

    /// Plans again from the current profile, continuing `previous`'s log.
    pub async fn replan_path<S: AsRef<str>>(
        &self,
        user_id: &str,
        previous: &LearningPath,
        targets: &[S],
    ) -> Result<PlannedPath, ServiceError> {
        let profile = self.profile(user_id).await?;
        let path = self.engine.replan(&profile, previous, targets);
        let predictions = self.engine.annotate(&profile, &path);

        tracing::info!(
            user_id,
            path_id = %path.id,
            objectives = path.objectives.len(),
            completion_rate = path.completion_rate,
            "path replanned"
        );
        Ok(PlannedPath { path, predictions })
    }

    /// Generates recommendations from recent sessions and persists them.
    pub async fn refresh_recommendations(
        &self,
        user_id: &str,
    ) -> Result<Vec<Recommendation>, ServiceError> {
        let profile = self.profile(user_id).await?;
        let sessions = self
            .sessions
            .recent_sessions(user_id, self.session_limit)
            .await?;
        let recommendations = self.engine.recommend(&profile, &sessions);
        self.recommendations
            .save_recommendations(user_id, &recommendations)
            .await?;

        tracing::info!(
            user_id,
            count = recommendations.len(),
            "recommendations refreshed"
        );
        Ok(recommendations)
    }

    pub async fn active_recommendations(
        &self,
        user_id: &str,
    ) -> Result<Vec<Recommendation>, ServiceError> {
        Ok(self
            .recommendations
            .active_recommendations(user_id, Utc::now())
            .await?)
    }

    pub async fn session_minutes(&self, user_id: &str) -> Result<u32, ServiceError> {
        let profile = self.profile(user_id).await?;
        Ok(self.engine.optimal_session_minutes(&profile))
    }

    async fn store_profile(&self, profile: &LearnerProfile) -> Result<(), ServiceError> {
        if self.profiles.save(profile).await? {
            Ok(())
        } else {
            tracing::warn!(user_id = %profile.user_id, "profile save rejected");
            Err(ServiceError::SaveRejected(profile.user_id.clone()))
        }
    }
}
