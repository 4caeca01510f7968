//! Engine facade
//!
//! Bundles the components behind the function-level API consumed by request
//! handlers. The knowledge graph is injected once and shared read-only.

use std::collections::HashMap;
use std::sync::Arc;

use crate::config::{ConfigError, EngineConfig};
use crate::difficulty::DifficultyController;
use crate::graph::KnowledgeGraph;
use crate::mastery::MasteryEstimator;
use crate::planner::PathPlanner;
use crate::predictor::OutcomePredictor;
use crate::recommend::RecommendationEngine;
use crate::session::SessionLengthOptimizer;
use crate::style::LearningStyleClassifier;
use crate::types::{
    AssessmentResponse, ConceptMastery, Difficulty, InteractionSignal, LearnerProfile,
    LearningObjective, LearningPath, LearningStyle, OutcomePrediction, Recommendation,
    SessionSummary,
};

#[derive(Debug, Clone)]
pub struct PathwayEngine {
    graph: Arc<KnowledgeGraph>,
    config: EngineConfig,
    mastery: MasteryEstimator,
    difficulty: DifficultyController,
    style: LearningStyleClassifier,
    predictor: OutcomePredictor,
    recommender: RecommendationEngine,
    session: SessionLengthOptimizer,
}

impl PathwayEngine {
    pub fn new(graph: Arc<KnowledgeGraph>, config: EngineConfig) -> Result<Self, ConfigError> {
        config.validate()?;
        Ok(Self::assemble(graph, config))
    }

    pub fn with_defaults(graph: Arc<KnowledgeGraph>) -> Self {
        Self::assemble(graph, EngineConfig::default())
    }

    fn assemble(graph: Arc<KnowledgeGraph>, config: EngineConfig) -> Self {
        Self {
            mastery: MasteryEstimator::new(config.mastery.clone()),
            difficulty: DifficultyController::new(config.difficulty.clone()),
            style: LearningStyleClassifier::new(),
            predictor: OutcomePredictor::new(config.predictor.clone()),
            recommender: RecommendationEngine::new(config.recommendation.clone()),
            session: SessionLengthOptimizer::new(config.session.clone()),
            graph,
            config,
        }
    }

    pub fn graph(&self) -> &KnowledgeGraph {
        &self.graph
    }

    pub fn config(&self) -> &EngineConfig {
        &self.config
    }

    pub fn planner(&self) -> PathPlanner<'_> {
        PathPlanner::new(&self.graph, &self.config)
    }

    pub fn classify_learning_style(&self, signals: &[InteractionSignal]) -> LearningStyle {
        self.style.classify(signals)
    }

    pub fn estimate_mastery(
        &self,
        concept_id: &str,
        responses: &[AssessmentResponse],
    ) -> ConceptMastery {
        self.mastery.estimate(concept_id, responses)
    }

    /// Estimates every concept in the map; concepts are processed in parallel.
    pub fn estimate_mastery_all(
        &self,
        responses_by_concept: &HashMap<String, Vec<AssessmentResponse>>,
    ) -> HashMap<String, ConceptMastery> {
        self.mastery.estimate_all(responses_by_concept)
    }

    pub fn adjust_difficulty(&self, level: Difficulty, history: &[f64]) -> Difficulty {
        self.difficulty.adjust(level, history)
    }

    pub fn plan<S: AsRef<str>>(&self, profile: &LearnerProfile, targets: &[S]) -> LearningPath {
        self.planner().plan(profile, targets)
    }

    pub fn replan<S: AsRef<str>>(
        &self,
        profile: &LearnerProfile,
        previous: &LearningPath,
        targets: &[S],
    ) -> LearningPath {
        self.planner().replan(profile, previous, targets)
    }

    pub fn predict(
        &self,
        profile: &LearnerProfile,
        objective: &LearningObjective,
    ) -> OutcomePrediction {
        self.predictor.predict(profile, objective)
    }

    pub fn annotate(&self, profile: &LearnerProfile, path: &LearningPath) -> Vec<OutcomePrediction> {
        self.predictor.annotate(profile, path)
    }

    pub fn recommend(
        &self,
        profile: &LearnerProfile,
        recent_sessions: &[SessionSummary],
    ) -> Vec<Recommendation> {
        self.recommender.recommend(profile, recent_sessions)
    }

    pub fn optimal_session_minutes(&self, profile: &LearnerProfile) -> u32 {
        self.session.optimal_minutes(profile)
    }
}
