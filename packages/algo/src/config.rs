//! Engine configuration
//!
//! Every threshold, weight and multiplier used by the engine lives here so
//! tuning never touches algorithm code. Each group deserializes from partial
//! JSON: missing fields keep their defaults.

use serde::{Deserialize, Serialize};

use crate::types::{LearningStyle, Pace, SkillLevel};

#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("invalid config json: {0}")]
    Json(#[from] serde_json::Error),
    #[error("invalid value for {field}: {reason}")]
    Invalid { field: &'static str, reason: String },
}

fn invalid(field: &'static str, reason: impl Into<String>) -> ConfigError {
    ConfigError::Invalid {
        field,
        reason: reason.into(),
    }
}

fn check_unit(field: &'static str, value: f64) -> Result<(), ConfigError> {
    if (0.0..=1.0).contains(&value) {
        Ok(())
    } else {
        Err(invalid(field, format!("{value} is outside [0, 1]")))
    }
}

fn check_positive(field: &'static str, value: f64) -> Result<(), ConfigError> {
    if value.is_finite() && value > 0.0 {
        Ok(())
    } else {
        Err(invalid(field, format!("{value} must be a positive number")))
    }
}

/// Minimum success rate and confidence required for a skill level
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LevelCutoff {
    pub success_rate: f64,
    pub confidence: f64,
}

impl LevelCutoff {
    pub fn admits(&self, success_rate: f64, confidence: f64) -> bool {
        success_rate >= self.success_rate && confidence >= self.confidence
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct MasteryThresholds {
    pub success_weight: f64,
    pub consistency_weight: f64,
    /// Consistency assumed when there is too little timing data
    pub neutral_consistency: f64,
    pub min_responses_for_consistency: usize,
    pub expert: LevelCutoff,
    pub proficient: LevelCutoff,
    pub competent: LevelCutoff,
    pub beginner_success_rate: f64,
}

impl Default for MasteryThresholds {
    fn default() -> Self {
        Self {
            success_weight: 0.7,
            consistency_weight: 0.3,
            neutral_consistency: 0.5,
            min_responses_for_consistency: 2,
            expert: LevelCutoff {
                success_rate: 0.9,
                confidence: 0.8,
            },
            proficient: LevelCutoff {
                success_rate: 0.8,
                confidence: 0.7,
            },
            competent: LevelCutoff {
                success_rate: 0.7,
                confidence: 0.6,
            },
            beginner_success_rate: 0.5,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct DifficultyParams {
    pub target_success_rate: f64,
    /// Half-width of the no-change band around the target
    pub band: f64,
    pub window: usize,
    pub min_history: usize,
}

impl Default for DifficultyParams {
    fn default() -> Self {
        Self {
            target_success_rate: 0.75,
            band: 0.1,
            window: 5,
            min_history: 3,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct PlannerParams {
    /// Hours assumed for a concept without its own estimate
    pub default_base_hours: f64,
    /// Concepts at or above this level are skipped
    pub mastered_level: SkillLevel,
    /// Advanced concepts with at least this many direct prerequisites are taught at expert difficulty
    pub expert_prerequisite_count: usize,
}

impl Default for PlannerParams {
    fn default() -> Self {
        Self {
            default_base_hours: 4.0,
            mastered_level: SkillLevel::Competent,
            expert_prerequisite_count: 3,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct PaceMultipliers {
    pub slow: f64,
    pub normal: f64,
    pub fast: f64,
}

impl Default for PaceMultipliers {
    fn default() -> Self {
        Self {
            slow: 1.5,
            normal: 1.0,
            fast: 0.7,
        }
    }
}

impl PaceMultipliers {
    pub fn for_pace(&self, pace: Pace) -> f64 {
        match pace {
            Pace::Slow => self.slow,
            Pace::Normal => self.normal,
            Pace::Fast => self.fast,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct PredictorWeights {
    pub readiness: f64,
    pub difficulty_match: f64,
    pub capacity: f64,
    /// Readiness reported for objectives without prerequisites
    pub neutral_readiness: f64,
    pub study_hours_scale: f64,
    pub time_penalty: f64,
    pub min_completion: f64,
    pub max_completion: f64,
}

impl Default for PredictorWeights {
    fn default() -> Self {
        Self {
            readiness: 0.4,
            difficulty_match: 0.3,
            capacity: 0.3,
            neutral_readiness: 0.5,
            study_hours_scale: 10.0,
            time_penalty: 0.1,
            min_completion: 0.1,
            max_completion: 0.95,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct RecommendationParams {
    pub max_items: usize,
    pub weak_area_limit: usize,
    pub low_performance: f64,
    pub low_engagement: f64,
    pub difficulty_priority: u8,
    pub format_priority: u8,
    pub practice_priority: u8,
    pub difficulty_ttl_days: i64,
    pub format_ttl_days: i64,
    pub practice_ttl_days: i64,
}

impl Default for RecommendationParams {
    fn default() -> Self {
        Self {
            max_items: 5,
            weak_area_limit: 3,
            low_performance: 0.6,
            low_engagement: 0.7,
            difficulty_priority: 4,
            format_priority: 3,
            practice_priority: 5,
            difficulty_ttl_days: 3,
            format_ttl_days: 7,
            practice_ttl_days: 14,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct StyleFactors {
    pub visual: f64,
    pub auditory: f64,
    pub kinesthetic: f64,
    pub read_write: f64,
}

impl Default for StyleFactors {
    fn default() -> Self {
        Self {
            visual: 1.1,
            auditory: 0.9,
            kinesthetic: 1.2,
            read_write: 1.0,
        }
    }
}

impl StyleFactors {
    pub fn for_style(&self, style: LearningStyle) -> f64 {
        match style {
            LearningStyle::Visual => self.visual,
            LearningStyle::Auditory => self.auditory,
            LearningStyle::Kinesthetic => self.kinesthetic,
            LearningStyle::ReadWrite => self.read_write,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct SessionParams {
    pub base_minutes: f64,
    pub min_minutes: u32,
    pub max_minutes: u32,
    pub style_factors: StyleFactors,
}

impl Default for SessionParams {
    fn default() -> Self {
        Self {
            base_minutes: 30.0,
            min_minutes: 15,
            max_minutes: 60,
            style_factors: StyleFactors::default(),
        }
    }
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct EngineConfig {
    pub mastery: MasteryThresholds,
    pub difficulty: DifficultyParams,
    pub planner: PlannerParams,
    pub pace: PaceMultipliers,
    pub predictor: PredictorWeights,
    pub recommendation: RecommendationParams,
    pub session: SessionParams,
}

impl EngineConfig {
    /// Parses a (possibly partial) JSON document and validates the result.
    pub fn from_json_str(json: &str) -> Result<Self, ConfigError> {
        let config: Self = serde_json::from_str(json)?;
        config.validate()?;
        Ok(config)
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        let m = &self.mastery;
        check_unit("mastery.successWeight", m.success_weight)?;
        check_unit("mastery.consistencyWeight", m.consistency_weight)?;
        if (m.success_weight + m.consistency_weight - 1.0).abs() > 1e-9 {
            return Err(invalid(
                "mastery",
                "successWeight and consistencyWeight must sum to 1",
            ));
        }
        check_unit("mastery.neutralConsistency", m.neutral_consistency)?;
        check_unit("mastery.beginnerSuccessRate", m.beginner_success_rate)?;
        for (field, cutoff) in [
            ("mastery.expert", m.expert),
            ("mastery.proficient", m.proficient),
            ("mastery.competent", m.competent),
        ] {
            check_unit(field, cutoff.success_rate)?;
            check_unit(field, cutoff.confidence)?;
        }

        let d = &self.difficulty;
        check_unit("difficulty.targetSuccessRate", d.target_success_rate)?;
        if !(d.band.is_finite() && d.band >= 0.0) {
            return Err(invalid("difficulty.band", "must be a non-negative number"));
        }
        if d.window == 0 {
            return Err(invalid("difficulty.window", "must be at least 1"));
        }

        check_positive("planner.defaultBaseHours", self.planner.default_base_hours)?;
        check_positive("pace.slow", self.pace.slow)?;
        check_positive("pace.normal", self.pace.normal)?;
        check_positive("pace.fast", self.pace.fast)?;

        let p = &self.predictor;
        check_unit("predictor.neutralReadiness", p.neutral_readiness)?;
        check_positive("predictor.studyHoursScale", p.study_hours_scale)?;
        if p.min_completion > p.max_completion {
            return Err(invalid(
                "predictor.minCompletion",
                "must not exceed maxCompletion",
            ));
        }

        let r = &self.recommendation;
        for (field, priority) in [
            ("recommendation.difficultyPriority", r.difficulty_priority),
            ("recommendation.formatPriority", r.format_priority),
            ("recommendation.practicePriority", r.practice_priority),
        ] {
            if !(1..=5).contains(&priority) {
                return Err(invalid(field, format!("{priority} is outside [1, 5]")));
            }
        }

        let s = &self.session;
        check_positive("session.baseMinutes", s.base_minutes)?;
        if s.min_minutes > s.max_minutes {
            return Err(invalid("session.minMinutes", "must not exceed maxMinutes"));
        }
        let f = &s.style_factors;
        for (field, factor) in [
            ("session.styleFactors.visual", f.visual),
            ("session.styleFactors.auditory", f.auditory),
            ("session.styleFactors.kinesthetic", f.kinesthetic),
            ("session.styleFactors.readWrite", f.read_write),
        ] {
            check_positive(field, factor)?;
        }

        Ok(())
    }
}
