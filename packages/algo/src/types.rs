//! Common Types and Constants
//!
//! Shared data structures used across all engine modules.

use std::collections::HashMap;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

// ==================== Constants ====================

/// Lower bound applied to a learner's cognitive-load capacity
pub const MIN_COGNITIVE_CAPACITY: f64 = 0.1;

/// Upper bound applied to a learner's cognitive-load capacity
pub const MAX_COGNITIVE_CAPACITY: f64 = 1.0;

/// Capacity assumed for a freshly created profile
pub const DEFAULT_COGNITIVE_CAPACITY: f64 = 0.7;

/// Numerical stability epsilon
pub const EPSILON: f64 = 1e-10;

// ==================== Ordinal Levels ====================

/// Estimated skill on a single concept, ordered from weakest to strongest
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
#[derive(Default)]
pub enum SkillLevel {
    #[default]
    Novice,
    Beginner,
    Competent,
    Proficient,
    Expert,
}

impl SkillLevel {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Novice => "novice",
            Self::Beginner => "beginner",
            Self::Competent => "competent",
            Self::Proficient => "proficient",
            Self::Expert => "expert",
        }
    }

    pub fn parse(s: &str) -> Option<Self> {
        match s.to_lowercase().as_str() {
            "novice" => Some(Self::Novice),
            "beginner" => Some(Self::Beginner),
            "competent" => Some(Self::Competent),
            "proficient" => Some(Self::Proficient),
            "expert" => Some(Self::Expert),
            _ => None,
        }
    }
}

/// Curriculum tier a concept belongs to
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
#[derive(Default)]
pub enum Tier {
    #[default]
    Introductory,
    Intermediate,
    Advanced,
}

impl Tier {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Introductory => "introductory",
            Self::Intermediate => "intermediate",
            Self::Advanced => "advanced",
        }
    }

    pub fn parse(s: &str) -> Option<Self> {
        match s.to_lowercase().as_str() {
            "introductory" => Some(Self::Introductory),
            "intermediate" => Some(Self::Intermediate),
            "advanced" => Some(Self::Advanced),
            _ => None,
        }
    }
}

/// Ordinal content difficulty
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
#[derive(Default)]
pub enum Difficulty {
    Beginner,
    #[default]
    Intermediate,
    Advanced,
    Expert,
}

impl Difficulty {
    /// All levels, easiest first
    pub const ALL: [Difficulty; 4] = [
        Difficulty::Beginner,
        Difficulty::Intermediate,
        Difficulty::Advanced,
        Difficulty::Expert,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Beginner => "beginner",
            Self::Intermediate => "intermediate",
            Self::Advanced => "advanced",
            Self::Expert => "expert",
        }
    }

    pub fn parse(s: &str) -> Option<Self> {
        match s.to_lowercase().as_str() {
            "beginner" => Some(Self::Beginner),
            "intermediate" => Some(Self::Intermediate),
            "advanced" => Some(Self::Advanced),
            "expert" => Some(Self::Expert),
            _ => None,
        }
    }

    /// Numeric weight used when comparing an objective against a preference
    pub fn weight(&self) -> f64 {
        match self {
            Self::Beginner => 0.2,
            Self::Intermediate => 0.5,
            Self::Advanced => 0.8,
            Self::Expert => 1.0,
        }
    }

    pub fn ordinal(&self) -> usize {
        match self {
            Self::Beginner => 0,
            Self::Intermediate => 1,
            Self::Advanced => 2,
            Self::Expert => 3,
        }
    }

    pub fn harder(&self) -> Self {
        match self {
            Self::Beginner => Self::Intermediate,
            Self::Intermediate => Self::Advanced,
            _ => Self::Expert,
        }
    }

    pub fn easier(&self) -> Self {
        match self {
            Self::Expert => Self::Advanced,
            Self::Advanced => Self::Intermediate,
            _ => Self::Beginner,
        }
    }
}

// ==================== Learner Preferences ====================

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
#[derive(Default)]
pub enum LearningStyle {
    #[default]
    Visual,
    Auditory,
    Kinesthetic,
    ReadWrite,
}

impl LearningStyle {
    /// Fixed enumeration order, also used to break ties
    pub const ALL: [LearningStyle; 4] = [
        LearningStyle::Visual,
        LearningStyle::Auditory,
        LearningStyle::Kinesthetic,
        LearningStyle::ReadWrite,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Visual => "visual",
            Self::Auditory => "auditory",
            Self::Kinesthetic => "kinesthetic",
            Self::ReadWrite => "read_write",
        }
    }

    pub fn parse(s: &str) -> Option<Self> {
        match s.to_lowercase().replace('-', "_").as_str() {
            "visual" => Some(Self::Visual),
            "auditory" => Some(Self::Auditory),
            "kinesthetic" => Some(Self::Kinesthetic),
            "read_write" | "reading" => Some(Self::ReadWrite),
            _ => None,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
#[derive(Default)]
pub enum Pace {
    Slow,
    #[default]
    Normal,
    Fast,
}

impl Pace {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Slow => "slow",
            Self::Normal => "normal",
            Self::Fast => "fast",
        }
    }

    pub fn parse(s: &str) -> Option<Self> {
        match s.to_lowercase().as_str() {
            "slow" => Some(Self::Slow),
            "normal" => Some(Self::Normal),
            "fast" => Some(Self::Fast),
            _ => None,
        }
    }
}

// ==================== Mastery ====================

/// Estimated mastery of one concept, recomputed from scratch on every batch of attempts
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ConceptMastery {
    pub concept_id: String,
    pub skill_level: SkillLevel,
    /// Confidence in the estimate [0, 1]
    pub confidence: f64,
    pub last_assessed: DateTime<Utc>,
    pub attempts: u32,
    /// Share of correct attempts [0, 1]
    pub success_rate: f64,
}

/// One graded attempt on a concept
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AssessmentResponse {
    pub concept_id: String,
    pub is_correct: bool,
    /// Seconds spent answering
    pub time_taken_secs: f64,
    #[serde(default)]
    pub hints_used: u32,
    /// Learner-reported confidence, 1 to 5
    #[serde(default = "default_self_confidence")]
    pub self_confidence: u8,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub answered_at: Option<DateTime<Utc>>,
}

fn default_self_confidence() -> u8 {
    3
}

impl AssessmentResponse {
    pub fn new(concept_id: impl Into<String>, is_correct: bool, time_taken_secs: f64) -> Self {
        Self {
            concept_id: concept_id.into(),
            is_correct,
            time_taken_secs,
            hints_used: 0,
            self_confidence: default_self_confidence(),
            answered_at: None,
        }
    }
}

// ==================== Learner Profile ====================

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LearnerProfile {
    pub user_id: String,
    pub learning_style: LearningStyle,
    pub pace: Pace,
    pub preferred_difficulty: Difficulty,
    /// How much new material the learner absorbs per unit time [0.1, 1.0]
    pub cognitive_load_capacity: f64,
    #[serde(default)]
    pub mastery: HashMap<String, ConceptMastery>,
    #[serde(default)]
    pub weak_areas: Vec<String>,
    #[serde(default)]
    pub strong_areas: Vec<String>,
    #[serde(default)]
    pub total_study_hours: f64,
}

impl LearnerProfile {
    pub fn new(user_id: impl Into<String>) -> Self {
        Self {
            user_id: user_id.into(),
            learning_style: LearningStyle::default(),
            pace: Pace::default(),
            preferred_difficulty: Difficulty::default(),
            cognitive_load_capacity: DEFAULT_COGNITIVE_CAPACITY,
            mastery: HashMap::new(),
            weak_areas: Vec::new(),
            strong_areas: Vec::new(),
            total_study_hours: 0.0,
        }
    }

    /// Capacity clamped to [0.1, 1.0]; non-finite values fall back to the floor.
    pub fn effective_capacity(&self) -> f64 {
        if self.cognitive_load_capacity.is_finite() {
            self.cognitive_load_capacity
                .clamp(MIN_COGNITIVE_CAPACITY, MAX_COGNITIVE_CAPACITY)
        } else {
            MIN_COGNITIVE_CAPACITY
        }
    }

    pub fn mastery_of(&self, concept_id: &str) -> Option<&ConceptMastery> {
        self.mastery.get(concept_id)
    }

    /// Returns a copy with one mastery record replaced and the weak/strong lists recomputed.
    pub fn with_mastery(&self, record: ConceptMastery) -> Self {
        let mut next = self.clone();
        next.mastery.insert(record.concept_id.clone(), record);
        next.recompute_areas();
        next
    }

    /// Areas are named by mastery map key; the record's own `concept_id` is not trusted.
    fn recompute_areas(&mut self) {
        let mut weak: Vec<(&String, &ConceptMastery)> = Vec::new();
        let mut strong: Vec<String> = Vec::new();
        for (key, record) in &self.mastery {
            match record.skill_level {
                SkillLevel::Novice | SkillLevel::Beginner => weak.push((key, record)),
                SkillLevel::Proficient | SkillLevel::Expert => strong.push(key.clone()),
                SkillLevel::Competent => {}
            }
        }
        // weakest first so the capped recommendation list targets the largest gaps
        weak.sort_by(|(ka, ra), (kb, rb)| {
            ra.skill_level
                .cmp(&rb.skill_level)
                .then(ra.confidence.total_cmp(&rb.confidence))
                .then(ka.cmp(kb))
        });
        strong.sort();
        self.weak_areas = weak.into_iter().map(|(key, _)| key.clone()).collect();
        self.strong_areas = strong;
    }
}

// ==================== Planning ====================

/// A single planned unit of study mapped to one concept
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LearningObjective {
    pub id: String,
    pub concept_id: String,
    pub title: String,
    pub tier: Tier,
    pub prerequisites: Vec<String>,
    /// Effort in hours, always > 0
    pub estimated_hours: f64,
    pub difficulty: Difficulty,
    pub skills: Vec<String>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum AdjustmentKind {
    Created,
    Replanned,
    Progress,
}

/// Entry in a path's adjustment log
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PathAdjustment {
    pub at: DateTime<Utc>,
    pub kind: AdjustmentKind,
    pub note: String,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub added: Vec<String>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub removed: Vec<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LearningPath {
    pub id: String,
    pub user_id: String,
    pub objectives: Vec<LearningObjective>,
    pub estimated_total_hours: f64,
    /// [0, 1]
    pub completion_rate: f64,
    pub adjustments: Vec<PathAdjustment>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl LearningPath {
    pub fn concept_ids(&self) -> Vec<&str> {
        self.objectives
            .iter()
            .map(|o| o.concept_id.as_str())
            .collect()
    }

    /// Returns a new path whose completion rate reflects `completed`, which may
    /// hold objective ids or concept ids.
    pub fn with_progress<S: AsRef<str>>(&self, completed: &[S], now: DateTime<Utc>) -> Self {
        let done = self
            .objectives
            .iter()
            .filter(|o| {
                completed
                    .iter()
                    .any(|c| c.as_ref() == o.id || c.as_ref() == o.concept_id)
            })
            .count();
        let completion_rate =
            crate::sanitize::safe_div(done as f64, self.objectives.len() as f64, 0.0);

        let mut next = self.clone();
        next.completion_rate = completion_rate;
        next.updated_at = now;
        next.adjustments.push(PathAdjustment {
            at: now,
            kind: AdjustmentKind::Progress,
            note: format!("{} of {} objectives completed", done, self.objectives.len()),
            added: Vec::new(),
            removed: Vec::new(),
        });
        next
    }
}

// ==================== Sessions & Signals ====================

/// Summary of one finished study session, as handed over by the session store
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SessionSummary {
    pub session_id: String,
    pub user_id: String,
    pub started_at: DateTime<Utc>,
    #[serde(default)]
    pub duration_minutes: f64,
    /// [0, 1]
    #[serde(default)]
    pub performance_score: Option<f64>,
    /// [0, 1]
    #[serde(default)]
    pub engagement_score: Option<f64>,
    #[serde(default)]
    pub concepts: Vec<String>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ContentFormat {
    Video,
    Diagram,
    Audio,
    Discussion,
    Exercise,
    Simulation,
    Article,
    Notes,
}

impl ContentFormat {
    pub fn style(&self) -> LearningStyle {
        match self {
            Self::Video | Self::Diagram => LearningStyle::Visual,
            Self::Audio | Self::Discussion => LearningStyle::Auditory,
            Self::Exercise | Self::Simulation => LearningStyle::Kinesthetic,
            Self::Article | Self::Notes => LearningStyle::ReadWrite,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum InteractionMode {
    Watched,
    Listened,
    Practiced,
    Read,
}

impl InteractionMode {
    pub fn style(&self) -> LearningStyle {
        match self {
            Self::Watched => LearningStyle::Visual,
            Self::Listened => LearningStyle::Auditory,
            Self::Practiced => LearningStyle::Kinesthetic,
            Self::Read => LearningStyle::ReadWrite,
        }
    }
}

/// A categorical interaction signal; either field may be absent
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct InteractionSignal {
    #[serde(default)]
    pub format: Option<ContentFormat>,
    #[serde(default)]
    pub mode: Option<InteractionMode>,
}

// ==================== Outputs ====================

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RecommendationKind {
    DifficultyAdjustment,
    ContentFormat,
    TargetedPractice,
}

impl RecommendationKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::DifficultyAdjustment => "difficulty_adjustment",
            Self::ContentFormat => "content_format",
            Self::TargetedPractice => "targeted_practice",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Recommendation {
    pub id: String,
    pub kind: RecommendationKind,
    /// 1 (low) to 5 (high)
    pub priority: u8,
    pub title: String,
    pub reasoning: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub concept_id: Option<String>,
    pub created_at: DateTime<Utc>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub expires_at: Option<DateTime<Utc>>,
}

impl Recommendation {
    pub fn is_expired(&self, now: DateTime<Utc>) -> bool {
        self.expires_at.is_some_and(|at| at <= now)
    }
}

/// Predicted outcome of studying one objective
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct OutcomePrediction {
    pub objective_id: String,
    pub success_probability: f64,
    pub completion_probability: f64,
    pub estimated_effort_hours: f64,
    pub prerequisite_readiness: f64,
}

// ==================== 测试 ====================

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    fn mastery(concept: &str, level: SkillLevel, confidence: f64) -> ConceptMastery {
        ConceptMastery {
            concept_id: concept.to_string(),
            skill_level: level,
            confidence,
            last_assessed: Utc.with_ymd_and_hms(2024, 1, 1, 0, 0, 0).unwrap(),
            attempts: 4,
            success_rate: confidence,
        }
    }

    #[test]
    fn test_skill_level_ordering() {
        assert!(SkillLevel::Novice < SkillLevel::Beginner);
        assert!(SkillLevel::Beginner < SkillLevel::Competent);
        assert!(SkillLevel::Competent < SkillLevel::Proficient);
        assert!(SkillLevel::Proficient < SkillLevel::Expert);
    }

    #[test]
    fn test_parse_round_trips_as_str() {
        for level in [
            SkillLevel::Novice,
            SkillLevel::Beginner,
            SkillLevel::Competent,
            SkillLevel::Proficient,
            SkillLevel::Expert,
        ] {
            assert_eq!(SkillLevel::parse(level.as_str()), Some(level));
        }
        for d in Difficulty::ALL {
            assert_eq!(Difficulty::parse(d.as_str()), Some(d));
        }
        for s in LearningStyle::ALL {
            assert_eq!(LearningStyle::parse(s.as_str()), Some(s));
        }
        assert_eq!(LearningStyle::parse("read-write"), Some(LearningStyle::ReadWrite));
        assert_eq!(Pace::parse("FAST"), Some(Pace::Fast));
        assert_eq!(Tier::parse("expert"), None);
        assert_eq!(Difficulty::parse(""), None);
    }

    #[test]
    fn test_difficulty_steps_saturate() {
        assert_eq!(Difficulty::Expert.harder(), Difficulty::Expert);
        assert_eq!(Difficulty::Beginner.easier(), Difficulty::Beginner);
        assert_eq!(Difficulty::Intermediate.harder(), Difficulty::Advanced);
        assert_eq!(Difficulty::Advanced.easier(), Difficulty::Intermediate);
    }

    #[test]
    fn test_difficulty_weights() {
        let weights: Vec<f64> = Difficulty::ALL.iter().map(|d| d.weight()).collect();
        assert_eq!(weights, vec![0.2, 0.5, 0.8, 1.0]);
    }

    #[test]
    fn test_effective_capacity_is_clamped() {
        let mut profile = LearnerProfile::new("u1");
        profile.cognitive_load_capacity = 0.0;
        assert_eq!(profile.effective_capacity(), MIN_COGNITIVE_CAPACITY);
        profile.cognitive_load_capacity = 3.0;
        assert_eq!(profile.effective_capacity(), MAX_COGNITIVE_CAPACITY);
        profile.cognitive_load_capacity = f64::NAN;
        assert_eq!(profile.effective_capacity(), MIN_COGNITIVE_CAPACITY);
        profile.cognitive_load_capacity = 0.45;
        assert_eq!(profile.effective_capacity(), 0.45);
    }

    #[test]
    fn test_with_mastery_recomputes_areas_without_touching_original() {
        let profile = LearnerProfile::new("u1")
            .with_mastery(mastery("traits", SkillLevel::Beginner, 0.5))
            .with_mastery(mastery("ownership", SkillLevel::Novice, 0.2))
            .with_mastery(mastery("functions", SkillLevel::Expert, 0.95))
            .with_mastery(mastery("modules", SkillLevel::Competent, 0.65));

        assert_eq!(profile.weak_areas, vec!["ownership", "traits"]);
        assert_eq!(profile.strong_areas, vec!["functions"]);

        let upgraded = profile.with_mastery(mastery("ownership", SkillLevel::Proficient, 0.8));
        assert_eq!(upgraded.weak_areas, vec!["traits"]);
        assert_eq!(upgraded.strong_areas, vec!["functions", "ownership"]);
        // the source profile is left as it was
        assert_eq!(profile.weak_areas, vec!["ownership", "traits"]);
    }

    #[test]
    fn test_areas_follow_map_keys_when_record_ids_differ() {
        let mut profile = LearnerProfile::new("u1");
        profile.mastery.insert(
            "old_name".to_string(),
            mastery("new_name", SkillLevel::Novice, 0.1),
        );
        profile.mastery.insert(
            "renamed_strong".to_string(),
            mastery("something_else", SkillLevel::Expert, 0.95),
        );

        let updated = profile.with_mastery(mastery("traits", SkillLevel::Beginner, 0.4));
        assert_eq!(updated.weak_areas, vec!["old_name", "traits"]);
        assert_eq!(updated.strong_areas, vec!["renamed_strong"]);
        for area in updated.weak_areas.iter().chain(&updated.strong_areas) {
            assert!(updated.mastery.contains_key(area));
        }
    }

    #[test]
    fn test_recommendation_expiry() {
        let now = Utc.with_ymd_and_hms(2024, 3, 1, 12, 0, 0).unwrap();
        let mut rec = Recommendation {
            id: "r1".into(),
            kind: RecommendationKind::TargetedPractice,
            priority: 5,
            title: "t".into(),
            reasoning: "r".into(),
            concept_id: None,
            created_at: now,
            expires_at: None,
        };
        assert!(!rec.is_expired(now));
        rec.expires_at = Some(now - chrono::Duration::hours(1));
        assert!(rec.is_expired(now));
        rec.expires_at = Some(now + chrono::Duration::hours(1));
        assert!(!rec.is_expired(now));
    }

    #[test]
    fn test_profile_deserializes_with_defaults() {
        let json = r#"{
            "userId": "u9",
            "learningStyle": "read_write",
            "pace": "slow",
            "preferredDifficulty": "advanced",
            "cognitiveLoadCapacity": 0.5
        }"#;
        let profile: LearnerProfile = serde_json::from_str(json).unwrap();
        assert_eq!(profile.learning_style, LearningStyle::ReadWrite);
        assert_eq!(profile.pace, Pace::Slow);
        assert!(profile.mastery.is_empty());
        assert_eq!(profile.total_study_hours, 0.0);
    }
}
