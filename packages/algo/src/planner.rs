//! Learning path planning
//!
//! `plan` expands the targets into their prerequisite closure, drops what the
//! learner already masters, and turns every remaining concept into a
//! `LearningObjective`. Paths are never patched: a replan produces a new
//! path that carries the previous adjustment log forward.

use std::collections::HashSet;

use chrono::{DateTime, Utc};

use crate::config::EngineConfig;
use crate::graph::KnowledgeGraph;
use crate::sanitize::safe_div;
use crate::types::{
    AdjustmentKind, Difficulty, LearnerProfile, LearningObjective, LearningPath, PathAdjustment,
    Tier,
};

pub struct PathPlanner<'a> {
    graph: &'a KnowledgeGraph,
    config: &'a EngineConfig,
}

impl<'a> PathPlanner<'a> {
    pub fn new(graph: &'a KnowledgeGraph, config: &'a EngineConfig) -> Self {
        Self { graph, config }
    }

    pub fn plan<S: AsRef<str>>(&self, profile: &LearnerProfile, targets: &[S]) -> LearningPath {
        self.plan_at(profile, targets, Utc::now())
    }

    pub fn plan_at<S: AsRef<str>>(
        &self,
        profile: &LearnerProfile,
        targets: &[S],
        now: DateTime<Utc>,
    ) -> LearningPath {
        let needed = self.graph.resolve(targets);
        let objectives: Vec<LearningObjective> = needed
            .iter()
            .filter(|concept_id| self.needs_work(profile, concept_id))
            .map(|concept_id| self.objective_for(profile, concept_id))
            .collect();

        let raw_hours: f64 = objectives.iter().map(|o| o.estimated_hours).sum();
        let estimated_total_hours = raw_hours * self.config.pace.for_pace(profile.pace);

        tracing::debug!(
            user_id = %profile.user_id,
            resolved = needed.len(),
            objectives = objectives.len(),
            estimated_total_hours,
            "learning path planned"
        );

        LearningPath {
            id: format!("path-{}-{}", profile.user_id, now.timestamp_millis()),
            user_id: profile.user_id.clone(),
            adjustments: vec![PathAdjustment {
                at: now,
                kind: AdjustmentKind::Created,
                note: format!(
                    "{} objectives for {} target(s)",
                    objectives.len(),
                    targets.len()
                ),
                added: Vec::new(),
                removed: Vec::new(),
            }],
            objectives,
            estimated_total_hours,
            completion_rate: 0.0,
            created_at: now,
            updated_at: now,
        }
    }

    pub fn replan<S: AsRef<str>>(
        &self,
        profile: &LearnerProfile,
        previous: &LearningPath,
        targets: &[S],
    ) -> LearningPath {
        self.replan_at(profile, previous, targets, Utc::now())
    }

    /// Fresh plan whose log continues `previous`. The completion rate is the
    /// share of the previous objectives that no longer need work (0 when the
    /// previous path was empty).
    pub fn replan_at<S: AsRef<str>>(
        &self,
        profile: &LearnerProfile,
        previous: &LearningPath,
        targets: &[S],
        now: DateTime<Utc>,
    ) -> LearningPath {
        let mut next = self.plan_at(profile, targets, now);

        let before: HashSet<&str> = previous.concept_ids().into_iter().collect();
        let after: HashSet<&str> = next.concept_ids().into_iter().collect();
        let added: Vec<String> = next
            .objectives
            .iter()
            .filter(|o| !before.contains(o.concept_id.as_str()))
            .map(|o| o.id.clone())
            .collect();
        let removed: Vec<String> = previous
            .objectives
            .iter()
            .filter(|o| !after.contains(o.concept_id.as_str()))
            .map(|o| o.id.clone())
            .collect();

        let finished = previous
            .objectives
            .iter()
            .filter(|o| !self.needs_work(profile, &o.concept_id))
            .count();
        next.completion_rate =
            safe_div(finished as f64, previous.objectives.len() as f64, 0.0);

        let mut log = previous.adjustments.clone();
        log.push(PathAdjustment {
            at: now,
            kind: AdjustmentKind::Replanned,
            note: format!(
                "{} added, {} removed, {} of {} previous objectives mastered",
                added.len(),
                removed.len(),
                finished,
                previous.objectives.len()
            ),
            added,
            removed,
        });
        next.adjustments = log;
        next.created_at = previous.created_at;
        next
    }

    /// True unless the learner's recorded level reaches the mastered level.
    pub fn needs_work(&self, profile: &LearnerProfile, concept_id: &str) -> bool {
        profile
            .mastery_of(concept_id)
            .map_or(true, |m| m.skill_level < self.config.planner.mastered_level)
    }

    pub fn difficulty_for(&self, concept_id: &str) -> Difficulty {
        let Some(concept) = self.graph.get(concept_id) else {
            return Difficulty::Beginner;
        };
        match concept.tier {
            Tier::Introductory => Difficulty::Beginner,
            Tier::Intermediate => Difficulty::Intermediate,
            Tier::Advanced
                if concept.prerequisites.len() >= self.config.planner.expert_prerequisite_count =>
            {
                Difficulty::Expert
            }
            Tier::Advanced => Difficulty::Advanced,
        }
    }

    /// Base hours divided by the learner's (floored) capacity.
    pub fn adjusted_hours(&self, profile: &LearnerProfile, concept_id: &str) -> f64 {
        let base = self
            .graph
            .base_hours(concept_id)
            .filter(|h| h.is_finite() && *h > 0.0)
            .unwrap_or(self.config.planner.default_base_hours);
        base / profile.effective_capacity()
    }

    fn objective_for(&self, profile: &LearnerProfile, concept_id: &str) -> LearningObjective {
        let concept = self.graph.get(concept_id);
        let title = concept
            .and_then(|c| c.title.clone())
            .unwrap_or_else(|| humanize(concept_id));

        LearningObjective {
            id: format!("obj-{concept_id}"),
            concept_id: concept_id.to_string(),
            title,
            tier: concept.map(|c| c.tier).unwrap_or(Tier::Introductory),
            prerequisites: self.graph.prerequisites_of(concept_id).to_vec(),
            estimated_hours: self.adjusted_hours(profile, concept_id),
            difficulty: self.difficulty_for(concept_id),
            skills: vec![concept_id.to_string()],
        }
    }
}

fn humanize(id: &str) -> String {
    let spaced = id.replace(['_', '-'], " ");
    let mut chars = spaced.chars();
    match chars.next() {
        Some(first) => first.to_uppercase().chain(chars).collect(),
        None => String::new(),
    }
}
