//! Session length

use crate::config::SessionParams;
use crate::types::LearnerProfile;

#[derive(Debug, Clone, Default)]
pub struct SessionLengthOptimizer {
    params: SessionParams,
}

impl SessionLengthOptimizer {
    pub fn new(params: SessionParams) -> Self {
        Self { params }
    }

    /// `clamp(30 * capacity * style_factor, 15, 60)`, truncated to whole minutes.
    pub fn optimal_minutes(&self, profile: &LearnerProfile) -> u32 {
        let p = &self.params;
        let factor = p.style_factors.for_style(profile.learning_style);
        let minutes = p.base_minutes * profile.effective_capacity() * factor;
        let floor = p.min_minutes.min(p.max_minutes);
        let ceiling = p.min_minutes.max(p.max_minutes);
        let clamped = minutes.clamp(f64::from(floor), f64::from(ceiling));
        clamped as u32
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::LearningStyle;

    fn learner(style: LearningStyle, capacity: f64) -> LearnerProfile {
        let mut profile = LearnerProfile::new("u1");
        profile.learning_style = style;
        profile.cognitive_load_capacity = capacity;
        profile
    }

    #[test]
    fn test_full_capacity_per_style() {
        let optimizer = SessionLengthOptimizer::default();
        assert_eq!(optimizer.optimal_minutes(&learner(LearningStyle::Visual, 1.0)), 33);
        assert_eq!(optimizer.optimal_minutes(&learner(LearningStyle::Auditory, 1.0)), 27);
        assert_eq!(optimizer.optimal_minutes(&learner(LearningStyle::Kinesthetic, 1.0)), 36);
        assert_eq!(optimizer.optimal_minutes(&learner(LearningStyle::ReadWrite, 1.0)), 30);
    }

    #[test]
    fn test_low_capacity_hits_floor() {
        let optimizer = SessionLengthOptimizer::default();
        assert_eq!(optimizer.optimal_minutes(&learner(LearningStyle::Visual, 0.1)), 15);
        assert_eq!(optimizer.optimal_minutes(&learner(LearningStyle::Visual, 0.0)), 15);
    }

    #[test]
    fn test_ceiling() {
        let optimizer = SessionLengthOptimizer::new(SessionParams {
            base_minutes: 90.0,
            ..SessionParams::default()
        });
        assert_eq!(optimizer.optimal_minutes(&learner(LearningStyle::Kinesthetic, 1.0)), 60);
    }

    #[test]
    fn test_swapped_bounds_do_not_panic() {
        let optimizer = SessionLengthOptimizer::new(SessionParams {
            min_minutes: 60,
            max_minutes: 15,
            ..SessionParams::default()
        });
        assert_eq!(optimizer.optimal_minutes(&learner(LearningStyle::Visual, 0.1)), 15);
        assert_eq!(optimizer.optimal_minutes(&learner(LearningStyle::Kinesthetic, 1.0)), 36);
    }

    #[test]
    fn test_fractional_minutes_truncate() {
        let optimizer = SessionLengthOptimizer::default();
        // 30 * 0.7 * 1.2 = 25.2
        assert_eq!(optimizer.optimal_minutes(&learner(LearningStyle::Kinesthetic, 0.7)), 25);
    }
}
