//! Adaptive difficulty
//!
//! Hysteresis band controller: the mean of the most recent performance
//! scores is compared with a target success rate, and the level moves at most
//! one ordinal step per call.

use crate::config::DifficultyParams;
use crate::sanitize::{finite_values, has_invalid_values, mean};
use crate::types::Difficulty;

#[derive(Debug, Clone, Default)]
pub struct DifficultyController {
    params: DifficultyParams,
}

impl DifficultyController {
    pub fn new(params: DifficultyParams) -> Self {
        Self { params }
    }

    pub fn target_success_rate(&self) -> f64 {
        self.params.target_success_rate
    }

    /// Next level for the configured target success rate.
    pub fn adjust(&self, current: Difficulty, history: &[f64]) -> Difficulty {
        self.adjust_toward(current, history, self.params.target_success_rate)
    }

    /// Next level for an explicit target. `history` is ordered oldest first.
    pub fn adjust_toward(&self, current: Difficulty, history: &[f64], target: f64) -> Difficulty {
        if has_invalid_values(history) {
            tracing::warn!(
                points = history.len(),
                "ignoring non-finite performance values"
            );
        }
        let history = finite_values(history);
        if history.len() < self.params.min_history {
            return current;
        }

        let window = self.params.window.max(1);
        let recent = &history[history.len().saturating_sub(window)..];
        let Some(recent_mean) = mean(recent) else {
            return current;
        };

        let next = if recent_mean > target + self.params.band {
            current.harder()
        } else if recent_mean < target - self.params.band {
            current.easier()
        } else {
            current
        };

        if next != current {
            tracing::debug!(
                from = current.as_str(),
                to = next.as_str(),
                recent_mean,
                target,
                "difficulty adjusted"
            );
        }
        next
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_short_history_keeps_level() {
        let controller = DifficultyController::default();
        assert_eq!(
            controller.adjust(Difficulty::Intermediate, &[1.0, 1.0]),
            Difficulty::Intermediate
        );
        assert_eq!(
            controller.adjust(Difficulty::Advanced, &[]),
            Difficulty::Advanced
        );
    }

    #[test]
    fn test_strong_performance_steps_up() {
        let controller = DifficultyController::default();
        assert_eq!(
            controller.adjust(Difficulty::Intermediate, &[0.9, 0.95, 1.0]),
            Difficulty::Advanced
        );
    }

    #[test]
    fn test_weak_performance_steps_down() {
        let controller = DifficultyController::default();
        assert_eq!(
            controller.adjust(Difficulty::Advanced, &[0.3, 0.4, 0.5, 0.2]),
            Difficulty::Intermediate
        );
    }

    #[test]
    fn test_inside_band_keeps_level() {
        let controller = DifficultyController::default();
        // mean 0.8 is within 0.75 +/- 0.1
        assert_eq!(
            controller.adjust(Difficulty::Intermediate, &[0.8, 0.8, 0.8]),
            Difficulty::Intermediate
        );
        // exactly on the upper edge does not move
        assert_eq!(
            controller.adjust_toward(Difficulty::Intermediate, &[0.5, 0.5, 0.5], 0.4),
            Difficulty::Intermediate
        );
    }

    #[test]
    fn test_only_last_five_points_count() {
        let controller = DifficultyController::default();
        let history = [0.0, 0.0, 0.0, 0.0, 1.0, 1.0, 1.0, 1.0, 1.0];
        assert_eq!(
            controller.adjust(Difficulty::Beginner, &history),
            Difficulty::Intermediate
        );
    }

    #[test]
    fn test_level_saturates_at_range_ends() {
        let controller = DifficultyController::default();
        assert_eq!(
            controller.adjust(Difficulty::Expert, &[1.0, 1.0, 1.0]),
            Difficulty::Expert
        );
        assert_eq!(
            controller.adjust(Difficulty::Beginner, &[0.0, 0.0, 0.0]),
            Difficulty::Beginner
        );
    }

    #[test]
    fn test_non_finite_points_are_ignored() {
        let controller = DifficultyController::default();
        assert_eq!(
            controller.adjust(Difficulty::Intermediate, &[f64::NAN, 1.0, 1.0]),
            Difficulty::Intermediate
        );
        assert_eq!(
            controller.adjust(Difficulty::Intermediate, &[f64::NAN, 1.0, 1.0, 1.0]),
            Difficulty::Advanced
        );
    }

    #[test]
    fn test_custom_target() {
        let controller = DifficultyController::default();
        assert_eq!(
            controller.adjust_toward(Difficulty::Intermediate, &[0.6, 0.6, 0.6], 0.4),
            Difficulty::Advanced
        );
    }
}
