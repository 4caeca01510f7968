//! Learning-style classification
//!
//! Each interaction signal votes for a style through its content format and
//! its interaction mode; the style with the most votes wins.

use serde::{Deserialize, Serialize};

use crate::types::{InteractionSignal, LearningStyle};

/// Raw vote counts per style
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct StyleTally {
    pub visual: u32,
    pub auditory: u32,
    pub kinesthetic: u32,
    pub read_write: u32,
}

impl StyleTally {
    pub fn get(&self, style: LearningStyle) -> u32 {
        match style {
            LearningStyle::Visual => self.visual,
            LearningStyle::Auditory => self.auditory,
            LearningStyle::Kinesthetic => self.kinesthetic,
            LearningStyle::ReadWrite => self.read_write,
        }
    }

    fn bump(&mut self, style: LearningStyle) {
        let counter = match style {
            LearningStyle::Visual => &mut self.visual,
            LearningStyle::Auditory => &mut self.auditory,
            LearningStyle::Kinesthetic => &mut self.kinesthetic,
            LearningStyle::ReadWrite => &mut self.read_write,
        };
        *counter = counter.saturating_add(1);
    }

    pub fn total(&self) -> u32 {
        LearningStyle::ALL.iter().map(|s| self.get(*s)).sum()
    }

    /// Argmax; ties go to the earliest style in `LearningStyle::ALL`.
    pub fn dominant(&self) -> LearningStyle {
        let mut best = LearningStyle::ALL[0];
        for style in LearningStyle::ALL.into_iter().skip(1) {
            if self.get(style) > self.get(best) {
                best = style;
            }
        }
        best
    }
}

#[derive(Debug, Clone, Copy, Default)]
pub struct LearningStyleClassifier;

impl LearningStyleClassifier {
    pub fn new() -> Self {
        Self
    }

    pub fn tally(&self, signals: &[InteractionSignal]) -> StyleTally {
        let mut tally = StyleTally::default();
        for signal in signals {
            if let Some(format) = signal.format {
                tally.bump(format.style());
            }
            if let Some(mode) = signal.mode {
                tally.bump(mode.style());
            }
        }
        tally
    }

    pub fn classify(&self, signals: &[InteractionSignal]) -> LearningStyle {
        let tally = self.tally(signals);
        let style = tally.dominant();
        tracing::debug!(
            signals = signals.len(),
            votes = tally.total(),
            style = style.as_str(),
            "learning style classified"
        );
        style
    }
}
