//! Three-step action sequences and how well they pay off together.

use std::collections::VecDeque;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::outcome::ActionOutcome;
use super::pattern::confidence;

/// Steps in a tracked combo.
pub const COMBO_LENGTH: usize = 3;

/// A learned action-type sequence.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ActionCombo {
    /// Action types in execution order.
    pub sequence: Vec<String>,
    /// Times the sequence appears in the window.
    pub occurrences: u32,
    /// Appearances where every step succeeded.
    pub successes: u32,
    /// `successes / occurrences`.
    pub success_rate: f32,
    /// Mean of the summed step rewards.
    pub average_reward: f32,
    /// `min(1, occurrences / min_samples)`.
    pub confidence: f32,
    /// Timestamp of the last step of the newest appearance.
    pub last_seen: DateTime<Utc>,
}

impl ActionCombo {
    /// Map key for a sequence.
    #[must_use]
    pub fn key(sequence: &[String]) -> String {
        sequence.join("->")
    }

    /// Rescan `history` for every appearance of `sequence`.
    ///
    /// Returns `None` when the sequence never appears.
    #[must_use]
    pub fn scan(
        sequence: &[String],
        history: &VecDeque<ActionOutcome>,
        min_samples: u32,
    ) -> Option<Self> {
        if sequence.len() != COMBO_LENGTH || history.len() < COMBO_LENGTH {
            return None;
        }

        let mut occurrences = 0u32;
        let mut successes = 0u32;
        let mut reward_total = 0.0f32;
        let mut last_seen = None;

        for end in COMBO_LENGTH - 1..history.len() {
            let window = (end + 1 - COMBO_LENGTH..=end).map(|i| &history[i]);
            let types = window.clone().map(ActionOutcome::action_type);
            if !types.eq(sequence.iter().map(String::as_str)) {
                continue;
            }
            occurrences += 1;
            if window.clone().all(|o| o.success) {
                successes += 1;
            }
            reward_total += window.map(|o| o.reward).sum::<f32>();
            last_seen = Some(history[end].timestamp);
        }

        let last_seen = last_seen?;
        #[allow(clippy::cast_precision_loss)]
        let n = occurrences as f32;
        #[allow(clippy::cast_precision_loss)]
        let success_rate = successes as f32 / n;
        Some(Self {
            sequence: sequence.to_vec(),
            occurrences,
            successes,
            success_rate,
            average_reward: reward_total / n,
            confidence: confidence(occurrences, min_samples),
            last_seen,
        })
    }

    /// Whether `tail` (the last two executed types) matches this combo's
    /// opening steps.
    #[must_use]
    pub fn continues(&self, tail: &[String]) -> bool {
        self.sequence.get(..COMBO_LENGTH - 1) == Some(tail)
    }

    /// The step that completes the combo.
    #[must_use]
    pub fn finisher(&self) -> &str {
        self.sequence.last().map_or("", String::as_str)
    }
}
