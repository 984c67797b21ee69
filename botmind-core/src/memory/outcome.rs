//! Outcome records: what the bot did, in what situation, and how it went.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::action::{ActionDescriptor, GameAction};
use crate::types::{GameContext, OutcomeId, SituationSnapshot, TimeOfDay};

/// One executed action and its result. Immutable once recorded.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ActionOutcome {
    /// Unique identifier.
    pub id: OutcomeId,
    /// The action that was executed.
    pub action: ActionDescriptor,
    /// When it was executed (the context's `now`).
    pub timestamp: DateTime<Utc>,
    /// Whether the game reported success.
    pub success: bool,
    /// Reward gained (gold, xp or a game-specific unit).
    pub reward: f32,
    /// Resources spent.
    pub cost: f32,
    /// Wall time the action took, in seconds.
    pub duration_secs: f32,
    /// Character and world at execution time.
    pub context: SituationSnapshot,
    /// Game-reported failure tag, if any.
    pub error: Option<String>,
}

impl ActionOutcome {
    /// Record an action executed in `context`.
    ///
    /// Cost defaults to the action's energy plus gold cost; reward and
    /// duration start at zero.
    #[must_use]
    pub fn new(action: &GameAction, context: &GameContext, success: bool) -> Self {
        #[allow(clippy::cast_precision_loss)]
        let cost = action.energy_cost + action.gold_cost as f32;
        Self::from_descriptor(ActionDescriptor::from(action), context, success).with_cost(cost)
    }

    /// Record an outcome from a bare descriptor.
    #[must_use]
    pub fn from_descriptor(action: ActionDescriptor, context: &GameContext, success: bool) -> Self {
        Self {
            id: OutcomeId::new(),
            action,
            timestamp: context.now(),
            success,
            reward: 0.0,
            cost: 0.0,
            duration_secs: 0.0,
            context: context.situation(),
            error: None,
        }
    }

    /// Set the reward.
    #[must_use]
    pub fn with_reward(mut self, reward: f32) -> Self {
        self.reward = reward;
        self
    }

    /// Set the cost.
    #[must_use]
    pub fn with_cost(mut self, cost: f32) -> Self {
        self.cost = cost.max(0.0);
        self
    }

    /// Set the duration in seconds.
    #[must_use]
    pub fn with_duration(mut self, secs: f32) -> Self {
        self.duration_secs = secs.max(0.0);
        self
    }

    /// Attach a failure tag.
    #[must_use]
    pub fn with_error(mut self, error: impl Into<String>) -> Self {
        self.error = Some(error.into());
        self
    }

    /// Action type label.
    #[must_use]
    pub fn action_type(&self) -> &str {
        &self.action.action_type
    }

    /// Time-of-day bucket of the timestamp.
    #[must_use]
    pub fn time_of_day(&self) -> TimeOfDay {
        TimeOfDay::of(self.timestamp)
    }
}
