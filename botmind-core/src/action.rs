//! Candidate actions supplied by the game-rules layer.
//!
//! A [`GameAction`] is what the bot may do this cycle; an
//! [`ActionDescriptor`] is the slimmer copy kept inside an outcome record.

use serde::{Deserialize, Serialize};

use crate::types::TimeOfDay;

/// Broad family an action belongs to. Drives hard filters (combat health
/// floor) and pattern bucketing.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ActionCategory {
    /// Fights, duels, PvP.
    Combat,
    /// Chatting, messaging, parties.
    Social,
    /// Jobs, trading, investing.
    Economy,
    /// Theft, robbery, heists.
    Crime,
    /// Travel and discovery.
    Exploration,
    /// Training and skill work.
    Training,
    /// Gang / crew activity.
    Gang,
    /// Quest steps.
    Quest,
    /// Resting, healing, idling.
    Rest,
    /// Anything else.
    Other,
}

impl ActionCategory {
    /// Guess a category from an action-type label.
    #[must_use]
    pub fn infer(action_type: &str) -> Self {
        let t = action_type.to_lowercase();
        let has = |words: &[&str]| words.iter().any(|w| t.contains(w));

        if has(&["fight", "attack", "combat", "duel", "pvp", "hunt"]) {
            Self::Combat
        } else if has(&["crime", "steal", "rob", "heist", "smuggle"]) {
            Self::Crime
        } else if has(&["gang", "crew", "faction"]) {
            Self::Gang
        } else if has(&["chat", "social", "friend", "message", "party"]) {
            Self::Social
        } else if has(&["trade", "buy", "sell", "market", "invest", "work", "job"]) {
            Self::Economy
        } else if has(&["explore", "travel", "visit", "discover"]) {
            Self::Exploration
        } else if has(&["train", "study", "practice", "grind"]) {
            Self::Training
        } else if has(&["quest", "mission"]) {
            Self::Quest
        } else if has(&["rest", "sleep", "heal", "idle"]) {
            Self::Rest
        } else {
            Self::Other
        }
    }
}

/// A candidate action for this decision cycle.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GameAction {
    /// Stable identifier (unique within a candidate list).
    pub id: String,
    /// Human-readable name, also used for keyword matching.
    pub name: String,
    /// Action type label; the key under which outcomes are learned.
    pub action_type: String,
    /// Action family.
    pub category: ActionCategory,
    /// Energy spent when executed.
    pub energy_cost: f32,
    /// Gold spent when executed.
    pub gold_cost: u64,
    /// Minimum character level required.
    pub min_level: u32,
    /// Minimum gold on hand required (beyond the cost).
    pub min_gold: u64,
    /// Estimated failure risk, 0–1.
    pub risk: f32,
    /// Expected reward on success.
    pub expected_reward: f32,
    /// Explicit success probability; falls back to `1 - risk`.
    pub success_chance: Option<f32>,
    /// Time-of-day windows in which the action is available (empty = always).
    pub available_times: Vec<TimeOfDay>,
    /// Location the action must be performed at, if any.
    pub location: Option<String>,
    /// Key into the character's cooldown table; defaults to the action id.
    pub cooldown_key: Option<String>,
}

impl GameAction {
    /// Create a zero-cost, zero-risk action with a category inferred from its type.
    #[must_use]
    pub fn new(id: impl Into<String>, action_type: impl Into<String>) -> Self {
        let id = id.into();
        let action_type = action_type.into();
        Self {
            name: id.clone(),
            category: ActionCategory::infer(&action_type),
            id,
            action_type,
            energy_cost: 0.0,
            gold_cost: 0,
            min_level: 0,
            min_gold: 0,
            risk: 0.0,
            expected_reward: 0.0,
            success_chance: None,
            available_times: Vec::new(),
            location: None,
            cooldown_key: None,
        }
    }

    /// Set the energy and gold costs.
    #[must_use]
    pub fn with_costs(mut self, energy: f32, gold: u64) -> Self {
        self.energy_cost = energy.max(0.0);
        self.gold_cost = gold;
        self
    }

    /// Set the expected reward.
    #[must_use]
    pub fn with_reward(mut self, reward: f32) -> Self {
        self.expected_reward = reward;
        self
    }

    /// Set the failure risk (clamped to [0, 1]).
    #[must_use]
    pub fn with_risk(mut self, risk: f32) -> Self {
        self.risk = risk.clamp(0.0, 1.0);
        self
    }

    /// Override the category.
    #[must_use]
    pub fn with_category(mut self, category: ActionCategory) -> Self {
        self.category = category;
        self
    }

    /// Set level and gold minimums.
    #[must_use]
    pub fn with_requirements(mut self, min_level: u32, min_gold: u64) -> Self {
        self.min_level = min_level;
        self.min_gold = min_gold;
        self
    }

    /// Restrict the action to certain times of day.
    #[must_use]
    pub fn with_times(mut self, times: Vec<TimeOfDay>) -> Self {
        self.available_times = times;
        self
    }

    /// Restrict the action to a location.
    #[must_use]
    pub fn at_location(mut self, location: impl Into<String>) -> Self {
        self.location = Some(location.into());
        self
    }

    /// Set the display name.
    #[must_use]
    pub fn named(mut self, name: impl Into<String>) -> Self {
        self.name = name.into();
        self
    }

    /// Probability of success used in expected-value scoring.
    #[must_use]
    pub fn success_probability(&self) -> f32 {
        self.success_chance
            .unwrap_or(1.0 - self.risk)
            .clamp(0.0, 1.0)
    }

    /// Whether this is a combat action.
    #[must_use]
    pub fn is_combat(&self) -> bool {
        self.category == ActionCategory::Combat
    }

    /// Key into the character's cooldown table.
    #[must_use]
    pub fn cooldown_key(&self) -> &str {
        self.cooldown_key.as_deref().unwrap_or(&self.id)
    }

    /// Lowercased "type name" text used for keyword matching.
    #[must_use]
    pub fn label(&self) -> String {
        format!("{} {}", self.action_type, self.name).to_lowercase()
    }
}

/// The part of an action kept in an outcome record.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ActionDescriptor {
    /// Action id.
    pub id: String,
    /// Action type label.
    pub action_type: String,
    /// Action family.
    pub category: ActionCategory,
    /// Estimated failure risk at decision time.
    pub risk: f32,
}

impl ActionDescriptor {
    /// Build a descriptor directly from a type label.
    #[must_use]
    pub fn new(action_type: impl Into<String>) -> Self {
        let action_type = action_type.into();
        Self {
            id: action_type.clone(),
            category: ActionCategory::infer(&action_type),
            action_type,
            risk: 0.0,
        }
    }

    /// Whether this was a combat action.
    #[must_use]
    pub fn is_combat(&self) -> bool {
        self.category == ActionCategory::Combat
    }
}

impl From<&GameAction> for ActionDescriptor {
    fn from(action: &GameAction) -> Self {
        Self {
            id: action.id.clone(),
            action_type: action.action_type.clone(),
            category: action.category,
            risk: action.risk,
        }
    }
}
