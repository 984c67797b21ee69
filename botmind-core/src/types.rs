//! Core type definitions shared by every BOTMIND component.
//!
//! The game context types are read-only snapshots supplied by the caller
//! each decision cycle. Nothing in this crate mutates them.

use std::collections::BTreeMap;
use std::fmt;

use chrono::{DateTime, Timelike, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

// ---------------------------------------------------------------------------
// Identity Types
// ---------------------------------------------------------------------------

/// Unique identifier for a goal.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct GoalId(pub Uuid);

impl GoalId {
    /// Create a new random goal ID.
    #[must_use]
    pub fn new() -> Self {
        Self(Uuid::new_v4())
    }
}

impl Default for GoalId {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Display for GoalId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Unique identifier for a recorded action outcome.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct OutcomeId(pub Uuid);

impl OutcomeId {
    /// Create a new random outcome ID.
    #[must_use]
    pub fn new() -> Self {
        Self(Uuid::new_v4())
    }
}

impl Default for OutcomeId {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Display for OutcomeId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

// ---------------------------------------------------------------------------
// Time
// ---------------------------------------------------------------------------

/// Coarse in-game time-of-day bucket, derived from the wall-clock hour.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TimeOfDay {
    /// 06:00–11:59.
    Morning,
    /// 12:00–17:59.
    Afternoon,
    /// 18:00–21:59.
    Evening,
    /// 22:00–05:59.
    Night,
}

impl TimeOfDay {
    /// Bucket an hour of the day (0–23).
    #[must_use]
    pub fn from_hour(hour: u32) -> Self {
        match hour {
            6..=11 => Self::Morning,
            12..=17 => Self::Afternoon,
            18..=21 => Self::Evening,
            _ => Self::Night,
        }
    }

    /// Bucket a timestamp.
    #[must_use]
    pub fn of(time: DateTime<Utc>) -> Self {
        Self::from_hour(time.hour())
    }

    /// Lowercase label used in pattern keys and recommendations.
    #[must_use]
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Morning => "morning",
            Self::Afternoon => "afternoon",
            Self::Evening => "evening",
            Self::Night => "night",
        }
    }
}

impl fmt::Display for TimeOfDay {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

// ---------------------------------------------------------------------------
// Game Context
// ---------------------------------------------------------------------------

/// Snapshot of the simulated character at decision time.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct CharacterSnapshot {
    /// Character level.
    pub level: u32,
    /// Current health, 0–100.
    pub health: f32,
    /// Current energy, 0–100.
    pub energy: f32,
    /// Gold on hand.
    pub gold: u64,
    /// Current location name.
    pub location: String,
    /// Whether the character has combat gear equipped.
    pub equipped: bool,
    /// Gang membership, if any.
    pub gang: Option<String>,
    /// Reputation score (may be negative).
    pub reputation: i64,
    /// Names of items in the inventory.
    pub inventory: Vec<String>,
    /// Number of properties owned.
    pub properties: u32,
    /// Number of friends.
    pub friends: u32,
    /// Distinct locations visited so far.
    pub visited_locations: Vec<String>,
    /// Lifetime crimes committed.
    pub crimes_committed: u32,
    /// Lifetime combat victories.
    pub combat_wins: u32,
    /// Lifetime completed trades.
    pub trades_completed: u32,
    /// Lifetime completed quests.
    pub quests_completed: u32,
    /// Skill name → skill level.
    pub skills: BTreeMap<String, u32>,
    /// Cooldown key → time the action becomes available again.
    pub cooldowns: BTreeMap<String, DateTime<Utc>>,
}

impl Default for CharacterSnapshot {
    fn default() -> Self {
        Self {
            level: 1,
            health: 100.0,
            energy: 100.0,
            gold: 0,
            location: "town".to_string(),
            equipped: false,
            gang: None,
            reputation: 0,
            inventory: Vec::new(),
            properties: 0,
            friends: 0,
            visited_locations: Vec::new(),
            crimes_committed: 0,
            combat_wins: 0,
            trades_completed: 0,
            quests_completed: 0,
            skills: BTreeMap::new(),
            cooldowns: BTreeMap::new(),
        }
    }
}

impl CharacterSnapshot {
    /// Level of a named skill, 0 if never trained.
    #[must_use]
    pub fn skill_level(&self, skill: &str) -> u32 {
        self.skills.get(skill).copied().unwrap_or(0)
    }
}

/// Snapshot of the shared world at decision time.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct WorldSnapshot {
    /// Caller-supplied wall-clock time for this cycle.
    pub now: DateTime<Utc>,
    /// Names of currently running world events (e.g. "double_xp", "market_boom").
    pub active_events: Vec<String>,
}

/// Character and world together — the part of a context stored with outcomes.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct SituationSnapshot {
    /// Character state.
    pub character: CharacterSnapshot,
    /// World state.
    pub world: WorldSnapshot,
}

/// Everything the decision core reads in one cycle.
///
/// Active goals and outcome history live in the agent's own `GoalManager`
/// and `BotMemory`; the context only carries what the game reports.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct GameContext {
    /// Character state.
    pub character: CharacterSnapshot,
    /// World state.
    pub world: WorldSnapshot,
    /// Action types executed most recently, oldest first.
    pub recent_actions: Vec<String>,
}

impl GameContext {
    /// Build a context at the given time with a default character.
    #[must_use]
    pub fn at(now: DateTime<Utc>) -> Self {
        Self {
            world: WorldSnapshot {
                now,
                active_events: Vec::new(),
            },
            ..Self::default()
        }
    }

    /// The caller-supplied current time.
    #[must_use]
    pub fn now(&self) -> DateTime<Utc> {
        self.world.now
    }

    /// Time-of-day bucket of the current time.
    #[must_use]
    pub fn time_of_day(&self) -> TimeOfDay {
        TimeOfDay::of(self.world.now)
    }

    /// The last `n` recent actions (fewer if the tail is shorter).
    #[must_use]
    pub fn recent_tail(&self, n: usize) -> &[String] {
        let start = self.recent_actions.len().saturating_sub(n);
        &self.recent_actions[start..]
    }

    /// Character + world, as stored in an outcome record.
    #[must_use]
    pub fn situation(&self) -> SituationSnapshot {
        SituationSnapshot {
            character: self.character.clone(),
            world: self.world.clone(),
        }
    }
}
