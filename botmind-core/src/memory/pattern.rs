//! Situational success patterns.
//!
//! A pattern groups outcomes by one situational dimension and a bucket of
//! that dimension, e.g. "combat while health was low". Keys are plain
//! strings so they serialize cleanly and read well in reports:
//!
//! ```text
//! combat_health:low            energy:medium
//! location:docks:fish          combat_equipped:no
//! level:10-19:quest            time:evening:rob_store
//! ```

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::outcome::ActionOutcome;
use crate::types::TimeOfDay;

/// Outcomes needed on each side of the trend comparison.
pub const TREND_WINDOW: usize = 5;

/// Minimum swing in success rate that counts as a trend.
const TREND_THRESHOLD: f32 = 0.1;

/// Situational axis a pattern is keyed on.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PatternDimension {
    /// Character health during combat actions.
    CombatHealth,
    /// Character energy, any action.
    Energy,
    /// Location × action type.
    Location,
    /// Equipped state during combat actions.
    Equipment,
    /// Level bracket × action type.
    Level,
    /// Time of day × action type.
    TimeOfDay,
}

impl PatternDimension {
    /// The situational dimensions, recomputed before combos.
    pub const SITUATIONAL: [Self; 5] = [
        Self::CombatHealth,
        Self::Energy,
        Self::Location,
        Self::Equipment,
        Self::Level,
    ];

    /// The key `outcome` falls under on this axis, if the axis applies.
    #[must_use]
    pub fn key_for(self, outcome: &ActionOutcome) -> Option<String> {
        let character = &outcome.context.character;
        let action_type = outcome.action_type();
        match self {
            Self::CombatHealth => outcome
                .action
                .is_combat()
                .then(|| combat_health_key(character.health)),
            Self::Energy => Some(energy_key(character.energy)),
            Self::Location => Some(location_key(&character.location, action_type)),
            Self::Equipment => outcome
                .action
                .is_combat()
                .then(|| equipment_key(character.equipped)),
            Self::Level => Some(level_key(character.level, action_type)),
            Self::TimeOfDay => Some(time_key(outcome.time_of_day(), action_type)),
        }
    }
}

/// Direction of recent performance.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Trend {
    /// Recent outcomes beat the ones before them.
    Improving,
    /// Recent outcomes trail the ones before them.
    Declining,
    /// No meaningful difference, or not enough data.
    #[default]
    Stable,
}

impl Trend {
    /// Compare the newest [`TREND_WINDOW`] results with the window before.
    ///
    /// `results` is chronological. Fewer than two windows is `Stable`.
    #[must_use]
    pub fn from_results(results: &[bool]) -> Self {
        if results.len() < TREND_WINDOW * 2 {
            return Self::Stable;
        }
        let end = results.len();
        let recent = rate(&results[end - TREND_WINDOW..]);
        let prior = rate(&results[end - TREND_WINDOW * 2..end - TREND_WINDOW]);
        let delta = recent - prior;
        if delta > TREND_THRESHOLD {
            Self::Improving
        } else if delta < -TREND_THRESHOLD {
            Self::Declining
        } else {
            Self::Stable
        }
    }

    /// Lowercase label.
    #[must_use]
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Improving => "improving",
            Self::Declining => "declining",
            Self::Stable => "stable",
        }
    }
}

/// Learned success statistics for one situational bucket.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Pattern {
    /// Full pattern key.
    pub key: String,
    /// Axis the key belongs to.
    pub dimension: PatternDimension,
    /// Matching outcomes in the window.
    pub occurrences: u32,
    /// Successful matching outcomes.
    pub successes: u32,
    /// `successes / occurrences`.
    pub success_rate: f32,
    /// `min(1, occurrences / min_samples)`.
    pub confidence: f32,
    /// Recent direction.
    pub trend: Trend,
    /// Timestamp of the newest matching outcome.
    pub last_seen: DateTime<Utc>,
}

impl Pattern {
    /// Build a pattern from the matching outcomes, oldest first.
    ///
    /// Returns `None` when nothing matches.
    #[must_use]
    pub fn from_matches(
        dimension: PatternDimension,
        key: String,
        matches: &[&ActionOutcome],
        min_samples: u32,
    ) -> Option<Self> {
        let last_seen = matches.last()?.timestamp;
        let results: Vec<bool> = matches.iter().map(|o| o.success).collect();
        let occurrences = u32::try_from(results.len()).unwrap_or(u32::MAX);
        let successes = u32::try_from(results.iter().filter(|s| **s).count()).unwrap_or(u32::MAX);
        Some(Self {
            key,
            dimension,
            occurrences,
            successes,
            success_rate: rate(&results),
            confidence: confidence(occurrences, min_samples),
            trend: Trend::from_results(&results),
            last_seen,
        })
    }

    /// Whether this pattern has reached the given confidence.
    #[must_use]
    pub fn is_confident(&self, threshold: f32) -> bool {
        self.confidence >= threshold
    }
}

// ---------------------------------------------------------------------------
// Keys and buckets
// ---------------------------------------------------------------------------

/// `low` under 40, `medium` under 70, else `high`.
#[must_use]
pub fn health_bucket(health: f32) -> &'static str {
    if health < 40.0 {
        "low"
    } else if health < 70.0 {
        "medium"
    } else {
        "high"
    }
}

/// `low` under 25, `medium` under 60, else `high`.
#[must_use]
pub fn energy_bucket(energy: f32) -> &'static str {
    if energy < 25.0 {
        "low"
    } else if energy < 60.0 {
        "medium"
    } else {
        "high"
    }
}

/// Ten-level bracket label, e.g. `10-19`.
#[must_use]
pub fn level_bucket(level: u32) -> String {
    let low = level / 10 * 10;
    format!("{low}-{}", low + 9)
}

/// Key for combat at a given health.
#[must_use]
pub fn combat_health_key(health: f32) -> String {
    format!("combat_health:{}", health_bucket(health))
}

/// Key for any action at a given energy.
#[must_use]
pub fn energy_key(energy: f32) -> String {
    format!("energy:{}", energy_bucket(energy))
}

/// Key for an action type at a location.
#[must_use]
pub fn location_key(location: &str, action_type: &str) -> String {
    format!("location:{location}:{action_type}")
}

/// Key for combat with or without gear.
#[must_use]
pub fn equipment_key(equipped: bool) -> String {
    format!("combat_equipped:{}", if equipped { "yes" } else { "no" })
}

/// Key for an action type within a level bracket.
#[must_use]
pub fn level_key(level: u32, action_type: &str) -> String {
    format!("level:{}:{action_type}", level_bucket(level))
}

/// Key for an action type at a time of day.
#[must_use]
pub fn time_key(time: TimeOfDay, action_type: &str) -> String {
    format!("time:{time}:{action_type}")
}

/// Prefix shared by every time key for `time`.
#[must_use]
pub fn time_prefix(time: TimeOfDay) -> String {
    format!("time:{time}:")
}

// ---------------------------------------------------------------------------
// Helpers
// ---------------------------------------------------------------------------

/// `min(1, occurrences / min_samples)`.
#[must_use]
pub fn confidence(occurrences: u32, min_samples: u32) -> f32 {
    #[allow(clippy::cast_precision_loss)]
    let c = occurrences as f32 / min_samples.max(1) as f32;
    c.min(1.0)
}

#[allow(clippy::cast_precision_loss)]
fn rate(results: &[bool]) -> f32 {
    if results.is_empty() {
        return 0.0;
    }
    results.iter().filter(|s| **s).count() as f32 / results.len() as f32
}
