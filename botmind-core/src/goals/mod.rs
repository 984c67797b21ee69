//! Goal definitions and the per-agent [`GoalManager`].
//!
//! A goal moves through a one-way lifecycle:
//!
//! ```text
//! ┌────────┐  progress ≥ 1.0  ┌───────────┐
//! │ Active │────────────────▶│ Completed │──▶ follow-ups become Active
//! └────────┘                  └───────────┘
//!      │ deadline passed
//!      ▼
//! ┌────────┐
//! │ Failed │  (dropped, counted in stats)
//! └────────┘
//! ```
//!
//! Targets are typed per goal kind ([`GoalTarget`]); the kind is derived
//! from the target variant so the two can never disagree.

pub mod manager;
pub mod templates;

pub use manager::{GoalManager, GoalStats, UpdateReport};
pub use templates::{GoalTemplate, template_for};

use std::fmt;

use chrono::{DateTime, Duration, Utc};
use serde::{Deserialize, Serialize};

use crate::types::GoalId;

/// Lowest allowed goal priority.
pub const MIN_PRIORITY: u8 = 1;
/// Highest allowed goal priority.
pub const MAX_PRIORITY: u8 = 10;

/// The fourteen goal kinds.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum GoalType {
    /// Reach a character level.
    LevelUp,
    /// Earn an amount of gold.
    EarnMoney,
    /// Obtain a specific item.
    AcquireItem,
    /// Become a gang member.
    JoinGang,
    /// Own a number of properties.
    BuyProperty,
    /// Raise reputation.
    GainReputation,
    /// Reach a friend count.
    MakeFriends,
    /// Visit a number of distinct locations.
    ExploreLocations,
    /// Commit a number of crimes.
    CommitCrimes,
    /// Win a number of fights.
    WinCombats,
    /// Raise a skill to a level.
    TrainSkill,
    /// Complete a number of trades.
    CompleteTrades,
    /// Complete a number of quests.
    CompleteQuests,
    /// Try many different action types.
    Experiment,
}

impl GoalType {
    /// Every goal kind, in table order.
    pub const ALL: [Self; 14] = [
        Self::LevelUp,
        Self::EarnMoney,
        Self::AcquireItem,
        Self::JoinGang,
        Self::BuyProperty,
        Self::GainReputation,
        Self::MakeFriends,
        Self::ExploreLocations,
        Self::CommitCrimes,
        Self::WinCombats,
        Self::TrainSkill,
        Self::CompleteTrades,
        Self::CompleteQuests,
        Self::Experiment,
    ];

    /// Snake-case label.
    #[must_use]
    pub fn as_str(self) -> &'static str {
        match self {
            Self::LevelUp => "level_up",
            Self::EarnMoney => "earn_money",
            Self::AcquireItem => "acquire_item",
            Self::JoinGang => "join_gang",
            Self::BuyProperty => "buy_property",
            Self::GainReputation => "gain_reputation",
            Self::MakeFriends => "make_friends",
            Self::ExploreLocations => "explore_locations",
            Self::CommitCrimes => "commit_crimes",
            Self::WinCombats => "win_combats",
            Self::TrainSkill => "train_skill",
            Self::CompleteTrades => "complete_trades",
            Self::CompleteQuests => "complete_quests",
            Self::Experiment => "experiment",
        }
    }

    /// Position in [`GoalType::ALL`].
    #[must_use]
    pub fn index(self) -> usize {
        Self::ALL.iter().position(|t| *t == self).unwrap_or(0)
    }
}

impl fmt::Display for GoalType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// What a goal is trying to reach. One variant per [`GoalType`].
///
/// Counter goals carry the counter value at creation time (`baseline`) so
/// progress measures what was achieved since the goal was set.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum GoalTarget {
    /// Reach `level`.
    LevelUp {
        /// Target level.
        level: u32,
    },
    /// Gain `amount` gold over `baseline`.
    EarnMoney {
        /// Gold at creation.
        baseline: u64,
        /// Gold to earn.
        amount: u64,
    },
    /// Hold `item` in the inventory.
    AcquireItem {
        /// Item name.
        item: String,
    },
    /// Be in a gang (a specific one, if named).
    JoinGang {
        /// Required gang, or any.
        gang: Option<String>,
    },
    /// Own at least `count` properties.
    BuyProperty {
        /// Property count.
        count: u32,
    },
    /// Gain `amount` reputation over `baseline`.
    GainReputation {
        /// Reputation at creation.
        baseline: i64,
        /// Reputation to gain.
        amount: i64,
    },
    /// Have at least `count` friends.
    MakeFriends {
        /// Friend count.
        count: u32,
    },
    /// Have visited at least `count` distinct locations.
    ExploreLocations {
        /// Location count.
        count: u32,
    },
    /// Commit `count` crimes beyond `baseline`.
    CommitCrimes {
        /// Crimes at creation.
        baseline: u32,
        /// Crimes to commit.
        count: u32,
    },
    /// Win `count` fights beyond `baseline`.
    WinCombats {
        /// Wins at creation.
        baseline: u32,
        /// Wins needed.
        count: u32,
    },
    /// Raise `skill` to `level`.
    TrainSkill {
        /// Skill name.
        skill: String,
        /// Target skill level.
        level: u32,
    },
    /// Complete `count` trades beyond `baseline`.
    CompleteTrades {
        /// Trades at creation.
        baseline: u32,
        /// Trades needed.
        count: u32,
    },
    /// Complete `count` quests beyond `baseline`.
    CompleteQuests {
        /// Quests at creation.
        baseline: u32,
        /// Quests needed.
        count: u32,
    },
    /// Use `distinct_actions` different action types in the recent tail.
    Experiment {
        /// Distinct types needed.
        distinct_actions: u32,
    },
}

impl GoalTarget {
    /// The goal kind this target belongs to.
    #[must_use]
    pub fn goal_type(&self) -> GoalType {
        match self {
            Self::LevelUp { .. } => GoalType::LevelUp,
            Self::EarnMoney { .. } => GoalType::EarnMoney,
            Self::AcquireItem { .. } => GoalType::AcquireItem,
            Self::JoinGang { .. } => GoalType::JoinGang,
            Self::BuyProperty { .. } => GoalType::BuyProperty,
            Self::GainReputation { .. } => GoalType::GainReputation,
            Self::MakeFriends { .. } => GoalType::MakeFriends,
            Self::ExploreLocations { .. } => GoalType::ExploreLocations,
            Self::CommitCrimes { .. } => GoalType::CommitCrimes,
            Self::WinCombats { .. } => GoalType::WinCombats,
            Self::TrainSkill { .. } => GoalType::TrainSkill,
            Self::CompleteTrades { .. } => GoalType::CompleteTrades,
            Self::CompleteQuests { .. } => GoalType::CompleteQuests,
            Self::Experiment { .. } => GoalType::Experiment,
        }
    }
}

/// Where a goal came from.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum GoalOrigin {
    /// Part of the archetype's starter set.
    Starter,
    /// Added directly by the caller.
    Manual,
    /// Attached to, or generated by the template of, a completed goal.
    FollowUp,
    /// Generated by the archetype's emergent-goal table.
    Emergent,
}

/// Typed goal metadata.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GoalMetadata {
    /// Where the goal came from.
    pub origin: GoalOrigin,
    /// Free-text description.
    pub description: String,
    /// Action labels that advance this goal.
    pub related_actions: Vec<String>,
    /// The completed goal that spawned this one, if any.
    pub parent: Option<GoalId>,
}

impl Default for GoalMetadata {
    fn default() -> Self {
        Self {
            origin: GoalOrigin::Manual,
            description: String::new(),
            related_actions: Vec::new(),
            parent: None,
        }
    }
}

/// A single goal.
///
/// `priority` and `progress` are kept inside their ranges by every
/// constructor and mutator; they are read through accessors.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Goal {
    /// Unique identifier.
    pub id: GoalId,
    /// What the goal is trying to reach.
    pub target: GoalTarget,
    priority: u8,
    progress: f32,
    /// Time after which the goal fails.
    pub deadline: Option<DateTime<Utc>>,
    /// When the goal was created.
    pub created_at: DateTime<Utc>,
    /// When the goal completed.
    pub completed_at: Option<DateTime<Utc>>,
    /// Typed metadata.
    pub metadata: GoalMetadata,
    /// Goals declared as prerequisites. Informational only.
    pub prerequisites: Vec<GoalId>,
    /// Goals to activate when this one completes.
    pub follow_ups: Vec<Goal>,
}

impl Goal {
    /// Create a goal with clamped priority and zero progress.
    #[must_use]
    pub fn new(target: GoalTarget, priority: u8, created_at: DateTime<Utc>) -> Self {
        Self {
            id: GoalId::new(),
            target,
            priority: priority.clamp(MIN_PRIORITY, MAX_PRIORITY),
            progress: 0.0,
            deadline: None,
            created_at,
            completed_at: None,
            metadata: GoalMetadata::default(),
            prerequisites: Vec::new(),
            follow_ups: Vec::new(),
        }
    }

    /// Goal kind.
    #[must_use]
    pub fn goal_type(&self) -> GoalType {
        self.target.goal_type()
    }

    /// Current priority, 1–10.
    #[must_use]
    pub fn priority(&self) -> u8 {
        self.priority
    }

    /// Current progress, 0–1.
    #[must_use]
    pub fn progress(&self) -> f32 {
        self.progress
    }

    /// Whether the goal has been completed.
    #[must_use]
    pub fn is_completed(&self) -> bool {
        self.completed_at.is_some()
    }

    /// Set an absolute deadline.
    #[must_use]
    pub fn with_deadline(mut self, deadline: DateTime<Utc>) -> Self {
        self.deadline = Some(deadline);
        self
    }

    /// Set a deadline relative to `created_at`.
    #[must_use]
    pub fn with_time_limit(mut self, limit: Duration) -> Self {
        self.deadline = Some(self.created_at + limit);
        self
    }

    /// Set the description.
    #[must_use]
    pub fn with_description(mut self, description: impl Into<String>) -> Self {
        self.metadata.description = description.into();
        self
    }

    /// Set the related action labels.
    #[must_use]
    pub fn with_related_actions<I, S>(mut self, actions: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.metadata.related_actions = actions.into_iter().map(Into::into).collect();
        self
    }

    /// Set the origin.
    #[must_use]
    pub fn with_origin(mut self, origin: GoalOrigin) -> Self {
        self.metadata.origin = origin;
        self
    }

    /// Declare a prerequisite goal.
    #[must_use]
    pub fn with_prerequisite(mut self, id: GoalId) -> Self {
        self.prerequisites.push(id);
        self
    }

    /// Attach a goal to activate on completion.
    #[must_use]
    pub fn with_follow_up(mut self, follow_up: Goal) -> Self {
        self.follow_ups.push(follow_up.with_origin(GoalOrigin::FollowUp));
        self
    }

    pub(crate) fn set_progress(&mut self, progress: f32) {
        self.progress = if progress.is_nan() {
            0.0
        } else {
            progress.clamp(0.0, 1.0)
        };
    }

    /// Shift priority by `delta`, staying inside [1, 10].
    pub(crate) fn adjust_priority(&mut self, delta: i8) {
        let shifted = i16::from(self.priority) + i16::from(delta);
        self.priority = shifted.clamp(i16::from(MIN_PRIORITY), i16::from(MAX_PRIORITY)) as u8;
    }

    /// Time remaining until the deadline (negative once overdue).
    #[must_use]
    pub fn time_remaining(&self, now: DateTime<Utc>) -> Option<Duration> {
        self.deadline.map(|d| d - now)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn priority_is_clamped_on_creation() {
        let now = Utc::now();
        assert_eq!(Goal::new(GoalTarget::LevelUp { level: 2 }, 0, now).priority(), 1);
        assert_eq!(Goal::new(GoalTarget::LevelUp { level: 2 }, 42, now).priority(), 10);
    }

    #[test]
    fn priority_adjustments_stay_in_range() {
        let mut goal = Goal::new(GoalTarget::LevelUp { level: 2 }, 9, Utc::now());
        goal.adjust_priority(3);
        assert_eq!(goal.priority(), 10);
        goal.adjust_priority(-20);
        assert_eq!(goal.priority(), 1);
    }

    #[test]
    fn progress_is_clamped() {
        let mut goal = Goal::new(GoalTarget::Experiment { distinct_actions: 3 }, 5, Utc::now());
        goal.set_progress(1.7);
        assert!((goal.progress() - 1.0).abs() < f32::EPSILON);
        goal.set_progress(-0.2);
        assert!(goal.progress().abs() < f32::EPSILON);
        goal.set_progress(f32::NAN);
        assert!(goal.progress().abs() < f32::EPSILON);
    }

    #[test]
    fn target_determines_type() {
        let target = GoalTarget::TrainSkill { skill: "stealth".into(), level: 3 };
        assert_eq!(target.goal_type(), GoalType::TrainSkill);
        assert_eq!(GoalType::TrainSkill.to_string(), "train_skill");
    }

    #[test]
    fn attached_follow_ups_are_marked() {
        let now = Utc::now();
        let goal = Goal::new(GoalTarget::LevelUp { level: 3 }, 5, now)
            .with_follow_up(Goal::new(GoalTarget::LevelUp { level: 6 }, 5, now));
        assert_eq!(goal.follow_ups[0].metadata.origin, GoalOrigin::FollowUp);
    }
}
