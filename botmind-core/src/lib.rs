//! # BOTMIND Core Library
//!
//! Decision core for autonomous game-playing test bots.
//!
//! Each bot combines four parts:
//!
//! - **Personality** — one of eight archetypes with a fixed trait vector
//!   and activity preferences ([`personality`])
//! - **Goals** — a prioritized, self-extending goal set ([`GoalManager`])
//! - **Memory** — bounded outcome history with learned patterns, combos and
//!   advice ([`BotMemory`])
//! - **Decision** — multi-factor scoring of candidate actions
//!   ([`DecisionEngine`])
//!
//! [`Bot`] wires the four together. The game itself stays outside: callers
//! supply a [`GameContext`] and a list of [`GameAction`]s each cycle, execute
//! the chosen action, and report back an [`ActionOutcome`].
//!
//! ## Determinism
//!
//! Nothing reads the system clock. Time comes from `GameContext::world.now`
//! and outcome timestamps; randomness from a seedable `StdRng`.

#![deny(clippy::unwrap_used)]
#![deny(missing_docs)]
#![warn(clippy::pedantic)]
#![allow(clippy::module_name_repetitions)]

pub mod action;
pub mod agent;
pub mod config;
pub mod decision;
pub mod error;
pub mod goals;
pub mod memory;
pub mod personality;
pub mod types;

pub use action::{ActionCategory, ActionDescriptor, GameAction};
pub use agent::{Bot, BotStatus};
pub use config::{BotConfig, DecisionOptions, GoalConfig, MemoryConfig};
pub use decision::{DecisionEngine, RankedAction, ScoreBreakdown};
pub use error::BotError;
pub use goals::{Goal, GoalManager, GoalOrigin, GoalStats, GoalTarget, GoalType, UpdateReport};
pub use memory::{ActionCombo, ActionOutcome, BotMemory, Pattern, Recommendation, Trend};
pub use personality::{
    Archetype, PersonalityProfile, PersonalityTraits, Playstyle, all_archetypes, create_profile,
    create_variant,
};
pub use types::*;
