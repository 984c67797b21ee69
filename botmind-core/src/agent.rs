//! A single autonomous bot: personality, goals, memory and decision engine.
//!
//! One decision cycle:
//!
//! ```text
//! context + candidates ──▶ decide() ──▶ (caller executes the action)
//!                                              │
//!                     observe(outcome, ctx) ◀──┘
//!                       ├─ BotMemory::record_outcome
//!                       ├─ GoalManager::update_progress
//!                       └─ recommendation / strategy logging
//! ```

use rand::SeedableRng;
use rand::rngs::StdRng;
use tracing::{debug, info};

use crate::action::GameAction;
use crate::config::BotConfig;
use crate::decision::DecisionEngine;
use crate::error::Result;
use crate::goals::{GoalManager, GoalStats, UpdateReport};
use crate::memory::{ActionOutcome, BotMemory, Recommendation};
use crate::personality::{Archetype, create_profile};
use crate::types::GameContext;

/// Point-in-time summary of a bot.
#[derive(Debug, Clone, PartialEq)]
pub struct BotStatus {
    /// Archetype the bot plays.
    pub archetype: Archetype,
    /// Decisions made so far.
    pub decisions: u64,
    /// Goal counters.
    pub goals: GoalStats,
    /// Outcomes currently retained.
    pub outcomes: usize,
    /// Success rate over the retained window, if any.
    pub recent_success: Option<f32>,
    /// Whether recent results call for a strategy change.
    pub should_adapt: bool,
}

/// Owns one personality's goal manager, memory and decision engine.
#[derive(Debug, Clone)]
pub struct Bot {
    goals: GoalManager,
    memory: BotMemory,
    engine: DecisionEngine,
    rng: StdRng,
    decisions: u64,
    initialized: bool,
}

impl Bot {
    /// Build a bot for an archetype id such as `"grinder"`.
    ///
    /// `seed`, when given, overrides `config.decision.seed` and also seeds
    /// goal-level randomness.
    ///
    /// # Errors
    /// Returns `BotError::UnknownArchetype` for an unrecognized id.
    pub fn new(archetype_id: &str, config: BotConfig, seed: Option<u64>) -> Result<Self> {
        let profile = create_profile(archetype_id)?;
        let mut decision = config.decision;
        if seed.is_some() {
            decision.seed = seed;
        }
        let rng = match decision.seed {
            Some(s) => StdRng::seed_from_u64(s.wrapping_add(1)),
            None => StdRng::from_entropy(),
        };

        info!(archetype = %profile.archetype, seeded = decision.seed.is_some(), "Bot created");
        Ok(Self {
            goals: GoalManager::with_config(profile.clone(), config.goals),
            memory: BotMemory::with_config(config.memory),
            engine: DecisionEngine::new(profile, decision),
            rng,
            decisions: 0,
            initialized: false,
        })
    }

    /// Choose the next action. Starter goals are seeded on the first call.
    ///
    /// # Errors
    /// Returns `BotError::NoCandidates` if `candidates` is empty.
    pub fn decide<'a>(
        &mut self,
        candidates: &'a [GameAction],
        context: &GameContext,
    ) -> Result<&'a GameAction> {
        if !self.initialized {
            self.goals.initialize_goals(context);
            self.initialized = true;
        }
        let chosen = self
            .engine
            .select_action(candidates, context, &self.goals, &self.memory)?;
        self.decisions += 1;
        Ok(chosen)
    }

    /// Feed back the result of an executed action and the context after it.
    pub fn observe(&mut self, outcome: ActionOutcome, context: &GameContext) -> UpdateReport {
        self.memory.record_outcome(outcome);
        let report = self.goals.update_progress(context);

        if let Some(rec) = self.memory.get_recommendation(context) {
            debug!(recommendation = %rec, "Memory recommendation");
        }
        if self.memory.should_adapt_strategy() {
            debug!(
                active_goals = self.goals.get_current_goals().len(),
                "Strategy adaptation pending"
            );
        }
        report
    }

    /// Current advice from memory.
    #[must_use]
    pub fn recommendation(&self, context: &GameContext) -> Option<Recommendation> {
        self.memory.get_recommendation(context)
    }

    /// An action label that serves the top goal.
    pub fn goal_action_hint(&mut self) -> Option<&'static str> {
        self.goals.get_recommended_action(&mut self.rng)
    }

    /// Goal manager.
    #[must_use]
    pub fn goals(&self) -> &GoalManager {
        &self.goals
    }

    /// Goal manager, mutably (to add goals by hand).
    pub fn goals_mut(&mut self) -> &mut GoalManager {
        &mut self.goals
    }

    /// Outcome memory.
    #[must_use]
    pub fn memory(&self) -> &BotMemory {
        &self.memory
    }

    /// Outcome memory, mutably (for snapshot import).
    pub fn memory_mut(&mut self) -> &mut BotMemory {
        &mut self.memory
    }

    /// Decision engine.
    #[must_use]
    pub fn engine(&self) -> &DecisionEngine {
        &self.engine
    }

    /// Summary for dashboards and logs.
    #[must_use]
    pub fn status(&self) -> BotStatus {
        BotStatus {
            archetype: self.engine.profile().archetype,
            decisions: self.decisions,
            goals: self.goals.get_stats(),
            outcomes: self.memory.len(),
            recent_success: self.memory.recent_success_rate(usize::MAX, 1),
            should_adapt: self.memory.should_adapt_strategy(),
        }
    }
}
