//! Action selection: filter, score, rank.
//!
//! Combines goal alignment, learned history, personality and resource
//! efficiency into one score per candidate and returns the best.
//!
//! ```text
//! candidates ──▶ viable? ──no──▶ cheapest by energy
//!                  │yes
//!                  ▼
//!             chaos? ──yes──▶ uniform pick
//!                  │no
//!                  ▼
//!   raw = base + goal + efficiency + risk + history + situational + combo
//!   score = max(0, raw · personality · preference · noise)
//!                  │
//!                  ▼
//!       stable sort descending ──▶ top
//! ```

pub mod scoring;

use std::cmp::Reverse;
use std::collections::{BTreeMap, VecDeque};

use ordered_float::OrderedFloat;
use rand::rngs::StdRng;
use rand::seq::SliceRandom;
use rand::{Rng, SeedableRng};
use tracing::debug;

use crate::action::GameAction;
use crate::config::DecisionOptions;
use crate::error::{BotError, Result};
use crate::goals::GoalManager;
use crate::memory::BotMemory;
use crate::personality::{Archetype, PersonalityProfile, action_multiplier, match_preference};
use crate::types::GameContext;

/// Scores kept per action id.
pub const SCORE_HISTORY_LIMIT: usize = 100;

/// Risk above which an action needs `allow_risky`.
pub const MAX_SAFE_RISK: f32 = 0.8;

/// Health below which combat actions are not viable.
pub const MIN_COMBAT_HEALTH: f32 = 30.0;

/// Per-factor breakdown of one candidate's score.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ScoreBreakdown {
    /// Normalized expected value.
    pub base: f64,
    /// Goal alignment, after `goal_weight`.
    pub goal: f64,
    /// Resource efficiency, after `efficiency_weight`.
    pub efficiency: f64,
    /// Risk adjustment.
    pub risk: f64,
    /// Learned success bonus or penalty.
    pub history: f64,
    /// Time, place, cooldown, event and repetition adjustments.
    pub situational: f64,
    /// Combo completion bonus.
    pub combo: f64,
    /// Trait multiplier.
    pub personality: f64,
    /// Preferred/avoided activity multiplier.
    pub preference: f64,
    /// Random factor.
    pub noise: f64,
}

impl ScoreBreakdown {
    /// Additive part of the score.
    #[must_use]
    pub fn raw(&self) -> f64 {
        self.base
            + self.goal
            + self.efficiency
            + self.risk
            + self.history
            + self.situational
            + self.combo
    }

    /// Final score, never negative.
    #[must_use]
    pub fn total(&self) -> f64 {
        (self.raw() * self.personality * self.preference * self.noise).max(0.0)
    }
}

/// One scored candidate from the most recent selection.
#[derive(Debug, Clone, PartialEq)]
pub struct RankedAction {
    /// Candidate action id.
    pub action_id: String,
    /// Final score.
    pub score: f64,
    /// How the score was reached.
    pub breakdown: ScoreBreakdown,
}

/// Chooses one action per cycle for a single personality.
#[derive(Debug, Clone)]
pub struct DecisionEngine {
    profile: PersonalityProfile,
    options: DecisionOptions,
    rng: StdRng,
    score_history: BTreeMap<String, VecDeque<f64>>,
    last_ranking: Vec<RankedAction>,
}

impl DecisionEngine {
    /// Create an engine. The random source is seeded from
    /// `options.seed`, or from entropy when unset.
    #[must_use]
    pub fn new(profile: PersonalityProfile, options: DecisionOptions) -> Self {
        let rng = match options.seed {
            Some(seed) => StdRng::seed_from_u64(seed),
            None => StdRng::from_entropy(),
        };
        Self {
            profile,
            options,
            rng,
            score_history: BTreeMap::new(),
            last_ranking: Vec::new(),
        }
    }

    /// Personality the engine scores for.
    #[must_use]
    pub fn profile(&self) -> &PersonalityProfile {
        &self.profile
    }

    /// Active options.
    #[must_use]
    pub fn options(&self) -> &DecisionOptions {
        &self.options
    }

    /// Recent scores for an action id, oldest first.
    #[must_use]
    pub fn score_history(&self, action_id: &str) -> Option<&VecDeque<f64>> {
        self.score_history.get(action_id)
    }

    /// Ranked viable candidates from the last scored selection, best first.
    ///
    /// Empty when the last selection fell back or picked at random.
    #[must_use]
    pub fn last_ranking(&self) -> &[RankedAction] {
        &self.last_ranking
    }

    /// Whether the character can and may attempt `action` now.
    #[must_use]
    pub fn is_viable(&self, action: &GameAction, context: &GameContext) -> bool {
        let c = &context.character;
        c.energy >= action.energy_cost
            && c.energy - action.energy_cost >= self.options.min_energy_threshold
            && c.gold >= action.gold_cost
            && c.gold >= action.min_gold
            && c.level >= action.min_level
            && (self.options.allow_risky || action.risk <= MAX_SAFE_RISK)
            && (!action.is_combat() || c.health >= MIN_COMBAT_HEALTH)
    }

    /// Pick the best candidate for this cycle.
    ///
    /// # Errors
    /// Returns `BotError::NoCandidates` if `candidates` is empty.
    pub fn select_action<'a>(
        &mut self,
        candidates: &'a [GameAction],
        context: &GameContext,
        goals: &GoalManager,
        memory: &BotMemory,
    ) -> Result<&'a GameAction> {
        if candidates.is_empty() {
            return Err(BotError::NoCandidates);
        }
        self.last_ranking.clear();

        let viable: Vec<&'a GameAction> = candidates
            .iter()
            .filter(|a| self.is_viable(a, context))
            .collect();

        if viable.is_empty() {
            let fallback = candidates
                .iter()
                .min_by_key(|a| OrderedFloat(a.energy_cost))
                .ok_or(BotError::NoCandidates)?;
            debug!(action = %fallback.id, "No viable candidate, falling back to cheapest");
            return Ok(fallback);
        }

        if self.profile.archetype == Archetype::Chaos {
            let pick = viable
                .choose(&mut self.rng)
                .copied()
                .ok_or(BotError::NoCandidates)?;
            debug!(action = %pick.id, viable = viable.len(), "Chaos pick");
            return Ok(pick);
        }

        let mut ranked: Vec<(usize, RankedAction)> = viable
            .iter()
            .enumerate()
            .map(|(i, action)| {
                let breakdown = self.breakdown(action, context, goals, memory);
                let ranked = RankedAction {
                    action_id: action.id.clone(),
                    score: breakdown.total(),
                    breakdown,
                };
                (i, ranked)
            })
            .collect();
        ranked.sort_by_key(|(_, r)| Reverse(OrderedFloat(r.score)));

        for (_, r) in &ranked {
            let entry = self.score_history.entry(r.action_id.clone()).or_default();
            entry.push_back(r.score);
            while entry.len() > SCORE_HISTORY_LIMIT {
                entry.pop_front();
            }
            if self.options.debug {
                let b = &r.breakdown;
                debug!(
                    action = %r.action_id,
                    score = r.score,
                    base = b.base,
                    goal = b.goal,
                    efficiency = b.efficiency,
                    risk = b.risk,
                    history = b.history,
                    situational = b.situational,
                    combo = b.combo,
                    personality = b.personality,
                    preference = b.preference,
                    noise = b.noise,
                    "Candidate scored"
                );
            }
        }

        let best = ranked.first().map(|(i, _)| *i).ok_or(BotError::NoCandidates)?;
        self.last_ranking = ranked.into_iter().map(|(_, r)| r).collect();
        let chosen = viable[best];
        debug!(
            action = %chosen.id,
            candidates = candidates.len(),
            viable = viable.len(),
            "Action selected"
        );
        Ok(chosen)
    }

    /// Score one candidate. Draws from the random source only when
    /// `random_variance` is positive.
    fn breakdown(
        &mut self,
        action: &GameAction,
        context: &GameContext,
        goals: &GoalManager,
        memory: &BotMemory,
    ) -> ScoreBreakdown {
        let opts = &self.options;
        let archetype = self.profile.archetype;
        let traits = &self.profile.traits;
        let label = action.label();

        let history = if opts.use_history {
            scoring::history_score(action, memory)
        } else {
            0.0
        };
        let combo = if opts.consider_combos {
            scoring::combo_score(action, context, memory)
        } else {
            0.0
        };

        let mut breakdown = ScoreBreakdown {
            base: scoring::base_score(action, memory, opts.use_history),
            goal: f64::from(opts.goal_weight) * scoring::goal_score(action, goals, context.now()),
            efficiency: f64::from(opts.efficiency_weight)
                * scoring::efficiency_score(action, archetype),
            risk: scoring::risk_score(action.risk, traits.risk_tolerance),
            history,
            situational: scoring::situational_score(action, context, archetype),
            combo,
            personality: f64::from(action_multiplier(&label, traits)),
            preference: f64::from(match_preference(&label, &self.profile).multiplier()),
            noise: 1.0,
        };

        let variance = f64::from(self.options.random_variance);
        if variance > 0.0 {
            breakdown.noise = self.rng.gen_range(1.0 - variance..=1.0 + variance);
        }
        breakdown
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::memory::ActionOutcome;
    use crate::personality::archetype_profile;

    fn engine(archetype: Archetype, variance: f32) -> DecisionEngine {
        DecisionEngine::new(
            archetype_profile(archetype),
            DecisionOptions {
                random_variance: variance,
                seed: Some(7),
                ..DecisionOptions::default()
            },
        )
    }

    fn select<'a>(
        engine: &mut DecisionEngine,
        candidates: &'a [GameAction],
        ctx: &GameContext,
    ) -> Result<&'a GameAction> {
        let goals = GoalManager::new(engine.profile().clone());
        engine.select_action(candidates, ctx, &goals, &BotMemory::new())
    }

    #[test]
    fn empty_candidates_error() {
        let mut e = engine(Archetype::Grinder, 0.0);
        assert!(matches!(
            select(&mut e, &[], &GameContext::default()),
            Err(BotError::NoCandidates)
        ));
    }

    #[test]
    fn unaffordable_actions_are_not_viable() {
        let e = engine(Archetype::Grinder, 0.0);
        let mut ctx = GameContext::default();
        ctx.character.energy = 10.0;
        ctx.character.gold = 5;
        assert!(!e.is_viable(&GameAction::new("a", "work").with_costs(11.0, 0), &ctx));
        assert!(!e.is_viable(&GameAction::new("b", "buy").with_costs(0.0, 6), &ctx));
        assert!(!e.is_viable(&GameAction::new("c", "quest").with_requirements(2, 0), &ctx));
        assert!(!e.is_viable(&GameAction::new("d", "heist").with_risk(0.9), &ctx));
        assert!(e.is_viable(&GameAction::new("e", "work").with_costs(10.0, 5), &ctx));

        ctx.character.health = 20.0;
        assert!(!e.is_viable(&GameAction::new("f", "fight"), &ctx));
    }

    #[test]
    fn energy_reserve_is_respected() {
        let mut e = engine(Archetype::Grinder, 0.0);
        e.options.min_energy_threshold = 20.0;
        let mut ctx = GameContext::default();
        ctx.character.energy = 30.0;
        assert!(!e.is_viable(&GameAction::new("a", "work").with_costs(15.0, 0), &ctx));
        assert!(e.is_viable(&GameAction::new("b", "work").with_costs(10.0, 0), &ctx));
    }

    #[test]
    fn falls_back_to_cheapest_when_nothing_is_viable() {
        let mut e = engine(Archetype::Grinder, 0.0);
        let mut ctx = GameContext::default();
        ctx.character.energy = 1.0;
        let candidates = vec![
            GameAction::new("big", "work").with_costs(50.0, 0),
            GameAction::new("small", "work").with_costs(5.0, 0),
        ];
        let chosen = select(&mut e, &candidates, &ctx).expect("fallback");
        assert_eq!(chosen.id, "small");
        assert!(e.last_ranking().is_empty());
    }

    #[test]
    fn picks_the_better_action() {
        let mut e = engine(Archetype::Economist, 0.0);
        let ctx = GameContext::default();
        let candidates = vec![
            GameAction::new("poor", "work").with_reward(2.0).with_costs(20.0, 0),
            GameAction::new("rich", "work").with_reward(80.0).with_costs(5.0, 0),
        ];
        let chosen = select(&mut e, &candidates, &ctx).expect("chosen");
        assert_eq!(chosen.id, "rich");
        let ranking = e.last_ranking();
        assert_eq!(ranking.len(), 2);
        assert!(ranking[0].score >= ranking[1].score);
        assert_eq!(e.score_history("rich").map(VecDeque::len), Some(1));
    }

    #[test]
    fn zero_variance_is_deterministic() {
        let ctx = GameContext::default();
        let candidates: Vec<GameAction> = (0..6)
            .map(|i| {
                GameAction::new(format!("a{i}"), "work")
                    .with_reward(10.0)
                    .with_costs(5.0, 0)
            })
            .collect();
        let mut e1 = engine(Archetype::Grinder, 0.0);
        let mut e2 = engine(Archetype::Grinder, 0.0);
        for _ in 0..5 {
            let a = select(&mut e1, &candidates, &ctx).expect("a").id.clone();
            let b = select(&mut e2, &candidates, &ctx).expect("b").id.clone();
            assert_eq!(a, b);
            // Ties keep candidate order.
            assert_eq!(a, "a0");
        }
    }

    #[test]
    fn chaos_picks_among_viable() {
        let mut e = engine(Archetype::Chaos, 0.2);
        let mut ctx = GameContext::default();
        ctx.character.energy = 10.0;
        let candidates = vec![
            GameAction::new("too_much", "work").with_costs(50.0, 0),
            GameAction::new("ok1", "work"),
            GameAction::new("ok2", "chat"),
        ];
        for _ in 0..20 {
            let chosen = select(&mut e, &candidates, &ctx).expect("pick");
            assert_ne!(chosen.id, "too_much");
        }
    }

    #[test]
    fn score_history_is_capped() {
        let mut e = engine(Archetype::Grinder, 0.1);
        let ctx = GameContext::default();
        let candidates = vec![GameAction::new("only", "work").with_reward(5.0)];
        for _ in 0..(SCORE_HISTORY_LIMIT + 20) {
            select(&mut e, &candidates, &ctx).expect("chosen");
        }
        assert_eq!(
            e.score_history("only").map(VecDeque::len),
            Some(SCORE_HISTORY_LIMIT)
        );
    }

    #[test]
    fn scores_are_never_negative() {
        let mut e = engine(Archetype::Explorer, 0.0);
        let mut ctx = GameContext::default();
        ctx.recent_actions = vec!["explore".into()];
        let candidates = vec![
            GameAction::new("x", "explore")
                .at_location("nowhere")
                .with_times(vec![crate::types::TimeOfDay::Morning])
                .with_costs(90.0, 0),
        ];
        select(&mut e, &candidates, &ctx).expect("chosen");
        assert!(e.last_ranking().iter().all(|r| r.score >= 0.0));
    }

    fn combo_memory(ctx: &GameContext) -> BotMemory {
        let mut memory = BotMemory::new();
        for _ in 0..5 {
            for kind in ["gather", "craft", "sell"] {
                memory.record_outcome(ActionOutcome::new(&GameAction::new(kind, kind), ctx, true));
            }
        }
        memory
    }

    #[test]
    fn options_switch_combo_and_history_factors() {
        let mut ctx = GameContext::default();
        ctx.recent_actions = vec!["gather".into(), "craft".into()];
        let memory = combo_memory(&ctx);
        let candidates = vec![GameAction::new("sell", "sell").with_reward(5.0)];

        let mut on = engine(Archetype::Economist, 0.0);
        let goals = GoalManager::new(on.profile().clone());
        on.select_action(&candidates, &ctx, &goals, &memory).expect("chosen");
        let b = &on.last_ranking()[0].breakdown;
        assert!((b.combo - 20.0).abs() < 1e-6);
        assert!((b.history - 10.0).abs() < 1e-9);

        let mut off = DecisionEngine::new(
            archetype_profile(Archetype::Economist),
            DecisionOptions {
                random_variance: 0.0,
                consider_combos: false,
                use_history: false,
                ..DecisionOptions::default()
            },
        );
        off.select_action(&candidates, &ctx, &goals, &memory).expect("chosen");
        let b = &off.last_ranking()[0].breakdown;
        assert!(b.combo.abs() < f64::EPSILON);
        assert!(b.history.abs() < f64::EPSILON);
        assert!(off.last_ranking()[0].score < on.last_ranking()[0].score);
    }

    #[test]
    fn history_tips_the_balance() {
        let ctx = GameContext::default();
        let mut memory = BotMemory::new();
        for _ in 0..10 {
            memory.record_outcome(ActionOutcome::new(&GameAction::new("m", "mine"), &ctx, false));
            memory.record_outcome(ActionOutcome::new(&GameAction::new("f", "forage"), &ctx, true));
        }
        let candidates = vec![
            GameAction::new("m", "mine").with_reward(10.0),
            GameAction::new("f", "forage").with_reward(10.0),
        ];
        let mut e = engine(Archetype::Roleplayer, 0.0);
        let goals = GoalManager::new(e.profile().clone());
        let chosen = e.select_action(&candidates, &ctx, &goals, &memory).expect("chosen");
        assert_eq!(chosen.id, "f");
    }
}
