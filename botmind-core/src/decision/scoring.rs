//! Per-factor scoring functions for action selection.
//!
//! Raw = Base + w_g·Goal + w_e·Efficiency + Risk + History + Situational + Combo
//!
//! Where:
//!   Base         = 50 + 50 · EV / max(1, reward + energy + gold)
//!   EV           = reward · P(success) − (energy + gold) · P(failure)
//!   Goal         = Σ 50 · priority/10 · (1 − progress) · urgency
//!   Efficiency   = reward / max(1, energy + gold/10)      (archetype-scaled)
//!   Risk         = −30 · (risk − tolerance) above tolerance, +15 · risk for thrill-seekers
//!   History      = +10 / −15 for strong / weak learned success
//!   Situational  = time window, location, cooldown, events, repetition
//!   Combo        = 20 · confidence when the action finishes a strong combo
//!
//! The raw sum is then multiplied by the personality and preference
//! multipliers and a random factor, and clamped at zero.

use chrono::{DateTime, Duration, Utc};

use crate::action::GameAction;
use crate::goals::GoalManager;
use crate::memory::BotMemory;
use crate::personality::Archetype;
use crate::types::GameContext;

/// Combos must beat this confidence to earn a bonus.
pub const COMBO_MIN_CONFIDENCE: f32 = 0.6;
/// Combos must beat this success rate to earn a bonus.
pub const COMBO_MIN_SUCCESS: f32 = 0.7;

/// Expected-value score in `[0, 100]`.
///
/// The action's own success estimate is blended half-and-half with the
/// learned rate once the type has enough samples.
#[must_use]
pub fn base_score(action: &GameAction, memory: &BotMemory, use_history: bool) -> f64 {
    let mut p = f64::from(action.success_probability());
    if use_history {
        let min = memory.config().min_occurrences_for_confidence;
        if let Some(stats) = memory.action_stats(&action.action_type) {
            if stats.attempts >= min {
                p = 0.5 * p + 0.5 * f64::from(stats.success_rate);
            }
        }
    }

    let reward = f64::from(action.expected_reward);
    let energy = f64::from(action.energy_cost);
    #[allow(clippy::cast_precision_loss)]
    let gold = action.gold_cost as f64;

    let ev = p * reward - (energy + gold) * (1.0 - p);
    let scale = (reward + energy + gold).max(1.0);
    50.0 + 50.0 * (ev / scale).clamp(-1.0, 1.0)
}

/// Urgency multiplier for a goal with the given time left.
#[must_use]
pub fn urgency(remaining: Option<Duration>) -> f64 {
    match remaining {
        None => 1.0,
        Some(r) if r < Duration::zero() => 3.0,
        Some(r) if r < Duration::hours(1) => 2.5,
        Some(r) if r < Duration::hours(6) => 2.0,
        Some(r) if r < Duration::days(1) => 1.5,
        Some(_) => 1.0,
    }
}

/// Summed alignment with every active goal the action advances.
#[must_use]
pub fn goal_score(action: &GameAction, goals: &GoalManager, now: DateTime<Utc>) -> f64 {
    let label = action.label();
    goals
        .contributing_goals(&label)
        .map(|g| {
            50.0 * f64::from(g.priority()) / 10.0
                * (1.0 - f64::from(g.progress()))
                * urgency(g.time_remaining(now))
        })
        .sum()
}

/// Reward per unit of spend, scaled by archetype.
#[must_use]
pub fn efficiency_score(action: &GameAction, archetype: Archetype) -> f64 {
    #[allow(clippy::cast_precision_loss)]
    let spend = f64::from(action.energy_cost) + action.gold_cost as f64 / 10.0;
    let raw = f64::from(action.expected_reward) / spend.max(1.0);
    match archetype {
        Archetype::Grinder => raw * 1.5,
        Archetype::Explorer => raw * 0.5,
        _ => raw,
    }
}

/// Penalty above the risk tolerance; bonus for risky actions when the
/// personality enjoys risk.
#[must_use]
pub fn risk_score(risk: f32, tolerance: f32) -> f64 {
    let (risk, tolerance) = (f64::from(risk), f64::from(tolerance));
    let mut score = 0.0;
    if risk > tolerance {
        score -= 30.0 * (risk - tolerance);
    }
    if risk > 0.3 && tolerance > 0.7 {
        score += 15.0 * risk;
    }
    score
}

/// Bonus or penalty from the learned success rate of the action type.
#[must_use]
pub fn history_score(action: &GameAction, memory: &BotMemory) -> f64 {
    let rate = memory.success_rate(&action.action_type);
    if rate > 0.7 {
        10.0
    } else if rate < 0.3 {
        -15.0
    } else {
        0.0
    }
}

/// Adjustments for when and where the action would run.
#[must_use]
pub fn situational_score(action: &GameAction, context: &GameContext, archetype: Archetype) -> f64 {
    let character = &context.character;
    let mut score = 0.0;

    if !action.available_times.is_empty()
        && !action.available_times.contains(&context.time_of_day())
    {
        score -= 50.0;
    }

    if action
        .location
        .as_deref()
        .is_some_and(|l| !l.eq_ignore_ascii_case(&character.location))
    {
        score -= 10.0;
    }

    if character
        .cooldowns
        .get(action.cooldown_key())
        .is_some_and(|until| *until > context.now())
    {
        score -= 100.0;
    }

    if event_matches(action, &context.world.active_events) {
        score += 15.0;
    }

    if context.recent_actions.last() == Some(&action.action_type) {
        match archetype {
            Archetype::Explorer => score -= 25.0,
            Archetype::Grinder => score += 15.0,
            _ => {}
        }
    }

    score
}

/// Whether any active event names a word of the action's label.
fn event_matches(action: &GameAction, events: &[String]) -> bool {
    if events.is_empty() {
        return false;
    }
    let label = action.label();
    events.iter().any(|event| {
        event
            .to_lowercase()
            .split(|c: char| !c.is_alphanumeric())
            .filter(|w| w.len() >= 3)
            .any(|w| label.contains(w))
    })
}

/// Bonus when the action would finish a strong learned combo.
#[must_use]
pub fn combo_score(action: &GameAction, context: &GameContext, memory: &BotMemory) -> f64 {
    let tail = context.recent_tail(2);
    memory
        .completing_combo(tail, &action.action_type, COMBO_MIN_CONFIDENCE, COMBO_MIN_SUCCESS)
        .map_or(0.0, |c| 20.0 * f64::from(c.confidence))
}
