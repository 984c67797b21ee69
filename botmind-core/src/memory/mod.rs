//! Outcome memory and the statistics learned from it.
//!
//! [`BotMemory`] keeps a bounded FIFO of [`ActionOutcome`]s. Every recorded
//! outcome triggers a recompute of the statistics it touches, always from
//! the full window so incremental and batch updates agree:
//!
//! ```text
//! record_outcome
//!   ├─ push + evict oldest beyond capacity
//!   ├─ action-type success rate
//!   ├─ situational patterns   (health, energy, location, gear, level)
//!   ├─ combo ending here      (last three action types)
//!   ├─ time-of-day pattern
//!   ├─ risk calibration
//!   └─ efficiency metrics
//! ```

pub mod combo;
pub mod outcome;
pub mod pattern;
pub mod recommendation;
pub mod report;
pub mod snapshot;
pub mod stats;

pub use combo::ActionCombo;
pub use outcome::ActionOutcome;
pub use pattern::{Pattern, PatternDimension, Trend};
pub use recommendation::Recommendation;
pub use snapshot::MemorySnapshot;
pub use stats::{ActionStats, EfficiencyMetrics, RiskCalibration};

use std::collections::{BTreeMap, VecDeque};

use tracing::{debug, info};

use crate::config::MemoryConfig;
use crate::types::GameContext;

/// Success rate assumed for action types never seen.
pub const NEUTRAL_SUCCESS_RATE: f32 = 0.5;

/// Outcomes considered by [`BotMemory::should_adapt_strategy`].
pub const STRATEGY_WINDOW: usize = 20;
/// Fewest outcomes before strategy adaptation is considered.
pub const STRATEGY_MIN_SAMPLES: usize = 10;
/// Success rate under which the strategy should change.
pub const STRATEGY_FAILURE_THRESHOLD: f32 = 0.4;

/// Confidence a pattern needs before it drives a recommendation.
const RECOMMEND_CONFIDENCE: f32 = 0.6;

/// Bounded outcome history plus everything learned from it.
///
/// Each [`record_outcome`](Self::record_outcome) rescans the window only for
/// the action type, pattern keys and combo the new outcome touches. Entries
/// for keys no recent outcome touches keep their last values, even after the
/// outcomes behind them are evicted, so an old `combat_health:low` pattern
/// can keep driving [`get_recommendation`](Self::get_recommendation) until
/// another low-health combat outcome refreshes it.
#[derive(Debug, Clone, Default)]
pub struct BotMemory {
    config: MemoryConfig,
    history: VecDeque<ActionOutcome>,
    action_stats: BTreeMap<String, ActionStats>,
    patterns: BTreeMap<String, Pattern>,
    combos: BTreeMap<String, ActionCombo>,
    risk: BTreeMap<String, RiskCalibration>,
    efficiency: BTreeMap<String, EfficiencyMetrics>,
    total_recorded: u64,
}

impl BotMemory {
    /// Create an empty memory with default settings.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Create an empty memory with explicit settings.
    #[must_use]
    pub fn with_config(config: MemoryConfig) -> Self {
        Self {
            config,
            ..Self::default()
        }
    }

    /// Active settings.
    #[must_use]
    pub fn config(&self) -> &MemoryConfig {
        &self.config
    }

    fn capacity(&self) -> usize {
        self.config.max_history_size.max(1)
    }

    // -----------------------------------------------------------------------
    // Recording
    // -----------------------------------------------------------------------

    /// Append an outcome and refresh the statistics it touches.
    pub fn record_outcome(&mut self, outcome: ActionOutcome) {
        let action_type = outcome.action_type().to_string();
        let situational: Vec<(PatternDimension, String)> = PatternDimension::SITUATIONAL
            .iter()
            .filter_map(|d| d.key_for(&outcome).map(|k| (*d, k)))
            .collect();
        let temporal = PatternDimension::TimeOfDay.key_for(&outcome);

        self.history.push_back(outcome);
        let mut evicted = 0usize;
        while self.history.len() > self.capacity() {
            self.history.pop_front();
            evicted += 1;
        }
        self.total_recorded += 1;

        self.refresh_action_stats(&action_type);
        for (dimension, key) in situational {
            self.refresh_pattern(dimension, key);
        }
        self.refresh_combo();
        if let Some(key) = temporal {
            self.refresh_pattern(PatternDimension::TimeOfDay, key);
        }
        self.refresh_risk(&action_type);
        self.refresh_efficiency(&action_type);

        debug!(
            action_type = %action_type,
            history = self.history.len(),
            evicted,
            patterns = self.patterns.len(),
            "Outcome recorded"
        );
    }

    fn refresh_action_stats(&mut self, action_type: &str) {
        match ActionStats::scan(&self.history, action_type) {
            Some(stats) => self.action_stats.insert(action_type.to_string(), stats),
            None => self.action_stats.remove(action_type),
        };
    }

    fn refresh_pattern(&mut self, dimension: PatternDimension, key: String) {
        let matches: Vec<&ActionOutcome> = self
            .history
            .iter()
            .filter(|o| dimension.key_for(o).as_deref() == Some(key.as_str()))
            .collect();
        let min = self.config.min_occurrences_for_confidence;
        match Pattern::from_matches(dimension, key.clone(), &matches, min) {
            Some(pattern) => {
                if pattern.trend != Trend::Stable {
                    debug!(key = %pattern.key, trend = pattern.trend.as_str(), "Pattern trend");
                }
                self.patterns.insert(key, pattern);
            }
            None => {
                self.patterns.remove(&key);
            }
        }
    }

    fn refresh_combo(&mut self) {
        let len = self.history.len();
        if len < combo::COMBO_LENGTH {
            return;
        }
        let sequence: Vec<String> = self
            .history
            .range(len - combo::COMBO_LENGTH..)
            .map(|o| o.action_type().to_string())
            .collect();
        let key = ActionCombo::key(&sequence);
        let min = self.config.min_occurrences_for_confidence;
        if let Some(combo) = ActionCombo::scan(&sequence, &self.history, min) {
            self.combos.insert(key, combo);
        }
    }

    fn refresh_risk(&mut self, action_type: &str) {
        match RiskCalibration::scan(&self.history, action_type) {
            Some(risk) => self.risk.insert(action_type.to_string(), risk),
            None => self.risk.remove(action_type),
        };
    }

    fn refresh_efficiency(&mut self, action_type: &str) {
        match EfficiencyMetrics::scan(&self.history, action_type) {
            Some(eff) => self.efficiency.insert(action_type.to_string(), eff),
            None => self.efficiency.remove(action_type),
        };
    }

    // -----------------------------------------------------------------------
    // Queries
    // -----------------------------------------------------------------------

    /// Retained outcomes, oldest first.
    pub fn history(&self) -> impl Iterator<Item = &ActionOutcome> {
        self.history.iter()
    }

    /// Number of retained outcomes.
    #[must_use]
    pub fn len(&self) -> usize {
        self.history.len()
    }

    /// Whether nothing has been retained.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.history.is_empty()
    }

    /// Outcomes recorded over the memory's lifetime, including evicted ones.
    #[must_use]
    pub fn total_recorded(&self) -> u64 {
        self.total_recorded
    }

    /// Success rate of an action type, [`NEUTRAL_SUCCESS_RATE`] when unseen.
    #[must_use]
    pub fn success_rate(&self, action_type: &str) -> f32 {
        self.action_stats
            .get(action_type)
            .map_or(NEUTRAL_SUCCESS_RATE, |s| s.success_rate)
    }

    /// Counters for an action type.
    #[must_use]
    pub fn action_stats(&self, action_type: &str) -> Option<&ActionStats> {
        self.action_stats.get(action_type)
    }

    /// A pattern by key.
    #[must_use]
    pub fn pattern(&self, key: &str) -> Option<&Pattern> {
        self.patterns.get(key)
    }

    /// Every learned pattern, in key order.
    pub fn patterns(&self) -> impl Iterator<Item = &Pattern> {
        self.patterns.values()
    }

    /// Every learned combo, in key order.
    pub fn combos(&self) -> impl Iterator<Item = &ActionCombo> {
        self.combos.values()
    }

    /// Risk calibration for an action type.
    #[must_use]
    pub fn risk_calibration(&self, action_type: &str) -> Option<&RiskCalibration> {
        self.risk.get(action_type)
    }

    /// Efficiency metrics for an action type.
    #[must_use]
    pub fn efficiency(&self, action_type: &str) -> Option<&EfficiencyMetrics> {
        self.efficiency.get(action_type)
    }

    /// The strongest combo that `action_type` would finish after `tail`.
    ///
    /// Only combos above the given confidence and success rate qualify.
    #[must_use]
    pub fn completing_combo(
        &self,
        tail: &[String],
        action_type: &str,
        min_confidence: f32,
        min_success: f32,
    ) -> Option<&ActionCombo> {
        self.strong_combos(tail, min_confidence, min_success)
            .filter(|c| c.finisher() == action_type)
            .max_by(|a, b| a.success_rate.total_cmp(&b.success_rate))
    }

    fn strong_combos<'a>(
        &'a self,
        tail: &[String],
        min_confidence: f32,
        min_success: f32,
    ) -> impl Iterator<Item = &'a ActionCombo> {
        self.combos.values().filter(move |c| {
            c.confidence > min_confidence && c.success_rate > min_success && c.continues(tail)
        })
    }

    // -----------------------------------------------------------------------
    // Advice
    // -----------------------------------------------------------------------

    /// First matching piece of advice for the current situation.
    #[must_use]
    pub fn get_recommendation(&self, context: &GameContext) -> Option<Recommendation> {
        let character = &context.character;

        if character.health < 40.0
            && self
                .pattern(&pattern::combat_health_key(character.health))
                .is_some_and(|p| p.success_rate < 0.3 && p.is_confident(RECOMMEND_CONFIDENCE))
        {
            return Some(Recommendation::AvoidCombatLowHealth);
        }

        if character.energy < 25.0
            && self
                .pattern(&pattern::energy_key(character.energy))
                .is_some_and(|p| p.success_rate < 0.3 && p.is_confident(RECOMMEND_CONFIDENCE))
        {
            return Some(Recommendation::RestLowEnergy);
        }

        let time = context.time_of_day();
        let prefix = pattern::time_prefix(time);
        let best_time = self
            .patterns
            .range(prefix.clone()..)
            .take_while(|(k, _)| k.starts_with(&prefix))
            .map(|(_, p)| p)
            .filter(|p| p.success_rate > 0.7 && p.occurrences >= 5)
            .max_by(|a, b| {
                a.success_rate
                    .total_cmp(&b.success_rate)
                    .then(a.occurrences.cmp(&b.occurrences))
            });
        if let Some(p) = best_time {
            let action_type = p.key[prefix.len()..].to_string();
            return Some(Recommendation::Focus { action_type, time });
        }

        let tail = context.recent_tail(combo::COMBO_LENGTH - 1);
        if let Some(c) = self
            .strong_combos(tail, 0.6, 0.7)
            .max_by(|a, b| a.success_rate.total_cmp(&b.success_rate))
        {
            return Some(Recommendation::CompleteCombo {
                sequence: c.sequence.clone(),
            });
        }

        if !character.equipped {
            let with = self.pattern(&pattern::equipment_key(true));
            let without = self.pattern(&pattern::equipment_key(false));
            if let (Some(with), Some(without)) = (with, without) {
                if with.is_confident(RECOMMEND_CONFIDENCE)
                    && without.is_confident(RECOMMEND_CONFIDENCE)
                    && with.success_rate - without.success_rate > 0.2
                {
                    return Some(Recommendation::EquipGearBeforeCombat);
                }
            }
        }

        None
    }

    /// Whether recent results are poor enough to change approach.
    #[must_use]
    pub fn should_adapt_strategy(&self) -> bool {
        let Some(rate) = self.recent_success_rate(STRATEGY_WINDOW, STRATEGY_MIN_SAMPLES) else {
            return false;
        };
        let adapt = rate < STRATEGY_FAILURE_THRESHOLD;
        if adapt {
            info!(recent_success = rate, "Recent outcomes call for a strategy change");
        }
        adapt
    }

    /// Success rate of the newest `window` outcomes, if at least `min` exist.
    #[must_use]
    #[allow(clippy::cast_precision_loss)]
    pub fn recent_success_rate(&self, window: usize, min: usize) -> Option<f32> {
        if self.history.len() < min {
            return None;
        }
        let n = self.history.len().min(window);
        if n == 0 {
            return None;
        }
        let successes = self.history.iter().rev().take(n).filter(|o| o.success).count();
        Some(successes as f32 / n as f32)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::action::ActionDescriptor;
    use chrono::{Duration, TimeZone, Utc};

    fn ctx_at_hour(hour: u32) -> GameContext {
        GameContext::at(Utc.with_ymd_and_hms(2024, 5, 1, hour, 0, 0).single().expect("valid"))
    }

    fn record(memory: &mut BotMemory, ctx: &GameContext, action_type: &str, success: bool) {
        memory.record_outcome(ActionOutcome::from_descriptor(
            ActionDescriptor::new(action_type),
            ctx,
            success,
        ));
    }

    #[test]
    fn untouched_pattern_outlives_its_outcomes() {
        let mut memory = BotMemory::with_config(MemoryConfig {
            max_history_size: 5,
            ..MemoryConfig::default()
        });
        let mut ctx = GameContext::default();
        ctx.character.health = 20.0;
        for _ in 0..5 {
            record(&mut memory, &ctx, "fight", false);
        }
        ctx.character.health = 90.0;
        for _ in 0..5 {
            record(&mut memory, &ctx, "chat", true);
        }

        assert!(memory.history().all(|o| o.action_type() == "chat"));
        let low = memory.pattern("combat_health:low").expect("kept");
        assert_eq!(low.occurrences, 5);

        ctx.character.health = 20.0;
        assert_eq!(
            memory.get_recommendation(&ctx),
            Some(Recommendation::AvoidCombatLowHealth)
        );
    }

    #[test]
    fn unseen_type_is_neutral() {
        let memory = BotMemory::new();
        assert!((memory.success_rate("fight") - 0.5).abs() < f32::EPSILON);
        assert!(memory.get_recommendation(&GameContext::default()).is_none());
        assert!(!memory.should_adapt_strategy());
    }

    #[test]
    fn history_is_capped_and_evicts_oldest() {
        let mut memory = BotMemory::with_config(MemoryConfig {
            max_history_size: 3,
            ..MemoryConfig::default()
        });
        let ctx = GameContext::default();
        for t in ["a", "b", "c", "d", "e"] {
            record(&mut memory, &ctx, t, true);
        }
        let kept: Vec<&str> = memory.history().map(ActionOutcome::action_type).collect();
        assert_eq!(kept, ["c", "d", "e"]);
        assert_eq!(memory.total_recorded(), 5);
    }

    #[test]
    fn success_rate_tracks_window() {
        let mut memory = BotMemory::new();
        let ctx = GameContext::default();
        for ok in [true, true, false, true] {
            record(&mut memory, &ctx, "fish", ok);
        }
        assert!((memory.success_rate("fish") - 0.75).abs() < f32::EPSILON);
        assert_eq!(memory.action_stats("fish").map(|s| s.attempts), Some(4));
    }

    #[test]
    fn low_health_combat_advice() {
        let mut memory = BotMemory::new();
        let mut ctx = GameContext::default();
        ctx.character.health = 20.0;
        for i in 0..10 {
            record(&mut memory, &ctx, "fight", i < 2);
        }
        assert_eq!(
            memory.get_recommendation(&ctx),
            Some(Recommendation::AvoidCombatLowHealth)
        );

        ctx.character.health = 90.0;
        assert_ne!(
            memory.get_recommendation(&ctx),
            Some(Recommendation::AvoidCombatLowHealth)
        );
    }

    #[test]
    fn low_energy_advice() {
        let mut memory = BotMemory::new();
        let mut ctx = GameContext::default();
        ctx.character.energy = 10.0;
        for _ in 0..6 {
            record(&mut memory, &ctx, "mine", false);
        }
        assert_eq!(memory.get_recommendation(&ctx), Some(Recommendation::RestLowEnergy));
    }

    #[test]
    fn time_focus_advice() {
        let mut memory = BotMemory::new();
        let morning = ctx_at_hour(8);
        for _ in 0..6 {
            record(&mut memory, &morning, "fish", true);
        }
        assert_eq!(
            memory.get_recommendation(&morning).map(|r| r.to_string()),
            Some("focus_fish_morning".to_string())
        );
        assert!(memory.get_recommendation(&ctx_at_hour(23)).is_none());
    }

    #[test]
    fn combo_advice_follows_the_tail() {
        let mut memory = BotMemory::new();
        let ctx = ctx_at_hour(23);
        for _ in 0..6 {
            record(&mut memory, &ctx, "scout", true);
            record(&mut memory, &ctx, "ambush", true);
            record(&mut memory, &ctx, "loot", true);
        }
        // 6/9 per type keeps the time-of-day rule quiet.
        for t in ["scout", "ambush", "loot"] {
            for _ in 0..3 {
                record(&mut memory, &ctx, t, false);
            }
        }
        let mut probe = ctx.clone();
        probe.recent_actions = vec!["scout".into(), "ambush".into()];
        assert_eq!(
            memory.get_recommendation(&probe),
            Some(Recommendation::CompleteCombo {
                sequence: vec!["scout".into(), "ambush".into(), "loot".into()]
            })
        );
        let combo = memory
            .completing_combo(&probe.recent_actions, "loot", 0.6, 0.7)
            .expect("strong combo");
        assert_eq!(combo.occurrences, 6);
    }

    #[test]
    fn gear_advice() {
        let mut memory = BotMemory::new();
        let mut ctx = ctx_at_hour(23);
        ctx.character.equipped = true;
        for i in 0..10 {
            record(&mut memory, &ctx, "fight", i < 9);
        }
        ctx.character.equipped = false;
        for i in 0..10 {
            record(&mut memory, &ctx, "fight", i < 3);
        }
        // fight at night: 12/20 = 60%, below the focus threshold
        assert_eq!(
            memory.get_recommendation(&ctx),
            Some(Recommendation::EquipGearBeforeCombat)
        );
    }

    #[test]
    fn adapt_after_losing_streak() {
        let mut memory = BotMemory::new();
        let ctx = GameContext::default();
        for _ in 0..9 {
            record(&mut memory, &ctx, "duel", false);
        }
        assert!(!memory.should_adapt_strategy(), "needs ten samples");
        record(&mut memory, &ctx, "duel", false);
        assert!(memory.should_adapt_strategy());

        for _ in 0..20 {
            record(&mut memory, &ctx, "duel", true);
        }
        assert!(!memory.should_adapt_strategy());
    }

    #[test]
    fn pattern_confidence_grows_with_samples() {
        let mut memory = BotMemory::new();
        let mut ctx = GameContext::default();
        let mut last = 0.0;
        for i in 0..8 {
            ctx.world.now += Duration::minutes(i);
            record(&mut memory, &ctx, "trade", true);
            let c = memory.pattern("energy:high").map_or(0.0, |p| p.confidence);
            assert!(c >= last);
            assert!((0.0..=1.0).contains(&c));
            last = c;
        }
        assert!((last - 1.0).abs() < f32::EPSILON);
    }
}
