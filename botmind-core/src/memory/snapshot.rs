//! JSON export and import of a [`BotMemory`].
//!
//! The snapshot is opaque to callers: a versioned JSON document holding the
//! outcome window and every derived statistic. Import is all-or-nothing:
//! the document is parsed and validated in full before any state changes.

use std::collections::{BTreeMap, VecDeque};

use serde::{Deserialize, Serialize};
use tracing::{info, warn};

use super::combo::COMBO_LENGTH;
use super::{
    ActionCombo, ActionOutcome, ActionStats, BotMemory, EfficiencyMetrics, Pattern,
    RiskCalibration,
};
use crate::config::MemoryConfig;
use crate::error::{BotError, Result};

/// Current snapshot format version.
pub const SNAPSHOT_VERSION: u32 = 1;

/// Serialized form of a memory.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MemorySnapshot {
    /// Format version.
    pub version: u32,
    /// Settings of the exporting memory.
    pub config: MemoryConfig,
    /// Outcome window, oldest first.
    pub history: Vec<ActionOutcome>,
    /// Per-type success counters.
    pub action_stats: BTreeMap<String, ActionStats>,
    /// Learned patterns by key.
    pub patterns: BTreeMap<String, Pattern>,
    /// Learned combos by key.
    pub combos: BTreeMap<String, ActionCombo>,
    /// Per-type risk calibration.
    pub risk: BTreeMap<String, RiskCalibration>,
    /// Per-type efficiency.
    pub efficiency: BTreeMap<String, EfficiencyMetrics>,
    /// Lifetime outcome count.
    pub total_recorded: u64,
}

impl MemorySnapshot {
    /// Check the snapshot against a receiving memory's capacity.
    ///
    /// # Errors
    /// Returns `BotError::InvalidSnapshot` describing the first problem.
    pub fn validate(&self, capacity: usize) -> Result<()> {
        let invalid = |reason: String| Err(BotError::InvalidSnapshot { reason });

        if self.version != SNAPSHOT_VERSION {
            return invalid(format!("unsupported version {}", self.version));
        }
        if self.history.len() > capacity {
            return invalid(format!(
                "history of {} exceeds capacity {capacity}",
                self.history.len()
            ));
        }
        if self.total_recorded < self.history.len() as u64 {
            return invalid("total_recorded is smaller than the history".to_string());
        }

        let in_unit = |v: f32| (0.0..=1.0).contains(&v);
        if let Some(key) = self
            .patterns
            .iter()
            .find(|(k, p)| **k != p.key)
            .map(|(k, _)| k)
        {
            return invalid(format!("pattern {key} is stored under the wrong key"));
        }
        if let Some(p) = self.patterns.values().find(|p| {
            !in_unit(p.confidence) || !in_unit(p.success_rate) || p.successes > p.occurrences
        }) {
            return invalid(format!("pattern {} has out-of-range statistics", p.key));
        }
        if let Some(key) = self
            .combos
            .iter()
            .find(|(k, c)| {
                c.sequence.len() != COMBO_LENGTH || **k != ActionCombo::key(&c.sequence)
            })
            .map(|(k, _)| k)
        {
            return invalid(format!("combo {key} is not a {COMBO_LENGTH}-step sequence"));
        }
        if let Some(key) = self
            .combos
            .iter()
            .find(|(_, c)| {
                !in_unit(c.confidence) || !in_unit(c.success_rate) || c.successes > c.occurrences
            })
            .map(|(k, _)| k)
        {
            return invalid(format!("combo {key} has out-of-range statistics"));
        }
        if let Some(key) = self
            .action_stats
            .iter()
            .find(|(_, s)| !in_unit(s.success_rate) || s.successes > s.attempts)
            .map(|(k, _)| k)
        {
            return invalid(format!("action stats for {key} are inconsistent"));
        }
        Ok(())
    }
}

impl BotMemory {
    /// Serialize the full memory to a JSON snapshot.
    ///
    /// # Errors
    /// Returns `BotError::Serialization` if encoding fails.
    pub fn export_memory(&self) -> Result<String> {
        let snapshot = MemorySnapshot {
            version: SNAPSHOT_VERSION,
            config: self.config.clone(),
            history: self.history.iter().cloned().collect(),
            action_stats: self.action_stats.clone(),
            patterns: self.patterns.clone(),
            combos: self.combos.clone(),
            risk: self.risk.clone(),
            efficiency: self.efficiency.clone(),
            total_recorded: self.total_recorded,
        };
        serde_json::to_string(&snapshot).map_err(|e| BotError::Serialization(e.to_string()))
    }

    /// Replace this memory's contents with a snapshot.
    ///
    /// Returns `false`, leaving the memory untouched, if the snapshot does
    /// not parse or fails validation. The receiving memory keeps its own
    /// settings.
    pub fn import_memory(&mut self, data: &str) -> bool {
        match self.decode_snapshot(data) {
            Ok(snapshot) => {
                self.history = VecDeque::from(snapshot.history);
                self.action_stats = snapshot.action_stats;
                self.patterns = snapshot.patterns;
                self.combos = snapshot.combos;
                self.risk = snapshot.risk;
                self.efficiency = snapshot.efficiency;
                self.total_recorded = snapshot.total_recorded;
                info!(
                    outcomes = self.history.len(),
                    patterns = self.patterns.len(),
                    "Memory snapshot imported"
                );
                true
            }
            Err(e) => {
                warn!(error = %e, "Rejected memory snapshot");
                false
            }
        }
    }

    fn decode_snapshot(&self, data: &str) -> Result<MemorySnapshot> {
        let snapshot: MemorySnapshot =
            serde_json::from_str(data).map_err(|e| BotError::Serialization(e.to_string()))?;
        snapshot.validate(self.capacity())?;
        Ok(snapshot)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::action::ActionDescriptor;
    use crate::types::GameContext;

    fn trained() -> BotMemory {
        let mut memory = BotMemory::new();
        let mut ctx = GameContext::default();
        ctx.character.health = 30.0;
        for i in 0..8 {
            memory.record_outcome(ActionOutcome::from_descriptor(
                ActionDescriptor::new("fight"),
                &ctx,
                i % 4 == 0,
            ));
        }
        memory
    }

    #[test]
    fn round_trip_restores_statistics() {
        let source = trained();
        let json = source.export_memory().expect("export");

        let mut target = BotMemory::new();
        assert!(target.import_memory(&json));
        assert_eq!(target.len(), 8);
        assert_eq!(target.total_recorded(), 8);
        assert_eq!(target.pattern("combat_health:low"), source.pattern("combat_health:low"));
        assert!((target.success_rate("fight") - 0.25).abs() < f32::EPSILON);
        assert_eq!(target.export_memory().expect("export"), json);
    }

    #[test]
    fn corrupt_snapshot_leaves_memory_untouched() {
        let mut memory = trained();
        let before = memory.export_memory().expect("export");

        assert!(!memory.import_memory("{ not json"));
        assert!(!memory.import_memory("{\"version\": 1}"));
        assert_eq!(memory.export_memory().expect("export"), before);
    }

    #[test]
    fn truncated_combo_is_rejected_on_import() {
        let json = trained().export_memory().expect("export");
        let mut snapshot: MemorySnapshot = serde_json::from_str(&json).expect("parse");
        let combo = snapshot.combos.values_mut().next().expect("fight combo learned");
        combo.sequence.truncate(1);
        let corrupt = serde_json::to_string(&snapshot).expect("encode");

        let mut memory = BotMemory::new();
        assert!(!memory.import_memory(&corrupt));
        assert!(memory.is_empty());

        let mut ctx = GameContext::default();
        ctx.recent_actions = vec!["x".into(), "y".into()];
        assert_eq!(memory.get_recommendation(&ctx), None);
    }

    #[test]
    fn validation_rejects_bad_snapshots() {
        let json = trained().export_memory().expect("export");
        let good: MemorySnapshot = serde_json::from_str(&json).expect("parse");
        assert!(good.validate(1000).is_ok());
        assert!(good.validate(4).is_err(), "over capacity");

        let mut wrong_version = good.clone();
        wrong_version.version = 99;
        assert!(wrong_version.validate(1000).is_err());

        let mut bad_pattern = good.clone();
        if let Some(p) = bad_pattern.patterns.values_mut().next() {
            p.confidence = 1.5;
        }
        assert!(bad_pattern.validate(1000).is_err());

        let mut short_combo = good.clone();
        if let Some(c) = short_combo.combos.values_mut().next() {
            c.sequence.truncate(1);
        }
        assert!(short_combo.validate(1000).is_err(), "combo shorter than three steps");

        let mut moved_pattern = good.clone();
        if let Some(p) = moved_pattern.patterns.remove("combat_health:low") {
            moved_pattern.patterns.insert("combat_health:high".into(), p);
        }
        assert!(moved_pattern.validate(1000).is_err(), "pattern key mismatch");

        let mut bad_total = good;
        bad_total.total_recorded = 2;
        assert!(bad_total.validate(1000).is_err());
    }
}
