//! Plain-text learning report.

use std::fmt::Write as _;

use super::{BotMemory, STRATEGY_FAILURE_THRESHOLD, STRATEGY_MIN_SAMPLES, STRATEGY_WINDOW};

/// Patterns at or above this confidence are listed in the report.
const REPORT_CONFIDENCE: f32 = 0.6;

impl BotMemory {
    /// Human-readable summary of what has been learned so far.
    #[must_use]
    pub fn get_learning_report(&self) -> String {
        let mut out = String::new();
        // Writing to a String cannot fail.
        let _ = self.write_report(&mut out);
        out
    }

    fn write_report(&self, out: &mut String) -> std::fmt::Result {
        writeln!(out, "=== Bot Learning Report ===")?;
        writeln!(
            out,
            "Outcomes: {} retained of {} recorded (cap {})",
            self.history.len(),
            self.total_recorded,
            self.config.max_history_size
        )?;
        if let Some(rate) = self.recent_success_rate(usize::MAX, 1) {
            writeln!(out, "Overall success: {:.1}%", rate * 100.0)?;
        }

        writeln!(out, "\nAction types:")?;
        if self.action_stats.is_empty() {
            writeln!(out, "  (none)")?;
        }
        for (action_type, stats) in &self.action_stats {
            write!(
                out,
                "  - {action_type}: {} attempts, {:.1}% success, avg reward {:.1}",
                stats.attempts,
                stats.success_rate * 100.0,
                stats.average_reward
            )?;
            if let Some(risk) = self.risk.get(action_type) {
                write!(out, ", risk error {:.2}", risk.error)?;
            }
            if let Some(eff) = self.efficiency.get(action_type) {
                write!(out, ", reward/cost {:.2}", eff.reward_per_cost)?;
            }
            writeln!(out)?;
        }

        writeln!(out, "\nConfident patterns:")?;
        let mut any = false;
        for p in self.patterns.values().filter(|p| p.is_confident(REPORT_CONFIDENCE)) {
            any = true;
            writeln!(
                out,
                "  - {}: {:.1}% over {} ({})",
                p.key,
                p.success_rate * 100.0,
                p.occurrences,
                p.trend.as_str()
            )?;
        }
        if !any {
            writeln!(out, "  (none)")?;
        }

        writeln!(out, "\nCombos:")?;
        let mut combos: Vec<_> = self.combos.values().filter(|c| c.occurrences > 1).collect();
        combos.sort_by(|a, b| b.success_rate.total_cmp(&a.success_rate));
        if combos.is_empty() {
            writeln!(out, "  (none)")?;
        }
        for c in combos.iter().take(5) {
            writeln!(
                out,
                "  - {}: {:.1}% over {}, avg reward {:.1}",
                c.sequence.join(" -> "),
                c.success_rate * 100.0,
                c.occurrences,
                c.average_reward
            )?;
        }

        let strategy = match self.recent_success_rate(STRATEGY_WINDOW, STRATEGY_MIN_SAMPLES) {
            None => "not enough data".to_string(),
            Some(rate) if rate < STRATEGY_FAILURE_THRESHOLD => {
                format!("adapt (last {STRATEGY_WINDOW}: {:.1}%)", rate * 100.0)
            }
            Some(rate) => format!("hold (last {STRATEGY_WINDOW}: {:.1}%)", rate * 100.0),
        };
        writeln!(out, "\nStrategy: {strategy}")?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use crate::action::ActionDescriptor;
    use crate::memory::{ActionOutcome, BotMemory};
    use crate::types::GameContext;

    #[test]
    fn empty_report() {
        let report = BotMemory::new().get_learning_report();
        assert!(report.contains("Bot Learning Report"));
        assert!(report.contains("not enough data"));
    }

    #[test]
    fn report_lists_types_and_patterns() {
        let mut memory = BotMemory::new();
        let ctx = GameContext::default();
        for i in 0..12 {
            memory.record_outcome(
                ActionOutcome::from_descriptor(ActionDescriptor::new("fish"), &ctx, i % 3 != 0)
                    .with_reward(5.0),
            );
        }
        let report = memory.get_learning_report();
        assert!(report.contains("fish: 12 attempts"));
        assert!(report.contains("energy:high"));
        assert!(report.contains("fish -> fish -> fish"));
        assert!(report.contains("Strategy: hold"));
    }
}
