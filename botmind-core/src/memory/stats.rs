//! Per-action-type aggregates: success rate, risk calibration, efficiency.
//!
//! Each is recomputed from the full history window for the action type
//! that was just recorded.

use std::collections::VecDeque;

use serde::{Deserialize, Serialize};

use super::outcome::ActionOutcome;

/// Success counters for one action type.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ActionStats {
    /// Outcomes in the window.
    pub attempts: u32,
    /// Successful outcomes in the window.
    pub successes: u32,
    /// `successes / attempts`.
    pub success_rate: f32,
    /// Mean reward per attempt.
    pub average_reward: f32,
}

/// How far the declared risk of an action type is from reality.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct RiskCalibration {
    /// Mean risk the actions declared.
    pub estimated_risk: f32,
    /// Observed failure rate.
    pub actual_failure_rate: f32,
    /// `|estimated − actual|`.
    pub error: f32,
    /// Outcomes behind the estimate.
    pub samples: u32,
}

/// Return on investment for one action type.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct EfficiencyMetrics {
    /// Total reward / total cost (total reward when nothing was spent).
    pub reward_per_cost: f32,
    /// Total reward / total seconds (0 when no duration was reported).
    pub reward_per_second: f32,
    /// Success rate × mean reward.
    pub success_weighted_score: f32,
}

fn matching<'a>(
    history: &'a VecDeque<ActionOutcome>,
    action_type: &'a str,
) -> impl Iterator<Item = &'a ActionOutcome> + Clone + 'a {
    history.iter().filter(move |o| o.action_type() == action_type)
}

impl ActionStats {
    /// Recompute from the window. `None` when the type has no outcomes.
    #[must_use]
    #[allow(clippy::cast_precision_loss)]
    pub fn scan(history: &VecDeque<ActionOutcome>, action_type: &str) -> Option<Self> {
        let (mut attempts, mut successes, mut reward) = (0u32, 0u32, 0.0f32);
        for outcome in matching(history, action_type) {
            attempts += 1;
            successes += u32::from(outcome.success);
            reward += outcome.reward;
        }
        (attempts > 0).then(|| Self {
            attempts,
            successes,
            success_rate: successes as f32 / attempts as f32,
            average_reward: reward / attempts as f32,
        })
    }
}

impl RiskCalibration {
    /// Recompute from the window. `None` when the type has no outcomes.
    #[must_use]
    #[allow(clippy::cast_precision_loss)]
    pub fn scan(history: &VecDeque<ActionOutcome>, action_type: &str) -> Option<Self> {
        let (mut samples, mut failures, mut risk) = (0u32, 0u32, 0.0f32);
        for outcome in matching(history, action_type) {
            samples += 1;
            failures += u32::from(!outcome.success);
            risk += outcome.action.risk;
        }
        if samples == 0 {
            return None;
        }
        let estimated_risk = risk / samples as f32;
        let actual_failure_rate = failures as f32 / samples as f32;
        Some(Self {
            estimated_risk,
            actual_failure_rate,
            error: (estimated_risk - actual_failure_rate).abs(),
            samples,
        })
    }
}

impl EfficiencyMetrics {
    /// Recompute from the window. `None` when the type has no outcomes.
    #[must_use]
    #[allow(clippy::cast_precision_loss)]
    pub fn scan(history: &VecDeque<ActionOutcome>, action_type: &str) -> Option<Self> {
        let (mut n, mut successes) = (0u32, 0u32);
        let (mut reward, mut cost, mut secs) = (0.0f32, 0.0f32, 0.0f32);
        for outcome in matching(history, action_type) {
            n += 1;
            successes += u32::from(outcome.success);
            reward += outcome.reward;
            cost += outcome.cost;
            secs += outcome.duration_secs;
        }
        if n == 0 {
            return None;
        }
        let success_rate = successes as f32 / n as f32;
        Some(Self {
            reward_per_cost: if cost > 0.0 { reward / cost } else { reward },
            reward_per_second: if secs > 0.0 { reward / secs } else { 0.0 },
            success_weighted_score: success_rate * (reward / n as f32),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::action::ActionDescriptor;
    use crate::types::GameContext;

    fn history() -> VecDeque<ActionOutcome> {
        let ctx = GameContext::default();
        let mut descriptor = ActionDescriptor::new("rob");
        descriptor.risk = 0.2;
        let mut h = VecDeque::new();
        for success in [true, false, false, true] {
            h.push_back(
                ActionOutcome::from_descriptor(descriptor.clone(), &ctx, success)
                    .with_reward(if success { 20.0 } else { 0.0 })
                    .with_cost(10.0)
                    .with_duration(4.0),
            );
        }
        h.push_back(ActionOutcome::from_descriptor(ActionDescriptor::new("chat"), &ctx, true));
        h
    }

    #[test]
    fn stats_only_count_the_type() {
        let h = history();
        let stats = ActionStats::scan(&h, "rob").expect("seen");
        assert_eq!(stats.attempts, 4);
        assert_eq!(stats.successes, 2);
        assert!((stats.average_reward - 10.0).abs() < f32::EPSILON);
        assert!(ActionStats::scan(&h, "fish").is_none());
    }

    #[test]
    fn risk_is_underestimated() {
        let risk = RiskCalibration::scan(&history(), "rob").expect("seen");
        assert!((risk.actual_failure_rate - 0.5).abs() < f32::EPSILON);
        assert!((risk.error - 0.3).abs() < 1e-6);
    }

    #[test]
    fn efficiency_ratios() {
        let eff = EfficiencyMetrics::scan(&history(), "rob").expect("seen");
        assert!((eff.reward_per_cost - 1.0).abs() < f32::EPSILON);
        assert!((eff.reward_per_second - 2.5).abs() < f32::EPSILON);
        assert!((eff.success_weighted_score - 5.0).abs() < f32::EPSILON);

        let chat = EfficiencyMetrics::scan(&history(), "chat").expect("seen");
        assert!(chat.reward_per_cost.abs() < f32::EPSILON);
        assert!(chat.reward_per_second.abs() < f32::EPSILON);
    }
}
