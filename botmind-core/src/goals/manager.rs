//! Per-agent goal bookkeeping.
//!
//! The manager exclusively owns its active and completed goal lists. Goals
//! are never shared across managers; follow-ups are moved in by value.

use std::cmp::Reverse;

use chrono::Duration;
use rand::Rng;
use tracing::{debug, info, warn};

use super::templates::{emergent_goals, goal_keywords, pick_recommended, template_for};
use super::{Goal, GoalOrigin, GoalType};
use crate::config::GoalConfig;
use crate::personality::PersonalityProfile;
use crate::types::{GameContext, GoalId};

/// What changed during one [`GoalManager::update_progress`] call.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct UpdateReport {
    /// Goals that reached full progress.
    pub completed: Vec<GoalId>,
    /// Goals dropped for missing their deadline.
    pub failed: Vec<GoalId>,
    /// Follow-up and emergent goals added.
    pub spawned: usize,
}

/// Summary counters for dashboards and logs.
#[derive(Debug, Clone, PartialEq)]
pub struct GoalStats {
    /// Active goal count.
    pub active: usize,
    /// Completed goal count.
    pub completed: usize,
    /// Goals dropped on deadline expiry.
    pub failed: usize,
    /// Mean progress over active goals (0 when none).
    pub average_progress: f32,
    /// Kind of the current top goal.
    pub top_goal: Option<GoalType>,
}

/// Prioritized goal set for one agent.
#[derive(Debug, Clone)]
pub struct GoalManager {
    profile: PersonalityProfile,
    config: GoalConfig,
    active: Vec<Goal>,
    completed: Vec<Goal>,
    failed: usize,
}

impl GoalManager {
    /// Create an empty manager for a personality.
    #[must_use]
    pub fn new(profile: PersonalityProfile) -> Self {
        Self::with_config(profile, GoalConfig::default())
    }

    /// Create an empty manager with explicit tuning.
    #[must_use]
    pub fn with_config(profile: PersonalityProfile, config: GoalConfig) -> Self {
        Self {
            profile,
            config,
            active: Vec::new(),
            completed: Vec::new(),
            failed: 0,
        }
    }

    /// Seed the archetype's starter goals from the current context.
    pub fn initialize_goals(&mut self, context: &GameContext) {
        if !self.config.starter_goals {
            return;
        }
        for goal_type in self.profile.archetype.starter_goals() {
            let goal = template_for(*goal_type).build(&self.profile, context, GoalOrigin::Starter);
            self.add_goal(goal);
        }
        debug!(
            archetype = %self.profile.archetype,
            goals = self.active.len(),
            "Starter goals initialized"
        );
    }

    /// Personality this manager plans for.
    #[must_use]
    pub fn profile(&self) -> &PersonalityProfile {
        &self.profile
    }

    /// Insert a goal and re-sort by descending priority (stable).
    pub fn add_goal(&mut self, goal: Goal) {
        self.active.push(goal);
        self.sort_active();
        if self.active.len() > self.config.active_goal_warning {
            warn!(
                active = self.active.len(),
                limit = self.config.active_goal_warning,
                "Active goal set is growing faster than goals complete"
            );
        }
    }

    fn sort_active(&mut self) {
        self.active.sort_by_key(|g| Reverse(g.priority()));
    }

    /// Recompute progress for every active goal, complete or fail goals as
    /// needed, and adjust priorities.
    pub fn update_progress(&mut self, context: &GameContext) -> UpdateReport {
        let now = context.now();
        let mut report = UpdateReport::default();

        for goal in &mut self.active {
            let raw = template_for(goal.goal_type()).calculate_progress(goal, context);
            goal.set_progress(raw);

            if goal.progress() >= 1.0 {
                report.completed.push(goal.id);
                continue;
            }

            if let Some(remaining) = goal.time_remaining(now) {
                if remaining < Duration::zero() {
                    report.failed.push(goal.id);
                    continue;
                }
                if remaining < Duration::hours(24) {
                    goal.adjust_priority(3);
                } else if remaining < Duration::hours(48) {
                    goal.adjust_priority(2);
                } else if remaining < Duration::hours(72) {
                    goal.adjust_priority(1);
                }
            }

            if goal.progress() > 0.7 && goal.priority() < 8 {
                goal.adjust_priority(1);
            }

            if now - goal.created_at > Duration::hours(48) && goal.progress() < 0.3 {
                goal.adjust_priority(-1);
            }
        }

        if !report.failed.is_empty() {
            self.active.retain(|g| !report.failed.contains(&g.id));
            self.failed += report.failed.len();
            debug!(count = report.failed.len(), "Goals dropped after missing their deadline");
        }

        for id in report.completed.clone() {
            report.spawned += self.complete_goal(id, context).unwrap_or(0);
        }

        self.sort_active();
        report
    }

    /// Move an active goal to the completed set and activate its follow-ups.
    ///
    /// Returns the number of goals spawned, or `None` if `id` is not active.
    pub fn complete_goal(&mut self, id: GoalId, context: &GameContext) -> Option<usize> {
        let index = self.active.iter().position(|g| g.id == id)?;
        let mut goal = self.active.remove(index);
        goal.completed_at = Some(context.now());

        let attached = std::mem::take(&mut goal.follow_ups);
        let from_template: Vec<Goal> = template_for(goal.goal_type())
            .follow_up_goals(&goal, &self.profile, context)
            .into_iter()
            .map(|g| g.with_origin(GoalOrigin::FollowUp))
            .collect();
        let emergent = if self.config.emergent_goals {
            emergent_goals(&self.profile, goal.goal_type(), context)
        } else {
            Vec::new()
        };

        let parent = goal.id;
        let goal_type = goal.goal_type();
        self.completed.push(goal);

        let mut spawned = 0;
        for mut candidate in attached.into_iter().chain(from_template).chain(emergent) {
            if self.is_duplicate(&candidate) {
                continue;
            }
            candidate.metadata.parent = Some(parent);
            self.add_goal(candidate);
            spawned += 1;
        }

        info!(goal = %parent, kind = %goal_type, spawned, "Goal completed");
        Some(spawned)
    }

    fn is_duplicate(&self, candidate: &Goal) -> bool {
        self.active.iter().any(|g| g.target == candidate.target)
    }

    /// Pick an action label that serves the top goal, or `None` with no goals.
    pub fn get_recommended_action<R: Rng + ?Sized>(&self, rng: &mut R) -> Option<&'static str> {
        let top = self.active.first()?;
        pick_recommended(top.goal_type(), rng)
    }

    /// Whether an action label advances any active goal.
    #[must_use]
    pub fn does_action_contribute_to_goals(&self, label: &str) -> bool {
        self.contributing_goals(label).next().is_some()
    }

    /// Active goals an action label advances.
    pub fn contributing_goals<'a>(&'a self, label: &str) -> impl Iterator<Item = &'a Goal> + 'a {
        let label = label.to_lowercase();
        self.active.iter().filter(move |goal| goal_matches(goal, &label))
    }

    /// Active goals, highest priority first.
    #[must_use]
    pub fn get_current_goals(&self) -> &[Goal] {
        &self.active
    }

    /// Completed goals, in completion order.
    #[must_use]
    pub fn completed_goals(&self) -> &[Goal] {
        &self.completed
    }

    /// Declared prerequisites of `goal` that have not been completed.
    #[must_use]
    pub fn unmet_prerequisites(&self, goal: &Goal) -> Vec<GoalId> {
        goal.prerequisites
            .iter()
            .filter(|id| !self.completed.iter().any(|c| c.id == **id))
            .copied()
            .collect()
    }

    /// Summary counters.
    #[must_use]
    pub fn get_stats(&self) -> GoalStats {
        let average_progress = if self.active.is_empty() {
            0.0
        } else {
            self.active.iter().map(Goal::progress).sum::<f32>() / self.active.len() as f32
        };
        GoalStats {
            active: self.active.len(),
            completed: self.completed.len(),
            failed: self.failed,
            average_progress,
            top_goal: self.active.first().map(Goal::goal_type),
        }
    }
}

fn goal_matches(goal: &Goal, label: &str) -> bool {
    goal.metadata
        .related_actions
        .iter()
        .any(|a| label.contains(&a.to_lowercase()))
        || label.contains(&goal.id.to_string())
        || goal_keywords(goal.goal_type()).iter().any(|k| label.contains(k))
}
