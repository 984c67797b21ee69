//! Goal templates — one stateless function bundle per [`GoalType`].
//!
//! The type→template table, the recommended-action table, the contribution
//! keyword table and the emergent-goal table are all fixed at compile time.

use chrono::Duration;
use rand::Rng;
use rand::seq::SliceRandom;

use super::{Goal, GoalOrigin, GoalTarget, GoalType};
use crate::personality::{Archetype, PersonalityProfile};
use crate::types::{CharacterSnapshot, GameContext};

/// Behavior shared by every goal kind.
pub trait GoalTemplate: Sync {
    /// Kind this template builds.
    fn goal_type(&self) -> GoalType;

    /// Pick a target suited to the personality and current character.
    fn generate_target(
        &self,
        profile: &PersonalityProfile,
        character: &CharacterSnapshot,
    ) -> GoalTarget;

    /// Raw progress toward the goal's target; the caller clamps to [0, 1].
    fn calculate_progress(&self, goal: &Goal, context: &GameContext) -> f32;

    /// Goals this kind spawns when completed.
    fn follow_up_goals(
        &self,
        _completed: &Goal,
        _profile: &PersonalityProfile,
        _context: &GameContext,
    ) -> Vec<Goal> {
        Vec::new()
    }

    /// Starting priority for this personality.
    fn base_priority(&self, profile: &PersonalityProfile) -> u8;

    /// Default time limit, if the kind is time-boxed.
    fn time_limit(&self) -> Option<Duration> {
        None
    }

    /// Action labels that advance goals of this kind.
    fn related_actions(&self) -> &'static [&'static str] {
        recommended_actions(self.goal_type())
    }

    /// Build a fresh goal from the current context.
    fn build(
        &self,
        profile: &PersonalityProfile,
        context: &GameContext,
        origin: GoalOrigin,
    ) -> Goal {
        let target = self.generate_target(profile, &context.character);
        let mut goal = Goal::new(target, self.base_priority(profile), context.now())
            .with_origin(origin)
            .with_description(describe(self.goal_type()))
            .with_related_actions(self.related_actions().iter().copied());
        if let Some(limit) = self.time_limit() {
            goal = goal.with_time_limit(limit);
        }
        goal
    }
}

// ---------------------------------------------------------------------------
// Helpers
// ---------------------------------------------------------------------------

/// `(current - baseline) / amount`, 1.0 when `amount` is zero.
fn gained_ratio(current: f64, baseline: f64, amount: f64) -> f32 {
    if amount <= 0.0 {
        return 1.0;
    }
    ((current - baseline) / amount) as f32
}

/// `current / target`, 1.0 when `target` is zero.
fn reached_ratio(current: f64, target: f64) -> f32 {
    if target <= 0.0 {
        return 1.0;
    }
    (current / target) as f32
}

/// Scale a trait into an integer bonus, `0..=max`.
fn trait_bonus(value: f32, max: u32) -> u32 {
    (value.clamp(0.0, 1.0) * max as f32).round() as u32
}

fn priority_from(base: f32, weight: f32, value: f32) -> u8 {
    (base + weight * value).round().clamp(1.0, 10.0) as u8
}

fn signature_item(archetype: Archetype) -> &'static str {
    match archetype {
        Archetype::Combat => "steel_sword",
        Archetype::Explorer => "compass",
        Archetype::Criminal => "lockpick",
        Archetype::Economist => "ledger",
        Archetype::Social | Archetype::Roleplayer => "fine_clothes",
        Archetype::Grinder | Archetype::Chaos => "health_potion",
    }
}

fn signature_skill(archetype: Archetype) -> &'static str {
    match archetype {
        Archetype::Combat => "strength",
        Archetype::Economist => "negotiation",
        Archetype::Criminal => "stealth",
        Archetype::Explorer => "navigation",
        Archetype::Social | Archetype::Roleplayer => "charisma",
        Archetype::Grinder | Archetype::Chaos => "endurance",
    }
}

fn describe(goal_type: GoalType) -> &'static str {
    match goal_type {
        GoalType::LevelUp => "Reach the next level milestone",
        GoalType::EarnMoney => "Build up a gold reserve",
        GoalType::AcquireItem => "Obtain a signature item",
        GoalType::JoinGang => "Become part of a gang",
        GoalType::BuyProperty => "Own more property",
        GoalType::GainReputation => "Become better known",
        GoalType::MakeFriends => "Grow the friend list",
        GoalType::ExploreLocations => "Visit new places",
        GoalType::CommitCrimes => "Pull off a string of crimes",
        GoalType::WinCombats => "Win a series of fights",
        GoalType::TrainSkill => "Train a skill",
        GoalType::CompleteTrades => "Close a run of trades",
        GoalType::CompleteQuests => "Finish quests",
        GoalType::Experiment => "Try as many different things as possible",
    }
}

// ---------------------------------------------------------------------------
// Templates
// ---------------------------------------------------------------------------

struct LevelUpTemplate;

impl GoalTemplate for LevelUpTemplate {
    fn goal_type(&self) -> GoalType {
        GoalType::LevelUp
    }

    fn generate_target(&self, profile: &PersonalityProfile, c: &CharacterSnapshot) -> GoalTarget {
        GoalTarget::LevelUp { level: c.level + 1 + trait_bonus(profile.traits.patience, 4) }
    }

    fn calculate_progress(&self, goal: &Goal, context: &GameContext) -> f32 {
        match &goal.target {
            GoalTarget::LevelUp { level } => {
                reached_ratio(f64::from(context.character.level), f64::from(*level))
            }
            _ => 0.0,
        }
    }

    fn follow_up_goals(
        &self,
        _: &Goal,
        profile: &PersonalityProfile,
        context: &GameContext,
    ) -> Vec<Goal> {
        let next = GoalTarget::LevelUp { level: context.character.level + 5 };
        vec![Goal::new(next, self.base_priority(profile), context.now())
            .with_related_actions(recommended_actions(GoalType::LevelUp).iter().copied())]
    }

    fn base_priority(&self, profile: &PersonalityProfile) -> u8 {
        priority_from(5.0, 3.0, profile.traits.patience)
    }
}

struct EarnMoneyTemplate;

impl GoalTemplate for EarnMoneyTemplate {
    fn goal_type(&self) -> GoalType {
        GoalType::EarnMoney
    }

    fn generate_target(&self, profile: &PersonalityProfile, c: &CharacterSnapshot) -> GoalTarget {
        let amount = 500 + u64::from(trait_bonus(profile.traits.greed, 20)) * 100;
        GoalTarget::EarnMoney { baseline: c.gold, amount }
    }

    fn calculate_progress(&self, goal: &Goal, context: &GameContext) -> f32 {
        match &goal.target {
            GoalTarget::EarnMoney { baseline, amount } => gained_ratio(
                context.character.gold as f64,
                *baseline as f64,
                *amount as f64,
            ),
            _ => 0.0,
        }
    }

    fn follow_up_goals(
        &self,
        completed: &Goal,
        profile: &PersonalityProfile,
        context: &GameContext,
    ) -> Vec<Goal> {
        let GoalTarget::EarnMoney { amount, .. } = &completed.target else {
            return Vec::new();
        };
        let next = GoalTarget::EarnMoney { baseline: context.character.gold, amount: amount * 2 };
        vec![Goal::new(next, self.base_priority(profile), context.now())
            .with_related_actions(recommended_actions(GoalType::EarnMoney).iter().copied())]
    }

    fn base_priority(&self, profile: &PersonalityProfile) -> u8 {
        priority_from(4.0, 5.0, profile.traits.greed)
    }
}

struct AcquireItemTemplate;

impl GoalTemplate for AcquireItemTemplate {
    fn goal_type(&self) -> GoalType {
        GoalType::AcquireItem
    }

    fn generate_target(&self, profile: &PersonalityProfile, _: &CharacterSnapshot) -> GoalTarget {
        GoalTarget::AcquireItem { item: signature_item(profile.archetype).to_string() }
    }

    fn calculate_progress(&self, goal: &Goal, context: &GameContext) -> f32 {
        match &goal.target {
            GoalTarget::AcquireItem { item } => {
                if context.character.inventory.iter().any(|i| i == item) { 1.0 } else { 0.0 }
            }
            _ => 0.0,
        }
    }

    fn base_priority(&self, profile: &PersonalityProfile) -> u8 {
        priority_from(4.0, 3.0, profile.traits.curiosity)
    }
}

struct JoinGangTemplate;

impl GoalTemplate for JoinGangTemplate {
    fn goal_type(&self) -> GoalType {
        GoalType::JoinGang
    }

    fn generate_target(&self, _: &PersonalityProfile, _: &CharacterSnapshot) -> GoalTarget {
        GoalTarget::JoinGang { gang: None }
    }

    fn calculate_progress(&self, goal: &Goal, context: &GameContext) -> f32 {
        match (&goal.target, &context.character.gang) {
            (GoalTarget::JoinGang { gang: None }, Some(_)) => 1.0,
            (GoalTarget::JoinGang { gang: Some(wanted) }, Some(current)) if wanted == current => {
                1.0
            }
            _ => 0.0,
        }
    }

    fn follow_up_goals(
        &self,
        _: &Goal,
        profile: &PersonalityProfile,
        context: &GameContext,
    ) -> Vec<Goal> {
        vec![GainReputationTemplate.build(profile, context, GoalOrigin::FollowUp)]
    }

    fn base_priority(&self, profile: &PersonalityProfile) -> u8 {
        priority_from(3.0, 5.0, (profile.traits.loyalty + profile.traits.sociability) / 2.0)
    }
}

struct BuyPropertyTemplate;

impl GoalTemplate for BuyPropertyTemplate {
    fn goal_type(&self) -> GoalType {
        GoalType::BuyProperty
    }

    fn generate_target(&self, _: &PersonalityProfile, c: &CharacterSnapshot) -> GoalTarget {
        GoalTarget::BuyProperty { count: c.properties + 1 }
    }

    fn calculate_progress(&self, goal: &Goal, context: &GameContext) -> f32 {
        match &goal.target {
            GoalTarget::BuyProperty { count } => {
                reached_ratio(f64::from(context.character.properties), f64::from(*count))
            }
            _ => 0.0,
        }
    }

    fn follow_up_goals(
        &self,
        _: &Goal,
        profile: &PersonalityProfile,
        context: &GameContext,
    ) -> Vec<Goal> {
        vec![EarnMoneyTemplate.build(profile, context, GoalOrigin::FollowUp)]
    }

    fn base_priority(&self, profile: &PersonalityProfile) -> u8 {
        priority_from(3.0, 5.0, profile.traits.greed)
    }
}

struct GainReputationTemplate;

impl GoalTemplate for GainReputationTemplate {
    fn goal_type(&self) -> GoalType {
        GoalType::GainReputation
    }

    fn generate_target(&self, profile: &PersonalityProfile, c: &CharacterSnapshot) -> GoalTarget {
        let amount = 50 + i64::from(trait_bonus(profile.traits.sociability, 10)) * 10;
        GoalTarget::GainReputation { baseline: c.reputation, amount }
    }

    fn calculate_progress(&self, goal: &Goal, context: &GameContext) -> f32 {
        match &goal.target {
            GoalTarget::GainReputation { baseline, amount } => gained_ratio(
                context.character.reputation as f64,
                *baseline as f64,
                *amount as f64,
            ),
            _ => 0.0,
        }
    }

    fn base_priority(&self, profile: &PersonalityProfile) -> u8 {
        priority_from(3.0, 5.0, profile.traits.sociability)
    }
}

struct MakeFriendsTemplate;

impl GoalTemplate for MakeFriendsTemplate {
    fn goal_type(&self) -> GoalType {
        GoalType::MakeFriends
    }

    fn generate_target(&self, profile: &PersonalityProfile, c: &CharacterSnapshot) -> GoalTarget {
        GoalTarget::MakeFriends {
            count: c.friends + 3 + trait_bonus(profile.traits.sociability, 5),
        }
    }

    fn calculate_progress(&self, goal: &Goal, context: &GameContext) -> f32 {
        match &goal.target {
            GoalTarget::MakeFriends { count } => {
                reached_ratio(f64::from(context.character.friends), f64::from(*count))
            }
            _ => 0.0,
        }
    }

    fn follow_up_goals(
        &self,
        _: &Goal,
        profile: &PersonalityProfile,
        context: &GameContext,
    ) -> Vec<Goal> {
        if context.character.gang.is_some() {
            return Vec::new();
        }
        vec![JoinGangTemplate.build(profile, context, GoalOrigin::FollowUp)]
    }

    fn base_priority(&self, profile: &PersonalityProfile) -> u8 {
        priority_from(2.0, 7.0, profile.traits.sociability)
    }
}

struct ExploreLocationsTemplate;

impl GoalTemplate for ExploreLocationsTemplate {
    fn goal_type(&self) -> GoalType {
        GoalType::ExploreLocations
    }

    fn generate_target(&self, profile: &PersonalityProfile, c: &CharacterSnapshot) -> GoalTarget {
        let visited = u32::try_from(c.visited_locations.len()).unwrap_or(u32::MAX);
        GoalTarget::ExploreLocations {
            count: visited.saturating_add(3 + trait_bonus(profile.traits.curiosity, 5)),
        }
    }

    fn calculate_progress(&self, goal: &Goal, context: &GameContext) -> f32 {
        match &goal.target {
            GoalTarget::ExploreLocations { count } => reached_ratio(
                context.character.visited_locations.len() as f64,
                f64::from(*count),
            ),
            _ => 0.0,
        }
    }

    fn follow_up_goals(
        &self,
        _: &Goal,
        profile: &PersonalityProfile,
        context: &GameContext,
    ) -> Vec<Goal> {
        let visited = u32::try_from(context.character.visited_locations.len()).unwrap_or(u32::MAX);
        let next = GoalTarget::ExploreLocations { count: visited.saturating_add(5) };
        vec![Goal::new(next, self.base_priority(profile), context.now())
            .with_related_actions(recommended_actions(GoalType::ExploreLocations).iter().copied())]
    }

    fn base_priority(&self, profile: &PersonalityProfile) -> u8 {
        priority_from(2.0, 7.0, profile.traits.curiosity)
    }
}

struct CommitCrimesTemplate;

impl GoalTemplate for CommitCrimesTemplate {
    fn goal_type(&self) -> GoalType {
        GoalType::CommitCrimes
    }

    fn generate_target(&self, profile: &PersonalityProfile, c: &CharacterSnapshot) -> GoalTarget {
        GoalTarget::CommitCrimes {
            baseline: c.crimes_committed,
            count: 3 + trait_bonus(profile.traits.risk_tolerance, 5),
        }
    }

    fn calculate_progress(&self, goal: &Goal, context: &GameContext) -> f32 {
        match &goal.target {
            GoalTarget::CommitCrimes { baseline, count } => gained_ratio(
                f64::from(context.character.crimes_committed),
                f64::from(*baseline),
                f64::from(*count),
            ),
            _ => 0.0,
        }
    }

    fn base_priority(&self, profile: &PersonalityProfile) -> u8 {
        priority_from(2.0, 7.0, profile.traits.risk_tolerance)
    }

    fn time_limit(&self) -> Option<Duration> {
        Some(Duration::days(3))
    }
}

struct WinCombatsTemplate;

impl GoalTemplate for WinCombatsTemplate {
    fn goal_type(&self) -> GoalType {
        GoalType::WinCombats
    }

    fn generate_target(&self, profile: &PersonalityProfile, c: &CharacterSnapshot) -> GoalTarget {
        GoalTarget::WinCombats {
            baseline: c.combat_wins,
            count: 3 + trait_bonus(profile.traits.aggression, 5),
        }
    }

    fn calculate_progress(&self, goal: &Goal, context: &GameContext) -> f32 {
        match &goal.target {
            GoalTarget::WinCombats { baseline, count } => gained_ratio(
                f64::from(context.character.combat_wins),
                f64::from(*baseline),
                f64::from(*count),
            ),
            _ => 0.0,
        }
    }

    fn follow_up_goals(
        &self,
        _: &Goal,
        profile: &PersonalityProfile,
        context: &GameContext,
    ) -> Vec<Goal> {
        vec![TrainSkillTemplate.build(profile, context, GoalOrigin::FollowUp)]
    }

    fn base_priority(&self, profile: &PersonalityProfile) -> u8 {
        priority_from(2.0, 7.0, profile.traits.aggression)
    }
}

struct TrainSkillTemplate;

impl GoalTemplate for TrainSkillTemplate {
    fn goal_type(&self) -> GoalType {
        GoalType::TrainSkill
    }

    fn generate_target(&self, profile: &PersonalityProfile, c: &CharacterSnapshot) -> GoalTarget {
        let skill = signature_skill(profile.archetype);
        GoalTarget::TrainSkill { skill: skill.to_string(), level: c.skill_level(skill) + 2 }
    }

    fn calculate_progress(&self, goal: &Goal, context: &GameContext) -> f32 {
        match &goal.target {
            GoalTarget::TrainSkill { skill, level } => reached_ratio(
                f64::from(context.character.skill_level(skill)),
                f64::from(*level),
            ),
            _ => 0.0,
        }
    }

    fn follow_up_goals(
        &self,
        completed: &Goal,
        profile: &PersonalityProfile,
        context: &GameContext,
    ) -> Vec<Goal> {
        let GoalTarget::TrainSkill { skill, .. } = &completed.target else {
            return Vec::new();
        };
        let next = GoalTarget::TrainSkill {
            skill: skill.clone(),
            level: context.character.skill_level(skill) + 3,
        };
        vec![Goal::new(next, self.base_priority(profile), context.now())
            .with_related_actions(recommended_actions(GoalType::TrainSkill).iter().copied())]
    }

    fn base_priority(&self, profile: &PersonalityProfile) -> u8 {
        priority_from(3.0, 5.0, profile.traits.patience)
    }
}

struct CompleteTradesTemplate;

impl GoalTemplate for CompleteTradesTemplate {
    fn goal_type(&self) -> GoalType {
        GoalType::CompleteTrades
    }

    fn generate_target(&self, profile: &PersonalityProfile, c: &CharacterSnapshot) -> GoalTarget {
        GoalTarget::CompleteTrades {
            baseline: c.trades_completed,
            count: 3 + trait_bonus(profile.traits.greed, 5),
        }
    }

    fn calculate_progress(&self, goal: &Goal, context: &GameContext) -> f32 {
        match &goal.target {
            GoalTarget::CompleteTrades { baseline, count } => gained_ratio(
                f64::from(context.character.trades_completed),
                f64::from(*baseline),
                f64::from(*count),
            ),
            _ => 0.0,
        }
    }

    fn follow_up_goals(
        &self,
        _: &Goal,
        profile: &PersonalityProfile,
        context: &GameContext,
    ) -> Vec<Goal> {
        vec![EarnMoneyTemplate.build(profile, context, GoalOrigin::FollowUp)]
    }

    fn base_priority(&self, profile: &PersonalityProfile) -> u8 {
        priority_from(2.0, 7.0, profile.traits.greed)
    }

    fn time_limit(&self) -> Option<Duration> {
        Some(Duration::days(7))
    }
}

struct CompleteQuestsTemplate;

impl GoalTemplate for CompleteQuestsTemplate {
    fn goal_type(&self) -> GoalType {
        GoalType::CompleteQuests
    }

    fn generate_target(&self, profile: &PersonalityProfile, c: &CharacterSnapshot) -> GoalTarget {
        GoalTarget::CompleteQuests {
            baseline: c.quests_completed,
            count: 2 + trait_bonus(profile.traits.patience, 3),
        }
    }

    fn calculate_progress(&self, goal: &Goal, context: &GameContext) -> f32 {
        match &goal.target {
            GoalTarget::CompleteQuests { baseline, count } => gained_ratio(
                f64::from(context.character.quests_completed),
                f64::from(*baseline),
                f64::from(*count),
            ),
            _ => 0.0,
        }
    }

    fn follow_up_goals(
        &self,
        completed: &Goal,
        profile: &PersonalityProfile,
        context: &GameContext,
    ) -> Vec<Goal> {
        let GoalTarget::CompleteQuests { count, .. } = &completed.target else {
            return Vec::new();
        };
        let next = GoalTarget::CompleteQuests {
            baseline: context.character.quests_completed,
            count: *count,
        };
        vec![Goal::new(next, self.base_priority(profile), context.now())
            .with_related_actions(recommended_actions(GoalType::CompleteQuests).iter().copied())]
    }

    fn base_priority(&self, profile: &PersonalityProfile) -> u8 {
        priority_from(3.0, 5.0, (profile.traits.patience + profile.traits.curiosity) / 2.0)
    }
}

struct ExperimentTemplate;

impl GoalTemplate for ExperimentTemplate {
    fn goal_type(&self) -> GoalType {
        GoalType::Experiment
    }

    fn generate_target(&self, profile: &PersonalityProfile, _: &CharacterSnapshot) -> GoalTarget {
        GoalTarget::Experiment { distinct_actions: 3 + trait_bonus(profile.traits.curiosity, 3) }
    }

    fn calculate_progress(&self, goal: &Goal, context: &GameContext) -> f32 {
        match &goal.target {
            GoalTarget::Experiment { distinct_actions } => {
                let mut seen: Vec<&str> =
                    context.recent_actions.iter().map(String::as_str).collect();
                seen.sort_unstable();
                seen.dedup();
                reached_ratio(seen.len() as f64, f64::from(*distinct_actions))
            }
            _ => 0.0,
        }
    }

    fn base_priority(&self, profile: &PersonalityProfile) -> u8 {
        priority_from(2.0, 6.0, profile.traits.curiosity)
    }
}

// ---------------------------------------------------------------------------
// Tables
// ---------------------------------------------------------------------------

static TEMPLATES: [&dyn GoalTemplate; 14] = [
    &LevelUpTemplate,
    &EarnMoneyTemplate,
    &AcquireItemTemplate,
    &JoinGangTemplate,
    &BuyPropertyTemplate,
    &GainReputationTemplate,
    &MakeFriendsTemplate,
    &ExploreLocationsTemplate,
    &CommitCrimesTemplate,
    &WinCombatsTemplate,
    &TrainSkillTemplate,
    &CompleteTradesTemplate,
    &CompleteQuestsTemplate,
    &ExperimentTemplate,
];

/// The registered template for a goal kind.
#[must_use]
pub fn template_for(goal_type: GoalType) -> &'static dyn GoalTemplate {
    TEMPLATES[goal_type.index()]
}

/// Action labels suggested while a goal of this kind is on top.
#[must_use]
pub fn recommended_actions(goal_type: GoalType) -> &'static [&'static str] {
    match goal_type {
        GoalType::LevelUp => &["train", "fight_monster", "complete_quest"],
        GoalType::EarnMoney => &["work_job", "sell_items", "trade"],
        GoalType::AcquireItem => &["buy_item", "loot", "craft_item"],
        GoalType::JoinGang => &["apply_gang", "chat_gang_members"],
        GoalType::BuyProperty => &["buy_property", "work_job"],
        GoalType::GainReputation => &["help_player", "complete_quest", "attend_event"],
        GoalType::MakeFriends => &["chat", "send_friend_request", "join_party"],
        GoalType::ExploreLocations => &["travel", "explore_area"],
        GoalType::CommitCrimes => &["commit_crime", "steal", "rob"],
        GoalType::WinCombats => &["fight_player", "fight_monster", "duel"],
        GoalType::TrainSkill => &["train", "practice_skill"],
        GoalType::CompleteTrades => &["trade", "sell_items", "buy_item"],
        GoalType::CompleteQuests => &["complete_quest", "accept_quest"],
        GoalType::Experiment => &["explore_area", "chat", "commit_crime", "trade"],
    }
}

/// Keywords that mark an action label as contributing to a goal kind.
#[must_use]
pub fn goal_keywords(goal_type: GoalType) -> &'static [&'static str] {
    match goal_type {
        GoalType::LevelUp => &["train", "fight", "quest", "combat", "grind"],
        GoalType::EarnMoney => &["work", "job", "sell", "trade", "crime", "invest"],
        GoalType::AcquireItem => &["buy", "loot", "craft", "shop"],
        GoalType::JoinGang => &["gang", "crew", "faction"],
        GoalType::BuyProperty => &["property", "house", "real_estate"],
        GoalType::GainReputation => &["help", "quest", "event", "reputation"],
        GoalType::MakeFriends => &["chat", "friend", "party", "message", "social"],
        GoalType::ExploreLocations => &["travel", "explore", "visit", "discover"],
        GoalType::CommitCrimes => &["crime", "steal", "rob", "heist"],
        GoalType::WinCombats => &["fight", "attack", "duel", "pvp", "combat"],
        GoalType::TrainSkill => &["train", "practice", "study"],
        GoalType::CompleteTrades => &["trade", "sell", "buy", "market"],
        GoalType::CompleteQuests => &["quest", "mission"],
        GoalType::Experiment => &[],
    }
}

/// Goal kinds every archetype starts with.
#[must_use]
pub fn starter_goal_types(archetype: Archetype) -> &'static [GoalType] {
    match archetype {
        Archetype::Grinder => &[GoalType::LevelUp, GoalType::TrainSkill, GoalType::CompleteQuests],
        Archetype::Social => &[GoalType::MakeFriends, GoalType::JoinGang, GoalType::GainReputation],
        Archetype::Explorer => &[
            GoalType::ExploreLocations,
            GoalType::AcquireItem,
            GoalType::LevelUp,
        ],
        Archetype::Combat => &[GoalType::WinCombats, GoalType::LevelUp, GoalType::AcquireItem],
        Archetype::Economist => &[
            GoalType::EarnMoney,
            GoalType::CompleteTrades,
            GoalType::BuyProperty,
        ],
        Archetype::Criminal => &[GoalType::CommitCrimes, GoalType::JoinGang, GoalType::EarnMoney],
        Archetype::Roleplayer => &[
            GoalType::CompleteQuests,
            GoalType::MakeFriends,
            GoalType::GainReputation,
        ],
        Archetype::Chaos => &[GoalType::Experiment, GoalType::ExploreLocations],
    }
}

/// Goal kinds an archetype reaches for after completing `completed`.
#[must_use]
pub fn emergent_goal_types(archetype: Archetype, completed: GoalType) -> Vec<GoalType> {
    use GoalType as G;
    let next = match (archetype, completed) {
        (Archetype::Grinder, G::LevelUp) => G::TrainSkill,
        (Archetype::Grinder, G::TrainSkill) => G::CompleteQuests,
        (Archetype::Social, G::MakeFriends) => G::JoinGang,
        (Archetype::Social, G::JoinGang) => G::GainReputation,
        (Archetype::Explorer, G::ExploreLocations) => G::AcquireItem,
        (Archetype::Explorer, G::AcquireItem) => G::ExploreLocations,
        (Archetype::Combat, G::WinCombats) => G::LevelUp,
        (Archetype::Combat, G::LevelUp) => G::WinCombats,
        (Archetype::Economist, G::EarnMoney) => G::BuyProperty,
        (Archetype::Economist, G::CompleteTrades) => G::EarnMoney,
        (Archetype::Criminal, G::CommitCrimes) => G::JoinGang,
        (Archetype::Criminal, G::JoinGang) => G::CommitCrimes,
        (Archetype::Roleplayer, G::CompleteQuests) => G::GainReputation,
        (Archetype::Roleplayer, G::MakeFriends) => G::CompleteQuests,
        // Chaos wanders through the table in order.
        (Archetype::Chaos, done) => G::ALL[(done.index() + 1) % G::ALL.len()],
        _ => return Vec::new(),
    };
    vec![next]
}

/// Build the emergent goals for a completion.
#[must_use]
pub fn emergent_goals(
    profile: &PersonalityProfile,
    completed: GoalType,
    context: &GameContext,
) -> Vec<Goal> {
    emergent_goal_types(profile.archetype, completed)
        .into_iter()
        .map(|t| template_for(t).build(profile, context, GoalOrigin::Emergent))
        .collect()
}

/// Pick one of the recommended labels for a goal kind.
pub fn pick_recommended<R: Rng + ?Sized>(goal_type: GoalType, rng: &mut R) -> Option<&'static str> {
    recommended_actions(goal_type).choose(rng).copied()
}
