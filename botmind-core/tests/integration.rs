//! Integration Tests — End-to-End Decision Flows
//!
//! These tests drive the public API the way a test harness would: build a
//! bot, feed it contexts and candidates, report outcomes, and check what it
//! learned and which goals it finished.

use chrono::{DateTime, Duration, TimeZone, Utc};

use botmind_core::config::{BotConfig, DecisionOptions, MemoryConfig};
use botmind_core::goals::{Goal, GoalManager, GoalTarget, GoalType};
use botmind_core::memory::{ActionOutcome, BotMemory, Recommendation};
use botmind_core::personality::{Archetype, archetype_profile, create_profile};
use botmind_core::{Bot, DecisionEngine, GameAction, GameContext};

fn t0() -> DateTime<Utc> {
    Utc.with_ymd_and_hms(2024, 9, 2, 9, 0, 0).single().expect("valid")
}

fn quiet_config(seed: u64) -> BotConfig {
    BotConfig {
        decision: DecisionOptions {
            random_variance: 0.0,
            seed: Some(seed),
            ..DecisionOptions::default()
        },
        ..BotConfig::default()
    }
}

// ---------------------------------------------------------------------------
// A tiny game world
// ---------------------------------------------------------------------------

fn catalogue() -> Vec<GameAction> {
    vec![
        GameAction::new("train", "train").with_costs(10.0, 0).with_reward(10.0),
        GameAction::new("chat", "chat").with_costs(2.0, 0).with_reward(2.0),
        GameAction::new("rest", "rest"),
    ]
}

/// Apply an action to the world; every action succeeds.
fn apply(ctx: &mut GameContext, action: &GameAction) {
    let c = &mut ctx.character;
    c.energy -= action.energy_cost;
    match action.action_type.as_str() {
        "train" => {
            c.level += 1;
            *c.skills.entry("endurance".into()).or_default() += 1;
        }
        "chat" => c.friends += 1,
        "rest" => c.energy = (c.energy + 40.0).min(100.0),
        _ => {}
    }
    ctx.recent_actions.push(action.action_type.clone());
    ctx.world.now += Duration::minutes(15);
}

fn run(bot: &mut Bot, cycles: usize) -> Vec<String> {
    let mut ctx = GameContext::at(t0());
    let candidates = catalogue();
    let mut chosen_ids = Vec::new();
    for _ in 0..cycles {
        let chosen = bot.decide(&candidates, &ctx).expect("decide").clone();
        let before = ctx.clone();
        apply(&mut ctx, &chosen);
        bot.observe(
            ActionOutcome::new(&chosen, &before, true).with_reward(chosen.expected_reward),
            &ctx,
        );
        chosen_ids.push(chosen.id);
    }
    chosen_ids
}

// ---------------------------------------------------------------------------
// Personality
// ---------------------------------------------------------------------------

#[test]
fn grinder_is_patient_and_incurious() {
    let profile = create_profile("grinder").expect("grinder");
    assert!((profile.traits.patience - 0.9).abs() < 1e-6);
    assert!((profile.traits.curiosity - 0.1).abs() < 1e-6);
    assert!(create_profile("Chaos").is_ok());
    assert!(create_profile("unknown").is_err());
}

// ---------------------------------------------------------------------------
// Memory
// ---------------------------------------------------------------------------

#[test]
fn low_health_combat_is_discouraged() {
    let mut memory = BotMemory::new();
    let fight = GameAction::new("fight_wolf", "fight").with_risk(0.4);
    let mut ctx = GameContext::at(t0());

    for i in 0..50 {
        ctx.character.health = 20.0 + (i % 15) as f32;
        memory.record_outcome(ActionOutcome::new(&fight, &ctx, i % 5 == 0));
        ctx.world.now += Duration::minutes(1);
    }
    for i in 0..50 {
        ctx.character.health = 60.0 + (i % 40) as f32;
        memory.record_outcome(ActionOutcome::new(&fight, &ctx, i % 5 != 0));
        ctx.world.now += Duration::minutes(1);
    }

    ctx.character.health = 25.0;
    assert_eq!(
        memory.get_recommendation(&ctx),
        Some(Recommendation::AvoidCombatLowHealth)
    );
    assert_eq!(
        memory.get_recommendation(&ctx).map(|r| r.to_string()).as_deref(),
        Some("avoid_combat_low_health")
    );
    let low = memory.pattern("combat_health:low").expect("low bucket");
    assert_eq!(low.occurrences, 50);
    assert!((low.success_rate - 0.2).abs() < 1e-6);
}

#[test]
fn history_never_exceeds_capacity() {
    let mut memory = BotMemory::with_config(MemoryConfig {
        max_history_size: 25,
        ..MemoryConfig::default()
    });
    let ctx = GameContext::at(t0());
    let action = GameAction::new("fish", "fish");
    for n in 1..=60 {
        memory.record_outcome(ActionOutcome::new(&action, &ctx, n % 2 == 0));
        assert_eq!(memory.len(), n.min(25));
    }
    assert_eq!(memory.total_recorded(), 60);
}

#[test]
fn snapshot_round_trip_and_corrupt_import() {
    let mut bot = Bot::new("economist", quiet_config(11), None).expect("bot");
    run(&mut bot, 20);
    let json = bot.memory().export_memory().expect("export");

    let mut fresh = Bot::new("economist", quiet_config(11), None).expect("bot");
    assert!(fresh.memory_mut().import_memory(&json));
    assert_eq!(fresh.memory().len(), 20);
    assert_eq!(fresh.memory().export_memory().expect("export"), json);

    let truncated = &json[..json.len() / 2];
    assert!(!fresh.memory_mut().import_memory(truncated));
    assert_eq!(fresh.memory().len(), 20, "failed import must not mutate");
}

// ---------------------------------------------------------------------------
// Goals
// ---------------------------------------------------------------------------

#[test]
fn reaching_target_level_completes_goal() {
    let mut goals = GoalManager::new(archetype_profile(Archetype::Grinder));
    let mut ctx = GameContext::at(t0());
    let goal = Goal::new(GoalTarget::LevelUp { level: 5 }, 5, ctx.now());
    let id = goal.id;
    goals.add_goal(goal);

    ctx.character.level = 5;
    let report = goals.update_progress(&ctx);

    assert_eq!(report.completed, vec![id]);
    assert!(goals.get_current_goals().iter().all(|g| g.id != id));
    let done = goals.completed_goals().iter().find(|g| g.id == id).expect("completed");
    assert!((done.progress() - 1.0).abs() < f32::EPSILON);
    assert_eq!(done.completed_at, Some(ctx.now()));
    assert!(
        goals
            .get_current_goals()
            .iter()
            .any(|g| g.goal_type() == GoalType::LevelUp && g.metadata.parent == Some(id)),
        "a follow-up level goal is spawned"
    );
}

#[test]
fn current_goals_are_stable_without_mutation() {
    let mut goals = GoalManager::new(archetype_profile(Archetype::Social));
    goals.initialize_goals(&GameContext::at(t0()));
    let first: Vec<Goal> = goals.get_current_goals().to_vec();
    let second: Vec<Goal> = goals.get_current_goals().to_vec();
    assert_eq!(first, second);
    assert!(!first.is_empty());
}

// ---------------------------------------------------------------------------
// Decision
// ---------------------------------------------------------------------------

#[test]
fn unaffordable_action_is_never_chosen() {
    let profile = archetype_profile(Archetype::Economist);
    let goals = GoalManager::new(profile.clone());
    let memory = BotMemory::new();
    let mut engine = DecisionEngine::new(profile, DecisionOptions::default());

    let mut ctx = GameContext::at(t0());
    ctx.character.energy = 20.0;
    let candidates = vec![
        GameAction::new("jackpot", "invest").with_costs(25.0, 0).with_reward(10_000.0),
        GameAction::new("odd_job", "work").with_costs(5.0, 0).with_reward(3.0),
    ];
    for _ in 0..50 {
        let chosen = engine
            .select_action(&candidates, &ctx, &goals, &memory)
            .expect("chosen");
        assert_eq!(chosen.id, "odd_job");
    }
}

#[test]
fn zero_variance_bots_agree() {
    let mut a = Bot::new("grinder", quiet_config(1), None).expect("bot");
    let mut b = Bot::new("grinder", quiet_config(2), None).expect("bot");
    assert_eq!(run(&mut a, 25), run(&mut b, 25));
}

#[test]
fn same_seed_reproduces_noisy_choices() {
    let noisy = |seed| {
        let mut config = BotConfig::default();
        config.decision.random_variance = 0.5;
        Bot::new("social", config, Some(seed)).expect("bot")
    };
    let mut a = noisy(99);
    let mut b = noisy(99);
    assert_eq!(run(&mut a, 25), run(&mut b, 25));
}

// ---------------------------------------------------------------------------
// Full cycle
// ---------------------------------------------------------------------------

#[test]
fn grinder_trains_and_levels_up() {
    let mut bot = Bot::new("grinder", quiet_config(4), None).expect("bot");
    let chosen = run(&mut bot, 30);

    let trains = chosen.iter().filter(|id| *id == "train").count();
    assert!(trains > chosen.len() / 2, "grinder mostly trains: {chosen:?}");

    let status = bot.status();
    assert_eq!(status.decisions, 30);
    assert_eq!(status.outcomes, 30);
    assert!(status.goals.completed >= 1);
    assert!(!status.should_adapt);
    assert!(bot.memory().success_rate("train") > 0.99);
    assert!(bot.memory().get_learning_report().contains("train"));
}

#[test]
fn config_file_drives_bot() {
    use std::io::Write;

    let mut file = tempfile::NamedTempFile::new().expect("tempfile");
    writeln!(
        file,
        "[decision]\nrandom_variance = 0.0\nseed = 3\n\n[memory]\nmax_history_size = 10\n"
    )
    .expect("write");
    let config = BotConfig::from_file(file.path()).expect("config");

    let mut bot = Bot::new("explorer", config, None).expect("bot");
    run(&mut bot, 15);
    assert_eq!(bot.memory().len(), 10);
    assert_eq!(bot.memory().total_recorded(), 15);
}
