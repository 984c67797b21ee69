//! BOTMIND Benchmark Suite
//!
//! Hot paths of one decision cycle:
//!   select_action_20_candidates ..... scoring with a warm memory
//!   record_outcome_full_history ..... append + recompute at capacity
//!   update_progress_starter_goals ... goal tick for one bot
//!   full_cycle_10_bots .............. decide + observe for ten bots

use chrono::{Duration, TimeZone, Utc};
use criterion::{Criterion, black_box, criterion_group, criterion_main};

use botmind_core::config::{BotConfig, DecisionOptions};
use botmind_core::goals::GoalManager;
use botmind_core::memory::{ActionOutcome, BotMemory};
use botmind_core::personality::{Archetype, archetype_profile};
use botmind_core::{Bot, DecisionEngine, GameAction, GameContext};

const ACTION_TYPES: [&str; 8] = [
    "fight", "chat", "train", "explore", "trade", "rob", "rest", "quest",
];

fn context() -> GameContext {
    let now = Utc.with_ymd_and_hms(2024, 4, 1, 14, 0, 0).single().unwrap_or_default();
    let mut ctx = GameContext::at(now);
    ctx.character.level = 12;
    ctx.character.gold = 400;
    ctx.recent_actions = vec!["train".into(), "fight".into()];
    ctx
}

fn candidates(n: usize) -> Vec<GameAction> {
    (0..n)
        .map(|i| {
            let kind = ACTION_TYPES[i % ACTION_TYPES.len()];
            GameAction::new(format!("{kind}_{i}"), kind)
                .with_costs((i % 7) as f32 * 5.0, (i % 3) as u64 * 10)
                .with_reward(10.0 + i as f32)
                .with_risk((i % 10) as f32 / 10.0)
        })
        .collect()
}

fn warm_memory(outcomes: usize) -> BotMemory {
    let mut memory = BotMemory::new();
    let mut ctx = context();
    for (i, action) in candidates(outcomes).iter().enumerate() {
        ctx.character.health = (i % 100) as f32;
        ctx.world.now += Duration::minutes(5);
        memory.record_outcome(ActionOutcome::new(action, &ctx, i % 3 != 0).with_reward(5.0));
    }
    memory
}

/// Benchmark: score and rank 20 candidates against a 500-outcome memory.
fn bench_select_action(c: &mut Criterion) {
    let profile = archetype_profile(Archetype::Grinder);
    let ctx = context();
    let mut goals = GoalManager::new(profile.clone());
    goals.initialize_goals(&ctx);
    let memory = warm_memory(500);
    let actions = candidates(20);
    let mut engine = DecisionEngine::new(
        profile,
        DecisionOptions {
            seed: Some(1),
            ..DecisionOptions::default()
        },
    );

    c.bench_function("select_action_20_candidates", |b| {
        b.iter(|| {
            let chosen = engine.select_action(black_box(&actions), &ctx, &goals, &memory);
            black_box(chosen.is_ok());
        });
    });
}

/// Benchmark: record one outcome into a memory already at capacity.
fn bench_record_outcome(c: &mut Criterion) {
    let mut memory = warm_memory(1000);
    let ctx = context();
    let action = GameAction::new("fight_wolf", "fight").with_risk(0.4);

    c.bench_function("record_outcome_full_history", |b| {
        b.iter(|| {
            memory.record_outcome(ActionOutcome::new(black_box(&action), &ctx, true));
        });
    });
}

/// Benchmark: one goal tick with the starter set.
fn bench_update_progress(c: &mut Criterion) {
    let ctx = context();
    let mut goals = GoalManager::new(archetype_profile(Archetype::Explorer));
    goals.initialize_goals(&ctx);

    c.bench_function("update_progress_starter_goals", |b| {
        b.iter(|| {
            black_box(goals.update_progress(black_box(&ctx)));
        });
    });
}

/// Benchmark: decide + observe for ten bots.
fn bench_full_cycle(c: &mut Criterion) {
    let ctx = context();
    let actions = candidates(12);
    let mut bots: Vec<Bot> = ["grinder", "social", "explorer", "combat", "economist"]
        .iter()
        .cycle()
        .take(10)
        .enumerate()
        .filter_map(|(i, id)| Bot::new(id, BotConfig::default(), Some(i as u64)).ok())
        .collect();

    c.bench_function("full_cycle_10_bots", |b| {
        b.iter(|| {
            for bot in &mut bots {
                let Ok(chosen) = bot.decide(&actions, &ctx) else {
                    continue;
                };
                let outcome = ActionOutcome::new(chosen, &ctx, true);
                black_box(bot.observe(outcome, &ctx));
            }
        });
    });
}

criterion_group!(
    benches,
    bench_select_action,
    bench_record_outcome,
    bench_update_progress,
    bench_full_cycle,
);
criterion_main!(benches);
