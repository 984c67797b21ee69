//! Configuration for the BOTMIND decision core.
//!
//! Plain value objects, loadable from TOML. Every field has a default so a
//! partial file (or an empty one) is valid.
//!
//! ```toml
//! [decision]
//! allow_risky = true
//! random_variance = 0.0
//! seed = 42
//!
//! [memory]
//! max_history_size = 500
//! ```

use serde::{Deserialize, Serialize};

/// Top-level configuration for one bot.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct BotConfig {
    /// Action scoring options.
    #[serde(default)]
    pub decision: DecisionOptions,
    /// Outcome memory settings.
    #[serde(default)]
    pub memory: MemoryConfig,
    /// Goal manager settings.
    #[serde(default)]
    pub goals: GoalConfig,
}

impl BotConfig {
    /// Load configuration from a TOML string.
    ///
    /// # Errors
    /// Returns `BotError::Config` if the TOML is invalid or fails validation.
    pub fn from_toml(toml_str: &str) -> crate::error::Result<Self> {
        let config: Self =
            toml::from_str(toml_str).map_err(|e| crate::BotError::Config(e.to_string()))?;
        config.validate()?;
        Ok(config)
    }

    /// Load configuration from a TOML file.
    ///
    /// # Errors
    /// Returns an error if the file cannot be read or parsed.
    pub fn from_file(path: &std::path::Path) -> crate::error::Result<Self> {
        let content = std::fs::read_to_string(path)?;
        Self::from_toml(&content)
    }

    /// Check value ranges that serde cannot express.
    ///
    /// # Errors
    /// Returns `BotError::Config` naming the first offending field.
    pub fn validate(&self) -> crate::error::Result<()> {
        let d = &self.decision;
        if !(0.0..=1.0).contains(&d.random_variance) {
            return Err(crate::BotError::Config(format!(
                "decision.random_variance must be within [0, 1], got {}",
                d.random_variance
            )));
        }
        if d.goal_weight < 0.0 || d.efficiency_weight < 0.0 {
            return Err(crate::BotError::Config(
                "decision weights must be non-negative".to_string(),
            ));
        }
        if self.memory.max_history_size == 0 {
            return Err(crate::BotError::Config(
                "memory.max_history_size must be at least 1".to_string(),
            ));
        }
        if self.memory.min_occurrences_for_confidence == 0 {
            return Err(crate::BotError::Config(
                "memory.min_occurrences_for_confidence must be at least 1".to_string(),
            ));
        }
        Ok(())
    }
}

// ---------------------------------------------------------------------------
// Sub-configs
// ---------------------------------------------------------------------------

/// Options for the decision engine.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DecisionOptions {
    /// Emit per-candidate score breakdowns at debug level.
    #[serde(default)]
    pub debug: bool,
    /// Allow candidates with risk above 0.8.
    #[serde(default)]
    pub allow_risky: bool,
    /// Energy that must remain after paying an action's energy cost.
    #[serde(default)]
    pub min_energy_threshold: f32,
    /// Multiplier on the goal-alignment component.
    #[serde(default = "default_1_0")]
    pub goal_weight: f32,
    /// Multiplier on the resource-efficiency component.
    #[serde(default = "default_1_0")]
    pub efficiency_weight: f32,
    /// Half-width of the multiplicative noise band, 0–1.
    #[serde(default = "default_0_2")]
    pub random_variance: f32,
    /// Reward candidates that complete a strong learned combo.
    #[serde(default = "default_true")]
    pub consider_combos: bool,
    /// Use learned success rates in scoring.
    #[serde(default = "default_true")]
    pub use_history: bool,
    /// Seed for the engine's random source; entropy when unset.
    #[serde(default)]
    pub seed: Option<u64>,
}

impl Default for DecisionOptions {
    fn default() -> Self {
        Self {
            debug: false,
            allow_risky: false,
            min_energy_threshold: 0.0,
            goal_weight: 1.0,
            efficiency_weight: 1.0,
            random_variance: 0.2,
            consider_combos: true,
            use_history: true,
            seed: None,
        }
    }
}

/// Outcome memory settings.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MemoryConfig {
    /// Hard cap on retained outcomes; oldest evicted first.
    #[serde(default = "default_1000")]
    pub max_history_size: usize,
    /// Samples needed before a pattern or combo reaches full confidence.
    #[serde(default = "default_5")]
    pub min_occurrences_for_confidence: u32,
}

impl Default for MemoryConfig {
    fn default() -> Self {
        Self {
            max_history_size: 1000,
            min_occurrences_for_confidence: 5,
        }
    }
}

/// Goal manager settings.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GoalConfig {
    /// Seed the archetype's starter goals on initialization.
    #[serde(default = "default_true")]
    pub starter_goals: bool,
    /// Completing a goal triggers the archetype's emergent goals.
    #[serde(default = "default_true")]
    pub emergent_goals: bool,
    /// Log a warning when the active set grows beyond this size.
    #[serde(default = "default_25")]
    pub active_goal_warning: usize,
}

impl Default for GoalConfig {
    fn default() -> Self {
        Self {
            starter_goals: true,
            emergent_goals: true,
            active_goal_warning: 25,
        }
    }
}

// ---------------------------------------------------------------------------
// Serde default helpers
// ---------------------------------------------------------------------------

fn default_true() -> bool { true }
fn default_0_2() -> f32 { 0.2 }
fn default_1_0() -> f32 { 1.0 }
fn default_5() -> u32 { 5 }
fn default_25() -> usize { 25 }
fn default_1000() -> usize { 1000 }
