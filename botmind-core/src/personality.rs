//! Personality archetype registry.
//!
//! Eight fixed archetypes bundle a trait vector with activity preferences.
//! Profiles are handed out as owned copies; the registry itself is a pure
//! `match` table and never changes at runtime.
//!
//! Trait values steer scoring in two ways:
//! - [`action_multiplier`] weights free-text action labels by keyword group
//! - [`match_preference`] applies the profile's preferred / avoided lists

use std::fmt;
use std::str::FromStr;

use rand::Rng;
use serde::{Deserialize, Serialize};

use crate::error::{BotError, Result};

// ---------------------------------------------------------------------------
// Traits
// ---------------------------------------------------------------------------

/// Seven personality scalars, each in [0, 1].
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct PersonalityTraits {
    /// Willingness to take risky actions.
    pub risk_tolerance: f32,
    /// Preference for interacting with other players.
    pub sociability: f32,
    /// Tolerance for repetitive, slow-payoff work.
    pub patience: f32,
    /// Drive to accumulate wealth.
    pub greed: f32,
    /// Inclination toward combat.
    pub aggression: f32,
    /// Attachment to groups and allies.
    pub loyalty: f32,
    /// Drive to try new things and places.
    pub curiosity: f32,
}

impl PersonalityTraits {
    /// Create a trait vector, clamping every value to [0, 1].
    #[must_use]
    pub fn new(
        risk_tolerance: f32,
        sociability: f32,
        patience: f32,
        greed: f32,
        aggression: f32,
        loyalty: f32,
        curiosity: f32,
    ) -> Self {
        Self {
            risk_tolerance: risk_tolerance.clamp(0.0, 1.0),
            sociability: sociability.clamp(0.0, 1.0),
            patience: patience.clamp(0.0, 1.0),
            greed: greed.clamp(0.0, 1.0),
            aggression: aggression.clamp(0.0, 1.0),
            loyalty: loyalty.clamp(0.0, 1.0),
            curiosity: curiosity.clamp(0.0, 1.0),
        }
    }

    /// Apply `f` to every trait and clamp the result to [0, 1].
    #[must_use]
    fn map(self, mut f: impl FnMut(f32) -> f32) -> Self {
        Self::new(
            f(self.risk_tolerance),
            f(self.sociability),
            f(self.patience),
            f(self.greed),
            f(self.aggression),
            f(self.loyalty),
            f(self.curiosity),
        )
    }
}

impl Default for PersonalityTraits {
    fn default() -> Self {
        Self::new(0.5, 0.5, 0.5, 0.5, 0.5, 0.5, 0.5)
    }
}

// ---------------------------------------------------------------------------
// Archetypes
// ---------------------------------------------------------------------------

/// The eight registered archetypes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Archetype {
    /// Levels and trains methodically.
    Grinder,
    /// Seeks friends, parties and groups.
    Social,
    /// Travels and discovers.
    Explorer,
    /// Fights whenever possible.
    Combat,
    /// Trades and invests.
    Economist,
    /// Steals, robs and runs with gangs.
    Criminal,
    /// Plays a character through quests and dialogue.
    Roleplayer,
    /// Picks actions at random.
    Chaos,
}

impl Archetype {
    /// Every archetype in registry order.
    pub const ALL: [Self; 8] = [
        Self::Grinder,
        Self::Social,
        Self::Explorer,
        Self::Combat,
        Self::Economist,
        Self::Criminal,
        Self::Roleplayer,
        Self::Chaos,
    ];

    /// Registry id.
    #[must_use]
    pub fn id(self) -> &'static str {
        match self {
            Self::Grinder => "grinder",
            Self::Social => "social",
            Self::Explorer => "explorer",
            Self::Combat => "combat",
            Self::Economist => "economist",
            Self::Criminal => "criminal",
            Self::Roleplayer => "roleplayer",
            Self::Chaos => "chaos",
        }
    }

    /// Goal kinds a fresh bot of this archetype starts with.
    #[must_use]
    pub fn starter_goals(self) -> &'static [crate::goals::GoalType] {
        crate::goals::templates::starter_goal_types(self)
    }
}

impl fmt::Display for Archetype {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.id())
    }
}

impl FromStr for Archetype {
    type Err = BotError;

    fn from_str(s: &str) -> Result<Self> {
        let wanted = s.trim().to_lowercase();
        Self::ALL
            .into_iter()
            .find(|a| a.id() == wanted)
            .ok_or_else(|| BotError::UnknownArchetype(s.to_string()))
    }
}

/// High-level playstyle tag.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Playstyle {
    /// Steady, repetitive progress.
    Methodical,
    /// Group-oriented.
    Social,
    /// Novelty-seeking.
    Adventurous,
    /// Confrontational.
    Aggressive,
    /// Long-horizon optimizer.
    Strategic,
    /// Takes chances when they appear.
    Opportunistic,
    /// Story-driven.
    Immersive,
    /// Unpredictable.
    Chaotic,
}

/// A complete personality: archetype, traits and activity preferences.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PersonalityProfile {
    /// Archetype this profile was built from.
    pub archetype: Archetype,
    /// Display name.
    pub name: String,
    /// One-line description.
    pub description: String,
    /// Trait vector.
    pub traits: PersonalityTraits,
    /// Activity keywords this personality favors.
    pub preferred_activities: Vec<String>,
    /// Activity keywords this personality avoids.
    pub avoided_activities: Vec<String>,
    /// Playstyle tag.
    pub playstyle: Playstyle,
}

fn labels(words: &[&str]) -> Vec<String> {
    words.iter().map(|w| (*w).to_string()).collect()
}

/// Build the registry template for an archetype.
#[must_use]
pub fn archetype_profile(archetype: Archetype) -> PersonalityProfile {
    let (name, description, traits, preferred, avoided, playstyle) = match archetype {
        Archetype::Grinder => (
            "The Grinder",
            "Levels up through steady, repetitive work",
            PersonalityTraits::new(0.3, 0.3, 0.9, 0.6, 0.4, 0.6, 0.1),
            labels(&["train", "work", "grind", "quest"]),
            labels(&["chat", "party"]),
            Playstyle::Methodical,
        ),
        Archetype::Social => (
            "The Socialite",
            "Builds friendships and joins groups",
            PersonalityTraits::new(0.4, 0.9, 0.6, 0.3, 0.2, 0.8, 0.5),
            labels(&["chat", "friend", "party", "message", "gang"]),
            labels(&["crime", "attack"]),
            Playstyle::Social,
        ),
        Archetype::Explorer => (
            "The Explorer",
            "Travels everywhere and tries everything once",
            PersonalityTraits::new(0.6, 0.5, 0.4, 0.3, 0.3, 0.4, 0.95),
            labels(&["explore", "travel", "visit", "discover"]),
            labels(&["grind", "work"]),
            Playstyle::Adventurous,
        ),
        Archetype::Combat => (
            "The Fighter",
            "Seeks out fights and duels",
            PersonalityTraits::new(0.8, 0.3, 0.4, 0.4, 0.9, 0.5, 0.4),
            labels(&["fight", "attack", "duel", "pvp", "train"]),
            labels(&["trade", "chat"]),
            Playstyle::Aggressive,
        ),
        Archetype::Economist => (
            "The Economist",
            "Trades, invests and accumulates wealth",
            PersonalityTraits::new(0.4, 0.5, 0.8, 0.95, 0.2, 0.5, 0.3),
            labels(&["trade", "buy", "sell", "invest", "market", "work"]),
            labels(&["fight", "crime"]),
            Playstyle::Strategic,
        ),
        Archetype::Criminal => (
            "The Criminal",
            "Steals, robs and runs with gangs",
            PersonalityTraits::new(0.9, 0.4, 0.3, 0.8, 0.7, 0.3, 0.5),
            labels(&["crime", "steal", "rob", "heist", "gang"]),
            labels(&["work", "job"]),
            Playstyle::Opportunistic,
        ),
        Archetype::Roleplayer => (
            "The Roleplayer",
            "Follows stories, quests and conversations",
            PersonalityTraits::new(0.5, 0.8, 0.7, 0.3, 0.3, 0.7, 0.6),
            labels(&["quest", "chat", "explore", "social"]),
            labels(&["grind"]),
            Playstyle::Immersive,
        ),
        Archetype::Chaos => (
            "The Agent of Chaos",
            "Does whatever, whenever",
            PersonalityTraits::new(0.95, 0.5, 0.1, 0.5, 0.6, 0.1, 0.9),
            Vec::new(),
            Vec::new(),
            Playstyle::Chaotic,
        ),
    };

    PersonalityProfile {
        archetype,
        name: name.to_string(),
        description: description.to_string(),
        traits,
        preferred_activities: preferred,
        avoided_activities: avoided,
        playstyle,
    }
}

/// Look up an archetype by id and return a fresh copy of its profile.
///
/// # Errors
/// Returns [`BotError::UnknownArchetype`] if `archetype_id` is not registered.
pub fn create_profile(archetype_id: &str) -> Result<PersonalityProfile> {
    let archetype: Archetype = archetype_id.parse()?;
    Ok(archetype_profile(archetype))
}

/// Like [`create_profile`], but every trait is jittered by uniform noise in
/// [-0.1, 0.1] and clamped to [0, 1].
///
/// # Errors
/// Returns [`BotError::UnknownArchetype`] if `archetype_id` is not registered.
pub fn create_variant<R: Rng + ?Sized>(
    archetype_id: &str,
    rng: &mut R,
) -> Result<PersonalityProfile> {
    let mut profile = create_profile(archetype_id)?;
    profile.traits = profile.traits.map(|t| t + rng.gen_range(-0.1..=0.1));
    Ok(profile)
}

/// All registered archetype profiles, in registry order.
#[must_use]
pub fn all_archetypes() -> Vec<PersonalityProfile> {
    Archetype::ALL.into_iter().map(archetype_profile).collect()
}

// ---------------------------------------------------------------------------
// Label weighting
// ---------------------------------------------------------------------------

const COMBAT_WORDS: &[&str] = &["fight", "attack", "combat", "duel", "pvp", "hunt"];
const SOCIAL_WORDS: &[&str] = &["chat", "social", "friend", "message", "party"];
const GRIND_WORDS: &[&str] = &["train", "work", "grind", "job", "farm", "practice"];
const EXPLORE_WORDS: &[&str] = &["explore", "travel", "visit", "discover"];
const CRIME_WORDS: &[&str] = &["crime", "steal", "rob", "heist", "smuggle"];
const TRADE_WORDS: &[&str] = &["trade", "buy", "sell", "market", "invest"];
const GANG_WORDS: &[&str] = &["gang", "crew", "faction"];

fn mentions(label: &str, words: &[&str]) -> bool {
    words.iter().any(|w| label.contains(w))
}

/// Trait-weighted multiplier for a free-text action label.
///
/// Each keyword group the label mentions contributes one factor; factors
/// compose multiplicatively and the product is clamped to [0.5, 2.0].
/// A label matching no group yields 1.0.
#[must_use]
pub fn action_multiplier(label: &str, traits: &PersonalityTraits) -> f32 {
    let label = label.to_lowercase();
    let mut multiplier = 1.0_f32;

    if mentions(&label, COMBAT_WORDS) {
        multiplier *= 1.0 + (traits.aggression - 0.5) + (traits.risk_tolerance - 0.5) * 0.5;
    }
    if mentions(&label, SOCIAL_WORDS) {
        multiplier *= 1.0 + (traits.sociability - 0.5);
    }
    if mentions(&label, GRIND_WORDS) {
        multiplier *= 1.0 + (traits.patience - 0.5);
    }
    if mentions(&label, EXPLORE_WORDS) {
        multiplier *= 1.0 + (traits.curiosity - 0.5);
    }
    if mentions(&label, CRIME_WORDS) {
        multiplier *= 1.0 + (traits.risk_tolerance - 0.5) + (0.5 - traits.loyalty) * 0.5;
    }
    if mentions(&label, TRADE_WORDS) {
        multiplier *= 1.0 + (traits.greed - 0.5);
    }
    if mentions(&label, GANG_WORDS) {
        multiplier *= 1.0 + (traits.loyalty - 0.5) * 0.8 + (traits.sociability - 0.5) * 0.4;
    }

    multiplier.clamp(0.5, 2.0)
}

/// How an action label relates to a profile's stated preferences.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PreferenceMatch {
    /// Label mentions a preferred activity.
    Preferred,
    /// Label mentions an avoided activity (and no preferred one).
    Avoided,
    /// Neither.
    Neutral,
}

impl PreferenceMatch {
    /// Score multiplier applied by the decision engine.
    #[must_use]
    pub fn multiplier(self) -> f32 {
        match self {
            Self::Preferred => 1.5,
            Self::Avoided => 0.3,
            Self::Neutral => 1.0,
        }
    }
}

/// Classify `label` against a profile's preferences. Preferred wins ties.
#[must_use]
pub fn match_preference(label: &str, profile: &PersonalityProfile) -> PreferenceMatch {
    let label = label.to_lowercase();
    let hit = |list: &[String]| list.iter().any(|p| label.contains(&p.to_lowercase()));

    if hit(&profile.preferred_activities) {
        PreferenceMatch::Preferred
    } else if hit(&profile.avoided_activities) {
        PreferenceMatch::Avoided
    } else {
        PreferenceMatch::Neutral
    }
}
