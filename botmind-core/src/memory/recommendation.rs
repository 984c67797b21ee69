//! Situational advice derived from learned patterns.

use std::fmt;

use serde::{Deserialize, Serialize};

use crate::types::TimeOfDay;

/// Advice for the current situation.
///
/// `Display` renders the stable snake-case label used in logs and by
/// callers that match on strings.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum Recommendation {
    /// Combat at low health has mostly failed.
    AvoidCombatLowHealth,
    /// Acting at low energy has mostly failed.
    RestLowEnergy,
    /// An action type does well at this time of day.
    Focus {
        /// The action type to favor.
        action_type: String,
        /// The time bucket it does well in.
        time: TimeOfDay,
    },
    /// The last two actions opened a combo that usually pays off.
    CompleteCombo {
        /// The full sequence.
        sequence: Vec<String>,
    },
    /// Combat goes clearly better with gear equipped.
    EquipGearBeforeCombat,
}

impl Recommendation {
    /// The action type this advice points at, if it names one.
    #[must_use]
    pub fn suggested_action(&self) -> Option<&str> {
        match self {
            Self::Focus { action_type, .. } => Some(action_type.as_str()),
            Self::CompleteCombo { sequence } => sequence.last().map(String::as_str),
            _ => None,
        }
    }
}

impl fmt::Display for Recommendation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::AvoidCombatLowHealth => f.write_str("avoid_combat_low_health"),
            Self::RestLowEnergy => f.write_str("rest_low_energy"),
            Self::Focus { action_type, time } => write!(f, "focus_{action_type}_{time}"),
            Self::CompleteCombo { sequence } => {
                write!(f, "complete_combo_{}", sequence.join("->"))
            }
            Self::EquipGearBeforeCombat => f.write_str("equip_gear_before_combat"),
        }
    }
}
