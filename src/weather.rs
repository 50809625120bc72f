//! Battlefield weather: pure multiplier, immunity, and chip-damage lookups.
//!
//! The `Weather` value and its turn counter are owned by the battle state;
//! everything here is a stateless function of that value.

use schema::CreatureType;
use serde::{Deserialize, Serialize};
use std::fmt;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
pub enum Weather {
    #[default]
    None,
    Rain,
    Sun,
    Sandstorm,
    Hail,
}

impl Weather {
    /// Damage multiplier this weather applies to a move of the given type.
    pub fn damage_multiplier(self, move_type: CreatureType) -> f64 {
        match (self, move_type) {
            (Weather::Rain, CreatureType::Water) => 1.5,
            (Weather::Rain, CreatureType::Fire) => 0.5,
            (Weather::Sun, CreatureType::Fire) => 1.5,
            (Weather::Sun, CreatureType::Water) => 0.5,
            _ => 1.0,
        }
    }

    /// Whether a creature with the given types takes no chip damage from this
    /// weather. Rock, Ground and Steel shrug off sandstorms; Ice shrugs off
    /// hail.
    pub fn is_immune(self, creature_types: &[CreatureType]) -> bool {
        match self {
            Weather::Sandstorm => creature_types.iter().any(|t| {
                matches!(
                    t,
                    CreatureType::Rock | CreatureType::Ground | CreatureType::Steel
                )
            }),
            Weather::Hail => creature_types.contains(&CreatureType::Ice),
            _ => true,
        }
    }

    /// End-of-turn chip damage for a non-immune creature with the given max HP.
    pub fn periodic_damage(self, max_hp: u16) -> u16 {
        match self {
            Weather::Sandstorm | Weather::Hail => (max_hp / 16).max(1),
            _ => 0,
        }
    }
}

impl fmt::Display for Weather {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Weather::None => write!(f, "clear skies"),
            Weather::Rain => write!(f, "rain"),
            Weather::Sun => write!(f, "harsh sunlight"),
            Weather::Sandstorm => write!(f, "a sandstorm"),
            Weather::Hail => write!(f, "hail"),
        }
    }
}
