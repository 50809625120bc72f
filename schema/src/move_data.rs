use serde::{Deserialize, Serialize};
use std::fmt;

use crate::creature_types::CreatureType;

/// Which stat pair a damaging move is resolved against.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Hash)]
pub enum DamageClass {
    /// Attack vs. Defense
    Physical,
    /// Special Attack vs. Special Defense
    Special,
    /// No direct damage; only effects apply
    Status,
}

/// Multi-turn execution pattern of a move.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
pub enum MultiTurnBehavior {
    #[default]
    None,
    /// Spends one turn charging, executes on the next.
    Charge,
    /// Charges like `Charge` but also raises the user's Defense by one stage
    /// while preparing.
    ChargeBoost,
    /// Executes immediately, then forces an idle recharge turn.
    Recharge,
}

/// Status ailments a move can inflict on its target.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Hash)]
pub enum AilmentKind {
    Poison,
    Burn,
    Paralysis,
    Sleep,
    Freeze,
    Flinch,
}

impl fmt::Display for AilmentKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:?}", self)
    }
}

/// An ailment paired with its per-hit application chance (0-100).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Ailment {
    pub kind: AilmentKind,
    pub chance: u8,
}

/// Static definition of a move, as delivered by a data provider.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MoveData {
    pub name: String,
    pub move_type: CreatureType,
    pub class: DamageClass,
    /// `None` means the move deals no direct damage.
    pub power: Option<u16>,
    /// `None` means the move never misses.
    pub accuracy: Option<u8>,
    /// Higher priority moves act earlier regardless of speed.
    pub priority: i8,
    /// Maximum PP.
    pub pp: u8,
    /// Uses the boosted 1/8 critical rate instead of the base 1/16.
    pub high_crit: bool,
    pub ailment: Option<Ailment>,
    /// Percent of dealt damage returned to the user. Negative values are
    /// recoil taken by the user instead.
    pub drain_percent: i8,
    /// Percent of the user's max HP restored on a successful use.
    pub healing_percent: u8,
    /// Inclusive range of hits per use; (1, 1) for ordinary moves.
    pub hits: (u8, u8),
    pub multi_turn: MultiTurnBehavior,
    /// Charge moves with this flag skip their charge turn in harsh sunlight.
    pub weather_dependent: bool,
}

impl MoveData {
    /// A plain single-hit damaging move with default metadata. Convenient
    /// base for builders and tests; real data comes from a provider.
    pub fn simple(name: &str, move_type: CreatureType, class: DamageClass, power: u16) -> Self {
        MoveData {
            name: name.to_string(),
            move_type,
            class,
            power: Some(power),
            accuracy: Some(100),
            priority: 0,
            pp: 20,
            high_crit: false,
            ailment: None,
            drain_percent: 0,
            healing_percent: 0,
            hits: (1, 1),
            multi_turn: MultiTurnBehavior::None,
            weather_dependent: false,
        }
    }

    pub fn is_damaging(&self) -> bool {
        matches!(self.power, Some(p) if p > 0) && self.class != DamageClass::Status
    }
}
