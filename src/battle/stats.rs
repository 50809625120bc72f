//! Effective-stat selection and the accuracy roll.

use crate::battle::state::BattleRng;
use crate::creature::Creature;
use schema::{DamageClass, MoveData, StatType};

/// Effective offensive stat for a move: Attack for physical, Special Attack
/// for special. Status moves have no offense; callers never ask for one.
pub fn effective_offense(attacker: &Creature, move_data: &MoveData) -> u16 {
    match move_data.class {
        DamageClass::Physical => attacker.effective_stat(StatType::Attack),
        DamageClass::Special => attacker.effective_stat(StatType::SpecialAttack),
        DamageClass::Status => 0,
    }
}

/// Effective defensive stat the move is resolved against.
pub fn effective_defense(defender: &Creature, move_data: &MoveData) -> u16 {
    match move_data.class {
        DamageClass::Physical => defender.effective_stat(StatType::Defense),
        DamageClass::Special => defender.effective_stat(StatType::SpecialDefense),
        DamageClass::Status => 0,
    }
}

/// Accuracy check: uniform draw in [1, 100] against the move's accuracy.
/// Moves without an accuracy value never miss.
pub fn move_hits(move_data: &MoveData, rng: &mut BattleRng) -> bool {
    let Some(accuracy) = move_data.accuracy else {
        return true;
    };
    rng.roll("accuracy check") <= accuracy
}
