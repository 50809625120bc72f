//! Battle-time creature state: stats, HP, status conditions, stat stages,
//! multi-turn move state, and the owned move list.

use schema::{BaseStats, CreatureType, MoveData, SpeciesData, StatType};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::fmt;

/// Major status conditions. A creature holds at most one of these at a time;
/// flinching is deliberately NOT part of this enum; it is a transient
/// single-turn flag that coexists with any major status.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum StatusCondition {
    Poison,
    Burn,
    Paralysis,
    /// Turns remaining asleep; auto-clears when the counter hits 0.
    Sleep(u8),
    Freeze,
}

impl fmt::Display for StatusCondition {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            StatusCondition::Poison => write!(f, "poison"),
            StatusCondition::Burn => write!(f, "burn"),
            StatusCondition::Paralysis => write!(f, "paralysis"),
            StatusCondition::Sleep(_) => write!(f, "sleep"),
            StatusCondition::Freeze => write!(f, "freeze"),
        }
    }
}

/// Multi-turn move state. One tagged value instead of independent
/// charging/recharging booleans, so the invalid combination cannot exist.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
pub enum MultiTurnState {
    #[default]
    Ready,
    /// Spent this turn charging; the stored move executes next turn.
    Charging { move_index: usize },
    /// The next turn is forcibly skipped, then back to `Ready`.
    Recharging,
}

/// A move slot: the move's static data plus its remaining PP.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MoveInstance {
    pub data: MoveData,
    pub pp: u8,
}

impl MoveInstance {
    pub fn new(data: MoveData) -> Self {
        let pp = data.pp;
        MoveInstance { data, pp }
    }

    pub fn max_pp(&self) -> u8 {
        self.data.pp
    }

    /// Spend one PP. Returns false if the move was already exhausted.
    pub fn use_move(&mut self) -> bool {
        if self.pp > 0 {
            self.pp -= 1;
            true
        } else {
            false
        }
    }

    pub fn restore_pp(&mut self, amount: u8) {
        self.pp = self.pp.saturating_add(amount).min(self.max_pp());
    }
}

/// What happened during a creature's end-of-turn status tick.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct StatusTickOutcome {
    /// Chip damage dealt by poison or burn (0 if none).
    pub damage: u16,
    /// Status that wore off this tick, if any.
    pub cured: Option<StatusCondition>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Creature {
    pub name: String,
    pub types: Vec<CreatureType>,
    stats: BaseStats,
    current_hp: u16,
    pub status: Option<StatusCondition>,
    /// Transient one-turn flag, orthogonal to the major status.
    pub flinched: bool,
    stat_stages: HashMap<StatType, i8>,
    pub multi_turn: MultiTurnState,
    pub moves: Vec<MoveInstance>,
}

impl Creature {
    /// Build a battle-ready creature from provider data, at full HP.
    pub fn from_species(species: &SpeciesData, moves: Vec<MoveData>) -> Self {
        Creature {
            name: species.name.clone(),
            types: species.types.clone(),
            stats: species.base_stats,
            current_hp: species.base_stats.hp,
            status: None,
            flinched: false,
            stat_stages: HashMap::new(),
            multi_turn: MultiTurnState::Ready,
            moves: moves.into_iter().map(MoveInstance::new).collect(),
        }
    }

    // === HP ===

    pub fn max_hp(&self) -> u16 {
        self.stats.hp
    }

    pub fn current_hp(&self) -> u16 {
        self.current_hp
    }

    /// Fainted is derived, never stored: `current_hp == 0` IS fainted.
    pub fn is_fainted(&self) -> bool {
        self.current_hp == 0
    }

    /// Apply damage, flooring HP at 0. Returns the damage actually dealt.
    pub fn take_damage(&mut self, amount: u16) -> u16 {
        let dealt = amount.min(self.current_hp);
        self.current_hp -= dealt;
        dealt
    }

    /// Restore HP, capped at max. Returns the amount actually healed.
    pub fn heal(&mut self, amount: u16) -> u16 {
        let healed = amount.min(self.max_hp() - self.current_hp);
        self.current_hp += healed;
        healed
    }

    #[cfg(test)]
    pub fn set_hp(&mut self, hp: u16) {
        self.current_hp = hp.min(self.max_hp());
    }

    // === Status ===

    pub fn has_status(&self) -> bool {
        self.status.is_some()
    }

    /// Apply a major status. Succeeds only when the creature has no status or
    /// already has this exact one. (Flinch is applied via `set_flinched` and
    /// never competes with a major status.)
    pub fn apply_status(&mut self, new: StatusCondition) -> bool {
        match self.status {
            None => {
                self.status = Some(new);
                true
            }
            Some(current) => {
                std::mem::discriminant(&current) == std::mem::discriminant(&new)
            }
        }
    }

    /// Remove the major status, resetting any duration counter with it.
    pub fn clear_status(&mut self) -> Option<StatusCondition> {
        self.status.take()
    }

    pub fn set_flinched(&mut self) {
        self.flinched = true;
    }

    /// Consume the flinch flag, reporting whether it was set.
    pub fn take_flinch(&mut self) -> bool {
        std::mem::take(&mut self.flinched)
    }

    /// One end-of-turn status tick: poison/burn chip damage, sleep countdown
    /// with auto-wake, freeze thaw. The caller draws the 20% thaw outcome
    /// from the battle's RNG handle (it is only consulted while frozen).
    pub fn process_status(&mut self, thawed: bool) -> StatusTickOutcome {
        let mut outcome = StatusTickOutcome {
            damage: 0,
            cured: None,
        };

        match self.status {
            Some(StatusCondition::Poison) => {
                outcome.damage = self.take_damage((self.max_hp() / 8).max(1));
            }
            Some(StatusCondition::Burn) => {
                outcome.damage = self.take_damage((self.max_hp() / 16).max(1));
            }
            Some(StatusCondition::Sleep(turns)) => {
                let remaining = turns.saturating_sub(1);
                if remaining == 0 {
                    outcome.cured = self.clear_status();
                } else {
                    self.status = Some(StatusCondition::Sleep(remaining));
                }
            }
            Some(StatusCondition::Freeze) => {
                if thawed {
                    outcome.cured = self.clear_status();
                }
            }
            Some(StatusCondition::Paralysis) | None => {}
        }

        outcome
    }

    // === Stat stages ===

    pub fn stat_stage(&self, stat: StatType) -> i8 {
        self.stat_stages.get(&stat).copied().unwrap_or(0)
    }

    /// Shift a stage by `delta`, clamping to [-6, +6].
    /// Returns (old, new); equal values mean the change was fully absorbed
    /// by the clamp.
    pub fn modify_stat_stage(&mut self, stat: StatType, delta: i8) -> (i8, i8) {
        let old = self.stat_stage(stat);
        let new = (old + delta).clamp(-6, 6);
        if new == 0 {
            self.stat_stages.remove(&stat);
        } else {
            self.stat_stages.insert(stat, new);
        }
        (old, new)
    }

    pub fn clear_stat_stages(&mut self) {
        self.stat_stages.clear();
    }

    /// Effective value of a stat: stage multiplier first, then the status
    /// multiplier (Burn halves Attack, Paralysis halves Speed).
    pub fn effective_stat(&self, stat: StatType) -> u16 {
        let base = match stat {
            StatType::Attack => self.stats.attack,
            StatType::Defense => self.stats.defense,
            StatType::SpecialAttack => self.stats.special_attack,
            StatType::SpecialDefense => self.stats.special_defense,
            StatType::Speed => self.stats.speed,
        };

        let staged = apply_stage_multiplier(base, self.stat_stage(stat));

        match (stat, self.status) {
            (StatType::Attack, Some(StatusCondition::Burn)) => staged / 2,
            (StatType::Speed, Some(StatusCondition::Paralysis)) => staged / 2,
            _ => staged,
        }
    }

    pub fn effective_speed(&self) -> u16 {
        self.effective_stat(StatType::Speed)
    }

    // === Multi-turn state ===

    pub fn start_charging(&mut self, move_index: usize) {
        self.multi_turn = MultiTurnState::Charging { move_index };
    }

    pub fn finish_charging(&mut self) {
        self.multi_turn = MultiTurnState::Ready;
    }

    pub fn start_recharge(&mut self) {
        self.multi_turn = MultiTurnState::Recharging;
    }

    pub fn is_charging(&self) -> bool {
        matches!(self.multi_turn, MultiTurnState::Charging { .. })
    }

    pub fn is_recharging(&self) -> bool {
        self.multi_turn == MultiTurnState::Recharging
    }

    // === Moves ===

    pub fn move_at(&self, index: usize) -> Option<&MoveInstance> {
        self.moves.get(index)
    }

    pub fn has_usable_move(&self) -> bool {
        self.moves.iter().any(|m| m.pp > 0)
    }

    /// Indices of moves that still have PP.
    pub fn usable_move_indices(&self) -> Vec<usize> {
        self.moves
            .iter()
            .enumerate()
            .filter(|(_, m)| m.pp > 0)
            .map(|(i, _)| i)
            .collect()
    }

    /// Reset everything that does not survive leaving the field: stat stages,
    /// multi-turn state, and the flinch flag. Major status persists.
    pub fn reset_volatile_state(&mut self) {
        self.stat_stages.clear();
        self.multi_turn = MultiTurnState::Ready;
        self.flinched = false;
    }
}

/// Standard per-stage multiplier: +s => (2+s)/2, -s => 2/(2+s).
fn apply_stage_multiplier(base: u16, stage: i8) -> u16 {
    let stage = stage.clamp(-6, 6);
    if stage == 0 {
        return base;
    }
    let multiplier = if stage < 0 {
        2.0 / (2.0 + (-stage) as f64)
    } else {
        (2.0 + stage as f64) / 2.0
    };
    ((base as f64) * multiplier).round() as u16
}
