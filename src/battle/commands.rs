//! Atomic state-change commands and their executor.
//!
//! Calculators stay pure by returning `BattleCommand` lists; the executor is
//! the single place where battle state actually mutates and where the
//! corresponding events are emitted.

use crate::battle::engine::BattleAction;
use crate::battle::state::{
    BattleEvent, BattleState, DamageSource, EventBus, GameState,
};
use crate::creature::{MultiTurnState, StatusCondition};
use crate::weather::Weather;
use schema::StatType;

/// Side target for commands - type safety over raw indices.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SideTarget {
    Side1,
    Side2,
}

impl SideTarget {
    pub fn to_index(self) -> usize {
        match self {
            SideTarget::Side1 => 0,
            SideTarget::Side2 => 1,
        }
    }

    pub fn opponent(self) -> SideTarget {
        match self {
            SideTarget::Side1 => SideTarget::Side2,
            SideTarget::Side2 => SideTarget::Side1,
        }
    }

    pub fn from_index(index: usize) -> SideTarget {
        match index {
            0 => SideTarget::Side1,
            1 => SideTarget::Side2,
            _ => panic!("Invalid side index: {}", index),
        }
    }
}

/// Atomic commands representing final state changes.
#[derive(Debug, Clone)]
pub enum BattleCommand {
    // Battle flow
    SetGameState(GameState),
    IncrementTurnNumber,
    ClearActionQueue,

    // Creature modifications (always aimed at a side's active creature)
    DealDamage {
        target: SideTarget,
        amount: u16,
        source: DamageSource,
    },
    HealCreature {
        target: SideTarget,
        amount: u16,
        source: DamageSource,
    },
    SetStatus {
        target: SideTarget,
        status: StatusCondition,
    },
    ClearStatus {
        target: SideTarget,
    },
    SetFlinched {
        target: SideTarget,
    },
    ChangeStatStage {
        target: SideTarget,
        stat: StatType,
        delta: i8,
    },
    SetMultiTurnState {
        target: SideTarget,
        state: MultiTurnState,
    },
    SpendPP {
        target: SideTarget,
        move_index: usize,
    },
    SetLastMove {
        target: SideTarget,
        move_index: usize,
    },

    // Field
    SetWeather {
        weather: Weather,
        turns: Option<u8>,
    },

    // Flow control
    EmitEvent(BattleEvent),
    PushAction(BattleAction),
}

/// Error types for command execution
#[derive(Debug, PartialEq, Eq)]
pub enum ExecutionError {
    NoActiveCreature,
    InvalidMoveIndex,
}

/// Action stack interface the executor needs; the concrete stack lives in
/// the engine module.
pub fn execute_command_batch(
    commands: Vec<BattleCommand>,
    state: &mut BattleState,
    bus: &mut EventBus,
    pending: &mut Vec<BattleAction>,
) -> Result<(), ExecutionError> {
    for command in commands {
        execute_command(command, state, bus, pending)?;
    }
    Ok(())
}

pub fn execute_command(
    command: BattleCommand,
    state: &mut BattleState,
    bus: &mut EventBus,
    pending: &mut Vec<BattleAction>,
) -> Result<(), ExecutionError> {
    match command {
        BattleCommand::SetGameState(new_state) => {
            state.game_state = new_state;
        }
        BattleCommand::IncrementTurnNumber => {
            state.turn_number += 1;
        }
        BattleCommand::ClearActionQueue => {
            state.action_queue = [None, None];
        }

        BattleCommand::DealDamage {
            target,
            amount,
            source,
        } => {
            let side_index = target.to_index();
            let creature = state.sides[side_index]
                .active_mut()
                .ok_or(ExecutionError::NoActiveCreature)?;
            let old_hp = creature.current_hp();
            let dealt = creature.take_damage(amount);
            let new_hp = creature.current_hp();
            let name = creature.name.clone();
            let fainted = creature.is_fainted();

            bus.push(BattleEvent::HealthChanged {
                creature: name.clone(),
                old_hp,
                new_hp,
                delta: -(dealt as i32),
                source,
            });
            if fainted {
                bus.push(BattleEvent::CreatureFainted {
                    side_index,
                    creature: name,
                });
            }
        }

        BattleCommand::HealCreature {
            target,
            amount,
            source,
        } => {
            let creature = state.sides[target.to_index()]
                .active_mut()
                .ok_or(ExecutionError::NoActiveCreature)?;
            let old_hp = creature.current_hp();
            let healed = creature.heal(amount);
            if healed > 0 {
                bus.push(BattleEvent::HealthChanged {
                    creature: creature.name.clone(),
                    old_hp,
                    new_hp: creature.current_hp(),
                    delta: healed as i32,
                    source,
                });
            }
        }

        BattleCommand::SetStatus { target, status } => {
            let creature = state.sides[target.to_index()]
                .active_mut()
                .ok_or(ExecutionError::NoActiveCreature)?;
            let old = creature.status;
            if creature.apply_status(status) && old.is_none() {
                let turns_remaining = match status {
                    StatusCondition::Sleep(turns) => turns,
                    _ => 0,
                };
                bus.push(BattleEvent::StatusChanged {
                    creature: creature.name.clone(),
                    old,
                    new: creature.status,
                    turns_remaining,
                    source: DamageSource::Move,
                });
            }
        }

        BattleCommand::ClearStatus { target } => {
            let creature = state.sides[target.to_index()]
                .active_mut()
                .ok_or(ExecutionError::NoActiveCreature)?;
            if let Some(old) = creature.clear_status() {
                bus.push(BattleEvent::StatusChanged {
                    creature: creature.name.clone(),
                    old: Some(old),
                    new: None,
                    turns_remaining: 0,
                    source: DamageSource::Move,
                });
            }
        }

        BattleCommand::SetFlinched { target } => {
            let creature = state.sides[target.to_index()]
                .active_mut()
                .ok_or(ExecutionError::NoActiveCreature)?;
            creature.set_flinched();
            bus.push(BattleEvent::CreatureFlinched {
                creature: creature.name.clone(),
            });
        }

        BattleCommand::ChangeStatStage {
            target,
            stat,
            delta,
        } => {
            let creature = state.sides[target.to_index()]
                .active_mut()
                .ok_or(ExecutionError::NoActiveCreature)?;
            let (old_stage, new_stage) = creature.modify_stat_stage(stat, delta);
            if old_stage != new_stage {
                bus.push(BattleEvent::StatStageChanged {
                    creature: creature.name.clone(),
                    stat,
                    old_stage,
                    new_stage,
                });
            }
        }

        BattleCommand::SetMultiTurnState { target, state: mt } => {
            let creature = state.sides[target.to_index()]
                .active_mut()
                .ok_or(ExecutionError::NoActiveCreature)?;
            creature.multi_turn = mt;
        }

        BattleCommand::SpendPP { target, move_index } => {
            let creature = state.sides[target.to_index()]
                .active_mut()
                .ok_or(ExecutionError::NoActiveCreature)?;
            let slot = creature
                .moves
                .get_mut(move_index)
                .ok_or(ExecutionError::InvalidMoveIndex)?;
            slot.use_move();
        }

        BattleCommand::SetLastMove { target, move_index } => {
            state.sides[target.to_index()].last_move_index = Some(move_index);
        }

        BattleCommand::SetWeather { weather, turns } => {
            let old = state.weather;
            state.weather = weather;
            state.weather_turns_remaining = turns;
            if old != weather {
                bus.push(BattleEvent::WeatherChanged {
                    old,
                    new: weather,
                    turns_remaining: turns,
                });
            }
        }

        BattleCommand::EmitEvent(event) => {
            bus.push(event);
        }

        BattleCommand::PushAction(action) => {
            pending.push(action);
        }
    }

    Ok(())
}
