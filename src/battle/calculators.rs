//! Pure move-resolution pipeline.
//!
//! Given the current state and an RNG, produce the command list for one move
//! use. Nothing here mutates state; the engine executes the returned commands.

use crate::battle::commands::{BattleCommand, SideTarget};
use crate::battle::stats::{effective_defense, effective_offense, move_hits};
use crate::battle::state::{
    BattleEvent, BattleRng, BattleState, DamageSource, EffectivenessTier,
};
use crate::creature::{Creature, StatusCondition};
use crate::type_chart::effectiveness_against;
use schema::{AilmentKind, MoveData};

const STAB_MULTIPLIER: f64 = 1.5;
const CRIT_MULTIPLIER: f64 = 2.0;

/// Resolve one use of `move_data` by the attacker's active creature against
/// the opposing active creature.
///
/// Assumes the engine has already handled action prevention (sleep, freeze,
/// paralysis, flinch, recharge) and multi-turn charging, and that both sides
/// have an active creature on the field.
pub fn calculate_attack_outcome(
    state: &BattleState,
    attacker: SideTarget,
    move_data: &MoveData,
    rng: &mut BattleRng,
) -> Vec<BattleCommand> {
    let defender = attacker.opponent();
    let (Some(user), Some(target)) = (
        state.sides[attacker.to_index()].active(),
        state.sides[defender.to_index()].active(),
    ) else {
        return Vec::new();
    };

    let mut commands = Vec::new();

    // Non-damaging moves resolve before the accuracy gate and cannot miss;
    // any accuracy rating on them is inert.
    if !move_data.is_damaging() {
        resolve_status_move(user, target, attacker, defender, move_data, rng, &mut commands);
        return commands;
    }

    if !move_hits(move_data, rng) {
        commands.push(BattleCommand::EmitEvent(BattleEvent::MoveUsed {
            side_index: attacker.to_index(),
            user: user.name.clone(),
            move_name: move_data.name.clone(),
            target: target.name.clone(),
            success: false,
            critical: false,
            effectiveness: EffectivenessTier::Neutral,
        }));
        return commands;
    }

    let type_multiplier = effectiveness_against(move_data.move_type, &target.types);
    if type_multiplier == 0.0 {
        commands.push(BattleCommand::EmitEvent(BattleEvent::MoveUsed {
            side_index: attacker.to_index(),
            user: user.name.clone(),
            move_name: move_data.name.clone(),
            target: target.name.clone(),
            success: true,
            critical: false,
            effectiveness: EffectivenessTier::Immune,
        }));
        return commands;
    }

    let stab = if user.types.contains(&move_data.move_type) {
        STAB_MULTIPLIER
    } else {
        1.0
    };
    let weather_multiplier = state.weather.damage_multiplier(move_data.move_type);

    let hit_count = roll_hit_count(move_data, rng);
    let mut remaining_hp = target.current_hp();
    let mut total_damage: u32 = 0;
    let mut any_critical = false;
    let mut hit_commands = Vec::new();

    for _ in 0..hit_count {
        if remaining_hp == 0 {
            break;
        }
        let crit_denominator = if move_data.high_crit { 8 } else { 16 };
        let critical = rng.one_in(crit_denominator, "critical hit");
        any_critical |= critical;

        let damage = damage_for_hit(
            user,
            target,
            move_data,
            type_multiplier,
            stab,
            if critical { CRIT_MULTIPLIER } else { 1.0 },
            weather_multiplier,
        );

        total_damage += u32::from(damage.min(remaining_hp));
        remaining_hp = remaining_hp.saturating_sub(damage);
        hit_commands.push(BattleCommand::DealDamage {
            target: defender,
            amount: damage,
            source: DamageSource::Move,
        });
    }

    commands.push(BattleCommand::EmitEvent(BattleEvent::MoveUsed {
        side_index: attacker.to_index(),
        user: user.name.clone(),
        move_name: move_data.name.clone(),
        target: target.name.clone(),
        success: true,
        critical: any_critical,
        effectiveness: EffectivenessTier::from_multiplier(type_multiplier),
    }));
    commands.extend(hit_commands);

    // Drain and recoil are both proportional to damage actually inflicted.
    if move_data.drain_percent > 0 && total_damage > 0 {
        let healed = proportional(total_damage, move_data.drain_percent.unsigned_abs());
        commands.push(BattleCommand::HealCreature {
            target: attacker,
            amount: healed,
            source: DamageSource::Drain,
        });
    } else if move_data.drain_percent < 0 && total_damage > 0 {
        let recoil = proportional(total_damage, move_data.drain_percent.unsigned_abs());
        commands.push(BattleCommand::DealDamage {
            target: attacker,
            amount: recoil,
            source: DamageSource::Recoil,
        });
    }

    // Secondary ailments only proc when the move connected for damage and
    // left the target standing.
    if remaining_hp > 0 && total_damage > 0 {
        if let Some(ailment) = &move_data.ailment {
            if rng.chance(ailment.chance, "secondary effect") {
                push_ailment_commands(defender, ailment.kind, rng, &mut commands);
            }
        }
    }

    commands
}

/// Non-damaging moves: self-healing and/or a primary ailment.
fn resolve_status_move(
    user: &Creature,
    target: &Creature,
    attacker: SideTarget,
    defender: SideTarget,
    move_data: &MoveData,
    rng: &mut BattleRng,
    commands: &mut Vec<BattleCommand>,
) {
    commands.push(BattleCommand::EmitEvent(BattleEvent::MoveUsed {
        side_index: attacker.to_index(),
        user: user.name.clone(),
        move_name: move_data.name.clone(),
        target: target.name.clone(),
        success: true,
        critical: false,
        effectiveness: EffectivenessTier::Neutral,
    }));

    if move_data.healing_percent > 0 {
        let amount = proportional(u32::from(user.max_hp()), move_data.healing_percent);
        commands.push(BattleCommand::HealCreature {
            target: attacker,
            amount,
            source: DamageSource::Healing,
        });
    }

    if let Some(ailment) = &move_data.ailment {
        if rng.chance(ailment.chance, "primary effect") {
            push_ailment_commands(defender, ailment.kind, rng, commands);
        }
    }
}

fn push_ailment_commands(
    defender: SideTarget,
    kind: AilmentKind,
    rng: &mut BattleRng,
    commands: &mut Vec<BattleCommand>,
) {
    let command = match kind {
        AilmentKind::Flinch => BattleCommand::SetFlinched { target: defender },
        AilmentKind::Poison => BattleCommand::SetStatus {
            target: defender,
            status: StatusCondition::Poison,
        },
        AilmentKind::Burn => BattleCommand::SetStatus {
            target: defender,
            status: StatusCondition::Burn,
        },
        AilmentKind::Paralysis => BattleCommand::SetStatus {
            target: defender,
            status: StatusCondition::Paralysis,
        },
        AilmentKind::Freeze => BattleCommand::SetStatus {
            target: defender,
            status: StatusCondition::Freeze,
        },
        AilmentKind::Sleep => {
            let turns = 1 + rng.pick(3, "sleep duration") as u8;
            BattleCommand::SetStatus {
                target: defender,
                status: StatusCondition::Sleep(turns),
            }
        }
    };
    commands.push(command);
}

/// Damage for a single hit. Stat difference plus power, floored at 1, then
/// scaled by the multiplier chain. A positive multiplier chain never takes
/// the result below 1 (immunity is filtered out before this is called).
fn damage_for_hit(
    attacker: &Creature,
    defender: &Creature,
    move_data: &MoveData,
    type_multiplier: f64,
    stab: f64,
    crit: f64,
    weather: f64,
) -> u16 {
    let power = i32::from(move_data.power.unwrap_or(0));
    let offense = i32::from(effective_offense(attacker, move_data));
    let defense = i32::from(effective_defense(defender, move_data));

    let base = ((offense - defense) + power).max(1);
    let scaled = (base as f64 * type_multiplier * stab * crit * weather).floor();
    (scaled as i64).max(1).min(i64::from(u16::MAX)) as u16
}

fn roll_hit_count(move_data: &MoveData, rng: &mut BattleRng) -> u8 {
    let (min, max) = move_data.hits;
    if max > min {
        min + rng.pick(usize::from(max - min) + 1, "hit count") as u8
    } else {
        min
    }
}

fn proportional(amount: u32, percent: u8) -> u16 {
    ((amount * u32::from(percent)) / 100).max(1).min(u32::from(u16::MAX)) as u16
}
