//! Turn resolution: action ordering, action prevention, multi-turn move
//! bookkeeping, the end-of-turn phase, and battle-over detection.

use std::collections::VecDeque;

use crate::battle::calculators::calculate_attack_outcome;
use crate::battle::commands::{execute_command_batch, BattleCommand, SideTarget};
use crate::battle::state::{
    Action, ActionFailureReason, BattleEvent, BattleRng, BattleState, DamageSource, EventBus,
    GameState,
};
use crate::creature::{MultiTurnState, StatusCondition};
use crate::data;
use crate::errors::{BattleResult, StateError};
use crate::weather::Weather;
use schema::{MoveData, MultiTurnBehavior, StatType};

const PARALYSIS_FAIL_PERCENT: u8 = 25;
const THAW_PERCENT: u8 = 20;

/// A resolved, ordered unit of work for one turn. Queued actions from the
/// input boundary are lowered into these, with forced actions (charging
/// releases, recharge skips) overriding whatever the side submitted.
#[derive(Debug, Clone)]
pub enum BattleAction {
    Switch { side: SideTarget, team_index: usize },
    UseMove { side: SideTarget, choice: MoveChoice },
    ReleaseMove { side: SideTarget, move_index: usize },
    Recharge { side: SideTarget },
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MoveChoice {
    Indexed(usize),
    Struggle,
}

/// Emit the opening events and settle battles that are decided before the
/// first turn (one or both rosters empty).
pub fn begin_battle(state: &mut BattleState) -> EventBus {
    let mut bus = EventBus::new();
    bus.push(BattleEvent::BattleStarted {
        side_names: [state.sides[0].name.clone(), state.sides[1].name.clone()],
        leads: [
            state.sides[0].active().map(|c| c.name.clone()),
            state.sides[1].active().map(|c| c.name.clone()),
        ],
    });

    let side1_ready = state.sides[0].has_living_member();
    let side2_ready = state.sides[1].has_living_member();
    match (side1_ready, side2_ready) {
        (true, true) => {}
        (false, false) => {
            bus.push(BattleEvent::SideDefeated { side_index: 0 });
            bus.push(BattleEvent::SideDefeated { side_index: 1 });
            state.game_state = GameState::Draw;
        }
        (true, false) => {
            bus.push(BattleEvent::SideDefeated { side_index: 1 });
            state.game_state = GameState::Side1Win;
        }
        (false, true) => {
            bus.push(BattleEvent::SideDefeated { side_index: 0 });
            state.game_state = GameState::Side2Win;
        }
    }
    if state.is_over() {
        bus.push(BattleEvent::BattleEnded {
            winner: state.winner(),
            total_turns: 0,
        });
    }
    bus
}

/// Resolve one full turn from the queued actions. Both queue slots must be
/// filled; the runner enforces this before calling.
pub fn resolve_turn(state: &mut BattleState, rng: &mut BattleRng) -> EventBus {
    let mut bus = EventBus::new();
    if state.is_over() {
        return bus;
    }

    state.game_state = GameState::TurnInProgress;
    bus.push(BattleEvent::TurnStarted {
        turn_number: state.turn_number,
    });

    let mut queue = build_action_queue(state, rng);
    while let Some(action) = queue.pop_front() {
        if battle_decided(state) {
            break;
        }
        execute_action(action, state, &mut bus, rng, &mut queue);
    }

    if !battle_decided(state) {
        end_of_turn_phase(state, &mut bus, rng);
    }

    bus.push(BattleEvent::TurnEnded {
        turn_number: state.turn_number,
    });
    state.turn_number += 1;
    state.action_queue = [None, None];
    settle_turn_outcome(state, &mut bus);
    bus
}

/// Bring in a replacement for a fainted active creature. Only legal while the
/// battle is waiting on that side.
pub fn resolve_replacement(
    state: &mut BattleState,
    side_index: usize,
    team_index: usize,
) -> BattleResult<EventBus> {
    let accepts = match state.game_state {
        GameState::WaitingForSide1Replacement => side_index == 0,
        GameState::WaitingForSide2Replacement => side_index == 1,
        GameState::WaitingForBothReplacements => side_index < 2,
        _ => false,
    };
    if !accepts {
        return Err(StateError::NotAcceptingActions.into());
    }

    let mut bus = EventBus::new();
    let side = &mut state.sides[side_index];
    let old_name = side.active().map(|c| c.name.clone()).unwrap_or_default();
    // The outgoing creature is fainted, so bypass the fainted-target guard by
    // validating only the incoming slot.
    let incoming_ok = side
        .team
        .get(team_index)
        .and_then(|slot| slot.as_ref())
        .is_some_and(|c| !c.is_fainted());
    if !incoming_ok || team_index == side.active_index {
        return Err(crate::errors::SelectionError::InvalidSwitchIndex(team_index).into());
    }
    if let Some(outgoing) = side.active_mut() {
        outgoing.reset_volatile_state();
    }
    side.active_index = team_index;
    side.last_move_index = None;
    let new_name = side.active().map(|c| c.name.clone()).unwrap_or_default();
    bus.push(BattleEvent::CreatureSwitched {
        side_index,
        old_creature: old_name,
        new_creature: new_name,
    });

    state.game_state = match (state.game_state, side_index) {
        (GameState::WaitingForBothReplacements, 0) => GameState::WaitingForSide2Replacement,
        (GameState::WaitingForBothReplacements, 1) => GameState::WaitingForSide1Replacement,
        _ => GameState::WaitingForActions,
    };
    Ok(bus)
}

/// Lower the two queued actions into ordered `BattleAction`s. Switches run
/// before moves (side 1 first); moves order by priority, then effective
/// speed, then a coin flip.
fn build_action_queue(state: &BattleState, rng: &mut BattleRng) -> VecDeque<BattleAction> {
    let mut switches = Vec::new();
    let mut moves = Vec::new();

    for side_index in 0..2 {
        let side = SideTarget::from_index(side_index);
        let forced = forced_action(state, side);
        let action = match forced {
            Some(action) => action,
            None => match state.action_queue[side_index] {
                Some(Action::Switch { team_index }) => BattleAction::Switch { side, team_index },
                Some(Action::UseMove { move_index }) => BattleAction::UseMove {
                    side,
                    choice: MoveChoice::Indexed(move_index),
                },
                // Missing action: the side simply does nothing this turn.
                None => continue,
            },
        };
        match action {
            BattleAction::Switch { .. } => switches.push(action),
            other => moves.push((side_index, other)),
        }
    }

    sort_move_actions(state, &mut moves, rng);

    let mut queue: VecDeque<BattleAction> = switches.into();
    queue.extend(moves.into_iter().map(|(_, action)| action));
    queue
}

/// Charging and recharging creatures do not get a choice this turn.
fn forced_action(state: &BattleState, side: SideTarget) -> Option<BattleAction> {
    let creature = state.sides[side.to_index()].active()?;
    match creature.multi_turn {
        MultiTurnState::Charging { move_index } => {
            Some(BattleAction::ReleaseMove { side, move_index })
        }
        MultiTurnState::Recharging => Some(BattleAction::Recharge { side }),
        MultiTurnState::Ready => None,
    }
}

fn sort_move_actions(
    state: &BattleState,
    moves: &mut Vec<(usize, BattleAction)>,
    rng: &mut BattleRng,
) {
    if moves.len() < 2 {
        return;
    }
    let key = |side_index: usize, action: &BattleAction| -> (i8, u16) {
        let side = &state.sides[side_index];
        let priority = match action {
            BattleAction::UseMove {
                choice: MoveChoice::Indexed(i),
                ..
            } => side
                .active()
                .and_then(|c| c.move_at(*i))
                .map(|m| m.data.priority)
                .unwrap_or(0),
            BattleAction::ReleaseMove { move_index, .. } => side
                .active()
                .and_then(|c| c.move_at(*move_index))
                .map(|m| m.data.priority)
                .unwrap_or(0),
            _ => 0,
        };
        let speed = side.active().map(|c| c.effective_speed()).unwrap_or(0);
        (priority, speed)
    };

    let (a_priority, a_speed) = key(moves[0].0, &moves[0].1);
    let (b_priority, b_speed) = key(moves[1].0, &moves[1].1);

    let a_first = if a_priority != b_priority {
        a_priority > b_priority
    } else if a_speed != b_speed {
        a_speed > b_speed
    } else {
        rng.coin_flip("speed tie")
    };
    if !a_first {
        moves.swap(0, 1);
    }
}

fn execute_action(
    action: BattleAction,
    state: &mut BattleState,
    bus: &mut EventBus,
    rng: &mut BattleRng,
    queue: &mut VecDeque<BattleAction>,
) {
    match action {
        BattleAction::Switch { side, team_index } => {
            let side_index = side.to_index();
            let old_name = state.sides[side_index]
                .active()
                .map(|c| c.name.clone())
                .unwrap_or_default();
            match state.sides[side_index].switch_to(team_index) {
                Ok(()) => {
                    let new_name = state.sides[side_index]
                        .active()
                        .map(|c| c.name.clone())
                        .unwrap_or_default();
                    bus.push(BattleEvent::CreatureSwitched {
                        side_index,
                        old_creature: old_name,
                        new_creature: new_name,
                    });
                }
                Err(err) => {
                    log::warn!("switch rejected during resolution: {}", err);
                }
            }
        }

        BattleAction::Recharge { side } => {
            bus.push(BattleEvent::ActionFailed {
                side_index: side.to_index(),
                reason: ActionFailureReason::MustRecharge,
            });
            if let Some(creature) = state.sides[side.to_index()].active_mut() {
                creature.finish_charging();
            }
        }

        BattleAction::UseMove { side, choice } => {
            execute_move_action(side, choice, false, state, bus, rng, queue);
        }

        BattleAction::ReleaseMove { side, move_index } => {
            execute_move_action(
                side,
                MoveChoice::Indexed(move_index),
                true,
                state,
                bus,
                rng,
                queue,
            );
        }
    }
}

fn execute_move_action(
    side: SideTarget,
    choice: MoveChoice,
    is_release: bool,
    state: &mut BattleState,
    bus: &mut EventBus,
    rng: &mut BattleRng,
    queue: &mut VecDeque<BattleAction>,
) {
    let side_index = side.to_index();

    let Some(user) = state.sides[side_index].active() else {
        bus.push(BattleEvent::ActionFailed {
            side_index,
            reason: ActionFailureReason::CreatureFainted,
        });
        return;
    };
    if user.is_fainted() {
        bus.push(BattleEvent::ActionFailed {
            side_index,
            reason: ActionFailureReason::CreatureFainted,
        });
        return;
    }

    let target_standing = state.sides[side.opponent().to_index()]
        .active()
        .is_some_and(|c| !c.is_fainted());
    if !target_standing {
        bus.push(BattleEvent::ActionFailed {
            side_index,
            reason: ActionFailureReason::NoTarget,
        });
        return;
    }

    if let Some(reason) = action_prevented(state, side, rng) {
        // A creature stopped mid-charge loses the charge.
        if is_release {
            if let Some(creature) = state.sides[side_index].active_mut() {
                creature.finish_charging();
            }
        }
        bus.push(BattleEvent::ActionFailed { side_index, reason });
        return;
    }

    let (move_data, move_index) = match resolve_move_choice(state, side, choice) {
        Some(pair) => pair,
        None => {
            bus.push(BattleEvent::ActionFailed {
                side_index,
                reason: ActionFailureReason::NoTarget,
            });
            return;
        }
    };

    let mut commands = Vec::new();

    // Charge moves spend their turn (and PP) preparing; the hit lands on
    // release. Sun lets weather-dependent charge moves fire immediately.
    let starts_charge = !is_release
        && matches!(
            move_data.multi_turn,
            MultiTurnBehavior::Charge | MultiTurnBehavior::ChargeBoost
        )
        && !(move_data.weather_dependent && state.weather == Weather::Sun);

    if starts_charge {
        if let Some(index) = move_index {
            commands.push(BattleCommand::SpendPP {
                target: side,
                move_index: index,
            });
            commands.push(BattleCommand::SetLastMove {
                target: side,
                move_index: index,
            });
            commands.push(BattleCommand::SetMultiTurnState {
                target: side,
                state: MultiTurnState::Charging { move_index: index },
            });
        }
        if move_data.multi_turn == MultiTurnBehavior::ChargeBoost {
            commands.push(BattleCommand::ChangeStatStage {
                target: side,
                stat: StatType::Defense,
                delta: 1,
            });
        }
        let user_name = state.sides[side_index]
            .active()
            .map(|c| c.name.clone())
            .unwrap_or_default();
        commands.push(BattleCommand::EmitEvent(BattleEvent::ChargingStarted {
            creature: user_name,
            move_name: move_data.name.clone(),
        }));
        run_commands(commands, state, bus, queue);
        return;
    }

    if is_release {
        commands.push(BattleCommand::SetMultiTurnState {
            target: side,
            state: MultiTurnState::Ready,
        });
    } else if let Some(index) = move_index {
        commands.push(BattleCommand::SpendPP {
            target: side,
            move_index: index,
        });
        commands.push(BattleCommand::SetLastMove {
            target: side,
            move_index: index,
        });
    }

    let outcome = calculate_attack_outcome(state, side, &move_data, rng);
    let connected = outcome.iter().any(|c| {
        matches!(
            c,
            BattleCommand::EmitEvent(BattleEvent::MoveUsed { success: true, .. })
        )
    });
    commands.extend(outcome);

    if connected && move_data.multi_turn == MultiTurnBehavior::Recharge {
        commands.push(BattleCommand::SetMultiTurnState {
            target: side,
            state: MultiTurnState::Recharging,
        });
    }

    run_commands(commands, state, bus, queue);
}

/// Sleep, freeze, flinch, then paralysis, in that order. The flinch flag is
/// consumed by the check.
fn action_prevented(
    state: &mut BattleState,
    side: SideTarget,
    rng: &mut BattleRng,
) -> Option<ActionFailureReason> {
    let creature = state.sides[side.to_index()].active_mut()?;
    match creature.status {
        Some(StatusCondition::Sleep(_)) => return Some(ActionFailureReason::IsAsleep),
        Some(StatusCondition::Freeze) => return Some(ActionFailureReason::IsFrozen),
        _ => {}
    }
    if creature.take_flinch() {
        return Some(ActionFailureReason::IsFlinching);
    }
    if creature.status == Some(StatusCondition::Paralysis)
        && rng.chance(PARALYSIS_FAIL_PERCENT, "paralysis check")
    {
        return Some(ActionFailureReason::IsParalyzed);
    }
    None
}

/// Look up the chosen move, falling back to Struggle when the chosen slot
/// (or every slot) is out of PP. Struggle has no slot and spends no PP.
fn resolve_move_choice(
    state: &BattleState,
    side: SideTarget,
    choice: MoveChoice,
) -> Option<(MoveData, Option<usize>)> {
    let creature = state.sides[side.to_index()].active()?;
    match choice {
        MoveChoice::Struggle => Some((data::struggle(), None)),
        MoveChoice::Indexed(index) => {
            let slot = creature.move_at(index)?;
            if slot.pp == 0 {
                Some((data::struggle(), None))
            } else {
                Some((slot.data.clone(), Some(index)))
            }
        }
    }
}

fn run_commands(
    commands: Vec<BattleCommand>,
    state: &mut BattleState,
    bus: &mut EventBus,
    queue: &mut VecDeque<BattleAction>,
) {
    let mut pending = Vec::new();
    if let Err(err) = execute_command_batch(commands, state, bus, &mut pending) {
        log::error!("command execution failed: {:?}", err);
    }
    // Follow-up actions run before anything else still queued.
    for action in pending.into_iter().rev() {
        queue.push_front(action);
    }
}

/// Weather chip damage, then status residuals and counters, then the weather
/// clock, in that fixed order. Leftover flinch flags expire here.
fn end_of_turn_phase(state: &mut BattleState, bus: &mut EventBus, rng: &mut BattleRng) {
    // 1. Weather damage.
    let weather = state.weather;
    let source = match weather {
        Weather::Sandstorm => Some(DamageSource::Sandstorm),
        Weather::Hail => Some(DamageSource::Hail),
        _ => None,
    };
    if let Some(source) = source {
        for side_index in 0..2 {
            let Some(creature) = state.sides[side_index].active() else {
                continue;
            };
            if creature.is_fainted() || weather.is_immune(&creature.types) {
                continue;
            }
            let amount = weather.periodic_damage(creature.max_hp());
            let mut queue = VecDeque::new();
            run_commands(
                vec![BattleCommand::DealDamage {
                    target: SideTarget::from_index(side_index),
                    amount,
                    source,
                }],
                state,
                bus,
                &mut queue,
            );
        }
    }

    // 2. Status residual damage and counters.
    for side_index in 0..2 {
        let Some(creature) = state.sides[side_index].active_mut() else {
            continue;
        };
        if creature.is_fainted() {
            continue;
        }
        let thawed = creature.status == Some(StatusCondition::Freeze)
            && rng.chance(THAW_PERCENT, "thaw check");
        let status = creature.status;
        let old_hp = creature.current_hp();
        // process_status applies its own chip damage; only report it here.
        let outcome = creature.process_status(thawed);
        let name = creature.name.clone();
        let new_hp = creature.current_hp();
        let fainted = creature.is_fainted();

        if let Some(cured) = outcome.cured {
            bus.push(BattleEvent::StatusChanged {
                creature: name.clone(),
                old: Some(cured),
                new: None,
                turns_remaining: 0,
                source: DamageSource::Move,
            });
        }
        if outcome.damage > 0 {
            let source = match status {
                Some(StatusCondition::Poison) => DamageSource::Poison,
                _ => DamageSource::Burn,
            };
            bus.push(BattleEvent::HealthChanged {
                creature: name.clone(),
                old_hp,
                new_hp,
                delta: -i32::from(outcome.damage),
                source,
            });
            if fainted {
                bus.push(BattleEvent::CreatureFainted {
                    side_index,
                    creature: name,
                });
            }
        }
    }

    // 3. Weather clock.
    if let Some(turns) = state.weather_turns_remaining {
        let remaining = turns.saturating_sub(1);
        if remaining == 0 {
            let old = state.weather;
            state.weather = Weather::None;
            state.weather_turns_remaining = None;
            bus.push(BattleEvent::WeatherChanged {
                old,
                new: Weather::None,
                turns_remaining: None,
            });
        } else {
            state.weather_turns_remaining = Some(remaining);
        }
    }

    // Flinch never outlives the turn it was inflicted on.
    for side in state.sides.iter_mut() {
        if let Some(creature) = side.active_mut() {
            creature.take_flinch();
        }
    }
}

fn battle_decided(state: &BattleState) -> bool {
    !state.sides[0].has_living_member() || !state.sides[1].has_living_member()
}

/// Decide where the battle goes after a turn: over, waiting on replacements,
/// or back to accepting actions.
fn settle_turn_outcome(state: &mut BattleState, bus: &mut EventBus) {
    let side1_alive = state.sides[0].has_living_member();
    let side2_alive = state.sides[1].has_living_member();

    match (side1_alive, side2_alive) {
        (false, false) => {
            bus.push(BattleEvent::SideDefeated { side_index: 0 });
            bus.push(BattleEvent::SideDefeated { side_index: 1 });
            state.game_state = GameState::Draw;
        }
        (true, false) => {
            bus.push(BattleEvent::SideDefeated { side_index: 1 });
            state.game_state = GameState::Side1Win;
        }
        (false, true) => {
            bus.push(BattleEvent::SideDefeated { side_index: 0 });
            state.game_state = GameState::Side2Win;
        }
        (true, true) => {
            let needs1 = state.sides[0].active().is_none_or(|c| c.is_fainted());
            let needs2 = state.sides[1].active().is_none_or(|c| c.is_fainted());
            state.game_state = match (needs1, needs2) {
                (true, true) => GameState::WaitingForBothReplacements,
                (true, false) => GameState::WaitingForSide1Replacement,
                (false, true) => GameState::WaitingForSide2Replacement,
                (false, false) => GameState::WaitingForActions,
            };
        }
    }

    if state.is_over() {
        bus.push(BattleEvent::BattleEnded {
            winner: state.winner(),
            total_turns: state.turn_number.saturating_sub(1),
        });
    }
}
