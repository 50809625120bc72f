use crate::battle::engine::resolve_turn;
use crate::battle::state::{ActionFailureReason, BattleEvent, BattleRng};
use crate::battle::tests::common::{create_test_state, queue_both_moves, TestCreatureBuilder};
use crate::creature::MultiTurnState;
use crate::weather::Weather;
use pretty_assertions::assert_eq;
use schema::{CreatureType, DamageClass, MoveData, MultiTurnBehavior, StatType};

fn gesture() -> MoveData {
    MoveData {
        power: None,
        accuracy: None,
        ..MoveData::simple("Gesture", CreatureType::Normal, DamageClass::Status, 0)
    }
}

fn solar_lance() -> MoveData {
    MoveData {
        multi_turn: MultiTurnBehavior::Charge,
        weather_dependent: true,
        pp: 10,
        ..MoveData::simple("Solar Lance", CreatureType::Grass, DamageClass::Special, 120)
    }
}

fn idle_opponent() -> crate::creature::Creature {
    TestCreatureBuilder::new("Idle")
        .with_speed(10)
        .with_moves(vec![gesture()])
        .build()
}

#[test]
fn charge_moves_spend_a_turn_then_release() {
    let charger = TestCreatureBuilder::new("Charger")
        .with_speed(100)
        .with_moves(vec![solar_lance()])
        .build();
    let mut state = create_test_state(charger, idle_opponent());

    // Turn 1: winds up. No accuracy or damage rolls yet.
    queue_both_moves(&mut state);
    let mut rng = BattleRng::scripted(vec![]);
    let bus = resolve_turn(&mut state, &mut rng);
    assert!(bus
        .events()
        .iter()
        .any(|e| matches!(e, BattleEvent::ChargingStarted { .. })));
    assert_eq!(
        state.sides[0].active().unwrap().multi_turn,
        MultiTurnState::Charging { move_index: 0 }
    );
    assert_eq!(state.sides[0].active().unwrap().moves[0].pp, 9);
    assert_eq!(state.sides[1].active().unwrap().current_hp(), 160);

    // Turn 2: the release is forced, whatever was queued.
    queue_both_moves(&mut state);
    let mut rng = BattleRng::scripted(vec![50, 1]);
    resolve_turn(&mut state, &mut rng);
    // ((80 - 60) + 120) = 140, no same-type bonus for a Normal user.
    assert_eq!(state.sides[1].active().unwrap().current_hp(), 20);
    assert_eq!(
        state.sides[0].active().unwrap().multi_turn,
        MultiTurnState::Ready
    );
    // Release costs no further PP.
    assert_eq!(state.sides[0].active().unwrap().moves[0].pp, 9);
}

#[test]
fn sun_lets_weather_dependent_charges_fire_immediately() {
    let charger = TestCreatureBuilder::new("Charger")
        .with_speed(100)
        .with_moves(vec![solar_lance()])
        .build();
    let mut state = create_test_state(charger, idle_opponent());
    state.weather = Weather::Sun;

    queue_both_moves(&mut state);
    let mut rng = BattleRng::scripted(vec![50, 1]);
    let bus = resolve_turn(&mut state, &mut rng);

    assert!(!bus
        .events()
        .iter()
        .any(|e| matches!(e, BattleEvent::ChargingStarted { .. })));
    assert_eq!(state.sides[1].active().unwrap().current_hp(), 20);
    assert_eq!(
        state.sides[0].active().unwrap().multi_turn,
        MultiTurnState::Ready
    );
}

#[test]
fn charge_boost_raises_defense_while_winding_up() {
    let ram = MoveData {
        multi_turn: MultiTurnBehavior::ChargeBoost,
        pp: 10,
        ..MoveData::simple("Granite Ram", CreatureType::Rock, DamageClass::Physical, 130)
    };
    let charger = TestCreatureBuilder::new("Charger")
        .with_speed(100)
        .with_moves(vec![ram])
        .build();
    let mut state = create_test_state(charger, idle_opponent());

    queue_both_moves(&mut state);
    let mut rng = BattleRng::scripted(vec![]);
    let bus = resolve_turn(&mut state, &mut rng);

    assert!(bus.events().iter().any(|e| matches!(
        e,
        BattleEvent::StatStageChanged {
            stat: StatType::Defense,
            old_stage: 0,
            new_stage: 1,
            ..
        }
    )));
    assert_eq!(
        state.sides[0].active().unwrap().stat_stage(StatType::Defense),
        1
    );
}

#[test]
fn recharge_moves_cost_the_following_turn() {
    let surge = MoveData {
        multi_turn: MultiTurnBehavior::Recharge,
        pp: 5,
        accuracy: Some(90),
        ..MoveData::simple("Hyper Surge", CreatureType::Normal, DamageClass::Special, 150)
    };
    let surger = TestCreatureBuilder::new("Surger")
        .with_speed(100)
        .with_moves(vec![surge])
        .build();
    let tank = TestCreatureBuilder::new("Tank")
        .with_stats([600, 80, 60, 80, 60, 10])
        .with_moves(vec![gesture()])
        .build();
    let mut state = create_test_state(surger, tank);

    // Turn 1: the move lands and leaves the user winded.
    queue_both_moves(&mut state);
    let mut rng = BattleRng::scripted(vec![50, 1]);
    resolve_turn(&mut state, &mut rng);
    // ((80 - 60) + 150) * 1.5 = 255.
    assert_eq!(state.sides[1].active().unwrap().current_hp(), 345);
    assert_eq!(
        state.sides[0].active().unwrap().multi_turn,
        MultiTurnState::Recharging
    );

    // Turn 2: forced to stand still.
    queue_both_moves(&mut state);
    let mut rng = BattleRng::scripted(vec![]);
    let bus = resolve_turn(&mut state, &mut rng);
    assert!(bus.events().iter().any(|e| matches!(
        e,
        BattleEvent::ActionFailed {
            side_index: 0,
            reason: ActionFailureReason::MustRecharge,
        }
    )));
    assert_eq!(state.sides[1].active().unwrap().current_hp(), 345);
    assert_eq!(
        state.sides[0].active().unwrap().multi_turn,
        MultiTurnState::Ready
    );

    // Turn 3: free to act again.
    queue_both_moves(&mut state);
    let mut rng = BattleRng::scripted(vec![50, 1]);
    resolve_turn(&mut state, &mut rng);
    assert_eq!(state.sides[1].active().unwrap().current_hp(), 90);
}

#[test]
fn a_missed_recharge_move_skips_the_recharge() {
    let surge = MoveData {
        multi_turn: MultiTurnBehavior::Recharge,
        pp: 5,
        accuracy: Some(90),
        ..MoveData::simple("Hyper Surge", CreatureType::Normal, DamageClass::Special, 150)
    };
    let surger = TestCreatureBuilder::new("Surger")
        .with_speed(100)
        .with_moves(vec![surge])
        .build();
    let mut state = create_test_state(surger, idle_opponent());

    queue_both_moves(&mut state);
    let mut rng = BattleRng::scripted(vec![91]);
    resolve_turn(&mut state, &mut rng);
    assert_eq!(state.sides[1].active().unwrap().current_hp(), 160);
    assert_eq!(
        state.sides[0].active().unwrap().multi_turn,
        MultiTurnState::Ready
    );
}
