use crate::battle::engine::{resolve_replacement, resolve_turn};
use crate::battle::state::{
    ActionFailureReason, BattleEvent, BattleRng, GameState,
};
use crate::battle::tests::common::{
    create_test_state, create_test_state_with_teams, queue_both_moves, TestCreatureBuilder,
};
use crate::errors::{BattleError, StateError};
use pretty_assertions::assert_eq;
use schema::{CreatureType, DamageClass, MoveData};

#[test]
fn a_faint_with_no_bench_ends_the_battle_immediately() {
    let strong = TestCreatureBuilder::new("Strong").with_speed(100).build();
    let weak = TestCreatureBuilder::new("Weak").with_speed(50).with_hp(10).build();
    let mut state = create_test_state(strong, weak);
    queue_both_moves(&mut state);

    // Only the first attacker's rolls: the rest of the turn is cut short.
    let mut rng = BattleRng::scripted(vec![50, 1]);
    let bus = resolve_turn(&mut state, &mut rng);

    assert_eq!(state.game_state, GameState::Side1Win);
    assert_eq!(state.winner(), Some(0));
    assert!(bus.events().iter().any(|e| matches!(
        e,
        BattleEvent::CreatureFainted { side_index: 1, .. }
    )));
    assert!(bus
        .events()
        .iter()
        .any(|e| matches!(e, BattleEvent::SideDefeated { side_index: 1 })));
    assert!(bus.events().iter().any(|e| matches!(
        e,
        BattleEvent::BattleEnded { winner: Some(0), .. }
    )));
}

#[test]
fn a_fainted_creature_with_a_bench_pauses_for_a_replacement() {
    let strong = TestCreatureBuilder::new("Strong").with_speed(100).build();
    let weak = TestCreatureBuilder::new("Weak").with_speed(50).with_hp(10).build();
    let backup = TestCreatureBuilder::new("Backup").build();
    let mut state = create_test_state_with_teams(vec![strong], vec![weak, backup]);
    queue_both_moves(&mut state);

    let mut rng = BattleRng::scripted(vec![50, 1]);
    let bus = resolve_turn(&mut state, &mut rng);

    // The fainted side's own action fails before the turn winds down.
    assert!(bus.events().iter().any(|e| matches!(
        e,
        BattleEvent::ActionFailed {
            side_index: 1,
            reason: ActionFailureReason::CreatureFainted,
        }
    )));
    assert_eq!(state.game_state, GameState::WaitingForSide2Replacement);

    // The wrong side cannot answer the replacement prompt.
    assert!(matches!(
        resolve_replacement(&mut state, 0, 0),
        Err(BattleError::State(StateError::NotAcceptingActions))
    ));

    let bus = resolve_replacement(&mut state, 1, 1).unwrap();
    assert!(bus.events().iter().any(|e| matches!(
        e,
        BattleEvent::CreatureSwitched { side_index: 1, .. }
    )));
    assert_eq!(state.sides[1].active().unwrap().name, "Backup");
    assert_eq!(state.game_state, GameState::WaitingForActions);
}

#[test]
fn mutual_destruction_is_a_draw() {
    let ram = MoveData {
        drain_percent: -25,
        ..MoveData::simple("Wild Ram", CreatureType::Normal, DamageClass::Physical, 40)
    };
    let reckless = TestCreatureBuilder::new("Reckless")
        .with_speed(100)
        .with_hp(1)
        .with_moves(vec![ram])
        .build();
    let weak = TestCreatureBuilder::new("Weak").with_speed(50).with_hp(10).build();
    let mut state = create_test_state(reckless, weak);
    queue_both_moves(&mut state);

    let mut rng = BattleRng::scripted(vec![50, 1]);
    let bus = resolve_turn(&mut state, &mut rng);

    // The ram finishes the target, and its recoil finishes the user.
    assert_eq!(state.game_state, GameState::Draw);
    assert_eq!(state.winner(), None);
    let faints = bus
        .events()
        .iter()
        .filter(|e| matches!(e, BattleEvent::CreatureFainted { .. }))
        .count();
    assert_eq!(faints, 2);
    assert!(bus.events().iter().any(|e| matches!(
        e,
        BattleEvent::BattleEnded { winner: None, .. }
    )));
}

#[test]
fn both_sides_fainting_with_benches_waits_on_both() {
    let ram = MoveData {
        drain_percent: -100,
        ..MoveData::simple("Wild Ram", CreatureType::Normal, DamageClass::Physical, 40)
    };
    let reckless = TestCreatureBuilder::new("Reckless")
        .with_speed(100)
        .with_hp(5)
        .with_moves(vec![ram])
        .build();
    let backup1 = TestCreatureBuilder::new("Backup1").build();
    let weak = TestCreatureBuilder::new("Weak").with_speed(50).with_hp(10).build();
    let backup2 = TestCreatureBuilder::new("Backup2").build();
    let mut state =
        create_test_state_with_teams(vec![reckless, backup1], vec![weak, backup2]);
    queue_both_moves(&mut state);

    let mut rng = BattleRng::scripted(vec![50, 1]);
    resolve_turn(&mut state, &mut rng);

    assert_eq!(state.game_state, GameState::WaitingForBothReplacements);
    resolve_replacement(&mut state, 0, 1).unwrap();
    assert_eq!(state.game_state, GameState::WaitingForSide2Replacement);
    resolve_replacement(&mut state, 1, 1).unwrap();
    assert_eq!(state.game_state, GameState::WaitingForActions);
}

#[test]
fn the_slower_survivor_still_gets_no_target() {
    // Side 2 kills side 1's only creature first; side 1's queued move must
    // not fire into an empty field.
    let doomed = TestCreatureBuilder::new("Doomed")
        .with_speed(10)
        .with_hp(10)
        .build();
    let backup = TestCreatureBuilder::new("Backup").build();
    let killer = TestCreatureBuilder::new("Killer").with_speed(100).build();
    let mut state = create_test_state_with_teams(vec![doomed, backup], vec![killer]);
    queue_both_moves(&mut state);

    let mut rng = BattleRng::scripted(vec![50, 1]);
    let bus = resolve_turn(&mut state, &mut rng);

    assert!(bus.events().iter().any(|e| matches!(
        e,
        BattleEvent::ActionFailed {
            side_index: 0,
            reason: ActionFailureReason::CreatureFainted,
        }
    )));
    assert_eq!(state.game_state, GameState::WaitingForSide1Replacement);
}
