use crate::battle::engine::resolve_turn;
use crate::battle::state::{ActionFailureReason, BattleEvent, BattleRng};
use crate::battle::tests::common::{create_test_state, queue_both_moves, TestCreatureBuilder};
use crate::creature::StatusCondition;
use pretty_assertions::assert_eq;
use rstest::rstest;

fn failure_for(bus: &crate::battle::state::EventBus, side: usize) -> Option<ActionFailureReason> {
    bus.events().iter().find_map(|e| match e {
        BattleEvent::ActionFailed { side_index, reason } if *side_index == side => {
            Some(reason.clone())
        }
        _ => None,
    })
}

#[test]
fn sleeping_creature_skips_its_action_and_counts_down() {
    let sleeper = TestCreatureBuilder::new("Sleeper")
        .with_speed(100)
        .with_status(StatusCondition::Sleep(2))
        .build();
    let other = TestCreatureBuilder::new("Other").with_speed(50).build();
    let mut state = create_test_state(sleeper, other);
    queue_both_moves(&mut state);

    let mut rng = BattleRng::scripted(vec![50, 1]);
    let bus = resolve_turn(&mut state, &mut rng);

    assert_eq!(failure_for(&bus, 0), Some(ActionFailureReason::IsAsleep));
    // The sleeper never attacked.
    assert_eq!(state.sides[1].active().unwrap().current_hp(), 160);
    // Countdown ticks at end of turn.
    assert_eq!(
        state.sides[0].active().unwrap().status,
        Some(StatusCondition::Sleep(1))
    );
}

#[test]
fn sleep_expires_on_its_own() {
    let sleeper = TestCreatureBuilder::new("Sleeper")
        .with_speed(100)
        .with_status(StatusCondition::Sleep(1))
        .build();
    let other = TestCreatureBuilder::new("Other").with_speed(50).build();
    let mut state = create_test_state(sleeper, other);
    queue_both_moves(&mut state);

    let mut rng = BattleRng::scripted(vec![50, 1]);
    let bus = resolve_turn(&mut state, &mut rng);

    assert!(bus.events().iter().any(|e| matches!(
        e,
        BattleEvent::StatusChanged {
            old: Some(StatusCondition::Sleep(_)),
            new: None,
            ..
        }
    )));
    assert_eq!(state.sides[0].active().unwrap().status, None);

    // Awake now: next turn it attacks normally.
    queue_both_moves(&mut state);
    let mut rng = BattleRng::scripted(vec![50, 1, 50, 1]);
    resolve_turn(&mut state, &mut rng);
    assert!(state.sides[1].active().unwrap().current_hp() < 160);
}

#[rstest]
#[case("thaw roll succeeds", 20, None)]
#[case("thaw roll fails", 21, Some(StatusCondition::Freeze))]
fn frozen_creature_cannot_act_and_may_thaw(
    #[case] _desc: &str,
    #[case] thaw_roll: u8,
    #[case] expected_status: Option<StatusCondition>,
) {
    let frozen = TestCreatureBuilder::new("Frozen")
        .with_speed(100)
        .with_status(StatusCondition::Freeze)
        .build();
    let other = TestCreatureBuilder::new("Other").with_speed(50).build();
    let mut state = create_test_state(frozen, other);
    queue_both_moves(&mut state);

    // Opponent's accuracy + crit, then the end-of-turn thaw roll.
    let mut rng = BattleRng::scripted(vec![50, 1, thaw_roll]);
    let bus = resolve_turn(&mut state, &mut rng);

    assert_eq!(failure_for(&bus, 0), Some(ActionFailureReason::IsFrozen));
    assert_eq!(state.sides[0].active().unwrap().status, expected_status);
}

#[test]
fn flinch_costs_the_turn_and_expires() {
    let flinched = TestCreatureBuilder::new("Flinched").with_speed(100).build();
    let other = TestCreatureBuilder::new("Other").with_speed(50).build();
    let mut state = create_test_state(flinched, other);
    state.sides[0].active_mut().unwrap().set_flinched();
    queue_both_moves(&mut state);

    let mut rng = BattleRng::scripted(vec![50, 1]);
    let bus = resolve_turn(&mut state, &mut rng);

    assert_eq!(failure_for(&bus, 0), Some(ActionFailureReason::IsFlinching));
    assert_eq!(state.sides[1].active().unwrap().current_hp(), 160);

    // The flag is consumed: the next turn proceeds normally.
    queue_both_moves(&mut state);
    let mut rng = BattleRng::scripted(vec![50, 1, 50, 1]);
    resolve_turn(&mut state, &mut rng);
    assert!(state.sides[1].active().unwrap().current_hp() < 160);
}

#[test]
fn paralysis_blocks_roughly_a_quarter_of_actions() {
    // 1000 independent single-turn trials, one seed each. The paralysis
    // check is the first draw of the turn for the paralyzed side, which
    // still outspeeds the opponent after the paralysis speed halving.
    let trials: u64 = 1000;
    let mut blocked = 0u32;
    for seed in 0..trials {
        let paralyzed = TestCreatureBuilder::new("Paralyzed")
            .with_speed(100)
            .with_status(StatusCondition::Paralysis)
            .build();
        let other = TestCreatureBuilder::new("Other").with_speed(20).build();
        let mut state = create_test_state(paralyzed, other);
        queue_both_moves(&mut state);

        let mut rng = BattleRng::from_seed(seed);
        let bus = resolve_turn(&mut state, &mut rng);
        if failure_for(&bus, 0) == Some(ActionFailureReason::IsParalyzed) {
            blocked += 1;
        }
    }

    // 25% of 1000, within a +-5% tolerance.
    assert!(
        (200..=300).contains(&blocked),
        "blocked {} of {} actions",
        blocked,
        trials
    );
}
