use std::sync::{Arc, Mutex};

use crate::battle::runner::Battle;
use crate::battle::state::{
    Action, BattleEvent, BattleRng, DamageSource, EffectivenessTier, EventSink, SinkError,
};
use crate::battle::tests::common::TestCreatureBuilder;
use crate::side::BattleSide;
use pretty_assertions::assert_eq;

struct RecordingSink {
    seen: Arc<Mutex<Vec<BattleEvent>>>,
}

impl EventSink for RecordingSink {
    fn name(&self) -> &str {
        "recorder"
    }

    fn on_event(&mut self, event: &BattleEvent) -> Result<(), SinkError> {
        self.seen.lock().unwrap().push(event.clone());
        Ok(())
    }
}

struct FailingSink;

impl EventSink for FailingSink {
    fn name(&self) -> &str {
        "always-fails"
    }

    fn on_event(&mut self, _event: &BattleEvent) -> Result<(), SinkError> {
        Err(SinkError {
            message: "disk full".to_string(),
        })
    }
}

fn two_creature_battle(seed: u64) -> Battle {
    let a = TestCreatureBuilder::new("A").with_speed(100).build();
    let b = TestCreatureBuilder::new("B").with_speed(50).build();
    Battle::new(
        "events".to_string(),
        BattleSide::new("s1".to_string(), "Side 1".to_string(), vec![a]),
        BattleSide::new("s2".to_string(), "Side 2".to_string(), vec![b]),
        BattleRng::from_seed(seed),
    )
}

#[test]
fn a_failing_sink_never_starves_the_others() {
    let seen = Arc::new(Mutex::new(Vec::new()));
    let mut battle = two_creature_battle(5);
    battle.register_sink(Box::new(FailingSink));
    battle.register_sink(Box::new(RecordingSink { seen: seen.clone() }));

    let bus = battle.start();
    battle.submit_action(0, Action::UseMove { move_index: 0 }).unwrap();
    battle.submit_action(1, Action::UseMove { move_index: 0 }).unwrap();
    let turn_bus = battle.run_turn().unwrap();

    let seen = seen.lock().unwrap();
    assert_eq!(seen.len(), bus.len() + turn_bus.len());
    assert!(seen
        .iter()
        .any(|e| matches!(e, BattleEvent::BattleStarted { .. })));
    assert!(seen.iter().any(|e| matches!(e, BattleEvent::TurnEnded { .. })));
}

#[test]
fn events_survive_a_json_round_trip() {
    let events = vec![
        BattleEvent::BattleStarted {
            side_names: ["Side 1".to_string(), "Side 2".to_string()],
            leads: [Some("A".to_string()), Some("B".to_string())],
        },
        BattleEvent::MoveUsed {
            side_index: 0,
            user: "A".to_string(),
            move_name: "Tackle".to_string(),
            target: "B".to_string(),
            success: true,
            critical: true,
            effectiveness: EffectivenessTier::SuperEffective,
        },
        BattleEvent::HealthChanged {
            creature: "B".to_string(),
            old_hp: 160,
            new_hp: 70,
            delta: -90,
            source: DamageSource::Move,
        },
        BattleEvent::BattleEnded {
            winner: Some(0),
            total_turns: 12,
        },
    ];

    for event in events {
        let json = serde_json::to_string(&event).unwrap();
        let back: BattleEvent = serde_json::from_str(&json).unwrap();
        assert_eq!(back, event);
    }
}

#[test]
fn the_event_bus_display_lists_every_event() {
    let mut battle = two_creature_battle(5);
    let bus = battle.start();
    let rendered = format!("{}", bus);
    assert_eq!(rendered.lines().count(), bus.len());
}
