use crate::battle::state::{Action, BattleState};
use crate::creature::{Creature, StatusCondition};
use crate::side::BattleSide;
use schema::{BaseStats, CreatureType, DamageClass, MoveData, SpeciesData};

/// A builder for creating test creatures with common defaults.
///
/// # Example
/// ```
/// let creature = TestCreatureBuilder::new("Sparky")
///     .with_types(vec![CreatureType::Electric])
///     .with_moves(vec![tackle()])
///     .with_status(StatusCondition::Paralysis)
///     .build();
/// ```
pub struct TestCreatureBuilder {
    name: String,
    types: Vec<CreatureType>,
    stats: BaseStats,
    moves: Vec<MoveData>,
    status: Option<StatusCondition>,
    current_hp: Option<u16>,
}

impl TestCreatureBuilder {
    pub fn new(name: &str) -> Self {
        Self {
            name: name.to_string(),
            types: vec![CreatureType::Normal],
            stats: BaseStats {
                hp: 160,
                attack: 80,
                defense: 60,
                special_attack: 80,
                special_defense: 60,
                speed: 80,
            },
            moves: vec![tackle()],
            status: None,
            current_hp: None,
        }
    }

    pub fn with_types(mut self, types: Vec<CreatureType>) -> Self {
        self.types = types;
        self
    }

    /// Stats in order: hp, attack, defense, special attack, special defense,
    /// speed.
    pub fn with_stats(mut self, stats: [u16; 6]) -> Self {
        self.stats = BaseStats {
            hp: stats[0],
            attack: stats[1],
            defense: stats[2],
            special_attack: stats[3],
            special_defense: stats[4],
            speed: stats[5],
        };
        self
    }

    pub fn with_speed(mut self, speed: u16) -> Self {
        self.stats.speed = speed;
        self
    }

    pub fn with_moves(mut self, moves: Vec<MoveData>) -> Self {
        self.moves = moves;
        self
    }

    pub fn with_status(mut self, status: StatusCondition) -> Self {
        self.status = Some(status);
        self
    }

    /// Current HP. If not set, the creature starts at max.
    pub fn with_hp(mut self, hp: u16) -> Self {
        self.current_hp = Some(hp);
        self
    }

    pub fn build(self) -> Creature {
        let species = SpeciesData {
            name: self.name,
            types: self.types,
            base_stats: self.stats,
        };
        let mut creature = Creature::from_species(&species, self.moves);
        if let Some(status) = self.status {
            creature.apply_status(status);
        }
        if let Some(hp) = self.current_hp {
            creature.set_hp(hp);
        }
        creature
    }
}

/// A plain 40-power physical Normal move with perfect accuracy.
pub fn tackle() -> MoveData {
    MoveData::simple("Tackle", CreatureType::Normal, DamageClass::Physical, 40)
}

/// One creature per side.
pub fn create_test_state(side1_creature: Creature, side2_creature: Creature) -> BattleState {
    create_test_state_with_teams(vec![side1_creature], vec![side2_creature])
}

pub fn create_test_state_with_teams(side1: Vec<Creature>, side2: Vec<Creature>) -> BattleState {
    BattleState::new(
        "test-battle".to_string(),
        BattleSide::new("side1".to_string(), "Side 1".to_string(), side1),
        BattleSide::new("side2".to_string(), "Side 2".to_string(), side2),
    )
}

/// Queue `UseMove { 0 }` for both sides.
pub fn queue_both_moves(state: &mut BattleState) {
    state.action_queue = [
        Some(Action::UseMove { move_index: 0 }),
        Some(Action::UseMove { move_index: 0 }),
    ];
}
