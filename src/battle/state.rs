use crate::creature::StatusCondition;
use crate::side::BattleSide;
use crate::weather::Weather;
use rand::rngs::SmallRng;
use rand::{Rng, SeedableRng};
use schema::StatType;
use serde::{Deserialize, Serialize};

#[derive(Serialize, Deserialize, Debug, Clone, PartialEq, Copy)]
pub enum GameState {
    WaitingForActions,
    TurnInProgress,
    WaitingForSide1Replacement,
    WaitingForSide2Replacement,
    WaitingForBothReplacements,
    Side1Win,
    Side2Win,
    Draw,
}

/// An action a side can take on its turn. Indices are validated at the input
/// boundary (`BattleSide::validate_*`); resolution never sees a bad one.
#[derive(Serialize, Deserialize, Debug, Clone, Copy, PartialEq)]
pub enum Action {
    UseMove { move_index: usize },
    Switch { team_index: usize },
}

/// Coarse bucket of a type-effectiveness multiplier, for event consumers.
#[derive(Serialize, Deserialize, Debug, Clone, Copy, PartialEq, Eq)]
pub enum EffectivenessTier {
    Immune,
    NotVeryEffective,
    Neutral,
    SuperEffective,
}

impl EffectivenessTier {
    pub fn from_multiplier(multiplier: f64) -> Self {
        if multiplier <= 0.0 {
            EffectivenessTier::Immune
        } else if multiplier < 1.0 {
            EffectivenessTier::NotVeryEffective
        } else if multiplier > 1.0 {
            EffectivenessTier::SuperEffective
        } else {
            EffectivenessTier::Neutral
        }
    }
}

/// Where a health change came from.
#[derive(Serialize, Deserialize, Debug, Clone, Copy, PartialEq, Eq)]
pub enum DamageSource {
    Move,
    Poison,
    Burn,
    Sandstorm,
    Hail,
    Recoil,
    Drain,
    Healing,
}

#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
pub enum ActionFailureReason {
    IsAsleep,
    IsFrozen,
    IsParalyzed,
    IsFlinching,
    MustRecharge,
    CreatureFainted,
    NoTarget,
}

#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
pub enum BattleEvent {
    // Turn management
    TurnStarted {
        turn_number: u32,
    },
    TurnEnded {
        turn_number: u32,
    },

    // Battle lifecycle
    BattleStarted {
        side_names: [String; 2],
        leads: [Option<String>; 2],
    },
    BattleEnded {
        winner: Option<usize>,
        total_turns: u32,
    },
    SideDefeated {
        side_index: usize,
    },

    // Field changes
    CreatureSwitched {
        side_index: usize,
        old_creature: String,
        new_creature: String,
    },
    WeatherChanged {
        old: Weather,
        new: Weather,
        turns_remaining: Option<u8>,
    },

    // Move resolution
    MoveUsed {
        side_index: usize,
        user: String,
        move_name: String,
        target: String,
        success: bool,
        critical: bool,
        effectiveness: EffectivenessTier,
    },
    ChargingStarted {
        creature: String,
        move_name: String,
    },

    // State changes
    HealthChanged {
        creature: String,
        old_hp: u16,
        new_hp: u16,
        delta: i32,
        source: DamageSource,
    },
    CreatureFainted {
        side_index: usize,
        creature: String,
    },
    StatusChanged {
        creature: String,
        old: Option<StatusCondition>,
        new: Option<StatusCondition>,
        turns_remaining: u8,
        source: DamageSource,
    },
    CreatureFlinched {
        creature: String,
    },
    StatStageChanged {
        creature: String,
        stat: StatType,
        old_stage: i8,
        new_stage: i8,
    },

    // Action failures
    ActionFailed {
        side_index: usize,
        reason: ActionFailureReason,
    },
}

/// Event bus collecting everything that happened during one turn, in order.
#[derive(Debug, Clone, Default)]
pub struct EventBus {
    events: Vec<BattleEvent>,
}

impl EventBus {
    pub fn new() -> Self {
        Self { events: Vec::new() }
    }

    pub fn push(&mut self, event: BattleEvent) {
        self.events.push(event);
    }

    pub fn events(&self) -> &[BattleEvent] {
        &self.events
    }

    pub fn is_empty(&self) -> bool {
        self.events.is_empty()
    }

    pub fn len(&self) -> usize {
        self.events.len()
    }
}

impl std::fmt::Display for EventBus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        for event in &self.events {
            writeln!(f, "  {:?}", event)?;
        }
        Ok(())
    }
}

/// Reported by a sink that could not handle an event. The engine logs it and
/// moves on; a failing listener never interrupts turn resolution.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SinkError {
    pub message: String,
}

impl std::fmt::Display for SinkError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.message)
    }
}

impl std::error::Error for SinkError {}

/// Best-effort observer of battle events (health bars, loggers, renderers).
pub trait EventSink {
    /// A human-facing label used when logging delivery failures.
    fn name(&self) -> &str {
        "sink"
    }

    fn on_event(&mut self, event: &BattleEvent) -> Result<(), SinkError>;
}

/// The battle's single source of nondeterminism. Every draw is labeled with a
/// reason, which makes scripted test sequences self-documenting and keeps
/// draw-order changes visible in test failures.
#[derive(Debug, Clone)]
pub struct BattleRng {
    source: RngSource,
}

#[derive(Debug, Clone)]
enum RngSource {
    Seeded(SmallRng),
    Scripted { outcomes: Vec<u8>, index: usize },
}

impl BattleRng {
    /// Deterministic stream from an explicit seed. This is the production
    /// constructor; there is intentionally no time-seeded default.
    pub fn from_seed(seed: u64) -> Self {
        Self {
            source: RngSource::Seeded(SmallRng::seed_from_u64(seed)),
        }
    }

    /// OS-seeded stream for callers that genuinely want fresh randomness.
    pub fn from_os_entropy() -> Self {
        Self {
            source: RngSource::Seeded(SmallRng::from_os_rng()),
        }
    }

    /// Fixed outcome sequence for tests. `roll` returns values verbatim;
    /// `one_in`/`pick` reduce the next value modulo their range.
    pub fn scripted(outcomes: Vec<u8>) -> Self {
        Self {
            source: RngSource::Scripted { outcomes, index: 0 },
        }
    }

    fn next_scripted(&mut self, reason: &str) -> u8 {
        let RngSource::Scripted { outcomes, index } = &mut self.source else {
            unreachable!("next_scripted called on a seeded source");
        };
        let Some(&value) = outcomes.get(*index) else {
            panic!(
                "Scripted RNG exhausted after {} draws; needed a value for: {}",
                index, reason
            );
        };
        *index += 1;
        log::trace!("rng[{}] = {} ({})", *index - 1, value, reason);
        value
    }

    /// Uniform integer in [1, 100].
    pub fn roll(&mut self, reason: &str) -> u8 {
        match &mut self.source {
            RngSource::Seeded(rng) => rng.random_range(1..=100),
            RngSource::Scripted { .. } => self.next_scripted(reason),
        }
    }

    /// Bernoulli draw that succeeds `percent` times in 100.
    pub fn chance(&mut self, percent: u8, reason: &str) -> bool {
        self.roll(reason) <= percent
    }

    /// Bernoulli draw with probability exactly 1/n.
    pub fn one_in(&mut self, n: u32, reason: &str) -> bool {
        match &mut self.source {
            RngSource::Seeded(rng) => rng.random_range(0..n) == 0,
            RngSource::Scripted { .. } => u32::from(self.next_scripted(reason)) % n == 0,
        }
    }

    /// Uniform index in [0, len).
    pub fn pick(&mut self, len: usize, reason: &str) -> usize {
        debug_assert!(len > 0, "pick() needs a non-empty range");
        match &mut self.source {
            RngSource::Seeded(rng) => rng.random_range(0..len),
            RngSource::Scripted { .. } => usize::from(self.next_scripted(reason)) % len,
        }
    }

    pub fn coin_flip(&mut self, reason: &str) -> bool {
        self.one_in(2, reason)
    }
}

#[derive(Serialize, Deserialize, Debug, Clone)]
pub struct BattleState {
    pub battle_id: String,
    pub sides: [BattleSide; 2],
    pub weather: Weather,
    /// Turns until the weather expires; `None` means it persists.
    pub weather_turns_remaining: Option<u8>,
    pub turn_number: u32,
    pub game_state: GameState,
    pub action_queue: [Option<Action>; 2],
}

impl BattleState {
    pub fn new(battle_id: String, side1: BattleSide, side2: BattleSide) -> Self {
        Self {
            battle_id,
            sides: [side1, side2],
            weather: Weather::None,
            weather_turns_remaining: None,
            turn_number: 1,
            game_state: GameState::WaitingForActions,
            action_queue: [None, None],
        }
    }

    pub fn is_over(&self) -> bool {
        matches!(
            self.game_state,
            GameState::Side1Win | GameState::Side2Win | GameState::Draw
        )
    }

    /// Winning side index, if the battle ended with a winner.
    pub fn winner(&self) -> Option<usize> {
        match self.game_state {
            GameState::Side1Win => Some(0),
            GameState::Side2Win => Some(1),
            _ => None,
        }
    }
}
