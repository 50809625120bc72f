// In: src/lib.rs

//! Creature Battle Engine
//!
//! A deterministic turn-based battle resolution engine: creature state,
//! a damage formula pipeline, turn-order arbitration, and tiered AI
//! opponents. All randomness flows through a single injectable RNG, so
//! any battle can be replayed from its seed.

// --- MODULE DECLARATIONS ---
pub mod battle;
pub mod creature;
pub mod data;
pub mod errors;
pub mod side;
pub mod type_chart;
pub mod weather;

// --- PUBLIC API RE-EXPORTS ---
// The most important types, importable straight from the crate root.

// --- From the `schema` crate ---
pub use schema::{
    Ailment,
    AilmentKind,
    BaseStats,
    CreatureType,
    DamageClass,
    MoveData,
    MultiTurnBehavior,
    SpeciesData,
    StatType,
};

// --- From this crate's modules (`src/`) ---

// Core battle engine functions and state.
pub use battle::engine::{begin_battle, resolve_replacement, resolve_turn};
pub use battle::runner::Battle;
pub use battle::state::{
    Action, BattleEvent, BattleRng, BattleState, EventBus, EventSink, GameState,
};

// AI opponents.
pub use battle::ai::{Difficulty, Strategy};

// Core runtime types for a battle.
pub use creature::{Creature, MoveInstance, MultiTurnState, StatusCondition};
pub use side::{BattleSide, TEAM_SIZE};
pub use weather::Weather;

// Primary data access.
pub use data::{DataProvider, SampleLibrary};
pub use type_chart::{effectiveness, effectiveness_against};

// Crate-specific error and result types.
pub use errors::{
    BattleError, BattleResult, DataError, SelectionError, StateError, TeamError,
};
