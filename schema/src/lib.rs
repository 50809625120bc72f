// Creature Battle Schema - shared type definitions
// This crate contains the data-model types shared between the battle engine
// and whatever loads or generates creature/move data, keeping the engine free
// of any knowledge about where the data came from.

pub use creature_types::*;
pub use move_data::*;

pub mod creature_types;
pub mod move_data;
