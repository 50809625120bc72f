use serde::{Deserialize, Serialize};
use std::fmt;
use strum::EnumIter;

/// The 18 elemental types a creature or move can have.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Hash, EnumIter)]
pub enum CreatureType {
    Normal,
    Fighting,
    Flying,
    Poison,
    Ground,
    Rock,
    Bug,
    Ghost,
    Steel,
    Fire,
    Water,
    Grass,
    Electric,
    Psychic,
    Ice,
    Dragon,
    Dark,
    Fairy,
}

impl fmt::Display for CreatureType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:?}", self)
    }
}

/// The five battle stats that stat stages can modify.
/// HP is deliberately absent: it has no stage.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Hash, EnumIter)]
pub enum StatType {
    Attack,
    Defense,
    SpecialAttack,
    SpecialDefense,
    Speed,
}

impl fmt::Display for StatType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            StatType::Attack => write!(f, "Attack"),
            StatType::Defense => write!(f, "Defense"),
            StatType::SpecialAttack => write!(f, "Special Attack"),
            StatType::SpecialDefense => write!(f, "Special Defense"),
            StatType::Speed => write!(f, "Speed"),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct BaseStats {
    pub hp: u16,
    pub attack: u16,
    pub defense: u16,
    pub special_attack: u16,
    pub special_defense: u16,
    pub speed: u16,
}

/// Static definition of a creature species, as delivered by a data provider.
/// Validation (stat ranges, 1-2 types, non-empty name) is the provider's job;
/// the engine assumes a `SpeciesData` it receives is well formed.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SpeciesData {
    pub name: String,
    pub types: Vec<CreatureType>,
    pub base_stats: BaseStats,
}
