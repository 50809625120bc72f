//! External data boundary: the engine consumes validated species and move
//! definitions through `DataProvider` and never learns where they came from.
//!
//! `SampleLibrary` is a small built-in provider used by tests and examples.

use crate::errors::{BattleResult, DataError};
use schema::{
    Ailment, AilmentKind, BaseStats, CreatureType, DamageClass, MoveData, MultiTurnBehavior,
    SpeciesData,
};
use std::collections::HashMap;

/// Synchronous lookup interface for pre-validated battle data. Implementors
/// must guarantee any returned data is well formed; malformed data is their
/// failure to report, before a battle is ever constructed.
pub trait DataProvider {
    fn species(&self, name: &str) -> BattleResult<SpeciesData>;
    fn move_data(&self, name: &str) -> BattleResult<MoveData>;
}

/// The guaranteed-available fallback move used when every real move has run
/// out of PP: typeless-feeling Normal hit that never misses, with 25% recoil.
pub fn struggle() -> MoveData {
    MoveData {
        name: "Struggle".to_string(),
        move_type: CreatureType::Normal,
        class: DamageClass::Physical,
        power: Some(50),
        accuracy: None,
        priority: 0,
        pp: 1,
        high_crit: false,
        ailment: None,
        drain_percent: -25,
        healing_percent: 0,
        hits: (1, 1),
        multi_turn: MultiTurnBehavior::None,
        weather_dependent: false,
    }
}

/// In-memory provider with a small, fixed roster.
pub struct SampleLibrary {
    species: HashMap<String, SpeciesData>,
    moves: HashMap<String, MoveData>,
}

impl SampleLibrary {
    pub fn new() -> Self {
        let mut library = SampleLibrary {
            species: HashMap::new(),
            moves: HashMap::new(),
        };
        library.populate_moves();
        library.populate_species();
        library
    }

    fn add_species(&mut self, name: &str, types: Vec<CreatureType>, stats: [u16; 6]) {
        self.species.insert(
            name.to_string(),
            SpeciesData {
                name: name.to_string(),
                types,
                base_stats: BaseStats {
                    hp: stats[0],
                    attack: stats[1],
                    defense: stats[2],
                    special_attack: stats[3],
                    special_defense: stats[4],
                    speed: stats[5],
                },
            },
        );
    }

    fn add_move(&mut self, data: MoveData) {
        self.moves.insert(data.name.clone(), data);
    }

    fn populate_species(&mut self) {
        use CreatureType::*;
        self.add_species("Emberling", vec![Fire], [140, 84, 78, 109, 85, 100]);
        self.add_species("Tidecaller", vec![Water], [158, 83, 100, 85, 105, 78]);
        self.add_species("Thornbeast", vec![Grass, Poison], [160, 82, 83, 100, 100, 80]);
        self.add_species("Voltvole", vec![Electric], [110, 55, 40, 90, 50, 140]);
        self.add_species("Craghorn", vec![Rock, Ground], [150, 110, 130, 45, 55, 45]);
        self.add_species("Frostwing", vec![Ice, Flying], [130, 85, 80, 95, 125, 85]);
        self.add_species("Duskmaw", vec![Ghost, Poison], [115, 65, 60, 130, 75, 110]);
        self.add_species("Ironhide", vec![Steel], [155, 90, 140, 60, 70, 40]);
    }

    fn populate_moves(&mut self) {
        use CreatureType::*;
        use DamageClass::*;

        self.add_move(MoveData::simple("Tackle", Normal, Physical, 40));
        self.add_move(MoveData::simple("Slam", Normal, Physical, 80));

        self.add_move(MoveData {
            accuracy: Some(100),
            ailment: Some(Ailment {
                kind: AilmentKind::Burn,
                chance: 10,
            }),
            ..MoveData::simple("Flame Burst", Fire, Special, 70)
        });
        self.add_move(MoveData {
            ailment: Some(Ailment {
                kind: AilmentKind::Burn,
                chance: 100,
            }),
            power: None,
            pp: 15,
            accuracy: Some(85),
            ..MoveData::simple("Will-o-Wisp", Fire, Status, 0)
        });
        self.add_move(MoveData::simple("Water Pulse", Water, Special, 60));
        self.add_move(MoveData {
            pp: 5,
            ..MoveData::simple("Torrent Cannon", Water, Special, 110)
        });
        self.add_move(MoveData {
            drain_percent: 50,
            pp: 10,
            ..MoveData::simple("Leech Life", Grass, Special, 75)
        });
        self.add_move(MoveData {
            ailment: Some(Ailment {
                kind: AilmentKind::Paralysis,
                chance: 10,
            }),
            ..MoveData::simple("Spark", Electric, Special, 65)
        });
        self.add_move(MoveData {
            power: None,
            accuracy: Some(90),
            pp: 20,
            ailment: Some(Ailment {
                kind: AilmentKind::Paralysis,
                chance: 100,
            }),
            ..MoveData::simple("Stun Wave", Electric, Status, 0)
        });
        self.add_move(MoveData {
            power: None,
            accuracy: Some(75),
            pp: 10,
            ailment: Some(Ailment {
                kind: AilmentKind::Sleep,
                chance: 100,
            }),
            ..MoveData::simple("Spore Cloud", Grass, Status, 0)
        });
        self.add_move(MoveData {
            ailment: Some(Ailment {
                kind: AilmentKind::Freeze,
                chance: 10,
            }),
            ..MoveData::simple("Ice Lance", Ice, Physical, 80)
        });
        self.add_move(MoveData {
            ailment: Some(Ailment {
                kind: AilmentKind::Flinch,
                chance: 30,
            }),
            ..MoveData::simple("Skull Rattle", Dark, Physical, 60)
        });
        self.add_move(MoveData {
            priority: 1,
            pp: 30,
            ..MoveData::simple("Quick Jab", Normal, Physical, 40)
        });
        self.add_move(MoveData {
            high_crit: true,
            ..MoveData::simple("Razor Fin", Water, Physical, 70)
        });
        self.add_move(MoveData {
            hits: (2, 5),
            accuracy: Some(85),
            ..MoveData::simple("Rock Volley", Rock, Physical, 25)
        });
        self.add_move(MoveData {
            accuracy: None,
            ..MoveData::simple("Aurora Dart", Ice, Special, 60)
        });
        self.add_move(MoveData {
            multi_turn: MultiTurnBehavior::Charge,
            weather_dependent: true,
            pp: 10,
            ..MoveData::simple("Solar Lance", Grass, Special, 120)
        });
        self.add_move(MoveData {
            multi_turn: MultiTurnBehavior::ChargeBoost,
            pp: 10,
            ..MoveData::simple("Granite Ram", Rock, Physical, 130)
        });
        self.add_move(MoveData {
            multi_turn: MultiTurnBehavior::Recharge,
            pp: 5,
            accuracy: Some(90),
            ..MoveData::simple("Hyper Surge", Normal, Special, 150)
        });
        self.add_move(MoveData {
            power: None,
            healing_percent: 50,
            pp: 10,
            accuracy: None,
            ..MoveData::simple("Mend", Normal, Status, 0)
        });
    }
}

impl Default for SampleLibrary {
    fn default() -> Self {
        Self::new()
    }
}

impl DataProvider for SampleLibrary {
    fn species(&self, name: &str) -> BattleResult<SpeciesData> {
        self.species
            .get(name)
            .cloned()
            .ok_or_else(|| DataError::SpeciesNotFound(name.to_string()).into())
    }

    fn move_data(&self, name: &str) -> BattleResult<MoveData> {
        self.moves
            .get(name)
            .cloned()
            .ok_or_else(|| DataError::MoveNotFound(name.to_string()).into())
    }
}
