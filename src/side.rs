//! One side of a battle: an ordered team of up to six creatures and the
//! index of the one currently on the field.

use crate::creature::Creature;
use crate::errors::{BattleResult, SelectionError, TeamError};
use serde::{Deserialize, Serialize};

pub const TEAM_SIZE: usize = 6;

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BattleSide {
    /// A unique identifier. For a human this could be their user id; for an
    /// AI opponent something like "AI_RIVAL".
    pub side_id: String,
    pub name: String,
    pub team: [Option<Creature>; TEAM_SIZE],
    pub active_index: usize,
    /// Move index the active creature last executed, if any.
    pub last_move_index: Option<usize>,
}

impl BattleSide {
    /// Build a side from an ordered roster. Extra members beyond six are
    /// dropped. An empty roster is allowed here; the battle resolves it
    /// immediately as a loss (or a draw if both sides are empty).
    pub fn new(side_id: String, name: String, roster: Vec<Creature>) -> Self {
        let mut team = [const { None }; TEAM_SIZE];
        for (i, creature) in roster.into_iter().take(TEAM_SIZE).enumerate() {
            team[i] = Some(creature);
        }
        BattleSide {
            side_id,
            name,
            team,
            active_index: 0,
            last_move_index: None,
        }
    }

    pub fn active(&self) -> Option<&Creature> {
        self.team
            .get(self.active_index)
            .and_then(|slot| slot.as_ref())
    }

    pub fn active_mut(&mut self) -> Option<&mut Creature> {
        self.team
            .get_mut(self.active_index)
            .and_then(|slot| slot.as_mut())
    }

    pub fn member_count(&self) -> usize {
        self.team.iter().filter(|slot| slot.is_some()).count()
    }

    pub fn has_living_member(&self) -> bool {
        self.team
            .iter()
            .flatten()
            .any(|creature| !creature.is_fainted())
    }

    /// Index of the first non-fainted member, in roster order.
    pub fn first_living_index(&self) -> Option<usize> {
        self.team
            .iter()
            .enumerate()
            .find(|(_, slot)| slot.as_ref().is_some_and(|c| !c.is_fainted()))
            .map(|(i, _)| i)
    }

    /// Indices the side could legally switch to right now.
    pub fn valid_switch_indices(&self) -> Vec<usize> {
        self.team
            .iter()
            .enumerate()
            .filter(|(i, slot)| {
                *i != self.active_index && slot.as_ref().is_some_and(|c| !c.is_fainted())
            })
            .map(|(i, _)| i)
            .collect()
    }

    /// Validate a switch target at the input boundary, so turn resolution
    /// never sees an invalid index.
    pub fn validate_switch(&self, target: usize) -> BattleResult<()> {
        let slot = self
            .team
            .get(target)
            .ok_or(SelectionError::InvalidSwitchIndex(target))?;
        let creature = slot
            .as_ref()
            .ok_or(SelectionError::InvalidSwitchIndex(target))?;
        if creature.is_fainted() {
            return Err(SelectionError::SwitchTargetFainted(target).into());
        }
        if target == self.active_index {
            return Err(SelectionError::AlreadyActive(target).into());
        }
        Ok(())
    }

    /// Validate a move selection at the input boundary.
    pub fn validate_move(&self, move_index: usize) -> BattleResult<()> {
        let active = self
            .active()
            .ok_or(TeamError::EmptyTeam)?;
        if move_index >= active.moves.len() {
            return Err(SelectionError::InvalidMoveIndex(move_index).into());
        }
        Ok(())
    }

    /// Swap the active creature. The outgoing creature loses its volatile
    /// state (stat stages, multi-turn state, flinch); major status stays.
    pub fn switch_to(&mut self, target: usize) -> BattleResult<()> {
        self.validate_switch(target)?;
        if let Some(outgoing) = self.active_mut() {
            outgoing.reset_volatile_state();
        }
        self.active_index = target;
        self.last_move_index = None;
        Ok(())
    }
}
