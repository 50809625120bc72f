//! Scripted opponents, one strategy per difficulty tier.
//!
//! Strategies read the full battle state but never mutate it; they produce an
//! `Action` for the runner to submit through the normal input boundary.

use ordered_float::OrderedFloat;

use crate::battle::state::{Action, BattleRng, BattleState};
use crate::creature::Creature;
use crate::type_chart::effectiveness_against;

const STAB_MULTIPLIER: f64 = 1.5;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Difficulty {
    Easy,
    Medium,
    Hard,
    Expert,
}

impl Difficulty {
    pub fn strategy(self) -> Box<dyn Strategy> {
        match self {
            Difficulty::Easy => Box::new(EasyStrategy),
            Difficulty::Medium => Box::new(MediumStrategy),
            Difficulty::Hard => Box::new(HardStrategy),
            Difficulty::Expert => Box::new(ExpertStrategy),
        }
    }
}

/// Decision policy for one side. `choose_action` is called while the battle
/// accepts actions; `choose_replacement` while it waits for this side to
/// replace a fainted active creature.
pub trait Strategy {
    fn name(&self) -> &'static str;

    fn choose_action(&self, state: &BattleState, side_index: usize, rng: &mut BattleRng)
        -> Action;

    fn choose_replacement(
        &self,
        state: &BattleState,
        side_index: usize,
        rng: &mut BattleRng,
    ) -> usize;
}

/// Uniform random over moves that still have PP.
pub struct EasyStrategy;

impl Strategy for EasyStrategy {
    fn name(&self) -> &'static str {
        "easy"
    }

    fn choose_action(
        &self,
        state: &BattleState,
        side_index: usize,
        rng: &mut BattleRng,
    ) -> Action {
        let usable = state.sides[side_index]
            .active()
            .map(|c| c.usable_move_indices())
            .unwrap_or_default();
        if usable.is_empty() {
            // Engine substitutes Struggle for an empty slot.
            return Action::UseMove { move_index: 0 };
        }
        let pick = rng.pick(usable.len(), "ai move choice");
        Action::UseMove {
            move_index: usable[pick],
        }
    }

    fn choose_replacement(
        &self,
        state: &BattleState,
        side_index: usize,
        _rng: &mut BattleRng,
    ) -> usize {
        state.sides[side_index].first_living_index().unwrap_or(0)
    }
}

/// Picks the most type-effective damaging move, falling back to the first
/// usable one when nothing stands out.
pub struct MediumStrategy;

impl Strategy for MediumStrategy {
    fn name(&self) -> &'static str {
        "medium"
    }

    fn choose_action(
        &self,
        state: &BattleState,
        side_index: usize,
        _rng: &mut BattleRng,
    ) -> Action {
        let Some((user, target)) = actives(state, side_index) else {
            return Action::UseMove { move_index: 0 };
        };
        let best = user
            .usable_move_indices()
            .into_iter()
            .filter(|&i| user.moves[i].data.is_damaging())
            .max_by_key(|&i| {
                OrderedFloat(effectiveness_against(
                    user.moves[i].data.move_type,
                    &target.types,
                ))
            });
        match best {
            Some(index) => Action::UseMove { move_index: index },
            None => Action::UseMove {
                move_index: user.usable_move_indices().first().copied().unwrap_or(0),
            },
        }
    }

    fn choose_replacement(
        &self,
        state: &BattleState,
        side_index: usize,
        _rng: &mut BattleRng,
    ) -> usize {
        state.sides[side_index].first_living_index().unwrap_or(0)
    }
}

/// Scores moves by expected damage contribution and switches out of bad
/// matchups when the bench offers a better one.
pub struct HardStrategy;

impl Strategy for HardStrategy {
    fn name(&self) -> &'static str {
        "hard"
    }

    fn choose_action(
        &self,
        state: &BattleState,
        side_index: usize,
        _rng: &mut BattleRng,
    ) -> Action {
        let Some((user, target)) = actives(state, side_index) else {
            return Action::UseMove { move_index: 0 };
        };

        // Nothing lands at even neutral effectiveness: look for a bench
        // member with a real answer before committing to chip damage.
        if best_effectiveness(user, target) < 1.0 {
            if let Some(team_index) = best_bench_matchup(state, side_index, target, 1.0) {
                return Action::Switch { team_index };
            }
        }

        match best_move(user, target) {
            Some((index, _)) => Action::UseMove { move_index: index },
            None => Action::UseMove {
                move_index: user.usable_move_indices().first().copied().unwrap_or(0),
            },
        }
    }

    fn choose_replacement(
        &self,
        state: &BattleState,
        side_index: usize,
        _rng: &mut BattleRng,
    ) -> usize {
        let target = state.sides[1 - side_index].active();
        match target {
            Some(target) => best_bench_matchup(state, side_index, target, 0.0)
                .or_else(|| state.sides[side_index].first_living_index())
                .unwrap_or(0),
            None => state.sides[side_index].first_living_index().unwrap_or(0),
        }
    }
}

/// Hard's scoring with the opponent's likely retaliation priced in, both for
/// move choice and for switch targets. The retaliation term covers the whole
/// opposing team, so a matchup the opponent can pivot out of scores no better
/// than one their bench already answers.
pub struct ExpertStrategy;

impl Strategy for ExpertStrategy {
    fn name(&self) -> &'static str {
        "expert"
    }

    fn choose_action(
        &self,
        state: &BattleState,
        side_index: usize,
        _rng: &mut BattleRng,
    ) -> Action {
        let Some((user, target)) = actives(state, side_index) else {
            return Action::UseMove { move_index: 0 };
        };

        let threat = opposing_threat(state, side_index, user);
        let current_net = best_score(user, target) - 0.5 * threat;

        // A switch is worth it only when a bench member nets strictly better
        // than staying in, after pricing in what the opponent hits back with.
        let better_bench = state.sides[side_index]
            .valid_switch_indices()
            .into_iter()
            .filter_map(|i| {
                let candidate = state.sides[side_index].team[i].as_ref()?;
                let net = best_score(candidate, target)
                    - 0.5 * opposing_threat(state, side_index, candidate);
                (net > current_net).then_some((i, net))
            })
            .max_by_key(|&(_, net)| OrderedFloat(net));

        if let Some((team_index, net)) = better_bench {
            // Switching burns a turn; demand a clear margin.
            if net > current_net + 20.0 {
                return Action::Switch { team_index };
            }
        }

        match best_move(user, target) {
            Some((index, _)) => Action::UseMove { move_index: index },
            None => Action::UseMove {
                move_index: user.usable_move_indices().first().copied().unwrap_or(0),
            },
        }
    }

    fn choose_replacement(
        &self,
        state: &BattleState,
        side_index: usize,
        _rng: &mut BattleRng,
    ) -> usize {
        let Some(target) = state.sides[1 - side_index].active() else {
            return state.sides[side_index].first_living_index().unwrap_or(0);
        };
        state.sides[side_index]
            .team
            .iter()
            .enumerate()
            .filter_map(|(i, slot)| {
                let candidate = slot.as_ref().filter(|c| !c.is_fainted())?;
                let net = best_score(candidate, target)
                    - 0.5 * opposing_threat(state, side_index, candidate);
                Some((i, net))
            })
            .max_by_key(|&(_, net)| OrderedFloat(net))
            .map(|(i, _)| i)
            .unwrap_or(0)
    }
}

fn actives(state: &BattleState, side_index: usize) -> Option<(&Creature, &Creature)> {
    Some((
        state.sides[side_index].active()?,
        state.sides[1 - side_index].active()?,
    ))
}

/// Expected damage contribution of one move: power scaled by type matchup,
/// same-type bonus, and the chance it connects at all.
fn move_score(user: &Creature, target: &Creature, move_index: usize) -> f64 {
    let data = &user.moves[move_index].data;
    let Some(power) = data.power else {
        return 0.0;
    };
    let type_multiplier = effectiveness_against(data.move_type, &target.types);
    let stab = if user.types.contains(&data.move_type) {
        STAB_MULTIPLIER
    } else {
        1.0
    };
    let accuracy = f64::from(data.accuracy.unwrap_or(100)) / 100.0;
    f64::from(power) * type_multiplier * stab * accuracy
}

fn best_move(user: &Creature, target: &Creature) -> Option<(usize, f64)> {
    user.usable_move_indices()
        .into_iter()
        .filter(|&i| user.moves[i].data.is_damaging())
        .map(|i| (i, move_score(user, target, i)))
        .max_by_key(|&(_, score)| OrderedFloat(score))
}

fn best_score(user: &Creature, target: &Creature) -> f64 {
    best_move(user, target).map(|(_, score)| score).unwrap_or(0.0)
}

/// Strongest answer the opposing side can field against `creature`, counting
/// every living member, not just the current active.
fn opposing_threat(state: &BattleState, side_index: usize, creature: &Creature) -> f64 {
    state.sides[1 - side_index]
        .team
        .iter()
        .filter_map(|slot| slot.as_ref().filter(|c| !c.is_fainted()))
        .map(|opponent| best_score(opponent, creature))
        .fold(0.0, f64::max)
}

fn best_effectiveness(user: &Creature, target: &Creature) -> f64 {
    user.usable_move_indices()
        .into_iter()
        .filter(|&i| user.moves[i].data.is_damaging())
        .map(|i| effectiveness_against(user.moves[i].data.move_type, &target.types))
        .fold(0.0, f64::max)
}

/// Bench member whose best damaging move clears `threshold` effectiveness
/// against the given opponent, preferring the strongest matchup.
fn best_bench_matchup(
    state: &BattleState,
    side_index: usize,
    target: &Creature,
    threshold: f64,
) -> Option<usize> {
    state.sides[side_index]
        .valid_switch_indices()
        .into_iter()
        .filter_map(|i| {
            let candidate = state.sides[side_index].team[i].as_ref()?;
            let eff = best_effectiveness(candidate, target);
            (eff >= threshold).then_some((i, eff))
        })
        .max_by_key(|&(_, eff)| OrderedFloat(eff))
        .map(|(i, _)| i)
}
