//! Public battle facade: owns the state and RNG, validates inputs at the
//! boundary, drives AI-controlled sides, and fans events out to sinks.

use crate::battle::ai::Strategy;
use crate::battle::engine;
use crate::battle::state::{Action, BattleRng, BattleState, EventBus, EventSink, GameState};
use crate::errors::{BattleResult, StateError};
use crate::side::BattleSide;
use crate::weather::Weather;

pub struct Battle {
    state: BattleState,
    rng: BattleRng,
    strategies: [Option<Box<dyn Strategy>>; 2],
    sinks: Vec<Box<dyn EventSink>>,
}

impl Battle {
    /// Construct a battle and emit its opening events. Empty rosters resolve
    /// the battle immediately, before any turn runs.
    pub fn new(battle_id: String, side1: BattleSide, side2: BattleSide, rng: BattleRng) -> Self {
        Self {
            state: BattleState::new(battle_id, side1, side2),
            rng,
            strategies: [None, None],
            sinks: Vec::new(),
        }
    }

    /// Opening weather, optionally on a countdown. Call before `start`.
    pub fn with_weather(mut self, weather: Weather, turns: Option<u8>) -> Self {
        self.state.weather = weather;
        self.state.weather_turns_remaining = turns;
        self
    }

    /// Emit `BattleStarted` (and settle empty-roster battles). Call once.
    pub fn start(&mut self) -> EventBus {
        let bus = engine::begin_battle(&mut self.state);
        self.dispatch(&bus);
        bus
    }

    pub fn set_strategy(&mut self, side_index: usize, strategy: Box<dyn Strategy>) {
        self.strategies[side_index] = Some(strategy);
    }

    pub fn register_sink(&mut self, sink: Box<dyn EventSink>) {
        self.sinks.push(sink);
    }

    pub fn state(&self) -> &BattleState {
        &self.state
    }

    pub fn is_over(&self) -> bool {
        self.state.is_over()
    }

    pub fn winner(&self) -> Option<usize> {
        self.state.winner()
    }

    /// Queue an action for one side. Indices are validated here so turn
    /// resolution never sees a bad one.
    pub fn submit_action(&mut self, side_index: usize, action: Action) -> BattleResult<()> {
        if side_index >= 2 {
            return Err(StateError::InvalidSideIndex(side_index).into());
        }
        if self.state.game_state != GameState::WaitingForActions {
            return Err(StateError::NotAcceptingActions.into());
        }
        if self.state.action_queue[side_index].is_some() {
            return Err(StateError::ActionAlreadySubmitted(side_index).into());
        }
        match action {
            Action::UseMove { move_index } => {
                self.state.sides[side_index].validate_move(move_index)?;
            }
            Action::Switch { team_index } => {
                self.state.sides[side_index].validate_switch(team_index)?;
            }
        }
        self.state.action_queue[side_index] = Some(action);
        Ok(())
    }

    /// Bring in a replacement for a fainted active creature.
    pub fn submit_replacement(
        &mut self,
        side_index: usize,
        team_index: usize,
    ) -> BattleResult<EventBus> {
        let bus = engine::resolve_replacement(&mut self.state, side_index, team_index)?;
        self.dispatch(&bus);
        Ok(bus)
    }

    /// Resolve one turn. AI-controlled sides pick their own actions and
    /// replacements; sides without a strategy must have submitted already.
    pub fn run_turn(&mut self) -> BattleResult<EventBus> {
        if self.state.is_over() {
            return Err(StateError::NotAcceptingActions.into());
        }

        self.resolve_pending_replacements()?;
        if self.state.is_over() {
            return Ok(EventBus::new());
        }

        for side_index in 0..2 {
            if self.state.action_queue[side_index].is_none() {
                let Some(strategy) = &self.strategies[side_index] else {
                    return Err(StateError::MissingAction(side_index).into());
                };
                let action = strategy.choose_action(&self.state, side_index, &mut self.rng);
                self.state.action_queue[side_index] = Some(action);
            }
        }

        let bus = engine::resolve_turn(&mut self.state, &mut self.rng);
        self.dispatch(&bus);
        Ok(bus)
    }

    /// Drive the battle to its end, up to `max_turns`. Both sides need a
    /// strategy (or pre-queued actions every turn).
    pub fn run_until_over(&mut self, max_turns: u32) -> BattleResult<Option<usize>> {
        let mut turns = 0;
        while !self.state.is_over() && turns < max_turns {
            self.run_turn()?;
            turns += 1;
        }
        Ok(self.state.winner())
    }

    fn resolve_pending_replacements(&mut self) -> BattleResult<()> {
        loop {
            let waiting_on = match self.state.game_state {
                GameState::WaitingForSide1Replacement => 0,
                GameState::WaitingForSide2Replacement => 1,
                GameState::WaitingForBothReplacements => 0,
                _ => return Ok(()),
            };
            let Some(strategy) = &self.strategies[waiting_on] else {
                return Err(StateError::MissingAction(waiting_on).into());
            };
            let team_index = strategy.choose_replacement(&self.state, waiting_on, &mut self.rng);
            let bus = engine::resolve_replacement(&mut self.state, waiting_on, team_index)?;
            self.dispatch(&bus);
        }
    }

    /// Deliver events to every sink. A failing sink is logged and skipped;
    /// it never interrupts resolution or starves the other sinks.
    fn dispatch(&mut self, bus: &EventBus) {
        for event in bus.events() {
            for sink in self.sinks.iter_mut() {
                if let Err(err) = sink.on_event(event) {
                    log::warn!("event sink '{}' failed: {}", sink.name(), err);
                }
            }
        }
    }
}
