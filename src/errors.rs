use std::fmt;

/// Main error type for the creature battle engine
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum BattleError {
    /// Error related to species or move data lookup
    Data(DataError),
    /// Error related to an invalid player/AI selection
    Selection(SelectionError),
    /// Error related to team composition
    Team(TeamError),
    /// Error related to invalid battle state
    State(StateError),
}

/// Errors related to data-provider lookups. These must surface before a
/// battle is constructed, never mid-battle.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DataError {
    /// The named species was not found by the provider
    SpeciesNotFound(String),
    /// The named move was not found by the provider
    MoveNotFound(String),
}

/// Errors related to move/switch selections. The engine rejects these at the
/// input boundary; turn resolution never sees an invalid index.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SelectionError {
    /// Move index is out of bounds for the active creature's move list
    InvalidMoveIndex(usize),
    /// Team index is out of bounds or names an empty slot
    InvalidSwitchIndex(usize),
    /// Switch target has fainted
    SwitchTargetFainted(usize),
    /// Switch target is already the active creature
    AlreadyActive(usize),
}

/// Errors related to team composition
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TeamError {
    /// The team holds no creatures at all
    EmptyTeam,
}

/// Errors related to battle state validation
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum StateError {
    /// No active creature found when one was expected
    NoActiveCreature,
    /// Invalid side index (only 0 and 1 exist)
    InvalidSideIndex(usize),
    /// An action was submitted in a phase that does not accept it
    NotAcceptingActions,
    /// An action was already submitted for this side this turn
    ActionAlreadySubmitted(usize),
    /// A turn was driven without an action or a strategy for this side
    MissingAction(usize),
}

impl fmt::Display for BattleError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            BattleError::Data(err) => write!(f, "Data error: {}", err),
            BattleError::Selection(err) => write!(f, "Selection error: {}", err),
            BattleError::Team(err) => write!(f, "Team error: {}", err),
            BattleError::State(err) => write!(f, "State error: {}", err),
        }
    }
}

impl fmt::Display for DataError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            DataError::SpeciesNotFound(name) => write!(f, "Species not found: {}", name),
            DataError::MoveNotFound(name) => write!(f, "Move not found: {}", name),
        }
    }
}

impl fmt::Display for SelectionError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SelectionError::InvalidMoveIndex(index) => write!(f, "Invalid move index: {}", index),
            SelectionError::InvalidSwitchIndex(index) => {
                write!(f, "Invalid switch index: {}", index)
            }
            SelectionError::SwitchTargetFainted(index) => {
                write!(f, "Switch target at index {} has fainted", index)
            }
            SelectionError::AlreadyActive(index) => {
                write!(f, "Creature at index {} is already active", index)
            }
        }
    }
}

impl fmt::Display for TeamError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            TeamError::EmptyTeam => write!(f, "Team has no creatures"),
        }
    }
}

impl fmt::Display for StateError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            StateError::NoActiveCreature => write!(f, "No active creature found"),
            StateError::InvalidSideIndex(index) => write!(f, "Invalid side index: {}", index),
            StateError::NotAcceptingActions => {
                write!(f, "Battle is not accepting actions in this phase")
            }
            StateError::ActionAlreadySubmitted(side) => {
                write!(f, "Side {} already submitted an action", side)
            }
            StateError::MissingAction(side) => {
                write!(f, "Side {} has no queued action and no strategy", side)
            }
        }
    }
}

impl std::error::Error for BattleError {}
impl std::error::Error for DataError {}
impl std::error::Error for SelectionError {}
impl std::error::Error for TeamError {}
impl std::error::Error for StateError {}

impl From<DataError> for BattleError {
    fn from(err: DataError) -> Self {
        BattleError::Data(err)
    }
}

impl From<SelectionError> for BattleError {
    fn from(err: SelectionError) -> Self {
        BattleError::Selection(err)
    }
}

impl From<TeamError> for BattleError {
    fn from(err: TeamError) -> Self {
        BattleError::Team(err)
    }
}

impl From<StateError> for BattleError {
    fn from(err: StateError) -> Self {
        BattleError::State(err)
    }
}

/// Type alias for Results using BattleError
pub type BattleResult<T> = Result<T, BattleError>;
