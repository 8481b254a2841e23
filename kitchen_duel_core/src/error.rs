use crate::{BotId, Team};

/// Caller or data-integrity bugs. Ordinary gameplay failures are reported
/// through [`crate::ActionResult`] instead.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum GameError {
    #[error("invalid bot id: {0}")]
    UnknownBot(BotId),

    #[error("bot id {0} is already in use")]
    DuplicateBot(BotId),

    #[error("bot {bot} belongs to team {owner:?}, not {caller:?}")]
    ForeignBot { bot: BotId, owner: Team, caller: Team },

    #[error("out of bounds: ({x}, {y}) on the {team:?} map")]
    OutOfBounds { team: Team, x: usize, y: usize },

    #[error("cannot place a bot on non-walkable tile ({x}, {y}) on the {team:?} map")]
    NotWalkable { team: Team, x: usize, y: usize },

    #[error("tile ({x}, {y}) on the {team:?} map is already occupied by bot {occupant}")]
    Occupied {
        team: Team,
        x: usize,
        y: usize,
        occupant: BotId,
    },

    #[error("invalid step ({dx}, {dy}); each component must be -1, 0 or 1")]
    InvalidStep { dx: isize, dy: isize },
}
