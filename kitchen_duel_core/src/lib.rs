use std::ops::{Index, IndexMut};

use serde::{Deserialize, Serialize};

pub mod actions;
pub mod agent;
pub mod config;
pub mod error;
pub mod game;
pub mod item;
pub mod level;
pub mod map;
pub mod order;
pub mod snapshot;
pub mod state;
pub mod switch;
pub mod tile;

/// Unique identifier for agents (bots).
pub type BotId = usize;

/// Turn counter. Turn 0 is the state before the first `start_turn`.
pub type Turn = u32;

/// Team balance. Penalties may push it below zero.
pub type Money = i64;

/// Represents a 2D coordinate on a kitchen grid.
///
/// `(0, 0)` is the bottom-left cell; `y` grows upwards.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct Position {
    pub x: usize,
    pub y: usize,
}

impl Position {
    pub const fn new(x: usize, y: usize) -> Self {
        Position { x, y }
    }

    /// King-move distance: the number of 8-directional steps between two cells.
    pub fn chebyshev(&self, other: Position) -> usize {
        self.x.abs_diff(other.x).max(self.y.abs_diff(other.y))
    }
}

/// One of the two competing teams.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum Team {
    Red,
    Blue,
}

impl Team {
    pub const ALL: [Team; 2] = [Team::Red, Team::Blue];

    pub fn other(self) -> Team {
        match self {
            Team::Red => Team::Blue,
            Team::Blue => Team::Red,
        }
    }

    pub fn name(self) -> &'static str {
        match self {
            Team::Red => "RED",
            Team::Blue => "BLUE",
        }
    }
}

/// A value held once per team, indexable by [`Team`].
///
/// Each side owns its own copy; nothing is shared between `red` and `blue`.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct PerTeam<T> {
    pub red: T,
    pub blue: T,
}

impl<T> PerTeam<T> {
    pub fn new(red: T, blue: T) -> Self {
        PerTeam { red, blue }
    }

    /// Builds both sides from a generator so each gets an independent value.
    pub fn from_fn<F>(mut f: F) -> Self
    where
        F: FnMut(Team) -> T,
    {
        PerTeam {
            red: f(Team::Red),
            blue: f(Team::Blue),
        }
    }
}

impl<T> Index<Team> for PerTeam<T> {
    type Output = T;

    #[inline]
    fn index(&self, team: Team) -> &Self::Output {
        match team {
            Team::Red => &self.red,
            Team::Blue => &self.blue,
        }
    }
}

impl<T> IndexMut<Team> for PerTeam<T> {
    #[inline]
    fn index_mut(&mut self, team: Team) -> &mut Self::Output {
        match team {
            Team::Red => &mut self.red,
            Team::Blue => &mut self.blue,
        }
    }
}

pub use actions::{Action, ActionResult, Rejection};
pub use config::GameConfig;
pub use error::GameError;
pub use state::{BotState, GameState};
