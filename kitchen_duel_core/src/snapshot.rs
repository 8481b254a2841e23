//! Serializable view of a whole match, for rendering, logging and replay checks.

use serde::{Deserialize, Serialize};

use crate::{
    Money, PerTeam, Team, Turn,
    map::Grid,
    order::Order,
    state::{BotState, GameState},
    tile::Tile,
};

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct GameSnapshot {
    pub turn: Turn,
    pub money: PerTeam<Money>,
    /// Agents in id order.
    pub bots: Vec<BotState>,
    pub orders: PerTeam<Vec<Order>>,
    pub maps: PerTeam<Grid<Tile>>,
    pub switch_turn: Turn,
    pub switch_duration: Turn,
    pub switched: PerTeam<bool>,
}

impl GameState {
    pub fn snapshot(&self) -> GameSnapshot {
        GameSnapshot {
            turn: self.turn,
            money: self.money.clone(),
            bots: self.bots.values().cloned().collect(),
            orders: PerTeam::from_fn(|team: Team| self.ledger.orders(team).to_vec()),
            maps: PerTeam::from_fn(|team: Team| self.maps[team].tiles().clone()),
            switch_turn: self.switch_turn(),
            switch_duration: self.switch_duration(),
            switched: self.switched.clone(),
        }
    }
}
