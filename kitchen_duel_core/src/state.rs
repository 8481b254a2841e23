use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};
use tracing::{debug, warn};

use crate::{
    BotId, Money, PerTeam, Position, Team, Turn,
    config::GameConfig,
    error::GameError,
    item::{FoodKind, Item},
    level::ParsedLevel,
    map::{Grid, KitchenMap},
    order::{Order, OrderId, OrderLedger},
    tile::{Tile, TileKind},
};

/// Holds the state of one agent.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct BotState {
    pub id: BotId,
    /// Home team, fixed for the whole match.
    pub team: Team,
    /// The grid the bot currently stands on. Differs from `team` only while switched.
    pub map_team: Team,
    pub position: Position,
    pub holding: Option<Item>,
}

impl BotState {
    pub fn is_switched(&self) -> bool {
        self.map_team != self.team
    }
}

/// The full match state: both kitchens, agents, money, orders and the switch window.
///
/// All mutation goes through [`GameState::start_turn`] and the action handlers.
#[derive(Debug, Clone)]
pub struct GameState {
    pub(crate) config: GameConfig,
    pub(crate) turn: Turn,
    pub(crate) maps: PerTeam<KitchenMap>,
    pub(crate) occupancy: PerTeam<Grid<Option<BotId>>>,
    pub(crate) money: PerTeam<Money>,
    pub(crate) ledger: OrderLedger,
    pub(crate) bots: BTreeMap<BotId, BotState>,
    pub(crate) switched: PerTeam<bool>,
}

impl GameState {
    /// Creates a match with no agents and no orders. Each team gets its own
    /// instance of its layout.
    pub fn new(red: &Grid<TileKind>, blue: &Grid<TileKind>, config: GameConfig) -> Self {
        let maps = PerTeam::new(
            KitchenMap::from_layout(Team::Red, red),
            KitchenMap::from_layout(Team::Blue, blue),
        );
        let occupancy = PerTeam::from_fn(|team| Grid::new(maps[team].width(), maps[team].height()));
        GameState {
            turn: 0,
            money: PerTeam::new(config.starting_money, config.starting_money),
            ledger: OrderLedger::new(),
            bots: BTreeMap::new(),
            switched: PerTeam::default(),
            maps,
            occupancy,
            config,
        }
    }

    /// Sets up a match from a parsed level: both teams play identical but
    /// independent copies of the layout and order list.
    pub fn from_level(level: &ParsedLevel, mut config: GameConfig) -> Result<Self, GameError> {
        if let Some(switch) = level.switch {
            config.switch_turn = switch.turn.unwrap_or(config.switch_turn);
            config.switch_duration = switch.duration.unwrap_or(config.switch_duration);
        }
        let mut state = GameState::new(&level.layout, &level.layout, config);
        state.ledger = OrderLedger::from_seed(&level.orders);
        for team in Team::ALL {
            for spawn in &level.spawns[team] {
                state.add_bot(team, spawn.x, spawn.y)?;
            }
        }
        Ok(state)
    }

    pub fn config(&self) -> &GameConfig {
        &self.config
    }

    pub fn turn(&self) -> Turn {
        self.turn
    }

    pub fn is_over(&self) -> bool {
        self.turn >= self.config.total_turns
    }

    pub fn map(&self, team: Team) -> &KitchenMap {
        &self.maps[team]
    }

    /// Direct tile lookup. Out-of-bounds coordinates are a caller bug.
    pub fn tile(&self, team: Team, x: usize, y: usize) -> Result<&Tile, GameError> {
        self.maps[team]
            .tile(x, y)
            .ok_or(GameError::OutOfBounds { team, x, y })
    }

    pub fn occupant(&self, team: Team, x: usize, y: usize) -> Option<BotId> {
        self.occupancy[team].get(x, y).copied().flatten()
    }

    pub fn occupancy(&self, team: Team) -> &Grid<Option<BotId>> {
        &self.occupancy[team]
    }

    pub fn money(&self, team: Team) -> Money {
        self.money[team]
    }

    pub(crate) fn add_money(&mut self, team: Team, delta: Money) {
        self.money[team] += delta;
    }

    pub fn orders(&self, team: Team) -> &[Order] {
        self.ledger.orders(team)
    }

    pub fn bot(&self, id: BotId) -> Result<&BotState, GameError> {
        self.bots.get(&id).ok_or(GameError::UnknownBot(id))
    }

    pub(crate) fn bot_mut(&mut self, id: BotId) -> Result<&mut BotState, GameError> {
        self.bots.get_mut(&id).ok_or(GameError::UnknownBot(id))
    }

    /// All agents in id order.
    pub fn bots(&self) -> impl Iterator<Item = &BotState> {
        self.bots.values()
    }

    pub fn team_bot_ids(&self, team: Team) -> Vec<BotId> {
        self.bots
            .values()
            .filter(|bot| bot.team == team)
            .map(|bot| bot.id)
            .collect()
    }

    pub fn is_switched(&self, team: Team) -> bool {
        self.switched[team]
    }

    /// Spawns an agent with the next free id on its home grid.
    pub fn add_bot(&mut self, team: Team, x: usize, y: usize) -> Result<BotId, GameError> {
        let id = self.bots.keys().next_back().map_or(0, |last| last + 1);
        self.add_bot_with_id(id, team, x, y)
    }

    pub fn add_bot_with_id(
        &mut self,
        id: BotId,
        team: Team,
        x: usize,
        y: usize,
    ) -> Result<BotId, GameError> {
        if self.bots.contains_key(&id) {
            return Err(GameError::DuplicateBot(id));
        }
        if !self.tile(team, x, y)?.is_walkable() {
            return Err(GameError::NotWalkable { team, x, y });
        }
        if let Some(occupant) = self.occupant(team, x, y) {
            return Err(GameError::Occupied {
                team,
                x,
                y,
                occupant,
            });
        }

        let position = Position::new(x, y);
        self.occupancy[team][position] = Some(id);
        self.bots.insert(
            id,
            BotState {
                id,
                team,
                map_team: team,
                position,
                holding: None,
            },
        );
        Ok(id)
    }

    /// Spawns the same order for both teams, starting this turn.
    pub fn spawn_order(
        &mut self,
        required: Vec<FoodKind>,
        delta_time: Turn,
        reward: Money,
        penalty: Money,
    ) -> OrderId {
        self.ledger
            .spawn(required, self.turn, delta_time, reward, penalty)
    }

    /// [`GameState::spawn_order`] with the configured duration, reward and penalty.
    pub fn spawn_default_order(&mut self, required: Vec<FoodKind>) -> OrderId {
        let GameConfig {
            default_order_duration,
            default_order_reward,
            default_order_penalty,
            ..
        } = self.config;
        self.spawn_order(
            required,
            default_order_duration,
            default_order_reward,
            default_order_penalty,
        )
    }

    /// Advances the match by one turn, before any agent acts:
    /// income, environment, order expiry, then switch-window closure.
    pub fn start_turn(&mut self) {
        self.turn += 1;

        for team in Team::ALL {
            self.add_money(team, self.config.money_per_turn);
        }

        for team in Team::ALL {
            self.tick_environment(team);
        }

        self.ledger.expire(self.turn, &mut self.money);

        if self.switch_window_ended() {
            for team in Team::ALL {
                self.return_team_home_if_switched(team);
            }
        }
    }

    /// Cooks food in pans and washes plates in sinks on one team's grid.
    fn tick_environment(&mut self, team: Team) {
        let map = &mut self.maps[team];
        let mut washed = Vec::new();
        for pos in map.tiles().column_major_positions() {
            let tile = &mut map.tiles_mut()[pos];
            if let Some(stage) = tile.advance_cooking(&self.config) {
                debug!(team = team.name(), x = pos.x, y = pos.y, ?stage, "cook stage changed");
            }
            if tile.advance_washing(&self.config) {
                washed.push(pos);
            }
        }
        for pos in washed {
            self.deposit_clean_plate(team, pos);
        }
    }

    /// Puts a freshly washed plate on the sink-table nearest to the sink at `from`.
    fn deposit_clean_plate(&mut self, team: Team, from: Position) {
        let map = &mut self.maps[team];
        let Some(target) = map.nearest_of_kind(from.x, from.y, TileKind::SinkTable) else {
            warn!(team = team.name(), "no sink table for a washed plate; plate lost");
            return;
        };
        if let Some(Tile::SinkTable { num_clean_plates }) = map.tile_mut(target.x, target.y) {
            *num_clean_plates += 1;
        }
    }

    /// Sends a submitted plate to the sink nearest to the submit tile at `from`.
    pub(crate) fn deposit_dirty_plate(&mut self, team: Team, from: Position) {
        let map = &mut self.maps[team];
        let Some(target) = map.nearest_of_kind(from.x, from.y, TileKind::Sink) else {
            warn!(team = team.name(), "no sink for a dirty plate; plate lost");
            return;
        };
        if let Some(Tile::Sink {
            num_dirty_plates, ..
        }) = map.tile_mut(target.x, target.y)
        {
            *num_dirty_plates += 1;
        }
    }
}
