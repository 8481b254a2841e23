use rand::{Rng, SeedableRng, rngs::StdRng};

use crate::{
    BotId, Money, Team, Turn,
    actions::{Action, ActionResult},
    error::GameError,
    item::ShopItem,
    order::Order,
    state::{BotState, GameState},
    tile::Tile,
};

/// Trait defining the decision logic of one team.
/// Controllers act on the match only through the [`TeamHandle`] they are given.
pub trait Controller {
    /// Issues any number of actions for the team's agents during one turn.
    /// An error aborts the match.
    fn play_turn(&mut self, handle: &mut TeamHandle<'_>) -> Result<(), GameError>;
}

/// One team's view of the match for the duration of a turn.
///
/// Queries see the whole state; actions are restricted to the team's own agents.
pub struct TeamHandle<'a> {
    state: &'a mut GameState,
    team: Team,
}

impl<'a> TeamHandle<'a> {
    pub fn new(state: &'a mut GameState, team: Team) -> Self {
        TeamHandle { state, team }
    }

    pub fn team(&self) -> Team {
        self.team
    }

    pub fn state(&self) -> &GameState {
        self.state
    }

    pub fn turn(&self) -> Turn {
        self.state.turn()
    }

    pub fn money(&self) -> Money {
        self.state.money(self.team)
    }

    /// Ids of this team's agents, ascending.
    pub fn bot_ids(&self) -> Vec<BotId> {
        self.state.team_bot_ids(self.team)
    }

    pub fn bot(&self, id: BotId) -> Result<&BotState, GameError> {
        self.state.bot(id)
    }

    pub fn orders(&self, team: Team) -> &[Order] {
        self.state.orders(team)
    }

    pub fn tile(&self, team: Team, x: usize, y: usize) -> Result<&Tile, GameError> {
        self.state.tile(team, x, y)
    }

    /// Applies `action` for one of this team's agents.
    pub fn act(&mut self, bot: BotId, action: Action) -> Result<ActionResult, GameError> {
        let owner = self.state.bot(bot)?.team;
        if owner != self.team {
            return Err(GameError::ForeignBot {
                bot,
                owner,
                caller: self.team,
            });
        }
        self.state.process_action(bot, action)
    }

    pub fn move_bot(&mut self, bot: BotId, dx: isize, dy: isize) -> Result<ActionResult, GameError> {
        self.act(bot, Action::Move { dx, dy })
    }

    pub fn place(&mut self, bot: BotId, x: usize, y: usize) -> Result<ActionResult, GameError> {
        self.act(bot, Action::Place { x, y })
    }

    pub fn pickup(&mut self, bot: BotId, x: usize, y: usize) -> Result<ActionResult, GameError> {
        self.act(bot, Action::Pickup { x, y })
    }

    pub fn chop(&mut self, bot: BotId, x: usize, y: usize) -> Result<ActionResult, GameError> {
        self.act(bot, Action::Chop { x, y })
    }

    pub fn buy(
        &mut self,
        bot: BotId,
        item: ShopItem,
        x: usize,
        y: usize,
    ) -> Result<ActionResult, GameError> {
        self.act(bot, Action::Buy { item, x, y })
    }

    pub fn add_food_to_plate(
        &mut self,
        bot: BotId,
        x: usize,
        y: usize,
    ) -> Result<ActionResult, GameError> {
        self.act(bot, Action::AddFoodToPlate { x, y })
    }

    pub fn take_from_pan(
        &mut self,
        bot: BotId,
        x: usize,
        y: usize,
    ) -> Result<ActionResult, GameError> {
        self.act(bot, Action::TakeFromPan { x, y })
    }

    pub fn submit(&mut self, bot: BotId, x: usize, y: usize) -> Result<ActionResult, GameError> {
        self.act(bot, Action::Submit { x, y })
    }

    pub fn trash(&mut self, bot: BotId, x: usize, y: usize) -> Result<ActionResult, GameError> {
        self.act(bot, Action::Trash { x, y })
    }

    pub fn wash(&mut self, bot: BotId, x: usize, y: usize) -> Result<ActionResult, GameError> {
        self.act(bot, Action::Wash { x, y })
    }

    pub fn request_switch(&mut self) -> ActionResult {
        self.state.request_switch(self.team)
    }
}

/// A controller that never acts.
#[derive(Debug, Default, Clone, Copy)]
pub struct Idle;

impl Controller for Idle {
    fn play_turn(&mut self, _handle: &mut TeamHandle<'_>) -> Result<(), GameError> {
        Ok(())
    }
}

/// Moves every agent of the team one random step per turn.
#[derive(Debug)]
pub struct RandomWalker {
    rng: StdRng,
}

impl RandomWalker {
    pub fn new(seed: u64) -> Self {
        Self {
            rng: StdRng::seed_from_u64(seed),
        }
    }
}

impl Controller for RandomWalker {
    fn play_turn(&mut self, handle: &mut TeamHandle<'_>) -> Result<(), GameError> {
        for bot in handle.bot_ids() {
            let dx = self.rng.random_range(-1i8..=1) as isize;
            let dy = self.rng.random_range(-1i8..=1) as isize;
            if dx == 0 && dy == 0 {
                continue;
            }
            // Bumping into walls or other agents is fine.
            handle.move_bot(bot, dx, dy)?;
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{config::GameConfig, map::Grid, tile::TileKind};

    fn state() -> GameState {
        let grid = Grid::from_generator(5, 5, |x, y| {
            if x == 0 || y == 0 || x == 4 || y == 4 {
                TileKind::Wall
            } else {
                TileKind::Floor
            }
        });
        let mut state = GameState::new(&grid, &grid, GameConfig::default());
        state.add_bot(Team::Red, 1, 1).unwrap();
        state.add_bot(Team::Blue, 2, 2).unwrap();
        state
    }

    #[test]
    fn handle_rejects_foreign_bots() {
        let mut state = state();
        let mut handle = TeamHandle::new(&mut state, Team::Red);
        assert_eq!(handle.move_bot(0, 1, 0), Ok(ActionResult::Success));
        assert_eq!(
            handle.move_bot(1, 1, 0),
            Err(GameError::ForeignBot {
                bot: 1,
                owner: Team::Blue,
                caller: Team::Red
            })
        );
        assert_eq!(state.bot(1).unwrap().position.x, 2);
    }

    #[test]
    fn random_walker_stays_on_walkable_cells() {
        let mut state = state();
        let mut walker = RandomWalker::new(7);
        for _ in 0..50 {
            state.start_turn();
            walker
                .play_turn(&mut TeamHandle::new(&mut state, Team::Red))
                .unwrap();
            let bot = state.bot(0).unwrap();
            assert!(
                state
                    .map(Team::Red)
                    .is_walkable(bot.position.x as isize, bot.position.y as isize)
            );
        }
    }

    #[test]
    fn same_seed_walks_the_same_path() {
        let walk = |seed| {
            let mut state = state();
            let mut walker = RandomWalker::new(seed);
            (0..20)
                .map(|_| {
                    walker
                        .play_turn(&mut TeamHandle::new(&mut state, Team::Red))
                        .unwrap();
                    state.bot(0).unwrap().position
                })
                .collect::<Vec<_>>()
        };
        assert_eq!(walk(3), walk(3));
    }
}
