//! The action surface: the only way agents change the match.
//!
//! Every handler validates all of its preconditions before touching any
//! state, so an action either applies completely or not at all. Gameplay
//! failures come back as [`ActionResult::Failure`]; only caller bugs (unknown
//! bot, malformed step) are returned as [`GameError`].

use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::{
    BotId, Position, Team,
    error::GameError,
    item::{Food, Item, ShopItem},
    state::{BotState, GameState},
    tile::Tile,
};

/// Why an action had no effect.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, thiserror::Error)]
pub enum Rejection {
    #[error("target is outside the grid")]
    OutOfBounds,
    #[error("target tile is not walkable")]
    NotWalkable,
    #[error("target cell is occupied")]
    Occupied,
    #[error("target tile is out of reach")]
    OutOfReach,
    #[error("hands are full")]
    HandsFull,
    #[error("hands are empty")]
    HandsEmpty,
    #[error("wrong tile for this action")]
    WrongTile,
    #[error("this tile does not take that item")]
    WrongItem,
    #[error("tile is full")]
    TileFull,
    #[error("nothing to take")]
    NothingToTake,
    #[error("nothing choppable here")]
    NotChoppable,
    #[error("insufficient funds")]
    InsufficientFunds,
    #[error("no plate to use")]
    NotAPlate,
    #[error("plate is dirty")]
    DirtyPlate,
    #[error("no food to use")]
    NoFood,
    #[error("no active order matches the plate")]
    NoMatchingOrder,
    #[error("no dirty plates to wash")]
    NothingToWash,
    #[error("switch window is closed")]
    SwitchWindowClosed,
    #[error("team has already switched")]
    AlreadySwitched,
}

/// Represents the outcome of an action.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum ActionResult {
    Success,
    Failure(Rejection),
}

impl ActionResult {
    pub fn is_success(self) -> bool {
        self == ActionResult::Success
    }
}

/// Represents actions an agent can take. Tile actions target `(x, y)` on the
/// agent's current grid.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Action {
    Move { dx: isize, dy: isize },
    Place { x: usize, y: usize },
    Pickup { x: usize, y: usize },
    Chop { x: usize, y: usize },
    Buy { item: ShopItem, x: usize, y: usize },
    AddFoodToPlate { x: usize, y: usize },
    TakeFromPan { x: usize, y: usize },
    Submit { x: usize, y: usize },
    Trash { x: usize, y: usize },
    Wash { x: usize, y: usize },
}

/// Internal failure of a handler: a gameplay rejection or a caller bug.
enum Fail {
    Rejected(Rejection),
    Fatal(GameError),
}

impl From<Rejection> for Fail {
    fn from(rejection: Rejection) -> Self {
        Fail::Rejected(rejection)
    }
}

impl From<GameError> for Fail {
    fn from(error: GameError) -> Self {
        Fail::Fatal(error)
    }
}

type Attempt = Result<(), Fail>;

fn finish(bot: BotId, action: &Action, attempt: Attempt) -> Result<ActionResult, GameError> {
    match attempt {
        Ok(()) => {
            debug!(bot, ?action, "action applied");
            Ok(ActionResult::Success)
        }
        Err(Fail::Rejected(reason)) => {
            debug!(bot, ?action, %reason, "action rejected");
            Ok(ActionResult::Failure(reason))
        }
        Err(Fail::Fatal(error)) => Err(error),
    }
}

/// What the agent is holding, as far as plating cares.
enum Hand {
    Food,
    Plate,
}

impl BotState {
    /// Takes the held item only if it is food.
    fn take_food(&mut self) -> Option<Food> {
        match self.holding.take() {
            Some(Item::Food(food)) => Some(food),
            other => {
                self.holding = other;
                None
            }
        }
    }
}

impl GameState {
    /// Applies one action for `bot`.
    pub fn process_action(
        &mut self,
        bot: BotId,
        action: Action,
    ) -> Result<ActionResult, GameError> {
        let attempt = match action {
            Action::Move { dx, dy } => self.try_move(bot, dx, dy),
            Action::Place { x, y } => self.try_place(bot, x, y),
            Action::Pickup { x, y } => self.try_pickup(bot, x, y),
            Action::Chop { x, y } => self.try_chop(bot, x, y),
            Action::Buy { item, x, y } => self.try_buy(bot, item, x, y),
            Action::AddFoodToPlate { x, y } => self.try_add_food_to_plate(bot, x, y),
            Action::TakeFromPan { x, y } => self.try_take_from_pan(bot, x, y),
            Action::Submit { x, y } => self.try_submit(bot, x, y),
            Action::Trash { x, y } => self.try_trash(bot, x, y),
            Action::Wash { x, y } => self.try_wash(bot, x, y),
        };
        finish(bot, &action, attempt)
    }

    /// Steps one cell in any of the 8 directions on the bot's current grid.
    pub fn move_bot(&mut self, bot: BotId, dx: isize, dy: isize) -> Result<ActionResult, GameError> {
        self.process_action(bot, Action::Move { dx, dy })
    }

    pub fn place(&mut self, bot: BotId, x: usize, y: usize) -> Result<ActionResult, GameError> {
        self.process_action(bot, Action::Place { x, y })
    }

    pub fn pickup(&mut self, bot: BotId, x: usize, y: usize) -> Result<ActionResult, GameError> {
        self.process_action(bot, Action::Pickup { x, y })
    }

    pub fn chop(&mut self, bot: BotId, x: usize, y: usize) -> Result<ActionResult, GameError> {
        self.process_action(bot, Action::Chop { x, y })
    }

    pub fn buy(
        &mut self,
        bot: BotId,
        item: ShopItem,
        x: usize,
        y: usize,
    ) -> Result<ActionResult, GameError> {
        self.process_action(bot, Action::Buy { item, x, y })
    }

    pub fn add_food_to_plate(
        &mut self,
        bot: BotId,
        x: usize,
        y: usize,
    ) -> Result<ActionResult, GameError> {
        self.process_action(bot, Action::AddFoodToPlate { x, y })
    }

    pub fn take_from_pan(
        &mut self,
        bot: BotId,
        x: usize,
        y: usize,
    ) -> Result<ActionResult, GameError> {
        self.process_action(bot, Action::TakeFromPan { x, y })
    }

    /// Submits the held plate against the orders of the grid's owner.
    pub fn submit(&mut self, bot: BotId, x: usize, y: usize) -> Result<ActionResult, GameError> {
        self.process_action(bot, Action::Submit { x, y })
    }

    pub fn trash(&mut self, bot: BotId, x: usize, y: usize) -> Result<ActionResult, GameError> {
        self.process_action(bot, Action::Trash { x, y })
    }

    /// Scrubs at a sink for this turn. Must be repeated every turn to make progress.
    pub fn wash(&mut self, bot: BotId, x: usize, y: usize) -> Result<ActionResult, GameError> {
        self.process_action(bot, Action::Wash { x, y })
    }

    /// Resolves a tile target on the bot's current grid within interaction range.
    fn reach(&self, bot: BotId, x: usize, y: usize) -> Result<(Team, Position), Fail> {
        let state = self.bot(bot)?;
        let team = state.map_team;
        if self.maps[team].tile(x, y).is_none() {
            return Err(Rejection::OutOfBounds.into());
        }
        let target = Position::new(x, y);
        if state.position.chebyshev(target) > self.config.interact_range {
            return Err(Rejection::OutOfReach.into());
        }
        Ok((team, target))
    }

    fn tile_at(&self, team: Team, pos: Position) -> &Tile {
        &self.maps[team].tiles()[pos]
    }

    fn tile_at_mut(&mut self, team: Team, pos: Position) -> &mut Tile {
        &mut self.maps[team].tiles_mut()[pos]
    }

    fn require_empty_hands(&self, bot: BotId) -> Attempt {
        if self.bot(bot)?.holding.is_some() {
            return Err(Rejection::HandsFull.into());
        }
        Ok(())
    }

    fn try_move(&mut self, id: BotId, dx: isize, dy: isize) -> Attempt {
        if !(-1..=1).contains(&dx) || !(-1..=1).contains(&dy) {
            return Err(GameError::InvalidStep { dx, dy }.into());
        }
        let bot = self.bot(id)?;
        let (team, from) = (bot.map_team, bot.position);
        let x = from.x.wrapping_add_signed(dx);
        let y = from.y.wrapping_add_signed(dy);

        let tile = self.maps[team]
            .tile(x, y)
            .ok_or(Rejection::OutOfBounds)?;
        if !tile.is_walkable() {
            return Err(Rejection::NotWalkable.into());
        }
        if self.occupant(team, x, y).is_some() {
            return Err(Rejection::Occupied.into());
        }

        let to = Position::new(x, y);
        self.occupancy[team][from] = None;
        self.occupancy[team][to] = Some(id);
        self.bot_mut(id)?.position = to;
        Ok(())
    }

    fn try_place(&mut self, id: BotId, x: usize, y: usize) -> Attempt {
        let (team, target) = self.reach(id, x, y)?;
        let held = self
            .bot(id)?
            .holding
            .as_ref()
            .ok_or(Rejection::HandsEmpty)?;
        self.tile_at(team, target).accepts(held)?;

        let Some(item) = self.bot_mut(id)?.holding.take() else {
            return Err(Rejection::HandsEmpty.into());
        };
        self.maps[team].tiles_mut()[target].receive(item, &self.config);
        Ok(())
    }

    fn try_pickup(&mut self, id: BotId, x: usize, y: usize) -> Attempt {
        let (team, target) = self.reach(id, x, y)?;
        self.require_empty_hands(id)?;
        let item = self.tile_at_mut(team, target).take()?;
        self.bot_mut(id)?.holding = Some(item);
        Ok(())
    }

    fn try_chop(&mut self, id: BotId, x: usize, y: usize) -> Attempt {
        let (team, target) = self.reach(id, x, y)?;
        self.require_empty_hands(id)?;
        match self.tile_at_mut(team, target) {
            Tile::Counter {
                item: Some(Item::Food(food)),
            } if food.kind.can_chop() && !food.chopped => {
                food.chopped = true;
                Ok(())
            }
            Tile::Counter { .. } => Err(Rejection::NotChoppable.into()),
            _ => Err(Rejection::WrongTile.into()),
        }
    }

    fn try_buy(&mut self, id: BotId, item: ShopItem, x: usize, y: usize) -> Attempt {
        let (team, target) = self.reach(id, x, y)?;
        if !matches!(self.tile_at(team, target), Tile::Shop) {
            return Err(Rejection::WrongTile.into());
        }
        self.require_empty_hands(id)?;
        let payer = self.bot(id)?.team;
        let cost = item.cost();
        if self.money[payer] < cost {
            return Err(Rejection::InsufficientFunds.into());
        }

        self.add_money(payer, -cost);
        self.bot_mut(id)?.holding = Some(item.materialize());
        Ok(())
    }

    /// Either drops held food onto a clean plate on a counter, or scoops food
    /// from a counter or a cooker's pan onto a held clean plate.
    fn try_add_food_to_plate(&mut self, id: BotId, x: usize, y: usize) -> Attempt {
        let (team, target) = self.reach(id, x, y)?;
        let bot = self.bots.get_mut(&id).ok_or(GameError::UnknownBot(id))?;
        let hand = match &bot.holding {
            None => return Err(Rejection::HandsEmpty.into()),
            Some(Item::Food(_)) => Hand::Food,
            Some(Item::Plate(plate)) if plate.is_dirty() => {
                return Err(Rejection::DirtyPlate.into());
            }
            Some(Item::Plate(_)) => Hand::Plate,
            Some(Item::Pan(_)) => return Err(Rejection::NoFood.into()),
        };
        let tile = &mut self.maps[team].tiles_mut()[target];

        match hand {
            Hand::Food => {
                let Tile::Counter {
                    item: Some(Item::Plate(plate)),
                } = tile
                else {
                    return Err(Rejection::NotAPlate.into());
                };
                if plate.is_dirty() {
                    return Err(Rejection::DirtyPlate.into());
                }
                let food = bot.take_food().ok_or(Rejection::NoFood)?;
                plate.add(food).map_err(|_| Rejection::DirtyPlate)?;
            }
            Hand::Plate => {
                let food = tile.take_food()?;
                if let Some(Item::Plate(plate)) = bot.holding.as_mut() {
                    plate.add(food).map_err(|_| Rejection::DirtyPlate)?;
                }
            }
        }
        Ok(())
    }

    fn try_take_from_pan(&mut self, id: BotId, x: usize, y: usize) -> Attempt {
        let (team, target) = self.reach(id, x, y)?;
        self.require_empty_hands(id)?;
        let food = self.tile_at_mut(team, target).take_pan_food()?;
        self.bot_mut(id)?.holding = Some(Item::Food(food));
        Ok(())
    }

    /// Orders are looked up on the grid the bot stands on, so a switched bot
    /// fulfils (and earns for) the opponent's orders.
    fn try_submit(&mut self, id: BotId, x: usize, y: usize) -> Attempt {
        let (team, target) = self.reach(id, x, y)?;
        if !matches!(self.tile_at(team, target), Tile::Submit) {
            return Err(Rejection::WrongTile.into());
        }
        let Some(Item::Plate(plate)) = &self.bot(id)?.holding else {
            return Err(Rejection::NotAPlate.into());
        };
        let index = self
            .ledger
            .find_match(team, self.turn, plate)
            .ok_or(Rejection::NoMatchingOrder)?;

        let reward = self.ledger.complete(team, index, id, self.turn);
        self.add_money(team, reward);
        self.deposit_dirty_plate(team, target);
        self.bot_mut(id)?.holding = None;
        Ok(())
    }

    fn try_trash(&mut self, id: BotId, x: usize, y: usize) -> Attempt {
        let (team, target) = self.reach(id, x, y)?;
        if !matches!(self.tile_at(team, target), Tile::Trash) {
            return Err(Rejection::WrongTile.into());
        }
        let bot = self.bot_mut(id)?;
        if bot.holding.take().is_none() {
            return Err(Rejection::HandsEmpty.into());
        }
        Ok(())
    }

    fn try_wash(&mut self, id: BotId, x: usize, y: usize) -> Attempt {
        let (team, target) = self.reach(id, x, y)?;
        match self.tile_at_mut(team, target) {
            Tile::Sink {
                num_dirty_plates: 0,
                ..
            } => Err(Rejection::NothingToWash.into()),
            Tile::Sink { using, .. } => {
                *using = true;
                Ok(())
            }
            _ => Err(Rejection::WrongTile.into()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{
        config::GameConfig,
        item::{CookStage, FoodKind, Pan, Plate},
        map::Grid,
        tile::TileKind,
    };

    // y=2  C K $
    // y=1  . . .
    // y=0  S U R
    fn state() -> GameState {
        let grid = Grid::from_generator(3, 3, |x, y| match (x, y) {
            (0, 2) => TileKind::Counter,
            (1, 2) => TileKind::Cooker,
            (2, 2) => TileKind::Shop,
            (0, 0) => TileKind::Sink,
            (1, 0) => TileKind::Submit,
            (2, 0) => TileKind::Trash,
            _ => TileKind::Floor,
        });
        GameState::new(&grid, &grid, GameConfig::default())
    }

    fn holding(state: &GameState, bot: BotId) -> Option<&Item> {
        state.bot(bot).unwrap().holding.as_ref()
    }

    #[test]
    fn move_respects_walls_bounds_and_other_bots() {
        let mut state = state();
        let a = state.add_bot(Team::Red, 0, 1).unwrap();
        let b = state.add_bot(Team::Red, 1, 1).unwrap();

        assert_eq!(state.move_bot(a, 1, 0), Ok(ActionResult::Failure(Rejection::Occupied)));
        assert_eq!(state.move_bot(a, -1, 0), Ok(ActionResult::Failure(Rejection::OutOfBounds)));
        assert_eq!(state.move_bot(a, 0, 1), Ok(ActionResult::Failure(Rejection::NotWalkable)));
        assert_eq!(state.move_bot(b, 0, -1), Ok(ActionResult::Success));
        assert_eq!(state.bot(b).unwrap().position, Position::new(1, 0));
        assert_eq!(state.occupant(Team::Red, 1, 1), None);
        assert_eq!(state.occupant(Team::Red, 1, 0), Some(b));
        assert_eq!(state.move_bot(a, 2, 0), Err(GameError::InvalidStep { dx: 2, dy: 0 }));
        assert_eq!(state.move_bot(9, 0, 0), Err(GameError::UnknownBot(9)));
    }

    #[test]
    fn buying_debits_only_on_success() {
        let mut state = state();
        let bot = state.add_bot(Team::Red, 2, 1).unwrap();
        state.money.red = 3;

        assert_eq!(
            state.buy(bot, ShopItem::Food(FoodKind::Meat), 2, 2),
            Ok(ActionResult::Failure(Rejection::InsufficientFunds))
        );
        assert_eq!(state.money(Team::Red), 3);

        assert_eq!(state.buy(bot, ShopItem::Plate, 2, 2), Ok(ActionResult::Success));
        assert_eq!(state.money(Team::Red), 1);
        assert_eq!(holding(&state, bot), Some(&Item::Plate(Plate::new())));

        assert_eq!(
            state.buy(bot, ShopItem::Plate, 2, 2),
            Ok(ActionResult::Failure(Rejection::HandsFull))
        );
        assert_eq!(
            state.buy(bot, ShopItem::Plate, 1, 2),
            Ok(ActionResult::Failure(Rejection::WrongTile))
        );
        assert_eq!(state.money(Team::Blue), 150);
    }

    #[test]
    fn targets_must_be_in_reach_and_on_grid() {
        let mut state = state();
        let bot = state.add_bot(Team::Red, 0, 1).unwrap();
        assert_eq!(
            state.buy(bot, ShopItem::Plate, 2, 2),
            Ok(ActionResult::Failure(Rejection::OutOfReach))
        );
        assert_eq!(state.pickup(bot, 5, 5), Ok(ActionResult::Failure(Rejection::OutOfBounds)));
    }

    #[test]
    fn chop_needs_empty_hands_and_choppable_food() {
        let mut state = state();
        let bot = state.add_bot(Team::Red, 0, 1).unwrap();
        state.bot_mut(bot).unwrap().holding = Some(Item::Food(Food::new(FoodKind::Meat)));
        assert_eq!(state.place(bot, 0, 2), Ok(ActionResult::Success));
        assert_eq!(holding(&state, bot), None);

        assert_eq!(state.chop(bot, 0, 2), Ok(ActionResult::Success));
        assert_eq!(state.chop(bot, 0, 2), Ok(ActionResult::Failure(Rejection::NotChoppable)));
        assert_eq!(state.chop(bot, 1, 2), Ok(ActionResult::Failure(Rejection::WrongTile)));
        assert!(matches!(
            state.tile(Team::Red, 0, 2),
            Ok(Tile::Counter { item: Some(Item::Food(food)) }) if food.chopped
        ));
    }

    #[test]
    fn placing_food_in_pan_starts_cooking() {
        let mut state = state();
        let bot = state.add_bot(Team::Red, 1, 1).unwrap();
        state.bot_mut(bot).unwrap().holding = Some(Item::Food(Food::new(FoodKind::Egg)));
        assert_eq!(state.place(bot, 1, 2), Ok(ActionResult::Success));

        // A second food does not fit in the occupied pan.
        state.bot_mut(bot).unwrap().holding = Some(Item::Food(Food::new(FoodKind::Egg)));
        assert_eq!(state.place(bot, 1, 2), Ok(ActionResult::Failure(Rejection::TileFull)));
        state.bot_mut(bot).unwrap().holding = None;

        for _ in 0..20 {
            state.start_turn();
        }
        assert_eq!(state.take_from_pan(bot, 1, 2), Ok(ActionResult::Success));
        assert!(matches!(
            holding(&state, bot),
            Some(Item::Food(food)) if food.cooked_stage == CookStage::Cooked
        ));
        assert!(matches!(
            state.tile(Team::Red, 1, 2),
            Ok(Tile::Cooker { item: Some(Item::Pan(pan)), cook_progress: 0 }) if pan.is_empty()
        ));
        assert_eq!(
            state.take_from_pan(bot, 1, 2),
            Ok(ActionResult::Failure(Rejection::HandsFull))
        );
    }

    #[test]
    fn lifted_pan_stops_cooking() {
        let mut state = state();
        let bot = state.add_bot(Team::Red, 1, 1).unwrap();
        state.bot_mut(bot).unwrap().holding =
            Some(Item::Pan(Pan::with_food(Food::new(FoodKind::Meat))));
        assert_eq!(state.place(bot, 1, 2), Ok(ActionResult::Success));
        for _ in 0..15 {
            state.start_turn();
        }

        assert_eq!(state.pickup(bot, 1, 2), Ok(ActionResult::Success));
        for _ in 0..30 {
            state.start_turn();
        }
        assert!(matches!(
            holding(&state, bot),
            Some(Item::Pan(pan)) if pan.food().map(|food| food.cooked_stage) == Some(CookStage::Raw)
        ));

        // Back on the cooker, raw food starts over from zero.
        assert_eq!(state.place(bot, 1, 2), Ok(ActionResult::Success));
        assert!(matches!(
            state.tile(Team::Red, 1, 2),
            Ok(Tile::Cooker { cook_progress: 0, .. })
        ));
        for _ in 0..20 {
            state.start_turn();
        }
        assert!(matches!(
            state.tile(Team::Red, 1, 2).unwrap().item(),
            Some(Item::Pan(pan)) if pan.food().map(|food| food.cooked_stage) == Some(CookStage::Cooked)
        ));
    }

    #[test]
    fn plating_works_in_both_directions() {
        let mut state = state();
        let bot = state.add_bot(Team::Red, 1, 1).unwrap();

        // Held food onto a plate resting on the counter.
        if let Some(Tile::Counter { item }) = state.maps.red.tile_mut(0, 2) {
            *item = Some(Item::Plate(Plate::new()));
        }
        state.bot_mut(bot).unwrap().holding = Some(Item::Food(Food::new(FoodKind::Egg)));
        assert_eq!(state.add_food_to_plate(bot, 0, 2), Ok(ActionResult::Success));
        assert_eq!(holding(&state, bot), None);

        // Held plate scoops food out of the cooker's pan.
        if let Some(Tile::Cooker { item, .. }) = state.maps.red.tile_mut(1, 2) {
            *item = Some(Item::Pan(Pan::with_food(Food::new(FoodKind::Onions))));
        }
        state.bot_mut(bot).unwrap().holding = Some(Item::Plate(Plate::new()));
        assert_eq!(state.add_food_to_plate(bot, 1, 2), Ok(ActionResult::Success));
        assert!(matches!(
            holding(&state, bot),
            Some(Item::Plate(plate)) if plate.food().len() == 1
        ));

        state.bot_mut(bot).unwrap().holding = Some(Item::Plate(Plate::dirty()));
        assert_eq!(
            state.add_food_to_plate(bot, 0, 2),
            Ok(ActionResult::Failure(Rejection::DirtyPlate))
        );
        state.bot_mut(bot).unwrap().holding = Some(Item::Pan(Pan::default()));
        assert_eq!(
            state.add_food_to_plate(bot, 0, 2),
            Ok(ActionResult::Failure(Rejection::NoFood))
        );
    }

    #[test]
    fn submit_pays_grid_owner_and_sends_plate_to_sink() {
        let mut state = state();
        let bot = state.add_bot(Team::Red, 1, 1).unwrap();
        state.spawn_order(vec![FoodKind::Egg], 10, 5, 2);

        let mut plate = Plate::new();
        plate.add(Food::new(FoodKind::Onions)).unwrap();
        state.bot_mut(bot).unwrap().holding = Some(Item::Plate(plate));
        assert_eq!(
            state.submit(bot, 1, 0),
            Ok(ActionResult::Failure(Rejection::NoMatchingOrder))
        );

        let mut plate = Plate::new();
        let mut egg = Food::new(FoodKind::Egg);
        egg.cooked_stage = CookStage::Cooked;
        plate.add(egg).unwrap();
        state.bot_mut(bot).unwrap().holding = Some(Item::Plate(plate));
        assert_eq!(state.submit(bot, 1, 0), Ok(ActionResult::Success));

        assert_eq!(state.money(Team::Red), 155);
        assert_eq!(holding(&state, bot), None);
        assert!(state.orders(Team::Red)[0].is_completed());
        assert!(!state.orders(Team::Blue)[0].is_completed());
        assert!(matches!(
            state.tile(Team::Red, 0, 0),
            Ok(Tile::Sink { num_dirty_plates: 1, .. })
        ));

        assert_eq!(state.wash(bot, 0, 0), Ok(ActionResult::Success));
        assert_eq!(state.wash(bot, 1, 0), Ok(ActionResult::Failure(Rejection::WrongTile)));
    }

    #[test]
    fn trash_discards_held_item() {
        let mut state = state();
        let bot = state.add_bot(Team::Red, 2, 1).unwrap();
        assert_eq!(state.trash(bot, 2, 0), Ok(ActionResult::Failure(Rejection::HandsEmpty)));
        state.bot_mut(bot).unwrap().holding = Some(Item::Pan(Pan::default()));
        assert_eq!(state.trash(bot, 1, 0), Ok(ActionResult::Failure(Rejection::WrongTile)));
        assert_eq!(state.trash(bot, 2, 0), Ok(ActionResult::Success));
        assert_eq!(holding(&state, bot), None);
    }

    #[test]
    fn wash_needs_dirty_plates() {
        let mut state = state();
        let bot = state.add_bot(Team::Red, 0, 1).unwrap();
        assert_eq!(state.wash(bot, 0, 0), Ok(ActionResult::Failure(Rejection::NothingToWash)));
    }
}
