//! The mid-match switch: once per match, inside a fixed turn window, a team
//! may move all of its agents onto the opposing kitchen. They are sent home
//! automatically when the window closes.

use tracing::{info, warn};

use crate::{
    BotId, Position, Team, Turn,
    actions::{ActionResult, Rejection},
    state::GameState,
    tile::TileKind,
};

impl GameState {
    pub fn switch_turn(&self) -> Turn {
        self.config.switch_turn
    }

    pub fn switch_duration(&self) -> Turn {
        self.config.switch_duration
    }

    /// Last turn on which a switch may still be requested.
    fn switch_window_end(&self) -> Option<Turn> {
        self.config
            .switch_turn
            .saturating_add(self.config.switch_duration)
            .checked_sub(1)
    }

    pub fn switch_window_active(&self) -> bool {
        self.switch_window_end()
            .is_some_and(|end| self.config.switch_turn <= self.turn && self.turn <= end)
    }

    pub fn switch_window_ended(&self) -> bool {
        self.switch_window_end().is_none_or(|end| self.turn > end)
    }

    /// Moves every agent of `team` onto the opposing grid. Allowed once per
    /// match and only inside the switch window.
    pub fn request_switch(&mut self, team: Team) -> ActionResult {
        if !self.switch_window_active() {
            return ActionResult::Failure(Rejection::SwitchWindowClosed);
        }
        if self.switched[team] {
            return ActionResult::Failure(Rejection::AlreadySwitched);
        }
        self.relocate_team(team, team.other());
        self.switched[team] = true;
        info!(team = team.name(), turn = self.turn, "team switched kitchens");
        ActionResult::Success
    }

    /// Sends a switched team back to its own grid. No-op for a team at home.
    pub fn return_team_home_if_switched(&mut self, team: Team) {
        if !self.switched[team] {
            return;
        }
        self.relocate_team(team, team);
        self.switched[team] = false;
        info!(team = team.name(), turn = self.turn, "team returned home");
    }

    /// Lifts all of `team`'s agents off their current grid, then lands them one
    /// by one on `destination` so no two ever share a cell.
    fn relocate_team(&mut self, team: Team, destination: Team) {
        let ids: Vec<BotId> = self.team_bot_ids(team);
        for id in &ids {
            let bot = &self.bots[id];
            let cell = &mut self.occupancy[bot.map_team][bot.position];
            if *cell == Some(*id) {
                *cell = None;
            }
        }
        for id in ids {
            let from = self.bots[&id].position;
            let landing = self.find_free_spawn_near(destination, from.x as isize, from.y as isize);
            // A full grid forces the origin; its current occupant keeps the cell.
            match self.occupancy[destination][landing] {
                Some(other) => {
                    warn!(bot = id, other, "no free cell left; sharing the origin unindexed")
                }
                None => self.occupancy[destination][landing] = Some(id),
            }
            if let Some(bot) = self.bots.get_mut(&id) {
                bot.map_team = destination;
                bot.position = landing;
            }
        }
    }

    /// Picks a landing cell on `map_team`'s grid near `(prefer_x, prefer_y)`.
    ///
    /// Priority: nearest free Floor by growing square, then nearest free
    /// walkable cell, then the first free walkable cell in column-major order,
    /// and finally the origin.
    pub fn find_free_spawn_near(&self, map_team: Team, prefer_x: isize, prefer_y: isize) -> Position {
        let map = &self.maps[map_team];
        let can_spawn = |x: isize, y: isize| {
            map.is_walkable(x, y) && self.occupancy[map_team][at(x, y)].is_none()
        };
        let radius = map.width().max(map.height()) as isize;

        let square = move |r: isize| {
            (-r..=r).flat_map(move |dx| (-r..=r).map(move |dy| (prefer_x + dx, prefer_y + dy)))
        };

        let floor = (0..radius)
            .flat_map(square)
            .find(|&(x, y)| can_spawn(x, y) && map.is_kind(x, y, TileKind::Floor));
        if let Some((x, y)) = floor {
            return at(x, y);
        }

        let walkable = (0..radius).flat_map(square).find(|&(x, y)| can_spawn(x, y));
        if let Some((x, y)) = walkable {
            return at(x, y);
        }

        map.tiles()
            .column_major_positions()
            .find(|pos| can_spawn(pos.x as isize, pos.y as isize))
            .unwrap_or(Position::new(0, 0))
    }
}

fn at(x: isize, y: isize) -> Position {
    Position::new(x as usize, y as usize)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{config::GameConfig, map::Grid};

    fn state(switch_turn: Turn, switch_duration: Turn) -> GameState {
        let grid = Grid::from_generator(4, 3, |x, y| match (x, y) {
            (3, _) => TileKind::Wall,
            (2, 2) => TileKind::Submit,
            _ => TileKind::Floor,
        });
        let config = GameConfig {
            switch_turn,
            switch_duration,
            ..GameConfig::default()
        };
        GameState::new(&grid, &grid, config)
    }

    fn advance_to(state: &mut GameState, turn: Turn) {
        while state.turn() < turn {
            state.start_turn();
        }
    }

    #[test]
    fn window_bounds_are_inclusive() {
        let mut state = state(3, 2);
        advance_to(&mut state, 2);
        assert!(!state.switch_window_active());
        advance_to(&mut state, 3);
        assert!(state.switch_window_active());
        advance_to(&mut state, 4);
        assert!(state.switch_window_active());
        assert!(!state.switch_window_ended());
        advance_to(&mut state, 5);
        assert!(!state.switch_window_active());
        assert!(state.switch_window_ended());
    }

    #[test]
    fn switch_is_single_use_and_returns_home() {
        let mut state = state(2, 2);
        let a = state.add_bot(Team::Red, 0, 0).unwrap();
        let b = state.add_bot(Team::Red, 1, 0).unwrap();
        let blue = state.add_bot(Team::Blue, 0, 0).unwrap();

        assert_eq!(
            state.request_switch(Team::Red),
            ActionResult::Failure(Rejection::SwitchWindowClosed)
        );
        advance_to(&mut state, 2);
        assert_eq!(state.request_switch(Team::Red), ActionResult::Success);
        assert_eq!(
            state.request_switch(Team::Red),
            ActionResult::Failure(Rejection::AlreadySwitched)
        );

        // The blue bot keeps (0, 0); red bots land on the nearest free floor.
        assert_eq!(state.bot(blue).unwrap().position, Position::new(0, 0));
        let bot_a = state.bot(a).unwrap();
        assert_eq!(bot_a.map_team, Team::Blue);
        assert_eq!(bot_a.position, Position::new(0, 1));
        assert_eq!(state.bot(b).unwrap().position, Position::new(1, 0));
        assert_eq!(state.occupant(Team::Red, 0, 0), None);
        assert_eq!(state.occupant(Team::Blue, 0, 1), Some(a));

        advance_to(&mut state, 4);
        assert!(state.bots().all(|bot| bot.map_team == bot.team));
        assert!(!state.is_switched(Team::Red));
        assert_eq!(state.occupant(Team::Blue, 0, 1), None);
        assert_eq!(state.occupant(Team::Red, 0, 1), Some(a));
    }

    #[test]
    fn spawn_search_prefers_floor_then_walkable() {
        let mut state = state(0, 0);
        // Fill every floor cell except the submit tile.
        for x in 0..3 {
            for y in 0..3 {
                if (x, y) != (2, 2) {
                    state.add_bot(Team::Red, x, y).unwrap();
                }
            }
        }
        assert_eq!(state.find_free_spawn_near(Team::Red, 0, 0), Position::new(2, 2));
        state.add_bot(Team::Red, 2, 2).unwrap();
        // Nothing free at all: origin.
        assert_eq!(state.find_free_spawn_near(Team::Red, 1, 1), Position::new(0, 0));
        // Preferred coordinates far outside the grid still find the origin-side cells.
        assert_eq!(state.find_free_spawn_near(Team::Blue, 40, -7), Position::new(0, 0));
    }

    #[test]
    fn switch_onto_full_grid_keeps_existing_occupant() {
        let grid = Grid::from_generator(1, 1, |_, _| TileKind::Floor);
        let config = GameConfig {
            switch_turn: 0,
            switch_duration: 2,
            ..GameConfig::default()
        };
        let mut state = GameState::new(&grid, &grid, config);
        let red = state.add_bot(Team::Red, 0, 0).unwrap();
        let blue = state.add_bot(Team::Blue, 0, 0).unwrap();

        assert_eq!(state.request_switch(Team::Red), ActionResult::Success);
        let bot = state.bot(red).unwrap();
        assert_eq!((bot.map_team, bot.position), (Team::Blue, Position::new(0, 0)));
        assert_eq!(state.occupant(Team::Blue, 0, 0), Some(blue));
        assert_eq!(state.occupant(Team::Red, 0, 0), None);

        // Going home must not evict the blue bot from its own index.
        advance_to(&mut state, 2);
        assert_eq!(state.bot(red).unwrap().map_team, Team::Red);
        assert_eq!(state.occupant(Team::Red, 0, 0), Some(red));
        assert_eq!(state.occupant(Team::Blue, 0, 0), Some(blue));
    }

    #[test]
    fn window_at_end_of_time_does_not_overflow() {
        let mut state = state(Turn::MAX, 5);
        assert!(!state.switch_window_active());
        assert!(!state.switch_window_ended());
        state.start_turn();
        assert_eq!(state.turn(), 1);
        assert!(!state.switch_window_ended());
    }

    #[test]
    fn zero_length_window_never_opens() {
        let mut state = state(0, 0);
        assert!(!state.switch_window_active());
        assert!(state.switch_window_ended());
        state.start_turn();
        assert_eq!(
            state.request_switch(Team::Blue),
            ActionResult::Failure(Rejection::SwitchWindowClosed)
        );
    }
}
