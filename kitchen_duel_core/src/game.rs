use tracing::info;

use crate::{
    PerTeam, Team,
    agent::{Controller, TeamHandle},
    error::GameError,
    state::GameState,
};

/// A match between two controllers.
pub struct Match {
    state: GameState,
    controllers: PerTeam<Box<dyn Controller>>,
}

impl Match {
    pub fn new(state: GameState, red: Box<dyn Controller>, blue: Box<dyn Controller>) -> Self {
        Match {
            state,
            controllers: PerTeam::new(red, blue),
        }
    }

    pub fn state(&self) -> &GameState {
        &self.state
    }

    pub fn is_over(&self) -> bool {
        self.state.is_over()
    }

    /// Starts the next turn, then lets Red and Blue act in that order.
    pub fn play_turn(&mut self) -> Result<(), GameError> {
        self.state.start_turn();
        for team in Team::ALL {
            let mut handle = TeamHandle::new(&mut self.state, team);
            self.controllers[team].play_turn(&mut handle)?;
        }
        Ok(())
    }

    /// Plays until the configured number of turns has elapsed.
    pub fn run(&mut self) -> Result<(), GameError> {
        while !self.is_over() {
            self.play_turn()?;
        }
        info!(
            turns = self.state.turn(),
            red = self.state.money(Team::Red),
            blue = self.state.money(Team::Blue),
            "match finished"
        );
        Ok(())
    }
}
