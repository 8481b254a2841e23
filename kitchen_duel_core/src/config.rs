//! Match tuning knobs.
//!
//! Every field has a default, so an empty TOML document is a valid config and
//! a file only needs to list the values it changes.

use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::{Money, Turn, item::CookStage};

/// Errors that can occur when loading a configuration file.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("failed to read config file: {source}")]
    Io {
        #[from]
        source: std::io::Error,
    },

    #[error("failed to parse config TOML: {source}")]
    Toml {
        #[from]
        source: toml::de::Error,
    },
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct GameConfig {
    /// Length of a match in turns.
    pub total_turns: Turn,
    pub starting_money: Money,
    /// Passive income credited to each team at the start of every turn.
    pub money_per_turn: Money,
    /// Cooker progress at which raw food becomes cooked.
    pub cook_progress: u32,
    /// Cooker progress at which food burns.
    pub burn_progress: u32,
    /// Wash ticks needed to turn one dirty plate into a clean one.
    pub plate_wash_progress: u32,
    /// First turn of the switch window.
    pub switch_turn: Turn,
    /// Length of the switch window in turns.
    pub switch_duration: Turn,
    pub default_order_reward: Money,
    pub default_order_penalty: Money,
    /// Turns an order stays open when spawned without an explicit duration.
    pub default_order_duration: Turn,
    /// Maximum king-move distance between an agent and the tile it acts on.
    pub interact_range: usize,
}

impl Default for GameConfig {
    fn default() -> Self {
        GameConfig {
            total_turns: 500,
            starting_money: 150,
            money_per_turn: 1,
            cook_progress: 20,
            burn_progress: 40,
            plate_wash_progress: 2,
            switch_turn: 250,
            switch_duration: 100,
            default_order_reward: 5,
            default_order_penalty: 2,
            default_order_duration: 20,
            interact_range: 1,
        }
    }
}

impl GameConfig {
    pub fn from_toml_str(source: &str) -> Result<Self, ConfigError> {
        Ok(toml::from_str(source)?)
    }

    pub fn from_file(path: &Path) -> Result<Self, ConfigError> {
        let contents = std::fs::read_to_string(path)?;
        Self::from_toml_str(&contents)
    }

    /// Cooker progress corresponding to food that has already reached `stage`.
    pub fn progress_for_stage(&self, stage: CookStage) -> u32 {
        match stage {
            CookStage::Raw => 0,
            CookStage::Cooked => self.cook_progress,
            CookStage::Burnt => self.burn_progress,
        }
    }
}
