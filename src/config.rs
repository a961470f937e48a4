use std::path::Path;

use log::warn;

use crate::{
    board::{DEFAULT_BOARD_SIZE, MAX_BOARD_SIZE, MIN_BOARD_SIZE},
    error::ConfigError,
};

/// Settings read at startup, loadable from TOML. Only `board_size` changes the rules engine.
#[derive(Debug, Clone, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
#[serde(default)]
pub struct EngineConfig {
    pub board_size: usize,
    /// End the human turn as soon as the capturing piece has nothing left to take.
    /// When false the player has to `pass` to hand over the turn after a capture.
    pub auto_end_capture_chain: bool,
    /// Print the board after every full turn
    pub print_board: bool,
}

impl Default for EngineConfig {
    fn default() -> Self {
        EngineConfig {
            board_size: DEFAULT_BOARD_SIZE,
            auto_end_capture_chain: true,
            print_board: true,
        }
    }
}

impl EngineConfig {
    pub fn load(path: &Path) -> Result<Self, ConfigError> {
        let content = std::fs::read_to_string(path).map_err(|e| ConfigError::FileRead {
            path: path.to_path_buf(),
            source: e,
        })?;
        let config: EngineConfig = toml::from_str(&content)?;
        config.validate()?;
        Ok(config)
    }

    /// Falls back to defaults if the file does not exist
    pub fn load_or_default(path: &Path) -> Result<Self, ConfigError> {
        if path.exists() {
            Self::load(path)
        } else {
            warn!("Config file '{}' not found, using defaults", path.display());
            Ok(Self::default())
        }
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.board_size % 2 != 0 {
            return Err(ConfigError::Validation("board_size must be even".into()));
        }
        if !(MIN_BOARD_SIZE..=MAX_BOARD_SIZE).contains(&self.board_size) {
            return Err(ConfigError::Validation(format!(
                "board_size must be between {MIN_BOARD_SIZE} and {MAX_BOARD_SIZE}"
            )));
        }

        Ok(())
    }
}
