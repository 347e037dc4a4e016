use std::fs;
use std::io;
use std::path::{Path, PathBuf};

use mineclear_core::{CellCount, Coord, StartTile};
use serde::{Deserialize, Serialize};

use crate::*;

/// Game settings, usually read from a TOML file.
///
/// ```toml
/// [board]
/// size = 13
/// mines = 20
/// shape = "shapes/triangle.txt"
/// start_tile = "always-zero"
///
/// [storage]
/// snapshot = "save_game.json"
/// leaderboard = "leaderboard/leaderboard.txt"
/// ```
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Settings {
    pub board: BoardSettings,
    pub storage: StorageSettings,
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct BoardSettings {
    pub size: Coord,
    /// Overridden by the shape file when one is set.
    pub mines: CellCount,
    pub shape: Option<PathBuf>,
    pub start_tile: StartTile,
    /// Fixed seed for reproducible layouts, the wall clock is used otherwise.
    pub seed: Option<u64>,
}

impl Default for BoardSettings {
    fn default() -> Self {
        Self {
            size: 13,
            mines: 20,
            shape: None,
            start_tile: StartTile::default(),
            seed: None,
        }
    }
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct StorageSettings {
    pub snapshot: PathBuf,
    pub leaderboard: PathBuf,
}

impl Default for StorageSettings {
    fn default() -> Self {
        Self {
            snapshot: PathBuf::from("save_game.json"),
            leaderboard: PathBuf::from("leaderboard").join("leaderboard.txt"),
        }
    }
}

impl Settings {
    /// Reads settings from `path`, falling back to the defaults when the file does not exist.
    pub fn load(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        match fs::read_to_string(path) {
            Ok(content) => Self::from_toml_str(&content),
            Err(err) if err.kind() == io::ErrorKind::NotFound => {
                log::debug!("No settings at {}, using defaults", path.display());
                Ok(Self::default())
            }
            Err(err) => Err(err.into()),
        }
    }

    pub fn from_toml_str(content: &str) -> Result<Self> {
        Ok(toml::from_str(content)?)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_support::scratch_dir;

    #[test]
    fn missing_file_gives_defaults() {
        let dir = scratch_dir();

        let settings = Settings::load(dir.join("absent.toml")).unwrap();

        assert_eq!(settings, Settings::default());
        assert_eq!(settings.board.size, 13);
        assert_eq!(settings.board.mines, 20);
        assert_eq!(settings.board.start_tile, StartTile::AlwaysZero);
    }

    #[test]
    fn partial_file_keeps_other_defaults() {
        let settings = Settings::from_toml_str(
            r#"
            [board]
            mines = 30
            start_tile = "simple-safe"
            seed = 7

            [storage]
            snapshot = "saves/current.json"
            "#,
        )
        .unwrap();

        assert_eq!(settings.board.size, 13);
        assert_eq!(settings.board.mines, 30);
        assert_eq!(settings.board.start_tile, StartTile::SimpleSafe);
        assert_eq!(settings.board.seed, Some(7));
        assert_eq!(settings.storage.snapshot, PathBuf::from("saves/current.json"));
        assert_eq!(settings.storage.leaderboard, StorageSettings::default().leaderboard);
    }

    #[test]
    fn bad_values_are_config_errors() {
        let dir = scratch_dir();
        let path = dir.join("settings.toml");
        fs::write(&path, "[board]\nsize = 999\n").unwrap();

        let err = Settings::load(&path).unwrap_err();

        assert!(matches!(err, StorageError::Config(_)));
        assert!(!err.is_io());
    }
}
