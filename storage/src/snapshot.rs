use std::fs;
use std::io;
use std::path::{Path, PathBuf};

use mineclear_core::{Board, CellCount, Coord, GameError, Tile};
use serde::{Deserialize, Serialize};

use crate::*;

/// Layout version written into every snapshot file.
pub const SNAPSHOT_VERSION: u32 = 1;

/// A paused game: the full board plus the session metadata needed to resume it.
#[derive(Clone, Debug, PartialEq)]
pub struct Snapshot {
    pub board: Board,
    pub elapsed_time: f64,
    pub player_name: String,
}

/// On-disk layout, one field per piece of state so the format does not depend on in-memory types.
#[derive(Serialize, Deserialize)]
struct SnapshotRecord {
    version: u32,
    size: Coord,
    mine_target: CellCount,
    rows: Vec<Vec<Tile>>,
    elapsed_time: f64,
    player_name: String,
}

/// Keeps at most one snapshot at a fixed path.
#[derive(Clone, Debug)]
pub struct SnapshotStore {
    path: PathBuf,
}

impl SnapshotStore {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    pub fn exists(&self) -> bool {
        self.path.is_file()
    }

    /// Writes the snapshot, replacing any previous one.
    pub fn save(&self, board: &Board, elapsed_time: f64, player_name: &str) -> Result<()> {
        // JSON has no representation for NaN or infinities
        if !elapsed_time.is_finite() {
            return Err(StorageError::InvalidElapsedTime(elapsed_time));
        }

        let record = SnapshotRecord {
            version: SNAPSHOT_VERSION,
            size: board.size(),
            mine_target: board.mine_target(),
            rows: board.to_rows(),
            elapsed_time,
            player_name: player_name.to_owned(),
        };
        let json = serde_json::to_string_pretty(&record)?;

        if let Some(parent) = self.path.parent().filter(|p| !p.as_os_str().is_empty()) {
            fs::create_dir_all(parent)?;
        }
        fs::write(&self.path, json)?;
        log::debug!("Saved snapshot to {}", self.path.display());

        Ok(())
    }

    /// Reads the current snapshot, `None` when there is none. The file is left in place.
    pub fn load(&self) -> Result<Option<Snapshot>> {
        let json = match fs::read_to_string(&self.path) {
            Ok(json) => json,
            Err(err) if err.kind() == io::ErrorKind::NotFound => return Ok(None),
            Err(err) => return Err(err.into()),
        };

        let record: SnapshotRecord = serde_json::from_str(&json)?;
        if record.version != SNAPSHOT_VERSION {
            return Err(StorageError::UnsupportedVersion(record.version));
        }
        if record.rows.len() != usize::from(record.size) {
            return Err(GameError::InvalidBoardShape.into());
        }

        let board = Board::from_rows(record.mine_target, record.rows)?;
        log::debug!("Loaded snapshot from {}", self.path.display());

        Ok(Some(Snapshot {
            board,
            elapsed_time: record.elapsed_time,
            player_name: record.player_name,
        }))
    }

    /// Deletes the snapshot if there is one.
    pub fn clear(&self) -> Result<()> {
        match fs::remove_file(&self.path) {
            Ok(()) => {
                log::debug!("Cleared snapshot at {}", self.path.display());
                Ok(())
            }
            Err(err) if err.kind() == io::ErrorKind::NotFound => Ok(()),
            Err(err) => Err(err.into()),
        }
    }
}
