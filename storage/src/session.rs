use std::path::PathBuf;

use mineclear_core::{
    Board, CellCount, ChangeListener, Coord, EngineState, FlagOutcome, GameEngine, RevealOutcome, Tile,
};
use web_time::SystemTime;

use crate::*;

/// One game from start (or resume) to finish, with its snapshot and leaderboard files.
///
/// This is the command surface the presentation layer talks to. It never renders and never keeps time itself,
/// elapsed time is always handed in by the caller.
#[derive(Debug)]
pub struct Session {
    engine: GameEngine,
    snapshots: SnapshotStore,
    leaderboard_path: PathBuf,
    player_name: String,
    elapsed_offset: f64,
}

impl Session {
    /// Starts a new game from the board settings, applying the shape file when one is configured.
    pub fn new_game(settings: &Settings) -> Result<Self> {
        let mut board = Board::new(settings.board.size, settings.board.mines);
        if let Some(shape) = &settings.board.shape {
            load_shape_file(&mut board, shape)?;
        }

        let seed = settings.board.seed.unwrap_or_else(clock_seed);
        let engine = GameEngine::new(board, seed)?.with_start_tile(settings.board.start_tile);

        Ok(Self::with_engine(engine, settings, String::new(), 0.0))
    }

    /// Picks up the paused game, if any. The snapshot is deleted once the board has been adopted.
    pub fn resume(settings: &Settings) -> Result<Option<Self>> {
        let snapshots = SnapshotStore::new(&settings.storage.snapshot);
        let Some(snapshot) = snapshots.load()? else {
            return Ok(None);
        };

        let engine = GameEngine::resume(snapshot.board)?;
        snapshots.clear()?;
        log::debug!(
            "Resumed game of {:?} at {:.1}s",
            snapshot.player_name,
            snapshot.elapsed_time
        );

        Ok(Some(Self::with_engine(
            engine,
            settings,
            snapshot.player_name,
            snapshot.elapsed_time,
        )))
    }

    fn with_engine(
        engine: GameEngine,
        settings: &Settings,
        player_name: String,
        elapsed_offset: f64,
    ) -> Self {
        Self {
            engine,
            snapshots: SnapshotStore::new(&settings.storage.snapshot),
            leaderboard_path: settings.storage.leaderboard.clone(),
            player_name,
            elapsed_offset,
        }
    }

    pub fn engine(&self) -> &GameEngine {
        &self.engine
    }

    pub fn set_listener(&mut self, listener: impl ChangeListener + 'static) {
        self.engine.set_listener(listener);
    }

    /// Player name restored from the snapshot, empty for a new game.
    pub fn player_name(&self) -> &str {
        &self.player_name
    }

    /// Time already played before this session resumed, for the caller's timer.
    pub fn elapsed_offset(&self) -> f64 {
        self.elapsed_offset
    }

    pub fn state(&self) -> EngineState {
        self.engine.state()
    }

    pub fn reveal(&mut self, row: Coord, col: Coord) -> RevealOutcome {
        self.engine.reveal((row, col))
    }

    pub fn toggle_flag(&mut self, row: Coord, col: Coord) -> FlagOutcome {
        self.engine.toggle_flag((row, col))
    }

    pub fn reveal_all_mines(&mut self) -> CellCount {
        self.engine.reveal_all_mines()
    }

    pub fn is_first_move(&self) -> bool {
        self.engine.is_first_move()
    }

    pub fn has_won(&self) -> bool {
        self.engine.has_won()
    }

    pub fn has_lost(&self) -> bool {
        self.engine.has_lost()
    }

    pub fn tile(&self, row: Coord, col: Coord) -> Option<&Tile> {
        self.engine.tile((row, col))
    }

    /// Pauses the game to disk. Only a game in progress is saved, returns whether a snapshot was written.
    pub fn save_snapshot(&self, elapsed_time: f64, player_name: &str) -> Result<bool> {
        let state = self.engine.state();
        if state != EngineState::Playing {
            log::debug!("Not saving snapshot in state {:?}", state);
            return Ok(false);
        }

        self.snapshots
            .save(self.engine.board(), elapsed_time, player_name)?;
        Ok(true)
    }

    pub fn has_pending_snapshot(&self) -> bool {
        self.snapshots.exists()
    }

    /// Wraps up a finished game: drops any snapshot and, on a win, records the time on the leaderboard.
    ///
    /// Returns the leaderboard rank when the score made the top entries.
    pub fn conclude(&self, elapsed_time: f64, player_name: &str) -> Result<Option<usize>> {
        match self.engine.state() {
            EngineState::Won => {
                self.snapshots.clear()?;
                let mut leaderboard = Leaderboard::load(&self.leaderboard_path)?;
                leaderboard.add_score(player_name, completion_score(elapsed_time))
            }
            EngineState::Lost => {
                self.snapshots.clear()?;
                Ok(None)
            }
            EngineState::NotStarted | EngineState::Playing => Ok(None),
        }
    }
}

/// Whole seconds, rounded up so that a finished game always has a numeric score.
fn completion_score(elapsed_time: f64) -> u32 {
    (elapsed_time.max(0.0).ceil() as u32).max(1)
}

fn clock_seed() -> u64 {
    let now = SystemTime::now()
        .duration_since(SystemTime::UNIX_EPOCH)
        .unwrap_or_default();
    now.as_nanos() as u64 ^ now.as_secs().rotate_left(32)
}
