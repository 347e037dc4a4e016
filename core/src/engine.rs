use alloc::boxed::Box;
use alloc::collections::VecDeque;
use alloc::vec::Vec;
use core::fmt;
use hashbrown::HashSet;
use serde::{Deserialize, Serialize};

use crate::*;

/// Valid transitions:
/// - NotStarted -> Playing (first reveal places the mines)
/// - Playing -> Won
/// - Playing -> Lost
#[derive(Copy, Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub enum EngineState {
    /// No mines placed yet
    #[default]
    NotStarted,
    /// Mines placed, game in progress
    Playing,
    /// Every safe tile has been uncovered
    Won,
    /// A mine has been uncovered
    Lost,
}

impl EngineState {
    pub const fn is_finished(self) -> bool {
        matches!(self, Self::Won | Self::Lost)
    }
}

/// Command that caused a change notification.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum Command {
    Reveal(Coord2),
    ToggleFlag(Coord2),
    RevealAllMines,
}

/// Delivered to the [`ChangeListener`] once a command has fully settled.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub struct EngineEvent {
    pub command: Command,
    pub state: EngineState,
}

pub trait ChangeListener {
    fn on_change(&mut self, event: &EngineEvent);
}

impl<F: FnMut(&EngineEvent)> ChangeListener for F {
    fn on_change(&mut self, event: &EngineEvent) {
        self(event)
    }
}

/// Owns the board for one game session and applies player commands to it.
pub struct GameEngine {
    board: Board,
    seed: u64,
    start_tile: StartTile,
    first_move_taken: bool,
    lost: bool,
    loaded_from_snapshot: bool,
    triggered_mine: Option<Coord2>,
    listener: Option<Box<dyn ChangeListener>>,
}

impl GameEngine {
    /// Starts a fresh game, mines are placed on the first reveal using `seed`.
    pub fn new(board: Board, seed: u64) -> Result<Self> {
        if board.mine_target() > board.in_bounds_count() {
            return Err(GameError::TooManyMines);
        }

        log::debug!(
            "New game on a {0}x{0} board with {1} mines",
            board.size(),
            board.mine_target()
        );

        Ok(Self {
            board,
            seed,
            start_tile: StartTile::default(),
            first_move_taken: false,
            lost: false,
            loaded_from_snapshot: false,
            triggered_mine: None,
            listener: None,
        })
    }

    /// Adopts a board whose mines are already placed, as restored from a snapshot.
    pub fn resume(board: Board) -> Result<Self> {
        if board.mine_count() != board.mine_target() {
            return Err(GameError::InconsistentBoard("mine count differs from target"));
        }

        if board
            .iter()
            .any(|(_, tile)| tile.in_bounds() && tile.adjacent_mines().is_none())
        {
            return Err(GameError::InconsistentBoard("adjacent mine counts missing"));
        }

        let triggered_mine = board
            .iter()
            .filter(|(_, tile)| tile.in_bounds() && tile.has_mine() && !tile.is_covered())
            .map(|(coords, _)| coords)
            .next();

        log::debug!(
            "Resumed game with {} covered tiles and {} mines",
            board.covered_count(),
            board.mine_count()
        );

        Ok(Self {
            board,
            seed: 0,
            start_tile: StartTile::default(),
            first_move_taken: true,
            lost: triggered_mine.is_some(),
            loaded_from_snapshot: true,
            triggered_mine,
            listener: None,
        })
    }

    pub fn with_start_tile(mut self, start_tile: StartTile) -> Self {
        self.start_tile = start_tile;
        self
    }

    pub fn set_listener(&mut self, listener: impl ChangeListener + 'static) {
        self.listener = Some(Box::new(listener));
    }

    pub fn clear_listener(&mut self) {
        self.listener = None;
    }

    pub fn state(&self) -> EngineState {
        if self.lost {
            EngineState::Lost
        } else if !self.first_move_taken {
            EngineState::NotStarted
        } else if self.has_won() {
            EngineState::Won
        } else {
            EngineState::Playing
        }
    }

    pub fn is_finished(&self) -> bool {
        self.state().is_finished()
    }

    pub fn is_first_move(&self) -> bool {
        !self.first_move_taken
    }

    pub fn is_loaded_from_snapshot(&self) -> bool {
        self.loaded_from_snapshot
    }

    /// Won once the covered playable tiles are exactly the mines.
    ///
    /// Flags do not count as uncovered, so a flag on a safe tile holds the win back until it is removed and revealed.
    pub fn has_won(&self) -> bool {
        self.first_move_taken && !self.lost && self.board.covered_count() == self.board.mine_count()
    }

    pub fn has_lost(&self) -> bool {
        self.lost
    }

    pub fn board(&self) -> &Board {
        &self.board
    }

    pub fn size(&self) -> Coord {
        self.board.size()
    }

    /// Read-only view of a tile, `None` outside the grid.
    pub fn tile(&self, coords: Coord2) -> Option<&Tile> {
        self.board.get(coords)
    }

    pub fn total_mines(&self) -> CellCount {
        if self.first_move_taken {
            self.board.mine_count()
        } else {
            self.board.mine_target()
        }
    }

    /// How many mines have not been flagged yet, flags left on uncovered tiles do not count
    pub fn mines_left(&self) -> isize {
        let flags = self
            .board
            .iter()
            .filter(|(_, tile)| tile.in_bounds() && tile.is_covered() && tile.is_flagged())
            .count();
        (self.total_mines() as isize) - (flags as isize)
    }

    pub fn triggered_mine(&self) -> Option<Coord2> {
        self.triggered_mine
    }

    /// Uncovers `coords`, cascading through zero tiles. Out of range, out of bounds, flagged and already uncovered
    /// tiles are left alone, as is everything once the game has finished.
    pub fn reveal(&mut self, coords: Coord2) -> RevealOutcome {
        if self.is_finished() {
            return RevealOutcome::NoChange;
        }

        if !self.board.get(coords).is_some_and(Tile::is_revealable) {
            return RevealOutcome::NoChange;
        }

        if !self.first_move_taken {
            self.place_mines(coords);
        }

        let outcome = self.reveal_tile(coords);
        self.notify(Command::Reveal(coords), outcome.has_update());
        outcome
    }

    /// Flips the flag on a playable tile, uncovered tiles included.
    pub fn toggle_flag(&mut self, coords: Coord2) -> FlagOutcome {
        if !self.board.is_playable(coords) {
            return FlagOutcome::NoChange;
        }

        let flagged = !self.board[coords].is_flagged();
        self.board.set_flag(coords, flagged);
        log::trace!("Flag at {:?} set to {}", coords, flagged);

        self.notify(Command::ToggleFlag(coords), true);
        FlagOutcome::Changed
    }

    /// Uncovers every covered mine, flagged or not, returning how many were uncovered.
    pub fn reveal_all_mines(&mut self) -> CellCount {
        let mines: Vec<_> = self
            .board
            .iter()
            .filter(|(_, tile)| tile.in_bounds() && tile.has_mine() && tile.is_covered())
            .map(|(coords, _)| coords)
            .collect();

        for &coords in &mines {
            self.board.reveal(coords);
        }

        let count = mines.len() as CellCount;
        log::debug!("Revealed {} remaining mines", count);
        self.notify(Command::RevealAllMines, count > 0);
        count
    }

    fn place_mines(&mut self, start: Coord2) {
        RandomMineGenerator::new(self.seed, start, self.start_tile).place(&mut self.board);
        self.board.finalize_adjacency();
        self.first_move_taken = true;
        log::debug!(
            "Placed {} mines, first move at {:?}",
            self.board.mine_count(),
            start
        );
    }

    /// Helper function to open a single tile and perform flood-fill if necessary
    fn reveal_tile(&mut self, coords: Coord2) -> RevealOutcome {
        self.board.reveal(coords);

        if self.board[coords].has_mine() {
            self.lost = true;
            self.triggered_mine = Some(coords);
            log::debug!("Mine hit at {:?}", coords);
            return RevealOutcome::HitMine;
        }

        let mut opened = 1;
        if self.adjacent_mines(coords) == 0 {
            let mut visited: HashSet<Coord2> = HashSet::new();
            visited.insert(coords);
            let mut to_visit: VecDeque<_> = self.covered_neighbors(coords).collect();
            log::trace!(
                "Starting flood-fill from {:?}, initial neighbors: {:?}",
                coords,
                to_visit
            );

            while let Some(visit_coords) = to_visit.pop_front() {
                if !visited.insert(visit_coords) {
                    continue;
                }

                // skip flagged or already opened tiles
                if !self.board[visit_coords].is_revealable() {
                    continue;
                }

                self.board.reveal(visit_coords);
                opened += 1;

                // if this is also zero we visit the neighbors
                if self.adjacent_mines(visit_coords) == 0 {
                    to_visit.extend(
                        self.covered_neighbors(visit_coords)
                            .filter(|pos| !visited.contains(pos)),
                    );
                }
            }
        }
        log::trace!("Reveal at {:?} opened {} tiles", coords, opened);

        if self.has_won() {
            log::debug!("Game won");
            RevealOutcome::Won
        } else {
            RevealOutcome::Revealed
        }
    }

    fn adjacent_mines(&self, coords: Coord2) -> u8 {
        self.board[coords]
            .adjacent_mines()
            .unwrap_or_else(|| self.board.neighbor_mine_count(coords))
    }

    fn covered_neighbors(&self, coords: Coord2) -> impl Iterator<Item = Coord2> + '_ {
        self.board
            .playable_neighbors(coords)
            .filter(|&pos| self.board[pos].is_revealable())
    }

    fn notify(&mut self, command: Command, changed: bool) {
        if !changed {
            return;
        }

        let event = EngineEvent {
            command,
            state: self.state(),
        };
        if let Some(listener) = self.listener.as_mut() {
            listener.on_change(&event);
        }
    }
}

impl fmt::Debug for GameEngine {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("GameEngine")
            .field("board", &self.board)
            .field("seed", &self.seed)
            .field("start_tile", &self.start_tile)
            .field("first_move_taken", &self.first_move_taken)
            .field("lost", &self.lost)
            .field("loaded_from_snapshot", &self.loaded_from_snapshot)
            .field("triggered_mine", &self.triggered_mine)
            .field("has_listener", &self.listener.is_some())
            .finish()
    }
}
