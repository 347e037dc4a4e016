use alloc::vec::Vec;
use core::ops::Index;
use ndarray::Array2;

use crate::*;

const MARKER_IN_BOUNDS: &str = "1";
const MARKER_OUT_OF_BOUNDS: &str = "0";

/// Square grid of tiles, with an optional playable mask for custom shapes.
///
/// The mutators are thin and do not check coordinates, indexing outside the grid panics. [`GameEngine`] validates
/// every coordinate before touching the board.
#[derive(Clone, Debug, PartialEq)]
pub struct Board {
    tiles: Array2<Tile>,
    mine_target: CellCount,
}

impl Board {
    pub fn new(size: Coord, mine_target: CellCount) -> Self {
        Self {
            tiles: Array2::default((size, size).to_nd_index()),
            mine_target,
        }
    }

    /// Rebuilds a board from row-major tiles, for example when restoring a snapshot.
    pub fn from_rows(mine_target: CellCount, rows: Vec<Vec<Tile>>) -> Result<Self> {
        let size = rows.len();
        if size > Coord::MAX as usize || rows.iter().any(|row| row.len() != size) {
            return Err(GameError::InvalidBoardShape);
        }

        let tiles = Array2::from_shape_vec((size, size), rows.into_iter().flatten().collect())
            .map_err(|_| GameError::InvalidBoardShape)?;

        Ok(Self { tiles, mine_target })
    }

    pub fn to_rows(&self) -> Vec<Vec<Tile>> {
        self.tiles.rows().into_iter().map(|row| row.to_vec()).collect()
    }

    pub fn size(&self) -> Coord {
        // the constructors never allow a side longer than `Coord::MAX`
        self.tiles.nrows() as Coord
    }

    pub fn mine_target(&self) -> CellCount {
        self.mine_target
    }

    /// Whether `coords` is inside the grid rectangle (playable or not).
    pub fn contains(&self, (row, col): Coord2) -> bool {
        let size = self.size();
        row < size && col < size
    }

    /// Whether `coords` is inside the grid and part of the playable shape.
    pub fn is_playable(&self, coords: Coord2) -> bool {
        self.contains(coords) && self[coords].in_bounds
    }

    pub fn get(&self, coords: Coord2) -> Option<&Tile> {
        self.contains(coords).then(|| &self[coords])
    }

    pub fn iter(&self) -> impl Iterator<Item = (Coord2, &Tile)> {
        self.tiles
            .indexed_iter()
            .map(|((row, col), tile)| ((row as Coord, col as Coord), tile))
    }

    pub fn place_mine(&mut self, coords: Coord2, present: bool) {
        self.tile_mut(coords).has_mine = present;
    }

    pub fn set_flag(&mut self, coords: Coord2, flagged: bool) {
        self.tile_mut(coords).flagged = flagged;
    }

    pub fn reveal(&mut self, coords: Coord2) {
        self.tile_mut(coords).covered = false;
    }

    pub fn set_in_bounds(&mut self, coords: Coord2, in_bounds: bool) {
        self.tile_mut(coords).in_bounds = in_bounds;
    }

    /// Grid neighbors of `coords`, regardless of the playable mask.
    pub fn iter_neighbors(&self, coords: Coord2) -> NeighborIter {
        self.tiles.iter_neighbors(coords)
    }

    /// Neighbors of `coords` that are part of the playable shape.
    pub fn playable_neighbors(&self, coords: Coord2) -> impl Iterator<Item = Coord2> + '_ {
        self.iter_neighbors(coords)
            .filter(|&pos| self[pos].in_bounds)
    }

    pub fn neighbor_mine_count(&self, coords: Coord2) -> u8 {
        self.playable_neighbors(coords)
            .filter(|&pos| self[pos].has_mine)
            .count() as u8
    }

    /// Caches the adjacent mine count of every playable tile; call once the layout stops changing.
    pub fn finalize_adjacency(&mut self) {
        let size = self.size();
        for row in 0..size {
            for col in 0..size {
                let coords = (row, col);
                if self[coords].in_bounds {
                    let count = self.neighbor_mine_count(coords);
                    self.tile_mut(coords).adjacent_mines = Some(count);
                }
            }
        }
    }

    pub fn in_bounds_count(&self) -> CellCount {
        self.count_playable(|_| true)
    }

    pub fn mine_count(&self) -> CellCount {
        self.count_playable(|tile| tile.has_mine)
    }

    pub fn covered_count(&self) -> CellCount {
        self.count_playable(|tile| tile.covered)
    }

    /// Applies a shape description: a mine count line followed by one row of markers per board row.
    ///
    /// The whole description is validated before anything is applied, a failed load leaves the board untouched.
    pub fn load_shape(&mut self, source: &str) -> Result<()> {
        let size = usize::from(self.size());
        let mut records = source
            .lines()
            .enumerate()
            .map(|(index, line)| (index + 1, line.trim()))
            .filter(|(_, line)| !line.is_empty());

        let Some((line, count)) = records.next() else {
            return Err(shape_error(1, ShapeIssue::MissingMineCount));
        };
        let mine_target: CellCount = count
            .parse()
            .map_err(|_| shape_error(line, ShapeIssue::BadMineCount))?;

        let mut mask = Vec::with_capacity(size * size);
        let mut row_count = 0;
        let mut last_line = line;
        for (line, record) in records {
            row_count += 1;
            last_line = line;
            if row_count > size {
                continue;
            }

            let start = mask.len();
            for marker in record.split_whitespace() {
                mask.push(match marker {
                    MARKER_IN_BOUNDS => true,
                    MARKER_OUT_OF_BOUNDS => false,
                    _ => return Err(shape_error(line, ShapeIssue::UnknownMarker)),
                });
            }

            let found = mask.len() - start;
            if found != size {
                let issue = ShapeIssue::RowLength {
                    expected: size,
                    found,
                };
                return Err(shape_error(line, issue));
            }
        }

        if row_count != size {
            let issue = ShapeIssue::RowCount {
                expected: size,
                found: row_count,
            };
            return Err(shape_error(last_line, issue));
        }

        for (tile, in_bounds) in self.tiles.iter_mut().zip(mask) {
            tile.in_bounds = in_bounds;
        }
        self.mine_target = mine_target;
        log::debug!(
            "Applied board shape, {} playable tiles, {} mines",
            self.in_bounds_count(),
            mine_target
        );

        Ok(())
    }

    fn tile_mut(&mut self, coords: Coord2) -> &mut Tile {
        &mut self.tiles[coords.to_nd_index()]
    }

    fn count_playable(&self, predicate: impl Fn(&Tile) -> bool) -> CellCount {
        self.tiles
            .iter()
            .filter(|tile| tile.in_bounds && predicate(*tile))
            .count() as CellCount
    }
}

fn shape_error(line: usize, reason: ShapeIssue) -> GameError {
    GameError::InvalidShape { line, reason }
}

impl Index<Coord2> for Board {
    type Output = Tile;

    fn index(&self, coords: Coord2) -> &Self::Output {
        &self.tiles[coords.to_nd_index()]
    }
}
