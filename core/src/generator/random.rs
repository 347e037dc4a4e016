use alloc::vec::Vec;

use super::*;

/// Generation strategy that can optionally try to make the starting tile zero or at least safe, but other than that is
/// purely random.
#[derive(Clone, Debug, PartialEq)]
pub struct RandomMineGenerator {
    seed: u64,
    start: Coord2,
    start_tile: StartTile,
}

impl RandomMineGenerator {
    pub fn new(seed: u64, start: Coord2, start_tile: StartTile) -> Self {
        Self {
            seed,
            start,
            start_tile,
        }
    }
}

impl MineGenerator for RandomMineGenerator {
    fn place(self, board: &mut Board) {
        use rand::prelude::*;
        use StartTile::*;

        let playable = board.in_bounds_count();
        let target = board.mine_target();

        // optimize for full boards
        if target >= playable {
            if target > playable {
                log::warn!(
                    "Board already full, generated anyway, requested {} but only fits {}",
                    target,
                    playable
                );
            }
            let all: Vec<_> = board
                .iter()
                .filter(|(_, tile)| tile.in_bounds())
                .map(|(coords, _)| coords)
                .collect();
            for coords in all {
                board.place_mine(coords, true);
            }
            return;
        }

        let start_playable = board.is_playable(self.start);
        let zone: Vec<Coord2> = if start_playable {
            core::iter::once(self.start)
                .chain(board.playable_neighbors(self.start))
                .collect()
        } else {
            Vec::new()
        };
        let zone_len = zone.len() as CellCount;

        let actual_start_tile = match self.start_tile {
            Random => Random,
            SimpleSafe | AlwaysZero if !start_playable => Random,
            SimpleSafe => SimpleSafe,
            AlwaysZero if target + zone_len > playable => {
                log::warn!("Cannot make start tile zero, fallback to simple safe");
                SimpleSafe
            }
            AlwaysZero => AlwaysZero,
        };

        // reserve the safe area by temporarily occupying it
        let reserved = match actual_start_tile {
            Random => &zone[..0],
            SimpleSafe => &zone[..1],
            AlwaysZero => &zone[..],
        };
        for &coords in reserved {
            board.place_mine(coords, true);
        }

        let mut free: Vec<Coord2> = board
            .iter()
            .filter(|(_, tile)| tile.in_bounds() && !tile.has_mine())
            .map(|(coords, _)| coords)
            .collect();

        let mut rng = SmallRng::seed_from_u64(self.seed);
        let mut mines_placed = 0;
        while mines_placed < target && !free.is_empty() {
            let pick = free.swap_remove(rng.random_range(0..free.len()));
            board.place_mine(pick, true);
            mines_placed += 1;
        }

        // undo to make safe tiles
        for &coords in reserved {
            board.place_mine(coords, false);
        }

        // double check mine count
        let count = board.mine_count();
        if count != target {
            log::warn!(
                "Generated mine count mismatch, actual: {}, requested: {}",
                count,
                target
            );
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn generate(size: Coord, mines: CellCount, seed: u64, start: Coord2, start_tile: StartTile) -> Board {
        let mut board = Board::new(size, mines);
        RandomMineGenerator::new(seed, start, start_tile).place(&mut board);
        board
    }

    #[test]
    fn always_zero_keeps_start_area_clear() {
        for seed in 0..64 {
            let start = ((seed % 13) as Coord, (seed * 7 % 13) as Coord);
            let board = generate(13, 20, seed, start, StartTile::AlwaysZero);

            assert_eq!(board.mine_count(), 20);
            assert!(!board[start].has_mine());
            assert!(board.iter_neighbors(start).all(|pos| !board[pos].has_mine()));
        }
    }

    #[test]
    fn mine_count_matches_target_up_to_full_board() {
        for mines in [0, 1, 15, 16, 24, 25] {
            let board = generate(5, mines, 42, (2, 2), StartTile::AlwaysZero);
            assert_eq!(board.mine_count(), mines, "target {mines}");
        }
    }

    #[test]
    fn crowded_board_falls_back_to_simple_safe() {
        // the 3x3 zone cannot be reserved when only 3 safe tiles remain
        let board = generate(3, 6, 7, (1, 1), StartTile::AlwaysZero);

        assert_eq!(board.mine_count(), 6);
        assert!(!board[(1, 1)].has_mine());
    }

    #[test]
    fn never_places_mines_out_of_bounds() {
        let mut board = Board::new(4, 6);
        for row in 0..4 {
            board.set_in_bounds((row, 0), false);
        }

        RandomMineGenerator::new(3, (0, 3), StartTile::AlwaysZero).place(&mut board);

        assert_eq!(board.mine_count(), 6);
        assert!(board.iter().all(|(_, tile)| tile.in_bounds() || !tile.has_mine()));
    }

    #[test]
    fn same_seed_gives_same_layout() {
        let a = generate(9, 10, 1234, (4, 4), StartTile::AlwaysZero);
        let b = generate(9, 10, 1234, (4, 4), StartTile::AlwaysZero);

        assert_eq!(a, b);
    }
}
