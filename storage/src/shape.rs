use std::fs;
use std::io;
use std::path::Path;

use mineclear_core::Board;

use crate::*;

/// Shapes shipped with the crate.
pub mod shapes {
    /// 13x13 triangle with its apex on the top row, 15 mines.
    pub const TRIANGLE: &str = include_str!("../shapes/triangle.txt");
}

/// Applies the shape file at `path` to `board`, returning whether a file was found.
///
/// A missing file leaves the board as it is. A malformed file is an error and also leaves the board untouched.
pub fn load_shape_file(board: &mut Board, path: impl AsRef<Path>) -> Result<bool> {
    let path = path.as_ref();
    let source = match fs::read_to_string(path) {
        Ok(source) => source,
        Err(err) if err.kind() == io::ErrorKind::NotFound => {
            log::warn!("Shape file {} not found, keeping full board", path.display());
            return Ok(false);
        }
        Err(err) => return Err(err.into()),
    };

    board.load_shape(&source)?;
    log::debug!("Loaded shape from {}", path.display());

    Ok(true)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_support::scratch_dir;
    use mineclear_core::{GameError, ShapeIssue};

    #[test]
    fn bundled_triangle_fits_a_13_board() {
        let mut board = Board::new(13, 20);

        board.load_shape(shapes::TRIANGLE).unwrap();

        assert_eq!(board.size(), 13);
        assert_eq!(board.mine_target(), 15);
        assert!(!board.is_playable((0, 0)));
        assert!(board.is_playable((0, 6)));
        assert!(board.is_playable((12, 0)));
        assert_eq!(board.in_bounds_count(), 85);
    }

    #[test]
    fn shape_file_is_applied() {
        let path = scratch_dir().join("triangle.txt");
        fs::write(&path, shapes::TRIANGLE).unwrap();
        let mut board = Board::new(13, 20);

        assert!(load_shape_file(&mut board, &path).unwrap());
        assert_eq!(board.mine_target(), 15);
    }

    #[test]
    fn missing_shape_file_is_a_no_op() {
        let mut board = Board::new(13, 20);

        assert!(!load_shape_file(&mut board, scratch_dir().join("nope.txt")).unwrap());
        assert_eq!(board, Board::new(13, 20));
    }

    #[test]
    fn size_mismatch_surfaces_as_game_error() {
        let path = scratch_dir().join("triangle.txt");
        fs::write(&path, shapes::TRIANGLE).unwrap();
        let mut board = Board::new(9, 10);

        let err = load_shape_file(&mut board, &path).unwrap_err();

        assert!(matches!(
            err,
            StorageError::Game(GameError::InvalidShape {
                line: 2,
                reason: ShapeIssue::RowLength {
                    expected: 9,
                    found: 13
                }
            })
        ));
        assert_eq!(board, Board::new(9, 10));
    }
}
