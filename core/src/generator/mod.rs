use serde::{Deserialize, Serialize};

use crate::*;
pub use random::*;

mod random;

pub trait MineGenerator {
    /// Places `board.mine_target()` mines on the playable tiles of `board`.
    fn place(self, board: &mut Board);
}

/// How much of the first revealed area is guaranteed to be free of mines.
#[derive(Copy, Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum StartTile {
    /// No guarantee at all.
    Random,
    /// The clicked tile is safe.
    SimpleSafe,
    /// The clicked tile and all its neighbors are safe, so the first reveal always opens an area.
    #[default]
    AlwaysZero,
}
