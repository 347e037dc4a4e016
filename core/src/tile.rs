use serde::{Deserialize, Serialize};

/// State of a single board cell.
///
/// `adjacent_mines` stays `None` until the mine layout is finalized, after which every playable tile caches its
/// count and never recomputes it.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Tile {
    pub(crate) in_bounds: bool,
    pub(crate) covered: bool,
    pub(crate) flagged: bool,
    pub(crate) has_mine: bool,
    pub(crate) adjacent_mines: Option<u8>,
}

impl Tile {
    pub const fn new(in_bounds: bool) -> Self {
        Self {
            in_bounds,
            covered: true,
            flagged: false,
            has_mine: false,
            adjacent_mines: None,
        }
    }

    pub const fn out_of_bounds() -> Self {
        Self::new(false)
    }

    pub const fn in_bounds(&self) -> bool {
        self.in_bounds
    }

    pub const fn is_covered(&self) -> bool {
        self.covered
    }

    pub const fn is_flagged(&self) -> bool {
        self.flagged
    }

    pub const fn has_mine(&self) -> bool {
        self.has_mine
    }

    pub const fn adjacent_mines(&self) -> Option<u8> {
        self.adjacent_mines
    }

    /// Covered playable tile that a reveal command may open.
    pub const fn is_revealable(&self) -> bool {
        self.in_bounds && self.covered && !self.flagged
    }
}

impl Default for Tile {
    fn default() -> Self {
        Self::new(true)
    }
}
