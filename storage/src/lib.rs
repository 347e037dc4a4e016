//! File-backed persistence for `mineclear-core`: mid-game snapshots, the top-10 leaderboard, board shapes and
//! settings, plus a [`Session`] that ties them to a running [`GameEngine`](mineclear_core::GameEngine).

pub use error::*;
pub use leaderboard::*;
pub use session::*;
pub use settings::*;
pub use shape::*;
pub use snapshot::*;

mod error;
mod leaderboard;
mod session;
mod settings;
mod shape;
mod snapshot;
