#![no_std]

extern crate alloc;

use core::ops::BitOr;
use serde::{Deserialize, Serialize};

pub use board::*;
pub use engine::*;
pub use error::*;
pub use generator::*;
pub use matrix::*;
pub use observer::*;
pub use tile::{Tile, TileContent};
pub use types::*;

mod board;
mod engine;
mod error;
mod generator;
mod matrix;
mod observer;
pub mod tile;
mod types;

#[derive(Copy, Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct GameConfig {
    /// Board size as `(columns, rows)`.
    pub size: Coord2,
    pub mines: CellCount,
}

impl GameConfig {
    pub const fn new_unchecked(size: Coord2, mines: CellCount) -> Self {
        Self { size, mines }
    }

    pub fn new(size: Coord2, mines: CellCount) -> Result<Self> {
        if size.0 == 0 || size.1 == 0 {
            return Err(GameError::InvalidSize);
        }
        if mines > mult(size.0, size.1) {
            return Err(GameError::TooManyMines);
        }
        Ok(Self::new_unchecked(size, mines))
    }

    pub const fn total_tiles(&self) -> CellCount {
        mult(self.size.0, self.size.1)
    }

    pub const fn safe_tiles(&self) -> CellCount {
        self.total_tiles() - self.mines
    }

    pub const fn rows(&self) -> Coord {
        self.size.1
    }

    pub const fn cols(&self) -> Coord {
        self.size.0
    }
}

#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum MarkOutcome {
    NoChange,
    Changed,
}

impl MarkOutcome {
    pub const fn has_update(self) -> bool {
        match self {
            Self::NoChange => false,
            Self::Changed => true,
        }
    }
}

#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum RevealOutcome {
    NoChange,
    Revealed,
    /// A flood fill revealed its first batch and is waiting for [`RevealEngine::resume`].
    Pending,
    HitMine,
    Won,
}

impl RevealOutcome {
    pub const fn has_update(self) -> bool {
        use RevealOutcome::*;
        match self {
            NoChange => false,
            Revealed => true,
            Pending => true,
            HitMine => true,
            Won => true,
        }
    }

    pub const fn is_pending(self) -> bool {
        matches!(self, Self::Pending)
    }
}

impl BitOr for RevealOutcome {
    type Output = RevealOutcome;

    fn bitor(self, rhs: Self) -> Self::Output {
        use RevealOutcome::*;
        match (self, rhs) {
            (HitMine, _) => HitMine,
            (_, HitMine) => HitMine,
            (Won, _) => Won,
            (_, Won) => Won,
            (Pending, _) => Pending,
            (_, Pending) => Pending,
            (Revealed, _) => Revealed,
            (_, Revealed) => Revealed,
            (NoChange, NoChange) => NoChange,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn config_rejects_overfull_and_empty_boards() {
        assert_eq!(GameConfig::new((3, 3), 10), Err(GameError::TooManyMines));
        assert_eq!(GameConfig::new((0, 3), 0), Err(GameError::InvalidSize));
        let config = GameConfig::new((4, 3), 12).unwrap();
        assert_eq!(config.safe_tiles(), 0);
        assert_eq!((config.cols(), config.rows()), (4, 3));
    }

    #[test]
    fn outcome_merge_prefers_terminal_states() {
        use RevealOutcome::*;
        assert_eq!(Revealed | Pending, Pending);
        assert_eq!(Pending | Won, Won);
        assert_eq!(Won | HitMine, HitMine);
        assert_eq!(NoChange | NoChange, NoChange);
    }
}
