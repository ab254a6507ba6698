#![no_std]

extern crate alloc;

use serde::{Deserialize, Serialize};

pub use engine::*;
pub use error::*;
pub use grid::*;
pub use placement::*;
pub use types::*;

mod engine;
mod error;
mod grid;
mod placement;
mod types;

/// Board size and mine count for a new game.
#[derive(Copy, Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct GameConfig {
    pub size: Coord2,
    pub mines: CellCount,
}

impl GameConfig {
    pub const fn new(size: Coord2, mines: CellCount) -> Self {
        Self { size, mines }
    }

    /// 9x9 board with 10 mines.
    pub const fn easy() -> Self {
        Self::new((9, 9), 10)
    }

    /// 16x16 board with 40 mines.
    pub const fn medium() -> Self {
        Self::new((16, 16), 40)
    }

    /// 30x16 board with 99 mines.
    pub const fn advanced() -> Self {
        Self::new((30, 16), 99)
    }

    pub const fn total_cells(&self) -> CellCount {
        area(self.size.0, self.size.1)
    }

    /// Rejects configurations no playable game can be built from. Nothing is
    /// ever clamped; at least one non-mine cell must exist for the first
    /// reveal to land on.
    pub fn validate(&self) -> Result<()> {
        if self.size.0 == 0 || self.size.1 == 0 {
            return Err(GameError::InvalidDimensions);
        }
        if self.mines == 0 {
            return Err(GameError::NoMines);
        }
        if self.mines >= self.total_cells() {
            return Err(GameError::TooManyMines);
        }
        Ok(())
    }
}
