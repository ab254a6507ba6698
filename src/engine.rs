use crate::placement::place_mines;
use crate::*;
use alloc::collections::{BTreeSet, VecDeque};
use core::num::Saturating;
use serde::{Deserialize, Serialize};

/// Lifecycle of a single game.
///
/// `NotStarted` turns into `OnGoing` on the first effective reveal, possibly
/// continuing straight to a terminal state when that reveal decides the game.
/// `Victory` and `Defeat` are terminal: every later action is a no-op, a new
/// [`Game`] replaces the finished one.
#[derive(Copy, Clone, Debug, PartialEq, Serialize, Deserialize)]
pub enum Status {
    NotStarted,
    OnGoing,
    Victory,
    Defeat,
}

impl Status {
    pub const fn is_final(self) -> bool {
        matches!(self, Self::Victory | Self::Defeat)
    }
}

impl Default for Status {
    fn default() -> Self {
        Self::NotStarted
    }
}

/// A single minesweeper game from first reveal to win or loss.
///
/// Mines are placed lazily: a fresh board stays empty until the first
/// effective reveal, which seeds the layout while sparing the revealed cell
/// according to the game's [`StartSafety`].
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Game {
    grid: Grid,
    mines: CellCount,
    flag_count: Saturating<CellCount>,
    status: Status,
    safety: StartSafety,
    seed: u64,
    elapsed: Saturating<u32>,
    detonated: Option<Coord2>,
}

impl Game {
    /// Starts a game with the default first-reveal safety rule.
    pub fn new(config: GameConfig, seed: u64) -> Result<Self> {
        Self::with_safety(config, StartSafety::default(), seed)
    }

    pub fn with_safety(config: GameConfig, safety: StartSafety, seed: u64) -> Result<Self> {
        config.validate()?;
        Ok(Self {
            grid: Grid::new(config.size)?,
            mines: config.mines,
            flag_count: Saturating(0),
            status: Status::default(),
            safety,
            seed,
            elapsed: Saturating(0),
            detonated: None,
        })
    }

    /// Wraps a grid whose mines are already down, e.g. one built with
    /// [`Grid::with_mines`]. The first reveal will not move any mine.
    pub fn from_grid(grid: Grid) -> Result<Self> {
        let mines = grid.mine_count();
        if mines == 0 {
            return Err(GameError::NoMines);
        }
        if mines >= grid.total_cells() {
            return Err(GameError::TooManyMines);
        }
        let flag_count = Saturating(grid.count_flagged());
        Ok(Self {
            grid,
            mines,
            flag_count,
            status: Status::default(),
            safety: StartSafety::default(),
            seed: 0,
            elapsed: Saturating(0),
            detonated: None,
        })
    }

    pub fn status(&self) -> Status {
        self.status
    }

    pub fn grid(&self) -> &Grid {
        &self.grid
    }

    pub fn size(&self) -> Coord2 {
        self.grid.size()
    }

    pub fn config(&self) -> GameConfig {
        GameConfig::new(self.size(), self.mines)
    }

    pub fn total_mines(&self) -> CellCount {
        self.mines
    }

    pub fn flag_count(&self) -> CellCount {
        self.flag_count.0
    }

    /// Mines minus flags, the usual counter display. Goes negative when the
    /// player over-flags.
    pub fn mines_left(&self) -> isize {
        (self.mines as isize) - (self.flag_count.0 as isize)
    }

    pub fn elapsed_ticks(&self) -> u32 {
        self.elapsed.0
    }

    /// Where the losing reveal happened, once it has.
    pub fn detonated(&self) -> Option<Coord2> {
        self.detonated
    }

    /// Reveals the cell at `coords`, flood-filling through zero cells.
    ///
    /// The first effective reveal places the mines. Flagged cells, already
    /// revealed cells, out-of-range coordinates and finished games are all
    /// no-ops that leave the game untouched.
    pub fn reveal(&mut self, coords: Coord2) -> Status {
        if self.status.is_final() || !self.grid.in_bounds(coords) {
            return self.status;
        }
        let cell = self.grid.cell(coords);
        if !cell.is_hidden() || cell.is_flagged() {
            return self.status;
        }

        if self.grid.mine_count() == 0 {
            place_mines(&mut self.grid, coords, self.mines, self.safety, self.seed);
        }

        self.reveal_cell(coords);
        self.mark_started();
        self.settle()
    }

    /// Chord move: on a revealed numbered cell whose flagged neighbors match
    /// its count, reveals every unflagged hidden neighbor, flood-fills
    /// included. Anything else is a no-op.
    ///
    /// A misplaced flag makes this lose the game.
    pub fn expand(&mut self, coords: Coord2) -> Status {
        if !self.can_expand(coords) {
            return self.status;
        }
        for pos in self.grid.neighbors(coords) {
            let neighbor = self.grid.cell(pos);
            if neighbor.is_hidden() && !neighbor.is_flagged() {
                self.reveal_cell(pos);
            }
        }
        self.settle()
    }

    /// Whether [`Game::expand`] would act at `coords`.
    pub fn can_expand(&self, coords: Coord2) -> bool {
        if self.status.is_final() || !self.grid.in_bounds(coords) {
            return false;
        }
        let cell = self.grid.cell(coords);
        !cell.is_hidden()
            && cell.adjacent_mines() > 0
            && self.count_flagged_neighbors(coords) == cell.adjacent_mines()
    }

    /// Plants a flag on a hidden, unflagged cell. Flagging the last mine can
    /// complete the victory condition, so the settled status is returned.
    pub fn flag(&mut self, coords: Coord2) -> Status {
        if self.status.is_final() || !self.grid.in_bounds(coords) {
            return self.status;
        }
        let cell = self.grid.cell(coords);
        if !cell.is_hidden() || cell.is_flagged() {
            return self.status;
        }
        self.grid.set_flagged(coords, true);
        self.flag_count += 1;
        self.settle()
    }

    /// Removes a flag. Unflagged cells are no-ops.
    pub fn unflag(&mut self, coords: Coord2) -> Status {
        if self.status.is_final() || !self.grid.in_bounds(coords) {
            return self.status;
        }
        if !self.grid.cell(coords).is_flagged() {
            return self.status;
        }
        self.grid.set_flagged(coords, false);
        self.flag_count -= 1;
        self.settle()
    }

    /// Advances the elapsed-tick counter while the game is running and
    /// returns the total. The cadence is the caller's business.
    pub fn tick(&mut self) -> u32 {
        if matches!(self.status, Status::OnGoing) {
            self.elapsed += 1;
        }
        self.elapsed.0
    }

    /// Derives the outcome from the board alone: `Defeat` once a mine is
    /// exposed, `Victory` once hidden cells, flags and mines all coincide,
    /// `OnGoing` otherwise.
    ///
    /// Never returns `NotStarted`; [`Game::status`] tracks the lifecycle.
    pub fn evaluate(&self) -> Status {
        let flags = self.flag_count.0;
        if self.grid.any_mine_revealed() {
            Status::Defeat
        } else if self.grid.hidden_count() == flags && flags == self.mines {
            Status::Victory
        } else {
            Status::OnGoing
        }
    }

    fn count_flagged_neighbors(&self, coords: Coord2) -> u8 {
        self.grid
            .neighbors(coords)
            .filter(|&pos| self.grid.cell(pos).is_flagged())
            .count()
            .try_into()
            .unwrap()
    }

    fn mark_started(&mut self) {
        if matches!(self.status, Status::NotStarted) {
            self.status = Status::OnGoing;
            log::debug!("First reveal, game on");
        }
    }

    /// Applies [`Game::evaluate`] to the lifecycle. A loss additionally
    /// exposes the whole board, flags kept in place.
    fn settle(&mut self) -> Status {
        match self.evaluate() {
            Status::Defeat => {
                self.status = Status::Defeat;
                self.grid.reveal_all();
                log::debug!("Game lost, detonated at {:?}", self.detonated);
            }
            Status::Victory => {
                self.status = Status::Victory;
                log::debug!("Game won");
            }
            _ => {}
        }
        self.status
    }

    /// Reveals a single cell, flood-filling its zero region when there is
    /// one. The walk uses an explicit queue, so board size never threatens
    /// the call stack.
    fn reveal_cell(&mut self, coords: Coord2) {
        let cell = self.grid.cell(coords);
        if !cell.is_hidden() || cell.is_flagged() {
            return;
        }

        self.grid.reveal_at(coords);
        log::debug!("Revealed {:?}, adjacent mines: {}", coords, cell.adjacent_mines());

        if cell.is_mine() {
            // Keep the first detonation when a chord hits several mines.
            if self.detonated.is_none() {
                self.detonated = Some(coords);
            }
            return;
        }
        if cell.adjacent_mines() > 0 {
            return;
        }

        let mut visited = BTreeSet::from([coords]);
        let mut to_visit: VecDeque<Coord2> = self
            .grid
            .neighbors(coords)
            .filter(|&pos| self.grid.cell(pos).is_hidden())
            .collect();
        log::trace!("Flood-fill from {coords:?} starting with {to_visit:?}");

        while let Some(visit) = to_visit.pop_front() {
            if !visited.insert(visit) {
                continue;
            }
            let cell = self.grid.cell(visit);
            if !cell.is_hidden() || cell.is_flagged() {
                continue;
            }
            self.grid.reveal_at(visit);
            log::trace!("Flood revealed {:?}, adjacent mines: {}", visit, cell.adjacent_mines());
            if cell.adjacent_mines() == 0 {
                to_visit.extend(
                    self.grid
                        .neighbors(visit)
                        .filter(|&pos| self.grid.cell(pos).is_hidden())
                        .filter(|pos| !visited.contains(pos)),
                );
            }
        }
    }
}
