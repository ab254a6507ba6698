use crate::*;
use ndarray::Array2;
use serde::{Deserialize, Serialize};

/// One square of the minefield: mine bit, precomputed adjacency, visibility.
#[derive(Copy, Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Cell {
    mine: bool,
    adjacent_mines: u8,
    hidden: bool,
    flagged: bool,
}

impl Cell {
    pub const fn is_mine(self) -> bool {
        self.mine
    }

    /// Mines in the Moore neighborhood. Stays 0 until mines are placed.
    pub const fn adjacent_mines(self) -> u8 {
        self.adjacent_mines
    }

    pub const fn is_hidden(self) -> bool {
        self.hidden
    }

    pub const fn is_flagged(self) -> bool {
        self.flagged
    }
}

impl Default for Cell {
    fn default() -> Self {
        Self {
            mine: false,
            adjacent_mines: 0,
            hidden: true,
            flagged: false,
        }
    }
}

/// Fixed-size arena of cells with tracked mine and hidden counts.
///
/// Queries are public; mutation goes through the `pub(crate)` methods so the
/// counts can never drift from the cells they summarize.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Grid {
    cells: Array2<Cell>,
    mine_count: CellCount,
    hidden_count: CellCount,
}

impl Grid {
    /// Creates a mine-free grid with every cell hidden and unflagged.
    pub fn new(size: Coord2) -> Result<Self> {
        let (width, height) = size;
        if width == 0 || height == 0 {
            return Err(GameError::InvalidDimensions);
        }
        Ok(Self {
            cells: Array2::default(size.to_nd_index()),
            mine_count: 0,
            hidden_count: area(width, height),
        })
    }

    /// Builds a fully placed grid from explicit mine coordinates, adjacency
    /// counts included.
    pub fn with_mines(size: Coord2, mine_coords: &[Coord2]) -> Result<Self> {
        let mut grid = Self::new(size)?;
        for &coords in mine_coords {
            let mut cell = grid.get(coords)?;
            cell.mine = true;
            grid.set(coords, cell)?;
        }
        grid.recount_adjacency();
        Ok(grid)
    }

    pub fn size(&self) -> Coord2 {
        let (width, height) = self.cells.dim();
        (width.try_into().unwrap(), height.try_into().unwrap())
    }

    pub fn total_cells(&self) -> CellCount {
        self.cells.len().try_into().unwrap()
    }

    /// Mines currently on the board. 0 means placement has not happened yet.
    pub fn mine_count(&self) -> CellCount {
        self.mine_count
    }

    /// Cells still hidden, flagged ones included.
    pub fn hidden_count(&self) -> CellCount {
        self.hidden_count
    }

    pub fn in_bounds(&self, coords: Coord2) -> bool {
        let (width, height) = self.size();
        coords.0 < width && coords.1 < height
    }

    /// Cell at `coords`, or `OutOfBounds` for coordinates off the grid.
    pub fn get(&self, coords: Coord2) -> Result<Cell> {
        if self.in_bounds(coords) {
            Ok(self.cells[coords.to_nd_index()])
        } else {
            Err(GameError::OutOfBounds)
        }
    }

    /// Iterates every cell with its coordinates.
    pub fn cells(&self) -> impl Iterator<Item = (Coord2, Cell)> {
        self.cells.indexed_iter().map(|((x, y), &cell)| {
            ((x.try_into().unwrap(), y.try_into().unwrap()), cell)
        })
    }

    /// Moore neighbors of `coords`, clipped to the grid.
    pub fn neighbors(&self, coords: Coord2) -> impl Iterator<Item = Coord2> + use<> {
        neighbors_of(coords, self.size())
    }

    /// Unchecked read for coordinates already known to be in bounds.
    pub(crate) fn cell(&self, coords: Coord2) -> Cell {
        self.cells[coords.to_nd_index()]
    }

    /// Replaces one cell record, keeping the tracked counts in step. Neighbor
    /// adjacency is not recomputed; placement owns that pass.
    pub(crate) fn set(&mut self, coords: Coord2, cell: Cell) -> Result<()> {
        if !self.in_bounds(coords) {
            return Err(GameError::OutOfBounds);
        }
        self.put(coords, cell);
        Ok(())
    }

    /// Count-maintaining store behind [`Grid::set`] and the specific
    /// mutators below.
    fn put(&mut self, coords: Coord2, cell: Cell) {
        let old = self.cells[coords.to_nd_index()];
        match (old.mine, cell.mine) {
            (false, true) => self.mine_count += 1,
            (true, false) => self.mine_count -= 1,
            _ => {}
        }
        match (old.hidden, cell.hidden) {
            (true, false) => self.hidden_count -= 1,
            (false, true) => self.hidden_count += 1,
            _ => {}
        }
        self.cells[coords.to_nd_index()] = cell;
    }

    /// Marks `coords` revealed. Idempotent.
    pub(crate) fn reveal_at(&mut self, coords: Coord2) {
        let mut cell = self.cell(coords);
        cell.hidden = false;
        self.put(coords, cell);
    }

    pub(crate) fn set_flagged(&mut self, coords: Coord2, flagged: bool) {
        let mut cell = self.cell(coords);
        cell.flagged = flagged;
        self.put(coords, cell);
    }

    /// Turns `coords` into a mine. Adjacency counts are recomputed separately
    /// once every mine is down.
    pub(crate) fn set_mine(&mut self, coords: Coord2) {
        let mut cell = self.cell(coords);
        cell.mine = true;
        self.put(coords, cell);
    }

    /// Stores every cell's Moore-neighborhood mine count, mined cells too.
    pub(crate) fn recount_adjacency(&mut self) {
        let (width, height) = self.size();
        for x in 0..width {
            for y in 0..height {
                let count = self
                    .neighbors((x, y))
                    .filter(|&pos| self.cells[pos.to_nd_index()].mine)
                    .count();
                self.cells[(x, y).to_nd_index()].adjacent_mines = count.try_into().unwrap();
            }
        }
    }

    /// Exposes the whole board after a loss. Flag bits stay for the caller to
    /// render.
    pub(crate) fn reveal_all(&mut self) {
        for cell in self.cells.iter_mut() {
            cell.hidden = false;
        }
        self.hidden_count = 0;
    }

    /// True once some mine is no longer hidden.
    pub(crate) fn any_mine_revealed(&self) -> bool {
        self.cells.iter().any(|cell| cell.mine && !cell.hidden)
    }

    pub(crate) fn count_flagged(&self) -> CellCount {
        let count = self.cells.iter().filter(|cell| cell.flagged).count();
        count.try_into().unwrap()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use alloc::vec::Vec;

    #[test]
    fn new_grid_is_hidden_and_mine_free() {
        let grid = Grid::new((4, 3)).unwrap();
        assert_eq!(grid.size(), (4, 3));
        assert_eq!(grid.total_cells(), 12);
        assert_eq!(grid.mine_count(), 0);
        assert_eq!(grid.hidden_count(), 12);
        for (_, cell) in grid.cells() {
            assert!(cell.is_hidden());
            assert!(!cell.is_mine());
            assert!(!cell.is_flagged());
            assert_eq!(cell.adjacent_mines(), 0);
        }
    }

    #[test]
    fn zero_dimensions_are_rejected() {
        assert_eq!(Grid::new((0, 5)), Err(GameError::InvalidDimensions));
        assert_eq!(Grid::new((5, 0)), Err(GameError::InvalidDimensions));
    }

    #[test]
    fn get_out_of_bounds_is_an_error() {
        let grid = Grid::new((3, 3)).unwrap();
        assert!(grid.get((2, 2)).is_ok());
        assert_eq!(grid.get((3, 2)), Err(GameError::OutOfBounds));
        assert_eq!(grid.get((2, 3)), Err(GameError::OutOfBounds));
    }

    #[test]
    fn with_mines_rejects_out_of_bounds_mines() {
        assert_eq!(
            Grid::with_mines((3, 3), &[(1, 1), (3, 0)]),
            Err(GameError::OutOfBounds)
        );
    }

    #[test]
    fn with_mines_counts_adjacency() {
        let grid = Grid::with_mines((3, 3), &[(2, 2)]).unwrap();
        assert_eq!(grid.mine_count(), 1);
        assert_eq!(grid.get((1, 1)).unwrap().adjacent_mines(), 1);
        assert_eq!(grid.get((2, 1)).unwrap().adjacent_mines(), 1);
        assert_eq!(grid.get((1, 2)).unwrap().adjacent_mines(), 1);
        assert_eq!(grid.get((0, 0)).unwrap().adjacent_mines(), 0);
        assert_eq!(grid.get((2, 0)).unwrap().adjacent_mines(), 0);
        // The mined cell carries a count as well, it just never shows.
        assert_eq!(grid.get((2, 2)).unwrap().adjacent_mines(), 0);
    }

    #[test]
    fn adjacency_matches_a_brute_force_recount() {
        let mines = [(0, 0), (1, 0), (4, 2), (3, 3), (0, 3)];
        let grid = Grid::with_mines((5, 4), &mines).unwrap();
        for (coords, cell) in grid.cells() {
            let expected = grid
                .neighbors(coords)
                .filter(|&pos| grid.get(pos).unwrap().is_mine())
                .count();
            assert_eq!(
                usize::from(cell.adjacent_mines()),
                expected,
                "adjacency mismatch at {coords:?}"
            );
        }
    }

    #[test]
    fn neighbors_clip_at_corners_and_edges() {
        let grid = Grid::new((5, 4)).unwrap();
        let count = |coords| grid.neighbors(coords).count();
        assert_eq!(count((0, 0)), 3);
        assert_eq!(count((4, 3)), 3);
        assert_eq!(count((2, 0)), 5);
        assert_eq!(count((0, 2)), 5);
        assert_eq!(count((2, 2)), 8);

        let neighbors: Vec<_> = grid.neighbors((0, 0)).collect();
        assert_eq!(neighbors, [(1, 0), (0, 1), (1, 1)]);
    }

    #[test]
    fn single_cell_grid_has_no_neighbors() {
        let grid = Grid::new((1, 1)).unwrap();
        assert_eq!(grid.neighbors((0, 0)).count(), 0);
    }

    #[test]
    fn reveal_at_is_idempotent() {
        let mut grid = Grid::with_mines((2, 2), &[(1, 1)]).unwrap();
        grid.reveal_at((0, 0));
        assert_eq!(grid.hidden_count(), 3);
        grid.reveal_at((0, 0));
        assert_eq!(grid.hidden_count(), 3);
        assert!(!grid.get((0, 0)).unwrap().is_hidden());
    }

    #[test]
    fn set_maintains_the_tracked_counts() {
        let mut grid = Grid::new((2, 2)).unwrap();
        let mut cell = grid.get((1, 1)).unwrap();
        cell.mine = true;
        cell.hidden = false;
        grid.set((1, 1), cell).unwrap();
        assert_eq!(grid.mine_count(), 1);
        assert_eq!(grid.hidden_count(), 3);

        // Storing the same record again must not move the counts.
        grid.set((1, 1), cell).unwrap();
        assert_eq!(grid.mine_count(), 1);
        assert_eq!(grid.hidden_count(), 3);

        assert_eq!(grid.set((2, 0), cell), Err(GameError::OutOfBounds));
    }

    #[test]
    fn reveal_all_keeps_flags() {
        let mut grid = Grid::with_mines((2, 2), &[(1, 1)]).unwrap();
        grid.set_flagged((1, 1), true);
        grid.reveal_all();
        assert_eq!(grid.hidden_count(), 0);
        assert!(grid.get((1, 1)).unwrap().is_flagged());
        assert!(grid.any_mine_revealed());
    }
}
