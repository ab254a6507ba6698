use crate::*;
use alloc::collections::BTreeSet;
use rand::prelude::*;
use serde::{Deserialize, Serialize};

/// How much of the board around the first revealed cell stays mine-free.
#[derive(Copy, Clone, Debug, PartialEq, Serialize, Deserialize)]
pub enum StartSafety {
    /// Only the first revealed cell is spared. It may still show a number.
    Cell,
    /// The first revealed cell and its Moore neighbors are spared, so the
    /// first reveal lands on a zero cell and flood-fills.
    Neighborhood,
}

impl Default for StartSafety {
    fn default() -> Self {
        Self::Cell
    }
}

/// Fills `grid` with `mines` mines, sparing `excluded` according to `safety`,
/// then recounts adjacency for the whole board.
///
/// Coordinates are drawn uniformly at random; draws that hit the exclusion
/// zone or an already-chosen cell are rejected and redrawn. The caller has
/// already checked `mines < total cells`, so the loop always terminates.
pub(crate) fn place_mines(
    grid: &mut Grid,
    excluded: Coord2,
    mines: CellCount,
    safety: StartSafety,
    seed: u64,
) {
    let (width, height) = grid.size();
    let zone = exclusion_zone(excluded, (width, height), safety, mines, grid.total_cells());

    let mut rng = SmallRng::seed_from_u64(seed);
    let mut chosen: BTreeSet<Coord2> = BTreeSet::new();
    while (chosen.len() as CellCount) < mines {
        let draw = (rng.random_range(0..width), rng.random_range(0..height));
        if zone.contains(&draw) {
            continue;
        }
        // Duplicate draws bounce off the set.
        chosen.insert(draw);
    }

    for &coords in &chosen {
        grid.set_mine(coords);
    }
    grid.recount_adjacency();

    debug_assert_eq!(grid.mine_count(), mines);
}

fn exclusion_zone(
    excluded: Coord2,
    bounds: Coord2,
    safety: StartSafety,
    mines: CellCount,
    total: CellCount,
) -> BTreeSet<Coord2> {
    let mut zone = BTreeSet::from([excluded]);
    if matches!(safety, StartSafety::Neighborhood) {
        zone.extend(neighbors_of(excluded, bounds));
        if total - (zone.len() as CellCount) < mines {
            log::warn!(
                "Cannot keep the start neighborhood mine-free, falling back to the start cell only"
            );
            zone = BTreeSet::from([excluded]);
        }
    }
    zone
}
