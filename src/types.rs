/// Coordinate axis type covering grid width, height, and positions.
pub type Coord = u8;

/// Count type for mines, flags, and total-cell tallies.
pub type CellCount = u16;

/// Two-dimensional grid coordinates `(x, y)`.
pub type Coord2 = (Coord, Coord);

pub trait ToNdIndex {
    type Output;
    fn to_nd_index(self) -> Self::Output;
}

impl ToNdIndex for Coord2 {
    type Output = [usize; 2];

    fn to_nd_index(self) -> Self::Output {
        [self.0.into(), self.1.into()]
    }
}

pub const fn area(width: Coord, height: Coord) -> CellCount {
    let width = width as CellCount;
    let height = height as CellCount;
    width.saturating_mul(height)
}

const MOORE_OFFSETS: [(i8, i8); 8] = [
    (-1, -1),
    (0, -1),
    (1, -1),
    (-1, 0),
    (1, 0),
    (-1, 1),
    (0, 1),
    (1, 1),
];

/// Applies `delta` to `center`, returning a value only when it stays inside
/// `bounds`.
fn offset_within(center: Coord2, delta: (i8, i8), bounds: Coord2) -> Option<Coord2> {
    let (x, y) = center;
    let (dx, dy) = delta;
    let (width, height) = bounds;

    let next_x = x.checked_add_signed(dx)?;
    if next_x >= width {
        return None;
    }

    let next_y = y.checked_add_signed(dy)?;
    if next_y >= height {
        return None;
    }

    Some((next_x, next_y))
}

/// Iterates the up-to-8 Moore neighbors of `center`, clipped to `bounds`.
/// Off-grid neighbors are simply absent, never an error.
pub fn neighbors_of(center: Coord2, bounds: Coord2) -> impl Iterator<Item = Coord2> {
    MOORE_OFFSETS
        .into_iter()
        .filter_map(move |delta| offset_within(center, delta, bounds))
}
