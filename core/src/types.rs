use serde::{Deserialize, Serialize};

/// Single coordinate axis used for board width, height, and positions.
pub type Coord = u32;

/// Count type used for mine counts, tile counts, and buffer offsets.
pub type CellCount = usize;

/// Two-dimensional coordinates `(x, y)`, that is `(column, row)`.
pub type Coord2 = (Coord, Coord);

pub const fn mult(a: Coord, b: Coord) -> CellCount {
    (a as CellCount).saturating_mul(b as CellCount)
}

/// Sub-rectangle of the grid in tile space.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Region {
    pub x: Coord,
    pub y: Coord,
    pub width: Coord,
    pub height: Coord,
}

impl Region {
    pub const fn new(x: Coord, y: Coord, width: Coord, height: Coord) -> Self {
        Self {
            x,
            y,
            width,
            height,
        }
    }

    /// Clamps the region to a grid of `bounds`, returning `(x_range, y_range)` as half-open ranges.
    pub fn clamp_to(&self, bounds: Coord2) -> (core::ops::Range<Coord>, core::ops::Range<Coord>) {
        let (max_x, max_y) = bounds;
        let x_start = self.x.min(max_x);
        let y_start = self.y.min(max_y);
        let x_end = self.x.saturating_add(self.width).min(max_x);
        let y_end = self.y.saturating_add(self.height).min(max_y);
        (x_start..x_end, y_start..y_end)
    }
}

const DISPLACEMENTS: [(i32, i32); 8] = [
    (-1, -1),
    (0, -1),
    (1, -1),
    (-1, 0),
    (1, 0),
    (-1, 1),
    (0, 1),
    (1, 1),
];

const ORTHOGONAL_DISPLACEMENTS: [(i32, i32); 4] = [(-1, 0), (0, -1), (1, 0), (0, 1)];

/// Applies `delta` to `coords`, returning a value only when it remains in bounds.
fn apply_delta(coords: Coord2, delta: (i32, i32), bounds: Coord2) -> Option<Coord2> {
    let (x, y) = coords;
    let (dx, dy) = delta;
    let (max_x, max_y) = bounds;

    let next_x = x.checked_add_signed(dx)?;
    if next_x >= max_x {
        return None;
    }

    let next_y = y.checked_add_signed(dy)?;
    if next_y >= max_y {
        return None;
    }

    Some((next_x, next_y))
}

/// In-bounds neighbours of a tile, drawn from a fixed displacement table.
#[derive(Debug, Clone)]
pub struct DisplacementIter<const N: usize> {
    center: Coord2,
    bounds: Coord2,
    displacements: &'static [(i32, i32); N],
    index: usize,
}

impl<const N: usize> Iterator for DisplacementIter<N> {
    type Item = Coord2;

    fn next(&mut self) -> Option<Self::Item> {
        loop {
            if self.index >= N {
                return None;
            }

            let next_item = apply_delta(self.center, self.displacements[self.index], self.bounds);
            self.index += 1;

            if next_item.is_some() {
                return next_item;
            }
        }
    }
}

/// The up to eight tiles touching `center`, diagonals included.
pub type NeighborIter = DisplacementIter<8>;

/// The up to four tiles sharing an edge with `center`.
pub type OrthogonalIter = DisplacementIter<4>;

pub fn iter_neighbors(center: Coord2, bounds: Coord2) -> NeighborIter {
    DisplacementIter {
        center,
        bounds,
        displacements: &DISPLACEMENTS,
        index: 0,
    }
}

pub fn iter_orthogonal(center: Coord2, bounds: Coord2) -> OrthogonalIter {
    DisplacementIter {
        center,
        bounds,
        displacements: &ORTHOGONAL_DISPLACEMENTS,
        index: 0,
    }
}
