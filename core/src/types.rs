/// Single coordinate axis used for rows, columns and vertex positions.
pub type Coord = u8;

/// Two-dimensional cell coordinates `(row, col)`.
pub type Coord2 = (Coord, Coord);

/// Lattice corner `(row, col)`; shares the coordinate type with cells but spans one more step per axis.
pub type Vertex = Coord2;

/// Count type used for tile and segment counts.
pub type CellCount = u16;

/// Width and height of the board in cells.
pub const BOARD_SIZE: Coord = 9;

/// Width and height of the vertex lattice.
pub const LATTICE_SIZE: Coord = BOARD_SIZE + 1;

/// Number of cells on the board.
pub const TOTAL_CELLS: CellCount = mult(BOARD_SIZE, BOARD_SIZE);

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

pub const fn mult(a: Coord, b: Coord) -> CellCount {
    let a = a as CellCount;
    let b = b as CellCount;
    a.saturating_mul(b)
}

pub const fn in_board(coords: Coord2) -> bool {
    coords.0 < BOARD_SIZE && coords.1 < BOARD_SIZE
}

pub const fn in_lattice(vertex: Vertex) -> bool {
    vertex.0 < LATTICE_SIZE && vertex.1 < LATTICE_SIZE
}

/// Whether two lattice points differ by exactly one step along one axis.
pub const fn is_lattice_adjacent(a: Vertex, b: Vertex) -> bool {
    a.0.abs_diff(b.0) + a.1.abs_diff(b.1) == 1
}

/// King-move distance between two cells.
pub fn chebyshev(a: Coord2, b: Coord2) -> Coord {
    a.0.abs_diff(b.0).max(a.1.abs_diff(b.1))
}

/// Iterates the cells of the board in row-major order.
pub fn iter_cells() -> impl Iterator<Item = Coord2> {
    (0..BOARD_SIZE).flat_map(|row| (0..BOARD_SIZE).map(move |col| (row, col)))
}

/// The eight surrounding cells.
pub const NEARBY: [(i8, i8); 8] = [
    (-1, -1),
    (-1, 0),
    (-1, 1),
    (0, -1),
    (0, 1),
    (1, -1),
    (1, 0),
    (1, 1),
];

/// The four edge-sharing cells.
pub const ORTHOGONAL: [(i8, i8); 4] = [(-1, 0), (0, -1), (0, 1), (1, 0)];

/// Applies `delta` to `coords`, returning a value only when it remains in bounds.
pub(crate) fn apply_delta(coords: Coord2, delta: (i8, i8), bound: Coord) -> Option<Coord2> {
    let (row, col) = coords;
    let (d_row, d_col) = delta;

    let next_row = row.checked_add_signed(d_row)?;
    if next_row >= bound {
        return None;
    }

    let next_col = col.checked_add_signed(d_col)?;
    if next_col >= bound {
        return None;
    }

    Some((next_row, next_col))
}

#[derive(Debug)]
pub struct NeighborIter {
    center: Coord2,
    bound: Coord,
    displacements: &'static [(i8, i8)],
    index: u8,
}

impl NeighborIter {
    pub fn nearby(center: Coord2) -> Self {
        Self::new(center, BOARD_SIZE, &NEARBY)
    }

    pub fn orthogonal(center: Coord2) -> Self {
        Self::new(center, BOARD_SIZE, &ORTHOGONAL)
    }

    /// Lattice points one step away from `vertex`.
    pub fn lattice(vertex: Vertex) -> Self {
        Self::new(vertex, LATTICE_SIZE, &ORTHOGONAL)
    }

    fn new(center: Coord2, bound: Coord, displacements: &'static [(i8, i8)]) -> Self {
        Self {
            center,
            bound,
            displacements,
            index: 0,
        }
    }
}

impl Iterator for NeighborIter {
    type Item = Coord2;

    fn next(&mut self) -> Option<Self::Item> {
        loop {
            if usize::from(self.index) >= self.displacements.len() {
                return None;
            }

            let next_item = apply_delta(
                self.center,
                self.displacements[self.index as usize],
                self.bound,
            );
            self.index += 1;

            if next_item.is_some() {
                return next_item;
            }
        }
    }
}
