use core::ops::Index;
use ndarray::Array2;
use serde::{Deserialize, Serialize};
use smallvec::SmallVec;

use crate::*;

/// Cell offsets relative to a placement anchor.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct ChunkShape {
    offsets: SmallVec<[Coord2; 9]>,
}

impl ChunkShape {
    pub fn from_offsets(offsets: impl IntoIterator<Item = Coord2>) -> Self {
        let mut offsets: SmallVec<[Coord2; 9]> = offsets.into_iter().collect();
        offsets.sort_unstable();
        offsets.dedup();
        Self { offsets }
    }

    pub fn single() -> Self {
        Self::from_offsets([(0, 0)])
    }

    /// Subset of a 3×3 cluster, `mask[row][col]` selecting the covered cells.
    pub fn cluster(mask: [[bool; 3]; 3]) -> Self {
        Self::from_offsets((0..3u8).flat_map(|row| {
            (0..3u8)
                .filter(move |&col| mask[row as usize][col as usize])
                .map(move |col| (row, col))
        }))
    }

    /// A full row when anchored at column 0.
    pub fn row() -> Self {
        Self::from_offsets((0..BOARD_SIZE).map(|col| (0, col)))
    }

    /// A full column when anchored at row 0.
    pub fn column() -> Self {
        Self::from_offsets((0..BOARD_SIZE).map(|row| (row, 0)))
    }

    pub fn offsets(&self) -> &[Coord2] {
        &self.offsets
    }

    pub fn len(&self) -> usize {
        self.offsets.len()
    }

    pub fn is_empty(&self) -> bool {
        self.offsets.is_empty()
    }

    /// Absolute cells covered when anchored at `anchor`.
    pub fn cells_at(&self, anchor: Coord2) -> Result<SmallVec<[Coord2; 9]>> {
        self.offsets
            .iter()
            .map(|&(d_row, d_col)| {
                let coords = (
                    anchor.0.checked_add(d_row).ok_or(GameError::OutOfBounds)?,
                    anchor.1.checked_add(d_col).ok_or(GameError::OutOfBounds)?,
                );
                validate_coords(coords)
            })
            .collect()
    }
}

pub fn validate_coords(coords: Coord2) -> Result<Coord2> {
    if in_board(coords) {
        Ok(coords)
    } else {
        Err(GameError::OutOfBounds)
    }
}

/// The 9×9 board of placed tiles.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Grid {
    cells: Array2<Option<TileKind>>,
}

impl Default for Grid {
    fn default() -> Self {
        Self::new()
    }
}

impl Grid {
    pub fn new() -> Self {
        Self {
            cells: Array2::default((BOARD_SIZE, BOARD_SIZE).to_nd_index()),
        }
    }

    /// Builds a grid from `(coords, kind)` pairs, ignoring later duplicates.
    pub fn from_tiles(tiles: &[(Coord2, TileKind)]) -> Result<Self> {
        let mut grid = Self::new();
        for &(coords, kind) in tiles {
            let coords = validate_coords(coords)?;
            if grid[coords].is_none() {
                grid.cells[coords.to_nd_index()] = Some(kind);
            }
        }
        Ok(grid)
    }

    /// Rejects boards of the wrong size, which only arrive through deserialization.
    pub fn validate(&self) -> Result<()> {
        let side = usize::from(BOARD_SIZE);
        if self.cells.dim() == (side, side) {
            Ok(())
        } else {
            log::warn!("Grid has shape {:?}", self.cells.dim());
            Err(GameError::InvalidState)
        }
    }

    pub fn get(&self, coords: Coord2) -> Result<Option<TileKind>> {
        let coords = validate_coords(coords)?;
        Ok(self[coords])
    }

    /// Writes `kind` into every cell the shape covers, or nothing at all.
    pub fn place(&mut self, shape: &ChunkShape, anchor: Coord2, kind: TileKind) -> Result<()> {
        if shape.is_empty() {
            return Err(GameError::EmptyShape);
        }

        let cells = shape.cells_at(anchor)?;
        if cells.iter().any(|&coords| self[coords].is_some()) {
            return Err(GameError::OccupiedCell);
        }

        for coords in cells {
            self.cells[coords.to_nd_index()] = Some(kind);
        }
        Ok(())
    }

    pub fn is_empty_at(&self, coords: Coord2) -> bool {
        in_board(coords) && self[coords].is_none()
    }

    pub fn tiles(&self) -> impl Iterator<Item = (Coord2, TileKind)> + '_ {
        iter_cells().filter_map(|coords| self[coords].map(|kind| (coords, kind)))
    }

    pub fn tiles_of(&self, kind: TileKind) -> impl Iterator<Item = Coord2> + '_ {
        self.tiles()
            .filter(move |&(_, other)| other == kind)
            .map(|(coords, _)| coords)
    }

    pub fn tile_count(&self) -> CellCount {
        self.cells
            .iter()
            .filter(|cell| cell.is_some())
            .count()
            .try_into()
            .unwrap_or(CellCount::MAX)
    }

    pub fn is_full(&self) -> bool {
        self.tile_count() == TOTAL_CELLS
    }

    /// Tiles on the eight cells surrounding `coords`.
    pub fn nearby_tiles(&self, coords: Coord2) -> impl Iterator<Item = (Coord2, TileKind)> + '_ {
        NeighborIter::nearby(coords).filter_map(|pos| self[pos].map(|kind| (pos, kind)))
    }
}

impl Index<Coord2> for Grid {
    type Output = Option<TileKind>;

    fn index(&self, (row, col): Coord2) -> &Self::Output {
        &self.cells[(row as usize, col as usize)]
    }
}
