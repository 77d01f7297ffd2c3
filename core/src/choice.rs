use serde::{Deserialize, Serialize};

use crate::*;

/// Area of the board a choice restricts placement to.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum ChunkKind {
    /// One of the nine 3×3 blocks, numbered row-major.
    Cluster,
    Row,
    Column,
}

impl ChunkKind {
    pub const ALL: [ChunkKind; 3] = [Self::Cluster, Self::Row, Self::Column];
}

/// A tile kind offered together with the chunk it must be placed in.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Choice {
    pub kind: TileKind,
    pub chunk: ChunkKind,
    /// 1-based chunk number.
    pub position: Coord,
}

impl Choice {
    pub fn new(kind: TileKind, chunk: ChunkKind, position: Coord) -> Result<Self> {
        if !(1..=BOARD_SIZE).contains(&position) {
            return Err(GameError::OutOfBounds);
        }
        Ok(Self {
            kind,
            chunk,
            position,
        })
    }

    /// The nine cells of the chunk; empty when `position` is out of range.
    pub fn cells(&self) -> impl Iterator<Item = Coord2> + use<> {
        let index = if (1..=BOARD_SIZE).contains(&self.position) {
            Some(self.position - 1)
        } else {
            None
        };
        let chunk = self.chunk;

        index.into_iter().flat_map(move |index| {
            (0..BOARD_SIZE).map(move |i| match chunk {
                ChunkKind::Cluster => ((index / 3) * 3 + i / 3, (index % 3) * 3 + i % 3),
                ChunkKind::Row => (index, i),
                ChunkKind::Column => (i, index),
            })
        })
    }

    pub fn contains(&self, coords: Coord2) -> bool {
        self.cells().any(|cell| cell == coords)
    }

    /// Whether the chunk still has an empty cell on `grid`.
    pub fn has_room(&self, grid: &Grid) -> bool {
        self.cells().any(|cell| grid.is_empty_at(cell))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use alloc::vec::Vec;

    #[test]
    fn clusters_are_numbered_row_major() {
        let choice = Choice::new(TileKind::Forest, ChunkKind::Cluster, 6).unwrap();
        let cells: Vec<_> = choice.cells().collect();

        assert_eq!(cells.len(), 9);
        assert_eq!(cells[0], (3, 6));
        assert_eq!(cells[8], (5, 8));
        assert!(choice.contains((4, 7)));
        assert!(!choice.contains((4, 5)));
    }

    #[test]
    fn rows_and_columns_span_the_board() {
        let row = Choice::new(TileKind::Wave, ChunkKind::Row, 1).unwrap();
        let column = Choice::new(TileKind::Wave, ChunkKind::Column, 9).unwrap();

        assert!(row.cells().all(|(r, _)| r == 0));
        assert!(column.cells().all(|(_, c)| c == 8));
        assert_eq!(column.cells().count(), 9);
    }

    #[test]
    fn position_must_be_one_to_nine() {
        assert_eq!(
            Choice::new(TileKind::Ship, ChunkKind::Row, 0),
            Err(GameError::OutOfBounds)
        );
        assert_eq!(
            Choice::new(TileKind::Ship, ChunkKind::Row, 10),
            Err(GameError::OutOfBounds)
        );
    }

    #[test]
    fn full_chunk_has_no_room() {
        let mut grid = Grid::new();
        grid.place(&ChunkShape::row(), (2, 0), TileKind::Beach).unwrap();

        let choice = Choice::new(TileKind::House, ChunkKind::Row, 3).unwrap();
        assert!(!choice.has_room(&grid));
        assert!(Choice::new(TileKind::House, ChunkKind::Column, 1).unwrap().has_room(&grid));
    }
}
