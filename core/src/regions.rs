//! Terrain classification of the board.
//!
//! Committed border loops cut the board into regions of cells that can reach
//! each other without crossing a segment. A region's depth is the number of
//! loops enclosing it, tested per loop with an even/odd ray crossing from the
//! centre of one of its cells; odd depths are islands, even non-zero depths
//! are lakes and depth zero is open sea.

use alloc::collections::{BTreeSet, VecDeque};
use alloc::vec::Vec;
use ndarray::Array2;
use serde::{Deserialize, Serialize};

use crate::*;

pub type RegionId = u8;

/// Classification of a single cell.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct RegionInfo {
    pub id: RegionId,
    pub depth: u8,
    pub is_land: bool,
}

impl RegionInfo {
    pub const fn terrain(self) -> Terrain {
        Terrain::from_depth(self.depth)
    }
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Region {
    pub id: RegionId,
    pub depth: u8,
    pub terrain: Terrain,
    pub size: CellCount,
    /// First cell of the region in row-major order.
    pub anchor: Coord2,
}

impl Region {
    pub fn info(&self) -> RegionInfo {
        RegionInfo {
            id: self.id,
            depth: self.depth,
            is_land: self.terrain.is_land(),
        }
    }
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct RegionMap {
    labels: Array2<RegionId>,
    regions: Vec<Region>,
}

/// Labels every cell of the board from the committed loops; an open path is ignored.
pub fn classify_regions(borders: &BorderGraph) -> RegionMap {
    for vertices in borders.loops() {
        let well_formed = vertices.len() >= MIN_LOOP_SEGMENTS
            && loop_segments(vertices).count() == vertices.len();
        if !well_formed {
            log::error!("Malformed border loop {:?}", vertices);
        }
        debug_assert!(well_formed, "border loops must be closed lattice cycles");
    }

    let walls: BTreeSet<Segment> = borders.segments().collect();
    let mut labels: Array2<Option<RegionId>> =
        Array2::from_elem((BOARD_SIZE, BOARD_SIZE).to_nd_index(), None);
    let mut regions = Vec::new();

    for anchor in iter_cells() {
        if labels[anchor.to_nd_index()].is_some() {
            continue;
        }

        let id: RegionId = regions.len().try_into().unwrap_or(RegionId::MAX);
        labels[anchor.to_nd_index()] = Some(id);
        let mut size: CellCount = 0;
        let mut to_visit = VecDeque::from([anchor]);

        while let Some(coords) = to_visit.pop_front() {
            size += 1;
            for next in NeighborIter::orthogonal(coords) {
                if labels[next.to_nd_index()].is_some() {
                    continue;
                }
                if separating_segment(coords, next).is_some_and(|wall| walls.contains(&wall)) {
                    continue;
                }
                labels[next.to_nd_index()] = Some(id);
                to_visit.push_back(next);
            }
        }

        let depth = enclosure_depth(borders.loops(), anchor);
        regions.push(Region {
            id,
            depth,
            terrain: Terrain::from_depth(depth),
            size,
            anchor,
        });
    }

    log::debug!(
        "Classified {} regions from {} loops",
        regions.len(),
        borders.loops().len()
    );

    RegionMap {
        labels: labels.mapv(|label| label.unwrap_or_default()),
        regions,
    }
}

/// The segment lying between two orthogonally adjacent cells.
fn separating_segment(a: Coord2, b: Coord2) -> Option<Segment> {
    let (low, high) = if a <= b { (a, b) } else { (b, a) };
    if low.0 == high.0 {
        Segment::new((low.0, high.1), (low.0 + 1, high.1))
    } else {
        Segment::new((high.0, low.1), (high.0, low.1 + 1))
    }
}

/// Counts loops containing the centre of `cell`.
fn enclosure_depth(loops: &[Vec<Vertex>], cell: Coord2) -> u8 {
    loops
        .iter()
        .filter(|vertices| encloses(vertices, cell))
        .count()
        .try_into()
        .unwrap_or(u8::MAX)
}

/// Casts a ray from the cell centre towards increasing columns and counts crossed vertical edges.
fn encloses(vertices: &[Vertex], (row, col): Coord2) -> bool {
    loop_segments(vertices)
        .filter(|segment| {
            let ((from_row, from_col), _) = segment.endpoints();
            segment.is_vertical() && from_row == row && from_col > col
        })
        .count()
        % 2
        == 1
}

impl RegionMap {
    /// Classification of `coords`; panics when it lies outside the board.
    pub fn region_of(&self, coords: Coord2) -> RegionInfo {
        self.regions[usize::from(self.labels[coords.to_nd_index()])].info()
    }

    pub fn get(&self, coords: Coord2) -> Option<RegionInfo> {
        in_board(coords).then(|| self.region_of(coords))
    }

    pub fn is_land(&self, coords: Coord2) -> bool {
        self.region_of(coords).is_land
    }

    pub fn terrain(&self, coords: Coord2) -> Terrain {
        self.region_of(coords).terrain()
    }

    pub fn same_region(&self, a: Coord2, b: Coord2) -> bool {
        self.labels[a.to_nd_index()] == self.labels[b.to_nd_index()]
    }

    pub fn regions(&self) -> &[Region] {
        &self.regions
    }

    pub fn region(&self, id: RegionId) -> Option<&Region> {
        self.regions.get(usize::from(id))
    }

    pub fn cells_in(&self, id: RegionId) -> impl Iterator<Item = Coord2> + '_ {
        iter_cells().filter(move |&coords| self.labels[coords.to_nd_index()] == id)
    }

    pub fn land_cells(&self) -> impl Iterator<Item = Coord2> + '_ {
        iter_cells().filter(|&coords| self.is_land(coords))
    }

    pub fn island_count(&self) -> usize {
        self.regions
            .iter()
            .filter(|region| region.terrain.is_land())
            .count()
    }
}
