use alloc::collections::{BTreeMap, BTreeSet, VecDeque};
use alloc::vec::Vec;
use serde::{Deserialize, Serialize};

use crate::*;

pub type Points = i32;

/// Cost of a tile standing on the terrain it does not prefer.
pub const TERRAIN_PENALTY: Points = 5;

#[derive(Copy, Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct TileScore {
    pub coords: Coord2,
    pub kind: TileKind,
    /// Points from the tile's own rule, before any terrain penalty.
    pub points: Points,
    pub misplaced: bool,
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct ScoreBreakdown {
    pub by_kind: BTreeMap<TileKind, Points>,
    pub tiles: Vec<TileScore>,
    /// Sum of all terrain penalties, as a non-negative amount.
    pub terrain_penalty: Points,
    pub total: Points,
}

impl ScoreBreakdown {
    pub fn points_for(&self, kind: TileKind) -> Points {
        self.by_kind.get(&kind).copied().unwrap_or(0)
    }

    pub fn tile_at(&self, coords: Coord2) -> Option<&TileScore> {
        self.tiles.iter().find(|tile| tile.coords == coords)
    }

    pub fn misplaced_count(&self) -> usize {
        self.tiles.iter().filter(|tile| tile.misplaced).count()
    }
}

/// Scores every placed tile against the board's terrain.
pub fn compute_score(grid: &Grid, regions: &RegionMap) -> ScoreBreakdown {
    let forests = forest_points(grid);
    let mut by_kind: BTreeMap<TileKind, Points> =
        TileKind::ALL.iter().map(|&kind| (kind, 0)).collect();
    let mut tiles = Vec::new();
    let mut terrain_penalty = 0;

    for (coords, kind) in grid.tiles() {
        use TileKind::*;

        let points = match kind {
            Ship => ship_points(grid, regions, coords),
            Wave => wave_points(grid, coords),
            Beach => beach_points(regions, coords),
            House => house_points(grid, coords),
            Church => church_points(grid, regions, coords),
            Forest => forests.get(&coords).copied().unwrap_or(0),
            Mountain => mountain_points(grid, coords),
        };
        let misplaced = !kind.likes(regions.is_land(coords));
        if misplaced {
            terrain_penalty += TERRAIN_PENALTY;
        }

        *by_kind.entry(kind).or_insert(0) += points;
        tiles.push(TileScore {
            coords,
            kind,
            points,
            misplaced,
        });
    }

    let total = by_kind.values().sum::<Points>() - terrain_penalty;
    ScoreBreakdown {
        by_kind,
        tiles,
        terrain_penalty,
        total,
    }
}

/// A Ship's own cell counts when it is land, so a Ship on an island scores 0.
fn ship_points(grid: &Grid, regions: &RegionMap, coords: Coord2) -> Points {
    iter_cells()
        .filter(|&other| {
            regions.is_land(other) || (other != coords && grid[other] == Some(TileKind::Ship))
        })
        .map(|other| Points::from(chebyshev(coords, other)))
        .min()
        .unwrap_or(0)
}

fn wave_points(grid: &Grid, coords: Coord2) -> Points {
    let shares_line = grid
        .tiles_of(TileKind::Wave)
        .filter(|&other| other != coords)
        .any(|(row, col)| row == coords.0 || col == coords.1);
    let has_nearby = grid
        .nearby_tiles(coords)
        .any(|(_, kind)| kind == TileKind::Wave);

    if shares_line || has_nearby { 0 } else { 2 }
}

fn beach_points(regions: &RegionMap, coords: Coord2) -> Points {
    count(NeighborIter::orthogonal(coords).filter(|&side| regions.is_land(side)))
}

fn house_points(grid: &Grid, coords: Coord2) -> Points {
    let kinds: BTreeSet<TileKind> = grid
        .nearby_tiles(coords)
        .map(|(_, kind)| kind)
        .filter(|&kind| kind != TileKind::House)
        .collect();
    count(kinds.into_iter())
}

fn church_points(grid: &Grid, regions: &RegionMap, coords: Coord2) -> Points {
    let on_island = regions.is_land(coords);
    let same_island = |other: Coord2| on_island && regions.same_region(coords, other);

    if grid
        .tiles_of(TileKind::Church)
        .any(|other| other != coords && same_island(other))
    {
        return 0;
    }

    let nearby: BTreeSet<Coord2> = grid
        .nearby_tiles(coords)
        .filter(|&(_, kind)| kind == TileKind::House)
        .map(|(pos, _)| pos)
        .collect();
    let elsewhere = grid
        .tiles_of(TileKind::House)
        .filter(|house| !nearby.contains(house))
        .filter(|&house| same_island(house));

    2 * count(nearby.iter()) + count(elsewhere)
}

fn mountain_points(grid: &Grid, coords: Coord2) -> Points {
    2 * count(
        grid.nearby_tiles(coords)
            .filter(|&(_, kind)| kind == TileKind::Forest),
    )
}

/// Splits each forest group's `2 * size - 2` over its tiles; the group's first tile carries the penalty.
fn forest_points(grid: &Grid) -> BTreeMap<Coord2, Points> {
    let mut points = BTreeMap::new();

    for seed in grid.tiles_of(TileKind::Forest) {
        if points.contains_key(&seed) {
            continue;
        }

        let group = forest_group(grid, seed);
        log::trace!("Forest group at {:?} with {} tiles", seed, group.len());
        for &coords in &group {
            points.insert(coords, 2);
        }
        points.insert(seed, 0);
    }

    points
}

fn forest_group(grid: &Grid, seed: Coord2) -> BTreeSet<Coord2> {
    let mut group = BTreeSet::from([seed]);
    let mut to_visit = VecDeque::from([seed]);

    while let Some(coords) = to_visit.pop_front() {
        for (next, kind) in grid.nearby_tiles(coords) {
            if kind == TileKind::Forest && group.insert(next) {
                to_visit.push_back(next);
            }
        }
    }

    group
}

fn count<T>(iter: impl Iterator<Item = T>) -> Points {
    iter.count().try_into().unwrap_or(Points::MAX)
}
