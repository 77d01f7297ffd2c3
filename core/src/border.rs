use alloc::vec::Vec;
use serde::{Deserialize, Serialize};

use crate::*;

/// Default number of segments a whole game may commit.
pub const DEFAULT_SEGMENT_BUDGET: CellCount = 24;

/// Shortest loop that encloses anything: the four sides of one cell.
pub const MIN_LOOP_SEGMENTS: usize = 4;

/// Undirected lattice edge, stored with the smaller endpoint first.
#[derive(Copy, Clone, Debug, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct Segment {
    from: Vertex,
    to: Vertex,
}

impl Segment {
    pub fn new(a: Vertex, b: Vertex) -> Option<Self> {
        if !is_lattice_adjacent(a, b) {
            return None;
        }
        let (from, to) = if a <= b { (a, b) } else { (b, a) };
        Some(Self { from, to })
    }

    pub const fn endpoints(self) -> (Vertex, Vertex) {
        (self.from, self.to)
    }

    /// Runs along a lattice column, separating two horizontally adjacent cells.
    pub const fn is_vertical(self) -> bool {
        self.from.1 == self.to.1
    }

    pub fn touches(self, vertex: Vertex) -> bool {
        self.from == vertex || self.to == vertex
    }
}

/// Outcome of a successful [`BorderGraph::extend_path`].
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum PathStep {
    Extended,
    Retracted,
    Closed { segments: CellCount },
}

impl PathStep {
    pub const fn is_closed(self) -> bool {
        matches!(self, Self::Closed { .. })
    }
}

/// Iterates the edges of a closed vertex cycle, including the one back to the start.
pub fn loop_segments(vertices: &[Vertex]) -> impl Iterator<Item = Segment> + '_ {
    vertices
        .iter()
        .zip(vertices.iter().cycle().skip(1))
        .filter_map(|(&a, &b)| Segment::new(a, b))
}

/// Committed border loops plus the single path currently being drawn.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct BorderGraph {
    budget: CellCount,
    loops: Vec<Vec<Vertex>>,
    path: Option<Vec<Vertex>>,
}

impl Default for BorderGraph {
    fn default() -> Self {
        Self::new(DEFAULT_SEGMENT_BUDGET)
    }
}

impl BorderGraph {
    pub fn new(budget: CellCount) -> Self {
        Self {
            budget,
            loops: Vec::new(),
            path: None,
        }
    }

    pub fn budget(&self) -> CellCount {
        self.budget
    }

    /// Closed loops in commit order, each listed without repeating its start vertex.
    pub fn loops(&self) -> &[Vec<Vertex>] {
        &self.loops
    }

    pub fn path(&self) -> Option<&[Vertex]> {
        self.path.as_deref()
    }

    pub fn is_drawing(&self) -> bool {
        self.path.is_some()
    }

    pub fn segment_count(&self) -> CellCount {
        self.loops
            .iter()
            .map(|vertices| vertices.len())
            .sum::<usize>()
            .try_into()
            .unwrap_or(CellCount::MAX)
    }

    pub fn remaining_budget(&self) -> CellCount {
        self.budget.saturating_sub(self.segment_count())
    }

    /// Number of edges in the open path, not counting the closing one.
    pub fn path_segment_count(&self) -> usize {
        self.path.as_ref().map_or(0, |path| path.len().saturating_sub(1))
    }

    pub fn segments(&self) -> impl Iterator<Item = Segment> + '_ {
        self.loops.iter().flat_map(|vertices| loop_segments(vertices))
    }

    pub fn has_segment(&self, a: Vertex, b: Vertex) -> bool {
        Segment::new(a, b).is_some_and(|segment| self.segments().any(|other| other == segment))
    }

    pub fn start_path(&mut self, vertex: Vertex) -> Result<()> {
        if self.path.is_some() {
            return Err(GameError::PathAlreadyOpen);
        }
        if !in_lattice(vertex) {
            return Err(GameError::OutOfBounds);
        }

        self.path = Some(alloc::vec![vertex]);
        Ok(())
    }

    pub fn extend_path(&mut self, vertex: Vertex) -> Result<PathStep> {
        let path = self.path.as_deref().ok_or(GameError::NoOpenPath)?;
        let (Some(&start), Some(&last)) = (path.first(), path.last()) else {
            return Err(GameError::NoOpenPath);
        };
        if !in_lattice(vertex) {
            return Err(GameError::OutOfBounds);
        }
        if !is_lattice_adjacent(last, vertex) {
            return Err(GameError::NotAdjacent);
        }

        let len = path.len();
        if len >= 2 && path[len - 2] == vertex {
            if let Some(path) = self.path.as_mut() {
                path.pop();
            }
            return Ok(PathStep::Retracted);
        }

        if self.has_segment(last, vertex) {
            return Err(GameError::SegmentTaken);
        }
        if len >= 2 && self.crosses_loop(path[len - 2], last, vertex) {
            return Err(GameError::CrossesLoop);
        }

        if vertex == start {
            if len < MIN_LOOP_SEGMENTS {
                return Err(GameError::PathCrossesItself);
            }
            if self.crosses_loop(last, start, path[1]) {
                return Err(GameError::CrossesLoop);
            }
            return self.close_path();
        }

        if path.contains(&vertex) {
            return Err(GameError::PathCrossesItself);
        }

        if let Some(path) = self.path.as_mut() {
            path.push(vertex);
        }
        Ok(PathStep::Extended)
    }

    /// Whether running `before -> via -> after` passes from one side of a committed loop to the other.
    fn crosses_loop(&self, before: Vertex, via: Vertex, after: Vertex) -> bool {
        // Loops never share edges, so two of them can only cross at a vertex both run straight through.
        is_straight(before, via, after)
            && self.loops.iter().any(|vertices| {
                let n = vertices.len();
                vertices
                    .iter()
                    .position(|&v| v == via)
                    .is_some_and(|i| is_straight(vertices[(i + n - 1) % n], via, vertices[(i + 1) % n]))
            })
    }

    fn close_path(&mut self) -> Result<PathStep> {
        let segments = self.path.as_ref().map_or(0, |path| path.len());
        let total = usize::from(self.segment_count()) + segments;
        if total > usize::from(self.budget) {
            log::warn!(
                "Rejected loop of {} segments, {} of {} already committed",
                segments,
                self.segment_count(),
                self.budget
            );
            return Err(GameError::LoopBudgetExceeded);
        }

        let Some(vertices) = self.path.take() else {
            return Err(GameError::NoOpenPath);
        };
        self.loops.push(vertices);
        log::debug!(
            "Committed loop #{} with {} segments, {} remaining",
            self.loops.len(),
            segments,
            self.remaining_budget()
        );

        Ok(PathStep::Closed {
            segments: segments.try_into().unwrap_or(CellCount::MAX),
        })
    }

    /// Discards the open path, returning it if there was one.
    pub fn cancel_path(&mut self) -> Option<Vec<Vertex>> {
        self.path.take()
    }

    /// Truncates the open path so that `vertex` becomes its last point.
    pub fn rewind_to(&mut self, vertex: Vertex) -> Result<()> {
        let path = self.path.as_mut().ok_or(GameError::NoOpenPath)?;
        let index = path
            .iter()
            .position(|&v| v == vertex)
            .ok_or(GameError::NotOnPath)?;
        path.truncate(index + 1);
        Ok(())
    }

    /// Draws and commits a whole loop; on any failure no path is left open.
    pub fn draw_loop(&mut self, vertices: &[Vertex]) -> Result<CellCount> {
        let (&start, rest) = vertices.split_first().ok_or(GameError::NoOpenPath)?;
        self.start_path(start)?;

        let result = rest
            .iter()
            .chain(core::iter::once(&start))
            .try_fold(PathStep::Extended, |_, &vertex| self.extend_path(vertex));

        match result {
            Ok(PathStep::Closed { segments }) => Ok(segments),
            Ok(_) => {
                self.cancel_path();
                Err(GameError::NotAdjacent)
            }
            Err(err) => {
                self.cancel_path();
                Err(err)
            }
        }
    }
}

impl BorderGraph {
    /// Checks loaded data by replaying every loop and the open path through the drawing rules.
    pub fn validate(&self) -> Result<()> {
        if !(MIN_LOOP_SEGMENTS as CellCount..=MAX_SEGMENTS).contains(&self.budget) {
            log::warn!("Border budget {} is out of range", self.budget);
            return Err(GameError::InvalidState);
        }

        let mut replay = Self::new(self.budget);
        for vertices in &self.loops {
            replay.draw_loop(vertices).map_err(|err| {
                log::warn!("Stored loop {:?} is invalid: {}", vertices, err);
                GameError::InvalidState
            })?;
        }

        if let Some(path) = &self.path {
            let (&start, rest) = path.split_first().ok_or(GameError::InvalidState)?;
            replay.start_path(start).map_err(|_| GameError::InvalidState)?;
            for &vertex in rest {
                if replay.extend_path(vertex) != Ok(PathStep::Extended) {
                    log::warn!("Stored path {:?} is invalid at {:?}", path, vertex);
                    return Err(GameError::InvalidState);
                }
            }
        }
        Ok(())
    }
}

fn is_straight(before: Vertex, via: Vertex, after: Vertex) -> bool {
    u16::from(before.0) + u16::from(after.0) == 2 * u16::from(via.0)
        && u16::from(before.1) + u16::from(after.1) == 2 * u16::from(via.1)
}

/// Clockwise loop around the rectangle spanned by two opposite lattice corners.
#[cfg(test)]
pub(crate) fn rectangle(top_left: Vertex, bottom_right: Vertex) -> Vec<Vertex> {
    let (top, left) = top_left;
    let (bottom, right) = bottom_right;
    let mut vertices = Vec::new();
    vertices.extend((left..right).map(|col| (top, col)));
    vertices.extend((top..bottom).map(|row| (row, right)));
    vertices.extend((left + 1..=right).rev().map(|col| (bottom, col)));
    vertices.extend((top + 1..=bottom).rev().map(|row| (row, left)));
    vertices
}

#[cfg(test)]
mod tests {
    use super::*;
    use alloc::vec;

    fn open(vertices: &[Vertex]) -> BorderGraph {
        let mut graph = BorderGraph::default();
        graph.start_path(vertices[0]).unwrap();
        for &v in &vertices[1..] {
            assert_eq!(graph.extend_path(v), Ok(PathStep::Extended));
        }
        graph
    }

    #[test]
    fn rectangle_helper_walks_the_perimeter() {
        assert_eq!(rectangle((0, 0), (1, 1)), vec![(0, 0), (0, 1), (1, 1), (1, 0)]);
        assert_eq!(rectangle((2, 2), (5, 4)).len(), 10);
    }

    #[test]
    fn stepping_back_undoes_the_last_edge() {
        let mut graph = open(&[(3, 3), (3, 4), (4, 4)]);
        let before = graph.path().unwrap().to_vec();

        assert_eq!(graph.extend_path((4, 5)), Ok(PathStep::Extended));
        assert_eq!(graph.extend_path((4, 4)), Ok(PathStep::Retracted));

        assert_eq!(graph.path().unwrap(), before.as_slice());
    }

    #[test]
    fn repeated_undo_stops_at_the_start_vertex() {
        let mut graph = open(&[(0, 0), (0, 1), (0, 2)]);

        assert_eq!(graph.extend_path((0, 1)), Ok(PathStep::Retracted));
        assert_eq!(graph.extend_path((0, 0)), Ok(PathStep::Retracted));
        assert_eq!(graph.path().unwrap(), &[(0, 0)]);
        assert_eq!(graph.extend_path((1, 0)), Ok(PathStep::Extended));
    }

    #[test]
    fn closing_a_unit_square_commits_four_segments() {
        let mut graph = open(&[(2, 2), (2, 3), (3, 3), (3, 2)]);

        assert_eq!(graph.extend_path((2, 2)), Ok(PathStep::Closed { segments: 4 }));
        assert!(!graph.is_drawing());
        assert_eq!(graph.segment_count(), 4);
        assert_eq!(graph.remaining_budget(), 20);
        assert!(graph.has_segment((3, 3), (3, 2)));
        assert!(graph.has_segment((2, 2), (3, 2)));
        assert!(!graph.has_segment((2, 2), (2, 1)));
    }

    #[test]
    fn rejects_non_adjacent_and_out_of_lattice_vertices() {
        let mut graph = open(&[(9, 8)]);

        assert_eq!(graph.extend_path((8, 7)), Err(GameError::NotAdjacent));
        assert_eq!(graph.extend_path((9, 10)), Err(GameError::OutOfBounds));
        assert_eq!(graph.extend_path((9, 9)), Ok(PathStep::Extended));
    }

    #[test]
    fn second_path_cannot_start_while_one_is_open() {
        let mut graph = open(&[(1, 1)]);
        assert_eq!(graph.start_path((5, 5)), Err(GameError::PathAlreadyOpen));
        assert_eq!(graph.path(), Some(&[(1, 1)][..]));
    }

    #[test]
    fn extending_without_a_path_fails() {
        let mut graph = BorderGraph::default();
        assert_eq!(graph.extend_path((0, 1)), Err(GameError::NoOpenPath));
        assert_eq!(graph.rewind_to((0, 1)), Err(GameError::NoOpenPath));
    }

    #[test]
    fn committed_segments_cannot_be_reused() {
        let mut graph = BorderGraph::default();
        graph.draw_loop(&rectangle((0, 0), (1, 1))).unwrap();

        graph.start_path((0, 1)).unwrap();
        assert_eq!(graph.extend_path((1, 1)), Err(GameError::SegmentTaken));
        assert_eq!(graph.extend_path((0, 2)), Ok(PathStep::Extended));
    }

    #[test]
    fn path_may_touch_a_loop_at_a_vertex() {
        let mut graph = BorderGraph::default();
        graph.draw_loop(&rectangle((0, 0), (1, 1))).unwrap();

        assert_eq!(graph.draw_loop(&rectangle((1, 1), (2, 2))), Ok(4));
        assert_eq!(graph.loops().len(), 2);
    }

    #[test]
    fn path_cannot_cross_a_committed_loop() {
        let mut graph = BorderGraph::default();
        graph.draw_loop(&rectangle((2, 2), (5, 5))).unwrap();

        assert_eq!(
            graph.draw_loop(&rectangle((1, 3), (6, 4))),
            Err(GameError::CrossesLoop)
        );
        assert_eq!(graph.loops().len(), 1);
        assert!(!graph.is_drawing());

        graph.start_path((1, 4)).unwrap();
        graph.extend_path((2, 4)).unwrap();
        assert_eq!(graph.extend_path((3, 4)), Err(GameError::CrossesLoop));
        assert_eq!(graph.path().unwrap(), &[(1, 4), (2, 4)]);
    }

    #[test]
    fn path_may_turn_at_a_loop_corner() {
        let mut graph = BorderGraph::default();
        graph.draw_loop(&rectangle((2, 2), (5, 5))).unwrap();

        graph.start_path((1, 2)).unwrap();
        assert_eq!(graph.extend_path((2, 2)), Ok(PathStep::Extended));
        assert_eq!(graph.extend_path((2, 1)), Ok(PathStep::Extended));
    }

    #[test]
    fn empty_stored_path_is_an_error_not_a_panic() {
        let mut graph = BorderGraph {
            path: Some(Vec::new()),
            ..BorderGraph::default()
        };

        assert_eq!(graph.path_segment_count(), 0);
        assert_eq!(graph.extend_path((0, 1)), Err(GameError::NoOpenPath));
        assert_eq!(graph.validate(), Err(GameError::InvalidState));
    }

    #[test]
    fn validate_accepts_a_drawn_graph() {
        let mut graph = BorderGraph::default();
        graph.draw_loop(&rectangle((0, 0), (2, 2))).unwrap();
        graph.draw_loop(&rectangle((2, 2), (3, 3))).unwrap();
        graph.start_path((5, 5)).unwrap();
        graph.extend_path((5, 6)).unwrap();

        assert_eq!(graph.validate(), Ok(()));
        assert_eq!(BorderGraph::default().validate(), Ok(()));
    }

    #[test]
    fn validate_rejects_malformed_loops() {
        let corrupt = [
            BorderGraph {
                path: Some(vec![(0, 0), (0, 2)]),
                ..BorderGraph::default()
            },
            BorderGraph {
                loops: vec![rectangle((2, 2), (5, 5)), rectangle((1, 3), (6, 4))],
                ..BorderGraph::new(64)
            },
            BorderGraph {
                loops: vec![rectangle((0, 0), (4, 4))],
                ..BorderGraph::new(8)
            },
            BorderGraph {
                loops: vec![rectangle((8, 8), (11, 11))],
                ..BorderGraph::default()
            },
            BorderGraph {
                loops: vec![vec![(0, 0), (0, 1)]],
                ..BorderGraph::default()
            },
            BorderGraph::new(2),
        ];

        for graph in corrupt {
            assert_eq!(graph.validate(), Err(GameError::InvalidState));
        }
    }

    #[test]
    fn path_cannot_revisit_its_own_vertices() {
        let mut graph = open(&[(0, 0), (0, 1), (0, 2), (1, 2), (1, 1)]);
        assert_eq!(graph.extend_path((0, 1)), Err(GameError::PathCrossesItself));
        assert_eq!(graph.path_segment_count(), 4);
    }

    #[test]
    fn budget_overflow_keeps_the_path_open() {
        let mut graph = BorderGraph::default();
        graph.draw_loop(&rectangle((0, 0), (3, 3))).unwrap();
        graph.draw_loop(&rectangle((5, 5), (7, 8))).unwrap();
        assert_eq!(graph.segment_count(), 22);

        let mut path_graph = graph.clone();
        let square = rectangle((4, 0), (5, 1));
        path_graph.start_path(square[0]).unwrap();
        for &v in &square[1..] {
            path_graph.extend_path(v).unwrap();
        }
        let open_path = path_graph.path().unwrap().to_vec();

        assert_eq!(
            path_graph.extend_path(square[0]),
            Err(GameError::LoopBudgetExceeded)
        );
        assert_eq!(path_graph.segment_count(), 22);
        assert_eq!(path_graph.path().unwrap(), open_path.as_slice());

        assert_eq!(graph.draw_loop(&square), Err(GameError::LoopBudgetExceeded));
        assert!(!graph.is_drawing());
    }

    #[test]
    fn rewind_truncates_to_an_earlier_vertex() {
        let mut graph = open(&[(4, 4), (4, 5), (5, 5), (5, 6), (6, 6)]);

        graph.rewind_to((4, 5)).unwrap();
        assert_eq!(graph.path().unwrap(), &[(4, 4), (4, 5)]);
        assert_eq!(graph.rewind_to((8, 8)), Err(GameError::NotOnPath));
    }

    #[test]
    fn cancel_discards_without_committing() {
        let mut graph = open(&[(0, 0), (0, 1), (1, 1), (1, 0)]);

        assert_eq!(graph.cancel_path().map(|path| path.len()), Some(4));
        assert_eq!(graph.segment_count(), 0);
        assert!(graph.loops().is_empty());
    }
}
