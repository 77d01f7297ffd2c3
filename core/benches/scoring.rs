use criterion::{Criterion, criterion_group, criterion_main};
use std::hint::black_box;
use tiny_islands_core::*;

fn full_board() -> (Grid, BorderGraph) {
    let mut grid = Grid::new();
    for (coords, kind) in iter_cells().zip(TileKind::ALL.iter().copied().cycle()) {
        grid.place(&ChunkShape::single(), coords, kind)
            .expect("cell should be empty");
    }

    let mut borders = BorderGraph::new(MAX_SEGMENTS);
    for (top_left, bottom_right) in [((1, 1), (8, 8)), ((3, 3), (6, 6)), ((4, 4), (5, 5))] {
        borders
            .draw_loop(&rectangle(top_left, bottom_right))
            .expect("nested loops should fit the budget");
    }

    (grid, borders)
}

fn rectangle(top_left: Vertex, bottom_right: Vertex) -> Vec<Vertex> {
    let (top, left) = top_left;
    let (bottom, right) = bottom_right;
    (left..right)
        .map(|col| (top, col))
        .chain((top..bottom).map(|row| (row, right)))
        .chain((left + 1..=right).rev().map(|col| (bottom, col)))
        .chain((top + 1..=bottom).rev().map(|row| (row, left)))
        .collect()
}

fn bench_scoring(c: &mut Criterion) {
    let (grid, borders) = full_board();

    c.bench_function("classify_regions", |b| {
        b.iter(|| classify_regions(black_box(&borders)))
    });

    let regions = classify_regions(&borders);
    c.bench_function("compute_score", |b| {
        b.iter(|| compute_score(black_box(&grid), black_box(&regions)))
    });
}

criterion_group!(benches, bench_scoring);
criterion_main!(benches);
