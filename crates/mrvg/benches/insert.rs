//! Incremental insertion cost.

use criterion::{black_box, criterion_group, criterion_main, BatchSize, Criterion};
use mrvg::{Graph, Rect};
use nalgebra::Point2;

const MAZE: &str = include_str!("../testdata/maze.txt");

/// 5x5 lattice of small squares, half a unit wide, one unit apart.
fn lattice() -> Graph {
    let mut graph = Graph::default();
    for x in 0..5 {
        for y in 0..5 {
            let (x, y) = (x as f64, y as f64);
            graph
                .add_obstacle(x - 0.25, y - 0.25, x + 0.25, y + 0.25)
                .expect("lattice cell");
        }
    }
    graph
}

fn maze_cells() -> Vec<Rect> {
    MAZE.lines()
        .rev()
        .enumerate()
        .flat_map(|(y, row)| {
            row.char_indices()
                .filter(|(_, c)| *c == '#')
                .map(move |(x, _)| {
                    let (x, y) = (x as f64, y as f64);
                    Rect::new(x - 0.5, y - 0.5, x + 0.5, y + 0.5)
                })
        })
        .collect()
}

fn bench_insert(c: &mut Criterion) {
    c.bench_function("insert_next_to_lattice", |b| {
        b.iter_batched(
            lattice,
            |mut graph| {
                graph
                    .add_obstacle_rect(black_box(Rect::new(9.0, 9.0, 10.0, 10.0)))
                    .expect("valid rect");
                graph
            },
            BatchSize::SmallInput,
        )
    });

    let cells = maze_cells();
    c.bench_function("build_maze", |b| {
        b.iter(|| {
            let mut graph = Graph::default();
            graph.extend(black_box(cells.iter().copied())).expect("maze cells");
            graph
        })
    });

    let mut graph = Graph::default();
    graph.extend(cells.iter().copied()).expect("maze cells");
    let pathfinder = graph.pathfinder();
    c.bench_function("solve_maze", |b| {
        b.iter(|| pathfinder.find(black_box(Point2::new(1.0, 19.0)), Point2::new(19.0, 1.0)))
    });
}

criterion_group!(benches, bench_insert);
criterion_main!(benches);
