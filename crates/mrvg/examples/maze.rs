//! Builds an ASCII maze one unit cell at a time and solves it from `A` to
//! `B`. Each insertion is timed to show that updates stay local.

use std::time::Instant;

use mrvg::Graph;
use nalgebra::Point2;

#[cfg(not(feature = "tracing"))]
use log::{info, LevelFilter};
#[cfg(feature = "tracing")]
use tracing::info;

const MAZE: &str = include_str!("../testdata/maze.txt");

fn main() -> Result<(), Box<dyn std::error::Error>> {
    #[cfg(not(feature = "tracing"))]
    mrvg::init_with_level(LevelFilter::Info)?;
    #[cfg(feature = "tracing")]
    mrvg::core::init_tracing(false);

    let mut graph = Graph::default();
    let mut start = None;
    let mut goal = None;
    let mut slowest = 0.0_f64;

    // First text row is the top of the maze.
    for (y, row) in MAZE.lines().rev().enumerate() {
        for (x, cell) in row.chars().enumerate() {
            let (x, y) = (x as f64, y as f64);
            match cell {
                '#' => {
                    let before = Instant::now();
                    graph.add_obstacle(x - 0.5, y - 0.5, x + 0.5, y + 0.5)?;
                    let ms = before.elapsed().as_secs_f64() * 1e3;
                    slowest = slowest.max(ms);
                    info!("added ({x}, {y}) in {ms:.2}ms");
                }
                'A' => start = Some(Point2::new(x, y)),
                'B' => goal = Some(Point2::new(x, y)),
                _ => {}
            }
        }
    }

    let (Some(start), Some(goal)) = (start, goal) else {
        return Err("maze needs an A and a B".into());
    };
    info!(
        "{} walls, {} nodes, {} edges, slowest insert {slowest:.2}ms",
        graph.obstacle_count(),
        graph.nodes().count(),
        graph.edges().count()
    );

    let before = Instant::now();
    let Some(path) = graph.find(start, goal) else {
        return Err("maze has no solution".into());
    };
    info!(
        "solved in {:.2}ms: {} turns, length {:.3}",
        before.elapsed().as_secs_f64() * 1e3,
        path.points.len().saturating_sub(2),
        path.length()
    );
    for p in &path.points {
        println!("({}, {})", p.x, p.y);
    }
    Ok(())
}
