//! Two rectangles straddling the diagonal from (0, 0) to (10, 10).

use mrvg::Graph;
use nalgebra::Point2;

#[cfg(not(feature = "tracing"))]
use log::{info, LevelFilter};
#[cfg(feature = "tracing")]
use tracing::info;

fn main() -> Result<(), Box<dyn std::error::Error>> {
    #[cfg(not(feature = "tracing"))]
    mrvg::init_with_level(LevelFilter::Debug)?;
    #[cfg(feature = "tracing")]
    mrvg::core::init_tracing(false);

    let mut graph = Graph::default();
    graph.add_obstacle(1.0, 2.0, 4.0, 5.0)?;
    graph.add_obstacle(0.0, 7.0, 9.0, 9.0)?;

    let start = Point2::new(0.0, 0.0);
    let goal = Point2::new(10.0, 10.0);
    let Some(path) = graph.find(start, goal) else {
        return Err("no path between the corners of the scene".into());
    };

    info!(
        "{} nodes, {} edges",
        graph.nodes().count(),
        graph.edges().count()
    );
    for p in &path.points {
        println!("({:.1}, {:.1})", p.x, p.y);
    }
    println!(
        "length {:.3} (straight line {:.3})",
        path.length(),
        nalgebra::distance(&start, &goal)
    );
    Ok(())
}
