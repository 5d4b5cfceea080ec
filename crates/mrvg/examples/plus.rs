//! Cross-shaped obstacle made of two overlapping bars. Their crossing
//! corners are buried or reflex and never become nodes of the graph.

use mrvg::{Graph, GraphParams, Rect};
use nalgebra::Point2;

#[cfg(not(feature = "tracing"))]
use log::{info, LevelFilter};
#[cfg(feature = "tracing")]
use tracing::info;

fn main() -> Result<(), Box<dyn std::error::Error>> {
    #[cfg(not(feature = "tracing"))]
    mrvg::init_with_level(LevelFilter::Info)?;
    #[cfg(feature = "tracing")]
    mrvg::core::init_tracing(false);

    let mut params = GraphParams::default();
    params.visibility.tangent_pruning = true;
    let mut graph = Graph::new(params);
    graph.extend([Rect::new(-5.0, -1.0, 5.0, 1.0), Rect::new(-1.0, -5.0, 1.0, 5.0)])?;

    let snapshot = graph.snapshot();
    info!(
        "{} active nodes, {} pruned corners, {} edges",
        snapshot.nodes.len(),
        snapshot.pruned.len(),
        snapshot.edges.len()
    );

    let Some(path) = graph.find(Point2::new(-2.0, -2.0), Point2::new(2.0, 2.0)) else {
        return Err("opposite arms of the cross should be connected".into());
    };
    for p in &path.points {
        println!("({:.1}, {:.1})", p.x, p.y);
    }
    println!("length {:.3}", path.length());

    println!("{}", serde_json::to_string_pretty(&graph.snapshot())?);
    Ok(())
}
