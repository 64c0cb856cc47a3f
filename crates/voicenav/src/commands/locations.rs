use anyhow::Result;
use colored::Colorize;

use crate::navigation::LocationGraph;

pub fn run() -> Result<()> {
    let graph = LocationGraph::campus()?;

    println!("{}", "Locations:".bold());
    for name in graph.locations() {
        println!("  {name}");
    }

    println!();
    println!("{}", "Paths:".bold());
    for edge in graph.edges() {
        println!(
            "  {} -> {} {}",
            edge.from,
            edge.to,
            format!("({} m, {})", edge.distance, edge.direction).dimmed()
        );
    }
    Ok(())
}
