//! Campus route finding and direction rendering.
//!
//! The graph is built once and only read afterwards. [`find_route`] produces a
//! [`Path`], and [`describe_route`] turns it into spoken steps plus a schematic
//! layout for the route image.

pub mod directions;
pub mod error;
pub mod graph;
pub mod search;
pub mod types;

#[cfg(test)]
mod tests;

pub use directions::describe_route;
pub use error::NavError;
pub use graph::LocationGraph;
pub use search::find_route;
pub use types::{Coord, Path, RouteDescription};

/// Find the shortest route and describe it in one call.
pub fn plan_route(
    graph: &LocationGraph,
    start: &str,
    end: &str,
) -> Result<(Path, RouteDescription), NavError> {
    let path = find_route(graph, start, end)?;
    let description = describe_route(&path, graph)?;
    Ok((path, description))
}
