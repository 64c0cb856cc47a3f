mod determinism;
mod edge_cases;
mod simple;

use super::graph::LocationGraph;
use super::types::{Path, TurnDirection};

/// Helper to build a graph from (from, to, distance, direction) rows.
fn graph(edges: &[(&str, &str, u32, &str)]) -> LocationGraph {
    LocationGraph::from_edges(
        edges
            .iter()
            .map(|&(from, to, distance, dir)| (from, to, distance, dir.parse().unwrap())),
    )
    .unwrap()
}

/// Location names of a path as string slices.
fn names(path: &Path) -> Vec<&str> {
    path.locations().iter().map(String::as_str).collect()
}

/// Minimum total distance over every simple directed path, by exhaustive search.
fn brute_force_distance(graph: &LocationGraph, start: &str, end: &str) -> Option<u64> {
    fn walk(
        graph: &LocationGraph,
        at: &str,
        end: &str,
        cost: u64,
        seen: &mut Vec<String>,
        best: &mut Option<u64>,
    ) {
        if at == end {
            *best = Some(best.map_or(cost, |b| b.min(cost)));
            return;
        }
        let next: Vec<_> = graph.edges().filter(|e| e.from == at).collect();
        for edge in next {
            if seen.contains(&edge.to) {
                continue;
            }
            seen.push(edge.to.clone());
            walk(graph, &edge.to, end, cost + u64::from(edge.distance), seen, best);
            seen.pop();
        }
    }

    let mut best = None;
    let mut seen = vec![start.to_string()];
    walk(graph, start, end, 0, &mut seen, &mut best);
    best
}

/// The (direction) turn used by an edge in the graph.
fn turn(graph: &LocationGraph, from: &str, to: &str) -> TurnDirection {
    graph.edge(from, to).unwrap().direction.clone()
}
