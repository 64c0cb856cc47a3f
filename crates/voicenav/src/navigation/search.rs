use std::cmp::Ordering;
use std::collections::{BinaryHeap, HashMap};

use log::{debug, trace};
use petgraph::graph::NodeIndex;
use petgraph::visit::EdgeRef;

use super::error::NavError;
use super::graph::LocationGraph;
use super::types::Path;

#[derive(Copy, Clone, Eq, PartialEq)]
struct State {
    cost: u64,
    hops: usize,
    node: NodeIndex,
}

// Min-heap on (cost, hops), node index keeps pops deterministic.
impl Ord for State {
    fn cmp(&self, other: &Self) -> Ordering {
        other
            .cost
            .cmp(&self.cost)
            .then(other.hops.cmp(&self.hops))
            .then(other.node.cmp(&self.node))
    }
}

impl PartialOrd for State {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

/// Best known way to reach a node.
#[derive(Copy, Clone, Debug)]
struct Label {
    cost: u64,
    hops: usize,
    parent: Option<NodeIndex>,
}

/// Find the shortest route from `start` to `end` by total distance.
///
/// Both names are resolved against the graph ignoring case. Among routes of
/// equal distance the one with fewer edges wins, and after that the one whose
/// sequence of location names sorts first.
///
/// # Errors
///
/// `InvalidLocation` if either endpoint is unknown, `NoPathExists` if `end`
/// cannot be reached from `start` along directed edges.
pub fn find_route(graph: &LocationGraph, start: &str, end: &str) -> Result<Path, NavError> {
    let source = graph
        .node(start)
        .ok_or_else(|| NavError::InvalidLocation(start.to_string()))?;
    let target = graph
        .node(end)
        .ok_or_else(|| NavError::InvalidLocation(end.to_string()))?;

    if source == target {
        return Ok(Path::new(vec![graph.name(source).to_string()], 0));
    }

    let labels = dijkstra(graph, source, target);

    let Some(label) = labels.get(&target) else {
        debug!(
            "{} is not reachable from {}",
            graph.name(target),
            graph.name(source)
        );
        return Err(NavError::NoPathExists {
            from: graph.name(source).to_string(),
            to: graph.name(target).to_string(),
        });
    };

    let locations = trace_back(&labels, target)
        .into_iter()
        .map(|idx| graph.name(idx).to_string())
        .collect();
    let path = Path::new(locations, label.cost);
    debug!("Route {path} ({} m)", path.distance());
    Ok(path)
}

fn dijkstra(
    graph: &LocationGraph,
    source: NodeIndex,
    target: NodeIndex,
) -> HashMap<NodeIndex, Label> {
    let inner = graph.inner();
    let mut labels: HashMap<NodeIndex, Label> = HashMap::with_capacity(inner.node_count());
    let mut heap = BinaryHeap::new();

    labels.insert(
        source,
        Label {
            cost: 0,
            hops: 0,
            parent: None,
        },
    );
    heap.push(State {
        cost: 0,
        hops: 0,
        node: source,
    });

    while let Some(State { cost, hops, node }) = heap.pop() {
        if node == target {
            break;
        }

        // Skip stale heap entries.
        if let Some(best) = labels.get(&node) {
            if (cost, hops) > (best.cost, best.hops) {
                continue;
            }
        }

        for edge in inner.edges(node) {
            let next = edge.target();
            let next_cost = cost + u64::from(edge.weight().distance);
            let next_hops = hops + 1;
            trace!(
                "Relax {} -> {} at {next_cost}",
                graph.name(node),
                graph.name(next)
            );

            let improves = match labels.get(&next) {
                None => true,
                Some(current) => match (next_cost, next_hops).cmp(&(current.cost, current.hops)) {
                    Ordering::Less => true,
                    Ordering::Greater => false,
                    Ordering::Equal => prefers(graph, &labels, node, current.parent),
                },
            };

            if improves {
                labels.insert(
                    next,
                    Label {
                        cost: next_cost,
                        hops: next_hops,
                        parent: Some(node),
                    },
                );
                heap.push(State {
                    cost: next_cost,
                    hops: next_hops,
                    node: next,
                });
            }
        }
    }

    labels
}

/// Whether reaching a node through `candidate` beats the current parent on
/// location-name order. Both prefixes have equal cost and length here.
fn prefers(
    graph: &LocationGraph,
    labels: &HashMap<NodeIndex, Label>,
    candidate: NodeIndex,
    current: Option<NodeIndex>,
) -> bool {
    let Some(current) = current else {
        return false;
    };
    let names = |idx| {
        trace_back(labels, idx)
            .into_iter()
            .map(|n| graph.name(n))
            .collect::<Vec<_>>()
    };
    names(candidate) < names(current)
}

fn trace_back(labels: &HashMap<NodeIndex, Label>, node: NodeIndex) -> Vec<NodeIndex> {
    let mut nodes = vec![node];
    let mut current = node;
    while let Some(parent) = labels.get(&current).and_then(|l| l.parent) {
        nodes.push(parent);
        current = parent;
    }
    nodes.reverse();
    nodes
}
