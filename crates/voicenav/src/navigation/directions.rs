use super::error::NavError;
use super::graph::LocationGraph;
use super::types::{Coord, DirectionStep, Path, RouteDescription, TurnDirection};

/// Step used for any direction without a fixed mapping.
pub const FALLBACK_STEP: (i32, i32) = (1, 0);

/// Unit displacement for a turn on the schematic layout.
///
/// Straight goes up, right goes right, left goes down. Anything else steps
/// right, so every value maps to a vector.
pub fn direction_vector(direction: &TurnDirection) -> (i32, i32) {
    match direction {
        TurnDirection::Straight => (0, 1),
        TurnDirection::Right => (1, 0),
        TurnDirection::Left => (0, -1),
        TurnDirection::Other(_) => FALLBACK_STEP,
    }
}

/// The sentence spoken for one edge.
pub fn step_sentence(from: &str, to: &str, direction: &TurnDirection, distance: u32) -> String {
    format!("From {from}, turn {direction} and move {distance} metres to reach {to}.")
}

/// The sentence spoken on arrival.
pub fn arrival_sentence(destination: &str) -> String {
    format!("You have arrived at your destination: {destination}")
}

/// Turn a path into spoken steps, layout coordinates and point labels.
///
/// Coordinates start at the origin and advance by [`direction_vector`] once per
/// edge, so there is always one more coordinate than steps.
///
/// # Errors
///
/// `MissingEdge` if two consecutive locations are not connected in `graph`.
pub fn describe_route(path: &Path, graph: &LocationGraph) -> Result<RouteDescription, NavError> {
    let mut steps = Vec::with_capacity(path.edge_count());
    let mut coordinates = Vec::with_capacity(path.edge_count() + 1);
    let mut labels = Vec::with_capacity(path.edge_count() + 1);

    let mut cursor = Coord::ORIGIN;
    coordinates.push(cursor);

    for (from, to) in path.legs() {
        let segment = graph.edge(from, to).ok_or_else(|| NavError::MissingEdge {
            from: from.to_string(),
            to: to.to_string(),
        })?;

        cursor = cursor.offset(direction_vector(&segment.direction));
        coordinates.push(cursor);
        labels.push(format!("{from}\n{}m", segment.distance));

        steps.push(DirectionStep {
            from: from.to_string(),
            to: to.to_string(),
            direction: segment.direction.clone(),
            distance: segment.distance,
            text: step_sentence(from, to, &segment.direction, segment.distance),
        });
    }
    labels.push(path.end().to_string());

    Ok(RouteDescription {
        steps,
        coordinates,
        labels,
        arrival: arrival_sentence(path.end()),
    })
}
