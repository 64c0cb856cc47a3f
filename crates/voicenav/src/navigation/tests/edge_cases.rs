use super::*;
use crate::navigation::{describe_route, find_route};

#[test]
fn same_start_and_end_is_single_location() {
    let g = LocationGraph::campus().unwrap();
    let path = find_route(&g, "Library", "Library").unwrap();
    assert_eq!(names(&path), ["Library"]);
    assert_eq!(path.edge_count(), 0);
    assert_eq!(path.distance(), 0);
}

#[test]
fn same_location_with_different_case() {
    let g = LocationGraph::campus().unwrap();
    let path = find_route(&g, "hostel", "HOSTEL").unwrap();
    assert_eq!(names(&path), ["Hostel"]);
}

#[test]
fn single_location_renders_origin_only() {
    let g = LocationGraph::campus().unwrap();
    let path = find_route(&g, "Canteen", "Canteen").unwrap();
    let desc = describe_route(&path, &g).unwrap();
    assert!(desc.steps.is_empty());
    assert_eq!(desc.coordinates, [crate::navigation::Coord::ORIGIN]);
    assert_eq!(desc.labels, ["Canteen"]);
    assert_eq!(desc.full_text(), "You have arrived at your destination: Canteen");
}

#[test]
fn isolated_location_is_valid_but_unreachable() {
    let mut builder = LocationGraph::builder();
    builder.add_edge("A", "B", 5, TurnDirection::Left).unwrap();
    builder.add_location("Island").unwrap();
    let g = builder.build();
    assert!(g.contains("Island"));
    assert!(find_route(&g, "A", "Island").is_err());
    assert_eq!(names(&find_route(&g, "Island", "Island").unwrap()), ["Island"]);
}

#[test]
fn cycle_does_not_loop_forever() {
    let g = graph(&[
        ("A", "B", 1, "straight"),
        ("B", "A", 1, "straight"),
        ("B", "C", 1, "right"),
    ]);
    let path = find_route(&g, "A", "C").unwrap();
    assert_eq!(names(&path), ["A", "B", "C"]);
}

#[test]
fn unknown_direction_is_kept_verbatim() {
    let g = graph(&[("A", "B", 12, "sharp left")]);
    assert_eq!(turn(&g, "A", "B"), TurnDirection::Other("sharp left".to_string()));
}
