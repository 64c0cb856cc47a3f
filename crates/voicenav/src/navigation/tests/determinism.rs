use super::*;
use crate::navigation::{find_route, plan_route};

/// Run a query multiple times and assert identical output.
fn assert_deterministic(g: &LocationGraph, start: &str, end: &str, iterations: usize) {
    let reference = find_route(g, start, end);
    for i in 1..iterations {
        assert_eq!(
            find_route(g, start, end),
            reference,
            "Non-deterministic result on iteration {i}"
        );
    }
}

#[test]
fn campus_tie_is_stable() {
    assert_deterministic(&LocationGraph::campus().unwrap(), "Entrance", "Hostel", 100);
}

#[test]
fn rebuilt_graph_gives_same_route() {
    let first = find_route(&LocationGraph::campus().unwrap(), "Entrance", "Hostel").unwrap();
    for _ in 0..20 {
        let again = find_route(&LocationGraph::campus().unwrap(), "Entrance", "Hostel").unwrap();
        assert_eq!(again, first);
    }
}

#[test]
fn equal_length_ties_break_by_name() {
    // Both A-B-D and A-C-D cost 2 with two edges. B sorts before C.
    let g = graph(&[
        ("A", "C", 1, "left"),
        ("C", "D", 1, "right"),
        ("A", "B", 1, "right"),
        ("B", "D", 1, "left"),
    ]);
    let path = find_route(&g, "A", "D").unwrap();
    assert_eq!(names(&path), ["A", "B", "D"]);
    assert_deterministic(&g, "A", "D", 50);
}

#[test]
fn name_tie_break_ignores_insertion_order() {
    let forward = graph(&[
        ("A", "B", 1, "right"),
        ("B", "D", 1, "left"),
        ("A", "C", 1, "left"),
        ("C", "D", 1, "right"),
    ]);
    let reverse = graph(&[
        ("A", "C", 1, "left"),
        ("C", "D", 1, "right"),
        ("A", "B", 1, "right"),
        ("B", "D", 1, "left"),
    ]);
    assert_eq!(
        find_route(&forward, "A", "D").unwrap(),
        find_route(&reverse, "A", "D").unwrap()
    );
}

#[test]
fn fewer_edges_win_over_name_order() {
    // A-D direct costs the same as A-B-D; the direct edge wins.
    let g = graph(&[
        ("A", "B", 5, "straight"),
        ("B", "D", 5, "straight"),
        ("A", "D", 10, "left"),
    ]);
    let path = find_route(&g, "A", "D").unwrap();
    assert_eq!(names(&path), ["A", "D"]);
}

#[test]
fn deep_tie_prefers_smaller_prefix() {
    // Two three-edge routes of equal cost diverge at the second hop.
    let g = graph(&[
        ("S", "M", 1, "straight"),
        ("M", "Y", 1, "left"),
        ("M", "X", 1, "right"),
        ("Y", "T", 1, "straight"),
        ("X", "T", 1, "straight"),
    ]);
    let (path, desc) = plan_route(&g, "S", "T").unwrap();
    assert_eq!(names(&path), ["S", "M", "X", "T"]);
    assert_eq!(desc.steps.len(), 3);
}
