use super::*;
use crate::navigation::find_route;

#[test]
fn single_edge_route() {
    let g = LocationGraph::campus().unwrap();
    let path = find_route(&g, "Entrance", "CSE Dept").unwrap();
    assert_eq!(names(&path), ["Entrance", "CSE Dept"]);
    assert_eq!(path.distance(), 50);
    assert_eq!(path.edge_count(), 1);
}

#[test]
fn entrance_to_library() {
    let g = LocationGraph::campus().unwrap();
    let path = find_route(&g, "Entrance", "Library").unwrap();
    assert_eq!(names(&path), ["Entrance", "CSE Dept", "Library"]);
    assert_eq!(path.distance(), 150);
}

#[test]
fn entrance_to_auditorium_goes_through_ece() {
    let g = LocationGraph::campus().unwrap();
    let path = find_route(&g, "Entrance", "Auditorium").unwrap();
    assert_eq!(
        names(&path),
        ["Entrance", "CSE Dept", "ECE Dept", "Auditorium"]
    );
    assert_eq!(path.distance(), 200);
}

#[test]
fn entrance_to_hostel_prefers_fewer_edges_on_tie() {
    // Via Library: 50 + 100 + 150 = 300. Via Canteen: 50 + 100 + 80 + 70 = 300.
    let g = LocationGraph::campus().unwrap();
    let path = find_route(&g, "Entrance", "Hostel").unwrap();
    assert_eq!(path.distance(), 300);
    assert_eq!(names(&path), ["Entrance", "CSE Dept", "Library", "Hostel"]);
}

#[test]
fn input_names_resolve_to_canonical_spelling() {
    let g = LocationGraph::campus().unwrap();
    let path = find_route(&g, "entrance", "cse dept").unwrap();
    assert_eq!(path.start(), "Entrance");
    assert_eq!(path.end(), "CSE Dept");
}

#[test]
fn cheaper_detour_beats_direct_edge() {
    let g = graph(&[
        ("A", "D", 100, "straight"),
        ("A", "B", 10, "left"),
        ("B", "C", 10, "right"),
        ("C", "D", 10, "straight"),
    ]);
    let path = find_route(&g, "A", "D").unwrap();
    assert_eq!(names(&path), ["A", "B", "C", "D"]);
    assert_eq!(path.distance(), 30);
}

#[test]
fn matches_brute_force_on_campus() {
    let g = LocationGraph::campus().unwrap();
    let locations: Vec<String> = g.locations().map(str::to_string).collect();
    for start in &locations {
        for end in &locations {
            let expected = brute_force_distance(&g, start, end);
            match find_route(&g, start, end) {
                Ok(path) => assert_eq!(Some(path.distance()), expected, "{start} -> {end}"),
                Err(_) => assert_eq!(expected, None, "{start} -> {end}"),
            }
        }
    }
}

#[test]
fn matches_brute_force_on_dense_graph() {
    let mut rows = Vec::new();
    let nodes = ["N0", "N1", "N2", "N3", "N4", "N5"];
    for (i, from) in nodes.iter().enumerate() {
        for (j, to) in nodes.iter().enumerate() {
            if i != j && (i * 7 + j * 3) % 4 != 0 {
                let distance = ((i * 13 + j * 29) % 17 + 1) as u32;
                rows.push((*from, *to, distance, "straight"));
            }
        }
    }
    let g = graph(&rows);
    for from in nodes {
        for to in nodes {
            let expected = brute_force_distance(&g, from, to);
            let got = find_route(&g, from, to).ok().map(|p| p.distance());
            assert_eq!(got, expected, "{from} -> {to}");
        }
    }
}
