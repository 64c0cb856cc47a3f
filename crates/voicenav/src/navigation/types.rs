use std::fmt;
use std::str::FromStr;

use serde::Serialize;

/// Schematic 2-D point used for route layout. Not geographic.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize)]
pub struct Coord {
    pub x: i32,
    pub y: i32,
}

impl Coord {
    pub const ORIGIN: Coord = Coord { x: 0, y: 0 };

    pub fn new(x: i32, y: i32) -> Self {
        Self { x, y }
    }

    /// Move by a unit vector.
    pub fn offset(self, (dx, dy): (i32, i32)) -> Self {
        Self::new(self.x + dx, self.y + dy)
    }
}

impl From<(i32, i32)> for Coord {
    fn from((x, y): (i32, i32)) -> Self {
        Self::new(x, y)
    }
}

impl fmt::Display for Coord {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "({},{})", self.x, self.y)
    }
}

/// Turn required when leaving a location along an edge.
///
/// Unknown spellings are kept as `Other` instead of being rejected, so that
/// layout code can fall back to a default step.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum TurnDirection {
    Straight,
    Left,
    Right,
    Other(String),
}

impl TurnDirection {
    /// The spoken form used in direction sentences.
    pub fn as_str(&self) -> &str {
        match self {
            Self::Straight => "straight",
            Self::Left => "left",
            Self::Right => "right",
            Self::Other(s) => s,
        }
    }
}

impl FromStr for TurnDirection {
    type Err = std::convert::Infallible;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let dir = match s.trim().to_ascii_lowercase().as_str() {
            "straight" => Self::Straight,
            "left" => Self::Left,
            "right" => Self::Right,
            _ => Self::Other(s.trim().to_string()),
        };
        Ok(dir)
    }
}

impl fmt::Display for TurnDirection {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl Serialize for TurnDirection {
    fn serialize<S: serde::Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(self.as_str())
    }
}

/// Edge payload stored in the graph: distance in metres plus the turn to take.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Segment {
    pub distance: u32,
    pub direction: TurnDirection,
}

/// A resolved edge between two named locations.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Edge {
    pub from: String,
    pub to: String,
    pub distance: u32,
    pub direction: TurnDirection,
}

/// Shortest route through the graph.
///
/// Always holds at least one location. A single-location path has no edges.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Path {
    locations: Vec<String>,
    distance: u64,
}

impl Path {
    pub(crate) fn new(locations: Vec<String>, distance: u64) -> Self {
        debug_assert!(!locations.is_empty());
        Self {
            locations,
            distance,
        }
    }

    pub fn locations(&self) -> &[String] {
        &self.locations
    }

    pub fn start(&self) -> &str {
        &self.locations[0]
    }

    pub fn end(&self) -> &str {
        &self.locations[self.locations.len() - 1]
    }

    /// Total distance in metres.
    pub fn distance(&self) -> u64 {
        self.distance
    }

    /// Number of edges traversed.
    pub fn edge_count(&self) -> usize {
        self.locations.len() - 1
    }

    /// Consecutive (from, to) pairs in travel order.
    pub fn legs(&self) -> impl Iterator<Item = (&str, &str)> {
        self.locations
            .windows(2)
            .map(|pair| (pair[0].as_str(), pair[1].as_str()))
    }
}

impl fmt::Display for Path {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.locations.join(" -> "))
    }
}

/// One spoken instruction for a single edge traversal.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct DirectionStep {
    pub from: String,
    pub to: String,
    pub direction: TurnDirection,
    pub distance: u32,
    pub text: String,
}

/// Everything derived from a path: instructions, layout, and point labels.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct RouteDescription {
    pub steps: Vec<DirectionStep>,
    pub coordinates: Vec<Coord>,
    /// One label per coordinate.
    pub labels: Vec<String>,
    pub arrival: String,
}

impl RouteDescription {
    /// Step sentences followed by the arrival sentence, one per line.
    pub fn full_text(&self) -> String {
        self.sentences().collect::<Vec<_>>().join("\n")
    }

    /// Step sentences then the arrival sentence, in travel order.
    pub fn sentences(&self) -> impl Iterator<Item = &str> {
        self.steps
            .iter()
            .map(|s| s.text.as_str())
            .chain(std::iter::once(self.arrival.as_str()))
    }
}
