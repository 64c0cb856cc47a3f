use thiserror::Error;

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum NavError {
    #[error("Unknown location: {0}")]
    InvalidLocation(String),
    #[error("No path found between {from} and {to}")]
    NoPathExists { from: String, to: String },
    #[error("No edge from {from} to {to}")]
    MissingEdge { from: String, to: String },
    #[error("Invalid edge {from} -> {to}: {reason}")]
    InvalidEdge {
        from: String,
        to: String,
        reason: String,
    },
}
