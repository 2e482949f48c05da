use thiserror::Error;

/// Error taxonomy for the routing controller.
///
/// The query-path failures are deliberately separate variants:
/// `ResolutionFailed` (the client IP could not be geolocated) and
/// `NoNodesOnline` (the current index is empty) must be distinguishable by
/// callers. Probe failures never show up here at all; an unreachable node is
/// simply classified offline.
#[derive(Error, Debug)]
pub enum GeorouteError {
    #[error("Transport error: {0}")]
    Transport(String),

    #[error("JSON serialization error: {0}")]
    JsonSerialization(#[from] serde_json::Error),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Timed out after {0}ms")]
    Timeout(u64),

    #[error("Could not geolocate address: {0}")]
    ResolutionFailed(String),

    #[error("No edge nodes are currently online")]
    NoNodesOnline,

    #[error("None of the submitted addresses could be geolocated")]
    NoNodesResolved,

    #[error("Invalid request: {0}")]
    InvalidRequest(String),
}

impl From<std::net::AddrParseError> for GeorouteError {
    fn from(err: std::net::AddrParseError) -> Self {
        GeorouteError::InvalidRequest(err.to_string())
    }
}

pub type Result<T> = std::result::Result<T, GeorouteError>;
