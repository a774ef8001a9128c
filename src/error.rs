use thiserror::Error;

/// The traffic light dataset could not be read or understood.
///
/// Never fatal: the application falls back to an empty registry.
#[derive(Debug, Error)]
pub enum DataLoadError {
    #[error("failed to read dataset {path}: {source}")]
    Io {
        path: String,
        #[source]
        source: std::io::Error,
    },
    #[error("failed to fetch dataset: {0}")]
    Http(#[from] reqwest::Error),
    #[error("dataset request returned HTTP {0}")]
    Status(u16),
    #[error("malformed dataset: {0}")]
    Malformed(#[from] geojson::Error),
    #[error("feature {index} is not a point geometry")]
    UnsupportedGeometry { index: usize },
}

/// A routing request failed; the pending request is abandoned and the
/// session keeps whatever it displayed before.
#[derive(Debug, Error)]
pub enum RoutingRequestError {
    #[error("routing request failed: {0}")]
    Network(#[from] reqwest::Error),
    #[error("routing service returned HTTP {status}: {body}")]
    Status { status: u16, body: String },
    #[error("malformed routing response: {0}")]
    Malformed(String),
    #[error("no API key configured (set {0})")]
    MissingApiKey(&'static str),
}

impl From<serde_json::Error> for RoutingRequestError {
    fn from(err: serde_json::Error) -> Self {
        RoutingRequestError::Malformed(err.to_string())
    }
}

impl From<geojson::Error> for RoutingRequestError {
    fn from(err: geojson::Error) -> Self {
        RoutingRequestError::Malformed(err.to_string())
    }
}

#[derive(Debug, Error, PartialEq, Eq)]
#[error("route index {index} is out of range ({available} candidates)")]
pub struct InvalidSelectionError {
    pub index: usize,
    pub available: usize,
}
