//! Error types for the flood dashboard service

/// Errors raised while fetching data from the flood API.
///
/// All variants are handled the same way by the scheduler: logged, and the
/// previous snapshot is kept.
#[derive(Debug, thiserror::Error)]
pub enum FetchError {
    #[error("Network error: {0}")]
    Network(String),

    #[error("Parse error: {0}")]
    Parse(String),

    #[error("Empty result from {0}")]
    EmptyResult(String),
}

/// Errors that can occur in the flood dashboard service
#[derive(Debug, thiserror::Error)]
pub enum DashboardError {
    #[error("Configuration error: {0}")]
    Config(String),

    #[error("JSON parse error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("Dashboard error: {0}")]
    Dashboard(String),
}

/// Result type alias for flood dashboard operations
pub type Result<T> = std::result::Result<T, DashboardError>;
