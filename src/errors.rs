//! Library-boundary error taxonomy.
//!
//! Command handlers in `src/commands/*.rs` wrap these in `anyhow::Error`
//! with additional context.

#[derive(Debug, thiserror::Error)]
pub enum Error {
    #[error("node {0:?} is missing an allocatable resource entry")]
    MissingAllocatable(Option<String>),

    #[error("invalid {field}: {message}")]
    Validation { field: &'static str, message: String },

    #[error("{kind} {name:?} not found in namespace {namespace:?}")]
    NotFound {
        kind: &'static str,
        namespace: String,
        name: String,
    },

    #[error("{count} of {total} {kind} targets failed: {}", .failed.join(", "))]
    PartialFailure {
        kind: &'static str,
        count: usize,
        total: usize,
        failed: Vec<String>,
    },

    #[error("kubernetes API error: {0}")]
    Api(#[from] kube::Error),

    #[error("failed to resolve client configuration: {0}")]
    Config(String),

    #[error("failed to parse resource quantity {0:?}: {1}")]
    Quantity(String, String),
}
