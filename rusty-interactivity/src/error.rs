//! Error taxonomy for the interactivity engine.
//!
//! A wait that ends through cancellation is not an error; it resolves to
//! [`Resolution::Cancelled`](crate::Resolution::Cancelled).

/// Failures surfaced by pagination sessions and their cleanup.
#[derive(Debug, thiserror::Error)]
pub enum InteractivityError {
    /// The request kind structurally cannot provide this operation.
    #[error("{operation} is not supported by {kind} pagination")]
    UnsupportedOperation {
        operation: &'static str,
        kind: &'static str,
    },
    /// The finalization call against the external message failed.
    ///
    /// The session is still terminated when this is returned.
    #[error("failed to finalize paginated message")]
    Finalization(#[source] anyhow::Error),
    /// A pagination session was built without any page.
    #[error("pagination requires at least one page")]
    EmptyPages,
    /// A policy name could not be parsed.
    #[error("unknown {kind} policy `{value}`")]
    InvalidPolicy { kind: &'static str, value: String },
}

impl InteractivityError {
    pub(crate) fn unsupported(operation: &'static str, kind: &'static str) -> Self {
        Self::UnsupportedOperation { operation, kind }
    }
}
