//! Error types for capacity report generation.

use thiserror::Error;

use crate::quantity::QuantityError;

/// Errors that abort a capacity report.
///
/// Every variant is fatal to the current invocation: a report is either
/// complete or not emitted at all, so capacity figures are never silently
/// incomplete.
#[derive(Error, Debug)]
pub enum CapacityError {
    /// The node listing was rejected by the API server.
    #[error("failed to list nodes")]
    NodeList(#[source] kube::Error),

    /// A pod listing was rejected by the API server.
    #[error("failed to list pods ({query})")]
    PodList {
        /// Which pod query failed, e.g. `node worker-0, non-terminated`.
        query: String,
        #[source]
        source: kube::Error,
    },

    /// A node name cannot be expressed in a field selector.
    #[error("cannot build field selector for node name {0:?}")]
    FieldSelector(String),

    /// The API server returned a quantity the milli-unit math cannot hold.
    #[error("invalid resource quantity")]
    Quantity(#[from] QuantityError),
}
