//! Error types shared by the topology loader and the route derivation engine.

use thiserror::Error;

/// Errors raised while building a topology or deriving routes from it.
#[derive(Debug, Error)]
pub enum RouteError {
    /// Weight lookup between two nodes that share no edge.
    #[error("no edge between {a} and {b}")]
    EdgeNotFound { a: String, b: String },

    /// A path's second hop is not recorded as a direct peer of the router.
    #[error("router {router} has no gateway towards {peer}")]
    UnknownGateway { router: String, peer: String },

    /// The summed link metrics of a path do not fit in a `u32`.
    #[error("metric overflow along path {}", .path.join(" -> "))]
    MetricOverflow { path: Vec<String> },

    /// A topology section matching neither the attachment nor the link shape.
    #[error("malformed topology section [{section}]: {reason}")]
    MalformedTopologyFact { section: String, reason: String },

    /// A point-to-point link network too small to number both ends.
    #[error("network {network} has fewer than two usable host addresses")]
    AddressExhausted { network: String },

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

pub type Result<T> = std::result::Result<T, RouteError>;
