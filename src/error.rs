//! Engine error taxonomy.
//!
//! Per-connection failures are values of [`ServeError`] and are turned into an
//! HTTP error response by the connection worker. Only the startup variants
//! (`AddressInUse`, `Bind`, `InvalidRoutePattern`) are fatal.

use thiserror::Error;

use crate::http::Status;

/// Errors raised while serving a request or starting the server.
#[derive(Debug, Error)]
pub enum ServeError {
    /// Request line is missing the method or the path.
    #[error("malformed request line")]
    MalformedRequestLine,

    /// Neither a static file nor a route matched the path.
    #[error("no route matches {0}")]
    RouteNotFound(String),

    /// Handler returned a value that cannot be encoded as a response.
    #[error("handler returned an invalid response: {0}")]
    InvalidResponseKind(String),

    /// Handler invocation failed.
    #[error("issue generating HTTP response: {0}")]
    ResponseGenerationFailure(String),

    /// Static path resolved outside of the configured root.
    #[error("static path escapes the root directory: {0}")]
    PathTraversalRejected(String),

    /// I/O failure while producing a response (e.g. reading a static file).
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// Listen address is already taken.
    #[error("the address is already in use: {address}")]
    AddressInUse { address: String },

    /// Any other failure to bind the listen address.
    #[error("failed to bind {address}: {source}")]
    Bind {
        address: String,
        #[source]
        source: std::io::Error,
    },

    /// Route pattern could not be compiled.
    #[error("invalid route pattern {pattern:?}: {reason}")]
    InvalidRoutePattern { pattern: String, reason: String },
}

impl ServeError {
    /// HTTP status used when this error ends a connection.
    pub fn status(&self) -> Status {
        match self {
            ServeError::MalformedRequestLine => Status::BadRequest,
            ServeError::RouteNotFound(_) | ServeError::PathTraversalRejected(_) => Status::NotFound,
            _ => Status::InternalServerError,
        }
    }
}
