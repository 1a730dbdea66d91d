//! HTTP protocol handling subsystem.
//!
//! # Data Flow
//! ```text
//! TCP connection (net::pool hands it to a worker)
//!     → server.rs (single read, optional timeout)
//!     → request.rs (parse request line, headers, body)
//!     → pipeline.rs (cache → static files → routes → 404)
//!     → response.rs (encode status line, headers, body)
//!     → write, close
//! ```
//!
//! # Design Decisions
//! - One request per connection; every response carries `Connection: close`
//! - Parsing, routing and encoding are synchronous and socket-free, so the
//!   whole decision sequence is testable on byte slices

pub mod pipeline;
pub mod request;
pub mod response;
pub mod server;

pub use pipeline::{Engine, Exchange};
pub use request::Request;
pub use response::{encode, encode_error, Html, Json, Responder, ResponseValue, Status, Text, View};
pub use server::HttpServer;

use std::fmt;

/// Request method.
///
/// Unknown tokens are kept verbatim rather than rejected.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum Method {
    Get,
    Post,
    Put,
    Delete,
    Head,
    Options,
    Patch,
    Other(String),
}

impl Method {
    /// Parse a method token from the request line.
    pub fn parse(token: &str) -> Self {
        match token {
            "GET" => Method::Get,
            "POST" => Method::Post,
            "PUT" => Method::Put,
            "DELETE" => Method::Delete,
            "HEAD" => Method::Head,
            "OPTIONS" => Method::Options,
            "PATCH" => Method::Patch,
            other => Method::Other(other.to_string()),
        }
    }

    pub fn as_str(&self) -> &str {
        match self {
            Method::Get => "GET",
            Method::Post => "POST",
            Method::Put => "PUT",
            Method::Delete => "DELETE",
            Method::Head => "HEAD",
            Method::Options => "OPTIONS",
            Method::Patch => "PATCH",
            Method::Other(token) => token,
        }
    }
}

impl fmt::Display for Method {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn method_tokens() {
        assert_eq!(Method::parse("GET"), Method::Get);
        assert_eq!(Method::parse("POST"), Method::Post);
        assert_eq!(Method::parse("BREW"), Method::Other("BREW".into()));
        assert_eq!(Method::parse("BREW").as_str(), "BREW");
        // Tokens are case-sensitive.
        assert_eq!(Method::parse("get"), Method::Other("get".into()));
    }
}
