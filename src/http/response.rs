//! Response values and wire encoding.
//!
//! # Responsibilities
//! - Define the uniform [`ResponseValue`] shape (content type + body)
//! - Provide the stock response types handlers return
//! - Encode success and error responses onto the wire
//!
//! # Design Decisions
//! - `Content-Length` is always computed from the body being written
//! - Every response closes the connection; no keep-alive, no chunking

use serde::Serialize;

/// Status codes the engine emits.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[repr(u16)]
pub enum Status {
    Ok = 200,
    BadRequest = 400,
    NotFound = 404,
    InternalServerError = 500,
    ServiceUnavailable = 503,
}

impl Status {
    pub fn code(&self) -> u16 {
        *self as u16
    }

    /// Reason phrase, also used as the body of error responses.
    pub fn reason(&self) -> &'static str {
        match self {
            Status::Ok => "OK",
            Status::BadRequest => "Bad Request",
            Status::NotFound => "Not Found",
            Status::InternalServerError => "Internal Server Error",
            Status::ServiceUnavailable => "Service Unavailable",
        }
    }
}

impl std::fmt::Display for Status {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{} {}", self.code(), self.reason())
    }
}

/// The uniform response shape every handler result, static file and cached
/// entry is normalised into before encoding.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ResponseValue {
    pub content_type: String,
    pub body: Vec<u8>,
}

impl ResponseValue {
    pub fn new(content_type: impl Into<String>, body: impl Into<Vec<u8>>) -> Self {
        Self {
            content_type: content_type.into(),
            body: body.into(),
        }
    }
}

/// Capability implemented by anything a handler can return.
pub trait Responder: Send {
    /// Value of the `Content-Type` header.
    fn content_type(&self) -> &str;

    /// Response body bytes.
    fn content(&self) -> Vec<u8>;
}

impl Responder for ResponseValue {
    fn content_type(&self) -> &str {
        &self.content_type
    }

    fn content(&self) -> Vec<u8> {
        self.body.clone()
    }
}

macro_rules! text_responder {
    ($(#[$doc:meta])* $name:ident, $content_type:literal) => {
        $(#[$doc])*
        #[derive(Debug, Clone, PartialEq, Eq)]
        pub struct $name(String);

        impl $name {
            pub fn new(content: impl Into<String>) -> Self {
                Self(content.into())
            }

            pub fn as_str(&self) -> &str {
                &self.0
            }
        }

        impl Responder for $name {
            fn content_type(&self) -> &str {
                $content_type
            }

            fn content(&self) -> Vec<u8> {
                self.0.as_bytes().to_vec()
            }
        }
    };
}

text_responder!(
    /// Plain text body.
    Text,
    "text/plain"
);
text_responder!(
    /// HTML body.
    Html,
    "text/html"
);
text_responder!(
    /// JSON body, passed through as-is.
    Json,
    "application/json"
);
text_responder!(
    /// HTML produced by the template renderer.
    View,
    "text/html"
);

impl Json {
    /// Serialise a value into a JSON response.
    pub fn from_serialize<T: Serialize>(value: &T) -> Result<Self, serde_json::Error> {
        serde_json::to_string(value).map(Self)
    }
}

/// Encode a `200 OK` response.
pub fn encode(value: &ResponseValue) -> Vec<u8> {
    encode_with_status(Status::Ok, &value.content_type, &value.body)
}

/// Encode an error response whose body is the reason phrase.
pub fn encode_error(status: Status) -> Vec<u8> {
    encode_with_status(status, "text/plain", status.reason().as_bytes())
}

fn encode_with_status(status: Status, content_type: &str, body: &[u8]) -> Vec<u8> {
    let head = format!(
        "HTTP/1.1 {}\r\nContent-Type: {}\r\nContent-Length: {}\r\nConnection: close\r\n\r\n",
        status,
        content_type,
        body.len()
    );
    let mut out = Vec::with_capacity(head.len() + body.len());
    out.extend_from_slice(head.as_bytes());
    out.extend_from_slice(body);
    out
}
