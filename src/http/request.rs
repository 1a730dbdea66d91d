//! Request parsing.
//!
//! # Responsibilities
//! - Split the request line into method and path (version is ignored)
//! - Collect headers up to the first blank line
//! - Slice a `Content-Length` sized body for POST requests
//!
//! # Design Decisions
//! - Works on the bytes of a single socket read; a body that arrives in a
//!   later segment is truncated rather than awaited
//! - Header names keep their original case; only `Content-Length` lookup is
//!   case-insensitive

use std::collections::HashMap;

use crate::error::ServeError;
use crate::http::Method;

/// A parsed HTTP request.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Request {
    pub method: Method,
    pub path: String,
    pub headers: HashMap<String, String>,
    pub body: String,
}

impl Request {
    /// Parse a request from the bytes of one read.
    pub fn parse(buffer: &[u8]) -> Result<Self, ServeError> {
        let line_end = buffer
            .iter()
            .position(|&b| b == b'\n')
            .ok_or(ServeError::MalformedRequestLine)?;

        let request_line = std::str::from_utf8(trim_cr(&buffer[..line_end]))
            .map_err(|_| ServeError::MalformedRequestLine)?;

        let mut tokens = request_line.split(' ').filter(|t| !t.is_empty());
        let (method, path) = match (tokens.next(), tokens.next()) {
            (Some(method), Some(path)) => (Method::parse(method), path.to_string()),
            _ => return Err(ServeError::MalformedRequestLine),
        };

        let mut headers = HashMap::new();
        let mut cursor = line_end + 1;
        let mut body_start = None;

        while cursor < buffer.len() {
            let rest = &buffer[cursor..];
            let (line, next) = match rest.iter().position(|&b| b == b'\n') {
                Some(pos) => (&rest[..pos], cursor + pos + 1),
                None => (rest, buffer.len()),
            };
            let line = trim_cr(line);

            if line.is_empty() {
                body_start = Some(next);
                break;
            }

            if let Some(colon) = line.iter().position(|&b| b == b':') {
                let name = String::from_utf8_lossy(&line[..colon]).trim().to_string();
                let value = String::from_utf8_lossy(&line[colon + 1..]).trim().to_string();
                headers.insert(name, value);
            }

            cursor = next;
        }

        let mut request = Request {
            method,
            path,
            headers,
            body: String::new(),
        };

        if request.method == Method::Post {
            if let (Some(start), Some(length)) = (body_start, request.content_length()) {
                let end = start.saturating_add(length).min(buffer.len());
                let start = start.min(end);
                request.body = String::from_utf8_lossy(&buffer[start..end]).into_owned();
            }
        }

        Ok(request)
    }

    /// Numeric value of the `Content-Length` header, if present.
    pub fn content_length(&self) -> Option<usize> {
        self.header("Content-Length")
            .and_then(|v| v.parse().ok())
    }

    /// Look up a header by name, ignoring ASCII case.
    pub fn header(&self, name: &str) -> Option<&str> {
        self.headers
            .iter()
            .find(|(k, _)| k.eq_ignore_ascii_case(name))
            .map(|(_, v)| v.as_str())
    }
}

fn trim_cr(line: &[u8]) -> &[u8] {
    match line.last() {
        Some(b'\r') => &line[..line.len() - 1],
        _ => line,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parse_get_request() {
        let req = Request::parse(b"GET /index.html HTTP/1.1\r\nHost: localhost\r\n\r\n").unwrap();

        assert_eq!(req.method, Method::Get);
        assert_eq!(req.path, "/index.html");
        assert_eq!(req.headers.get("Host").map(String::as_str), Some("localhost"));
        assert!(req.body.is_empty());
    }

    #[test]
    fn parse_post_with_body() {
        let req = Request::parse(b"POST /submit HTTP/1.1\r\nContent-Length: 3\r\n\r\nx=1").unwrap();

        assert_eq!(req.method, Method::Post);
        assert_eq!(req.body, "x=1");
        assert_eq!(req.content_length(), Some(3));
    }

    #[test]
    fn body_sliced_to_content_length() {
        let req = Request::parse(b"POST /submit HTTP/1.1\r\nContent-Length: 3\r\n\r\nx=12345").unwrap();
        assert_eq!(req.body, "x=1");
    }

    #[test]
    fn short_body_takes_what_arrived() {
        let req = Request::parse(b"POST /submit HTTP/1.1\r\nContent-Length: 10\r\n\r\nabc").unwrap();
        assert_eq!(req.body, "abc");
    }

    #[test]
    fn post_without_numeric_length_has_empty_body() {
        let missing = Request::parse(b"POST /submit HTTP/1.1\r\n\r\nx=1").unwrap();
        assert!(missing.body.is_empty());

        let garbage = Request::parse(b"POST /submit HTTP/1.1\r\nContent-Length: three\r\n\r\nx=1").unwrap();
        assert!(garbage.body.is_empty());
    }

    #[test]
    fn get_ignores_body() {
        let req = Request::parse(b"GET / HTTP/1.1\r\nContent-Length: 3\r\n\r\nx=1").unwrap();
        assert!(req.body.is_empty());
    }

    #[test]
    fn header_names_and_values_trimmed() {
        let req = Request::parse(b"GET / HTTP/1.1\r\n  X-Thing :  a: b  \r\nnocolon\r\n\r\n").unwrap();
        assert_eq!(req.headers.get("X-Thing").map(String::as_str), Some("a: b"));
        assert_eq!(req.headers.len(), 1);
        // Stored keys are case-sensitive, lookups through `header` are not.
        assert!(req.headers.get("x-thing").is_none());
        assert_eq!(req.header("x-thing"), Some("a: b"));
    }

    #[test]
    fn bare_newlines_accepted() {
        let req = Request::parse(b"POST /submit HTTP/1.1\nContent-Length: 2\n\nok").unwrap();
        assert_eq!(req.body, "ok");
    }

    #[test]
    fn version_is_optional() {
        let req = Request::parse(b"GET /about\r\n\r\n").unwrap();
        assert_eq!(req.path, "/about");
    }

    #[test]
    fn malformed_request_lines() {
        for raw in [
            &b"\r\n\r\n"[..],
            b"GET\r\n\r\n",
            b"   \r\n",
            b"GET /no-terminator HTTP/1.1",
            b"\xff\xfe /x HTTP/1.1\r\n\r\n",
        ] {
            assert!(
                matches!(Request::parse(raw), Err(ServeError::MalformedRequestLine)),
                "expected malformed for {:?}",
                String::from_utf8_lossy(raw)
            );
        }
    }
}
