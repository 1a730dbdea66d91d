//! Handler invocation.
//!
//! # Responsibilities
//! - Assemble handler arguments from the request and path parameters
//! - Invoke the bound handler
//! - Coerce the result into a [`ResponseValue`] or a dispatch error
//!
//! # Design Decisions
//! - Parameters are always raw strings; conversion failures belong to the
//!   handler and surface as `ResponseGenerationFailure`
//! - A panicking handler is contained here and reported the same way

use std::panic::{catch_unwind, AssertUnwindSafe};
use std::sync::Arc;

use crate::error::ServeError;
use crate::http::{Request, Responder, ResponseValue};
use crate::routing::table::RouteMatch;

/// Error type handlers may return.
pub type HandlerError = Box<dyn std::error::Error + Send + Sync>;

/// Result of a type-erased handler.
pub type HandlerResult = Result<Box<dyn Responder>, HandlerError>;

/// Type-erased handler capability stored in a route definition.
pub type Handler = Arc<dyn Fn(HandlerArgs) -> HandlerResult + Send + Sync>;

/// Arguments passed to a handler.
#[derive(Debug, Clone, Default)]
pub struct HandlerArgs {
    /// The parsed request, present for routes registered as expecting it.
    pub request: Option<Request>,
    /// Path parameter values in pattern order.
    pub params: Vec<String>,
}

impl HandlerArgs {
    /// Path parameter by position.
    pub fn param(&self, index: usize) -> Result<&str, HandlerError> {
        self.params
            .get(index)
            .map(String::as_str)
            .ok_or_else(|| format!("missing path parameter #{index}").into())
    }

    /// The request, for handlers registered with `expects_request`.
    pub fn request(&self) -> Result<&Request, HandlerError> {
        self.request
            .as_ref()
            .ok_or_else(|| "route was not registered to receive the request".into())
    }
}

/// Invoke the handler of a matched route.
pub fn invoke(matched: &RouteMatch<'_>, request: &Request) -> Result<ResponseValue, ServeError> {
    let route = matched.route;
    let args = HandlerArgs {
        request: route.expects_request.then(|| request.clone()),
        params: matched.params.clone(),
    };

    let outcome = catch_unwind(AssertUnwindSafe(|| (route.handler)(args)));

    let responder = match outcome {
        Ok(Ok(responder)) => responder,
        Ok(Err(e)) => return Err(ServeError::ResponseGenerationFailure(e.to_string())),
        Err(panic) => {
            let message = panic
                .downcast_ref::<&str>()
                .map(|s| s.to_string())
                .or_else(|| panic.downcast_ref::<String>().cloned())
                .unwrap_or_else(|| "unknown panic".to_string());
            return Err(ServeError::ResponseGenerationFailure(format!(
                "handler panicked: {message}"
            )));
        }
    };

    coerce(responder.as_ref())
}

/// Normalise a responder into the uniform response shape.
fn coerce(responder: &dyn Responder) -> Result<ResponseValue, ServeError> {
    let content_type = responder.content_type();

    if content_type.trim().is_empty() {
        return Err(ServeError::InvalidResponseKind("empty content type".into()));
    }
    if !content_type.chars().all(|c| c == ' ' || c.is_ascii_graphic()) {
        return Err(ServeError::InvalidResponseKind(format!(
            "content type {content_type:?} is not a valid header value"
        )));
    }

    Ok(ResponseValue::new(content_type, responder.content()))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::http::{Method, Text};
    use crate::routing::RouteTable;

    struct Weird(&'static str);

    impl Responder for Weird {
        fn content_type(&self) -> &str {
            self.0
        }

        fn content(&self) -> Vec<u8> {
            b"body".to_vec()
        }
    }

    fn request(method: Method, path: &str, body: &str) -> Request {
        Request {
            method,
            path: path.to_string(),
            headers: Default::default(),
            body: body.to_string(),
        }
    }

    #[test]
    fn passes_parameters_as_strings() {
        let table = RouteTable::builder()
            .get("/greet/{entity}/{name}", |args| {
                Ok(Text::new(format!("Hello {}, the {}", args.param(1)?, args.param(0)?)))
            })
            .unwrap()
            .build();

        let req = request(Method::Get, "/greet/cat/Tom", "");
        let matched = table.match_path(&req.path).unwrap();
        let value = invoke(&matched, &req).unwrap();

        assert_eq!(value.content_type, "text/plain");
        assert_eq!(value.body, b"Hello Tom, the cat");
    }

    #[test]
    fn request_only_passed_when_expected() {
        let table = RouteTable::builder()
            .post("/submit", |args| Ok(Text::new(format!("Received: {}", args.request()?.body))))
            .unwrap()
            .get("/peek", |args| Ok(Text::new(args.request.is_some().to_string())))
            .unwrap()
            .build();

        let post = request(Method::Post, "/submit", "x=1");
        let value = invoke(&table.match_path("/submit").unwrap(), &post).unwrap();
        assert_eq!(value.body, b"Received: x=1");

        let get = request(Method::Get, "/peek", "");
        let value = invoke(&table.match_path("/peek").unwrap(), &get).unwrap();
        assert_eq!(value.body, b"false");
    }

    #[test]
    fn handler_errors_become_generation_failures() {
        let table = RouteTable::builder()
            .get("/increment/{number}", |args| {
                let n: i64 = args.param(0)?.parse()?;
                Ok(Text::new(format!("Incremented: {}", n + 1)))
            })
            .unwrap()
            .build();

        let req = request(Method::Get, "/increment/abc", "");
        let err = invoke(&table.match_path(&req.path).unwrap(), &req).unwrap_err();
        assert!(matches!(err, ServeError::ResponseGenerationFailure(ref m) if m.contains("invalid digit")));
    }

    #[test]
    fn panics_are_contained() {
        let table = RouteTable::builder()
            .get("/boom", |_| -> Result<Text, HandlerError> { panic!("kaboom") })
            .unwrap()
            .build();

        let req = request(Method::Get, "/boom", "");
        let err = invoke(&table.match_path("/boom").unwrap(), &req).unwrap_err();
        assert!(matches!(err, ServeError::ResponseGenerationFailure(ref m) if m.contains("kaboom")));
    }

    #[test]
    fn rejects_uncoercible_results() {
        let table = RouteTable::builder()
            .get("/empty", |_| Ok(Weird("")))
            .unwrap()
            .get("/split", |_| Ok(Weird("text/plain\r\nX-Injected: 1")))
            .unwrap()
            .build();

        for path in ["/empty", "/split"] {
            let req = request(Method::Get, path, "");
            let err = invoke(&table.match_path(path).unwrap(), &req).unwrap_err();
            assert!(matches!(err, ServeError::InvalidResponseKind(_)), "{path}");
        }
    }
}
