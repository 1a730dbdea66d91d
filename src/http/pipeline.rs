//! Request pipeline.
//!
//! # Responsibilities
//! - Turn the bytes of one read into encoded response bytes
//! - Decide between cache, static files and routes, in that order
//! - Populate the cache with fresh GET dispatch results
//!
//! # Design Decisions
//! - No sockets here: the connection worker owns all I/O
//! - Every failure becomes an encoded error response; nothing propagates

use std::sync::Arc;

use crate::cache::ResponseCache;
use crate::config::ServerConfig;
use crate::error::ServeError;
use crate::files::StaticFileResolver;
use crate::http::response::{encode, encode_error};
use crate::http::{Method, Request, Status};
use crate::net::ConnectionState;
use crate::observability::metrics;
use crate::routing::{self, RouteTable};

/// Result of running one request through the pipeline.
#[derive(Debug, Clone)]
pub struct Exchange {
    /// Branch that produced the response.
    pub state: ConnectionState,
    pub method: Option<Method>,
    pub path: Option<String>,
    /// Encoded response, ready to write.
    pub bytes: Arc<[u8]>,
}

impl Exchange {
    /// An error response for a request that could not be served.
    pub fn rejected(status: Status, request: Option<&Request>) -> Self {
        Self {
            state: ConnectionState::Rejected(status),
            method: request.map(|r| r.method.clone()),
            path: request.map(|r| r.path.clone()),
            bytes: Arc::from(encode_error(status)),
        }
    }

    pub fn status(&self) -> Status {
        self.state.status().unwrap_or(Status::Ok)
    }

    fn served(state: ConnectionState, request: &Request, bytes: Arc<[u8]>) -> Self {
        Self {
            state,
            method: Some(request.method.clone()),
            path: Some(request.path.clone()),
            bytes,
        }
    }
}

/// Everything needed to answer a request.
#[derive(Debug)]
pub struct Engine {
    routes: RouteTable,
    cache: Option<ResponseCache>,
    files: Option<StaticFileResolver>,
}

impl Engine {
    /// Engine with routes only; no cache, no static files.
    pub fn new(routes: RouteTable) -> Self {
        Self {
            routes,
            cache: None,
            files: None,
        }
    }

    /// Build from configuration. Fails if the static root cannot be opened.
    pub fn from_config(config: &ServerConfig, routes: RouteTable) -> Result<Self, ServeError> {
        let mut engine = Self::new(routes);

        if config.cache.enabled {
            engine = engine.with_cache(ResponseCache::from_config(&config.cache));
        }
        if let Some(root) = &config.static_files.root {
            let resolver = StaticFileResolver::new(root)?;
            tracing::info!(root = %resolver.root().display(), "Serving static files");
            engine = engine.with_static_files(resolver);
        }

        Ok(engine)
    }

    pub fn with_cache(mut self, cache: ResponseCache) -> Self {
        self.cache = Some(cache);
        self
    }

    pub fn with_static_files(mut self, resolver: StaticFileResolver) -> Self {
        self.files = Some(resolver);
        self
    }

    pub fn cache(&self) -> Option<&ResponseCache> {
        self.cache.as_ref()
    }

    pub fn routes(&self) -> &RouteTable {
        &self.routes
    }

    /// Answer the bytes of one read. `None` means nothing arrived and the
    /// connection should just be closed.
    pub fn respond(&self, raw: &[u8]) -> Option<Exchange> {
        if raw.is_empty() {
            return None;
        }

        let request = match Request::parse(raw) {
            Ok(request) => request,
            Err(e) => {
                tracing::debug!(error = %e, "Rejecting request");
                return Some(Exchange::rejected(e.status(), None));
            }
        };

        tracing::debug!(
            method = %request.method,
            path = %request.path,
            state = ConnectionState::Parsed.label(),
            "Request parsed"
        );

        Some(self.serve(&request))
    }

    fn serve(&self, request: &Request) -> Exchange {
        if request.method == Method::Get {
            if let Some(bytes) = self.cache.as_ref().and_then(|c| c.try_get(&request.path)) {
                metrics::record_cache_hit();
                return Exchange::served(ConnectionState::CacheHit, request, bytes);
            }
        }

        if let Some(files) = &self.files {
            match files.try_serve(&request.path) {
                Ok(Some(value)) => {
                    return Exchange::served(
                        ConnectionState::StaticServed,
                        request,
                        Arc::from(encode(&value)),
                    );
                }
                Ok(None) => {}
                Err(e) => return self.fail(e, request),
            }
        }

        let Some(matched) = self.routes.match_path(&request.path) else {
            return self.fail(ServeError::RouteNotFound(request.path.clone()), request);
        };

        match routing::invoke(&matched, request) {
            Ok(value) => {
                let bytes: Arc<[u8]> = Arc::from(encode(&value));
                if let Some(cache) = &self.cache {
                    if cache.is_cacheable(&request.method, bytes.len()) {
                        cache.put(&request.path, Arc::clone(&bytes));
                    }
                }
                Exchange::served(ConnectionState::Dispatching, request, bytes)
            }
            Err(e) => self.fail(e, request),
        }
    }

    fn fail(&self, error: ServeError, request: &Request) -> Exchange {
        let status = error.status();
        match status {
            Status::InternalServerError => {
                tracing::error!(path = %request.path, error = %error, "Request failed")
            }
            _ => tracing::debug!(path = %request.path, error = %error, "Request rejected"),
        }
        Exchange::rejected(status, Some(request))
    }
}
