//! Root-confined static file lookup.

use std::fs;
use std::io;
use std::path::{Path, PathBuf};

use crate::error::ServeError;
use crate::files::mime::content_type_for;
use crate::http::ResponseValue;

/// Serves files from beneath a single root directory.
#[derive(Debug, Clone)]
pub struct StaticFileResolver {
    root: PathBuf,
}

impl StaticFileResolver {
    /// Create a resolver for an existing directory.
    pub fn new(root: impl AsRef<Path>) -> io::Result<Self> {
        let root = root.as_ref().canonicalize()?;
        if !root.is_dir() {
            return Err(io::Error::new(
                io::ErrorKind::InvalidInput,
                format!("static root {} is not a directory", root.display()),
            ));
        }
        Ok(Self { root })
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    /// Resolve a request path to file contents.
    ///
    /// Returns `Ok(None)` when no regular file exists at the path.
    pub fn try_serve(&self, path: &str) -> Result<Option<ResponseValue>, ServeError> {
        let relative = path.trim_start_matches('/');
        if relative.is_empty() {
            return Ok(None);
        }

        let candidate = relative
            .split('/')
            .filter(|segment| !segment.is_empty())
            .fold(self.root.clone(), |acc, segment| acc.join(segment));

        if !candidate.is_file() {
            return Ok(None);
        }

        let resolved = candidate.canonicalize()?;
        if !resolved.starts_with(&self.root) {
            tracing::warn!(
                path = %path,
                resolved = %resolved.display(),
                "Static path escapes root"
            );
            return Err(ServeError::PathTraversalRejected(path.to_string()));
        }

        let body = fs::read(&resolved)?;
        tracing::trace!(path = %path, bytes = body.len(), "Static file served");

        Ok(Some(ResponseValue::new(content_type_for(&resolved), body)))
    }
}
