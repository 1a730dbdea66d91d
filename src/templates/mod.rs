//! Placeholder template rendering.
//!
//! # Data Flow
//! ```text
//! handler builds a ViewModel
//!     → renderer.rs (locate `<root>/<view>.<extension>`, read)
//!     → template.rs (validate, substitute `{{name}}`)
//!     → View response
//! ```
//!
//! # Design Decisions
//! - Template root and extension are passed in at construction, never set
//!   globally
//! - Unknown placeholders are left verbatim

pub mod model;
pub mod renderer;
pub mod template;

pub use model::ViewModel;
pub use renderer::ViewRenderer;
pub use template::Template;

use thiserror::Error;

/// Errors raised while loading or parsing a template.
#[derive(Debug, Error)]
pub enum TemplateError {
    #[error("view {0} does not exist")]
    NotFound(String),

    #[error("template is empty")]
    Empty,

    #[error("no placeholders found in the template")]
    NoPlaceholders,

    #[error("failed to read view: {0}")]
    Io(#[from] std::io::Error),
}
