//! View lookup and rendering.

use std::fs;
use std::path::{Path, PathBuf};

use crate::config::TemplateConfig;
use crate::http::View;
use crate::templates::{Template, TemplateError, ViewModel};

/// Renders `<root>/<view>.<extension>` templates into HTML views.
#[derive(Debug, Clone)]
pub struct ViewRenderer {
    root: PathBuf,
    extension: String,
}

impl ViewRenderer {
    pub fn new(root: impl Into<PathBuf>, extension: impl Into<String>) -> Self {
        Self {
            root: root.into(),
            extension: extension.into(),
        }
    }

    pub fn from_config(config: &TemplateConfig) -> Self {
        Self::new(&config.root, &config.extension)
    }

    /// File a view name resolves to.
    pub fn view_path(&self, view: &str) -> PathBuf {
        self.root.join(format!("{}.{}", view, self.extension))
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    /// Load, parse and render a view.
    pub fn render(&self, model: &ViewModel, view: &str) -> Result<View, TemplateError> {
        let path = self.view_path(view);
        if !path.is_file() {
            tracing::error!(view = %view, path = %path.display(), "View path does not exist");
            return Err(TemplateError::NotFound(path.display().to_string()));
        }

        let template = Template::parse(fs::read_to_string(&path)?).inspect_err(|e| {
            tracing::error!(view = %view, error = %e, "Issue parsing template");
        })?;

        Ok(View::new(template.render(model)))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::http::Responder;

    struct Views(PathBuf);

    impl Views {
        fn new() -> Self {
            let dir = std::env::temp_dir().join(format!("burrow-views-{}", uuid::Uuid::new_v4()));
            fs::create_dir_all(&dir).unwrap();
            fs::write(dir.join("index.blade"), "<h1>Hi {{Firstname}} {{Lastname}}</h1>").unwrap();
            fs::write(dir.join("plain.blade"), "<h1>no bindings</h1>").unwrap();
            Self(dir)
        }
    }

    impl Drop for Views {
        fn drop(&mut self) {
            let _ = fs::remove_dir_all(&self.0);
        }
    }

    #[test]
    fn renders_view_from_root() {
        let views = Views::new();
        let renderer = ViewRenderer::new(&views.0, "blade");
        let model = ViewModel::new().with("Firstname", "Bill").with("Lastname", "Gates");

        let view = renderer.render(&model, "index").unwrap();
        assert_eq!(view.as_str(), "<h1>Hi Bill Gates</h1>");
        assert_eq!(view.content_type(), "text/html");
    }

    #[test]
    fn missing_view_is_not_found() {
        let views = Views::new();
        let renderer = ViewRenderer::new(&views.0, "blade");
        assert!(matches!(
            renderer.render(&ViewModel::new(), "missing"),
            Err(TemplateError::NotFound(_))
        ));
    }

    #[test]
    fn extension_is_configurable() {
        let views = Views::new();
        let renderer = ViewRenderer::new(&views.0, "html");
        assert_eq!(renderer.view_path("index"), views.0.join("index.html"));
        assert!(renderer.render(&ViewModel::new(), "index").is_err());
    }

    #[test]
    fn placeholder_free_view_is_rejected() {
        let views = Views::new();
        let renderer = ViewRenderer::new(&views.0, "blade");
        assert!(matches!(
            renderer.render(&ViewModel::new(), "plain"),
            Err(TemplateError::NoPlaceholders)
        ));
    }
}
