//! Template parsing and placeholder substitution.

use std::sync::OnceLock;

use regex::{Captures, Regex};

use crate::templates::{TemplateError, ViewModel};

fn placeholder() -> &'static Regex {
    static PLACEHOLDER: OnceLock<Regex> = OnceLock::new();
    PLACEHOLDER.get_or_init(|| Regex::new(r"\{\{(\w+)\}\}").expect("placeholder regex is valid"))
}

/// A parsed template.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Template {
    source: String,
}

impl Template {
    /// Validate template text: it must be non-empty and contain at least one
    /// `{{name}}` placeholder.
    pub fn parse(source: impl Into<String>) -> Result<Self, TemplateError> {
        let source = source.into();
        if source.is_empty() {
            return Err(TemplateError::Empty);
        }
        if !placeholder().is_match(&source) {
            return Err(TemplateError::NoPlaceholders);
        }
        Ok(Self { source })
    }

    /// Substitute placeholders from the model.
    pub fn render(&self, model: &ViewModel) -> String {
        placeholder()
            .replace_all(&self.source, |caps: &Captures<'_>| {
                model
                    .get(&caps[1])
                    .map(str::to_string)
                    .unwrap_or_else(|| caps[0].to_string())
            })
            .into_owned()
    }

    /// Placeholder names in order of appearance.
    pub fn placeholders(&self) -> Vec<&str> {
        placeholder()
            .captures_iter(&self.source)
            .filter_map(|c| c.get(1).map(|m| m.as_str()))
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn substitutes_known_placeholders() {
        let template = Template::parse("<p>{{Firstname}} {{Lastname}}</p>").unwrap();
        let model = ViewModel::new().with("Firstname", "Bill").with("Lastname", "Gates");
        assert_eq!(template.render(&model), "<p>Bill Gates</p>");
    }

    #[test]
    fn leaves_unknown_placeholders() {
        let template = Template::parse("{{known}} and {{unknown}}").unwrap();
        let model = ViewModel::new().with("known", "yes");
        assert_eq!(template.render(&model), "yes and {{unknown}}");
        assert_eq!(template.placeholders(), vec!["known", "unknown"]);
    }

    #[test]
    fn rejects_empty_and_placeholder_free_text() {
        assert!(matches!(Template::parse(""), Err(TemplateError::Empty)));
        assert!(matches!(
            Template::parse("<p>static</p>"),
            Err(TemplateError::NoPlaceholders)
        ));
        assert!(matches!(
            Template::parse("{{ spaced }}"),
            Err(TemplateError::NoPlaceholders)
        ));
    }
}
