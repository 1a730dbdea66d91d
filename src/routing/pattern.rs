//! Route pattern compilation.
//!
//! `/greet/{entity}/{name}` compiles to `^/greet/([^/]+)/([^/]+)$` with the
//! parameter names `["entity", "name"]`. Everything outside braces is matched
//! literally.

use regex::Regex;

use crate::error::ServeError;

/// A compiled route pattern.
#[derive(Debug, Clone)]
pub struct PathPattern {
    source: String,
    regex: Regex,
    names: Vec<String>,
}

impl PathPattern {
    /// Compile a pattern with `{name}` placeholders.
    pub fn compile(pattern: &str) -> Result<Self, ServeError> {
        let invalid = |reason: &str| ServeError::InvalidRoutePattern {
            pattern: pattern.to_string(),
            reason: reason.to_string(),
        };

        let mut expr = String::from("^");
        let mut names = Vec::new();
        let mut rest = pattern;

        while let Some(open) = rest.find('{') {
            expr.push_str(&regex::escape(&rest[..open]));

            let after = &rest[open + 1..];
            let close = after.find('}').ok_or_else(|| invalid("unterminated placeholder"))?;
            let name = &after[..close];

            if name.is_empty() {
                return Err(invalid("empty placeholder"));
            }
            if !name.chars().all(|c| c.is_alphanumeric() || c == '_') {
                return Err(invalid("placeholder names must be word characters"));
            }

            names.push(name.to_string());
            expr.push_str("([^/]+)");
            rest = &after[close + 1..];
        }
        expr.push_str(&regex::escape(rest));
        expr.push('$');

        let regex = Regex::new(&expr).map_err(|e| invalid(&e.to_string()))?;

        if regex.captures_len() - 1 != names.len() {
            return Err(invalid("capture count does not match parameter count"));
        }

        Ok(Self {
            source: pattern.to_string(),
            regex,
            names,
        })
    }

    /// Match a full path, returning parameter values in pattern order.
    pub fn captures(&self, path: &str) -> Option<Vec<String>> {
        let caps = self.regex.captures(path)?;
        Some(
            caps.iter()
                .skip(1)
                .map(|m| m.map(|m| m.as_str().to_string()).unwrap_or_default())
                .collect(),
        )
    }

    pub fn is_match(&self, path: &str) -> bool {
        self.regex.is_match(path)
    }

    /// Parameter names in the order they appear.
    pub fn parameter_names(&self) -> &[String] {
        &self.names
    }

    pub fn as_str(&self) -> &str {
        &self.source
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn extracts_parameters_in_order() {
        let p = PathPattern::compile("/greet/{entity}/{name}").unwrap();
        assert_eq!(p.parameter_names(), ["entity", "name"]);
        assert_eq!(p.captures("/greet/cat/Tom").unwrap(), vec!["cat", "Tom"]);
    }

    #[test]
    fn anchored_on_both_ends() {
        let p = PathPattern::compile("/increment/{number}").unwrap();
        assert!(p.is_match("/increment/41"));
        assert!(!p.is_match("/increment/41/extra"));
        assert!(!p.is_match("/prefix/increment/41"));
        assert!(!p.is_match("/increment/"));
    }

    #[test]
    fn parameters_do_not_span_segments() {
        let p = PathPattern::compile("/files/{name}").unwrap();
        assert!(p.captures("/files/a/b").is_none());
    }

    #[test]
    fn static_segments_are_literal() {
        let p = PathPattern::compile("/data.json").unwrap();
        assert!(p.is_match("/data.json"));
        assert!(!p.is_match("/dataxjson"));

        let plus = PathPattern::compile("/a+b/{id}").unwrap();
        assert_eq!(plus.captures("/a+b/7").unwrap(), vec!["7"]);
        assert!(!plus.is_match("/aab/7"));
    }

    #[test]
    fn rejects_bad_placeholders() {
        for bad in ["/x/{", "/x/{}", "/x/{a-b}", "/x/{a/b}"] {
            assert!(
                matches!(PathPattern::compile(bad), Err(ServeError::InvalidRoutePattern { .. })),
                "{bad} should be rejected"
            );
        }
    }
}
