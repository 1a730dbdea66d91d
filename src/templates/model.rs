//! View model: the key/value bindings a template is rendered with.

use std::collections::BTreeMap;
use std::fmt;

/// String bindings for template placeholders.
///
/// Serialises as `key=value;key=value`, with `;` and `=` escaped by a
/// backslash.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ViewModel(BTreeMap<String, String>);

impl ViewModel {
    pub fn new() -> Self {
        Self::default()
    }

    /// Builder-style insert.
    pub fn with(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.insert(key, value);
        self
    }

    pub fn insert(&mut self, key: impl Into<String>, value: impl Into<String>) {
        self.0.insert(key.into(), value.into());
    }

    pub fn get(&self, key: &str) -> Option<&str> {
        self.0.get(key).map(String::as_str)
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// Parse the serialised form. Pairs without an unescaped `=` are skipped.
    pub fn decode(serialized: &str) -> Self {
        let mut model = Self::new();
        for pair in split_unescaped(serialized, ';') {
            if pair.is_empty() {
                continue;
            }
            let mut parts = split_unescaped(&pair, '=').into_iter();
            if let (Some(key), Some(value)) = (parts.next(), parts.next()) {
                model.insert(unescape(&key), unescape(&value));
            }
        }
        model
    }
}

impl fmt::Display for ViewModel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for (i, (k, v)) in self.0.iter().enumerate() {
            if i > 0 {
                f.write_str(";")?;
            }
            write!(f, "{}={}", escape(k), escape(v))?;
        }
        Ok(())
    }
}

impl<K: Into<String>, V: Into<String>> FromIterator<(K, V)> for ViewModel {
    fn from_iter<I: IntoIterator<Item = (K, V)>>(iter: I) -> Self {
        Self(iter.into_iter().map(|(k, v)| (k.into(), v.into())).collect())
    }
}

fn escape(s: &str) -> String {
    s.replace('\\', "\\\\").replace(';', "\\;").replace('=', "\\=")
}

fn unescape(s: &str) -> String {
    let mut out = String::with_capacity(s.len());
    let mut chars = s.chars();
    while let Some(c) = chars.next() {
        if c == '\\' {
            if let Some(next) = chars.next() {
                out.push(next);
                continue;
            }
        }
        out.push(c);
    }
    out
}

/// Split on `sep` where it is not preceded by an escaping backslash.
/// Escapes are kept in the pieces.
fn split_unescaped(s: &str, sep: char) -> Vec<String> {
    let mut pieces = Vec::new();
    let mut current = String::new();
    let mut chars = s.chars();
    while let Some(c) = chars.next() {
        if c == '\\' {
            current.push(c);
            if let Some(next) = chars.next() {
                current.push(next);
            }
        } else if c == sep {
            pieces.push(std::mem::take(&mut current));
        } else {
            current.push(c);
        }
    }
    pieces.push(current);
    pieces
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn serialises_sorted_pairs() {
        let model = ViewModel::new().with("Lastname", "Gates").with("Firstname", "Bill");
        assert_eq!(model.to_string(), "Firstname=Bill;Lastname=Gates");
    }

    #[test]
    fn escapes_separators() {
        let model = ViewModel::new().with("a;b", "x=y");
        assert_eq!(model.to_string(), "a\\;b=x\\=y");
        assert_eq!(ViewModel::decode(&model.to_string()), model);
    }

    #[test]
    fn decode_skips_incomplete_pairs() {
        let model = ViewModel::decode("a=1;;junk;b=2");
        assert_eq!(model.len(), 2);
        assert_eq!(model.get("a"), Some("1"));
        assert_eq!(model.get("b"), Some("2"));
        assert!(ViewModel::decode("").is_empty());
    }
}
