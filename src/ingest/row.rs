//! Untyped input rows.

use std::collections::HashMap;

/// One structured input row: string values keyed by field name.
///
/// `line` is the 1-based line of the row in its source (0 when the row did
/// not come from a file). It is only used to make errors point somewhere.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Row {
    line: usize,
    fields: HashMap<String, String>,
}

impl Row {
    /// Create an empty row originating from `line`.
    pub fn new(line: usize) -> Self {
        Self {
            line,
            fields: HashMap::new(),
        }
    }

    /// Create a row from `(key, value)` pairs.
    pub fn from_pairs<K, V, I>(line: usize, pairs: I) -> Self
    where
        K: Into<String>,
        V: Into<String>,
        I: IntoIterator<Item = (K, V)>,
    {
        Self {
            line,
            fields: pairs
                .into_iter()
                .map(|(k, v)| (k.into(), v.into()))
                .collect(),
        }
    }

    /// Builder-style insert.
    pub fn with(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.insert(key, value);
        self
    }

    pub fn insert(&mut self, key: impl Into<String>, value: impl Into<String>) {
        self.fields.insert(key.into(), value.into());
    }

    /// Remove a field, returning its value if it was present.
    pub fn remove(&mut self, key: &str) -> Option<String> {
        self.fields.remove(key)
    }

    pub fn get(&self, key: &str) -> Option<&str> {
        self.fields.get(key).map(String::as_str)
    }

    pub fn contains_key(&self, key: &str) -> bool {
        self.fields.contains_key(key)
    }

    pub fn keys(&self) -> impl Iterator<Item = &str> {
        self.fields.keys().map(String::as_str)
    }

    pub fn line(&self) -> usize {
        self.line
    }

    pub fn len(&self) -> usize {
        self.fields.len()
    }

    pub fn is_empty(&self) -> bool {
        self.fields.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_builder_and_lookup() {
        let row = Row::new(3).with("step", "4").with("track_id", "7");
        assert_eq!(row.line(), 3);
        assert_eq!(row.get("step"), Some("4"));
        assert_eq!(row.get("track_id"), Some("7"));
        assert_eq!(row.get("x"), None);
        assert_eq!(row.len(), 2);
    }

    #[test]
    fn test_from_pairs_and_remove() {
        let mut row = Row::from_pairs(2, [("a", "1"), ("b", "2")]);
        assert!(row.contains_key("a"));
        assert_eq!(row.remove("a").as_deref(), Some("1"));
        assert!(!row.contains_key("a"));

        let mut keys: Vec<&str> = row.keys().collect();
        keys.sort_unstable();
        assert_eq!(keys, vec!["b"]);
    }
}
