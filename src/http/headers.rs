//! Case-insensitive, order-preserving, multi-valued header storage.
//!
//! Shared by [`RequestHead`](crate::http::request::RequestHead),
//! [`ResponseHead`](crate::http::response::ResponseHead) and multipart parts.
//!
//! Header names are matched ignoring ASCII case, but the casing used the
//! first time a name was inserted is the one kept for serialization.
//! Distinct names keep their insertion order.

use indexmap::IndexMap;

#[derive(Debug, Clone, PartialEq, Eq)]
struct HeaderEntry {
    name: String,
    values: Vec<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct HeaderMap {
    // keyed by the lower-cased name
    entries: IndexMap<String, HeaderEntry>,
}

impl HeaderMap {
    pub fn new() -> Self {
        Self::default()
    }

    /// Appends `value` to the values of `key`.
    ///
    /// Creates the entry, with `key`'s casing, if no name matches.
    pub fn add(&mut self, key: impl Into<String>, value: impl Into<String>) {
        let key = key.into();
        self.entries
            .entry(key.to_ascii_lowercase())
            .or_insert_with(|| HeaderEntry {
                name: key,
                values: Vec::new(),
            })
            .values
            .push(value.into());
    }

    /// Replaces every value of `key` with `values`.
    ///
    /// An existing entry keeps its original casing and position.
    pub fn set<I, V>(&mut self, key: impl Into<String>, values: I)
    where
        I: IntoIterator<Item = V>,
        V: Into<String>,
    {
        let key = key.into();
        let values = values.into_iter().map(Into::into).collect();
        match self.entries.get_mut(&key.to_ascii_lowercase()) {
            Some(entry) => entry.values = values,
            None => {
                self.entries
                    .insert(key.to_ascii_lowercase(), HeaderEntry { name: key, values });
            }
        }
    }

    /// First value stored under `key`.
    pub fn get(&self, key: &str) -> Option<&str> {
        self.get_all(key)
            .and_then(|values| values.first())
            .map(String::as_str)
    }

    /// Every value stored under `key`, in insertion order.
    pub fn get_all(&self, key: &str) -> Option<&[String]> {
        self.entries
            .get(&key.to_ascii_lowercase())
            .map(|entry| entry.values.as_slice())
    }

    pub fn contains(&self, key: &str) -> bool {
        self.entries.contains_key(&key.to_ascii_lowercase())
    }

    pub fn remove(&mut self, key: &str) -> Option<Vec<String>> {
        self.entries
            .shift_remove(&key.to_ascii_lowercase())
            .map(|entry| entry.values)
    }

    /// Number of distinct header names.
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Iterates `(name, values)` with the first-seen casing of each name.
    pub fn iter(&self) -> impl Iterator<Item = (&str, &[String])> {
        self.entries
            .values()
            .map(|entry| (entry.name.as_str(), entry.values.as_slice()))
    }

    /// Parses `Name: value` lines into a map.
    ///
    /// Blank lines are skipped; `\r` is ignored.
    pub fn from_lines<'a>(lines: impl IntoIterator<Item = &'a str>) -> Self {
        let mut map = Self::new();
        for line in lines {
            map.add_line(line);
        }
        map
    }

    pub(crate) fn add_line(&mut self, line: &str) {
        let line = line.trim_end_matches('\r');
        if line.is_empty() {
            return;
        }
        let (key, value) = split_header_line(line);
        self.add(key, value);
    }
}

/// Splits at the first `": "`; a line without one is all key.
pub(crate) fn split_header_line(line: &str) -> (&str, &str) {
    line.split_once(": ").unwrap_or((line, ""))
}
