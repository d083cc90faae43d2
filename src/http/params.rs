//! Compound header values such as `Content-Type` or `Content-Disposition`.
//!
//! The value is split on the literal `"; "`. Parts containing `=` become
//! parameters (key lower-cased, later keys overwrite earlier ones); the
//! rest are bare tokens. A quoted parameter value that itself contains
//! `"; "` is split like any other and comes out truncated.

use indexmap::IndexMap;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MultiParameterParser {
    unique: bool,
    fold_case: bool,
    params: IndexMap<String, String>,
    tokens: Vec<String>,
}

impl Default for MultiParameterParser {
    fn default() -> Self {
        Self {
            unique: true,
            fold_case: false,
            params: IndexMap::new(),
            tokens: Vec::new(),
        }
    }
}

impl MultiParameterParser {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn unique(mut self, unique: bool) -> Self {
        self.unique = unique;
        self
    }

    /// Lower-case bare tokens before storing them.
    pub fn fold_case(mut self, fold_case: bool) -> Self {
        self.fold_case = fold_case;
        self
    }

    pub fn load(&mut self, raw: &str) {
        if raw.is_empty() {
            return;
        }

        for part in raw.split("; ") {
            match part.split_once('=') {
                Some((key, value)) => {
                    self.params.insert(key.to_ascii_lowercase(), value.to_string());
                }
                None => {
                    let token = if self.fold_case {
                        part.to_ascii_lowercase()
                    } else {
                        part.to_string()
                    };
                    if !self.unique || !self.tokens.contains(&token) {
                        self.tokens.push(token);
                    }
                }
            }
        }
    }

    /// Raw value of parameter `key` (matched lower-cased).
    pub fn param(&self, key: &str) -> Option<&str> {
        self.params
            .get(&key.to_ascii_lowercase())
            .map(String::as_str)
    }

    /// Like [`param`](Self::param) with one pair of surrounding double quotes removed.
    pub fn param_unquoted(&self, key: &str) -> Option<&str> {
        self.param(key).map(|value| {
            value
                .strip_prefix('"')
                .and_then(|v| v.strip_suffix('"'))
                .unwrap_or(value)
        })
    }

    pub fn params(&self) -> &IndexMap<String, String> {
        &self.params
    }

    pub fn tokens(&self) -> &[String] {
        &self.tokens
    }

    pub fn has_token(&self, token: &str) -> bool {
        self.tokens.iter().any(|t| t == token)
    }

    pub fn is_empty(&self) -> bool {
        self.params.is_empty() && self.tokens.is_empty()
    }
}
