//! Weighted preference headers (`Accept`, `Accept-Language`, ...).
//!
//! Values are comma separated entries, each a token optionally followed by
//! `;`-separated parameters. The `q=` parameter sets the entry's weight,
//! which defaults to `1.0`. Tokens sharing an exact weight are grouped.

use crate::http::error::HeaderParseError;

/// Tokens that share one weight.
#[derive(Debug, Clone, PartialEq)]
pub struct QualityGroup {
    pub weight: f32,
    pub values: Vec<String>,
}

/// Accumulates one or more raw occurrences of a weighted header.
#[derive(Debug, Clone, PartialEq)]
pub struct QualityValueParser {
    unique: bool,
    fold_case: bool,
    groups: Vec<QualityGroup>,
    values: Vec<String>,
    best: Option<String>,
}

impl Default for QualityValueParser {
    fn default() -> Self {
        Self {
            unique: true,
            fold_case: false,
            groups: Vec::new(),
            values: Vec::new(),
            best: None,
        }
    }
}

impl QualityValueParser {
    pub fn new() -> Self {
        Self::default()
    }

    /// Keep duplicate tokens instead of collapsing them (default: collapse).
    pub fn unique(mut self, unique: bool) -> Self {
        self.unique = unique;
        self
    }

    /// Lower-case tokens before storing them (default: off).
    pub fn fold_case(mut self, fold_case: bool) -> Self {
        self.fold_case = fold_case;
        self
    }

    /// Merges one raw header value into the result.
    ///
    /// An empty value is a no-op. On a malformed weight nothing from `raw`
    /// is merged.
    pub fn load(&mut self, raw: &str) -> Result<(), HeaderParseError> {
        if raw.trim().is_empty() {
            return Ok(());
        }

        let mut parsed = Vec::new();
        for entry in raw.split(',') {
            let mut parts = entry.split(';');
            let token = parts.next().unwrap_or_default().trim();
            if token.is_empty() {
                continue;
            }

            let mut weight = 1.0;
            for param in parts {
                if let Some((key, q)) = param.trim().split_once('=')
                    && key.trim().eq_ignore_ascii_case("q")
                {
                    weight = parse_weight(q)?;
                }
            }

            let token = if self.fold_case {
                token.to_ascii_lowercase()
            } else {
                token.to_string()
            };
            parsed.push((weight, token));
        }

        for (weight, token) in parsed {
            self.merge(weight, token);
        }
        self.best = self.rank_best();

        Ok(())
    }

    fn merge(&mut self, weight: f32, token: String) {
        let unique = self.unique;
        let group = match self.groups.iter().position(|g| g.weight == weight) {
            Some(idx) => &mut self.groups[idx],
            None => {
                self.groups.push(QualityGroup {
                    weight,
                    values: Vec::new(),
                });
                let last = self.groups.len() - 1;
                &mut self.groups[last]
            }
        };

        if !unique || !group.values.contains(&token) {
            group.values.push(token.clone());
        }
        if !unique || !self.values.contains(&token) {
            self.values.push(token);
        }
    }

    fn rank_best(&self) -> Option<String> {
        self.groups
            .iter()
            .filter(|g| !g.values.is_empty())
            .max_by(|a, b| a.weight.total_cmp(&b.weight))
            .and_then(|g| g.values.first().cloned())
    }

    /// First token of the highest weighted group, `None` if nothing loaded.
    pub fn best(&self) -> Option<&str> {
        self.best.as_deref()
    }

    /// Every token seen, in first-seen order.
    pub fn values(&self) -> &[String] {
        &self.values
    }

    pub fn groups(&self) -> &[QualityGroup] {
        &self.groups
    }

    /// Tokens stored under exactly `weight`.
    pub fn group(&self, weight: f32) -> Option<&[String]> {
        self.groups
            .iter()
            .find(|g| g.weight == weight)
            .map(|g| g.values.as_slice())
    }

    pub fn contains(&self, token: &str) -> bool {
        self.values.iter().any(|v| v == token)
    }

    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }
}

fn parse_weight(raw: &str) -> Result<f32, HeaderParseError> {
    raw.trim()
        .parse::<f32>()
        .ok()
        .filter(|w| w.is_finite())
        .ok_or_else(|| HeaderParseError::InvalidQuality(raw.to_string()))
}
