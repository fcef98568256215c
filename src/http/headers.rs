//! HTTP headers handling
//!
//! Headers are kept as a small insertion-ordered map: names are stored with
//! the case they were received in, lookups ignore ASCII case, and each name
//! appears at most once. The `MAX_HEADERS` cap is enforced by the parsers
//! that fill a `Headers`, which reject the whole message instead of dropping
//! fields.

use super::{Error, Result};
use std::fmt;

/// HTTP headers collection
///
/// Inserting a name that is already present replaces its value (and adopts
/// the new spelling of the name), so keys stay unique.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Headers {
    headers: Vec<(String, String)>,
}

impl Headers {
    /// Create a new empty headers collection
    pub fn new() -> Self {
        Headers {
            headers: Vec::new(),
        }
    }

    /// Insert a header, replacing any existing value for the same name
    pub fn insert(&mut self, name: impl Into<String>, value: impl Into<String>) {
        let name = name.into();
        let value = value.into();

        if let Some(slot) = self
            .headers
            .iter_mut()
            .find(|(n, _)| n.eq_ignore_ascii_case(&name))
        {
            *slot = (name, value);
            return;
        }

        self.headers.push((name, value));
    }

    /// Get the value for a header (case-insensitive)
    pub fn get(&self, name: &str) -> Option<&str> {
        self.headers
            .iter()
            .find(|(n, _)| n.eq_ignore_ascii_case(name))
            .map(|(_, v)| v.as_str())
    }

    /// Get the number of headers
    pub fn len(&self) -> usize {
        self.headers.len()
    }

    /// Check if there are no headers
    pub fn is_empty(&self) -> bool {
        self.headers.is_empty()
    }

    /// Iterate over all headers
    pub fn iter(&self) -> impl Iterator<Item = (&str, &str)> {
        self.headers.iter().map(|(n, v)| (n.as_str(), v.as_str()))
    }

    /// Parse a `Name: Value` line, splitting once on the first `": "`
    pub fn parse_header_line(line: &str) -> Result<(String, String)> {
        match line.split_once(": ") {
            Some(("", _)) => Err(Error::InvalidHeader("Empty header name".to_string())),
            Some((name, value)) => Ok((name.to_string(), value.to_string())),
            None => Err(Error::InvalidHeader(format!("No separator in header: {}", line))),
        }
    }
}

impl fmt::Display for Headers {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for (name, value) in &self.headers {
            writeln!(f, "{}: {}", name, value)?;
        }
        Ok(())
    }
}
