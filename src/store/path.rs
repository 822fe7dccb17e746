//! Slash-separated document paths: `collection/doc/collection/doc`.

use crate::errors::{AppError, AppResult};
use std::fmt;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DocPath {
    segments: Vec<String>,
}

impl DocPath {
    /// Parse and validate a document path. A document path has an even,
    /// non-zero number of non-empty segments.
    pub fn parse(raw: &str) -> AppResult<Self> {
        let trimmed = raw.trim().trim_matches('/');
        let segments: Vec<String> = trimmed.split('/').map(str::to_string).collect();

        if trimmed.is_empty() || segments.iter().any(|s| s.trim().is_empty()) {
            return Err(AppError::InvalidPath(raw.to_string()));
        }
        if segments.len() % 2 != 0 {
            return Err(AppError::InvalidPath(format!(
                "{raw} (a document path needs an even number of segments)"
            )));
        }

        Ok(Self { segments })
    }

    pub fn full(&self) -> String {
        self.segments.join("/")
    }

    /// Parent collection path.
    pub fn collection(&self) -> String {
        self.segments[..self.segments.len() - 1].join("/")
    }

    /// Name of the parent collection (last collection segment).
    pub fn collection_group(&self) -> &str {
        &self.segments[self.segments.len() - 2]
    }

    pub fn id(&self) -> &str {
        &self.segments[self.segments.len() - 1]
    }
}

impl fmt::Display for DocPath {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.full())
    }
}
