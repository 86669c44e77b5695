//! Field-level validation issues

use serde::{Deserialize, Serialize};
use std::fmt;

/// A single validation failure at a dotted JSON path
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SchemaIssue {
    /// Dotted path to the offending field (e.g. `workout.exercises.0.sets`)
    pub path: String,
    /// Human-readable description
    pub message: String,
}

impl SchemaIssue {
    /// Create a new issue
    pub fn new(path: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            path: path.into(),
            message: message.into(),
        }
    }
}

impl fmt::Display for SchemaIssue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.path.is_empty() {
            write!(f, "{}", self.message)
        } else {
            write!(f, "{}: {}", self.path, self.message)
        }
    }
}

/// Ordered collection of validation issues
///
/// Serializes as a plain JSON array, which is the `details` field of the
/// error object returned to HTTP callers.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct SchemaIssues(Vec<SchemaIssue>);

impl SchemaIssues {
    /// Record an issue
    pub fn push(&mut self, issue: SchemaIssue) {
        self.0.push(issue);
    }

    /// Record an issue from its parts
    pub fn add(&mut self, path: impl Into<String>, message: impl Into<String>) {
        self.push(SchemaIssue::new(path, message));
    }

    /// Append every issue from another collection
    pub fn extend(&mut self, other: SchemaIssues) {
        self.0.extend(other.0);
    }

    /// True when nothing was recorded
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// Number of recorded issues
    pub fn len(&self) -> usize {
        self.0.len()
    }

    /// Iterate over recorded issues
    pub fn iter(&self) -> std::slice::Iter<'_, SchemaIssue> {
        self.0.iter()
    }

    /// True if any issue points at exactly `path`
    pub fn mentions(&self, path: &str) -> bool {
        self.0.iter().any(|issue| issue.path == path)
    }
}

impl fmt::Display for SchemaIssues {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let joined = self
            .0
            .iter()
            .map(ToString::to_string)
            .collect::<Vec<_>>()
            .join("; ");
        write!(f, "{}", joined)
    }
}

impl From<Vec<SchemaIssue>> for SchemaIssues {
    fn from(issues: Vec<SchemaIssue>) -> Self {
        Self(issues)
    }
}
