//! Ordered clause lists for terms and remarks
//!
//! Stored on the document as newline-joined text, edited as a list.

use serde::{Deserialize, Serialize};

/// Ordered list of single-line clauses
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ClauseList {
    items: Vec<String>,
}

impl ClauseList {
    /// Empty list
    #[inline]
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Parse stored text; blank lines are dropped
    #[must_use]
    pub fn parse(text: &str) -> Self {
        Self {
            items: text
                .lines()
                .map(str::trim)
                .filter(|line| !line.is_empty())
                .map(str::to_string)
                .collect(),
        }
    }

    /// Stored text form
    #[must_use]
    pub fn to_text(&self) -> String {
        self.items.join("\n")
    }

    /// Clauses in order
    #[inline]
    #[must_use]
    pub fn items(&self) -> &[String] {
        &self.items
    }

    /// Number of clauses
    #[inline]
    #[must_use]
    pub fn len(&self) -> usize {
        self.items.len()
    }

    /// No clauses
    #[inline]
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    /// Append a clause; blank input is ignored
    pub fn add(&mut self, clause: &str) -> bool {
        match normalize(clause) {
            Some(clause) => {
                self.items.push(clause);
                true
            }
            None => false,
        }
    }

    /// Replace the clause at `index`; blank input removes it
    pub fn update(&mut self, index: usize, clause: &str) -> bool {
        if index >= self.items.len() {
            return false;
        }
        match normalize(clause) {
            Some(clause) => self.items[index] = clause,
            None => {
                self.items.remove(index);
            }
        }
        true
    }

    /// Remove the clause at `index`
    pub fn remove(&mut self, index: usize) -> Option<String> {
        (index < self.items.len()).then(|| self.items.remove(index))
    }
}

/// A clause is a single trimmed line
fn normalize(clause: &str) -> Option<String> {
    let joined = clause.split_whitespace().collect::<Vec<_>>().join(" ");
    (!joined.is_empty()).then_some(joined)
}
