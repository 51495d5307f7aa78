//! # Subject Filters
//!
//! Receive-side filtering of bus traffic by subject name.

use shared_types::Message;

/// Filter for subscribing to specific subjects.
#[derive(Debug, Clone, Default)]
pub struct SubjectFilter {
    /// Subjects to include. Empty means all subjects.
    pub subjects: Vec<String>,
}

impl SubjectFilter {
    /// Create a filter that accepts every message.
    #[must_use]
    pub fn all() -> Self {
        Self::default()
    }

    /// Create a filter for one subject.
    #[must_use]
    pub fn subject(subject: impl Into<String>) -> Self {
        Self {
            subjects: vec![subject.into()],
        }
    }

    /// Create a filter for several subjects.
    #[must_use]
    pub fn subjects(subjects: Vec<String>) -> Self {
        Self { subjects }
    }

    /// Check if a message matches this filter.
    #[must_use]
    pub fn matches(&self, message: &Message) -> bool {
        self.subjects.is_empty() || self.subjects.iter().any(|s| s == message.subject())
    }
}
