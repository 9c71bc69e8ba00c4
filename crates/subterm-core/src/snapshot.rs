use serde::{Deserialize, Serialize};

/// Structured view of a page snapshot or screenshot result, produced by
/// `subterm-snapshot` and consumed by checkpoint predicates and service
/// config predicates. `url` and `title` are always strings, never absent;
/// an unparsed snapshot yields empty strings rather than `None`.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct NormalizedSnapshot {
    pub url: String,
    pub title: String,
    pub content: String,
    pub screenshot_path: Option<String>,
}

impl NormalizedSnapshot {
    #[must_use]
    pub fn empty() -> Self {
        Self::default()
    }
}
