//! Paginated list responses

use serde::{Deserialize, Serialize};

/// One page of a v2 list endpoint
///
/// A missing or empty `next_page_token` marks the last page.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Page<T> {
    pub items: Vec<T>,
    #[serde(default)]
    pub next_page_token: Option<String>,
}

impl<T> Page<T> {
    /// Token for the following page, if there is one
    pub fn next_token(&self) -> Option<&str> {
        self.next_page_token.as_deref().filter(|t| !t.is_empty())
    }
}
