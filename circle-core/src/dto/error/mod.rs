//! Error response bodies

use serde::{Deserialize, Serialize};

/// Body CircleCI sends with most non-2xx responses
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ApiErrorBody {
    #[serde(default)]
    pub message: Option<String>,
}
