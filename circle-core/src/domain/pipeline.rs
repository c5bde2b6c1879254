//! Pipeline domain types

use serde::{Deserialize, Serialize};
use std::fmt;

/// Coordinates of a CircleCI project
///
/// `project_type` is the VCS slug CircleCI uses in URLs (e.g. "github",
/// "bitbucket" or "gh").
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ProjectSlug {
    pub project_type: String,
    pub org: String,
    pub project: String,
}

impl ProjectSlug {
    pub fn new(
        project_type: impl Into<String>,
        org: impl Into<String>,
        project: impl Into<String>,
    ) -> Self {
        Self {
            project_type: project_type.into(),
            org: org.into(),
            project: project.into(),
        }
    }
}

impl fmt::Display for ProjectSlug {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}/{}/{}", self.project_type, self.org, self.project)
    }
}

/// A single triggered pipeline, as returned by the pipeline lookup endpoint
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Pipeline {
    pub id: String,
    #[serde(default)]
    pub number: Option<u64>,
}
