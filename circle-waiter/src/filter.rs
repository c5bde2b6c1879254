//! Workflow and job selection
//!
//! Pure functions that reduce raw listings to what the caller asked about.

use circle_core::domain::{Job, Workflow};
use std::collections::{BTreeSet, HashMap, HashSet};

/// Collapses reruns so only the latest attempt of each workflow name remains
///
/// Survivors are ordered latest first. When two attempts share a creation
/// time the one listed first wins.
pub fn deduplicate(workflows: Vec<Workflow>) -> Vec<Workflow> {
    let mut survivors: Vec<Workflow> = Vec::new();
    let mut by_name: HashMap<String, usize> = HashMap::new();

    for workflow in workflows {
        match by_name.get(&workflow.name) {
            Some(&index) => {
                if workflow.created_at > survivors[index].created_at {
                    survivors[index] = workflow;
                }
            }
            None => {
                by_name.insert(workflow.name.clone(), survivors.len());
                survivors.push(workflow);
            }
        }
    }

    survivors.sort_by(|a, b| b.created_at.cmp(&a.created_at));
    survivors
}

/// Selects workflows by exact name; an empty filter keeps everything
#[derive(Debug, Clone, Default)]
pub struct WorkflowFilter {
    keep_names: BTreeSet<String>,
}

impl WorkflowFilter {
    pub fn new<I, S>(keep_names: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            keep_names: keep_names.into_iter().map(Into::into).collect(),
        }
    }

    pub fn matches(&self, workflow: &Workflow) -> bool {
        self.keep_names.is_empty() || self.keep_names.contains(&workflow.name)
    }

    /// Number of distinct workflow names explicitly requested
    pub fn requested(&self) -> usize {
        self.keep_names.len()
    }
}

/// Selects jobs by name prefix, minus explicitly excluded names
///
/// Exclusion always wins over a matching prefix.
#[derive(Debug, Clone, Default)]
pub struct JobFilter {
    exclude_names: HashSet<String>,
    prefixes: Vec<String>,
}

impl JobFilter {
    pub fn new<E, P, S>(exclude_names: E, prefixes: P) -> Self
    where
        E: IntoIterator<Item = S>,
        P: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            exclude_names: exclude_names.into_iter().map(Into::into).collect(),
            prefixes: prefixes.into_iter().map(Into::into).collect(),
        }
    }

    pub fn matches(&self, job: &Job) -> bool {
        let prefix_ok = self.prefixes.is_empty()
            || self.prefixes.iter().any(|prefix| job.name.starts_with(prefix.as_str()));

        prefix_ok && !self.exclude_names.contains(&job.name)
    }
}
