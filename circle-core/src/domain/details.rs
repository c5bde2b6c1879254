//! Job detail types
//!
//! Step and action data returned by the v1.1 job endpoint. Only fetched when
//! failure output is requested.

use serde::{Deserialize, Serialize};

/// Details for a single job
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct JobDetails {
    #[serde(default)]
    pub steps: Vec<JobStep>,
}

impl JobDetails {
    /// Iterates over every failed action together with the step it belongs to
    pub fn failed_actions(&self) -> impl Iterator<Item = (&JobStep, &JobAction)> {
        self.steps.iter().flat_map(|step| {
            step.actions
                .iter()
                .filter(|action| action.failed)
                .map(move |action| (step, action))
        })
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct JobStep {
    pub name: String,
    #[serde(default)]
    pub actions: Vec<JobAction>,
}

/// A single action in a step; the unit that carries a failure flag and output
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct JobAction {
    pub name: String,
    // CircleCI sends `null` rather than `false` for actions that did not fail
    #[serde(default, deserialize_with = "null_as_false")]
    pub failed: bool,
    #[serde(default)]
    pub has_output: bool,
    #[serde(default)]
    pub output_url: Option<String>,
}

/// One captured line of action output
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct OutputMessage {
    pub message: String,
    #[serde(rename = "type")]
    pub message_type: String,
    pub time: String,
}

/// Joins messages in order into the action's full output
pub fn concat_output(messages: &[OutputMessage]) -> String {
    messages.iter().map(|m| m.message.as_str()).collect()
}

fn null_as_false<'de, D>(deserializer: D) -> Result<bool, D::Error>
where
    D: serde::Deserializer<'de>,
{
    Ok(Option::<bool>::deserialize(deserializer)?.unwrap_or(false))
}
