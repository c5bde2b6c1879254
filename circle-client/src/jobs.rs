//! Job detail endpoints
//!
//! Step and action data is only exposed by the v1.1 API.

use crate::HttpCircleClient;
use crate::error::{ClientError, Result};
use circle_core::domain::{JobAction, JobDetails, OutputMessage, ProjectSlug};
use reqwest::Url;

impl HttpCircleClient {
    /// Get step details for a job
    ///
    /// # Arguments
    /// * `project` - Project coordinates
    /// * `job_number` - The job number within the project
    ///
    /// # Returns
    /// The job's steps and actions; `NotFound` while the job has not run yet
    pub async fn get_job_details(&self, project: &ProjectSlug, job_number: u64) -> Result<JobDetails> {
        let number = job_number.to_string();
        let url = self.endpoint(&[
            "api",
            "v1.1",
            "project",
            &project.project_type,
            &project.org,
            &project.project,
            &number,
        ])?;
        let response = self.get(url).send().await?;

        self.handle_response(response).await
    }

    /// Get the captured output of an action
    ///
    /// `output_url` points at pre-signed storage, so no credentials are sent.
    ///
    /// # Arguments
    /// * `action` - The action whose output to download
    pub async fn get_action_output(&self, action: &JobAction) -> Result<Vec<OutputMessage>> {
        let output_url = action.output_url.as_deref().ok_or_else(|| {
            ClientError::InvalidRequest(format!("action '{}' has no output URL", action.name))
        })?;
        let url = Url::parse(output_url).map_err(|e| {
            ClientError::InvalidRequest(format!("invalid output URL '{}': {}", output_url, e))
        })?;
        let response = self.client.get(url).send().await?;

        self.handle_response(response).await
    }
}
