//! Workflow-related API endpoints

use crate::HttpCircleClient;
use crate::error::Result;
use circle_core::domain::Job;

impl HttpCircleClient {
    /// List all jobs of a workflow
    ///
    /// # Arguments
    /// * `workflow_id` - The workflow ID
    ///
    /// # Returns
    /// Every job across all pages
    pub async fn list_workflow_jobs(&self, workflow_id: &str) -> Result<Vec<Job>> {
        let url = self.endpoint(&["api", "v2", "workflow", workflow_id, "job"])?;

        self.get_all_pages(url).await
    }
}
