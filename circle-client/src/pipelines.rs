//! Pipeline-related API endpoints

use crate::HttpCircleClient;
use crate::error::Result;
use circle_core::domain::{Pipeline, ProjectSlug, Workflow};

impl HttpCircleClient {
    // =============================================================================
    // Pipeline Lookup
    // =============================================================================

    /// Get a pipeline by its number within a project
    ///
    /// # Arguments
    /// * `project` - Project coordinates
    /// * `pipeline_number` - The sequential pipeline number shown in the UI
    ///
    /// # Returns
    /// The pipeline, including its ID
    pub async fn get_pipeline(&self, project: &ProjectSlug, pipeline_number: u64) -> Result<Pipeline> {
        let number = pipeline_number.to_string();
        let url = self.endpoint(&[
            "api",
            "v2",
            "project",
            &project.project_type,
            &project.org,
            &project.project,
            "pipeline",
            &number,
        ])?;
        let response = self.get(url).send().await?;

        self.handle_response(response).await
    }

    /// List all workflows of a pipeline
    ///
    /// Reruns show up as separate workflows sharing a name.
    ///
    /// # Arguments
    /// * `pipeline_id` - The pipeline ID
    ///
    /// # Returns
    /// Every workflow across all pages
    pub async fn list_pipeline_workflows(&self, pipeline_id: &str) -> Result<Vec<Workflow>> {
        let url = self.endpoint(&["api", "v2", "pipeline", pipeline_id, "workflow"])?;

        self.get_all_pages(url).await
    }
}
