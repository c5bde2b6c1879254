//! In-memory CircleCI client
//!
//! Serves canned responses for tests. Workflow and job listings can be
//! queued as successive snapshots so a test can script how a pipeline
//! progresses between polls; the last snapshot keeps being returned once the
//! queue is drained.

use async_trait::async_trait;
use circle_core::domain::{Job, JobAction, JobDetails, OutputMessage, ProjectSlug, Workflow};
use std::collections::{HashMap, VecDeque};
use std::sync::Mutex;

use crate::error::{ClientError, Result};
use crate::CircleClient;

/// Canned-response implementation of [`CircleClient`]
pub struct InMemoryCircleClient {
    project: ProjectSlug,
    state: Mutex<State>,
}

#[derive(Default)]
struct State {
    pipelines: HashMap<u64, String>,
    workflows: HashMap<String, VecDeque<Vec<Workflow>>>,
    jobs: HashMap<String, VecDeque<Vec<Job>>>,
    job_details: HashMap<u64, std::result::Result<JobDetails, u16>>,
    outputs: HashMap<String, Vec<OutputMessage>>,
    workflow_list_calls: usize,
    job_list_calls: usize,
}

impl InMemoryCircleClient {
    /// Creates a client that only answers for `project`
    pub fn new(project: ProjectSlug) -> Self {
        Self {
            project,
            state: Mutex::new(State::default()),
        }
    }

    pub fn add_pipeline(&self, number: u64, id: impl Into<String>) {
        self.state().pipelines.insert(number, id.into());
    }

    /// Queues a workflow listing for a pipeline
    pub fn add_workflows(&self, pipeline_id: impl Into<String>, workflows: Vec<Workflow>) {
        self.state()
            .workflows
            .entry(pipeline_id.into())
            .or_default()
            .push_back(workflows);
    }

    /// Queues a job listing for a workflow
    pub fn add_jobs(&self, workflow_id: impl Into<String>, jobs: Vec<Job>) {
        self.state()
            .jobs
            .entry(workflow_id.into())
            .or_default()
            .push_back(jobs);
    }

    pub fn add_job_details(&self, job_number: u64, details: JobDetails) {
        self.state().job_details.insert(job_number, Ok(details));
    }

    /// Makes `job_details` fail with the given HTTP status for a job
    pub fn fail_job_details(&self, job_number: u64, status: u16) {
        self.state().job_details.insert(job_number, Err(status));
    }

    /// Registers output for the action's `output_url`
    pub fn add_action_output(&self, output_url: impl Into<String>, messages: Vec<OutputMessage>) {
        self.state().outputs.insert(output_url.into(), messages);
    }

    /// Number of workflow listings served so far
    pub fn workflow_list_calls(&self) -> usize {
        self.state().workflow_list_calls
    }

    /// Number of job listings served so far
    pub fn job_list_calls(&self) -> usize {
        self.state().job_list_calls
    }

    fn state(&self) -> std::sync::MutexGuard<'_, State> {
        self.state.lock().unwrap_or_else(|poisoned| poisoned.into_inner())
    }

    fn check_project(&self, project: &ProjectSlug) -> Result<()> {
        if *project != self.project {
            return Err(ClientError::NotFound(format!("project {}", project)));
        }
        Ok(())
    }
}

/// Pops the next snapshot, keeping the last one in place
fn next_snapshot<T: Clone>(queue: &mut VecDeque<Vec<T>>) -> Vec<T> {
    if queue.len() > 1 {
        queue.pop_front().unwrap_or_default()
    } else {
        queue.front().cloned().unwrap_or_default()
    }
}

#[async_trait]
impl CircleClient for InMemoryCircleClient {
    async fn pipeline_id(&self, project: &ProjectSlug, pipeline_number: u64) -> Result<String> {
        self.check_project(project)?;
        self.state()
            .pipelines
            .get(&pipeline_number)
            .cloned()
            .ok_or_else(|| ClientError::NotFound(format!("pipeline {}", pipeline_number)))
    }

    async fn workflows(&self, pipeline_id: &str) -> Result<Vec<Workflow>> {
        let mut state = self.state();
        state.workflow_list_calls += 1;
        state
            .workflows
            .get_mut(pipeline_id)
            .map(next_snapshot)
            .ok_or_else(|| ClientError::NotFound(format!("pipeline {}", pipeline_id)))
    }

    async fn workflow_jobs(&self, workflow_id: &str) -> Result<Vec<Job>> {
        let mut state = self.state();
        state.job_list_calls += 1;
        state
            .jobs
            .get_mut(workflow_id)
            .map(next_snapshot)
            .ok_or_else(|| ClientError::NotFound(format!("workflow {}", workflow_id)))
    }

    async fn job_details(&self, project: &ProjectSlug, job_number: u64) -> Result<JobDetails> {
        self.check_project(project)?;
        match self.state().job_details.get(&job_number) {
            Some(Ok(details)) => Ok(details.clone()),
            Some(Err(404)) | None => Err(ClientError::NotFound(format!("job {}", job_number))),
            Some(Err(status)) => Err(ClientError::api_error(*status, "canned failure")),
        }
    }

    async fn action_output(&self, action: &JobAction) -> Result<Vec<OutputMessage>> {
        let url = action.output_url.as_deref().unwrap_or_default();
        self.state()
            .outputs
            .get(url)
            .cloned()
            .ok_or_else(|| ClientError::api_error(403, format!("no output at '{}'", url)))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use circle_core::domain::{JobStatus, WorkflowStatus};

    fn project() -> ProjectSlug {
        ProjectSlug::new("github", "influxdata", "testproject")
    }

    fn workflow(id: &str, status: &str) -> Workflow {
        Workflow {
            id: id.to_string(),
            name: "build".to_string(),
            status: WorkflowStatus::from(status),
            created_at: "2021-01-01T00:00:00Z".parse().unwrap(),
            stopped_at: None,
            pipeline_number: None,
        }
    }

    #[tokio::test]
    async fn test_snapshots_advance_and_stick() {
        let client = InMemoryCircleClient::new(project());
        client.add_workflows("p", vec![workflow("w", "running")]);
        client.add_workflows("p", vec![workflow("w", "success")]);

        let first = client.workflows("p").await.unwrap();
        let second = client.workflows("p").await.unwrap();
        let third = client.workflows("p").await.unwrap();

        assert_eq!(first[0].status, WorkflowStatus::Running);
        assert_eq!(second[0].status, WorkflowStatus::Success);
        assert_eq!(third[0].status, WorkflowStatus::Success);
        assert_eq!(client.workflow_list_calls(), 3);
    }

    #[tokio::test]
    async fn test_unknown_project_is_not_found() {
        let client = InMemoryCircleClient::new(project());
        client.add_pipeline(1, "p");

        let other = ProjectSlug::new("github", "influxdata", "other");
        assert!(client.pipeline_id(&other, 1).await.unwrap_err().is_not_found());
        assert_eq!(client.pipeline_id(&project(), 1).await.unwrap(), "p");
    }

    #[tokio::test]
    async fn test_job_details_failures() {
        let client = InMemoryCircleClient::new(project());
        client.fail_job_details(1, 404);
        client.fail_job_details(2, 500);

        assert!(client.job_details(&project(), 1).await.unwrap_err().is_not_found());
        assert!(client.job_details(&project(), 3).await.unwrap_err().is_not_found());

        let err = client.job_details(&project(), 2).await.unwrap_err();
        assert_eq!(err.status(), Some(500));
    }

    #[tokio::test]
    async fn test_jobs_listing() {
        let client = InMemoryCircleClient::new(project());
        client.add_jobs(
            "w",
            vec![Job {
                id: Some("j".to_string()),
                job_number: Some(5),
                name: "test".to_string(),
                status: JobStatus::Running,
            }],
        );

        assert_eq!(client.workflow_jobs("w").await.unwrap().len(), 1);
        assert!(client.workflow_jobs("missing").await.is_err());
        assert_eq!(client.job_list_calls(), 2);
    }
}
