//! Shared fixtures for unit tests

use circle_client::InMemoryCircleClient;
use circle_core::domain::{Job, JobStatus, ProjectSlug, Workflow, WorkflowStatus};

pub(crate) const PIPELINE_ID: &str = "pipeline-123";
pub(crate) const PIPELINE_NUMBER: u64 = 123;

pub(crate) fn project() -> ProjectSlug {
    ProjectSlug::new("github", "influxdata", "testproject")
}

pub(crate) fn workflow(id: &str, name: &str, status: &str, created_at: &str) -> Workflow {
    Workflow {
        id: id.to_string(),
        name: name.to_string(),
        status: WorkflowStatus::from(status),
        created_at: created_at.parse().unwrap(),
        stopped_at: None,
        pipeline_number: Some(PIPELINE_NUMBER),
    }
}

pub(crate) fn job(name: &str, status: &str, job_number: Option<u64>) -> Job {
    Job {
        id: job_number.map(|n| format!("job-{}", n)),
        job_number,
        name: name.to_string(),
        status: JobStatus::from(status),
    }
}

/// Pipeline with three attempts of `test-workflow-1` (latest is 456-2, two
/// jobs) and one of `test-workflow-2` (456-4, one job)
pub(crate) fn client_with_data(
    workflow1_status: &str,
    workflow2_status: &str,
    jobs1_status: &str,
    jobs2_status: &str,
) -> InMemoryCircleClient {
    let client = InMemoryCircleClient::new(project());
    client.add_pipeline(PIPELINE_NUMBER, PIPELINE_ID);
    client.add_workflows(
        PIPELINE_ID,
        vec![
            workflow("456-1", "test-workflow-1", workflow1_status, "2021-01-01T00:00:00.000Z"),
            workflow("456-2", "test-workflow-1", workflow1_status, "2021-01-02T00:00:00.000Z"),
            workflow("456-3", "test-workflow-1", workflow1_status, "2021-01-01T12:00:00.000Z"),
            workflow("456-4", "test-workflow-2", workflow2_status, "2021-01-04T00:00:00.000Z"),
        ],
    );

    for id in ["456-1", "456-3"] {
        client.add_jobs(id, vec![job("stale-job", jobs1_status, Some(1))]);
    }
    client.add_jobs(
        "456-2",
        vec![
            job("test-job-1", jobs1_status, Some(2)),
            job("test-job-2", jobs1_status, Some(3)),
        ],
    );
    client.add_jobs("456-4", vec![job("test-job-3", jobs2_status, Some(4))]);

    client
}
