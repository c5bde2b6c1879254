//! CircleCI HTTP Client
//!
//! A small, type-safe client for the parts of the CircleCI REST API needed to
//! follow a pipeline: pipeline lookup, workflow and job listings (v2) and job
//! step details with action output (v1.1).
//!
//! Callers depend on the [`CircleClient`] trait; [`HttpCircleClient`] is the
//! production implementation. With the `test-support` feature an in-memory
//! implementation is available as `InMemoryCircleClient`.
//!
//! # Example
//!
//! ```no_run
//! use circle_client::{CircleClient, HttpCircleClient};
//! use circle_core::domain::ProjectSlug;
//!
//! #[tokio::main]
//! async fn main() -> Result<(), circle_client::ClientError> {
//!     let client = HttpCircleClient::new("my-api-token");
//!     let project = ProjectSlug::new("github", "influxdata", "influxdb");
//!
//!     let pipeline_id = client.pipeline_id(&project, 1234).await?;
//!     for workflow in client.workflows(&pipeline_id).await? {
//!         println!("{}: {}", workflow.name, workflow.status);
//!     }
//!     Ok(())
//! }
//! ```

pub mod error;
mod jobs;
#[cfg(feature = "test-support")]
mod memory;
mod pipelines;
mod workflows;

// Re-export commonly used types
pub use error::{ClientError, Result};
#[cfg(feature = "test-support")]
pub use memory::InMemoryCircleClient;

use async_trait::async_trait;
use circle_core::domain::{
    Job, JobAction, JobDetails, OutputMessage, ProjectSlug, Workflow,
};
use circle_core::dto::error::ApiErrorBody;
use circle_core::dto::page::Page;
use reqwest::header::ACCEPT;
use reqwest::{Client, RequestBuilder, StatusCode, Url};
use serde::de::DeserializeOwned;
use tracing::debug;

/// Default CircleCI host
pub const DEFAULT_BASE_URL: &str = "https://circleci.com";

/// Operations the waiter needs from CircleCI
///
/// List operations return every item across all pages.
#[async_trait]
pub trait CircleClient: Send + Sync {
    /// Resolves a pipeline number within a project to the pipeline's ID
    ///
    /// Fails with `NotFound` if the pipeline number is unknown.
    async fn pipeline_id(&self, project: &ProjectSlug, pipeline_number: u64) -> Result<String>;

    /// Lists all workflows (including reruns) of a pipeline
    async fn workflows(&self, pipeline_id: &str) -> Result<Vec<Workflow>>;

    /// Lists all jobs of a workflow
    async fn workflow_jobs(&self, workflow_id: &str) -> Result<Vec<Job>>;

    /// Fetches step and action details for a job
    ///
    /// Fails with `NotFound` while the job has no details yet.
    async fn job_details(&self, project: &ProjectSlug, job_number: u64) -> Result<JobDetails>;

    /// Fetches the captured output of an action
    async fn action_output(&self, action: &JobAction) -> Result<Vec<OutputMessage>>;
}

/// HTTP client for the CircleCI API
///
/// Authenticates with a personal or project API token sent as the basic auth
/// user name.
#[derive(Clone)]
pub struct HttpCircleClient {
    /// Base URL of the CircleCI host (e.g., "https://circleci.com")
    base_url: Url,
    /// API token
    token: String,
    /// HTTP client instance
    client: Client,
}

impl std::fmt::Debug for HttpCircleClient {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("HttpCircleClient")
            .field("base_url", &self.base_url.as_str())
            .finish_non_exhaustive()
    }
}

impl HttpCircleClient {
    /// Create a client for circleci.com
    ///
    /// # Example
    /// ```
    /// use circle_client::HttpCircleClient;
    ///
    /// let client = HttpCircleClient::new("my-api-token");
    /// assert_eq!(client.base_url(), "https://circleci.com/");
    /// ```
    pub fn new(token: impl Into<String>) -> Self {
        let base_url = Url::parse(DEFAULT_BASE_URL).expect("default base URL is valid");
        Self {
            base_url,
            token: token.into(),
            client: Client::new(),
        }
    }

    /// Create a client for a custom host (e.g. a server installation)
    ///
    /// # Arguments
    /// * `base_url` - Host URL without the `/api/...` suffix
    /// * `token` - API token
    /// * `client` - A configured reqwest Client (timeouts, proxies, TLS)
    pub fn with_client(
        base_url: &str,
        token: impl Into<String>,
        client: Client,
    ) -> Result<Self> {
        let base_url = Url::parse(base_url).map_err(|e| {
            ClientError::InvalidRequest(format!("invalid base URL '{}': {}", base_url, e))
        })?;
        if base_url.cannot_be_a_base() {
            return Err(ClientError::InvalidRequest(format!(
                "base URL '{}' cannot have path segments",
                base_url
            )));
        }

        Ok(Self {
            base_url,
            token: token.into(),
            client,
        })
    }

    /// Get the base URL of the CircleCI host
    pub fn base_url(&self) -> &str {
        self.base_url.as_str()
    }

    /// Builds an endpoint URL, escaping each path segment
    fn endpoint(&self, segments: &[&str]) -> Result<Url> {
        let mut url = self.base_url.clone();
        url.path_segments_mut()
            .map_err(|_| {
                ClientError::InvalidRequest(format!(
                    "base URL '{}' cannot have path segments",
                    self.base_url
                ))
            })?
            .pop_if_empty()
            .extend(segments);
        Ok(url)
    }

    /// Authenticated GET request against the CircleCI API
    fn get(&self, url: Url) -> RequestBuilder {
        self.client
            .get(url)
            .basic_auth(&self.token, Some(""))
            .header(ACCEPT, "application/json")
    }

    // =============================================================================
    // Response Handlers
    // =============================================================================

    /// Handle an API response and deserialize JSON
    ///
    /// 404 becomes `NotFound`; any other non-success status becomes `ApiError`
    /// carrying the message CircleCI sent, or the raw body if it is not JSON.
    async fn handle_response<T: DeserializeOwned>(&self, response: reqwest::Response) -> Result<T> {
        let status = response.status();

        if !status.is_success() {
            let url = response.url().to_string();
            let error_text = response
                .text()
                .await
                .unwrap_or_else(|_| "Unknown error".to_string());
            let message = serde_json::from_str::<ApiErrorBody>(&error_text)
                .ok()
                .and_then(|body| body.message)
                .unwrap_or(error_text);

            if status == StatusCode::NOT_FOUND {
                return Err(ClientError::NotFound(format!("{} ({})", message, url)));
            }
            return Err(ClientError::api_error(status.as_u16(), message));
        }

        response
            .json()
            .await
            .map_err(|e| ClientError::ParseError(format!("Failed to parse JSON response: {}", e)))
    }

    /// Collects every item of a paginated v2 list endpoint
    async fn get_all_pages<T: DeserializeOwned>(&self, url: Url) -> Result<Vec<T>> {
        let mut items = Vec::new();
        let mut page_token: Option<String> = None;

        loop {
            let mut request = self.get(url.clone());
            if let Some(token) = &page_token {
                request = request.query(&[("page-token", token)]);
            }

            let response = request.send().await?;
            let page: Page<T> = self.handle_response(response).await?;
            let next = page.next_token().map(str::to_string);
            items.extend(page.items);

            match next {
                Some(token) => {
                    debug!("Following next page of {}", url);
                    page_token = Some(token);
                }
                None => break,
            }
        }

        Ok(items)
    }
}

#[async_trait]
impl CircleClient for HttpCircleClient {
    async fn pipeline_id(&self, project: &ProjectSlug, pipeline_number: u64) -> Result<String> {
        self.get_pipeline(project, pipeline_number)
            .await
            .map(|pipeline| pipeline.id)
    }

    async fn workflows(&self, pipeline_id: &str) -> Result<Vec<Workflow>> {
        self.list_pipeline_workflows(pipeline_id).await
    }

    async fn workflow_jobs(&self, workflow_id: &str) -> Result<Vec<Job>> {
        self.list_workflow_jobs(workflow_id).await
    }

    async fn job_details(&self, project: &ProjectSlug, job_number: u64) -> Result<JobDetails> {
        self.get_job_details(project, job_number).await
    }

    async fn action_output(&self, action: &JobAction) -> Result<Vec<OutputMessage>> {
        self.get_action_output(action).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_client_creation() {
        let client = HttpCircleClient::new("token");
        assert_eq!(client.base_url(), "https://circleci.com/");
    }

    #[test]
    fn test_endpoint_escapes_segments() {
        let client = HttpCircleClient::new("token");
        let url = client
            .endpoint(&["api", "v2", "project", "gh", "my org", "repo", "pipeline", "7"])
            .unwrap();
        assert_eq!(
            url.as_str(),
            "https://circleci.com/api/v2/project/gh/my%20org/repo/pipeline/7"
        );
    }

    #[test]
    fn test_endpoint_with_trailing_slash_base() {
        let client =
            HttpCircleClient::with_client("https://circleci.example.com/", "token", Client::new())
                .unwrap();
        let url = client
            .endpoint(&["api", "v2", "workflow", "abc", "job"])
            .unwrap();
        assert_eq!(
            url.as_str(),
            "https://circleci.example.com/api/v2/workflow/abc/job"
        );
    }

    #[test]
    fn test_invalid_base_url() {
        let err = HttpCircleClient::with_client("not a url", "token", Client::new()).unwrap_err();
        assert!(matches!(err, ClientError::InvalidRequest(_)));

        let err = HttpCircleClient::with_client("mailto:ci@example.com", "token", Client::new())
            .unwrap_err();
        assert!(matches!(err, ClientError::InvalidRequest(_)));
    }

    #[test]
    fn test_debug_hides_token() {
        let client = HttpCircleClient::new("super-secret");
        assert!(!format!("{:?}", client).contains("super-secret"));
    }
}
