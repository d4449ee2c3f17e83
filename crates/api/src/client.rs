//! HTTP client for the taskdeck REST API.
//!
//! Each operation issues one call to a fixed path and method, attaches the
//! bearer token when one is set, and decodes the JSON body. Failures
//! propagate as [`ApiError`]; there is no retry, caching, or timeout layer.

use reqwest::header::{HeaderMap, HeaderValue, CONTENT_TYPE};
use reqwest::{Client, Method, RequestBuilder};
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use tracing::{debug, instrument};

use crate::error::ApiError;
use crate::models::{
    AuthResponse, NewProject, NewTask, Project, ProjectPage, ProjectPatch, ProjectStatus, Task,
    TaskPatch, TaskStatus,
};

/// Query parameters for the paginated project listing.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ProjectQuery {
    pub page: u32,
    pub limit: u32,
    pub search: Option<String>,
    pub status: Option<ProjectStatus>,
}

impl ProjectQuery {
    pub fn new(page: u32, limit: u32) -> Self {
        Self {
            page,
            limit,
            search: None,
            status: None,
        }
    }

    /// Build the query pairs. An empty search string is omitted entirely,
    /// matching how the service treats absent filters.
    fn to_pairs(&self) -> Vec<(&'static str, String)> {
        let mut pairs = vec![
            ("page", self.page.to_string()),
            ("limit", self.limit.to_string()),
        ];
        if let Some(search) = self.search.as_deref().filter(|s| !s.is_empty()) {
            pairs.push(("search", search.to_string()));
        }
        if let Some(status) = self.status {
            pairs.push(("status", status.as_str().to_string()));
        }
        pairs
    }
}

/// Error body shape the service uses for failures.
#[derive(Debug, Deserialize)]
struct ApiErrorBody {
    message: String,
}

/// Typed client for the taskdeck service.
#[derive(Debug, Clone)]
pub struct ApiClient {
    http: Client,
    base_url: String,
    token: Option<String>,
}

impl ApiClient {
    /// Create a client against the given base URL (no trailing slash needed).
    ///
    /// # Errors
    ///
    /// Returns an error if the underlying HTTP client cannot be built.
    pub fn new(base_url: impl Into<String>) -> Result<Self, ApiError> {
        let mut headers = HeaderMap::new();
        headers.insert(CONTENT_TYPE, HeaderValue::from_static("application/json"));

        let http = Client::builder()
            .user_agent(concat!("taskdeck/", env!("CARGO_PKG_VERSION")))
            .default_headers(headers)
            .build()?;

        let base_url = base_url.into();
        Ok(Self {
            base_url: base_url.trim_end_matches('/').to_string(),
            http,
            token: None,
        })
    }

    /// Set the bearer token at construction time.
    #[must_use]
    pub fn with_token(mut self, token: impl Into<String>) -> Self {
        self.token = Some(token.into());
        self
    }

    /// Attach a bearer token to all subsequent requests.
    pub fn set_token(&mut self, token: impl Into<String>) {
        self.token = Some(token.into());
    }

    /// Drop the bearer token; subsequent requests go out unauthenticated.
    pub fn clear_token(&mut self) {
        self.token = None;
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    fn request(&self, method: Method, path: &str) -> RequestBuilder {
        let mut req = self.http.request(method, format!("{}{path}", self.base_url));
        if let Some(token) = &self.token {
            req = req.bearer_auth(token);
        }
        req
    }

    /// Send a request and decode the JSON body, mapping non-2xx statuses to
    /// [`ApiError::Api`] with the server's message when one is present.
    async fn execute<T: DeserializeOwned>(&self, req: RequestBuilder) -> Result<T, ApiError> {
        let response = req.send().await?;
        let status = response.status();
        debug!(%status, url = %response.url(), "API response");

        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            let message = serde_json::from_str::<ApiErrorBody>(&body)
                .map(|e| e.message)
                .unwrap_or(body);
            return Err(ApiError::Api {
                status: status.as_u16(),
                message,
            });
        }

        let body = response.text().await?;
        serde_json::from_str(&body).map_err(ApiError::Serialization)
    }

    /// Like [`Self::execute`] for endpoints that return no body.
    async fn execute_empty(&self, req: RequestBuilder) -> Result<(), ApiError> {
        let response = req.send().await?;
        let status = response.status();
        debug!(%status, url = %response.url(), "API response");

        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            let message = serde_json::from_str::<ApiErrorBody>(&body)
                .map(|e| e.message)
                .unwrap_or(body);
            return Err(ApiError::Api {
                status: status.as_u16(),
                message,
            });
        }
        Ok(())
    }

    // =========================================================================
    // Auth
    // =========================================================================

    /// Exchange credentials for an access token.
    #[instrument(skip(self, password))]
    pub async fn login(&self, email: &str, password: &str) -> Result<AuthResponse, ApiError> {
        #[derive(Serialize)]
        struct Body<'a> {
            email: &'a str,
            password: &'a str,
        }

        self.execute(
            self.request(Method::POST, "/auth/login")
                .json(&Body { email, password }),
        )
        .await
    }

    /// Create an account and receive a token for it.
    #[instrument(skip(self, password))]
    pub async fn register(
        &self,
        name: &str,
        email: &str,
        password: &str,
    ) -> Result<AuthResponse, ApiError> {
        #[derive(Serialize)]
        struct Body<'a> {
            name: &'a str,
            email: &'a str,
            password: &'a str,
        }

        self.execute(self.request(Method::POST, "/auth/register").json(&Body {
            name,
            email,
            password,
        }))
        .await
    }

    // =========================================================================
    // Projects
    // =========================================================================

    /// Fetch one page of the project listing, optionally filtered.
    #[instrument(skip(self))]
    pub async fn list_projects(&self, query: &ProjectQuery) -> Result<ProjectPage, ApiError> {
        self.execute(
            self.request(Method::GET, "/projects")
                .query(&query.to_pairs()),
        )
        .await
    }

    /// Fetch a single project by id.
    #[instrument(skip(self))]
    pub async fn get_project(&self, id: &str) -> Result<Project, ApiError> {
        self.execute(self.request(Method::GET, &format!("/projects/{id}")))
            .await
    }

    /// Create a project, returning the server's canonical record.
    #[instrument(skip(self, data))]
    pub async fn create_project(&self, data: &NewProject) -> Result<Project, ApiError> {
        self.execute(self.request(Method::POST, "/projects").json(data))
            .await
    }

    /// Partially update a project.
    #[instrument(skip(self, patch))]
    pub async fn update_project(&self, id: &str, patch: &ProjectPatch) -> Result<Project, ApiError> {
        self.execute(
            self.request(Method::PATCH, &format!("/projects/{id}"))
                .json(patch),
        )
        .await
    }

    /// Delete a project. Irreversible; callers confirm with the user first.
    #[instrument(skip(self))]
    pub async fn delete_project(&self, id: &str) -> Result<(), ApiError> {
        self.execute_empty(self.request(Method::DELETE, &format!("/projects/{id}")))
            .await
    }

    // =========================================================================
    // Tasks
    // =========================================================================

    /// Fetch the tasks of a project, optionally scoped to one status.
    #[instrument(skip(self))]
    pub async fn project_tasks(
        &self,
        project_id: &str,
        status: Option<TaskStatus>,
    ) -> Result<Vec<Task>, ApiError> {
        let mut req = self.request(Method::GET, &format!("/projects/{project_id}/tasks"));
        if let Some(status) = status {
            req = req.query(&[("status", status.as_str())]);
        }
        self.execute(req).await
    }

    /// Fetch a single task by id.
    #[instrument(skip(self))]
    pub async fn get_task(&self, id: &str) -> Result<Task, ApiError> {
        self.execute(self.request(Method::GET, &format!("/tasks/{id}")))
            .await
    }

    /// Create a task under a project, returning the server's canonical record.
    #[instrument(skip(self, data))]
    pub async fn create_task(&self, project_id: &str, data: &NewTask) -> Result<Task, ApiError> {
        self.execute(
            self.request(Method::POST, &format!("/projects/{project_id}/tasks"))
                .json(data),
        )
        .await
    }

    /// Partially update a task.
    #[instrument(skip(self, patch))]
    pub async fn update_task(&self, id: &str, patch: &TaskPatch) -> Result<Task, ApiError> {
        self.execute(
            self.request(Method::PATCH, &format!("/tasks/{id}"))
                .json(patch),
        )
        .await
    }

    /// Delete a task. Irreversible; callers confirm with the user first.
    #[instrument(skip(self))]
    pub async fn delete_task(&self, id: &str) -> Result<(), ApiError> {
        self.execute_empty(self.request(Method::DELETE, &format!("/tasks/{id}")))
            .await
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_query_pairs_with_all_filters() {
        let query = ProjectQuery {
            page: 2,
            limit: 6,
            search: Some("deploy".to_string()),
            status: Some(ProjectStatus::Active),
        };

        assert_eq!(
            query.to_pairs(),
            vec![
                ("page", "2".to_string()),
                ("limit", "6".to_string()),
                ("search", "deploy".to_string()),
                ("status", "active".to_string()),
            ]
        );
    }

    #[test]
    fn test_query_pairs_omit_empty_search() {
        let query = ProjectQuery {
            search: Some(String::new()),
            ..ProjectQuery::new(1, 6)
        };

        assert_eq!(
            query.to_pairs(),
            vec![("page", "1".to_string()), ("limit", "6".to_string())]
        );
    }

    #[test]
    fn test_base_url_trailing_slash_is_trimmed() {
        let client = ApiClient::new("http://localhost:3001/").unwrap();
        assert_eq!(client.base_url(), "http://localhost:3001");
    }
}
