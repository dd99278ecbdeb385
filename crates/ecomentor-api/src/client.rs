//! HTTP client for the ecomentor backend: catalog, ratings, prompts and tasks.

use ecomentor_core::{
    CatalogEntry, EcoRankingResponse, Prompt, PromptInput, Rating, RatingPayload,
    Recommendation, Task, TaskInput,
};
use reqwest::{Method, RequestBuilder};
use serde::de::DeserializeOwned;
use tracing::{debug, info};

use crate::ApiError;

/// HTTP client for the backend's REST endpoints.
///
/// Cheap to clone. A session token, when set, is sent as a bearer
/// `Authorization` header on every request; without one the header is
/// omitted.
#[derive(Clone)]
pub struct ApiClient {
    client: reqwest::Client,
    base_url: String,
    token: Option<String>,
}

impl ApiClient {
    /// Create a new client for the given backend base URL.
    ///
    /// `base_url` should be like `http://localhost:8000` (a trailing slash is trimmed).
    pub fn new(base_url: String) -> Self {
        Self::with_http_client(reqwest::Client::new(), base_url)
    }

    pub fn with_http_client(client: reqwest::Client, base_url: String) -> Self {
        Self {
            client,
            base_url: base_url.trim_end_matches('/').to_string(),
            token: None,
        }
    }

    /// Same client, authenticated with `token` (or anonymous with `None`).
    pub fn with_token(mut self, token: Option<String>) -> Self {
        self.token = token.filter(|t| !t.is_empty());
        self
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    pub fn token(&self) -> Option<&str> {
        self.token.as_deref()
    }

    /// Join `path` onto the base URL with exactly one slash.
    pub(crate) fn url(&self, path: &str) -> String {
        format!("{}/{}", self.base_url, path.trim_start_matches('/'))
    }

    pub(crate) fn request(&self, method: Method, path: &str) -> RequestBuilder {
        let mut req = self.client.request(method, self.url(path));
        if let Some(token) = &self.token {
            req = req.bearer_auth(token);
        }
        req
    }

    /// Send `req`, failing on non-2xx, and decode the JSON body.
    pub(crate) async fn execute<T: DeserializeOwned>(
        &self,
        req: RequestBuilder,
    ) -> Result<T, ApiError> {
        let resp = req.send().await?;
        let status = resp.status();
        if !status.is_success() {
            let body = resp.text().await.unwrap_or_default();
            return Err(ApiError::Server {
                status: status.as_u16(),
                body,
            });
        }
        Ok(resp.json().await?)
    }

    /// Send `req`, failing on non-2xx, and discard the body.
    pub(crate) async fn execute_unit(&self, req: RequestBuilder) -> Result<(), ApiError> {
        let resp = req.send().await?;
        let status = resp.status();
        if !status.is_success() {
            let body = resp.text().await.unwrap_or_default();
            return Err(ApiError::Server {
                status: status.as_u16(),
                body,
            });
        }
        Ok(())
    }

    // ── Catalog & ratings ──

    /// Fetch the eco-ranking catalog.
    pub async fn list_catalog(&self) -> Result<Vec<CatalogEntry>, ApiError> {
        debug!(base_url = %self.base_url, "fetching eco-ranking catalog");
        let resp: EcoRankingResponse = self
            .execute(self.request(Method::GET, "/ias/eco-ranking"))
            .await?;
        info!(count = resp.eco_ranking.len(), "fetched catalog");
        Ok(resp.eco_ranking)
    }

    pub async fn create_rating(&self, payload: &RatingPayload) -> Result<Rating, ApiError> {
        info!(ia_id = payload.ia_id, nota = payload.nota, "creating rating");
        self.execute(self.request(Method::POST, "/avaliacoes").json(payload))
            .await
    }

    // ── Prompts ──

    /// List prompts. A `null` body is treated as an empty list.
    pub async fn list_prompts(&self) -> Result<Vec<Prompt>, ApiError> {
        let prompts: Option<Vec<Prompt>> =
            self.execute(self.request(Method::GET, "/prompts")).await?;
        Ok(prompts.unwrap_or_default())
    }

    pub async fn create_prompt(&self, input: &PromptInput) -> Result<Prompt, ApiError> {
        info!(titulo = %input.titulo, "creating prompt");
        self.execute(self.request(Method::POST, "/prompts").json(input))
            .await
    }

    pub async fn update_prompt(&self, id: i64, input: &PromptInput) -> Result<Prompt, ApiError> {
        info!(id, "updating prompt");
        self.execute(self.request(Method::PUT, &format!("/prompts/{id}")).json(input))
            .await
    }

    pub async fn delete_prompt(&self, id: i64) -> Result<(), ApiError> {
        info!(id, "deleting prompt");
        self.execute_unit(self.request(Method::DELETE, &format!("/prompts/{id}")))
            .await
    }

    // ── Tasks ──

    /// List tasks. A `null` body is treated as an empty list.
    pub async fn list_tasks(&self) -> Result<Vec<Task>, ApiError> {
        let tasks: Option<Vec<Task>> = self.execute(self.request(Method::GET, "/tarefas")).await?;
        Ok(tasks.unwrap_or_default())
    }

    pub async fn create_task(&self, input: &TaskInput) -> Result<Task, ApiError> {
        info!(titulo = %input.titulo, "creating task");
        self.execute(self.request(Method::POST, "/tarefas").json(input))
            .await
    }

    /// Ask the backend to generate a recommendation for a task.
    pub async fn generate_recommendation(&self, task_id: i64) -> Result<Recommendation, ApiError> {
        info!(task_id, "generating recommendation");
        self.execute(self.request(Method::POST, &format!("/recomendacoes/gerar/{task_id}")))
            .await
    }
}
