use reqwest::{header::CONTENT_TYPE, Client as ReqwestClient, Method, RequestBuilder};
use serde::{de::DeserializeOwned, Serialize};
use serde_json::Value;
use tracing::debug;

use crate::{
    auth::dto::AuthResponse,
    images::handlers::UploadResponse,
    projects::{
        dto::{MessageResponse, ProjectEnvelope, ProjectInput, ProjectList},
        Project,
    },
};

use super::error::{ClientError, Result};

/// HTTP client for the portfolio REST API
#[derive(Clone)]
pub struct ApiClient {
    base_url: String,
    token: Option<String>,
    http: ReqwestClient,
}

impl ApiClient {
    /// `base_url` is the server root, e.g. `http://localhost:3001`.
    pub fn new(base_url: &str) -> Self {
        Self {
            base_url: base_url.trim_end_matches('/').to_string(),
            token: None,
            http: ReqwestClient::new(),
        }
    }

    pub fn with_token(mut self, token: impl Into<String>) -> Self {
        self.token = Some(token.into());
        self
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    fn request(&self, method: Method, path: &str) -> RequestBuilder {
        let url = format!("{}{}", self.base_url, path);
        let req = self.http.request(method, url);
        match &self.token {
            Some(t) => req.bearer_auth(t),
            None => req,
        }
    }

    /// Send and decode. Non-2xx statuses become [`ClientError::Api`] carrying
    /// the server's `error` message.
    async fn execute<T: DeserializeOwned>(&self, req: RequestBuilder) -> Result<T> {
        let response = req.send().await?;
        let status = response.status();
        let bytes = response.bytes().await?;

        if !status.is_success() {
            let message = serde_json::from_slice::<Value>(&bytes)
                .ok()
                .and_then(|v| v.get("error").and_then(Value::as_str).map(String::from))
                .unwrap_or_else(|| {
                    status
                        .canonical_reason()
                        .unwrap_or("Request failed")
                        .to_string()
                });
            debug!(status = status.as_u16(), %message, "api error");
            return Err(ClientError::Api {
                status: status.as_u16(),
                message,
            });
        }

        Ok(serde_json::from_slice(&bytes)?)
    }

    pub async fn health(&self) -> Result<Value> {
        self.execute(self.request(Method::GET, "/health")).await
    }

    // =========================================================================
    // Auth
    // =========================================================================

    pub async fn sign_up(&self, email: &str, password: &str, name: &str) -> Result<AuthResponse> {
        #[derive(Serialize)]
        struct SignUp<'a> {
            email: &'a str,
            password: &'a str,
            name: &'a str,
        }

        let req = self.request(Method::POST, "/signup").json(&SignUp {
            email,
            password,
            name,
        });
        self.execute(req).await
    }

    pub async fn sign_in(&self, email: &str, password: &str) -> Result<AuthResponse> {
        #[derive(Serialize)]
        struct SignIn<'a> {
            email: &'a str,
            password: &'a str,
        }

        let req = self
            .request(Method::POST, "/signin")
            .json(&SignIn { email, password });
        self.execute(req).await
    }

    // =========================================================================
    // Projects
    // =========================================================================

    pub async fn list_projects(&self) -> Result<Vec<Project>> {
        let list: ProjectList = self.execute(self.request(Method::GET, "/projects")).await?;
        Ok(list.projects)
    }

    pub async fn get_project(&self, id: &str) -> Result<Project> {
        let env: ProjectEnvelope = self
            .execute(self.request(Method::GET, &format!("/projects/{id}")))
            .await?;
        Ok(env.project)
    }

    pub async fn create_project(&self, input: &ProjectInput) -> Result<Project> {
        let req = self.request(Method::POST, "/projects").json(input);
        let env: ProjectEnvelope = self.execute(req).await?;
        Ok(env.project)
    }

    pub async fn update_project(&self, id: &str, input: &ProjectInput) -> Result<Project> {
        let req = self
            .request(Method::PUT, &format!("/projects/{id}"))
            .json(input);
        let env: ProjectEnvelope = self.execute(req).await?;
        Ok(env.project)
    }

    /// Returns the server's confirmation message.
    pub async fn delete_project(&self, id: &str) -> Result<String> {
        let resp: MessageResponse = self
            .execute(self.request(Method::DELETE, &format!("/projects/{id}")))
            .await?;
        Ok(resp.message)
    }

    /// Push raw image bytes; returns the URL to store on the project.
    pub async fn upload_image(&self, body: Vec<u8>, content_type: &str) -> Result<String> {
        let req = self
            .request(Method::POST, "/upload")
            .header(CONTENT_TYPE, content_type)
            .body(body);
        let resp: UploadResponse = self.execute(req).await?;
        Ok(resp.url)
    }
}
