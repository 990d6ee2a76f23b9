use async_trait::async_trait;
use reqwest::{Client, StatusCode};
use serde::Serialize;

use crate::error::{Result, SessionError};
use crate::models::{Pause, RelationshipSession};
use crate::settings::SessionSettings;

const ENABLE_LOGS: bool = true;

use crate::{log_debug, log_warn};

const SESSIONS_PATH: &str = "/api/relationship-sessions";

/// Backend operations the session engine depends on.
#[async_trait]
pub trait SessionApi: Send + Sync {
    async fn fetch_session(&self, session_id: &str) -> Result<RelationshipSession>;

    /// Mark the session completed. Safe to repeat.
    async fn complete_session(&self, session_id: &str) -> Result<()>;

    async fn pause_session(&self, pause: &Pause) -> Result<()>;

    async fn resume_session(&self, pause: &Pause) -> Result<()>;
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct CompleteSessionRequest<'a> {
    session_id: &'a str,
}

/// `SessionApi` over the app's JSON HTTP endpoints.
#[derive(Clone)]
pub struct HttpSessionApi {
    client: Client,
    base_url: String,
}

impl HttpSessionApi {
    pub fn new(settings: &SessionSettings) -> Result<Self> {
        let client = Client::builder()
            .timeout(settings.request_timeout())
            .build()?;
        Ok(Self {
            client,
            base_url: settings.api_base_url.trim_end_matches('/').to_string(),
        })
    }

    fn url(&self, path: &str) -> String {
        format!("{}{}{}", self.base_url, SESSIONS_PATH, path)
    }
}

async fn error_body(response: reqwest::Response) -> String {
    response
        .text()
        .await
        .unwrap_or_else(|err| format!("<unreadable body: {err}>"))
}

#[async_trait]
impl SessionApi for HttpSessionApi {
    async fn fetch_session(&self, session_id: &str) -> Result<RelationshipSession> {
        let url = self.url(&format!("/{session_id}"));
        log_debug!("GET {}", url);

        let response = self
            .client
            .get(&url)
            .send()
            .await
            .map_err(|err| SessionError::Fetch(err.to_string()))?;

        let status = response.status();
        if status == StatusCode::NOT_FOUND {
            return Err(SessionError::NotFound(session_id.to_string()));
        }
        if !status.is_success() {
            let body = error_body(response).await;
            log_warn!("fetch session {} failed with {}: {}", session_id, status, body);
            return Err(SessionError::Fetch(format!("{status}: {body}")));
        }

        let body = response
            .text()
            .await
            .map_err(|err| SessionError::Fetch(err.to_string()))?;
        serde_json::from_str(&body).map_err(|err| SessionError::Decode(err.to_string()))
    }

    async fn complete_session(&self, session_id: &str) -> Result<()> {
        let url = self.url("/complete");
        log_debug!("POST {} for session {}", url, session_id);

        let response = self
            .client
            .post(&url)
            .json(&CompleteSessionRequest { session_id })
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            let message = error_body(response).await;
            return Err(SessionError::CompleteFailed {
                status: status.as_u16(),
                message,
            });
        }
        Ok(())
    }

    async fn pause_session(&self, pause: &Pause) -> Result<()> {
        let url = self.url(&format!("/{}/pause", pause.session_id));
        self.post_pause(&url, pause).await
    }

    async fn resume_session(&self, pause: &Pause) -> Result<()> {
        let url = self.url(&format!("/{}/resume", pause.session_id));
        self.post_pause(&url, pause).await
    }
}

impl HttpSessionApi {
    async fn post_pause(&self, url: &str, pause: &Pause) -> Result<()> {
        log_debug!("POST {}", url);
        let response = self.client.post(url).json(pause).send().await?;

        let status = response.status();
        if !status.is_success() {
            let message = error_body(response).await;
            return Err(SessionError::SyncFailed {
                status: status.as_u16(),
                message,
            });
        }
        Ok(())
    }
}
