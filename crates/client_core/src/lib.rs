use async_trait::async_trait;
use reqwest::{Client, Response, StatusCode};
use shared::{
    domain::User,
    error::ApiError,
    protocol::{AcronymDraft, ACRONYMS_PATH, USERS_PATH},
};
use tracing::{debug, warn};

pub mod config;
pub mod error;

pub use config::{load_settings, ClientSettings, SettingsError};
pub use error::{ClientError, FailureKind};

/// Result of one remote operation. Every call resolves to exactly one of these.
pub type Outcome<T> = Result<T, ClientError>;

/// The two remote operations the acronym screens depend on.
#[async_trait]
pub trait ResourceClient: Send + Sync {
    /// `GET /api/users`; any 2xx with a decodable list is a success, order preserved.
    async fn fetch_users(&self) -> Outcome<Vec<User>>;

    /// `POST /api/acronyms`; only an exact `200 OK` counts as accepted.
    async fn create_acronym(&self, draft: &AcronymDraft) -> Outcome<()>;
}

pub struct HttpResourceClient {
    http: Client,
    base_url: String,
}

impl HttpResourceClient {
    pub fn new(settings: &ClientSettings) -> Result<Self, SettingsError> {
        settings.validate()?;
        let http = Client::builder()
            .timeout(settings.request_timeout())
            .build()?;
        Ok(Self::with_client(http, settings.normalized_base_url()))
    }

    pub fn with_client(http: Client, base_url: impl Into<String>) -> Self {
        let base_url: String = base_url.into();
        Self {
            http,
            base_url: base_url.trim_end_matches('/').to_string(),
        }
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    async fn rejected(response: Response) -> ClientError {
        let status = response.status().as_u16();
        let reason = match response.bytes().await {
            Ok(body) => ApiError::from_body(&body).map(|api| api.reason),
            Err(err) => {
                debug!(status, error = %err, "failed to read rejected response body");
                None
            }
        };
        ClientError::Server { status, reason }
    }
}

#[async_trait]
impl ResourceClient for HttpResourceClient {
    async fn fetch_users(&self) -> Outcome<Vec<User>> {
        let url = format!("{}{USERS_PATH}", self.base_url);
        let response = self
            .http
            .get(&url)
            .send()
            .await
            .map_err(ClientError::transport)?;

        if !response.status().is_success() {
            let err = Self::rejected(response).await;
            warn!(%url, status = ?err.status(), reason = ?err.reason(), "user list request rejected");
            return Err(err);
        }

        let body = response.bytes().await.map_err(ClientError::transport)?;
        let users: Vec<User> = serde_json::from_slice(&body).map_err(|err| {
            warn!(%url, error = %err, "user list body did not decode");
            ClientError::decode(err)
        })?;
        debug!(count = users.len(), "fetched users");
        Ok(users)
    }

    async fn create_acronym(&self, draft: &AcronymDraft) -> Outcome<()> {
        let url = format!("{}{ACRONYMS_PATH}", self.base_url);
        let response = self
            .http
            .post(&url)
            .json(draft)
            .send()
            .await
            .map_err(ClientError::transport)?;

        if response.status() != StatusCode::OK {
            let err = Self::rejected(response).await;
            warn!(%url, status = ?err.status(), reason = ?err.reason(), "acronym creation rejected");
            return Err(err);
        }

        debug!(short = %draft.short, user_id = %draft.user_id, "acronym created");
        Ok(())
    }
}

#[cfg(test)]
#[path = "tests/lib_tests.rs"]
mod tests;
