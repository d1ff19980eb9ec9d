use serde::{Deserialize, Serialize};

/// Error envelope the acronym server writes on rejected requests.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ApiError {
    #[serde(default)]
    pub error: bool,
    pub reason: String,
}

impl ApiError {
    pub fn new(reason: impl Into<String>) -> Self {
        Self {
            error: true,
            reason: reason.into(),
        }
    }

    /// Parses a response body, returning `None` when it is not an error envelope.
    pub fn from_body(body: &[u8]) -> Option<Self> {
        serde_json::from_slice(body).ok()
    }
}
