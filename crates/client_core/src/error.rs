use thiserror::Error;

/// Coarse failure class kept for diagnostics; end users only see one message per failure.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FailureKind {
    Transport,
    Server,
    Decode,
}

impl FailureKind {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Transport => "transport",
            Self::Server => "server",
            Self::Decode => "decode",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ClientError {
    /// No response was received.
    #[error("transport failure: {0}")]
    Transport(String),
    /// A response arrived with a status outside the accepted set.
    #[error("server rejected request with status {status}")]
    Server {
        status: u16,
        reason: Option<String>,
    },
    /// The response body did not match the expected schema.
    #[error("response body did not match expected schema: {0}")]
    Decode(String),
}

impl ClientError {
    pub fn kind(&self) -> FailureKind {
        match self {
            Self::Transport(_) => FailureKind::Transport,
            Self::Server { .. } => FailureKind::Server,
            Self::Decode(_) => FailureKind::Decode,
        }
    }

    pub fn status(&self) -> Option<u16> {
        match self {
            Self::Server { status, .. } => Some(*status),
            _ => None,
        }
    }

    pub fn reason(&self) -> Option<&str> {
        match self {
            Self::Server { reason, .. } => reason.as_deref(),
            _ => None,
        }
    }

    pub(crate) fn transport(err: reqwest::Error) -> Self {
        if err.is_timeout() {
            Self::Transport(format!("request timed out: {err}"))
        } else {
            Self::Transport(err.to_string())
        }
    }

    pub(crate) fn decode(err: serde_json::Error) -> Self {
        Self::Decode(err.to_string())
    }
}
