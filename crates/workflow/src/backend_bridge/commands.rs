//! Backend commands queued from controllers to the backend worker.

use std::fmt;

use shared::protocol::AcronymDraft;

use crate::backend_bridge::session::ReplyHandle;

/// Identifies one dispatched request within a screen session.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct RequestId(pub u64);

impl fmt::Display for RequestId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{}", self.0)
    }
}

pub enum BackendCommand {
    FetchUsers {
        request: RequestId,
        reply: ReplyHandle,
    },
    CreateAcronym {
        request: RequestId,
        draft: AcronymDraft,
        reply: ReplyHandle,
    },
}

impl BackendCommand {
    pub fn name(&self) -> &'static str {
        match self {
            Self::FetchUsers { .. } => "fetch_users",
            Self::CreateAcronym { .. } => "create_acronym",
        }
    }

    pub fn request(&self) -> RequestId {
        match self {
            Self::FetchUsers { request, .. } | Self::CreateAcronym { request, .. } => *request,
        }
    }
}
