//! Backend completion events and error modeling for the acronym controllers.

use client_core::{ClientError, Outcome};
use shared::{domain::User, protocol::AcronymDraft};
use thiserror::Error;

use crate::backend_bridge::{commands::RequestId, DispatchError};

pub const LOAD_USERS_FAILED_MESSAGE: &str = "There was an error getting the users";
pub const NO_USERS_MESSAGE: &str = "There are no users to create an acronym for";
pub const SAVE_FAILED_MESSAGE: &str = "There was a problem saving the acronym";

/// Result of one backend command, delivered to the screen that issued it.
pub enum UiEvent {
    UsersLoaded {
        request: RequestId,
        outcome: Outcome<Vec<User>>,
    },
    AcronymSaved {
        request: RequestId,
        outcome: Outcome<()>,
    },
}

impl UiEvent {
    pub fn request(&self) -> RequestId {
        match self {
            Self::UsersLoaded { request, .. } | Self::AcronymSaved { request, .. } => *request,
        }
    }
}

/// A local form precondition that failed before any network call.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum ValidationError {
    #[error("acronym short form is empty")]
    MissingShort,
    #[error("acronym long form is empty")]
    MissingLong,
    #[error("no user is selected")]
    MissingUser,
}

impl ValidationError {
    pub fn user_message(self) -> &'static str {
        match self {
            Self::MissingShort => "You must specify an acronym!",
            Self::MissingLong => "You must specify a meaning!",
            Self::MissingUser => "You must have a user to create an acronym!",
        }
    }
}

/// Checks the form in on-screen order and stops at the first failure.
pub fn build_draft(
    short: &str,
    long: &str,
    selection: Option<&User>,
) -> Result<AcronymDraft, ValidationError> {
    if short.is_empty() {
        return Err(ValidationError::MissingShort);
    }
    if long.is_empty() {
        return Err(ValidationError::MissingLong);
    }
    let user = selection.ok_or(ValidationError::MissingUser)?;
    Ok(AcronymDraft::new(short, long, user.id.clone()))
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum WorkflowError {
    #[error(transparent)]
    Validation(#[from] ValidationError),
    #[error("server returned no users")]
    NoUsers,
    #[error("an acronym submission is already in flight")]
    SubmissionInFlight,
    #[error("flow is closed")]
    FlowClosed,
    #[error(transparent)]
    Remote(#[from] ClientError),
}

impl WorkflowError {
    pub fn validation(&self) -> Option<ValidationError> {
        match self {
            Self::Validation(err) => Some(*err),
            _ => None,
        }
    }
}

/// A command that never reached the worker still has to resolve to one outcome.
pub(crate) fn undelivered(err: DispatchError) -> ClientError {
    ClientError::Transport(format!("request was not sent: {err}"))
}
