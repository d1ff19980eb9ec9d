use serde::{Deserialize, Serialize};

use crate::domain::UserId;

pub const USERS_PATH: &str = "/api/users";
pub const ACRONYMS_PATH: &str = "/api/acronyms";

/// A new acronym as posted to [`ACRONYMS_PATH`].
///
/// Only built once every field is known; there is no partially filled draft.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AcronymDraft {
    pub short: String,
    pub long: String,
    #[serde(rename = "userID")]
    pub user_id: UserId,
}

impl AcronymDraft {
    pub fn new(short: impl Into<String>, long: impl Into<String>, user_id: UserId) -> Self {
        Self {
            short: short.into(),
            long: long.into(),
            user_id,
        }
    }
}
