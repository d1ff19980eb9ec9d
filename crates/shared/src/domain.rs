use std::fmt;

use serde::{
    de::{self, Unexpected},
    Deserialize, Deserializer, Serialize,
};

/// Server-assigned user identifier.
///
/// The client never interprets the value. Servers hand out either integer keys
/// or UUID strings, so both shapes are accepted and written back unchanged.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(untagged)]
pub enum UserId {
    Numeric(i64),
    Text(String),
}

impl fmt::Display for UserId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Numeric(id) => write!(f, "{id}"),
            Self::Text(id) => f.write_str(id),
        }
    }
}

impl From<i64> for UserId {
    fn from(value: i64) -> Self {
        Self::Numeric(value)
    }
}

impl From<&str> for UserId {
    fn from(value: &str) -> Self {
        Self::Text(value.to_string())
    }
}

impl From<String> for UserId {
    fn from(value: String) -> Self {
        Self::Text(value)
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct User {
    pub id: UserId,
    #[serde(deserialize_with = "non_empty_name")]
    pub name: String,
}

impl User {
    pub fn new(id: impl Into<UserId>, name: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            name: name.into(),
        }
    }
}

fn non_empty_name<'de, D>(deserializer: D) -> Result<String, D::Error>
where
    D: Deserializer<'de>,
{
    let name = String::deserialize(deserializer)?;
    if name.is_empty() {
        return Err(de::Error::invalid_value(
            Unexpected::Str(&name),
            &"a non-empty user name",
        ));
    }
    Ok(name)
}
