//! User operations.

use serde::{Deserialize, Deserializer, Serialize, Serializer};
use tokio_util::sync::CancellationToken;

use crate::client::MgmtClient;
use crate::error::MgmtResult;
use crate::path::api_path;

/// User tags, sent as a comma-joined string.
///
/// Brokers disagree on the read side: LavinMQ and older RabbitMQ return
/// the joined string, newer RabbitMQ returns a JSON array. Both decode
/// into the same ordered list.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct UserTags(pub Vec<String>);

impl UserTags {
    #[must_use]
    pub fn new<I, S>(tags: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self(tags.into_iter().map(Into::into).collect())
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    fn joined(&self) -> String {
        self.0.join(",")
    }
}

impl Serialize for UserTags {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(&self.joined())
    }
}

impl<'de> Deserialize<'de> for UserTags {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        #[derive(Deserialize)]
        #[serde(untagged)]
        enum Wire {
            Joined(String),
            Many(Vec<String>),
        }

        let tags = match Wire::deserialize(deserializer)? {
            Wire::Joined(joined) => joined
                .split(',')
                .map(str::trim)
                .filter(|tag| !tag.is_empty())
                .map(str::to_string)
                .collect(),
            Wire::Many(tags) => tags,
        };
        Ok(Self(tags))
    }
}

/// Desired state for `PUT api/users/{name}`.
///
/// Exactly one of `password` and `password_hash` should be set; sending
/// neither creates a user that cannot log in with a password.
///
/// `tags: None` omits the field so the broker keeps whatever it has;
/// `Some` of an empty list sends `""` and clears the tags.
#[derive(Debug, Clone, Default, Serialize)]
pub struct UserSettings {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub password: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub password_hash: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub tags: Option<UserTags>,
}

/// A user as reported by the broker. Passwords never come back, only
/// the salted hash.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct UserInfo {
    pub name: String,
    #[serde(default)]
    pub tags: UserTags,
    #[serde(default)]
    pub password_hash: Option<String>,
}

impl MgmtClient {
    /// Create or replace a user.
    pub async fn upsert_user(
        &self,
        cancel: &CancellationToken,
        name: &str,
        settings: &UserSettings,
    ) -> MgmtResult<()> {
        self.put_json(cancel, &api_path(["users", name]), settings)
            .await
    }

    /// Fetch one user; `None` when the broker does not know it.
    pub async fn get_user(
        &self,
        cancel: &CancellationToken,
        name: &str,
    ) -> MgmtResult<Option<UserInfo>> {
        self.get_optional(cancel, &api_path(["users", name]), "user")
            .await
    }

    /// List every user on the broker.
    pub async fn list_users(&self, cancel: &CancellationToken) -> MgmtResult<Vec<UserInfo>> {
        self.get_json(cancel, &api_path(["users"]), "user list")
            .await
    }

    /// Delete a user.
    pub async fn delete_user(&self, cancel: &CancellationToken, name: &str) -> MgmtResult<()> {
        self.delete(cancel, &api_path(["users", name])).await
    }
}
