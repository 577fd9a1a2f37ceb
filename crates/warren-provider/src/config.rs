//! Provider configuration.

use serde::{Deserialize, Serialize};

use warren_mgmt::MgmtClient;

use crate::error::{ProviderError, ProviderResult};

/// User-agent sent when the configuration does not override it.
pub const USER_AGENT: &str = concat!("warren-provider/", env!("CARGO_PKG_VERSION"));

/// Connection settings for one broker management endpoint.
///
/// No timeout knob: the host owns timeouts and drives cancellation through
/// the token passed to every operation.
#[derive(Clone, Serialize, Deserialize)]
pub struct ProviderConfig {
    /// Management API base URL, e.g. `http://broker:15672`.
    pub endpoint: String,
    pub username: String,
    pub password: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub user_agent: Option<String>,
}

impl std::fmt::Debug for ProviderConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ProviderConfig")
            .field("endpoint", &self.endpoint)
            .field("username", &self.username)
            .field("password", &"***REDACTED***")
            .field("user_agent", &self.user_agent)
            .finish()
    }
}

impl ProviderConfig {
    /// Validate the configuration before any request is issued.
    pub fn validate(&self) -> ProviderResult<()> {
        if !self.endpoint.starts_with("http://") && !self.endpoint.starts_with("https://") {
            return Err(ProviderError::config(
                "endpoint",
                format!("{:?} is not an http(s) URL", self.endpoint),
            ));
        }
        if self.username.is_empty() {
            return Err(ProviderError::config("username", "must not be empty"));
        }
        if self.password.is_empty() {
            return Err(ProviderError::config("password", "must not be empty"));
        }
        Ok(())
    }

    /// A copy safe to log or display.
    #[must_use]
    pub fn redacted(&self) -> Self {
        Self {
            password: "***REDACTED***".to_string(),
            ..self.clone()
        }
    }

    /// Build the management client this configuration describes.
    pub fn connect(&self) -> ProviderResult<MgmtClient> {
        self.validate()?;
        let user_agent = self.user_agent.as_deref().unwrap_or(USER_AGENT);
        let http = reqwest::Client::builder()
            .user_agent(user_agent)
            .build()
            .map_err(|e| {
                ProviderError::config("endpoint", format!("failed to build HTTP client: {e}"))
            })?;
        Ok(MgmtClient::with_http_client(
            &self.endpoint,
            &self.username,
            &self.password,
            http,
        ))
    }
}
