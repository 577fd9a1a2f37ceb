//! Management-API HTTP envelope (reqwest-based).
//!
//! [`MgmtClient`] wraps a shared `reqwest::Client` with the conventions the
//! broker's management API expects: HTTP Basic credentials, JSON in both
//! directions, and percent-encoded path segments. It performs no retries
//! and owns no timeouts; the caller owns both.
//!
//! Every operation takes an explicit [`CancellationToken`]. A token that
//! fires before or during a request wins over whatever transport error the
//! abandoned request might have produced.

use reqwest::{header, Client, Method, Response, StatusCode};
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use tokio_util::sync::CancellationToken;
use tracing::debug;

use crate::error::{MgmtError, MgmtResult};

/// Default user-agent, overridable at construction time.
pub const DEFAULT_USER_AGENT: &str = concat!("warren-mgmt/", env!("CARGO_PKG_VERSION"));

/// Error document the broker attaches to non-success responses.
#[derive(Debug, Deserialize)]
struct ErrorBody {
    #[serde(default)]
    error: Option<String>,
    #[serde(default)]
    reason: Option<String>,
}

/// Shared client for one management endpoint.
///
/// Cloning is cheap (the underlying `reqwest::Client` is pooled and
/// reference-counted); clones may be used concurrently.
#[derive(Clone)]
pub struct MgmtClient {
    /// Base URL without trailing slash, e.g. `http://broker:15672`.
    base_url: String,
    username: String,
    password: String,
    http: Client,
}

impl std::fmt::Debug for MgmtClient {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("MgmtClient")
            .field("base_url", &self.base_url)
            .field("username", &self.username)
            .field("password", &"***REDACTED***")
            .finish()
    }
}

impl MgmtClient {
    /// Create a client with the default user-agent.
    pub fn new(
        base_url: impl Into<String>,
        username: impl Into<String>,
        password: impl Into<String>,
    ) -> MgmtResult<Self> {
        Self::with_user_agent(base_url, username, password, DEFAULT_USER_AGENT)
    }

    /// Create a client with a custom user-agent.
    pub fn with_user_agent(
        base_url: impl Into<String>,
        username: impl Into<String>,
        password: impl Into<String>,
        user_agent: &str,
    ) -> MgmtResult<Self> {
        let http = Client::builder()
            .user_agent(user_agent)
            .build()
            .map_err(|e| MgmtError::invalid_config(format!("failed to build HTTP client: {e}")))?;
        Ok(Self::with_http_client(base_url, username, password, http))
    }

    /// Create a client around a pre-built `reqwest::Client`.
    ///
    /// The caller keeps responsibility for user-agent, TLS, and pool
    /// settings on the supplied client.
    #[must_use]
    pub fn with_http_client(
        base_url: impl Into<String>,
        username: impl Into<String>,
        password: impl Into<String>,
        http: Client,
    ) -> Self {
        let base_url = base_url.into().trim_end_matches('/').to_string();
        Self {
            base_url,
            username: username.into(),
            password: password.into(),
            http,
        }
    }

    /// The configured endpoint, normalized.
    #[must_use]
    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    /// The configured username.
    #[must_use]
    pub fn username(&self) -> &str {
        &self.username
    }

    // ── Envelope ──────────────────────────────────────────────────────

    /// Issue one request and classify the response.
    ///
    /// 200, 201 and 204 are success; every other status is decoded into
    /// [`MgmtError::Api`], preferring the broker's `{error, reason}` body.
    pub(crate) async fn request<B>(
        &self,
        cancel: &CancellationToken,
        method: Method,
        path: &str,
        body: Option<&B>,
    ) -> MgmtResult<Response>
    where
        B: Serialize + ?Sized,
    {
        if cancel.is_cancelled() {
            return Err(MgmtError::Cancelled);
        }

        let url = format!("{}/{}", self.base_url, path);
        debug!(%method, %url, "management API request");

        let mut builder = self
            .http
            .request(method, &url)
            .basic_auth(&self.username, Some(&self.password))
            .header(header::ACCEPT, "application/json");
        if let Some(body) = body {
            builder = builder.json(body);
        }

        let response = tokio::select! {
            biased;
            () = cancel.cancelled() => return Err(MgmtError::Cancelled),
            result = builder.send() => result?,
        };

        let status = response.status();
        if matches!(
            status,
            StatusCode::OK | StatusCode::CREATED | StatusCode::NO_CONTENT
        ) {
            Ok(response)
        } else {
            Err(self.error_from(cancel, response).await)
        }
    }

    /// Read a response body, still honoring cancellation mid-stream.
    async fn read_body(&self, cancel: &CancellationToken, response: Response) -> MgmtResult<String> {
        tokio::select! {
            biased;
            () = cancel.cancelled() => Err(MgmtError::Cancelled),
            text = response.text() => Ok(text?),
        }
    }

    /// Decode a non-success response into an API error.
    async fn error_from(&self, cancel: &CancellationToken, response: Response) -> MgmtError {
        let status = response.status();
        let body = match self.read_body(cancel, response).await {
            Ok(body) => body,
            Err(err) => return err,
        };

        let reason = serde_json::from_str::<ErrorBody>(&body)
            .ok()
            .and_then(|doc| doc.reason.or(doc.error))
            .unwrap_or_else(|| {
                if body.is_empty() {
                    status
                        .canonical_reason()
                        .unwrap_or("unknown error")
                        .to_string()
                } else {
                    body
                }
            });

        MgmtError::api(status.as_u16(), reason)
    }

    // ── Typed helpers ─────────────────────────────────────────────────

    /// GET and decode a JSON body; 404 is an error here.
    pub(crate) async fn get_json<T: DeserializeOwned>(
        &self,
        cancel: &CancellationToken,
        path: &str,
        context: &'static str,
    ) -> MgmtResult<T> {
        let response = self
            .request::<()>(cancel, Method::GET, path, None)
            .await?;
        let body = self.read_body(cancel, response).await?;
        serde_json::from_str(&body).map_err(|e| MgmtError::decode(context, e))
    }

    /// GET and decode, mapping the broker's 404 to `None`.
    ///
    /// This is what lets reconcilers distinguish "drifted away" from
    /// "request failed".
    pub(crate) async fn get_optional<T: DeserializeOwned>(
        &self,
        cancel: &CancellationToken,
        path: &str,
        context: &'static str,
    ) -> MgmtResult<Option<T>> {
        match self.get_json(cancel, path, context).await {
            Ok(value) => Ok(Some(value)),
            Err(err) if err.is_not_found() => Ok(None),
            Err(err) => Err(err),
        }
    }

    /// PUT a JSON body, discarding the response.
    pub(crate) async fn put_json<B>(
        &self,
        cancel: &CancellationToken,
        path: &str,
        body: &B,
    ) -> MgmtResult<()>
    where
        B: Serialize + ?Sized,
    {
        self.request(cancel, Method::PUT, path, Some(body)).await?;
        Ok(())
    }

    /// PUT with an empty body (vhost upsert, pause/resume actions).
    pub(crate) async fn put_empty(&self, cancel: &CancellationToken, path: &str) -> MgmtResult<()> {
        self.request::<()>(cancel, Method::PUT, path, None).await?;
        Ok(())
    }

    /// POST a JSON body, discarding the response.
    pub(crate) async fn post_json<B>(
        &self,
        cancel: &CancellationToken,
        path: &str,
        body: &B,
    ) -> MgmtResult<()>
    where
        B: Serialize + ?Sized,
    {
        self.request(cancel, Method::POST, path, Some(body)).await?;
        Ok(())
    }

    /// POST a JSON body and decode a JSON response.
    pub(crate) async fn post_json_response<T, B>(
        &self,
        cancel: &CancellationToken,
        path: &str,
        body: &B,
        context: &'static str,
    ) -> MgmtResult<T>
    where
        T: DeserializeOwned,
        B: Serialize + ?Sized,
    {
        let response = self.request(cancel, Method::POST, path, Some(body)).await?;
        let text = self.read_body(cancel, response).await?;
        serde_json::from_str(&text).map_err(|e| MgmtError::decode(context, e))
    }

    /// DELETE, propagating every error including 404.
    pub(crate) async fn delete(&self, cancel: &CancellationToken, path: &str) -> MgmtResult<()> {
        self.request::<()>(cancel, Method::DELETE, path, None)
            .await?;
        Ok(())
    }
}
