//! Per-vhost user permissions.

use serde::{Deserialize, Serialize};
use tokio_util::sync::CancellationToken;

use crate::client::MgmtClient;
use crate::error::MgmtResult;
use crate::path::api_path;

/// The three permission regexes. An empty string denies everything,
/// `".*"` allows everything.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct PermissionSettings {
    pub configure: String,
    pub write: String,
    pub read: String,
}

/// A permission grant as reported by the broker.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct PermissionInfo {
    pub user: String,
    pub vhost: String,
    pub configure: String,
    pub write: String,
    pub read: String,
}

impl MgmtClient {
    /// Grant (or replace) a user's permissions on a vhost.
    pub async fn upsert_permission(
        &self,
        cancel: &CancellationToken,
        vhost: &str,
        user: &str,
        settings: &PermissionSettings,
    ) -> MgmtResult<()> {
        self.put_json(cancel, &api_path(["permissions", vhost, user]), settings)
            .await
    }

    /// Fetch one grant; `None` when no permissions are set for the pair.
    pub async fn get_permission(
        &self,
        cancel: &CancellationToken,
        vhost: &str,
        user: &str,
    ) -> MgmtResult<Option<PermissionInfo>> {
        self.get_optional(cancel, &api_path(["permissions", vhost, user]), "permission")
            .await
    }

    /// List every grant on the broker.
    pub async fn list_permissions(
        &self,
        cancel: &CancellationToken,
    ) -> MgmtResult<Vec<PermissionInfo>> {
        self.get_json(cancel, &api_path(["permissions"]), "permission list")
            .await
    }

    /// List the grants held by one user across vhosts.
    pub async fn list_user_permissions(
        &self,
        cancel: &CancellationToken,
        user: &str,
    ) -> MgmtResult<Vec<PermissionInfo>> {
        self.get_json(
            cancel,
            &api_path(["users", user, "permissions"]),
            "user permission list",
        )
        .await
    }

    /// List the grants inside one vhost.
    pub async fn list_vhost_permissions(
        &self,
        cancel: &CancellationToken,
        vhost: &str,
    ) -> MgmtResult<Vec<PermissionInfo>> {
        self.get_json(
            cancel,
            &api_path(["vhosts", vhost, "permissions"]),
            "vhost permission list",
        )
        .await
    }

    /// Revoke a user's permissions on a vhost.
    pub async fn delete_permission(
        &self,
        cancel: &CancellationToken,
        vhost: &str,
        user: &str,
    ) -> MgmtResult<()> {
        self.delete(cancel, &api_path(["permissions", vhost, user]))
            .await
    }
}
