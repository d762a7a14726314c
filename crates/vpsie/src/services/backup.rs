//! Server backups.

use reqwest::Method;
use serde::{Deserialize, Serialize};
use vpsie_core::RequestContext;

use super::de::null_as_default;
use crate::{Result, VpsieClient};

const BACKUPS_PATH: &str = "/apps/v2/backups";
const BACKUP_PATH: &str = "/apps/v2/backup";
const SERVER_BACKUPS_PATH: &str = "/apps/v2/vm/backups";

/// A backup of a server.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct Backup {
    /// Hostname of the backed up server.
    #[serde(rename = "hostname", default, deserialize_with = "null_as_default")]
    pub host_name: String,
    /// Backup name.
    #[serde(default, deserialize_with = "null_as_default")]
    pub name: String,
    /// Backup identifier.
    pub identifier: String,
    /// Free-form note.
    #[serde(default, deserialize_with = "null_as_default")]
    pub note: String,
    /// Storage key.
    #[serde(default, deserialize_with = "null_as_default")]
    pub backup_key: String,
    /// Lifecycle state.
    #[serde(default, deserialize_with = "null_as_default")]
    pub state: String,
    /// Data center holding the backup.
    #[serde(default, deserialize_with = "null_as_default")]
    pub dc_identifier: String,
    /// Source server.
    #[serde(default, deserialize_with = "null_as_default")]
    pub vm_identifier: String,
    /// Box ID.
    #[serde(default, deserialize_with = "null_as_default")]
    pub box_id: i64,
    /// SHA-1 of the backup image.
    #[serde(rename = "backupsha1", default, deserialize_with = "null_as_default")]
    pub backup_sha1: String,
    /// Operating system of the source server.
    #[serde(default, deserialize_with = "null_as_default")]
    pub os_full_name: String,
    /// Server category.
    #[serde(default, deserialize_with = "null_as_default")]
    pub vm_category: String,
    /// Creator.
    #[serde(rename = "created_by", default, deserialize_with = "null_as_default")]
    pub created_by: String,
    /// Creation timestamp.
    #[serde(rename = "created_on", default, deserialize_with = "null_as_default")]
    pub created_on: String,
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct CreateBackupRequest<'a> {
    vm_identifier: &'a str,
    name: &'a str,
    note: &'a str,
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct BackupIdentifierRequest<'a> {
    backup_identifier: &'a str,
}

/// Backup operations.
#[derive(Debug, Clone, Copy)]
pub struct BackupService<'a> {
    client: &'a VpsieClient,
}

impl<'a> BackupService<'a> {
    pub(crate) const fn new(client: &'a VpsieClient) -> Self {
        Self { client }
    }

    /// List every backup on the account.
    ///
    /// # Errors
    ///
    /// Returns [`vpsie_core::Error::Api`] on a non-2xx status, or
    /// [`vpsie_core::Error::DecodeFailure`] if an item does not match the model.
    pub async fn list(&self, ctx: &RequestContext) -> Result<Vec<Backup>> {
        self.client.fetch_list(ctx, BACKUPS_PATH).await
    }

    /// List backups of one server.
    ///
    /// # Errors
    ///
    /// Returns [`vpsie_core::Error::Api`] on a non-2xx status, or
    /// [`vpsie_core::Error::DecodeFailure`] if an item does not match the model.
    pub async fn list_by_server(
        &self,
        ctx: &RequestContext,
        vm_identifier: &str,
    ) -> Result<Vec<Backup>> {
        let path = format!("{SERVER_BACKUPS_PATH}/{vm_identifier}");
        self.client.fetch_list(ctx, &path).await
    }

    /// Take a backup of a server.
    ///
    /// # Errors
    ///
    /// Returns [`vpsie_core::Error::Api`] if the API rejects the request.
    pub async fn create(
        &self,
        ctx: &RequestContext,
        vm_identifier: &str,
        name: &str,
        note: &str,
    ) -> Result<()> {
        let path = format!("{BACKUP_PATH}/add");
        let request = CreateBackupRequest {
            vm_identifier,
            name,
            note,
        };
        self.client
            .send(ctx, Method::POST, &path, Some(&request))
            .await
    }

    /// Delete a backup.
    ///
    /// # Errors
    ///
    /// Returns [`vpsie_core::Error::Api`] if the API rejects the request.
    pub async fn delete(&self, ctx: &RequestContext, backup_identifier: &str) -> Result<()> {
        let request = BackupIdentifierRequest { backup_identifier };
        self.client
            .send(ctx, Method::DELETE, BACKUP_PATH, Some(&request))
            .await
    }

    /// Provision a new server from a backup.
    ///
    /// # Errors
    ///
    /// Returns [`vpsie_core::Error::Api`] if the API rejects the request.
    pub async fn restore_to_new_server(
        &self,
        ctx: &RequestContext,
        backup_identifier: &str,
    ) -> Result<()> {
        let path = format!("{BACKUPS_PATH}/create");
        let request = BackupIdentifierRequest { backup_identifier };
        self.client
            .send(ctx, Method::POST, &path, Some(&request))
            .await
    }
}
