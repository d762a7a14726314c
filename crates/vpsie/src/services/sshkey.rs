//! SSH keys stored on the account.

use reqwest::Method;
use serde::{Deserialize, Serialize};
use vpsie_core::RequestContext;

use crate::{Result, VpsieClient};

const SSH_KEYS_PATH: &str = "/apps/v2/sshkeys";
const SSH_KEY_PATH: &str = "/apps/v2/sshkey";

/// An SSH key registered with VPSie.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct SshKey {
    /// Numeric key ID.
    pub id: i64,
    /// Owning user ID.
    pub user_id: i64,
    /// Display name.
    pub name: String,
    /// Public key material (the API calls it `private_key`).
    pub private_key: String,
    /// Creation timestamp as reported by the API.
    pub created_on: String,
    /// Key identifier used in paths.
    pub identifier: String,
    /// Creator.
    #[serde(default)]
    pub created_by: Option<String>,
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct CreateSshKeyRequest<'a> {
    private_key: &'a str,
    name: &'a str,
}

#[derive(Serialize)]
struct IdentifierRequest<'a> {
    identifier: &'a str,
}

/// SSH key operations.
#[derive(Debug, Clone, Copy)]
pub struct SshKeyService<'a> {
    client: &'a VpsieClient,
}

impl<'a> SshKeyService<'a> {
    pub(crate) const fn new(client: &'a VpsieClient) -> Self {
        Self { client }
    }

    /// List all SSH keys.
    ///
    /// # Errors
    ///
    /// Returns [`vpsie_core::Error::Api`] on a non-2xx status, or
    /// [`vpsie_core::Error::DecodeFailure`] if an item does not match the model.
    pub async fn list(&self, ctx: &RequestContext) -> Result<Vec<SshKey>> {
        self.client.fetch_list(ctx, SSH_KEYS_PATH).await
    }

    /// Fetch a single key.
    ///
    /// # Errors
    ///
    /// Returns [`vpsie_core::Error::Api`] on a non-2xx status (404 for an
    /// unknown identifier) and [`vpsie_core::Error::MissingData`] if the
    /// response carries no `data`.
    pub async fn get(&self, ctx: &RequestContext, identifier: &str) -> Result<SshKey> {
        let path = format!("{SSH_KEY_PATH}/{identifier}");
        self.client.fetch::<(), _>(ctx, Method::GET, &path, None).await
    }

    /// Register a new key.
    ///
    /// # Errors
    ///
    /// Returns [`vpsie_core::Error::Api`] if the API rejects the request.
    pub async fn create(&self, ctx: &RequestContext, private_key: &str, name: &str) -> Result<()> {
        let path = format!("{SSH_KEY_PATH}/add");
        let request = CreateSshKeyRequest { private_key, name };
        self.client
            .send(ctx, Method::POST, &path, Some(&request))
            .await
    }

    /// Remove a key.
    ///
    /// # Errors
    ///
    /// Returns [`vpsie_core::Error::Api`] if the API rejects the request.
    pub async fn delete(&self, ctx: &RequestContext, identifier: &str) -> Result<()> {
        let request = IdentifierRequest { identifier };
        self.client
            .send(ctx, Method::DELETE, SSH_KEY_PATH, Some(&request))
            .await
    }
}
