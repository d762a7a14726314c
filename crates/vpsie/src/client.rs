//! Aggregate VPSie client and the request helpers shared by resource services.

use reqwest::Method;
use serde::de::DeserializeOwned;
use serde::Serialize;
use tracing::debug;
use vpsie_core::config::VpsieConfig;
use vpsie_core::types::DEFAULT_BASE_URL;
use vpsie_core::{ApiClient, Envelope, RequestContext};

use crate::services::{
    AccessTokenService, AccountService, BackupService, DataCenterService, FloatingIpService,
    FirewallGroupService, SshKeyService,
};
use crate::Result;

/// Entry point for the VPSie API.
///
/// Wraps an [`ApiClient`] and hands out one lightweight service handle per
/// resource family.
#[derive(Debug, Clone)]
pub struct VpsieClient {
    inner: ApiClient,
}

impl VpsieClient {
    /// Client for the public VPSie endpoint authenticated with `token`.
    ///
    /// # Errors
    ///
    /// Returns [`vpsie_core::Error::ConfigError`] if the default transport
    /// cannot be created.
    pub fn new(token: impl Into<String>) -> Result<Self> {
        let inner = ApiClient::builder(DEFAULT_BASE_URL).with_token(token).build()?;
        Ok(Self { inner })
    }

    /// Client built from application settings.
    ///
    /// # Errors
    ///
    /// Returns [`vpsie_core::Error::ConfigError`] if `config` fails
    /// validation or its base URL is not absolute.
    pub fn from_config(config: &VpsieConfig) -> Result<Self> {
        Ok(Self {
            inner: ApiClient::from_config(config)?,
        })
    }

    /// Wrap an already configured core client.
    #[must_use]
    pub fn from_api_client(inner: ApiClient) -> Self {
        Self { inner }
    }

    /// The underlying core client, for setters and custom calls.
    #[must_use]
    pub fn api(&self) -> &ApiClient {
        &self.inner
    }

    /// Authentication endpoints.
    #[must_use]
    pub fn account(&self) -> AccountService<'_> {
        AccountService::new(self)
    }

    /// Personal access tokens.
    #[must_use]
    pub fn access_tokens(&self) -> AccessTokenService<'_> {
        AccessTokenService::new(self)
    }

    /// Server backups.
    #[must_use]
    pub fn backups(&self) -> BackupService<'_> {
        BackupService::new(self)
    }

    /// Data centers.
    #[must_use]
    pub fn datacenters(&self) -> DataCenterService<'_> {
        DataCenterService::new(self)
    }

    /// Floating IPs.
    #[must_use]
    pub fn floating_ips(&self) -> FloatingIpService<'_> {
        FloatingIpService::new(self)
    }

    /// Firewall groups.
    #[must_use]
    pub fn firewall_groups(&self) -> FirewallGroupService<'_> {
        FirewallGroupService::new(self)
    }

    /// SSH keys.
    #[must_use]
    pub fn ssh_keys(&self) -> SshKeyService<'_> {
        SshKeyService::new(self)
    }

    /// Build, send and decode the whole response body into `R`.
    ///
    /// Fails with `MissingData` when the server answers 204.
    pub(crate) async fn call<B, R>(
        &self,
        ctx: &RequestContext,
        method: Method,
        path: &str,
        body: Option<&B>,
    ) -> Result<R>
    where
        B: Serialize + ?Sized,
        R: DeserializeOwned,
    {
        debug!(%method, path, "VPSie request");
        let request = self.inner.build_request(ctx, method, path, body)?;
        self.inner
            .execute::<R>(ctx, request)
            .await?
            .ok_or_else(|| vpsie_core::Error::MissingData(format!("{path}: empty response")))
    }

    /// Like [`VpsieClient::call`] but unwraps the `data` field of the envelope.
    pub(crate) async fn fetch<B, T>(
        &self,
        ctx: &RequestContext,
        method: Method,
        path: &str,
        body: Option<&B>,
    ) -> Result<T>
    where
        B: Serialize + ?Sized,
        T: DeserializeOwned,
    {
        self.call::<B, Envelope<T>>(ctx, method, path, body)
            .await?
            .into_data(path)
    }

    /// GET a list endpoint.
    ///
    /// A `null` or absent `data` field and a 204 both read as an empty list.
    pub(crate) async fn fetch_list<T>(&self, ctx: &RequestContext, path: &str) -> Result<Vec<T>>
    where
        T: DeserializeOwned,
    {
        debug!(method = %Method::GET, path, "VPSie request");
        let request = self.inner.build_request::<()>(ctx, Method::GET, path, None)?;
        Ok(self
            .inner
            .execute::<Envelope<Vec<T>>>(ctx, request)
            .await?
            .and_then(|envelope| envelope.data)
            .unwrap_or_default())
    }

    /// Build and send, ignoring any response body.
    pub(crate) async fn send<B>(
        &self,
        ctx: &RequestContext,
        method: Method,
        path: &str,
        body: Option<&B>,
    ) -> Result<()>
    where
        B: Serialize + ?Sized,
    {
        debug!(%method, path, "VPSie request");
        let request = self.inner.build_request(ctx, method, path, body)?;
        self.inner.execute_unit(ctx, request).await
    }
}


#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn new_targets_public_endpoint_with_token() {
        let client = VpsieClient::new("abc").unwrap();
        assert_eq!(client.api().base_url().as_str(), DEFAULT_BASE_URL);
        assert_eq!(
            client.api().default_headers()[vpsie_core::types::AUTH_HEADER],
            "abc"
        );
    }

    #[test]
    fn from_config_rejects_invalid_settings() {
        let config = VpsieConfig::default().with_timeout(0);
        assert!(VpsieClient::from_config(&config).is_err());
    }
}
