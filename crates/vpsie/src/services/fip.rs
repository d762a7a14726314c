//! Floating (public) IP addresses.

use reqwest::Method;
use serde::Serialize;
use vpsie_core::RequestContext;

use crate::{Result, VpsieClient};

const FIP_PATH: &str = "/apps/v2/fip";

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct CreateFloatingIpRequest<'a> {
    vm_identifier: &'a str,
    dc_identifier: &'a str,
    ip_type: &'a str,
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct UnassignFloatingIpRequest<'a> {
    id: &'a str,
    remove_from_user_account: &'a str,
}

/// Floating IP operations.
#[derive(Debug, Clone, Copy)]
pub struct FloatingIpService<'a> {
    client: &'a VpsieClient,
}

impl<'a> FloatingIpService<'a> {
    pub(crate) const fn new(client: &'a VpsieClient) -> Self {
        Self { client }
    }

    /// Ask the API for the IP ranges a floating IP can be allocated from.
    ///
    /// The payload is not interpreted; only the outcome is reported.
    ///
    /// # Errors
    ///
    /// Returns [`vpsie_core::Error::Api`] if the API rejects the request.
    pub async fn list_ranges(&self, ctx: &RequestContext) -> Result<()> {
        let path = format!("{FIP_PATH}/create/ranges");
        self.client.send::<()>(ctx, Method::GET, &path, None).await
    }

    /// Allocate a floating IP and assign it to a server.
    ///
    /// `ip_type` is `ipv4` or `ipv6`.
    ///
    /// # Errors
    ///
    /// Returns [`vpsie_core::Error::Api`] if the API rejects the request.
    pub async fn create(
        &self,
        ctx: &RequestContext,
        vm_identifier: &str,
        dc_identifier: &str,
        ip_type: &str,
    ) -> Result<()> {
        let path = format!("{FIP_PATH}/add/public/ip");
        let request = CreateFloatingIpRequest {
            vm_identifier,
            dc_identifier,
            ip_type,
        };
        self.client
            .send(ctx, Method::POST, &path, Some(&request))
            .await
    }

    /// Detach a floating IP from its server, keeping it on the account.
    ///
    /// # Errors
    ///
    /// Returns [`vpsie_core::Error::Api`] if the API rejects the request.
    pub async fn unassign(&self, ctx: &RequestContext, id: &str) -> Result<()> {
        let path = format!("{FIP_PATH}/remove/public/ip");
        let request = UnassignFloatingIpRequest {
            id,
            remove_from_user_account: "0",
        };
        self.client
            .send(ctx, Method::DELETE, &path, Some(&request))
            .await
    }
}
