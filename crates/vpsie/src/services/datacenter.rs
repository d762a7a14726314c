//! Data centers available to the account.

use serde::{Deserialize, Serialize};
use vpsie_core::{ListOptions, RequestContext};

use super::de::null_as_default;
use crate::{Result, VpsieClient};

const DATACENTER_PATH: &str = "/apps/v2/datacenter";

/// A VPSie data center.
///
/// Boolean-like flags are reported by the API as `0`/`1` integers.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct DataCenter {
    /// Display name.
    #[serde(default, deserialize_with = "null_as_default")]
    pub dc_name: String,
    /// Flag image URL.
    #[serde(default, deserialize_with = "null_as_default")]
    pub dc_image: String,
    /// State or province.
    #[serde(default, deserialize_with = "null_as_default")]
    pub state: String,
    /// Country.
    #[serde(default, deserialize_with = "null_as_default")]
    pub country: String,
    /// Whether the data center accepts new resources.
    #[serde(default, deserialize_with = "null_as_default")]
    pub is_active: i32,
    /// Identifier used by other endpoints.
    pub identifier: String,
    /// Whether the UI selects it by default.
    #[serde(default, deserialize_with = "null_as_default")]
    pub default_selected: i32,
    /// Soft-delete flag.
    #[serde(default, deserialize_with = "null_as_default")]
    pub is_deleted: i32,
    /// Floating IPs supported.
    #[serde(default, deserialize_with = "null_as_default")]
    pub is_fip_available: i32,
    /// Object storage supported.
    #[serde(default, deserialize_with = "null_as_default")]
    pub is_bucket_available: i32,
    /// Private data center.
    #[serde(default, deserialize_with = "null_as_default")]
    pub is_private: i32,
}

impl DataCenter {
    /// Returns true if the data center is active and not deleted.
    #[must_use]
    pub const fn is_usable(&self) -> bool {
        self.is_active == 1 && self.is_deleted == 0
    }
}

/// Data center operations.
#[derive(Debug, Clone, Copy)]
pub struct DataCenterService<'a> {
    client: &'a VpsieClient,
}

impl<'a> DataCenterService<'a> {
    pub(crate) const fn new(client: &'a VpsieClient) -> Self {
        Self { client }
    }

    /// List data centers, one page at a time.
    ///
    /// # Errors
    ///
    /// Returns [`vpsie_core::Error::Api`] on a non-2xx status, or
    /// [`vpsie_core::Error::DecodeFailure`] if an item does not match the model.
    pub async fn list(&self, ctx: &RequestContext, options: &ListOptions) -> Result<Vec<DataCenter>> {
        let path = options.apply(DATACENTER_PATH);
        self.client.fetch_list(ctx, &path).await
    }
}
