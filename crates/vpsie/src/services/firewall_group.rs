//! Firewall groups and their attachment to servers.
//!
//! A group holds inbound and outbound rules and can be attached to any
//! number of servers. Rule timestamps are RFC 3339.

use chrono::{DateTime, Utc};
use reqwest::Method;
use serde::{Deserialize, Serialize};
use vpsie_core::RequestContext;

use super::de::null_as_default;
use crate::{Result, VpsieClient};

const FIREWALL_PATH: &str = "/apps/v2/firewall";

/// Summary of a firewall group as returned by the list endpoint.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct FirewallGroupSummary {
    /// Owner.
    #[serde(default, deserialize_with = "null_as_default")]
    pub user_name: String,
    /// Numeric ID.
    pub id: i64,
    /// Group name.
    pub group_name: String,
    /// Group identifier used in paths.
    pub identifier: String,
    /// Creation timestamp.
    #[serde(default, deserialize_with = "null_as_default")]
    pub created_on: String,
    /// Last update timestamp.
    #[serde(default, deserialize_with = "null_as_default")]
    pub updated_on: String,
    /// Number of inbound rules.
    #[serde(default, deserialize_with = "null_as_default")]
    pub inbound_count: i64,
    /// Number of outbound rules.
    #[serde(default, deserialize_with = "null_as_default")]
    pub outbound_count: i64,
    /// Number of attached servers.
    #[serde(default, deserialize_with = "null_as_default")]
    pub vms: i64,
    /// Creator user ID.
    #[serde(default, deserialize_with = "null_as_default")]
    pub created_by: i64,
    /// Rule sets.
    #[serde(default, deserialize_with = "null_as_default")]
    pub rules: Vec<FirewallRules>,
    /// Attached servers.
    #[serde(rename = "vmsData", default, deserialize_with = "null_as_default")]
    pub vms_data: Vec<AttachedServer>,
}

/// Full view of a single group.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct FirewallGroupDetail {
    /// Group header.
    pub group: FirewallGroup,
    /// Rule sets.
    #[serde(default, deserialize_with = "null_as_default")]
    pub rules: Vec<FirewallRules>,
    /// Attached servers.
    #[serde(default, deserialize_with = "null_as_default")]
    pub vms: Vec<AttachedServer>,
    /// Number of attached servers.
    #[serde(default, deserialize_with = "null_as_default")]
    pub count: i64,
}

/// Group header fields.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct FirewallGroup {
    /// Owner.
    #[serde(default, deserialize_with = "null_as_default")]
    pub user_name: String,
    /// Numeric ID.
    pub id: i64,
    /// Group name.
    pub group_name: String,
    /// Group identifier.
    pub identifier: String,
    /// Creation timestamp.
    #[serde(default, deserialize_with = "null_as_default")]
    pub created_on: String,
    /// Last update timestamp.
    #[serde(default, deserialize_with = "null_as_default")]
    pub updated_on: String,
    /// Number of inbound rules.
    #[serde(default, deserialize_with = "null_as_default")]
    pub inbound_count: i64,
    /// Number of outbound rules.
    #[serde(default, deserialize_with = "null_as_default")]
    pub outbound_count: i64,
    /// Number of attached servers.
    #[serde(default, deserialize_with = "null_as_default")]
    pub vms: i64,
    /// Creator user ID.
    #[serde(default, deserialize_with = "null_as_default")]
    pub created_by: i64,
}

/// A server a group is attached to.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct AttachedServer {
    /// Hostname.
    pub hostname: String,
    /// Server identifier.
    pub identifier: String,
    /// Full name.
    #[serde(default, deserialize_with = "null_as_default")]
    pub fullname: String,
    /// Category.
    #[serde(default, deserialize_with = "null_as_default")]
    pub category: String,
}

/// Inbound and outbound rules of a group.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
pub struct FirewallRules {
    /// Inbound rules.
    #[serde(rename = "inBound", default, deserialize_with = "null_as_default")]
    pub inbound: Vec<FirewallRule>,
    /// Outbound rules.
    #[serde(rename = "outBound", default, deserialize_with = "null_as_default")]
    pub outbound: Vec<FirewallRule>,
}

/// A stored firewall rule.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct FirewallRule {
    /// Numeric ID.
    pub id: i64,
    /// Owning group.
    pub group_id: i64,
    /// Owning user.
    #[serde(default, deserialize_with = "null_as_default")]
    pub user_id: i64,
    /// `ACCEPT`, `DROP` or `REJECT`.
    pub action: String,
    /// `in` or `out`.
    #[serde(rename = "type")]
    pub direction: String,
    /// Comment.
    #[serde(default, deserialize_with = "null_as_default")]
    pub comment: String,
    /// Destination addresses.
    #[serde(
        default,
        deserialize_with = "null_as_default",
        skip_serializing_if = "Vec::is_empty"
    )]
    pub dest: Vec<String>,
    /// Destination port.
    #[serde(default, deserialize_with = "null_as_default")]
    pub dport: String,
    /// Protocol.
    #[serde(default, deserialize_with = "null_as_default")]
    pub proto: String,
    /// Source addresses.
    #[serde(
        default,
        deserialize_with = "null_as_default",
        skip_serializing_if = "Vec::is_empty"
    )]
    pub source: Vec<String>,
    /// Source port.
    #[serde(default, deserialize_with = "null_as_default")]
    pub sport: String,
    /// 1 when enabled.
    #[serde(default, deserialize_with = "null_as_default")]
    pub enable: i32,
    /// Interface.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub iface: Option<String>,
    /// Log level.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub log: Option<String>,
    /// Predefined macro.
    #[serde(rename = "macro", default, skip_serializing_if = "Option::is_none")]
    pub macro_name: Option<String>,
    /// Rule identifier.
    pub identifier: String,
    /// Creation time.
    pub created_on: DateTime<Utc>,
    /// Last update time.
    pub updated_on: DateTime<Utc>,
}

/// A rule as submitted when creating or updating a group.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq, Eq)]
pub struct FirewallRuleRequest {
    /// `ACCEPT`, `DROP` or `REJECT`.
    pub action: String,
    /// `in` or `out`.
    #[serde(rename = "type")]
    pub direction: String,
    /// Destination port.
    pub dport: String,
    /// Protocol.
    pub proto: String,
    /// Source addresses.
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub source: Vec<String>,
    /// Source port.
    pub sport: String,
    /// 1 when enabled.
    pub enable: i32,
    /// Predefined macro.
    #[serde(rename = "macro")]
    pub macro_name: String,
    /// Comment.
    pub comment: String,
    /// Destination addresses.
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub dest: Vec<String>,
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct CreateGroupRequest<'a> {
    group_name: &'a str,
    #[serde(skip_serializing_if = "Option::is_none")]
    rules: Option<&'a [FirewallRuleRequest]>,
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct GroupIdRequest<'a> {
    group_id: &'a str,
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct GroupServerRequest<'a> {
    vm_id: &'a str,
    group_id: &'a str,
}

/// Firewall group operations.
#[derive(Debug, Clone, Copy)]
pub struct FirewallGroupService<'a> {
    client: &'a VpsieClient,
}

impl<'a> FirewallGroupService<'a> {
    pub(crate) const fn new(client: &'a VpsieClient) -> Self {
        Self { client }
    }

    /// List all groups.
    ///
    /// # Errors
    ///
    /// Returns [`vpsie_core::Error::Api`] on a non-2xx status, or
    /// [`vpsie_core::Error::DecodeFailure`] if an item does not match the model.
    pub async fn list(&self, ctx: &RequestContext) -> Result<Vec<FirewallGroupSummary>> {
        let path = format!("{FIREWALL_PATH}/groups");
        self.client.fetch_list(ctx, &path).await
    }

    /// Fetch one group with its rules and attached servers.
    ///
    /// # Errors
    ///
    /// Returns [`vpsie_core::Error::Api`] on a non-2xx status (404 for an
    /// unknown identifier) and [`vpsie_core::Error::MissingData`] if the
    /// response carries no `data`.
    pub async fn get(&self, ctx: &RequestContext, group_id: &str) -> Result<FirewallGroupDetail> {
        let path = format!("{FIREWALL_PATH}/group/{group_id}");
        self.client.fetch::<(), _>(ctx, Method::GET, &path, None).await
    }

    /// Create a group, optionally with an initial rule set.
    ///
    /// # Errors
    ///
    /// Returns [`vpsie_core::Error::Api`] if the API rejects the request.
    pub async fn create(
        &self,
        ctx: &RequestContext,
        group_name: &str,
        rules: &[FirewallRuleRequest],
    ) -> Result<()> {
        let path = format!("{FIREWALL_PATH}/create/group");
        let request = CreateGroupRequest {
            group_name,
            rules: (!rules.is_empty()).then_some(rules),
        };
        self.client
            .send(ctx, Method::POST, &path, Some(&request))
            .await
    }

    /// Submit a rule change to a group.
    ///
    /// # Errors
    ///
    /// Returns [`vpsie_core::Error::Api`] if the API rejects the request.
    pub async fn update(
        &self,
        ctx: &RequestContext,
        group_id: &str,
        rule: &FirewallRuleRequest,
    ) -> Result<()> {
        let path = format!("{FIREWALL_PATH}/groups/{group_id}");
        self.client.send(ctx, Method::POST, &path, Some(rule)).await
    }

    /// Delete a group.
    ///
    /// # Errors
    ///
    /// Returns [`vpsie_core::Error::Api`] if the API rejects the request.
    pub async fn delete(&self, ctx: &RequestContext, group_id: &str) -> Result<()> {
        let path = format!("{FIREWALL_PATH}/delete/group");
        let request = GroupIdRequest { group_id };
        self.client
            .send(ctx, Method::DELETE, &path, Some(&request))
            .await
    }

    /// Attach a group to a server.
    ///
    /// # Errors
    ///
    /// Returns [`vpsie_core::Error::Api`] if the API rejects the request.
    pub async fn attach_to_server(
        &self,
        ctx: &RequestContext,
        group_id: &str,
        vm_id: &str,
    ) -> Result<()> {
        self.group_server(ctx, "attach", group_id, vm_id).await
    }

    /// Detach a group from a server.
    ///
    /// # Errors
    ///
    /// Returns [`vpsie_core::Error::Api`] if the API rejects the request.
    pub async fn detach_from_server(
        &self,
        ctx: &RequestContext,
        group_id: &str,
        vm_id: &str,
    ) -> Result<()> {
        self.group_server(ctx, "detach", group_id, vm_id).await
    }

    async fn group_server(
        &self,
        ctx: &RequestContext,
        action: &str,
        group_id: &str,
        vm_id: &str,
    ) -> Result<()> {
        let path = format!("{FIREWALL_PATH}/{action}/group");
        let request = GroupServerRequest { vm_id, group_id };
        self.client
            .send(ctx, Method::POST, &path, Some(&request))
            .await
    }
}
