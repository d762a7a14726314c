//! Resource services.
//!
//! Each service is a borrowed handle obtained from [`crate::VpsieClient`];
//! creating one is free.

mod access_token;
mod account;
mod backup;
mod datacenter;
mod de;
mod fip;
mod firewall_group;
mod sshkey;

pub use access_token::{AccessToken, AccessTokenService};
pub use account::{AccountService, Token, TokenDetails};
pub use backup::{Backup, BackupService};
pub use datacenter::{DataCenter, DataCenterService};
pub use fip::FloatingIpService;
pub use firewall_group::{
    AttachedServer, FirewallGroup, FirewallGroupDetail, FirewallGroupService,
    FirewallGroupSummary, FirewallRule, FirewallRuleRequest, FirewallRules,
};
pub use sshkey::{SshKey, SshKeyService};
