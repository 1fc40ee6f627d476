//! The directory seam between the resolver and tailscaled.

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use std::net::IpAddr;
use tailshale_core::Result;

/// Tailnet-wide facts reported by the local node
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DirectoryStatus {
    /// MagicDNS suffix of the tailnet, e.g. `example.ts.net`
    pub trust_suffix: String,
}

/// What the directory knows about one node
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct DirectoryNode {
    /// Node name as reported by the directory, possibly with trailing dot
    pub name: String,

    /// Whether the node runs Tailscale SSH
    pub ssh_enabled: bool,

    /// Host keys in authorized_keys format
    #[serde(default)]
    pub host_keys: Vec<String>,
}

/// Operations the resolver needs from the tailnet's identity directory
#[async_trait]
pub trait DirectoryClient: Send + Sync {
    /// Tailnet status, queried once per session
    async fn status(&self) -> Result<DirectoryStatus>;

    /// Raw DNS wire-format response for `name` and record type `qtype`
    async fn query_dns(&self, name: &str, qtype: &str) -> Result<Vec<u8>>;

    /// Identity of the node owning `addr`
    async fn who_is(&self, addr: IpAddr) -> Result<DirectoryNode>;
}

#[async_trait]
impl<T: DirectoryClient + ?Sized> DirectoryClient for Box<T> {
    async fn status(&self) -> Result<DirectoryStatus> {
        (**self).status().await
    }

    async fn query_dns(&self, name: &str, qtype: &str) -> Result<Vec<u8>> {
        (**self).query_dns(name, qtype).await
    }

    async fn who_is(&self, addr: IpAddr) -> Result<DirectoryNode> {
        (**self).who_is(addr).await
    }
}
