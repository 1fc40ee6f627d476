//! Node identity lookups.

use crate::directory::DirectoryNode;
use crate::LocalDirectory;
use serde::Deserialize;
use std::net::IpAddr;
use tailshale_core::Result;

/// Whois endpoint (`tailscale whois --json`)
pub struct WhoIsApi<'a> {
    client: &'a LocalDirectory,
}

impl<'a> WhoIsApi<'a> {
    pub(crate) fn new(client: &'a LocalDirectory) -> Self {
        Self { client }
    }

    /// Look up the node that owns `addr`
    pub async fn lookup(&self, addr: IpAddr) -> Result<DirectoryNode> {
        let addr = addr.to_string();
        let raw: RawWhoIs = self.client.run_json(&["whois", "--json", &addr]).await?;
        Ok(raw.into())
    }
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "PascalCase")]
struct RawWhoIs {
    node: RawNode,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "PascalCase")]
struct RawNode {
    name: String,

    #[serde(default)]
    hostinfo: Option<RawHostinfo>,
}

#[derive(Debug, Default, Deserialize)]
struct RawHostinfo {
    #[serde(rename = "SSH_HostKeys", default)]
    ssh_host_keys: Option<Vec<String>>,
}

impl From<RawWhoIs> for DirectoryNode {
    fn from(raw: RawWhoIs) -> Self {
        let host_keys = raw
            .node
            .hostinfo
            .and_then(|h| h.ssh_host_keys)
            .unwrap_or_default();

        Self {
            name: raw.node.name,
            ssh_enabled: !host_keys.is_empty(),
            host_keys,
        }
    }
}
