//! Tailnet status.

use crate::directory::DirectoryStatus;
use crate::LocalDirectory;
use serde::Deserialize;
use tailshale_core::{Result, TailshaleError};

/// Status endpoint (`tailscale status --json`)
pub struct StatusApi<'a> {
    client: &'a LocalDirectory,
}

impl<'a> StatusApi<'a> {
    pub(crate) fn new(client: &'a LocalDirectory) -> Self {
        Self { client }
    }

    /// Fetch the status of the local node and its tailnet
    pub async fn get(&self) -> Result<DirectoryStatus> {
        let raw: RawStatus = self
            .client
            .run_json(&["status", "--json", "--peers=false"])
            .await?;
        raw.into_status()
    }
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "PascalCase")]
struct RawStatus {
    #[serde(default)]
    backend_state: String,

    #[serde(rename = "MagicDNSSuffix", default)]
    magic_dns_suffix: String,

    #[serde(default)]
    current_tailnet: Option<RawTailnet>,
}

#[derive(Debug, Deserialize)]
struct RawTailnet {
    #[serde(rename = "MagicDNSSuffix", default)]
    magic_dns_suffix: String,
}

impl RawStatus {
    fn into_status(self) -> Result<DirectoryStatus> {
        if self.backend_state != "Running" {
            return Err(TailshaleError::Directory(format!(
                "tailscale is not running (state: {})",
                if self.backend_state.is_empty() {
                    "unknown"
                } else {
                    self.backend_state.as_str()
                }
            )));
        }

        let suffix = self
            .current_tailnet
            .map(|t| t.magic_dns_suffix)
            .filter(|s| !s.is_empty())
            .unwrap_or(self.magic_dns_suffix);

        if suffix.is_empty() {
            return Err(TailshaleError::Directory(
                "tailnet has no MagicDNS suffix".to_string(),
            ));
        }

        Ok(DirectoryStatus {
            trust_suffix: suffix,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn parse(json: &str) -> Result<DirectoryStatus> {
        serde_json::from_str::<RawStatus>(json).unwrap().into_status()
    }

    #[test]
    fn test_current_tailnet_suffix() {
        let status = parse(
            r#"{
                "Version": "1.76.1",
                "BackendState": "Running",
                "MagicDNSSuffix": "old.ts.net",
                "CurrentTailnet": {
                    "Name": "user@example.com",
                    "MagicDNSSuffix": "example.ts.net",
                    "MagicDNSEnabled": true
                },
                "Self": {"HostName": "laptop"}
            }"#,
        )
        .unwrap();
        assert_eq!(status.trust_suffix, "example.ts.net");
    }

    #[test]
    fn test_top_level_suffix_fallback() {
        let status =
            parse(r#"{"BackendState": "Running", "MagicDNSSuffix": "example.ts.net"}"#).unwrap();
        assert_eq!(status.trust_suffix, "example.ts.net");
    }

    #[test]
    fn test_not_running() {
        let err = parse(r#"{"BackendState": "NeedsLogin", "MagicDNSSuffix": "x.ts.net"}"#)
            .unwrap_err();
        assert!(err.to_string().contains("NeedsLogin"));
    }

    #[test]
    fn test_missing_suffix() {
        let err = parse(r#"{"BackendState": "Running"}"#).unwrap_err();
        assert!(matches!(err, TailshaleError::Directory(_)));
    }
}
