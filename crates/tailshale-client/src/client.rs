//! Directory client backed by the local tailscaled.

use crate::api::{DnsApi, StatusApi, WhoIsApi};
use crate::config::LocalDirectoryConfig;
use crate::directory::{DirectoryClient, DirectoryNode, DirectoryStatus};
use async_trait::async_trait;
use serde::de::DeserializeOwned;
use std::future::Future;
use std::net::{IpAddr, SocketAddr};
use std::path::PathBuf;
use std::process::Stdio;
use std::sync::Arc;
use std::time::Duration;
use tailshale_core::{Result, TailshaleError};
use tokio::process::Command;
use tracing::debug;

/// Directory client talking to the tailscaled of this machine
///
/// Status and whois queries go through the `tailscale` CLI in JSON mode;
/// DNS queries go straight to the MagicDNS resolver.
#[derive(Clone)]
pub struct LocalDirectory {
    inner: Arc<DirectoryInner>,
}

struct DirectoryInner {
    config: LocalDirectoryConfig,
}

impl Default for LocalDirectory {
    fn default() -> Self {
        Self::new()
    }
}

impl LocalDirectory {
    /// Create a client using default settings
    #[must_use]
    pub fn new() -> Self {
        LocalDirectoryBuilder::new().build()
    }

    /// Create a builder for custom configuration
    #[must_use]
    pub fn builder() -> LocalDirectoryBuilder {
        LocalDirectoryBuilder::new()
    }

    /// Access the status endpoint
    #[must_use]
    pub fn status_api(&self) -> StatusApi<'_> {
        StatusApi::new(self)
    }

    /// Access MagicDNS queries
    #[must_use]
    pub fn dns(&self) -> DnsApi<'_> {
        DnsApi::new(self)
    }

    /// Access node identity lookups
    #[must_use]
    pub fn whois(&self) -> WhoIsApi<'_> {
        WhoIsApi::new(self)
    }

    pub(crate) fn dns_server(&self) -> SocketAddr {
        self.inner.config.dns_server
    }

    /// Bound a call by the configured timeout
    pub(crate) async fn with_timeout<T, F>(&self, fut: F) -> Result<T>
    where
        F: Future<Output = Result<T>>,
    {
        tokio::time::timeout(self.inner.config.timeout, fut)
            .await
            .map_err(|_| TailshaleError::Timeout(self.inner.config.timeout_secs()))?
    }

    /// Run `tailscale <args>` and decode its JSON output
    pub(crate) async fn run_json<T: DeserializeOwned>(&self, args: &[&str]) -> Result<T> {
        let bin = &self.inner.config.tailscale_bin;
        debug!(bin = %bin.display(), ?args, "running tailscale");

        let output = self
            .with_timeout(async {
                Command::new(bin)
                    .args(args)
                    .stdin(Stdio::null())
                    .kill_on_drop(true)
                    .output()
                    .await
                    .map_err(|e| {
                        TailshaleError::Directory(format!("failed to run {}: {e}", bin.display()))
                    })
            })
            .await?;

        if !output.status.success() {
            let stderr = String::from_utf8_lossy(&output.stderr);
            return Err(TailshaleError::Directory(format!(
                "tailscale {} exited with {}: {}",
                args.join(" "),
                output.status,
                stderr.trim()
            )));
        }

        serde_json::from_slice(&output.stdout).map_err(|e| {
            TailshaleError::Directory(format!("invalid JSON from tailscale {}: {e}", args.join(" ")))
        })
    }
}

#[async_trait]
impl DirectoryClient for LocalDirectory {
    async fn status(&self) -> Result<DirectoryStatus> {
        self.status_api().get().await
    }

    async fn query_dns(&self, name: &str, qtype: &str) -> Result<Vec<u8>> {
        self.dns().query(name, qtype).await
    }

    async fn who_is(&self, addr: IpAddr) -> Result<DirectoryNode> {
        self.whois().lookup(addr).await
    }
}

/// Builder for configuring a [`LocalDirectory`]
pub struct LocalDirectoryBuilder {
    config: LocalDirectoryConfig,
}

impl Default for LocalDirectoryBuilder {
    fn default() -> Self {
        Self::new()
    }
}

impl LocalDirectoryBuilder {
    /// Create a new builder with default settings
    #[must_use]
    pub fn new() -> Self {
        Self {
            config: LocalDirectoryConfig::default(),
        }
    }

    /// Start from an existing configuration
    #[must_use]
    pub fn config(mut self, config: LocalDirectoryConfig) -> Self {
        self.config = config;
        self
    }

    /// Set the `tailscale` binary (useful on macOS, where it lives in the app bundle)
    #[must_use]
    pub fn tailscale_bin(mut self, path: impl Into<PathBuf>) -> Self {
        self.config.tailscale_bin = path.into();
        self
    }

    /// Set the MagicDNS server address
    #[must_use]
    pub const fn dns_server(mut self, addr: SocketAddr) -> Self {
        self.config.dns_server = addr;
        self
    }

    /// Set the per-call timeout
    #[must_use]
    pub const fn timeout(mut self, timeout: Duration) -> Self {
        self.config.timeout = timeout;
        self
    }

    /// Build the client
    #[must_use]
    pub fn build(self) -> LocalDirectory {
        LocalDirectory {
            inner: Arc::new(DirectoryInner {
                config: self.config,
            }),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_missing_binary_is_directory_error() {
        let client = LocalDirectory::builder()
            .tailscale_bin("/nonexistent/tailscale-binary")
            .build();

        let err = client.status().await.unwrap_err();
        assert!(matches!(err, TailshaleError::Directory(_)));
        assert!(err.to_string().contains("failed to run"));
    }

    #[tokio::test]
    async fn test_timeout() {
        let client = LocalDirectory::builder()
            .timeout(Duration::from_millis(10))
            .build();

        let err = client
            .with_timeout(async {
                tokio::time::sleep(Duration::from_secs(5)).await;
                Ok(())
            })
            .await
            .unwrap_err();
        assert!(matches!(err, TailshaleError::Timeout(0)));
    }
}
