//! Client configuration types.

use std::net::{IpAddr, Ipv4Addr, SocketAddr};
use std::path::PathBuf;
use std::time::Duration;

/// MagicDNS resolver every tailnet node can reach
pub const DEFAULT_DNS_SERVER: SocketAddr =
    SocketAddr::new(IpAddr::V4(Ipv4Addr::new(100, 100, 100, 100)), 53);

/// Default time a single call to tailscaled may take
pub const DEFAULT_TIMEOUT: Duration = Duration::from_secs(10);

/// How [`LocalDirectory`](crate::LocalDirectory) reaches tailscaled
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LocalDirectoryConfig {
    /// `tailscale` CLI used for status and whois queries
    pub tailscale_bin: PathBuf,

    /// DNS server answering MagicDNS queries
    pub dns_server: SocketAddr,

    /// Upper bound for each individual call
    pub timeout: Duration,
}

impl Default for LocalDirectoryConfig {
    fn default() -> Self {
        Self {
            tailscale_bin: PathBuf::from("tailscale"),
            dns_server: DEFAULT_DNS_SERVER,
            timeout: DEFAULT_TIMEOUT,
        }
    }
}

impl LocalDirectoryConfig {
    /// Create a configuration with default settings
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the `tailscale` binary
    #[must_use]
    pub fn tailscale_bin(mut self, path: impl Into<PathBuf>) -> Self {
        self.tailscale_bin = path.into();
        self
    }

    /// Set the MagicDNS server address
    #[must_use]
    pub const fn dns_server(mut self, addr: SocketAddr) -> Self {
        self.dns_server = addr;
        self
    }

    /// Set the per-call timeout
    #[must_use]
    pub const fn timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    /// Timeout in whole seconds, for error messages
    #[must_use]
    pub const fn timeout_secs(&self) -> u64 {
        self.timeout.as_secs()
    }
}
