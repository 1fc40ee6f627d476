//! Turning user-supplied host identifiers into verified tailnet hosts.

use crate::directory::DirectoryClient;
use hickory_proto::op::{Message, ResponseCode};
use hickory_proto::rr::RData;
use std::net::IpAddr;
use tailshale_core::{mesh, PublicKey, Result, TailscaleHost, TailshaleError};
use tracing::{debug, instrument, warn};

/// Facts about the tailnet fetched once per invocation
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DirectorySession {
    trust_suffix: String,
}

impl DirectorySession {
    /// Open a session by asking the directory for its status
    pub async fn open<C: DirectoryClient + ?Sized>(client: &C) -> Result<Self> {
        let status = client.status().await?;
        Self::new(&status.trust_suffix)
    }

    /// Build a session from a known MagicDNS suffix
    pub fn new(trust_suffix: &str) -> Result<Self> {
        let trust_suffix = trust_suffix.trim_matches('.').to_ascii_lowercase();
        if trust_suffix.is_empty() {
            return Err(TailshaleError::Directory(
                "tailnet has no MagicDNS suffix".to_string(),
            ));
        }
        Ok(Self { trust_suffix })
    }

    /// MagicDNS suffix, lowercase and without surrounding dots
    #[must_use]
    pub fn trust_suffix(&self) -> &str {
        &self.trust_suffix
    }

    /// Qualify a bare name with the tailnet suffix
    ///
    /// `test` becomes `test.example.ts.net`; names already under the
    /// suffix are returned without their trailing dot.
    #[must_use]
    pub fn qualify(&self, name: &str) -> String {
        let name = name.strip_suffix('.').unwrap_or(name);
        let lower = name.to_ascii_lowercase();
        let suffix = &self.trust_suffix;

        let qualified = lower == *suffix
            || (lower.len() > suffix.len()
                && lower.ends_with(suffix.as_str())
                && lower.as_bytes()[lower.len() - suffix.len() - 1] == b'.');

        if qualified {
            name.to_string()
        } else {
            format!("{name}.{suffix}")
        }
    }
}

/// Resolves host identifiers against a [`DirectoryClient`]
pub struct Resolver<C> {
    client: C,
    session: DirectorySession,
}

impl<C: DirectoryClient> Resolver<C> {
    /// Create a resolver, opening a session on `client`
    pub async fn new(client: C) -> Result<Self> {
        let session = DirectorySession::open(&client).await?;
        debug!(suffix = session.trust_suffix(), "directory session opened");
        Ok(Self { client, session })
    }

    /// Create a resolver with an already-open session
    pub const fn with_session(client: C, session: DirectorySession) -> Self {
        Self { client, session }
    }

    /// The session this resolver uses
    pub const fn session(&self) -> &DirectorySession {
        &self.session
    }

    /// The underlying directory client
    pub const fn client(&self) -> &C {
        &self.client
    }

    /// Resolve a name or address into a tailnet host with its SSH host keys
    #[instrument(skip(self))]
    pub async fn resolve(&self, identifier: &str) -> Result<TailscaleHost> {
        let ip = match identifier.parse::<IpAddr>() {
            Ok(ip) => ip,
            Err(_) => self.lookup_address(identifier).await?,
        }
        .to_canonical();

        if !mesh::is_tailnet_addr(ip) {
            return Err(TailshaleError::NotAMeshNode { addr: ip });
        }

        let node = self
            .client
            .who_is(ip)
            .await
            .map_err(|e| TailshaleError::LookupFailed {
                addr: ip,
                reason: e.to_string(),
            })?;

        let name = node.name.trim_end_matches('.').to_string();
        if !node.ssh_enabled || node.host_keys.is_empty() {
            return Err(TailshaleError::SshNotEnabled { name });
        }

        let mut host = TailscaleHost::new(name, ip)?;
        for encoded in &node.host_keys {
            let key = PublicKey::from_openssh(encoded.trim()).map_err(|e| {
                TailshaleError::MalformedHostKey {
                    name: host.name().to_string(),
                    reason: e.to_string(),
                }
            })?;

            match host.insert_key(key) {
                Ok(Some(replaced)) => warn!(
                    host = host.name(),
                    algorithm = %replaced.algorithm(),
                    "duplicate host key type, keeping the last one"
                ),
                Ok(None) => {}
                Err(skipped) => debug!(
                    host = host.name(),
                    algorithm = %skipped.algorithm(),
                    "skipping unsupported host key"
                ),
            }
        }

        if !host.has_keys() {
            return Err(TailshaleError::SshNotEnabled {
                name: host.name().to_string(),
            });
        }

        debug!(host = host.name(), %ip, keys = host.keys().len(), "resolved");
        Ok(host)
    }

    /// Returns true if `identifier` is a tailnet host with Tailscale SSH keys
    pub async fn check(&self, identifier: &str) -> bool {
        match self.resolve(identifier).await {
            Ok(host) => host.has_keys(),
            Err(e) => {
                debug!(identifier, error = %e, "check failed");
                false
            }
        }
    }

    /// Resolve each identifier in order.
    ///
    /// Hosts failing with a per-host error are skipped; any other error
    /// aborts the whole run.
    pub async fn resolve_all(&self, identifiers: &[String]) -> Result<Vec<TailscaleHost>> {
        let mut hosts = Vec::with_capacity(identifiers.len());
        for identifier in identifiers {
            match self.resolve(identifier).await {
                Ok(host) => hosts.push(host),
                Err(e) if e.is_resolution_error() => {
                    debug!(identifier = %identifier, error = %e, "skipping host");
                }
                Err(e) => return Err(e),
            }
        }
        Ok(hosts)
    }

    async fn lookup_address(&self, name: &str) -> Result<IpAddr> {
        let fqdn = self.session.qualify(name);
        let failed = |reason: String| TailshaleError::ResolutionFailed {
            host: fqdn.clone(),
            reason,
        };

        let response = self
            .client
            .query_dns(&fqdn, "A")
            .await
            .map_err(|e| failed(e.to_string()))?;

        first_a_record(&response).map_err(failed)
    }
}

/// First A record in a raw DNS response
fn first_a_record(response: &[u8]) -> std::result::Result<IpAddr, String> {
    let message =
        Message::from_vec(response).map_err(|e| format!("undecodable DNS response: {e}"))?;

    if message.response_code() != ResponseCode::NoError {
        return Err(format!("DNS answered {}", message.response_code()));
    }

    message
        .answers()
        .iter()
        .find_map(|record| match record.data() {
            RData::A(a) => Some(IpAddr::V4(a.0)),
            _ => None,
        })
        .ok_or_else(|| "no A record".to_string())
}
