use std::net::IpAddr;
use std::path::PathBuf;
use thiserror::Error;

/// Result type alias for tailshale operations
pub type Result<T> = std::result::Result<T, TailshaleError>;

/// Errors that can occur while resolving mesh hosts or editing the SSH config
#[derive(Error, Debug)]
pub enum TailshaleError {
    /// The name could not be turned into an address via MagicDNS
    #[error("could not resolve {host}: {reason}")]
    ResolutionFailed {
        /// Fully-qualified name that was queried
        host: String,
        /// What went wrong
        reason: String,
    },

    /// The address lies outside the tailnet address ranges
    #[error("{addr} is not a tailnet address")]
    NotAMeshNode {
        /// Offending address
        addr: IpAddr,
    },

    /// The identity lookup for an address failed
    #[error("whois lookup for {addr} failed: {reason}")]
    LookupFailed {
        /// Address that was looked up
        addr: IpAddr,
        /// Transport error message
        reason: String,
    },

    /// The node exists but does not run Tailscale SSH
    #[error("Tailscale SSH is not enabled on {name}")]
    SshNotEnabled {
        /// Node name reported by the directory
        name: String,
    },

    /// A host key advertised by the node could not be parsed
    #[error("malformed host key advertised by {name}: {reason}")]
    MalformedHostKey {
        /// Node name reported by the directory
        name: String,
        /// Parser error
        reason: String,
    },

    /// Reading or writing the SSH config failed
    #[error("{}: {source}", path.display())]
    ConfigIo {
        /// File being read or written
        path: PathBuf,
        /// Underlying I/O error
        #[source]
        source: std::io::Error,
    },

    /// The SSH config has a start marker without a matching end marker
    #[error("{}: managed block starting on line {line} is never closed", path.display())]
    UnterminatedBlock {
        /// File being parsed
        path: PathBuf,
        /// 1-based line number of the start marker
        line: usize,
    },

    /// The local directory (tailscaled) could not be queried
    #[error("tailscale directory error: {0}")]
    Directory(String),

    /// A directory call did not finish in time
    #[error("timed out after {0} seconds")]
    Timeout(u64),

    /// No host produced a usable key line
    #[error("no Tailscale SSH host keys found")]
    NoHostKeys,
}

impl TailshaleError {
    /// Returns true if the error belongs to a single host's resolution.
    ///
    /// `Resolver::resolve_all` skips hosts failing with these and returns
    /// any other error.
    #[must_use]
    pub const fn is_resolution_error(&self) -> bool {
        matches!(
            self,
            Self::ResolutionFailed { .. }
                | Self::NotAMeshNode { .. }
                | Self::LookupFailed { .. }
                | Self::SshNotEnabled { .. }
                | Self::MalformedHostKey { .. }
                | Self::Timeout(_)
        )
    }

    pub(crate) fn config_io(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        Self::ConfigIo {
            path: path.into(),
            source,
        }
    }
}
