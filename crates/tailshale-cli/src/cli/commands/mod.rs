//! Command implementations.

pub mod configure;
pub mod known_hosts;

use std::path::PathBuf;
use tailshale::{LocalDirectory, LocalDirectoryConfig};

/// Shared context for all commands.
#[derive(Debug, Clone)]
pub struct Context {
    /// SSH client config managed by `configure`
    pub ssh_config: PathBuf,

    /// How to reach tailscaled
    pub directory: LocalDirectoryConfig,
}

impl Context {
    /// Create a directory client for the local tailscaled.
    #[must_use]
    pub fn directory(&self) -> LocalDirectory {
        LocalDirectory::builder()
            .config(self.directory.clone())
            .build()
    }
}
