//! Trust Tailscale SSH hosts through `known_hosts` entries derived from the
//! tailnet, instead of trust-on-first-use.
//!
//! # Quick Start
//!
//! ```rust,ignore
//! use tailshale::{known_hosts, KeyTypeFilter, LocalDirectory, Resolver};
//!
//! #[tokio::main(flavor = "current_thread")]
//! async fn main() -> tailshale::Result<()> {
//!     let resolver = Resolver::new(LocalDirectory::new()).await?;
//!
//!     let hosts = resolver.resolve_all(&["server".to_string()]).await?;
//!     for line in known_hosts::emit(&hosts, KeyTypeFilter::all())? {
//!         println!("{line}");
//!     }
//!
//!     Ok(())
//! }
//! ```
//!
//! The SSH config side lives in [`ssh_config`]:
//! [`ssh_config::write_managed_block`] installs the `KnownHostsCommand`
//! hook and [`ssh_config::clean_managed_block`] removes it again.

#![doc(html_root_url = "https://docs.rs/tailshale/0.3.0")]

// Re-export core types
pub use tailshale_core::*;

// Re-export directory access and resolution
pub use tailshale_client::{
    api, DirectoryCall, DirectoryClient, DirectoryNode, DirectorySession, DirectoryStatus,
    LocalDirectory, LocalDirectoryBuilder, LocalDirectoryConfig, MemoryDirectory, Resolver,
    DEFAULT_DNS_SERVER, DEFAULT_TIMEOUT,
};

// Re-export runtime for convenience
pub use tokio;
