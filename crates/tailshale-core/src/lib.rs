//! Core types for tailshale.
//!
//! This crate holds everything that does not talk to tailscaled:
//!
//! - **Types**: [`TailscaleHost`], [`HostKeyType`], [`KeyTypeFilter`]
//! - **Errors**: the [`TailshaleError`] taxonomy
//! - **Mesh ranges**: [`mesh::is_tailnet_addr`]
//! - **known_hosts rendering**: [`known_hosts::emit`]
//! - **SSH config merging**: [`ssh_config::SshConfig`] and the
//!   write/clean operations on the managed block
//!
//! # Example
//!
//! ```rust,ignore
//! use tailshale_core::{known_hosts, KeyTypeFilter, TailscaleHost};
//!
//! fn print(hosts: &[TailscaleHost]) -> tailshale_core::Result<()> {
//!     for line in known_hosts::emit(hosts, KeyTypeFilter::all())? {
//!         println!("{line}");
//!     }
//!     Ok(())
//! }
//! ```

mod error;
pub mod known_hosts;
pub mod mesh;
pub mod ssh_config;
pub mod types;

pub use error::{Result, TailshaleError};
pub use types::*;

pub use ssh_key::PublicKey;
